use super::arena::NodeArena;
use super::types::{ROOT, TreeStats};

/// Walk the arena and summarize its shape
pub(crate) fn collect(arena: &NodeArena) -> TreeStats {
    let mut stats = TreeStats {
        text_count: arena.texts().len() as u32,
        identifier_count: arena.labels(ROOT).len(),
        node_count: arena.len() as u32,
        ..Default::default()
    };

    for node in arena.node_ids() {
        if arena.is_leaf(node) && node != ROOT {
            stats.leaf_count += 1;
        } else {
            stats.internal_count += 1;
        }
        if node != ROOT && arena.suffix_link(node).is_some() {
            stats.suffix_link_count += 1;
        }
    }

    for text in 0..arena.texts().len() as u32 {
        let len = arena.texts().chars(text).len();
        stats.symbol_count += len as u64 + 1;
        stats.max_text_len = stats.max_text_len.max(len as u32);
    }

    stats
}

/// Print tree statistics as a table
pub fn show_stats(stats: &TreeStats) {
    println!("Tree Statistics");
    println!("===============");
    println!();
    println!("Texts:            {}", stats.text_count);
    println!("Identifiers:      {}", stats.identifier_count);
    println!("Symbols:          {}", stats.symbol_count);
    println!("Longest text:     {}", stats.max_text_len);
    println!();
    println!("Nodes:            {}", stats.node_count);
    println!("  internal:       {}", stats.internal_count);
    println!("  leaves:         {}", stats.leaf_count);
    println!("Suffix links:     {}", stats.suffix_link_count);

    if stats.symbol_count > 0 {
        println!();
        println!(
            "Nodes per symbol: {:.2}",
            stats.node_count as f64 / stats.symbol_count as f64
        );
    }
}
