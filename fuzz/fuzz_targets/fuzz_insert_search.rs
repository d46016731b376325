#![no_main]

use arbitrary::Arbitrary;
use gstree::GeneralizedSuffixTree;
use gstree::utils::substrings;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    texts: Vec<(String, u16)>,
    probe: String,
}

fuzz_target!(|input: Input| {
    // Keep the quadratic substring check cheap
    let texts: Vec<(String, u32)> = input
        .texts
        .into_iter()
        .take(8)
        .map(|(text, id)| (text.chars().take(32).collect(), id as u32))
        .collect();

    let mut tree = GeneralizedSuffixTree::new();
    for (text, id) in &texts {
        tree.insert(text, *id);
    }

    // Every substring of every text finds its identifier
    for (text, id) in &texts {
        for s in substrings(text) {
            assert!(tree.search(&s).contains(*id), "{s:?} of {text:?}");
        }
    }

    // Arbitrary probes agree with a linear scan
    let expected: Vec<u32> = {
        let mut ids: Vec<u32> = texts
            .iter()
            .filter(|(text, _)| text.contains(input.probe.as_str()))
            .map(|(_, id)| *id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    assert_eq!(tree.search(&input.probe).iter().collect::<Vec<_>>(), expected);
});
