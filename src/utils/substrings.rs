use ahash::AHashSet;

/// Every non-empty contiguous substring of `s`, deduplicated.
///
/// Quadratic in the length of `s`; meant for generating verification inputs.
pub fn substrings(s: &str) -> AHashSet<String> {
    let bounds: Vec<usize> = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect();

    let mut result = AHashSet::with_capacity(bounds.len() * bounds.len() / 2);
    for (i, &start) in bounds.iter().enumerate() {
        for &end in &bounds[i + 1..] {
            result.insert(s[start..end].to_string());
        }
    }
    result
}
