//! Byte-level helpers for reading line-oriented corpora

use memchr::{memchr, memchr_iter};

/// Number of leading bytes inspected by [`is_binary`]
const BINARY_SAMPLE: usize = 8192;

/// Check if content looks binary: a NUL byte in the first 8 KiB
pub fn is_binary(content: &[u8]) -> bool {
    let sample = &content[..content.len().min(BINARY_SAMPLE)];
    memchr(0, sample).is_some()
}

/// Split content into lines, dropping `\n` and a trailing `\r`.
///
/// Yields `(line_number, bytes)` with 1-based line numbers. A final newline
/// does not produce an extra empty line.
pub fn split_lines(content: &[u8]) -> impl Iterator<Item = (u32, &[u8])> {
    let mut start = 0;
    let mut ends = memchr_iter(b'\n', content)
        .chain(std::iter::once(content.len()));
    let len = content.len();

    std::iter::from_fn(move || {
        let end = ends.next()?;
        if end == len && start == len {
            return None;
        }
        let mut line = &content[start..end];
        start = end + 1;
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }
        Some(line)
    })
    .zip(1u32..)
    .map(|(line, number)| (number, line))
}

/// ASCII-only case folding; byte offsets are preserved
pub fn fold_case(s: &str) -> String {
    s.to_ascii_lowercase()
}
