//! Benchmark inputs shared by the `benches/` targets.

/// `lines` lines of `width` bytes each, newline included.
#[must_use]
pub fn text_corpus(lines: usize, width: usize) -> Vec<u8> {
    let width = width.max(1);
    let mut out = Vec::with_capacity(lines * width);
    for i in 0..lines {
        let fill = b'a' + (i % 26) as u8;
        out.resize(out.len() + width - 1, fill);
        out.push(b'\n');
    }
    out
}
