#![no_main]
//! Fuzz target for the get_next_line engine.
//!
//! The first two bytes pick the buffer size and the short-read cap; the rest
//! is the file content. Concatenating every returned line must reproduce
//! the content exactly, and only the last line may lack a newline.

use ftio_core::config::BufferSize;
use ftio_core::gnl::{LineTable, MemorySource};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let [bs, cap, content @ ..] = data else {
        return;
    };
    let Ok(buffer_size) = BufferSize::new(usize::from(*bs) + 1) else {
        return;
    };

    let mut src = MemorySource::new();
    src.insert(3, content.to_vec()).short_reads(3, usize::from(*cap) + 1);
    let mut table = LineTable::new(buffer_size);

    let mut joined = Vec::with_capacity(content.len());
    let mut saw_unterminated = false;
    while let Some(line) = table.next_line(&mut src, 3).expect("memory reads never fail") {
        assert!(!line.is_empty());
        assert!(!saw_unterminated, "line returned after an unterminated one");
        let newlines = line.iter().filter(|&&b| b == b'\n').count();
        if line.ends_with(b"\n") {
            assert_eq!(newlines, 1);
        } else {
            assert_eq!(newlines, 0);
            saw_unterminated = true;
        }
        joined.extend_from_slice(&line);
    }
    assert_eq!(joined, content);
    assert!(!table.is_tracked(3));
});
