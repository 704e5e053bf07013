//! `get_next_line` engine.
//!
//! [`LineReader`] serves one descriptor; [`LineTable`] keeps one reader per
//! descriptor so reads on several descriptors can be interleaved without
//! mixing their leftovers.

use std::collections::HashMap;

use super::GnlError;
use super::source::FdSource;
use super::stash::Stash;
use crate::config::BufferSize;
use crate::errno;

/// Line reader state for a single descriptor.
#[derive(Debug)]
pub struct LineReader {
    stash: Stash,
    chunk: Vec<u8>,
    eof: bool,
}

impl LineReader {
    /// Create a reader that asks for `buffer_size` bytes per read.
    #[must_use]
    pub fn new(buffer_size: BufferSize) -> Self {
        Self {
            stash: Stash::with_capacity(buffer_size.get()),
            chunk: vec![0u8; buffer_size.get()],
            eof: false,
        }
    }

    /// Bytes already read from the descriptor but not yet returned.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.stash.pending()
    }

    /// Whether the descriptor has reported end of file.
    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.eof
    }

    /// Return the next line of `fd`, trailing `\n` included.
    ///
    /// A last line without a newline is returned as-is; once everything has
    /// been handed out the result is `Ok(None)`. On a read error the
    /// leftover is discarded.
    pub fn next_line<S: FdSource + ?Sized>(
        &mut self,
        src: &mut S,
        fd: i32,
    ) -> Result<Option<Vec<u8>>, GnlError> {
        if fd < 0 {
            return Err(GnlError::BadDescriptor(fd));
        }
        loop {
            if let Some(line) = self.stash.take_line() {
                return Ok(Some(line));
            }
            if self.eof {
                return Ok(self.stash.take_rest());
            }
            match src.read_fd(fd, &mut self.chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.stash.append(&self.chunk[..n]),
                Err(errno::EINTR) => continue,
                Err(e) => {
                    self.stash.clear();
                    errno::set_errno(e);
                    return Err(GnlError::Read { fd, errno: e });
                }
            }
        }
    }
}

/// Per-descriptor line readers.
///
/// An entry is created on the first call for a descriptor and dropped as
/// soon as that descriptor yields `None` or an error, so a descriptor
/// number reused by a later `open` starts from a clean state.
#[derive(Debug, Default)]
pub struct LineTable {
    readers: HashMap<i32, LineReader>,
    buffer_size: BufferSize,
}

impl LineTable {
    /// Create a table whose readers use `buffer_size`.
    #[must_use]
    pub fn new(buffer_size: BufferSize) -> Self {
        Self {
            readers: HashMap::new(),
            buffer_size,
        }
    }

    #[must_use]
    pub fn buffer_size(&self) -> BufferSize {
        self.buffer_size
    }

    /// Change the chunk size for readers created from now on.
    pub fn set_buffer_size(&mut self, buffer_size: BufferSize) {
        self.buffer_size = buffer_size;
    }

    /// Return the next line of `fd`. See [`LineReader::next_line`].
    pub fn next_line<S: FdSource + ?Sized>(
        &mut self,
        src: &mut S,
        fd: i32,
    ) -> Result<Option<Vec<u8>>, GnlError> {
        if fd < 0 {
            return Err(GnlError::BadDescriptor(fd));
        }
        let buffer_size = self.buffer_size;
        let reader = self
            .readers
            .entry(fd)
            .or_insert_with(|| LineReader::new(buffer_size));
        let result = reader.next_line(src, fd);
        if !matches!(result, Ok(Some(_))) {
            self.readers.remove(&fd);
        }
        result
    }

    /// Forget any leftover for `fd`. Returns whether there was state to drop.
    pub fn release(&mut self, fd: i32) -> bool {
        self.readers.remove(&fd).is_some()
    }

    /// Whether `fd` currently has reader state.
    #[must_use]
    pub fn is_tracked(&self, fd: i32) -> bool {
        self.readers.contains_key(&fd)
    }

    /// Leftover bytes held for `fd`.
    #[must_use]
    pub fn pending(&self, fd: i32) -> &[u8] {
        self.readers.get(&fd).map_or(&[][..], LineReader::pending)
    }

    /// Number of descriptors with reader state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnl::MemorySource;

    fn size(n: usize) -> BufferSize {
        BufferSize::new(n).unwrap()
    }

    fn drain(data: &[u8], buffer_size: usize) -> Vec<Vec<u8>> {
        let mut src = MemorySource::new();
        src.insert(3, data.to_vec());
        let mut reader = LineReader::new(size(buffer_size));
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line(&mut src, 3).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn simple_lines_across_buffer_sizes() {
        for bs in [1, 2, 3, 5, 42, 10_000] {
            let lines = drain(b"Hello\n42\nNetwork\n", bs);
            assert_eq!(
                lines,
                vec![b"Hello\n".to_vec(), b"42\n".to_vec(), b"Network\n".to_vec()],
                "buffer size {bs}"
            );
        }
    }

    #[test]
    fn empty_input_yields_none_immediately() {
        assert!(drain(b"", 42).is_empty());
    }

    #[test]
    fn only_newline() {
        assert_eq!(drain(b"\n", 1), vec![b"\n".to_vec()]);
    }

    #[test]
    fn no_newline_at_eof() {
        assert_eq!(
            drain(b"first\nlast", 4),
            vec![b"first\n".to_vec(), b"last".to_vec()]
        );
    }

    #[test]
    fn long_line_spans_many_reads() {
        let long = vec![b'x'; 10_000];
        let mut data = long.clone();
        data.push(b'\n');
        let lines = drain(&data, 7);
        assert_eq!(lines.len(), 1);
        assert_eq!(&lines[0][..10_000], &long[..]);
    }

    #[test]
    fn none_is_sticky_after_eof() {
        let mut src = MemorySource::new();
        src.insert(3, b"a\n".to_vec());
        let mut reader = LineReader::new(size(8));
        assert!(reader.next_line(&mut src, 3).unwrap().is_some());
        assert!(reader.next_line(&mut src, 3).unwrap().is_none());
        assert!(reader.at_eof());
        assert!(reader.next_line(&mut src, 3).unwrap().is_none());
    }

    /// Source that reports `EINTR` a few times before delegating.
    struct Interrupted {
        inner: MemorySource,
        interrupts: usize,
    }

    impl FdSource for Interrupted {
        fn read_fd(&mut self, fd: i32, buf: &mut [u8]) -> Result<usize, i32> {
            if self.interrupts > 0 {
                self.interrupts -= 1;
                return Err(errno::EINTR);
            }
            self.inner.read_fd(fd, buf)
        }
    }

    #[test]
    fn eintr_is_retried() {
        let mut inner = MemorySource::new();
        inner.insert(3, b"abc\n".to_vec());
        let mut src = Interrupted {
            inner,
            interrupts: 2,
        };
        let mut reader = LineReader::new(size(2));
        assert_eq!(
            reader.next_line(&mut src, 3).unwrap().as_deref(),
            Some(&b"abc\n"[..])
        );
    }

    #[test]
    fn read_error_discards_leftover() {
        let mut src = MemorySource::new();
        src.insert(3, b"one\ntwo\nthree".to_vec())
            .fail_after(3, 1, errno::EIO);
        let mut reader = LineReader::new(size(6));
        // First read returns "one\ntw".
        assert_eq!(
            reader.next_line(&mut src, 3).unwrap().as_deref(),
            Some(&b"one\n"[..])
        );
        assert_eq!(reader.pending(), b"tw");
        let err = reader.next_line(&mut src, 3).unwrap_err();
        assert_eq!(err, GnlError::Read { fd: 3, errno: errno::EIO });
        assert!(reader.pending().is_empty());
        assert_eq!(errno::get_errno(), errno::EIO);
    }

    #[test]
    fn negative_fd_is_rejected() {
        let mut src = MemorySource::new();
        let mut table = LineTable::new(size(4));
        assert_eq!(
            table.next_line(&mut src, -1),
            Err(GnlError::BadDescriptor(-1))
        );
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_fd_is_a_read_error() {
        let mut src = MemorySource::new();
        let mut table = LineTable::new(size(4));
        assert_eq!(
            table.next_line(&mut src, 42),
            Err(GnlError::Read {
                fd: 42,
                errno: errno::EBADF
            })
        );
        assert!(!table.is_tracked(42));
    }

    #[test]
    fn table_interleaves_descriptors() {
        let mut src = MemorySource::new();
        src.insert(3, b"A1\nA2\n".to_vec());
        src.insert(4, b"B1\nB2\n".to_vec());
        let mut table = LineTable::new(size(1));
        let mut next = |fd| table.next_line(&mut src, fd).unwrap().unwrap();
        assert_eq!(next(3), b"A1\n");
        assert_eq!(next(4), b"B1\n");
        assert_eq!(next(3), b"A2\n");
        assert_eq!(next(4), b"B2\n");
    }

    #[test]
    fn table_keeps_leftover_per_descriptor() {
        let mut src = MemorySource::new();
        src.insert(3, b"A1\nA2\n".to_vec());
        src.insert(4, b"B1\nB2\n".to_vec());
        let mut table = LineTable::new(size(64));
        table.next_line(&mut src, 3).unwrap();
        table.next_line(&mut src, 4).unwrap();
        assert_eq!(table.pending(3), b"A2\n");
        assert_eq!(table.pending(4), b"B2\n");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn table_drops_state_at_eof() {
        let mut src = MemorySource::new();
        src.insert(3, b"only".to_vec());
        let mut table = LineTable::new(size(2));
        assert_eq!(
            table.next_line(&mut src, 3).unwrap().as_deref(),
            Some(&b"only"[..])
        );
        assert!(table.is_tracked(3));
        assert_eq!(table.next_line(&mut src, 3), Ok(None));
        assert!(!table.is_tracked(3));
    }

    #[test]
    fn release_forgets_leftover_for_reused_fd() {
        let mut src = MemorySource::new();
        src.insert(3, b"stale\nstale2\n".to_vec());
        let mut table = LineTable::new(size(64));
        table.next_line(&mut src, 3).unwrap();
        assert!(table.release(3));
        assert!(!table.release(3));

        src.insert(3, b"fresh\n".to_vec());
        assert_eq!(
            table.next_line(&mut src, 3).unwrap().as_deref(),
            Some(&b"fresh\n"[..])
        );
    }

    #[test]
    fn buffer_size_applies_to_new_readers() {
        let mut table = LineTable::new(size(4));
        table.set_buffer_size(size(9));
        assert_eq!(table.buffer_size().get(), 9);

        let mut src = MemorySource::new();
        src.insert(3, b"123456789\n".to_vec());
        table.next_line(&mut src, 3).unwrap();
        assert_eq!(src.read_calls(3), 2);
    }
}
