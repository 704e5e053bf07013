//! Where the line reader gets its bytes from.

use std::collections::HashMap;

use crate::errno;

/// A `read(2)`-shaped byte source addressed by file descriptor.
///
/// Returns the number of bytes placed in `buf` (`0` at end of file) or the
/// errno of the failed read.
pub trait FdSource {
    fn read_fd(&mut self, fd: i32, buf: &mut [u8]) -> Result<usize, i32>;
}

impl<S: FdSource + ?Sized> FdSource for &mut S {
    fn read_fd(&mut self, fd: i32, buf: &mut [u8]) -> Result<usize, i32> {
        (**self).read_fd(fd, buf)
    }
}

#[derive(Debug, Default)]
struct MemoryFile {
    data: Vec<u8>,
    offset: usize,
    /// Largest count a single read may return.
    max_chunk: Option<usize>,
    /// Errno to report on every read, after `fail_after` successful reads.
    fail: Option<(usize, i32)>,
    reads: usize,
}

/// In-memory descriptor table.
///
/// Unknown descriptors fail with `EBADF`. Each descriptor can be capped
/// to short reads or set to fail, to exercise the reader's edge paths.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<i32, MemoryFile>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `data` under `fd`, replacing anything already there.
    pub fn insert(&mut self, fd: i32, data: impl Into<Vec<u8>>) -> &mut Self {
        self.files.insert(
            fd,
            MemoryFile {
                data: data.into(),
                ..MemoryFile::default()
            },
        );
        self
    }

    /// Limit every read on `fd` to at most `max` bytes.
    pub fn short_reads(&mut self, fd: i32, max: usize) -> &mut Self {
        if let Some(file) = self.files.get_mut(&fd) {
            file.max_chunk = Some(max.max(1));
        }
        self
    }

    /// Make reads on `fd` fail with `errno` once `after` reads have succeeded.
    pub fn fail_after(&mut self, fd: i32, after: usize, errno: i32) -> &mut Self {
        if let Some(file) = self.files.get_mut(&fd) {
            file.fail = Some((after, errno));
        }
        self
    }

    /// Drop `fd` from the table, like `close(2)`.
    pub fn close(&mut self, fd: i32) -> bool {
        self.files.remove(&fd).is_some()
    }

    /// Successful and failed reads issued against `fd` so far.
    #[must_use]
    pub fn read_calls(&self, fd: i32) -> usize {
        self.files.get(&fd).map_or(0, |f| f.reads)
    }
}

impl FdSource for MemorySource {
    fn read_fd(&mut self, fd: i32, buf: &mut [u8]) -> Result<usize, i32> {
        let file = self.files.get_mut(&fd).ok_or(errno::EBADF)?;
        file.reads += 1;
        if let Some((after, errno)) = file.fail
            && file.reads > after
        {
            return Err(errno);
        }
        let remaining = &file.data[file.offset..];
        let cap = file.max_chunk.unwrap_or(usize::MAX);
        let n = remaining.len().min(buf.len()).min(cap);
        buf[..n].copy_from_slice(&remaining[..n]);
        file.offset += n;
        Ok(n)
    }
}
