//! Leftover buffer for one descriptor.
//!
//! Bytes read past the last returned newline wait here for the next call.
//!
//! Invariants:
//! - `pos <= data.len()`
//! - `data[pos..]` is exactly the unread remainder, in file order.

/// Unconsumed bytes carried between `next_line` calls.
#[derive(Debug, Default, Clone)]
pub struct Stash {
    data: Vec<u8>,
    /// Start of the unread remainder.
    pos: usize,
}

impl Stash {
    /// Create an empty stash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stash pre-sized for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            pos: 0,
        }
    }

    /// Bytes waiting to be returned.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// Number of bytes waiting to be returned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() - self.pos
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a complete line is already buffered.
    #[must_use]
    pub fn has_line(&self) -> bool {
        memchr::memchr(b'\n', self.pending()).is_some()
    }

    /// Append a freshly read chunk.
    ///
    /// Consumed bytes are dropped first once they make up at least half of
    /// the backing storage, so the buffer does not grow with file length.
    pub fn append(&mut self, chunk: &[u8]) {
        if self.pos > 0 && self.pos * 2 >= self.data.len() {
            self.data.drain(..self.pos);
            self.pos = 0;
        }
        self.data.extend_from_slice(chunk);
    }

    /// Remove and return the first line, trailing `\n` included.
    ///
    /// Returns `None` if no newline is buffered yet.
    pub fn take_line(&mut self) -> Option<Vec<u8>> {
        let nl = memchr::memchr(b'\n', self.pending())?;
        let end = self.pos + nl + 1;
        let line = self.data[self.pos..end].to_vec();
        self.pos = end;
        if self.pos == self.data.len() {
            self.clear();
        }
        Some(line)
    }

    /// Remove and return everything left, or `None` if nothing is left.
    ///
    /// Used at end of file for a last line without a newline.
    pub fn take_rest(&mut self) -> Option<Vec<u8>> {
        if self.is_empty() {
            self.clear();
            return None;
        }
        let rest = self.data[self.pos..].to_vec();
        self.clear();
        Some(rest)
    }

    /// Discard all pending data.
    pub fn clear(&mut self) {
        self.data.clear();
        self.pos = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_line_includes_newline() {
        let mut stash = Stash::new();
        stash.append(b"Hello\n42\n");
        assert_eq!(stash.take_line().as_deref(), Some(&b"Hello\n"[..]));
        assert_eq!(stash.take_line().as_deref(), Some(&b"42\n"[..]));
        assert!(stash.take_line().is_none());
        assert!(stash.is_empty());
    }

    #[test]
    fn test_partial_line_waits_for_more() {
        let mut stash = Stash::new();
        stash.append(b"Net");
        assert!(!stash.has_line());
        assert!(stash.take_line().is_none());
        stash.append(b"work\nrest");
        assert_eq!(stash.take_line().as_deref(), Some(&b"Network\n"[..]));
        assert_eq!(stash.pending(), b"rest");
    }

    #[test]
    fn test_take_rest_returns_remainder_once() {
        let mut stash = Stash::new();
        stash.append(b"tail");
        assert_eq!(stash.take_rest().as_deref(), Some(&b"tail"[..]));
        assert!(stash.take_rest().is_none());
    }

    #[test]
    fn test_consecutive_newlines() {
        let mut stash = Stash::new();
        stash.append(b"\n\n\n");
        for _ in 0..3 {
            assert_eq!(stash.take_line().as_deref(), Some(&b"\n"[..]));
        }
        assert!(stash.take_line().is_none());
    }

    #[test]
    fn test_append_compacts_consumed_prefix() {
        let mut stash = Stash::with_capacity(16);
        stash.append(b"aaaa\nbb");
        let _ = stash.take_line();
        stash.append(b"b\n");
        assert_eq!(stash.pos, 0);
        assert_eq!(stash.pending(), b"bbb\n");
    }

    #[test]
    fn test_clear_discards() {
        let mut stash = Stash::new();
        stash.append(b"abc\ndef");
        stash.clear();
        assert!(stash.is_empty());
        assert!(stash.take_rest().is_none());
    }
}
