//! Line-at-a-time reading from file descriptors.
//!
//! Each call to `next_line` returns one line, including its `\n`. The reader
//! pulls fixed-size chunks from an [`FdSource`] and keeps any bytes read past
//! the newline for the next call. That leftover is held per descriptor, so
//! reads on several descriptors can be interleaved.

pub mod reader;
pub mod source;
pub mod stash;

use thiserror::Error;

use crate::errno::errno_name;

pub use reader::{LineReader, LineTable};
pub use source::{FdSource, MemorySource};
pub use stash::Stash;

/// Why no line could be produced.
///
/// End of file is not an error: it is reported as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GnlError {
    #[error("bad file descriptor {0}")]
    BadDescriptor(i32),
    #[error("read from fd {fd} failed: {} ({errno})", errno_name(*errno))]
    Read { fd: i32, errno: i32 },
}

impl GnlError {
    /// errno equivalent of this error.
    #[must_use]
    pub fn errno(&self) -> i32 {
        match self {
            Self::BadDescriptor(_) => crate::errno::EBADF,
            Self::Read { errno, .. } => *errno,
        }
    }
}
