//! # ftio-core
//!
//! Safe Rust implementations of the two classic stdio exercises:
//!
//! - [`gnl`]: `get_next_line`, a line reader that pulls fixed-size chunks
//!   from a file descriptor and keeps the overread remainder per descriptor.
//! - [`stdio`]: `ft_printf`, a printf-style formatter for
//!   `%c %s %p %d %i %u %x %X %%` with width, precision and flags.
//!
//! No `unsafe` code is permitted at the crate level. Raw descriptor I/O
//! lives in `ftio-abi`, which plugs into [`gnl::FdSource`].

#![deny(unsafe_code)]

pub mod config;
pub mod errno;
pub mod gnl;
pub mod stdio;

pub use config::{BufferSize, buffer_size};
pub use gnl::{FdSource, GnlError, LineReader, LineTable, MemorySource};
pub use stdio::{FormatError, FtArg, ft_format, ft_printf};
