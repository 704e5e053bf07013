#![cfg_attr(feature = "c-variadic", feature(c_variadic))]
// extern "C" entry points take raw descriptors and pointers from C callers.
#![allow(clippy::missing_safety_doc)]
//! # ftio-abi
//!
//! File-descriptor boundary for `ftio-core`.
//!
//! ```text
//! C caller -> extern "C" entry (this crate) -> ftio-core engine -> read(2)/write(2)
//! ```
//!
//! The line reader keeps one process-wide [`ftio_core::LineTable`] behind a
//! lock, so `get_next_line` behaves like the C original: state per descriptor,
//! `NULL` on end of file or error. The printf side renders with the core
//! engine and writes the whole result to the descriptor.
//!
//! [`host`] renders the same directives with the system `snprintf`; it is the
//! reference the conformance harness compares against.

pub mod gnl_abi;
pub mod host;
pub mod stdio_abi;
pub mod unistd_abi;

#[cfg(feature = "c-variadic")]
pub mod variadic_abi;

pub use gnl_abi::{get_next_line_bytes, next_line, release_fd};
pub use host::host_format;
pub use stdio_abi::{ft_dprintf, ft_printf};
pub use unistd_abi::{FdReader, sys_read_fd, sys_write_fd, write_all_fd};
