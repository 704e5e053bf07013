//! Formatted output.
//!
//! [`printf`] is the directive parser and the per-conversion renderers;
//! [`ft_printf`] binds typed arguments to a format string and writes the
//! result.

pub mod ft_printf;
pub mod printf;

pub use ft_printf::{BoundArg, FormatError, FtArg, NULL_STR, bind_arg, ft_format, ft_printf};
pub use printf::{
    FormatFlags, FormatSegment, FormatSpec, MAX_PAD, Precision, Width, parse_format_spec,
    parse_format_string,
};
