//! `ft_printf`: binds typed arguments to a parsed format string.
//!
//! C hands printf an untyped `va_list`; here every argument carries its own
//! class ([`FtArg`]) and each directive checks that it got something it can
//! render. Integer classes are reinterpreted the way default-promoted C
//! `int`/`unsigned int` arguments would be, so `%u` of `-1` prints
//! `4294967295` exactly like the host printf.

use std::io::{self, Write};

use thiserror::Error;

use super::printf::{
    FormatSegment, FormatSpec, Precision, format_char, format_pointer, format_signed, format_str,
    format_unsigned, parse_format_string,
};

/// Placeholder printed for a null `%s` argument.
pub const NULL_STR: &[u8] = b"(null)";

/// One typed printf argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtArg<'a> {
    Char(u8),
    /// `None` models a C `NULL` string pointer.
    Str(Option<&'a [u8]>),
    Int(i64),
    UInt(u64),
    Ptr(usize),
}

impl FtArg<'_> {
    /// Class name used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Int(_) => "int",
            Self::UInt(_) => "unsigned",
            Self::Ptr(_) => "pointer",
        }
    }
}

impl From<u8> for FtArg<'_> {
    fn from(c: u8) -> Self {
        Self::Char(c)
    }
}

impl From<char> for FtArg<'_> {
    /// Non-ASCII chars keep only their low byte, as `(unsigned char)` would.
    fn from(c: char) -> Self {
        Self::Char(c as u32 as u8)
    }
}

impl From<i32> for FtArg<'_> {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for FtArg<'_> {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FtArg<'_> {
    fn from(v: u32) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u64> for FtArg<'_> {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<usize> for FtArg<'_> {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}

impl<'a> From<&'a str> for FtArg<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for FtArg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Self::Str(Some(s))
    }
}

impl<'a> From<Option<&'a str>> for FtArg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Self::Str(s.map(str::as_bytes))
    }
}

impl<T> From<*const T> for FtArg<'_> {
    fn from(p: *const T) -> Self {
        Self::Ptr(p as usize)
    }
}

impl<T> From<*mut T> for FtArg<'_> {
    fn from(p: *mut T) -> Self {
        Self::Ptr(p as usize)
    }
}

/// Why a format string could not be rendered with the given arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing argument {index} for %{conversion}")]
    MissingArgument { index: usize, conversion: char },
    #[error("argument {index} is {found}, not usable for %{conversion}")]
    TypeMismatch {
        index: usize,
        conversion: char,
        found: &'static str,
    },
}

/// Render `fmt` with `args` into a fresh buffer.
///
/// Arguments are consumed left to right, one per directive; surplus
/// arguments are ignored.
pub fn ft_format(fmt: &[u8], args: &[FtArg<'_>]) -> Result<Vec<u8>, FormatError> {
    let segments = parse_format_string(fmt);
    let mut buf = Vec::with_capacity(fmt.len() + 16);
    let mut next = args.iter().enumerate();

    for seg in &segments {
        match seg {
            FormatSegment::Literal(lit) => buf.extend_from_slice(lit),
            FormatSegment::Percent => buf.push(b'%'),
            FormatSegment::Spec(spec) => {
                let (index, arg) = next.next().ok_or(FormatError::MissingArgument {
                    index: args.len(),
                    conversion: char::from(spec.conversion),
                })?;
                render_arg(spec, index, *arg, &mut buf)?;
            }
        }
    }
    Ok(buf)
}

/// Render `fmt` with `args` and write the result to `out` in one `write_all`.
///
/// Returns the number of bytes written, NUL bytes from `%c` included.
/// A formatting error is reported as [`io::ErrorKind::InvalidInput`] and
/// nothing is written.
pub fn ft_printf<W: Write + ?Sized>(
    out: &mut W,
    fmt: &[u8],
    args: &[FtArg<'_>],
) -> io::Result<usize> {
    let rendered =
        ft_format(fmt, args).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    out.write_all(&rendered)?;
    Ok(rendered.len())
}

/// An argument after the conversion's C reinterpretation rules were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundArg<'a> {
    Signed(i64),
    Unsigned(u64),
    Char(u8),
    Str(Option<&'a [u8]>),
    Ptr(usize),
}

/// Check `arg` against the directive it feeds and coerce it.
///
/// Integers are narrowed to the 32-bit `int`/`unsigned int` a C printf reads
/// after default promotion, whatever width the caller passed.
/// `index` is only used for error reporting.
pub fn bind_arg<'a>(
    spec: &FormatSpec,
    index: usize,
    arg: FtArg<'a>,
) -> Result<BoundArg<'a>, FormatError> {
    let mismatch = || FormatError::TypeMismatch {
        index,
        conversion: char::from(spec.conversion),
        found: arg.kind(),
    };

    let bound = match spec.conversion {
        b'd' | b'i' => BoundArg::Signed(match arg {
            FtArg::Int(v) => i64::from(v as i32),
            FtArg::UInt(v) => i64::from(v as u32 as i32),
            FtArg::Char(c) => i64::from(c),
            _ => return Err(mismatch()),
        }),
        b'u' | b'x' | b'X' => BoundArg::Unsigned(match arg {
            FtArg::UInt(v) => u64::from(v as u32),
            FtArg::Int(v) => u64::from(v as u32),
            FtArg::Char(c) => u64::from(c),
            _ => return Err(mismatch()),
        }),
        b'c' => BoundArg::Char(match arg {
            FtArg::Char(c) => c,
            FtArg::Int(v) => v as u8,
            FtArg::UInt(v) => v as u8,
            _ => return Err(mismatch()),
        }),
        b's' => match arg {
            FtArg::Str(s) => BoundArg::Str(s),
            _ => return Err(mismatch()),
        },
        b'p' => BoundArg::Ptr(match arg {
            FtArg::Ptr(p) => p,
            FtArg::UInt(v) => v as usize,
            FtArg::Int(v) => v as usize,
            _ => return Err(mismatch()),
        }),
        _ => return Err(mismatch()),
    };
    Ok(bound)
}

fn render_arg(
    spec: &FormatSpec,
    index: usize,
    arg: FtArg<'_>,
    buf: &mut Vec<u8>,
) -> Result<(), FormatError> {
    match bind_arg(spec, index, arg)? {
        BoundArg::Signed(v) => format_signed(v, spec, buf),
        BoundArg::Unsigned(v) => format_unsigned(v, spec, buf),
        BoundArg::Char(c) => format_char(c, spec, buf),
        BoundArg::Str(Some(s)) => format_str(s, spec, buf),
        // glibc prints nothing rather than a clipped "(nu".
        BoundArg::Str(None) => match spec.precision {
            Precision::Fixed(p) if p < NULL_STR.len() => format_str(b"", spec, buf),
            _ => format_str(NULL_STR, spec, buf),
        },
        BoundArg::Ptr(addr) => format_pointer(addr, spec, buf),
    }
    Ok(())
}

/// Build an argument slice and call [`ft_format`].
///
/// ```
/// use ftio_core::ft_format;
///
/// let out = ft_format!(b"[%c|%s|%d]", 'Z', "Hi", -42).unwrap();
/// assert_eq!(out, b"[Z|Hi|-42]");
/// ```
#[macro_export]
macro_rules! ft_format {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::stdio::ft_format(
            ::core::convert::AsRef::<[u8]>::as_ref($fmt),
            &[$($crate::stdio::FtArg::from($arg)),*],
        )
    };
}
