//! Variadic C entry points. Only built with the `c-variadic` feature.

use std::ffi::{CStr, c_char, c_int, c_uint, c_void};

use ftio_core::stdio::{FormatSegment, FtArg, parse_format_string};

use crate::stdio_abi;
use crate::unistd_abi::set_abi_errno;

/// One argument pulled off the C variadic list.
enum RawArg {
    Int(c_int),
    UInt(c_uint),
    Char(u8),
    Str(*const c_char),
    Ptr(usize),
}

/// Pull one argument per directive from `$args`, typed by its conversion.
/// A macro so the unstable variadic list type never has to be named.
macro_rules! extract_va_args {
    ($segments:expr, $args:expr) => {{
        let mut raw = Vec::new();
        for seg in $segments {
            if let FormatSegment::Spec(spec) = seg {
                raw.push(match spec.conversion {
                    b'c' => RawArg::Char(unsafe { $args.arg::<c_int>() } as u8),
                    b's' => RawArg::Str(unsafe { $args.arg::<*const c_char>() }),
                    b'p' => RawArg::Ptr(unsafe { $args.arg::<*const c_void>() } as usize),
                    b'd' | b'i' => RawArg::Int(unsafe { $args.arg::<c_int>() }),
                    _ => RawArg::UInt(unsafe { $args.arg::<c_uint>() }),
                });
            }
        }
        raw
    }};
}

/// # Safety
///
/// Every non-null `Str` must point to a NUL-terminated string that outlives
/// the returned arguments.
unsafe fn to_ft_args<'a>(raw: &[RawArg]) -> Vec<FtArg<'a>> {
    raw.iter()
        .map(|arg| match *arg {
            RawArg::Int(v) => FtArg::from(v),
            RawArg::UInt(v) => FtArg::from(v),
            RawArg::Char(c) => FtArg::Char(c),
            RawArg::Str(p) if p.is_null() => FtArg::Str(None),
            // SAFETY: guaranteed by the caller.
            RawArg::Str(p) => FtArg::Str(Some(unsafe { CStr::from_ptr(p) }.to_bytes())),
            RawArg::Ptr(p) => FtArg::Ptr(p),
        })
        .collect()
}

/// C `ft_printf(const char *format, ...)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ft_printf(format: *const c_char, mut args: ...) -> c_int {
    if format.is_null() {
        set_abi_errno(libc::EINVAL);
        return -1;
    }
    // SAFETY: caller passes a NUL-terminated format.
    let fmt = unsafe { CStr::from_ptr(format) }.to_bytes();
    let segments = parse_format_string(fmt);
    let raw = extract_va_args!(&segments, &mut args);
    // SAFETY: `%s` arguments are C strings owned by the caller for this call.
    let ft_args = unsafe { to_ft_args(&raw) };
    stdio_abi::ft_dprintf(libc::STDOUT_FILENO, fmt, &ft_args)
}

/// C `ft_dprintf(int fd, const char *format, ...)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ft_dprintf(fd: c_int, format: *const c_char, mut args: ...) -> c_int {
    if format.is_null() {
        set_abi_errno(libc::EINVAL);
        return -1;
    }
    // SAFETY: caller passes a NUL-terminated format.
    let fmt = unsafe { CStr::from_ptr(format) }.to_bytes();
    let segments = parse_format_string(fmt);
    let raw = extract_va_args!(&segments, &mut args);
    // SAFETY: `%s` arguments are C strings owned by the caller for this call.
    let ft_args = unsafe { to_ft_args(&raw) };
    stdio_abi::ft_dprintf(fd, fmt, &ft_args)
}
