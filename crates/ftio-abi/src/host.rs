//! Reference rendering through the host C library.
//!
//! Each directive is handed to `snprintf` on its own, with one argument of
//! the C type that conversion expects. Literal text is copied unchanged.
//! The result is what the system `printf` would have written for the same
//! call, which is what the conformance harness compares `ft_format` to.

use std::ffi::{c_char, c_int, c_uint, c_void};
use std::ptr;

use ftio_core::stdio::{
    BoundArg, FormatError, FormatSegment, FtArg, bind_arg, parse_format_string,
};

/// Render `fmt` with `args` using the host `snprintf`.
///
/// Arguments are bound with the same rules as [`ftio_core::ft_format`], so
/// both sides see identical values and raise identical errors.
pub fn host_format(fmt: &[u8], args: &[FtArg<'_>]) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::with_capacity(fmt.len() + 16);
    let mut next = args.iter().enumerate();

    for seg in parse_format_string(fmt) {
        match seg {
            FormatSegment::Literal(lit) => out.extend_from_slice(lit),
            FormatSegment::Percent => out.push(b'%'),
            FormatSegment::Spec(spec) => {
                let (index, arg) = next.next().ok_or(FormatError::MissingArgument {
                    index: args.len(),
                    conversion: char::from(spec.conversion),
                })?;
                let bound = bind_arg(&spec, index, *arg)?;
                let mut directive = Vec::with_capacity(16);
                directive.push(b'%');
                directive.extend_from_slice(&spec.to_directive());
                directive.push(0);
                snprintf_one(&directive, bound, &mut out);
            }
        }
    }
    Ok(out)
}

/// Append the output of `snprintf(directive, arg)` to `out`.
///
/// `directive` must be NUL-terminated and contain exactly one conversion.
fn snprintf_one(directive: &[u8], arg: BoundArg<'_>, out: &mut Vec<u8>) {
    let fmt = directive.as_ptr().cast::<c_char>();
    // C strings stop at the first NUL.
    let c_string = match arg {
        BoundArg::Str(Some(s)) => {
            let end = s.iter().position(|&b| b == 0).unwrap_or(s.len());
            let mut owned = Vec::with_capacity(end + 1);
            owned.extend_from_slice(&s[..end]);
            owned.push(0);
            Some(owned)
        }
        _ => None,
    };
    let str_ptr = c_string
        .as_ref()
        .map_or(ptr::null(), |s| s.as_ptr().cast::<c_char>());

    let call = |dst: *mut c_char, len: usize| -> c_int {
        // SAFETY: `fmt` is NUL-terminated with one conversion, the argument
        // has the C type that conversion reads, and `dst` holds `len` bytes.
        unsafe {
            match arg {
                BoundArg::Signed(v) => libc::snprintf(dst, len, fmt, v as c_int),
                BoundArg::Unsigned(v) => libc::snprintf(dst, len, fmt, v as c_uint),
                BoundArg::Char(c) => libc::snprintf(dst, len, fmt, c_int::from(c)),
                BoundArg::Str(_) => libc::snprintf(dst, len, fmt, str_ptr),
                BoundArg::Ptr(p) => libc::snprintf(dst, len, fmt, p as *const c_void),
            }
        }
    };

    let Ok(needed) = usize::try_from(call(ptr::null_mut(), 0)) else {
        return;
    };
    let start = out.len();
    out.resize(start + needed + 1, 0);
    let written = call(out[start..].as_mut_ptr().cast(), needed + 1);
    out.truncate(start + usize::try_from(written).unwrap_or(0).min(needed));
}
