//! `ft_printf` writing to descriptors.
//!
//! Output is rendered completely before anything is written, so a format
//! error never produces partial output.

use std::ffi::c_int;

use ftio_core::errno;
use ftio_core::stdio::{FtArg, ft_format};

use crate::unistd_abi::{set_abi_errno, write_all_fd};

/// Render `fmt` with `args` and write it to `fd`.
///
/// Returns the number of bytes written, or `-1` with errno set when the
/// arguments do not fit the format (`EINVAL`), the write fails, or the count
/// does not fit an `int` (`EOVERFLOW`).
pub fn ft_dprintf(fd: c_int, fmt: &[u8], args: &[FtArg<'_>]) -> c_int {
    let rendered = match ft_format(fmt, args) {
        Ok(bytes) => bytes,
        Err(_) => {
            set_abi_errno(errno::EINVAL);
            return -1;
        }
    };
    let Ok(count) = c_int::try_from(rendered.len()) else {
        set_abi_errno(libc::EOVERFLOW);
        return -1;
    };
    match write_all_fd(fd, &rendered) {
        Ok(_) => count,
        Err(_) => -1,
    }
}

/// [`ft_dprintf`] to standard output.
pub fn ft_printf(fmt: &[u8], args: &[FtArg<'_>]) -> c_int {
    ft_dprintf(libc::STDOUT_FILENO, fmt, args)
}
