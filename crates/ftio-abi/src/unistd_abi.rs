//! Raw `read(2)`/`write(2)` on descriptors.
//!
//! Failures set both the core errno and the host `errno`, then return the
//! errno value as the error.

use std::ffi::{c_int, c_void};

use ftio_core::errno;
use ftio_core::gnl::FdSource;

pub(crate) fn set_abi_errno(val: c_int) {
    errno::set_errno(val);
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        // SAFETY: __errno_location returns the calling thread's errno slot.
        unsafe { *libc::__errno_location() = val };
    }
}

fn last_os_errno() -> c_int {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(errno::EIO)
}

/// `read(2)` into `buf`. Returns the byte count, `0` at end of file.
pub fn sys_read_fd(fd: c_int, buf: &mut [u8]) -> Result<usize, c_int> {
    // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
    let rc = unsafe { libc::read(fd, buf.as_mut_ptr().cast::<c_void>(), buf.len()) };
    if rc < 0 {
        let e = last_os_errno();
        set_abi_errno(e);
        return Err(e);
    }
    Ok(rc as usize)
}

/// `write(2)` from `buf`. May write fewer bytes than requested.
pub fn sys_write_fd(fd: c_int, buf: &[u8]) -> Result<usize, c_int> {
    // SAFETY: `buf` is valid for reads of `buf.len()` bytes.
    let rc = unsafe { libc::write(fd, buf.as_ptr().cast::<c_void>(), buf.len()) };
    if rc < 0 {
        let e = last_os_errno();
        set_abi_errno(e);
        return Err(e);
    }
    Ok(rc as usize)
}

/// Write all of `data`, retrying short writes and `EINTR`.
pub fn write_all_fd(fd: c_int, data: &[u8]) -> Result<usize, c_int> {
    let mut written = 0;
    while written < data.len() {
        match sys_write_fd(fd, &data[written..]) {
            Ok(0) => {
                set_abi_errno(errno::EIO);
                return Err(errno::EIO);
            }
            Ok(n) => written += n,
            Err(errno::EINTR) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}

/// [`FdSource`] over real descriptors.
#[derive(Debug, Default, Clone, Copy)]
pub struct FdReader;

impl FdSource for FdReader {
    fn read_fd(&mut self, fd: i32, buf: &mut [u8]) -> Result<usize, i32> {
        sys_read_fd(fd, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe() -> (c_int, c_int) {
        let mut fds = [0 as c_int; 2];
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0);
        (fds[0], fds[1])
    }

    fn close(fd: c_int) {
        unsafe { libc::close(fd) };
    }

    #[test]
    fn write_then_read_through_pipe() {
        let (r, w) = pipe();
        assert_eq!(write_all_fd(w, b"hello\n"), Ok(6));
        close(w);

        let mut buf = [0u8; 16];
        let n = sys_read_fd(r, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello\n");
        assert_eq!(sys_read_fd(r, &mut buf), Ok(0));
        close(r);
    }

    #[test]
    fn bad_descriptor_sets_errno() {
        let mut buf = [0u8; 4];
        assert_eq!(sys_read_fd(-1, &mut buf), Err(libc::EBADF));
        assert_eq!(errno::get_errno(), libc::EBADF);
        assert_eq!(sys_write_fd(-1, b"x"), Err(libc::EBADF));
    }

    #[test]
    fn fd_reader_is_an_fd_source() {
        let (r, w) = pipe();
        write_all_fd(w, b"abc").unwrap();
        close(w);
        let mut reader = FdReader;
        let mut buf = [0u8; 2];
        assert_eq!(reader.read_fd(r, &mut buf), Ok(2));
        assert_eq!(&buf, b"ab");
        close(r);
    }
}
