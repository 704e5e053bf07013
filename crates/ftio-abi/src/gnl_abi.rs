//! `get_next_line` over real descriptors.
//!
//! One [`LineTable`] serves the whole process. Its chunk size comes from
//! `FTIO_BUFFER_SIZE` the first time the table is touched.

use std::ffi::{c_char, c_int};
use std::ptr;
use std::sync::OnceLock;

use ftio_core::config::{BufferSize, buffer_size};
use ftio_core::gnl::{GnlError, LineTable};
use parking_lot::Mutex;

use crate::unistd_abi::{FdReader, set_abi_errno};

fn table() -> &'static Mutex<LineTable> {
    static TABLE: OnceLock<Mutex<LineTable>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(LineTable::new(buffer_size())))
}

/// Next line of `fd`, trailing `\n` included.
///
/// `Ok(None)` means end of file. Errors also set errno.
///
/// The process-wide table stays locked for the whole call, including the
/// blocking `read(2)`. A descriptor with no data ready (an idle pipe or
/// terminal) therefore stalls callers reading any other descriptor until
/// its read returns.
pub fn next_line(fd: c_int) -> Result<Option<Vec<u8>>, GnlError> {
    let result = table().lock().next_line(&mut FdReader, fd);
    if let Err(e) = &result {
        set_abi_errno(e.errno());
    }
    result
}

/// C-contract view of [`next_line`]: `None` for end of file and for errors.
#[must_use]
pub fn get_next_line_bytes(fd: c_int) -> Option<Vec<u8>> {
    next_line(fd).ok().flatten()
}

/// Drop the leftover kept for `fd`. Call before reusing a closed descriptor
/// number that was not read to the end.
pub fn release_fd(fd: c_int) -> bool {
    table().lock().release(fd)
}

/// Chunk size used for descriptors seen from now on.
pub fn set_buffer_size(size: BufferSize) {
    table().lock().set_buffer_size(size);
}

/// Current chunk size of the process-wide table.
#[must_use]
pub fn current_buffer_size() -> BufferSize {
    table().lock().buffer_size()
}

/// C `get_next_line`.
///
/// Returns a `malloc`ed, NUL-terminated line the caller must `free`, or NULL
/// at end of file and on error.
#[unsafe(no_mangle)]
pub extern "C" fn get_next_line(fd: c_int) -> *mut c_char {
    let Some(line) = get_next_line_bytes(fd) else {
        return ptr::null_mut();
    };
    // SAFETY: plain allocation; null is checked below.
    let out = unsafe { libc::malloc(line.len() + 1) }.cast::<u8>();
    if out.is_null() {
        set_abi_errno(libc::ENOMEM);
        return ptr::null_mut();
    }
    // SAFETY: `out` holds `line.len() + 1` bytes and does not alias `line`.
    unsafe {
        ptr::copy_nonoverlapping(line.as_ptr(), out, line.len());
        *out.add(line.len()) = 0;
    }
    out.cast()
}

/// Forget the leftover kept for `fd`.
#[unsafe(no_mangle)]
pub extern "C" fn gnl_release(fd: c_int) {
    release_fd(fd);
}
