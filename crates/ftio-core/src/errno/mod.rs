//! Error number definitions.
//!
//! Thread-local errno storage plus the constants the line reader and the
//! fd boundary report.

use std::cell::Cell;

thread_local! {
    static ERRNO: Cell<i32> = const { Cell::new(0) };
}

pub const EINTR: i32 = 4;
pub const EIO: i32 = 5;
pub const EBADF: i32 = 9;
pub const EAGAIN: i32 = 11;
pub const EINVAL: i32 = 22;

/// Returns the current thread-local errno value.
///
/// Equivalent to reading C `errno`.
pub fn get_errno() -> i32 {
    ERRNO.get()
}

/// Sets the current thread-local errno value.
///
/// Equivalent to assigning to C `errno`.
pub fn set_errno(value: i32) {
    ERRNO.set(value);
}

/// Short symbolic name for an errno value, used in error messages.
#[must_use]
pub fn errno_name(value: i32) -> &'static str {
    match value {
        EINTR => "EINTR",
        EIO => "EIO",
        EBADF => "EBADF",
        EAGAIN => "EAGAIN",
        EINVAL => "EINVAL",
        _ => "E?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_is_thread_local() {
        set_errno(EBADF);
        let other = std::thread::spawn(get_errno).join().unwrap();
        assert_eq!(other, 0);
        assert_eq!(get_errno(), EBADF);
        set_errno(0);
    }

    #[test]
    fn names_known_values() {
        assert_eq!(errno_name(EIO), "EIO");
        assert_eq!(errno_name(9999), "E?");
    }
}
