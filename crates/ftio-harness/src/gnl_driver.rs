//! get_next_line driver output.
//!
//! Reproduces what the C drivers print, byte for byte. Lines keep their
//! newline inside the brackets. Listings end with a literal `[NULL]` row,
//! while lines passed straight to `%s` print glibc's `(null)`.

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;
use std::path::Path;

use ftio_core::config::BufferSize;
use ftio_core::gnl::{GnlError, LineReader, MemorySource};

const MEMORY_FD: i32 = 3;

/// `"{i} -> [{line}]\n"` per line, then `"{n} -> [NULL]\n"`.
#[must_use]
pub fn render_listing(lines: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        out.extend_from_slice(format!("{} -> [", i + 1).as_bytes());
        out.extend_from_slice(line);
        out.extend_from_slice(b"]\n");
    }
    out.extend_from_slice(format!("{} -> [NULL]\n", lines.len() + 1).as_bytes());
    out
}

/// `"1 -> [{line}]\n"` for a single call whose result goes straight to `%s`.
#[must_use]
pub fn render_first_call(line: Option<&[u8]>) -> Vec<u8> {
    let mut out = b"1 -> [".to_vec();
    out.extend_from_slice(line.unwrap_or(b"(null)"));
    out.extend_from_slice(b"]\n");
    out
}

/// One titled block of the single-descriptor driver.
#[must_use]
pub fn render_test_block(number: usize, title: &str, body: &[u8]) -> Vec<u8> {
    let mut out = format!("\nTEST {number}: {title}\n").into_bytes();
    out.extend_from_slice(body);
    out
}

/// The whole `TEST n` block the single-descriptor driver prints for a file
/// that yielded `lines`.
#[must_use]
pub fn render_scenario(
    number: usize,
    title: &str,
    single_call: bool,
    lines: &[Vec<u8>],
) -> Vec<u8> {
    let body = if single_call {
        render_first_call(lines.first().map(Vec::as_slice))
    } else {
        render_listing(lines)
    };
    render_test_block(number, title, &body)
}

/// Lines read from a descriptor, and the errno that ended the read if it
/// stopped on an error rather than at end of file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Drained {
    pub lines: Vec<Vec<u8>>,
    pub errno: Option<i32>,
}

/// Every line of `fd` until `get_next_line` returns `NULL`.
///
/// The descriptor's leftover is released afterwards, so the caller may close
/// it even if reading stopped on an error.
#[must_use]
pub fn drain_fd(fd: i32) -> Drained {
    let mut drained = Drained::default();
    loop {
        match ftio_abi::next_line(fd) {
            Ok(Some(line)) => drained.lines.push(line),
            Ok(None) => break,
            Err(e) => {
                drained.errno = Some(e.errno());
                break;
            }
        }
    }
    ftio_abi::release_fd(fd);
    drained
}

/// Open `path` and read it to the end through the descriptor table.
pub fn run_file(path: &Path) -> io::Result<Vec<Vec<u8>>> {
    Ok(run_file_checked(path)?.lines)
}

/// [`run_file`], keeping the errno of a failed read.
pub fn run_file_checked(path: &Path) -> io::Result<Drained> {
    let file = File::open(path)?;
    Ok(drain_fd(file.as_raw_fd()))
}

/// Read `content` to the end through an in-memory descriptor.
pub fn run_memory(content: &[u8], buffer_size: BufferSize) -> Result<Vec<Vec<u8>>, GnlError> {
    let mut src = MemorySource::new();
    src.insert(MEMORY_FD, content.to_vec());
    let mut reader = LineReader::new(buffer_size);
    let mut lines = Vec::new();
    while let Some(line) = reader.next_line(&mut src, MEMORY_FD)? {
        lines.push(line);
    }
    Ok(lines)
}

/// `"fd{n} -> {line}\n"`, with `(null)` for a `NULL` line.
#[must_use]
pub fn render_interleave_line(which: usize, line: Option<&[u8]>) -> Vec<u8> {
    let mut out = format!("fd{which} -> ").into_bytes();
    out.extend_from_slice(line.unwrap_or(b"(null)"));
    out.push(b'\n');
    out
}

/// Alternate `rounds` reads between two open descriptors.
#[must_use]
pub fn interleave_fds(fd1: i32, fd2: i32, rounds: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for _ in 0..rounds {
        for (which, fd) in [(1, fd1), (2, fd2)] {
            let line = ftio_abi::get_next_line_bytes(fd);
            out.extend_from_slice(&render_interleave_line(which, line.as_deref()));
        }
    }
    ftio_abi::release_fd(fd1);
    ftio_abi::release_fd(fd2);
    out
}

/// Open both files and alternate `rounds` reads between them.
pub fn run_interleaved(first: &Path, second: &Path, rounds: usize) -> io::Result<Vec<u8>> {
    let a = File::open(first)?;
    let b = File::open(second)?;
    Ok(interleave_fds(a.as_raw_fd(), b.as_raw_fd(), rounds))
}

/// Same alternation over in-memory contents.
pub fn interleave_memory(
    first: &[u8],
    second: &[u8],
    rounds: usize,
    buffer_size: BufferSize,
) -> Result<Vec<u8>, GnlError> {
    let mut src = MemorySource::new();
    src.insert(MEMORY_FD, first.to_vec());
    src.insert(MEMORY_FD + 1, second.to_vec());
    let mut table = ftio_core::LineTable::new(buffer_size);
    let mut out = Vec::new();
    for _ in 0..rounds {
        for (which, fd) in [(1, MEMORY_FD), (2, MEMORY_FD + 1)] {
            let line = table.next_line(&mut src, fd)?;
            out.extend_from_slice(&render_interleave_line(which, line.as_deref()));
        }
    }
    Ok(out)
}
