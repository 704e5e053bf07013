//! get_next_line against real files and pipes.

use std::fs::File;
use std::io::Write;
use std::os::fd::AsRawFd;

use ftio_abi::{get_next_line_bytes, next_line, release_fd};

fn temp_file(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn drain(content: &[u8]) -> Vec<Vec<u8>> {
    let tmp = temp_file(content);
    let file = File::open(tmp.path()).unwrap();
    let fd = file.as_raw_fd();
    let mut lines = Vec::new();
    while let Some(line) = get_next_line_bytes(fd) {
        lines.push(line);
    }
    lines
}

#[test]
fn simple_lines() {
    assert_eq!(
        drain(b"Hello\n42\nNetwork\n"),
        vec![b"Hello\n".to_vec(), b"42\n".to_vec(), b"Network\n".to_vec()]
    );
}

#[test]
fn empty_file() {
    assert!(drain(b"").is_empty());
}

#[test]
fn only_newline() {
    assert_eq!(drain(b"\n"), vec![b"\n".to_vec()]);
}

#[test]
fn no_newline_at_eof() {
    assert_eq!(
        drain(b"Hello\nWorld"),
        vec![b"Hello\n".to_vec(), b"World".to_vec()]
    );
}

#[test]
fn multiple_newlines() {
    assert_eq!(
        drain(b"a\n\n\nb\n"),
        vec![
            b"a\n".to_vec(),
            b"\n".to_vec(),
            b"\n".to_vec(),
            b"b\n".to_vec()
        ]
    );
}

#[test]
fn long_line() {
    let mut content = vec![b'L'; 100_000];
    content.push(b'\n');
    content.extend_from_slice(b"tail");
    let lines = drain(&content);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), 100_001);
    assert_eq!(lines[1], b"tail");
}

#[test]
fn interleaved_descriptors() {
    let a = temp_file(b"A1\nA2\n");
    let b = temp_file(b"B1\nB2\n");
    let fa = File::open(a.path()).unwrap();
    let fb = File::open(b.path()).unwrap();
    let (fd1, fd2) = (fa.as_raw_fd(), fb.as_raw_fd());

    assert_eq!(get_next_line_bytes(fd1).as_deref(), Some(&b"A1\n"[..]));
    assert_eq!(get_next_line_bytes(fd2).as_deref(), Some(&b"B1\n"[..]));
    assert_eq!(get_next_line_bytes(fd1).as_deref(), Some(&b"A2\n"[..]));
    assert_eq!(get_next_line_bytes(fd2).as_deref(), Some(&b"B2\n"[..]));
    assert!(get_next_line_bytes(fd1).is_none());
    assert!(get_next_line_bytes(fd2).is_none());
}

#[test]
fn negative_descriptor_is_an_error() {
    assert!(next_line(-3).is_err());
    assert!(get_next_line_bytes(-3).is_none());
    assert!(!release_fd(-3));
}

#[test]
fn release_before_close_leaves_no_state() {
    let tmp = temp_file(b"first\nsecond\n");
    let file = File::open(tmp.path()).unwrap();
    let fd = file.as_raw_fd();
    assert_eq!(get_next_line_bytes(fd).as_deref(), Some(&b"first\n"[..]));
    assert!(release_fd(fd));
    drop(file);
}
