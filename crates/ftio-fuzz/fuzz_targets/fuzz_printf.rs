#![no_main]
//! Fuzz target for the ft_printf formatter.
//!
//! The first byte splits the input into a format string and argument bytes.
//! Every directive gets an argument of the type it expects, so formatting
//! must succeed and stay within the per-directive expansion bound.

use ftio_core::stdio::{FormatSegment, FtArg, MAX_PAD, ft_format, parse_format_string};
use libfuzzer_sys::fuzz_target;

fn arg_for<'a>(conversion: u8, raw: u64, text: &'a [u8]) -> FtArg<'a> {
    match conversion {
        b'c' => FtArg::Char(raw as u8),
        b's' if raw & 1 == 0 => FtArg::Str(None),
        b's' => FtArg::Str(Some(text)),
        b'p' => FtArg::Ptr(raw as usize),
        b'd' | b'i' => FtArg::Int(raw as i64),
        _ => FtArg::UInt(raw),
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (fmt, arg_bytes) = rest.split_at(split);

    let segments = parse_format_string(fmt);
    let mut args = Vec::new();
    let mut bound = fmt.len();
    for (i, seg) in segments.iter().enumerate() {
        if let FormatSegment::Spec(spec) = seg {
            let mut word = [0u8; 8];
            for (j, b) in word.iter_mut().enumerate() {
                *b = arg_bytes.get((i * 8 + j) % arg_bytes.len().max(1)).copied().unwrap_or(0);
            }
            args.push(arg_for(spec.conversion, u64::from_le_bytes(word), arg_bytes));
            bound += 2 * MAX_PAD + arg_bytes.len() + 64;
        }
    }

    let out = ft_format(fmt, &args).expect("every directive has a matching argument");
    assert!(out.len() <= bound, "expansion {} exceeds bound {}", out.len(), bound);

    // Too few arguments must be an error, never a panic.
    if !args.is_empty() {
        assert!(ft_format(fmt, &args[..args.len() - 1]).is_err());
    }
});
