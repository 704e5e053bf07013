//! printf formatting engine.
//!
//! Parses `%`-directives and renders typed values to byte buffers with
//! width/precision/flag support, for the conversion set
//! `c s p d i u x X` plus the `%%` escape.
//!
//! Reference: POSIX.1-2024 fprintf, ISO C11 7.21.6.1
//!
//! Design invariant: all formatting is bounded. Width padding and precision
//! zeros are each capped at [`MAX_PAD`] bytes, so one directive expands to at
//! most `2 * MAX_PAD + 24` bytes plus the length of a `%s` argument.

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Flags parsed from a printf format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Minimum field width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Width {
    #[default]
    None,
    Fixed(usize),
}

/// Precision: minimum digits for integers, maximum bytes for strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Precision {
    #[default]
    None,
    Fixed(usize),
}

/// A parsed printf format specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub conversion: u8,
}

impl FormatSpec {
    /// A bare `%<conversion>` with no flags, width or precision.
    #[must_use]
    pub fn plain(conversion: u8) -> Self {
        Self {
            flags: FormatFlags::default(),
            width: Width::None,
            precision: Precision::None,
            conversion,
        }
    }

    /// Re-encode the directive (without the leading `%`).
    ///
    /// Used to hand a single directive to a reference formatter.
    #[must_use]
    pub fn to_directive(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8);
        if self.flags.left_justify {
            out.push(b'-');
        }
        if self.flags.force_sign {
            out.push(b'+');
        }
        if self.flags.space_sign {
            out.push(b' ');
        }
        if self.flags.alt_form {
            out.push(b'#');
        }
        if self.flags.zero_pad {
            out.push(b'0');
        }
        if let Width::Fixed(w) = self.width {
            out.extend_from_slice(w.to_string().as_bytes());
        }
        if let Precision::Fixed(p) = self.precision {
            out.push(b'.');
            out.extend_from_slice(p.to_string().as_bytes());
        }
        out.push(self.conversion);
        out
    }
}

/// Conversions accepted by the parser.
pub const CONVERSIONS: &[u8] = b"cspdiuxX";

// ---------------------------------------------------------------------------
// Segment: parsed pieces of a format string
// ---------------------------------------------------------------------------

/// A segment of a parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment<'a> {
    /// Literal bytes to emit verbatim.
    Literal(&'a [u8]),
    /// A `%%` escape (emit a single '%').
    Percent,
    /// A conversion specifier requiring an argument.
    Spec(FormatSpec),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single format specifier starting after the '%' character.
///
/// `fmt` points to the first byte AFTER '%'. Returns `(spec, bytes_consumed)`
/// where `bytes_consumed` counts from `fmt[0]`. Returns `None` if malformed.
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    let mut pos = 0;
    let len = fmt.len();

    // --- flags ---
    let mut flags = FormatFlags::default();
    while pos < len {
        match fmt[pos] {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }
    // POSIX: '+' overrides ' '; '-' overrides '0'.
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    // --- width ---
    let start = pos;
    while pos < len && fmt[pos].is_ascii_digit() {
        pos += 1;
    }
    let width = if pos > start {
        Width::Fixed(parse_decimal(&fmt[start..pos]))
    } else {
        Width::None
    };

    // --- precision ---
    let precision = if pos < len && fmt[pos] == b'.' {
        pos += 1;
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        Precision::Fixed(parse_decimal(&fmt[start..pos]))
    } else {
        Precision::None
    };

    // --- conversion specifier ---
    let conversion = *fmt.get(pos)?;
    if !CONVERSIONS.contains(&conversion) {
        return None;
    }
    pos += 1;

    Some((
        FormatSpec {
            flags,
            width,
            precision,
            conversion,
        },
        pos,
    ))
}

/// Split a printf format string into segments.
///
/// Yields `FormatSegment::Literal` for literal runs and `FormatSegment::Spec`
/// for each `%`-directive. `%%` yields `FormatSegment::Percent`. A trailing
/// `%` and the `%` of a malformed directive are kept as literal bytes.
pub fn parse_format_string(fmt: &[u8]) -> Vec<FormatSegment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let len = fmt.len();

    while pos < len {
        let start = pos;
        pos = memchr::memchr(b'%', &fmt[pos..]).map_or(len, |off| pos + off);
        if pos > start {
            segments.push(FormatSegment::Literal(&fmt[start..pos]));
        }
        if pos >= len {
            break;
        }
        // Skip the '%'.
        pos += 1;
        if pos >= len {
            segments.push(FormatSegment::Literal(&fmt[pos - 1..pos]));
            break;
        }
        if fmt[pos] == b'%' {
            segments.push(FormatSegment::Percent);
            pos += 1;
            continue;
        }
        if let Some((spec, consumed)) = parse_format_spec(&fmt[pos..]) {
            pos += consumed;
            segments.push(FormatSegment::Spec(spec));
        } else {
            segments.push(FormatSegment::Literal(&fmt[pos - 1..pos]));
        }
    }
    segments
}


// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Render a signed integer (`%d`, `%i`) to `buf` according to `spec`.
pub fn format_signed(value: i64, spec: &FormatSpec, buf: &mut Vec<u8>) {
    let negative = value < 0;
    let sign = if negative {
        Some(b'-')
    } else if spec.flags.force_sign {
        Some(b'+')
    } else if spec.flags.space_sign {
        Some(b' ')
    } else {
        None
    };
    emit_integer(value.unsigned_abs(), 10, false, sign, b"", spec, buf);
}

/// Render an unsigned integer (`%u`, `%x`, `%X`) to `buf` according to `spec`.
pub fn format_unsigned(value: u64, spec: &FormatSpec, buf: &mut Vec<u8>) {
    let (base, uppercase) = int_base(spec.conversion);
    let prefix: &[u8] = if value != 0 && spec.flags.alt_form {
        match spec.conversion {
            b'x' => b"0x",
            b'X' => b"0X",
            _ => b"",
        }
    } else {
        b""
    };
    emit_integer(value, base, uppercase, None, prefix, spec, buf);
}

/// Render a string argument to `buf` according to `spec`.
///
/// `s` is read as a C string: output stops at the first NUL. Precision
/// truncates further if set.
pub fn format_str(s: &[u8], spec: &FormatSpec, buf: &mut Vec<u8>) {
    let s = memchr::memchr(0, s).map_or(s, |nul| &s[..nul]);
    let max_len = match spec.precision {
        Precision::Fixed(p) => p,
        Precision::None => s.len(),
    };
    let effective = &s[..s.len().min(max_len)];
    emit_padded(effective, spec, buf);
}

/// Render a character to `buf` according to `spec`.
///
/// A NUL byte is emitted like any other byte.
pub fn format_char(c: u8, spec: &FormatSpec, buf: &mut Vec<u8>) {
    emit_padded(&[c], spec, buf);
}

/// Render a pointer to `buf`, or `(nil)` for null.
///
/// A non-null address renders like `%#x` on the full address, and honours
/// the sign, zero and precision flags the same way.
pub fn format_pointer(addr: usize, spec: &FormatSpec, buf: &mut Vec<u8>) {
    if addr == 0 {
        emit_padded(b"(nil)", spec, buf);
        return;
    }
    let sign = if spec.flags.force_sign {
        Some(b'+')
    } else if spec.flags.space_sign {
        Some(b' ')
    } else {
        None
    };
    emit_integer(addr as u64, 16, false, sign, b"0x", spec, buf);
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Maximum pad bytes emitted for one directive's width, and separately for
/// its precision zeros.
pub const MAX_PAD: usize = 4096;

fn parse_decimal(digits: &[u8]) -> usize {
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add((d - b'0') as usize);
    }
    result
}

fn resolve_width(spec: &FormatSpec) -> usize {
    match spec.width {
        Width::Fixed(w) => w,
        Width::None => 0,
    }
}

fn int_base(conversion: u8) -> (u64, bool) {
    match conversion {
        b'x' => (16, false),
        b'X' => (16, true),
        _ => (10, false),
    }
}

/// Render `value` in the given `base` into the END of `buf`.
/// Returns the number of digits written. Digits are placed right-aligned.
fn render_digits(mut value: u64, base: u64, uppercase: bool, buf: &mut [u8; 64]) -> usize {
    if value == 0 {
        buf[63] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = 64;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    64 - pos
}

/// Shared integer layout: `[pad][sign][prefix][zero pad][precision zeros][digits][pad]`.
fn emit_integer(
    magnitude: u64,
    base: u64,
    uppercase: bool,
    sign: Option<u8>,
    prefix: &[u8],
    spec: &FormatSpec,
    buf: &mut Vec<u8>,
) {
    let mut digits = [0u8; 64];
    let digit_count = render_digits(magnitude, base, uppercase, &mut digits);
    let digit_slice = &digits[64 - digit_count..];

    // Explicit precision 0 with value 0: no digits emitted.
    let suppress_zero = magnitude == 0 && matches!(spec.precision, Precision::Fixed(0));
    let shown_digits = if suppress_zero { 0 } else { digit_count };

    let min_digits = match spec.precision {
        Precision::Fixed(p) => p,
        Precision::None => 1,
    };
    let zero_prefix_count = if suppress_zero {
        0
    } else {
        min_digits.saturating_sub(digit_count)
    };

    let content_len = sign.is_some() as usize + prefix.len() + zero_prefix_count + shown_digits;
    let pad_total = resolve_width(spec).saturating_sub(content_len);

    // C11 7.21.6.1p6: with a precision, the '0' flag is ignored for integers.
    let zero_fill = spec.flags.zero_pad
        && !spec.flags.left_justify
        && matches!(spec.precision, Precision::None);

    if !spec.flags.left_justify && !zero_fill {
        pad(buf, b' ', pad_total);
    }
    if let Some(s) = sign {
        buf.push(s);
    }
    buf.extend_from_slice(prefix);
    if zero_fill {
        pad(buf, b'0', pad_total);
    }
    pad(buf, b'0', zero_prefix_count);
    if !suppress_zero {
        buf.extend_from_slice(digit_slice);
    }
    if spec.flags.left_justify {
        pad(buf, b' ', pad_total);
    }
}

/// Space-padded layout used by `%c`, `%s` and `%p`.
fn emit_padded(body: &[u8], spec: &FormatSpec, buf: &mut Vec<u8>) {
    let pad_total = resolve_width(spec).saturating_sub(body.len());
    if !spec.flags.left_justify {
        pad(buf, b' ', pad_total);
    }
    buf.extend_from_slice(body);
    if spec.flags.left_justify {
        pad(buf, b' ', pad_total);
    }
}

fn pad(buf: &mut Vec<u8>, byte: u8, count: usize) {
    let count = count.min(MAX_PAD);
    buf.resize(buf.len() + count, byte);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
