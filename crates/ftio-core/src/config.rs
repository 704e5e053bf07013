//! Line reader buffer size configuration.
//!
//! The chunk size requested per `read(2)` is set via the `FTIO_BUFFER_SIZE`
//! environment variable, the runtime counterpart of building the C exercise
//! with `-D BUFFER_SIZE=n`:
//! - unset or invalid: [`DEFAULT_BUFFER_SIZE`] bytes.
//! - `1` up to [`MAX_BUFFER_SIZE`]: used as given.
//! - larger values are clamped to [`MAX_BUFFER_SIZE`].
//!
//! Callers that want a specific size (tests, the harness `--buffer-size`
//! flag) construct a [`BufferSize`] directly instead of going through the
//! environment.

use std::num::NonZeroUsize;
use std::sync::OnceLock;

use thiserror::Error;

/// Environment variable consulted by [`buffer_size`].
pub const BUFFER_SIZE_ENV: &str = "FTIO_BUFFER_SIZE";

pub const DEFAULT_BUFFER_SIZE: usize = 42;

/// Upper bound on a single chunk read.
pub const MAX_BUFFER_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("buffer size must be at least 1")]
    Zero,
    #[error("invalid buffer size {0:?}")]
    Invalid(String),
}

/// Number of bytes the line reader asks for per read. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferSize(NonZeroUsize);

impl BufferSize {
    /// Build from a byte count, clamping to [`MAX_BUFFER_SIZE`].
    pub fn new(bytes: usize) -> Result<Self, ConfigError> {
        let clamped = bytes.min(MAX_BUFFER_SIZE);
        NonZeroUsize::new(clamped)
            .map(Self)
            .ok_or(ConfigError::Zero)
    }

    /// Parse a decimal byte count (surrounding whitespace and `_` separators allowed).
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let cleaned = raw.trim().replace('_', "");
        // Negative sizes are a common way to probe the C version; treat them
        // the same as zero.
        if let Some(digits) = cleaned.strip_prefix('-')
            && !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ConfigError::Zero);
        }
        let bytes = cleaned
            .parse::<usize>()
            .map_err(|_| ConfigError::Invalid(raw.to_string()))?;
        Self::new(bytes)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for BufferSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_BUFFER_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl std::fmt::Display for BufferSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

static GLOBAL_BUFFER_SIZE: OnceLock<BufferSize> = OnceLock::new();

/// Get the configured buffer size (reads env var on first call, caches thereafter).
#[must_use]
pub fn buffer_size() -> BufferSize {
    *GLOBAL_BUFFER_SIZE
        .get_or_init(|| from_env_value(std::env::var(BUFFER_SIZE_ENV).ok().as_deref()))
}

/// Resolve the raw `FTIO_BUFFER_SIZE` value; unset or invalid means default.
fn from_env_value(raw: Option<&str>) -> BufferSize {
    raw.and_then(|v| BufferSize::parse(v).ok())
        .unwrap_or_default()
}
