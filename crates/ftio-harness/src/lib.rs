//! Conformance harness for ftio.
//!
//! This crate provides:
//! - Drivers that print exactly what the C test programs print, for
//!   `get_next_line` (single descriptor and interleaved) and `ft_printf`
//! - Fixture capture: record the reference output as JSON
//! - Fixture verify: replay fixtures against the implementation
//! - Report generation and JSONL run logs

#![forbid(unsafe_code)]

pub mod capture;
pub mod cases;
pub mod diff;
pub mod fixtures;
pub mod gnl_driver;
pub mod printf_driver;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
