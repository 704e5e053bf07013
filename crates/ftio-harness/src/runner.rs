//! Test execution engine.

use ftio_core::config::BufferSize;
use ftio_core::gnl::GnlError;
use ftio_core::stdio::FormatError;
use thiserror::Error;

use crate::cases::{GnlScenario, InterleaveScenario, PrintfCase};
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::verify::VerificationResult;
use crate::{diff, gnl_driver, printf_driver};

/// Why a fixture case could not be executed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("unsupported function '{0}'")]
    UnknownFunction(String),
    #[error("bad inputs: {0}")]
    Inputs(#[from] serde_json::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Gnl(#[from] GnlError),
}

/// Output of one executed case.
#[derive(Debug)]
struct Execution {
    actual: String,
    /// Expectation computed at run time, replacing the recorded one.
    expected: Option<String>,
    returned: Option<i64>,
    note: Option<String>,
}

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Chunk size for the line reader cases.
    pub buffer_size: BufferSize,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>, buffer_size: BufferSize) -> Self {
        Self {
            campaign: campaign.into(),
            buffer_size,
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| self.verify_case(case))
            .collect()
    }

    fn verify_case(&self, case: &FixtureCase) -> VerificationResult {
        match self.execute_case(case) {
            Ok(run) => {
                let expected = run.expected.unwrap_or_else(|| case.expected_output.clone());
                let output_ok = run.actual == expected;
                let return_ok = match (case.expected_return, run.returned) {
                    (Some(want), Some(got)) => want == got || run.note.is_some(),
                    _ => true,
                };

                let mut notes = Vec::new();
                if !return_ok {
                    notes.push(format!(
                        "return mismatch: expected {:?}, got {:?}",
                        case.expected_return, run.returned
                    ));
                }
                if let Some(note) = run.note {
                    notes.push(note);
                }

                let diff_out = if !output_ok {
                    Some(diff::render_diff(&expected, &run.actual))
                } else if !return_ok {
                    Some(notes.join("\n"))
                } else {
                    None
                };

                VerificationResult {
                    case_name: case.name.clone(),
                    reference: case.reference.clone(),
                    passed: output_ok && return_ok,
                    expected,
                    actual: run.actual,
                    diff: diff_out,
                }
            }
            Err(err) => {
                let actual = format!("unsupported:{err}");
                VerificationResult {
                    case_name: case.name.clone(),
                    reference: case.reference.clone(),
                    passed: false,
                    diff: Some(diff::render_diff(&case.expected_output, &actual)),
                    expected: case.expected_output.clone(),
                    actual,
                }
            }
        }
    }

    fn execute_case(&self, case: &FixtureCase) -> Result<Execution, RunError> {
        match case.function.as_str() {
            "ft_printf" => {
                let printf: PrintfCase = serde_json::from_value(case.inputs.clone())?;
                let ft = printf_driver::render_ft(&printf)?;
                let (expected, note) = if printf.is_runtime() {
                    let host = printf_driver::render_host(&printf)?;
                    (
                        Some(lossy(&host)),
                        Some(String::from("runtime address: compared against host snprintf")),
                    )
                } else {
                    (None, None)
                };
                Ok(Execution {
                    returned: Some(ft.len() as i64),
                    actual: lossy(&ft),
                    expected,
                    note,
                })
            }
            "get_next_line" => {
                let scenario: GnlScenario = serde_json::from_value(case.inputs.clone())?;
                let lines = gnl_driver::run_memory(scenario.content.as_bytes(), self.buffer_size)?;
                let block = gnl_driver::render_scenario(
                    scenario.number,
                    &scenario.title,
                    scenario.single_call,
                    &lines,
                );
                Ok(Execution {
                    actual: lossy(&block),
                    expected: None,
                    returned: None,
                    note: None,
                })
            }
            "get_next_line_bonus" => {
                let scenario: InterleaveScenario = serde_json::from_value(case.inputs.clone())?;
                let out = gnl_driver::interleave_memory(
                    scenario.first.as_bytes(),
                    scenario.second.as_bytes(),
                    scenario.rounds,
                    self.buffer_size,
                )?;
                Ok(Execution {
                    actual: lossy(&out),
                    expected: None,
                    returned: None,
                    note: None,
                })
            }
            other => Err(RunError::UnknownFunction(other.to_string())),
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
