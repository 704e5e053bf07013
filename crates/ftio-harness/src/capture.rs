//! Reference fixture capture.
//!
//! printf cases are rendered with the host `snprintf`. get_next_line has no
//! host counterpart, so its fixtures record the driver output implied by
//! each scenario's expected lines.

use std::path::{Path, PathBuf};

use ftio_core::stdio::FormatError;
use thiserror::Error;

use crate::cases::{GnlScenario, InterleaveScenario, PrintfCase};
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::gnl_driver::{render_interleave_line, render_scenario};
use crate::printf_driver::render_host;

pub const PRINTF_FAMILY: &str = "stdio/ft_printf";
pub const GNL_FAMILY: &str = "gnl/get_next_line";

/// Why capture failed.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("case {case}: {source}")]
    Format {
        case: String,
        #[source]
        source: FormatError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Render every printf case with the host and record it.
pub fn capture_printf(cases: &[PrintfCase]) -> Result<FixtureSet, CaptureError> {
    let mut set = FixtureSet::new(PRINTF_FAMILY);
    for case in cases {
        let host = render_host(case).map_err(|source| CaptureError::Format {
            case: case.name.clone(),
            source,
        })?;
        set.cases.push(FixtureCase {
            name: case.name.clone(),
            function: String::from("ft_printf"),
            reference: format!("printf-test.c {}", case.label),
            inputs: serde_json::to_value(case)?,
            expected_output: lossy(&host),
            expected_return: Some(host.len() as i64),
        });
    }
    Ok(set)
}

/// Lines a reader must produce for `content`, newline kept.
fn reference_lines(content: &str) -> Vec<&[u8]> {
    content.split_inclusive('\n').map(str::as_bytes).collect()
}

/// Driver output the interleaving scenario should produce.
#[must_use]
pub fn expected_interleave(scenario: &InterleaveScenario) -> Vec<u8> {
    let first = reference_lines(&scenario.first);
    let second = reference_lines(&scenario.second);
    let mut out = Vec::new();
    for round in 0..scenario.rounds {
        out.extend_from_slice(&render_interleave_line(1, first.get(round).copied()));
        out.extend_from_slice(&render_interleave_line(2, second.get(round).copied()));
    }
    out
}

/// Record the gnl scenarios and the interleaving scenario.
pub fn capture_gnl(
    scenarios: &[GnlScenario],
    interleave: &InterleaveScenario,
) -> Result<FixtureSet, CaptureError> {
    let mut set = FixtureSet::new(GNL_FAMILY);
    for scenario in scenarios {
        let lines: Vec<Vec<u8>> = scenario
            .expected
            .iter()
            .map(|l| l.as_bytes().to_vec())
            .collect();
        let block = render_scenario(
            scenario.number,
            &scenario.title,
            scenario.single_call,
            &lines,
        );
        set.cases.push(FixtureCase {
            name: scenario.name.clone(),
            function: String::from("get_next_line"),
            reference: format!("get-next-line-tests.c TEST {}", scenario.number),
            inputs: serde_json::to_value(scenario)?,
            expected_output: lossy(&block),
            expected_return: None,
        });
    }
    set.cases.push(FixtureCase {
        name: String::from("interleaved_fds"),
        function: String::from("get_next_line_bonus"),
        reference: String::from("get-next-line-bonus-tests.c"),
        inputs: serde_json::to_value(interleave)?,
        expected_output: lossy(&expected_interleave(interleave)),
        expected_return: None,
    });
    Ok(set)
}

/// Capture both families into `dir` as `printf.json` and `gnl.json`.
pub fn write_fixtures(
    dir: &Path,
    printf_cases: &[PrintfCase],
    gnl_scenarios: &[GnlScenario],
    interleave: &InterleaveScenario,
) -> Result<Vec<PathBuf>, CaptureError> {
    std::fs::create_dir_all(dir)?;
    let outputs = [
        ("printf.json", capture_printf(printf_cases)?),
        ("gnl.json", capture_gnl(gnl_scenarios, interleave)?),
    ];
    let mut written = Vec::with_capacity(outputs.len());
    for (file, set) in outputs {
        let path = dir.join(file);
        set.write_file(&path)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{gnl_scenarios, interleave_scenario, printf_cases};

    #[test]
    fn printf_capture_records_host_output() {
        let set = capture_printf(&printf_cases()).unwrap();
        assert_eq!(set.family, PRINTF_FAMILY);
        assert_eq!(set.cases.len(), printf_cases().len());
        let null = set.cases.iter().find(|c| c.name == "null_string").unwrap();
        assert_eq!(null.expected_output, "[TEST_4]_NULL_string:[(null)]\n");
        assert_eq!(null.expected_return, Some(30));
        assert_eq!(null.reference, "printf-test.c TEST_4");
    }

    #[test]
    fn gnl_capture_lists_expected_lines() {
        let set = capture_gnl(&gnl_scenarios(), &interleave_scenario()).unwrap();
        assert_eq!(set.cases.len(), 7);
        assert_eq!(
            set.cases[0].expected_output,
            "\nTEST 1: simple lines\n1 -> [Hello\n]\n2 -> [42\n]\n3 -> [Network\n]\n4 -> [NULL]\n"
        );
        assert_eq!(set.cases[1].reference, "get-next-line-tests.c TEST 2");
        assert_eq!(
            set.cases[1].expected_output,
            "\nTEST 2: empty file\n1 -> [(null)]\n"
        );
    }

    #[test]
    fn interleave_expectation_runs_past_eof() {
        let scenario = InterleaveScenario {
            first: String::from("A1\n"),
            second: String::from("B1\nB2\n"),
            rounds: 2,
        };
        assert_eq!(
            expected_interleave(&scenario),
            b"fd1 -> A1\n\nfd2 -> B1\n\nfd1 -> (null)\nfd2 -> B2\n\n"
        );
    }
}
