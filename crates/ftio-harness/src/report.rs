//! Report generation for conformance results.

use serde::{Deserialize, Serialize};

use crate::verify::VerificationSummary;

/// A conformance report over one verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Line reader chunk size the run used.
    pub buffer_size: usize,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- BUFFER_SIZE: {}\n", self.buffer_size));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Case | Reference | Status |\n");
        out.push_str("|------|-----------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("| {} | {} | {} |\n", r.case_name, r.reference, status));
        }

        let failures: Vec<_> = self.summary.failures().collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {}\n\n```diff\n", r.case_name));
                out.push_str(r.diff.as_deref().unwrap_or("[no diff]"));
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VerificationResult;

    fn report(passed: bool) -> ConformanceReport {
        ConformanceReport {
            title: String::from("ftio Conformance Report"),
            buffer_size: 42,
            timestamp: String::from("2026-10-16T00:00:00.000Z"),
            summary: VerificationSummary::from_results(vec![VerificationResult {
                case_name: String::from("char"),
                reference: String::from("printf-test.c TEST_2"),
                passed,
                expected: String::from("[A]"),
                actual: String::from(if passed { "[A]" } else { "[B]" }),
                diff: (!passed).then(|| crate::diff::render_diff("[A]", "[B]")),
            }]),
        }
    }

    #[test]
    fn markdown_lists_cases() {
        let md = report(true).to_markdown();
        assert!(md.starts_with("# ftio Conformance Report\n"));
        assert!(md.contains("- BUFFER_SIZE: 42\n"));
        assert!(md.contains("| char | printf-test.c TEST_2 | PASS |"));
        assert!(!md.contains("## Failures"));
    }

    #[test]
    fn markdown_includes_failure_diffs() {
        let md = report(false).to_markdown();
        assert!(md.contains("| FAIL |"));
        assert!(md.contains("### char\n\n```diff\n--- expected\n"));
    }

    #[test]
    fn json_round_trips() {
        let json = report(true).to_json();
        let back: ConformanceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.total, 1);
        assert_eq!(back.buffer_size, 42);
    }
}
