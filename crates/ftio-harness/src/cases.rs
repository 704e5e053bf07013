//! Scenario tables for the printf and get_next_line drivers.
//!
//! The printf table reproduces `printf-test.c` call for call, including the
//! second INT limit call under `TEST_7`. The gnl tables reproduce the six
//! file contents the single-descriptor driver is run against, and the two
//! files of the interleaving driver.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// printf
// ---------------------------------------------------------------------------

/// One argument of a printf scenario, in C terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseArg {
    Char(u8),
    /// `None` is a `NULL` string pointer.
    Str(Option<String>),
    Int(i32),
    UInt(u32),
    Ptr(usize),
    /// Address of a local `int`, only known at run time.
    LocalAddr,
}

impl CaseArg {
    /// Whether the rendered value depends on the running process.
    #[must_use]
    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::LocalAddr)
    }
}

/// One `ft_printf`/`printf` call pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintfCase {
    pub name: String,
    /// Driver label, e.g. `TEST_4`.
    pub label: String,
    pub format: String,
    pub args: Vec<CaseArg>,
}

impl PrintfCase {
    fn new(name: &str, label: &str, format: &str, args: Vec<CaseArg>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            format: format.to_string(),
            args,
        }
    }

    /// Whether the expected output can only be computed in-process.
    #[must_use]
    pub fn is_runtime(&self) -> bool {
        self.args.iter().any(CaseArg::is_runtime)
    }
}

fn s(v: &str) -> CaseArg {
    CaseArg::Str(Some(v.to_string()))
}

/// The printf scenarios, in driver order.
#[must_use]
pub fn printf_cases() -> Vec<PrintfCase> {
    use CaseArg::{Char, Int, LocalAddr, Ptr, Str, UInt};

    vec![
        PrintfCase::new("plain_text", "TEST_1", "[TEST_1]_Hello_World\n", vec![]),
        PrintfCase::new("char", "TEST_2", "[TEST_2]_Char:[%c]\n", vec![Char(b'A')]),
        PrintfCase::new(
            "string",
            "TEST_3",
            "[TEST_3]_String:[%s]\n",
            vec![s("Hello 42")],
        ),
        PrintfCase::new(
            "null_string",
            "TEST_4",
            "[TEST_4]_NULL_string:[%s]\n",
            vec![Str(None)],
        ),
        PrintfCase::new("int", "TEST_5", "[TEST_5]_Int:[%d]\n", vec![Int(42)]),
        PrintfCase::new(
            "negative_int",
            "TEST_6",
            "[TEST_6]_Neg_Int:[%d]\n",
            vec![Int(-42)],
        ),
        PrintfCase::new(
            "int_min",
            "TEST_7",
            "[TEST_7]_INT_MIN:[%d]\n",
            vec![Int(i32::MIN)],
        ),
        PrintfCase::new(
            "int_max",
            "TEST_7",
            "[TEST_7]_INT_MAX:[%d]\n",
            vec![Int(i32::MAX)],
        ),
        PrintfCase::new(
            "unsigned",
            "TEST_8",
            "[TEST_8]_Unsigned:[%u]\n",
            vec![Int(42)],
        ),
        PrintfCase::new(
            "uint_max",
            "TEST_9",
            "[TEST_9]_UINT_MAX:[%u]\n",
            vec![UInt(u32::MAX)],
        ),
        PrintfCase::new("hex_lower", "TEST_10", "[TEST_10]_Hex_x:[%x]\n", vec![Int(42)]),
        PrintfCase::new("hex_upper", "TEST_11", "[TEST_11]_Hex_X:[%X]\n", vec![Int(42)]),
        PrintfCase::new(
            "pointer",
            "TEST_12",
            "[TEST_12]_Pointer:[%p]\n",
            vec![LocalAddr],
        ),
        PrintfCase::new(
            "null_pointer",
            "TEST_13",
            "[TEST_13]_NULL_ptr:[%p]\n",
            vec![Ptr(0)],
        ),
        PrintfCase::new("percent", "TEST_14", "[TEST_14]_Percent:[%%]\n", vec![]),
        PrintfCase::new(
            "mixed",
            "TEST_15",
            "[TEST_15]_Mix:[%c]_[%s]_[%d]_[%u]_[%x]_[%X]_[%%]\n",
            vec![Char(b'Z'), s("Hi"), Int(-42), Int(42), Int(42), Int(42)],
        ),
        PrintfCase::new("empty_brackets", "TEST_16", "[]\n", vec![]),
        PrintfCase::new("only_newline", "TEST_17", "\n", vec![]),
        PrintfCase::new("zero_int", "TEST_18", "[Zero_d:[%d]]\n", vec![Int(0)]),
        PrintfCase::new("zero_unsigned", "TEST_19", "[Zero_u:[%u]]\n", vec![Int(0)]),
        PrintfCase::new(
            "zero_hex",
            "TEST_20",
            "[Zero_x:[%x]]_[Zero_X:[%X]]\n",
            vec![Int(0), Int(0)],
        ),
        PrintfCase::new("zero_pointer", "TEST_21", "[Ptr_0:[%p]]\n", vec![Ptr(0)]),
        PrintfCase::new(
            "arbitrary_pointer",
            "TEST_22",
            "[Ptr_val:[%p]]\n",
            vec![Ptr(0x1234)],
        ),
        PrintfCase::new("nul_char", "TEST_23", "[Char_NUL:[%c]]\n", vec![Char(0)]),
        PrintfCase::new(
            "consecutive",
            "TEST_24",
            "[%d%d%d]\n",
            vec![Int(1), Int(2), Int(3)],
        ),
        PrintfCase::new("multiple_percent", "TEST_25", "[%%%%]\n", vec![]),
        PrintfCase::new("percent_in_text", "TEST_26", "[100%%_sure]\n", vec![]),
        PrintfCase::new(
            "long_string",
            "TEST_27",
            "[Long:[%s]]\n",
            vec![s("Lorem_ipsum_dolor_sit_amet_consectetur_adipiscing_elit")],
        ),
    ]
}

// ---------------------------------------------------------------------------
// get_next_line
// ---------------------------------------------------------------------------

/// One file the single-descriptor driver reads to the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GnlScenario {
    pub name: String,
    /// `n` of the driver's `TEST n:` heading.
    #[serde(default)]
    pub number: usize,
    /// Heading printed by the driver, e.g. `simple lines`.
    pub title: String,
    /// The driver prints one call's result with `%s` instead of a listing.
    #[serde(default)]
    pub single_call: bool,
    pub content: String,
    /// Lines `get_next_line` must return, in order, before `NULL`.
    pub expected: Vec<String>,
}

impl GnlScenario {
    fn new(number: usize, name: &str, title: &str, content: String, expected: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            number,
            title: title.to_string(),
            single_call: false,
            content,
            expected: expected.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    fn single_call(mut self) -> Self {
        self.single_call = true;
        self
    }
}

/// Length of the long-line scenario's single line, newline excluded.
pub const LONG_LINE_LEN: usize = 10_000;

/// The single-descriptor scenarios, in driver order.
#[must_use]
pub fn gnl_scenarios() -> Vec<GnlScenario> {
    let long = "x".repeat(LONG_LINE_LEN);
    let long_line = format!("{long}\n");
    vec![
        GnlScenario::new(
            1,
            "simple_lines",
            "simple lines",
            "Hello\n42\nNetwork\n".to_string(),
            &["Hello\n", "42\n", "Network\n"],
        ),
        GnlScenario::new(2, "empty_file", "empty file", String::new(), &[]).single_call(),
        GnlScenario::new(3, "only_newline", "only newline", "\n".to_string(), &["\n"]),
        GnlScenario::new(
            4,
            "no_newline_at_eof",
            "no newline at EOF",
            "Hello\n42".to_string(),
            &["Hello\n", "42"],
        ),
        GnlScenario::new(
            5,
            "multiple_newlines",
            "multiple newlines",
            "\n\nA\n\n".to_string(),
            &["\n", "\n", "A\n", "\n"],
        ),
        GnlScenario::new(
            6,
            "long_line",
            "long line",
            long_line.clone(),
            &[long_line.as_str()],
        ),
    ]
}

/// Two descriptors read in alternation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterleaveScenario {
    pub first: String,
    pub second: String,
    /// Lines taken from each descriptor.
    pub rounds: usize,
}

/// `file1.txt`/`file2.txt` of the interleaving driver.
#[must_use]
pub fn interleave_scenario() -> InterleaveScenario {
    InterleaveScenario {
        first: "A1\nA2\n".to_string(),
        second: "B1\nB2\n".to_string(),
        rounds: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printf_table_follows_driver_order() {
        let cases = printf_cases();
        assert_eq!(cases.len(), 28);
        assert_eq!(cases[0].label, "TEST_1");
        assert_eq!(cases.last().map(|c| c.label.as_str()), Some("TEST_27"));
        let labels: Vec<_> = cases.iter().filter(|c| c.label == "TEST_7").collect();
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn only_the_pointer_case_is_runtime() {
        let runtime: Vec<_> = printf_cases()
            .into_iter()
            .filter(PrintfCase::is_runtime)
            .map(|c| c.name)
            .collect();
        assert_eq!(runtime, vec!["pointer".to_string()]);
    }

    #[test]
    fn gnl_scenarios_are_numbered_in_driver_order() {
        let scenarios = gnl_scenarios();
        for (i, scenario) in scenarios.iter().enumerate() {
            assert_eq!(scenario.number, i + 1);
        }
        let single: Vec<_> = scenarios.iter().filter(|s| s.single_call).collect();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].name, "empty_file");
    }

    #[test]
    fn gnl_expected_lines_rebuild_the_content() {
        for scenario in gnl_scenarios() {
            assert_eq!(scenario.expected.concat(), scenario.content, "{}", scenario.name);
        }
    }

    #[test]
    fn case_args_round_trip_through_json() {
        let case = &printf_cases()[15];
        assert_eq!(case.name, "mixed");
        let json = serde_json::to_value(case).unwrap();
        let back: PrintfCase = serde_json::from_value(json).unwrap();
        assert_eq!(&back, case);
    }
}
