//! ft_printf against the host printf, case by case.

use ftio_core::stdio::{FormatError, FtArg, ft_format};

use crate::cases::{CaseArg, PrintfCase};

/// Both renderings of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub name: String,
    pub label: String,
    pub ft: Vec<u8>,
    pub host: Vec<u8>,
}

impl CaseOutcome {
    /// Byte count `ft_printf` would return.
    #[must_use]
    pub fn ft_return(&self) -> usize {
        self.ft.len()
    }

    /// Byte count `printf` would return.
    #[must_use]
    pub fn host_return(&self) -> usize {
        self.host.len()
    }

    #[must_use]
    pub fn matches(&self) -> bool {
        self.ft == self.host
    }

    /// The driver's output for this case: both renderings, then the return
    /// values and a blank line.
    #[must_use]
    pub fn transcript(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.ft.len() + self.host.len() + 40);
        out.extend_from_slice(&self.ft);
        out.extend_from_slice(&self.host);
        out.extend_from_slice(
            format!(
                "return -> ft:{} | printf:{}\n\n",
                self.ft_return(),
                self.host_return()
            )
            .as_bytes(),
        );
        out
    }
}

/// Turn case arguments into `FtArg`s. `local` is what `LocalAddr` points to.
#[must_use]
pub fn bind_case_args<'a>(args: &'a [CaseArg], local: &i32) -> Vec<FtArg<'a>> {
    args.iter()
        .map(|arg| match arg {
            CaseArg::Char(c) => FtArg::Char(*c),
            CaseArg::Str(s) => FtArg::Str(s.as_deref().map(str::as_bytes)),
            CaseArg::Int(v) => FtArg::from(*v),
            CaseArg::UInt(v) => FtArg::from(*v),
            CaseArg::Ptr(p) => FtArg::Ptr(*p),
            CaseArg::LocalAddr => FtArg::from(local as *const i32),
        })
        .collect()
}

/// Render `case` with `ft_format` only.
pub fn render_ft(case: &PrintfCase) -> Result<Vec<u8>, FormatError> {
    let x = 42;
    let args = bind_case_args(&case.args, &x);
    ft_format(case.format.as_bytes(), &args)
}

/// Render `case` with the host `snprintf` only.
pub fn render_host(case: &PrintfCase) -> Result<Vec<u8>, FormatError> {
    let x = 42;
    let args = bind_case_args(&case.args, &x);
    ftio_abi::host_format(case.format.as_bytes(), &args)
}

/// Render `case` both ways with the same arguments.
pub fn run_case(case: &PrintfCase) -> Result<CaseOutcome, FormatError> {
    let x = 42;
    let args = bind_case_args(&case.args, &x);
    let fmt = case.format.as_bytes();
    Ok(CaseOutcome {
        name: case.name.clone(),
        label: case.label.clone(),
        ft: ft_format(fmt, &args)?,
        host: ftio_abi::host_format(fmt, &args)?,
    })
}

/// Run every case, stopping at the first one whose arguments do not fit.
pub fn run_all(cases: &[PrintfCase]) -> Result<Vec<CaseOutcome>, FormatError> {
    cases.iter().map(run_case).collect()
}

/// Concatenated transcript of `outcomes`.
#[must_use]
pub fn transcript(outcomes: &[CaseOutcome]) -> Vec<u8> {
    outcomes.iter().flat_map(CaseOutcome::transcript).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::printf_cases;

    fn case(name: &str) -> PrintfCase {
        printf_cases()
            .into_iter()
            .find(|c| c.name == name)
            .unwrap()
    }

    #[test]
    fn every_case_matches_the_host() {
        for outcome in run_all(&printf_cases()).unwrap() {
            assert!(
                outcome.matches(),
                "{}: ft={:?} host={:?}",
                outcome.name,
                String::from_utf8_lossy(&outcome.ft),
                String::from_utf8_lossy(&outcome.host)
            );
        }
    }

    #[test]
    fn transcript_repeats_output_and_returns() {
        let outcome = run_case(&case("char")).unwrap();
        assert_eq!(
            outcome.transcript(),
            b"[TEST_2]_Char:[A]\n[TEST_2]_Char:[A]\nreturn -> ft:18 | printf:18\n\n"
        );
    }

    #[test]
    fn nul_char_counts_one_byte() {
        let outcome = run_case(&case("nul_char")).unwrap();
        assert_eq!(outcome.ft, b"[Char_NUL:[\0]]\n");
        assert_eq!(outcome.ft_return(), 15);
        assert_eq!(outcome.host_return(), 15);
    }

    #[test]
    fn null_arguments_render_placeholders() {
        assert_eq!(
            render_ft(&case("null_string")).unwrap(),
            b"[TEST_4]_NULL_string:[(null)]\n"
        );
        assert_eq!(render_ft(&case("zero_pointer")).unwrap(), b"[Ptr_0:[(nil)]]\n");
    }

    #[test]
    fn limits_render_in_full() {
        assert_eq!(
            render_ft(&case("int_min")).unwrap(),
            b"[TEST_7]_INT_MIN:[-2147483648]\n"
        );
        assert_eq!(
            render_ft(&case("uint_max")).unwrap(),
            b"[TEST_9]_UINT_MAX:[4294967295]\n"
        );
    }
}
