//! Diff rendering for fixture comparison.

/// Render a line diff between expected and actual output.
///
/// Control bytes are escaped so that NULs and trailing newlines show up.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let exp: Vec<&str> = expected.split_inclusive('\n').collect();
    let act: Vec<&str> = actual.split_inclusive('\n').collect();

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    for i in 0..exp.len().max(act.len()) {
        let (e, a) = (exp.get(i), act.get(i));
        if e == a {
            continue;
        }
        out.push_str(&format!("@@ line {} @@\n", i + 1));
        if let Some(e) = e {
            out.push_str(&format!("-{}\n", e.escape_debug()));
        }
        if let Some(a) = a {
            out.push_str(&format!("+{}\n", a.escape_debug()));
        }
    }
    out
}
