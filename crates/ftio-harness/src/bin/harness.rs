//! CLI entrypoint for the ftio conformance harness.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use ftio_core::config::BufferSize;
use ftio_harness::structured_log::{
    LogEmitter, LogEntry, LogLevel, Outcome, utc_timestamp, validate_log_file,
};
use ftio_harness::verify::VerificationSummary;
use ftio_harness::{ConformanceReport, FixtureSet, TestRunner, capture, cases};
use ftio_harness::{gnl_driver, printf_driver};

/// Drivers and conformance checks for get_next_line and ft_printf.
#[derive(Debug, Parser)]
#[command(name = "ftio-harness")]
#[command(about = "Conformance harness for get_next_line and ft_printf")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read one file to the end and print every line.
    Gnl {
        /// File to read.
        #[arg(long)]
        file: PathBuf,
        /// Bytes per read (defaults to FTIO_BUFFER_SIZE, then 42).
        #[arg(long, value_parser = parse_buffer_size)]
        buffer_size: Option<BufferSize>,
        /// Print the driver's `TEST n: title` block instead of a bare listing.
        #[arg(long)]
        test: Option<usize>,
        /// Heading for `--test`.
        #[arg(long, requires = "test", default_value = "")]
        title: String,
        /// Print only the first call's result, as the empty-file test does.
        #[arg(long, requires = "test")]
        single_call: bool,
        /// JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Alternate reads between two files.
    GnlBonus {
        #[arg(long)]
        first: PathBuf,
        #[arg(long)]
        second: PathBuf,
        /// Lines read from each file.
        #[arg(long, default_value_t = 2)]
        rounds: usize,
        #[arg(long, value_parser = parse_buffer_size)]
        buffer_size: Option<BufferSize>,
    },
    /// Run the printf cases against the host printf and print both outputs.
    Printf {
        /// JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Capture reference fixtures.
    Capture {
        /// Output directory for fixture JSON files.
        #[arg(long)]
        output: PathBuf,
    },
    /// Verify the implementation against captured fixtures.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Output report path (JSON).
        #[arg(long)]
        json: Option<PathBuf>,
        /// JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
        #[arg(long, value_parser = parse_buffer_size)]
        buffer_size: Option<BufferSize>,
    },
    /// Check a JSONL log written by `printf`, `gnl` or `verify`.
    ValidateLog {
        /// JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn parse_buffer_size(raw: &str) -> Result<BufferSize, String> {
    BufferSize::parse(raw).map_err(|e| e.to_string())
}

fn run_id() -> String {
    format!("run-{}", std::process::id())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Gnl {
            file,
            buffer_size,
            test,
            title,
            single_call,
            log,
        } => {
            if let Some(size) = buffer_size {
                ftio_abi::gnl_abi::set_buffer_size(size);
            }
            eprintln!(
                "Reading {} with BUFFER_SIZE={}",
                file.display(),
                ftio_abi::gnl_abi::current_buffer_size()
            );
            let drained = gnl_driver::run_file_checked(&file)?;
            if let Some(path) = &log {
                let mut emitter = LogEmitter::to_file(path, "gnl", &run_id())?;
                let size = ftio_abi::gnl_abi::current_buffer_size();
                let mut entry = LogEntry::new("", LogLevel::Info, "file_read")
                    .with_function("get_next_line")
                    .with_buffer_size(size.get())
                    .with_bytes(drained.lines.iter().map(Vec::len).sum())
                    .with_outcome(Outcome::from_passed(drained.errno.is_none()))
                    .with_details(serde_json::json!({
                        "path": file.display().to_string(),
                        "lines": drained.lines.len(),
                    }));
                if let Some(errno) = drained.errno {
                    entry = entry.with_errno(errno);
                    entry.level = LogLevel::Error;
                }
                emitter.emit_entry(entry)?;
                emitter.flush()?;
            }
            if let Some(errno) = drained.errno {
                eprintln!("Read stopped on errno {errno}");
            }
            let lines = drained.lines;
            let mut out = std::io::stdout().lock();
            let rendered = match test {
                Some(number) => gnl_driver::render_scenario(number, &title, single_call, &lines),
                None => gnl_driver::render_listing(&lines),
            };
            out.write_all(&rendered)?;
            out.flush()?;
        }
        Command::GnlBonus {
            first,
            second,
            rounds,
            buffer_size,
        } => {
            if let Some(size) = buffer_size {
                ftio_abi::gnl_abi::set_buffer_size(size);
            }
            let output = gnl_driver::run_interleaved(&first, &second, rounds)?;
            let mut out = std::io::stdout().lock();
            out.write_all(&output)?;
            out.flush()?;
        }
        Command::Printf { log } => {
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, "printf", &run_id())?),
                None => None,
            };
            if let Some(emitter) = emitter.as_mut() {
                emitter.emit(LogLevel::Info, "run_start")?;
            }
            let started = Instant::now();
            let outcomes = printf_driver::run_all(&cases::printf_cases())?;

            let mut out = std::io::stdout().lock();
            for outcome in &outcomes {
                out.write_all(&outcome.transcript())?;
                if let Some(emitter) = emitter.as_mut() {
                    let level = if outcome.matches() {
                        LogLevel::Info
                    } else {
                        LogLevel::Error
                    };
                    emitter.emit_entry(
                        LogEntry::new("", level, "case_result")
                            .with_case(&outcome.name)
                            .with_function("ft_printf")
                            .with_outcome(Outcome::from_passed(outcome.matches()))
                            .with_bytes(outcome.ft_return())
                            .with_details(serde_json::json!({
                                "label": outcome.label,
                                "host_bytes": outcome.host_return(),
                            })),
                    )?;
                }
            }
            out.flush()?;

            let mismatched = outcomes.iter().filter(|o| !o.matches()).count();
            if let Some(emitter) = emitter.as_mut() {
                emitter.emit_entry(
                    LogEntry::new("", LogLevel::Info, "run_complete")
                        .with_outcome(Outcome::from_passed(mismatched == 0))
                        .with_duration_us(started.elapsed().as_micros() as u64)
                        .with_details(serde_json::json!({
                            "cases": outcomes.len(),
                            "mismatched": mismatched,
                        })),
                )?;
                emitter.flush()?;
            }
            if mismatched > 0 {
                return Err(format!("{mismatched} printf case(s) differ from host printf").into());
            }
        }
        Command::Capture { output } => {
            eprintln!("Capturing fixtures to {}", output.display());
            let written = capture::write_fixtures(
                &output,
                &cases::printf_cases(),
                &cases::gnl_scenarios(),
                &cases::interleave_scenario(),
            )?;
            for path in written {
                eprintln!("Wrote {}", path.display());
            }
        }
        Command::Verify {
            fixture,
            report,
            json,
            log,
            buffer_size,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let (fixture_sets, skipped) = FixtureSet::load_dir(&fixture)?;
            for (path, err) in &skipped {
                eprintln!("Skipping {path}: {err}");
            }
            if fixture_sets.is_empty() {
                return Err(format!("No fixture JSON files found in {}", fixture.display()).into());
            }

            let size = buffer_size.unwrap_or_else(ftio_core::buffer_size);
            let runner = TestRunner::new("fixture-verify", size);
            let mut results = Vec::new();
            for set in &fixture_sets {
                results.extend(runner.run(set));
            }

            if let Some(path) = &log {
                let mut emitter = LogEmitter::to_file(path, "verify", &run_id())?;
                emitter.emit(LogLevel::Info, "run_start")?;
                for r in &results {
                    let level = if r.passed {
                        LogLevel::Info
                    } else {
                        LogLevel::Error
                    };
                    let mut entry = LogEntry::new("", level, "case_result")
                        .with_case(&r.case_name)
                        .with_buffer_size(size.get())
                        .with_outcome(Outcome::from_passed(r.passed));
                    if let Some(diff) = &r.diff {
                        entry = entry.with_details(serde_json::json!({ "diff": diff }));
                    }
                    emitter.emit_entry(entry)?;
                }
                emitter.flush()?;
            }

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("ftio Conformance Report"),
                buffer_size: size.get(),
                timestamp: utc_timestamp(),
                summary,
            };

            if let Some(path) = report {
                std::fs::write(&path, report_doc.to_markdown())?;
                eprintln!("Wrote markdown report to {}", path.display());
            }
            if let Some(path) = json {
                std::fs::write(&path, report_doc.to_json())?;
                eprintln!("Wrote JSON report to {}", path.display());
            }

            eprintln!(
                "Verification: {}/{} passed ({} failed)",
                report_doc.summary.passed, report_doc.summary.total, report_doc.summary.failed
            );
            for r in report_doc.summary.failures() {
                eprintln!("FAIL {} ({})", r.case_name, r.reference);
                if let Some(diff) = &r.diff {
                    eprintln!("{diff}");
                }
            }
            if !report_doc.summary.all_passed() {
                return Err("conformance verification failed".into());
            }
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!("{}: {lines} line(s), {} invalid", log.display(), errors.len());
            if !errors.is_empty() {
                return Err(format!("{} invalid log line(s)", errors.len()).into());
            }
        }
    }

    Ok(())
}
