//! Capture fixtures, then verify the implementation against them.

use ftio_core::config::BufferSize;
use ftio_harness::capture::write_fixtures;
use ftio_harness::cases::{gnl_scenarios, interleave_scenario, printf_cases};
use ftio_harness::verify::VerificationSummary;
use ftio_harness::{ConformanceReport, FixtureSet, TestRunner};

fn captured_sets() -> (tempfile::TempDir, Vec<FixtureSet>) {
    let dir = tempfile::tempdir().unwrap();
    let written = write_fixtures(
        dir.path(),
        &printf_cases(),
        &gnl_scenarios(),
        &interleave_scenario(),
    )
    .unwrap();
    assert_eq!(written.len(), 2);
    let (sets, skipped) = FixtureSet::load_dir(dir.path()).unwrap();
    assert!(skipped.is_empty(), "{skipped:?}");
    (dir, sets)
}

#[test]
fn captured_fixtures_verify_at_several_buffer_sizes() {
    let (_dir, sets) = captured_sets();
    for bs in [1, 2, 42, 9999, 1 << 20] {
        let runner = TestRunner::new("roundtrip", BufferSize::new(bs).unwrap());
        let results: Vec<_> = sets.iter().flat_map(|set| runner.run(set)).collect();
        let summary = VerificationSummary::from_results(results);
        let failures: Vec<_> = summary
            .failures()
            .map(|r| (r.case_name.clone(), r.diff.clone()))
            .collect();
        assert!(summary.all_passed(), "buffer size {bs}: {failures:?}");
        assert_eq!(summary.total, printf_cases().len() + gnl_scenarios().len() + 1);
    }
}

#[test]
fn tampered_fixture_fails_with_diff() {
    let (_dir, mut sets) = captured_sets();
    let printf = sets
        .iter_mut()
        .find(|s| s.family == ftio_harness::capture::PRINTF_FAMILY)
        .unwrap();
    let case = printf.cases.iter_mut().find(|c| c.name == "int").unwrap();
    case.expected_output = String::from("[TEST_5]_Int:[43]\n");

    let runner = TestRunner::new("tamper", BufferSize::default());
    let summary = VerificationSummary::from_results(runner.run(printf));
    assert_eq!(summary.failed, 1);

    let report = ConformanceReport {
        title: String::from("tamper"),
        buffer_size: 42,
        timestamp: String::from("now"),
        summary,
    };
    let md = report.to_markdown();
    assert!(md.contains("| int | printf-test.c TEST_5 | FAIL |"));
    assert!(md.contains("-[TEST_5]_Int:[43]\\n"));
}

#[test]
fn empty_file_fixture_matches_the_c_driver() {
    let (_dir, sets) = captured_sets();
    let case = sets
        .iter()
        .flat_map(|set| set.cases.iter())
        .find(|c| c.name == "empty_file")
        .unwrap();
    assert_eq!(case.reference, "get-next-line-tests.c TEST 2");
    assert_eq!(case.expected_output, "\nTEST 2: empty file\n1 -> [(null)]\n");
}
