//! End-to-end fuzz-loop scenarios against stub tools.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::time::Duration;
use verifuzz_equiv::EquivChecker;
use verifuzz_fuzz::{
    fuzz_run, Classification, FuzzContext, FuzzOptions, ReportLog, DEFAULT_ITERATIONS,
};
use verifuzz_gen::{Generator, Seed};
use verifuzz_synth::{SynthBackend, Yosys};

fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn options(parent: &Path, seed: Option<Seed>, keep: bool) -> FuzzOptions {
    FuzzOptions {
        seed,
        size: 3,
        prefix: "run".to_string(),
        parent: parent.to_path_buf(),
        keep,
        iterations: DEFAULT_ITERATIONS,
    }
}

/// Context with only the identity baseline: no pairs, no external tools,
/// every iteration passes.
fn passing_context<'a>(report: &'a ReportLog, checker: &'a EquivChecker) -> FuzzContext<'a> {
    static GENERATOR: std::sync::OnceLock<Generator> = std::sync::OnceLock::new();
    FuzzContext {
        generator: GENERATOR.get_or_init(Generator::default),
        backends: &[],
        checker,
        simulator: None,
        report,
    }
}

#[test]
fn no_seed_runs_exactly_five_iterations() {
    let dir = tempfile::tempdir().unwrap();
    let report = ReportLog::open(&dir.path().join("fuzz.log")).unwrap();
    let checker = EquivChecker {
        executable: "/nonexistent/checker".into(),
        timeout: Duration::from_secs(1),
    };
    let ctx = passing_context(&report, &checker);

    let records = fuzz_run(&ctx, &options(dir.path(), None, false)).unwrap();
    assert_eq!(records.len(), 5);
    assert!(records
        .iter()
        .all(|r| r.classification == Classification::Pass));
}

#[test]
fn explicit_seed_runs_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let report = ReportLog::open(&dir.path().join("fuzz.log")).unwrap();
    let checker = EquivChecker {
        executable: "/nonexistent/checker".into(),
        timeout: Duration::from_secs(1),
    };
    let ctx = passing_context(&report, &checker);

    let records = fuzz_run(&ctx, &options(dir.path(), Some(Seed(7)), false)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].seed, 7);
}

#[test]
fn configured_iteration_cap_governs_no_seed_runs() {
    let dir = tempfile::tempdir().unwrap();
    let report = ReportLog::open(&dir.path().join("fuzz.log")).unwrap();
    let checker = EquivChecker {
        executable: "/nonexistent/checker".into(),
        timeout: Duration::from_secs(1),
    };
    let ctx = passing_context(&report, &checker);

    let mut opts = options(dir.path(), None, false);
    opts.iterations = 2;
    assert_eq!(fuzz_run(&ctx, &opts).unwrap().len(), 2);

    // A seed still pins the session to a single run, whatever the cap.
    opts.seed = Some(Seed(11));
    opts.iterations = 3;
    assert_eq!(fuzz_run(&ctx, &opts).unwrap().len(), 1);
}

#[test]
fn passing_runs_are_deleted_unless_keep_is_set() {
    let dir = tempfile::tempdir().unwrap();
    let report = ReportLog::open(&dir.path().join("fuzz.log")).unwrap();
    let checker = EquivChecker {
        executable: "/nonexistent/checker".into(),
        timeout: Duration::from_secs(1),
    };
    let ctx = passing_context(&report, &checker);

    fuzz_run(&ctx, &options(dir.path(), Some(Seed(1)), false)).unwrap();
    assert!(!dir.path().join("run_0").exists());

    fuzz_run(&ctx, &options(dir.path(), Some(Seed(1)), true)).unwrap();
    assert!(dir.path().join("run_0").join("run.json").exists());
    assert!(dir.path().join("run_0").join("rtl.v").exists());
}

#[test]
fn seeded_runs_reproduce_the_same_module() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let report_a = ReportLog::open(&dir_a.path().join("fuzz.log")).unwrap();
    let report_b = ReportLog::open(&dir_b.path().join("fuzz.log")).unwrap();
    let checker = EquivChecker {
        executable: "/nonexistent/checker".into(),
        timeout: Duration::from_secs(1),
    };

    let ctx_a = passing_context(&report_a, &checker);
    let ctx_b = passing_context(&report_b, &checker);
    fuzz_run(&ctx_a, &options(dir_a.path(), Some(Seed(99)), true)).unwrap();
    fuzz_run(&ctx_b, &options(dir_b.path(), Some(Seed(99)), true)).unwrap();

    let rtl_a = std::fs::read_to_string(dir_a.path().join("run_0").join("rtl.v")).unwrap();
    let rtl_b = std::fs::read_to_string(dir_b.path().join("run_0").join("rtl.v")).unwrap();
    assert_eq!(rtl_a, rtl_b);
}

#[test]
fn counterexample_is_archived_as_failed_and_loop_continues() {
    let tools = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let copy = write_stub(tools.path(), "synth_copy", "cp rtl.v syn_copy.v");
    let sat = write_stub(
        tools.path(),
        "checker_sat",
        "echo 'SAT proof found!'; echo 'a0 = 1'; exit 1",
    );

    let generator = Generator::default();
    let backends = [SynthBackend::Yosys(Yosys {
        name: "copy".to_string(),
        executable: copy,
        output: "syn_copy.v".into(),
        timeout: Duration::from_secs(10),
    })];
    let checker = EquivChecker {
        executable: sat,
        timeout: Duration::from_secs(10),
    };
    let report = ReportLog::open(&dir.path().join("fuzz.log")).unwrap();
    let ctx = FuzzContext {
        generator: &generator,
        backends: &backends,
        checker: &checker,
        simulator: None,
        report: &report,
    };

    let records = fuzz_run(&ctx, &options(dir.path(), None, false)).unwrap();
    // Every iteration hits the planted counterexample and the loop still
    // completes all five.
    assert_eq!(records.len(), 5);
    assert!(records
        .iter()
        .all(|r| r.classification == Classification::EquivFail));

    let archived = dir.path().join("run_0_failed");
    assert!(archived.join("run.json").exists());
    assert!(archived.join("rtl.v").exists());
    assert!(archived.join("copy.v").exists());
    // Cleaned-up original, archive retained.
    assert!(!dir.path().join("run_0").exists());

    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(archived.join("run.json")).unwrap())
            .unwrap();
    assert_eq!(record["classification"], "EquivFail");
    assert!(record["equiv"]["Counterexample"]["witness"]
        .as_str()
        .unwrap()
        .contains("a0 = 1"));
}

#[test]
fn sleeping_checker_is_archived_as_timeout_and_loop_continues() {
    let tools = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let copy = write_stub(tools.path(), "synth_copy", "cp rtl.v syn_copy.v");
    let sleeper = write_stub(tools.path(), "checker_sleep", "sleep 30");

    let generator = Generator::default();
    let backends = [SynthBackend::Yosys(Yosys {
        name: "copy".to_string(),
        executable: copy,
        output: "syn_copy.v".into(),
        timeout: Duration::from_secs(10),
    })];
    let checker = EquivChecker {
        executable: sleeper,
        timeout: Duration::from_millis(200),
    };
    let report = ReportLog::open(&dir.path().join("fuzz.log")).unwrap();
    let ctx = FuzzContext {
        generator: &generator,
        backends: &backends,
        checker: &checker,
        simulator: None,
        report: &report,
    };

    let records = fuzz_run(&ctx, &options(dir.path(), Some(Seed(5)), false)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].classification, Classification::Timeout);
    assert!(dir.path().join("run_0_timeout").join("run.json").exists());
    assert!(!dir.path().join("run_0_failed").exists());
}

#[test]
fn report_log_narrates_each_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("fuzz.log");
    let report = ReportLog::open(&log_path).unwrap();
    let checker = EquivChecker {
        executable: "/nonexistent/checker".into(),
        timeout: Duration::from_secs(1),
    };
    let ctx = passing_context(&report, &checker);

    fuzz_run(&ctx, &options(dir.path(), Some(Seed(3)), false)).unwrap();
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("run_0: equiv Equiv"));
    assert!(log.contains("run_0: Pass"));
}
