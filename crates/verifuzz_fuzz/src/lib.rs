//! The fuzz loop.
//!
//! One module at a time advances through generate → synthesize → check →
//! simulate; external tools are the bottleneck, so the outer layer stays
//! single-threaded and the filesystem is the durable record. Every
//! iteration gets its own run directory with the full artifact set, a
//! `run.json` outcome record, and — for anything other than a clean pass —
//! an archived copy with a `_failed` or `_timeout` suffix so wedged vendor
//! tools are kept apart from content-driven failures.

#![warn(missing_docs)]

pub mod archive;
pub mod outcome;
pub mod report;
pub mod runner;

pub use outcome::{Classification, RunRecord, SimSummary};
pub use report::ReportLog;
pub use runner::{fuzz_run, FuzzContext, FuzzOptions, DEFAULT_ITERATIONS};
