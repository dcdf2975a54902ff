//! The equivalence run: parallel synthesis, pairwise checking,
//! classification.

use crate::checker::{EquivChecker, EquivStatus};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use verifuzz_ast::SourceInfo;
use verifuzz_common::FuzzResult;
use verifuzz_synth::{write_rtl, SynthBackend};
use verifuzz_tool::ToolStatus;

/// One synthesizer's recorded result within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthResult {
    /// Back-end name.
    pub name: String,
    /// Classified tool status.
    pub status: ToolStatus,
    /// Wall-clock duration in seconds.
    pub duration_secs: f64,
}

/// The classified result of one equivalence run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivReport {
    /// Overall classification.
    pub status: EquivStatus,
    /// Whether any synthesizer or the checker hit its deadline.
    pub timed_out: bool,
    /// Per-synthesizer results, identity baseline included.
    pub synth_results: Vec<SynthResult>,
}

impl EquivReport {
    /// True when artifacts for this run must be retained.
    pub fn must_retain(&self) -> bool {
        self.status != EquivStatus::Equiv
    }
}

/// Runs the full equivalence flow for `src` in `dir`.
///
/// The identity baseline is prepended unless the caller already supplies
/// an identity back-end, so a single configured synthesizer still yields
/// one comparison pair. Each back-end synthesizes in `dir/<name>/`; on
/// success its netlist is copied up to `dir/<name>.v` for the checker and
/// the archived artifacts.
pub fn run_equivalence(
    src: &SourceInfo,
    backends: &[SynthBackend],
    checker: &EquivChecker,
    dir: &Path,
) -> FuzzResult<EquivReport> {
    write_rtl(src, dir)?;

    let mut all: Vec<SynthBackend> = Vec::new();
    if !backends
        .iter()
        .any(|b| matches!(b, SynthBackend::Identity(_)))
    {
        all.push(SynthBackend::identity());
    }
    all.extend(backends.iter().cloned());

    // Independent processes in independent working directories.
    let outcomes: Vec<(String, FuzzResult<verifuzz_synth::SynthOutcome>, PathBuf)> = all
        .par_iter()
        .map(|backend| {
            let sub = dir.join(backend.name());
            let outcome = backend.run(src, &sub);
            (backend.name().to_string(), outcome, sub)
        })
        .collect();

    let mut synth_results = Vec::new();
    let mut netlists: Vec<(String, PathBuf)> = Vec::new();
    let mut timed_out = false;
    let mut failed: Option<String> = None;

    for (backend, (name, outcome, sub)) in all.iter().zip(outcomes) {
        let outcome = outcome?;
        timed_out |= outcome.status.is_timeout();
        copy_log(&sub, dir, &name);

        let mut status = outcome.status;
        if status.is_ok() {
            // A zero exit without the promised netlist is a tool outcome
            // (EmptyFail), not an internal error.
            let produced = sub.join(backend.output_path());
            let copied = dir.join(format!("{name}.v"));
            if std::fs::copy(&produced, &copied).is_ok() {
                netlists.push((name.clone(), PathBuf::from(format!("{name}.v"))));
            } else {
                status = ToolStatus::EmptyFail;
            }
        }
        if !status.is_ok() && failed.is_none() {
            failed = Some(name.clone());
        }
        synth_results.push(SynthResult {
            name,
            status,
            duration_secs: outcome.duration_secs,
        });
    }

    // Pairwise checks over the successful netlists; first witness wins.
    let mut inconclusive = false;
    let mut checker_failed: Option<String> = None;
    'pairs: for i in 0..netlists.len() {
        for j in (i + 1)..netlists.len() {
            let (status, pair_timed_out) =
                checker.check_pair(src.top.as_str(), &netlists[i].1, &netlists[j].1, dir)?;
            timed_out |= pair_timed_out;
            match status {
                EquivStatus::Equiv => {}
                EquivStatus::Counterexample { witness } => {
                    return Ok(EquivReport {
                        status: EquivStatus::Counterexample { witness },
                        timed_out,
                        synth_results,
                    });
                }
                EquivStatus::Inconclusive => inconclusive = true,
                EquivStatus::ToolFailure(reason) => {
                    checker_failed = Some(reason);
                    break 'pairs;
                }
            }
        }
    }

    let status = if inconclusive {
        EquivStatus::Inconclusive
    } else if let Some(reason) = checker_failed {
        EquivStatus::ToolFailure(reason)
    } else if let Some(name) = failed {
        EquivStatus::ToolFailure(name)
    } else {
        EquivStatus::Equiv
    };

    Ok(EquivReport {
        status,
        timed_out,
        synth_results,
    })
}

/// Copies a back-end's tee'd log up into the run directory.
fn copy_log(sub: &Path, dir: &Path, name: &str) {
    let from = sub.join(format!("{name}.log"));
    if from.exists() {
        let _ = std::fs::copy(from, dir.join(format!("{name}.log")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_retention_policy() {
        let equiv = EquivReport {
            status: EquivStatus::Equiv,
            timed_out: false,
            synth_results: Vec::new(),
        };
        assert!(!equiv.must_retain());
        let bad = EquivReport {
            status: EquivStatus::Counterexample { witness: None },
            timed_out: false,
            synth_results: Vec::new(),
        };
        assert!(bad.must_retain());
    }
}
