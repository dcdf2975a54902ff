//! Run outcome records (`run.json`).

use serde::{Deserialize, Serialize};
use verifuzz_equiv::{EquivReport, EquivStatus, SynthResult};
use verifuzz_sim::SimOutcome;
use verifuzz_tool::ToolStatus;

/// Final classification of one fuzz iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Everything agreed; nothing to keep.
    Pass,
    /// A synthesizer crashed, failed, or produced no netlist.
    SynthFail,
    /// The reference simulator failed or its output did not decode.
    SimFail,
    /// The equivalence checker reported a counterexample, was
    /// inconclusive, or itself failed.
    EquivFail,
    /// Some tool in the chain hit its deadline.
    Timeout,
    /// A tool exited cleanly but left no usable output.
    EmptyFail,
}

/// The simulation half of a run record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSummary {
    /// Whether simulation ran cleanly and its output decoded.
    pub ok: bool,
    /// Hex digest of the concatenated output bytes.
    pub output_hash: Option<String>,
}

/// The `run.json` outcome record: everything needed to reproduce and triage
/// one iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// The seed that produced the module and input vector.
    pub seed: u64,
    /// Version stamp of the generator crate.
    pub generator_version: String,
    /// Per-synthesizer results.
    pub synth_results: Vec<SynthResult>,
    /// Equivalence classification, witness included.
    pub equiv: EquivStatus,
    /// Simulation summary, absent when no simulator is configured.
    pub sim: Option<SimSummary>,
    /// Final classification.
    pub classification: Classification,
}

/// Derives the final classification from the two drivers' results.
///
/// Timeouts win over everything: wedged vendor tools are archived apart
/// from content-driven failures. After that, a distinguishing witness or
/// an undetermined checker marks the run `EquivFail`; tool-level failures
/// fall out of the recorded synthesizer statuses.
pub fn classify(equiv: &EquivReport, sim: Option<&SimOutcome>) -> Classification {
    let sim_timed_out = sim.is_some_and(|s| s.status.is_timeout());
    if equiv.timed_out || sim_timed_out {
        return Classification::Timeout;
    }

    match &equiv.status {
        EquivStatus::Counterexample { .. } | EquivStatus::Inconclusive => {
            return Classification::EquivFail;
        }
        EquivStatus::ToolFailure(which) => {
            let synth_empty = equiv
                .synth_results
                .iter()
                .any(|r| r.name == *which && r.status == ToolStatus::EmptyFail);
            return if synth_empty {
                Classification::EmptyFail
            } else if equiv.synth_results.iter().any(|r| r.name == *which) {
                Classification::SynthFail
            } else {
                Classification::EquivFail
            };
        }
        EquivStatus::Equiv => {}
    }

    if let Some(sim) = sim {
        if sim.status == ToolStatus::EmptyFail {
            return Classification::EmptyFail;
        }
        if !sim.ok() {
            return Classification::SimFail;
        }
    }

    Classification::Pass
}
