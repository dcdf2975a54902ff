//! The external formal-equivalence checker.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verifuzz_common::{FuzzResult, InternalError};
use verifuzz_config::EquivConfig;
use verifuzz_tool::{invoke, Invocation, ToolStatus};

/// Outcome of one pairwise equivalence check, and of the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquivStatus {
    /// Every compared pair was proven equivalent.
    Equiv,
    /// The checker found an input assignment distinguishing two netlists.
    Counterexample {
        /// The checker's witness text, verbatim.
        witness: Option<String>,
    },
    /// The checker returned an undetermined status or timed out.
    Inconclusive,
    /// A synthesizer or the checker itself failed to run.
    ToolFailure(String),
}

/// A SAT/miter-based equivalence checker invoked as an external tool.
#[derive(Debug, Clone)]
pub struct EquivChecker {
    /// Path to the checker executable.
    pub executable: PathBuf,
    /// Per-check timeout.
    pub timeout: Duration,
}

impl EquivChecker {
    /// Builds a checker from the `[equiv]` configuration section.
    pub fn from_config(config: &EquivConfig) -> Self {
        Self {
            executable: config.path.clone().into(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// The miter script comparing two netlists that both define `top`.
    ///
    /// The two candidates are read side by side under fresh names, their
    /// shared inputs are tied together and the outputs XORed by `miter`,
    /// and the solver is asked whether any input assignment drives the
    /// difference output.
    fn script(&self, top: &str, netlist_a: &Path, netlist_b: &Path) -> String {
        format!(
            "read_verilog {a}\nrename {top} top_a\nread_verilog {b}\nrename {top} top_b\n\
             miter -equiv -flatten top_a top_b miter\nhierarchy -top miter\n\
             sat -verify -prove trigger 0 -show-inputs -show-outputs miter\n",
            a = netlist_a.display(),
            b = netlist_b.display(),
        )
    }

    /// Checks one netlist pair in `dir`, returning the pair's status and
    /// whether the checker hit its deadline.
    pub fn check_pair(
        &self,
        top: &str,
        netlist_a: &Path,
        netlist_b: &Path,
        dir: &Path,
    ) -> FuzzResult<(EquivStatus, bool)> {
        const SCRIPT_FILE: &str = "equiv.ys";
        std::fs::write(dir.join(SCRIPT_FILE), self.script(top, netlist_a, netlist_b))
            .map_err(|e| InternalError::new(format!("cannot write {SCRIPT_FILE}: {e}")))?;

        let out = invoke(
            &Invocation::new("equiv", &self.executable)
                .arg("-q")
                .arg("-s")
                .arg(SCRIPT_FILE)
                .cwd(dir)
                .timeout(self.timeout),
        );

        let timed_out = matches!(out.status, ToolStatus::Timeout);
        let status = match out.status {
            ToolStatus::Ok => EquivStatus::Equiv,
            ToolStatus::Timeout => EquivStatus::Inconclusive,
            ToolStatus::LaunchFail(reason) => EquivStatus::ToolFailure(reason),
            ToolStatus::EmptyFail => {
                unreachable!("EmptyFail is set by drivers, never by the runner invoked here")
            }
            ToolStatus::NonZeroExit(_) => {
                let transcript = format!("{}\n{}", out.stdout, out.stderr);
                if transcript.contains("SAT") || transcript.contains("counterexample") {
                    EquivStatus::Counterexample {
                        witness: extract_witness(&out.stdout),
                    }
                } else {
                    EquivStatus::Inconclusive
                }
            }
        };
        Ok((status, timed_out))
    }
}

/// Pulls the witness lines out of a checker transcript: everything after
/// the first line announcing satisfiability.
fn extract_witness(stdout: &str) -> Option<String> {
    let mut lines = stdout.lines();
    lines.find(|line| line.contains("SAT"))?;
    let witness: Vec<&str> = lines.filter(|line| !line.trim().is_empty()).collect();
    if witness.is_empty() {
        None
    } else {
        Some(witness.join("\n"))
    }
}
