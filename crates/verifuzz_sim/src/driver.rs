//! Simulator invocation and output hashing.

use crate::testbench::{generate_testbench, parse_output, TB_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verifuzz_ast::SourceInfo;
use verifuzz_common::{ContentHash, FuzzResult, InternalError};
use verifuzz_tool::{invoke, Invocation, ToolStatus};
use verifuzz_verilog::print_source;

/// Compiled simulation image filename.
const VVP_FILE: &str = "sim.vvp";

/// Input vector artifact filename.
const SIM_INPUT_FILE: &str = "sim_input.hex";

/// Output hash artifact filename.
const SIM_OUTPUT_FILE: &str = "sim_output.hex";

/// An Icarus-class reference simulator.
#[derive(Debug, Clone)]
pub struct Simulator {
    /// Configured simulator name.
    pub name: String,
    /// Path to the compiler driver (`iverilog`).
    pub executable: PathBuf,
    /// Invocation timeout (applies to each step).
    pub timeout: Duration,
}

/// Result of one simulation: classified status plus the hashed output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimOutcome {
    /// Classified tool status of the failing step, or `Ok`.
    pub status: ToolStatus,
    /// Hex digest of the concatenated output bytes, when simulation
    /// produced a decodable output stream.
    pub output_hash: Option<String>,
    /// Wall-clock duration in seconds.
    pub duration_secs: f64,
}

impl SimOutcome {
    /// True when the simulator ran cleanly and its output decoded.
    pub fn ok(&self) -> bool {
        self.status.is_ok() && self.output_hash.is_some()
    }
}

impl Simulator {
    /// Builds a simulator from one `[sim.<name>]` configuration entry.
    pub fn new(name: &str, path: Option<&str>, timeout_secs: u64) -> Self {
        Self {
            name: name.to_string(),
            executable: path.unwrap_or("iverilog").into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// The runtime engine (`vvp`) next to the compiler driver.
    fn vvp_path(&self) -> PathBuf {
        match self.executable.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join("vvp"),
            _ => PathBuf::from("vvp"),
        }
    }

    /// Simulates `src` under `input` in `dir`.
    ///
    /// Writes `rtl.v`, the generated testbench, and the `sim_input.hex` /
    /// `sim_output.hex` artifacts. The returned outcome carries the status
    /// of the first failing step, or `Ok` with the output hash.
    pub fn run(&self, src: &SourceInfo, input: &[u8], dir: &Path) -> FuzzResult<SimOutcome> {
        let top = src
            .top_module()
            .ok_or_else(|| InternalError::new("source has no top module"))?;

        std::fs::create_dir_all(dir)
            .map_err(|e| InternalError::new(format!("cannot create {}: {e}", dir.display())))?;
        std::fs::write(dir.join("rtl.v"), print_source(src))
            .map_err(|e| InternalError::new(format!("cannot write rtl.v: {e}")))?;
        std::fs::write(dir.join(TB_FILE), generate_testbench(top, input))
            .map_err(|e| InternalError::new(format!("cannot write {TB_FILE}: {e}")))?;
        std::fs::write(dir.join(SIM_INPUT_FILE), to_hex(input))
            .map_err(|e| InternalError::new(format!("cannot write {SIM_INPUT_FILE}: {e}")))?;

        let compile = invoke(
            &Invocation::new(format!("{}_compile", self.name), &self.executable)
                .arg("-o")
                .arg(VVP_FILE)
                .arg(TB_FILE)
                .arg("rtl.v")
                .cwd(dir)
                .timeout(self.timeout),
        );
        if !compile.status.is_ok() {
            return Ok(SimOutcome {
                status: compile.status,
                output_hash: None,
                duration_secs: compile.duration.as_secs_f64(),
            });
        }

        let run = invoke(
            &Invocation::new(&self.name, self.vvp_path())
                .arg(VVP_FILE)
                .cwd(dir)
                .timeout(self.timeout),
        );
        let duration = compile.duration + run.duration;
        if !run.status.is_ok() {
            return Ok(SimOutcome {
                status: run.status,
                output_hash: None,
                duration_secs: duration.as_secs_f64(),
            });
        }

        match parse_output(top, &run.stdout) {
            Some(bytes) => {
                let hash = ContentHash::from_bytes(&bytes).to_hex();
                let _ = std::fs::write(dir.join(SIM_OUTPUT_FILE), format!("{hash}\n"));
                Ok(SimOutcome {
                    status: ToolStatus::Ok,
                    output_hash: Some(hash),
                    duration_secs: duration.as_secs_f64(),
                })
            }
            // Clean exit, undecodable stream: an empty-output failure.
            None => Ok(SimOutcome {
                status: ToolStatus::EmptyFail,
                output_hash: None,
                duration_secs: duration.as_secs_f64(),
            }),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 1);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out.push('\n');
    out
}
