//! Yosys-class open synthesizer back-end.

use crate::backend::{SynthOutcome, RTL_FILE};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verifuzz_common::{FuzzResult, InternalError};
use verifuzz_tool::{invoke, Invocation};

/// Script filename materialized into the working directory.
const SCRIPT_FILE: &str = "synth.ys";

/// A Yosys-style synthesizer driven by a script file that reads `rtl.v`,
/// normalizes the design, and writes a gate-level netlist.
#[derive(Debug, Clone)]
pub struct Yosys {
    /// Configured back-end name.
    pub name: String,
    /// Path to the `yosys` executable.
    pub executable: PathBuf,
    /// Netlist output filename.
    pub output: PathBuf,
    /// Invocation timeout.
    pub timeout: Duration,
}

impl Yosys {
    fn script(&self) -> String {
        format!(
            "read_verilog {RTL_FILE}\nsynth\nwrite_verilog -noattr {}\n",
            self.output.display()
        )
    }

    /// Runs synthesis in `dir`; `rtl.v` must already be present.
    pub fn run(&self, dir: &Path) -> FuzzResult<SynthOutcome> {
        std::fs::write(dir.join(SCRIPT_FILE), self.script())
            .map_err(|e| InternalError::new(format!("cannot write {SCRIPT_FILE}: {e}")))?;
        let out = invoke(
            &Invocation::new(&self.name, &self.executable)
                .arg("-q")
                .arg("-s")
                .arg(SCRIPT_FILE)
                .cwd(dir)
                .timeout(self.timeout),
        );
        Ok(SynthOutcome::new(out.status, out.duration))
    }
}
