//! Vivado-class vendor synthesizer back-end.

use crate::backend::{SynthOutcome, RTL_FILE};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verifuzz_ast::SourceInfo;
use verifuzz_common::{FuzzResult, InternalError};
use verifuzz_tool::{invoke, Invocation};

/// TCL script filename materialized into the working directory.
const SCRIPT_FILE: &str = "synth.tcl";

/// Default part number for out-of-context synthesis.
const DEFAULT_PART: &str = "xc7k70tfbg676-2";

/// A Vivado-style synthesizer invoked in batch mode with a TCL script.
///
/// The TCL template needs the top module's name substituted in, since
/// `synth_design` cannot infer it from a generated source reliably.
#[derive(Debug, Clone)]
pub struct Vivado {
    /// Configured back-end name.
    pub name: String,
    /// Path to the `vivado` executable.
    pub executable: PathBuf,
    /// Netlist output filename.
    pub output: PathBuf,
    /// Invocation timeout.
    pub timeout: Duration,
}

impl Vivado {
    fn script(&self, top: &str) -> String {
        format!(
            "read_verilog {RTL_FILE}\n\
             synth_design -top {top} -part {DEFAULT_PART} -mode out_of_context\n\
             write_verilog -force {}\n",
            self.output.display()
        )
    }

    /// Runs synthesis in `dir`; `rtl.v` must already be present.
    pub fn run(&self, src: &SourceInfo, dir: &Path) -> FuzzResult<SynthOutcome> {
        std::fs::write(dir.join(SCRIPT_FILE), self.script(src.top.as_str()))
            .map_err(|e| InternalError::new(format!("cannot write {SCRIPT_FILE}: {e}")))?;
        let out = invoke(
            &Invocation::new(&self.name, &self.executable)
                .arg("-mode")
                .arg("batch")
                .arg("-nojournal")
                .arg("-nolog")
                .arg("-source")
                .arg(SCRIPT_FILE)
                .cwd(dir)
                .timeout(self.timeout),
        );
        Ok(SynthOutcome::new(out.status, out.duration))
    }
}
