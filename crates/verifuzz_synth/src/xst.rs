//! XST-class legacy two-step back-end.
//!
//! The flow is synthesis into a binary netlist container followed by a
//! companion `netgen` run that re-emits Verilog. The re-emitted text then
//! gets a post-processing pass that strips timestamps and vendor ifdef
//! guards, which would otherwise make byte-level artifact comparison and
//! equivalence-checker parsing unstable across runs.

use crate::backend::{SynthOutcome, RTL_FILE};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verifuzz_ast::SourceInfo;
use verifuzz_common::{FuzzResult, InternalError};
use verifuzz_tool::{invoke, Invocation};

/// XST command script filename.
const SCRIPT_FILE: &str = "xst.scr";

/// XST project file listing the sources.
const PROJECT_FILE: &str = "rtl.prj";

/// Intermediate binary netlist container.
const NGC_FILE: &str = "design.ngc";

/// An XST-style synthesizer plus its companion netlister.
#[derive(Debug, Clone)]
pub struct Xst {
    /// Configured back-end name.
    pub name: String,
    /// Path to the `xst` executable.
    pub executable: PathBuf,
    /// Path to the companion `netgen` executable.
    pub netgen: PathBuf,
    /// Netlist output filename.
    pub output: PathBuf,
    /// Invocation timeout (applies to each step).
    pub timeout: Duration,
}

impl Xst {
    fn script(&self, top: &str) -> String {
        format!("run -ifn {PROJECT_FILE} -ifmt mixed -top {top} -ofn {NGC_FILE} -ofmt NGC -p artix7\n")
    }

    /// Runs the two-step flow in `dir`; `rtl.v` must already be present.
    pub fn run(&self, src: &SourceInfo, dir: &Path) -> FuzzResult<SynthOutcome> {
        std::fs::write(dir.join(PROJECT_FILE), format!("verilog work \"{RTL_FILE}\"\n"))
            .map_err(|e| InternalError::new(format!("cannot write {PROJECT_FILE}: {e}")))?;
        std::fs::write(dir.join(SCRIPT_FILE), self.script(src.top.as_str()))
            .map_err(|e| InternalError::new(format!("cannot write {SCRIPT_FILE}: {e}")))?;

        let synth = invoke(
            &Invocation::new(&self.name, &self.executable)
                .arg("-ifn")
                .arg(SCRIPT_FILE)
                .cwd(dir)
                .timeout(self.timeout),
        );
        if !synth.status.is_ok() {
            return Ok(SynthOutcome::new(synth.status, synth.duration));
        }

        let netgen = invoke(
            &Invocation::new(format!("{}_netgen", self.name), &self.netgen)
                .arg("-w")
                .arg("-ofmt")
                .arg("verilog")
                .arg(NGC_FILE)
                .arg(self.output.display().to_string())
                .cwd(dir)
                .timeout(self.timeout),
        );
        let total = synth.duration + netgen.duration;
        if !netgen.status.is_ok() {
            return Ok(SynthOutcome::new(netgen.status, total));
        }

        strip_vendor_noise(&dir.join(&self.output))?;
        Ok(SynthOutcome::new(netgen.status, total))
    }
}

/// Rewrites a netgen-emitted netlist without comment lines (they carry
/// timestamps) and without vendor ifdef guards.
fn strip_vendor_noise(path: &Path) -> FuzzResult<()> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| InternalError::new(format!("cannot read {}: {e}", path.display())))?;
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with("//")
                && !trimmed.starts_with("`ifdef")
                && !trimmed.starts_with("`ifndef")
                && !trimmed.starts_with("`else")
                && !trimmed.starts_with("`endif")
                && !trimmed.starts_with("`timescale")
        })
        .collect();
    std::fs::write(path, kept.join("\n") + "\n")
        .map_err(|e| InternalError::new(format!("cannot write {}: {e}", path.display())))
}
