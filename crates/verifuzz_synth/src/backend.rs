//! The uniform back-end interface and dispatch.

use crate::{Identity, Vivado, Xst, Yosys};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use verifuzz_ast::SourceInfo;
use verifuzz_common::{FuzzResult, InternalError};
use verifuzz_config::{SynthKind, SynthToolConfig};
use verifuzz_tool::ToolStatus;
use verifuzz_verilog::print_source;

/// The source filename every back-end reads from its working directory.
pub const RTL_FILE: &str = "rtl.v";

/// Result of one synthesis run: the classified tool status plus wall-clock
/// duration. Filesystem problems are internal errors and surface through
/// `FuzzResult` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthOutcome {
    /// Classified tool status.
    pub status: ToolStatus,
    /// Wall-clock duration in seconds.
    pub duration_secs: f64,
}

impl SynthOutcome {
    /// Wraps a status/duration pair.
    pub fn new(status: ToolStatus, duration: Duration) -> Self {
        Self {
            status,
            duration_secs: duration.as_secs_f64(),
        }
    }
}

/// Writes the source Verilog to `rtl.v` in `dir`, creating `dir` if needed.
pub fn write_rtl(src: &SourceInfo, dir: &Path) -> FuzzResult<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| InternalError::new(format!("cannot create {}: {e}", dir.display())))?;
    std::fs::write(dir.join(RTL_FILE), print_source(src))
        .map_err(|e| InternalError::new(format!("cannot write {RTL_FILE}: {e}")))
}

/// A synthesizer back-end.
#[derive(Debug, Clone)]
pub enum SynthBackend {
    /// Yosys-class open synthesizer.
    Yosys(Yosys),
    /// Vivado-class vendor synthesizer.
    Vivado(Vivado),
    /// XST-class legacy two-step flow.
    Xst(Xst),
    /// Pass-through baseline.
    Identity(Identity),
}

impl SynthBackend {
    /// Builds a back-end from one `[synth.<name>]` configuration entry.
    pub fn from_config(name: &str, config: &SynthToolConfig) -> Self {
        let output = config
            .output
            .clone()
            .unwrap_or_else(|| format!("syn_{name}.v"));
        let timeout = Duration::from_secs(config.timeout_secs);
        match config.kind {
            SynthKind::Yosys => SynthBackend::Yosys(Yosys {
                name: name.to_string(),
                executable: config.path.clone().unwrap_or_else(|| "yosys".into()).into(),
                output: output.into(),
                timeout,
            }),
            SynthKind::Vivado => SynthBackend::Vivado(Vivado {
                name: name.to_string(),
                executable: config.path.clone().unwrap_or_else(|| "vivado".into()).into(),
                output: output.into(),
                timeout,
            }),
            SynthKind::Xst => SynthBackend::Xst(Xst {
                name: name.to_string(),
                executable: config.path.clone().unwrap_or_else(|| "xst".into()).into(),
                netgen: config
                    .netgen_path
                    .clone()
                    .unwrap_or_else(|| "netgen".into())
                    .into(),
                output: output.into(),
                timeout,
            }),
            SynthKind::Identity => SynthBackend::Identity(Identity {
                name: name.to_string(),
                output: output.into(),
            }),
        }
    }

    /// The identity baseline used in every equivalence run.
    pub fn identity() -> Self {
        SynthBackend::Identity(Identity {
            name: "identity".to_string(),
            output: PathBuf::from("syn_identity.v"),
        })
    }

    /// The configured name of this back-end.
    pub fn name(&self) -> &str {
        match self {
            SynthBackend::Yosys(b) => &b.name,
            SynthBackend::Vivado(b) => &b.name,
            SynthBackend::Xst(b) => &b.name,
            SynthBackend::Identity(b) => &b.name,
        }
    }

    /// The netlist filename this back-end produces on success, relative to
    /// its working directory.
    pub fn output_path(&self) -> &Path {
        match self {
            SynthBackend::Yosys(b) => &b.output,
            SynthBackend::Vivado(b) => &b.output,
            SynthBackend::Xst(b) => &b.output,
            SynthBackend::Identity(b) => &b.output,
        }
    }

    /// Returns the same back-end writing its netlist to `path`.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match &mut self {
            SynthBackend::Yosys(b) => b.output = path,
            SynthBackend::Vivado(b) => b.output = path,
            SynthBackend::Xst(b) => b.output = path,
            SynthBackend::Identity(b) => b.output = path,
        }
        self
    }

    /// Synthesizes `src` in `dir`: writes `rtl.v`, materializes the flow's
    /// script, invokes the tool chain, and on success leaves the netlist at
    /// [`Self::output_path`] inside `dir`.
    pub fn run(&self, src: &SourceInfo, dir: &Path) -> FuzzResult<SynthOutcome> {
        write_rtl(src, dir)?;
        match self {
            SynthBackend::Yosys(b) => b.run(dir),
            SynthBackend::Vivado(b) => b.run(src, dir),
            SynthBackend::Xst(b) => b.run(src, dir),
            SynthBackend::Identity(b) => b.run(dir),
        }
    }
}
