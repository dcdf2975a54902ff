//! Configuration types deserialized from `verifuzz.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The default configuration, as printed by `verifuzz config`.
///
/// Loading this text yields the same values as the `Default` impls.
pub const DEFAULT_CONFIG_TOML: &str = r#"[fuzz]
iterations = 5
size = 5
output_dir = "fuzz_out"
prefix = "run"
keep = false

[generate]
max_width = 16
max_ports = 6
max_items = 12

[synth.yosys]
kind = "yosys"
path = "yosys"
timeout_secs = 60

[sim.iverilog]
path = "iverilog"
timeout_secs = 60

[equiv]
path = "yosys"
timeout_secs = 120
"#;

/// The top-level configuration parsed from `verifuzz.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct FuzzConfig {
    /// Fuzz-loop caps and run-folder policy.
    #[serde(default)]
    pub fuzz: FuzzSection,
    /// Generator bounds.
    #[serde(default)]
    pub generate: GenerateSection,
    /// Named synthesizer back-ends (e.g., `[synth.yosys]`).
    #[serde(default)]
    pub synth: BTreeMap<String, SynthToolConfig>,
    /// Named simulators; the first entry is the reference simulator.
    #[serde(default)]
    pub sim: BTreeMap<String, SimToolConfig>,
    /// Formal equivalence checker settings.
    #[serde(default)]
    pub equiv: EquivConfig,
}

/// Fuzz-loop settings.
#[derive(Debug, Deserialize)]
pub struct FuzzSection {
    /// Number of fuzz iterations; an explicit seed pins a session to one.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Generator size budget (expression depth / item bound).
    #[serde(default = "default_size")]
    pub size: u32,
    /// Parent directory for run folders.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Run-folder name prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Keep run directories for passing runs instead of deleting them.
    #[serde(default)]
    pub keep: bool,
}

impl Default for FuzzSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            size: default_size(),
            output_dir: default_output_dir(),
            prefix: default_prefix(),
            keep: false,
        }
    }
}

/// Generator bounds, mirrored into `verifuzz_gen::GeneratorConfig`.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct GenerateSection {
    /// Maximum net width in bits.
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    /// Maximum number of input ports.
    #[serde(default = "default_max_ports")]
    pub max_ports: u32,
    /// Maximum number of local wires per module.
    #[serde(default = "default_max_items")]
    pub max_items: u32,
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            max_ports: default_max_ports(),
            max_items: default_max_items(),
        }
    }
}

/// Which synthesis flow a `[synth.<name>]` entry drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthKind {
    /// Yosys-class open synthesizer driven by a script file.
    Yosys,
    /// Vivado-class vendor synthesizer driven by a batch TCL script.
    Vivado,
    /// XST-class legacy two-step flow (synthesis + netgen re-emission).
    Xst,
    /// Pass-through back-end whose netlist is the source itself.
    Identity,
}

/// One synthesizer back-end entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthToolConfig {
    /// The flow this entry drives.
    pub kind: SynthKind,
    /// Path to the main executable. Defaults to the kind's usual binary name.
    #[serde(default)]
    pub path: Option<String>,
    /// Path to the companion netlister (XST's `netgen`).
    #[serde(default)]
    pub netgen_path: Option<String>,
    /// Output netlist filename. Defaults to `syn_<name>.v`.
    #[serde(default)]
    pub output: Option<String>,
    /// Per-invocation timeout in seconds.
    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,
}

/// One simulator entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SimToolConfig {
    /// Path to the simulator executable.
    #[serde(default)]
    pub path: Option<String>,
    /// Per-invocation timeout in seconds.
    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,
}

/// Equivalence checker settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EquivConfig {
    /// Path to the checker executable.
    #[serde(default = "default_equiv_path")]
    pub path: String,
    /// Per-check timeout in seconds.
    #[serde(default = "default_equiv_timeout")]
    pub timeout_secs: u64,
}

impl Default for EquivConfig {
    fn default() -> Self {
        Self {
            path: default_equiv_path(),
            timeout_secs: default_equiv_timeout(),
        }
    }
}

fn default_iterations() -> u32 {
    5
}

fn default_size() -> u32 {
    5
}

fn default_output_dir() -> String {
    "fuzz_out".to_string()
}

fn default_prefix() -> String {
    "run".to_string()
}

fn default_max_width() -> u32 {
    16
}

fn default_max_ports() -> u32 {
    6
}

fn default_max_items() -> u32 {
    12
}

fn default_tool_timeout() -> u64 {
    60
}

fn default_equiv_path() -> String {
    "yosys".to_string()
}

fn default_equiv_timeout() -> u64 {
    120
}
