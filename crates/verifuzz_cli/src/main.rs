//! VeriFuzz CLI — differential fuzzing for Verilog synthesis toolchains.
//!
//! Provides `verifuzz fuzz` to run the generate→synthesize→check→simulate
//! loop, `verifuzz generate` to print one random module, `verifuzz reduce`
//! to shrink a failing module under an external check command, and
//! `verifuzz config` to print the default configuration.

#![warn(missing_docs)]

mod fuzz;
mod generate;
mod reduce;

use std::process;

use clap::{Parser, Subcommand};

/// VeriFuzz — find Verilog synthesis and simulation miscompilations.
#[derive(Parser, Debug)]
#[command(name = "verifuzz", version, about = "VeriFuzz Verilog fuzzer")]
pub struct Cli {
    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a `verifuzz.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the fuzz loop.
    Fuzz(FuzzArgs),
    /// Generate one random module and print it.
    Generate(GenerateArgs),
    /// Reduce a failing module under an external check command.
    Reduce(ReduceArgs),
    /// Print the default configuration.
    Config,
}

/// Arguments for `verifuzz fuzz`.
#[derive(Parser, Debug)]
pub struct FuzzArgs {
    /// Explicit generator seed; pins the run to a single reproducible
    /// iteration.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of fuzz iterations (ignored when a seed is given).
    #[arg(short, long)]
    pub iterations: Option<u32>,

    /// Generator size budget.
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Parent directory for run folders.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Keep passing run directories.
    #[arg(long)]
    pub keep: bool,

    /// Run-folder name prefix.
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Arguments for `verifuzz generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Explicit generator seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Generator size budget.
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Use the structural gate-DAG generator instead of the expression
    /// generator.
    #[arg(long)]
    pub graph: bool,
}

/// Arguments for `verifuzz reduce`.
#[derive(Parser, Debug)]
pub struct ReduceArgs {
    /// The failing Verilog source file.
    pub input: String,

    /// Check command; it receives a candidate file path as its last
    /// argument and exits 0 while the candidate still fails.
    #[arg(long)]
    pub check: String,

    /// Top module name.
    #[arg(long, default_value = "top")]
    pub top: String,

    /// Where to write the reduced source (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Global flags shared by all commands.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// Suppress progress output.
    pub quiet: bool,
    /// Configuration file override.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config.clone(),
    };

    let result = match cli.command {
        Command::Fuzz(ref args) => fuzz::run(args, &global),
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Reduce(ref args) => reduce::run(args, &global),
        Command::Config => {
            print!("{}", verifuzz_config::DEFAULT_CONFIG_TOML);
            Ok(0)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

/// Loads the configuration: `--config` if given, `./verifuzz.toml` if
/// present, built-in defaults otherwise.
pub fn load_configuration(
    global: &GlobalArgs,
) -> Result<verifuzz_config::FuzzConfig, Box<dyn std::error::Error>> {
    if let Some(ref path) = global.config {
        return Ok(verifuzz_config::load_config(std::path::Path::new(path))?);
    }
    let default_path = std::path::Path::new("verifuzz.toml");
    if default_path.exists() {
        return Ok(verifuzz_config::load_config(default_path)?);
    }
    Ok(verifuzz_config::FuzzConfig::default())
}
