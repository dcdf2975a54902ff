//! The iteration driver.

use crate::archive::copy_dir;
use crate::outcome::{classify, Classification, RunRecord, SimSummary};
use crate::report::ReportLog;
use rand::Rng;
use std::path::PathBuf;
use verifuzz_common::{FuzzResult, InternalError};
use verifuzz_equiv::{run_equivalence, EquivChecker};
use verifuzz_gen::{Generator, Seed, GENERATOR_VERSION};
use verifuzz_sim::{Simulator, BLOCK_BYTES, INPUT_BLOCKS};
use verifuzz_synth::SynthBackend;

/// Default number of iterations when no explicit seed pins the result.
pub const DEFAULT_ITERATIONS: u32 = 5;

/// Mixed into the module seed to derive the input-vector stream, so the
/// module and its stimulus stay independent but both replay from one seed.
const INPUT_SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-run options.
#[derive(Debug, Clone)]
pub struct FuzzOptions {
    /// Explicit seed; disables the automatic multi-run.
    pub seed: Option<Seed>,
    /// Generator size budget.
    pub size: u32,
    /// Run-folder name prefix.
    pub prefix: String,
    /// Parent directory for run folders.
    pub parent: PathBuf,
    /// Keep passing run directories instead of deleting them.
    pub keep: bool,
    /// Number of iterations when no seed is given; this is the loop's one
    /// iteration cap ([`DEFAULT_ITERATIONS`] unless configured otherwise).
    pub iterations: u32,
}

/// The fixed collaborators of a fuzz session.
pub struct FuzzContext<'a> {
    /// The module generator.
    pub generator: &'a Generator,
    /// Configured synthesizer back-ends.
    pub backends: &'a [SynthBackend],
    /// The formal equivalence checker.
    pub checker: &'a EquivChecker,
    /// The reference simulator, when one is configured.
    pub simulator: Option<&'a Simulator>,
    /// The session's report log.
    pub report: &'a ReportLog,
}

/// Runs the fuzz loop.
///
/// With no explicit seed, `opts.iterations` iterations run (by default
/// [`DEFAULT_ITERATIONS`]), each with a fresh seed. An explicit seed
/// disables the multi-run so the single result stays reproducible. A
/// failing iteration is archived and the loop continues; only an internal
/// error stops it.
pub fn fuzz_run(ctx: &FuzzContext<'_>, opts: &FuzzOptions) -> FuzzResult<Vec<RunRecord>> {
    let limit = if opts.seed.is_some() {
        1
    } else {
        opts.iterations.max(1)
    };
    let mut records = Vec::new();
    for i in 0..limit {
        records.push(fuzz_once(ctx, opts, i)?);
    }
    Ok(records)
}

/// Runs one fuzz iteration in `parent/<prefix>_<i>`.
pub fn fuzz_once(ctx: &FuzzContext<'_>, opts: &FuzzOptions, i: u32) -> FuzzResult<RunRecord> {
    let seed = opts.seed.unwrap_or_else(Seed::fresh);
    let src = ctx.generator.sample_source(seed, opts.size);

    let mut input_rng = Seed(seed.0 ^ INPUT_SEED_MIX).rng();
    let input: Vec<u8> = (0..INPUT_BLOCKS * BLOCK_BYTES)
        .map(|_| input_rng.gen())
        .collect();

    let run_dir = opts.parent.join(format!("{}_{i}", opts.prefix));
    std::fs::create_dir_all(&run_dir)
        .map_err(|e| InternalError::new(format!("cannot create {}: {e}", run_dir.display())))?;

    let equiv = run_equivalence(&src, ctx.backends, ctx.checker, &run_dir)?;
    ctx.report
        .append(&format!("{}_{i}: equiv {:?}", opts.prefix, equiv.status));

    let sim = match ctx.simulator {
        Some(simulator) => {
            let outcome = simulator.run(&src, &input, &run_dir)?;
            ctx.report
                .append(&format!("{}_{i}: sim {:?}", opts.prefix, outcome.status));
            Some(outcome)
        }
        None => None,
    };

    let classification = classify(&equiv, sim.as_ref());
    let record = RunRecord {
        seed: seed.0,
        generator_version: GENERATOR_VERSION.to_string(),
        synth_results: equiv.synth_results,
        equiv: equiv.status,
        sim: sim.map(|s| SimSummary {
            ok: s.ok(),
            output_hash: s.output_hash,
        }),
        classification,
    };

    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| InternalError::new(format!("cannot serialize run record: {e}")))?;
    std::fs::write(run_dir.join("run.json"), json)
        .map_err(|e| InternalError::new(format!("cannot write run.json: {e}")))?;

    if classification != Classification::Pass {
        let suffix = if classification == Classification::Timeout {
            "timeout"
        } else {
            "failed"
        };
        let archive = opts
            .parent
            .join(format!("{}_{i}_{suffix}", opts.prefix));
        copy_dir(&run_dir, &archive)?;
    }
    if !opts.keep {
        let _ = std::fs::remove_dir_all(&run_dir);
    }

    ctx.report
        .append(&format!("{}_{i}: {classification:?}", opts.prefix));
    Ok(record)
}
