//! `verifuzz fuzz` — run the fuzz loop.

use std::path::PathBuf;

use verifuzz_equiv::EquivChecker;
use verifuzz_fuzz::{fuzz_run, Classification, FuzzContext, FuzzOptions, ReportLog};
use verifuzz_gen::{Generator, GeneratorConfig, Seed};
use verifuzz_sim::Simulator;
use verifuzz_synth::SynthBackend;

use crate::{load_configuration, FuzzArgs, GlobalArgs};

/// Runs the `verifuzz fuzz` command.
///
/// Builds the generator, back-ends, checker, and simulator from the
/// configuration (CLI flags override), then drives the loop for the
/// configured number of iterations — or a single reproducible run when a
/// seed is given. Returns exit code 0 when every run passed, 1 otherwise.
pub fn run(args: &FuzzArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_configuration(global)?;

    let generator = Generator::new(GeneratorConfig {
        max_width: config.generate.max_width,
        max_ports: config.generate.max_ports,
        max_items: config.generate.max_items,
    });

    let backends: Vec<SynthBackend> = config
        .synth
        .iter()
        .map(|(name, entry)| SynthBackend::from_config(name, entry))
        .collect();

    let simulator = config
        .sim
        .iter()
        .next()
        .map(|(name, entry)| Simulator::new(name, entry.path.as_deref(), entry.timeout_secs));

    let checker = EquivChecker::from_config(&config.equiv);

    let parent = PathBuf::from(
        args.output
            .clone()
            .unwrap_or_else(|| config.fuzz.output_dir.clone()),
    );
    std::fs::create_dir_all(&parent)?;
    let report = ReportLog::open(&parent.join("fuzz.log"))?;

    let ctx = FuzzContext {
        generator: &generator,
        backends: &backends,
        checker: &checker,
        simulator: simulator.as_ref(),
        report: &report,
    };

    let seed = args.seed.map(Seed);
    let size = args.size.unwrap_or(config.fuzz.size);
    let prefix = args.prefix.clone().unwrap_or_else(|| config.fuzz.prefix.clone());
    let keep = args.keep || config.fuzz.keep;
    let iterations = args.iterations.unwrap_or(config.fuzz.iterations);

    if !global.quiet {
        eprintln!("   Fuzzing {} (size {size})", parent.join(&prefix).display());
    }
    let options = FuzzOptions {
        seed,
        size,
        prefix,
        parent: parent.clone(),
        keep,
        iterations,
    };

    let mut failures = 0usize;
    let mut total = 0usize;
    for record in fuzz_run(&ctx, &options)? {
        total += 1;
        if record.classification != Classification::Pass {
            failures += 1;
            if !global.quiet {
                eprintln!(
                    "   Mismatch seed {} classified {:?}",
                    record.seed, record.classification
                );
            }
        }
    }

    if !global.quiet {
        eprintln!("   Finished {total} runs, {failures} failing");
    }
    Ok(if failures == 0 { 0 } else { 1 })
}
