//! `verifuzz generate` — print one random module.

use verifuzz_gen::graph::{circuit_to_module, sample_circuit};
use verifuzz_gen::{Generator, GeneratorConfig, Seed};
use verifuzz_verilog::print_module;

use crate::{load_configuration, GenerateArgs, GlobalArgs};

/// Runs the `verifuzz generate` command.
///
/// Prints the module to stdout and the seed to stderr, so an interesting
/// module can always be regenerated.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_configuration(global)?;
    let seed = args.seed.map(Seed).unwrap_or_else(Seed::fresh);
    let size = args.size.unwrap_or(config.fuzz.size);

    let module = if args.graph {
        circuit_to_module(&sample_circuit(seed, size), "top")
    } else {
        Generator::new(GeneratorConfig {
            max_width: config.generate.max_width,
            max_ports: config.generate.max_ports,
            max_items: config.generate.max_items,
        })
        .sample(seed, size)
    };

    if !global.quiet {
        eprintln!("   Generated with seed {seed}, size {size}");
    }
    print!("{}", print_module(&module));
    Ok(0)
}
