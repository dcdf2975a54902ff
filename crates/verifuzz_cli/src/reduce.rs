//! `verifuzz reduce` — shrink a failing module under an external check.

use std::path::PathBuf;
use std::process::Command;

use verifuzz_common::Ident;
use verifuzz_reduce::Reducer;
use verifuzz_verilog::{parse_source, print_source};

use crate::{GlobalArgs, ReduceArgs};

/// Runs the `verifuzz reduce` command.
///
/// The check command is the opaque predicate: it gets each candidate's
/// file path appended as an argument and exits 0 while the candidate still
/// exhibits the failure (typically by re-running the equivalence flow).
/// The reduced source goes to `--output`, or stdout.
pub fn run(args: &ReduceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.input)?;
    let top = Ident::new(args.top.as_str())
        .map_err(|e| format!("invalid top module name: {e}"))?;
    let src = parse_source(&text, top)?;
    verifuzz_ast::validate_source(&src).map_err(|e| format!("input is not well-formed: {e}"))?;

    let candidate_path = candidate_file(&args.input);
    let check = args.check.clone();
    let quiet = global.quiet;

    let mut reducer = Reducer::new();
    let predicate = |candidate: &verifuzz_ast::SourceInfo| -> bool {
        if std::fs::write(&candidate_path, print_source(candidate)).is_err() {
            return false;
        }
        let status = Command::new("sh")
            .arg("-c")
            .arg(format!("{check} {}", candidate_path.display()))
            .status();
        matches!(status, Ok(s) if s.success())
    };

    if !predicate(&src) {
        return Err("check command rejects the original input".into());
    }
    if !quiet {
        eprintln!("   Reducing {} ({} nodes)", args.input, src.node_count());
    }

    let reduced = reducer.reduce(predicate, &src);
    let _ = std::fs::remove_file(&candidate_path);

    if !quiet {
        eprintln!(
            "   Reduced to {} nodes in {} predicate evaluations",
            reduced.node_count(),
            reducer.evaluations()
        );
    }

    let printed = print_source(&reduced);
    match &args.output {
        Some(path) => std::fs::write(path, printed)?,
        None => print!("{printed}"),
    }
    Ok(0)
}

/// Scratch file the candidates are written to, next to the input.
fn candidate_file(input: &str) -> PathBuf {
    let mut path = PathBuf::from(input);
    path.set_extension("candidate.v");
    path
}
