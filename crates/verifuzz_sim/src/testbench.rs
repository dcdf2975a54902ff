//! Deterministic testbench generation.
//!
//! The testbench is pure text computed from the module interface and the
//! input vector: every block's port values are pre-sliced here and emitted
//! as literal assignments, so the simulator needs no plusargs, no memory
//! files, and no randomness of its own.

use num_bigint::BigUint;
use num_traits::One;
use std::fmt::Write;
use verifuzz_ast::{Decl, ModuleDecl};
use verifuzz_common::Ident;

/// Number of input blocks applied per simulation.
pub const INPUT_BLOCKS: usize = 20;

/// Bytes per input block.
pub const BLOCK_BYTES: usize = 32;

/// Testbench filename written next to `rtl.v`.
pub const TB_FILE: &str = "tb.v";

/// Slices one input block into per-port values, in port-list order.
///
/// Ports consume bits little-endian-first from the block; a block always
/// holds enough bits because the generator bounds the total input width.
pub fn input_assignments(module: &ModuleDecl, block: &[u8]) -> Vec<(Ident, u32, BigUint)> {
    let bits = BigUint::from_bytes_le(block);
    let mut offset = 0u32;
    let mut out = Vec::new();
    for port in module.input_ports() {
        let mask = (BigUint::one() << port.width) - BigUint::one();
        let value = (&bits >> offset) & mask;
        out.push((port.name.clone(), port.width, value));
        offset += port.width;
    }
    out
}

/// Generates the complete testbench text for `module` over `input`.
///
/// `input` is the concatenation of [`INPUT_BLOCKS`] blocks of
/// [`BLOCK_BYTES`] bytes. Each block is applied in sequence and the
/// device's output is displayed in hex, one line per block.
pub fn generate_testbench(module: &ModuleDecl, input: &[u8]) -> String {
    let mut tb = String::new();
    let _ = writeln!(tb, "module tb;");

    for port in module.input_ports() {
        if port.width > 1 {
            let _ = writeln!(tb, "  reg [{}:0] {};", port.width - 1, port.name);
        } else {
            let _ = writeln!(tb, "  reg {};", port.name);
        }
    }
    for port in module.output_ports() {
        if port.width > 1 {
            let _ = writeln!(tb, "  wire [{}:0] {};", port.width - 1, port.name);
        } else {
            let _ = writeln!(tb, "  wire {};", port.name);
        }
    }

    let _ = write!(tb, "  {} dut (", module.name);
    let mut first = true;
    for port in module.input_ports().iter().chain(module.output_ports().iter()) {
        if !first {
            tb.push_str(", ");
        }
        first = false;
        let _ = write!(tb, ".{}({})", port.name, port.name);
    }
    tb.push_str(");\n");

    let _ = writeln!(tb, "  initial begin");
    for block in input.chunks(BLOCK_BYTES).take(INPUT_BLOCKS) {
        for (name, width, value) in input_assignments(module, block) {
            let _ = writeln!(tb, "    {name} = {width}'h{value:x};");
        }
        let _ = writeln!(tb, "    #10;");
        for port in module.output_ports() {
            let _ = writeln!(tb, "    $display(\"%h\", {});", port.name);
        }
    }
    let _ = writeln!(tb, "    $finish;");
    let _ = writeln!(tb, "  end");
    let _ = writeln!(tb, "endmodule");
    tb
}

/// Extracts the observed output bytes from simulator stdout.
///
/// Expects one hex line per applied block per output port; each line is
/// decoded to the port's byte width, little-endian, and the results are
/// concatenated. Returns `None` when a line fails to decode (an `x`/`z`
/// bit would show up here, and the subset forbids producing one).
pub fn parse_output(module: &ModuleDecl, stdout: &str) -> Option<Vec<u8>> {
    let outputs: Vec<&Decl> = module.output_ports();
    if outputs.is_empty() {
        return Some(Vec::new());
    }
    let mut bytes = Vec::new();
    let mut lines = stdout.lines().filter(|l| !l.trim().is_empty());
    for _ in 0..INPUT_BLOCKS {
        for port in &outputs {
            let line = lines.next()?;
            let value = BigUint::parse_bytes(line.trim().as_bytes(), 16)?;
            let width_bytes = (port.width as usize).div_ceil(8);
            let mut le = value.to_bytes_le();
            if le.len() > width_bytes {
                return None;
            }
            le.resize(width_bytes, 0);
            bytes.extend_from_slice(&le);
        }
    }
    Some(bytes)
}
