//! Reference-simulator driver.
//!
//! Drives an Icarus-class simulator through a generated testbench: each of
//! the twenty 32-byte input blocks is applied to the module's inputs, the
//! observed output bits are collected, and the concatenated output bytes
//! are hashed for the run record. For a fixed (module, simulator, input
//! vector) triple the output byte string is bit-identical across runs.

#![warn(missing_docs)]

pub mod driver;
pub mod testbench;

pub use driver::{SimOutcome, Simulator};
pub use testbench::{generate_testbench, input_assignments, BLOCK_BYTES, INPUT_BLOCKS, TB_FILE};
