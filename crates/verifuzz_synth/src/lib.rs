//! Synthesizer back-ends.
//!
//! The set of back-ends is small and closed, so it is a tagged enum rather
//! than open polymorphism: a Yosys-class script flow, a Vivado-class batch
//! TCL flow, an XST-class two-step flow with netgen re-emission, and the
//! identity back-end whose "netlist" is the source itself (the baseline for
//! equivalence comparison). Every back-end exposes the same capability set:
//! `run`, `output_path`, `with_output_path`, plus its name.

#![warn(missing_docs)]

pub mod backend;
pub mod identity;
pub mod vivado;
pub mod xst;
pub mod yosys;

pub use backend::{write_rtl, SynthBackend, SynthOutcome, RTL_FILE};
pub use identity::Identity;
pub use vivado::Vivado;
pub use xst::Xst;
pub use yosys::Yosys;
