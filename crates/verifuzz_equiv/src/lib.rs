//! Equivalence driver.
//!
//! Composes the synthesizer back-ends and the external formal-equivalence
//! checker over one source module: every back-end synthesizes in its own
//! subdirectory (in parallel, as independent OS processes), successful
//! netlists are paired against each other (the identity baseline included),
//! and each pair is handed to the checker as a miter asking for a witness
//! of difference. The run is then classified four ways: `Equiv`,
//! `Counterexample`, `Inconclusive`, or `ToolFailure`.

#![warn(missing_docs)]

pub mod checker;
pub mod driver;

pub use checker::{EquivChecker, EquivStatus};
pub use driver::{run_equivalence, EquivReport, SynthResult};
