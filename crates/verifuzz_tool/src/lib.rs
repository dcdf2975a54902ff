//! Uniform invocation of external synthesis and simulation binaries.
//!
//! Every vendor tool in the chain is driven through [`invoke`]: blocking
//! execution in a per-run working directory, a hard per-invocation timeout,
//! captured stdout/stderr teed to a log file, and an outcome taxonomy that
//! treats failures as classified values rather than errors. Vendor tools
//! wedge often, so timeouts are a first-class outcome, distinct from
//! crashes and content failures.

#![warn(missing_docs)]

pub mod runner;

pub use runner::{invoke, Invocation, ToolOutput, ToolStatus};
