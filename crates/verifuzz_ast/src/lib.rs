//! Typed representation of the Verilog subset generated by VeriFuzz.
//!
//! The model is a closed set of algebraic shapes: declarations, expressions,
//! continuous assignments, modules, and the [`SourceInfo`] pair naming the
//! device under test. All values are immutable trees after construction and
//! are deeply comparable and hashable, which the reducer relies on for
//! deduplication. The model defines no I/O; printing and parsing live in
//! `verifuzz_verilog`.

#![warn(missing_docs)]

pub mod ast;
pub mod validate;
pub mod width;

pub use ast::{
    BinaryOp, ContinuousAssign, Decl, Expr, ModuleDecl, ModuleItem, NetType, PortDirection,
    SourceInfo, UnaryOp,
};
pub use validate::{validate_module, validate_source, Violation};
pub use width::expr_width;
