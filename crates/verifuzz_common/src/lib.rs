//! Shared foundational types used across the VeriFuzz fuzzing engine.
//!
//! This crate provides core types including validated Verilog identifiers,
//! content hashing for memoization and output fingerprinting, and the common
//! result type for internal errors.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, InvalidIdent};
pub use result::{FuzzResult, InternalError};
