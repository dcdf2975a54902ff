//! Text representation of the VeriFuzz Verilog subset.
//!
//! The code generator prints an AST as canonical Verilog-2005 text; the
//! lexer and parser accept that subset back. The pair satisfies the
//! round-trip law: for every well-formed module `m`,
//! `parse(print(m)) == m` up to whitespace and comments.

#![warn(missing_docs)]

pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use codegen::{print_expr, print_module, print_source};
pub use error::ParseError;
pub use parser::{parse_modules, parse_source};
