//! Expression width inference for the generated subset.
//!
//! Widths follow IEEE 1364-2005 self-determined/context rules restricted to
//! the subset: reductions and comparisons are 1 bit, shifts and power take
//! the left operand's width, arithmetic and bitwise operators take the
//! wider operand, and a concatenation is the sum of its parts.

use crate::ast::{BinaryOp, Expr, ModuleDecl, UnaryOp};

/// Computes the natural width of `expr` inside `module`.
///
/// Returns `None` when the expression references an undeclared signal (the
/// width of an unresolved `Id` is unknowable) or contains an empty concat.
pub fn expr_width(expr: &Expr, module: &ModuleDecl) -> Option<u32> {
    match expr {
        Expr::Number { width, .. } => Some(*width),
        Expr::Id(name) => module.find_decl(name).map(|d| d.width),
        Expr::Concat(items) => {
            if items.is_empty() {
                return None;
            }
            let mut total = 0u32;
            for item in items {
                total = total.checked_add(expr_width(item, module)?)?;
            }
            Some(total)
        }
        Expr::Unary { op, operand } => match op {
            UnaryOp::LogNot
            | UnaryOp::RedAnd
            | UnaryOp::RedNand
            | UnaryOp::RedOr
            | UnaryOp::RedNor
            | UnaryOp::RedXor
            | UnaryOp::RedXnor => {
                // Self-determined operand still has to resolve.
                expr_width(operand, module).map(|_| 1)
            }
            UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => expr_width(operand, module),
        },
        Expr::Binary { left, op, right } => {
            let lw = expr_width(left, module)?;
            let rw = expr_width(right, module)?;
            match op {
                BinaryOp::Eq
                | BinaryOp::Neq
                | BinaryOp::CaseEq
                | BinaryOp::CaseNeq
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::LogAnd
                | BinaryOp::LogOr => Some(1),
                BinaryOp::Shl | BinaryOp::Shr | BinaryOp::AShl | BinaryOp::AShr | BinaryOp::Pow => {
                    Some(lw)
                }
                BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::BitXnor => Some(lw.max(rw)),
            }
        }
        Expr::Cond {
            cond,
            then_expr,
            else_expr,
        } => {
            expr_width(cond, module)?;
            let tw = expr_width(then_expr, module)?;
            let ew = expr_width(else_expr, module)?;
            Some(tw.max(ew))
        }
        Expr::SignCast { arg, .. } => expr_width(arg, module),
    }
}
