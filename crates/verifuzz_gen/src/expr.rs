//! Size-budgeted random expression generation.
//!
//! Every expression is generated against a target width, so the produced
//! tree is width-consistent without a separate checking pass. The recursion
//! budget strictly decreases; depth 0 forces a leaf. Division and modulo
//! right operands are never bare expressions: they are either non-zero
//! literals or an arbitrary expression ORed with 1, which keeps X out of
//! the simulation results. Shift and power right operands are kept narrow
//! so every simulator and synthesizer agrees on the semantics.

use num_bigint::BigUint;
use num_traits::One;
use rand::rngs::StdRng;
use rand::Rng;
use verifuzz_ast::{BinaryOp, Decl, Expr, UnaryOp};

/// Maximum width of a shift or power right operand, in bits.
const SHIFT_OPERAND_WIDTH: u32 = 4;

/// Expression generator over a fixed scope of declared signals.
pub struct ExprGen<'a> {
    rng: &'a mut StdRng,
    scope: &'a [Decl],
    max_width: u32,
}

impl<'a> ExprGen<'a> {
    /// Creates a generator drawing identifiers from `scope`.
    pub fn new(rng: &'a mut StdRng, scope: &'a [Decl], max_width: u32) -> Self {
        Self {
            rng,
            scope,
            max_width: max_width.max(1),
        }
    }

    /// Generates an expression of exactly `width` bits with recursion depth
    /// at most `depth`.
    pub fn gen_expr(&mut self, depth: u32, width: u32) -> Expr {
        let width = width.max(1);
        if depth == 0 {
            return self.gen_leaf(width);
        }

        // Weighted constructor choice; leaves stay rare while budget remains.
        let roll = self.rng.gen_range(0u32..16);
        match roll {
            0..=1 => self.gen_leaf(width),
            2..=4 => self.gen_unary(depth, width),
            5..=9 => self.gen_binary(depth, width),
            10..=11 => self.gen_concat(depth, width),
            12..=13 => self.gen_cond(depth, width),
            _ => self.gen_cast(depth, width),
        }
    }

    fn gen_leaf(&mut self, width: u32) -> Expr {
        // Prefer an in-scope signal of the exact width; otherwise a literal.
        let candidates: Vec<&Decl> = self.scope.iter().filter(|d| d.width == width).collect();
        if !candidates.is_empty() && self.rng.gen_bool(0.75) {
            let pick = self.rng.gen_range(0..candidates.len());
            return Expr::Id(candidates[pick].name.clone());
        }
        self.gen_number(width)
    }

    /// Generates a literal of exactly `width` random bits.
    fn gen_number(&mut self, width: u32) -> Expr {
        let bytes: Vec<u8> = (0..width.div_ceil(8)).map(|_| self.rng.gen()).collect();
        Expr::number(width, BigUint::from_bytes_le(&bytes))
    }

    /// Generates a literal guaranteed non-zero, for divisor positions.
    fn gen_nonzero_number(&mut self, width: u32) -> Expr {
        let e = self.gen_number(width);
        if e.is_zero_literal() {
            Expr::number(width, BigUint::one())
        } else {
            e
        }
    }

    fn gen_unary(&mut self, depth: u32, width: u32) -> Expr {
        if width == 1 && self.rng.gen_bool(0.5) {
            // Reductions and logical NOT produce exactly one bit.
            let op = match self.rng.gen_range(0u32..8) {
                0 => UnaryOp::LogNot,
                1 => UnaryOp::RedAnd,
                2 => UnaryOp::RedNand,
                3 => UnaryOp::RedOr,
                4 => UnaryOp::RedNor,
                5 => UnaryOp::RedXor,
                6 => UnaryOp::RedXnor,
                _ => UnaryOp::LogNot,
            };
            let operand_width = self.rng.gen_range(1..=self.max_width);
            return Expr::Unary {
                op,
                operand: Box::new(self.gen_expr(depth - 1, operand_width)),
            };
        }
        let op = match self.rng.gen_range(0u32..3) {
            0 => UnaryOp::Plus,
            1 => UnaryOp::Minus,
            _ => UnaryOp::BitNot,
        };
        Expr::Unary {
            op,
            operand: Box::new(self.gen_expr(depth - 1, width)),
        }
    }

    fn gen_binary(&mut self, depth: u32, width: u32) -> Expr {
        if width == 1 && self.rng.gen_bool(0.4) {
            return self.gen_comparison(depth);
        }

        let roll = self.rng.gen_range(0u32..12);
        let op = match roll {
            0 => BinaryOp::Add,
            1 => BinaryOp::Sub,
            2 => BinaryOp::Mul,
            3 => BinaryOp::Div,
            4 => BinaryOp::Mod,
            5 => BinaryOp::Pow,
            6 => BinaryOp::BitAnd,
            7 => BinaryOp::BitOr,
            8 => BinaryOp::BitXor,
            9 => BinaryOp::BitXnor,
            10 => BinaryOp::Shl,
            _ => match self.rng.gen_range(0u32..3) {
                0 => BinaryOp::Shr,
                1 => BinaryOp::AShl,
                _ => BinaryOp::AShr,
            },
        };

        let left = self.gen_expr(depth - 1, width);
        let right = match op {
            BinaryOp::Div | BinaryOp::Mod => self.gen_divisor(depth, width),
            BinaryOp::Pow => self.gen_nonzero_number(2),
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::AShl | BinaryOp::AShr => {
                self.gen_expr(depth - 1, SHIFT_OPERAND_WIDTH.min(self.max_width))
            }
            _ => self.gen_expr(depth - 1, width),
        };
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// One-bit relational/equality/logical operators over same-width operands.
    fn gen_comparison(&mut self, depth: u32) -> Expr {
        let op = match self.rng.gen_range(0u32..10) {
            0 => BinaryOp::Eq,
            1 => BinaryOp::Neq,
            2 => BinaryOp::CaseEq,
            3 => BinaryOp::CaseNeq,
            4 => BinaryOp::Lt,
            5 => BinaryOp::Le,
            6 => BinaryOp::Gt,
            7 => BinaryOp::Ge,
            8 => BinaryOp::LogAnd,
            _ => BinaryOp::LogOr,
        };
        let operand_width = self.rng.gen_range(1..=self.max_width);
        Expr::Binary {
            left: Box::new(self.gen_expr(depth - 1, operand_width)),
            op,
            right: Box::new(self.gen_expr(depth - 1, operand_width)),
        }
    }

    /// Division-safe right operand: a non-zero literal, or `(e | 1)`.
    fn gen_divisor(&mut self, depth: u32, width: u32) -> Expr {
        if self.rng.gen_bool(0.5) {
            self.gen_nonzero_number(width)
        } else {
            Expr::Binary {
                left: Box::new(self.gen_expr(depth - 1, width)),
                op: BinaryOp::BitOr,
                right: Box::new(Expr::number(width, BigUint::one())),
            }
        }
    }

    /// Concatenation partitioning the target width across children.
    fn gen_concat(&mut self, depth: u32, width: u32) -> Expr {
        let max_parts = width.min(4);
        if max_parts < 2 {
            return self.gen_leaf(width);
        }
        let parts = self.rng.gen_range(2..=max_parts);
        let mut remaining = width;
        let mut items = Vec::with_capacity(parts as usize);
        for i in 0..parts {
            let left_after = parts - i - 1;
            // Leave at least one bit for each remaining child.
            let part = if left_after == 0 {
                remaining
            } else {
                self.rng.gen_range(1..=remaining - left_after)
            };
            items.push(self.gen_expr(depth - 1, part));
            remaining -= part;
        }
        Expr::Concat(items)
    }

    fn gen_cond(&mut self, depth: u32, width: u32) -> Expr {
        Expr::Cond {
            cond: Box::new(self.gen_expr(depth - 1, 1)),
            then_expr: Box::new(self.gen_expr(depth - 1, width)),
            else_expr: Box::new(self.gen_expr(depth - 1, width)),
        }
    }

    fn gen_cast(&mut self, depth: u32, width: u32) -> Expr {
        let signed = self.rng.gen_bool(0.5);
        Expr::SignCast {
            signed,
            arg: Box::new(self.gen_expr(depth - 1, width)),
        }
    }
}
