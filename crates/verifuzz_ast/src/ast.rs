//! AST node types for the generated Verilog subset.
//!
//! Nodes carry no source spans: values originate from the generator, not
//! from source text, and the round-trip law `parse(print(m)) == m` requires
//! structural equality between printed-then-parsed trees and originals.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use verifuzz_common::Ident;

// ============================================================================
// Declarations
// ============================================================================

/// Port or signal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

/// Net storage keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetType {
    /// `wire`
    Wire,
    /// `reg`
    Reg,
}

/// A net declaration item (e.g., `input wire [7:0] a;` or `wire [3:0] w0;`).
///
/// A declaration with `direction: Some(..)` is a port declaration; the
/// module header lists port names only (non-ANSI style) and the full record
/// lives here. A declaration with `direction: None` is a module-local net.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decl {
    /// Port direction, or `None` for a module-local net.
    pub direction: Option<PortDirection>,
    /// The storage keyword.
    pub net_type: NetType,
    /// Whether the net is `signed`.
    pub signed: bool,
    /// Width in bits, at least 1.
    pub width: u32,
    /// The declared name.
    pub name: Ident,
}

// ============================================================================
// Expressions
// ============================================================================

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `+` (unary plus)
    Plus,
    /// `-` (unary minus)
    Minus,
    /// `!` (logical NOT)
    LogNot,
    /// `~` (bitwise NOT)
    BitNot,
    /// `&` (reduction AND)
    RedAnd,
    /// `~&` (reduction NAND)
    RedNand,
    /// `|` (reduction OR)
    RedOr,
    /// `~|` (reduction NOR)
    RedNor,
    /// `^` (reduction XOR)
    RedXor,
    /// `~^` (reduction XNOR)
    RedXnor,
}

/// A binary operator.
///
/// `Le`/`Ge` and `CaseEq`/`CaseNeq` are distinct operators end to end; on
/// the generated two-state subset case equality agrees with plain equality
/// for every tool in the chain, so both spellings are safe to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `===`
    CaseEq,
    /// `!==`
    CaseNeq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    LogAnd,
    /// `||`
    LogOr,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `~^`
    BitXnor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `<<<`
    AShl,
    /// `>>>`
    AShr,
}

/// An expression in the generated subset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// A sized numeric literal, value truncated to `width` bits.
    Number {
        /// Width in bits, at least 1.
        width: u32,
        /// The literal value, already reduced modulo 2^width.
        value: BigUint,
    },
    /// A reference to an in-scope declared signal.
    Id(Ident),
    /// A concatenation (e.g., `{a, 2'h3, b}`); never empty.
    Concat(Vec<Expr>),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A ternary conditional (right-associative when nested).
    Cond {
        /// The condition.
        cond: Box<Expr>,
        /// Value when the condition is true.
        then_expr: Box<Expr>,
        /// Value when the condition is false.
        else_expr: Box<Expr>,
    },
    /// A `$signed(..)` or `$unsigned(..)` cast.
    SignCast {
        /// True for `$signed`, false for `$unsigned`.
        signed: bool,
        /// The cast argument.
        arg: Box<Expr>,
    },
}

impl Expr {
    /// Builds a sized literal, truncating `value` to `width` bits.
    ///
    /// `width` must be at least 1; a zero width is clamped to 1 so the
    /// constructor can never produce an ill-formed node.
    pub fn number(width: u32, value: BigUint) -> Self {
        let width = width.max(1);
        let value = value % (BigUint::one() << width);
        Expr::Number { width, value }
    }

    /// Builds a sized literal from a `u64` value.
    pub fn number_u64(width: u32, value: u64) -> Self {
        Self::number(width, BigUint::from(value))
    }

    /// The neutral constant used when a subtree is reduced away.
    pub fn zero(width: u32) -> Self {
        Expr::Number {
            width: width.max(1),
            value: BigUint::zero(),
        }
    }

    /// Returns true if this is a literal with value zero.
    pub fn is_zero_literal(&self) -> bool {
        matches!(self, Expr::Number { value, .. } if value.is_zero())
    }

    /// Returns the direct children of this expression, outermost first.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Number { .. } | Expr::Id(_) => Vec::new(),
            Expr::Concat(items) => items.iter().collect(),
            Expr::Unary { operand, .. } => vec![operand.as_ref()],
            Expr::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::Cond {
                cond,
                then_expr,
                else_expr,
            } => vec![cond.as_ref(), then_expr.as_ref(), else_expr.as_ref()],
            Expr::SignCast { arg, .. } => vec![arg.as_ref()],
        }
    }

    /// Counts the nodes in this expression tree.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }
}

// ============================================================================
// Module items
// ============================================================================

/// A continuous assignment (e.g., `assign y = a & b;`).
///
/// The target is always a plain declared wire; the subset has no part
/// selects on assignment targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContinuousAssign {
    /// The assigned wire.
    pub target: Ident,
    /// The driving expression.
    pub value: Expr,
}

/// An item in a module body: a declaration or a continuous assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleItem {
    /// A port or local net declaration.
    Decl(Decl),
    /// A continuous assignment.
    Assign(ContinuousAssign),
}

impl ModuleItem {
    /// Counts the nodes in this item.
    pub fn node_count(&self) -> usize {
        match self {
            ModuleItem::Decl(_) => 1,
            ModuleItem::Assign(ca) => 1 + ca.value.node_count(),
        }
    }
}

// ============================================================================
// Modules
// ============================================================================

/// A module declaration: name, ordered port list, ordered body items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleDecl {
    /// The module name.
    pub name: Ident,
    /// Ordered port names; each has exactly one matching declaration item.
    pub ports: Vec<Ident>,
    /// Ordered body items.
    pub items: Vec<ModuleItem>,
}

impl ModuleDecl {
    /// Iterates over all declaration items.
    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Decl(d) => Some(d),
            ModuleItem::Assign(_) => None,
        })
    }

    /// Iterates over all continuous assignments.
    pub fn assigns(&self) -> impl Iterator<Item = &ContinuousAssign> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Assign(ca) => Some(ca),
            ModuleItem::Decl(_) => None,
        })
    }

    /// Looks up the declaration of `name`, if any.
    pub fn find_decl(&self, name: &Ident) -> Option<&Decl> {
        self.decls().find(|d| &d.name == name)
    }

    /// Iterates over input port declarations in port-list order.
    pub fn input_ports(&self) -> Vec<&Decl> {
        self.ports
            .iter()
            .filter_map(|p| self.find_decl(p))
            .filter(|d| d.direction == Some(PortDirection::Input))
            .collect()
    }

    /// Iterates over output port declarations in port-list order.
    pub fn output_ports(&self) -> Vec<&Decl> {
        self.ports
            .iter()
            .filter_map(|p| self.find_decl(p))
            .filter(|d| d.direction == Some(PortDirection::Output))
            .collect()
    }

    /// Counts the nodes in this module (one per declaration, one per
    /// assignment plus its expression tree).
    pub fn node_count(&self) -> usize {
        1 + self.items.iter().map(|i| i.node_count()).sum::<usize>()
    }
}

// ============================================================================
// Source info
// ============================================================================

/// A non-empty list of module declarations plus the name of the device
/// under test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    /// The name of the top module.
    pub top: Ident,
    /// The module declarations, in source order.
    pub modules: Vec<ModuleDecl>,
}

impl SourceInfo {
    /// Wraps a single module as a complete source with itself as top.
    pub fn single(module: ModuleDecl) -> Self {
        Self {
            top: module.name.clone(),
            modules: vec![module],
        }
    }

    /// Returns the top module, if the name resolves.
    pub fn top_module(&self) -> Option<&ModuleDecl> {
        self.modules.iter().find(|m| m.name == self.top)
    }

    /// Counts the nodes across all modules.
    pub fn node_count(&self) -> usize {
        self.modules.iter().map(|m| m.node_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Ident {
        Ident::new(s).unwrap()
    }

    #[test]
    fn number_truncates_to_width() {
        let e = Expr::number_u64(4, 0x1f);
        match e {
            Expr::Number { width, value } => {
                assert_eq!(width, 4);
                assert_eq!(value, BigUint::from(0xfu32));
            }
            _ => panic!("expected Number"),
        }
    }

    #[test]
    fn number_clamps_zero_width() {
        let e = Expr::number_u64(0, 1);
        match e {
            Expr::Number { width, value } => {
                assert_eq!(width, 1);
                assert_eq!(value, BigUint::from(1u32));
            }
            _ => panic!("expected Number"),
        }
    }

    #[test]
    fn zero_literal_detection() {
        assert!(Expr::zero(8).is_zero_literal());
        assert!(!Expr::number_u64(8, 3).is_zero_literal());
        assert!(!Expr::Id(id("a")).is_zero_literal());
    }

    #[test]
    fn node_count_counts_subtrees() {
        let e = Expr::Binary {
            left: Box::new(Expr::Id(id("a"))),
            op: BinaryOp::Add,
            right: Box::new(Expr::Unary {
                op: UnaryOp::BitNot,
                operand: Box::new(Expr::Id(id("b"))),
            }),
        };
        assert_eq!(e.node_count(), 4);
    }

    #[test]
    fn deep_equality_and_hash() {
        use std::collections::HashSet;
        let a = Expr::number_u64(8, 42);
        let b = Expr::number_u64(8, 42);
        assert_eq!(a, b);
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn module_port_lookup() {
        let m = ModuleDecl {
            name: id("top"),
            ports: vec![id("a"), id("y")],
            items: vec![
                ModuleItem::Decl(Decl {
                    direction: Some(PortDirection::Input),
                    net_type: NetType::Wire,
                    signed: false,
                    width: 4,
                    name: id("a"),
                }),
                ModuleItem::Decl(Decl {
                    direction: Some(PortDirection::Output),
                    net_type: NetType::Wire,
                    signed: false,
                    width: 1,
                    name: id("y"),
                }),
                ModuleItem::Assign(ContinuousAssign {
                    target: id("y"),
                    value: Expr::Unary {
                        op: UnaryOp::RedXor,
                        operand: Box::new(Expr::Id(id("a"))),
                    },
                }),
            ],
        };
        assert_eq!(m.input_ports().len(), 1);
        assert_eq!(m.output_ports().len(), 1);
        assert_eq!(m.find_decl(&id("a")).unwrap().width, 4);
        assert!(m.find_decl(&id("missing")).is_none());
        assert_eq!(m.node_count(), 5);
    }

    #[test]
    fn source_info_top_resolution() {
        let m = ModuleDecl {
            name: id("top"),
            ports: Vec::new(),
            items: Vec::new(),
        };
        let src = SourceInfo::single(m);
        assert_eq!(src.top_module().unwrap().name, id("top"));
    }

    #[test]
    fn serde_roundtrip_source() {
        let m = ModuleDecl {
            name: id("top"),
            ports: vec![id("y")],
            items: vec![ModuleItem::Decl(Decl {
                direction: Some(PortDirection::Output),
                net_type: NetType::Wire,
                signed: false,
                width: 1,
                name: id("y"),
            })],
        };
        let src = SourceInfo::single(m);
        let json = serde_json::to_string(&src).unwrap();
        let back: SourceInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(src, back);
    }
}
