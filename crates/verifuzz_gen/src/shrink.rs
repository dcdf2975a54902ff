//! One-step shrinking for generated values.
//!
//! Every constructor exposes strictly-smaller alternatives: literals move
//! toward zero (by value and by width), identifiers move toward the
//! lexicographically smallest in-scope name of the same width, compound
//! expressions collapse to a child or to a zero literal, module bodies drop
//! signals that nothing references, and port lists drop unused ports.
//! Candidates that would violate a subset invariant are filtered out here,
//! so callers only ever see well-formed alternatives. The induced shrink
//! tree is finite: each alternative strictly decreases the measure
//! (node count, then total literal value, then name order).

use num_bigint::BigUint;
use num_traits::Zero;
use verifuzz_ast::{
    validate_module, validate_source, Expr, ModuleDecl, ModuleItem, PortDirection, SourceInfo,
    expr_width,
};
use verifuzz_common::Ident;

/// Enumerates the one-step shrinks of an expression inside `module`.
pub fn shrink_expr(expr: &Expr, module: &ModuleDecl) -> Vec<Expr> {
    let mut out = Vec::new();

    match expr {
        Expr::Number { width, value } => {
            if !value.is_zero() {
                out.push(Expr::zero(*width));
                let halved = value >> 1u32;
                if !halved.is_zero() {
                    out.push(Expr::number(*width, halved));
                }
            }
            if *width > 1 {
                out.push(Expr::number(*width - 1, value.clone()));
            }
        }
        Expr::Id(name) => {
            if let Some(width) = module.find_decl(name).map(|d| d.width) {
                let smallest = module
                    .decls()
                    .filter(|d| d.width == width && d.name < *name)
                    .map(|d| d.name.clone())
                    .min();
                if let Some(smaller) = smallest {
                    out.push(Expr::Id(smaller));
                }
            }
        }
        _ => {
            // Collapse to a child, or to a zero literal of the same width.
            for child in expr.children() {
                out.push(child.clone());
            }
            if let Some(width) = expr_width(expr, module) {
                out.push(Expr::zero(width));
            }
            // Rebuild with one child shrunk one step.
            out.extend(shrink_children(expr, module));
        }
    }

    out
}

/// Rebuilds `expr` once per one-step shrink of each child.
fn shrink_children(expr: &Expr, module: &ModuleDecl) -> Vec<Expr> {
    let children = expr.children();
    let mut out = Vec::new();
    for (i, child) in children.iter().enumerate() {
        for alt in shrink_expr(child, module) {
            out.push(replace_child(expr, i, alt));
        }
    }
    out
}

fn replace_child(expr: &Expr, index: usize, new_child: Expr) -> Expr {
    let mut clone = expr.clone();
    match &mut clone {
        Expr::Concat(items) => items[index] = new_child,
        Expr::Unary { operand, .. } => *operand = Box::new(new_child),
        Expr::Binary { left, right, .. } => {
            if index == 0 {
                *left = Box::new(new_child);
            } else {
                *right = Box::new(new_child);
            }
        }
        Expr::Cond {
            cond,
            then_expr,
            else_expr,
        } => match index {
            0 => *cond = Box::new(new_child),
            1 => *then_expr = Box::new(new_child),
            _ => *else_expr = Box::new(new_child),
        },
        Expr::SignCast { arg, .. } => *arg = Box::new(new_child),
        Expr::Number { .. } | Expr::Id(_) => {}
    }
    clone
}

/// Enumerates the one-step shrinks of a module. All results are well-formed.
pub fn shrink_module(module: &ModuleDecl) -> Vec<ModuleDecl> {
    let mut out = Vec::new();

    // Signals referenced by some assignment's RHS.
    let mut referenced = std::collections::HashSet::new();
    for ca in module.assigns() {
        collect_ids(&ca.value, &mut referenced);
    }

    // Drop signals nothing reads: the declaration, its driving assignment
    // (if any), and its port-list entry (if it is a port).
    for decl in module.decls() {
        if referenced.contains(&decl.name) {
            continue;
        }
        if decl.direction == Some(PortDirection::Output) && module.ports.len() == 1 {
            // Keep the last port so the module still has an interface.
            continue;
        }
        let mut m = module.clone();
        m.items.retain(|item| match item {
            ModuleItem::Decl(d) => d.name != decl.name,
            ModuleItem::Assign(ca) => ca.target != decl.name,
        });
        m.ports.retain(|p| p != &decl.name);
        out.push(m);
    }

    // Shrink each assignment's expression one step.
    for (i, item) in module.items.iter().enumerate() {
        let ModuleItem::Assign(ca) = item else {
            continue;
        };
        for alt in shrink_expr(&ca.value, module) {
            let mut m = module.clone();
            m.items[i] = ModuleItem::Assign(verifuzz_ast::ContinuousAssign {
                target: ca.target.clone(),
                value: alt,
            });
            out.push(m);
        }
    }

    out.retain(|m| validate_module(m).is_ok());
    out
}

/// Enumerates the one-step shrinks of a complete source. All results are
/// well-formed.
pub fn shrink_source(src: &SourceInfo) -> Vec<SourceInfo> {
    let mut out = Vec::new();

    // Drop whole non-top modules (the subset has no instantiation, so a
    // non-top module is never referenced).
    if src.modules.len() > 1 {
        for (i, m) in src.modules.iter().enumerate() {
            if m.name == src.top {
                continue;
            }
            let mut s = src.clone();
            s.modules.remove(i);
            out.push(s);
        }
    }

    for (i, module) in src.modules.iter().enumerate() {
        for alt in shrink_module(module) {
            let mut s = src.clone();
            s.modules[i] = alt;
            out.push(s);
        }
    }

    out.retain(|s| validate_source(s).is_ok());
    out
}

fn collect_ids(expr: &Expr, out: &mut std::collections::HashSet<Ident>) {
    if let Expr::Id(id) = expr {
        out.insert(id.clone());
    }
    for child in expr.children() {
        collect_ids(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Generator;
    use crate::rng::Seed;
    use verifuzz_ast::{BinaryOp, ContinuousAssign, Decl, NetType};

    fn id(s: &str) -> Ident {
        Ident::new(s).unwrap()
    }

    fn two_input_module() -> ModuleDecl {
        ModuleDecl {
            name: id("top"),
            ports: vec![id("a0"), id("a1"), id("y")],
            items: vec![
                ModuleItem::Decl(Decl {
                    direction: Some(PortDirection::Input),
                    net_type: NetType::Wire,
                    signed: false,
                    width: 4,
                    name: id("a0"),
                }),
                ModuleItem::Decl(Decl {
                    direction: Some(PortDirection::Input),
                    net_type: NetType::Wire,
                    signed: false,
                    width: 4,
                    name: id("a1"),
                }),
                ModuleItem::Decl(Decl {
                    direction: Some(PortDirection::Output),
                    net_type: NetType::Wire,
                    signed: false,
                    width: 4,
                    name: id("y"),
                }),
                ModuleItem::Assign(ContinuousAssign {
                    target: id("y"),
                    value: Expr::Binary {
                        left: Box::new(Expr::Id(id("a1"))),
                        op: BinaryOp::Add,
                        right: Box::new(Expr::number_u64(4, 12)),
                    },
                }),
            ],
        }
    }

    #[test]
    fn numbers_shrink_toward_zero() {
        let m = two_input_module();
        let shrinks = shrink_expr(&Expr::number_u64(4, 12), &m);
        assert!(shrinks.contains(&Expr::zero(4)));
        assert!(shrinks.contains(&Expr::number_u64(4, 6)));
        // Width narrows by one bit.
        assert!(shrinks.contains(&Expr::number_u64(3, 4)));
        assert!(shrink_expr(&Expr::zero(1), &m).is_empty());
    }

    #[test]
    fn identifiers_shrink_to_smallest_same_width_name() {
        let m = two_input_module();
        let shrinks = shrink_expr(&Expr::Id(id("a1")), &m);
        assert_eq!(shrinks, vec![Expr::Id(id("a0"))]);
        // a0 is already the smallest 4-bit name other than itself... y is
        // larger, so nothing shrinks.
        assert!(shrink_expr(&Expr::Id(id("a0")), &m).is_empty());
    }

    #[test]
    fn compounds_shrink_to_children_and_zero() {
        let m = two_input_module();
        let e = Expr::Binary {
            left: Box::new(Expr::Id(id("a0"))),
            op: BinaryOp::BitXor,
            right: Box::new(Expr::Id(id("a1"))),
        };
        let shrinks = shrink_expr(&e, &m);
        assert!(shrinks.contains(&Expr::Id(id("a0"))));
        assert!(shrinks.contains(&Expr::Id(id("a1"))));
        assert!(shrinks.contains(&Expr::zero(4)));
    }

    #[test]
    fn module_shrinks_drop_unused_input() {
        let m = two_input_module();
        // a0 is unreferenced; some shrink must drop it (ports and items).
        let dropped = shrink_module(&m)
            .into_iter()
            .find(|s| s.find_decl(&id("a0")).is_none())
            .expect("a0 should be droppable");
        assert!(!dropped.ports.contains(&id("a0")));
        assert_eq!(validate_module(&dropped), Ok(()));
    }

    #[test]
    fn module_shrinks_are_well_formed() {
        let g = Generator::default();
        for seed in 0..10u64 {
            let m = g.sample(Seed(seed), 3);
            for s in shrink_module(&m) {
                assert_eq!(validate_module(&s), Ok(()), "seed {seed}");
            }
        }
    }

    #[test]
    fn source_shrinks_drop_non_top_modules() {
        let extra = ModuleDecl {
            name: id("spare"),
            ports: Vec::new(),
            items: Vec::new(),
        };
        let mut src = SourceInfo::single(two_input_module());
        src.modules.push(extra);
        let shrinks = shrink_source(&src);
        assert!(shrinks.iter().any(|s| s.modules.len() == 1));
        // The top module is never dropped.
        assert!(shrinks.iter().all(|s| s.top_module().is_some()));
    }

    #[test]
    fn shrinking_terminates() {
        // Greedily following the first shrink must bottom out: the measure
        // (node count, literal magnitude, name order) strictly decreases.
        let g = Generator::default();
        let mut src = g.sample_source(Seed(17), 4);
        let mut steps = 0usize;
        while let Some(next) = shrink_source(&src).into_iter().next() {
            src = next;
            steps += 1;
            assert!(steps < 100_000, "shrinking did not terminate");
        }
        assert!(validate_source(&src).is_ok());
    }
}
