//! Predicate-preserving reduction of counter-example modules.
//!
//! Delta debugging over the AST: enumerate one-step reductions of the
//! current candidate (drop an unreferenced signal, collapse a subtree to a
//! child or a zero literal, narrow a literal), try them largest-saving
//! first, restart from the first one the predicate accepts, and stop at a
//! local minimum. The predicate is opaque — in the fuzz flow it re-runs
//! the equivalence driver — so verdicts are memoized by a content hash of
//! the candidate's printed source to avoid re-running external tools on
//! modules already tested.

#![warn(missing_docs)]

use std::collections::HashMap;
use verifuzz_ast::SourceInfo;
use verifuzz_common::ContentHash;
use verifuzz_gen::shrink::shrink_source;
use verifuzz_verilog::print_source;

/// A reducer with a predicate-verdict cache.
///
/// The cache lives as long as the reducer, so restarts never re-evaluate a
/// candidate already seen, and re-reducing an already-minimal source costs
/// no predicate evaluations at all.
#[derive(Debug, Default)]
pub struct Reducer {
    cache: HashMap<ContentHash, bool>,
    evaluations: usize,
}

impl Reducer {
    /// Creates a reducer with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the predicate was actually evaluated (cache misses).
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Reduces `src` under `predicate`.
    ///
    /// `predicate(src)` must already hold; the result still satisfies the
    /// predicate and no one-step reduction of it does. The result is a
    /// local minimum, not necessarily a global one.
    pub fn reduce<P>(&mut self, mut predicate: P, src: &SourceInfo) -> SourceInfo
    where
        P: FnMut(&SourceInfo) -> bool,
    {
        let mut current = src.clone();
        'outer: loop {
            // One-step candidates, already re-validated against the subset
            // invariants; order by decreasing size reduction, ties kept in
            // structural enumeration order by the stable sort.
            let mut candidates = shrink_source(&current);
            candidates.sort_by_key(SourceInfo::node_count);

            for candidate in candidates {
                if self.check(&mut predicate, &candidate) {
                    current = candidate;
                    continue 'outer;
                }
            }
            return current;
        }
    }

    fn check<P>(&mut self, predicate: &mut P, candidate: &SourceInfo) -> bool
    where
        P: FnMut(&SourceInfo) -> bool,
    {
        let key = ContentHash::from_bytes(print_source(candidate).as_bytes());
        if let Some(&verdict) = self.cache.get(&key) {
            return verdict;
        }
        let verdict = predicate(candidate);
        self.evaluations += 1;
        self.cache.insert(key, verdict);
        verdict
    }
}

/// Reduces `src` under `predicate` with a throwaway cache.
pub fn reduce<P>(predicate: P, src: &SourceInfo) -> SourceInfo
where
    P: FnMut(&SourceInfo) -> bool,
{
    Reducer::new().reduce(predicate, src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifuzz_ast::{
        validate_source, BinaryOp, ContinuousAssign, Decl, Expr, ModuleDecl, ModuleItem, NetType,
        PortDirection,
    };
    use verifuzz_common::Ident;
    use verifuzz_gen::{Generator, Seed};

    fn id(s: &str) -> Ident {
        Ident::new(s).unwrap()
    }

    /// True when some expression divides or takes a modulus by a variable.
    fn has_division_by_variable(src: &SourceInfo) -> bool {
        fn expr_has(e: &Expr) -> bool {
            if let Expr::Binary { op, right, .. } = e {
                if matches!(op, BinaryOp::Div | BinaryOp::Mod) && contains_id(right) {
                    return true;
                }
            }
            e.children().iter().any(|c| expr_has(c))
        }
        fn contains_id(e: &Expr) -> bool {
            matches!(e, Expr::Id(_)) || e.children().iter().any(|c| contains_id(c))
        }
        src.modules
            .iter()
            .flat_map(|m| m.assigns())
            .any(|ca| expr_has(&ca.value))
    }

    fn input(name: &str, width: u32) -> ModuleItem {
        ModuleItem::Decl(Decl {
            direction: Some(PortDirection::Input),
            net_type: NetType::Wire,
            signed: false,
            width,
            name: id(name),
        })
    }

    fn local(name: &str, width: u32) -> ModuleItem {
        ModuleItem::Decl(Decl {
            direction: None,
            net_type: NetType::Wire,
            signed: false,
            width,
            name: id(name),
        })
    }

    fn assign(target: &str, value: Expr) -> ModuleItem {
        ModuleItem::Assign(ContinuousAssign {
            target: id(target),
            value,
        })
    }

    /// Ten-ish items where only the division assignment matters.
    fn noisy_module() -> SourceInfo {
        let divisor = Expr::Binary {
            left: Box::new(Expr::Id(id("a0"))),
            op: BinaryOp::BitOr,
            right: Box::new(Expr::number_u64(4, 1)),
        };
        let division = Expr::Binary {
            left: Box::new(Expr::Id(id("a0"))),
            op: BinaryOp::Div,
            right: Box::new(divisor),
        };
        SourceInfo::single(ModuleDecl {
            name: id("top"),
            ports: vec![id("a0"), id("a1"), id("y")],
            items: vec![
                input("a0", 4),
                input("a1", 4),
                ModuleItem::Decl(Decl {
                    direction: Some(PortDirection::Output),
                    net_type: NetType::Wire,
                    signed: false,
                    width: 4,
                    name: id("y"),
                }),
                local("w0", 4),
                assign(
                    "w0",
                    Expr::Binary {
                        left: Box::new(Expr::Id(id("a1"))),
                        op: BinaryOp::Add,
                        right: Box::new(Expr::number_u64(4, 7)),
                    },
                ),
                local("w1", 4),
                assign("w1", division),
                local("w2", 1),
                assign(
                    "w2",
                    Expr::Binary {
                        left: Box::new(Expr::Id(id("w0"))),
                        op: BinaryOp::Le,
                        right: Box::new(Expr::Id(id("w1"))),
                    },
                ),
                assign(
                    "y",
                    Expr::Cond {
                        cond: Box::new(Expr::Id(id("w2"))),
                        then_expr: Box::new(Expr::Id(id("w0"))),
                        else_expr: Box::new(Expr::Id(id("w1"))),
                    },
                ),
            ],
        })
    }

    #[test]
    fn result_satisfies_predicate_and_shrinks() {
        let src = noisy_module();
        assert!(has_division_by_variable(&src));
        let reduced = reduce(has_division_by_variable, &src);
        assert!(has_division_by_variable(&reduced));
        assert!(reduced.node_count() <= src.node_count());
        assert!(validate_source(&reduced).is_ok());
    }

    #[test]
    fn reduces_to_single_required_assignment() {
        let reduced = reduce(has_division_by_variable, &noisy_module());
        let module = &reduced.modules[0];
        // Only the assignment carrying the division survives.
        assert_eq!(module.assigns().count(), 1);
        assert!(module.find_decl(&id("a1")).is_none(), "a1 was noise");
        // Local minimum: no one-step shrink still satisfies the predicate.
        for candidate in verifuzz_gen::shrink::shrink_source(&reduced) {
            assert!(!has_division_by_variable(&candidate));
        }
    }

    #[test]
    fn reduction_is_idempotent() {
        let once = reduce(has_division_by_variable, &noisy_module());
        let twice = reduce(has_division_by_variable, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn memoization_avoids_re_evaluation() {
        let src = noisy_module();
        let mut reducer = Reducer::new();
        let first = reducer.reduce(has_division_by_variable, &src);
        let evals_after_first = reducer.evaluations();
        assert!(evals_after_first > 0);

        // Reducing the same source again hits only cached verdicts.
        let second = reducer.reduce(has_division_by_variable, &src);
        assert_eq!(first, second);
        assert_eq!(reducer.evaluations(), evals_after_first);
    }

    #[test]
    fn cached_verdicts_match_fresh_ones() {
        let src = noisy_module();
        let mut cached = Reducer::new();
        let with_cache = cached.reduce(has_division_by_variable, &src);
        let fresh = reduce(has_division_by_variable, &src);
        assert_eq!(with_cache, fresh);
    }

    #[test]
    fn trivially_true_predicate_reduces_generated_modules_hard() {
        let g = Generator::default();
        let src = g.sample_source(Seed(12), 4);
        let reduced = reduce(|_| true, &src);
        // Everything removable is removed; what remains has no shrinks.
        assert!(verifuzz_gen::shrink::shrink_source(&reduced).is_empty());
        assert!(reduced.node_count() <= src.node_count());
    }
}
