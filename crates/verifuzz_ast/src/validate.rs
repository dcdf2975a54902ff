//! Invariant validation for generated and reduced modules.
//!
//! Candidate trees produced by the reducer are checked here before the
//! (expensive) predicate runs; candidates violating any invariant are
//! discarded. The generator is expected to satisfy these invariants by
//! construction, so a violation on a freshly generated module is an
//! internal error.

use crate::ast::{BinaryOp, Expr, ModuleDecl, NetType, PortDirection, SourceInfo};
use std::collections::{HashMap, HashSet};
use verifuzz_common::Ident;

/// A well-formedness violation in a module or source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// The source contains no modules.
    #[error("source contains no modules")]
    EmptySource,

    /// The named top module does not exist.
    #[error("top module '{0}' not found")]
    UnknownTop(Ident),

    /// Two modules share a name.
    #[error("duplicate module '{0}'")]
    DuplicateModule(Ident),

    /// An identifier is declared more than once in a module.
    #[error("'{name}' declared twice in module '{module}'")]
    DuplicateDeclaration {
        /// The enclosing module.
        module: Ident,
        /// The re-declared name.
        name: Ident,
    },

    /// A port-listed name has no matching declaration item with a direction.
    #[error("port '{name}' of module '{module}' has no directional declaration")]
    UndeclaredPort {
        /// The enclosing module.
        module: Ident,
        /// The port name.
        name: Ident,
    },

    /// A declaration carries a direction but is missing from the port list.
    #[error("'{name}' is declared as a port but not listed in module '{module}'")]
    UnlistedPortDecl {
        /// The enclosing module.
        module: Ident,
        /// The declared name.
        name: Ident,
    },

    /// A declaration has width zero.
    #[error("'{name}' in module '{module}' has width 0")]
    ZeroWidth {
        /// The enclosing module.
        module: Ident,
        /// The declared name.
        name: Ident,
    },

    /// An assignment target is not declared.
    #[error("assignment to undeclared '{name}' in module '{module}'")]
    UnknownAssignTarget {
        /// The enclosing module.
        module: Ident,
        /// The target name.
        name: Ident,
    },

    /// An assignment target is declared `reg`; continuous assignments only
    /// drive wires.
    #[error("continuous assignment to reg '{name}' in module '{module}'")]
    AssignToReg {
        /// The enclosing module.
        module: Ident,
        /// The target name.
        name: Ident,
    },

    /// A wire is driven by more than one continuous assignment.
    #[error("'{name}' in module '{module}' has multiple drivers")]
    MultipleDrivers {
        /// The enclosing module.
        module: Ident,
        /// The multiply-driven name.
        name: Ident,
    },

    /// A referenced wire has no driver, so reading it would yield X.
    #[error("'{name}' in module '{module}' is read but never driven")]
    UndrivenWire {
        /// The enclosing module.
        module: Ident,
        /// The undriven name.
        name: Ident,
    },

    /// An expression references an undeclared signal.
    #[error("unknown identifier '{name}' in module '{module}'")]
    UnknownIdentifier {
        /// The enclosing module.
        module: Ident,
        /// The unresolved name.
        name: Ident,
    },

    /// A concatenation has no elements.
    #[error("empty concatenation in module '{0}'")]
    EmptyConcat(Ident),

    /// A numeric literal has width zero.
    #[error("zero-width literal in module '{0}'")]
    ZeroWidthLiteral(Ident),

    /// A division or modulo has a statically-zero right operand.
    #[error("statically-zero divisor in module '{0}'")]
    StaticZeroDivisor(Ident),
}

/// Validates a whole source: module uniqueness, top resolution, and every
/// module's invariants.
pub fn validate_source(src: &SourceInfo) -> Result<(), Violation> {
    if src.modules.is_empty() {
        return Err(Violation::EmptySource);
    }
    let mut names = HashSet::new();
    for m in &src.modules {
        if !names.insert(m.name.clone()) {
            return Err(Violation::DuplicateModule(m.name.clone()));
        }
    }
    if src.top_module().is_none() {
        return Err(Violation::UnknownTop(src.top.clone()));
    }
    for m in &src.modules {
        validate_module(m)?;
    }
    Ok(())
}

/// Validates a single module against the subset invariants.
pub fn validate_module(module: &ModuleDecl) -> Result<(), Violation> {
    let name = module.name.clone();

    // Declaration uniqueness and zero widths.
    let mut decls = HashMap::new();
    for d in module.decls() {
        if d.width == 0 {
            return Err(Violation::ZeroWidth {
                module: name.clone(),
                name: d.name.clone(),
            });
        }
        if decls.insert(d.name.clone(), d).is_some() {
            return Err(Violation::DuplicateDeclaration {
                module: name.clone(),
                name: d.name.clone(),
            });
        }
    }

    // Port list and directional declarations match one-to-one.
    let port_set: HashSet<&Ident> = module.ports.iter().collect();
    for p in &module.ports {
        match decls.get(p) {
            Some(d) if d.direction.is_some() => {}
            _ => {
                return Err(Violation::UndeclaredPort {
                    module: name.clone(),
                    name: p.clone(),
                });
            }
        }
    }
    for d in module.decls() {
        if d.direction.is_some() && !port_set.contains(&d.name) {
            return Err(Violation::UnlistedPortDecl {
                module: name.clone(),
                name: d.name.clone(),
            });
        }
    }

    // Assignment targets: declared wires, one driver each.
    let mut driven = HashSet::new();
    for ca in module.assigns() {
        match decls.get(&ca.target) {
            None => {
                return Err(Violation::UnknownAssignTarget {
                    module: name.clone(),
                    name: ca.target.clone(),
                });
            }
            Some(d) if d.net_type == NetType::Reg => {
                return Err(Violation::AssignToReg {
                    module: name.clone(),
                    name: ca.target.clone(),
                });
            }
            Some(_) => {}
        }
        if !driven.insert(ca.target.clone()) {
            return Err(Violation::MultipleDrivers {
                module: name.clone(),
                name: ca.target.clone(),
            });
        }
    }

    // Expression checks, and the set of referenced signals.
    let mut referenced = HashSet::new();
    for ca in module.assigns() {
        check_expr(&ca.value, module, &mut referenced)?;
    }

    // Every referenced or output wire must have a driver, unless it is
    // externally driven (input/inout).
    for d in module.decls() {
        let externally_driven = matches!(
            d.direction,
            Some(PortDirection::Input) | Some(PortDirection::Inout)
        );
        let must_be_driven = referenced.contains(&d.name)
            || d.direction == Some(PortDirection::Output);
        if must_be_driven && !externally_driven && !driven.contains(&d.name) {
            return Err(Violation::UndrivenWire {
                module: name.clone(),
                name: d.name.clone(),
            });
        }
    }

    Ok(())
}

/// Recursively checks one expression: identifier resolution, concat
/// non-emptiness, literal widths, and static division safety. Resolvable
/// width is implied by these checks (see `crate::width::expr_width`).
fn check_expr(
    expr: &Expr,
    module: &ModuleDecl,
    referenced: &mut HashSet<Ident>,
) -> Result<(), Violation> {
    match expr {
        Expr::Number { width, .. } => {
            if *width == 0 {
                return Err(Violation::ZeroWidthLiteral(module.name.clone()));
            }
        }
        Expr::Id(id) => {
            if module.find_decl(id).is_none() {
                return Err(Violation::UnknownIdentifier {
                    module: module.name.clone(),
                    name: id.clone(),
                });
            }
            referenced.insert(id.clone());
        }
        Expr::Concat(items) => {
            if items.is_empty() {
                return Err(Violation::EmptyConcat(module.name.clone()));
            }
            for item in items {
                check_expr(item, module, referenced)?;
            }
        }
        Expr::Unary { operand, .. } => check_expr(operand, module, referenced)?,
        Expr::Binary { left, op, right } => {
            if matches!(op, BinaryOp::Div | BinaryOp::Mod) && right.is_zero_literal() {
                return Err(Violation::StaticZeroDivisor(module.name.clone()));
            }
            check_expr(left, module, referenced)?;
            check_expr(right, module, referenced)?;
        }
        Expr::Cond {
            cond,
            then_expr,
            else_expr,
        } => {
            check_expr(cond, module, referenced)?;
            check_expr(then_expr, module, referenced)?;
            check_expr(else_expr, module, referenced)?;
        }
        Expr::SignCast { arg, .. } => check_expr(arg, module, referenced)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ContinuousAssign, Decl, ModuleItem};

    fn id(s: &str) -> Ident {
        Ident::new(s).unwrap()
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

    fn output(name: &str, width: u32) -> ModuleItem {
        ModuleItem::Decl(Decl {
            direction: Some(PortDirection::Output),
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

    fn valid_module() -> ModuleDecl {
        ModuleDecl {
            name: id("top"),
            ports: vec![id("a"), id("y")],
            items: vec![
                input("a", 4),
                output("y", 4),
                assign("y", Expr::Id(id("a"))),
            ],
        }
    }

    #[test]
    fn accepts_valid_module() {
        assert_eq!(validate_module(&valid_module()), Ok(()));
        assert_eq!(validate_source(&SourceInfo::single(valid_module())), Ok(()));
    }

    #[test]
    fn rejects_empty_source() {
        let src = SourceInfo {
            top: id("top"),
            modules: Vec::new(),
        };
        assert_eq!(validate_source(&src), Err(Violation::EmptySource));
    }

    #[test]
    fn rejects_unknown_top() {
        let mut src = SourceInfo::single(valid_module());
        src.top = id("other");
        assert_eq!(validate_source(&src), Err(Violation::UnknownTop(id("other"))));
    }

    #[test]
    fn rejects_duplicate_declaration() {
        let mut m = valid_module();
        m.items.push(input("a", 2));
        assert!(matches!(
            validate_module(&m),
            Err(Violation::DuplicateDeclaration { .. })
        ));
    }

    #[test]
    fn rejects_port_without_decl() {
        let mut m = valid_module();
        m.ports.push(id("ghost"));
        assert!(matches!(
            validate_module(&m),
            Err(Violation::UndeclaredPort { .. })
        ));
    }

    #[test]
    fn rejects_unlisted_port_decl() {
        let mut m = valid_module();
        m.items.push(input("b", 2));
        assert!(matches!(
            validate_module(&m),
            Err(Violation::UnlistedPortDecl { .. })
        ));
    }

    #[test]
    fn rejects_assignment_to_reg() {
        let mut m = valid_module();
        m.items.push(ModuleItem::Decl(Decl {
            direction: None,
            net_type: NetType::Reg,
            signed: false,
            width: 4,
            name: id("r"),
        }));
        m.items.push(assign("r", Expr::Id(id("a"))));
        assert!(matches!(
            validate_module(&m),
            Err(Violation::AssignToReg { .. })
        ));
    }

    #[test]
    fn rejects_multiple_drivers() {
        let mut m = valid_module();
        m.items.push(assign("y", Expr::Id(id("a"))));
        assert!(matches!(
            validate_module(&m),
            Err(Violation::MultipleDrivers { .. })
        ));
    }

    #[test]
    fn rejects_undriven_output() {
        let m = ModuleDecl {
            name: id("top"),
            ports: vec![id("y")],
            items: vec![output("y", 1)],
        };
        assert!(matches!(
            validate_module(&m),
            Err(Violation::UndrivenWire { .. })
        ));
    }

    #[test]
    fn rejects_unknown_identifier() {
        let mut m = valid_module();
        m.items[2] = assign("y", Expr::Id(id("nope")));
        assert!(matches!(
            validate_module(&m),
            Err(Violation::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn rejects_static_zero_divisor() {
        let mut m = valid_module();
        m.items[2] = assign(
            "y",
            Expr::Binary {
                left: Box::new(Expr::Id(id("a"))),
                op: BinaryOp::Div,
                right: Box::new(Expr::zero(4)),
            },
        );
        assert_eq!(
            validate_module(&m),
            Err(Violation::StaticZeroDivisor(id("top")))
        );
    }

    #[test]
    fn accepts_runtime_divisor_with_or_guard() {
        let mut m = valid_module();
        m.items[2] = assign(
            "y",
            Expr::Binary {
                left: Box::new(Expr::Id(id("a"))),
                op: BinaryOp::Mod,
                right: Box::new(Expr::Binary {
                    left: Box::new(Expr::Id(id("a"))),
                    op: BinaryOp::BitOr,
                    right: Box::new(Expr::number_u64(4, 1)),
                }),
            },
        );
        assert_eq!(validate_module(&m), Ok(()));
    }

    #[test]
    fn rejects_empty_concat() {
        let mut m = valid_module();
        m.items[2] = assign("y", Expr::Concat(Vec::new()));
        assert_eq!(validate_module(&m), Err(Violation::EmptyConcat(id("top"))));
    }

    #[test]
    fn dead_local_decl_is_allowed() {
        let mut m = valid_module();
        m.items.push(ModuleItem::Decl(Decl {
            direction: None,
            net_type: NetType::Wire,
            signed: false,
            width: 2,
            name: id("w0"),
        }));
        assert_eq!(validate_module(&m), Ok(()));
    }
}
