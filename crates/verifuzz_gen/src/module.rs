//! Random module generation.
//!
//! Modules are built in dependency-respecting order: input ports first,
//! then alternating local-wire declarations and the assignments driving
//! them (so every RHS references only already-declared signals), and
//! finally the single output wire `y` with the assignment that drives it.

use crate::expr::ExprGen;
use crate::rng::Seed;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use verifuzz_ast::{
    ContinuousAssign, Decl, ModuleDecl, ModuleItem, NetType, PortDirection, SourceInfo,
};
use verifuzz_common::Ident;

/// Bounds on generated module shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Maximum width of any generated net, in bits.
    pub max_width: u32,
    /// Maximum number of input ports.
    pub max_ports: u32,
    /// Maximum number of local wires in the module body.
    pub max_items: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_width: 16,
            max_ports: 6,
            max_items: 12,
        }
    }
}

/// The module generator.
///
/// A `Generator` is a pure function of `(seed, size)`: sampling twice with
/// the same pair yields structurally identical modules. `size` bounds both
/// the expression recursion depth and (softly) the number of body items.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator with the given bounds.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Samples one module named `top`.
    pub fn sample(&self, seed: Seed, size: u32) -> ModuleDecl {
        let mut rng = seed.rng();
        self.gen_module(&mut rng, size)
    }

    /// Samples one module wrapped as a [`SourceInfo`] with itself as top.
    pub fn sample_source(&self, seed: Seed, size: u32) -> SourceInfo {
        SourceInfo::single(self.sample(seed, size))
    }

    fn gen_module(&self, rng: &mut StdRng, size: u32) -> ModuleDecl {
        let cfg = self.config;
        let n_inputs = rng.gen_range(1..=cfg.max_ports.max(1));
        let mut scope: Vec<Decl> = Vec::new();
        let mut items: Vec<ModuleItem> = Vec::new();
        let mut ports: Vec<Ident> = Vec::new();

        for i in 0..n_inputs {
            let decl = Decl {
                direction: Some(PortDirection::Input),
                net_type: NetType::Wire,
                signed: rng.gen_bool(0.125),
                width: rng.gen_range(1..=cfg.max_width),
                name: ident(&format!("a{i}")),
            };
            ports.push(decl.name.clone());
            items.push(ModuleItem::Decl(decl.clone()));
            scope.push(decl);
        }

        // Local wires, each driven right after its declaration.
        let n_locals = rng.gen_range(0..=cfg.max_items.min(size.max(1)));
        for i in 0..n_locals {
            let width = rng.gen_range(1..=cfg.max_width);
            let decl = Decl {
                direction: None,
                net_type: NetType::Wire,
                signed: false,
                width,
                name: ident(&format!("w{i}")),
            };
            let depth = rng.gen_range(0..=size);
            let value = ExprGen::new(rng, &scope, cfg.max_width).gen_expr(depth, width);
            items.push(ModuleItem::Decl(decl.clone()));
            items.push(ModuleItem::Assign(ContinuousAssign {
                target: decl.name.clone(),
                value,
            }));
            scope.push(decl);
        }

        // The conventional test output, driven by the final assignment.
        let y_width = rng.gen_range(1..=cfg.max_width);
        let y = Decl {
            direction: Some(PortDirection::Output),
            net_type: NetType::Wire,
            signed: false,
            width: y_width,
            name: ident("y"),
        };
        ports.push(y.name.clone());
        items.push(ModuleItem::Decl(y.clone()));
        let value = ExprGen::new(rng, &scope, cfg.max_width).gen_expr(size, y_width);
        items.push(ModuleItem::Assign(ContinuousAssign {
            target: y.name.clone(),
            value,
        }));

        ModuleDecl {
            name: ident("top"),
            ports,
            items,
        }
    }
}

fn ident(s: &str) -> Ident {
    Ident::new(s).expect("generated names are valid identifiers")
}
