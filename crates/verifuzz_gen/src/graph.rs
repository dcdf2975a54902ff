//! Structural generation through a random gate DAG.
//!
//! The graph path exercises gate-level circuits independently of the
//! expression generator: a random acyclic graph of two-state gates is grown
//! in a petgraph arena (integer node handles, no ownership cycles), then
//! folded into a module with one continuous assignment per internal node.

use crate::rng::Seed;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rand::rngs::StdRng;
use rand::Rng;
use verifuzz_ast::{
    BinaryOp, ContinuousAssign, Decl, Expr, ModuleDecl, ModuleItem, NetType, PortDirection,
    UnaryOp,
};
use verifuzz_common::Ident;

/// A two-input-style gate kind carried on internal circuit nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    /// AND gate.
    And,
    /// OR gate.
    Or,
    /// XOR gate.
    Xor,
    /// NAND gate.
    Nand,
    /// NOR gate.
    Nor,
}

/// A node in the circuit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitNode {
    /// A designated input (in-degree 0).
    Input,
    /// An internal gate (in-degree at least 1).
    Gate(GateKind),
}

/// A random combinational circuit: a gate DAG with designated inputs and
/// exactly one designated output node.
#[derive(Debug, Clone)]
pub struct CircuitGraph {
    /// The underlying arena of nodes and edges.
    pub graph: DiGraph<CircuitNode, ()>,
    /// Input nodes, in declaration order.
    pub inputs: Vec<NodeIndex>,
    /// The single designated output node.
    pub output: NodeIndex,
}

/// Samples a circuit with roughly `size` internal gates.
///
/// Edges always point from a lower node index to a higher one, so the graph
/// is acyclic by construction; predecessor sets are sampled without
/// replacement, so there are no duplicate edges to remove afterwards.
pub fn sample_circuit(seed: Seed, size: u32) -> CircuitGraph {
    let mut rng = seed.rng();
    gen_circuit(&mut rng, size)
}

fn gen_circuit(rng: &mut StdRng, size: u32) -> CircuitGraph {
    let n_gates = size.max(1) as usize;
    let n_inputs = rng.gen_range(2..=2 + n_gates.min(4));

    let mut graph = DiGraph::new();
    let mut nodes: Vec<NodeIndex> = Vec::new();
    let mut inputs = Vec::new();

    for _ in 0..n_inputs {
        let idx = graph.add_node(CircuitNode::Input);
        nodes.push(idx);
        inputs.push(idx);
    }

    for _ in 0..n_gates {
        let kind = match rng.gen_range(0u32..5) {
            0 => GateKind::And,
            1 => GateKind::Or,
            2 => GateKind::Xor,
            3 => GateKind::Nand,
            _ => GateKind::Nor,
        };
        let idx = graph.add_node(CircuitNode::Gate(kind));
        let fanin = rng.gen_range(1..=3.min(nodes.len()));
        for pred in rand::seq::index::sample(rng, nodes.len(), fanin) {
            graph.add_edge(nodes[pred], idx, ());
        }
        nodes.push(idx);
    }

    let output = *nodes.last().expect("at least one gate exists");
    CircuitGraph {
        graph,
        inputs,
        output,
    }
}

/// Folds a circuit into a module: one 1-bit input port per input node, one
/// local wire and continuous assignment per internal node in topological
/// order, and the output node re-exported as `y`.
pub fn circuit_to_module(circuit: &CircuitGraph, name: &str) -> ModuleDecl {
    let mut ports = Vec::new();
    let mut items = Vec::new();

    let wire_name = |idx: NodeIndex| -> Ident {
        ident(&format!("w{}", idx.index()))
    };

    for (i, input) in circuit.inputs.iter().enumerate() {
        let decl = Decl {
            direction: Some(PortDirection::Input),
            net_type: NetType::Wire,
            signed: false,
            width: 1,
            name: ident(&format!("a{i}")),
        };
        ports.push(decl.name.clone());
        items.push(ModuleItem::Decl(decl));
        // Re-export the port under the node's wire name to keep the fold
        // uniform across input and gate predecessors.
        let alias = Decl {
            direction: None,
            net_type: NetType::Wire,
            signed: false,
            width: 1,
            name: wire_name(*input),
        };
        items.push(ModuleItem::Decl(alias.clone()));
        items.push(ModuleItem::Assign(ContinuousAssign {
            target: alias.name,
            value: Expr::Id(ident(&format!("a{i}"))),
        }));
    }

    let order = toposort(&circuit.graph, None).expect("circuit graph is acyclic");
    for idx in order {
        let CircuitNode::Gate(kind) = circuit.graph[idx] else {
            continue;
        };
        let mut preds: Vec<NodeIndex> = circuit
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        preds.sort();

        let decl = Decl {
            direction: None,
            net_type: NetType::Wire,
            signed: false,
            width: 1,
            name: wire_name(idx),
        };
        items.push(ModuleItem::Decl(decl.clone()));
        items.push(ModuleItem::Assign(ContinuousAssign {
            target: decl.name,
            value: gate_expr(kind, &preds, &wire_name),
        }));
    }

    let y = Decl {
        direction: Some(PortDirection::Output),
        net_type: NetType::Wire,
        signed: false,
        width: 1,
        name: ident("y"),
    };
    ports.push(y.name.clone());
    items.push(ModuleItem::Decl(y.clone()));
    items.push(ModuleItem::Assign(ContinuousAssign {
        target: y.name,
        value: Expr::Id(wire_name(circuit.output)),
    }));

    ModuleDecl {
        name: ident(name),
        ports,
        items,
    }
}

/// Builds the driving expression for one gate from its predecessors.
fn gate_expr(kind: GateKind, preds: &[NodeIndex], wire_name: &dyn Fn(NodeIndex) -> Ident) -> Expr {
    let op = match kind {
        GateKind::And | GateKind::Nand => BinaryOp::BitAnd,
        GateKind::Or | GateKind::Nor => BinaryOp::BitOr,
        GateKind::Xor => BinaryOp::BitXor,
    };
    let mut iter = preds.iter();
    let first = iter
        .next()
        .expect("gate nodes have in-degree at least one");
    let mut expr = Expr::Id(wire_name(*first));
    for pred in iter {
        expr = Expr::Binary {
            left: Box::new(expr),
            op,
            right: Box::new(Expr::Id(wire_name(*pred))),
        };
    }
    if matches!(kind, GateKind::Nand | GateKind::Nor) {
        expr = Expr::Unary {
            op: UnaryOp::BitNot,
            operand: Box::new(expr),
        };
    }
    expr
}

fn ident(s: &str) -> Ident {
    Ident::new(s).expect("generated names are valid identifiers")
}
