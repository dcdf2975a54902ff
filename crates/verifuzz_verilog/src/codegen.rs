//! Canonical code generation for the subset.
//!
//! Printing is deterministic: the same AST always yields byte-identical
//! text. Compound subexpressions are parenthesized unconditionally, which
//! keeps the printed form unambiguous regardless of operator precedence and
//! makes the parse-back trivially structural.

use std::fmt::Write;
use verifuzz_ast::{BinaryOp, Decl, Expr, ModuleDecl, ModuleItem, NetType, PortDirection, SourceInfo, UnaryOp};

/// Returns the Verilog spelling of a unary operator.
pub fn unary_symbol(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Plus => "+",
        UnaryOp::Minus => "-",
        UnaryOp::LogNot => "!",
        UnaryOp::BitNot => "~",
        UnaryOp::RedAnd => "&",
        UnaryOp::RedNand => "~&",
        UnaryOp::RedOr => "|",
        UnaryOp::RedNor => "~|",
        UnaryOp::RedXor => "^",
        UnaryOp::RedXnor => "~^",
    }
}

/// Returns the Verilog spelling of a binary operator.
pub fn binary_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Pow => "**",
        BinaryOp::Eq => "==",
        BinaryOp::Neq => "!=",
        BinaryOp::CaseEq => "===",
        BinaryOp::CaseNeq => "!==",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::LogAnd => "&&",
        BinaryOp::LogOr => "||",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::BitXnor => "~^",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::AShl => "<<<",
        BinaryOp::AShr => ">>>",
    }
}

/// Prints an expression in canonical form.
pub fn print_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Number { width, value } => {
            let _ = write!(out, "{width}'h{value:x}");
        }
        Expr::Id(id) => out.push_str(id.as_str()),
        Expr::Concat(items) => {
            out.push('{');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, item);
            }
            out.push('}');
        }
        Expr::Unary { op, operand } => {
            out.push_str(unary_symbol(*op));
            out.push('(');
            write_expr(out, operand);
            out.push(')');
        }
        Expr::Binary { left, op, right } => {
            out.push('(');
            write_expr(out, left);
            let _ = write!(out, " {} ", binary_symbol(*op));
            write_expr(out, right);
            out.push(')');
        }
        Expr::Cond {
            cond,
            then_expr,
            else_expr,
        } => {
            out.push('(');
            write_expr(out, cond);
            out.push_str(" ? ");
            write_expr(out, then_expr);
            out.push_str(" : ");
            write_expr(out, else_expr);
            out.push(')');
        }
        Expr::SignCast { signed, arg } => {
            out.push_str(if *signed { "$signed(" } else { "$unsigned(" });
            write_expr(out, arg);
            out.push(')');
        }
    }
}

fn write_decl(out: &mut String, decl: &Decl) {
    out.push_str("  ");
    if let Some(dir) = decl.direction {
        out.push_str(match dir {
            PortDirection::Input => "input ",
            PortDirection::Output => "output ",
            PortDirection::Inout => "inout ",
        });
    }
    out.push_str(match decl.net_type {
        NetType::Wire => "wire",
        NetType::Reg => "reg",
    });
    if decl.signed {
        out.push_str(" signed");
    }
    if decl.width > 1 {
        let _ = write!(out, " [{}:0]", decl.width - 1);
    }
    let _ = writeln!(out, " {};", decl.name);
}

/// Prints a module in canonical form.
pub fn print_module(module: &ModuleDecl) -> String {
    let mut out = String::new();
    if module.ports.is_empty() {
        let _ = writeln!(out, "module {};", module.name);
    } else {
        let _ = write!(out, "module {}(", module.name);
        for (i, port) in module.ports.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(port.as_str());
        }
        out.push_str(");\n");
    }
    for item in &module.items {
        match item {
            ModuleItem::Decl(decl) => write_decl(&mut out, decl),
            ModuleItem::Assign(ca) => {
                let _ = write!(out, "  assign {} = ", ca.target);
                write_expr(&mut out, &ca.value);
                out.push_str(";\n");
            }
        }
    }
    out.push_str("endmodule\n");
    out
}

/// Prints a complete source, modules in order.
pub fn print_source(src: &SourceInfo) -> String {
    let mut out = String::new();
    for (i, module) in src.modules.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&print_module(module));
    }
    out
}
