//! Recursive-descent parser for the subset.
//!
//! Modules and items are parsed by hand; expressions use operator-precedence
//! (Pratt) parsing following IEEE 1364-2005 Table 5-4:
//!
//! | BP (L,R) | Operators |
//! |----------|-----------|
//! | (1,2)    | `||` |
//! | (3,4)    | `&&` |
//! | (5,6)    | `|` |
//! | (7,8)    | `^` `~^` `^~` |
//! | (9,10)   | `&` |
//! | (11,12)  | `==` `!=` `===` `!==` |
//! | (13,14)  | `<` `<=` `>` `>=` |
//! | (15,16)  | `<<` `>>` `<<<` `>>>` |
//! | (17,18)  | `+` `-` |
//! | (19,20)  | `*` `/` `%` |
//! | (22,21)  | `**` (right-assoc) |
//! | prefix 23 | `+` `-` `!` `~` `&` `~&` `|` `~|` `^` `~^` |
//!
//! Ternary `? :` is handled as a special case at min_bp=0 (right-associative).
//! Parentheses are transparent: the AST has no paren node, so a parse of the
//! canonical printer's output reproduces the original tree exactly.

use crate::error::ParseError;
use crate::lexer::lex;
use crate::token::Token;
use verifuzz_ast::{
    BinaryOp, ContinuousAssign, Decl, Expr, ModuleDecl, ModuleItem, NetType, PortDirection,
    SourceInfo, UnaryOp,
};
use verifuzz_common::Ident;

/// Binding power for prefix (unary) operators.
const PREFIX_BP: u8 = 23;

/// Binding power for binary operators. Returns (left_bp, right_bp).
fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::LogOr => (1, 2),
        BinaryOp::LogAnd => (3, 4),
        BinaryOp::BitOr => (5, 6),
        BinaryOp::BitXor | BinaryOp::BitXnor => (7, 8),
        BinaryOp::BitAnd => (9, 10),
        BinaryOp::Eq | BinaryOp::Neq | BinaryOp::CaseEq | BinaryOp::CaseNeq => (11, 12),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => (13, 14),
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::AShl | BinaryOp::AShr => (15, 16),
        BinaryOp::Add | BinaryOp::Sub => (17, 18),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (19, 20),
        BinaryOp::Pow => (22, 21), // right-associative
    }
}

/// Parses subset Verilog text into a list of module declarations.
pub fn parse_modules(source: &str) -> Result<Vec<ModuleDecl>, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut modules = Vec::new();
    while !parser.at_eof() {
        modules.push(parser.parse_module()?);
    }
    Ok(modules)
}

/// Parses subset Verilog text into a [`SourceInfo`] with the given top name.
///
/// The top name is not resolved here; `verifuzz_ast::validate_source`
/// checks it together with the other invariants.
pub fn parse_source(source: &str, top: Ident) -> Result<SourceInfo, ParseError> {
    Ok(SourceInfo {
        top,
        modules: parse_modules(source)?,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token if it equals `tok`.
    fn eat(&mut self, tok: &Token) -> bool {
        if self.current() == tok {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Token) -> Result<(), ParseError> {
        if self.eat(&tok) {
            Ok(())
        } else {
            Err(self.unexpected(&tok.describe()))
        }
    }

    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        match self.current().clone() {
            Token::Ident(id) => {
                self.pos += 1;
                Ok(id)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        if self.at_eof() {
            ParseError::UnexpectedEof
        } else {
            ParseError::Unexpected {
                expected: expected.to_string(),
                found: self.current().describe(),
            }
        }
    }

    // ========================================================================
    // Modules and items
    // ========================================================================

    fn parse_module(&mut self) -> Result<ModuleDecl, ParseError> {
        self.expect(Token::Module)?;
        let name = self.expect_ident()?;

        let mut ports = Vec::new();
        if self.eat(&Token::LeftParen) {
            if !self.eat(&Token::RightParen) {
                loop {
                    ports.push(self.expect_ident()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                self.expect(Token::RightParen)?;
            }
        }
        self.expect(Token::Semicolon)?;

        let mut items = Vec::new();
        while !self.eat(&Token::Endmodule) {
            if self.at_eof() {
                return Err(ParseError::UnexpectedEof);
            }
            items.push(self.parse_item()?);
        }

        Ok(ModuleDecl { name, ports, items })
    }

    fn parse_item(&mut self) -> Result<ModuleItem, ParseError> {
        if self.eat(&Token::Assign) {
            let target = self.expect_ident()?;
            self.expect(Token::Equals)?;
            let value = self.parse_expr()?;
            self.expect(Token::Semicolon)?;
            return Ok(ModuleItem::Assign(ContinuousAssign { target, value }));
        }

        let direction = match self.current() {
            Token::Input => {
                self.pos += 1;
                Some(PortDirection::Input)
            }
            Token::Output => {
                self.pos += 1;
                Some(PortDirection::Output)
            }
            Token::Inout => {
                self.pos += 1;
                Some(PortDirection::Inout)
            }
            _ => None,
        };

        let net_type = match self.current() {
            Token::Wire => {
                self.pos += 1;
                NetType::Wire
            }
            Token::Reg => {
                self.pos += 1;
                NetType::Reg
            }
            _ => return Err(self.unexpected("'wire' or 'reg'")),
        };

        let signed = self.eat(&Token::Signed);
        let width = self.parse_opt_range()?;
        let name = self.expect_ident()?;
        self.expect(Token::Semicolon)?;

        Ok(ModuleItem::Decl(Decl {
            direction,
            net_type,
            signed,
            width,
            name,
        }))
    }

    /// Parses an optional `[msb:0]` range, returning the declared width.
    fn parse_opt_range(&mut self) -> Result<u32, ParseError> {
        if !self.eat(&Token::LeftBracket) {
            return Ok(1);
        }
        let msb = self.expect_index()?;
        self.expect(Token::Colon)?;
        let lsb = self.expect_index()?;
        self.expect(Token::RightBracket)?;
        if lsb != 0 {
            return Err(ParseError::Unexpected {
                expected: "range of the form [msb:0]".to_string(),
                found: format!("[{msb}:{lsb}]"),
            });
        }
        Ok(msb + 1)
    }

    /// Parses a plain decimal bound inside a range.
    fn expect_index(&mut self) -> Result<u32, ParseError> {
        match self.current().clone() {
            Token::Literal { value, .. } => {
                self.pos += 1;
                u32::try_from(&value).map_err(|_| ParseError::Unexpected {
                    expected: "range bound fitting in 32 bits".to_string(),
                    found: value.to_string(),
                })
            }
            _ => Err(self.unexpected("range bound")),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix_expr()?;

        loop {
            if self.at_eof() {
                break;
            }

            // Ternary `? :` at binding power 0, right-associative.
            if *self.current() == Token::Question && min_bp == 0 {
                self.pos += 1;
                let then_expr = self.parse_expr_bp(0)?;
                self.expect(Token::Colon)?;
                let else_expr = self.parse_expr_bp(0)?;
                lhs = Expr::Cond {
                    cond: Box::new(lhs),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                };
                continue;
            }

            let op = match self.current_as_binary_op() {
                Some(op) => op,
                None => break,
            };

            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }

            self.pos += 1; // consume operator token
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn current_as_binary_op(&self) -> Option<BinaryOp> {
        Some(match self.current() {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::Percent => BinaryOp::Mod,
            Token::StarStar => BinaryOp::Pow,
            Token::EqEq => BinaryOp::Eq,
            Token::BangEq => BinaryOp::Neq,
            Token::EqEqEq => BinaryOp::CaseEq,
            Token::BangEqEq => BinaryOp::CaseNeq,
            Token::Lt => BinaryOp::Lt,
            Token::Le => BinaryOp::Le,
            Token::Gt => BinaryOp::Gt,
            Token::Ge => BinaryOp::Ge,
            Token::AmpAmp => BinaryOp::LogAnd,
            Token::PipePipe => BinaryOp::LogOr,
            Token::Amp => BinaryOp::BitAnd,
            Token::Pipe => BinaryOp::BitOr,
            Token::Caret => BinaryOp::BitXor,
            Token::TildeCaret => BinaryOp::BitXnor,
            Token::Shl => BinaryOp::Shl,
            Token::Shr => BinaryOp::Shr,
            Token::AShl => BinaryOp::AShl,
            Token::AShr => BinaryOp::AShr,
            _ => return None,
        })
    }

    fn current_as_unary_op(&self) -> Option<UnaryOp> {
        Some(match self.current() {
            Token::Plus => UnaryOp::Plus,
            Token::Minus => UnaryOp::Minus,
            Token::Bang => UnaryOp::LogNot,
            Token::Tilde => UnaryOp::BitNot,
            Token::Amp => UnaryOp::RedAnd,
            Token::TildeAmp => UnaryOp::RedNand,
            Token::Pipe => UnaryOp::RedOr,
            Token::TildePipe => UnaryOp::RedNor,
            Token::Caret => UnaryOp::RedXor,
            Token::TildeCaret => UnaryOp::RedXnor,
            _ => return None,
        })
    }

    fn parse_prefix_expr(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = self.current_as_unary_op() {
            self.pos += 1;
            let operand = self.parse_expr_bp(PREFIX_BP)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current().clone() {
            Token::Literal { width, value } => {
                self.pos += 1;
                Ok(Expr::number(width, value))
            }
            Token::Ident(id) => {
                self.pos += 1;
                Ok(Expr::Id(id))
            }
            Token::LeftParen => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                self.expect(Token::RightParen)?;
                Ok(inner)
            }
            Token::LeftBrace => {
                self.pos += 1;
                let mut items = vec![self.parse_expr()?];
                while self.eat(&Token::Comma) {
                    items.push(self.parse_expr()?);
                }
                self.expect(Token::RightBrace)?;
                Ok(Expr::Concat(items))
            }
            Token::DollarSigned | Token::DollarUnsigned => {
                let signed = matches!(self.current(), Token::DollarSigned);
                self.pos += 1;
                self.expect(Token::LeftParen)?;
                let arg = self.parse_expr()?;
                self.expect(Token::RightParen)?;
                Ok(Expr::SignCast {
                    signed,
                    arg: Box::new(arg),
                })
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}
