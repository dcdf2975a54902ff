//! Lexical analyzer for the subset.
//!
//! Converts source text into a sequence of [`Token`]s, handling
//! case-sensitive keywords, sized/based literals (`4'hf`), system
//! identifiers (`$signed`/`$unsigned`), and line and block comments.

use crate::error::ParseError;
use crate::token::{lookup_keyword, Token};
use num_bigint::BigUint;
use verifuzz_common::Ident;

/// Lexes subset Verilog source text into tokens.
///
/// Whitespace and comments are skipped. The returned vector always ends
/// with [`Token::Eof`].
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.pos >= self.source.len() {
                tokens.push(Token::Eof);
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return;
            }
            // Line comment: //
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            // Block comment: /* ... */ (non-nesting in Verilog)
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                self.pos += 2;
                while self.pos < self.source.len() {
                    if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            return;
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let c = self.peek();

        if c.is_ascii_alphabetic() || c == b'_' {
            return Ok(self.lex_word());
        }
        if c.is_ascii_digit() {
            return self.lex_number();
        }
        if c == b'$' {
            return self.lex_system_word();
        }

        let start = self.pos;
        macro_rules! take {
            ($n:expr, $tok:expr) => {{
                self.pos += $n;
                return Ok($tok);
            }};
        }

        match (c, self.peek_at(1), self.peek_at(2)) {
            (b'<', b'<', b'<') => take!(3, Token::AShl),
            (b'>', b'>', b'>') => take!(3, Token::AShr),
            (b'=', b'=', b'=') => take!(3, Token::EqEqEq),
            (b'!', b'=', b'=') => take!(3, Token::BangEqEq),
            (b'<', b'<', _) => take!(2, Token::Shl),
            (b'>', b'>', _) => take!(2, Token::Shr),
            (b'<', b'=', _) => take!(2, Token::Le),
            (b'>', b'=', _) => take!(2, Token::Ge),
            (b'=', b'=', _) => take!(2, Token::EqEq),
            (b'!', b'=', _) => take!(2, Token::BangEq),
            (b'&', b'&', _) => take!(2, Token::AmpAmp),
            (b'|', b'|', _) => take!(2, Token::PipePipe),
            (b'~', b'&', _) => take!(2, Token::TildeAmp),
            (b'~', b'|', _) => take!(2, Token::TildePipe),
            (b'~', b'^', _) => take!(2, Token::TildeCaret),
            (b'^', b'~', _) => take!(2, Token::TildeCaret),
            (b'*', b'*', _) => take!(2, Token::StarStar),
            (b'(', ..) => take!(1, Token::LeftParen),
            (b')', ..) => take!(1, Token::RightParen),
            (b'[', ..) => take!(1, Token::LeftBracket),
            (b']', ..) => take!(1, Token::RightBracket),
            (b'{', ..) => take!(1, Token::LeftBrace),
            (b'}', ..) => take!(1, Token::RightBrace),
            (b',', ..) => take!(1, Token::Comma),
            (b';', ..) => take!(1, Token::Semicolon),
            (b':', ..) => take!(1, Token::Colon),
            (b'?', ..) => take!(1, Token::Question),
            (b'=', ..) => take!(1, Token::Equals),
            (b'+', ..) => take!(1, Token::Plus),
            (b'-', ..) => take!(1, Token::Minus),
            (b'*', ..) => take!(1, Token::Star),
            (b'/', ..) => take!(1, Token::Slash),
            (b'%', ..) => take!(1, Token::Percent),
            (b'!', ..) => take!(1, Token::Bang),
            (b'~', ..) => take!(1, Token::Tilde),
            (b'&', ..) => take!(1, Token::Amp),
            (b'|', ..) => take!(1, Token::Pipe),
            (b'^', ..) => take!(1, Token::Caret),
            (b'<', ..) => take!(1, Token::Lt),
            (b'>', ..) => take!(1, Token::Gt),
            _ => Err(ParseError::UnexpectedChar {
                ch: self.source[start] as char,
                offset: start,
            }),
        }
    }

    fn lex_word(&mut self) -> Token {
        let start = self.pos;
        while self.pos < self.source.len()
            && (self.source[self.pos].is_ascii_alphanumeric() || self.source[self.pos] == b'_')
        {
            self.pos += 1;
        }
        let word = std::str::from_utf8(&self.source[start..self.pos])
            .expect("identifier bytes are ASCII");
        match lookup_keyword(word) {
            Some(tok) => tok,
            // Word characters form a valid identifier by construction.
            None => Token::Ident(Ident::new(word).expect("lexed word is a valid identifier")),
        }
    }

    fn lex_system_word(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        self.pos += 1; // eat $
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_alphanumeric() {
            self.pos += 1;
        }
        match &self.source[start..self.pos] {
            b"$signed" => Ok(Token::DollarSigned),
            b"$unsigned" => Ok(Token::DollarUnsigned),
            other => Err(ParseError::BadLiteral {
                offset: start,
                reason: format!(
                    "unknown system identifier '{}'",
                    String::from_utf8_lossy(other)
                ),
            }),
        }
    }

    /// Lexes `4'hf`-style sized literals and plain decimals (width 32).
    fn lex_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        let lead = self.lex_digits(10)?;

        if self.peek() != b'\'' {
            // Plain decimal: Verilog's default 32-bit width.
            return Ok(Token::Literal {
                width: 32,
                value: lead,
            });
        }
        self.pos += 1; // eat '

        let width = u32::try_from(&lead).map_err(|_| ParseError::BadLiteral {
            offset: start,
            reason: "literal width does not fit in 32 bits".to_string(),
        })?;
        if width == 0 {
            return Err(ParseError::BadLiteral {
                offset: start,
                reason: "literal width must be at least 1".to_string(),
            });
        }

        let radix = match self.peek() {
            b'b' | b'B' => 2,
            b'o' | b'O' => 8,
            b'd' | b'D' => 10,
            b'h' | b'H' => 16,
            other => {
                return Err(ParseError::BadLiteral {
                    offset: start,
                    reason: format!("unknown base '{}'", other as char),
                });
            }
        };
        self.pos += 1; // eat base

        let value = self.lex_digits(radix)?;
        Ok(Token::Literal { width, value })
    }

    fn lex_digits(&mut self, radix: u32) -> Result<BigUint, ParseError> {
        let start = self.pos;
        let mut digits = Vec::new();
        while self.pos < self.source.len() {
            let b = self.source[self.pos];
            if b == b'_' {
                self.pos += 1;
                continue;
            }
            if (b as char).to_digit(radix).is_some() {
                digits.push(b);
                self.pos += 1;
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Err(ParseError::BadLiteral {
                offset: start,
                reason: "expected digits".to_string(),
            });
        }
        BigUint::parse_bytes(&digits, radix).ok_or_else(|| ParseError::BadLiteral {
            offset: start,
            reason: "invalid digits".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src).unwrap()
    }

    #[test]
    fn lexes_module_header() {
        let toks = kinds("module top(a, y);");
        assert_eq!(toks[0], Token::Module);
        assert!(matches!(&toks[1], Token::Ident(id) if id.as_str() == "top"));
        assert_eq!(toks[2], Token::LeftParen);
        assert_eq!(toks[6], Token::Semicolon);
        assert_eq!(*toks.last().unwrap(), Token::Eof);
    }

    #[test]
    fn lexes_sized_literals() {
        assert_eq!(
            kinds("4'hf")[0],
            Token::Literal {
                width: 4,
                value: BigUint::from(15u32)
            }
        );
        assert_eq!(
            kinds("8'b1010_1010")[0],
            Token::Literal {
                width: 8,
                value: BigUint::from(0xaau32)
            }
        );
        assert_eq!(
            kinds("3'o7")[0],
            Token::Literal {
                width: 3,
                value: BigUint::from(7u32)
            }
        );
        assert_eq!(
            kinds("42")[0],
            Token::Literal {
                width: 32,
                value: BigUint::from(42u32)
            }
        );
    }

    #[test]
    fn rejects_zero_width_literal() {
        assert!(matches!(lex("0'h0"), Err(ParseError::BadLiteral { .. })));
    }

    #[test]
    fn maximal_munch_operators() {
        assert_eq!(kinds("<<<")[0], Token::AShl);
        assert_eq!(kinds("<<")[0], Token::Shl);
        assert_eq!(kinds("<=")[0], Token::Le);
        assert_eq!(kinds("<")[0], Token::Lt);
        assert_eq!(kinds("===")[0], Token::EqEqEq);
        assert_eq!(kinds("==")[0], Token::EqEq);
        assert_eq!(kinds("=")[0], Token::Equals);
        assert_eq!(kinds("~^")[0], Token::TildeCaret);
        assert_eq!(kinds("^~")[0], Token::TildeCaret);
        assert_eq!(kinds("~&")[0], Token::TildeAmp);
        assert_eq!(kinds("**")[0], Token::StarStar);
    }

    #[test]
    fn lexes_system_casts() {
        assert_eq!(kinds("$signed")[0], Token::DollarSigned);
        assert_eq!(kinds("$unsigned")[0], Token::DollarUnsigned);
        assert!(lex("$display").is_err());
    }

    #[test]
    fn skips_comments() {
        let toks = kinds("wire // line comment\n /* block */ reg");
        assert_eq!(toks[0], Token::Wire);
        assert_eq!(toks[1], Token::Reg);
        assert_eq!(toks[2], Token::Eof);
    }

    #[test]
    fn rejects_foreign_characters() {
        assert!(matches!(
            lex("wire @"),
            Err(ParseError::UnexpectedChar { ch: '@', .. })
        ));
    }
}
