//! Token types for the subset lexer.
//!
//! Unlike a full front end, tokens carry their decoded values directly:
//! the subset has no source map, and literals are easier to compare when
//! the width/value pair is already split out.

use num_bigint::BigUint;
use verifuzz_common::Ident;

/// A token of the VeriFuzz Verilog subset.
///
/// Keywords are case-sensitive and must appear in lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // === Keywords ===
    /// `module`
    Module,
    /// `endmodule`
    Endmodule,
    /// `assign`
    Assign,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
    /// `wire`
    Wire,
    /// `reg`
    Reg,
    /// `signed`
    Signed,

    // === Values ===
    /// An identifier.
    Ident(Ident),
    /// A sized literal (e.g., `4'hf`), decoded to width and value.
    Literal {
        /// Width in bits.
        width: u32,
        /// The decoded value.
        value: BigUint,
    },
    /// `$signed`
    DollarSigned,
    /// `$unsigned`
    DollarUnsigned,

    // === Punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `?`
    Question,
    /// `=`
    Equals,

    // === Operators ===
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `&`
    Amp,
    /// `~&`
    TildeAmp,
    /// `|`
    Pipe,
    /// `~|`
    TildePipe,
    /// `^`
    Caret,
    /// `~^` or `^~`
    TildeCaret,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `===`
    EqEqEq,
    /// `!==`
    BangEqEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `<<<`
    AShl,
    /// `>>>`
    AShr,

    /// End of input.
    Eof,
}

impl Token {
    /// A short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(id) => format!("identifier '{id}'"),
            Token::Literal { width, value } => format!("literal {width}'h{value:x}"),
            Token::Eof => "end of input".to_string(),
            other => format!("{other:?}").to_lowercase(),
        }
    }
}

/// Looks up a keyword token for an identifier-shaped word, if it is one.
pub fn lookup_keyword(word: &str) -> Option<Token> {
    match word {
        "module" => Some(Token::Module),
        "endmodule" => Some(Token::Endmodule),
        "assign" => Some(Token::Assign),
        "input" => Some(Token::Input),
        "output" => Some(Token::Output),
        "inout" => Some(Token::Inout),
        "wire" => Some(Token::Wire),
        "reg" => Some(Token::Reg),
        "signed" => Some(Token::Signed),
        _ => None,
    }
}
