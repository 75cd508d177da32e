use std::{fmt, ops::Range};

use logos::Logos;
use num_rational::BigRational;

use crate::{
    error::ParseError,
    util::num::{parse_decimal, parse_radix},
};

/// Byte range of a token in the canonical input.
pub type Span = Range<usize>;

/// Represents a lexical token in the canonical input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Whitespace is skipped, but the spans keep enough information to tell
/// touching tokens from separated ones.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `42`, `3.14`, `.5`, `2.1e-10`,
    /// `0xFF`, `0b1010` or `0o17`, held as exact rationals.
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| parse_decimal(lex.slice()))]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| parse_decimal(lex.slice()))]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| parse_radix(&lex.slice()[2..], 16))]
    #[regex(r"0[oO][0-7]+", |lex| parse_radix(&lex.slice()[2..], 8))]
    #[regex(r"0[bB][01]+", |lex| parse_radix(&lex.slice()[2..], 2))]
    Number(BigRational),
    /// Identifier tokens; symbol names such as `x`, `sqrt` or `π`.
    #[regex(r"[_\p{L}][_\p{L}0-9]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^` or `**`
    #[token("^")]
    #[token("**")]
    Caret,
    /// `!`
    #[token("!")]
    Bang,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `±` or `+/-`
    #[token("±")]
    #[token("+/-")]
    PlusMinus,
    /// `√`
    #[token("√")]
    Root,
    /// Spaces, tabs, newlines and the Unicode spaces used for grouping.
    #[regex(r"[ \t\r\n\f\x{a0}\x{2009}\x{202f}]+", logos::skip)]
    Ignored,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Number(_) => "number",
            Self::Identifier(name) => return write!(f, "identifier \"{name}\""),
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Caret => "'^'",
            Self::Bang => "'!'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Comma => "','",
            Self::Equals => "'='",
            Self::EqualEqual => "'=='",
            Self::BangEqual => "'!='",
            Self::Less => "'<'",
            Self::Greater => "'>'",
            Self::LessEqual => "'<='",
            Self::GreaterEqual => "'>='",
            Self::PlusMinus => "'±'",
            Self::Root => "'√'",
            Self::Ignored => "whitespace",
        };
        f.write_str(text)
    }
}

/// Splits canonical input into tokens with their byte spans.
///
/// # Errors
/// - [`ParseError::InvalidNumber`] for a numeric literal that cannot be
///   represented (e.g. an exponent beyond the supported range).
/// - [`ParseError::UnexpectedToken`] for a character outside the grammar.
///
/// # Example
/// ```
/// use reckon::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("2x + 1").unwrap();
/// assert_eq!(tokens.len(), 4);
/// assert_eq!(tokens[1].0, Token::Identifier("x".to_string()));
/// assert_eq!(tokens[1].1, 1..2);
///
/// assert!(tokenize("2 $ 3").is_err());
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(tok) => tokens.push((tok, span)),
            Err(()) => {
                let slice = lexer.slice();
                if slice.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
                    return Err(ParseError::InvalidNumber { text:     slice.to_string(),
                                                           position: span.start, });
                }
                return Err(ParseError::UnexpectedToken { token:    format!("character \"{slice}\""),
                                                         position: span.start, });
            },
        }
    }

    Ok(tokens)
}
