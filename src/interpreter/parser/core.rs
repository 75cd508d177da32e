use std::{iter::Peekable, slice};

use crate::{
    ast::Expr,
    diagnostics::Diagnostics,
    error::ParseError,
    interpreter::lexer::{Span, Token, tokenize},
    options::ParseOptions,
    registry::SymbolRegistry,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over a tokenized canonical input.
///
/// The parser consults the registry to resolve identifiers and pushes an
/// Info message to `diagnostics` for every ambiguity it resolves silently.
pub struct Parser<'a> {
    pub(super) tokens:         Peekable<slice::Iter<'a, (Token, Span)>>,
    pub(super) source:         &'a str,
    pub(super) options:        &'a ParseOptions,
    pub(super) registry:       &'a SymbolRegistry,
    pub(super) diagnostics:    &'a mut Diagnostics,
    /// End of the most recently consumed token.
    pub(super) last_end:       usize,
    /// An implicit multiplication note was already pushed.
    pub(super) noted_implicit: bool,
}

/// Parses canonical input into an expression tree.
///
/// Grammar, lowest precedence first:
///
/// ```text
/// comparison := uncertain (cmp uncertain)*
/// uncertain  := additive ("±" additive)?
/// additive   := term (("+" | "-") term)*
/// term       := group (("*" | "/") group | group)*
/// group      := unary power*            (juxtaposed factors)
/// unary      := ("-" | "+") unary | power
/// power      := postfix ("^" unary)?
/// postfix    := primary "!"*
/// primary    := number | symbol | call | "(" comparison ")" | "√" power
/// ```
///
/// Which juxtapositions form a `group` depends on
/// [`ParseOptions::implicit_multiplication`].
///
/// # Errors
/// A [`ParseError`] for malformed input, or
/// [`ParseError::UnknownIdentifier`] for an unresolved identifier while
/// free unknowns are disabled.
///
/// # Example
/// ```
/// use reckon::{
///     ast::{BinaryOperator, Expr},
///     diagnostics::Diagnostics,
///     interpreter::parser::core::parse,
///     options::ParseOptions,
///     registry::SymbolRegistry,
/// };
///
/// let registry = SymbolRegistry::new();
/// let mut sink = Diagnostics::new();
/// let expr = parse("1/2x", &ParseOptions::default(), &registry, &mut sink).unwrap();
///
/// let Expr::Binary { op, right, .. } = expr else { panic!() };
/// assert_eq!(op, BinaryOperator::Div);
/// assert!(right.is_implicit());
/// assert!(!sink.is_empty());
/// ```
pub fn parse(source: &str,
             options: &ParseOptions,
             registry: &SymbolRegistry,
             diagnostics: &mut Diagnostics)
             -> ParseResult<Expr> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser { tokens: tokens.iter().peekable(),
                              source,
                              options,
                              registry,
                              diagnostics,
                              last_end: 0,
                              noted_implicit: false };
    let expr = parser.parse_expression()?;
    parser.expect_end()?;

    log::trace!("parsed {source:?} into {expr:?}");
    Ok(expr)
}

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing.
    /// It begins at the lowest-precedence level, comparison, and recursively
    /// descends through the precedence hierarchy.
    ///
    /// Grammar: `expression := comparison`
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_comparison()
    }

    /// Fails unless every token has been consumed.
    fn expect_end(&mut self) -> ParseResult<()> {
        match self.tokens.next() {
            None => Ok(()),
            Some((Token::RParen, span)) => Err(ParseError::UnbalancedParenthesis { position: span.start }),
            Some((token, span)) => Err(ParseError::UnexpectedToken { token:    token.to_string(),
                                                                     position: span.start, }),
        }
    }
}
