use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Span, Token},
        parser::core::{ParseResult, Parser},
    },
    registry::{Category, SymbolEntry},
};

/// Identifiers longer than this are never split into known symbols.
const MAX_SPLIT_LENGTH: usize = 24;

impl<'a> Parser<'a> {
    /// The next token without consuming it.
    pub(super) fn peek(&mut self) -> Option<&'a Token> {
        self.tokens.peek().copied().map(|(token, _)| token)
    }

    /// The span of the next token without consuming it.
    pub(super) fn peek_span(&mut self) -> Option<Span> {
        self.tokens.peek().map(|(_, span)| span.clone())
    }

    /// Consumes the next token and records where it ended.
    pub(super) fn advance(&mut self) -> Option<&'a (Token, Span)> {
        let next = self.tokens.next();
        if let Some((_, span)) = next {
            self.last_end = span.end;
        }
        next
    }

    /// Consumes the next token if it equals `expected`.
    pub(super) fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            return true;
        }
        false
    }

    /// Whether the next token can begin a factor of a juxtaposition.
    pub(super) fn starts_operand(&mut self) -> bool {
        matches!(self.peek(),
                 Some(Token::Number(_) | Token::Identifier(_) | Token::LParen | Token::Root))
    }

    /// Whether the next token touches the previous one (no whitespace in
    /// between).
    pub(super) fn next_is_adjacent(&mut self) -> bool {
        let last_end = self.last_end;
        self.peek_span().is_some_and(|span| span.start == last_end)
    }

    /// Whether the parenthesized group that follows contains a top-level
    /// comma, i.e. looks like an argument list.
    pub(super) fn next_group_has_comma(&mut self) -> bool {
        let mut lookahead = self.tokens.clone();
        if !matches!(lookahead.next(), Some((Token::LParen, _))) {
            return false;
        }
        let mut depth = 0usize;
        for (token, _) in lookahead {
            match token {
                Token::LParen => depth += 1,
                Token::RParen if depth == 0 => return false,
                Token::RParen => depth -= 1,
                Token::Comma if depth == 0 => return true,
                _ => {},
            }
        }
        false
    }

    /// Parses a comma-separated list of expressions up to a closing `)`.
    ///
    /// Used for function argument lists. The opening parenthesis must already
    /// be consumed. An immediately encountered `)` produces an empty list.
    ///
    /// Grammar (simplified): `list := expression ("," expression)*`
    ///
    /// # Parameters
    /// - `open`: Byte offset of the opening parenthesis, for error reporting.
    ///
    /// # Returns
    /// A vector of parsed items.
    ///
    /// # Errors
    /// Returns a `ParseError` if:
    /// - an item fails to parse,
    /// - an unexpected token is encountered,
    /// - the input ends before the closing parenthesis.
    pub(super) fn parse_comma_separated(&mut self, open: usize) -> ParseResult<Vec<crate::ast::Expr>> {
        let mut items = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expression()?);
            match self.advance() {
                Some((Token::Comma, _)) => {},
                Some((Token::RParen, _)) => break,
                Some((token, span)) => {
                    return Err(ParseError::UnexpectedToken { token:    token.to_string(),
                                                             position: span.start, });
                },
                None => return Err(ParseError::UnbalancedParenthesis { position: open }),
            }
        }
        Ok(items)
    }

    /// Pushes the single Info note describing how an implicit multiplication
    /// next to a division was read.
    pub(super) fn note_implicit(&mut self, text: String) {
        if !self.noted_implicit {
            self.noted_implicit = true;
            self.diagnostics.info(text);
        }
    }

    /// The trimmed input text between two byte offsets.
    pub(super) fn slice(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end).unwrap_or_default().trim()
    }

    /// Splits an unresolved identifier into two or more known, non-function
    /// symbols, preferring the longest prefixes (`xy` → `x`, `y`).
    ///
    /// # Returns
    /// The entries in input order, or `None` if no complete split exists.
    pub(super) fn split_identifier(&self, name: &str) -> Option<Vec<&'a SymbolEntry>> {
        if name.chars().count() > MAX_SPLIT_LENGTH {
            return None;
        }
        self.split_from(name).filter(|parts| parts.len() >= 2)
    }

    fn split_from(&self, rest: &str) -> Option<Vec<&'a SymbolEntry>> {
        if rest.is_empty() {
            return Some(Vec::new());
        }
        let ends: Vec<usize> = rest.char_indices()
                                   .map(|(i, _)| i)
                                   .skip(1)
                                   .chain(std::iter::once(rest.len()))
                                   .collect();
        for &end in ends.iter().rev() {
            if let Some(entry) = self.registry.resolve(&rest[..end], self.options)
               && entry.category != Category::Function
               && let Some(mut tail) = self.split_from(&rest[end..])
            {
                tail.insert(0, entry);
                return Some(tail);
            }
        }
        None
    }
}
