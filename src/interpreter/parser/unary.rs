use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
    options::ImplicitMultiplication,
    registry::Category,
};

impl Parser<'_> {
    /// Parses a unary expression.
    ///
    /// Supports prefix operators:
    /// - `-`  (numeric negation)
    /// - `+`  (ignored)
    ///
    /// Unary operators are right-associative and bind looser than `^`, so
    /// `-2^2` is `-(2^2)`.
    ///
    /// Grammar:
    /// ```text
    ///     unary := ("-" | "+") unary
    ///            | power
    /// ```
    pub(super) fn parse_unary(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                let pos = self.peek_span().map_or(self.last_end, |span| span.start);
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::Unary { op: UnaryOperator::Negate,
                                 operand: Box::new(operand),
                                 pos })
            },
            Some(Token::Plus) => {
                self.advance();
                self.parse_unary()
            },
            _ => self.parse_power(),
        }
    }

    /// Parses exponentiation.
    ///
    /// The exponent is itself a unary expression, which makes `^`
    /// right-associative and allows `2^-1`.
    ///
    /// Grammar: `power := postfix ("^" unary)?`
    pub(super) fn parse_power(&mut self) -> ParseResult<Expr> {
        let base = self.parse_postfix()?;
        if !self.eat(&Token::Caret) {
            return Ok(base);
        }
        let exponent = self.parse_unary()?;
        let pos = base.position();
        Ok(Expr::Binary { left: Box::new(base),
                          op: BinaryOperator::Pow,
                          right: Box::new(exponent),
                          pos })
    }

    /// Parses a primary expression followed by any number of `!`.
    ///
    /// Grammar: `postfix := primary "!"*`
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(&Token::Bang) {
            let pos = expr.position();
            expr = Expr::Unary { op: UnaryOperator::Factorial,
                                 operand: Box::new(expr),
                                 pos };
        }
        Ok(expr)
    }

    /// Parses a primary expression.
    ///
    /// Primary expressions are the most basic building blocks:
    /// - Numeric literals
    /// - Symbols and function calls
    /// - Parenthesized expressions
    /// - Square roots written with `√`
    ///
    /// # Errors
    /// - `UnexpectedEnd` if the input stops where an operand is required.
    /// - `UnbalancedParenthesis` for a `(` without `)` or a stray `)`.
    /// - `UnexpectedToken` for any other token.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some((token, span)) = self.advance() else {
            return Err(ParseError::UnexpectedEnd);
        };
        let pos = span.start;
        match token {
            Token::Number(value) => Ok(Expr::Number { value: value.clone(),
                                                      pos }),
            Token::Identifier(name) => self.parse_identifier(name, pos),
            Token::LParen => {
                let inner = self.parse_expression()?;
                match self.advance() {
                    Some((Token::RParen, _)) => Ok(inner),
                    Some((token, span)) => Err(ParseError::UnexpectedToken { token:    token.to_string(),
                                                                             position: span.start, }),
                    None => Err(ParseError::UnbalancedParenthesis { position: pos }),
                }
            },
            Token::Root => {
                let radicand = self.parse_power()?;
                Ok(Expr::Call { name: "sqrt".to_string(),
                                arguments: vec![radicand],
                                pos })
            },
            Token::RParen => Err(ParseError::UnbalancedParenthesis { position: pos }),
            other => Err(ParseError::UnexpectedToken { token:    other.to_string(),
                                                       position: pos, }),
        }
    }

    /// Resolves an identifier against the registry.
    ///
    /// Functions continue with [`Parser::parse_call`]. Other entries become
    /// symbols. An unresolved identifier is split into known symbols if
    /// possible, then becomes a free unknown when unknowns are enabled.
    ///
    /// # Errors
    /// - `NotAFunction` when a non-function is directly followed by an
    ///   argument list such as `x(1, 2)`.
    /// - `UnknownIdentifier` when nothing else applies.
    fn parse_identifier(&mut self, name: &str, pos: usize) -> ParseResult<Expr> {
        if let Some(entry) = self.registry.resolve(name, self.options) {
            if entry.category == Category::Function {
                return self.parse_call(&entry.name, pos);
            }
            if self.next_is_adjacent() && self.next_group_has_comma() {
                return Err(ParseError::NotAFunction { name:     name.to_string(),
                                                      position: pos, });
            }
            return Ok(Expr::Symbol { name: entry.name.clone(),
                                     category: Some(entry.category),
                                     pos });
        }

        if let Some(parts) = self.split_identifier(name) {
            let spelled: Vec<&str> = parts.iter().map(|e| e.name.as_str()).collect();
            self.diagnostics.info(format!("Interpreted \"{name}\" as {}.", spelled.join("·")));
            let mut offset = pos;
            let factors = parts.iter()
                               .map(|entry| {
                                   let symbol = Expr::Symbol { name:     entry.name.clone(),
                                                               category: Some(entry.category),
                                                               pos:      offset, };
                                   offset += entry.name.len();
                                   symbol
                               })
                               .collect();
            return Ok(Expr::Implicit { factors, pos });
        }

        if self.options.unknowns_enabled {
            return Ok(Expr::Symbol { name: name.to_string(),
                                     category: None,
                                     pos });
        }
        Err(ParseError::UnknownIdentifier { name:     name.to_string(),
                                            position: pos, })
    }

    /// Parses the arguments of a function.
    ///
    /// With parentheses, `name(a, b)` takes a comma-separated list. Without
    /// them the next single factor is the argument, so `sqrt 4x` is
    /// `sqrt(4)·x` (under `First`, `sqrt 4x` is `sqrt(4x)`).
    ///
    /// # Errors
    /// `MissingArguments` when nothing that can be an argument follows.
    fn parse_call(&mut self, name: &str, pos: usize) -> ParseResult<Expr> {
        let arguments = if self.peek() == Some(&Token::LParen) {
            let open = self.peek_span().map_or(pos, |span| span.start);
            self.advance();
            self.parse_comma_separated(open)?
        } else if self.starts_operand() || self.peek() == Some(&Token::Minus) {
            let argument = if self.options.implicit_multiplication == ImplicitMultiplication::First {
                let mut group = self.parse_unary()?;
                while self.starts_operand() {
                    let factor = self.parse_power()?;
                    group = Expr::implicit(group, factor);
                }
                group
            } else {
                self.parse_unary()?
            };
            vec![argument]
        } else {
            return Err(ParseError::MissingArguments { name:     name.to_string(),
                                                      position: pos, });
        };

        Ok(Expr::Call { name: name.to_string(),
                        arguments,
                        pos })
    }
}
