use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
    options::ImplicitMultiplication,
};

impl Parser<'_> {
    /// Parses comparison expressions.
    ///
    /// Handles left-associative comparison operators:
    /// `=`, `==`, `!=`, `<`, `>`, `<=`, `>=`.
    ///
    /// The rule is: `comparison := uncertain (cmp uncertain)*`
    ///
    /// # Returns
    /// An `Expr::Binary` tree with comparison operators.
    pub(super) fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_uncertain()?;
        while let Some(op) = self.peek().and_then(comparison_operator) {
            self.advance();
            let right = self.parse_uncertain()?;
            let pos = left.position();
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos };
        }
        Ok(left)
    }

    /// Parses a value with an optional uncertainty.
    ///
    /// The rule is: `uncertain := additive ("±" additive)?`
    fn parse_uncertain(&mut self) -> ParseResult<Expr> {
        let value = self.parse_additive()?;
        if !self.eat(&Token::PlusMinus) {
            return Ok(value);
        }
        let error = self.parse_additive()?;
        let pos = value.position();
        Ok(Expr::Uncertain { value: Box::new(value),
                             error: Box::new(error),
                             pos })
    }

    /// Parses addition and subtraction expressions.
    ///
    /// Handles left-associative binary operators: `+` and `-`.
    ///
    /// The rule is: `additive := term (("+" | "-") term)*`
    ///
    /// # Returns
    /// An `Expr::Binary` tree representing the parsed expression.
    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOperator::Add,
                Some(Token::Minus) => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            let pos = left.position();
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos };
        }
        Ok(left)
    }

    /// Parses multiplication-level expressions.
    ///
    /// Handles the left-associative operators `*` and `/` and the
    /// juxtaposition of factor groups. How far a group extends is decided by
    /// [`Parser::parse_factor_group`]; whatever juxtaposition remains between
    /// groups binds like `*`.
    ///
    /// The rule is: `term := group (("*" | "/") group | group)*`
    ///
    /// # Returns
    /// A tree of `Expr::Binary` and `Expr::Implicit` nodes.
    fn parse_term(&mut self) -> ParseResult<Expr> {
        let (mut left, _) = self.parse_factor_group()?;
        let mut after_division = false;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOperator::Mul,
                Some(Token::Slash) => BinaryOperator::Div,
                _ if self.starts_operand() => {
                    let (right, _) = self.parse_factor_group()?;
                    if after_division {
                        let end = self.last_end;
                        let text = self.slice(left.position(), end);
                        self.note_implicit(format!("Division binds tighter than implicit multiplication: \
                                                    \"{text}\" was read as ({}) {}.",
                                                   self.slice(left.position(), right.position()),
                                                   self.slice(right.position(), end)));
                    }
                    after_division = false;
                    left = Expr::implicit(left, right);
                    continue;
                },
                _ => break,
            };
            self.advance();
            let (right, juxtaposed) = self.parse_factor_group()?;
            if op == BinaryOperator::Div && juxtaposed {
                let end = self.last_end;
                let text = self.slice(left.position(), end);
                self.note_implicit(format!("Implicit multiplication binds tighter than division: \
                                            \"{text}\" was read as {}/({}).",
                                           self.slice(left.position(), right.position())
                                               .trim_end_matches('/')
                                               .trim_end(),
                                           self.slice(right.position(), end)));
            }
            after_division = op == BinaryOperator::Div;
            let pos = left.position();
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  pos };
        }
        Ok(left)
    }

    /// Parses a group of juxtaposed factors that binds tighter than `*` and
    /// `/`.
    ///
    /// - `Conventional`: a group is always a single factor.
    /// - `First`: every juxtaposed factor joins the group.
    /// - `Limited`: factors join only while they touch the previous one.
    ///
    /// The rule is: `group := unary power*`
    ///
    /// # Returns
    /// The group and whether it holds more than one factor.
    fn parse_factor_group(&mut self) -> ParseResult<(Expr, bool)> {
        let first = self.parse_unary()?;
        let policy = self.options.implicit_multiplication;
        if policy == ImplicitMultiplication::Conventional {
            return Ok((first, false));
        }

        let mut group = first;
        let mut juxtaposed = false;
        while self.starts_operand()
              && (policy == ImplicitMultiplication::First || self.next_is_adjacent())
        {
            let factor = self.parse_power()?;
            group = Expr::implicit(group, factor);
            juxtaposed = true;
        }
        Ok((group, juxtaposed))
    }
}

/// Maps a token to the comparison operator it spells, if any.
///
/// # Example
/// ```
/// use reckon::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::comparison_operator},
/// };
///
/// assert_eq!(comparison_operator(&Token::Equals), Some(BinaryOperator::Equal));
/// assert_eq!(comparison_operator(&Token::Plus), None);
/// ```
#[must_use]
pub const fn comparison_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Equals | Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        _ => None,
    }
}
