use num_rational::BigRational;

use crate::registry::Category;

/// An abstract syntax tree (AST) node representing a parsed expression.
///
/// `Expr` is immutable once built. Every variant records the byte offset in
/// the canonical input where the construct starts, which error messages use
/// to point at the offending text.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal converted to an exact rational.
    Number {
        /// The exact value of the literal.
        value: BigRational,
        /// Byte offset in the canonical input.
        pos:   usize,
    },
    /// Reference to a registry symbol or a free unknown.
    Symbol {
        /// Canonical name of the entry, or the identifier as typed for a free
        /// unknown.
        name:     String,
        /// `None` for a free unknown created because unknowns are enabled.
        category: Option<Category>,
        /// Byte offset in the canonical input.
        pos:      usize,
    },
    /// A unary operation (negation or factorial).
    Unary {
        /// The unary operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Byte offset in the canonical input.
        pos:     usize,
    },
    /// A binary operation (arithmetic or comparison).
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Byte offset in the canonical input.
        pos:   usize,
    },
    /// Function application (e.g. `sin(x)` or `sqrt 4`).
    Call {
        /// Canonical name of the function.
        name:      String,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Byte offset in the canonical input.
        pos:       usize,
    },
    /// Two or more juxtaposed factors (e.g. `2x`, `(a)(b)`).
    Implicit {
        /// The factors, in input order.
        factors: Vec<Self>,
        /// Byte offset in the canonical input.
        pos:     usize,
    },
    /// A value with an uncertainty (`a ± b`).
    Uncertain {
        /// The central value.
        value: Box<Self>,
        /// The uncertainty.
        error: Box<Self>,
        /// Byte offset in the canonical input.
        pos:   usize,
    },
}

impl Expr {
    /// Gets the byte offset from `self`.
    /// ## Example
    /// ```
    /// use reckon::ast::Expr;
    ///
    /// let expr = Expr::Symbol { name:     "x".to_string(),
    ///                           category: None,
    ///                           pos:      5, };
    ///
    /// assert_eq!(expr.position(), 5);
    /// ```
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Number { pos, .. }
            | Self::Symbol { pos, .. }
            | Self::Unary { pos, .. }
            | Self::Binary { pos, .. }
            | Self::Call { pos, .. }
            | Self::Implicit { pos, .. }
            | Self::Uncertain { pos, .. } => *pos,
        }
    }

    /// Whether `self` is an implicit multiplication group.
    #[must_use]
    pub const fn is_implicit(&self) -> bool {
        matches!(self, Self::Implicit { .. })
    }

    /// Whether the top-level operation of `self` is a comparison.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(self, Self::Binary { op, .. } if op.is_comparison())
    }

    /// Builds a juxtaposition of `left` and `right`, extending `left` if it
    /// already is one.
    #[must_use]
    pub fn implicit(left: Self, right: Self) -> Self {
        match left {
            Self::Implicit { mut factors, pos } => {
                factors.push(right);
                Self::Implicit { factors, pos }
            },
            other => {
                let pos = other.position();
                Self::Implicit { factors: vec![other, right],
                                 pos }
            },
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic and comparisons.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Exponentiation (`^`)
    Pow,
    /// Equal to (`=` or `==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

impl BinaryOperator {
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Equal
                 | Self::NotEqual
                 | Self::Less
                 | Self::Greater
                 | Self::LessEqual
                 | Self::GreaterEqual)
    }

    /// The Unicode spelling of the operator, where one exists.
    #[must_use]
    pub const fn unicode(self) -> &'static str {
        match self {
            Self::Sub => "−",
            Self::Mul => "×",
            Self::NotEqual => "≠",
            Self::LessEqual => "≤",
            Self::GreaterEqual => "≥",
            Self::Equal => "=",
            other => other.ascii(),
        }
    }

    /// The canonical ASCII spelling of the operator.
    #[must_use]
    pub const fn ascii(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
        }
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Factorial (e.g. `x!`).
    Factorial,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ascii())
    }
}
