use num_rational::BigRational;

use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    interpreter::value::number::Number,
    registry::Category,
};

/// What a symbolic leaf stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A named constant such as `π`, replaced by its value when
    /// approximating.
    Constant,
    /// A unit of measure.
    Unit,
    /// A variable without a value.
    Unknown,
    /// A variable that was not expanded (only in interrupted trees).
    Variable,
}

/// A node of a result tree.
///
/// Trees built by the evaluator are kept in a normal form: sums and products
/// are flat, a product carries at most one numeric coefficient in first
/// position, subtraction is a sum with a negated term and division is a
/// product with a negative power.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A numeric leaf.
    Number(Number),
    /// The outcome of a decided comparison.
    Boolean(bool),
    /// A symbolic leaf.
    Symbol {
        /// Canonical registry name, or the typed name of a free unknown.
        name: String,
        kind: SymbolKind,
    },
    /// The result of an undefined operation such as division by zero.
    Undefined,
    /// Positive or negative infinity.
    Infinity {
        negative: bool,
    },
    Sum(Vec<Self>),
    Product(Vec<Self>),
    Power {
        base:     Box<Self>,
        exponent: Box<Self>,
    },
    /// A function application that could not be (or was not yet) evaluated.
    Call {
        name:      String,
        arguments: Vec<Self>,
    },
    /// A comparison whose outcome cannot be decided.
    Comparison {
        op:    BinaryOperator,
        left:  Box<Self>,
        right: Box<Self>,
    },
}

impl Node {
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::Number(Number::integer(value))
    }

    #[must_use]
    pub const fn rational(value: BigRational) -> Self {
        Self::Number(Number::Exact(value))
    }

    /// Wraps a number, mapping non-finite approximations to
    /// [`Node::Infinity`] and [`Node::Undefined`].
    ///
    /// # Example
    /// ```
    /// use reckon::interpreter::value::{node::Node, number::Number};
    ///
    /// assert_eq!(Node::number(Number::approx(f64::NEG_INFINITY)),
    ///            Node::Infinity { negative: true });
    /// assert_eq!(Node::number(Number::approx(f64::NAN)), Node::Undefined);
    /// ```
    #[must_use]
    pub fn number(value: Number) -> Self {
        if value.is_nan() {
            return Self::Undefined;
        }
        match value {
            Number::Approx(v) if v.0.is_infinite() => Self::Infinity { negative: v.0 < 0.0 },
            other => Self::Number(other),
        }
    }

    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self::number(Number::approx(value))
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(number) => Some(number),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_exact(&self) -> Option<&BigRational> {
        match self {
            Self::Number(Number::Exact(value)) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    /// Whether the node is a decided or undecided comparison.
    #[must_use]
    pub const fn is_truth_value(&self) -> bool {
        matches!(self, Self::Boolean(_) | Self::Comparison { .. })
    }

    /// Whether the tree denotes a plain number once constants and calls are
    /// approximated: it contains no units, unknowns, booleans or undefined
    /// parts.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Number(_) | Self::Infinity { .. } => true,
            Self::Symbol { kind, .. } => *kind == SymbolKind::Constant,
            Self::Boolean(_) | Self::Undefined | Self::Comparison { .. } => false,
            Self::Sum(items) | Self::Product(items) => items.iter().all(Self::is_numeric),
            Self::Power { base, exponent } => base.is_numeric() && exponent.is_numeric(),
            Self::Call { arguments, .. } => arguments.iter().all(Self::is_numeric),
        }
    }

    /// Splits a term into its numeric coefficient and the remaining factors.
    ///
    /// # Example
    /// ```
    /// use reckon::interpreter::value::{
    ///     node::{Node, SymbolKind},
    ///     number::Number,
    /// };
    ///
    /// let x = Node::Symbol { name: "x".to_string(),
    ///                        kind: SymbolKind::Unknown, };
    /// let term = Node::Product(vec![Node::integer(3), x.clone()]);
    ///
    /// assert_eq!(term.split_coefficient(), (Number::integer(3), x.clone()));
    /// assert_eq!(x.clone().split_coefficient(), (Number::one(), x));
    /// ```
    #[must_use]
    pub fn split_coefficient(self) -> (Number, Self) {
        match self {
            Self::Product(factors) => {
                let mut iter = factors.into_iter();
                match iter.next() {
                    Some(Self::Number(coefficient)) => {
                        let mut rest: Vec<Self> = iter.collect();
                        let rest = match rest.len() {
                            0 => Self::integer(1),
                            1 => rest.remove(0),
                            _ => Self::Product(rest),
                        };
                        (coefficient, rest)
                    },
                    first => (Number::one(), Self::Product(first.into_iter().chain(iter).collect())),
                }
            },
            other => (Number::one(), other),
        }
    }

    /// Whether the term prints with a leading minus sign.
    #[must_use]
    pub fn is_negative_term(&self) -> bool {
        match self {
            Self::Number(number) => number.is_negative(),
            Self::Infinity { negative } => *negative,
            Self::Product(factors) => factors.first().is_some_and(Self::is_negative_term),
            _ => false,
        }
    }

    /// Converts an expression into a tree without evaluating anything.
    ///
    /// Used for the parts of the input an interrupted evaluation did not
    /// reach.
    #[must_use]
    pub fn from_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Number { value, .. } => Self::rational(value.clone()),
            Expr::Symbol { name, category, .. } => {
                let kind = match category {
                    Some(Category::Unit) => SymbolKind::Unit,
                    None => SymbolKind::Unknown,
                    Some(_) => SymbolKind::Variable,
                };
                Self::Symbol { name: name.clone(),
                               kind }
            },
            Expr::Unary { op: UnaryOperator::Negate,
                          operand,
                          .. } => Self::Product(vec![Self::integer(-1), Self::from_expr(operand)]),
            Expr::Unary { op: UnaryOperator::Factorial,
                          operand,
                          .. } => Self::Call { name:      "factorial".to_string(),
                                               arguments: vec![Self::from_expr(operand)], },
            Expr::Binary { left, op, right, .. } => {
                let left = Self::from_expr(left);
                let right = Self::from_expr(right);
                match op {
                    BinaryOperator::Add => Self::Sum(vec![left, right]),
                    BinaryOperator::Sub => {
                        Self::Sum(vec![left, Self::Product(vec![Self::integer(-1), right])])
                    },
                    BinaryOperator::Mul => Self::Product(vec![left, right]),
                    BinaryOperator::Div => {
                        Self::Product(vec![left,
                                           Self::Power { base:     Box::new(right),
                                                         exponent: Box::new(Self::integer(-1)), }])
                    },
                    BinaryOperator::Pow => Self::Power { base:     Box::new(left),
                                                         exponent: Box::new(right), },
                    op => Self::Comparison { op:    *op,
                                             left:  Box::new(left),
                                             right: Box::new(right), },
                }
            },
            Expr::Call { name, arguments, .. } => {
                Self::Call { name:      name.clone(),
                             arguments: arguments.iter().map(Self::from_expr).collect(), }
            },
            Expr::Implicit { factors, .. } => Self::Product(factors.iter().map(Self::from_expr).collect()),
            Expr::Uncertain { value, error, .. } => {
                Self::Call { name:      UNCERTAIN.to_string(),
                             arguments: vec![Self::from_expr(value), Self::from_expr(error)], }
            },
        }
    }
}

/// Call name of an unevaluated `a ± b`.
pub const UNCERTAIN: &str = "uncertain";
