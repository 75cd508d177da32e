use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    diagnostics::Diagnostics,
    error::{EvalError, ParseError},
    interpreter::{
        evaluator::{budget::Budget, fraction},
        locale::normalize,
        parser::core::parse,
        value::{
            node::{Node, SymbolKind, UNCERTAIN},
            number::Number,
            result::{Completion, ResultTree},
        },
    },
    options::{ApproximationPolicy, EvaluationOptions, ParseOptions},
    registry::{Category, SymbolRegistry, SymbolValue},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or an
/// `EvalError` describing the failure.
pub type EvalResult<T> = Result<T, EvalError>;

/// Default relative tolerance used for approximate comparisons.
pub const REL_TOLERANCE: f64 = 1e-10;

/// How deep expression-valued variables may expand into each other.
const MAX_DEPTH: usize = 32;

pub(super) const OVERFLOW: &str = "Floating point overflow.";

/// Evaluates one parsed expression into a [`ResultTree`].
///
/// ## Usage
///
/// An `Evaluator` is created per calculation with the registry, the options
/// and the time budget of that calculation, and consumed by
/// [`Evaluator::evaluate`].
///
/// # Example
/// ```
/// use reckon::{
///     diagnostics::Diagnostics,
///     interpreter::{
///         evaluator::{budget::Budget, core::Evaluator},
///         parser::core::parse,
///         value::node::Node,
///     },
///     options::EvaluationOptions,
///     registry::SymbolRegistry,
/// };
///
/// let registry = SymbolRegistry::new();
/// let options = EvaluationOptions::default();
/// let mut sink = Diagnostics::new();
///
/// let expr = parse("1/3 + 1/6", &options.parse, &registry, &mut sink).unwrap();
/// let result = Evaluator::new(&registry, &options, Budget::unbounded()).evaluate(&expr, &mut sink)
///                                                                       .unwrap();
///
/// assert_eq!(result.root, Node::rational(reckon::util::num::rational(1, 2)));
/// ```
pub struct Evaluator<'a> {
    pub(super) registry: &'a SymbolRegistry,
    pub(super) options:  &'a EvaluationOptions,
    pub(super) budget:   Budget,
    /// The first non-fatal anomaly; later ones are dropped.
    pub(super) anomaly:  Option<String>,
    depth:               usize,
}

impl<'a> Evaluator<'a> {
    #[must_use]
    pub const fn new(registry: &'a SymbolRegistry,
                     options: &'a EvaluationOptions,
                     budget: Budget)
                     -> Self {
        Self { registry,
               options,
               budget,
               anomaly: None,
               depth: 0 }
    }

    /// Evaluates `expr` and applies the approximation and fraction policies.
    ///
    /// At most one Warning is pushed to `diagnostics`: the first anomaly met
    /// while evaluating. Running out of time is not an error; the tree is
    /// returned with [`Completion::Interrupted`].
    ///
    /// # Errors
    /// An [`EvalError`] for structural problems: wrong argument counts, a
    /// truth value used as a number, a recursive variable definition.
    pub fn evaluate(mut self, expr: &Expr, diagnostics: &mut Diagnostics) -> EvalResult<ResultTree> {
        let mut root = self.eval(expr)?;
        let mut approximation = None;

        match self.options.approximation {
            ApproximationPolicy::Approximate => root = self.approximate(&root),
            ApproximationPolicy::Automatic
                if !self.budget.is_expired()
                   && root.is_numeric()
                   && !matches!(root, Node::Number(_) | Node::Infinity { .. }) =>
            {
                let approx = self.approximate(&root);
                if matches!(approx, Node::Number(_) | Node::Infinity { .. }) {
                    approximation = Some(approx);
                }
            },
            _ => {},
        }

        let completion = if self.budget.is_expired() {
            Completion::Interrupted
        } else {
            Completion::Complete
        };
        if let Some(text) = self.anomaly.take() {
            diagnostics.warning(text);
        }

        let fraction = fraction::resolve(self.options.fraction, &root, self.options.decimal_digits);
        Ok(ResultTree { fraction,
                        root,
                        approximation,
                        completion,
                        is_comparison: expr.is_comparison() })
    }

    /// Evaluates an expression into a simplified node.
    ///
    /// Once the budget has expired the expression is carried over
    /// unevaluated.
    pub(super) fn eval(&mut self, expr: &Expr) -> EvalResult<Node> {
        if !self.budget.tick() {
            return Ok(Node::from_expr(expr));
        }

        match expr {
            Expr::Number { value, .. } => Ok(Node::rational(value.clone())),
            Expr::Symbol { name, category, pos } => self.eval_symbol(name, *category, *pos),
            Expr::Unary { op, operand, pos } => {
                let value = self.eval(operand)?;
                expect_value(&value, *pos)?;
                match op {
                    UnaryOperator::Negate => Ok(self.negate(value)),
                    UnaryOperator::Factorial => self.call("factorial", vec![value], *pos),
                }
            },
            Expr::Binary { left, op, right, pos } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                match op {
                    BinaryOperator::Equal
                    | BinaryOperator::NotEqual
                    | BinaryOperator::Less
                    | BinaryOperator::Greater
                    | BinaryOperator::LessEqual
                    | BinaryOperator::GreaterEqual => self.compare(*op, lhs, rhs, *pos),
                    BinaryOperator::Add
                    | BinaryOperator::Sub
                    | BinaryOperator::Mul
                    | BinaryOperator::Div
                    | BinaryOperator::Pow => {
                        expect_value(&lhs, left.position())?;
                        expect_value(&rhs, right.position())?;
                        Ok(self.arithmetic(*op, lhs, rhs))
                    },
                }
            },
            Expr::Call { name, arguments, pos } => {
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    let value = self.eval(argument)?;
                    expect_value(&value, argument.position())?;
                    values.push(value);
                }
                self.call(name, values, *pos)
            },
            Expr::Implicit { factors, .. } => {
                let mut values = Vec::with_capacity(factors.len());
                for factor in factors {
                    let value = self.eval(factor)?;
                    expect_value(&value, factor.position())?;
                    values.push(value);
                }
                Ok(self.multiply(values))
            },
            Expr::Uncertain { value, error, pos } => {
                let centre = self.eval(value)?;
                let spread = self.eval(error)?;
                expect_value(&centre, *pos)?;
                expect_value(&spread, error.position())?;
                Ok(self.uncertain(centre, spread))
            },
        }
    }

    fn arithmetic(&mut self, op: BinaryOperator, lhs: Node, rhs: Node) -> Node {
        match op {
            BinaryOperator::Add => self.add(vec![lhs, rhs]),
            BinaryOperator::Sub => {
                let negated = self.negate(rhs);
                self.add(vec![lhs, negated])
            },
            BinaryOperator::Mul => self.multiply(vec![lhs, rhs]),
            BinaryOperator::Div => self.divide(lhs, rhs),
            _ => self.power(lhs, rhs),
        }
    }

    /// Resolves a symbol reference.
    ///
    /// Constants and unknowns stay symbolic, expression-valued variables are
    /// expanded and evaluated in place.
    fn eval_symbol(&mut self, name: &str, category: Option<Category>, pos: usize) -> EvalResult<Node> {
        let symbol = |kind| Node::Symbol { name: name.to_string(),
                                           kind };
        match category {
            None => Ok(symbol(SymbolKind::Unknown)),
            Some(Category::Unit) => Ok(symbol(SymbolKind::Unit)),
            Some(Category::Function) => Err(EvalError::FunctionAsValue { name:     name.to_string(),
                                                                         position: pos, }),
            Some(Category::Variable) => {
                let value = self.registry.lookup(name).map(|entry| &entry.value);
                match value {
                    Some(SymbolValue::Constant(_)) => Ok(symbol(SymbolKind::Constant)),
                    Some(SymbolValue::Expression(text)) => self.expand(name, text),
                    Some(SymbolValue::Undefined) => Ok(Node::Undefined),
                    Some(SymbolValue::Unknown | SymbolValue::None) | None => Ok(symbol(SymbolKind::Unknown)),
                }
            },
        }
    }

    /// Parses and evaluates the value of an expression-valued variable.
    fn expand(&mut self, name: &str, text: &str) -> EvalResult<Node> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::RecursiveDefinition { name: name.to_string() });
        }

        let options = ParseOptions::default();
        let canonical = normalize(text, &options);
        let mut sink = Diagnostics::new();
        let invalid = |e: ParseError| EvalError::InvalidDefinition { name:   name.to_string(),
                                                                     reason: e.to_string(), };
        let expr = parse(&canonical, &options, self.registry, &mut sink).map_err(invalid)?;

        self.depth += 1;
        let value = self.eval(&expr);
        self.depth -= 1;
        value
    }

    /// Builds the interval `centre ± spread` from the numeric approximations
    /// of both sides; non-numeric sides stay symbolic.
    pub(super) fn uncertain(&mut self, centre: Node, spread: Node) -> Node {
        let approx_centre = self.approximate(&centre);
        let approx_spread = self.approximate(&spread);
        match (approx_centre.as_number(), approx_spread.as_number()) {
            (Some(centre), Some(spread)) => {
                let middle = centre.to_f64();
                let radius = spread.to_f64().abs();
                Node::number(Number::interval(middle - radius, middle + radius))
            },
            _ => Node::Call { name:      UNCERTAIN.to_string(),
                              arguments: vec![centre, spread], },
        }
    }

    /// Records a non-fatal anomaly. Only the first one is reported.
    pub(super) fn note_anomaly(&mut self, text: impl Into<String>) {
        if self.anomaly.is_none() {
            let text = text.into();
            log::debug!("evaluation anomaly: {text}");
            self.anomaly = Some(text);
        }
    }

    /// Records a float overflow when `result` left the `f64` range although
    /// every operand was finite.
    pub(super) fn check_overflow(&mut self, result: &Number, operands: &[&Number]) {
        if !result.is_finite() && !result.is_nan() && operands.iter().all(|n| n.is_finite()) {
            self.note_anomaly(OVERFLOW);
        }
    }
}

/// Fails when a truth value is used where a number is expected.
fn expect_value(node: &Node, position: usize) -> EvalResult<()> {
    if node.is_truth_value() {
        return Err(EvalError::TypeMismatch { details: "a comparison result cannot be used as a number".to_string(),
                                             position });
    }
    Ok(())
}
