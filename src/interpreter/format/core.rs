use num_rational::BigRational;
use num_traits::{One, Signed};

use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    interpreter::{
        format::{
            markup::{MarkupStyle, style},
            number::{NumberFormat, Numeral},
        },
        value::{
            node::{Node, SymbolKind, UNCERTAIN},
            number::Number,
            result::ResultTree,
        },
    },
    options::{FractionPolicy, IntervalDisplay, PrintOptions},
    registry::{Category, SymbolRegistry},
    util::num::{is_terminating, rational},
};

// Binding strength of rendered fragments; higher binds tighter.
const COMPARISON: u8 = 1;
const UNCERTAINTY: u8 = 2;
const ADDITIVE: u8 = 3;
const MULTIPLICATIVE: u8 = 4;
const IMPLICIT: u8 = 5;
const NEGATION: u8 = 6;
const POWER: u8 = 7;
const POSTFIX: u8 = 8;
const ATOM: u8 = 9;

/// Rendered text and the precedence of its outermost operator.
struct Fragment {
    text:       String,
    precedence: u8,
}

impl Fragment {
    const fn new(text: String, precedence: u8) -> Self {
        Self { text, precedence }
    }

    const fn atom(text: String) -> Self {
        Self::new(text, ATOM)
    }
}

/// Parenthesizes `fragment` when it binds looser than `min`.
fn wrap(fragment: Fragment, min: u8) -> String {
    if fragment.precedence < min {
        format!("({})", fragment.text)
    } else {
        fragment.text
    }
}

/// Renders expression and result trees as text.
///
/// Parentheses are placed by precedence only where needed, except that a
/// juxtaposition to the right of `/` is always parenthesized so that the
/// echoed input is unambiguous.
///
/// ## Usage
///
/// A `Formatter` borrows the print options and the registry (for display
/// names such as `π`) and is cheap to create per calculation.
///
/// # Example
/// ```
/// use reckon::{
///     diagnostics::Diagnostics,
///     interpreter::{format::core::Formatter, parser::core::parse},
///     options::{Markup, ParseOptions, PrintOptions},
///     registry::SymbolRegistry,
/// };
///
/// let registry = SymbolRegistry::new();
/// let options = PrintOptions { markup: Markup::Plain,
///                              ..PrintOptions::default() };
/// let formatter = Formatter::new(&options, &registry);
///
/// let mut sink = Diagnostics::new();
/// let expr = parse("2*pi^2 - 1/(3+x)", &ParseOptions::default(), &registry, &mut sink).unwrap();
/// assert_eq!(formatter.format_expr(&expr), "2 × π^2 − 1/(3 + x)");
/// ```
pub struct Formatter<'a> {
    options:  &'a PrintOptions,
    registry: &'a SymbolRegistry,
    markup:   &'static dyn MarkupStyle,
    numbers:  NumberFormat<'a>,
}

impl<'a> Formatter<'a> {
    #[must_use]
    pub fn new(options: &'a PrintOptions, registry: &'a SymbolRegistry) -> Self {
        Self { options,
               registry,
               markup: style(options.markup),
               numbers: NumberFormat::new(options) }
    }

    /// Renders a parsed expression, the normalized form of the user's input.
    ///
    /// Literals are written exactly: terminating expansions in full, other
    /// values as fractions.
    #[must_use]
    pub fn format_expr(&self, expr: &Expr) -> String {
        self.expr(expr).text
    }

    /// Renders an evaluation result, followed by `≈ approximation` when the
    /// evaluator attached one.
    #[must_use]
    pub fn format_result(&self, result: &ResultTree) -> String {
        let exact = self.node(&result.root, result.fraction).text;
        match &result.approximation {
            Some(approximation) => {
                let approximate = self.node(approximation, result.fraction).text;
                format!("{exact} {} {approximate}", self.sign("≈", "~="))
            },
            None => exact,
        }
    }

    const fn sign(&self, unicode: &'static str, ascii: &'static str) -> &'static str {
        if self.options.use_unicode_signs { unicode } else { ascii }
    }

    const fn minus(&self) -> &'static str {
        self.sign("−", "-")
    }

    const fn operator(&self, op: BinaryOperator) -> &'static str {
        if self.options.use_unicode_signs {
            op.unicode()
        } else {
            op.ascii()
        }
    }

    fn expr(&self, expr: &Expr) -> Fragment {
        match expr {
            Expr::Number { value, .. } => self.numeral(self.numbers.exact(value), false),
            Expr::Symbol { name, category, .. } => self.symbol(name, *category == Some(Category::Unit)),
            Expr::Unary { op: UnaryOperator::Negate,
                          operand,
                          .. } => self.negated(self.expr(operand)),
            Expr::Unary { op: UnaryOperator::Factorial,
                          operand,
                          .. } => self.factorial(self.expr(operand)),
            Expr::Binary { left, op, right, .. } => self.binary(left, *op, right),
            Expr::Call { name, arguments, .. } => {
                self.call(name, arguments.iter().map(|a| self.expr(a)).collect())
            },
            Expr::Implicit { factors, .. } => self.juxtaposition(factors),
            Expr::Uncertain { value, error, .. } => self.uncertain(self.expr(value), self.expr(error)),
        }
    }

    fn binary(&self, left: &Expr, op: BinaryOperator, right: &Expr) -> Fragment {
        let (precedence, left_min, right_min) = match op {
            BinaryOperator::Add => (ADDITIVE, ADDITIVE, ADDITIVE),
            BinaryOperator::Sub => (ADDITIVE, ADDITIVE, ADDITIVE + 1),
            BinaryOperator::Mul => (MULTIPLICATIVE, MULTIPLICATIVE, MULTIPLICATIVE),
            BinaryOperator::Div => (MULTIPLICATIVE, MULTIPLICATIVE, MULTIPLICATIVE + 1),
            BinaryOperator::Pow => return self.power(self.expr(left), self.expr(right)),
            _ => (COMPARISON, UNCERTAINTY, UNCERTAINTY),
        };

        let lhs = wrap(self.expr(left), left_min);
        let rhs = if op == BinaryOperator::Div && right.is_implicit() {
            format!("({})", self.expr(right).text)
        } else {
            wrap(self.expr(right), right_min)
        };
        let text = if op == BinaryOperator::Div {
            format!("{lhs}/{rhs}")
        } else {
            format!("{lhs} {} {rhs}", self.markup.escape(self.operator(op)))
        };
        Fragment::new(text, precedence)
    }

    /// Factors written side by side, as typed.
    fn juxtaposition(&self, factors: &[Expr]) -> Fragment {
        let mut text = String::new();
        let mut previous: Option<&Expr> = None;
        for factor in factors {
            if let Some(previous) = previous {
                let touching = matches!(previous, Expr::Number { .. })
                               && !matches!(factor,
                                            Expr::Number { .. }
                                            | Expr::Symbol { category: Some(Category::Unit),
                                                             .. });
                if !touching {
                    text.push(' ');
                }
            }
            text.push_str(&wrap(self.expr(factor), POWER));
            previous = Some(factor);
        }
        Fragment::new(text, IMPLICIT)
    }

    fn node(&self, node: &Node, policy: FractionPolicy) -> Fragment {
        match node {
            Node::Number(number) => self.number(number, policy),
            Node::Boolean(value) => Fragment::atom(value.to_string()),
            Node::Symbol { name, kind } => self.symbol(name, *kind == SymbolKind::Unit),
            Node::Undefined => Fragment::atom("undefined".to_string()),
            Node::Infinity { negative } => self.infinity(*negative),
            Node::Sum(terms) => self.sum(terms, policy),
            Node::Product(factors) => self.product(factors, policy),
            Node::Power { exponent, .. } if exponent.as_exact().is_some_and(Signed::is_negative) => {
                self.product(std::slice::from_ref(node), policy)
            },
            Node::Power { base, exponent } => {
                if let Some(exponent) = exponent.as_exact() {
                    if *exponent == rational(1, 2) {
                        return self.radical("√", "sqrt", self.node(base, policy));
                    }
                    if *exponent == rational(1, 3) {
                        return self.radical("∛", "cbrt", self.node(base, policy));
                    }
                }
                self.power(self.node(base, policy), self.node(exponent, FractionPolicy::Fractional))
            },
            Node::Call { name, arguments } => match arguments.as_slice() {
                [value, error] if name == UNCERTAIN => {
                    self.uncertain(self.node(value, policy), self.node(error, policy))
                },
                _ => self.call(name, arguments.iter().map(|a| self.node(a, policy)).collect()),
            },
            Node::Comparison { op, left, right } => {
                let text = format!("{} {} {}",
                                   wrap(self.node(left, policy), UNCERTAINTY),
                                   self.markup.escape(self.operator(*op)),
                                   wrap(self.node(right, policy), UNCERTAINTY));
                Fragment::new(text, COMPARISON)
            },
        }
    }

    fn number(&self, number: &Number, policy: FractionPolicy) -> Fragment {
        match number {
            Number::Exact(value) => self.numeral(self.numbers.rational(&value.abs(), policy), value.is_negative()),
            Number::Approx(value) => self.float(value.0, self.options.precision),
            Number::Interval { lower, upper } => self.interval(lower.0, upper.0),
        }
    }

    fn numeral(&self, numeral: Numeral, negative: bool) -> Fragment {
        let sign = if negative { self.minus() } else { "" };
        match numeral {
            Numeral::Digits(digits) => {
                let precedence = if negative { NEGATION } else { ATOM };
                Fragment::new(format!("{sign}{}", self.markup.escape(&digits)), precedence)
            },
            Numeral::Fraction { numerator, denominator } => {
                let fraction = self.markup
                                   .fraction(&self.markup.escape(&numerator), &self.markup.escape(&denominator));
                Fragment::new(format!("{sign}{fraction}"), MULTIPLICATIVE)
            },
            Numeral::Mixed { whole,
                             numerator,
                             denominator, } => {
                let fraction = self.markup
                                   .fraction(&self.markup.escape(&numerator), &self.markup.escape(&denominator));
                let text = format!("{} + {fraction}", self.markup.escape(&whole));
                if negative {
                    Fragment::new(format!("{sign}({text})"), NEGATION)
                } else {
                    Fragment::new(text, ADDITIVE)
                }
            },
        }
    }

    fn float(&self, value: f64, precision: usize) -> Fragment {
        if value.is_nan() {
            return Fragment::atom("undefined".to_string());
        }
        if value.is_infinite() {
            return self.infinity(value < 0.0);
        }
        self.numeral(Numeral::Digits(self.numbers.float(value, precision)), value < 0.0)
    }

    fn interval(&self, lower: f64, upper: f64) -> Fragment {
        let middle = f64::midpoint(lower, upper);
        let radius = (upper - lower) / 2.0;
        let plus_minus = || {
            self.uncertain(self.float(middle, self.options.precision),
                           self.float(radius, self.options.precision))
        };

        match self.options.interval_display {
            IntervalDisplay::SignificantDigits => self.common_digits(lower, upper).unwrap_or_else(plus_minus),
            IntervalDisplay::Interval => {
                Fragment::atom(format!("interval({}, {})",
                                       self.float(lower, self.options.precision).text,
                                       self.float(upper, self.options.precision).text))
            },
            IntervalDisplay::PlusMinus => plus_minus(),
            IntervalDisplay::Midpoint => self.float(middle, self.options.precision),
        }
    }

    /// Both bounds rounded to the largest number of significant digits on
    /// which they agree.
    fn common_digits(&self, lower: f64, upper: f64) -> Option<Fragment> {
        (1..=self.options.precision).rev().find_map(|precision| {
                                              let low = self.float(lower, precision);
                                              let high = self.float(upper, precision);
                                              (low.text == high.text).then_some(low)
                                          })
    }

    fn infinity(&self, negative: bool) -> Fragment {
        let text = self.sign("∞", "infinity");
        if negative {
            Fragment::new(format!("{}{text}", self.minus()), NEGATION)
        } else {
            Fragment::atom(text.to_string())
        }
    }

    fn symbol(&self, name: &str, unit: bool) -> Fragment {
        let display = self.registry
                          .lookup(name)
                          .map_or(name, |entry| entry.display(self.options.use_unicode_signs));
        if unit {
            Fragment::atom(self.markup.escape(display))
        } else {
            Fragment::atom(self.markup.symbol(display))
        }
    }

    fn negated(&self, operand: Fragment) -> Fragment {
        Fragment::new(format!("{}{}", self.minus(), wrap(operand, POWER)), NEGATION)
    }

    fn factorial(&self, operand: Fragment) -> Fragment {
        Fragment::new(format!("{}!", wrap(operand, POSTFIX)), POSTFIX)
    }

    fn power(&self, base: Fragment, exponent: Fragment) -> Fragment {
        let base = wrap(base, POSTFIX);
        let exponent = if self.markup.delimits_operands() {
            exponent.text
        } else {
            wrap(exponent, ATOM)
        };
        Fragment::new(self.markup.power(&base, &exponent), POWER)
    }

    fn radical(&self, sign: &str, function: &str, radicand: Fragment) -> Fragment {
        if !self.options.use_unicode_signs {
            return Fragment::atom(format!("{function}({})", radicand.text));
        }
        let radicand = if self.markup.delimits_operands() {
            radicand.text
        } else {
            wrap(radicand, ATOM)
        };
        Fragment::new(self.markup.radical(sign, &radicand), POWER)
    }

    fn uncertain(&self, value: Fragment, error: Fragment) -> Fragment {
        let text = format!("{} {} {}",
                           wrap(value, ADDITIVE),
                           self.sign("±", "+/-"),
                           wrap(error, ADDITIVE));
        Fragment::new(text, UNCERTAINTY)
    }

    fn call(&self, name: &str, mut arguments: Vec<Fragment>) -> Fragment {
        if arguments.len() == 1 {
            match name {
                "sqrt" => return self.radical("√", name, arguments.remove(0)),
                "cbrt" => return self.radical("∛", name, arguments.remove(0)),
                "factorial" => return self.factorial(arguments.remove(0)),
                _ => {},
            }
        }
        let display = self.registry
                          .lookup(name)
                          .map_or(name, |entry| entry.display(self.options.use_unicode_signs));
        let arguments: Vec<String> = arguments.into_iter().map(|a| a.text).collect();
        Fragment::atom(format!("{}({})", self.markup.escape(display), arguments.join(", ")))
    }

    /// Renders a sum, writing negative terms after a minus sign.
    fn sum(&self, terms: &[Node], policy: FractionPolicy) -> Fragment {
        let mut text = String::new();
        for (i, term) in terms.iter().enumerate() {
            if i == 0 {
                text.push_str(&wrap(self.node(term, policy), ADDITIVE));
            } else if term.is_negative_term() {
                text.push(' ');
                text.push_str(self.minus());
                text.push(' ');
                text.push_str(&wrap(self.node(&negate_term(term), policy), ADDITIVE + 1));
            } else {
                text.push_str(" + ");
                text.push_str(&wrap(self.node(term, policy), ADDITIVE + 1));
            }
        }
        Fragment::new(text, ADDITIVE)
    }

    /// Renders a product as `numerator/denominator`.
    ///
    /// Factors with a negative exact exponent move to the denominator, and a
    /// fractional coefficient is split between both sides when the fraction
    /// policy asks for fractions: `√2/2` rather than `1/2·√2`.
    fn product(&self, factors: &[Node], policy: FractionPolicy) -> Fragment {
        let mut coefficient = None;
        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for (i, factor) in factors.iter().enumerate() {
            match factor {
                Node::Number(number) if i == 0 => coefficient = Some(number),
                Node::Power { base, exponent } => match exponent.as_exact() {
                    Some(exponent) if exponent.is_negative() => denominator.push(inverted(base, exponent)),
                    _ => numerator.push(factor.clone()),
                },
                other => numerator.push(other.clone()),
            }
        }

        let mut negative = false;
        let mut leading = None;
        let mut divisor = None;
        if let Some(number) = coefficient {
            negative = number.is_negative();
            let magnitude = number.abs();
            match &magnitude {
                Number::Exact(value) if !value.is_integer() && self.splits(value, policy) => {
                    if !value.numer().is_one() {
                        leading = Some(Fragment::atom(self.markup.escape(&self.numbers.integer(value.numer()))));
                    }
                    divisor = Some(Fragment::atom(self.markup.escape(&self.numbers.integer(value.denom()))));
                },
                one if one.is_one() => {},
                other => leading = Some(self.number(other, policy)),
            }
        }

        let mut text = self.join(leading, &numerator, policy);
        if text.is_empty() {
            text.push('1');
        }
        let lower_count = usize::from(divisor.is_some()) + denominator.len();
        if lower_count > 0 {
            let lower = self.join(divisor, &denominator, policy);
            if lower_count > 1 {
                text = format!("{text}/({lower})");
            } else {
                text = format!("{text}/{lower}");
            }
        }
        if negative {
            text.insert_str(0, self.minus());
        }
        Fragment::new(text, MULTIPLICATIVE)
    }

    /// Joins factors: a coefficient touches a following symbol (`2x`), a
    /// unit follows after a space (`5 m`), anything else is separated by a
    /// multiplication dot.
    fn join(&self, leading: Option<Fragment>, factors: &[Node], policy: FractionPolicy) -> String {
        let mut text = leading.map(|fragment| wrap(fragment, IMPLICIT)).unwrap_or_default();
        let after_coefficient = !text.is_empty();
        let mut previous_unit = false;

        for (i, factor) in factors.iter().enumerate() {
            let unit = is_unit(factor);
            let rendered = wrap(self.node(factor, policy), IMPLICIT);
            if !text.is_empty() {
                let separator = if unit && !previous_unit {
                    " "
                } else if i == 0 && after_coefficient && !rendered.starts_with(|c: char| c.is_ascii_digit()) {
                    ""
                } else {
                    self.sign("·", "*")
                };
                text.push_str(separator);
            }
            text.push_str(&rendered);
            previous_unit = unit;
        }
        text
    }

    fn splits(&self, value: &BigRational, policy: FractionPolicy) -> bool {
        match policy {
            FractionPolicy::Fractional | FractionPolicy::Combined => true,
            FractionPolicy::Decimal => false,
            FractionPolicy::DecimalExact | FractionPolicy::Automatic => !is_terminating(value, self.options.base),
        }
    }
}

fn is_unit(node: &Node) -> bool {
    match node {
        Node::Symbol { kind, .. } => *kind == SymbolKind::Unit,
        Node::Power { base, .. } => is_unit(base),
        _ => false,
    }
}

/// `base^(-exponent)`, for a factor moving to the denominator.
fn inverted(base: &Node, exponent: &BigRational) -> Node {
    let exponent = -exponent;
    if exponent.is_one() {
        base.clone()
    } else {
        Node::Power { base:     Box::new(base.clone()),
                      exponent: Box::new(Node::rational(exponent)), }
    }
}

/// The absolute value of a term for which [`Node::is_negative_term`] holds.
fn negate_term(term: &Node) -> Node {
    match term {
        Node::Number(number) => Node::Number(number.neg()),
        Node::Infinity { negative } => Node::Infinity { negative: !negative },
        Node::Product(factors) => match factors.split_first() {
            Some((Node::Number(coefficient), rest)) => {
                let coefficient = coefficient.neg();
                match rest {
                    [single] if coefficient.is_one() => single.clone(),
                    [_, _, ..] if coefficient.is_one() => Node::Product(rest.to_vec()),
                    _ => Node::Product(std::iter::once(Node::Number(coefficient)).chain(rest.iter().cloned())
                                                                                 .collect()),
                }
            },
            _ => term.clone(),
        },
        other => other.clone(),
    }
}
