use std::fmt;

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, OVERFLOW},
            function::{elementary, integer},
        },
        value::{
            node::{Node, UNCERTAIN},
            number::Number,
        },
    },
};

/// Exact rule of a builtin.
///
/// Receives the evaluated arguments and returns the simplified result, or
/// `None` when the call should stay symbolic.
type ExactRule = fn(&mut Evaluator<'_>, &[Node]) -> Option<Node>;

/// Floating point rule of a builtin; a NaN result marks a domain error.
type NumericRule = fn(&[f64]) -> f64;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin accepts `n` or more arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - the exact rule,
/// - the numeric rule.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                exact: $exact:expr,
                numeric: $numeric:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:    &'static str,
            arity:   Arity,
            exact:   ExactRule,
            numeric: NumericRule,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, exact: $exact, numeric: $numeric },
            )*
        ];
        /// Names of every function the evaluator implements.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "sqrt"      => { arity: Arity::Exact(1), exact: elementary::sqrt, numeric: |a| unary(a, f64::sqrt) },
    "cbrt"      => { arity: Arity::Exact(1), exact: elementary::cbrt, numeric: |a| unary(a, f64::cbrt) },
    "abs"       => { arity: Arity::Exact(1), exact: elementary::abs, numeric: |a| unary(a, f64::abs) },
    "sin"       => { arity: Arity::Exact(1), exact: elementary::sin, numeric: |a| unary(a, f64::sin) },
    "cos"       => { arity: Arity::Exact(1), exact: elementary::cos, numeric: |a| unary(a, f64::cos) },
    "tan"       => { arity: Arity::Exact(1), exact: elementary::tan, numeric: |a| unary(a, f64::tan) },
    "asin"      => { arity: Arity::Exact(1), exact: elementary::asin, numeric: |a| unary(a, f64::asin) },
    "acos"      => { arity: Arity::Exact(1), exact: elementary::acos, numeric: |a| unary(a, f64::acos) },
    "atan"      => { arity: Arity::Exact(1), exact: elementary::atan, numeric: |a| unary(a, f64::atan) },
    "sinh"      => { arity: Arity::Exact(1), exact: elementary::sinh, numeric: |a| unary(a, f64::sinh) },
    "cosh"      => { arity: Arity::Exact(1), exact: elementary::cosh, numeric: |a| unary(a, f64::cosh) },
    "tanh"      => { arity: Arity::Exact(1), exact: elementary::tanh, numeric: |a| unary(a, f64::tanh) },
    "exp"       => { arity: Arity::Exact(1), exact: elementary::exp, numeric: |a| unary(a, f64::exp) },
    "ln"        => { arity: Arity::Exact(1), exact: elementary::ln, numeric: |a| unary(a, f64::ln) },
    "log"       => { arity: Arity::OneOf(&[1, 2]), exact: elementary::log, numeric: elementary::log_numeric },
    "log2"      => { arity: Arity::Exact(1), exact: elementary::log2, numeric: |a| unary(a, f64::log2) },
    "factorial" => { arity: Arity::Exact(1), exact: integer::factorial, numeric: |a| unary(a, integer::gamma_factorial) },
    "floor"     => { arity: Arity::Exact(1), exact: integer::floor, numeric: |a| unary(a, f64::floor) },
    "ceil"      => { arity: Arity::Exact(1), exact: integer::ceil, numeric: |a| unary(a, f64::ceil) },
    "round"     => { arity: Arity::Exact(1), exact: integer::round, numeric: |a| unary(a, f64::round) },
    "trunc"     => { arity: Arity::Exact(1), exact: integer::trunc, numeric: |a| unary(a, f64::trunc) },
    "sign"      => { arity: Arity::Exact(1), exact: integer::sign, numeric: |a| unary(a, integer::signum) },
    "min"       => { arity: Arity::AtLeast(1), exact: integer::min, numeric: |a| a.iter().copied().fold(f64::INFINITY, f64::min) },
    "max"       => { arity: Arity::AtLeast(1), exact: integer::max, numeric: |a| a.iter().copied().fold(f64::NEG_INFINITY, f64::max) },
    "gcd"       => { arity: Arity::Exact(2), exact: integer::gcd, numeric: integer::gcd_numeric },
    "lcm"       => { arity: Arity::Exact(2), exact: integer::lcm, numeric: integer::lcm_numeric },
    "mod"       => { arity: Arity::Exact(2), exact: integer::modulo, numeric: integer::modulo_numeric },
    "binomial"  => { arity: Arity::Exact(2), exact: integer::binomial, numeric: integer::binomial_numeric },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// Returns `true` if the count is permitted, `false` otherwise.
    fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= m,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(counts) => {
                let counts: Vec<String> = counts.iter().map(ToString::to_string).collect();
                write!(f, "{}", counts.join(" or "))
            },
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Applies a one-argument float function.
fn unary(arguments: &[f64], f: fn(f64) -> f64) -> f64 {
    match arguments {
        [x] => f(*x),
        _ => f64::NAN,
    }
}

fn lookup(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|b| b.name == name)
}

impl Evaluator<'_> {
    /// Evaluates a function call.
    ///
    /// The builtin is looked up by canonical name and its arity verified.
    /// Calls with inexact numeric arguments are computed in floating point;
    /// otherwise the exact rule decides, and the call stays symbolic when it
    /// has nothing to offer.
    ///
    /// # Parameters
    /// - `name`: Canonical function name.
    /// - `arguments`: Evaluated arguments.
    /// - `pos`: Byte offset of the call, for error reporting.
    ///
    /// # Returns
    /// The result node or an error if lookup or arity fails.
    pub(in crate::interpreter::evaluator) fn call(&mut self,
                                                  name: &str,
                                                  arguments: Vec<Node>,
                                                  pos: usize)
                                                  -> EvalResult<Node> {
        let Some(builtin) = lookup(name) else {
            return Err(EvalError::UnknownFunction { name:     name.to_string(),
                                                    position: pos, });
        };
        if !builtin.arity.check(arguments.len()) {
            return Err(EvalError::ArgumentCount { name:     name.to_string(),
                                                  expected: builtin.arity.to_string(),
                                                  found:    arguments.len(),
                                                  position: pos, });
        }
        Ok(self.apply(builtin, arguments))
    }

    /// Re-evaluates a call whose arguments have been approximated.
    pub(in crate::interpreter::evaluator) fn call_approximate(&mut self,
                                                              name: &str,
                                                              arguments: Vec<Node>)
                                                              -> Node {
        if name == UNCERTAIN
           && let [centre, spread] = arguments.as_slice()
        {
            return self.uncertain(centre.clone(), spread.clone());
        }
        match lookup(name) {
            Some(builtin) if builtin.arity.check(arguments.len()) => self.apply(builtin, arguments),
            _ => Node::Call { name: name.to_string(),
                              arguments },
        }
    }

    fn apply(&mut self, builtin: &BuiltinDef, arguments: Vec<Node>) -> Node {
        if self.budget.is_expired() {
            return Node::Call { name: builtin.name.to_string(),
                                arguments };
        }
        if arguments.contains(&Node::Undefined) {
            return Node::Undefined;
        }

        let numbers: Option<Vec<Number>> = arguments.iter().map(|a| a.as_number().cloned()).collect();
        if let Some(numbers) = numbers
           && numbers.iter().any(|n| !n.is_exact())
        {
            return self.apply_numeric(builtin, &numbers);
        }

        if let Some(result) = (builtin.exact)(self, &arguments) {
            return result;
        }
        Node::Call { name: builtin.name.to_string(),
                     arguments }
    }

    /// Computes a builtin in floating point.
    ///
    /// Interval arguments are evaluated at every combination of bounds (and
    /// at zero for a single argument straddling it); the result spans the
    /// values obtained.
    fn apply_numeric(&mut self, builtin: &BuiltinDef, numbers: &[Number]) -> Node {
        if !numbers.iter().any(|n| matches!(n, Number::Interval { .. })) {
            let values: Vec<f64> = numbers.iter().map(Number::to_f64).collect();
            let result = (builtin.numeric)(&values);
            return self.check_numeric(builtin.name, &values, result);
        }

        let mut corners: Vec<Vec<f64>> = vec![Vec::new()];
        for number in numbers {
            let (low, high) = number.bounds();
            corners = corners.into_iter()
                             .flat_map(|prefix| {
                                 [low, high].into_iter().map(move |bound| {
                                                            let mut corner = prefix.clone();
                                                            corner.push(bound);
                                                            corner
                                                        })
                             })
                             .collect();
        }
        if let [single] = numbers {
            let (low, high) = single.bounds();
            if low < 0.0 && high > 0.0 {
                corners.push(vec![0.0]);
            }
        }

        let results: Vec<f64> = corners.iter().map(|c| (builtin.numeric)(c)).collect();
        if results.iter().any(|r| r.is_nan()) {
            self.note_anomaly(format!("{}() is not defined for this argument in the real numbers.",
                                      builtin.name));
            return Node::Undefined;
        }
        let low = results.iter().copied().fold(f64::INFINITY, f64::min);
        let high = results.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Node::number(Number::interval(low, high))
    }

    fn check_numeric(&mut self, name: &str, values: &[f64], result: f64) -> Node {
        if result.is_nan() {
            self.note_anomaly(format!("{name}() is not defined for this argument in the real numbers."));
            return Node::Undefined;
        }
        if result.is_infinite() && values.iter().all(|v| v.is_finite()) {
            if values.iter().all(|v| v.abs() > 1.0) {
                self.note_anomaly(OVERFLOW);
                return Node::from_f64(result);
            }
            self.note_anomaly(format!("{name}() is not defined for this argument in the real numbers."));
            return Node::Undefined;
        }
        Node::from_f64(result)
    }

    /// Records a domain error of `name` and returns [`Node::Undefined`].
    pub(super) fn undefined_for(&mut self, name: &str) -> Node {
        self.note_anomaly(format!("{name}() is not defined for this argument in the real numbers."));
        Node::Undefined
    }
}
