use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{
    interpreter::{
        evaluator::core::Evaluator,
        value::{node::Node, number::Number},
    },
    util::num::{MAX_EXACT_BITS, euler_gamma, f64_to_rational},
};

/// Largest `k` for which `binomial(n, k)` is computed exactly.
const MAX_BINOMIAL_TERMS: u64 = 100_000;

/// `x!` for non-negative integers, through Γ(x + 1). Anything else is a
/// domain error.
pub(super) fn gamma_factorial(x: f64) -> f64 {
    if x >= 0.0 && x.fract() == 0.0 {
        euler_gamma(x + 1.0)
    } else {
        f64::NAN
    }
}

pub(super) fn signum(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() { x } else { x.signum() }
}

/// Estimated bit length of `n!` by Stirling's formula.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn factorial_bits(n: u64) -> u64 {
    if n < 2 {
        return 1;
    }
    let n = n as f64;
    (n * (n.log2() - std::f64::consts::LOG2_E)).max(1.0) as u64
}

pub(super) fn factorial(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    let value = x.as_exact()?;
    if !value.is_integer() || value.is_negative() {
        return Some(evaluator.undefined_for("factorial"));
    }
    let n = value.to_integer().to_u64()?;
    if factorial_bits(n) > MAX_EXACT_BITS {
        return None;
    }

    let mut product = BigInt::one();
    for i in 2..=n {
        if !evaluator.budget.tick() {
            return None;
        }
        product *= i;
    }
    Some(Node::rational(BigRational::from_integer(product)))
}

/// Applies an exact rounding function, approximating irrational numeric
/// arguments first.
fn rounded(evaluator: &mut Evaluator<'_>,
           args: &[Node],
           round: fn(&BigRational) -> BigRational)
           -> Option<Node> {
    let [x] = args else { return None };
    match x {
        Node::Number(Number::Exact(value)) => Some(Node::rational(round(value))),
        Node::Infinity { .. } => Some(x.clone()),
        other if other.is_numeric() => {
            let approx = evaluator.approximate(other);
            let value = approx.as_number().and_then(Number::to_exact)?;
            Some(Node::rational(round(&value)))
        },
        _ => None,
    }
}

pub(super) fn floor(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    rounded(evaluator, args, BigRational::floor)
}

pub(super) fn ceil(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    rounded(evaluator, args, BigRational::ceil)
}

/// Rounds half away from zero.
pub(super) fn round(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    rounded(evaluator, args, BigRational::round)
}

pub(super) fn trunc(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    rounded(evaluator, args, BigRational::trunc)
}

pub(super) fn sign(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    let sign = match x {
        Node::Number(Number::Exact(value)) => value.signum(),
        Node::Infinity { negative: true } => -BigRational::one(),
        Node::Infinity { negative: false } => BigRational::one(),
        other if other.is_numeric() => {
            let approx = evaluator.approximate(other);
            let value = approx.as_number().map(Number::to_f64)?;
            f64_to_rational(signum(value))?
        },
        _ => return None,
    };
    Some(Node::rational(sign))
}

/// Picks the argument ordered first by `wanted`, comparing numeric
/// approximations when arguments are not exact.
fn extremum(evaluator: &mut Evaluator<'_>, args: &[Node], wanted: Ordering) -> Option<Node> {
    if !args.iter().all(Node::is_numeric) {
        return None;
    }
    let mut best: Option<(usize, Number)> = None;
    for (i, arg) in args.iter().enumerate() {
        let value = match arg {
            Node::Number(number @ Number::Exact(_)) => number.clone(),
            other => evaluator.approximate(other).as_number()?.clone(),
        };
        let better = match &best {
            None => true,
            Some((_, current)) => value.compare(current)? == wanted,
        };
        if better {
            best = Some((i, value));
        }
    }
    best.and_then(|(i, _)| args.get(i).cloned())
}

pub(super) fn min(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    extremum(evaluator, args, Ordering::Less)
}

pub(super) fn max(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    extremum(evaluator, args, Ordering::Greater)
}

/// Both arguments as exact integers.
///
/// `Some(Err(()))` when both are exact but one is not an integer.
fn integer_pair(args: &[Node]) -> Option<Result<(BigInt, BigInt), ()>> {
    let [a, b] = args else { return None };
    let (a, b) = (a.as_exact()?, b.as_exact()?);
    if !a.is_integer() || !b.is_integer() {
        return Some(Err(()));
    }
    Some(Ok((a.to_integer(), b.to_integer())))
}

pub(super) fn gcd(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    match integer_pair(args)? {
        Ok((a, b)) => Some(Node::rational(BigRational::from_integer(a.gcd(&b)))),
        Err(()) => Some(evaluator.undefined_for("gcd")),
    }
}

pub(super) fn lcm(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    match integer_pair(args)? {
        Ok((a, b)) => Some(Node::rational(BigRational::from_integer(a.lcm(&b)))),
        Err(()) => Some(evaluator.undefined_for("lcm")),
    }
}

fn float_gcd(a: f64, b: f64) -> f64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0.0 {
        (a, b) = (b, a % b);
    }
    a
}

pub(super) fn gcd_numeric(args: &[f64]) -> f64 {
    match args {
        [a, b] if a.fract() == 0.0 && b.fract() == 0.0 => float_gcd(*a, *b),
        _ => f64::NAN,
    }
}

pub(super) fn lcm_numeric(args: &[f64]) -> f64 {
    match args {
        [a, b] if a.fract() == 0.0 && b.fract() == 0.0 => {
            let divisor = float_gcd(*a, *b);
            if divisor == 0.0 { 0.0 } else { (a * b).abs() / divisor }
        },
        _ => f64::NAN,
    }
}

/// Remainder of floored division; the result has the sign of the divisor.
pub(super) fn modulo(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [a, b] = args else { return None };
    let (a, b) = (a.as_exact()?, b.as_exact()?);
    if b.is_zero() {
        evaluator.note_anomaly("Division by zero.");
        return Some(Node::Undefined);
    }
    Some(Node::rational(a - b * (a / b).floor()))
}

pub(super) fn modulo_numeric(args: &[f64]) -> f64 {
    match args {
        [a, b] => a - b * (a / b).floor(),
        _ => f64::NAN,
    }
}

/// `binomial(n, k)` for an integer `n` (possibly negative) and an integer
/// `k`, via the falling factorial.
pub(super) fn binomial(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let (n, k) = match integer_pair(args)? {
        Ok(pair) => pair,
        Err(()) => return Some(evaluator.undefined_for("binomial")),
    };
    if k.is_negative() || (!n.is_negative() && k > n) {
        return Some(Node::integer(0));
    }
    let terms = k.to_u64().filter(|&k| k <= MAX_BINOMIAL_TERMS)?;

    let mut result = BigRational::one();
    for i in 1..=terms {
        if !evaluator.budget.tick() {
            return None;
        }
        let i = BigInt::from(i);
        result *= BigRational::new(&n - &k + &i, i);
    }
    Some(Node::rational(result))
}

pub(super) fn binomial_numeric(args: &[f64]) -> f64 {
    match args {
        [n, k] if n.fract() == 0.0 && k.fract() == 0.0 && *k >= 0.0 && *n >= *k => {
            euler_gamma(n + 1.0) / (euler_gamma(k + 1.0) * euler_gamma(n - k + 1.0))
        },
        [n, k] if n.fract() == 0.0 && k.fract() == 0.0 => 0.0,
        _ => f64::NAN,
    }
}
