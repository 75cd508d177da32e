use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::{
    interpreter::{
        evaluator::{core::Evaluator, simplify::one_half},
        value::{
            node::{Node, SymbolKind},
            number::Number,
        },
    },
    util::num::{integer, rational, strip_factor},
};

fn constant(name: &str) -> Node {
    Node::Symbol { name: name.to_string(),
                   kind: SymbolKind::Constant, }
}

fn is_constant(node: &Node, expected: &str) -> bool {
    matches!(node, Node::Symbol { name, kind: SymbolKind::Constant } if name == expected)
}

/// `q·π` as a node.
fn pi_times(evaluator: &mut Evaluator<'_>, q: BigRational) -> Node {
    evaluator.multiply(vec![Node::rational(q), constant("pi")])
}

/// The rational `q` when `node` is `q·π` (or zero).
fn pi_multiple(node: &Node) -> Option<BigRational> {
    match node {
        Node::Number(Number::Exact(value)) if value.is_zero() => Some(BigRational::zero()),
        symbol if is_constant(symbol, "pi") => Some(BigRational::one()),
        Node::Product(factors) => match factors.as_slice() {
            [Node::Number(Number::Exact(q)), symbol] if is_constant(symbol, "pi") => Some(q.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// `√n / 2`.
fn half_root(evaluator: &mut Evaluator<'_>, n: i64) -> Node {
    let root = evaluator.power(Node::integer(n), one_half());
    evaluator.multiply(vec![Node::rational(rational(1, 2)), root])
}

/// `sin(qπ)` where it has a simple closed form: multiples of π/6 and π/4.
fn sin_of_pi_multiple(evaluator: &mut Evaluator<'_>, q: &BigRational) -> Option<Node> {
    let two = integer(2);
    let mut r = q - (q / &two).floor() * &two;
    let mut negative = false;
    if r >= BigRational::one() {
        r -= BigRational::one();
        negative = true;
    }
    if r > rational(1, 2) {
        r = BigRational::one() - r;
    }

    if r.is_zero() {
        return Some(Node::integer(0));
    }
    let value = if r == rational(1, 6) {
        Node::rational(rational(1, 2))
    } else if r == rational(1, 4) {
        half_root(evaluator, 2)
    } else if r == rational(1, 3) {
        half_root(evaluator, 3)
    } else if r == rational(1, 2) {
        Node::integer(1)
    } else {
        return None;
    };
    Some(if negative { evaluator.negate(value) } else { value })
}

pub(super) fn sqrt(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    Some(evaluator.power(x.clone(), one_half()))
}

pub(super) fn cbrt(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    Some(evaluator.power(x.clone(), Node::rational(rational(1, 3))))
}

pub(super) fn abs(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    match x {
        Node::Number(number) => Some(Node::number(number.abs())),
        Node::Infinity { .. } => Some(Node::Infinity { negative: false }),
        other if other.is_numeric() => {
            let sign = evaluator.approximate(other).as_number().map(Number::to_f64)?;
            Some(if sign < 0.0 { evaluator.negate(other.clone()) } else { other.clone() })
        },
        _ => None,
    }
}

pub(super) fn sin(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    let q = pi_multiple(x)?;
    sin_of_pi_multiple(evaluator, &q)
}

pub(super) fn cos(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    let q = pi_multiple(x)? + rational(1, 2);
    sin_of_pi_multiple(evaluator, &q)
}

pub(super) fn tan(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    let q = pi_multiple(x)?;
    let cosine = sin_of_pi_multiple(evaluator, &(q.clone() + rational(1, 2)))?;
    if cosine.is_zero() {
        return Some(evaluator.undefined_for("tan"));
    }
    let sine = sin_of_pi_multiple(evaluator, &q)?;
    Some(evaluator.divide(sine, cosine))
}

/// `asin(x)` as a multiple of π for `x` in {0, ±1/2, ±1}.
fn asin_exact(evaluator: &mut Evaluator<'_>, name: &str, x: &BigRational) -> Option<Node> {
    if x.abs() > BigRational::one() {
        return Some(evaluator.undefined_for(name));
    }
    let q = if x.is_zero() {
        BigRational::zero()
    } else if x.abs() == rational(1, 2) {
        rational(1, 6)
    } else if x.abs().is_one() {
        rational(1, 2)
    } else {
        return None;
    };
    let q = if x.is_negative() { -q } else { q };
    Some(pi_times(evaluator, q))
}

pub(super) fn asin(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    asin_exact(evaluator, "asin", x.as_exact()?)
}

pub(super) fn acos(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    let arcsine = asin_exact(evaluator, "acos", x.as_exact()?)?;
    if arcsine == Node::Undefined {
        return Some(arcsine);
    }
    let quarter_turn = pi_times(evaluator, rational(1, 2));
    let negated = evaluator.negate(arcsine);
    Some(evaluator.add(vec![quarter_turn, negated]))
}

pub(super) fn atan(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    let x = x.as_exact()?;
    if x.is_zero() {
        Some(Node::integer(0))
    } else if x.abs().is_one() {
        let q = if x.is_negative() { rational(-1, 4) } else { rational(1, 4) };
        Some(pi_times(evaluator, q))
    } else {
        None
    }
}

pub(super) fn sinh(_: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    x.is_zero().then(|| Node::integer(0))
}

pub(super) fn cosh(_: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    x.is_zero().then(|| Node::integer(1))
}

pub(super) fn tanh(_: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    x.is_zero().then(|| Node::integer(0))
}

pub(super) fn exp(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    Some(evaluator.power(constant("e"), x.clone()))
}

pub(super) fn ln(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    match x {
        Node::Number(Number::Exact(value)) if !value.is_positive() => Some(evaluator.undefined_for("ln")),
        Node::Number(Number::Exact(value)) if value.is_one() => Some(Node::integer(0)),
        symbol if is_constant(symbol, "e") => Some(Node::integer(1)),
        Node::Power { base, exponent } if is_constant(base, "e") => Some((**exponent).clone()),
        _ => None,
    }
}

/// The integer `k` with `base^k == value`, if there is one.
///
/// # Example
/// ```text
/// exact_log(1/8, 2) == Some(-3)
/// exact_log(12, 2) == None
/// ```
fn exact_log(value: &BigRational, base: &BigInt) -> Option<BigInt> {
    let (remaining, sign) = if value.denom().is_one() {
        (value.numer().clone(), BigInt::one())
    } else if value.numer().is_one() {
        (value.denom().clone(), -BigInt::one())
    } else {
        return None;
    };

    let (rest, k) = strip_factor(&remaining, base);
    rest.is_one().then(|| BigInt::from(k) * sign)
}

fn logarithm(evaluator: &mut Evaluator<'_>, name: &str, x: &Node, base: &Node) -> Option<Node> {
    let (Some(value), Some(base)) = (x.as_exact(), base.as_exact()) else {
        return None;
    };
    if !value.is_positive() || !base.is_positive() || base.is_one() {
        return Some(evaluator.undefined_for(name));
    }
    if !base.is_integer() {
        return None;
    }
    exact_log(value, &base.to_integer()).map(|k| Node::rational(BigRational::from_integer(k)))
}

pub(super) fn log(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    match args {
        [x] => logarithm(evaluator, "log", x, &Node::integer(10)),
        [x, base] => logarithm(evaluator, "log", x, base),
        _ => None,
    }
}

pub(super) fn log_numeric(args: &[f64]) -> f64 {
    match args {
        [x] => x.log10(),
        [x, base] if *base > 0.0 && *base != 1.0 => x.ln() / base.ln(),
        _ => f64::NAN,
    }
}

pub(super) fn log2(evaluator: &mut Evaluator<'_>, args: &[Node]) -> Option<Node> {
    let [x] = args else { return None };
    logarithm(evaluator, "log2", x, &Node::integer(2))
}
