use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{
    interpreter::{
        evaluator::core::Evaluator,
        value::{node::Node, number::Number},
    },
    util::num::{MAX_EXACT_BITS, estimated_power_bits, exact_root, rational},
};

/// Trial division bound used when extracting exact roots.
const MAX_TRIAL_DIVISOR: u32 = 10_000;
/// Largest root order computed exactly.
const MAX_ROOT_ORDER: u32 = 1_000;

/// A base and exponent collected while multiplying, with whether several
/// factors were merged into it.
struct Factor {
    base:     Node,
    exponent: Node,
    merged:   bool,
}

impl Evaluator<'_> {
    /// `-value`, distributed over sums.
    pub(super) fn negate(&mut self, value: Node) -> Node {
        self.multiply(vec![Node::integer(-1), value])
    }

    /// Adds terms, keeping the result in normal form.
    ///
    /// Numbers are folded into one constant placed last; other terms are
    /// grouped by their non-numeric part and their coefficients summed
    /// (`2m + 3m` is `5 m`). Terms cancelling to zero disappear.
    pub(super) fn add(&mut self, terms: Vec<Node>) -> Node {
        let flat = flatten(terms, |node| match node {
            Node::Sum(items) => Ok(items),
            other => Err(other),
        });
        if self.budget.is_expired() {
            return rebuild_sum(flat);
        }
        if flat.contains(&Node::Undefined) {
            return Node::Undefined;
        }

        let mut constant = Number::zero();
        let mut infinities = (false, false);
        let mut like: Vec<(Node, Number)> = Vec::new();
        for term in flat {
            match term {
                Node::Number(number) => constant = self.sum_of(&constant, &number),
                Node::Infinity { negative: true } => infinities.1 = true,
                Node::Infinity { negative: false } => infinities.0 = true,
                other => {
                    let (coefficient, body) = other.split_coefficient();
                    match like.iter_mut().find(|(existing, _)| *existing == body) {
                        Some((_, sum)) => *sum = self.sum_of(sum, &coefficient),
                        None => like.push((body, coefficient)),
                    }
                },
            }
        }

        match infinities {
            (true, true) => return Node::Undefined,
            (true, false) => return Node::Infinity { negative: false },
            (false, true) => return Node::Infinity { negative: true },
            (false, false) => {},
        }

        let mut result: Vec<Node> = like.into_iter()
                                        .filter(|(_, coefficient)| !coefficient.is_zero())
                                        .map(|(body, coefficient)| scale(coefficient, body))
                                        .collect();
        if result.is_empty() || !constant.is_zero() {
            result.push(Node::number(constant));
        }
        rebuild_sum(result)
    }

    /// Multiplies factors, keeping the result in normal form.
    ///
    /// Numbers are folded into a leading coefficient, equal bases have their
    /// exponents added (`x·x` is `x^2`) and roots of numbers with the same
    /// order are merged (`√2·√3` is `√6`). A numeric coefficient times a
    /// single sum is distributed.
    pub(super) fn multiply(&mut self, factors: Vec<Node>) -> Node {
        let flat = flatten(factors, |node| match node {
            Node::Product(items) => Ok(items),
            other => Err(other),
        });
        if self.budget.is_expired() {
            return rebuild_product(Number::one(), flat);
        }
        if flat.contains(&Node::Undefined) {
            return Node::Undefined;
        }

        let mut coefficient = Number::one();
        let mut infinite = false;
        let mut collected: Vec<Factor> = Vec::new();
        for factor in flat {
            match factor {
                Node::Number(number) => coefficient = self.product_of(&coefficient, &number),
                Node::Infinity { negative } => {
                    infinite = true;
                    if negative {
                        coefficient = coefficient.neg();
                    }
                },
                Node::Power { base, exponent } => self.collect_factor(&mut collected, *base, *exponent),
                other => self.collect_factor(&mut collected, other, Node::integer(1)),
            }
        }
        merge_numeric_roots(&mut collected, |a, b| self.multiply(vec![a, b]));

        let mut rest = Vec::with_capacity(collected.len());
        for Factor { base, exponent, merged } in collected {
            let factor = if merged {
                self.power(base, exponent)
            } else if exponent.is_one() {
                base
            } else {
                Node::Power { base:     Box::new(base),
                              exponent: Box::new(exponent), }
            };
            match factor {
                Node::Number(number) => coefficient = self.product_of(&coefficient, &number),
                Node::Product(items) => {
                    for item in items {
                        match item {
                            Node::Number(number) => coefficient = self.product_of(&coefficient, &number),
                            other => rest.push(other),
                        }
                    }
                },
                Node::Undefined => return Node::Undefined,
                other => rest.push(other),
            }
        }

        if infinite {
            if coefficient.is_zero() {
                self.note_anomaly("Infinity multiplied by zero is undefined.");
                return Node::Undefined;
            }
            let infinity = Node::Infinity { negative: coefficient.is_negative() };
            if rest.is_empty() {
                return infinity;
            }
            rest.insert(0, infinity);
            return Node::Product(rest);
        }
        if coefficient.is_zero() {
            return Node::number(coefficient);
        }

        if let [Node::Sum(_)] = rest.as_slice()
           && !coefficient.is_one()
           && let Some(Node::Sum(terms)) = rest.pop()
        {
            let scaled = terms.into_iter()
                              .map(|term| self.multiply(vec![Node::number(coefficient.clone()), term]))
                              .collect();
            return self.add(scaled);
        }

        rebuild_product(coefficient, rest)
    }

    /// `lhs / rhs`. Division by zero yields [`Node::Undefined`] and an
    /// anomaly.
    pub(super) fn divide(&mut self, lhs: Node, rhs: Node) -> Node {
        if !self.budget.is_expired() && rhs.is_zero() {
            self.note_anomaly("Division by zero.");
            return Node::Undefined;
        }
        let reciprocal = self.power(rhs, Node::integer(-1));
        self.multiply(vec![lhs, reciprocal])
    }

    /// Raises `base` to `exponent`.
    ///
    /// Exact integer powers are computed unless the result would exceed
    /// [`MAX_EXACT_BITS`], rational powers of exact numbers are reduced to a
    /// coefficient times the smallest possible root, and powers of powers
    /// and products are distributed over integer exponents.
    pub(super) fn power(&mut self, base: Node, exponent: Node) -> Node {
        if self.budget.is_expired() {
            return raw_power(base, exponent);
        }
        if base == Node::Undefined || exponent == Node::Undefined {
            return Node::Undefined;
        }
        if let Some(e) = exponent.as_exact() {
            if e.is_zero() {
                return Node::integer(1);
            }
            if e.is_one() {
                return base;
            }
        }
        if base.is_one() && exponent.as_number().is_some() {
            return base;
        }

        match (base, exponent) {
            (Node::Number(Number::Exact(b)), Node::Number(Number::Exact(e))) => self.exact_power(&b, &e),
            (Node::Number(b), Node::Number(e)) => self.float_power(&b, &e),
            (Node::Infinity { negative }, Node::Number(e)) => {
                if e.is_negative() {
                    Node::integer(0)
                } else {
                    let odd = e.as_exact()
                               .is_some_and(|e| e.is_integer() && e.to_integer().is_odd());
                    Node::Infinity { negative: negative && odd }
                }
            },
            (Node::Power { base: inner, exponent: e1 }, Node::Number(n))
                if n.is_integer() || inner.as_exact().is_some_and(Signed::is_positive) =>
            {
                let exponent = self.multiply(vec![*e1, Node::Number(n)]);
                self.power(*inner, exponent)
            },
            (Node::Product(factors), Node::Number(n)) if n.is_integer() => {
                let powered = factors.into_iter()
                                     .map(|factor| self.power(factor, Node::Number(n.clone())))
                                     .collect();
                self.multiply(powered)
            },
            (base, exponent) => raw_power(base, exponent),
        }
    }

    fn collect_factor(&mut self, collected: &mut Vec<Factor>, base: Node, exponent: Node) {
        match collected.iter_mut().find(|f| f.base == base) {
            Some(existing) => {
                let previous = std::mem::replace(&mut existing.exponent, Node::integer(0));
                existing.exponent = self.add(vec![previous, exponent]);
                existing.merged = true;
            },
            None => collected.push(Factor { base,
                                            exponent,
                                            merged: false }),
        }
    }

    fn exact_power(&mut self, base: &BigRational, exponent: &BigRational) -> Node {
        if base.is_zero() {
            if exponent.is_negative() {
                self.note_anomaly("Division by zero.");
                return Node::Undefined;
            }
            return Node::integer(0);
        }
        if exponent.is_integer() {
            return self.integer_power(base, &exponent.to_integer());
        }
        self.rational_power(base, exponent)
    }

    /// `base^exponent` for an integer exponent, by repeated squaring.
    ///
    /// Stays symbolic when the result would be too large or time runs out.
    fn integer_power(&mut self, base: &BigRational, exponent: &BigInt) -> Node {
        let symbolic = || {
            raw_power(Node::rational(base.clone()),
                      Node::rational(BigRational::from_integer(exponent.clone())))
        };
        if estimated_power_bits(base, exponent) > MAX_EXACT_BITS {
            return symbolic();
        }

        let mut result = BigRational::one();
        let mut square = if exponent.is_negative() { base.recip() } else { base.clone() };
        let mut remaining = exponent.abs();
        let two = BigInt::from(2);
        while !remaining.is_zero() {
            if !self.budget.tick() {
                return symbolic();
            }
            if remaining.is_odd() {
                result *= &square;
            }
            remaining /= &two;
            if !remaining.is_zero() {
                square = &square * &square;
            }
        }
        Node::rational(result)
    }

    /// `base^(p/q)` for an exact base and a non-integer exponent.
    ///
    /// The `q`-th root is split into an exact rational part and the smallest
    /// remaining radicand: `12^(1/2)` is `2·√3` and `2^(-1/2)` is `√2/2`.
    fn rational_power(&mut self, base: &BigRational, exponent: &BigRational) -> Node {
        let symbolic = || raw_power(Node::rational(base.clone()), Node::rational(exponent.clone()));
        let Some(order) = exponent.denom().to_u32().filter(|&q| q <= MAX_ROOT_ORDER) else {
            return symbolic();
        };
        let numerator = exponent.numer();
        if estimated_power_bits(base, numerator) > MAX_EXACT_BITS {
            return symbolic();
        }

        if base.is_negative() {
            if order % 2 == 0 {
                self.note_anomaly("An even root of a negative number is not a real number.");
                return Node::Undefined;
            }
            let positive = self.rational_power(&-base, exponent);
            return if numerator.is_odd() { self.negate(positive) } else { positive };
        }

        // a/b = a·b^(q-1) / b^q, so the root of the denominator is b itself.
        let denominator = base.denom();
        let Some(radicand) = self.scaled_radicand(base.numer(), denominator, order) else {
            return symbolic();
        };
        let Some((outside, inside)) = self.extract_root(&radicand, order) else {
            return symbolic();
        };
        let outside = BigRational::new(outside, denominator.clone());

        let (whole, remainder) = numerator.div_mod_floor(&BigInt::from(order));
        let mut coefficient = match self.integer_power(&outside, numerator) {
            Node::Number(Number::Exact(value)) => value,
            _ => return symbolic(),
        };
        if !inside.is_one() {
            match self.integer_power(&BigRational::from_integer(inside.clone()), &whole) {
                Node::Number(Number::Exact(value)) => coefficient *= value,
                _ => return symbolic(),
            }
        }

        if inside.is_one() || remainder.is_zero() {
            return Node::rational(coefficient);
        }
        let root = raw_power(Node::rational(BigRational::from_integer(inside)),
                             Node::rational(BigRational::new(remainder, BigInt::from(order))));
        rebuild_product(Number::Exact(coefficient), vec![root])
    }

    fn scaled_radicand(&mut self, numerator: &BigInt, denominator: &BigInt, order: u32) -> Option<BigInt> {
        if denominator.is_one() {
            return Some(numerator.clone());
        }
        let scale = BigInt::from(order - 1);
        match self.integer_power(&BigRational::from_integer(denominator.clone()), &scale) {
            Node::Number(Number::Exact(value)) => Some(numerator * value.to_integer()),
            _ => None,
        }
    }

    /// Splits `value` into `outside^order · inside` with `inside` as small as
    /// trial division up to [`MAX_TRIAL_DIVISOR`] can make it.
    fn extract_root(&mut self, value: &BigInt, order: u32) -> Option<(BigInt, BigInt)> {
        if let Some(root) = exact_root(value, order) {
            return Some((root, BigInt::one()));
        }

        let mut remaining = value.clone();
        let mut outside = BigInt::one();
        let mut inside = BigInt::one();
        for divisor in 2..=MAX_TRIAL_DIVISOR {
            if !self.budget.tick() {
                return None;
            }
            let divisor = BigInt::from(divisor);
            if &divisor * &divisor > remaining {
                break;
            }
            let mut multiplicity = 0u32;
            while (&remaining % &divisor).is_zero() {
                remaining /= &divisor;
                multiplicity += 1;
            }
            outside *= divisor.pow(multiplicity / order);
            inside *= divisor.pow(multiplicity % order);
        }

        match exact_root(&remaining, order) {
            Some(root) => outside *= root,
            None => inside *= remaining,
        }
        Some((outside, inside))
    }

    /// Powers where at least one side is a float or an interval.
    fn float_power(&mut self, base: &Number, exponent: &Number) -> Node {
        let (b_low, b_high) = base.bounds();
        let (e_low, e_high) = exponent.bounds();
        let integral = exponent.to_f64().fract() == 0.0 && e_low == e_high;
        if b_low < 0.0 && !integral {
            self.note_anomaly("A negative number raised to a non-integer power is not a real number.");
            return Node::Undefined;
        }
        if b_low <= 0.0 && b_high >= 0.0 && e_low < 0.0 {
            self.note_anomaly("Division by zero.");
            return Node::Undefined;
        }

        if !matches!(base, Number::Interval { .. }) && !matches!(exponent, Number::Interval { .. }) {
            let result = Number::approx(base.to_f64().powf(exponent.to_f64()));
            self.check_overflow(&result, &[base, exponent]);
            return Node::number(result);
        }
        let corners = [b_low.powf(e_low), b_low.powf(e_high), b_high.powf(e_low), b_high.powf(e_high)];
        let mut low = corners.iter().copied().fold(f64::INFINITY, f64::min);
        let high = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if b_low < 0.0 && b_high > 0.0 {
            low = low.min(0.0);
        }
        let result = Number::interval(low, high);
        self.check_overflow(&result, &[base, exponent]);
        Node::number(result)
    }

    fn sum_of(&mut self, left: &Number, right: &Number) -> Number {
        let sum = left.add(right);
        self.check_overflow(&sum, &[left, right]);
        sum
    }

    fn product_of(&mut self, left: &Number, right: &Number) -> Number {
        let product = left.mul(right);
        self.check_overflow(&product, &[left, right]);
        product
    }
}

/// Flattens nested sums (or products) one level at a time.
fn flatten(nodes: Vec<Node>, split: impl Fn(Node) -> Result<Vec<Node>, Node>) -> Vec<Node> {
    let mut flat = Vec::with_capacity(nodes.len());
    let mut pending = nodes;
    pending.reverse();
    while let Some(node) = pending.pop() {
        match split(node) {
            Ok(mut items) => {
                items.reverse();
                pending.extend(items);
            },
            Err(leaf) => flat.push(leaf),
        }
    }
    flat
}

/// Merges exact positive bases sharing a non-integer exponent:
/// `√2·√3` becomes `√6`.
fn merge_numeric_roots(collected: &mut Vec<Factor>, mut multiply: impl FnMut(Node, Node) -> Node) {
    let mut i = 0;
    while i < collected.len() {
        let mergeable = |f: &Factor| {
            f.base.as_exact().is_some_and(Signed::is_positive)
            && f.exponent.as_exact().is_some_and(|e| !e.is_integer())
        };
        if mergeable(&collected[i])
           && let Some(j) = (0..i).find(|&j| {
                                      mergeable(&collected[j]) && collected[j].exponent == collected[i].exponent
                                  })
        {
            let later = collected.remove(i);
            let earlier = std::mem::replace(&mut collected[j].base, Node::integer(1));
            collected[j].base = multiply(earlier, later.base);
            collected[j].merged = true;
            continue;
        }
        i += 1;
    }
}

/// `coefficient · body` with `body` free of numeric factors.
fn scale(coefficient: Number, body: Node) -> Node {
    if coefficient.is_one() {
        return body;
    }
    match body {
        Node::Product(mut factors) => {
            factors.insert(0, Node::number(coefficient));
            Node::Product(factors)
        },
        other => Node::Product(vec![Node::number(coefficient), other]),
    }
}

fn rebuild_sum(mut terms: Vec<Node>) -> Node {
    match terms.len() {
        0 => Node::integer(0),
        1 => terms.remove(0),
        _ => Node::Sum(terms),
    }
}

fn rebuild_product(coefficient: Number, mut factors: Vec<Node>) -> Node {
    if !coefficient.is_one() {
        factors.insert(0, Node::number(coefficient));
    }
    match factors.len() {
        0 => Node::integer(1),
        1 => factors.remove(0),
        _ => Node::Product(factors),
    }
}

pub(super) fn raw_power(base: Node, exponent: Node) -> Node {
    Node::Power { base:     Box::new(base),
                  exponent: Box::new(exponent), }
}

/// `1/2` as a node, the exponent of a square root.
pub(super) fn one_half() -> Node {
    Node::rational(rational(1, 2))
}
