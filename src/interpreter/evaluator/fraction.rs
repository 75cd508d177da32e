use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;

use crate::{
    interpreter::value::{node::Node, number::Number},
    options::FractionPolicy,
    util::num::{is_terminating, significant_digits},
};

/// Repeating values at least this large, or with a larger denominator,
/// print as decimals.
const DECIMAL_THRESHOLD: u32 = 1_000_000;

/// Chooses how the rational numbers of `root` are displayed.
///
/// Concrete policies are returned unchanged. [`FractionPolicy::Automatic`]
/// becomes [`FractionPolicy::Decimal`] unless a number is better shown as a
/// fraction:
/// - a repeating expansion of moderate size (`1/3`),
/// - a terminating expansion with more than `decimal_digits` significant
///   digits, which would otherwise be rounded,
/// - the coefficient of an irrational product (`π/4`, `√2/2`).
///
/// # Example
/// ```
/// use reckon::{
///     interpreter::{evaluator::fraction::resolve, value::node::Node},
///     options::FractionPolicy,
///     util::num::rational,
/// };
///
/// let quarter = Node::rational(rational(1, 4));
/// let third = Node::rational(rational(1, 3));
///
/// assert_eq!(resolve(FractionPolicy::Automatic, &quarter, 10), FractionPolicy::Decimal);
/// assert_eq!(resolve(FractionPolicy::Automatic, &quarter, 1), FractionPolicy::Fractional);
/// assert_eq!(resolve(FractionPolicy::Automatic, &third, 10), FractionPolicy::Fractional);
/// assert_eq!(resolve(FractionPolicy::Combined, &third, 10), FractionPolicy::Combined);
/// ```
#[must_use]
pub fn resolve(policy: FractionPolicy, root: &Node, decimal_digits: usize) -> FractionPolicy {
    if policy != FractionPolicy::Automatic {
        return policy;
    }
    if prefers_fraction(root, decimal_digits) {
        FractionPolicy::Fractional
    } else {
        FractionPolicy::Decimal
    }
}

fn prefers_fraction(node: &Node, digits: usize) -> bool {
    let any = |items: &[Node]| items.iter().any(|item| prefers_fraction(item, digits));
    match node {
        Node::Number(Number::Exact(value)) => number_prefers_fraction(value, digits),
        Node::Product(factors) => irrational_coefficient(factors) || any(factors),
        Node::Sum(items) | Node::Call { arguments: items, .. } => any(items),
        Node::Power { base, .. } => prefers_fraction(base, digits),
        Node::Comparison { left, right, .. } => prefers_fraction(left, digits) || prefers_fraction(right, digits),
        _ => false,
    }
}

/// Whether the product is a non-integer rational times irrational numeric
/// factors, such as `π/4`.
fn irrational_coefficient(factors: &[Node]) -> bool {
    match factors.split_first() {
        Some((Node::Number(Number::Exact(coefficient)), rest)) => {
            !coefficient.is_integer() && !rest.is_empty() && rest.iter().all(Node::is_numeric)
        },
        _ => false,
    }
}

fn number_prefers_fraction(value: &BigRational, digits: usize) -> bool {
    if value.is_integer() {
        return false;
    }
    let threshold = BigInt::from(DECIMAL_THRESHOLD);
    if value.abs() >= BigRational::from_integer(threshold.clone()) || *value.denom() > threshold {
        return false;
    }
    if is_terminating(value, 10) {
        return significant_digits(value).is_some_and(|significant| significant > digits);
    }
    true
}
