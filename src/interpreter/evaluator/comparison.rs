use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, REL_TOLERANCE},
        value::{node::Node, number::Number},
    },
    util::num::approx_eq,
};

impl Evaluator<'_> {
    /// Evaluates a comparison.
    ///
    /// Exact numbers compare exactly. Other numeric sides are approximated
    /// and compared with a relative tolerance of [`REL_TOLERANCE`].
    /// Structurally equal sides are equal. Anything else stays an undecided
    /// [`Node::Comparison`].
    ///
    /// # Errors
    /// [`EvalError::TypeMismatch`] when a side is itself a truth value.
    pub(super) fn compare(&mut self,
                          op: BinaryOperator,
                          lhs: Node,
                          rhs: Node,
                          pos: usize)
                          -> EvalResult<Node> {
        if lhs.is_truth_value() || rhs.is_truth_value() {
            return Err(EvalError::TypeMismatch { details:  "comparison results cannot be compared".to_string(),
                                                 position: pos, });
        }
        Ok(self.decide(op, lhs, rhs))
    }

    /// Decides a comparison between two values, see [`Evaluator::compare`].
    pub(super) fn decide(&mut self, op: BinaryOperator, lhs: Node, rhs: Node) -> Node {
        if lhs == Node::Undefined || rhs == Node::Undefined {
            return Node::Undefined;
        }
        if self.budget.is_expired() {
            return undecided(op, lhs, rhs);
        }

        let exact = (lhs.as_number(), rhs.as_number());
        let ordering = if let (Some(Number::Exact(a)), Some(Number::Exact(b))) = exact {
            Some(a.cmp(b))
        } else if lhs.is_numeric() && rhs.is_numeric() {
            let left = self.approximate(&lhs);
            let right = self.approximate(&rhs);
            match (numeric_value(&left), numeric_value(&right)) {
                (Some(a), Some(b)) => order_with_tolerance(&a, &b),
                _ => None,
            }
        } else if lhs == rhs {
            Some(Ordering::Equal)
        } else {
            None
        };

        match ordering {
            Some(ordering) => Node::Boolean(holds(op, ordering)),
            None => undecided(op, lhs, rhs),
        }
    }
}

/// The value of a numeric leaf, infinities included.
fn numeric_value(node: &Node) -> Option<Number> {
    match node {
        Node::Number(number) => Some(number.clone()),
        Node::Infinity { negative: true } => Some(Number::approx(f64::NEG_INFINITY)),
        Node::Infinity { negative: false } => Some(Number::approx(f64::INFINITY)),
        _ => None,
    }
}

fn order_with_tolerance(a: &Number, b: &Number) -> Option<Ordering> {
    let plain = |n: &Number| !matches!(n, Number::Interval { .. });
    if plain(a) && plain(b) && approx_eq(a.to_f64(), b.to_f64(), REL_TOLERANCE) {
        return Some(Ordering::Equal);
    }
    a.compare(b)
}

const fn holds(op: BinaryOperator, ordering: Ordering) -> bool {
    match op {
        BinaryOperator::Equal => matches!(ordering, Ordering::Equal),
        BinaryOperator::NotEqual => !matches!(ordering, Ordering::Equal),
        BinaryOperator::Less => matches!(ordering, Ordering::Less),
        BinaryOperator::Greater => matches!(ordering, Ordering::Greater),
        BinaryOperator::LessEqual => !matches!(ordering, Ordering::Greater),
        BinaryOperator::GreaterEqual => !matches!(ordering, Ordering::Less),
        _ => false,
    }
}

fn undecided(op: BinaryOperator, lhs: Node, rhs: Node) -> Node {
    Node::Comparison { op,
                       left: Box::new(lhs),
                       right: Box::new(rhs) }
}
