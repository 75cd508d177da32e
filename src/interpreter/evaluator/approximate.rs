use crate::{
    interpreter::{
        evaluator::core::Evaluator,
        value::node::{Node, SymbolKind},
    },
    registry::SymbolValue,
};

impl Evaluator<'_> {
    /// Replaces exact numbers by floats, named constants by their value and
    /// computes every function call numerically.
    ///
    /// Units and unknowns stay symbolic, so `2 π m` approximates to
    /// `6.283185307 m`.
    pub(super) fn approximate(&mut self, node: &Node) -> Node {
        match node {
            Node::Number(number) => {
                let approx = number.to_approx();
                self.check_overflow(&approx, &[number]);
                Node::number(approx)
            },
            Node::Symbol { name,
                           kind: SymbolKind::Constant, } => {
                match self.registry.lookup(name).map(|entry| &entry.value) {
                    Some(SymbolValue::Constant(value)) => Node::from_f64(*value),
                    _ => node.clone(),
                }
            },
            Node::Sum(terms) => {
                let terms = terms.iter().map(|t| self.approximate(t)).collect();
                self.add(terms)
            },
            Node::Product(factors) => {
                let factors = factors.iter().map(|f| self.approximate(f)).collect();
                self.multiply(factors)
            },
            Node::Power { base, exponent } => {
                let base = self.approximate(base);
                let exponent = self.approximate(exponent);
                self.power(base, exponent)
            },
            Node::Call { name, arguments } => {
                let arguments: Vec<Node> = arguments.iter().map(|a| self.approximate(a)).collect();
                self.call_approximate(name, arguments)
            },
            Node::Comparison { op, left, right } => {
                let left = self.approximate(left);
                let right = self.approximate(right);
                self.decide(*op, left, right)
            },
            Node::Boolean(_) | Node::Symbol { .. } | Node::Undefined | Node::Infinity { .. } => node.clone(),
        }
    }
}
