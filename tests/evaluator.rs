use reckon::{
    diagnostics::{Diagnostics, Severity},
    error::EvalError,
    interpreter::{
        evaluator::{budget::Budget, core::Evaluator},
        parser::core::parse,
        value::{
            node::{Node, SymbolKind},
            number::Number,
            result::{Completion, ResultTree},
        },
    },
    options::{ApproximationPolicy, EvaluationOptions, FractionPolicy},
    registry::SymbolRegistry,
    util::num::rational,
};

fn evaluate_with(src: &str,
                 registry: &SymbolRegistry,
                 options: &EvaluationOptions,
                 budget: Budget)
                 -> (Result<ResultTree, EvalError>, Diagnostics) {
    let mut sink = Diagnostics::new();
    let expr = parse(src, &options.parse, registry, &mut sink).unwrap_or_else(|e| panic!("{src}: {e}"));
    sink.clear();
    let result = Evaluator::new(registry, options, budget).evaluate(&expr, &mut sink);
    (result, sink)
}

fn evaluate(src: &str) -> ResultTree {
    let registry = SymbolRegistry::new();
    let (result, _) = evaluate_with(src, &registry, &EvaluationOptions::default(), Budget::unbounded());
    result.unwrap()
}

fn evaluate_err(src: &str) -> EvalError {
    let registry = SymbolRegistry::new();
    let (result, _) = evaluate_with(src, &registry, &EvaluationOptions::default(), Budget::unbounded());
    result.unwrap_err()
}

fn symbol(name: &str, kind: SymbolKind) -> Node {
    Node::Symbol { name: name.to_string(),
                   kind }
}

#[test]
fn exhausted_budget_returns_the_input() {
    let registry = SymbolRegistry::new();
    let (result, sink) = evaluate_with("1+2",
                                       &registry,
                                       &EvaluationOptions::default(),
                                       Budget::exhausted());
    let result = result.unwrap();

    assert!(result.is_interrupted());
    assert_eq!(result.completion, Completion::Interrupted);
    assert_eq!(result.root, Node::Sum(vec![Node::integer(1), Node::integer(2)]));
    assert_eq!(result.approximation, None);
    assert!(sink.is_empty());
}

#[test]
fn unbounded_evaluation_completes() {
    let result = evaluate("1/3 + 1/6");
    assert_eq!(result.completion, Completion::Complete);
    assert_eq!(result.root, Node::rational(rational(1, 2)));
    assert_eq!(result.fraction, FractionPolicy::Decimal);
}

#[test]
fn automatic_fractions_respect_the_decimal_digits() {
    let registry = SymbolRegistry::new();
    let short = EvaluationOptions { decimal_digits: 3,
                                    ..EvaluationOptions::default() };

    let (result, _) = evaluate_with("1234567/1000", &registry, &short, Budget::unbounded());
    assert_eq!(result.unwrap().fraction, FractionPolicy::Fractional);
    let (result, _) = evaluate_with("0.125", &registry, &short, Budget::unbounded());
    assert_eq!(result.unwrap().fraction, FractionPolicy::Decimal);

    assert_eq!(evaluate("1234567/1000").fraction, FractionPolicy::Decimal);
}

#[test]
fn float_overflow_is_an_anomaly() {
    let registry = SymbolRegistry::new();
    let approximate = EvaluationOptions { approximation: ApproximationPolicy::Approximate,
                                          ..EvaluationOptions::default() };

    let (result, sink) = evaluate_with("200!", &registry, &approximate, Budget::unbounded());
    assert_eq!(result.unwrap().root, Node::Infinity { negative: false });
    assert_eq!(sink.messages().len(), 1);
    assert_eq!(sink.messages()[0].text, "Floating point overflow.");

    let (result, sink) = evaluate_with("10^600 * 2^0.5", &registry, &approximate, Budget::unbounded());
    assert_eq!(result.unwrap().root, Node::Infinity { negative: false });
    assert!(sink.has(Severity::Warning));

    let (result, sink) = evaluate_with("factorial(20000)",
                                       &registry,
                                       &EvaluationOptions::default(),
                                       Budget::unbounded());
    let result = result.unwrap();
    assert!(matches!(result.root, Node::Call { .. }));
    assert_eq!(result.approximation, Some(Node::Infinity { negative: false }));
    assert_eq!(sink.messages()[0].text, "Floating point overflow.");
}

#[test]
fn like_terms_and_factors() {
    let x = symbol("x", SymbolKind::Unknown);
    assert_eq!(evaluate("x + x").root, Node::Product(vec![Node::integer(2), x.clone()]));
    assert_eq!(evaluate("x*x").root,
               Node::Power { base:     Box::new(x.clone()),
                             exponent: Box::new(Node::integer(2)), });
    assert_eq!(evaluate("x - x").root, Node::integer(0));
    assert_eq!(evaluate("3x - 2x").root, x);
}

#[test]
fn automatic_approximation_is_attached() {
    let result = evaluate("sqrt(2)");
    assert!(matches!(result.root, Node::Power { .. }));
    let Some(Node::Number(Number::Approx(value))) = result.approximation else {
        panic!("expected an approximation, got {:?}", result.approximation);
    };
    assert!((value.0 - std::f64::consts::SQRT_2).abs() < 1e-12);

    assert_eq!(evaluate("pi/4").fraction, FractionPolicy::Fractional);
    assert_eq!(evaluate("x + pi").approximation, None);
}

#[test]
fn approximation_policies() {
    let registry = SymbolRegistry::new();

    let exact = EvaluationOptions { approximation: ApproximationPolicy::Exact,
                                    ..EvaluationOptions::default() };
    let (result, _) = evaluate_with("pi", &registry, &exact, Budget::unbounded());
    let result = result.unwrap();
    assert_eq!(result.root, symbol("pi", SymbolKind::Constant));
    assert_eq!(result.approximation, None);

    let approximate = EvaluationOptions { approximation: ApproximationPolicy::Approximate,
                                          ..EvaluationOptions::default() };
    let (result, _) = evaluate_with("1/4", &registry, &approximate, Budget::unbounded());
    assert_eq!(result.unwrap().root, Node::Number(Number::approx(0.25)));
}

#[test]
fn anomalies_become_a_single_warning() {
    let registry = SymbolRegistry::new();
    let (result, sink) = evaluate_with("sqrt(-1) + 1/0",
                                       &registry,
                                       &EvaluationOptions::default(),
                                       Budget::unbounded());

    assert_eq!(result.unwrap().root, Node::Undefined);
    assert_eq!(sink.messages().len(), 1);
    assert!(sink.has(Severity::Warning));
    assert_eq!(sink.messages()[0].text,
               "An even root of a negative number is not a real number.");
}

#[test]
fn comparisons_are_decided_when_numeric() {
    let result = evaluate("1 < 2");
    assert_eq!(result.root, Node::Boolean(true));
    assert!(result.is_comparison);

    assert_eq!(evaluate("sqrt(2)^2 = 2").root, Node::Boolean(true));
    assert!(matches!(evaluate("x > 1").root, Node::Comparison { .. }));
}

#[test]
fn structural_errors() {
    assert!(matches!(evaluate_err("max()"), EvalError::ArgumentCount { found: 0, .. }));
    assert!(matches!(evaluate_err("gcd(1, 2, 3)"), EvalError::ArgumentCount { found: 3, .. }));
    assert!(matches!(evaluate_err("(1 < 2) + 1"), EvalError::TypeMismatch { position: 1, .. }));
}

#[test]
fn variables_expand_until_they_recurse() {
    let mut registry = SymbolRegistry::new();
    registry.define_from(r#"[{"name": "a", "value": "b + 1"}, {"name": "b", "value": "2"}]"#)
            .unwrap();
    let (result, _) = evaluate_with("a", &registry, &EvaluationOptions::default(), Budget::unbounded());
    assert_eq!(result.unwrap().root, Node::integer(3));

    let mut registry = SymbolRegistry::new();
    registry.define_from(r#"[{"name": "p", "value": "q"}, {"name": "q", "value": "2p"}]"#)
            .unwrap();
    let (result, _) = evaluate_with("p", &registry, &EvaluationOptions::default(), Budget::unbounded());
    assert_eq!(result.unwrap_err(),
               EvalError::RecursiveDefinition { name: "p".to_string() });
}
