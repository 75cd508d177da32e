use reckon::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    diagnostics::{Diagnostics, Severity},
    error::{ParseError, ParseErrorClass},
    interpreter::{locale::normalize, parser::core::parse},
    options::{ImplicitMultiplication, Locale, ParseOptions},
    registry::{Category, SymbolRegistry},
};

fn parse_with(src: &str, options: &ParseOptions) -> Result<Expr, ParseError> {
    let registry = SymbolRegistry::new();
    let mut sink = Diagnostics::new();
    parse(src, options, &registry, &mut sink)
}

fn parse_ok(src: &str) -> Expr {
    parse_with(src, &ParseOptions::default()).unwrap_or_else(|e| panic!("{src:?} failed: {e}"))
}

fn implicit(mode: ImplicitMultiplication) -> ParseOptions {
    ParseOptions { implicit_multiplication: mode,
                   ..ParseOptions::default() }
}

/// Splits a binary node into its parts, failing the test otherwise.
fn binary(expr: &Expr) -> (&Expr, BinaryOperator, &Expr) {
    match expr {
        Expr::Binary { left, op, right, .. } => (left, *op, right),
        other => panic!("expected a binary node, got {other:?}"),
    }
}

#[test]
fn precedence_and_associativity() {
    let parsed = parse_ok("1 + 2 * 3");
    let (left, op, right) = binary(&parsed);
    assert_eq!(op, BinaryOperator::Add);
    assert!(matches!(left, Expr::Number { .. }));
    assert_eq!(binary(right).1, BinaryOperator::Mul);

    let parsed = parse_ok("8 - 4 - 2");
    let (left, op, _) = binary(&parsed);
    assert_eq!(op, BinaryOperator::Sub);
    assert_eq!(binary(left).1, BinaryOperator::Sub);

    let parsed = parse_ok("2^3^2");
    let (_, op, right) = binary(&parsed);
    assert_eq!(op, BinaryOperator::Pow);
    assert_eq!(binary(right).1, BinaryOperator::Pow);
}

#[test]
fn negation_binds_looser_than_power() {
    let Expr::Unary { op, operand, .. } = parse_ok("-2^2") else {
        panic!("expected a negation");
    };
    assert_eq!(op, UnaryOperator::Negate);
    assert_eq!(binary(&operand).1, BinaryOperator::Pow);

    let parsed = parse_ok("2^-1");
    let (_, op, right) = binary(&parsed);
    assert_eq!(op, BinaryOperator::Pow);
    assert!(matches!(right, Expr::Unary { op: UnaryOperator::Negate, .. }));
}

#[test]
fn factorial_is_postfix() {
    let Expr::Unary { op, operand, .. } = parse_ok("3!!") else {
        panic!("expected a factorial");
    };
    assert_eq!(op, UnaryOperator::Factorial);
    assert!(matches!(*operand, Expr::Unary { op: UnaryOperator::Factorial, .. }));
}

#[test]
fn limited_implicit_multiplication() {
    let parsed = parse_ok("1/2x");
    let (_, op, right) = binary(&parsed);
    assert_eq!(op, BinaryOperator::Div);
    assert!(right.is_implicit());

    let Expr::Implicit { factors, .. } = parse_ok("1/2 x") else {
        panic!("expected a juxtaposition");
    };
    assert_eq!(factors.len(), 2);
    assert_eq!(binary(&factors[0]).1, BinaryOperator::Div);
}

#[test]
fn first_and_conventional_implicit_multiplication() {
    let first = implicit(ImplicitMultiplication::First);
    let parsed = parse_with("1/2 x", &first).unwrap();
    let (_, op, right) = binary(&parsed);
    assert_eq!(op, BinaryOperator::Div);
    assert!(right.is_implicit());

    let conventional = implicit(ImplicitMultiplication::Conventional);
    let Expr::Implicit { factors, .. } = parse_with("1/2x", &conventional).unwrap() else {
        panic!("expected a juxtaposition");
    };
    assert_eq!(binary(&factors[0]).1, BinaryOperator::Div);
}

#[test]
fn implicit_notes_are_reported_once() {
    let registry = SymbolRegistry::new();
    let mut sink = Diagnostics::new();
    parse("1/2x + 1/3y", &ParseOptions::default(), &registry, &mut sink).unwrap();

    let messages = sink.drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Info);
    assert!(messages[0].text.contains("\"1/2x\" was read as 1/(2x)"),
            "{}",
            messages[0].text);
}

#[test]
fn function_calls() {
    let Expr::Call { name, arguments, .. } = parse_ok("log(8, 2)") else {
        panic!("expected a call");
    };
    assert_eq!(name, "log");
    assert_eq!(arguments.len(), 2);

    let Expr::Call { name, .. } = parse_ok("choose(5, 2)") else {
        panic!("expected a call");
    };
    assert_eq!(name, "binomial");

    let Expr::Implicit { factors, .. } = parse_ok("sqrt 4x") else {
        panic!("expected a juxtaposition");
    };
    assert!(matches!(&factors[0], Expr::Call { name, .. } if name == "sqrt"));

    let first = implicit(ImplicitMultiplication::First);
    let Expr::Call { arguments, .. } = parse_with("sqrt 4x", &first).unwrap() else {
        panic!("expected a call");
    };
    assert!(arguments[0].is_implicit());
}

#[test]
fn root_sign_takes_a_power() {
    let Expr::Call { name, arguments, .. } = parse_ok("√x^2") else {
        panic!("expected a call");
    };
    assert_eq!(name, "sqrt");
    assert_eq!(binary(&arguments[0]).1, BinaryOperator::Pow);
}

#[test]
fn symbols_carry_their_category() {
    let Expr::Implicit { factors, .. } = parse_ok("3 metres") else {
        panic!("expected a juxtaposition");
    };
    assert!(matches!(&factors[1],
                     Expr::Symbol { name, category: Some(Category::Unit), .. } if name == "m"));

    let unknowns = ParseOptions { unknowns_enabled: true,
                                  ..ParseOptions::default() };
    let Expr::Symbol { name, category, .. } = parse_with("foo", &unknowns).unwrap() else {
        panic!("expected a symbol");
    };
    assert_eq!(name, "foo");
    assert_eq!(category, None);
}

#[test]
fn split_identifiers_keep_positions() {
    let expr = parse_ok("2 + xyz");
    let (_, _, right) = binary(&expr);
    let Expr::Implicit { factors, .. } = right else {
        panic!("expected a split identifier, got {right:?}");
    };
    let positions: Vec<usize> = factors.iter().map(Expr::position).collect();
    assert_eq!(positions, [4, 5, 6]);
}

#[test]
fn comparisons_and_uncertainty() {
    let parsed = parse_ok("1 < 2 + 3");
    let (left, op, _) = binary(&parsed);
    assert_eq!(op, BinaryOperator::Less);
    assert!(matches!(left, Expr::Number { .. }));

    assert_eq!(binary(&parse_ok("2 == 2")).1, BinaryOperator::Equal);
    assert_eq!(binary(&parse_ok("2 != 3")).1, BinaryOperator::NotEqual);

    let Expr::Uncertain { value, error, .. } = parse_ok("10 +/- 0.5") else {
        panic!("expected an uncertainty");
    };
    assert!(matches!(*value, Expr::Number { .. }));
    assert!(matches!(*error, Expr::Number { .. }));
}

#[test]
fn syntax_errors_carry_positions() {
    let defaults = ParseOptions::default();
    assert_eq!(parse_with("1 +", &defaults), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse_with("(1 + 2", &defaults),
               Err(ParseError::UnbalancedParenthesis { position: 0 }));
    assert_eq!(parse_with("1 + 2)", &defaults),
               Err(ParseError::UnbalancedParenthesis { position: 5 }));
    assert_eq!(parse_with("", &defaults), Err(ParseError::Empty));
    assert!(matches!(parse_with("2 $ 3", &defaults),
                     Err(ParseError::UnexpectedToken { position: 2, .. })));
}

#[test]
fn structural_parse_errors() {
    let defaults = ParseOptions::default();
    assert_eq!(parse_with("pi(1, 2)", &defaults),
               Err(ParseError::NotAFunction { name:     "pi".to_string(),
                                              position: 0, }));
    assert_eq!(parse_with("1 + sin", &defaults),
               Err(ParseError::MissingArguments { name:     "sin".to_string(),
                                                  position: 4, }));
}

#[test]
fn error_classes() {
    let defaults = ParseOptions::default();
    let unknown = parse_with("1 + foo", &defaults).unwrap_err();
    assert_eq!(unknown,
               ParseError::UnknownIdentifier { name:     "foo".to_string(),
                                               position: 4, });
    assert_eq!(unknown.class(), ParseErrorClass::UnknownIdentifier);
    assert_eq!(parse_with("1 +", &defaults).unwrap_err().class(), ParseErrorClass::Syntax);
}

#[test]
fn normalization_is_idempotent() {
    let german = ParseOptions { locale: Locale::german(),
                                ..ParseOptions::default() };
    let canonical = ParseOptions::default();

    for (raw, options) in [("wurzel(2,25) × max(1;2)", &german),
                           ("1'000'000,5 ÷ kreiszahl", &german),
                           ("3 − 2 · 4²", &canonical),
                           ("1\u{2009}234\u{a0}567 ≤ 2", &canonical)]
    {
        let once = normalize(raw, options);
        assert_eq!(normalize(&once, options), once, "{raw:?}");
    }

    assert_eq!(normalize("1'000'000,5 ÷ kreiszahl", &german), "1000000.5 / pi");
    assert_eq!(normalize("wurzelx", &german), "wurzelx");
}
