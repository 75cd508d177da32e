use std::time::{Duration, Instant};

use reckon::{
    Session,
    error::RegistryError,
    options::{Markup, OptionFlags},
    session::INTERFACE_VERSION,
};

const TIMEOUT: Duration = Duration::from_millis(500);
/// Wall-clock allowance past the timeout for formatting and bookkeeping.
const MARGIN: Duration = Duration::from_secs(2);

fn plain(session: &mut Session, src: &str) -> String {
    session.calculate(src, TIMEOUT, OptionFlags::PLAIN_TEXT).output
}

#[test]
fn html_is_the_default_markup() {
    let mut session = Session::new();
    assert_eq!(session.settings().print.markup, Markup::Html);

    let result = session.calculate("1/3", TIMEOUT, OptionFlags::empty());
    assert_eq!(result.output, "<sup>1</sup>⁄<sub>3</sub>");

    let result = session.calculate("x^2", TIMEOUT, OptionFlags::empty());
    assert_eq!(result.input, "<i>x</i><sup>2</sup>");
    assert_eq!(result.output, "<i>x</i><sup>2</sup>");

    let result = session.calculate("3 < 4", TIMEOUT, OptionFlags::empty());
    assert_eq!(result.input, "3 &lt; 4");
    assert_eq!(result.output, "true");
}

#[test]
fn ascii_signs() {
    let mut session = Session::new();
    let flags = OptionFlags::PLAIN_TEXT | OptionFlags::ASCII;

    let result = session.calculate("sqrt(2)", TIMEOUT, flags);
    assert_eq!(result.input, "sqrt(2)");
    assert_eq!(result.output, "sqrt(2) ~= 1.414213562");

    let result = session.calculate("pi - 4", TIMEOUT, flags | OptionFlags::EXACT);
    assert_eq!(result.input, "pi - 4");
    assert_eq!(result.output, "pi - 4");
}

#[test]
fn flags_apply_to_one_call_only() {
    let mut session = Session::new();
    let hex = session.calculate("255", TIMEOUT, OptionFlags::PLAIN_TEXT | OptionFlags::HEXADECIMAL);
    assert_eq!(hex.output, "0xFF");
    assert_eq!(plain(&mut session, "255"), "255");

    let binary = session.calculate("10", TIMEOUT, OptionFlags::PLAIN_TEXT | OptionFlags::BINARY);
    assert_eq!(binary.output, "0b1010");
}

#[test]
fn unknown_flag_bits_are_ignored() {
    let mut session = Session::new();
    let bits = OptionFlags::PLAIN_TEXT.bits() | (1 << 30);
    let result = session.calculate_with_bits("2+2", 500, bits);
    assert_eq!(result.output, "4");
    assert!(result.messages.is_empty());
}

#[test]
fn messages_do_not_leak_between_calls() {
    let mut session = Session::new();
    let first = session.calculate("1/0", TIMEOUT, OptionFlags::PLAIN_TEXT);
    assert_eq!(first.messages, "Warning: Division by zero.\n");

    let second = session.calculate("1", TIMEOUT, OptionFlags::PLAIN_TEXT);
    assert!(second.messages.is_empty());
}

#[test]
fn timeout_returns_a_partial_result() {
    let mut session = Session::new();
    let started = Instant::now();
    let result = session.calculate("15000!", Duration::from_millis(1), OptionFlags::PLAIN_TEXT);

    assert!(started.elapsed() < MARGIN, "took {:?}", started.elapsed());
    assert!(!result.output.is_empty());
    assert!(result.messages
                  .contains("Warning: Calculation timed out; the result is incomplete."),
            "messages: {:?}",
            result.messages);
}

#[test]
fn huge_magnitudes_return_within_the_timeout() {
    let mut session = Session::new();
    for src in ["2^-99999", "1/3^2000", "2^99999 + 1/7"] {
        let started = Instant::now();
        let result = session.calculate(src, Duration::from_millis(1), OptionFlags::PLAIN_TEXT);

        assert!(started.elapsed() < MARGIN, "{src} took {:?}", started.elapsed());
        assert!(!result.output.is_empty(), "{src}: {}", result.messages);
    }
}

#[test]
fn float_overflow_is_reported() {
    let mut session = Session::new();
    let overflow = "Warning: Floating point overflow.\n";

    let result = session.calculate("200!", TIMEOUT, OptionFlags::PLAIN_TEXT | OptionFlags::APPROXIMATE);
    assert_eq!(result.output, "∞");
    assert_eq!(result.messages, overflow);

    for src in ["exp(1000)", "10^10^10", "factorial(20000)"] {
        let result = session.calculate(src, Duration::ZERO, OptionFlags::PLAIN_TEXT);
        assert!(result.output.ends_with(" ≈ ∞"), "{src}: {}", result.output);
        assert_eq!(result.messages, overflow, "{src}");
    }

    let result = session.calculate("170!", TIMEOUT, OptionFlags::PLAIN_TEXT | OptionFlags::APPROXIMATE);
    assert_eq!(result.output, "7.257415615E306");
    assert!(result.messages.is_empty());
}

#[test]
fn automatic_fractions_follow_the_precision() {
    let mut session = Session::new();
    session.set_option("precision", "3").unwrap();
    assert_eq!(session.settings().evaluation.decimal_digits, 3);

    assert_eq!(plain(&mut session, "1234567/1000"), "1\u{2009}234\u{2009}567/1000");
    assert_eq!(plain(&mut session, "0.1234"), "617/5000");
    assert_eq!(plain(&mut session, "0.125"), "0.125");
}

#[test]
fn zero_timeout_is_unbounded() {
    let mut session = Session::new();
    let result = session.calculate("300!/298!", Duration::ZERO, OptionFlags::PLAIN_TEXT);
    assert_eq!(result.output, "89\u{2009}700");
    assert!(result.messages.is_empty());
}

#[test]
fn user_variables() {
    let mut session = Session::new();
    session.set_variables(r#"[{"name": "rate", "value": "3/100", "aliases": ["r"], "description": "Interest"}]"#)
           .unwrap();

    assert_eq!(plain(&mut session, "100 rate"), "3");
    assert_eq!(plain(&mut session, "200r"), "6");

    let variables = session.get_variables();
    let rate = variables.iter().find(|v| v.name == "rate").unwrap();
    assert_eq!(rate.aliases, "rate\tr");
    assert_eq!(rate.description, "Interest");
}

#[test]
fn variables_are_listed_without_hidden_or_unknown_entries() {
    let session = Session::new();
    let names: Vec<String> = session.get_variables().into_iter().map(|v| v.name).collect();

    assert_eq!(names, ["pi", "e", "golden", "euler", "c", "g"]);
    let pi = &session.get_variables()[0];
    assert_eq!(pi.aliases, "pi\tπ");
}

#[test]
fn set_variables_replaces_the_user_set() {
    let mut session = Session::new();
    session.set_variables(r#"[{"name": "a", "value": "1"}]"#).unwrap();
    session.set_variables(r#"[{"name": "b", "value": "2"}]"#).unwrap();

    assert_eq!(plain(&mut session, "b"), "2");
    let result = session.calculate("a", TIMEOUT, OptionFlags::PLAIN_TEXT);
    assert!(result.messages.starts_with("Error: Unknown identifier"));
}

#[test]
fn rejected_batches_keep_the_previous_variables() {
    let mut session = Session::new();
    session.set_variables(r#"[{"name": "a", "value": "5"}]"#).unwrap();

    let collision = session.set_variables(r#"[{"name": "b", "value": "1"}, {"name": "pi", "value": "3"}]"#);
    assert!(matches!(collision, Err(RegistryError::NameCollision { .. })));
    let messages = session.take_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to_string(), "Error: \"pi\" is already defined by \"pi\".");

    assert!(matches!(session.set_variables("not json"), Err(RegistryError::Malformed(_))));
    assert!(matches!(session.set_variables(r#"[{"name": "2x", "value": "1"}]"#),
                     Err(RegistryError::InvalidName { .. })));
    assert!(matches!(session.set_variables(r#"[{"name": "k", "value": " "}]"#),
                     Err(RegistryError::EmptyValue { .. })));
    assert!(matches!(session.set_variables(r#"[{"name": "k", "value": "1 +"}]"#),
                     Err(RegistryError::InvalidValue { .. })));

    assert_eq!(plain(&mut session, "a"), "5");
    assert!(session.registry().lookup("b").is_none());
}

#[test]
fn variables_may_refer_to_each_other() {
    let mut session = Session::new();
    session.set_variables(r#"[{"name": "width", "value": "3 m"}, {"name": "area", "value": "width^2"}]"#)
           .unwrap();
    assert_eq!(plain(&mut session, "area"), "9 m^2");
}

#[test]
fn recursive_definitions_fail_at_evaluation() {
    let mut session = Session::new();
    session.set_variables(r#"[{"name": "a", "value": "a + 1"}]"#).unwrap();

    let result = session.calculate("a", TIMEOUT, OptionFlags::PLAIN_TEXT);
    assert!(result.output.is_empty());
    assert_eq!(result.messages, "Error: The definition of \"a\" refers to itself.\n");
}

#[test]
fn reset_and_serialize_variables() {
    let mut session = Session::new();
    session.set_variables(r#"[{"name": "rate", "value": "3/100"}]"#).unwrap();

    let serialized = session.serialize_variables();
    assert_eq!(serialized, r#"[{"name":"rate","value":"3/100"}]"#);

    session.reset_variables();
    assert!(session.registry().lookup("rate").is_none());
    assert_eq!(session.serialize_variables(), "[]");

    session.set_variables(&serialized).unwrap();
    assert_eq!(plain(&mut session, "100rate"), "3");
}

#[test]
fn options_change_session_defaults() {
    let mut session = Session::new();

    session.set_option("fraction", "combined").unwrap();
    assert_eq!(plain(&mut session, "7/3"), "2 + 1/3");

    session.set_option("precision", "4").unwrap();
    assert_eq!(plain(&mut session, "pi"), "π ≈ 3.142");

    session.set_option("case", "insensitive").unwrap();
    assert_eq!(plain(&mut session, "PI"), "π ≈ 3.142");

    session.set_option("grouping", "locale").unwrap();
    assert_eq!(plain(&mut session, "1234567"), "1,234,567");

    assert!(session.set_option("colour", "blue").is_err());
    assert!(session.set_option("precision", "zero").is_err());
}

#[test]
fn german_locale_input() {
    let mut session = Session::new();
    session.set_option("locale", "de").unwrap();

    assert_eq!(plain(&mut session, "wurzel(2,25)"), "1.5");
    assert_eq!(plain(&mut session, "max(1;2)"), "2");
    assert_eq!(plain(&mut session, "1'000 + 1"), "1001");
}

#[test]
fn result_serializes_to_json() {
    let mut session = Session::new();
    let result = session.calculate("1+1", TIMEOUT, OptionFlags::PLAIN_TEXT);
    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(json, r#"{"input":"1 + 1","output":"2","messages":""}"#);
}

#[test]
fn engine_identity() {
    assert_eq!(Session::version(), INTERFACE_VERSION);
    assert_eq!(Session::version(), 3);
    assert!(Session::info().starts_with("reckon "));
}
