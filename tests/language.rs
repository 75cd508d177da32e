use std::{fs, time::Duration};

use reckon::{CalculationResult, Session, options::OptionFlags};
use walkdir::WalkDir;

#[test]
fn case_files_pass() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/cases").into_iter()
                                   .filter_map(Result::ok)
                                   .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (line, input, expected) in extract_cases(&content) {
            count += 1;
            let result = calculate(&input);
            assert_eq!(result.output,
                       expected,
                       "case at {path:?}:{line} ({input}) produced messages:\n{}",
                       result.messages);
        }
    }

    assert!(count > 0, "No cases found in tests/cases");
}

/// Reads `input => expected` lines; blank lines and `#` comments are
/// skipped.
fn extract_cases(content: &str) -> Vec<(usize, String, String)> {
    content.lines()
           .enumerate()
           .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
           .filter_map(|(i, line)| {
               line.split_once(" => ")
                   .map(|(input, expected)| (i + 1, input.trim().to_string(), expected.trim().to_string()))
           })
           .collect()
}

fn calculate(src: &str) -> CalculationResult {
    calculate_with(src, OptionFlags::empty())
}

fn calculate_with(src: &str, flags: OptionFlags) -> CalculationResult {
    Session::new().calculate(src, Duration::ZERO, flags | OptionFlags::PLAIN_TEXT)
}

fn assert_output(src: &str, expected: &str) {
    let result = calculate(src);
    assert_eq!(result.output, expected, "messages: {}", result.messages);
}

fn assert_failure(src: &str) {
    let result = calculate(src);
    assert!(result.output.is_empty(), "expected no output, got {:?}", result.output);
    assert!(result.messages.starts_with("Error: "),
            "expected an error, got {:?}",
            result.messages);
}

fn assert_message(src: &str, expected: &str) {
    let result = calculate(src);
    assert!(result.messages.contains(expected),
            "expected a message containing {expected:?}, got {:?}",
            result.messages);
}

#[test]
fn exact_arithmetic() {
    assert_output("1/3 + 1/6", "0.5");
    assert_output("2/3 * 3", "2");
    assert_output("(2/3)^2", "4/9");
    assert_output("10^20 - 10^20 + 7", "7");
}

#[test]
fn echoed_input_is_normalized() {
    let result = calculate("2*pi^2 - 1/(3+x)");
    assert_eq!(result.input, "2 × π^2 − 1/(3 + x)");

    let result = calculate("3 − 1");
    assert_eq!(result.input, "3 − 1");
    assert_eq!(result.output, "2");
}

#[test]
fn automatic_approximation() {
    assert_output("sqrt(2)", "√2 ≈ 1.414213562");
    assert_output("pi/4", "π/4 ≈ 0.7853981634");
    assert_output("sqrt(1/2)", "√2/2 ≈ 0.7071067812");
    assert_output("2^(1/2) * 2^(1/2)", "2");
}

#[test]
fn approximation_flags() {
    assert_eq!(calculate_with("sqrt(2)", OptionFlags::APPROXIMATE).output, "1.414213562");
    assert_eq!(calculate_with("1/3", OptionFlags::APPROXIMATE).output, "0.3333333333");
    assert_eq!(calculate_with("sqrt(2)", OptionFlags::EXACT).output, "√2");
    assert_eq!(calculate_with("pi", OptionFlags::EXACT).output, "π");
}

#[test]
fn fraction_flags() {
    assert_eq!(calculate_with("0.5", OptionFlags::FRACTIONAL).output, "1/2");
    assert_eq!(calculate_with("1/3", OptionFlags::DECIMAL).output, "0.3333333333…");
    assert_eq!(calculate_with("1/4", OptionFlags::DECIMAL).output, "0.25");
}

#[test]
fn implicit_multiplication_modes() {
    assert_output("6/2(1+2)", "1");
    assert_output("6/2 (1+2)", "9");
    assert_eq!(calculate_with("6/2(1+2)", OptionFlags::CONVENTIONAL).output, "9");
    assert_eq!(calculate_with("6/2 (1+2)", OptionFlags::IMPLICIT_FIRST).output, "1");

    assert_message("6/2(1+2)", "Info: Implicit multiplication binds tighter than division");
    assert_message("6/2 (1+2)", "Info: Division binds tighter than implicit multiplication");
}

#[test]
fn split_identifiers() {
    assert_output("xy", "x·y");
    assert_message("xy", "Info: Interpreted \"xy\" as x·y.");
}

#[test]
fn domain_anomalies_warn() {
    assert_output("1/0", "undefined");
    assert_message("1/0", "Warning: Division by zero.");
    assert_output("sqrt(-4)", "undefined");
    assert_message("sqrt(-4)", "Warning: An even root of a negative number is not a real number.");
    assert_output("ln(0)", "undefined");
    assert_message("ln(0)", "Warning: ln() is not defined for this argument in the real numbers.");
}

#[test]
fn only_the_first_anomaly_is_reported() {
    let result = calculate("1/0 + ln(0)");
    assert_eq!(result.output, "undefined");
    assert_eq!(result.messages, "Warning: Division by zero.\n");
}

#[test]
fn syntax_errors() {
    assert_failure("1 +");
    assert_failure("(1 + 2");
    assert_failure("1 + 2)");
    assert_failure("2 $ 3");
    assert_message("(1 + 2", "Error: Unbalanced parenthesis at position 0.");
}

#[test]
fn unknown_identifiers() {
    assert_failure("foo + 1");
    assert_message("foo + 1", "Error: Unknown identifier \"foo\" at position 0.");

    let result = calculate_with("foo + 1", OptionFlags::UNKNOWNS);
    assert_eq!(result.output, "foo + 1");
    assert!(result.messages.is_empty());
}

#[test]
fn structural_errors_keep_the_input() {
    let result = calculate("max()");
    assert!(result.output.is_empty());
    assert_eq!(result.input, "max()");
    assert!(result.messages.starts_with("Error: max() expects at least 1 argument(s)"));

    assert_failure("(1 < 2) + 1");
    assert_failure("sin");
}

#[test]
fn comparisons() {
    assert_output("3 > 2", "true");
    assert_output("1/2 = 0.5", "true");
    assert_output("sqrt(2)^2 = 2", "true");
    assert_output("pi < 3", "false");
    assert_output("3 > x", "3 > x");
}

#[test]
fn empty_input_yields_nothing() {
    assert_eq!(calculate(""), CalculationResult::default());
    assert_eq!(calculate("   "), CalculationResult::default());
}
