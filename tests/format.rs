use std::time::Duration;

use reckon::{Session, options::OptionFlags};

fn output(session: &mut Session, src: &str, flags: OptionFlags) -> String {
    let result = session.calculate(src, Duration::ZERO, flags | OptionFlags::PLAIN_TEXT);
    assert!(!result.messages.starts_with("Error"), "{src}: {}", result.messages);
    result.output
}

fn with_options(options: &[(&str, &str)]) -> Session {
    let mut session = Session::new();
    for (key, value) in options {
        session.set_option(key, value).unwrap();
    }
    session
}

#[test]
fn digit_grouping() {
    let mut session = Session::new();
    assert_eq!(output(&mut session, "2^20", OptionFlags::empty()), "1\u{2009}048\u{2009}576");
    assert_eq!(output(&mut session, "1234", OptionFlags::empty()), "1234");
    assert_eq!(output(&mut session, "2^100", OptionFlags::NO_GROUPING),
               "1267650600228229401496703205376");

    let mut german = with_options(&[("locale", "de"), ("grouping", "locale")]);
    assert_eq!(output(&mut german, "2^20", OptionFlags::empty()), "1.048.576");
}

#[test]
fn output_bases() {
    let mut session = Session::new();
    assert_eq!(output(&mut session, "255", OptionFlags::HEXADECIMAL), "0xFF");
    assert_eq!(output(&mut session, "255", OptionFlags::BINARY), "0b1111 1111");
    assert_eq!(output(&mut session, "-10", OptionFlags::BINARY), "−0b1010");
    assert_eq!(output(&mut session, "1/2", OptionFlags::HEXADECIMAL), "0x0.8");

    let mut octal = with_options(&[("base", "8")]);
    assert_eq!(output(&mut octal, "64", OptionFlags::empty()), "0o100");

    let mut bare = with_options(&[("base", "16"), ("base_display", "none")]);
    assert_eq!(output(&mut bare, "255", OptionFlags::empty()), "FF");

    let mut alternative = with_options(&[("base", "2"), ("base_display", "alternative")]);
    assert_eq!(output(&mut alternative, "255", OptionFlags::empty()), "0b11111111");
}

#[test]
fn scientific_notation() {
    let mut session = Session::new();
    assert_eq!(output(&mut session, "1/2^30", OptionFlags::DECIMAL), "9.313225746E-10");
    assert_eq!(output(&mut session, "1/2^30", OptionFlags::APPROXIMATE), "9.313225746E-10");
    assert_eq!(output(&mut session, "2^60 + 0.5", OptionFlags::APPROXIMATE), "1.152921505E18");
    assert_eq!(output(&mut session, "0.0000001", OptionFlags::empty()), "0.0000001");
    assert_eq!(output(&mut session, "0.00000001", OptionFlags::empty()), "1E-8");
    assert_eq!(output(&mut session, "1/3 * 10^-9", OptionFlags::DECIMAL), "3.333333333E-10…");

    assert_eq!(output(&mut session, "2^-99999", OptionFlags::DECIMAL), "2.001997808E-30103");
    assert_eq!(output(&mut session, "1/3^2000", OptionFlags::DECIMAL), "5.721245195E-955…");
}

#[test]
fn repeating_expansions() {
    let mut session = Session::new();
    assert_eq!(output(&mut session, "2/3", OptionFlags::DECIMAL), "0.6666666667…");
    assert_eq!(output(&mut session, "-2/3", OptionFlags::DECIMAL), "−0.6666666667…");

    let mut short = with_options(&[("precision", "3"), ("series", "off")]);
    assert_eq!(output(&mut short, "2/3", OptionFlags::DECIMAL), "0.667");
    assert_eq!(output(&mut short, "12345/7", OptionFlags::DECIMAL), "1764");
}

#[test]
fn fraction_layouts() {
    let mut combined = with_options(&[("fraction", "combined")]);
    assert_eq!(output(&mut combined, "-7/3", OptionFlags::empty()), "−(2 + 1/3)");
    assert_eq!(output(&mut combined, "2/3", OptionFlags::empty()), "2/3");

    let mut exact = with_options(&[("fraction", "exact")]);
    assert_eq!(output(&mut exact, "1/8", OptionFlags::empty()), "0.125");
    assert_eq!(output(&mut exact, "1/7", OptionFlags::empty()), "1/7");
    assert_eq!(output(&mut exact, "2^-20", OptionFlags::empty()), "0.00000095367431640625");

    let mut session = Session::new();
    assert_eq!(output(&mut session, "1/8", OptionFlags::FRACTIONAL), "1/8");
}

#[test]
fn interval_display_modes() {
    let mut significant = Session::new();
    assert_eq!(output(&mut significant, "1 ± 0.1", OptionFlags::empty()), "1 ± 0.1");
    assert_eq!(output(&mut significant, "100 ± 0.001", OptionFlags::empty()), "100");

    let mut interval = with_options(&[("interval", "interval")]);
    assert_eq!(output(&mut interval, "1 ± 0.1", OptionFlags::empty()), "interval(0.9, 1.1)");

    let mut midpoint = with_options(&[("interval", "midpoint")]);
    assert_eq!(output(&mut midpoint, "1 ± 0.1", OptionFlags::empty()), "1");

    assert_eq!(output(&mut significant, "1 +/- 0.1", OptionFlags::ASCII), "1 +/- 0.1");
}

#[test]
fn ascii_and_unicode_operators() {
    let mut session = Session::new();
    let result = session.calculate("2*3 - 1 <= x",
                                   Duration::ZERO,
                                   OptionFlags::PLAIN_TEXT | OptionFlags::ASCII);
    assert_eq!(result.input, "2 * 3 - 1 <= x");

    let result = session.calculate("2*3 - 1 <= x", Duration::ZERO, OptionFlags::PLAIN_TEXT);
    assert_eq!(result.input, "2 × 3 − 1 ≤ x");
    assert_eq!(result.output, "5 ≤ x");

    let mut ascii = with_options(&[("unicode", "off")]);
    assert_eq!(output(&mut ascii, "golden", OptionFlags::EXACT), "golden");
}

#[test]
fn html_markup() {
    let mut session = Session::new();
    let html = |session: &mut Session, src: &str| session.calculate(src, Duration::ZERO, OptionFlags::EXACT);

    assert_eq!(html(&mut session, "sqrt(2)").output, "√<span class=\"radicand\">2</span>");
    assert_eq!(html(&mut session, "2 pi").output, "2<i>π</i>");
    assert_eq!(html(&mut session, "5 m").output, "5 m");
    assert_eq!(html(&mut session, "x >= 1").input, "<i>x</i> ≥ 1");
    assert_eq!(html(&mut session, "2^(x+1)").output, "2<sup><i>x</i> + 1</sup>");
}
