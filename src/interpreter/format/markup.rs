use crate::options::Markup;

/// Spelling of the structural parts of formatted output.
///
/// Except for [`MarkupStyle::escape`] and [`MarkupStyle::symbol`], every
/// method receives fragments that are already marked up.
pub trait MarkupStyle {
    /// Escapes literal text.
    fn escape(&self, text: &str) -> String;

    /// `base` raised to `exponent`.
    fn power(&self, base: &str, exponent: &str) -> String;

    /// Whether [`MarkupStyle::power`] and [`MarkupStyle::radical`] delimit
    /// their operand, so that it needs no parentheses.
    fn delimits_operands(&self) -> bool;

    /// A numeric fraction.
    fn fraction(&self, numerator: &str, denominator: &str) -> String;

    /// A root sign applied to `radicand`.
    fn radical(&self, sign: &str, radicand: &str) -> String;

    /// The name of a variable, constant or unknown.
    fn symbol(&self, name: &str) -> String;
}

/// Plain text output.
pub struct PlainText;

/// HTML fragments for rich display.
///
/// # Example
/// ```
/// use reckon::interpreter::format::markup::{Html, MarkupStyle};
///
/// assert_eq!(Html.escape("a < b & c"), "a &lt; b &amp; c");
/// assert_eq!(Html.power("x", "2"), "x<sup>2</sup>");
/// assert_eq!(Html.fraction("1", "3"), "<sup>1</sup>⁄<sub>3</sub>");
/// assert_eq!(Html.symbol("x"), "<i>x</i>");
/// ```
pub struct Html;

impl MarkupStyle for PlainText {
    fn escape(&self, text: &str) -> String {
        text.to_string()
    }

    fn power(&self, base: &str, exponent: &str) -> String {
        format!("{base}^{exponent}")
    }

    fn delimits_operands(&self) -> bool {
        false
    }

    fn fraction(&self, numerator: &str, denominator: &str) -> String {
        format!("{numerator}/{denominator}")
    }

    fn radical(&self, sign: &str, radicand: &str) -> String {
        format!("{sign}{radicand}")
    }

    fn symbol(&self, name: &str) -> String {
        name.to_string()
    }
}

impl MarkupStyle for Html {
    fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                other => escaped.push(other),
            }
        }
        escaped
    }

    fn power(&self, base: &str, exponent: &str) -> String {
        format!("{base}<sup>{exponent}</sup>")
    }

    fn delimits_operands(&self) -> bool {
        true
    }

    fn fraction(&self, numerator: &str, denominator: &str) -> String {
        format!("<sup>{numerator}</sup>⁄<sub>{denominator}</sub>")
    }

    fn radical(&self, sign: &str, radicand: &str) -> String {
        format!("{sign}<span class=\"radicand\">{radicand}</span>")
    }

    fn symbol(&self, name: &str) -> String {
        format!("<i>{}</i>", self.escape(name))
    }
}

/// The style implementing `markup`.
#[must_use]
pub fn style(markup: Markup) -> &'static dyn MarkupStyle {
    match markup {
        Markup::Plain => &PlainText,
        Markup::Html => &Html,
    }
}
