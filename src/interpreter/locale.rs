use crate::options::ParseOptions;

/// Canonical ASCII spelling of a Unicode operator character.
///
/// # Parameters
/// - `c`: The character to translate.
///
/// # Returns
/// The replacement text, or `None` when `c` is not an operator spelling.
const fn operator_spelling(c: char) -> Option<&'static str> {
    match c {
        '×' | '·' | '⋅' | '∙' => Some("*"),
        '÷' | '∕' => Some("/"),
        '−' | '–' => Some("-"),
        '²' => Some("^2"),
        '³' => Some("^3"),
        '≠' => Some("!="),
        '≤' => Some("<="),
        '≥' => Some(">="),
        _ => None,
    }
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphabetic() || c.is_ascii_digit()
}

/// Rewrites localized input into canonical syntax.
///
/// Applied in a single left-to-right pass:
/// - a decimal separator between two digits becomes `.`,
/// - a grouping separator between two digits is removed (an ASCII space is
///   never a grouping separator),
/// - a non-comma argument separator becomes `", "`,
/// - Unicode operators become their ASCII spelling,
/// - localized keywords are replaced by the canonical word (whole words
///   only).
///
/// Everything else passes through unchanged. The output never contains a
/// digit–separator–digit sequence or a localized keyword, so normalizing
/// twice gives the same text as normalizing once.
///
/// # Example
/// ```
/// use reckon::{
///     interpreter::locale::normalize,
///     options::{Locale, ParseOptions},
/// };
///
/// let options = ParseOptions { locale: Locale::german(),
///                              ..ParseOptions::default() };
///
/// let once = normalize("wurzel(2,25) × max(1;2)", &options);
/// assert_eq!(once, "sqrt(2.25) * max(1, 2)");
/// assert_eq!(normalize(&once, &options), once);
///
/// let canonical = ParseOptions::default();
/// assert_eq!(normalize("1\u{2009}000 − 3²", &canonical), "1000 - 3^2");
/// ```
#[must_use]
pub fn normalize(raw: &str, options: &ParseOptions) -> String {
    let locale = &options.locale;
    let chars: Vec<char> = raw.chars().collect();
    let mut output = String::with_capacity(raw.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let between_digits = i > 0
                             && chars[i - 1].is_ascii_digit()
                             && chars.get(i + 1).is_some_and(char::is_ascii_digit);

        if between_digits && c == locale.decimal_separator {
            output.push('.');
        } else if between_digits && c != ' ' && locale.grouping_separators.contains(&c) {
            // dropped
        } else if c == locale.argument_separator && c != ',' {
            output.push_str(", ");
        } else if let Some(spelling) = operator_spelling(c) {
            output.push_str(spelling);
        } else if (c.is_alphabetic() || c == '_') && !locale.keywords.is_empty() {
            let start = i;
            while i + 1 < chars.len() && is_word_char(chars[i + 1]) {
                i += 1;
            }
            let word: String = chars[start..=i].iter().collect();
            match locale.keywords.get(&word) {
                Some(canonical) => output.push_str(canonical),
                None => output.push_str(&word),
            }
        } else {
            output.push(c);
        }
        i += 1;
    }

    if output != raw {
        log::trace!("normalized {raw:?} to {output:?}");
    }
    output
}
