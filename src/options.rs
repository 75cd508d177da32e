use std::{collections::HashMap, time::Duration};

use bitflags::bitflags;

use crate::error::ConfigError;

/// Controls when exact results are replaced by floating point
/// approximations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApproximationPolicy {
    /// Rational and symbolic simplification only; irrational results stay
    /// symbolic.
    Exact,
    /// The simplified result is approximated numerically.
    Approximate,
    /// Exact evaluation; numeric but irrational results additionally carry
    /// an approximation.
    #[default]
    Automatic,
}

/// Controls how rational numbers are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractionPolicy {
    /// Always a decimal expansion.
    Decimal,
    /// A decimal expansion when it terminates, a fraction otherwise.
    DecimalExact,
    /// Always a fraction (`7/3`).
    Fractional,
    /// A whole part followed by a proper fraction (`2 + 1/3`).
    Combined,
    /// Chosen per result by the evaluator.
    #[default]
    Automatic,
}

/// Decides how juxtaposed factors bind relative to explicit division.
///
/// | input   | `Conventional` | `First`   | `Limited` |
/// |---------|----------------|-----------|-----------|
/// | `1/2x`  | `(1/2)·x`      | `1/(2x)`  | `1/(2x)`  |
/// | `1/2 x` | `(1/2)·x`      | `1/(2x)`  | `(1/2)·x` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImplicitMultiplication {
    /// Juxtaposition is exactly `*`.
    Conventional,
    /// Juxtaposition binds tighter than both `*` and `/`.
    First,
    /// Juxtaposition binds tighter than `/` only while the factors touch.
    #[default]
    Limited,
}

/// How values carrying an uncertainty are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalDisplay {
    /// Only the digits both bounds agree on.
    #[default]
    SignificantDigits,
    /// `interval(lo, hi)`.
    Interval,
    /// `mid ± radius`.
    PlusMinus,
    /// The midpoint alone.
    Midpoint,
}

/// How a non-decimal base is indicated in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseDisplay {
    /// Digits only.
    None,
    /// `0x`/`0o`/`0b` prefixes and nibble grouping for binary.
    #[default]
    Normal,
    /// Prefixes without grouping.
    Alternative,
}

/// Digit grouping of integer parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigitGrouping {
    /// No grouping.
    None,
    /// A thin space every three digits when there are more than four.
    #[default]
    Standard,
    /// The locale's output grouping character every three digits.
    Locale,
}

/// Output markup flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Markup {
    /// Plain text.
    Plain,
    /// HTML fragments (`<sup>`, `<i>`, escaped text).
    #[default]
    Html,
}

/// Locale conventions used by the normalizer and by `Locale` digit grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Decimal separator as typed by the user.
    pub decimal_separator:   char,
    /// Function argument separator as typed by the user.
    pub argument_separator:  char,
    /// Characters accepted as digit grouping between two digits.
    pub grouping_separators: Vec<char>,
    /// Character inserted by `DigitGrouping::Locale`.
    pub output_grouping:     char,
    /// Localized word to canonical word.
    pub keywords:            HashMap<String, String>,
}

impl Locale {
    /// The canonical locale: `.` decimals, `,` arguments, thin and no-break
    /// spaces as grouping.
    ///
    /// # Example
    /// ```
    /// use reckon::options::Locale;
    ///
    /// let locale = Locale::canonical();
    /// assert_eq!(locale.decimal_separator, '.');
    /// assert!(locale.keywords.is_empty());
    /// ```
    #[must_use]
    pub fn canonical() -> Self {
        Self { decimal_separator:   '.',
               argument_separator:  ',',
               grouping_separators: vec!['\u{2009}', '\u{a0}', '\u{202f}'],
               output_grouping:     ',',
               keywords:            HashMap::new(), }
    }

    /// A comma-decimal locale with German function names.
    #[must_use]
    pub fn german() -> Self {
        let keywords = [("wurzel", "sqrt"),
                        ("sinus", "sin"),
                        ("kosinus", "cos"),
                        ("tangens", "tan"),
                        ("kreiszahl", "pi")].into_iter()
                                     .map(|(k, v)| (k.to_string(), v.to_string()))
                                     .collect();
        Self { decimal_separator: ',',
               argument_separator: ';',
               grouping_separators: vec!['\u{2009}', '\u{a0}', '\u{202f}', '\''],
               output_grouping: '.',
               keywords }
    }

    /// Looks a locale up by its configuration name (`canonical`, `en`, `de`).
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "canonical" | "en" | "c" => Some(Self::canonical()),
            "de" | "german" => Some(Self::german()),
            _ => None,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Options consulted while normalizing and parsing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Unresolved identifiers become free unknowns instead of errors.
    pub unknowns_enabled:        bool,
    /// Binding of juxtaposed factors.
    pub implicit_multiplication: ImplicitMultiplication,
    /// When `false`, an exact match still wins and a case-folded match is the
    /// fallback.
    pub case_sensitive:          bool,
    /// Separators and localized keywords.
    pub locale:                  Locale,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { unknowns_enabled:        false,
               implicit_multiplication: ImplicitMultiplication::Limited,
               case_sensitive:          true,
               locale:                  Locale::canonical(), }
    }
}

/// Options consulted by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Wall-clock budget. [`Duration::ZERO`] means unbounded.
    pub timeout:        Duration,
    pub approximation:  ApproximationPolicy,
    pub fraction:       FractionPolicy,
    /// Under [`FractionPolicy::Automatic`], terminating expansions with
    /// more significant digits than this are shown as fractions. Kept equal
    /// to [`PrintOptions::precision`] by [`Settings::set`].
    pub decimal_digits: usize,
    pub parse:          ParseOptions,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self { timeout:        Duration::ZERO,
               approximation:  ApproximationPolicy::default(),
               fraction:       FractionPolicy::default(),
               decimal_digits: 10,
               parse:          ParseOptions::default(), }
    }
}

/// Options consulted by the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    pub use_unicode_signs:        bool,
    pub interval_display:         IntervalDisplay,
    /// Output base, `2..=36`.
    pub base:                     u32,
    pub base_display:             BaseDisplay,
    pub digit_grouping:           DigitGrouping,
    /// Append `…` to truncated repeating expansions.
    pub indicate_infinite_series: bool,
    pub markup:                   Markup,
    /// Significant digits of decimal output.
    pub precision:                usize,
    /// Character used by [`DigitGrouping::Locale`].
    pub locale_grouping:          char,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { use_unicode_signs:        true,
               interval_display:         IntervalDisplay::SignificantDigits,
               base:                     10,
               base_display:             BaseDisplay::Normal,
               digit_grouping:           DigitGrouping::Standard,
               indicate_infinite_series: true,
               markup:                   Markup::Html,
               precision:                10,
               locale_grouping:          ',', }
    }
}

bitflags! {
    /// Per-call overrides passed by the host alongside an expression.
    ///
    /// Flags never change the session defaults; they apply to a single
    /// calculation.
    ///
    /// # Example
    /// ```
    /// use reckon::options::OptionFlags;
    ///
    /// let flags = OptionFlags::from_bits_truncate(0b101);
    /// assert!(flags.contains(OptionFlags::APPROXIMATE));
    /// assert!(flags.contains(OptionFlags::FRACTIONAL));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OptionFlags: u32 {
        const APPROXIMATE    = 1;
        const EXACT          = 1 << 1;
        const FRACTIONAL     = 1 << 2;
        const DECIMAL        = 1 << 3;
        const UNKNOWNS       = 1 << 4;
        const IMPLICIT_FIRST = 1 << 5;
        const CONVENTIONAL   = 1 << 6;
        const ASCII          = 1 << 7;
        const PLAIN_TEXT     = 1 << 8;
        const HEXADECIMAL    = 1 << 9;
        const BINARY         = 1 << 10;
        const NO_GROUPING    = 1 << 11;
    }
}

/// The complete option set held by a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub evaluation: EvaluationOptions,
    pub print:      PrintOptions,
}

impl Settings {
    /// Returns a copy of `self` with the per-call `flags` applied.
    ///
    /// # Example
    /// ```
    /// use reckon::options::{ApproximationPolicy, Markup, OptionFlags, Settings};
    ///
    /// let settings = Settings::default();
    /// let call = settings.with_flags(OptionFlags::APPROXIMATE | OptionFlags::PLAIN_TEXT);
    ///
    /// assert_eq!(call.evaluation.approximation, ApproximationPolicy::Approximate);
    /// assert_eq!(call.print.markup, Markup::Plain);
    /// assert_eq!(settings.print.markup, Markup::Html);
    /// ```
    #[must_use]
    pub fn with_flags(&self, flags: OptionFlags) -> Self {
        let mut settings = self.clone();
        let evaluation = &mut settings.evaluation;
        let print = &mut settings.print;

        if flags.contains(OptionFlags::APPROXIMATE) {
            evaluation.approximation = ApproximationPolicy::Approximate;
        } else if flags.contains(OptionFlags::EXACT) {
            evaluation.approximation = ApproximationPolicy::Exact;
        }
        if flags.contains(OptionFlags::FRACTIONAL) {
            evaluation.fraction = FractionPolicy::Fractional;
        } else if flags.contains(OptionFlags::DECIMAL) {
            evaluation.fraction = FractionPolicy::Decimal;
        }
        if flags.contains(OptionFlags::UNKNOWNS) {
            evaluation.parse.unknowns_enabled = true;
        }
        if flags.contains(OptionFlags::IMPLICIT_FIRST) {
            evaluation.parse.implicit_multiplication = ImplicitMultiplication::First;
        } else if flags.contains(OptionFlags::CONVENTIONAL) {
            evaluation.parse.implicit_multiplication = ImplicitMultiplication::Conventional;
        }
        if flags.contains(OptionFlags::ASCII) {
            print.use_unicode_signs = false;
        }
        if flags.contains(OptionFlags::PLAIN_TEXT) {
            print.markup = Markup::Plain;
        }
        if flags.contains(OptionFlags::HEXADECIMAL) {
            print.base = 16;
        } else if flags.contains(OptionFlags::BINARY) {
            print.base = 2;
        }
        if flags.contains(OptionFlags::NO_GROUPING) {
            print.digit_grouping = DigitGrouping::None;
        }

        settings
    }

    /// Sets one option from its string form.
    ///
    /// Recognized keys: `approximation`, `fraction`, `unknowns`, `implicit`,
    /// `case`, `locale`, `unicode`, `interval`, `base`, `base_display`,
    /// `grouping`, `series`, `markup`, `precision`.
    ///
    /// # Errors
    /// [`ConfigError::UnknownKey`] for an unrecognized key and
    /// [`ConfigError::InvalidValue`] when the value does not fit the key. The
    /// settings are unchanged on error.
    ///
    /// # Example
    /// ```
    /// use reckon::options::{FractionPolicy, Settings};
    ///
    /// let mut settings = Settings::default();
    /// settings.set("fraction", "combined").unwrap();
    /// assert_eq!(settings.evaluation.fraction, FractionPolicy::Combined);
    ///
    /// assert!(settings.set("colour", "blue").is_err());
    /// assert!(settings.set("base", "99").is_err());
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue { key:   key.to_string(),
                                                     value: value.to_string(), };
        let value_lower = value.trim().to_ascii_lowercase();
        let value = value_lower.as_str();

        match key.trim() {
            "approximation" => {
                self.evaluation.approximation = match value {
                    "exact" => ApproximationPolicy::Exact,
                    "approximate" | "approx" => ApproximationPolicy::Approximate,
                    "auto" | "automatic" => ApproximationPolicy::Automatic,
                    _ => return Err(invalid()),
                };
            },
            "fraction" => {
                self.evaluation.fraction = match value {
                    "decimal" => FractionPolicy::Decimal,
                    "exact" | "decimal_exact" => FractionPolicy::DecimalExact,
                    "fraction" | "fractional" => FractionPolicy::Fractional,
                    "combined" => FractionPolicy::Combined,
                    "auto" | "automatic" => FractionPolicy::Automatic,
                    _ => return Err(invalid()),
                };
            },
            "unknowns" => self.evaluation.parse.unknowns_enabled = parse_bool(value).ok_or_else(invalid)?,
            "implicit" => {
                self.evaluation.parse.implicit_multiplication = match value {
                    "conventional" => ImplicitMultiplication::Conventional,
                    "first" => ImplicitMultiplication::First,
                    "limited" => ImplicitMultiplication::Limited,
                    _ => return Err(invalid()),
                };
            },
            "case" => {
                self.evaluation.parse.case_sensitive = match value {
                    "sensitive" => true,
                    "insensitive" => false,
                    other => parse_bool(other).ok_or_else(invalid)?,
                };
            },
            "locale" => {
                let locale = Locale::by_name(value).ok_or_else(invalid)?;
                self.print.locale_grouping = locale.output_grouping;
                self.evaluation.parse.locale = locale;
            },
            "unicode" => self.print.use_unicode_signs = parse_bool(value).ok_or_else(invalid)?,
            "interval" => {
                self.print.interval_display = match value {
                    "significant" | "significant_digits" => IntervalDisplay::SignificantDigits,
                    "interval" => IntervalDisplay::Interval,
                    "plusminus" | "plus_minus" => IntervalDisplay::PlusMinus,
                    "midpoint" => IntervalDisplay::Midpoint,
                    _ => return Err(invalid()),
                };
            },
            "base" => {
                let base = value.parse::<u32>().map_err(|_| invalid())?;
                if !(2..=36).contains(&base) {
                    return Err(invalid());
                }
                self.print.base = base;
            },
            "base_display" => {
                self.print.base_display = match value {
                    "none" => BaseDisplay::None,
                    "normal" => BaseDisplay::Normal,
                    "alternative" => BaseDisplay::Alternative,
                    _ => return Err(invalid()),
                };
            },
            "grouping" => {
                self.print.digit_grouping = match value {
                    "none" | "off" => DigitGrouping::None,
                    "standard" | "on" => DigitGrouping::Standard,
                    "locale" => DigitGrouping::Locale,
                    _ => return Err(invalid()),
                };
            },
            "series" => self.print.indicate_infinite_series = parse_bool(value).ok_or_else(invalid)?,
            "markup" => {
                self.print.markup = match value {
                    "plain" | "text" => Markup::Plain,
                    "html" => Markup::Html,
                    _ => return Err(invalid()),
                };
            },
            "precision" => {
                let precision = value.parse::<usize>().map_err(|_| invalid())?;
                if !(1..=100).contains(&precision) {
                    return Err(invalid());
                }
                self.print.precision = precision;
                self.evaluation.decimal_digits = precision;
            },
            other => return Err(ConfigError::UnknownKey { key: other.to_string() }),
        }

        log::debug!("option {key} set to {value}");
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
