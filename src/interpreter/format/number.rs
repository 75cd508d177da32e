use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::{
    options::{BaseDisplay, DigitGrouping, FractionPolicy, PrintOptions},
    util::num::{f64_to_rational, is_terminating, terminating_digits},
};

const THIN_SPACE: char = '\u{2009}';
/// Decimal output switches to scientific notation when the leading digit
/// sits at or above this power of ten.
const SCIENTIFIC_ABOVE: i64 = 15;
/// ... or below this one.
const SCIENTIFIC_BELOW: i64 = -7;

/// A non-negative number laid out for display, before sign and markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Numeral {
    /// Digits, possibly with a point, prefix, grouping or exponent.
    Digits(String),
    /// `numerator/denominator`.
    Fraction {
        numerator:   String,
        denominator: String,
    },
    /// A whole part and a proper fraction (`2 + 1/3`).
    Mixed {
        whole:       String,
        numerator:   String,
        denominator: String,
    },
}

/// Lays out numbers according to the base, grouping and precision of a set
/// of print options.
///
/// All methods expect non-negative values; signs are the caller's concern.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use reckon::{
///     interpreter::format::number::{NumberFormat, Numeral},
///     options::{FractionPolicy, PrintOptions},
///     util::num::rational,
/// };
///
/// let options = PrintOptions::default();
/// let numbers = NumberFormat::new(&options);
///
/// assert_eq!(numbers.integer(&BigInt::from(1_234_567)), "1\u{2009}234\u{2009}567");
/// assert_eq!(numbers.integer(&BigInt::from(1234)), "1234");
/// assert_eq!(numbers.rational(&rational(2, 3), FractionPolicy::Decimal),
///            Numeral::Digits("0.6666666667…".to_string()));
/// ```
pub struct NumberFormat<'a> {
    options: &'a PrintOptions,
}

impl<'a> NumberFormat<'a> {
    #[must_use]
    pub const fn new(options: &'a PrintOptions) -> Self {
        Self { options }
    }

    /// Writes an integer in the output base, with prefix and grouping.
    #[must_use]
    pub fn integer(&self, value: &BigInt) -> String {
        let digits = value.to_str_radix(self.options.base).to_uppercase();
        format!("{}{}", self.prefix(), self.group(&digits))
    }

    /// Lays out an exact rational under a concrete fraction policy.
    ///
    /// Integers are always written in full. [`FractionPolicy::Automatic`]
    /// is treated as [`FractionPolicy::DecimalExact`].
    #[must_use]
    pub fn rational(&self, value: &BigRational, policy: FractionPolicy) -> Numeral {
        if value.is_integer() {
            return Numeral::Digits(self.integer(&value.to_integer()));
        }
        match policy {
            FractionPolicy::Decimal => {
                Numeral::Digits(self.expansion(value,
                                               self.options.precision,
                                               self.options.indicate_infinite_series))
            },
            FractionPolicy::Fractional => self.fraction(value),
            FractionPolicy::Combined => {
                let whole = value.trunc();
                if whole.is_zero() {
                    return self.fraction(value);
                }
                let (numerator, denominator) = self.fraction_parts(&(value - &whole));
                Numeral::Mixed { whole: self.integer(&whole.to_integer()),
                                 numerator,
                                 denominator }
            },
            FractionPolicy::DecimalExact | FractionPolicy::Automatic => self.exact(value),
        }
    }

    /// A terminating expansion written out in full, or a fraction.
    #[must_use]
    pub fn exact(&self, value: &BigRational) -> Numeral {
        if value.is_integer() {
            return Numeral::Digits(self.integer(&value.to_integer()));
        }
        match terminating_digits(value, self.options.base) {
            Some((digits, places)) => {
                Numeral::Digits(self.place_point(&digits, usize::try_from(places).unwrap_or(usize::MAX)))
            },
            None => self.fraction(value),
        }
    }

    /// A finite float rounded to `precision` significant digits.
    ///
    /// Non-finite values yield an empty string.
    #[must_use]
    pub fn float(&self, value: f64, precision: usize) -> String {
        f64_to_rational(value.abs()).map(|exact| {
                                        if exact.is_zero() {
                                            "0".to_string()
                                        } else {
                                            self.expansion(&exact, precision, false)
                                        }
                                    })
                                    .unwrap_or_default()
    }

    fn fraction(&self, value: &BigRational) -> Numeral {
        let (numerator, denominator) = self.fraction_parts(value);
        Numeral::Fraction { numerator,
                            denominator }
    }

    fn fraction_parts(&self, value: &BigRational) -> (String, String) {
        (self.integer(value.numer()), self.integer(value.denom()))
    }

    /// Positional expansion of a positive rational rounded to `precision`
    /// significant digits. Integer digits are never dropped.
    fn expansion(&self, value: &BigRational, precision: usize, mark_series: bool) -> String {
        if value.is_zero() {
            return "0".to_string();
        }
        let base = self.options.base;
        let exponent = magnitude(value, base);

        let mut text = if base == 10 && !(SCIENTIFIC_BELOW..SCIENTIFIC_ABOVE).contains(&exponent) {
            scientific(value, precision)
        } else {
            let (digits, shift) = round_significant(value, base, precision);
            self.place_point(&digits, shift)
        };

        if mark_series && !is_terminating(value, base) {
            text.push('…');
        }
        text
    }

    /// Writes `digits / base^shift` with a point, dropping trailing zeros of
    /// the fractional part.
    fn place_point(&self, digits: &BigInt, shift: usize) -> String {
        let mut text = digits.to_str_radix(self.options.base).to_uppercase();
        if text.len() <= shift {
            text.insert_str(0, &"0".repeat(shift + 1 - text.len()));
        }
        let (whole, fraction) = text.split_at(text.len() - shift);
        let fraction = fraction.trim_end_matches('0');

        let whole = format!("{}{}", self.prefix(), self.group(whole));
        if fraction.is_empty() {
            whole
        } else {
            format!("{whole}.{fraction}")
        }
    }

    fn prefix(&self) -> &'static str {
        if self.options.base_display == BaseDisplay::None {
            return "";
        }
        match self.options.base {
            2 => "0b",
            8 => "0o",
            16 => "0x",
            _ => "",
        }
    }

    fn group(&self, digits: &str) -> String {
        let (size, separator) = match (self.options.base, self.options.digit_grouping) {
            (_, DigitGrouping::None) => return digits.to_string(),
            (10, DigitGrouping::Standard) if digits.len() > 4 => (3, THIN_SPACE),
            (10, DigitGrouping::Locale) if digits.len() > 3 => (3, self.options.locale_grouping),
            (2, _) if self.options.base_display == BaseDisplay::Normal && digits.len() > 4 => (4, ' '),
            _ => return digits.to_string(),
        };

        let mut grouped = String::with_capacity(digits.len() + digits.len() / size);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % size == 0 {
                grouped.push(separator);
            }
            grouped.push(c);
        }
        grouped
    }
}

/// Exponent of the leading digit of a positive `value` in `base`: the `e`
/// with `base^e <= value < base^(e + 1)`.
///
/// Estimated from the bit lengths of numerator and denominator, then
/// corrected by a step or two.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn magnitude(value: &BigRational, base: u32) -> i64 {
    let bits = value.numer().bits() as f64 - value.denom().bits() as f64;
    let mut exponent = (bits / f64::from(base).log2()).floor() as i64;
    while !at_least(value, base, exponent) {
        exponent -= 1;
    }
    while at_least(value, base, exponent + 1) {
        exponent += 1;
    }
    exponent
}

fn base_power(base: u32, exponent: u64) -> BigInt {
    BigInt::from(base).pow(u32::try_from(exponent).unwrap_or(u32::MAX))
}

/// Whether `value >= base^exponent`.
fn at_least(value: &BigRational, base: u32, exponent: i64) -> bool {
    let power = base_power(base, exponent.unsigned_abs());
    if exponent >= 0 {
        *value.numer() >= value.denom() * power
    } else {
        value.numer() * power >= *value.denom()
    }
}

/// `value · base^shift` rounded to the nearest integer, halves up, for a
/// positive `value`.
fn scaled_round(value: &BigRational, base: u32, shift: i64) -> BigInt {
    let power = base_power(base, shift.unsigned_abs());
    let (numerator, denominator) = if shift >= 0 {
        (value.numer() * power, value.denom().clone())
    } else {
        (value.numer().clone(), value.denom() * power)
    };
    (numerator * 2u32 + &denominator) / (denominator * 2u32)
}

/// Rounds a positive `value` to `precision` significant digits, keeping
/// every integer digit.
///
/// Returns the digits and the number of them after the point.
fn round_significant(value: &BigRational, base: u32, precision: usize) -> (BigInt, usize) {
    let precision = i64::try_from(precision).unwrap_or(i64::MAX);
    let mut exponent = magnitude(value, base);
    loop {
        let wanted = precision.max(exponent + 1);
        let shift = wanted - 1 - exponent;
        let digits = scaled_round(value, base, shift);
        if i64::try_from(digits.to_str_radix(base).len()).unwrap_or(i64::MAX) > wanted {
            exponent += 1;
            continue;
        }
        return (digits, usize::try_from(shift).unwrap_or(0));
    }
}

/// Decimal scientific notation with `precision` significant digits:
/// `1.5E20`.
fn scientific(value: &BigRational, precision: usize) -> String {
    let wanted = i64::try_from(precision.max(1)).unwrap_or(i64::MAX);
    let mut exponent = magnitude(value, 10);
    loop {
        let digits = scaled_round(value, 10, wanted - 1 - exponent).to_string();
        if i64::try_from(digits.len()).unwrap_or(i64::MAX) > wanted {
            exponent += 1;
            continue;
        }
        let (lead, rest) = digits.split_at(1);
        let rest = rest.trim_end_matches('0');
        return if rest.is_empty() {
            format!("{lead}E{exponent}")
        } else {
            format!("{lead}.{rest}E{exponent}")
        };
    }
}
