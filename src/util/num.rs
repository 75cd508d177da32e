use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Exact powers whose result is estimated above this many bits stay
/// symbolic.
pub const MAX_EXACT_BITS: u64 = 200_000;
/// Largest decimal exponent accepted in a numeric literal.
pub const MAX_LITERAL_EXPONENT: i64 = 10_000;
/// Γ overflows an `f64` past this argument.
pub const MAX_GAMMA_ARGUMENT: f64 = 171.624_376_956_302_7;

/// Converts an exact rational to the nearest `f64`.
///
/// Values outside the `f64` range become infinities.
///
/// ## Example
/// ```
/// use num_rational::BigRational;
/// use reckon::util::num::rational_to_f64;
///
/// let third = BigRational::new(1.into(), 3.into());
/// assert!((rational_to_f64(&third) - 1.0 / 3.0).abs() < 1e-15);
/// ```
#[must_use]
pub fn rational_to_f64(value: &BigRational) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Converts a finite `f64` to the exact rational it represents.
#[must_use]
pub fn f64_to_rational(value: f64) -> Option<BigRational> {
    BigRational::from_float(value)
}

/// Builds a rational from an integer.
#[must_use]
pub fn integer(value: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

/// Parses a decimal literal such as `12`, `3.25`, `.5`, `2.` or `1.5e-3`
/// into an exact rational.
///
/// ## Returns
/// - `Some(BigRational)`: the exact value of the literal.
/// - `None`: the text is not a decimal literal or its exponent exceeds
///   [`MAX_LITERAL_EXPONENT`].
///
/// ## Example
/// ```
/// use num_rational::BigRational;
/// use reckon::util::num::parse_decimal;
///
/// assert_eq!(parse_decimal("1.25"), Some(BigRational::new(5.into(), 4.into())));
/// assert_eq!(parse_decimal("2e3"), Some(BigRational::from_integer(2000.into())));
/// assert_eq!(parse_decimal("1e99999"), None);
/// ```
#[must_use]
pub fn parse_decimal(text: &str) -> Option<BigRational> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(index) => (&text[..index], text[index + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    if exponent.abs() > MAX_LITERAL_EXPONENT {
        return None;
    }

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let digits = format!("{whole}{fraction}");
    let numerator = digits.parse::<BigInt>().ok()?;

    let scale = exponent - i64::try_from(fraction.len()).ok()?;
    let ten = BigInt::from(10);
    let magnitude = ten.pow(u32::try_from(scale.unsigned_abs()).ok()?);

    Some(if scale >= 0 {
             BigRational::from_integer(numerator * magnitude)
         } else {
             BigRational::new(numerator, magnitude)
         })
}

/// Parses the digits of an integer literal in `radix`.
///
/// ## Example
/// ```
/// use reckon::util::num::{integer, parse_radix};
///
/// assert_eq!(parse_radix("ff", 16), Some(integer(255)));
/// assert_eq!(parse_radix("102", 2), None);
/// ```
#[must_use]
pub fn parse_radix(digits: &str, radix: u32) -> Option<BigRational> {
    BigInt::parse_bytes(digits.as_bytes(), radix).map(BigRational::from_integer)
}

/// Removes every factor `factor` from `value`.
///
/// Returns the cofactor and how many factors were removed. Divides by
/// `factor`, `factor^2`, `factor^4`, ... so the number of big divisions is
/// logarithmic in the count.
///
/// ## Example
/// ```
/// use num_bigint::BigInt;
/// use reckon::util::num::strip_factor;
///
/// assert_eq!(strip_factor(&BigInt::from(96), &BigInt::from(2)), (BigInt::from(3), 5));
/// assert_eq!(strip_factor(&BigInt::from(7), &BigInt::from(10)), (BigInt::from(7), 0));
/// ```
#[must_use]
pub fn strip_factor(value: &BigInt, factor: &BigInt) -> (BigInt, u64) {
    if value.is_zero() || factor.abs() <= BigInt::one() {
        return (value.clone(), 0);
    }

    let mut rest = value.clone();
    let mut count = 0u64;
    let mut powers = vec![factor.clone()];
    while let Some(power) = powers.last() {
        let (quotient, remainder) = rest.div_rem(power);
        if !remainder.is_zero() {
            break;
        }
        rest = quotient;
        count += 1 << (powers.len() - 1);
        let next = power * power;
        if next.bits() > rest.bits() {
            break;
        }
        powers.push(next);
    }
    for (i, power) in powers.iter().enumerate().rev() {
        let (quotient, remainder) = rest.div_rem(power);
        if remainder.is_zero() {
            rest = quotient;
            count += 1 << i;
        }
    }
    (rest, count)
}

/// Prime factors of a small base with their multiplicities.
fn prime_powers(base: u32) -> Vec<(u32, u64)> {
    let mut factors = Vec::new();
    let mut rest = base;
    let mut prime = 2;
    while rest > 1 {
        let mut multiplicity = 0;
        while rest % prime == 0 {
            rest /= prime;
            multiplicity += 1;
        }
        if multiplicity > 0 {
            factors.push((prime, multiplicity));
        }
        prime += 1;
    }
    factors
}

/// Number of digits after the point in the expansion of `value` in `base`.
///
/// Returns `None` when the expansion does not terminate.
///
/// ## Example
/// ```
/// use num_rational::BigRational;
/// use reckon::util::num::terminating_places;
///
/// assert_eq!(terminating_places(&BigRational::new(3.into(), 40.into()), 10), Some(3));
/// assert_eq!(terminating_places(&BigRational::new(1.into(), 3.into()), 10), None);
/// assert_eq!(terminating_places(&BigRational::new(1.into(), 8.into()), 16), Some(1));
/// ```
#[must_use]
pub fn terminating_places(value: &BigRational, base: u32) -> Option<u64> {
    let mut rest = value.denom().abs();
    let mut places = 0;
    for (prime, multiplicity) in prime_powers(base) {
        let (cofactor, count) = strip_factor(&rest, &BigInt::from(prime));
        rest = cofactor;
        places = places.max(count.div_ceil(multiplicity));
    }
    rest.is_one().then_some(places)
}

/// Whether the expansion of `value` in `base` terminates.
///
/// ## Example
/// ```
/// use num_rational::BigRational;
/// use reckon::util::num::is_terminating;
///
/// let eighth = BigRational::new(1.into(), 8.into());
/// let third = BigRational::new(1.into(), 3.into());
///
/// assert!(is_terminating(&eighth, 10));
/// assert!(!is_terminating(&third, 10));
/// assert!(is_terminating(&third, 3));
/// ```
#[must_use]
pub fn is_terminating(value: &BigRational, base: u32) -> bool {
    terminating_places(value, base).is_some()
}

/// The digits of a terminating `value` in `base` as an integer, with the
/// number of them after the point.
///
/// ## Example
/// ```
/// use num_bigint::BigInt;
/// use num_rational::BigRational;
/// use reckon::util::num::terminating_digits;
///
/// let value = BigRational::new(13.into(), 8.into());
/// assert_eq!(terminating_digits(&value, 10), Some((BigInt::from(1625), 3)));
/// ```
#[must_use]
pub fn terminating_digits(value: &BigRational, base: u32) -> Option<(BigInt, u64)> {
    let places = terminating_places(value, base)?;
    let scale = BigInt::from(base).pow(u32::try_from(places).ok()?);
    Some((value.numer() * scale / value.denom(), places))
}

/// Number of significant decimal digits of a terminating rational.
///
/// Returns `None` when the decimal expansion does not terminate.
///
/// ## Example
/// ```
/// use num_rational::BigRational;
/// use reckon::util::num::significant_digits;
///
/// assert_eq!(significant_digits(&BigRational::new(1.into(), 4.into())), Some(2));
/// assert_eq!(significant_digits(&BigRational::new(1200.into(), 1.into())), Some(2));
/// assert_eq!(significant_digits(&BigRational::new(1.into(), 3.into())), None);
/// ```
#[must_use]
pub fn significant_digits(value: &BigRational) -> Option<usize> {
    let (digits, _) = terminating_digits(value, 10)?;
    let (digits, _) = strip_factor(&digits.abs(), &BigInt::from(10));
    Some(digits.to_string().len())
}

/// Exact `k`-th root of a non-negative integer, if one exists.
///
/// ## Example
/// ```
/// use num_bigint::BigInt;
/// use reckon::util::num::exact_root;
///
/// assert_eq!(exact_root(&BigInt::from(27), 3), Some(BigInt::from(3)));
/// assert_eq!(exact_root(&BigInt::from(28), 3), None);
/// ```
#[must_use]
pub fn exact_root(value: &BigInt, k: u32) -> Option<BigInt> {
    if value.is_negative() || k == 0 {
        return None;
    }
    let root = value.nth_root(k);
    (root.pow(k) == *value).then_some(root)
}

/// Estimated bit length of `base^exponent`.
#[must_use]
pub fn estimated_power_bits(base: &BigRational, exponent: &BigInt) -> u64 {
    let bits = base.numer().bits().max(base.denom().bits());
    exponent.abs()
            .to_u64()
            .map_or(u64::MAX, |e| bits.saturating_mul(e))
}

/// Computes the gamma function Γ(z) using the Lanczos approximation.
///
/// This implementation uses the standard 9-term Lanczos coefficients
/// (`g = 7`). For `z < 0.5`, the reflection formula is applied:
///
/// `Γ(z) = π / (sin(πz) * Γ(1 − z))`
///
/// Poles (zero and negative integers) yield a non-finite value, and
/// arguments past [`MAX_GAMMA_ARGUMENT`] overflow to infinity.
///
/// # Example
/// ```
/// use reckon::util::num::euler_gamma;
///
/// // Γ(5) = 4! = 24
/// assert!((euler_gamma(5.0) - 24.0).abs() < 1e-9);
/// assert!(!euler_gamma(-2.0).is_finite());
///
/// // Γ(171) = 170! is the largest factorial an f64 holds.
/// assert!(euler_gamma(171.0).is_finite());
/// assert!(euler_gamma(171.0) > 7.2e306);
/// assert_eq!(euler_gamma(20_001.0), f64::INFINITY);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn euler_gamma(z: f64) -> f64 {
    // Lanczos coefficients, g = 7, n = 9.
    const COEFFS: [f64; 9] = [0.999_999_999_999_809_9,
                              676.520_368_121_885_1,
                              -1_259.139_216_722_402_8,
                              771.323_428_777_653_1,
                              -176.615_029_162_140_6,
                              12.507_343_278_686_905,
                              -0.138_571_095_265_720_12,
                              9.984_369_578_019_572e-6,
                              1.505_632_735_149_311_6e-7];
    const G: f64 = 7.0;

    if z <= 0.0 && z.fract() == 0.0 {
        return f64::NAN;
    }
    if z > MAX_GAMMA_ARGUMENT {
        return f64::INFINITY;
    }
    if z < 0.5 {
        std::f64::consts::PI / ((std::f64::consts::PI * z).sin() * euler_gamma(1.0 - z))
    } else {
        let z_minus_1 = z - 1.0;
        let mut x = COEFFS[0];

        for (i, &c) in COEFFS.iter().enumerate().skip(1) {
            x += c / (z_minus_1 + i as f64);
        }

        let t = z_minus_1 + G + 0.5;

        // t^(z - 1/2) alone leaves the f64 range before Γ(z) does.
        let half_power = t.powf((z_minus_1 + 0.5) / 2.0);
        std::f64::consts::TAU.sqrt() * (half_power * (-t).exp()) * half_power * x
    }
}

/// Whether two floats agree within a relative tolerance.
#[must_use]
pub fn approx_eq(left: f64, right: f64, rel_tolerance: f64) -> bool {
    left == right || (left - right).abs() <= rel_tolerance * left.abs().max(right.abs())
}

/// Builds the exact rational `numerator/denominator`; a zero denominator
/// yields zero.
#[must_use]
pub fn rational(numerator: i64, denominator: i64) -> BigRational {
    if denominator.is_zero() {
        return BigRational::zero();
    }
    BigRational::new(BigInt::from(numerator), BigInt::from(denominator))
}
