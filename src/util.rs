/// Numeric helpers.
///
/// Conversions between exact rationals and `f64`, literal parsing, exact
/// roots and the gamma function used for non-integer factorials.
pub mod num;
