use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use ordered_float::OrderedFloat;

use crate::util::num::{f64_to_rational, rational_to_f64};

/// A numeric leaf of a result tree.
///
/// Exact values are arbitrary precision rationals. Approximate values and
/// interval bounds use [`OrderedFloat`] so that numbers compare and hash
/// structurally, which like-term collection relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Number {
    /// An exact rational.
    Exact(BigRational),
    /// A floating point approximation.
    Approx(OrderedFloat<f64>),
    /// A value known to lie between two bounds.
    Interval {
        /// Lower bound.
        lower: OrderedFloat<f64>,
        /// Upper bound.
        upper: OrderedFloat<f64>,
    },
}

impl Number {
    #[must_use]
    pub fn zero() -> Self {
        Self::Exact(BigRational::zero())
    }

    #[must_use]
    pub fn one() -> Self {
        Self::Exact(BigRational::one())
    }

    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::Exact(BigRational::from_integer(BigInt::from(value)))
    }

    #[must_use]
    pub const fn approx(value: f64) -> Self {
        Self::Approx(OrderedFloat(value))
    }

    /// Builds an interval, ordering the bounds.
    ///
    /// # Example
    /// ```
    /// use reckon::interpreter::value::number::Number;
    ///
    /// assert_eq!(Number::interval(2.0, 1.0).bounds(), (1.0, 2.0));
    /// ```
    #[must_use]
    pub fn interval(a: f64, b: f64) -> Self {
        Self::Interval { lower: OrderedFloat(a.min(b)),
                         upper: OrderedFloat(a.max(b)), }
    }

    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    #[must_use]
    pub const fn as_exact(&self) -> Option<&BigRational> {
        match self {
            Self::Exact(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the value is an exact integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.as_exact().is_some_and(BigRational::is_integer)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Exact(value) => value.is_zero(),
            Self::Approx(value) => value.0 == 0.0,
            Self::Interval { lower, upper } => lower.0 == 0.0 && upper.0 == 0.0,
        }
    }

    /// Whether the value is exactly one. Approximations never are.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_exact().is_some_and(One::is_one)
    }

    /// Whether every value the number can take is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Exact(value) => value.is_negative(),
            Self::Approx(value) => value.0 < 0.0,
            Self::Interval { upper, .. } => upper.0 < 0.0,
        }
    }

    /// Whether the value is finite; exact values always are.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Exact(_) => true,
            Self::Approx(value) => value.0.is_finite(),
            Self::Interval { lower, upper } => lower.0.is_finite() && upper.0.is_finite(),
        }
    }

    /// Whether the value is not a number at all.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        match self {
            Self::Exact(_) => false,
            Self::Approx(value) => value.0.is_nan(),
            Self::Interval { lower, upper } => lower.0.is_nan() || upper.0.is_nan(),
        }
    }

    /// The nearest `f64`; intervals yield their midpoint.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Exact(value) => rational_to_f64(value),
            Self::Approx(value) => value.0,
            Self::Interval { lower, upper } => f64::midpoint(lower.0, upper.0),
        }
    }

    /// The bounds of the value; degenerate for exact and approximate values.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Interval { lower, upper } => (lower.0, upper.0),
            other => {
                let value = other.to_f64();
                (value, value)
            },
        }
    }

    /// Drops exactness.
    #[must_use]
    pub fn to_approx(&self) -> Self {
        match self {
            Self::Exact(value) => Self::approx(rational_to_f64(value)),
            other => other.clone(),
        }
    }

    /// Converts an approximation to the exact rational it holds, if finite.
    #[must_use]
    pub fn to_exact(&self) -> Option<BigRational> {
        match self {
            Self::Exact(value) => Some(value.clone()),
            other => f64_to_rational(other.to_f64()),
        }
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Exact(value) => Self::Exact(-value),
            Self::Approx(value) => Self::approx(-value.0),
            Self::Interval { lower, upper } => Self::interval(-upper.0, -lower.0),
        }
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        match self {
            Self::Exact(value) => Self::Exact(value.abs()),
            Self::Approx(value) => Self::approx(value.0.abs()),
            Self::Interval { lower, upper } => {
                if lower.0 >= 0.0 {
                    self.clone()
                } else if upper.0 <= 0.0 {
                    self.neg()
                } else {
                    Self::interval(0.0, (-lower.0).max(upper.0))
                }
            },
        }
    }

    /// Adds two numbers. Exactness survives only when both sides are exact.
    ///
    /// # Example
    /// ```
    /// use reckon::interpreter::value::number::Number;
    ///
    /// let sum = Number::integer(1).add(&Number::integer(2));
    /// assert_eq!(sum, Number::integer(3));
    /// assert!(!Number::integer(1).add(&Number::approx(0.5)).is_exact());
    /// ```
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a + b, |a, b| a + b, |(a, b), (c, d)| (a + c, b + d))
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a * b, |a, b| a * b, |(a, b), (c, d)| {
                let products = [a * c, a * d, b * c, b * d];
                (products.iter().copied().fold(f64::INFINITY, f64::min),
                 products.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            })
    }

    /// `1 / self`, or `None` when `self` can be zero.
    #[must_use]
    pub fn recip(&self) -> Option<Self> {
        match self {
            Self::Exact(value) if value.is_zero() => None,
            Self::Exact(value) => Some(Self::Exact(value.recip())),
            Self::Approx(value) if value.0 == 0.0 => None,
            Self::Approx(value) => Some(Self::approx(1.0 / value.0)),
            Self::Interval { lower, upper } => {
                if lower.0 <= 0.0 && upper.0 >= 0.0 {
                    None
                } else {
                    Some(Self::interval(1.0 / upper.0, 1.0 / lower.0))
                }
            },
        }
    }

    /// Orders two numbers.
    ///
    /// Intervals only order when they do not overlap; `None` means the order
    /// cannot be decided.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Some(a.cmp(b)),
            (Self::Interval { .. }, _) | (_, Self::Interval { .. }) => {
                let (a_low, a_high) = self.bounds();
                let (b_low, b_high) = other.bounds();
                if a_high < b_low {
                    Some(Ordering::Less)
                } else if a_low > b_high {
                    Some(Ordering::Greater)
                } else if a_low == a_high && b_low == b_high && a_low == b_low {
                    Some(Ordering::Equal)
                } else {
                    None
                }
            },
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    fn combine(&self,
               other: &Self,
               exact: impl FnOnce(&BigRational, &BigRational) -> BigRational,
               approx: impl FnOnce(f64, f64) -> f64,
               interval: impl FnOnce((f64, f64), (f64, f64)) -> (f64, f64))
               -> Self {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(exact(a, b)),
            (Self::Interval { .. }, _) | (_, Self::Interval { .. }) => {
                let (lower, upper) = interval(self.bounds(), other.bounds());
                Self::interval(lower, upper)
            },
            _ => Self::approx(approx(self.to_f64(), other.to_f64())),
        }
    }
}

impl From<BigRational> for Number {
    fn from(value: BigRational) -> Self {
        Self::Exact(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::approx(value)
    }
}
