//! Exact base-unit (Marla-equivalent) quantities.
//!
//! All arithmetic stays in `BigRational`; rounding happens only when a value
//! is rendered, either as a mixed-radix area or as fixed-point text.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::{Result, ShareError};

/// Signed exact rational, as produced by parsing.
pub type Rational = BigRational;

/// Non-negative exact area in Marla.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(Rational);

impl Quantity {
    pub fn new(value: Rational) -> Result<Self> {
        if value.is_negative() {
            return Err(ShareError::InvalidArea(format!(
                "area cannot be negative, got {} Marla",
                format_fixed(&value, 2)
            )));
        }
        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(Rational::zero())
    }

    pub fn from_marlas(marlas: u64) -> Self {
        Self(Rational::from_integer(BigInt::from(marlas)))
    }

    /// `numer / denom` from unsigned parts; `denom` must be non-zero.
    pub(crate) fn from_unsigned_ratio(numer: u128, denom: u64) -> Self {
        Self(Rational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn as_rational(&self) -> &Rational {
        &self.0
    }

    pub fn into_rational(self) -> Rational {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `|self - other|` in Marla.
    pub fn abs_diff(&self, other: &Quantity) -> Rational {
        (&self.0 - &other.0).abs()
    }

    /// Marla value rounded half away from zero to `places` decimals.
    pub fn to_fixed(&self, places: u32) -> String {
        format_fixed(&self.0, places)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Quantity> for &'a Quantity {
    type Output = Quantity;

    fn add(self, rhs: &'a Quantity) -> Quantity {
        Quantity(&self.0 + &rhs.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), |acc, q| acc + q)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), |acc, q| &acc + q)
    }
}

/// Exact form: `80/3`, or `30` for whole Marla.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Render a rational as fixed-point decimal text, rounding half away from zero.
pub fn format_fixed(value: &Rational, places: u32) -> String {
    let scale = Rational::from_integer(BigInt::from(10u32).pow(places));
    let scaled = (value * scale).round().to_integer();
    let sign = if scaled.is_negative() { "-" } else { "" };
    let digits = scaled.abs().to_string();
    if places == 0 {
        return format!("{sign}{digits}");
    }

    let places = places as usize;
    let padded = format!("{digits:0>width$}", width = places + 1);
    let (whole, frac) = padded.split_at(padded.len() - places);
    format!("{sign}{whole}.{frac}")
}

/// Exact conversion of a parsed decimal (mantissa / 10^scale).
pub fn decimal_to_rational(value: Decimal) -> Rational {
    let numer = BigInt::from(value.mantissa());
    let denom = BigInt::from(10u32).pow(value.scale());
    Rational::new(numer, denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> Rational {
        Rational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn rejects_negative() {
        let err = Quantity::new(ratio(-1, 2)).unwrap_err();
        assert!(matches!(err, ShareError::InvalidArea(_)));
        assert!(err.to_string().contains("-0.50"));
    }

    #[test]
    fn fixed_rounds_half_away_from_zero() {
        assert_eq!(format_fixed(&ratio(87, 100), 2), "0.87");
        assert_eq!(format_fixed(&ratio(1, 3), 2), "0.33");
        assert_eq!(format_fixed(&ratio(2, 3), 2), "0.67");
        assert_eq!(format_fixed(&ratio(1, 200), 2), "0.01");
        assert_eq!(format_fixed(&ratio(-1, 200), 2), "-0.01");
        assert_eq!(format_fixed(&ratio(1, 1), 2), "1.00");
        assert_eq!(format_fixed(&ratio(80, 3), 0), "27");
        assert_eq!(format_fixed(&ratio(1234, 1), 1), "1234.0");
    }

    #[test]
    fn sum_is_exact() {
        let third = Quantity::new(ratio(80, 3)).unwrap();
        let total: Quantity = vec![third.clone(), third.clone(), third].into_iter().sum();
        assert_eq!(total, Quantity::from_marlas(80));
    }

    #[test]
    fn display_and_serialize_exact() {
        let q = Quantity::new(ratio(80, 3)).unwrap();
        assert_eq!(q.to_string(), "80/3");
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"80/3\"");
        assert_eq!(Quantity::from_marlas(30).to_string(), "30");
    }

    #[test]
    fn decimal_conversion() {
        let d: Decimal = "0.125".parse().unwrap();
        assert_eq!(decimal_to_rational(d), ratio(1, 8));
        let d: Decimal = "-2.50".parse().unwrap();
        assert_eq!(decimal_to_rational(d), ratio(-5, 2));
    }
}
