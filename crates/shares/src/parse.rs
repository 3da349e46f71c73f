use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::Zero;
use rust_decimal::Decimal;

use crate::error::{Result, ShareError};
use crate::quantity::{decimal_to_rational, Quantity, Rational};
use crate::units::from_area;

/// Parse a decimal numeral (`0.5`, `12`) or a fraction (`1/3`, `1.5/3`).
///
/// Surrounding whitespace is ignored and an empty string is zero. Signs are
/// preserved; callers decide whether a negative value is acceptable.
pub fn parse_fraction_or_decimal(input: &str) -> Result<Rational> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(Rational::zero());
    }

    let mut parts = text.split('/');
    let numer = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (None, _) => parse_decimal(numer, input),
        (Some(denom), None) => {
            let numer = parse_decimal(numer.trim(), input)?;
            let denom = parse_decimal(denom.trim(), input)?;
            if denom.is_zero() {
                return Err(ShareError::parse(input, "denominator is zero"));
            }
            Ok(numer / denom)
        }
        _ => Err(ShareError::parse(input, "more than one '/'")),
    }
}

/// Parse a (kanals, marlas) pair of numeric strings into a Marla quantity.
pub fn parse_area(kanals: &str, marlas: &str) -> Result<Quantity> {
    let kanals = parse_fraction_or_decimal(kanals)?;
    let marlas = parse_fraction_or_decimal(marlas)?;
    from_area(&kanals, &marlas)
}

/// Parse a non-negative decimal tolerance such as `0.01`.
///
/// The value must be representable as a `Decimal` without rounding.
pub fn parse_tolerance(input: &str) -> Result<Decimal> {
    let text = input.trim();
    let exact = parse_decimal(text, input)?;
    if exact < Rational::zero() {
        return Err(ShareError::parse(input, "tolerance cannot be negative"));
    }

    let value = if text.contains(|c: char| matches!(c, 'e' | 'E')) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str(text)
    }
    .map_err(|e| ShareError::parse(input, e.to_string()))?;
    if decimal_to_rational(value) != exact {
        return Err(ShareError::parse(input, "too many significant digits"));
    }
    Ok(value)
}

/// Largest accepted decimal exponent magnitude (`1e100`).
const MAX_EXPONENT: u32 = 100;

/// The parts of `[+-]?digits[.digits]?([eE][+-]?digits)?`.
struct Numeral<'a> {
    negative: bool,
    whole: &'a str,
    frac: &'a str,
    exponent: i64,
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn scan_numeral(text: &str) -> Option<Numeral<'_>> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (mantissa, exponent) = match rest.find(|c: char| matches!(c, 'e' | 'E')) {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };

    let (whole, frac) = match mantissa.split_once('.') {
        Some((whole, frac)) if is_digits(frac) => (whole, frac),
        Some(_) => return None,
        None => (mantissa, ""),
    };
    if !is_digits(whole) {
        return None;
    }

    let exponent = match exponent {
        Some(e) => {
            let (sign, digits) = match e.as_bytes().first() {
                Some(b'-') => (-1, &e[1..]),
                Some(b'+') => (1, &e[1..]),
                _ => (1, e),
            };
            if !is_digits(digits) {
                return None;
            }
            let magnitude: u32 = digits.parse().ok().filter(|m| *m <= MAX_EXPONENT)?;
            sign * i64::from(magnitude)
        }
        None => 0,
    };

    Some(Numeral {
        negative,
        whole,
        frac,
        exponent,
    })
}

/// Exact value of a decimal numeral, built from its digits.
fn parse_decimal(text: &str, input: &str) -> Result<Rational> {
    if text.is_empty() {
        return Err(ShareError::parse(input, "missing number"));
    }

    let numeral = scan_numeral(text)
        .ok_or_else(|| ShareError::parse(input, "not a decimal numeral"))?;

    let digits = format!("{}{}", numeral.whole, numeral.frac);
    let mut mantissa = BigInt::from_str(&digits)
        .map_err(|e| ShareError::parse(input, e.to_string()))?;
    if numeral.negative {
        mantissa = -mantissa;
    }

    let ten = BigInt::from(10u32);
    let scale = numeral.frac.len() as i64 - numeral.exponent;
    let value = if scale >= 0 {
        Rational::new(mantissa, ten.pow(scale as u32))
    } else {
        Rational::from_integer(mantissa * ten.pow((-scale) as u32))
    };
    Ok(value)
}
