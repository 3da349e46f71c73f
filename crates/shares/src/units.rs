//! Kila / Kanal / Marla / Sarshai conversion.
//!
//! 1 Kila = 4 Kanal, 1 Kanal = 20 Marla, 1 Marla = 9 Sarshai. The flat base
//! unit is the Marla; the mixed-radix form is derived from a quantity by a
//! single rounding to whole Sarshai, then integer division largest unit first.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::Serialize;

use crate::error::{Result, ShareError};
use crate::quantity::{format_fixed, Quantity, Rational};

pub const KANALS_PER_KILA: u64 = 4;
pub const MARLAS_PER_KANAL: u64 = 20;
pub const SARSHAI_PER_MARLA: u64 = 9;
pub const MARLAS_PER_KILA: u64 = KANALS_PER_KILA * MARLAS_PER_KANAL;

const SARSHAI_PER_KANAL: u64 = MARLAS_PER_KANAL * SARSHAI_PER_MARLA;
const SARSHAI_PER_KILA: u64 = KANALS_PER_KILA * SARSHAI_PER_KANAL;

/// Normalized four-tier area: `kanal < 4`, `marla < 20`, `sarshai < 9`.
///
/// Only produced by [`to_mixed_radix`], so the bounds always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct MixedRadixArea {
    kila: u64,
    kanal: u8,
    marla: u8,
    sarshai: u8,
}

impl MixedRadixArea {
    pub fn kila(&self) -> u64 {
        self.kila
    }

    pub fn kanal(&self) -> u8 {
        self.kanal
    }

    pub fn marla(&self) -> u8 {
        self.marla
    }

    pub fn sarshai(&self) -> u8 {
        self.sarshai
    }

    /// Whole area expressed in Sarshai.
    pub fn sarshai_count(&self) -> u128 {
        self.kila as u128 * SARSHAI_PER_KILA as u128
            + self.kanal as u128 * SARSHAI_PER_KANAL as u128
            + self.marla as u128 * SARSHAI_PER_MARLA as u128
            + self.sarshai as u128
    }

    /// Short form used on field registers: `0K-1K-6M-6S`.
    /// The Sarshai segment is dropped when zero.
    pub fn compact(&self) -> String {
        let mut out = format!("{}K-{}K-{}M", self.kila, self.kanal, self.marla);
        if self.sarshai > 0 {
            out.push_str(&format!("-{}S", self.sarshai));
        }
        out
    }

    fn from_sarshai(total: u64) -> Self {
        let kila = total / SARSHAI_PER_KILA;
        let rem = total % SARSHAI_PER_KILA;
        let kanal = rem / SARSHAI_PER_KANAL;
        let rem = rem % SARSHAI_PER_KANAL;
        let marla = rem / SARSHAI_PER_MARLA;
        let sarshai = rem % SARSHAI_PER_MARLA;

        // Remainders are bounded by the unit ratios above.
        Self {
            kila,
            kanal: kanal as u8,
            marla: marla as u8,
            sarshai: sarshai as u8,
        }
    }
}

/// `1 Kila, 2 Kanal, 3 Marla, 4 Sarshai`, zero parts omitted; empty is `0 Marla`.
impl fmt::Display for MixedRadixArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if self.kila > 0 {
            parts.push(format!("{} Kila", self.kila));
        }
        if self.kanal > 0 {
            parts.push(format!("{} Kanal", self.kanal));
        }
        if self.marla > 0 {
            parts.push(format!("{} Marla", self.marla));
        }
        if self.sarshai > 0 {
            parts.push(format!("{} Sarshai", self.sarshai));
        }

        if parts.is_empty() {
            write!(f, "0 Marla")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Convert a Marla quantity to normalized Kila/Kanal/Marla/Sarshai.
///
/// The quantity is rounded once, half away from zero, to whole Sarshai.
pub fn to_mixed_radix(quantity: &Quantity) -> Result<MixedRadixArea> {
    let value = quantity.as_rational();
    if value.is_negative() {
        return Err(ShareError::InvalidArea(format!(
            "cannot convert negative area {} Marla",
            format_fixed(value, 2)
        )));
    }

    let sarshai = (value * Rational::from_integer(BigInt::from(SARSHAI_PER_MARLA)))
        .round()
        .to_integer();
    let sarshai = sarshai.to_u64().ok_or_else(|| {
        ShareError::InvalidArea(format!("{} Marla is too large to convert", quantity.to_fixed(2)))
    })?;

    Ok(MixedRadixArea::from_sarshai(sarshai))
}

/// Exact Marla quantity of a mixed-radix area.
pub fn from_mixed_radix(area: &MixedRadixArea) -> Quantity {
    Quantity::from_unsigned_ratio(area.sarshai_count(), SARSHAI_PER_MARLA)
}

/// `kanals × 20 + marlas`, both already in exact form.
pub fn from_area(kanals: &Rational, marlas: &Rational) -> Result<Quantity> {
    if kanals.is_negative() || marlas.is_negative() {
        return Err(ShareError::InvalidArea(format!(
            "kanals and marlas must be non-negative, got {} Kanal {} Marla",
            format_fixed(kanals, 2),
            format_fixed(marlas, 2)
        )));
    }
    Quantity::new(kanals * Rational::from_integer(BigInt::from(MARLAS_PER_KANAL)) + marlas)
}
