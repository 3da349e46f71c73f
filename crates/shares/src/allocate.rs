use log::debug;
use num_traits::Signed;

use crate::error::{Result, ShareError};
use crate::model::{Claim, Parcel, RawParcel};
use crate::parse::{parse_area, parse_fraction_or_decimal};
use crate::quantity::{Quantity, Rational};

/// Area of `parcel_total` claimed by `fraction`.
pub fn allocate(parcel_total: &Quantity, fraction: &Rational) -> Result<Quantity> {
    if fraction.is_negative() {
        return Err(ShareError::InvalidShare {
            subject: "claim".into(),
            fraction: fraction.to_string(),
        });
    }
    Quantity::new(parcel_total.as_rational() * fraction)
}

/// Strip markup-significant characters and surrounding whitespace.
pub fn sanitize_owner_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse and allocate one khewat.
///
/// Claims keep input order; a blank owner name becomes `Owner<N>` where `N`
/// is the claim's 1-based position. A blank share counts as zero.
pub fn build_parcel(raw: &RawParcel) -> Result<Parcel> {
    let id = raw.id.trim().to_string();
    let total = parse_area(&raw.area.kanals, &raw.area.marlas)?;

    let mut claims = Vec::with_capacity(raw.owners.len());
    for (i, raw_claim) in raw.owners.iter().enumerate() {
        let mut owner = sanitize_owner_name(&raw_claim.name);
        if owner.is_empty() {
            owner = format!("Owner{}", i + 1);
        }

        let fraction = parse_fraction_or_decimal(&raw_claim.share)?;
        let allocated = allocate(&total, &fraction).map_err(|e| match e {
            ShareError::InvalidShare { fraction, .. } => ShareError::InvalidShare {
                subject: format!("{owner} in Khewat {id}"),
                fraction,
            },
            other => other,
        })?;

        let remark = raw_claim
            .remarks
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        claims.push(Claim {
            owner,
            fraction,
            remark,
            allocated,
        });
    }

    debug!(
        "khewat {id}: {} Marla, {} claim(s)",
        total.to_fixed(2),
        claims.len()
    );

    Ok(Parcel { id, total, claims })
}
