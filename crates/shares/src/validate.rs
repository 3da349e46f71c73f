use log::{debug, warn};
use num_bigint::BigInt;
use num_traits::{One, Signed};

use crate::error::{Result, ShareError};
use crate::model::{GrandTotalMismatch, OwnerSummaries, Parcel, ShareSumMismatch, ValidationReport};
use crate::quantity::{Quantity, Rational};

/// Share fractions of a khewat must sum to one within `tolerance`
/// (fraction units).
pub fn validate_parcel(parcel: &Parcel, tolerance: &Rational) -> Result<()> {
    match check_share_sum(parcel, tolerance) {
        Some(mismatch) => Err(ShareError::ShareSumMismatch(mismatch)),
        None => Ok(()),
    }
}

/// Owner totals must reconcile with the declared land total within
/// `tolerance` (Marla).
pub fn validate_grand_total(
    total_land: &Quantity,
    owners: &OwnerSummaries,
    tolerance: &Rational,
) -> Result<()> {
    match check_grand_total(total_land, owners, tolerance) {
        Some(mismatch) => Err(ShareError::GrandTotalMismatch(mismatch)),
        None => Ok(()),
    }
}

/// Run every check and collect all failures instead of stopping at the first.
pub fn validate_all(
    parcels: &[Parcel],
    total_land: &Quantity,
    owners: &OwnerSummaries,
    share_tolerance: &Rational,
    area_tolerance: &Rational,
) -> ValidationReport {
    let report = ValidationReport {
        share_sums: parcels
            .iter()
            .filter_map(|p| check_share_sum(p, share_tolerance))
            .collect(),
        grand_total: check_grand_total(total_land, owners, area_tolerance),
    };
    if !report.passed() {
        warn!("{} share check(s) failed", report.failure_count());
    }
    report
}

fn check_share_sum(parcel: &Parcel, tolerance: &Rational) -> Option<ShareSumMismatch> {
    let sum = parcel.share_sum();
    let deviation = (&sum - Rational::one()).abs();
    debug!("khewat {}: share sum {}", parcel.id, sum);

    if &deviation > tolerance {
        Some(ShareSumMismatch {
            parcel: parcel.id.clone(),
            sum,
        })
    } else {
        None
    }
}

fn check_grand_total(
    total_land: &Quantity,
    owners: &OwnerSummaries,
    tolerance: &Rational,
) -> Option<GrandTotalMismatch> {
    let allocated = owners.grand_total();
    let deviation = allocated.abs_diff(total_land);
    debug!(
        "grand total: declared {} Marla, allocated {} Marla",
        total_land, allocated
    );

    if &deviation > tolerance {
        Some(GrandTotalMismatch {
            declared: total_land.clone(),
            allocated,
        })
    } else {
        None
    }
}

/// The reference tolerance, 1/100.
pub fn default_tolerance() -> Rational {
    Rational::new(BigInt::from(1), BigInt::from(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_owners;
    use crate::allocate::build_parcel;
    use crate::model::{AreaInput, RawClaim, RawParcel};

    fn parcel(id: &str, marlas: &str, shares: &[&str]) -> Parcel {
        build_parcel(&RawParcel {
            id: id.into(),
            area: AreaInput {
                kanals: String::new(),
                marlas: marlas.into(),
            },
            owners: shares
                .iter()
                .enumerate()
                .map(|(i, share)| RawClaim {
                    name: format!("Owner {}", i + 1),
                    share: share.to_string(),
                    remarks: None,
                })
                .collect(),
        })
        .unwrap()
    }

    #[test]
    fn exact_halves_pass() {
        assert!(validate_parcel(&parcel("1", "30", &["1/2", "1/2"]), &default_tolerance()).is_ok());
    }

    #[test]
    fn rounded_thirds_pass_within_tolerance() {
        let p = parcel("2", "80", &["0.333", "0.333", "0.333"]);
        assert!(validate_parcel(&p, &default_tolerance()).is_ok());
    }

    #[test]
    fn under_allocation_reports_sum() {
        let err = validate_parcel(&parcel("3", "40", &["1/2", "1/4"]), &default_tolerance())
            .unwrap_err();
        assert_eq!(err.to_string(), "Khewat 3 shares sum to 0.75, expected 1.00");
        match err {
            ShareError::ShareSumMismatch(m) => assert_eq!(m.sum.to_string(), "3/4"),
            other => panic!("expected ShareSumMismatch, got {other:?}"),
        }
    }

    #[test]
    fn over_allocation_fails() {
        let p = parcel("4", "40", &["1/2", "1/2", "1/50"]);
        assert!(validate_parcel(&p, &default_tolerance()).is_err());
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        // deviation of exactly 0.01 is accepted
        let p = parcel("5", "40", &["0.5", "0.49"]);
        assert!(validate_parcel(&p, &default_tolerance()).is_ok());
        let p = parcel("6", "40", &["0.5", "0.489"]);
        assert!(validate_parcel(&p, &default_tolerance()).is_err());
    }

    #[test]
    fn grand_total_detects_missing_area() {
        let parcels = vec![parcel("1", "50", &["1"]), parcel("2", "40", &["1"])];
        let owners = aggregate_owners(&parcels);
        let err = validate_grand_total(&Quantity::from_marlas(100), &owners, &default_tolerance())
            .unwrap_err();
        assert!(matches!(err, ShareError::GrandTotalMismatch(_)));
        assert_eq!(
            err.to_string(),
            "owner shares total 90.00 Marla, expected declared total land of 100.00 Marla"
        );
        assert!(validate_grand_total(&Quantity::from_marlas(90), &owners, &default_tolerance()).is_ok());
    }

    #[test]
    fn collect_all_reports_every_failure() {
        let parcels = vec![
            parcel("1", "40", &["1/2", "1/4"]),
            parcel("2", "40", &["1"]),
            parcel("3", "40", &["1/3"]),
        ];
        let owners = aggregate_owners(&parcels);
        let tol = default_tolerance();
        let report = validate_all(&parcels, &Quantity::from_marlas(120), &owners, &tol, &tol);
        assert!(!report.passed());
        assert_eq!(report.failure_count(), 3);
        let ids: Vec<&str> = report.share_sums.iter().map(|m| m.parcel.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(report.grand_total.is_some());
    }
}
