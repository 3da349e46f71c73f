use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::aggregate::aggregate_owners;
use crate::allocate::build_parcel;
use crate::config::{check_khewat_ids, ShareRequest, ValidationConfig, ValidationMode};
use crate::error::{Result, ShareError};
use crate::model::{Parcel, RawParcel, ShareReport};
use crate::parse::parse_area;
use crate::quantity::Quantity;
use crate::report::build_report;
use crate::validate::{validate_all, validate_grand_total, validate_parcel};

/// Per-request lifecycle. `Done` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Collecting,
    Allocating,
    Validating,
    Done,
    Rejected,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collecting => write!(f, "collecting"),
            Self::Allocating => write!(f, "allocating"),
            Self::Validating => write!(f, "validating"),
            Self::Done => write!(f, "done"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Run a parsed request. Returns the full report or the failing invariant;
/// never a partial result.
pub fn run(request: &ShareRequest) -> Result<ShareReport> {
    debug!("share run '{}': {}", request.name, RunStage::Collecting);
    request.validate()?;
    let total_land = parse_area(&request.total.kanals, &request.total.marlas)?;

    let result = run_parcels(&request.name, &total_land, &request.khewats, &request.validation);
    match result {
        Ok(ref report) => info!(
            "share run '{}' {}: {} khewat(s), {} owner(s)",
            request.name,
            RunStage::Done,
            report.khewats.len(),
            report.owners.len()
        ),
        Err(ref e) => warn!(
            "share run '{}' {} while {}: {e}",
            request.name,
            RunStage::Rejected,
            e.stage()
        ),
    }
    result
}

/// Allocate, aggregate and validate already-structured khewats against an
/// independently declared land total.
///
/// Khewat ids must be unique; holdings are keyed by them.
pub fn run_parcels(
    name: &str,
    total_land: &Quantity,
    raw: &[RawParcel],
    validation: &ValidationConfig,
) -> Result<ShareReport> {
    check_khewat_ids(raw)?;

    debug!("share run '{name}': {}", RunStage::Allocating);
    let parcels = raw.iter().map(build_parcel).collect::<Result<Vec<Parcel>>>()?;

    debug!("share run '{name}': {} ({})", RunStage::Validating, validation.mode);
    let share_tolerance = validation.share_tolerance();
    let area_tolerance = validation.area_tolerance();

    let owners = match validation.mode {
        ValidationMode::ShortCircuit => {
            for parcel in &parcels {
                validate_parcel(parcel, &share_tolerance)?;
            }
            let owners = aggregate_owners(&parcels);
            validate_grand_total(total_land, &owners, &area_tolerance)?;
            owners
        }
        ValidationMode::CollectAll => {
            let owners = aggregate_owners(&parcels);
            let report =
                validate_all(&parcels, total_land, &owners, &share_tolerance, &area_tolerance);
            if !report.passed() {
                return Err(ShareError::Rejected(report));
            }
            owners
        }
    };

    build_report(name, total_land, &parcels, &owners)
}
