use std::collections::HashMap;
use std::fmt;

use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize};

use crate::quantity::{format_fixed, Quantity, Rational};
use crate::units::MixedRadixArea;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A (kanals, marlas) pair as entered: decimal or fraction text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaInput {
    #[serde(default, deserialize_with = "numeric_text")]
    pub kanals: String,
    #[serde(default, deserialize_with = "numeric_text")]
    pub marlas: String,
}

/// One khewat as supplied by the form/upload collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct RawParcel {
    #[serde(deserialize_with = "numeric_text")]
    pub id: String,
    #[serde(flatten)]
    pub area: AreaInput,
    #[serde(default)]
    pub owners: Vec<RawClaim>,
}

/// One owner's claim on a khewat, before parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawClaim {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "numeric_text")]
    pub share: String,
    #[serde(default, alias = "remark")]
    pub remarks: Option<String>,
}

/// TOML lets users write `share = 0.5` or `id = 3`; keep the text either way.
pub(crate) fn numeric_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Integer(i) => i.to_string(),
        TextOrNumber::Float(f) => f.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// A khewat with every claim parsed and allocated. Built by
/// [`crate::allocate::build_parcel`]; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Parcel {
    pub(crate) id: String,
    pub(crate) total: Quantity,
    pub(crate) claims: Vec<Claim>,
}

impl Parcel {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn total(&self) -> &Quantity {
        &self.total
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Sum of every claim's share fraction.
    pub fn share_sum(&self) -> Rational {
        self.claims
            .iter()
            .fold(Rational::zero(), |acc, c| acc + &c.fraction)
    }
}

#[derive(Debug, Clone)]
pub struct Claim {
    pub(crate) owner: String,
    pub(crate) fraction: Rational,
    pub(crate) remark: Option<String>,
    pub(crate) allocated: Quantity,
}

impl Claim {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn fraction(&self) -> &Rational {
        &self.fraction
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    pub fn allocated(&self) -> &Quantity {
        &self.allocated
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// An owner's stake in a single khewat.
#[derive(Debug, Clone)]
pub struct OwnerHolding {
    pub parcel_id: String,
    pub parcel_total: Quantity,
    pub fraction: Rational,
    pub allocated: Quantity,
    pub remark: Option<String>,
}

/// Every holding of one owner across all khewats.
#[derive(Debug, Clone)]
pub struct OwnerSummary {
    pub name: String,
    pub holdings: Vec<OwnerHolding>,
    pub total: Quantity,
    pub remark: Option<String>,
}

impl OwnerSummary {
    pub fn holding(&self, parcel_id: &str) -> Option<&OwnerHolding> {
        self.holdings.iter().find(|h| h.parcel_id == parcel_id)
    }
}

/// Owner summaries in first-seen order, keyed by exact owner name.
#[derive(Debug, Clone, Default)]
pub struct OwnerSummaries {
    pub(crate) owners: Vec<OwnerSummary>,
    pub(crate) index: HashMap<String, usize>,
}

impl OwnerSummaries {
    pub fn get(&self, name: &str) -> Option<&OwnerSummary> {
        self.index.get(name).map(|&i| &self.owners[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &OwnerSummary> {
        self.owners.iter()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Sum of every owner's allocated total.
    pub fn grand_total(&self) -> Quantity {
        self.owners.iter().map(|o| &o.total).sum()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A khewat whose share fractions do not sum to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSumMismatch {
    pub parcel: String,
    pub sum: Rational,
}

impl fmt::Display for ShareSumMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Khewat {} shares sum to {}, expected 1.00",
            self.parcel,
            format_fixed(&self.sum, 2)
        )
    }
}

/// Owner totals that do not reconcile with the declared land total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrandTotalMismatch {
    pub declared: Quantity,
    pub allocated: Quantity,
}

impl fmt::Display for GrandTotalMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "owner shares total {} Marla, expected declared total land of {} Marla",
            self.allocated.to_fixed(2),
            self.declared.to_fixed(2)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub share_sums: Vec<ShareSumMismatch>,
    pub grand_total: Option<GrandTotalMismatch>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.share_sums.is_empty() && self.grand_total.is_none()
    }

    pub fn failure_count(&self) -> usize {
        self.share_sums.len() + usize::from(self.grand_total.is_some())
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return write!(f, "all share checks passed");
        }
        let mut messages: Vec<String> = self.share_sums.iter().map(|m| m.to_string()).collect();
        if let Some(ref total) = self.grand_total {
            messages.push(total.to_string());
        }
        write!(f, "{}", messages.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One area in every form the presentation layer might show.
#[derive(Debug, Clone, Serialize)]
pub struct AreaView {
    /// Exact Marla value, e.g. `80/3`.
    pub marlas: Quantity,
    /// Marla rounded to two decimals.
    pub marlas_decimal: String,
    #[serde(flatten)]
    pub area: MixedRadixArea,
    pub display: String,
    pub compact: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldingReport {
    pub khewat: String,
    pub khewat_area: AreaView,
    pub share_fraction: String,
    pub share: AreaView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerReport {
    pub name: String,
    pub total: AreaView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub holdings: Vec<HoldingReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimReport {
    pub name: String,
    pub share_fraction: String,
    pub share: AreaView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KhewatReport {
    pub id: String,
    pub area: AreaView,
    pub share_sum: String,
    pub owners: Vec<ClaimReport>,
}

/// Fully computed result handed to the report/render collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ShareReport {
    pub name: String,
    pub total: AreaView,
    pub owners: Vec<OwnerReport>,
    pub khewats: Vec<KhewatReport>,
}
