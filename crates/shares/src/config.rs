use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::ShareError;
use crate::model::{numeric_text, AreaInput, RawParcel};
use crate::parse::parse_tolerance;
use crate::quantity::{decimal_to_rational, Rational};

// ---------------------------------------------------------------------------
// Top-level request
// ---------------------------------------------------------------------------

/// A complete share computation: declared land total plus every khewat.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareRequest {
    #[serde(default = "default_name")]
    pub name: String,
    /// Independently declared total land, reconciled against owner totals.
    pub total: AreaInput,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub khewats: Vec<RawParcel>,
}

fn default_name() -> String {
    "land share".into()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Allowed deviation of a khewat's share sum from one, in fraction units.
    #[serde(default = "default_tolerance", deserialize_with = "tolerance")]
    pub share_tolerance: Decimal,
    /// Allowed deviation of owner totals from the declared total, in Marla.
    #[serde(default = "default_tolerance", deserialize_with = "tolerance")]
    pub area_tolerance: Decimal,
    #[serde(default)]
    pub mode: ValidationMode,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            share_tolerance: default_tolerance(),
            area_tolerance: default_tolerance(),
            mode: ValidationMode::default(),
        }
    }
}

impl ValidationConfig {
    pub fn share_tolerance(&self) -> Rational {
        decimal_to_rational(self.share_tolerance)
    }

    pub fn area_tolerance(&self) -> Rational {
        decimal_to_rational(self.area_tolerance)
    }
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn tolerance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let text = numeric_text(deserializer)?;
    parse_tolerance(&text).map_err(serde::de::Error::custom)
}

/// Whether validation stops at the first failed invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Khewats in input order, then the grand total; first failure wins.
    #[default]
    ShortCircuit,
    /// Run every check and report all failures together.
    CollectAll,
}

impl std::fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShortCircuit => write!(f, "short_circuit"),
            Self::CollectAll => write!(f, "collect_all"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ShareRequest {
    pub fn from_toml(input: &str) -> Result<Self, ShareError> {
        let request: ShareRequest =
            toml::from_str(input).map_err(|e| ShareError::ConfigParse(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ShareError> {
        if self.khewats.is_empty() {
            return Err(ShareError::ConfigValidation(
                "at least one khewat is required".into(),
            ));
        }

        check_khewat_ids(&self.khewats)?;
        for khewat in &self.khewats {
            let id = khewat.id.trim();
            if khewat.owners.is_empty() {
                return Err(ShareError::ConfigValidation(format!(
                    "khewat '{id}' has no owners"
                )));
            }
        }

        for (label, value) in [
            ("share_tolerance", self.validation.share_tolerance),
            ("area_tolerance", self.validation.area_tolerance),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(ShareError::ConfigValidation(format!(
                    "{label} cannot be negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Khewat ids must be non-blank and unique after trimming.
pub(crate) fn check_khewat_ids(khewats: &[RawParcel]) -> Result<(), ShareError> {
    let mut seen = HashSet::new();
    for khewat in khewats {
        let id = khewat.id.trim();
        if id.is_empty() {
            return Err(ShareError::ConfigValidation("khewat id cannot be blank".into()));
        }
        if !seen.insert(id) {
            return Err(ShareError::ConfigValidation(format!(
                "duplicate khewat id '{id}'"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Dhok Mehlan"

[total]
kanals = "2"
marlas = "10"

[[khewats]]
id = 1
kanals = "1"
marlas = "10"

[[khewats.owners]]
name = "Asha"
share = "1/2"
remarks = "mutation 112"

[[khewats.owners]]
name = "Bilal"
share = 0.5

[[khewats]]
id = "2-A"
marlas = 20

[[khewats.owners]]
name = "Asha"
share = "1"
"#;

    #[test]
    fn parse_valid_request() {
        let request = ShareRequest::from_toml(VALID).unwrap();
        assert_eq!(request.name, "Dhok Mehlan");
        assert_eq!(request.total.kanals, "2");
        assert_eq!(request.khewats.len(), 2);

        let first = &request.khewats[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.area.kanals, "1");
        assert_eq!(first.owners.len(), 2);
        assert_eq!(first.owners[0].remarks.as_deref(), Some("mutation 112"));
        assert_eq!(first.owners[1].share, "0.5");

        let second = &request.khewats[1];
        assert_eq!(second.id, "2-A");
        assert_eq!(second.area.kanals, "");
        assert_eq!(second.area.marlas, "20");
    }

    #[test]
    fn validation_defaults() {
        let request = ShareRequest::from_toml(VALID).unwrap();
        assert_eq!(request.validation.mode, ValidationMode::ShortCircuit);
        assert_eq!(request.validation.share_tolerance, Decimal::new(1, 2));
        assert_eq!(request.validation.area_tolerance, Decimal::new(1, 2));
        assert_eq!(request.validation.share_tolerance().to_string(), "1/100");
    }

    #[test]
    fn parse_validation_table() {
        let input = format!(
            r#"{VALID}
[validation]
share_tolerance = "0.001"
area_tolerance = 0.5
mode = "collect_all"
"#
        );
        let request = ShareRequest::from_toml(&input).unwrap();
        assert_eq!(request.validation.mode, ValidationMode::CollectAll);
        assert_eq!(request.validation.share_tolerance, Decimal::new(1, 3));
        assert_eq!(request.validation.area_tolerance().to_string(), "1/2");
    }

    #[test]
    fn tolerance_accepts_bare_numbers() {
        let input = format!("{VALID}\n[validation]\nshare_tolerance = 0\narea_tolerance = 2\n");
        let request = ShareRequest::from_toml(&input).unwrap();
        assert!(request.validation.share_tolerance.is_zero());
        assert_eq!(request.validation.area_tolerance().to_string(), "2");
    }

    #[test]
    fn reject_separator_in_tolerance() {
        let input = format!("{VALID}\n[validation]\nshare_tolerance = \"0_01\"\n");
        let err = ShareRequest::from_toml(&input).unwrap_err();
        assert!(matches!(err, ShareError::ConfigParse(_)));
    }

    #[test]
    fn reject_unknown_mode() {
        let input = format!("{VALID}\n[validation]\nmode = \"lenient\"\n");
        let err = ShareRequest::from_toml(&input).unwrap_err();
        assert!(matches!(err, ShareError::ConfigParse(_)));
    }

    #[test]
    fn reject_negative_tolerance() {
        let input = format!("{VALID}\n[validation]\nshare_tolerance = \"-0.1\"\n");
        assert!(ShareRequest::from_toml(&input).is_err());
    }

    #[test]
    fn reject_missing_total() {
        let err = ShareRequest::from_toml("[[khewats]]\nid = 1\n").unwrap_err();
        assert!(err.to_string().contains("total"));
    }

    #[test]
    fn reject_no_khewats() {
        let err = ShareRequest::from_toml("[total]\nkanals = \"1\"\n").unwrap_err();
        assert!(err.to_string().contains("at least one khewat"));
    }

    #[test]
    fn reject_duplicate_khewat() {
        let input = r#"
[total]
marlas = "40"

[[khewats]]
id = 1
marlas = "20"
[[khewats.owners]]
name = "Asha"
share = "1"

[[khewats]]
id = "1"
marlas = "20"
[[khewats.owners]]
name = "Bilal"
share = "1"
"#;
        let err = ShareRequest::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("duplicate khewat id '1'"));
    }

    #[test]
    fn reject_khewat_without_owners() {
        let input = "[total]\nmarlas = \"20\"\n\n[[khewats]]\nid = 9\nmarlas = \"20\"\n";
        let err = ShareRequest::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("khewat '9' has no owners"));
    }
}
