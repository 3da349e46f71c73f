use thiserror::Error;

use crate::model::{GrandTotalMismatch, ShareSumMismatch, ValidationReport};

#[derive(Debug, Error)]
pub enum ShareError {
    /// TOML parse / deserialization error.
    #[error("request parse error: {0}")]
    ConfigParse(String),

    /// Request validation error (duplicate khewat, empty owner list, etc.).
    #[error("request validation error: {0}")]
    ConfigValidation(String),

    /// Text that is neither a decimal numeral nor an `a/b` fraction.
    #[error("cannot parse '{value}' as a number or fraction: {reason}")]
    Parse { value: String, reason: String },

    /// Negative or unrepresentable area.
    #[error("invalid area: {0}")]
    InvalidArea(String),

    /// Negative share fraction on a claim.
    #[error("share fraction {fraction} for {subject} cannot be negative")]
    InvalidShare { subject: String, fraction: String },

    #[error("{0}")]
    ShareSumMismatch(ShareSumMismatch),

    #[error("{0}")]
    GrandTotalMismatch(GrandTotalMismatch),

    /// Every failed invariant, when validation runs in collect-all mode.
    #[error("{0}")]
    Rejected(ValidationReport),
}

impl ShareError {
    pub(crate) fn parse(value: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Pipeline stage this kind of error is raised from.
    pub fn stage(&self) -> crate::engine::RunStage {
        use crate::engine::RunStage;
        match self {
            Self::ConfigParse(_) | Self::ConfigValidation(_) | Self::Parse { .. } => {
                RunStage::Collecting
            }
            Self::InvalidArea(_) | Self::InvalidShare { .. } => RunStage::Allocating,
            Self::ShareSumMismatch(_) | Self::GrandTotalMismatch(_) | Self::Rejected(_) => {
                RunStage::Validating
            }
        }
    }

    /// True for the two consistency invariants (as opposed to bad input).
    pub fn is_validation_failure(&self) -> bool {
        self.stage() == crate::engine::RunStage::Validating
    }
}

pub type Result<T> = std::result::Result<T, ShareError>;
