//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                   |
//! |------|-----------|-----------------------------------------------|
//! | 0    | Universal | Success                                       |
//! | 2    | Universal | CLI usage error (bad args, unreadable file)   |
//! | 3    | shares    | Invalid request document                      |
//! | 4    | shares    | Invalid input data (numerals, areas, shares)  |
//! | 5    | shares    | Share-sum or grand-total check rejected       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map it in [`share_exit_code`]

use landshare_engine::ShareError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing or unreadable files.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Shares (3-5)
// =============================================================================

/// Request TOML did not parse, or failed structural validation
/// (no khewats, duplicate khewat id, khewat without owners).
pub const EXIT_SHARES_INVALID_REQUEST: u8 = 3;

/// A numeral, area or share fraction in the request is unusable.
pub const EXIT_SHARES_INVALID_INPUT: u8 = 4;

/// Consistency validation failed; no report was produced.
pub const EXIT_SHARES_REJECTED: u8 = 5;

/// Map a ShareError to its exit code.
pub fn share_exit_code(err: &ShareError) -> u8 {
    match err {
        ShareError::ConfigParse(_) | ShareError::ConfigValidation(_) => {
            EXIT_SHARES_INVALID_REQUEST
        }
        ShareError::Parse { .. } | ShareError::InvalidArea(_) | ShareError::InvalidShare { .. } => {
            EXIT_SHARES_INVALID_INPUT
        }
        ShareError::ShareSumMismatch(_)
        | ShareError::GrandTotalMismatch(_)
        | ShareError::Rejected(_) => EXIT_SHARES_REJECTED,
    }
}

/// Stable machine-readable name for each error kind.
pub fn share_error_kind(err: &ShareError) -> &'static str {
    match err {
        ShareError::ConfigParse(_) => "config_parse",
        ShareError::ConfigValidation(_) => "config_validation",
        ShareError::Parse { .. } => "parse",
        ShareError::InvalidArea(_) => "invalid_area",
        ShareError::InvalidShare { .. } => "invalid_share",
        ShareError::ShareSumMismatch(_) => "share_sum_mismatch",
        ShareError::GrandTotalMismatch(_) => "grand_total_mismatch",
        ShareError::Rejected(_) => "rejected",
    }
}

/// Structured error output for `--json` runs.
/// Designed for both human-readable and machine-parseable output.
#[derive(Debug, serde::Serialize)]
pub struct ShareErrorOutput {
    pub error: &'static str,
    pub stage: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
    pub exit_code: u8,
}

impl ShareErrorOutput {
    pub fn from_share_error(err: &ShareError) -> Self {
        let failures = match err {
            ShareError::Rejected(report) => report
                .share_sums
                .iter()
                .map(|m| m.to_string())
                .chain(report.grand_total.iter().map(|m| m.to_string()))
                .collect(),
            _ => Vec::new(),
        };

        Self {
            error: share_error_kind(err),
            stage: err.stage().to_string(),
            message: err.to_string(),
            failures,
            exit_code: share_exit_code(err),
        }
    }

    /// Print to stderr: one JSON line when `json`, otherwise nothing
    /// (the caller's `error:` line covers the human case).
    pub fn print(&self, json: bool) {
        if json {
            if let Ok(output) = serde_json::to_string(self) {
                eprintln!("{}", output);
            }
        }
    }
}
