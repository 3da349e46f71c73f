//! `landshare run` / `landshare validate`: request-file driven share runs.

use std::path::{Path, PathBuf};

use landshare_engine::{ShareError, ShareReport, ShareRequest, ValidationMode};
use serde::Serialize;

use crate::exit_codes::{share_exit_code, ShareErrorOutput, EXIT_USAGE};
use crate::CliError;

/// Envelope written to stdout / `--output`: run metadata plus the report.
#[derive(Debug, Serialize)]
pub struct ShareOutput<'a> {
    pub meta: ShareMeta,
    #[serde(flatten)]
    pub report: &'a ShareReport,
}

#[derive(Debug, Serialize)]
pub struct ShareMeta {
    pub engine_version: String,
    pub run_at: String,
    pub validation_mode: ValidationMode,
}

fn shares_err(err: &ShareError, json: bool) -> CliError {
    ShareErrorOutput::from_share_error(err).print(json);
    let hint = match err {
        ShareError::ShareSumMismatch(_) => {
            Some("check the owner share fractions of that khewat".to_string())
        }
        ShareError::GrandTotalMismatch(_) => {
            Some("check the declared [total] against the khewat areas".to_string())
        }
        ShareError::Rejected(_) => Some(format!("{} check(s) failed", failure_count(err))),
        _ => None,
    };
    CliError { code: share_exit_code(err), message: err.to_string(), hint }
}

fn failure_count(err: &ShareError) -> usize {
    match err {
        ShareError::Rejected(report) => report.failure_count(),
        _ => 1,
    }
}

fn read_request(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_USAGE,
        message: format!("cannot read request {}: {e}", path.display()),
        hint: None,
    })
}

pub fn cmd_run(
    request_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let request_str = read_request(&request_path)?;
    let request =
        ShareRequest::from_toml(&request_str).map_err(|e| shares_err(&e, json_output))?;

    let report = landshare_engine::run(&request).map_err(|e| shares_err(&e, json_output))?;

    let output = ShareOutput {
        meta: ShareMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            validation_mode: request.validation.mode,
        },
        report: &report,
    };

    let json_str = serde_json::to_string_pretty(&output).map_err(|e| CliError {
        code: EXIT_USAGE,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str).map_err(|e| CliError {
            code: EXIT_USAGE,
            message: format!("cannot write output: {e}"),
            hint: None,
        })?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    eprintln!(
        "'{}': {} khewat(s), {} owner(s), total {}",
        report.name,
        report.khewats.len(),
        report.owners.len(),
        report.total.display,
    );
    for owner in &report.owners {
        eprintln!(
            "  {}: {} ({}, {} Marla)",
            owner.name, owner.total.display, owner.total.compact, owner.total.marlas_decimal,
        );
    }

    Ok(())
}

pub fn cmd_validate(request_path: PathBuf) -> Result<(), CliError> {
    let request_str = read_request(&request_path)?;
    let request = ShareRequest::from_toml(&request_str).map_err(|e| shares_err(&e, false))?;

    let claims: usize = request.khewats.iter().map(|k| k.owners.len()).sum();
    eprintln!(
        "valid: '{}' with {} khewat(s), {} claim(s), mode {}",
        request.name,
        request.khewats.len(),
        claims,
        request.validation.mode,
    );
    Ok(())
}
