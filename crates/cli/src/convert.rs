//! `landshare convert`: one-off Kanal/Marla to Kila/Kanal/Marla/Sarshai.

use landshare_engine::model::AreaView;
use landshare_engine::parse::parse_area;

use crate::exit_codes::{share_exit_code, EXIT_USAGE};
use crate::CliError;

pub fn cmd_convert(
    kanals: Option<String>,
    marlas: Option<String>,
    json_output: bool,
) -> Result<(), CliError> {
    if kanals.is_none() && marlas.is_none() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "nothing to convert".into(),
            hint: Some("pass --kanals and/or --marlas".into()),
        });
    }

    let view = parse_area(
        kanals.as_deref().unwrap_or_default(),
        marlas.as_deref().unwrap_or_default(),
    )
    .and_then(|q| AreaView::from_quantity(&q))
    .map_err(|e| CliError { code: share_exit_code(&e), message: e.to_string(), hint: None })?;

    if json_output {
        let json_str = serde_json::to_string_pretty(&view).map_err(|e| CliError {
            code: EXIT_USAGE,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
        return Ok(());
    }

    println!("{}", view.display);
    println!("compact: {}", view.compact);
    println!("marlas:  {} ({})", view.marlas, view.marlas_decimal);
    println!("sarshai: {}", view.area.sarshai_count());
    Ok(())
}
