//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use leadtrace_pipeline::{run_attribution_files, write_results, write_summary, AttributionRequest};
use std::path::PathBuf;

/// Execute the analyze command.
pub fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let request = resolve_request(args.leads, args.traffic, config)?;
    let outcome = run_attribution_files(&request)?;

    println!("{}", formatter.format_outcome(&outcome, args.all)?);

    if let Some(output) = args.output {
        write_results(&outcome, &output)?;
        println!(
            "{}",
            formatter.success(&format!("Results written to {}", output.display()))
        );
    }

    if let Some(summary) = args.summary {
        write_summary(&outcome, &summary)?;
        println!(
            "{}",
            formatter.success(&format!("Summary written to {}", summary.display()))
        );
    }

    Ok(())
}

/// Build the run request from arguments, falling back to the active profile.
///
/// Explicit `--traffic` flags replace the profile's feed rather than adding
/// to it.
pub fn resolve_request(
    leads: Option<PathBuf>,
    traffic: Vec<PathBuf>,
    config: &Config,
) -> Result<AttributionRequest> {
    let leads = resolve_leads_path(leads, config)?;
    let feeds = if traffic.is_empty() {
        config
            .get_active_profile()
            .ok()
            .and_then(|p| p.traffic_path.clone())
            .into_iter()
            .collect()
    } else {
        traffic
    };
    Ok(AttributionRequest { leads, feeds })
}

/// The lead table path: the positional argument, else the active profile.
pub fn resolve_leads_path(arg: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path);
    }
    match config.get_active_profile() {
        Ok(profile) => Ok(profile.leads_path.clone()),
        Err(_) => Err(CliError::InvalidInput(
            "No lead table given and no active profile configured".to_string(),
        )),
    }
}
