//! Report command implementation.

use crate::cli::ReportArgs;
use crate::commands::analyze::resolve_request;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use leadtrace_pipeline::run_attribution_files;
use leadtrace_report::render_report;

/// Execute the report command.
pub fn execute_report(args: ReportArgs, config: &Config, _formatter: &Formatter) -> Result<()> {
    let request = resolve_request(args.leads, args.traffic, config)?;
    let outcome = run_attribution_files(&request)?;
    println!("{}", render_report(&outcome.summary));
    Ok(())
}
