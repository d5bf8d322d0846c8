//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Leadtrace CLI - attribute inbound leads to their traffic sources.
#[derive(Debug, Parser)]
#[command(name = "leadtrace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run attribution over an exported lead table
    Analyze(AnalyzeArgs),

    /// Render the full attribution report for a lead table
    Report(ReportArgs),

    /// Inspect or validate pattern rule tables
    Rules(RulesArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Exported lead table (CSV); defaults to the profile's lead path
    pub leads: Option<PathBuf>,

    /// Analytics traffic feed (CSV); repeat for multiple feeds
    #[arg(short, long)]
    pub traffic: Vec<PathBuf>,

    /// Write per-lead results to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the batch summary table to this file
    #[arg(short, long)]
    pub summary: Option<PathBuf>,

    /// Show every lead row, not just the summary
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Exported lead table (CSV); defaults to the profile's lead path
    pub leads: Option<PathBuf>,

    /// Analytics traffic feed (CSV); repeat for multiple feeds
    #[arg(short, long)]
    pub traffic: Vec<PathBuf>,
}

/// Arguments for rule table inspection.
#[derive(Debug, Parser)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

/// Rule table actions.
#[derive(Debug, Subcommand)]
pub enum RulesAction {
    /// Print the built-in rule table as TOML
    Show,

    /// Validate a rule table TOML file
    Check {
        /// Rule table file
        file: PathBuf,
    },
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Lead table path
        #[arg(short, long)]
        leads: PathBuf,
        /// Traffic feed path
        #[arg(short, long)]
        traffic: Option<PathBuf>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from([
            "leadtrace", "analyze", "leads.csv", "--traffic", "ga4.csv", "--traffic", "ads.csv",
        ]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.leads, Some(PathBuf::from("leads.csv")));
                assert_eq!(
                    args.traffic,
                    vec![PathBuf::from("ga4.csv"), PathBuf::from("ads.csv")]
                );
                assert_eq!(args.summary, None);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_rules_show_command() {
        let cli = Cli::parse_from(["leadtrace", "rules", "show"]);
        assert!(matches!(
            cli.command,
            Command::Rules(RulesArgs {
                action: RulesAction::Show
            })
        ));
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::parse_from(["leadtrace", "--format", "json", "report", "leads.csv"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }
}
