//! Rules command implementation.

use crate::cli::{RulesAction, RulesArgs};
use crate::error::Result;
use crate::output::Formatter;
use leadtrace_classifier::{RuleTable, RuleTableSpec};

/// Execute the rules command.
pub fn execute_rules(args: RulesArgs, formatter: &Formatter) -> Result<()> {
    match args.action {
        RulesAction::Show => {
            println!("{}", RuleTable::default_spec().to_toml()?);
        }
        RulesAction::Check { file } => {
            let text = std::fs::read_to_string(&file)?;
            let spec = RuleTableSpec::from_toml(&text)?;
            let table = RuleTable::compile(&spec)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "{}: {} rule set(s) compiled",
                    file.display(),
                    table.set_count()
                ))
            );
        }
    }
    Ok(())
}
