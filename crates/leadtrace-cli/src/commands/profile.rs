//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the profile command.
pub fn execute_profile(args: ProfileArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProfileAction::List => {
            let mut names: Vec<&String> = config.profiles.keys().collect();
            names.sort();
            for name in names {
                if *name == config.active_profile {
                    println!("* {}", name);
                } else {
                    println!("  {}", name);
                }
            }
        }
        ProfileAction::Show => {
            let profile = config.get_active_profile()?;
            println!("Profile: {}", config.active_profile);
            println!("  leads:   {}", profile.leads_path.display());
            match &profile.traffic_path {
                Some(path) => println!("  traffic: {}", path.display()),
                None => println!("  traffic: (none)"),
            }
        }
        ProfileAction::Switch { name } => {
            config.switch_profile(name.clone())?;
            config.save()?;
            println!("{}", formatter.success(&format!("Switched to '{}'", name)));
        }
        ProfileAction::Set {
            name,
            leads,
            traffic,
        } => {
            config.set_profile(
                name.clone(),
                Profile {
                    leads_path: leads,
                    traffic_path: traffic,
                },
            );
            config.save()?;
            println!("{}", formatter.success(&format!("Profile '{}' saved", name)));
        }
        ProfileAction::Delete { name } => {
            if name == config.active_profile {
                return Err(CliError::InvalidInput(
                    "Cannot delete the active profile".to_string(),
                ));
            }
            if config.profiles.remove(&name).is_none() {
                return Err(CliError::Config(format!("Profile '{}' not found", name)));
            }
            config.save()?;
            println!("{}", formatter.success(&format!("Profile '{}' deleted", name)));
        }
    }
    Ok(())
}
