use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use collection_sync_config::{Config, PathManager};
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn run_config(cmd: ConfigCommands, explicit: Option<&Path>, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, explicit, paths, output),
    }
}

fn show_config(full: bool, explicit: Option<&Path>, paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = explicit.map(Path::to_path_buf).unwrap_or_else(|| paths.config_file());
    let file_present = config_file.exists();

    let config = Config::load_unvalidated(explicit, &paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config: {}", e))?;
    let problem = config.validate().err();
    let shown = if full { config } else { config.masked() };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            if file_present {
                println!("{} {}", "File:".bright_black(), config_file.display());
            } else {
                println!(
                    "{} {} (not found, using defaults and environment)",
                    "File:".bright_black(),
                    config_file.display()
                );
            }
            println!();

            let rendered = toml::to_string_pretty(&shown)
                .map_err(|e| color_eyre::eyre::eyre!("Failed to render config: {}", e))?;
            println!("{}", rendered);

            match problem {
                Some(e) => output.warn(format!("Configuration is not usable yet: {}", e)),
                None => output.success("Configuration is valid"),
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "config_file_present": file_present,
                "valid": problem.is_none(),
                "problem": problem.map(|e| e.to_string()),
                "config": shown,
            }));
        }
    }

    Ok(())
}
