use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use telesales_core::config::{Config, WarnLevel};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        // Never echo the admin token back.
        let mut redacted = config.clone();
        redacted.server.admin_token = redacted.server.admin_token.map(|_| "***".to_string());
        return print_json(&redacted);
    }

    println!("tiers:     platinum >= {}, gold >= {}", config.tiers.platinum, config.tiers.gold);
    if config.schedule.enabled {
        println!(
            "schedule:  day {} of each month at {:02}:00 UTC",
            config.schedule.day_of_month, config.schedule.hour_utc
        );
    } else {
        println!("schedule:  disabled");
    }
    println!("port:      {}", config.server.port);
    println!(
        "admin:     {}",
        if config.server.admin_token.is_some() { "token set" } else { "open" }
    );
    println!("database:  {}", config.database_path(root).display());
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
