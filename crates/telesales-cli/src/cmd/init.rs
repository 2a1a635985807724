use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use telesales_core::config::Config;
use telesales_core::store::SqliteCrm;
use telesales_core::{io, paths};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    io::ensure_dir(&paths::telesales_dir(root)).context("failed to create .telesales/")?;

    let config_path = paths::config_path(root);
    let created = Config::write_default(root).context("failed to write config")?;

    let config = Config::load(root).context("failed to load config")?;
    let db_path = config.database_path(root);
    SqliteCrm::open(&db_path)
        .with_context(|| format!("failed to create database at {}", db_path.display()))?;

    if json {
        print_json(&serde_json::json!({
            "root": root,
            "config": config_path,
            "config_created": created,
            "database": db_path,
        }))?;
        return Ok(());
    }

    if created {
        println!("Created {}", config_path.display());
    } else {
        println!("Kept existing {}", config_path.display());
    }
    println!("Database ready at {}", db_path.display());
    Ok(())
}
