pub mod agent;
pub mod assignments;
pub mod config;
pub mod distribute;
pub mod init;
pub mod lead;
pub mod serve;

use anyhow::Context;
use std::path::Path;
use telesales_core::config::Config;
use telesales_core::store::SqliteCrm;

/// Load the project config and open its database.
pub fn open_store(root: &Path) -> anyhow::Result<(Config, SqliteCrm)> {
    let config = Config::load(root).context("failed to load config")?;
    let path = config.database_path(root);
    let store = SqliteCrm::open(&path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;
    Ok((config, store))
}
