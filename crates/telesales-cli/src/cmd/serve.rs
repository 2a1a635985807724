use anyhow::Context;
use std::path::Path;
use telesales_core::config::Config;
use telesales_server::state::AppState;

pub fn run(root: &Path, port: Option<u16>, admin_token: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    if let Some(token) = admin_token.filter(|t| !t.is_empty()) {
        config.server.admin_token = Some(token);
    }
    let port = port.unwrap_or(config.server.port);

    let state = AppState::open_with(root, config).context("failed to open telesales state")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(telesales_server::serve(state, port))
}
