use std::path::Path;
use std::sync::Arc;

use telesales_core::config::Config;
use telesales_core::distributor::{DistributionContext, LeadDistributor};
use telesales_core::store::SqliteCrm;
use telesales_core::types::DistributionSummary;

/// Shared application state passed to all route handlers and the scheduler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<SqliteCrm>,
}

impl AppState {
    pub fn new(config: Config, store: SqliteCrm) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Load `.telesales/config.yaml` under `root` and open the configured database.
    pub fn open(root: &Path) -> telesales_core::Result<Self> {
        let config = Config::load(root)?;
        Self::open_with(root, config)
    }

    /// Like [`AppState::open`] with an already-loaded (possibly overridden) config.
    pub fn open_with(root: &Path, config: Config) -> telesales_core::Result<Self> {
        config.ensure_valid()?;
        let store = SqliteCrm::open(&config.database_path(root))?;
        Ok(Self::new(config, store))
    }

    /// Run one distribution on a blocking thread.
    ///
    /// Errors from the distributor come back as `CrmError` inside the
    /// `anyhow::Error`, so the HTTP layer can map them to a status.
    pub async fn distribute(&self) -> anyhow::Result<DistributionSummary> {
        let store = Arc::clone(&self.store);
        let distributor = LeadDistributor::new(self.config.tiers);
        let summary = tokio::task::spawn_blocking(move || {
            let ctx = DistributionContext {
                agents: store.as_ref(),
                leads: store.as_ref(),
                store: store.as_ref(),
            };
            distributor.distribute(&ctx, &mut rand::thread_rng())
        })
        .await
        .map_err(|e| anyhow::anyhow!("distribution join error: {e}"))??;
        Ok(summary)
    }
}
