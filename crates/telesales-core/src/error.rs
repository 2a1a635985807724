use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("not initialized: run 'telesales init'")]
    NotInitialized,

    #[error("no active agents available to receive leads")]
    NoActiveAgents,

    #[error("no eligible leads to distribute")]
    NoEligibleLeads,

    #[error("assignment transaction failed: {0}")]
    StoreTransaction(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("agent not found: {0}")]
    AgentNotFound(String),

    #[error("lead not found: {0}")]
    LeadNotFound(String),

    #[error("invalid score {0}: must be between 0 and 1")]
    InvalidScore(f64),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CrmError {
    /// True for precondition failures the caller can fix and retry.
    pub fn is_precondition(&self) -> bool {
        matches!(self, CrmError::NoActiveAgents | CrmError::NoEligibleLeads)
    }
}

pub type Result<T> = std::result::Result<T, CrmError>;
