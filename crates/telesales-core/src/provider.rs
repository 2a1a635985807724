//! Collaborator contracts consumed by the distributor.
//!
//! The distributor never talks to storage directly: it reads agents and
//! leads through the two providers and hands the new assignment batch to an
//! [`AssignmentStore`], which owns the transaction.

use crate::error::Result;
use crate::types::{Agent, Assignment, Lead};

/// Agents currently eligible to receive leads (active, not soft-deleted).
pub trait ActiveAgentsProvider {
    fn list_active_agents(&self) -> Result<Vec<Agent>>;
}

/// Leads not in a closed/won terminal state.
pub trait EligibleLeadsProvider {
    fn list_eligible_leads(&self) -> Result<Vec<Lead>>;
}

pub trait AssignmentStore {
    /// Deactivate every active assignment and insert `records`, as one
    /// all-or-nothing transaction. Returns the number of rows inserted.
    fn reset_and_bulk_assign(&self, records: &[Assignment]) -> Result<usize>;
}
