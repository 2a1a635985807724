//! Tiered round-robin lead distribution.
//!
//! A run reads the active agents and eligible leads, buckets leads by tier,
//! shuffles each bucket, and deals leads to agents in platinum → gold →
//! silver order with a single cursor that carries across buckets. The
//! resulting batch replaces the previous active assignments in one store call.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::{CrmError, Result};
use crate::provider::{ActiveAgentsProvider, AssignmentStore, EligibleLeadsProvider};
use crate::shuffle::shuffle;
use crate::types::{Agent, Assignment, DistributionSummary, Lead, Tier, TierCounts, TierThresholds};

// ---------------------------------------------------------------------------
// DistributionContext
// ---------------------------------------------------------------------------

pub struct DistributionContext<'a> {
    pub agents: &'a dyn ActiveAgentsProvider,
    pub leads: &'a dyn EligibleLeadsProvider,
    pub store: &'a dyn AssignmentStore,
}

// ---------------------------------------------------------------------------
// TierBuckets
// ---------------------------------------------------------------------------

/// Leads split by tier, each bucket in fetch order until shuffled.
#[derive(Debug, Default)]
pub struct TierBuckets {
    pub platinum: Vec<Lead>,
    pub gold: Vec<Lead>,
    pub silver: Vec<Lead>,
}

impl TierBuckets {
    pub fn partition(leads: Vec<Lead>, thresholds: &TierThresholds) -> Self {
        let mut buckets = Self::default();
        for lead in leads {
            let tier = thresholds.classify(&lead);
            buckets.bucket_mut(tier).push(lead);
        }
        buckets
    }

    pub fn bucket(&self, tier: Tier) -> &[Lead] {
        match tier {
            Tier::Platinum => &self.platinum,
            Tier::Gold => &self.gold,
            Tier::Silver => &self.silver,
        }
    }

    fn bucket_mut(&mut self, tier: Tier) -> &mut Vec<Lead> {
        match tier {
            Tier::Platinum => &mut self.platinum,
            Tier::Gold => &mut self.gold,
            Tier::Silver => &mut self.silver,
        }
    }

    pub fn counts(&self) -> TierCounts {
        TierCounts {
            platinum: self.platinum.len(),
            gold: self.gold.len(),
            silver: self.silver.len(),
        }
    }

    fn len(&self) -> usize {
        self.platinum.len() + self.gold.len() + self.silver.len()
    }

    /// Shuffle every bucket independently; tiers never mix.
    pub fn shuffle_each<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for &tier in Tier::all() {
            shuffle(self.bucket_mut(tier), rng);
        }
    }
}

// ---------------------------------------------------------------------------
// Round-robin dealing
// ---------------------------------------------------------------------------

/// Deal one bucket starting at `*cursor`, leaving `*cursor` on the agent
/// that receives the next lead. `agents` must be non-empty.
fn deal_bucket(
    bucket: &[Lead],
    agents: &[Agent],
    cursor: &mut usize,
    assigned_at: DateTime<Utc>,
    out: &mut Vec<Assignment>,
) {
    for lead in bucket {
        out.push(Assignment {
            agent_id: agents[*cursor].agent_id.clone(),
            lead_id: lead.lead_id.clone(),
            is_active: true,
            assigned_at,
        });
        *cursor = (*cursor + 1) % agents.len();
    }
}

/// Build the assignment batch for already-shuffled buckets.
///
/// Returns an empty batch when `agents` is empty.
pub fn deal(agents: &[Agent], buckets: &TierBuckets, assigned_at: DateTime<Utc>) -> Vec<Assignment> {
    let mut out = Vec::with_capacity(buckets.len());
    if agents.is_empty() {
        return out;
    }
    let mut cursor = 0usize;
    for &tier in Tier::all() {
        deal_bucket(buckets.bucket(tier), agents, &mut cursor, assigned_at, &mut out);
    }
    out
}

// ---------------------------------------------------------------------------
// LeadDistributor
// ---------------------------------------------------------------------------

/// Assignment batch plus the tier counts it was built from.
#[derive(Debug, Clone)]
pub struct DistributionPlan {
    pub assignments: Vec<Assignment>,
    pub counts: TierCounts,
}

#[derive(Debug, Clone, Default)]
pub struct LeadDistributor {
    thresholds: TierThresholds,
}

impl LeadDistributor {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    /// Tier, shuffle, and deal `leads` across `agents` without touching storage.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        agents: &[Agent],
        leads: Vec<Lead>,
        rng: &mut R,
        assigned_at: DateTime<Utc>,
    ) -> DistributionPlan {
        let mut buckets = TierBuckets::partition(leads, &self.thresholds);
        buckets.shuffle_each(rng);
        DistributionPlan {
            assignments: deal(agents, &buckets, assigned_at),
            counts: buckets.counts(),
        }
    }

    /// Run one full distribution: fetch, plan, commit, audit.
    ///
    /// Precondition failures return before the store is called. Provider and
    /// store errors are returned unchanged.
    pub fn distribute<R: Rng + ?Sized>(
        &self,
        ctx: &DistributionContext<'_>,
        rng: &mut R,
    ) -> Result<DistributionSummary> {
        let agents = ctx.agents.list_active_agents()?;
        let leads = ctx.leads.list_eligible_leads()?;

        if agents.is_empty() {
            return Err(CrmError::NoActiveAgents);
        }
        if leads.is_empty() {
            return Err(CrmError::NoEligibleLeads);
        }

        let total_leads = leads.len();
        let plan = self.plan(&agents, leads, rng, Utc::now());
        tracing::debug!(
            platinum = plan.counts.platinum,
            gold = plan.counts.gold,
            silver = plan.counts.silver,
            "planned lead distribution"
        );

        let assigned = ctx.store.reset_and_bulk_assign(&plan.assignments)?;

        let summary = DistributionSummary {
            total_leads,
            total_agents: agents.len(),
            distribution: plan.counts,
            assigned,
        };
        tracing::info!(
            target: "telesales::audit",
            total_leads = summary.total_leads,
            total_agents = summary.total_agents,
            assigned = summary.assigned,
            "leads distributed"
        );
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
