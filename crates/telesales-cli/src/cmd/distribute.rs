use crate::output::{print_json, print_table};
use std::path::Path;
use telesales_core::distributor::{DistributionContext, LeadDistributor};
use telesales_core::types::Tier;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (config, store) = super::open_store(root)?;
    config.ensure_valid()?;

    let distributor = LeadDistributor::new(config.tiers);
    let ctx = DistributionContext {
        agents: &store,
        leads: &store,
        store: &store,
    };
    let summary = distributor.distribute(&ctx, &mut rand::thread_rng())?;

    if json {
        return print_json(&serde_json::json!({
            "message": "leads distributed",
            "summary": summary,
        }));
    }

    println!(
        "Distributed {} leads across {} agents.",
        summary.assigned, summary.total_agents
    );
    let rows = Tier::all()
        .iter()
        .map(|&tier| vec![tier.to_string(), summary.distribution.get(tier).to_string()])
        .collect();
    print_table(&["TIER", "LEADS"], rows);
    Ok(())
}
