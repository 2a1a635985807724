use crate::output::{print_json, print_table};
use std::collections::HashMap;
use std::path::Path;
use telesales_core::types::Assignment;

pub fn run(
    root: &Path,
    agent: Option<&str>,
    lead: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let (_, store) = super::open_store(root)?;

    let rows = match lead {
        Some(lead_id) => store.assignment_history(lead_id)?,
        None => store.active_assignments(agent)?,
    };

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No assignments.");
        return Ok(());
    }

    let names: HashMap<String, String> = store
        .list_agents()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    print_table(
        &["LEAD", "AGENT", "ACTIVE", "ASSIGNED AT"],
        rows.iter().map(|a| row(a, &names)).collect(),
    );
    Ok(())
}

fn row(a: &Assignment, names: &HashMap<String, String>) -> Vec<String> {
    let agent = names
        .get(&a.agent_id)
        .map(|name| format!("{name} ({})", a.agent_id))
        .unwrap_or_else(|| a.agent_id.clone());
    vec![
        a.lead_id.clone(),
        agent,
        if a.is_active { "yes" } else { "no" }.to_string(),
        a.assigned_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ]
}
