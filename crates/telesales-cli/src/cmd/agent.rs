use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum AgentSubcommand {
    /// Register a new active agent
    Add {
        /// Display name
        name: String,
    },

    /// List agents (default: active only)
    List {
        /// Include inactive and removed agents
        #[arg(long)]
        all: bool,
    },

    /// Stop giving new leads to an agent
    Deactivate {
        /// Agent id
        id: String,
    },

    /// Soft-delete an agent; existing assignment history is kept
    Remove {
        /// Agent id
        id: String,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcommand: AgentSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open_store(root)?;
    match subcommand {
        AgentSubcommand::Add { name } => {
            let agent = store.add_agent(&name)?;
            if json {
                print_json(&agent)?;
            } else {
                println!("added agent {} ({})", agent.name, agent.id);
            }
        }
        AgentSubcommand::List { all } => {
            let agents: Vec<_> = store
                .list_agents()?
                .into_iter()
                .filter(|a| all || (a.is_active && a.deleted_at.is_none()))
                .collect();
            if json {
                print_json(&agents)?;
                return Ok(());
            }
            if agents.is_empty() {
                println!("No agents.");
                return Ok(());
            }
            let rows = agents
                .iter()
                .map(|a| {
                    let status = if a.deleted_at.is_some() {
                        "removed"
                    } else if a.is_active {
                        "active"
                    } else {
                        "inactive"
                    };
                    vec![a.id.clone(), a.name.clone(), status.to_string()]
                })
                .collect();
            print_table(&["ID", "NAME", "STATUS"], rows);
        }
        AgentSubcommand::Deactivate { id } => {
            store.deactivate_agent(&id)?;
            if json {
                print_json(&serde_json::json!({ "id": id, "is_active": false }))?;
            } else {
                println!("deactivated agent {id}");
            }
        }
        AgentSubcommand::Remove { id } => {
            store.remove_agent(&id)?;
            if json {
                print_json(&serde_json::json!({ "id": id, "removed": true }))?;
            } else {
                println!("removed agent {id}");
            }
        }
    }
    Ok(())
}
