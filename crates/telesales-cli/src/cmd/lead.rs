use crate::output::{fmt_score, print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use telesales_core::store::DepositStatus;
use telesales_core::types::Lead;

#[derive(Subcommand)]
pub enum LeadSubcommand {
    /// Add a lead; it is eligible for distribution until closed
    Add {
        /// Lead name
        name: String,

        /// Conversion score in [0, 1]; omit to treat as 0 (silver)
        #[arg(long)]
        score: Option<f64>,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// List leads (default: open only)
    List {
        /// Include closed leads
        #[arg(long)]
        all: bool,
    },

    /// Mark a lead as deposited so it leaves future distributions
    Close {
        /// Lead id
        id: String,
    },
}

pub fn run(root: &Path, subcommand: LeadSubcommand, json: bool) -> anyhow::Result<()> {
    let (config, store) = super::open_store(root)?;
    match subcommand {
        LeadSubcommand::Add { name, score, phone } => {
            let lead = store.add_lead(&name, phone.as_deref(), score)?;
            if json {
                print_json(&lead)?;
            } else {
                let tier = config
                    .tiers
                    .classify(&Lead::new(lead.id.clone(), lead.score));
                println!("added lead {} ({}) tier={tier}", lead.name, lead.id);
            }
        }
        LeadSubcommand::List { all } => {
            let leads: Vec<_> = store
                .list_leads()?
                .into_iter()
                .filter(|l| all || l.deposit_status == DepositStatus::Open)
                .collect();
            if json {
                print_json(&leads)?;
                return Ok(());
            }
            if leads.is_empty() {
                println!("No leads.");
                return Ok(());
            }
            let rows = leads
                .iter()
                .map(|l| {
                    let tier = config
                        .tiers
                        .classify(&Lead::new(l.id.clone(), l.score));
                    vec![
                        l.id.clone(),
                        l.name.clone(),
                        l.phone.clone().unwrap_or_else(|| "-".to_string()),
                        fmt_score(l.score),
                        tier.to_string(),
                        l.deposit_status.as_str().to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "NAME", "PHONE", "SCORE", "TIER", "STATUS"], rows);
        }
        LeadSubcommand::Close { id } => {
            store.close_lead(&id)?;
            if json {
                print_json(&serde_json::json!({ "id": id, "deposit_status": "closed" }))?;
            } else {
                println!("closed lead {id}");
            }
        }
    }
    Ok(())
}
