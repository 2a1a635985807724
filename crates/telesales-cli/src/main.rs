mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{agent::AgentSubcommand, config::ConfigSubcommand, lead::LeadSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "telesales",
    about = "Telesales CRM: tiered round-robin lead distribution across sales agents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .telesales/)
    #[arg(long, global = true, env = "TELESALES_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .telesales/ with a default config and an empty database
    Init,

    /// Manage sales agents
    Agent {
        #[command(subcommand)]
        subcommand: AgentSubcommand,
    },

    /// Manage leads
    Lead {
        #[command(subcommand)]
        subcommand: LeadSubcommand,
    },

    /// Replace the active assignment set with a fresh tiered round-robin run
    Distribute,

    /// Show active assignments, or one lead's full history
    Assignments {
        /// Only assignments for this agent id
        #[arg(long)]
        agent: Option<String>,
        /// Show every assignment (active and past) for this lead id
        #[arg(long, conflicts_with = "agent")]
        lead: Option<String>,
    },

    /// Inspect the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the HTTP API and the monthly distribution scheduler
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,

        /// Bearer token for admin routes (overrides server.admin_token)
        #[arg(long, env = "TELESALES_ADMIN_TOKEN", hide_env_values = true)]
        admin_token: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Agent { subcommand } => cmd::agent::run(&root, subcommand, cli.json),
        Commands::Lead { subcommand } => cmd::lead::run(&root, subcommand, cli.json),
        Commands::Distribute => cmd::distribute::run(&root, cli.json),
        Commands::Assignments { agent, lead } => {
            cmd::assignments::run(&root, agent.as_deref(), lead.as_deref(), cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port, admin_token } => cmd::serve::run(&root, port, admin_token),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
