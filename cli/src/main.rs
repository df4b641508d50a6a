use access_policy::AccessPolicy;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod utils;

use commands::{check, config, filter, select};
use utils::policy_config;

/// accessctl - Command line interface for the lead access policy engine
#[derive(Parser)]
#[command(name = "accessctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Policy configuration file (YAML)
    #[arg(long, global = true, env = "ACCESS_POLICY_CONFIG")]
    policy_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether a principal may perform an action on a resource
    Check {
        /// Principal (session user) file, JSON or YAML
        #[arg(short, long)]
        principal: PathBuf,

        /// Resource file, JSON or YAML
        #[arg(short, long)]
        resource: PathBuf,

        /// Action name (read, write, delete, reassign)
        #[arg(short, long)]
        action: String,

        /// Output format (json, yaml, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the resources a principal may act on
    Filter {
        /// Principal (session user) file, JSON or YAML
        #[arg(short, long)]
        principal: PathBuf,

        /// Resource list file, JSON or YAML
        #[arg(short, long)]
        resources: PathBuf,

        /// Action name (read, write, delete, reassign)
        #[arg(short, long, default_value = "read")]
        action: String,

        /// Output format (json, yaml, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Compute a bulk selection under the selection cap
    Select {
        /// Principal (session user) file, JSON or YAML
        #[arg(short, long)]
        principal: PathBuf,

        /// Resource list file, JSON or YAML
        #[arg(short, long)]
        resources: PathBuf,

        /// Action name (read, write, delete, reassign)
        #[arg(short, long)]
        action: String,

        /// Comma separated resource ids to select
        #[arg(long, value_delimiter = ',', conflicts_with = "all")]
        ids: Vec<String>,

        /// Select every accessible resource
        #[arg(long)]
        all: bool,

        /// Output format (json, yaml, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Policy configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective policy configuration
    Show {
        /// Output format (json, yaml, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    // Pick up ACCESS_POLICY_CONFIG from a local .env before clap reads the environment
    policy_config::load_dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so json/yaml output on stdout stays parseable
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let (policy_config, source) = policy_config::load(cli.policy_config.as_deref())?;
    let policy = AccessPolicy::with_config(policy_config)?;

    match cli.command {
        Commands::Check {
            principal,
            resource,
            action,
            format,
        } => {
            let allowed = check::execute(&policy, &principal, &resource, &action, &format)?;
            if !allowed {
                std::process::exit(2);
            }
        }
        Commands::Filter {
            principal,
            resources,
            action,
            format,
        } => {
            filter::execute(&policy, &principal, &resources, &action, &format)?;
        }
        Commands::Select {
            principal,
            resources,
            action,
            ids,
            all,
            format,
        } => {
            let request = select::SelectionRequest::from_flags(ids, all)?;
            select::execute(&policy, &principal, &resources, &action, request, &format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                config::show(&policy, source.as_deref(), &format)?;
            }
        },
    }

    Ok(())
}
