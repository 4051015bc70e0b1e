use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use log_registry::audit::AuditTrail;
use log_registry::config::{loader, RegistryConfig};
use log_registry::identity::{EnvIdentity, IdentityProvider, StaticIdentity};
use log_registry::integrity::IntegrityCheck;
use log_registry::ledger::FileLedger;
use log_registry::LogContract;

#[derive(Parser)]
#[command(name = "log-registry", version, about = "Access-controlled, tamper-evident log registry")]
struct Cli {
    /// YAML configuration file (defaults to LOG_REGISTRY_* environment variables)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Caller identity (defaults to LOG_REGISTRY_IDENTITY)
    #[arg(short, long)]
    identity: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the bootstrap record
    Init,
    /// Upload raw log content
    Upload {
        #[arg(long)]
        id: String,
        /// Read the payload from a file
        #[arg(long, conflicts_with = "data")]
        file: Option<PathBuf>,
        /// Inline payload text
        #[arg(long)]
        data: Option<String>,
    },
    /// Register a named log file with metadata
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        file_name: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        timestamp: String,
        #[arg(long)]
        owner: String,
    },
    /// Read a log record
    Read {
        #[arg(long)]
        id: String,
    },
    /// Recompute the content digest of a log record
    Verify {
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "log_registry=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => loader::load_from_file(path)?,
        None => RegistryConfig::load()?,
    };
    info!("Configuration loaded for {}", config.server_id);

    let ledger = FileLedger::open(&config.ledger_path)
        .with_context(|| format!("opening ledger {:?}", config.ledger_path))?;

    let mut contract = LogContract::new(ledger, config.authorization_engine()?)
        .with_bootstrap(config.bootstrap_source());
    if config.audit.enabled {
        let trail = AuditTrail::open(&config.audit.log_path, &config.server_id)?;
        contract = contract.with_audit_trail(trail);
    }

    let caller: Box<dyn IdentityProvider> = match cli.identity {
        Some(identity) => Box::new(StaticIdentity::new(identity)),
        None => Box::new(EnvIdentity::default()),
    };

    match cli.command {
        Command::Init => {
            contract.init_ledger(caller.as_ref())?;
            println!("Ledger initialized");
        }
        Command::Upload { id, file, data } => {
            let payload = match (file, data) {
                (Some(path), _) => std::fs::read(&path)
                    .with_context(|| format!("reading payload {:?}", path))?,
                (None, Some(data)) => data.into_bytes(),
                (None, None) => return Err(anyhow!("either --file or --data is required")),
            };
            contract.upload_log(caller.as_ref(), &id, &payload)?;
            println!("Uploaded log {}", id);
        }
        Command::Create {
            id,
            file_name,
            content,
            timestamp,
            owner,
        } => {
            contract.create_log(
                caller.as_ref(),
                &id,
                &file_name,
                &content,
                &timestamp,
                &owner,
            )?;
            println!("Created log {}", id);
        }
        Command::Read { id } => {
            let record = contract.read_log(caller.as_ref(), &id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Verify { id } => {
            let check = contract.verify_log(caller.as_ref(), &id)?;
            println!("{}: {}", id, check.summary());
            if matches!(check, IntegrityCheck::Tampered { .. }) {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
