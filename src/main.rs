//! Binary entrypoint for the hideout CLI.
//!
//! Commands:
//! - `init` - create a starter `hideout.toml` and the data directories
//! - `new-profile <id>` - create and store a fresh profile
//! - `show <id>` - print a profile's areas and production jobs
//! - `collect <id> <recipe>` - collect a finished production into the stash
//!
//! See the library crate docs for module-level details: `hideout::`.
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;

use hideout::config::HideoutConfig;
use hideout::production::{is_production_ready, take_production};
use hideout::profile::Profile;
use hideout::storage::ProfileStore;
use hideout::templates::TemplateDb;

#[derive(Parser)]
#[command(name = "hideout")]
#[command(about = "Base-building and crafting engine for persistent player profiles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "hideout.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a starter configuration and data directories
    Init,
    /// Create and store a fresh profile
    NewProfile {
        /// Profile id
        id: String,
    },
    /// Print a profile's areas and production jobs
    Show {
        /// Profile id
        id: String,
    },
    /// Collect a finished production job into the stash
    Collect {
        /// Profile id
        id: String,
        /// Recipe id of the job to collect
        recipe: String,
    },
}

fn init_logging(config: Option<&HideoutConfig>, verbose: u8) {
    let default_filter = match verbose {
        0 => config
            .map(|c| c.log_level.clone())
            .unwrap_or_else(|| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&default_filter),
    )
    .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => HideoutConfig::load(&cli.config).ok(),
    };
    init_logging(pre_config.as_ref(), cli.verbose);

    match cli.command {
        Commands::Init => {
            let config = HideoutConfig::create_default(&cli.config)?;
            std::fs::create_dir_all(&config.data_dir)
                .with_context(|| format!("creating {}", config.data_dir))?;
            std::fs::create_dir_all(&config.seeds_dir)
                .with_context(|| format!("creating {}", config.seeds_dir))?;
            println!("Wrote {} and created data directories.", cli.config);
        }
        Commands::NewProfile { id } => {
            let config = pre_config.context("run `hideout init` first")?;
            let store = ProfileStore::open(&config.data_dir)?;
            store.put_profile(Profile::new(&id))?;
            info!("profile {} created", id);
            println!("Profile {} created.", id);
        }
        Commands::Show { id } => {
            let config = pre_config.context("run `hideout init` first")?;
            let store = ProfileStore::open(&config.data_dir)?;
            let profile = store.get_profile(&id)?;
            let now = Utc::now().timestamp();

            println!("Profile {} ({} stash items)", profile.id, profile.stash.len());
            println!("Areas:");
            let mut areas: Vec<_> = profile.areas.values().collect();
            areas.sort_by_key(|a| a.area_type);
            for area in areas {
                let status = if area.constructing {
                    format!("constructing, done at {}", area.complete_time)
                } else if area.active {
                    "active".to_string()
                } else {
                    "inactive".to_string()
                };
                println!("  {:?}: level {} ({})", area.area_type, area.level, status);
            }
            if profile.productions.is_empty() {
                println!("No production jobs.");
            } else {
                println!("Productions:");
                let mut jobs: Vec<_> = profile.productions.values().collect();
                jobs.sort_by(|a, b| a.recipe_id.cmp(&b.recipe_id));
                for job in jobs {
                    let status = if is_production_ready(job, now) {
                        "ready"
                    } else {
                        "running"
                    };
                    println!(
                        "  {}: {} (started {}, {}s)",
                        job.recipe_id, status, job.start_timestamp, job.production_time
                    );
                }
            }
        }
        Commands::Collect { id, recipe } => {
            let config = pre_config.context("run `hideout init` first")?;
            let templates = TemplateDb::load_from_dir(&config.seeds_dir)?;
            let store = ProfileStore::open(&config.data_dir)?;
            let now = Utc::now().timestamp();

            let ledger = store.with_profile(&id, |profile| {
                if let Some(job) = profile.production_by_id(&recipe) {
                    if !is_production_ready(job, now) {
                        info!("recipe {} is still running; nothing collected", recipe);
                        return Ok(hideout::TransactionLedger::new());
                    }
                }
                take_production(&templates, profile, &recipe)
            })?;

            if ledger.is_empty() {
                println!("Nothing to collect for {}.", recipe);
            } else {
                println!("Collected {} item(s):", ledger.new.len());
                for item in &ledger.new {
                    println!("  {} x{}", item.template_id, item.count);
                }
            }
        }
    }

    Ok(())
}
