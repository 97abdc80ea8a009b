//! Ludex command-line front end
//!
//! Wires configuration, the platform sources, the reconciliation engine,
//! and the cover enricher together behind a small set of subcommands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use ludex_config::LudexConfig;
use ludex_covers::{Enricher, StoreSearchClient};
use ludex_library::{GameSource, Library, LibraryStore, Platform, Reconciler, run_import};
use ludex_sources::{EpicSource, FolderSource, SteamSource};

#[derive(Parser, Debug)]
#[command(name = "ludex")]
#[command(about = "Multi-source game library manager")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan all enabled platform sources and merge into the library
    Import,

    /// Fill missing cover artwork via the store search index
    Enrich {
        /// Maximum records to process this pass
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the library sorted by sort key
    List {
        /// Show the completed collection instead of the active one
        #[arg(long)]
        completed: bool,
    },

    /// Move a record to the completed collection
    Complete {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Move a record back to the active collection
    Restore {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Remove a record from the library
    Remove {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Assign or clear a record's executable
    SetExe {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Omit to clear the assignment
        path: Option<String>,
    },

    /// Change a record's sort key (empty falls back to its name)
    SetSortKey {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        key: String,
    },

    /// Toggle the platinum flag on a completed record
    Platinum {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(long)]
        off: bool,
    },

    /// Add a title the scanners cannot see
    Add {
        name: String,
        executable: String,
        /// Owning platform: steam, epic, gog, or none
        #[arg(long, value_parser = parse_platform, default_value = "none")]
        platform: Platform,
    },
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    match value.to_lowercase().as_str() {
        "steam" => Ok(Platform::Steam),
        "epic" => Ok(Platform::Epic),
        "gog" => Ok(Platform::Gog),
        "none" => Ok(Platform::None),
        other => Err(format!("unknown platform: {other}")),
    }
}

fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn build_sources(config: &LudexConfig) -> Vec<Box<dyn GameSource>> {
    let depth = config.scan.max_depth;
    let mut sources: Vec<Box<dyn GameSource>> = Vec::new();

    if config.steam.enabled {
        sources.push(Box::new(SteamSource::new(config.steam.root(), depth)));
    }
    if config.epic.enabled {
        sources.push(Box::new(EpicSource::new(
            config.epic.manifests_dir(),
            config.epic.installed_registry(),
            depth,
        )));
    }
    if let Some(root) = &config.gog.root {
        sources.push(Box::new(FolderSource::gog(root, depth)));
    }
    for root in &config.folders.roots {
        sources.push(Box::new(FolderSource::unmanaged(root, depth)));
    }

    sources
}

fn with_reconciler(
    store: &LibraryStore,
    op: impl FnOnce(&mut Reconciler) -> Result<()>,
) -> Result<()> {
    let mut reconciler = Reconciler::new(store.load());
    op(&mut reconciler)?;
    store
        .save(reconciler.library())
        .context("Failed to persist library snapshot")?;
    Ok(())
}

fn print_collection(records: &[ludex_library::GameRecord]) {
    let mut records: Vec<_> = records.iter().collect();
    records.sort_by(|a, b| a.sort_key.to_lowercase().cmp(&b.sort_key.to_lowercase()));
    for record in records {
        let platform = record.platform.as_str();
        let exe = record.executable.as_deref().unwrap_or("-");
        println!("{:>12}  {:<8}  {:<40}  {}", record.id, platform, record.name, exe);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => LudexConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => LudexConfig::load_default().context("Failed to load configuration")?,
    };
    let store = LibraryStore::new(config.library_path());

    match cli.command {
        Command::Import => {
            let sources = build_sources(&config);
            let refs: Vec<&dyn GameSource> = sources.iter().map(|s| s.as_ref()).collect();
            let report = run_import(&store, &refs);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Enrich { limit } => {
            let client = match &config.enrich.search_url {
                Some(url) => StoreSearchClient::with_base_url(url),
                None => StoreSearchClient::new(),
            };
            let enricher = Enricher::new(
                client,
                limit.unwrap_or(config.enrich.limit),
                Duration::from_millis(config.enrich.delay_ms),
            );
            let report = enricher.run(&store).await;
            info!("Enriched {} of {} scanned records", report.updated, report.scanned);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::List { completed } => {
            let library: Library = store.load();
            if completed {
                print_collection(&library.completed);
            } else {
                print_collection(&library.active);
            }
        }

        Command::Complete { id } => with_reconciler(&store, |r| Ok(r.complete(id)?))?,
        Command::Restore { id } => with_reconciler(&store, |r| Ok(r.restore(id)?))?,
        Command::Remove { id } => with_reconciler(&store, |r| Ok(r.remove(id)?))?,
        Command::SetExe { id, path } => {
            with_reconciler(&store, |r| Ok(r.set_executable(id, path)?))?
        }
        Command::SetSortKey { id, key } => {
            with_reconciler(&store, |r| Ok(r.set_sort_key(id, key)?))?
        }
        Command::Platinum { id, off } => {
            with_reconciler(&store, |r| Ok(r.set_platinum(id, !off)?))?
        }
        Command::Add {
            name,
            executable,
            platform,
        } => with_reconciler(&store, |r| {
            let id = r.add_manual(&name, Some(executable), platform);
            println!("Added {} with id {}", name, id);
            Ok(())
        })?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_set_sort_key() {
        let cli = Cli::try_parse_from(["ludex", "set-sort-key", "620", "Witness, The"]).unwrap();
        match cli.command {
            Command::SetSortKey { id, key } => {
                assert_eq!(id, 620);
                assert_eq!(key, "Witness, The");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_add_with_platform() {
        let cli = Cli::try_parse_from([
            "ludex",
            "add",
            "Cuphead",
            "D:\\GOG Games\\cuphead\\cuphead.exe",
            "--platform",
            "gog",
        ])
        .unwrap();
        match cli.command {
            Command::Add { platform, .. } => assert_eq!(platform, Platform::Gog),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_accepts_synthetic_ids() {
        // Synthetic identities are negative.
        let cli = Cli::try_parse_from(["ludex", "remove", "-42"]).unwrap();
        match cli.command {
            Command::Remove { id } => assert_eq!(id, -42),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_platform() {
        assert!(Cli::try_parse_from(["ludex", "add", "X", "x.exe", "--platform", "itch"]).is_err());
    }
}
