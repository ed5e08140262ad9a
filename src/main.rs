// src/main.rs
//
// Football player statistics service.
// `fetch` and `enrich` produce the dataset; `serve` answers queries over it.
// An external scheduler is expected to run `refresh` (fetch + enrich).

use chrono::Utc;
use clap::Parser;
use fpl_stats::config::{default_config_template, Config};
use fpl_stats::enrich;
use fpl_stats::fetcher::{self, HttpSource};
use fpl_stats::query::PlayerTable;
use fpl_stats::server::QueryServer;
use fpl_stats::snapshot::SnapshotStore;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "fpl-stats")]
#[command(about = "Fetches, enriches and serves football player statistics")]
struct Args {
    /// Mode of operation: serve, fetch, enrich or refresh
    #[arg(long, default_value = "serve")]
    mode: String,

    /// Path to configuration file (TOML)
    #[arg(long, short)]
    config: Option<String>,

    /// Data directory (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Port for the query server (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Print a default configuration file
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.generate_config {
        println!("{}", default_config_template());
        return;
    }

    let config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                eprintln!("Use --generate-config to create a template.");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    init_logging(&config);

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.data_dir.clone());
    let store = SnapshotStore::new(data_dir);

    let ok = match args.mode.as_str() {
        "serve" => run_serve(&args, &config, &store).await,
        "fetch" => run_fetch(&config, &store).await,
        "enrich" => run_enrich(&store),
        "refresh" => run_fetch(&config, &store).await && run_enrich(&store),
        _ => {
            eprintln!(
                "Unknown mode: {}. Use: serve, fetch, enrich, or refresh",
                args.mode
            );
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let default_level = config.global.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

// =============================================================================
// Modes
// =============================================================================

async fn run_serve(args: &Args, config: &Config, store: &SnapshotStore) -> bool {
    let table = match PlayerTable::from_store(store) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("Failed to load enriched snapshot: {}", e);
            error!("Run with --mode refresh to build it.");
            return false;
        }
    };

    let port = args.port.unwrap_or(config.server.port);
    let server = QueryServer::new(table, port);
    println!("Query API available at http://localhost:{}/query", port);

    match server.run().await {
        Ok(()) => true,
        Err(e) => {
            error!("Query server error: {}", e);
            false
        }
    }
}

async fn run_fetch(config: &Config, store: &SnapshotStore) -> bool {
    let source = match HttpSource::new(&config.source.url, config.source.timeout()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return false;
        }
    };

    info!("Fetching {}", source.url());
    // fetch_snapshots logs its own failures
    match fetcher::fetch_snapshots(&source, store, Utc::now()).await {
        Ok(summary) => {
            println!(
                "Fetched {} players and {} teams into {}",
                summary.players,
                summary.teams,
                store.data_dir().display()
            );
            true
        }
        Err(_) => false,
    }
}

fn run_enrich(store: &SnapshotStore) -> bool {
    match enrich::run(store) {
        Ok(count) => {
            println!("Enriched {} players", count);
            true
        }
        Err(e) => {
            error!("Enrichment aborted, previous snapshot kept: {}", e);
            false
        }
    }
}
