mod cache;
mod config;
mod mock_data;
mod models;
mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repocache_core::storage::EntityRepository;

use crate::{
    cache::MemoryCache,
    config::Config,
    mock_data::generate_mock_domains,
    models::Domain,
    storage::{CachedRepository, InMemoryRepository},
};

/// RepoCache - Repository cache policy over an in-memory LRU store
#[derive(Parser, Debug)]
#[command(name = "repocache")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted walk through the cached repository, logging each step
    Demo {
        /// Number of domains to seed
        #[arg(long, short, default_value = "5", env = "DEMO_SEED")]
        seed: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let (plain, json) = if cli.json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repocache=debug,repocache_core=debug".into()),
        )
        .with(plain)
        .with(json)
        .init();

    match cli.command {
        Command::Demo { seed } => run_demo(Config::from_env(), seed).await,
    }
}

/// Seeds a cached domain repository and exercises every operation.
async fn run_demo(config: Config, seed: usize) -> Result<()> {
    tracing::info!(
        ttl_seconds = config.cache_ttl_seconds,
        max_entries = config.cache_max_entries,
        validate_all_count = config.validate_all_count,
        allow_zero_count = config.allow_zero_count,
        "Starting demo"
    );

    let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
    let repository = Arc::new(InMemoryRepository::<Domain>::new());
    let domains = CachedRepository::new(repository, cache.clone(), config.policy_options());

    let empty = domains.get_many(&[]).await?;
    tracing::info!(count = empty.len(), "Read all domains from an empty store");
    let empty = domains.get_many(&[]).await?;
    tracing::info!(
        count = empty.len(),
        cached_entries = cache.entry_count().await,
        "Read all domains again"
    );

    let mut saved = Vec::with_capacity(seed);
    for domain in generate_mock_domains(seed) {
        saved.push(domains.save(&domain).await?);
    }
    tracing::info!(
        count = saved.len(),
        wildcards = saved.iter().filter(|d| d.is_wildcard()).count(),
        "Seeded domains"
    );

    let all = domains.get_many(&[]).await?;
    tracing::info!(
        count = all.len(),
        total = domains.count().await?,
        "Read all domains"
    );

    let Some(first) = saved.first().cloned() else {
        tracing::info!("Nothing seeded, demo finished");
        return Ok(());
    };

    let found = domains
        .get(first.id)
        .await?
        .context("seeded domain is missing")?;
    tracing::info!(id = found.id, domain = %found.domain_name, "Read domain by id");

    let ids: Vec<i32> = saved.iter().map(|d| d.id).collect();
    let some = domains.get_many(&ids).await?;
    tracing::info!(requested = ids.len(), found = some.len(), "Read domains by id");

    let mut renamed = first.clone();
    renamed.domain_name = format!("www.{}", first.domain_name);
    let renamed = domains.save(&renamed).await?;
    tracing::info!(id = renamed.id, domain = %renamed.domain_name, "Renamed domain");

    let mut invalid = renamed.clone();
    invalid.domain_name = String::new();
    if let Err(err) = domains.save(&invalid).await {
        tracing::warn!(id = invalid.id, error = %err, "Rejected invalid domain, cache entry cleared");
    }

    domains.delete(&renamed).await?;
    tracing::info!(
        id = renamed.id,
        exists = domains.exists(renamed.id).await?,
        "Deleted domain"
    );

    tracing::info!(
        total = domains.count().await?,
        cached_entries = cache.entry_count().await,
        "Demo finished"
    );
    Ok(())
}
