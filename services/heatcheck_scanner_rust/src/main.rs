mod slate;

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use prop_convergence_core::cache::CachedGameLogProvider;
use prop_convergence_core::config::EngineConfig;
use prop_convergence_core::providers::{gather_slate, InputSources};
use prop_convergence_core::{scan_slate, ConvergenceEngine};

use crate::slate::Slate;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .context("Usage: heatcheck_scanner <slate.json>")?;

    let config = EngineConfig::from_env().context("Invalid engine configuration")?;
    info!(
        "Starting HeatCheck scan (min confidence {}, max picks {}, concurrency {})",
        config.heatcheck.min_confidence, config.heatcheck.max_picks, config.fetch.max_concurrency
    );

    let slate = Slate::load(&path)?;
    info!(
        "Loaded slate {} with {} candidates",
        slate.date.map(|d| d.to_string()).unwrap_or_else(|| "(undated)".to_string()),
        slate.candidate_count()
    );

    let (provider, requests) = slate.into_inputs();
    let provider = Arc::new(provider);
    let cached_logs = CachedGameLogProvider::new(provider.clone(), config.fetch.cache_ttl);
    let sources = InputSources {
        game_logs: &cached_logs,
        ..InputSources::single(provider.as_ref())
    };

    let candidates = gather_slate(sources, requests, config.fetch.max_concurrency).await;
    info!(
        "Resolved {} candidates ({} cached game logs)",
        candidates.len(),
        cached_logs.cache().len()
    );

    let heatcheck = config.heatcheck.clone();
    let picks = tokio::task::spawn_blocking(move || {
        let engine = ConvergenceEngine::with_defaults();
        scan_slate(&engine, &candidates, &heatcheck)
    })
    .await
    .context("HeatCheck scan task failed")?;

    info!("HeatCheck produced {} picks", picks.len());
    println!("{}", serde_json::to_string_pretty(&picks)?);

    Ok(())
}
