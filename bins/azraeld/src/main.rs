// SPDX-License-Identifier: Apache-2.0
//! Azrael tick orchestrator daemon.
//!
//! Loads [`OrchestratorConfig`] from the platform config directory (writing
//! the documented defaults back out the first time none is found), restores
//! the body set from the last persisted snapshot if one exists, wires an
//! in-memory store, bounded command queue, and in-process worker pool
//! together, and runs the tick loop until asked to stop — snapshotting
//! periodically and once more on the way out.

use anyhow::{Context, Result};
use azrael_config::{ConfigService, FsConfigStore, OrchestratorConfig};
use azrael_orchestrator::Orchestrator;
use azrael_queue::bounded;
use azrael_store::{InMemoryStore, SnapshotPersistence, StateStore};
use azrael_worker::InProcessPool;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// The config key `azraeld` reads its [`OrchestratorConfig`] from.
const CONFIG_KEY: &str = "orchestrator";
/// Flush the body-set snapshot every this many ticks.
const SNAPSHOT_INTERVAL_TICKS: u64 = 100;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Override the configured tick period, in seconds.
    #[clap(long)]
    tick_period_secs: Option<f64>,

    /// Override the configured worker pool size.
    #[clap(long)]
    pool_size: Option<usize>,
}

fn load_config() -> Result<OrchestratorConfig> {
    let store = FsConfigStore::new().context("resolving platform config directory")?;
    let service = ConfigService::new(store);
    match service.load::<OrchestratorConfig>(CONFIG_KEY)? {
        Some(config) => Ok(config),
        None => {
            let config = OrchestratorConfig::default();
            service.save(CONFIG_KEY, &config)?;
            Ok(config)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = load_config()?;
    if let Some(tick_period_secs) = args.tick_period_secs {
        config.tick_period_secs = tick_period_secs;
    }
    if let Some(pool_size) = args.pool_size {
        config.pool_size = pool_size;
    }

    info!(
        tick_period_secs = config.tick_period_secs,
        pool_size = config.pool_size,
        "starting azraeld"
    );

    let persistence = SnapshotPersistence::new(
        FsConfigStore::new().context("resolving platform config directory")?,
    );
    let bodies = persistence.load().context("loading prior state-store snapshot")?;
    let store = Arc::new(InMemoryStore::from_bodies(bodies));

    let (_producer, consumer) = bounded(config.command_queue_capacity);
    let workers = Arc::new(InProcessPool::new(config.pool_size));
    let tick_period = Duration::from_secs_f64(config.tick_period_secs);
    let mut orchestrator = Orchestrator::new(Arc::clone(&store), consumer, workers, config);

    let mut interval = tokio::time::interval(tick_period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = orchestrator.tick_once().await;
                if report.overran {
                    warn!(nonce = report.nonce, "tick overran its period");
                }
                if report.nonce % SNAPSHOT_INTERVAL_TICKS == 0 {
                    if let Err(err) = persistence.save(&store.get_all()) {
                        warn!(%err, "periodic snapshot failed");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("shutdown signal received, saving final snapshot");
                orchestrator.drain_pending_as_shutdown();
                persistence.save(&store.get_all()).context("saving final state-store snapshot")?;
                break;
            }
        }
    }

    Ok(())
}
