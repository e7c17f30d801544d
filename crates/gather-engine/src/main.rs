//! Harness binary for the auto-gather module.
//!
//! There is no host server here: the binary stands one in with an
//! in-memory [`gather_core::Region`] built from a scripted scenario, then drives the
//! engine the way a server would, one `on_tick` per logged-in player per
//! step.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `autogather-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load static data from `autogather-data.yaml`, or the bundled demo data
//! 4. Create the engine and resolve tracking bits
//! 5. Build the scenario region and log players in
//! 6. Run the tick loop until `max_ticks` or Ctrl-C
//! 7. Log players out and log the run summary

mod error;
mod scenario;
mod summary;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use gather_core::{AutoGather, GatherSettings, SessionHooks, SimulationConfig, World};
use gather_data::StaticDataStore;
use gather_types::{AvatarId, ResourceCategory};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::scenario::Scenario;
use crate::summary::RunSummary;

/// Config file looked up in the working directory.
const CONFIG_FILE: &str = "autogather-config.yaml";

/// Static data file looked up in the working directory.
const DATA_FILE: &str = "autogather-data.yaml";

/// Demo data compiled into the binary.
const BUNDLED_DATA: &str = include_str!("../../../autogather-data.yaml");

/// Simulated milliseconds per step when pacing is off.
const UNPACED_STEP_MS: u32 = 100;

/// Application entry point for the harness.
///
/// # Errors
///
/// Returns an error if configuration, data, or the scenario fail to load,
/// or a scan pass hits a broken invariant.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = path_from_env("AUTOGATHER_CONFIG", CONFIG_FILE);
    let settings = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with_target(true)
        .init();

    info!("gather-engine starting");
    info!(
        config = %config_path.display(),
        enabled = settings.auto_gather.enable,
        scan_interval_ms = settings.auto_gather.scan_interval_ms,
        loot_range = settings.auto_gather.loot_range,
        max_ticks = settings.simulation.max_ticks,
        seed = settings.simulation.seed,
        "Configuration loaded"
    );

    // 3. Load static data.
    let data = load_data(&path_from_env("AUTOGATHER_DATA", DATA_FILE))?;
    let [items, locks, spells, creatures, loot] = data.counts();
    info!(items, locks, spells, creatures, loot, "Static data loaded");

    // 4. Create the engine.
    let sim = settings.simulation;
    let mut engine = AutoGather::new(Arc::new(settings), Arc::new(data), sim.seed);
    engine.on_startup();
    info!(
        herb_bit = engine.tracking_bits().bit(ResourceCategory::Herb),
        mineral_bit = engine.tracking_bits().bit(ResourceCategory::Mineral),
        "Tracking bits resolved"
    );

    // 5. Build the scenario region.
    let scenario_config = scenario::load_scenario(&config_path)?;
    let mut scenario_rng = SmallRng::seed_from_u64(sim.seed);
    let mut scenario = scenario::build(&scenario_config, engine.data().as_ref(), &mut scenario_rng)?;
    for &id in &scenario.avatars {
        if let Some(avatar) = scenario.region.avatar_mut(id) {
            engine.on_login(avatar);
        }
    }

    // 6. Run.
    let mut summary = run(&mut engine, &mut scenario, sim).await?;

    // 7. Log out and report.
    summary.record_region(&scenario.region);
    for &id in &scenario.avatars {
        if let Some(mut avatar) = scenario.region.remove_avatar(id) {
            engine.on_logout(&mut avatar);
            info!(avatar = %avatar.name, money = avatar.money, "logged out");
        }
    }
    log_summary(&summary);
    info!(total_ticks = summary.ticks, "gather-engine shutdown complete");

    Ok(())
}

/// Drive every logged-in player until `max_ticks` or Ctrl-C.
async fn run(
    engine: &mut AutoGather<StaticDataStore>,
    scenario: &mut Scenario,
    sim: SimulationConfig,
) -> Result<RunSummary, EngineError> {
    let step_ms = if sim.tick_interval_ms == 0 {
        UNPACED_STEP_MS
    } else {
        sim.tick_interval_ms
    };
    let mut pacer = (sim.tick_interval_ms > 0)
        .then(|| tokio::time::interval(Duration::from_millis(u64::from(sim.tick_interval_ms))));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(max_ticks = sim.max_ticks, step_ms, paced = pacer.is_some(), "Entering tick loop");

    let mut summary = RunSummary::default();
    let mut tick: u64 = 0;
    while tick < sim.max_ticks {
        if let Some(interval) = pacer.as_mut() {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    info!(tick, "Interrupted, stopping tick loop");
                    break;
                }
            }
        }

        summary.record_manual_loots(scenario.apply_manual_loots(tick));
        let events = scenario.region.advance(step_ms);
        for node in &events.respawned {
            debug!(tick, node = %node, "node respawned");
        }
        for corpse in &events.decayed {
            debug!(tick, corpse = %corpse, "corpse decayed");
        }
        summary.record_events(&events);

        for &id in &scenario.avatars {
            let report = engine.on_tick(&mut scenario.region, id, step_ms)?;
            if report.node.is_some() || report.corpse.is_some() {
                info!(
                    tick,
                    avatar = %id,
                    node = ?report.node,
                    corpse = ?report.corpse,
                    "scan pass acted"
                );
            }
            summary.record(&report);
            log_notifications(&mut scenario.region, id, tick);
        }

        summary.record_tick();
        tick = tick.saturating_add(1);
    }

    Ok(summary)
}

/// Drain a player's outbox into the log as JSON lines.
fn log_notifications(world: &mut dyn World, id: AvatarId, tick: u64) {
    let Some(avatar) = world.avatar_mut(id) else {
        return;
    };
    let name = avatar.name.clone();
    for note in avatar.drain_notifications() {
        match serde_json::to_string(&note) {
            Ok(json) => info!(tick, avatar = %name, notification = %json, "notification"),
            Err(e) => warn!(error = %e, "failed to serialize notification"),
        }
    }
}

fn log_summary(summary: &RunSummary) {
    match serde_json::to_string(&summary.stopped) {
        Ok(stopped) => info!(
            ticks = summary.ticks,
            passes = summary.passes,
            nodes_harvested = summary.nodes_harvested,
            corpses_skinned = summary.corpses_skinned,
            bag_full = summary.bag_full,
            stale = summary.stale,
            tracking_changes = summary.tracking_changes,
            respawned = summary.respawned,
            decayed = summary.decayed,
            manual_loots = summary.manual_loots,
            ready_nodes = summary.ready_nodes,
            depleted_nodes = summary.depleted_nodes,
            corpses_remaining = summary.corpses_remaining,
            stopped = %stopped,
            "Run summary"
        ),
        Err(e) => warn!(error = %e, "failed to serialize run summary"),
    }
}

fn path_from_env(var: &str, fallback: &str) -> PathBuf {
    std::env::var_os(var).map_or_else(|| PathBuf::from(fallback), PathBuf::from)
}

/// Load the configuration snapshot, or defaults if the file is missing.
fn load_config(path: &Path) -> Result<GatherSettings, EngineError> {
    if path.exists() {
        Ok(GatherSettings::from_file(path)?)
    } else {
        Ok(GatherSettings::default())
    }
}

/// Load static data, or the bundled demo data if the file is missing.
fn load_data(path: &Path) -> Result<StaticDataStore, EngineError> {
    if path.exists() {
        info!(path = %path.display(), "Loading static data");
        Ok(StaticDataStore::from_file(path)?)
    } else {
        info!("Data file not found, using bundled demo data");
        Ok(StaticDataStore::parse(BUNDLED_DATA)?)
    }
}
