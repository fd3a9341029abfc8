//! Elemental Simulation
//!
//! Headless driver. Loads zones from the asset root (or a built-in demo
//! layout when there is none), runs the real-time loop with a scripted
//! player for a few seconds, then checks the run replays to the same hash.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use elemental::{
    core::direction::Direction,
    game::{
        assets::{AssetSource, FsAssets, MemoryAssets},
        events::GameEventData,
    },
    runtime::{run, RenderFrame, SimControl},
    InputRecording, Intent, IntentFrame, SimConfig, World, VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    let config = SimConfig::from_env().context("invalid configuration")?;
    info!("Elemental Sim v{}", VERSION);
    info!("Update rate: {} Hz, animation every {} steps", config.updates_per_second, config.animation_period());

    let assets = pick_assets(&config)?;
    let world = World::load(assets.as_ref(), &config).context("failed to load zones")?;
    info!("Loaded {} zone(s)", world.zones.len());

    live_demo(world, assets.clone(), config.clone()).await?;
    replay_demo(assets.as_ref(), &config)?;
    Ok(())
}

/// Assets from disk, or the built-in demo when the root has no zones.
fn pick_assets(config: &SimConfig) -> Result<Arc<dyn AssetSource + Send + Sync>> {
    let fs = FsAssets::new(&config.asset_root);
    if fs.zone_layout(1)?.is_some() {
        info!("Using assets under {}", fs.root().display());
        return Ok(Arc::new(fs));
    }
    warn!("No zones under {}, using the demo layout", config.asset_root.display());
    Ok(Arc::new(demo_assets()))
}

/// Two small zones: a corridor with a hostile, coins and a teleport, then
/// the end-boss room.
fn demo_assets() -> MemoryAssets {
    let paint = |rows: &[&str]| {
        let mut img = RgbImage::new(rows[0].len() as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let rgb = match c {
                    '#' => [0, 0, 0],
                    'S' => [0, 0, 255],
                    '1' => [0, 1, 255],
                    'E' => [255, 0, 0],
                    'B' => [1, 255, 255],
                    '$' => [100, 150, 2],
                    'T' => [255, 255, 0],
                    'P' => [255, 0, 255],
                    _ => [128, 128, 128],
                };
                img.put_pixel(x as u32, y as u32, Rgb(rgb));
            }
        }
        img
    };
    MemoryAssets::new()
        .with_zone(paint(&[
            "############",
            "#S...$$...T#",
            "#....PP....#",
            "#.....E....#",
            "############",
        ]))
        .with_zone(paint(&[
            "##########",
            "#1.......#",
            "#........#",
            "#.......B#",
            "#S.......#",
            "##########",
        ]))
}

/// Scripted intents for the demo: start, walk east, swing, walk on.
fn script(step: u64) -> Vec<Intent> {
    match step {
        0 => vec![Intent::Confirm],
        5 => vec![Intent::Hold { dir: Direction::East, held: true }],
        40 => vec![Intent::Attack(Direction::East)],
        41 => vec![Intent::Confirm],
        60 => vec![Intent::Jump],
        90 => vec![Intent::Hold { dir: Direction::East, held: false }],
        _ => Vec::new(),
    }
}

/// Run the real-time loop for a few seconds and log what happened.
async fn live_demo(world: World, assets: Arc<dyn AssetSource + Send + Sync>, config: SimConfig) -> Result<()> {
    info!("=== Live run ===");
    let control = Arc::new(SimControl::new());
    let (intent_tx, intent_rx) = mpsc::channel(64);
    let (frame_tx, mut frame_rx) = watch::channel(Arc::new(RenderFrame::capture(&world, config.viewport_px())));

    let step_period = Duration::from_secs_f64(1.0 / config.updates_per_second as f64);
    let loop_handle = tokio::spawn(run(world, assets, config, control.clone(), intent_rx, frame_tx));

    for step in 0..120 {
        for intent in script(step) {
            intent_tx.send(intent).await.context("simulation loop is gone")?;
        }
        tokio::time::sleep(step_period).await;
    }

    if frame_rx.changed().await.is_ok() {
        let frame = frame_rx.borrow_and_update().clone();
        info!(
            "Frame: {:?} tick {} zone {} player at {} hp {} money {} camera ({:.0}, {:.0})",
            frame.phase,
            frame.update_tick,
            frame.zone,
            frame.player.position,
            frame.player.hp,
            frame.player.money,
            frame.camera.x,
            frame.camera.y,
        );
    }

    control.stop();
    let world = loop_handle.await.context("simulation task panicked")??;
    info!("Live run stopped after {} steps", world.steps);
    Ok(())
}

/// Feed the same script twice through a fresh world and compare hashes.
fn replay_demo(assets: &dyn AssetSource, config: &SimConfig) -> Result<()> {
    info!("=== Verifying determinism ===");
    let mut world = World::load(assets, config)?;
    let mut recording = InputRecording::new(config.rng_seed);
    let mut held = IntentFrame::new();

    for step in 0..300 {
        let mut frame = held;
        for intent in script(step) {
            frame.apply(intent);
        }
        held = frame.held_only();
        recording.record(step, frame);

        for event in world.step(frame).events {
            match event.data {
                GameEventData::ZoneEntered { from, to, .. } => info!("Step {}: zone {} -> {}", step, from, to),
                GameEventData::PickedUp { money, .. } => info!("Step {}: picked up, money {}", step, money),
                GameEventData::PlayerDied { lives, .. } => info!("Step {}: player died, {} lives left", step, lives),
                GameEventData::PhaseChanged { new_phase, .. } => info!("Step {}: phase {:?}", step, new_phase),
                _ => {}
            }
        }
    }

    let hash = world.compute_hash();
    info!("Final state hash: {}", hex::encode(hash));
    info!("Recording holds {} frame changes over {} steps", recording.delta_count(), recording.end_step + 1);

    let replay_hash = World::replay(assets, config, &recording)?;
    info!("Replay state hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }
    Ok(())
}
