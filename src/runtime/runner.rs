//! Simulation Loop
//!
//! The async driver around [`Scheduler`]. One task owns the [`World`];
//! intents come in over an mpsc channel and finished frames go out over a
//! watch channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::game::assets::AssetSource;
use crate::game::input::{Intent, IntentBuffer};
use crate::game::world::{World, WorldError};
use crate::runtime::scheduler::Scheduler;
use crate::runtime::snapshot::RenderFrame;

/// Flags shared between the loop and whoever controls it.
#[derive(Debug)]
pub struct SimControl {
    running: AtomicBool,
    resetting: AtomicBool,
}

impl Default for SimControl {
    fn default() -> Self {
        Self::new()
    }
}

impl SimControl {
    /// Running, not resetting.
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            resetting: AtomicBool::new(false),
        }
    }

    /// Whether the loop should keep going.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the loop to exit after the current step.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Ask for a world rebuild before the next step.
    pub fn request_reset(&self) {
        self.resetting.store(true, Ordering::Release);
    }

    /// Whether a rebuild is pending.
    pub fn is_resetting(&self) -> bool {
        self.resetting.load(Ordering::Acquire)
    }

    fn finish_reset(&self) {
        self.resetting.store(false, Ordering::Release);
    }
}

/// Per-second rate counters for logs.
#[derive(Debug)]
struct RateMeter {
    window_start: Instant,
    updates: u32,
    frames: u32,
}

impl RateMeter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            updates: 0,
            frames: 0,
        }
    }

    fn record(&mut self, now: Instant, updates: usize) {
        self.updates += updates as u32;
        self.frames += 1;
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            debug!(ups = self.updates, fps = self.frames, "loop rate");
            *self = Self::new(now);
        }
    }
}

/// Drive `world` until `control` stops.
///
/// The loop wakes once per step period. Each wake drains pending intents,
/// runs however many steps the elapsed time covers and publishes one
/// [`RenderFrame`]. A reset, whether asked for through `control` or by the
/// world itself, rebuilds the world from `assets` between steps.
pub async fn run(
    mut world: World,
    assets: Arc<dyn AssetSource + Send + Sync>,
    config: SimConfig,
    control: Arc<SimControl>,
    mut intents: mpsc::Receiver<Intent>,
    frames: watch::Sender<Arc<RenderFrame>>,
) -> Result<World, WorldError> {
    let mut scheduler = Scheduler::new(config.updates_per_second);
    let mut input = IntentBuffer::new();
    let view = config.viewport_px();

    let mut ticker = interval(scheduler.step_duration());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(ups = config.updates_per_second, "simulation loop started");
    let mut last = Instant::now();
    let mut meter = RateMeter::new(last);

    while control.is_running() {
        ticker.tick().await;

        // Intents
        loop {
            match intents.try_recv() {
                Ok(intent) => input.push(intent),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    info!("intent channel closed, stopping");
                    control.stop();
                    break;
                }
            }
        }

        // Reset between steps
        if control.is_resetting() || world.reset_requested() {
            world.reset(assets.as_ref())?;
            scheduler.clear();
            input.clear();
            control.finish_reset();
            last = Instant::now();
            info!("world rebuilt");
        }

        // Steps
        let now = Instant::now();
        let advance = scheduler.advance(now.duration_since(last), &mut world, &mut input);
        last = now;
        for event in &advance.events {
            debug!(tick = event.tick, data = ?event.data, "event");
        }
        meter.record(now, advance.steps);

        // Frame
        if frames.send(Arc::new(RenderFrame::capture(&world, view))).is_err() {
            warn!("no frame receivers left");
        }
    }

    info!(steps = world.steps, "simulation loop stopped");
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::assets::MemoryAssets;
    use crate::game::world::Phase;
    use image::{Rgb, RgbImage};

    fn assets() -> Arc<MemoryAssets> {
        let mut layout = RgbImage::from_pixel(5, 3, Rgb([200, 200, 200]));
        layout.put_pixel(1, 1, Rgb([0, 0, 255]));
        let spare = RgbImage::from_pixel(1, 1, Rgb([0, 0, 255]));
        Arc::new(MemoryAssets::new().with_zone(layout).with_zone(spare))
    }

    #[test]
    fn test_control_flags() {
        let control = SimControl::new();
        assert!(control.is_running() && !control.is_resetting());
        control.request_reset();
        assert!(control.is_resetting());
        control.finish_reset();
        control.stop();
        assert!(!control.is_running() && !control.is_resetting());
    }

    #[tokio::test]
    async fn test_loop_steps_and_publishes() {
        let assets = assets();
        let config = SimConfig::default();
        let world = World::load(assets.as_ref(), &config).unwrap();
        let control = Arc::new(SimControl::new());
        let (intent_tx, intent_rx) = mpsc::channel(16);
        let (frame_tx, mut frame_rx) = watch::channel(Arc::new(RenderFrame::capture(&world, config.viewport_px())));

        let handle = tokio::spawn(run(world, assets, config, control.clone(), intent_rx, frame_tx));

        intent_tx.send(Intent::Confirm).await.unwrap();
        frame_rx.changed().await.unwrap();
        loop {
            if frame_rx.borrow_and_update().phase == Phase::Playing {
                break;
            }
            frame_rx.changed().await.unwrap();
        }

        control.request_reset();
        loop {
            frame_rx.changed().await.unwrap();
            if frame_rx.borrow_and_update().phase == Phase::MainMenu {
                break;
            }
        }

        drop(intent_tx);
        let world = handle.await.unwrap().unwrap();
        assert_eq!(world.phase, Phase::MainMenu);
        assert!(!control.is_running());
    }
}
