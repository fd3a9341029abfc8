//! World State and Simulation Step
//!
//! One [`World`] holds every zone, the player and the global counters.
//! [`World::step`] is the only mutation entry point during play; it is
//! driven once per fixed-rate tick by the scheduler.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::SimConfig;
use crate::core::direction::Direction;
use crate::core::hash::{StateHash, StateHasher};
use crate::core::rng::DeterministicRng;
use crate::game::assets::{AssetError, AssetSource};
use crate::game::decode::ZoneDecoder;
use crate::game::dialogue::{Dialogue, NO_WEAPON_NOTICE};
use crate::game::events::GameEvent;
use crate::game::input::{InputRecording, IntentFrame};
use crate::game::player::{Player, PlayerContext, SwingOutcome};
use crate::game::zone::{Zone, ZoneError};

/// World construction errors.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The asset source had no zone 1
    #[error("no zones found")]
    NoZones,

    /// A zone failed validation
    #[error(transparent)]
    Zone(#[from] ZoneError),

    /// An asset failed to load
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Game phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    /// Title screen
    #[default]
    MainMenu = 0,
    /// Simulation running
    Playing = 1,
    /// Inventory open, simulation held
    Paused = 2,
    /// Dialogue shown, simulation held
    Scene = 3,
    /// Last zone cleared
    Win = 4,
    /// Out of lives
    Lose = 5,
}

/// Result of one step.
#[derive(Debug, Default)]
pub struct StepResult {
    /// Events raised this step, ordered
    pub events: Vec<GameEvent>,
    /// Whether a restart was requested
    pub reset_requested: bool,
}

/// The whole simulation state.
#[derive(Clone, Debug)]
pub struct World {
    /// Current phase
    pub phase: Phase,
    /// Advances once per step while playing
    pub update_tick: u64,
    /// Advances once per animation period while playing
    pub animation_tick: u64,
    /// Steps taken since construction, in any phase
    pub steps: u64,
    /// Index of the zone the player is in
    pub active_zone: usize,
    /// Interaction requested for this step
    pub interact_requested: bool,
    /// All zones, in order
    pub zones: Vec<Zone>,
    /// The player
    pub player: Player,
    /// Dialogue being shown
    pub scene: Option<Dialogue>,
    animation_sub: u64,
    rng: DeterministicRng,
    reset_requested: bool,
    config: SimConfig,
}

impl World {
    /// Decode zones 1, 2, … until the asset source runs out.
    pub fn load(assets: &dyn AssetSource, config: &SimConfig) -> Result<Self, WorldError> {
        let decoder = ZoneDecoder::new(config.tile_size);
        let mut zones = Vec::new();
        let mut number = 1;
        while let Some(images) = assets.zone_layout(number)? {
            zones.push(decoder.decode(number - 1, &images, assets)?);
            number += 1;
        }
        debug!(next = number, "end of zones");
        Self::new(zones, config.clone())
    }

    /// World over already-built zones. The player starts at zone 0's
    /// default entry.
    pub fn new(zones: Vec<Zone>, config: SimConfig) -> Result<Self, WorldError> {
        let first = zones.first().ok_or(WorldError::NoZones)?;
        let player = Player::new(first.default_spawn(), config.player_lives, config.respawn_delay);
        info!(zones = zones.len(), seed = config.rng_seed, "world created");
        Ok(Self {
            phase: Phase::MainMenu,
            update_tick: 1,
            animation_tick: 1,
            steps: 0,
            active_zone: 0,
            interact_requested: false,
            zones,
            player,
            scene: None,
            animation_sub: 1,
            rng: DeterministicRng::for_stream(config.rng_seed, b"drops"),
            reset_requested: false,
            config,
        })
    }

    /// Rebuild from the assets with the same config.
    pub fn reset(&mut self, assets: &dyn AssetSource) -> Result<(), WorldError> {
        info!("resetting world");
        *self = Self::load(assets, &self.config)?;
        Ok(())
    }

    /// Configuration in use.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Whether a restart is pending.
    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    /// Zone the player is in.
    pub fn current_zone(&self) -> Option<&Zone> {
        self.zones.get(self.active_zone)
    }

    // =========================================================================
    // STEP
    // =========================================================================

    /// Run one simulation step.
    pub fn step(&mut self, frame: IntentFrame) -> StepResult {
        let mut events = Vec::new();

        #[cfg(feature = "debug-tracing")]
        trace!(step = self.steps, tick = self.update_tick, phase = ?self.phase, ?frame, "step");

        // 1. Intents
        self.apply_intents(&frame, &mut events);

        // 2. Win check
        if self.phase == Phase::Playing && self.last_zone_cleared() {
            self.set_phase(Phase::Win, &mut events);
        }

        // 3. Simulation
        if self.phase == Phase::Playing {
            self.simulate(&mut events);
        }

        // 4. Counters
        self.advance_counters();
        self.steps += 1;

        events.sort();
        StepResult {
            events,
            reset_requested: self.reset_requested,
        }
    }

    fn apply_intents(&mut self, frame: &IntentFrame, events: &mut Vec<GameEvent>) {
        let tick = self.update_tick;

        for dir in Direction::ALL {
            self.player.set_motion(dir, frame.is_held(dir));
        }

        match self.phase {
            Phase::MainMenu => {
                if frame.confirm_pressed() {
                    self.set_phase(Phase::Playing, events);
                }
            }
            Phase::Win | Phase::Lose => {
                if frame.confirm_pressed() {
                    self.reset_requested = true;
                }
            }
            Phase::Paused => {
                if let Some(dir) = frame.selector {
                    self.player.inventory.move_selector(dir);
                }
                if frame.pause_pressed() {
                    self.set_phase(Phase::Playing, events);
                }
            }
            Phase::Scene => {
                if frame.interact_pressed() || frame.confirm_pressed() {
                    let more = self.scene.as_mut().is_some_and(Dialogue::advance);
                    if !more {
                        self.scene = None;
                        self.set_phase(Phase::Playing, events);
                    }
                }
            }
            Phase::Playing => {
                if frame.pause_pressed() {
                    self.set_phase(Phase::Paused, events);
                    return;
                }
                if frame.jump_pressed() {
                    self.player.try_jump(tick);
                }
                if let Some(dir) = frame.attack {
                    if self.player.try_attack(dir, tick) == SwingOutcome::NoWeapon {
                        self.scene = Some(Dialogue::new([NO_WEAPON_NOTICE]));
                        self.set_phase(Phase::Scene, events);
                        return;
                    }
                }
                if frame.interact_pressed() {
                    self.interact_requested = true;
                }
            }
        }
    }

    fn simulate(&mut self, events: &mut Vec<GameEvent>) {
        let tick = self.update_tick;
        let zone_count = self.zones.len();

        // Player against the active zone
        let Some(zone) = self.zones.get_mut(self.active_zone) else {
            return;
        };
        let respawn_at = zone.resolve_spawn(self.player.previous_zone);
        let outcome = self.player.update(&mut PlayerContext {
            tick,
            grid: &mut zone.grid,
            entities: &zone.entities,
            respawn_at,
            zone_count,
            events: &mut *events,
        });

        if outcome.out_of_lives {
            info!(tick, "out of lives");
            self.set_phase(Phase::Lose, events);
            return;
        }
        if let Some(dest) = outcome.teleport {
            self.transfer(dest, events);
        }

        // Entities of the (possibly new) active zone
        if let Some(zone) = self.zones.get_mut(self.active_zone) {
            zone.update_entities(
                tick,
                &mut self.player,
                &mut self.rng,
                self.interact_requested,
                events,
                &mut self.scene,
            );
        }
        self.interact_requested = false;

        if self.scene.is_some() {
            self.set_phase(Phase::Scene, events);
        }
    }

    /// Move the player into zone `dest`.
    fn transfer(&mut self, dest: usize, events: &mut Vec<GameEvent>) {
        let Some(zone) = self.zones.get(dest) else {
            return;
        };
        let from = self.active_zone;
        let arrival = zone.resolve_spawn(from);

        self.player.previous_zone = from;
        self.player.actor.position = arrival;
        self.player.last_hit_by = None;
        self.active_zone = dest;

        info!(from, to = dest, at = %arrival, "zone transfer");
        events.push(GameEvent::zone_entered(self.update_tick, from, dest, arrival));
    }

    fn last_zone_cleared(&self) -> bool {
        self.active_zone + 1 == self.zones.len()
            && self.current_zone().is_some_and(|zone| !zone.contains_live_bosses())
    }

    fn set_phase(&mut self, phase: Phase, events: &mut Vec<GameEvent>) {
        if self.phase == phase {
            return;
        }
        info!(from = ?self.phase, to = ?phase, tick = self.update_tick, "phase change");
        events.push(GameEvent::phase_changed(self.update_tick, self.phase, phase));
        self.phase = phase;
    }

    /// Tick counters only move while playing. Both wrap to a restart
    /// value instead of overflowing.
    fn advance_counters(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.update_tick = self.update_tick.checked_add(1).unwrap_or(0);

        if self.animation_sub < self.config.animation_period() {
            self.animation_sub += 1;
        } else {
            self.animation_tick = self.animation_tick.checked_add(1).unwrap_or(1);
            self.animation_sub = 1;
        }
    }

    // =========================================================================
    // VERIFICATION
    // =========================================================================

    /// Digest of everything that evolves during play.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_world_state();
        hasher.update_u8(self.phase as u8);
        hasher.update_u64(self.update_tick);
        hasher.update_u64(self.animation_tick);
        hasher.update_u64(self.active_zone as u64);
        let [s0, s1] = self.rng.state();
        hasher.update_u64(s0);
        hasher.update_u64(s1);
        self.player.hash_into(&mut hasher);
        for zone in &self.zones {
            zone.hash_into(&mut hasher);
        }
        hasher.update_u64(self.scene.as_ref().map_or(u64::MAX, |s| s.page_index() as u64));
        hasher.finalize()
    }

    /// Rebuild a world and feed it a recording. Returns the final hash.
    pub fn replay(
        assets: &dyn AssetSource,
        config: &SimConfig,
        recording: &InputRecording,
    ) -> Result<StateHash, WorldError> {
        let mut config = config.clone();
        config.rng_seed = recording.rng_seed;
        let mut world = Self::load(assets, &config)?;
        for (_, frame) in recording.replay_iter() {
            world.step(frame);
        }
        Ok(world.compute_hash())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::assets::MemoryAssets;
    use crate::game::combat::Attack;
    use crate::game::entity::{EntityKind, EntityTemplate};
    use crate::game::environment::Pickup;
    use crate::game::events::GameEventData;
    use crate::game::hostile::{HostileTier, SPLIT_OFFSETS};
    use crate::game::input::Intent;
    use crate::game::inventory::{ItemKind, SwordTier};
    use image::{Rgb, RgbImage};
    use proptest::prelude::*;

    /// Build a layout from characters:
    /// `#` wall, `.` open, `S` default entry, `1` entry from zone 0,
    /// `P` pit, `T` teleport to the next zone, `E` basic hostile,
    /// `B` end boss, `$` sword III costing 5, `F` friendly 9 facing south.
    fn layout(rows: &[&str]) -> RgbImage {
        let width = rows[0].len() as u32;
        let mut img = RgbImage::new(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let rgb = match c {
                    '#' => [0, 0, 0],
                    'S' => [0, 0, 255],
                    '1' => [0, 1, 255],
                    'P' => [255, 0, 255],
                    'T' => [255, 255, 0],
                    'E' => [255, 0, 0],
                    'B' => [1, 255, 255],
                    '$' => [101, 150, 9],
                    'F' => [9, 255, 2],
                    _ => [200, 200, 200],
                };
                img.put_pixel(x as u32, y as u32, Rgb(rgb));
            }
        }
        img
    }

    /// Spare last zone so the first one never counts as won.
    fn spare_zone() -> RgbImage {
        layout(&["###", "#S#", "###"])
    }

    fn start(assets: &MemoryAssets) -> World {
        let mut world = World::load(assets, &SimConfig::default()).unwrap();
        world.step(confirm());
        assert_eq!(world.phase, Phase::Playing);
        world
    }

    fn confirm() -> IntentFrame {
        let mut f = IntentFrame::new();
        f.apply(Intent::Confirm);
        f
    }

    fn frame(intent: Intent) -> IntentFrame {
        let mut f = IntentFrame::new();
        f.apply(intent);
        f
    }

    #[test]
    fn test_load_requires_zones() {
        let err = World::load(&MemoryAssets::new(), &SimConfig::default()).unwrap_err();
        assert!(matches!(err, WorldError::NoZones));
    }

    #[test]
    fn test_load_reports_bad_zone() {
        let assets = MemoryAssets::new().with_zone(layout(&["#.#"]));
        let err = World::load(&assets, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, WorldError::Zone(ZoneError::MissingDefaultSpawn { zone: 0 })));
    }

    #[test]
    fn test_scenario_south_strike() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#.S.#", "#.E.#", "#...#", "#####"]))
            .with_zone(spare_zone());
        let mut world = World::load(&assets, &SimConfig::default()).unwrap();
        world.phase = Phase::Playing;

        let foe = &world.zones[0].entities[0];
        assert_eq!((foe.actor.hp, foe.actor.damage), (100, 10));
        assert!(foe.actor.position.y > world.player.actor.position.y);

        world.player.attack = Some(Attack { dir: Direction::South, started: world.update_tick });
        let result = world.step(IntentFrame::new());

        assert_eq!(world.player.actor.damage, 20);
        assert_eq!(world.zones[0].entities[0].actor.hp, 80);
        assert!(result
            .events
            .iter()
            .any(|e| e.data == GameEventData::EntityDamaged { amount: 20, hp: 80 }));
    }

    #[test]
    fn test_scenario_unaffordable_item() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#S$.#", "#####"]))
            .with_zone(spare_zone());
        let mut world = start(&assets);
        let item_at = world.zones[0].entities[0].actor.position;
        world.player.actor.position = item_at;

        world.step(IntentFrame::new());
        let item = &world.zones[0].entities[0];
        assert!(item.actor.alive);
        assert_eq!(world.player.money, 0);
        assert!(world.player.inventory.slots().all(|slot| slot.is_none()));

        world.player.money = 7;
        world.step(IntentFrame::new());
        assert!(world.zones[0].entities.is_empty());
        assert_eq!(world.player.money, 2);
        assert!(world.player.inventory.slots().any(|slot| slot == Some(ItemKind::Sword(SwordTier::III))));
    }

    #[test]
    fn test_scenario_boss_split_once() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&[
                "#############",
                "#S.........B#",
                "#...........#",
                "#############",
            ]))
            .with_zone(spare_zone());
        let mut world = start(&assets);
        let boss_at = world.zones[0].entities[0].actor.position;
        assert!(boss_at.distance(world.player.actor.position) > 250.0);

        world.zones[0].entities[0].actor.hp = 0;
        let result = world.step(IntentFrame::new());

        let fragments: Vec<Vec2> = world.zones[0]
            .entities
            .iter()
            .filter(|e| matches!(&e.kind, EntityKind::Hostile(p) if p.tier == HostileTier::Fragment))
            .map(|e| e.actor.position)
            .collect();
        let expected: Vec<Vec2> = SPLIT_OFFSETS.iter().map(|o| boss_at + *o).collect();
        assert_eq!(fragments, expected);
        assert!(world.zones[0].entities[0].actor.dropped);
        assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::BossSplit { .. })));

        world.step(IntentFrame::new());
        world.step(IntentFrame::new());
        assert_eq!(world.zones[0].entities.len(), 4);
        assert!(world.zones[0].contains_live_bosses());
    }

    #[test]
    fn test_scenario_pit_same_step() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#SP.#", "#####"]))
            .with_zone(spare_zone());
        let mut world = start(&assets);
        world.player.actor.position = Vec2::new(62.0, 48.0);

        let tick = world.update_tick;
        let result = world.step(IntentFrame::holding(&[Direction::East]));

        assert!(!world.player.actor.alive);
        assert_eq!(world.player.lives, 3);
        assert!(result
            .events
            .iter()
            .any(|e| e.tick == tick && matches!(e.data, GameEventData::PlayerDied { .. })));
    }

    #[test]
    fn test_teleport_uses_custom_entry() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#ST.#", "#####"]))
            .with_zone(layout(&["#####", "#S.1#", "#####"]));
        let mut world = start(&assets);
        world.player.actor.position = Vec2::new(80.0, 48.0);

        let result = world.step(IntentFrame::new());
        assert_eq!(world.active_zone, 1);
        assert_eq!(world.player.previous_zone, 0);
        assert_eq!(world.player.actor.position, Vec2::new(112.0, 48.0));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::ZoneEntered { from: 0, to: 1, .. })));
    }

    #[test]
    fn test_teleport_falls_back_to_default_entry() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#ST.#", "#####"]))
            .with_zone(layout(&["#####", "#..S#", "#####"]));
        let mut world = start(&assets);
        world.player.actor.position = Vec2::new(80.0, 48.0);

        world.step(IntentFrame::new());
        assert_eq!(world.active_zone, 1);
        assert_eq!(world.player.actor.position, world.zones[1].default_spawn());
    }

    #[test]
    fn test_win_after_last_boss() {
        let assets = MemoryAssets::new().with_zone(layout(&[
            "#############",
            "#S.........B#",
            "#############",
        ]));
        let mut world = start(&assets);
        assert_eq!(world.phase, Phase::Playing);

        world.zones[0].entities[0].actor.hp = 0;
        world.step(IntentFrame::new());
        // Fragments keep the zone contested.
        assert_eq!(world.phase, Phase::Playing);

        for e in world.zones[0].entities.iter_mut() {
            e.actor.hp = 0;
        }
        world.step(IntentFrame::new());
        world.step(IntentFrame::new());
        assert_eq!(world.phase, Phase::Win);

        let result = world.step(confirm());
        assert!(result.reset_requested);
        world.reset(&assets).unwrap();
        assert_eq!(world.phase, Phase::MainMenu);
        assert!(world.zones[0].contains_live_bosses());
    }

    #[test]
    fn test_lose_when_lives_run_out() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#S..#", "#####"]))
            .with_zone(spare_zone());
        let config = SimConfig {
            player_lives: 0,
            respawn_delay: 5,
            ..SimConfig::default()
        };
        let mut world = World::load(&assets, &config).unwrap();
        world.step(confirm());
        world.player.actor.hp = 0;

        for _ in 0..10 {
            world.step(IntentFrame::new());
        }
        assert_eq!(world.phase, Phase::Lose);
    }

    #[test]
    fn test_attack_without_sword_opens_notice() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#S..#", "#####"]))
            .with_zone(spare_zone());
        let mut world = start(&assets);

        world.step(frame(Intent::Attack(Direction::East)));
        assert_eq!(world.phase, Phase::Scene);
        assert_eq!(world.scene.as_ref().and_then(|s| s.current()), Some(NO_WEAPON_NOTICE));

        let held = world.update_tick;
        world.step(IntentFrame::new());
        assert_eq!(world.update_tick, held);

        world.step(confirm());
        assert_eq!(world.phase, Phase::Playing);
        assert!(world.scene.is_none());
    }

    #[test]
    fn test_friendly_dialogue_pages() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#SF.#", "#####"]))
            .with_zone(spare_zone())
            .with_friendly(9, Some("One\n\nTwo"));
        let mut world = start(&assets);

        // Out of range: nothing.
        world.player.actor.position = Vec2::new(40.0, 48.0);
        world.step(frame(Intent::Interact));
        assert_eq!(world.phase, Phase::Playing);

        world.player.actor.position = Vec2::new(60.0, 48.0);
        world.step(frame(Intent::Interact));
        assert_eq!(world.phase, Phase::Scene);
        assert_eq!(world.zones[0].entities[0].actor.facing, Direction::West);

        world.step(frame(Intent::Interact));
        assert_eq!(world.scene.as_ref().and_then(|s| s.current()), Some("Two"));
        world.step(frame(Intent::Interact));
        assert_eq!(world.phase, Phase::Playing);
    }

    #[test]
    fn test_blank_speech_opens_no_scene() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#SF.#", "#####"]))
            .with_zone(spare_zone())
            .with_friendly(9, Some("\n  \n\n"));
        let mut world = start(&assets);

        world.player.actor.position = Vec2::new(60.0, 48.0);
        let result = world.step(frame(Intent::Interact));
        assert_eq!(world.phase, Phase::Playing);
        assert!(world.scene.is_none());
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::DialogueStarted)));
    }

    #[test]
    fn test_pause_gates_selector_and_ticks() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#####", "#S..#", "#####"]))
            .with_zone(spare_zone());
        let mut world = start(&assets);

        world.step(frame(Intent::Selector(Direction::East)));
        assert_eq!(world.player.inventory.selector().col, 0);

        world.step(frame(Intent::PauseToggle));
        assert_eq!(world.phase, Phase::Paused);
        let held = (world.update_tick, world.animation_tick);
        world.step(frame(Intent::Selector(Direction::East)));
        assert_eq!(world.player.inventory.selector().col, 1);
        assert_eq!((world.update_tick, world.animation_tick), held);

        world.step(frame(Intent::PauseToggle));
        assert_eq!(world.phase, Phase::Playing);
    }

    #[test]
    fn test_drops_are_reproducible() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#######", "#S.EEE#", "#######"]))
            .with_zone(spare_zone());

        let run = || {
            let mut world = start(&assets);
            for e in world.zones[0].entities.iter_mut() {
                e.actor.hp = 0;
            }
            world.step(IntentFrame::new());
            let drops: Vec<EntityTemplate> = world.zones[0]
                .entities
                .iter()
                .filter_map(|e| match &e.kind {
                    EntityKind::Pickup(Pickup::Money { amount }) => Some(EntityTemplate::Money(*amount)),
                    _ => None,
                })
                .collect();
            (drops, world.compute_hash())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_replay_matches_live_run() {
        let assets = MemoryAssets::new()
            .with_zone(layout(&["#######", "#S...E#", "#.....#", "#######"]))
            .with_zone(spare_zone());
        let config = SimConfig { rng_seed: 42, ..SimConfig::default() };

        let mut world = World::load(&assets, &config).unwrap();
        let mut recording = InputRecording::new(config.rng_seed);
        let script = [
            confirm(),
            IntentFrame::holding(&[Direction::East]),
            IntentFrame::holding(&[Direction::East]),
            IntentFrame::holding(&[Direction::South, Direction::East]),
            frame(Intent::Jump),
            IntentFrame::new(),
        ];
        for step in 0..60u64 {
            let f = script[(step as usize / 10).min(script.len() - 1)];
            recording.record(step, f);
            world.step(f);
        }

        let replayed = World::replay(&assets, &config, &recording).unwrap();
        assert_eq!(replayed, world.compute_hash());
    }

    proptest! {
        #[test]
        fn test_tick_cadence(n in 0u64..200) {
            let assets = MemoryAssets::new()
                .with_zone(layout(&["#####", "#S..#", "#####"]))
                .with_zone(spare_zone());
            let mut world = World::load(&assets, &SimConfig::default()).unwrap();
            world.phase = Phase::Playing;
            let (u0, a0) = (world.update_tick, world.animation_tick);

            for _ in 0..n {
                world.step(IntentFrame::new());
            }
            prop_assert_eq!(world.phase, Phase::Playing);
            prop_assert_eq!(world.update_tick - u0, n);
            prop_assert_eq!(world.animation_tick - a0, n / 3);
        }
    }
}
