//! Game state and entity types
//!
//! Ships and debris share one representation: an [`Object`] plus a tagged
//! behavior. The tag decides which per-tick update runs.

use std::sync::Arc;

use glam::{DVec3, IVec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::ShipCatalog;
use super::demo::DemoReel;
use super::spawn;
use super::stars::Starfield;
use super::targeting::Target;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::geometry::{DrawList, Object, Viewport};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Attract mode, cycling through the ship classes
    Demo,
    /// Active gameplay
    Playing,
    /// Shields gone; ships fly on harmlessly until the countdown ends
    Ending,
}

/// Flight parameters of an approaching ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flight {
    /// Index into the ship catalog
    pub class: usize,
    /// Closing speed (units per tick)
    pub speed: f64,
    /// Weave phases driving horizontal and vertical offset
    pub phase_x: f64,
    pub phase_y: f64,
    /// Per-tick phase increments
    pub turn_x: f64,
    pub turn_y: f64,
    /// Distance from the viewer this tick and last tick
    pub range: f64,
    pub last_range: f64,
    /// Fly-by cue already played
    pub sounded: bool,
}

/// A hit ship counting down to respawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    /// Flight state frozen at the moment of the hit
    pub flight: Flight,
    pub countdown: u32,
}

/// A tumbling fragment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    /// Per-tick rotation increments
    pub spin: DVec3,
    /// Per-tick translation
    pub velocity: DVec3,
    /// Ticks left before it fades
    pub ttl: u32,
}

/// The attract-mode display ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Showcase {
    pub class: usize,
    pub pitch_rate: f64,
    pub yaw_rate: f64,
    pub speed: f64,
    pub range: f64,
    pub last_range: f64,
}

/// What an entity is doing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityState {
    Flying(Flight),
    Exploding(Explosion),
    Debris(Drift),
    Showcase(Showcase),
    /// Empty placeholder occupying a ship slot
    Inert,
}

/// A ship or fragment: geometry plus behavior
#[derive(Debug, Clone)]
pub struct Entity {
    pub object: Object,
    /// Palette index
    pub color: usize,
    pub state: EntityState,
}

impl Entity {
    pub fn new(object: Object, color: usize, state: EntityState) -> Self {
        Self {
            object,
            color,
            state,
        }
    }

    /// Placeholder with no geometry, parked at depth 0
    pub fn inert() -> Self {
        Self::new(Object::empty(), 0, EntityState::Inert)
    }

    /// Ships can be targeted; debris cannot
    pub fn is_ship(&self) -> bool {
        !matches!(self.state, EntityState::Debris(_))
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.state, EntityState::Flying(_))
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, EntityState::Exploding(_))
    }

    pub fn class(&self) -> Option<usize> {
        match self.state {
            EntityState::Flying(f) => Some(f.class),
            EntityState::Exploding(e) => Some(e.flight.class),
            EntityState::Showcase(s) => Some(s.class),
            EntityState::Debris(_) | EntityState::Inert => None,
        }
    }

    /// Current and previous range, for ships that report them
    pub fn telemetry(&self) -> Option<(f64, f64)> {
        match self.state {
            EntityState::Flying(f) => Some((f.range, f.last_range)),
            EntityState::Showcase(s) => Some((s.range, s.last_range)),
            _ => None,
        }
    }

    pub fn depth(&self) -> f64 {
        self.object.transform.translation.z
    }
}

/// Fixed-capacity ring of fragments; a full pool overwrites its oldest slot
#[derive(Debug, Clone)]
pub struct DebrisPool {
    slots: Vec<Option<Entity>>,
    cursor: usize,
}

impl DebrisPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    pub fn push(&mut self, entity: Entity) {
        if self.slots.is_empty() {
            return;
        }
        self.slots[self.cursor] = Some(entity);
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.cursor = 0;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.slots.get(index)?.as_ref()
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Option<Entity>> {
        self.slots.get_mut(index)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Active fragments with their slot index
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }
}

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play a sound
    Cue(SoundCue),
    /// Stop anything currently playing
    Silence,
    ShipDestroyed { slot: usize, class: usize, points: u32 },
    ShieldHit { damage: i32, remaining: i32 },
    GameStarted,
    RoundOver { score: u32 },
    DemoStarted,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub catalog: Arc<ShipCatalog>,
    pub viewport: Viewport,
    /// Tick period, used to express closing speed per second
    pub frame_ms: u64,
    pub phase: GamePhase,
    pub paused: bool,
    /// Cue events are only raised while sound is on
    pub sound_on: bool,
    /// Audio warm-up finished; games cannot start before this
    pub assets_ready: bool,
    pub score: u32,
    pub high_score: u32,
    pub shields: i32,
    /// Ticks of hit flash remaining
    pub blast_counter: u32,
    /// Ticks until attract mode while `Ending`
    pub end_counter: u32,
    pub ships: Vec<Entity>,
    pub debris: DebrisPool,
    pub stars: Starfield,
    pub demo: DemoReel,
    /// Objects rendered this tick, farthest first
    pub draw_list: DrawList,
    /// Last known aim point in screen pixels
    pub aim: IVec2,
    /// Ship under the aim point after the last tick
    pub target: Option<Target>,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a state in attract mode
    pub fn new(seed: u64, catalog: Arc<ShipCatalog>, viewport: Viewport) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = Starfield::new(
            NUM_STARS,
            viewport.x_offset * 2,
            viewport.y_offset * 2,
            &mut rng,
        );
        let mut state = Self {
            seed,
            rng,
            catalog,
            viewport,
            frame_ms: FRAME_MS,
            phase: GamePhase::Demo,
            paused: false,
            sound_on: true,
            assets_ready: false,
            score: 0,
            high_score: 0,
            shields: SHIELD_START,
            blast_counter: 0,
            end_counter: 0,
            ships: (0..NUM_SHIPS).map(|_| Entity::inert()).collect(),
            debris: DebrisPool::new(MAX_DEBRIS),
            stars,
            demo: DemoReel::default(),
            draw_list: DrawList::new(),
            aim: IVec2::new(viewport.x_offset, viewport.y_offset),
            target: None,
            events: Vec::new(),
            time_ticks: 0,
        };
        super::demo::start(&mut state);
        state.events.clear();
        state
    }

    /// Raise a sound cue if sound is enabled
    pub fn cue(&mut self, cue: SoundCue) {
        if self.sound_on {
            self.events.push(GameEvent::Cue(cue));
        }
    }

    /// Reset score and shields and fill every slot with a fresh ship
    pub fn start_game(&mut self) {
        self.phase = GamePhase::Playing;
        self.paused = false;
        self.blast_counter = 0;
        self.score = 0;
        self.shields = SHIELD_START;
        for slot in 0..self.ships.len() {
            self.ships[slot] = spawn::spawn_ship(&self.catalog, &mut self.rng);
        }
        self.debris.clear();
        self.target = None;
        self.events.push(GameEvent::GameStarted);
        log::info!("Game started (high score {})", self.high_score);
    }

    /// Shields are gone: stop scoring damage and count down to attract mode
    pub fn end_game(&mut self) {
        self.phase = GamePhase::Ending;
        self.end_counter = END_COUNT;
        self.events.push(GameEvent::RoundOver { score: self.score });
        log::info!("Round over: score {}, high score {}", self.score, self.high_score);
    }

    /// Full-screen flash is active
    pub fn flash(&self) -> bool {
        self.blast_counter > 0
    }
}
