//! Tail Gunner - A 3D rear-turret arcade game
//!
//! Core modules:
//! - `geometry`: Point/face/object pipeline (transform, project, cull, depth-sort)
//! - `sim`: Deterministic simulation (ship flight, targeting, explosions, debris)
//! - `frame`: Per-frame snapshot handed to the presentation layer
//! - `audio`: Sound cue boundary and asset warm-up
//! - `runner`: Fixed-period host loop
//! - `settings`: Configuration

pub mod audio;
pub mod frame;
pub mod geometry;
pub mod runner;
pub mod settings;
pub mod sim;

pub use frame::FrameSnapshot;
pub use settings::Settings;

use std::f64::consts::TAU;

/// Game configuration constants
pub mod consts {
    use std::f64::consts::PI;

    /// Milliseconds between simulation ticks
    pub const FRAME_MS: u64 = 50;
    /// Model units to pixels
    pub const MAGNIFICATION: f64 = 100.0;
    /// Eye point for projection
    pub const VIEWPOINT: [f64; 3] = [0.0, 0.0, 10.0];

    /// Ship slots on screen at once
    pub const NUM_SHIPS: usize = 6;
    /// Palette entries a ship may be drawn with
    pub const NUM_COLORS: usize = 6;
    /// Depth at which new ships appear
    pub const START_DISTANCE: f64 = -1000.0;
    /// Depth past which a ship triggers its fly-by cue
    pub const SOUND_DISTANCE: f64 = -150.0;
    /// Depth past which a ship (or debris) is too close and leaves play
    pub const END_DISTANCE: f64 = 0.0;
    /// Weave amplitudes
    pub const MAX_HORIZONTAL: f64 = 100.0;
    pub const MAX_VERTICAL: f64 = 30.0;
    /// Closing speed range (units per tick, before class multiplier)
    pub const MIN_SPEED: f64 = 2.0;
    pub const MAX_SPEED: f64 = 8.0;
    /// Weave phase increment scale (radians per tick)
    pub const MAX_TURN: f64 = PI / 100.0;
    /// Bank angle at full weave deflection
    pub const MAX_BANK: f64 = PI / 6.0;
    /// Ticks an explosion lasts before the slot respawns
    pub const EXPLODE_COUNT: u32 = 100;

    /// Debris pool capacity (oldest slot is overwritten when full)
    pub const MAX_DEBRIS: usize = 20;
    /// Debris lifetime in ticks
    pub const DEBRIS_COUNT: u32 = 50;
    /// Debris spin increment scale (radians per tick)
    pub const MAX_SPIN: f64 = PI / 20.0;

    /// Attract mode: closest approach and ticks per showcased class
    pub const DEMO_DISTANCE: f64 = -40.0;
    pub const DEMO_COUNT: u32 = 400;
    /// Attract mode pitch rock and yaw rates (radians per tick)
    pub const DEMO_PITCH_RATE: f64 = PI / 200.0;
    pub const DEMO_YAW_RATE: f64 = PI / 50.0;

    /// Ticks of full-screen flash after taking a hit
    pub const BLAST_COUNT: u32 = 5;
    /// Ticks between round over and attract mode
    pub const END_COUNT: u32 = 200;
    /// Chance a ship passing the end depth lands a hit
    pub const HIT_CHANCE: f64 = 0.5;
    /// Starting (and maximum) shield value
    pub const SHIELD_START: i32 = 100;
    /// Background stars
    pub const NUM_STARS: usize = 20;
    /// Per-tick star radius shrink factor
    pub const STAR_SHRINK: f64 = 0.95;
}

/// Wrap an angle into `[0, 2π)`
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}
