//! Tail Gunner entry point
//!
//! Headless native runner: loads settings, warms up audio in the background
//! and lets an autopilot play while frames are summarized to the log.
//!
//! Usage: `tail-gunner [settings.json]`

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use glam::IVec2;

use tail_gunner::audio::{AudioManager, AudioSink, SoundCue};
use tail_gunner::frame::{DrawableKind, FrameSnapshot};
use tail_gunner::runner::{InputSource, Presenter, Runner};
use tail_gunner::sim::{GamePhase, GameState, ShipCatalog, TickInput};
use tail_gunner::Settings;

/// Ticks between autopilot shots
const FIRE_INTERVAL: u64 = 10;
/// Ticks between logged frame summaries
const REPORT_INTERVAL: u64 = 100;

/// Sink that writes cues to the log
struct LogAudio;

impl AudioSink for LogAudio {
    fn preload(&mut self) {
        for cue in SoundCue::ALL {
            log::debug!("Preloaded clip '{}'", cue.clip_name());
        }
    }

    fn play(&mut self, cue: SoundCue) {
        log::trace!("Play '{}'", cue.clip_name());
    }
}

/// Aims at the nearest ship on screen and fires now and then
#[derive(Default)]
struct Autopilot {
    ticks: u64,
}

impl Autopilot {
    /// Center of the nearest ship's nearest visible face
    fn aim_point(frame: &FrameSnapshot) -> Option<IVec2> {
        let ship = frame
            .drawables
            .iter()
            .rev()
            .find(|d| d.kind == DrawableKind::Ship)?;
        ship.faces.last()?.polygon.center()
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, last: &FrameSnapshot) -> TickInput {
        self.ticks += 1;
        match last.phase {
            // Fire starts a game once audio is ready
            GamePhase::Demo => TickInput {
                fire: last.assets_ready,
                ..Default::default()
            },
            GamePhase::Playing | GamePhase::Ending => TickInput {
                aim: Self::aim_point(last),
                fire: last.target.is_some() && self.ticks % FIRE_INTERVAL == 0,
                ..Default::default()
            },
        }
    }
}

/// Logs a summary every few seconds and the full frame at trace level
struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, frame: &FrameSnapshot) {
        if frame.tick % REPORT_INTERVAL == 0 {
            log::info!(
                "tick {:>6} {:?}: score {} (high {}), shields {}, {} objects / {} faces",
                frame.tick,
                frame.phase,
                frame.score,
                frame.high_score,
                frame.shields,
                frame.drawables.len(),
                frame.face_count()
            );
        }
        if log::log_enabled!(log::Level::Trace) {
            match serde_json::to_string(frame) {
                Ok(json) => log::trace!("{}", json),
                Err(err) => log::warn!("Frame not serializable: {}", err),
            }
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Tail Gunner (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = settings.seed.unwrap_or_else(clock_seed);
    log::info!("Seed {}", seed);

    let catalog = Arc::new(ShipCatalog::standard().context("building ship catalog")?);
    for (i, class) in catalog.iter().enumerate() {
        log::debug!(
            "{}: {} pts, top speed {:.0} m/s",
            class.name,
            class.points,
            catalog.max_speed_mps(i)
        );
    }

    let mut state = GameState::new(seed, catalog, settings.viewport());
    state.frame_ms = settings.frame_ms;
    state.sound_on = settings.sound;

    // The game starts in attract mode while clips load; games begin once ready
    let (audio, readiness) = AudioManager::warming_up(Box::new(LogAudio));

    let mut runner = Runner::new(state, audio, readiness);
    runner.max_ticks = settings.max_ticks;
    let ticks = runner.run(&mut Autopilot::default(), &mut LogPresenter);

    log::info!(
        "Done after {} ticks: score {}, high score {}",
        ticks,
        runner.state.score,
        runner.state.high_score
    );
    Ok(())
}
