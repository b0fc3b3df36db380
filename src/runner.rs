//! Fixed-period host loop
//!
//! Ticks the simulation on a drift-free schedule, forwards sound events to
//! the audio manager and hands each frame to a presenter. The loop runs on
//! one thread; the only thing it shares is the stop flag and the audio
//! readiness flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::audio::{AudioManager, Readiness};
use crate::frame::FrameSnapshot;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Deadline accumulator.
///
/// Each wait advances the deadline by exactly one period, so a slow tick
/// shortens the next sleep instead of pushing every later tick back.
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    deadline: Instant,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    pub fn starting_at(period: Duration, start: Instant) -> Self {
        Self {
            period,
            deadline: start,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Advance the deadline and report how long to sleep from `now`.
    ///
    /// Returns `Err(lateness)` when the new deadline has already passed.
    pub fn advance(&mut self, now: Instant) -> Result<Duration, Duration> {
        self.deadline += self.period;
        if now < self.deadline {
            Ok(self.deadline - now)
        } else {
            Err(now - self.deadline)
        }
    }

    /// Sleep until the next deadline; returns how late we already were
    pub fn wait(&mut self) -> Duration {
        match self.advance(Instant::now()) {
            Ok(sleep) => {
                thread::sleep(sleep);
                Duration::ZERO
            }
            Err(late) => late,
        }
    }
}

/// Cooperative stop request, checked between ticks
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Where tick input comes from. Gets the previous frame so automated
/// players can aim at what is on screen.
pub trait InputSource {
    fn poll(&mut self, last: &FrameSnapshot) -> TickInput;
}

impl<F: FnMut(&FrameSnapshot) -> TickInput> InputSource for F {
    fn poll(&mut self, last: &FrameSnapshot) -> TickInput {
        self(last)
    }
}

/// Consumer of finished frames
pub trait Presenter {
    fn present(&mut self, frame: &FrameSnapshot);
}

impl<F: FnMut(&FrameSnapshot)> Presenter for F {
    fn present(&mut self, frame: &FrameSnapshot) {
        self(frame)
    }
}

/// Forward a tick's sound events to the audio manager
pub fn dispatch_audio(events: &[GameEvent], audio: &mut AudioManager) {
    for event in events {
        match event {
            GameEvent::Cue(cue) => audio.play(*cue),
            GameEvent::Silence => audio.stop_all(),
            _ => {}
        }
    }
}

/// Owns the game state and everything the loop needs around it
pub struct Runner {
    pub state: GameState,
    pub audio: AudioManager,
    pub readiness: Readiness,
    pub stop: StopFlag,
    /// Tick budget; `None` runs until stopped
    pub max_ticks: Option<u64>,
}

impl Runner {
    pub fn new(state: GameState, audio: AudioManager, readiness: Readiness) -> Self {
        Self {
            state,
            audio,
            readiness,
            stop: StopFlag::new(),
            max_ticks: None,
        }
    }

    /// Run until stopped or out of ticks; returns the number of ticks run
    pub fn run(&mut self, input: &mut impl InputSource, presenter: &mut impl Presenter) -> u64 {
        let period = Duration::from_millis(self.state.frame_ms);
        let mut clock = FrameClock::new(period);
        let mut last = FrameSnapshot::capture(&self.state);
        let mut ticks = 0u64;

        log::info!("Running at {} ms per tick", self.state.frame_ms);
        while !self.stop.is_stopped() && self.max_ticks.is_none_or(|max| ticks < max) {
            self.state.assets_ready = self.readiness.is_ready();

            let commands = input.poll(&last);
            tick(&mut self.state, &commands);
            self.audio.set_muted(!self.state.sound_on);
            dispatch_audio(&self.state.events, &mut self.audio);

            last = FrameSnapshot::capture(&self.state);
            presenter.present(&last);
            ticks += 1;

            let late = clock.wait();
            if late > period {
                log::debug!("Tick {} finished {:?} behind schedule", ticks, late);
            }
        }
        log::info!("Stopped after {} ticks", ticks);
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioSink, SoundCue};
    use crate::consts::MAGNIFICATION;
    use crate::geometry::Viewport;
    use crate::sim::{GamePhase, ShipCatalog};
    use glam::DVec3;
    use std::sync::Mutex;

    fn state() -> GameState {
        let viewport = Viewport {
            viewpoint: DVec3::new(0.0, 0.0, 10.0),
            magnification: MAGNIFICATION,
            x_offset: 300,
            y_offset: 200,
        };
        let mut state = GameState::new(5, Arc::new(ShipCatalog::standard().unwrap()), viewport);
        state.frame_ms = 1;
        state
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<SoundCue>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.0.lock().unwrap().push(cue);
        }
    }

    #[test]
    fn test_clock_does_not_drift() {
        let start = Instant::now();
        let period = Duration::from_millis(50);
        let mut clock = FrameClock::starting_at(period, start);

        // On time: sleep the rest of the period
        assert_eq!(
            clock.advance(start + Duration::from_millis(10)),
            Ok(Duration::from_millis(40))
        );
        // Slow tick: deadline stays on the 50 ms grid
        assert_eq!(
            clock.advance(start + Duration::from_millis(130)),
            Err(Duration::from_millis(30))
        );
        assert_eq!(
            clock.advance(start + Duration::from_millis(140)),
            Ok(Duration::from_millis(10))
        );
    }

    #[test]
    fn test_run_honours_tick_budget() {
        let mut runner = Runner::new(state(), AudioManager::default(), Readiness::ready());
        runner.max_ticks = Some(12);
        let mut frames = 0;
        let ticks = runner.run(&mut |_: &FrameSnapshot| TickInput::default(), &mut |_: &FrameSnapshot| {
            frames += 1
        });
        assert_eq!(ticks, 12);
        assert_eq!(frames, 12);
        assert_eq!(runner.state.time_ticks, 12);
    }

    #[test]
    fn test_stop_flag_ends_run() {
        let mut runner = Runner::new(state(), AudioManager::default(), Readiness::ready());
        let stop = runner.stop.clone();
        let ticks = runner.run(&mut |_: &FrameSnapshot| TickInput::default(), &mut |f: &FrameSnapshot| {
            if f.tick >= 3 {
                stop.stop();
            }
        });
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_start_waits_for_readiness_and_cues_reach_sink() {
        let rec = Recorder::default();
        let readiness = Readiness::new();
        let mut runner = Runner::new(
            state(),
            AudioManager::new(Box::new(rec.clone())),
            readiness.clone(),
        );
        runner.max_ticks = Some(1);
        let mut input = |_: &FrameSnapshot| TickInput {
            start: true,
            ..Default::default()
        };
        runner.run(&mut input, &mut |_: &FrameSnapshot| {});
        assert_eq!(runner.state.phase, GamePhase::Demo);

        readiness.mark_ready();
        runner.run(&mut input, &mut |_: &FrameSnapshot| {});
        assert_eq!(runner.state.phase, GamePhase::Playing);

        // Fire on the next tick is heard
        let mut fire = |_: &FrameSnapshot| TickInput {
            fire: true,
            ..Default::default()
        };
        runner.run(&mut fire, &mut |_: &FrameSnapshot| {});
        assert!(rec.0.lock().unwrap().contains(&SoundCue::Fire));
    }
}
