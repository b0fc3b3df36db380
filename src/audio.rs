//! Audio cues and the playback boundary
//!
//! The simulation only names cues; a host-provided [`AudioSink`] turns them
//! into sound. Clip loading happens once on a background thread, and the
//! game loop polls a [`Readiness`] flag to learn when it is done. The
//! [`AudioManager`] stays silent until then and plays through the loaded
//! sink afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Ship crossed the near threshold
    Proximity,
    /// Ship destroyed
    Explosion,
    /// A ship got a shot off at the player
    HitTaken,
    /// Player fired
    Fire,
    /// Aim point is on a ship
    TargetLock,
    /// Fragment flew into the viewer
    DebrisImpact,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Proximity,
        SoundCue::Explosion,
        SoundCue::HitTaken,
        SoundCue::Fire,
        SoundCue::TargetLock,
        SoundCue::DebrisImpact,
    ];

    /// Clip name the host should bind to this cue
    pub fn clip_name(&self) -> &'static str {
        match self {
            SoundCue::Proximity => "flyby",
            SoundCue::Explosion => "explosion",
            SoundCue::HitTaken => "hit",
            SoundCue::Fire => "fire",
            SoundCue::TargetLock => "lock",
            SoundCue::DebrisImpact => "debris",
        }
    }
}

/// Host playback device.
///
/// Calls must return promptly; the game loop never waits on playback.
pub trait AudioSink: Send {
    /// Load or prime clips ahead of play. Runs once, off the game thread.
    fn preload(&mut self) {}

    fn play(&mut self, cue: SoundCue);

    /// Cut anything still sounding
    fn stop_all(&mut self) {}
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn preload(&mut self) {
        (**self).preload();
    }

    fn play(&mut self, cue: SoundCue) {
        (**self).play(cue);
    }

    fn stop_all(&mut self) {
        (**self).stop_all();
    }
}

/// Sink that drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    /// Sink still preloading in the background
    loader: Option<(Readiness, JoinHandle<Box<dyn AudioSink>>)>,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullAudio))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            loader: None,
            muted: false,
        }
    }

    /// Preload `sink` on a background thread. Cues are dropped until the
    /// returned flag is set; from then on they go to the loaded sink.
    pub fn warming_up(sink: Box<dyn AudioSink>) -> (Self, Readiness) {
        let (readiness, handle) = spawn_warmup(sink);
        let manager = Self {
            sink: Box::new(NullAudio),
            loader: Some((readiness.clone(), handle)),
            muted: false,
        };
        (manager, readiness)
    }

    /// Take over the preloaded sink once its loader has signalled
    fn install_loaded(&mut self) {
        if !self.loader.as_ref().is_some_and(|(ready, _)| ready.is_ready()) {
            return;
        }
        if let Some((_, handle)) = self.loader.take() {
            match handle.join() {
                Ok(sink) => {
                    self.sink = sink;
                    log::debug!("Audio sink installed");
                }
                Err(_) => log::warn!("Audio loader panicked; staying silent"),
            }
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.install_loaded();
        if muted && !self.muted {
            self.sink.stop_all();
        }
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a sound effect
    pub fn play(&mut self, cue: SoundCue) {
        if self.muted {
            return;
        }
        self.install_loaded();
        self.sink.play(cue);
    }

    pub fn stop_all(&mut self) {
        self.install_loaded();
        self.sink.stop_all();
    }
}

/// One-shot flag set when background warm-up finishes
#[derive(Debug, Clone, Default)]
pub struct Readiness(Arc<AtomicBool>);

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Already-set flag, for hosts with nothing to load
    pub fn ready() -> Self {
        let r = Self::new();
        r.mark_ready();
        r
    }

    pub fn mark_ready(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Preload `sink` on its own thread.
///
/// The returned flag flips once loading is done; join the handle to get the
/// loaded sink back for the game thread.
pub fn spawn_warmup<S>(mut sink: S) -> (Readiness, JoinHandle<S>)
where
    S: AudioSink + 'static,
{
    let readiness = Readiness::new();
    let flag = readiness.clone();
    let handle = thread::spawn(move || {
        log::info!("Loading audio clips...");
        sink.preload();
        flag.mark_ready();
        log::info!("Audio ready");
        sink
    });
    (readiness, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Recorder {
        played: Arc<Mutex<Vec<SoundCue>>>,
        stops: Arc<Mutex<u32>>,
        loaded: Arc<AtomicBool>,
    }

    impl AudioSink for Recorder {
        fn preload(&mut self) {
            self.loaded.store(true, Ordering::Release);
        }

        fn play(&mut self, cue: SoundCue) {
            self.played.lock().unwrap().push(cue);
        }

        fn stop_all(&mut self) {
            *self.stops.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_mute_drops_cues_and_stops() {
        let rec = Recorder::default();
        let mut audio = AudioManager::new(Box::new(rec.clone()));
        audio.play(SoundCue::Fire);
        audio.set_muted(true);
        audio.play(SoundCue::Explosion);
        audio.set_muted(true);
        audio.set_muted(false);
        audio.play(SoundCue::TargetLock);

        assert_eq!(
            *rec.played.lock().unwrap(),
            vec![SoundCue::Fire, SoundCue::TargetLock]
        );
        assert_eq!(*rec.stops.lock().unwrap(), 1);
    }

    #[test]
    fn test_warmup_sets_flag() {
        let (ready, handle) = spawn_warmup(Recorder::default());
        let sink = handle.join().unwrap();
        assert!(sink.loaded.load(Ordering::Acquire));
        assert!(ready.is_ready());
    }

    #[test]
    fn test_warming_up_plays_through_loaded_sink() {
        let rec = Recorder::default();
        let (mut audio, ready) = AudioManager::warming_up(Box::new(rec.clone()));
        while !ready.is_ready() {
            thread::yield_now();
        }
        audio.play(SoundCue::Fire);
        audio.stop_all();

        assert!(rec.loaded.load(Ordering::Acquire));
        assert_eq!(*rec.played.lock().unwrap(), vec![SoundCue::Fire]);
        assert_eq!(*rec.stops.lock().unwrap(), 1);
    }

    #[test]
    fn test_readiness_shared() {
        let r = Readiness::new();
        let other = r.clone();
        assert!(!other.is_ready());
        r.mark_ready();
        assert!(other.is_ready());
        assert!(Readiness::ready().is_ready());
    }

    #[test]
    fn test_clip_names_unique() {
        let mut names: Vec<_> = SoundCue::ALL.iter().map(|c| c.clip_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SoundCue::ALL.len());
    }
}
