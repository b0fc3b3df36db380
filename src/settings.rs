//! Game settings
//!
//! Read from an optional JSON file; any field left out takes its default.

use std::fs;
use std::path::Path;

use anyhow::Context;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_MS, MAGNIFICATION, VIEWPOINT};
use crate::geometry::Viewport;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    /// Screen size in pixels; the projection is centered on it
    pub screen_width: u32,
    pub screen_height: u32,
    /// Model units to pixels
    pub magnification: f64,

    // === Timing ===
    /// Tick period in milliseconds
    pub frame_ms: u64,
    /// Stop after this many ticks (headless runs); `None` runs until stopped
    pub max_ticks: Option<u64>,

    // === Simulation ===
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,

    // === Audio ===
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 600,
            screen_height: 400,
            magnification: MAGNIFICATION,
            frame_ms: FRAME_MS,
            max_ticks: None,
            seed: None,
            sound: true,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{:#}; using default settings", err);
                Self::default()
            }
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.screen_width > 0 && self.screen_height > 0,
            "screen size must be non-zero, got {}x{}",
            self.screen_width,
            self.screen_height
        );
        anyhow::ensure!(self.frame_ms > 0, "frame_ms must be positive");
        anyhow::ensure!(
            self.magnification.is_finite() && self.magnification > 0.0,
            "magnification must be positive, got {}",
            self.magnification
        );
        Ok(())
    }

    /// Projection centered on the screen
    pub fn viewport(&self) -> Viewport {
        Viewport {
            viewpoint: DVec3::from_array(VIEWPOINT),
            magnification: self.magnification,
            x_offset: (self.screen_width / 2) as i32,
            y_offset: (self.screen_height / 2) as i32,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tail-gunner-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        let vp = s.viewport();
        assert_eq!((vp.x_offset, vp.y_offset), (300, 200));
        assert_eq!(vp.viewpoint, DVec3::new(0.0, 0.0, 10.0));
        assert_eq!(s.frame_ms, 50);
        assert!(s.sound);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_file("partial", r#"{ "screen_width": 800, "seed": 7 }"#);
        let s = Settings::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(s.screen_width, 800);
        assert_eq!(s.screen_height, 400);
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.viewport().x_offset, 400);
    }

    #[test]
    fn test_bad_files_fall_back() {
        let missing = std::env::temp_dir().join("tail-gunner-does-not-exist.json");
        assert!(Settings::load(&missing).is_err());
        assert_eq!(Settings::load_or_default(&missing), Settings::default());

        let path = temp_file("zero", r#"{ "frame_ms": 0 }"#);
        assert!(Settings::load(&path).is_err());
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings {
            max_ticks: Some(100),
            sound: false,
            ..Default::default()
        };
        let back: Settings = serde_json::from_str(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
