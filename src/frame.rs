//! Per-frame snapshot handed to the presentation layer
//!
//! The simulation overwrites its render state every tick, so a presenter
//! gets an owned copy it can keep, draw, or serialize at its own pace.

use std::f64::consts::FRAC_PI_2;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{DrawRef, RenderedFace};
use crate::sim::{Entity, GamePhase, GameState, Target};

/// What a drawable came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawableKind {
    Ship,
    Debris,
}

/// One object's visible faces, nearest face last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub kind: DrawableKind,
    /// Ship slot or debris pool index
    pub slot: usize,
    /// Palette index
    pub color: usize,
    /// Ship class, for ships that have one
    pub class: Option<usize>,
    /// Draw-order key (object Z translation)
    pub depth: f64,
    pub faces: Vec<RenderedFace>,
}

impl Drawable {
    fn from_entity(kind: DrawableKind, slot: usize, entity: &Entity, depth: f64) -> Self {
        Self {
            kind,
            slot,
            color: entity.color,
            class: entity.class(),
            depth,
            faces: entity.object.rendered().to_vec(),
        }
    }

    /// Fill color of each face in draw order
    pub fn fills(&self, flash: bool) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.faces
            .iter()
            .map(move |f| palette(self.color, shade_level(f.angle), flash))
    }
}

/// Everything needed to draw one frame and its HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    /// Objects farthest first
    pub drawables: Vec<Drawable>,
    /// Hit flash: white background and inverted palette
    pub flash: bool,
    pub phase: GamePhase,
    pub paused: bool,
    pub sound_on: bool,
    pub assets_ready: bool,
    pub score: u32,
    pub high_score: u32,
    pub shields: i32,
    pub aim: IVec2,
    pub target: Option<Target>,
    /// Class name of the targeted ship
    pub target_name: Option<String>,
    pub stars: Vec<IVec2>,
    /// Class name on show in attract mode
    pub demo_name: Option<String>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let drawables = state
            .draw_list
            .iter()
            .filter_map(|entry| {
                let (kind, slot, entity) = match entry.target {
                    DrawRef::Ship(i) => (DrawableKind::Ship, i, state.ships.get(i)?),
                    DrawRef::Debris(i) => (DrawableKind::Debris, i, state.debris.get(i)?),
                };
                // Placeholders and fully culled objects have nothing to draw
                if entity.object.rendered().is_empty() {
                    return None;
                }
                Some(Drawable::from_entity(kind, slot, entity, entry.depth))
            })
            .collect();

        let class_name = |class: Option<usize>| {
            class
                .and_then(|c| state.catalog.get(c))
                .map(|c| c.name.to_string())
        };
        let target_name = class_name(
            state
                .target
                .and_then(|t| state.ships.get(t.slot))
                .and_then(Entity::class),
        );
        let demo_name = match state.phase {
            GamePhase::Demo => class_name(Some(state.demo.class)),
            _ => None,
        };

        Self {
            tick: state.time_ticks,
            drawables,
            flash: state.flash(),
            phase: state.phase,
            paused: state.paused,
            sound_on: state.sound_on,
            assets_ready: state.assets_ready,
            score: state.score,
            high_score: state.high_score,
            shields: state.shields,
            aim: state.aim,
            target: state.target,
            target_name,
            stars: state.stars.positions().collect(),
            demo_name,
        }
    }

    pub fn face_count(&self) -> usize {
        self.drawables.iter().map(|d| d.faces.len()).sum()
    }
}

/// Brightness for a face: full when it faces the viewer head-on, falling to
/// zero at a right angle
pub fn shade_level(angle: f64) -> u8 {
    let c = 255 - (255.0 * (angle / FRAC_PI_2)) as i32;
    c.clamp(0, 255) as u8
}

/// RGB for palette entry `color` at brightness `level`.
///
/// During a hit flash every face turns the inverted grey of its level.
/// Unknown palette entries are black.
pub fn palette(color: usize, level: u8, flash: bool) -> [u8; 3] {
    let c = level;
    let h = level / 2;
    if flash {
        let inv = 255 - c;
        return [inv, inv, inv];
    }
    match color {
        0 => [c, h, h],
        1 => [h, c, h],
        2 => [h, h, c],
        3 => [0, c, c],
        4 => [c, 0, c],
        5 => [c, c, 0],
        _ => [0, 0, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::geometry::Viewport;
    use crate::sim::{ShipCatalog, TickInput, tick};
    use glam::DVec3;
    use std::sync::Arc;

    fn state() -> GameState {
        let viewport = Viewport {
            viewpoint: DVec3::new(0.0, 0.0, 10.0),
            magnification: MAGNIFICATION,
            x_offset: 300,
            y_offset: 200,
        };
        let mut state = GameState::new(21, Arc::new(ShipCatalog::standard().unwrap()), viewport);
        state.assets_ready = true;
        state
    }

    #[test]
    fn test_shade_level() {
        assert_eq!(shade_level(0.0), 255);
        assert_eq!(shade_level(FRAC_PI_2 / 2.0), 128);
        assert_eq!(shade_level(FRAC_PI_2), 0);
        assert_eq!(shade_level(3.0), 0);
    }

    #[test]
    fn test_palette_families() {
        assert_eq!(palette(0, 200, false), [200, 100, 100]);
        assert_eq!(palette(3, 200, false), [0, 200, 200]);
        assert_eq!(palette(5, 201, false), [201, 201, 0]);
        assert_eq!(palette(9, 200, false), [0, 0, 0]);
        // Flash ignores the hue
        assert_eq!(palette(4, 200, true), [55, 55, 55]);
    }

    #[test]
    fn test_capture_demo_frame() {
        let mut state = state();
        tick(&mut state, &TickInput::default());
        let frame = FrameSnapshot::capture(&state);
        assert_eq!(frame.phase, GamePhase::Demo);
        assert_eq!(frame.demo_name.as_deref(), Some("F15 Fighter"));
        assert!(frame.drawables.len() <= 1);
        for d in &frame.drawables {
            assert_eq!(d.kind, DrawableKind::Ship);
            assert_eq!(d.fills(false).count(), d.faces.len());
        }
    }

    #[test]
    fn test_capture_playing_frame_ordered() {
        let mut state = state();
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        for _ in 0..50 {
            tick(&mut state, &TickInput::default());
        }
        let frame = FrameSnapshot::capture(&state);
        assert_eq!(frame.phase, GamePhase::Playing);
        assert_eq!(frame.stars.len(), NUM_STARS);
        assert!(frame.demo_name.is_none());
        assert!(frame.face_count() > 0);
        for pair in frame.drawables.windows(2) {
            assert!(pair[0].depth <= pair[1].depth);
        }

        let json = serde_json::to_string(&frame).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.drawables.len(), frame.drawables.len());
        assert_eq!(back.score, frame.score);
    }
}
