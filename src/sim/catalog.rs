//! Enemy ship classes: geometry and performance tables
//!
//! Models are authored nose toward -Z (away from the viewer) so an
//! approaching ship shows its tail. Every ship of a class shares one model.

use std::sync::Arc;

use crate::consts::{FRAME_MS, MAX_SPEED};
use crate::geometry::Model;

/// One enemy class
#[derive(Debug, Clone)]
pub struct ShipClass {
    pub name: &'static str,
    /// Relative spawn weight (weights sum to 1)
    pub frequency: f64,
    /// Score for a kill
    pub points: u32,
    /// Multiplier on the base closing speed
    pub speed_factor: f64,
    /// Multiplier on weave phase increments
    pub turn_factor: f64,
    /// Shield damage when it lands a hit
    pub damage: i32,
    pub model: Arc<Model>,
}

/// The set of classes ships are drawn from
#[derive(Debug, Clone)]
pub struct ShipCatalog {
    classes: Vec<ShipClass>,
}

impl ShipCatalog {
    pub fn new(classes: Vec<ShipClass>) -> anyhow::Result<Self> {
        anyhow::ensure!(!classes.is_empty(), "ship catalog needs at least one class");
        Ok(Self { classes })
    }

    /// The four stock fighters
    pub fn standard() -> anyhow::Result<Self> {
        Self::new(vec![
            ShipClass {
                name: "F15 Fighter",
                frequency: 0.30,
                points: 125,
                speed_factor: 1.15,
                turn_factor: 1.15,
                damage: 2,
                model: Arc::new(f15()?),
            },
            ShipClass {
                name: "F17A Advanced Tactical Fighter",
                frequency: 0.30,
                points: 150,
                speed_factor: 1.35,
                turn_factor: 1.15,
                damage: 4,
                model: Arc::new(f17a()?),
            },
            ShipClass {
                name: "F21 Fighter/Bomber",
                frequency: 0.20,
                points: 100,
                speed_factor: 1.00,
                turn_factor: 1.00,
                damage: 5,
                model: Arc::new(f21()?),
            },
            ShipClass {
                name: "SF-111 Interceptor",
                frequency: 0.20,
                points: 250,
                speed_factor: 1.75,
                turn_factor: 1.25,
                damage: 3,
                model: Arc::new(sf111()?),
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, class: usize) -> Option<&ShipClass> {
        self.classes.get(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShipClass> {
        self.classes.iter()
    }

    /// Weighted pick for a uniform `sample` in `[0, 1)`.
    ///
    /// Walks the running sum of weights and stops at the first class whose
    /// cumulative weight reaches the sample; the last class catches anything
    /// left over from rounding.
    pub fn pick_class(&self, sample: f64) -> usize {
        let last = self.classes.len() - 1;
        let mut total = 0.0;
        for (i, class) in self.classes.iter().enumerate() {
            total += class.frequency;
            if total >= sample || i == last {
                return i;
            }
        }
        last
    }

    /// Top closing speed in metres per second, for display
    pub fn max_speed_mps(&self, class: usize) -> f64 {
        self.get(class)
            .map(|c| MAX_SPEED * c.speed_factor * 1000.0 / FRAME_MS as f64)
            .unwrap_or(0.0)
    }
}

fn f15() -> anyhow::Result<Model> {
    Model::from_tables(
        &[
            // Fuselage
            [-2.0, 1.0, 5.0],
            [2.0, 1.0, 5.0],
            [0.0, 0.0, -10.0],
            [-2.0, -1.0, 5.0],
            [2.0, -1.0, 5.0],
            [-1.0, -1.0, 7.0],
            [1.0, -1.0, 7.0],
            // Port wing
            [5.0, 0.0, -2.0],
            [5.0, -1.0, -2.0],
            [5.0, 0.0, -12.0],
            [10.0, 3.0, -7.0],
            // Starboard wing
            [-5.0, 0.0, -2.0],
            [-5.0, -1.0, -2.0],
            [-5.0, 0.0, -12.0],
            [-10.0, 3.0, -7.0],
        ],
        &[
            &[0, 1, 2],
            &[6, 5, 3, 2, 4],
            &[4, 2, 1],
            &[0, 2, 3],
            &[0, 5, 6, 1],
            &[1, 6, 4],
            &[0, 3, 5],
            &[1, 7, 9, 2],
            &[2, 9, 8, 4],
            &[7, 1, 4, 8],
            &[7, 8, 9],
            &[7, 10, 9],
            &[9, 10, 8],
            &[7, 8, 10],
            &[0, 2, 13, 11],
            &[2, 3, 12, 13],
            &[0, 11, 12, 3],
            &[11, 13, 12],
            &[11, 13, 14],
            &[14, 13, 12],
            &[14, 12, 11],
        ],
    )
}

fn f17a() -> anyhow::Result<Model> {
    Model::from_tables(
        &[
            // Fuselage
            [-1.0, -1.0, 7.0],
            [1.0, -1.0, 7.0],
            [2.0, 1.0, 3.0],
            [-2.0, 1.0, 3.0],
            [3.0, -1.0, 3.0],
            [0.0, 0.0, -7.0],
            [-3.0, -1.0, 3.0],
            // Port wing
            [9.0, 3.0, -1.0],
            [9.0, 2.5, -1.0],
            [9.0, 3.0, -10.0],
            [12.0, 1.0, -3.0],
            [12.0, 1.0, -10.0],
            // Starboard wing
            [-9.0, 3.0, -1.0],
            [-9.0, 2.5, -1.0],
            [-9.0, 3.0, -10.0],
            [-12.0, 1.0, -3.0],
            [-12.0, 1.0, -10.0],
        ],
        &[
            &[0, 1, 2, 3],
            &[5, 3, 2],
            &[4, 2, 1],
            &[6, 0, 3],
            &[6, 5, 4, 1, 0],
            &[2, 7, 9, 5],
            &[8, 4, 5, 9],
            &[7, 10, 11, 9],
            &[11, 10, 8, 9],
            &[2, 4, 8, 7],
            &[7, 8, 10],
            &[7, 8, 10],
            &[3, 5, 14, 12],
            &[5, 6, 13, 14],
            &[12, 14, 16, 15],
            &[13, 15, 16, 14],
            &[3, 12, 13, 6],
            &[12, 15, 13],
        ],
    )
}

fn f21() -> anyhow::Result<Model> {
    Model::from_tables(
        &[
            // Fuselage
            [1.0, -0.5, 7.0],
            [-1.0, -0.5, 7.0],
            [3.0, 0.0, 2.0],
            [-3.0, 0.0, 2.0],
            [1.0, 1.5, 5.0],
            [-1.0, 1.5, 5.0],
            [2.0, 1.0, 1.0],
            [-2.0, 1.0, 1.0],
            [0.0, 0.0, -9.0],
            // Wing tips
            [12.0, 1.0, -10.0],
            [-12.0, 1.0, -10.0],
        ],
        &[
            &[0, 4, 5, 1],
            &[4, 6, 7, 5],
            &[0, 6, 4],
            &[0, 2, 6],
            &[1, 5, 3],
            &[3, 5, 7],
            &[0, 1, 3, 2],
            &[6, 8, 7],
            &[2, 8, 6],
            &[3, 7, 8],
            &[2, 3, 8],
            &[6, 9, 8],
            &[2, 8, 9],
            &[2, 9, 6],
            &[7, 8, 10],
            &[3, 10, 8],
            &[3, 7, 10],
        ],
    )
}

fn sf111() -> anyhow::Result<Model> {
    Model::from_tables(
        &[
            // Fuselage
            [-1.0, 0.0, 4.0],
            [-2.0, 0.5, 5.0],
            [-1.0, -1.0, 7.0],
            [1.0, -1.0, 7.0],
            [2.0, 0.5, 5.0],
            [1.0, 0.0, 4.0],
            [2.0, -1.0, 5.0],
            [1.0, -1.0, 4.0],
            [-1.0, -1.0, 4.0],
            [-2.0, -1.0, 5.0],
            [0.0, 1.0, -5.0],
            [0.0, -1.0, -5.0],
            // Wing tips
            [9.0, 0.0, -12.0],
            [-9.0, 0.0, -12.0],
        ],
        &[
            &[0, 1, 4, 5],
            &[1, 2, 3, 4],
            &[0, 1, 4, 5],
            &[0, 5, 10],
            &[2, 9, 8, 11, 7, 6, 3],
            &[3, 6, 4],
            &[6, 7, 5, 4],
            &[2, 1, 9],
            &[1, 0, 8, 9],
            &[5, 12, 10],
            &[7, 11, 12],
            &[5, 7, 12],
            &[12, 11, 10],
            &[0, 10, 13],
            &[13, 11, 8],
            &[13, 8, 0],
            &[13, 10, 11],
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_builds() {
        let catalog = ShipCatalog::standard().unwrap();
        assert_eq!(catalog.len(), 4);
        let total: f64 = catalog.iter().map(|c| c.frequency).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let face_counts: Vec<usize> = catalog.iter().map(|c| c.model.faces().len()).collect();
        assert_eq!(face_counts, vec![21, 18, 17, 17]);
    }

    #[test]
    fn test_f17a_wing_faces_keep_their_slots() {
        let catalog = ShipCatalog::standard().unwrap();
        let faces = catalog.get(1).unwrap().model.faces();
        // The port wing tip is listed twice; the starboard faces follow it
        assert_eq!(faces[10], faces[11]);
        assert_eq!(faces[12].indices(), &[3, 5, 14, 12]);
        assert_eq!(faces[14].indices(), &[12, 14, 16, 15]);
        assert_eq!(faces[16].indices(), &[3, 12, 13, 6]);
    }

    #[test]
    fn test_pick_class_weighted() {
        let catalog = ShipCatalog::standard().unwrap();
        assert_eq!(catalog.pick_class(0.10), 0);
        assert_eq!(catalog.pick_class(0.30), 0);
        assert_eq!(catalog.pick_class(0.31), 1);
        assert_eq!(catalog.pick_class(0.75), 2);
        assert_eq!(catalog.pick_class(0.95), 3);
        assert_eq!(catalog.pick_class(0.0), 0);
    }

    #[test]
    fn test_pick_class_falls_back_to_last() {
        let model = Arc::new(
            Model::from_tables(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[&[0, 1, 2]])
                .unwrap(),
        );
        let class = |frequency| ShipClass {
            name: "test",
            frequency,
            points: 1,
            speed_factor: 1.0,
            turn_factor: 1.0,
            damage: 1,
            model: Arc::clone(&model),
        };
        // Weights deliberately short of 1
        let catalog = ShipCatalog::new(vec![class(0.2), class(0.2), class(0.2)]).unwrap();
        assert_eq!(catalog.pick_class(0.99), 2);
        assert!(ShipCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_max_speed_display() {
        let catalog = ShipCatalog::standard().unwrap();
        // 8 units/tick * 1.75 at 20 ticks per second
        assert!((catalog.max_speed_mps(3) - 280.0).abs() < 1e-9);
        assert_eq!(catalog.max_speed_mps(9), 0.0);
    }
}
