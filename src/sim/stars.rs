//! Background starfield
//!
//! Stars start near the screen edge and shrink toward the middle, giving the
//! impression of flying tail-first away from the action.

use std::f64::consts::TAU;

use glam::IVec2;
use rand::Rng;

use crate::consts::STAR_SHRINK;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub angle: f64,
    pub radius: f64,
    /// Re-seed once the radius drops below this
    pub min_radius: f64,
    /// Pixel position after the last update
    pub position: IVec2,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    width: i32,
    height: i32,
}

impl Starfield {
    pub fn new<R: Rng>(count: usize, width: i32, height: i32, rng: &mut R) -> Self {
        let mut field = Self {
            stars: Vec::with_capacity(count),
            width,
            height,
        };
        for _ in 0..count {
            let star = field.seed_star(rng);
            field.stars.push(star);
        }
        field
    }

    fn seed_star<R: Rng>(&self, rng: &mut R) -> Star {
        let w = self.width as f64;
        let h = self.height as f64;
        let angle = rng.random::<f64>() * TAU;
        let radius = w.max(h) / 2.0 + rng.random::<f64>() * w.min(h) / 4.0;
        let min_radius = radius / (rng.random::<f64>() * 9.0 + 1.0);
        Star {
            angle,
            radius,
            min_radius,
            position: self.to_screen(angle, radius),
        }
    }

    fn to_screen(&self, angle: f64, radius: f64) -> IVec2 {
        IVec2::new(
            (self.width as f64 / 2.0 + radius * angle.sin()) as i32,
            (self.height as f64 / 2.0 + radius * angle.cos()) as i32,
        )
    }

    /// Shrink every star toward the center, re-seeding the ones that got there
    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        for i in 0..self.stars.len() {
            let mut star = self.stars[i];
            star.radius *= STAR_SHRINK;
            if star.radius < star.min_radius {
                star = self.seed_star(rng);
            }
            star.position = self.to_screen(star.angle, star.radius);
            self.stars[i] = star;
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.stars.iter().map(|s| s.position)
    }
}
