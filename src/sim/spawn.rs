//! Spawning ships and explosion debris

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use super::catalog::ShipCatalog;
use super::state::{DebrisPool, Drift, Entity, EntityState, Flight};
use crate::consts::*;
use crate::geometry::{Object, Transform};

/// A fresh ship at the far spawn depth.
///
/// Class comes from the weighted catalog draw; speed, color, weave phases
/// and turn rates are uniform within class-scaled ranges.
pub fn spawn_ship<R: Rng>(catalog: &ShipCatalog, rng: &mut R) -> Entity {
    let class_index = catalog.pick_class(rng.random::<f64>());
    let Some(class) = catalog.get(class_index) else {
        return Entity::inert();
    };

    let mut object = Object::new(&class.model);
    object.transform = Transform::at_depth(START_DISTANCE);

    let color = ((rng.random::<f64>() * NUM_COLORS as f64) as usize).min(NUM_COLORS - 1);
    let speed = (MIN_SPEED + rng.random::<f64>() * (MAX_SPEED - MIN_SPEED)) * class.speed_factor;
    let phase_x = rng.random::<f64>() * TAU;
    let phase_y = rng.random::<f64>() * TAU;
    let turn_x = (rng.random::<f64>() * MAX_TURN - 2.0 * MAX_TURN) * class.turn_factor;
    let turn_y = (rng.random::<f64>() * MAX_TURN - 2.0 * MAX_TURN) * class.turn_factor;
    let range = object.transform.translation.length();

    Entity::new(
        object,
        color,
        EntityState::Flying(Flight {
            class: class_index,
            speed,
            phase_x,
            phase_y,
            turn_x,
            turn_y,
            range,
            last_range: range,
            sounded: false,
        }),
    )
}

/// Break a ship into fragments, one per even-indexed face.
///
/// Each fragment starts where its face was, inherits the ship's color, and
/// drifts on roughly at the ship's speed with a random tumble. Returns the
/// number of fragments pushed into the pool.
pub fn shatter<R: Rng>(
    ship: &Entity,
    speed: f64,
    pool: &mut DebrisPool,
    rng: &mut R,
) -> usize {
    let mut count = 0;
    for face in (0..ship.object.faces().len()).step_by(2) {
        let Some(object) = Object::from_face(&ship.object, face) else {
            continue;
        };
        let mut spin_component = || rng.random::<f64>() * MAX_SPIN - 2.0 * MAX_SPIN;
        let spin = DVec3::new(spin_component(), spin_component(), spin_component());
        let mut scatter = || rng.random::<f64>() * speed / 2.0 - speed / 4.0;
        let velocity = DVec3::new(scatter(), scatter(), speed + scatter());

        pool.push(Entity::new(
            object,
            ship.color,
            EntityState::Debris(Drift {
                spin,
                velocity,
                ttl: DEBRIS_COUNT,
            }),
        ));
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_ship_ranges() {
        let catalog = ShipCatalog::standard().unwrap();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            let ship = spawn_ship(&catalog, &mut rng);
            assert_eq!(ship.depth(), START_DISTANCE);
            assert!(ship.color < NUM_COLORS);
            let EntityState::Flying(f) = ship.state else {
                panic!("spawned ship is not flying");
            };
            let class = catalog.get(f.class).unwrap();
            assert!(f.speed >= MIN_SPEED * class.speed_factor);
            assert!(f.speed < MAX_SPEED * class.speed_factor);
            assert!((0.0..TAU).contains(&f.phase_x));
            assert!((0.0..TAU).contains(&f.phase_y));
            assert!(f.turn_x <= -MAX_TURN * class.turn_factor);
            assert!(f.turn_x >= -2.0 * MAX_TURN * class.turn_factor);
            assert_eq!(f.range, -START_DISTANCE);
            assert!(!f.sounded);
            assert!(ship.object.shares_faces_with(&Object::new(&class.model)));
        }
    }

    #[test]
    fn test_spawn_covers_all_classes() {
        let catalog = ShipCatalog::standard().unwrap();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut seen = [0u32; 4];
        for _ in 0..400 {
            if let Some(c) = spawn_ship(&catalog, &mut rng).class() {
                seen[c] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n > 0));
        // Heavier weights show up more often
        assert!(seen[0] + seen[1] > seen[2] + seen[3]);
    }

    #[test]
    fn test_shatter_even_faces() {
        let catalog = ShipCatalog::standard().unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let ship = spawn_ship(&catalog, &mut rng);
        let faces = ship.object.faces().len();
        let mut pool = DebrisPool::new(MAX_DEBRIS);

        let made = shatter(&ship, 6.0, &mut pool, &mut rng);
        assert_eq!(made, faces.div_ceil(2));
        assert_eq!(pool.active_count(), made.min(MAX_DEBRIS));

        for (_, piece) in pool.iter_active() {
            assert_eq!(piece.color, ship.color);
            assert_eq!(piece.object.faces().len(), 2);
            assert_eq!(piece.object.transform, ship.object.transform);
            let EntityState::Debris(d) = piece.state else {
                panic!("fragment is not debris");
            };
            assert_eq!(d.ttl, DEBRIS_COUNT);
            assert!(d.velocity.x.abs() <= 1.5);
            assert!((4.5..=7.5).contains(&d.velocity.z));
            assert!(d.spin.max_element() <= -MAX_SPIN);
        }
    }
}
