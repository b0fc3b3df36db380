//! Hit testing the aim point against the frame's draw list

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::state::Entity;
use crate::geometry::{DrawList, DrawRef};

/// The ship under the aim point and its readout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Ship slot
    pub slot: usize,
    /// Distance from the viewer
    pub range: f64,
    /// Approach speed in units per second (positive while closing)
    pub closing_speed: f64,
}

/// Find the nearest ship whose visible faces contain `aim`.
///
/// The draw list runs farthest first, so the last ship that matches is the
/// one in front. Debris never blocks or takes a target.
pub fn find_target(
    draw_list: &DrawList,
    ships: &[Entity],
    aim: IVec2,
    frame_ms: u64,
) -> Option<Target> {
    let mut found = None;
    for entry in draw_list.iter() {
        let DrawRef::Ship(slot) = entry.target else {
            continue;
        };
        let Some(ship) = ships.get(slot) else {
            continue;
        };
        let hit = ship
            .object
            .rendered()
            .iter()
            .any(|face| face.polygon.contains(aim));
        if !hit {
            continue;
        }
        if let Some((range, last_range)) = ship.telemetry() {
            found = Some(Target {
                slot,
                range,
                closing_speed: (last_range - range) * 1000.0 / frame_ms.max(1) as f64,
            });
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Model, Object, Transform, Viewport};
    use crate::sim::state::{EntityState, Flight};
    use glam::DVec3;

    fn viewport() -> Viewport {
        Viewport {
            viewpoint: DVec3::new(0.0, 0.0, 10.0),
            magnification: 100.0,
            x_offset: 300,
            y_offset: 200,
        }
    }

    fn plate() -> Model {
        Model::from_tables(
            &[
                [-10.0, -10.0, 0.0],
                [10.0, -10.0, 0.0],
                [10.0, 10.0, 0.0],
                [-10.0, 10.0, 0.0],
            ],
            &[&[0, 1, 2, 3]],
        )
        .unwrap()
    }

    fn flying(z: f64, range: f64, last_range: f64) -> Entity {
        let mut object = Object::new(&plate());
        object.transform = Transform::at_depth(z);
        Entity::new(
            object,
            0,
            EntityState::Flying(Flight {
                class: 0,
                speed: 1.0,
                phase_x: 0.0,
                phase_y: 0.0,
                turn_x: 0.0,
                turn_y: 0.0,
                range,
                last_range,
                sounded: false,
            }),
        )
    }

    fn render_all(ships: &mut [Entity]) -> DrawList {
        let mut list = DrawList::new();
        for (i, ship) in ships.iter_mut().enumerate() {
            ship.object
                .render_into(&viewport(), &mut list, DrawRef::Ship(i));
        }
        list
    }

    #[test]
    fn test_nearest_overlapping_ship_wins() {
        // Slot 0 is nearer but inserted first; draw order puts it last
        let mut ships = vec![flying(-50.0, 50.0, 60.0), flying(-200.0, 200.0, 205.0)];
        let list = render_all(&mut ships);
        let center = IVec2::new(300, 200);

        let target = find_target(&list, &ships, center, 50).unwrap();
        assert_eq!(target.slot, 0);
        assert_eq!(target.range, 50.0);
        assert!((target.closing_speed - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_miss_and_debris_ignored() {
        let mut ships = vec![flying(-200.0, 200.0, 200.0)];
        let mut list = render_all(&mut ships);
        assert!(find_target(&list, &ships, IVec2::new(10, 10), 50).is_none());

        // A debris entry pointing at the same index never targets
        list.clear();
        list.insert(DrawRef::Debris(0), -100.0);
        assert!(find_target(&list, &ships, IVec2::new(300, 200), 50).is_none());
    }

    #[test]
    fn test_inert_slot_never_targeted() {
        let mut ships = vec![Entity::inert()];
        let list = render_all(&mut ships);
        assert!(find_target(&list, &ships, IVec2::new(300, 200), 50).is_none());
    }
}
