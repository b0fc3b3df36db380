//! Attract mode
//!
//! One ship class at a time flies in, stops just short of the viewer and
//! rocks in place. Every `DEMO_COUNT` ticks the next class takes over.

use super::state::{Entity, EntityState, GameEvent, GamePhase, GameState, Showcase};
use crate::consts::*;
use crate::geometry::{DrawRef, Object, Transform};
use crate::wrap_angle;

/// Which class is on display and for how much longer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoReel {
    pub class: usize,
    pub counter: u32,
}

/// Enter attract mode from the first class
pub fn start(state: &mut GameState) {
    state.phase = GamePhase::Demo;
    state.demo.class = 0;
    for slot in state.ships.iter_mut().skip(1) {
        *slot = Entity::inert();
    }
    show_class(state);
    state.events.push(GameEvent::DemoStarted);
    log::info!("Attract mode");
}

/// Put the current reel class in slot 0 at the far spawn depth
fn show_class(state: &mut GameState) {
    let class = state.demo.class;
    let object = match state.catalog.get(class) {
        Some(c) => {
            let mut o = Object::new(&c.model);
            o.transform = Transform::at_depth(START_DISTANCE);
            o
        }
        None => Object::empty(),
    };
    let range = object.transform.translation.z.abs();
    if let Some(slot) = state.ships.first_mut() {
        *slot = Entity::new(
            object,
            class % NUM_COLORS,
            EntityState::Showcase(Showcase {
                class,
                pitch_rate: DEMO_PITCH_RATE,
                yaw_rate: DEMO_YAW_RATE,
                speed: MAX_SPEED,
                range,
                last_range: range,
            }),
        );
    }
    state.demo.counter = DEMO_COUNT;
}

/// Advance the showcase ship and redraw it as the only object
pub fn update(state: &mut GameState) {
    state.demo.counter = state.demo.counter.saturating_sub(1);
    if state.demo.counter == 0 {
        state.demo.class = (state.demo.class + 1) % state.catalog.len().max(1);
        show_class(state);
    }

    state.draw_list.clear();
    let Some(ship) = state.ships.first_mut() else {
        return;
    };
    let Entity {
        object,
        state: EntityState::Showcase(show),
        ..
    } = ship
    else {
        return;
    };

    let t = &mut object.transform;
    t.rotation.x += show.pitch_rate;
    if t.rotation.x.abs() > MAX_BANK {
        show.pitch_rate = -show.pitch_rate;
    }
    t.rotation.y = wrap_angle(t.rotation.y + show.yaw_rate);
    if t.translation.z < DEMO_DISTANCE {
        t.translation.z += show.speed;
    } else {
        show.speed = 0.0;
    }
    show.last_range = show.range;
    show.range = t.translation.z.abs();

    object.render_into(&state.viewport, &mut state.draw_list, DrawRef::Ship(0));
}
