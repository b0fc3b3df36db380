//! Fixed timestep simulation tick
//!
//! One call advances every ship and fragment, rebuilds the draw list, and
//! resolves the aim point against it. Nothing here touches a clock or an
//! output device; the host feeds input and reads back state and events.

use glam::{DVec3, IVec2};
use rand::Rng;

use super::demo;
use super::spawn::{shatter, spawn_ship};
use super::state::{Entity, EntityState, Explosion, GameEvent, GamePhase, GameState};
use super::targeting::find_target;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::geometry::DrawRef;
use crate::wrap_angle;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Aim point in screen pixels, if the pointer moved
    pub aim: Option<IVec2>,
    /// Fire button held this tick
    pub fire: bool,
    /// Start a new game
    pub start: bool,
    /// Pause toggle
    pub toggle_pause: bool,
    /// Sound toggle
    pub toggle_sound: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    if let Some(aim) = input.aim {
        state.aim = aim;
    }

    if input.toggle_sound {
        if state.sound_on {
            state.events.push(GameEvent::Silence);
        }
        state.sound_on = !state.sound_on;
        log::debug!("Sound {}", if state.sound_on { "on" } else { "off" });
    }
    if input.toggle_pause {
        if !state.paused && state.sound_on {
            state.events.push(GameEvent::Silence);
        }
        state.paused = !state.paused;
        log::debug!("Paused: {}", state.paused);
    }

    // Fire in attract mode doubles as start
    let wants_start = input.start || (input.fire && state.phase == GamePhase::Demo);
    let mut started = false;
    if wants_start && state.phase != GamePhase::Playing {
        if state.assets_ready {
            state.start_game();
            started = true;
        } else {
            log::debug!("Start ignored: assets still loading");
        }
    }

    let firing = input.fire && !started && !input.toggle_pause && !state.paused && state.phase == GamePhase::Playing;

    if !state.paused {
        match state.phase {
            GamePhase::Playing | GamePhase::Ending => {
                state.draw_list.clear();
                state.stars.update(&mut state.rng);
                update_ships(state);
                update_debris(state);
                state.blast_counter = state.blast_counter.saturating_sub(1);

                if state.phase == GamePhase::Ending {
                    state.end_counter = state.end_counter.saturating_sub(1);
                    if state.end_counter == 0 {
                        demo::start(state);
                        demo::update(state);
                    }
                }
            }
            GamePhase::Demo => demo::update(state),
        }
        state.time_ticks += 1;
    }

    resolve_aim(state, firing);
}

/// Hit-test the aim point and apply a shot
fn resolve_aim(state: &mut GameState, firing: bool) {
    state.target = find_target(&state.draw_list, &state.ships, state.aim, state.frame_ms);

    if firing {
        state.cue(SoundCue::Fire);
        if let Some(target) = state.target {
            if let Some(ship) = state.ships.get_mut(target.slot) {
                if let EntityState::Flying(flight) = ship.state {
                    ship.state = EntityState::Exploding(Explosion {
                        flight,
                        countdown: EXPLODE_COUNT,
                    });
                    log::debug!("Hit slot {} at range {:.0}", target.slot, target.range);
                }
            }
        }
    }

    if state.target.is_some()
        && state.phase != GamePhase::Ending
        && state.assets_ready
        && !state.paused
    {
        state.cue(SoundCue::TargetLock);
    }
}

fn update_ships(state: &mut GameState) {
    for slot in 0..state.ships.len() {
        match state.ships[slot].state {
            EntityState::Exploding(explosion) => update_explosion(state, slot, explosion),
            EntityState::Flying(_) => fly(state, slot),
            EntityState::Inert | EntityState::Showcase(_) | EntityState::Debris(_) => {
                state.ships[slot].object.render_into(
                    &state.viewport,
                    &mut state.draw_list,
                    DrawRef::Ship(slot),
                );
            }
        }
    }
}

fn update_explosion(state: &mut GameState, slot: usize, mut explosion: Explosion) {
    if explosion.countdown == EXPLODE_COUNT {
        state.cue(SoundCue::Explosion);
        let pieces = shatter(
            &state.ships[slot],
            explosion.flight.speed,
            &mut state.debris,
            &mut state.rng,
        );
        let class = explosion.flight.class;
        let points = state.catalog.get(class).map_or(0, |c| c.points);
        state.score += points;
        state.high_score = state.high_score.max(state.score);
        state.events.push(GameEvent::ShipDestroyed {
            slot,
            class,
            points,
        });
        log::debug!("Slot {} destroyed: +{} ({} fragments)", slot, points, pieces);
    }

    explosion.countdown = explosion.countdown.saturating_sub(1);
    if explosion.countdown == 0 {
        state.ships[slot] = spawn_ship(&state.catalog, &mut state.rng);
    } else {
        state.ships[slot].state = EntityState::Exploding(explosion);
    }
}

fn fly(state: &mut GameState, slot: usize) {
    let ship = &mut state.ships[slot];
    let EntityState::Flying(mut flight) = ship.state else {
        return;
    };

    flight.phase_x = wrap_angle(flight.phase_x + flight.turn_x);
    flight.phase_y = wrap_angle(flight.phase_y + flight.turn_y);

    let t = &mut ship.object.transform;
    t.translation.x = MAX_HORIZONTAL * flight.phase_x.sin();
    t.translation.y = MAX_VERTICAL * flight.phase_y.sin();
    t.rotation.x = -flight.phase_y.sin() * MAX_BANK;
    t.rotation.z = flight.phase_x.sin() * MAX_BANK;
    t.translation.z += flight.speed;
    flight.last_range = flight.range;
    flight.range = t.translation.length();

    let z = t.translation.z;
    let proximity = !flight.sounded && z > SOUND_DISTANCE;
    if proximity {
        flight.sounded = true;
    }
    ship.state = EntityState::Flying(flight);

    if proximity {
        state.cue(SoundCue::Proximity);
    }

    if z > END_DISTANCE {
        if state.phase != GamePhase::Ending && state.rng.random::<f64>() < HIT_CHANCE {
            let damage = state.catalog.get(flight.class).map_or(0, |c| c.damage);
            take_hit(state, damage);
        }
        state.ships[slot] = if state.phase == GamePhase::Playing {
            spawn_ship(&state.catalog, &mut state.rng)
        } else {
            Entity::inert()
        };
    }

    state.ships[slot]
        .object
        .render_into(&state.viewport, &mut state.draw_list, DrawRef::Ship(slot));
}

fn take_hit(state: &mut GameState, damage: i32) {
    state.cue(SoundCue::HitTaken);
    state.shields -= damage;
    state.blast_counter = BLAST_COUNT;
    // Running out exactly still leaves the player alive
    let exhausted = state.shields < 0;
    state.shields = state.shields.max(0);
    state.events.push(GameEvent::ShieldHit {
        damage,
        remaining: state.shields,
    });
    log::debug!("Shield hit for {}, {} left", damage, state.shields);
    if exhausted {
        state.end_game();
    }
}

fn update_debris(state: &mut GameState) {
    let mut impacts = 0;
    for i in 0..state.debris.capacity() {
        let Some(slot) = state.debris.slot_mut(i) else {
            continue;
        };
        let retire = match slot {
            Some(piece) => match &mut piece.state {
                EntityState::Debris(drift) => {
                    let t = &mut piece.object.transform;
                    t.rotation = DVec3::new(
                        wrap_angle(t.rotation.x + drift.spin.x),
                        wrap_angle(t.rotation.y + drift.spin.y),
                        wrap_angle(t.rotation.z + drift.spin.z),
                    );
                    t.translation += drift.velocity;
                    let position = t.translation;

                    let too_close = position.z > END_DISTANCE;
                    if too_close {
                        if position.x.abs() < MAGNIFICATION / 2.0
                            && position.y.abs() < MAGNIFICATION / 2.0
                        {
                            impacts += 1;
                        }
                    } else {
                        piece.object.render_into(
                            &state.viewport,
                            &mut state.draw_list,
                            DrawRef::Debris(i),
                        );
                    }

                    drift.ttl = drift.ttl.saturating_sub(1);
                    too_close || drift.ttl == 0
                }
                _ => true,
            },
            None => false,
        };
        if retire {
            *slot = None;
        }
    }

    for _ in 0..impacts {
        state.cue(SoundCue::DebrisImpact);
    }
}
