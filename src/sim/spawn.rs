//! Time-gated random spawning
//!
//! Two independent generators, each re-armed with a fresh random delay after
//! it fires. Objects pick uniformly among the four pickup kinds; a star pick
//! while one is already active is silently skipped (the timer still resets).
//! Enemies respect both a concurrent cap and a lifetime cap: once the
//! lifetime total is reached, no more enemies ever spawn for the session.

use rand::Rng;

use crate::consts::*;

use super::state::{Enemy, GameState, Pickup, PickupKind, Status};

/// Object spawner: mushrooms, coins and stars entering at the right edge
pub fn spawn_objects(state: &mut GameState) {
    if state.clock_ms < state.next_object_spawn_ms {
        return;
    }
    let (min, max) = (
        state.tuning.object_spawn_min_ms,
        state.tuning.object_spawn_max_ms,
    );
    state.next_object_spawn_ms = state.clock_ms + state.rng.random_range(min..=max);

    let kind = match state.rng.random_range(0..4u32) {
        0 => PickupKind::MushroomGrowth,
        1 => PickupKind::MushroomLife,
        2 => PickupKind::Coin,
        _ => PickupKind::Star,
    };
    try_spawn_object(state, kind);
}

/// Place one object of the given kind. Star spawns are skipped while a star
/// is already active.
pub(crate) fn try_spawn_object(state: &mut GameState, kind: PickupKind) {
    let x = SCREEN_WIDTH + SPAWN_MARGIN_X;
    let y = match kind {
        PickupKind::MushroomGrowth | PickupKind::MushroomLife => FLOOR_Y - MUSHROOM_SIZE.1,
        PickupKind::Coin => {
            let (min, max) = COIN_HEIGHT_RANGE;
            FLOOR_Y - state.rng.random_range(min..=max)
        }
        PickupKind::Star => {
            if state.star.is_some() {
                return;
            }
            let (min, max) = STAR_HEIGHT_RANGE;
            FLOOR_Y - state.rng.random_range(min..=max)
        }
    };

    let id = state.next_entity_id();
    let pickup = Pickup::new(id, kind, x, y);
    log::debug!("spawned {kind:?} #{id} at y={y:.0}");
    if kind == PickupKind::Star {
        state.star = Some(pickup);
    } else {
        state.pickups.push(pickup);
    }
}

/// Enemy spawner, gated by the concurrent and lifetime caps. The delay only
/// re-arms when a spawn actually fires, so a cap-blocked spawner fires as
/// soon as a slot frees up.
pub fn spawn_enemies(state: &mut GameState) {
    if state.clock_ms < state.next_enemy_spawn_ms {
        return;
    }
    let alive = state
        .enemies
        .iter()
        .filter(|e| e.status == Status::Alive)
        .count();
    if alive >= state.tuning.max_enemies_alive
        || state.enemies_spawned_total >= state.tuning.max_enemies_total
    {
        return;
    }

    let (min, max) = (
        state.tuning.enemy_spawn_min_ms,
        state.tuning.enemy_spawn_max_ms,
    );
    state.next_enemy_spawn_ms = state.clock_ms + state.rng.random_range(min..=max);

    let id = state.next_entity_id();
    let x = SCREEN_WIDTH + SPAWN_MARGIN_X;
    let y = FLOOR_Y - ENEMY_SIZE.1;
    let vel_x = -state.tuning.enemy_speed;
    state.enemies.push(Enemy::new(id, x, y, vel_x));
    state.enemies_spawned_total += 1;
    log::debug!(
        "spawned enemy #{id} ({}/{} lifetime)",
        state.enemies_spawned_total,
        state.tuning.max_enemies_total
    );
}
