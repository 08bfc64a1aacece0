//! Frame orchestrator
//!
//! One `tick` call advances the whole simulation by one frame. The host owns
//! the real clock and hands in elapsed milliseconds; inside a tick everything
//! reads the session clock, so a run is fully reproducible from the seed, the
//! input script, and the frame times.

use crate::consts::*;

use super::collision;
use super::spawn;
use super::state::{GamePhase, GameState, Status};

/// Edge-and-level input sample for one frame. Directional and modifier keys
/// are level (held) state; `jump_pressed`/`jump_released`/`start`/`restart`
/// are one-shot edges the host raises for the frame they occur in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub run: bool,
    pub duck: bool,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub start: bool,
    pub restart: bool,
}

/// Advance the simulation by one frame.
///
/// In the menu and game-over phases only the start/restart edges are
/// considered and the clock does not advance. During play the frame runs a
/// fixed pipeline: player input and physics, animation frame selection,
/// spawners, entity movement, off-screen pruning, collision resolution,
/// immunity decay, then compaction of everything the collision engine killed.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f64) {
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.start_session();
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                state.start_session();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.clock_ms += elapsed_ms;
    let now = state.clock_ms;

    if let Some(player) = state.player.as_mut() {
        let tuning = &state.tuning;

        player.running = input.run;
        player.ducking = input.duck;
        if input.jump_pressed {
            player.try_jump(tuning);
        }
        if input.jump_released {
            player.end_jump_key(tuning);
        }

        // Ducking suppresses horizontal movement; right wins when both
        // directions are held
        player.moving = false;
        if !player.ducking {
            let speed = tuning.walk_speed
                * if player.running {
                    tuning.run_multiplier
                } else {
                    1.0
                };
            if input.right {
                player.facing = super::player::Facing::Right;
                player.body.translate(speed, 0.0);
                player.moving = true;
            } else if input.left {
                player.facing = super::player::Facing::Left;
                player.body.translate(-speed, 0.0);
                player.moving = true;
            }
        }

        player.update_jump_height(tuning);
        player.apply_gravity(tuning);

        let max_x = SCREEN_WIDTH - player.body.rect.w;
        let clamped = player.body.pos.x.clamp(0.0, max_x);
        if clamped != player.body.pos.x {
            player.body.set_x(clamped);
        }

        player.select_frame(now, tuning);
    }

    spawn::spawn_objects(state);
    spawn::spawn_enemies(state);

    let tuning = &state.tuning;
    for pickup in state.pickups.iter_mut() {
        pickup.update(tuning);
    }
    if let Some(star) = state.star.as_mut() {
        star.update(tuning);
    }
    for enemy in state.enemies.iter_mut() {
        enemy.update(tuning);
    }

    prune_offscreen(state);
    collision::resolve(state);
    decay_immunity(state);

    // End-of-frame compaction of what collision marked dead
    state.pickups.retain(|p| p.status == Status::Alive);
    state.enemies.retain(|e| e.status == Status::Alive);
    if state
        .star
        .as_ref()
        .is_some_and(|s| s.status != Status::Alive)
    {
        state.star = None;
    }
}

/// Drop entities fully past the left viewport edge
fn prune_offscreen(state: &mut GameState) {
    for pickup in state.pickups.iter_mut() {
        if pickup.status == Status::Alive && pickup.off_screen() {
            pickup.status = Status::Despawned;
        }
    }
    for enemy in state.enemies.iter_mut() {
        if enemy.status == Status::Alive && enemy.body.rect.right() < 0.0 {
            enemy.status = Status::Despawned;
        }
    }
    if state.star.as_ref().is_some_and(|s| s.off_screen()) {
        state.star = None;
    }
    state.pickups.retain(|p| p.status == Status::Alive);
    state.enemies.retain(|e| e.status == Status::Alive);
}

/// Lazy expiry: grants are stored as (id, grant time) and checked against the
/// session clock each frame. A grant expires once a full window has passed.
fn decay_immunity(state: &mut GameState) {
    let now = state.clock_ms;
    let window = state.tuning.immunity_ms;
    let expired: Vec<u32> = state
        .immunity
        .iter()
        .filter(|&(_, &granted)| now - granted >= window)
        .map(|(&id, _)| id)
        .collect();
    for id in expired {
        state.immunity.remove(&id);
        if let Some(player) = state.player.as_mut() {
            if player.id == id {
                player.immune = false;
                log::debug!("immunity expired at {now:.0}ms");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteKind;
    use crate::sim::player::SizeTier;
    use crate::sim::state::{Enemy, GameEvent, Pickup, PickupKind};

    const FRAME_MS: f64 = 16.0;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        state
    }

    fn push_enemy_at_player(state: &mut GameState) {
        let x = state.player.as_ref().unwrap().body.pos.x;
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, x, FLOOR_Y - ENEMY_SIZE.1, -2.0));
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.in_menu());
        assert!(state.player.is_none());
        assert_eq!(state.clock_ms, 0.0);
    }

    #[test]
    fn test_start_edge_begins_session() {
        let mut state = playing(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.player.is_some());
        assert!(state.take_events().contains(&GameEvent::SessionStarted));
    }

    #[test]
    fn test_restart_after_game_over_resets_the_session() {
        let mut state = playing(1);
        state.player.as_mut().unwrap().lives = 1;
        push_enemy_at_player(&mut state);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.is_game_over());

        // Non-restart input is ignored in game over
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        assert!(state.is_game_over());

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.lives, state.tuning.starting_lives);
        assert_eq!(player.points, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.clock_ms, 0.0);
    }

    #[test]
    fn test_walk_and_run_speeds() {
        let mut state = playing(1);
        let x0 = state.player.as_ref().unwrap().body.pos.x;
        tick(
            &mut state,
            &TickInput {
                right: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        let x1 = state.player.as_ref().unwrap().body.pos.x;
        assert_eq!(x1 - x0, state.tuning.walk_speed);

        tick(
            &mut state,
            &TickInput {
                right: true,
                run: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        let x2 = state.player.as_ref().unwrap().body.pos.x;
        assert_eq!(x2 - x1, state.tuning.walk_speed * state.tuning.run_multiplier);
    }

    #[test]
    fn test_right_wins_when_both_directions_held() {
        let mut state = playing(1);
        let x0 = state.player.as_ref().unwrap().body.pos.x;
        tick(
            &mut state,
            &TickInput {
                left: true,
                right: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        let player = state.player.as_ref().unwrap();
        assert!(player.body.pos.x > x0);
        assert_eq!(player.facing, crate::sim::Facing::Right);
    }

    #[test]
    fn test_duck_suppresses_movement() {
        let mut state = playing(1);
        let x0 = state.player.as_ref().unwrap().body.pos.x;
        tick(
            &mut state,
            &TickInput {
                right: true,
                duck: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.body.pos.x, x0);
        assert!(!player.moving);
        assert_eq!(player.sprite, SpriteKind::PlayerDuck);
    }

    #[test]
    fn test_viewport_clamp_both_edges() {
        let mut state = playing(1);
        let left = TickInput {
            left: true,
            run: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &left, FRAME_MS);
        }
        assert_eq!(state.player.as_ref().unwrap().body.pos.x, 0.0);

        let right = TickInput {
            right: true,
            run: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &right, FRAME_MS);
        }
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.body.pos.x, SCREEN_WIDTH - player.body.rect.w);
    }

    #[test]
    fn test_jump_arc_returns_to_floor() {
        let mut state = playing(1);
        tick(
            &mut state,
            &TickInput {
                jump_pressed: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        assert!(!state.player.as_ref().unwrap().body.grounded);
        assert_eq!(state.player.as_ref().unwrap().sprite, SpriteKind::PlayerJump);

        // Holding the key sustains the rise, so release it before falling
        tick(
            &mut state,
            &TickInput {
                jump_released: true,
                ..Default::default()
            },
            FRAME_MS,
        );

        let mut landed = false;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
            if state.player.as_ref().unwrap().body.grounded {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(state.player.as_ref().unwrap().body.rect.bottom(), FLOOR_Y);
    }

    #[test]
    fn test_offscreen_pickup_and_star_pruned() {
        let mut state = playing(1);
        let id = state.next_entity_id();
        state
            .pickups
            .push(Pickup::new(id, PickupKind::Coin, -100.0, 400.0));
        let id = state.next_entity_id();
        state.star = Some(Pickup::new(id, PickupKind::Star, -100.0, 400.0));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.pickups.is_empty());
        assert!(state.star.is_none());
    }

    #[test]
    fn test_immunity_expires_after_full_window() {
        let mut state = playing(1);
        let id = {
            let player = state.player.as_mut().unwrap();
            player.immune = true;
            player.id
        };
        let granted = state.clock_ms;
        state.immunity.insert(id, granted);

        // One millisecond short of the window: still immune
        let immunity_ms = state.tuning.immunity_ms;
        tick(&mut state, &TickInput::default(), immunity_ms - 1.0);
        assert!(state.player.as_ref().unwrap().immune);

        // Crossing the window boundary ends it
        tick(&mut state, &TickInput::default(), 1.0);
        assert!(!state.player.as_ref().unwrap().immune);
        assert!(!state.immunity.contains_key(&id));
    }

    #[test]
    fn test_full_session_scenario() {
        let mut state = playing(5);
        let player_x = state.player.as_ref().unwrap().body.pos.x;

        // A growth mushroom dropped onto the player
        let id = state.next_entity_id();
        state.pickups.push(Pickup::new(
            id,
            PickupKind::MushroomGrowth,
            player_x,
            FLOOR_Y - MUSHROOM_SIZE.1,
        ));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        {
            let player = state.player.as_ref().unwrap();
            assert_eq!(player.size, SizeTier::Big);
            assert_eq!(player.points, 100);
            assert_eq!(player.body.rect.bottom(), FLOOR_Y);
            assert!(state.pickups.is_empty());
        }

        // Grounded enemy contact: Big absorbs the hit and shrinks
        push_enemy_at_player(&mut state);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        {
            let player = state.player.as_ref().unwrap();
            assert_eq!(player.size, SizeTier::Small);
            assert_eq!(player.lives, 3);
            assert_eq!(player.points, 100);
            assert!(player.immune);
            assert_eq!(player.body.rect.bottom(), FLOOR_Y);
            assert!(state.enemies.is_empty());
        }

        // Wait out the immunity window
        let immunity_ms = state.tuning.immunity_ms;
        tick(&mut state, &TickInput::default(), immunity_ms + 1.0);
        assert!(!state.player.as_ref().unwrap().immune);

        // The next hit costs a life
        push_enemy_at_player(&mut state);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_same_seed_same_script_same_run() {
        let script = |state: &mut GameState| {
            tick(
                state,
                &TickInput {
                    start: true,
                    ..Default::default()
                },
                FRAME_MS,
            );
            for i in 0..2_000u32 {
                let input = TickInput {
                    right: i % 3 != 0,
                    left: i % 7 == 0,
                    run: i % 5 == 0,
                    jump_pressed: i % 60 == 0,
                    jump_released: i % 60 == 20,
                    ..Default::default()
                };
                tick(state, &input, FRAME_MS);
            }
        };

        let mut a = GameState::new(1234);
        let mut b = GameState::new(1234);
        script(&mut a);
        script(&mut b);

        assert_eq!(a.clock_ms, b.clock_ms);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.pickups.len(), b.pickups.len());
        let (pa, pb) = (a.player.as_ref().unwrap(), b.player.as_ref().unwrap());
        assert_eq!(pa.body.pos, pb.body.pos);
        assert_eq!(pa.points, pb.points);
        assert_eq!(pa.lives, pb.lives);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let run = |seed: u64| {
            let mut state = playing(seed);
            for _ in 0..1_000 {
                tick(&mut state, &TickInput::default(), FRAME_MS);
            }
            (state.next_object_spawn_ms, state.next_enemy_spawn_ms)
        };
        assert_ne!(run(1), run(2));
    }
}
