//! Collision detection and resolution
//!
//! Runs once per frame after all entity movement, against the single active
//! player. Detection is plain AABB overlap; resolution is where every
//! gameplay-state mutation happens: growth, pickup scoring, immunity grants,
//! stomps, damage, and session death. Entities are only marked dead here;
//! the orchestrator compacts the collections at the end of the frame.

use super::player::SizeTier;
use super::state::{GameEvent, GamePhase, GameState, PickupKind, Status};

/// Resolve all player-vs-entity overlaps for this frame.
///
/// Enemy contact picks exactly one of three outcomes, checked in order:
/// 1. Stomp - the player is falling and its rect bottom, minus the fall
///    delta applied this frame, was at or above the enemy's vertical center.
///    The enemy dies and the player bounces at jump speed.
/// 2. Immune contact - the enemy dies, bonus points, no damage.
/// 3. Damage - Big shrinks to Small with an immunity grant; Small loses a
///    life (ending the session at zero), otherwise gains immunity. The enemy
///    is destroyed on contact in every damage case.
pub fn resolve(state: &mut GameState) {
    let now = state.clock_ms;
    let tuning = &state.tuning;
    let Some(player) = state.player.as_mut() else {
        return;
    };

    // Mushrooms and coins
    for pickup in state.pickups.iter_mut() {
        if pickup.status != Status::Alive || !player.body.rect.overlaps(&pickup.body.rect) {
            continue;
        }
        match pickup.kind {
            PickupKind::MushroomGrowth => {
                player.points += tuning.points_growth_mushroom;
                if player.set_size(SizeTier::Big) {
                    player.select_frame(now, tuning);
                }
            }
            PickupKind::MushroomLife => {
                player.lives += 1;
                player.points += tuning.points_life_mushroom;
                if player.set_size(SizeTier::Big) {
                    player.select_frame(now, tuning);
                }
            }
            PickupKind::Coin => {
                player.coins += 1;
                player.points += tuning.points_coin;
                if player.coins >= tuning.coins_per_life {
                    player.coins = 0;
                    player.lives += 1;
                    player.points += tuning.points_coin_bonus;
                }
            }
            // Stars live in the dedicated slot, never in this list
            PickupKind::Star => {}
        }
        pickup.status = Status::Dead;
    }

    // Star
    let star_hit = state
        .star
        .as_ref()
        .is_some_and(|s| s.status == Status::Alive && player.body.rect.overlaps(&s.body.rect));
    if star_hit {
        player.points += tuning.points_star;
        player.immune = true;
        state.immunity.insert(player.id, now);
        state.star = None;
    }

    // Enemies
    for enemy in state.enemies.iter_mut() {
        if enemy.status != Status::Alive || !player.body.rect.overlaps(&enemy.body.rect) {
            continue;
        }

        // Approximates "bottom was above the enemy's center before this
        // frame's fall" by subtracting the just-applied velocity; can
        // misclassify at high fall speeds, kept for game feel
        let falling = player.body.vel_y > 0.0;
        let pre_fall_bottom = player.body.rect.bottom() - player.body.vel_y;

        if falling && pre_fall_bottom <= enemy.body.rect.center_y() {
            enemy.status = Status::Dead;
            player.points += tuning.points_stomp;
            player.body.vel_y = -tuning.jump_min;
            player.body.grounded = false;
            player.jumping = true;
        } else if player.immune {
            enemy.status = Status::Dead;
            player.points += tuning.points_immune_kill;
        } else {
            if player.size == SizeTier::Big {
                if player.set_size(SizeTier::Small) {
                    player.select_frame(now, tuning);
                }
                player.immune = true;
                state.immunity.insert(player.id, now);
            } else {
                player.lives = player.lives.saturating_sub(1);
                if player.lives == 0 {
                    player.alive = false;
                    state.phase = GamePhase::GameOver;
                    state.events.push(GameEvent::SessionEnded);
                    log::info!("Session ended: out of lives ({} points)", player.points);
                } else {
                    player.immune = true;
                    state.immunity.insert(player.id, now);
                }
            }
            // Single-use hazard: the enemy that caused the hit is destroyed
            enemy.status = Status::Dead;
        }
    }
}
