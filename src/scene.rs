//! Declarative frame description for the render collaborator
//!
//! The sim never draws; each frame the host asks for a `Frame`, a flat list
//! of draw commands in painter order plus the HUD numbers. The renderer
//! scales each sprite to the command's destination rectangle and flips
//! horizontally when asked, nothing else.

use crate::assets::{Sprite, SpriteKind, SpriteStore};
use crate::consts::*;
use crate::sim::{GamePhase, GameState, Rect, SizeTier};

/// One sprite blit: scale to `dest`, mirror horizontally when `flip_x`
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand {
    pub sprite: Sprite,
    pub dest: Rect,
    pub flip_x: bool,
}

/// Session numbers the host renders as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub lives: u32,
    pub coins: u32,
    pub points: u64,
    pub size: SizeTier,
    pub immune: bool,
}

/// Everything needed to render one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub phase: GamePhase,
    /// Painter-ordered: pickups, star, enemies, player last
    pub commands: Vec<DrawCommand>,
    /// Present only while a session is on screen
    pub hud: Option<Hud>,
}

/// Whether an immune player is visible this frame. The player is hidden for
/// the first half of every flicker window, starting hidden at the grant
/// instant.
fn immune_visible(now_ms: f64, granted_ms: f64) -> bool {
    let elapsed = now_ms - granted_ms;
    elapsed % IMMUNE_FLICKER_MS >= IMMUNE_FLICKER_MS / 2.0
}

/// Build the draw list and HUD for the current state
pub fn build_frame(state: &GameState, sprites: &SpriteStore) -> Frame {
    let mut commands = Vec::new();
    let mut hud = None;

    if state.phase != GamePhase::Menu {
        for pickup in &state.pickups {
            commands.push(DrawCommand {
                sprite: sprites.resolve(sprite_for_pickup(pickup.kind)),
                dest: pickup.body.rect,
                flip_x: false,
            });
        }
        if let Some(star) = &state.star {
            commands.push(DrawCommand {
                sprite: sprites.resolve(SpriteKind::Star),
                dest: star.body.rect,
                flip_x: false,
            });
        }
        for enemy in &state.enemies {
            commands.push(DrawCommand {
                sprite: sprites.resolve(SpriteKind::Enemy),
                dest: enemy.body.rect,
                flip_x: false,
            });
        }
        if let Some(player) = &state.player {
            let visible = match state.immunity.get(&player.id) {
                Some(&granted) if player.immune => immune_visible(state.clock_ms, granted),
                _ => true,
            };
            if visible {
                commands.push(DrawCommand {
                    sprite: sprites.resolve(player.sprite),
                    dest: player.body.rect,
                    flip_x: player.flip,
                });
            }
            hud = Some(Hud {
                lives: player.lives,
                coins: player.coins,
                points: player.points,
                size: player.size,
                immune: player.immune,
            });
        }
    }

    Frame {
        phase: state.phase,
        commands,
        hud,
    }
}

fn sprite_for_pickup(kind: crate::sim::PickupKind) -> SpriteKind {
    use crate::sim::PickupKind;
    match kind {
        PickupKind::MushroomGrowth => SpriteKind::MushroomGrowth,
        PickupKind::MushroomLife => SpriteKind::MushroomLife,
        PickupKind::Coin => SpriteKind::Coin,
        PickupKind::Star => SpriteKind::Star,
    }
}
