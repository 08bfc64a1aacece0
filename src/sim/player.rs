//! Player state machine
//!
//! Variable-height jumping, the Small/Big size tiers, and per-frame animation
//! frame selection. Frame selection is evaluated after physics each frame and
//! resizes the bounding rect bottom-anchored, so the character's feet never
//! teleport when the sprite changes.
//!
//! Jump model: `try_jump` starts a jump from the ground at `jump_min` upward
//! speed, or grants a weaker mid-air impulse while falling (the "air
//! recovery", deliberately exploitable as a near-double-jump when timed at
//! the start of a fall). Holding the key accelerates the rise up to
//! `jump_max`; releasing early cuts the remaining upward speed.

use crate::assets::SpriteKind;
use crate::consts::*;
use crate::tuning::Tuning;

use super::state::Body;

/// Small/Big classification driving sprite dimensions and damage absorption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Small,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// The player: one kinematic body plus the full gameplay state the collision
/// engine mutates (lives, coins, points, size, immunity).
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub body: Body,
    pub size: SizeTier,
    pub facing: Facing,
    pub ducking: bool,
    pub jumping: bool,
    pub jump_held: bool,
    pub running: bool,
    pub moving: bool,
    pub immune: bool,
    pub alive: bool,
    pub lives: u32,
    pub coins: u32,
    pub points: u64,
    /// Sprite chosen by the last frame selection, drawn flipped when facing left
    pub sprite: SpriteKind,
    pub flip: bool,
    run_frame: usize,
    last_anim_flip_ms: f64,
}

impl Player {
    /// Spawn at the fixed session start position, grounded
    pub fn new(id: u32, tuning: &Tuning) -> Self {
        let (w, h) = PLAYER_SMALL_SIZE;
        let mut body = Body::new(SCREEN_WIDTH / 4.0, FLOOR_Y - h, w, h);
        body.grounded = true;
        Self {
            id,
            body,
            size: SizeTier::Small,
            facing: Facing::Right,
            ducking: false,
            jumping: false,
            jump_held: false,
            running: false,
            moving: false,
            immune: false,
            alive: true,
            lives: tuning.starting_lives,
            coins: 0,
            points: 0,
            sprite: SpriteKind::PlayerIdle,
            flip: false,
            run_frame: 0,
            last_anim_flip_ms: 0.0,
        }
    }

    /// Start a jump, or grant one mid-fall recovery impulse.
    /// Already rising: no-op.
    pub fn try_jump(&mut self, tuning: &Tuning) {
        if self.body.grounded {
            self.body.grounded = false;
            self.body.vel_y = -tuning.jump_min;
            self.jumping = true;
            self.jump_held = true;
        } else if self.body.vel_y > 0.0 {
            self.body.vel_y = -tuning.jump_min * tuning.air_impulse_factor;
            self.jumping = true;
            self.jump_held = true;
        }
    }

    /// Jump key released: cut the remaining rise for variable jump height
    pub fn end_jump_key(&mut self, tuning: &Tuning) {
        self.jump_held = false;
        if self.body.vel_y < 0.0 {
            self.body.vel_y *= tuning.jump_cut_factor;
        }
    }

    /// Per-frame rise boost while the jump key is held, capped at `jump_max`
    pub fn update_jump_height(&mut self, tuning: &Tuning) {
        if self.jumping && self.jump_held && self.body.vel_y < 0.0 {
            self.body.vel_y += tuning.jump_hold_accel;
            self.body.vel_y = self.body.vel_y.max(-tuning.jump_max);
        }
    }

    /// Gravity step; landing clears the jump flags
    pub fn apply_gravity(&mut self, tuning: &Tuning) {
        if self.body.apply_gravity(tuning.gravity, FLOOR_Y) {
            self.jumping = false;
            self.jump_held = false;
        }
    }

    /// Change size tier, compensating the vertical position by the standing
    /// height difference so the feet stay planted. Runs exactly once per
    /// transition; returns whether the tier actually changed (the caller
    /// re-selects the animation frame on change).
    pub fn set_size(&mut self, tier: SizeTier) -> bool {
        if self.size == tier {
            return false;
        }
        let delta = PLAYER_BIG_SIZE.1 - PLAYER_SMALL_SIZE.1;
        match tier {
            SizeTier::Big => self.body.translate(0.0, -delta),
            SizeTier::Small => self.body.translate(0.0, delta),
        }
        self.size = tier;
        true
    }

    /// Standing and duck target dimensions for the current size tier
    fn frame_dims(&self) -> ((f32, f32), (f32, f32)) {
        match self.size {
            SizeTier::Small => (PLAYER_SMALL_SIZE, PLAYER_SMALL_DUCK_SIZE),
            SizeTier::Big => (
                PLAYER_BIG_SIZE,
                (PLAYER_BIG_SIZE.0, PLAYER_BIG_SIZE.1 * BIG_DUCK_HEIGHT_FRACTION),
            ),
        }
    }

    /// Pick the current sprite and target dimensions from state.
    /// Priority: duck > airborne > run cycle > idle. Re-entering the grounded
    /// branch re-snaps the rect bottom to the floor line to eliminate drift.
    pub fn select_frame(&mut self, now_ms: f64, tuning: &Tuning) {
        let (stand, duck) = self.frame_dims();
        let flip = self.facing == Facing::Left;

        if self.ducking {
            self.set_frame(SpriteKind::PlayerDuck, duck, flip);
            self.body.snap_bottom(FLOOR_Y);
            return;
        }

        if !self.body.grounded {
            self.set_frame(SpriteKind::PlayerJump, stand, flip);
            return;
        }

        if self.moving {
            if now_ms - self.last_anim_flip_ms > tuning.run_anim_ms {
                self.run_frame = (self.run_frame + 1) % 2;
                self.last_anim_flip_ms = now_ms;
            }
            let sprite = if self.run_frame == 0 {
                SpriteKind::PlayerIdle
            } else {
                SpriteKind::PlayerRun
            };
            self.set_frame(sprite, stand, flip);
        } else {
            self.run_frame = 0;
            self.set_frame(SpriteKind::PlayerIdle, stand, flip);
        }

        self.body.snap_bottom(FLOOR_Y);
    }

    /// Swap the sprite and resize the rect bottom-anchored
    fn set_frame(&mut self, sprite: SpriteKind, (w, h): (f32, f32), flip: bool) {
        self.body.rect.resize_keep_bottom(w, h);
        self.body.pos.x = self.body.rect.x;
        self.body.pos.y = self.body.rect.y;
        self.sprite = sprite;
        self.flip = flip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(1, &tuning), tuning)
    }

    #[test]
    fn test_spawn_position_and_stats() {
        let (p, tuning) = player();
        assert_eq!(p.body.pos.x, SCREEN_WIDTH / 4.0);
        assert_eq!(p.body.rect.bottom(), FLOOR_Y);
        assert_eq!(p.lives, tuning.starting_lives);
        assert_eq!(p.coins, 0);
        assert_eq!(p.points, 0);
        assert_eq!(p.size, SizeTier::Small);
    }

    #[test]
    fn test_jump_from_ground() {
        let (mut p, tuning) = player();
        p.try_jump(&tuning);
        assert!(!p.body.grounded);
        assert!(p.jumping);
        assert!(p.jump_held);
        assert_eq!(p.body.vel_y, -tuning.jump_min);
    }

    #[test]
    fn test_air_recovery_impulse_while_falling() {
        let (mut p, tuning) = player();
        p.body.grounded = false;
        p.body.vel_y = 5.0; // falling
        p.try_jump(&tuning);
        assert_eq!(p.body.vel_y, -tuning.jump_min * tuning.air_impulse_factor);
        assert!(p.jumping);
    }

    #[test]
    fn test_jump_is_noop_while_rising() {
        let (mut p, tuning) = player();
        p.body.grounded = false;
        p.body.vel_y = -5.0;
        p.try_jump(&tuning);
        assert_eq!(p.body.vel_y, -5.0);
    }

    #[test]
    fn test_early_release_cuts_jump() {
        let (mut p, tuning) = player();
        p.try_jump(&tuning);
        p.end_jump_key(&tuning);
        assert!(!p.jump_held);
        assert_eq!(p.body.vel_y, -tuning.jump_min * tuning.jump_cut_factor);
    }

    #[test]
    fn test_held_jump_accelerates_up_to_cap() {
        let (mut p, tuning) = player();
        p.try_jump(&tuning);
        for _ in 0..100 {
            p.update_jump_height(&tuning);
        }
        assert_eq!(p.body.vel_y, -tuning.jump_max);
    }

    #[test]
    fn test_landing_clears_jump_flags() {
        let (mut p, tuning) = player();
        p.try_jump(&tuning);
        for _ in 0..200 {
            p.apply_gravity(&tuning);
        }
        assert!(p.body.grounded);
        assert!(!p.jumping);
        assert!(!p.jump_held);
        assert_eq!(p.body.rect.bottom(), FLOOR_Y);
    }

    #[test]
    fn test_growth_shrink_round_trip_keeps_feet_planted() {
        let (mut p, tuning) = player();
        let bottom = p.body.rect.bottom();
        let y0 = p.body.pos.y;

        assert!(p.set_size(SizeTier::Big));
        p.select_frame(0.0, &tuning);
        assert_eq!(p.body.rect.bottom(), bottom);
        assert_eq!(p.body.rect.h, PLAYER_BIG_SIZE.1);
        assert_eq!(p.body.pos.y, p.body.rect.y);

        assert!(p.set_size(SizeTier::Small));
        p.select_frame(0.0, &tuning);
        assert_eq!(p.body.rect.bottom(), bottom);
        assert_eq!(p.body.pos.y, y0);
    }

    #[test]
    fn test_set_size_same_tier_is_noop() {
        let (mut p, _) = player();
        let y = p.body.pos.y;
        assert!(!p.set_size(SizeTier::Small));
        assert_eq!(p.body.pos.y, y);
    }

    #[test]
    fn test_duck_takes_priority_and_pins_to_floor() {
        let (mut p, tuning) = player();
        p.moving = true;
        p.ducking = true;
        p.select_frame(0.0, &tuning);
        assert_eq!(p.sprite, SpriteKind::PlayerDuck);
        assert_eq!(p.body.rect.h, PLAYER_SMALL_DUCK_SIZE.1);
        assert_eq!(p.body.rect.bottom(), FLOOR_Y);
    }

    #[test]
    fn test_big_duck_height_is_fraction_of_big() {
        let (mut p, tuning) = player();
        p.set_size(SizeTier::Big);
        p.ducking = true;
        p.select_frame(0.0, &tuning);
        let expected = PLAYER_BIG_SIZE.1 * BIG_DUCK_HEIGHT_FRACTION;
        assert!((p.body.rect.h - expected).abs() < 1e-3);
    }

    #[test]
    fn test_airborne_uses_jump_sprite() {
        let (mut p, tuning) = player();
        p.try_jump(&tuning);
        p.select_frame(0.0, &tuning);
        assert_eq!(p.sprite, SpriteKind::PlayerJump);
    }

    #[test]
    fn test_run_cycle_alternates_on_interval() {
        let (mut p, tuning) = player();
        p.moving = true;
        p.select_frame(0.0, &tuning);
        let first = p.sprite;
        // Within the interval: no flip
        p.select_frame(tuning.run_anim_ms / 2.0, &tuning);
        assert_eq!(p.sprite, first);
        // Past the interval: flips to the other run frame
        p.select_frame(tuning.run_anim_ms + 1.0, &tuning);
        assert_ne!(p.sprite, first);
    }

    #[test]
    fn test_facing_left_sets_flip() {
        let (mut p, tuning) = player();
        p.facing = Facing::Left;
        p.select_frame(0.0, &tuning);
        assert!(p.flip);
    }

    #[test]
    fn test_idle_grounded_frames_never_drift() {
        let (mut p, tuning) = player();
        for i in 0..500 {
            p.select_frame(i as f64 * 16.0, &tuning);
            assert_eq!(p.body.rect.bottom(), FLOOR_Y);
            assert_eq!(p.body.pos.y, p.body.rect.y);
        }
    }
}
