//! Game state and core simulation types
//!
//! The session state is an explicit struct handed to `tick` by reference:
//! no globals, all entity collections owned in one place, all timers sampled
//! against the session clock the orchestrator advances.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::player::Player;
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Entity lifecycle status
///
/// Collision marks `Dead`, off-screen pruning marks `Despawned`; dense
/// collections are compacted only at frame boundaries so indices stay stable
/// while the collision engine iterates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Alive,
    Dead,
    Despawned,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title menu, no session running
    Menu,
    /// Active gameplay
    Playing,
    /// Session ended, waiting for restart
    GameOver,
}

/// Discrete events for the audio collaborator, drained by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    SessionStarted,
    SessionEnded,
}

/// A kinematic body: position, bounding rectangle, vertical velocity,
/// grounded flag. Position and rectangle move together, always.
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    pub rect: Rect,
    pub vel_y: f32,
    pub grounded: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            rect: Rect::new(x, y, w, h),
            vel_y: 0.0,
            grounded: false,
        }
    }

    /// Translate position and rectangle by the same delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pos.x += dx;
        self.pos.y += dy;
        self.rect.x = self.pos.x;
        self.rect.y = self.pos.y;
    }

    /// Move the body so its rect bottom sits exactly on `bottom`
    pub fn snap_bottom(&mut self, bottom: f32) {
        self.rect.set_bottom(bottom);
        self.pos.y = self.rect.y;
    }

    /// Set the horizontal position directly (used for viewport clamping)
    pub fn set_x(&mut self, x: f32) {
        self.pos.x = x;
        self.rect.x = x;
    }

    /// Per-frame gravity step: constant acceleration per tick, then clamp the
    /// rect bottom to the floor line. Returns true if the body landed during
    /// this call.
    pub fn apply_gravity(&mut self, gravity: f32, floor_y: f32) -> bool {
        if self.grounded {
            return false;
        }
        self.vel_y += gravity;
        self.translate(0.0, self.vel_y);
        if self.rect.bottom() >= floor_y {
            self.snap_bottom(floor_y);
            self.vel_y = 0.0;
            self.grounded = true;
            return true;
        }
        false
    }
}

/// A patrolling enemy: fixed horizontal velocity plus gravity, nothing more.
/// Defeat and removal are decided by the collision engine.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub vel_x: f32,
    pub status: Status,
}

impl Enemy {
    pub fn new(id: u32, x: f32, y: f32, vel_x: f32) -> Self {
        Self {
            id,
            body: Body::new(x, y, ENEMY_SIZE.0, ENEMY_SIZE.1),
            vel_x,
            status: Status::Alive,
        }
    }

    /// Patrol step: horizontal move, then fall until grounded
    pub fn update(&mut self, tuning: &Tuning) {
        self.body.translate(self.vel_x, 0.0);
        self.body.apply_gravity(tuning.gravity, FLOOR_Y);
    }
}

/// Pickup categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    MushroomGrowth,
    MushroomLife,
    Coin,
    Star,
}

impl PickupKind {
    pub fn size(self) -> (f32, f32) {
        match self {
            PickupKind::MushroomGrowth | PickupKind::MushroomLife => MUSHROOM_SIZE,
            PickupKind::Coin => COIN_SIZE,
            PickupKind::Star => STAR_SIZE,
        }
    }
}

/// A collectible drifting left across the viewport
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub body: Body,
    pub status: Status,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, x: f32, y: f32) -> Self {
        let (w, h) = kind.size();
        Self {
            id,
            kind,
            body: Body::new(x, y, w, h),
            status: Status::Alive,
        }
    }

    /// Constant leftward drift
    pub fn update(&mut self, tuning: &Tuning) {
        self.body.translate(-tuning.object_speed, 0.0);
    }

    /// Fully past the left viewport edge
    pub fn off_screen(&self) -> bool {
        self.body.rect.right() < 0.0
    }
}

/// Complete session state
///
/// Owned exclusively by the frame orchestrator; mutated only inside a single
/// `tick` call. The clock advances only by the elapsed time the host passes
/// in, so runs are reproducible from (seed, input script, frame times).
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (spawn delays, kinds, heights)
    pub rng: Pcg32,
    /// Balance parameters
    pub tuning: Tuning,
    /// Monotonic session clock, milliseconds
    pub clock_ms: f64,
    /// Current phase
    pub phase: GamePhase,
    /// The single active player (None until the first session starts)
    pub player: Option<Player>,
    /// Active enemies
    pub enemies: Vec<Enemy>,
    /// Active mushrooms and coins
    pub pickups: Vec<Pickup>,
    /// At most one star at a time
    pub star: Option<Pickup>,
    /// Clock deadline for the next object spawn
    pub next_object_spawn_ms: f64,
    /// Clock deadline for the next enemy spawn
    pub next_enemy_spawn_ms: f64,
    /// Lifetime enemy spawn count; the spawner shuts off at the cap
    pub enemies_spawned_total: u32,
    /// player id -> clock time immunity was granted
    pub immunity: HashMap<u32, f64>,
    /// Pending events for the host (audio collaborator)
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh state in the menu phase with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default()).expect("default tuning is valid")
    }

    /// Create a state with custom tuning; invalid tuning is rejected and no
    /// state is constructed
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            clock_ms: 0.0,
            phase: GamePhase::Menu,
            player: None,
            enemies: Vec::new(),
            pickups: Vec::new(),
            star: None,
            next_object_spawn_ms: 0.0,
            next_enemy_spawn_ms: 0.0,
            enemies_spawned_total: 0,
            immunity: HashMap::new(),
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset all per-session state and spawn the player at the fixed start
    /// position. Used for both the first start and restarts.
    pub fn start_session(&mut self) {
        self.enemies.clear();
        self.pickups.clear();
        self.star = None;
        self.enemies_spawned_total = 0;
        self.immunity.clear();
        self.clock_ms = 0.0;

        let id = self.next_entity_id();
        self.player = Some(Player::new(id, &self.tuning));

        let (obj_min, obj_max) = (
            self.tuning.object_spawn_min_ms,
            self.tuning.object_spawn_max_ms,
        );
        let (enemy_min, enemy_max) = (
            self.tuning.enemy_spawn_min_ms,
            self.tuning.enemy_spawn_max_ms,
        );
        self.next_object_spawn_ms = self.rng.random_range(obj_min..=obj_max);
        self.next_enemy_spawn_ms = self.rng.random_range(enemy_min..=enemy_max);

        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::SessionStarted);
        log::info!("Session started (seed {})", self.seed);
    }

    pub fn in_menu(&self) -> bool {
        self.phase == GamePhase::Menu
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Drain pending events for the host
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
