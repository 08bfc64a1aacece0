//! Coindash - a side-scrolling coin-chase platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `assets`: Sprite registry shared with the asset collaborator
//! - `scene`: Render-ready draw list + HUD snapshot built from the sim state
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants (geometry; balance lives in [`tuning`])
pub mod consts {
    /// Viewport dimensions in pixels
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Height of the ground strip at the bottom of the viewport
    pub const GROUND_OFFSET: f32 = 50.0;
    /// The floor line: entity rect bottoms rest here
    pub const FLOOR_Y: f32 = SCREEN_HEIGHT - GROUND_OFFSET;

    /// Entities spawn this far past the right viewport edge
    pub const SPAWN_MARGIN_X: f32 = 50.0;

    /// Player draw/collision dimensions per size tier
    pub const PLAYER_SMALL_SIZE: (f32, f32) = (40.0, 60.0);
    pub const PLAYER_SMALL_DUCK_SIZE: (f32, f32) = (40.0, 40.0);
    pub const PLAYER_BIG_SIZE: (f32, f32) = (55.0, 80.0);
    /// Big-tier duck height is a fraction of the big standing height
    pub const BIG_DUCK_HEIGHT_FRACTION: f32 = 0.7;

    /// Non-player entity dimensions
    pub const ENEMY_SIZE: (f32, f32) = (45.0, 45.0);
    pub const MUSHROOM_SIZE: (f32, f32) = (35.0, 35.0);
    pub const COIN_SIZE: (f32, f32) = (30.0, 30.0);
    pub const STAR_SIZE: (f32, f32) = (40.0, 40.0);

    /// Coins spawn this far above the floor line (inclusive range)
    pub const COIN_HEIGHT_RANGE: (f32, f32) = (50.0, 150.0);
    /// Stars spawn this far above the floor line (inclusive range)
    pub const STAR_HEIGHT_RANGE: (f32, f32) = (80.0, 200.0);

    /// Immune players blink with this period; hidden for the first half
    pub const IMMUNE_FLICKER_MS: f64 = 200.0;
}
