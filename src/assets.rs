//! Sprite registry shared with the asset collaborator
//!
//! The host decodes images and registers each sprite kind as an opaque handle
//! plus its native pixel dimensions. The core never touches pixels: scaling
//! and flipping are declarative parameters on draw commands. A kind that was
//! never registered resolves to a generated placeholder of the correct
//! semantic size, so a missing file degrades a sprite, not the session.

use std::collections::HashMap;

use crate::consts::*;

/// Every sprite the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    PlayerIdle,
    PlayerRun,
    PlayerJump,
    PlayerDuck,
    Enemy,
    MushroomGrowth,
    MushroomLife,
    Coin,
    Star,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 9] = [
        SpriteKind::PlayerIdle,
        SpriteKind::PlayerRun,
        SpriteKind::PlayerJump,
        SpriteKind::PlayerDuck,
        SpriteKind::Enemy,
        SpriteKind::MushroomGrowth,
        SpriteKind::MushroomLife,
        SpriteKind::Coin,
        SpriteKind::Star,
    ];

    /// Semantic size used for placeholder substitution
    pub fn nominal_size(self) -> (u32, u32) {
        let (w, h) = match self {
            SpriteKind::PlayerIdle | SpriteKind::PlayerRun | SpriteKind::PlayerJump => {
                PLAYER_SMALL_SIZE
            }
            SpriteKind::PlayerDuck => PLAYER_SMALL_DUCK_SIZE,
            SpriteKind::Enemy => ENEMY_SIZE,
            SpriteKind::MushroomGrowth | SpriteKind::MushroomLife => MUSHROOM_SIZE,
            SpriteKind::Coin => COIN_SIZE,
            SpriteKind::Star => STAR_SIZE,
        };
        (w as u32, h as u32)
    }
}

/// Opaque drawable handle owned by the render collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u32);

impl SpriteHandle {
    /// Sentinel handle for generated placeholders
    pub const PLACEHOLDER: SpriteHandle = SpriteHandle(u32::MAX);
}

/// A registered drawable: handle plus native pixel dimensions
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub handle: SpriteHandle,
    pub width: u32,
    pub height: u32,
}

impl Sprite {
    fn placeholder(kind: SpriteKind) -> Self {
        let (width, height) = kind.nominal_size();
        Self {
            handle: SpriteHandle::PLACEHOLDER,
            width,
            height,
        }
    }
}

/// Registration rejection reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetError {
    /// Zero-sized sprites are rejected; the registry is left unchanged
    InvalidDimensions {
        kind: SpriteKind,
        width: u32,
        height: u32,
    },
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::InvalidDimensions {
                kind,
                width,
                height,
            } => write!(f, "sprite {kind:?} has invalid dimensions {width}x{height}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Sprite-kind to drawable mapping
#[derive(Debug, Default)]
pub struct SpriteStore {
    sprites: HashMap<SpriteKind, Sprite>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoded sprite. Zero dimensions are rejected with no
    /// change to the registry.
    pub fn register(
        &mut self,
        kind: SpriteKind,
        handle: SpriteHandle,
        width: u32,
        height: u32,
    ) -> Result<(), AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::InvalidDimensions {
                kind,
                width,
                height,
            });
        }
        self.sprites.insert(
            kind,
            Sprite {
                handle,
                width,
                height,
            },
        );
        Ok(())
    }

    /// Look up a sprite, substituting a placeholder of the kind's nominal
    /// size when unregistered
    pub fn resolve(&self, kind: SpriteKind) -> Sprite {
        match self.sprites.get(&kind) {
            Some(sprite) => *sprite,
            None => Sprite::placeholder(kind),
        }
    }

    /// Kinds with no registered drawable; the host logs these once at load
    pub fn missing_kinds(&self) -> Vec<SpriteKind> {
        SpriteKind::ALL
            .into_iter()
            .filter(|kind| !self.sprites.contains_key(kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut store = SpriteStore::new();
        store
            .register(SpriteKind::Coin, SpriteHandle(7), 16, 16)
            .unwrap();
        let sprite = store.resolve(SpriteKind::Coin);
        assert_eq!(sprite.handle, SpriteHandle(7));
        assert_eq!((sprite.width, sprite.height), (16, 16));
    }

    #[test]
    fn test_missing_sprite_gets_placeholder_with_nominal_size() {
        let store = SpriteStore::new();
        let sprite = store.resolve(SpriteKind::Enemy);
        assert_eq!(sprite.handle, SpriteHandle::PLACEHOLDER);
        assert_eq!((sprite.width, sprite.height), (45, 45));
    }

    #[test]
    fn test_zero_dimensions_rejected_without_state_change() {
        let mut store = SpriteStore::new();
        let err = store.register(SpriteKind::Star, SpriteHandle(1), 0, 40);
        assert!(matches!(err, Err(AssetError::InvalidDimensions { .. })));
        assert_eq!(store.resolve(SpriteKind::Star).handle, SpriteHandle::PLACEHOLDER);
    }

    #[test]
    fn test_missing_kinds_shrinks_as_registered() {
        let mut store = SpriteStore::new();
        assert_eq!(store.missing_kinds().len(), SpriteKind::ALL.len());
        store
            .register(SpriteKind::PlayerIdle, SpriteHandle(0), 40, 60)
            .unwrap();
        assert!(!store.missing_kinds().contains(&SpriteKind::PlayerIdle));
    }
}
