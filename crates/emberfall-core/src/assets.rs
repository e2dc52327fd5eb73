//! Sprite lookup with graceful fallback.
//!
//! Asset loading itself happens outside the core; the catalog only maps
//! names the loader registered to ids. A name that was never registered
//! resolves to [`SpriteId::FALLBACK`] so a missing asset can never fail a
//! tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Opaque sprite identifier understood by the renderer.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpriteId(u32);

impl SpriteId {
    /// Placeholder drawn for unknown sprite names.
    pub const FALLBACK: Self = Self(0);

    /// Returns true for the fallback sprite.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        self.0 == Self::FALLBACK.0
    }
}

/// Name-to-sprite registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetCatalog {
    sprites: BTreeMap<String, SpriteId>,
}

impl AssetCatalog {
    /// Creates an empty catalog. Every lookup falls back.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with the given names registered in order.
    #[must_use]
    pub fn with_sprites<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut catalog = Self::new();
        for name in names {
            catalog.register(name);
        }
        catalog
    }

    /// Registers a sprite name and returns its id. Re-registering a name
    /// returns the existing id.
    pub fn register(&mut self, name: &str) -> SpriteId {
        if let Some(id) = self.sprites.get(name) {
            return *id;
        }
        #[allow(clippy::cast_possible_truncation)]
        let id = SpriteId(self.sprites.len() as u32 + 1);
        self.sprites.insert(name.to_owned(), id);
        id
    }

    /// Resolves a sprite by name, falling back for unknown names.
    #[must_use]
    pub fn sprite(&self, name: &str) -> SpriteId {
        if let Some(id) = self.sprites.get(name) {
            *id
        } else {
            warn!(sprite = name, "missing sprite, using fallback");
            SpriteId::FALLBACK
        }
    }

    /// Number of registered sprites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_names_resolve() {
        let catalog = AssetCatalog::with_sprites(["bomber_walk", "bomber_throw"]);
        let walk = catalog.sprite("bomber_walk");
        let throw = catalog.sprite("bomber_throw");
        assert_ne!(walk, throw);
        assert!(!walk.is_fallback());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn unknown_name_falls_back() {
        let catalog = AssetCatalog::new();
        assert_eq!(catalog.sprite("ghost"), SpriteId::FALLBACK);
    }

    #[test]
    fn register_is_idempotent() {
        let mut catalog = AssetCatalog::new();
        let a = catalog.register("bomb");
        let b = catalog.register("bomb");
        assert_eq!(a, b);
        assert_eq!(catalog.len(), 1);
    }
}
