use std::collections::HashMap;

use glam::Vec2;

use crate::assets::manifest::AssetManifest;
use crate::components::animation::Animation;
use crate::components::sprite::SpriteComponent;
use crate::core::error::AssetError;

/// What a key resolves to: a single image or an animation.
#[derive(Debug, Clone, Copy)]
pub enum Asset<'a> {
    Static(&'a SpriteComponent),
    Animated(&'a Animation),
}

/// Asset table keyed by semantic names (`"brick"`, `"player/small/idle"`).
/// Built once at startup from an `AssetManifest` and read-only afterwards.
pub struct AssetRegistry {
    sprites: HashMap<String, SpriteComponent>,
    animations: HashMap<String, Animation>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
            animations: HashMap::new(),
        }
    }

    /// Build a registry from a parsed manifest. Empty animations are rejected.
    pub fn from_manifest(manifest: &AssetManifest) -> Result<Self, AssetError> {
        let mut registry = Self::new();
        for (name, desc) in &manifest.sprites {
            let sprite = SpriteComponent::new(
                desc.col as f32,
                desc.row as f32,
                Vec2::new(desc.width, desc.height),
            )
            .with_span(desc.span as f32);
            registry.insert_sprite(name.clone(), sprite);
        }
        for (name, desc) in &manifest.animations {
            let size = Vec2::new(desc.width, desc.height);
            let frames = desc
                .frames
                .iter()
                .map(|[col, row]| SpriteComponent::new(*col as f32, *row as f32, size))
                .collect();
            let anim = Animation::new(frames, desc.duration, desc.looping)
                .ok_or_else(|| AssetError::EmptyAnimation(name.clone()))?;
            registry.insert_animation(name.clone(), anim);
        }
        log::info!(
            "asset registry: {} sprites, {} animations",
            registry.sprites.len(),
            registry.animations.len()
        );
        Ok(registry)
    }

    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        Self::from_manifest(&AssetManifest::from_json(json)?)
    }

    pub fn insert_sprite(&mut self, name: impl Into<String>, sprite: SpriteComponent) {
        self.sprites.insert(name.into(), sprite);
    }

    pub fn insert_animation(&mut self, name: impl Into<String>, anim: Animation) {
        self.animations.insert(name.into(), anim);
    }

    pub fn get(&self, name: &str) -> Option<Asset<'_>> {
        if let Some(sprite) = self.sprites.get(name) {
            return Some(Asset::Static(sprite));
        }
        self.animations.get(name).map(Asset::Animated)
    }

    /// Static image by key. Falls back to the first frame of an animation
    /// under the same key, so animated tiles can still be drawn as tiles.
    pub fn sprite(&self, name: &str) -> Result<&SpriteComponent, AssetError> {
        match self.get(name) {
            Some(Asset::Static(sprite)) => Ok(sprite),
            Some(Asset::Animated(anim)) => Ok(anim.img()),
            None => Err(AssetError::MissingSprite(name.to_string())),
        }
    }

    /// A fresh playback cursor for the animation under `name`.
    pub fn animation(&self, name: &str) -> Result<Animation, AssetError> {
        self.animations
            .get(name)
            .map(Animation::copy)
            .ok_or_else(|| AssetError::MissingAnimation(name.to_string()))
    }

    /// Check that every key resolves to a sprite. Used at startup so a content
    /// error is fatal before the first frame instead of mid-game.
    pub fn require_sprites<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> Result<(), AssetError> {
        for key in keys {
            self.sprite(key)?;
        }
        Ok(())
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "atlas": { "path": "atlas.png", "cols": 16, "rows": 8 },
        "sprites": {
            "castle": { "col": 3, "row": 5, "span": 4, "width": 64, "height": 64 }
        },
        "animations": {
            "coin": { "frames": [[0, 1], [1, 1], [2, 1]], "width": 16, "height": 16, "duration": 4 }
        }
    }"#;

    #[test]
    fn loads_static_and_animated_entries() {
        let reg = AssetRegistry::from_json(MANIFEST).unwrap();

        let castle = reg.sprite("castle").unwrap();
        assert_eq!((castle.col, castle.row, castle.cell_span), (3.0, 5.0, 4.0));
        assert_eq!(castle.size, Vec2::new(64.0, 64.0));

        assert!(matches!(reg.get("coin"), Some(Asset::Animated(_))));
        let coin = reg.animation("coin").unwrap();
        assert_eq!(coin.frame_count(), 3);
        assert_eq!(coin.duration(), 4);
    }

    #[test]
    fn animation_lookups_share_frames() {
        let reg = AssetRegistry::from_json(MANIFEST).unwrap();
        let a = reg.animation("coin").unwrap();
        let b = reg.animation("coin").unwrap();
        assert!(a.shares_frames_with(&b));
    }

    #[test]
    fn missing_keys_are_errors() {
        let reg = AssetRegistry::new();
        assert!(matches!(reg.sprite("nope"), Err(AssetError::MissingSprite(_))));
        assert!(matches!(reg.animation("nope"), Err(AssetError::MissingAnimation(_))));
        assert!(reg.require_sprites(["nope"]).is_err());
    }

    #[test]
    fn empty_animation_rejected_at_build() {
        let json = r#"{
            "atlas": { "path": "a.png", "cols": 1, "rows": 1 },
            "animations": { "blank": { "frames": [], "width": 16, "height": 16 } }
        }"#;
        assert!(matches!(
            AssetRegistry::from_json(json),
            Err(AssetError::EmptyAnimation(_))
        ));
    }
}
