use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::error::AssetError;

/// Asset manifest describing the sprite atlas, named sprites, animations and sounds.
/// Generated from the game's image directory and shipped as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetManifest {
    pub atlas: AtlasDescriptor,
    /// Static images: key → atlas cell + pixel size.
    #[serde(default)]
    pub sprites: HashMap<String, SpriteDescriptor>,
    /// Animated image sequences: key → frames + timing.
    #[serde(default)]
    pub animations: HashMap<String, AnimationDescriptor>,
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// The single texture atlas every sprite lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    /// Relative path to the PNG file.
    pub path: String,
    pub cols: u32,
    pub rows: u32,
    /// Cell size in pixels.
    #[serde(default = "default_cell")]
    pub cell: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    pub col: u32,
    pub row: u32,
    /// Number of cells this sprite spans (default: 1).
    #[serde(default = "default_span")]
    pub span: u32,
    /// Drawn size in pixels.
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    /// Atlas cells as `[col, row]`, in playback order.
    pub frames: Vec<[u32; 2]>,
    pub width: f32,
    pub height: f32,
    /// Updates per image (default: 5).
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_looping", rename = "loop")]
    pub looping: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
    /// Numeric event ID that triggers this sound from Rust.
    #[serde(default)]
    pub event_id: Option<u32>,
}

fn default_span() -> u32 {
    1
}

fn default_cell() -> u32 {
    16
}

fn default_duration() -> u32 {
    5
}

fn default_looping() -> bool {
    true
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_with_defaults() {
        let json = r#"{
            "atlas": { "path": "atlas.png", "cols": 16, "rows": 16 },
            "sprites": {
                "brick": { "col": 0, "row": 0, "width": 16, "height": 16 }
            },
            "animations": {
                "goomba/run": { "frames": [[0, 4], [1, 4]], "width": 16, "height": 16, "duration": 10 }
            },
            "sounds": {
                "jump": { "path": "jump.ogg", "event_id": 1 },
                "level1": { "path": "level1.mp3" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.atlas.cell, 16);
        assert_eq!(manifest.sprites["brick"].span, 1);

        let goomba = &manifest.animations["goomba/run"];
        assert_eq!(goomba.frames.len(), 2);
        assert_eq!(goomba.duration, 10);
        assert!(goomba.looping);

        assert_eq!(manifest.sounds["jump"].event_id, Some(1));
        assert_eq!(manifest.sounds["level1"].event_id, None);
    }

    #[test]
    fn malformed_manifest_is_an_asset_error() {
        let err = AssetManifest::from_json("{ \"sprites\": 3 }").unwrap_err();
        assert!(matches!(err, AssetError::Manifest(_)));
    }
}
