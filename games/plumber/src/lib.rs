//! A side-scrolling platformer on brick-engine: run right, stomp what walks,
//! hit `?` blocks from below, reach the castle.

pub mod clouds;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod level;
pub mod mobs;
pub mod player;
pub mod rewards;

pub use error::LaunchError;
pub use game::{Outcome, PlumberGame};

/// Sprite atlas layout, animations and sounds shared by the game and the editor.
pub const ASSET_MANIFEST: &str = include_str!("../assets/manifest.json");

#[cfg(feature = "web")]
mod web {
    use brick_engine::*;
    use wasm_bindgen::prelude::*;

    use crate::PlumberGame;

    brick_web::export_game!(PlumberGame, "plumber", select);
}
