pub mod api;
pub mod core;
pub mod components;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{step_game, Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use components::animation::Animation;
pub use components::sprite::SpriteComponent;
pub use components::tilemap::{Cell, GridTile, OffgridTile, Tilemap};
pub use core::error::{AssetError, LevelError};
pub use core::rect::Rect;
pub use core::time::FixedTimestep;
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use renderer::camera::Camera2D;
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::AssetManifest;
pub use assets::registry::{Asset, AssetRegistry};
pub use bridge::protocol::ProtocolLayout;
