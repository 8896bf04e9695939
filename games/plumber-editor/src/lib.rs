//! Level editor for plumber maps: paint tiles with the mouse, pan with the
//! arrow keys, press `S` to serialize the level for the host.

pub mod editor;

pub use editor::LevelEditor;

use brick_engine::*;
use wasm_bindgen::prelude::*;

brick_web::export_game!(LevelEditor, "plumber-editor", select);
