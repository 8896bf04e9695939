pub mod error;
pub mod rect;
pub mod time;
