//! Error types for level and asset loading.
//!
//! All of these are terminal at startup: the engine never retries a load.

use std::fmt;

/// Error type for level loading, saving and selection.
#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Serialize(serde_json::Error),
    Validation(String),
    InvalidSelection(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "IO error: {}", e),
            LevelError::Parse(e) => write!(f, "Parse error: {}", e),
            LevelError::Serialize(e) => write!(f, "Serialize error: {}", e),
            LevelError::Validation(e) => write!(f, "Validation error: {}", e),
            LevelError::InvalidSelection(input) => write!(
                f,
                "Invalid level selection {:?}: choose a map from 1 to 3 (type '1' for map 1)",
                input
            ),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Parse(e) | LevelError::Serialize(e) => Some(e),
            LevelError::Validation(_) | LevelError::InvalidSelection(_) => None,
        }
    }
}

/// Error type for asset manifest parsing and key lookup.
#[derive(Debug)]
pub enum AssetError {
    Manifest(serde_json::Error),
    MissingSprite(String),
    MissingAnimation(String),
    EmptyAnimation(String),
}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        AssetError::Manifest(e)
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Manifest(e) => write!(f, "Manifest error: {}", e),
            AssetError::MissingSprite(key) => write!(f, "No sprite registered under {:?}", key),
            AssetError::MissingAnimation(key) => {
                write!(f, "No animation registered under {:?}", key)
            }
            AssetError::EmptyAnimation(key) => write!(f, "Animation {:?} has no frames", key),
        }
    }
}

impl std::error::Error for AssetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_selection_message_mentions_range() {
        let err = LevelError::InvalidSelection("7".into());
        let msg = err.to_string();
        assert!(msg.contains("\"7\""));
        assert!(msg.contains("1 to 3"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LevelError = io.into();
        assert!(matches!(err, LevelError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
