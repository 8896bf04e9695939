use std::fmt;

use brick_engine::{AssetError, LevelError};

/// Why a session could not start.
#[derive(Debug)]
pub enum LaunchError {
    Level(LevelError),
    Asset(AssetError),
}

impl From<LevelError> for LaunchError {
    fn from(e: LevelError) -> Self {
        LaunchError::Level(e)
    }
}

impl From<AssetError> for LaunchError {
    fn from(e: AssetError) -> Self {
        LaunchError::Asset(e)
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::Level(e) => write!(f, "Level error: {}", e),
            LaunchError::Asset(e) => write!(f, "Asset error: {}", e),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::Level(e) => Some(e),
            LaunchError::Asset(e) => Some(e),
        }
    }
}
