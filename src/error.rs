//! Errors at the data boundary
//!
//! Gameplay itself never fails; invalid transitions are absorbed as no-ops.
//! These types only surface when level data or configuration is loaded.

use core::fmt;

/// Level data that cannot be installed
#[derive(Clone, Debug, PartialEq)]
pub enum LevelError {
    NoGround,
    EmptyStage { start_x: f32, end_x: f32 },
    StartOutsideStage { x: f32, start_x: f32, end_x: f32 },
    BadBodySize { index: usize, width: f32, height: f32 },
    /// Moving platform with a non-positive size or leg duration
    BadPlatform { index: usize },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoGround => write!(f, "level has no ground bodies"),
            Self::EmptyStage { start_x, end_x } => write!(
                f,
                "stage end {end_x} must be right of stage start {start_x}"
            ),
            Self::StartOutsideStage { x, start_x, end_x } => write!(
                f,
                "player start x {x} outside stage [{start_x}, {end_x})"
            ),
            Self::BadBodySize {
                index,
                width,
                height,
            } => write!(f, "solid #{index} has non-positive size {width}x{height}"),
            Self::BadPlatform { index } => {
                write!(f, "moving platform #{index} needs a positive size and leg time")
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Tuning, settings or level JSON that cannot be used
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    OutOfRange { field: &'static str, value: f32 },
    Level(LevelError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid JSON: {err}"),
            Self::OutOfRange { field, value } => {
                write!(f, "{field} out of range: {value}")
            }
            Self::Level(err) => write!(f, "invalid level: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Level(err) => Some(err),
            Self::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<LevelError> for ConfigError {
    fn from(err: LevelError) -> Self {
        Self::Level(err)
    }
}
