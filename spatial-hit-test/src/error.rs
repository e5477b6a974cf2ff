use std::fmt;

/// Error types for malformed hit-test input.
///
/// Geometric misses are not errors; they are returned as `None` or empty
/// result lists.
#[derive(Debug)]
pub enum HitTestError {
    /// No camera pose is available for the current tracking frame.
    NoActiveFrame,
    /// A vector too short to normalise reached a direction constructor.
    DegenerateVector { length: f32 },
    InvalidConfig(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for HitTestError {
    fn from(err: std::io::Error) -> Self {
        HitTestError::Io(err)
    }
}

impl From<serde_json::Error> for HitTestError {
    fn from(err: serde_json::Error) -> Self {
        HitTestError::Json(err)
    }
}

impl fmt::Display for HitTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitTestError::NoActiveFrame => write!(f, "No active tracking frame"),
            HitTestError::DegenerateVector { length } => {
                write!(f, "Cannot normalise vector of length {}", length)
            }
            HitTestError::InvalidConfig(reason) => write!(f, "Invalid config: {}", reason),
            HitTestError::Io(e) => write!(f, "IO error: {}", e),
            HitTestError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for HitTestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HitTestError::Io(e) => Some(e),
            HitTestError::Json(e) => Some(e),
            _ => None,
        }
    }
}
