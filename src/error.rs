use std::error::Error;
use std::fmt;

/// Fatal startup failures. Everything past initialization favors continuing
/// over halting (out-of-range angles are clamped, failed reads repeat the
/// previous command), so this taxonomy stays small.
#[derive(Debug)]
pub enum RigError {
    /// The orientation sensor did not respond within the boot timeout.
    SensorUnavailable(String),
    /// A configured value would make the angle pipeline undefined.
    InvalidConfiguration(String),
}

impl fmt::Display for RigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RigError::SensorUnavailable(msg) => write!(f, "sensor unavailable: {}", msg),
            RigError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl Error for RigError {}
