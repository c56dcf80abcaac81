pub mod actuator;
pub mod angles;
pub mod button;
pub mod config;
pub mod error;
pub mod imu;
pub mod rig;
pub mod servo;

// Re-export commonly used types
pub use actuator::{LinearActuator, LinearCommand};
pub use angles::{AxisDirection, AxisOutput, Sensitivity};
pub use button::{Clock, PulsedOutput, SystemClock};
pub use error::RigError;
pub use imu::Imu;
pub use rig::{LauncherRig, TickReport};
pub use servo::{PulseWidthServo, RotationalDriver, ServoVariant, SteppedServo};

#[cfg(test)]
pub(crate) mod mocks;
