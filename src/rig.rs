use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::actuator::{LinearActuator, LinearCommand};
use crate::angles::{process_axis, AxisOutput, Sensitivity};
use crate::button::Clock;
use crate::config::{ACT_SPEED_MAX, MAX_ANGLE_DEGREES, MIN_COMMAND_INTERVAL_MS};
use crate::imu::Imu;
use crate::servo::RotationalDriver;

/// Telemetry snapshot from one completed tick.
#[derive(Clone, Copy, Debug)]
pub struct TickReport {
    pub theta: f64,
    pub phi: f64,
    pub sensitivity: Sensitivity,
    pub linear: LinearCommand,
    pub position_reading: u16,
    pub consecutive_failures: u32,
}

/// Session object owning the whole pipeline: orientation source, both
/// actuator drivers and the shared sensitivity selection. One `tick` runs
/// one read-process-actuate cycle; no hidden globals, so the pipeline is
/// testable without hardware.
pub struct LauncherRig {
    imu: Imu,
    linear: LinearActuator,
    rotational: Box<dyn RotationalDriver>,
    sensitivity: Arc<Mutex<Sensitivity>>,
    last_phi_output: Option<AxisOutput>,
    last_issue: Option<Instant>,
    consecutive_failures: u32,
}

impl LauncherRig {
    pub fn new(
        imu: Imu,
        linear: LinearActuator,
        rotational: Box<dyn RotationalDriver>,
        sensitivity: Arc<Mutex<Sensitivity>>,
    ) -> Self {
        Self {
            imu,
            linear,
            rotational,
            sensitivity,
            last_phi_output: None,
            last_issue: None,
            consecutive_failures: 0,
        }
    }

    /// Re-capture the zero offsets. The operator must be holding the
    /// neutral pose.
    pub fn calibrate(&mut self) -> Result<(), Box<dyn Error>> {
        self.imu.calibrate()
    }

    pub fn offsets(&self) -> (f64, f64) {
        self.imu.offsets()
    }

    /// Run one control cycle. Returns `None` when nothing was issued:
    /// either the minimum inter-command spacing has not elapsed yet, or the
    /// orientation read failed (in which case the previous tick's commands
    /// are repeated rather than halting the loop).
    pub fn tick(&mut self, clock: &impl Clock) -> Result<Option<TickReport>, Box<dyn Error>> {
        let now = clock.now();
        if let Some(last) = self.last_issue
            && now.duration_since(last) < Duration::from_millis(MIN_COMMAND_INTERVAL_MS)
        {
            return Ok(None);
        }

        let sensitivity = *self
            .sensitivity
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let threshold = sensitivity.threshold();

        let reading = match self.imu.read_orientation() {
            Ok(reading) => reading,
            Err(e) => {
                self.consecutive_failures += 1;
                eprintln!(
                    "⚠ Orientation read failed ({}); repeating previous command",
                    e
                );
                // Re-issue the last device commands as-is. Running the
                // control law on the stale outputs would keep stepping the
                // stepped servo's accumulator with the sensor dark.
                if let Some(phi_out) = self.last_phi_output {
                    self.rotational.reissue()?;
                    self.linear.apply(&phi_out)?;
                    self.last_issue = Some(now);
                }
                return Ok(None);
            }
        };
        self.consecutive_failures = 0;

        let theta_output = process_axis(reading.theta, MAX_ANGLE_DEGREES, threshold, 1.0);
        let phi_output = process_axis(reading.phi, MAX_ANGLE_DEGREES, threshold, ACT_SPEED_MAX);

        self.rotational.apply(&theta_output)?;
        self.linear.apply(&phi_output)?;

        self.last_phi_output = Some(phi_output);
        self.last_issue = Some(now);

        Ok(Some(TickReport {
            theta: reading.theta,
            phi: reading.phi,
            sensitivity,
            linear: self.linear.last_command(),
            position_reading: self.linear.position_reading(),
            consecutive_failures: self.consecutive_failures,
        }))
    }

    /// De-energize both actuators.
    pub fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.rotational.stop()?;
        self.linear.stop()
    }

    pub fn variant_name(&self) -> &'static str {
        self.rotational.describe()
    }
}
