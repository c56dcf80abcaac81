use std::error::Error;

use crate::angles::{linear_map, sign, AxisDirection, AxisOutput};
use crate::config::{
    MAX_ANGLE_DEGREES, SERVO_DEVICE_MAX_PULSE_US, SERVO_DEVICE_MIN_PULSE_US,
    SERVO_DEVICE_RANGE_DEGREES, SERVO_FREQUENCY_HZ, SERVO_NEUTRAL_PULSE_US, SERVO_PULSE_BAND_US,
    SERVO_PWM_PIN, STEP_POSITION_LIMIT_DEGREES, STEP_TIER_THRESHOLDS_DEGREES, STEP_TIER_UNITS,
    STEP_UNIT_DEGREES,
};

// Use rppal in production
#[cfg(not(test))]
use rppal::pwm::{Channel, Polarity, Pwm};

// Mock PWM for testing
#[cfg(test)]
use crate::mocks::mock_pwm::Pwm;

/// Which rotational control law this installation uses. Chosen at startup,
/// never both at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServoVariant {
    /// Theta maps to a pulse width in a band around neutral, scaled by the
    /// speed fraction.
    PulseWidth,
    /// Theta magnitude drives a rate-of-turn accumulator re-issued as an
    /// absolute position. For installations where pulse-width addressing is
    /// unreliable.
    Stepped,
}

/// One of the two rotational control laws, behind a common capability.
pub trait RotationalDriver {
    fn apply(&mut self, output: &AxisOutput) -> Result<(), Box<dyn Error>>;
    /// Re-write the last issued device command without running the control
    /// law again. Used when the orientation read fails: stepping the
    /// stepped variant's accumulator on stale data would keep the launcher
    /// slewing with the sensor dark.
    fn reissue(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
    fn describe(&self) -> &'static str;
}

fn open_pwm(pin: u8) -> Result<Pwm, Box<dyn Error>> {
    #[cfg(not(test))]
    let channel = match pin {
        12 | 18 => Channel::Pwm0,
        13 | 19 => Channel::Pwm1,
        _ => return Err("Invalid PWM pin. Use 12, 13, 18, or 19".into()),
    };

    #[cfg(not(test))]
    let pwm = Pwm::with_frequency(channel, SERVO_FREQUENCY_HZ, 0.0, Polarity::Normal, true)?;

    #[cfg(test)]
    let pwm = Pwm::new(pin)?;

    Ok(pwm)
}

fn pulse_to_duty(pulse_us: f64) -> f64 {
    let period_us = 1_000_000.0 / SERVO_FREQUENCY_HZ;
    (pulse_us / period_us).clamp(0.0, 1.0)
}

/// Continuous-speed variant.
///
/// Theta maps linearly onto 1472 ± 150 µs, then the pulse is scaled by the
/// speed fraction, so the command only approaches full deflection as |theta|
/// nears the envelope. The scaled pulse is deliberately not re-clamped into
/// the nominal band (preserved open-loop behavior); the dead zone writes a
/// true zero pulse.
pub struct PulseWidthServo {
    pwm: Pwm,
    last_duty: f64,
}

impl PulseWidthServo {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_pin(SERVO_PWM_PIN)
    }

    pub fn with_pin(pin: u8) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            pwm: open_pwm(pin)?,
            last_duty: 0.0,
        })
    }

    fn write_duty(&mut self, duty: f64) -> Result<(), Box<dyn Error>> {
        self.pwm.set_duty_cycle(duty)?;
        self.last_duty = duty;
        Ok(())
    }
}

impl RotationalDriver for PulseWidthServo {
    fn apply(&mut self, output: &AxisOutput) -> Result<(), Box<dyn Error>> {
        if output.direction == AxisDirection::Hold {
            return self.stop();
        }

        let pulse_us = linear_map(
            output.clamped,
            -MAX_ANGLE_DEGREES,
            MAX_ANGLE_DEGREES,
            SERVO_NEUTRAL_PULSE_US - SERVO_PULSE_BAND_US,
            SERVO_NEUTRAL_PULSE_US + SERVO_PULSE_BAND_US,
        );
        self.write_duty(pulse_to_duty(pulse_us * output.speed))
    }

    fn reissue(&mut self) -> Result<(), Box<dyn Error>> {
        self.write_duty(self.last_duty)
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.write_duty(0.0)
    }

    fn describe(&self) -> &'static str {
        "pulse-width"
    }
}

impl Drop for PulseWidthServo {
    fn drop(&mut self) {
        let _ = self.pwm.disable();
    }
}

/// Incremental-step variant.
///
/// A running position (degrees off center, bounded to ±45°) is stepped each
/// tick by an amount chosen from the tier the angle magnitude falls in, then
/// re-issued as a 0-180° device position. A step that would leave the bound
/// is rejected outright and nothing is re-sent. Every tier issues through
/// this one path.
pub struct SteppedServo {
    pwm: Pwm,
    position: f64,
    position_sent: bool,
}

impl SteppedServo {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_pin(SERVO_PWM_PIN)
    }

    pub fn with_pin(pin: u8) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            pwm: open_pwm(pin)?,
            position: 0.0,
            position_sent: false,
        })
    }

    /// Step size in degrees for an angle magnitude, from the highest tier
    /// the magnitude strictly exceeds. Zero below the lowest tier.
    fn step_degrees(magnitude: f64) -> f64 {
        let mut units = 0.0;
        for (threshold, tier_units) in STEP_TIER_THRESHOLDS_DEGREES
            .iter()
            .zip(STEP_TIER_UNITS.iter())
        {
            if magnitude > *threshold {
                units = *tier_units;
            }
        }
        units * STEP_UNIT_DEGREES
    }

    fn write_position(&mut self) -> Result<(), Box<dyn Error>> {
        // center the bounded position on the device's 0-180° range
        let device_degrees = SERVO_DEVICE_RANGE_DEGREES / 2.0 + self.position;
        let pulse_us = linear_map(
            device_degrees,
            0.0,
            SERVO_DEVICE_RANGE_DEGREES,
            SERVO_DEVICE_MIN_PULSE_US,
            SERVO_DEVICE_MAX_PULSE_US,
        );
        self.pwm.set_duty_cycle(pulse_to_duty(pulse_us))?;
        self.position_sent = true;
        Ok(())
    }

    /// Current accumulator position, degrees off center.
    pub fn position(&self) -> f64 {
        self.position
    }
}

impl RotationalDriver for SteppedServo {
    fn apply(&mut self, output: &AxisOutput) -> Result<(), Box<dyn Error>> {
        if output.direction == AxisDirection::Hold {
            // inside the dead zone the position is simply not re-issued
            return Ok(());
        }

        let step = Self::step_degrees(output.clamped.abs());
        if step == 0.0 {
            return Ok(());
        }

        let stepped = self.position + sign(output.clamped) * step;
        if stepped.abs() > STEP_POSITION_LIMIT_DEGREES {
            // would leave the bound: keep the current position, send nothing
            return Ok(());
        }

        self.position = stepped;
        self.write_position()
    }

    /// Re-send the current position without stepping the accumulator.
    fn reissue(&mut self) -> Result<(), Box<dyn Error>> {
        if self.position_sent {
            self.write_position()
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.pwm.set_duty_cycle(0.0)?;
        self.position_sent = false;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "stepped"
    }
}

impl Drop for SteppedServo {
    fn drop(&mut self) {
        let _ = self.pwm.disable();
    }
}
