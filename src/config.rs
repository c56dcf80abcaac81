// ** IMU CONFIGURATION ** //

/// I2C address of the BNO055 orientation sensor (ADR pin low).
pub const BNO055_I2C_ADDR: u16 = 0x28;
/// How long to keep probing the chip ID before declaring the sensor absent.
/// The BNO055 needs roughly 400ms after power-on before it answers.
pub const IMU_BOOT_TIMEOUT_MS: u64 = 2000;
/// Settling delay after mode selection before readings are trustworthy.
pub const IMU_WARMUP_DELAY_MS: u64 = 1000;

// ** ANGLE ENVELOPE ** //

/// Operating envelope for both tracked angles (degrees). Angles beyond this
/// are clamped, never rejected.
pub const MAX_ANGLE_DEGREES: f64 = 30.0;
/// Dead-zone thresholds (degrees) for the two sensitivity modes.
pub const FINE_THRESHOLD_DEGREES: f64 = 7.0;
pub const COARSE_THRESHOLD_DEGREES: f64 = 15.0;

// ** LINEAR ACTUATOR ** //

/// GPIO pins wired to the H-bridge RPWM (extend) and LPWM (retract) inputs.
pub const ACT_EXTEND_PIN: u8 = 20;
pub const ACT_RETRACT_PIN: u8 = 21;
/// Software PWM carrier frequency for the H-bridge channels (Hz).
pub const ACT_PWM_FREQUENCY_HZ: f64 = 1000.0;
/// Full-scale speed command, matching the 8-bit PWM duty range.
pub const ACT_SPEED_MAX: f64 = 255.0;
/// MCP3008 channel the actuator potentiometer is wired to (telemetry only).
pub const ACT_ADC_CHANNEL: u8 = 0;
pub const ACT_SPI_CLOCK_HZ: u32 = 1_000_000;

// ** ROTATIONAL ACTUATOR ** //

/// GPIO PWM pin for the servo.
/// Hardware PWM is available on GPIO 12/18 (PWM0) and GPIO 13/19 (PWM1).
pub const SERVO_PWM_PIN: u8 = 18;
pub const SERVO_FREQUENCY_HZ: f64 = 50.0;
/// Neutral pulse for the continuous-speed variant (microseconds).
pub const SERVO_NEUTRAL_PULSE_US: f64 = 1472.0;
/// Deflection band around neutral: 45 deg * 10/3 us per deg = 150 us.
pub const SERVO_PULSE_BAND_US: f64 = 150.0;
/// Standard positional pulse range for the stepped variant (microseconds
/// mapped over the 0-180 degree device range).
pub const SERVO_DEVICE_MIN_PULSE_US: f64 = 1000.0;
pub const SERVO_DEVICE_MAX_PULSE_US: f64 = 2000.0;
pub const SERVO_DEVICE_RANGE_DEGREES: f64 = 180.0;

/// Stepped variant: the running position never leaves this bound (degrees
/// either side of center).
pub const STEP_POSITION_LIMIT_DEGREES: f64 = 45.0;
/// Graduated angle tiers (degrees) and the step issued when the tracked
/// angle exceeds each tier. Steps are in units of `STEP_UNIT_DEGREES`.
pub const STEP_TIER_THRESHOLDS_DEGREES: [f64; 4] = [10.0, 20.0, 30.0, 40.0];
pub const STEP_TIER_UNITS: [f64; 4] = [2.0, 5.0, 10.0, 20.0];
pub const STEP_UNIT_DEGREES: f64 = 3.0;

// ** CONTROL LOOP ** //

pub const TICK_INTERVAL_MS: u64 = 50;
/// Minimum spacing between issued actuator commands, enforced by the rig
/// regardless of how fast the loop calls `tick`.
pub const MIN_COMMAND_INTERVAL_MS: u64 = 50;
pub const STATUS_UPDATE_INTERVAL_SECS: u64 = 5;

// ** TRIGGER / SPEED BUTTON ** //

/// Relay pin that fires the launcher.
pub const TRIGGER_RELAY_PIN: u8 = 26;
/// Pin wired across the launcher's flywheel speed button.
pub const SPEED_BUTTON_PIN: u8 = 16;
/// How long a pulsed output stays high to register as a press.
pub const BUTTON_HOLD_MS: u64 = 250;
