use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{BNO055_I2C_ADDR, IMU_BOOT_TIMEOUT_MS, IMU_WARMUP_DELAY_MS};
use crate::error::RigError;

// Use rppal in production
#[cfg(not(test))]
use rppal::i2c::I2c;

// Mock I2C for testing
#[cfg(test)]
use crate::mocks::mock_i2c::I2c;

// BNO055 register addresses
const CHIP_ID: u8 = 0x00;
const EUL_HEADING_LSB: u8 = 0x1A;
const EUL_PITCH_LSB: u8 = 0x1E;
const CALIB_STAT: u8 = 0x35;
const OPR_MODE: u8 = 0x3D;
const PWR_MODE: u8 = 0x3E;
const SYS_TRIGGER: u8 = 0x3F;

const BNO055_CHIP_ID: u8 = 0xA0;
const MODE_CONFIG: u8 = 0x00;
const MODE_NDOF: u8 = 0x0C;
const PWR_NORMAL: u8 = 0x00;
const EXT_CRYSTAL: u8 = 0x80;

/// Euler registers hold signed 1/16-degree counts.
const LSB_PER_DEGREE: f64 = 16.0;

/// One calibrated orientation sample, produced once per control tick.
/// `theta` (yaw) is wrapped to (-180, 180]; `phi` (pitch) is not wrapped
/// because the vertical axis never approaches the wrap boundary on this rig.
#[derive(Clone, Copy, Debug)]
pub struct OrientationReading {
    pub theta: f64,
    pub phi: f64,
}

/// BNO055 self-calibration levels, each 0 (uncalibrated) to 3 (fully
/// calibrated). Display only; the rig trusts the operator's neutral pose.
#[derive(Clone, Copy, Debug)]
pub struct CalibrationStatus {
    pub system: u8,
    pub gyro: u8,
    pub accel: u8,
    pub mag: u8,
}

pub struct Imu {
    i2c: I2c,
    theta_offset: f64,
    phi_offset: f64,
}

impl Imu {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_timing(
            Duration::from_millis(IMU_BOOT_TIMEOUT_MS),
            Duration::from_millis(IMU_WARMUP_DELAY_MS),
        )
    }

    /// Bring up the sensor with explicit boot-probe and warm-up windows.
    pub fn with_timing(boot_timeout: Duration, warmup: Duration) -> Result<Self, Box<dyn Error>> {
        let mut i2c = I2c::new()?;
        i2c.set_slave_address(BNO055_I2C_ADDR)?;

        // The chip answers with its ID once its own boot finishes; keep
        // probing until the timeout elapses.
        let deadline = Instant::now() + boot_timeout;
        loop {
            match i2c.smbus_read_byte(CHIP_ID) {
                Ok(id) if id == BNO055_CHIP_ID => break,
                _ => {}
            }
            if Instant::now() >= deadline {
                return Err(Box::new(RigError::SensorUnavailable(format!(
                    "no BNO055 answering at I2C address 0x{:02X}",
                    BNO055_I2C_ADDR
                ))));
            }
            thread::sleep(Duration::from_millis(50));
        }

        // Config mode first, then power, crystal and the fused NDOF mode.
        i2c.smbus_write_byte(OPR_MODE, MODE_CONFIG)?;
        thread::sleep(Duration::from_millis(25));
        i2c.smbus_write_byte(PWR_MODE, PWR_NORMAL)?;
        i2c.smbus_write_byte(SYS_TRIGGER, EXT_CRYSTAL)?;
        i2c.smbus_write_byte(OPR_MODE, MODE_NDOF)?;

        // Readings are not trustworthy until the fusion settles.
        thread::sleep(warmup);

        println!("✓ IMU (BNO055) initialized");
        Ok(Self {
            i2c,
            theta_offset: 0.0,
            phi_offset: 0.0,
        })
    }

    fn read_euler_degrees(&mut self, lsb_register: u8) -> Result<f64, Box<dyn Error>> {
        let lo = self.i2c.smbus_read_byte(lsb_register)?;
        let hi = self.i2c.smbus_read_byte(lsb_register + 1)?;
        Ok(i16::from_le_bytes([lo, hi]) as f64 / LSB_PER_DEGREE)
    }

    /// Capture the current raw angles as the zero-offset baseline. The
    /// operator must be holding the neutral pose; that cannot be verified
    /// here.
    pub fn calibrate(&mut self) -> Result<(), Box<dyn Error>> {
        self.theta_offset = self.read_euler_degrees(EUL_HEADING_LSB)?;
        self.phi_offset = self.read_euler_degrees(EUL_PITCH_LSB)?;
        Ok(())
    }

    /// Calibrated yaw, wrapped into (-180, 180].
    ///
    /// The wrap is load-bearing: calibrating near the ±180° boundary
    /// otherwise produces discontinuous jumps. Values are wrapped on both
    /// sides so any raw/offset pair lands inside the range.
    pub fn theta(&mut self) -> Result<f64, Box<dyn Error>> {
        let raw = self.read_euler_degrees(EUL_HEADING_LSB)?;
        let mut shifted = raw - self.theta_offset;
        while shifted > 180.0 {
            shifted -= 360.0;
        }
        while shifted <= -180.0 {
            shifted += 360.0;
        }
        Ok(shifted)
    }

    /// Calibrated pitch. Not wrapped: the vertical axis is physically
    /// limited well inside the wrap boundary.
    pub fn phi(&mut self) -> Result<f64, Box<dyn Error>> {
        let raw = self.read_euler_degrees(EUL_PITCH_LSB)?;
        Ok(raw - self.phi_offset)
    }

    pub fn read_orientation(&mut self) -> Result<OrientationReading, Box<dyn Error>> {
        Ok(OrientationReading {
            theta: self.theta()?,
            phi: self.phi()?,
        })
    }

    pub fn calibration_status(&mut self) -> Result<CalibrationStatus, Box<dyn Error>> {
        let packed = self.i2c.smbus_read_byte(CALIB_STAT)?;
        Ok(CalibrationStatus {
            system: (packed >> 6) & 0x03,
            gyro: (packed >> 4) & 0x03,
            accel: (packed >> 2) & 0x03,
            mag: packed & 0x03,
        })
    }

    pub fn offsets(&self) -> (f64, f64) {
        (self.theta_offset, self.phi_offset)
    }
}
