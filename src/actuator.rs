use std::error::Error;

use crate::angles::{AxisDirection, AxisOutput};
use crate::config::{
    ACT_ADC_CHANNEL, ACT_EXTEND_PIN, ACT_PWM_FREQUENCY_HZ, ACT_RETRACT_PIN, ACT_SPEED_MAX,
    ACT_SPI_CLOCK_HZ,
};

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, OutputPin};
#[cfg(not(test))]
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

// Mock GPIO/SPI for testing
#[cfg(test)]
use crate::mocks::mock_gpio::{Gpio, OutputPin};
#[cfg(test)]
use crate::mocks::mock_spi::{Bus, Mode, SlaveSelect, Spi};

/// Command issued to the H-bridge each tick. Speeds are in [0, 255].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinearCommand {
    Extend(f64),
    Hold,
    Retract(f64),
}

/// Linear actuator behind an H-bridge: one PWM channel per direction.
///
/// Open loop by design. The potentiometer is sampled through an MCP3008 but
/// only retained for telemetry; it never modulates the command.
pub struct LinearActuator {
    extend: OutputPin,
    retract: OutputPin,
    adc: Spi,
    last_command: LinearCommand,
    last_position_reading: u16,
    held_position: u16,
}

impl LinearActuator {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_pins(ACT_EXTEND_PIN, ACT_RETRACT_PIN)
    }

    pub fn with_pins(extend_pin: u8, retract_pin: u8) -> Result<Self, Box<dyn Error>> {
        let gpio = Gpio::new()?;
        let extend = gpio.get(extend_pin)?.into_output_low();
        let retract = gpio.get(retract_pin)?.into_output_low();
        let adc = Spi::new(Bus::Spi0, SlaveSelect::Ss0, ACT_SPI_CLOCK_HZ, Mode::Mode0)?;

        Ok(Self {
            extend,
            retract,
            adc,
            last_command: LinearCommand::Hold,
            last_position_reading: 0,
            held_position: 0,
        })
    }

    /// Translate one processed phi output into an H-bridge command.
    pub fn apply(&mut self, output: &AxisOutput) -> Result<(), Box<dyn Error>> {
        // Telemetry sample; a transient ADC failure must not stop the axis.
        if let Ok(reading) = self.sample_position() {
            self.last_position_reading = reading;
        }

        match output.direction {
            AxisDirection::Positive => self.drive(LinearCommand::Extend(output.speed)),
            AxisDirection::Negative => self.drive(LinearCommand::Retract(output.speed)),
            AxisDirection::Hold => {
                self.held_position = self.last_position_reading;
                self.drive(LinearCommand::Hold)
            }
        }
    }

    /// Issue both channels for one command. Exactly one direction carries a
    /// nonzero duty; energizing both sides of the bridge at once risks a
    /// short circuit, so every path writes both pins.
    fn drive(&mut self, command: LinearCommand) -> Result<(), Box<dyn Error>> {
        match command {
            LinearCommand::Extend(speed) => {
                self.extend
                    .set_pwm_frequency(ACT_PWM_FREQUENCY_HZ, duty_cycle(speed))?;
                self.retract.set_pwm_frequency(ACT_PWM_FREQUENCY_HZ, 0.0)?;
            }
            LinearCommand::Hold => {
                self.extend.set_pwm_frequency(ACT_PWM_FREQUENCY_HZ, 0.0)?;
                self.retract.set_pwm_frequency(ACT_PWM_FREQUENCY_HZ, 0.0)?;
            }
            LinearCommand::Retract(speed) => {
                self.extend.set_pwm_frequency(ACT_PWM_FREQUENCY_HZ, 0.0)?;
                self.retract
                    .set_pwm_frequency(ACT_PWM_FREQUENCY_HZ, duty_cycle(speed))?;
            }
        }
        self.last_command = command;
        Ok(())
    }

    /// Single-ended MCP3008 conversion on the pot channel.
    fn sample_position(&mut self) -> Result<u16, Box<dyn Error>> {
        let command = [0x01, (0x08 | ACT_ADC_CHANNEL) << 4, 0x00];
        let mut response = [0u8; 3];
        self.adc.transfer(&mut response, &command)?;
        Ok((((response[1] & 0x03) as u16) << 8) | response[2] as u16)
    }

    pub fn last_command(&self) -> LinearCommand {
        self.last_command
    }

    /// Most recent pot reading in raw ADC units (telemetry only).
    pub fn position_reading(&self) -> u16 {
        self.last_position_reading
    }

    /// Pot reading latched when the axis last entered its dead zone.
    pub fn held_position(&self) -> u16 {
        self.held_position
    }

    pub fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.drive(LinearCommand::Hold)
    }
}

impl Drop for LinearActuator {
    fn drop(&mut self) {
        // Leave the bridge de-energized
        let _ = self.extend.clear_pwm();
        let _ = self.retract.clear_pwm();
    }
}

fn duty_cycle(speed: f64) -> f64 {
    (speed / ACT_SPEED_MAX).clamp(0.0, 1.0)
}
