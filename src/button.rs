use std::error::Error;
use std::time::{Duration, Instant};

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, OutputPin};

// Mock GPIO for testing
#[cfg(test)]
use crate::mocks::mock_gpio::{Gpio, OutputPin};

/// Time source for the press/release sequencing, injectable so the state
/// machine can be tested without real delays.
pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PressState {
    Idle,
    Pressed { since: Instant },
}

/// A relay or button contact driven as a timed pulse: `press` raises the
/// pin, `update` lowers it once the hold duration has elapsed. No sleeps;
/// the control loop's own cadence advances the state machine.
pub struct PulsedOutput {
    pin: OutputPin,
    hold: Duration,
    state: PressState,
}

impl PulsedOutput {
    pub fn new(pin_number: u8, hold: Duration) -> Result<Self, Box<dyn Error>> {
        let gpio = Gpio::new()?;
        let pin = gpio.get(pin_number)?.into_output_low();
        Ok(Self {
            pin,
            hold,
            state: PressState::Idle,
        })
    }

    /// Begin a press. A press already in progress is left alone.
    pub fn press(&mut self, clock: &impl Clock) {
        if self.state == PressState::Idle {
            self.pin.set_high();
            self.state = PressState::Pressed { since: clock.now() };
        }
    }

    /// Release the contact once it has been held long enough.
    pub fn update(&mut self, clock: &impl Clock) {
        if let PressState::Pressed { since } = self.state {
            if clock.now().duration_since(since) >= self.hold {
                self.pin.set_low();
                self.state = PressState::Idle;
            }
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, PressState::Pressed { .. })
    }
}
