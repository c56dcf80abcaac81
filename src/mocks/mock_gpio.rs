// This file is only compiled during tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

thread_local! {
    static OUTPUT_LEVELS: RefCell<HashMap<u8, Level>> = RefCell::new(HashMap::new());
    static PWM_DUTIES: RefCell<HashMap<u8, f64>> = RefCell::new(HashMap::new());
}

pub struct Gpio;

impl Gpio {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Ok(Gpio)
    }

    pub fn get(&self, pin: u8) -> Result<Pin, Box<dyn Error>> {
        Ok(Pin { pin })
    }
}

pub struct Pin {
    pin: u8,
}

impl Pin {
    pub fn into_output_low(self) -> OutputPin {
        OUTPUT_LEVELS.with(|levels| {
            levels.borrow_mut().insert(self.pin, Level::Low);
        });
        OutputPin { pin: self.pin }
    }
}

pub struct OutputPin {
    pin: u8,
}

impl OutputPin {
    pub fn set_high(&mut self) {
        OUTPUT_LEVELS.with(|levels| {
            levels.borrow_mut().insert(self.pin, Level::High);
        });
    }

    pub fn set_low(&mut self) {
        OUTPUT_LEVELS.with(|levels| {
            levels.borrow_mut().insert(self.pin, Level::Low);
        });
    }

    pub fn set_pwm_frequency(
        &mut self,
        _frequency: f64,
        duty_cycle: f64,
    ) -> Result<(), Box<dyn Error>> {
        PWM_DUTIES.with(|duties| {
            duties.borrow_mut().insert(self.pin, duty_cycle);
        });
        Ok(())
    }

    pub fn clear_pwm(&mut self) -> Result<(), Box<dyn Error>> {
        PWM_DUTIES.with(|duties| {
            duties.borrow_mut().insert(self.pin, 0.0);
        });
        Ok(())
    }
}

// test helpers

pub fn get_mock_output_level(pin: u8) -> Level {
    OUTPUT_LEVELS.with(|levels| *levels.borrow().get(&pin).unwrap_or(&Level::Low))
}

pub fn get_mock_pwm_duty(pin: u8) -> f64 {
    PWM_DUTIES.with(|duties| *duties.borrow().get(&pin).unwrap_or(&0.0))
}

pub fn reset_mock_gpio() {
    OUTPUT_LEVELS.with(|levels| levels.borrow_mut().clear());
    PWM_DUTIES.with(|duties| duties.borrow_mut().clear());
}
