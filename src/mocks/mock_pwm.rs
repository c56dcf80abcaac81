// This file is only compiled during tests

use std::cell::Cell;
use std::error::Error;

thread_local! {
    static MOCK_PWM_DUTY: Cell<f64> = const { Cell::new(0.0) };
    static MOCK_PWM_WRITES: Cell<u32> = const { Cell::new(0) };
}

pub struct Pwm {
    pin: u8,
}

impl Pwm {
    pub fn new(pin: u8) -> Result<Self, Box<dyn Error>> {
        Ok(Pwm { pin })
    }

    pub fn set_duty_cycle(&mut self, duty_cycle: f64) -> Result<(), Box<dyn Error>> {
        MOCK_PWM_DUTY.with(|duty| duty.set(duty_cycle));
        MOCK_PWM_WRITES.with(|writes| writes.set(writes.get() + 1));
        println!(
            "[Mock PWM {}] Duty cycle set to {:.4}",
            self.pin, duty_cycle
        );
        Ok(())
    }

    pub fn disable(&mut self) -> Result<(), Box<dyn Error>> {
        println!("[Mock PWM {}] Disabled", self.pin);
        Ok(())
    }
}

// test helpers

pub fn get_mock_duty_cycle() -> f64 {
    MOCK_PWM_DUTY.with(|duty| duty.get())
}

pub fn get_mock_write_count() -> u32 {
    MOCK_PWM_WRITES.with(|writes| writes.get())
}

pub fn reset_mock_pwm() {
    MOCK_PWM_DUTY.with(|duty| duty.set(0.0));
    MOCK_PWM_WRITES.with(|writes| writes.set(0));
}
