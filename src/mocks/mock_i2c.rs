// This file is only compiled during tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;

thread_local! {
    static REGISTERS: RefCell<HashMap<u8, u8>> = RefCell::new(HashMap::new());
    static FAIL_READS: Cell<bool> = const { Cell::new(false) };
}

pub struct I2c;

impl I2c {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Ok(I2c)
    }

    pub fn set_slave_address(&mut self, _address: u16) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    pub fn smbus_read_byte(&mut self, register: u8) -> Result<u8, Box<dyn Error>> {
        if FAIL_READS.with(|fail| fail.get()) {
            return Err("mock I2C read failure".into());
        }
        REGISTERS.with(|registers| {
            registers
                .borrow()
                .get(&register)
                .copied()
                .ok_or_else(|| format!("mock register 0x{:02X} not set", register).into())
        })
    }

    pub fn smbus_write_byte(&mut self, register: u8, value: u8) -> Result<(), Box<dyn Error>> {
        REGISTERS.with(|registers| {
            registers.borrow_mut().insert(register, value);
        });
        Ok(())
    }
}

// test helpers

pub fn set_mock_register(register: u8, value: u8) {
    REGISTERS.with(|registers| {
        registers.borrow_mut().insert(register, value);
    });
}

pub fn get_mock_register(register: u8) -> Option<u8> {
    REGISTERS.with(|registers| registers.borrow().get(&register).copied())
}

/// Store a signed angle as a little-endian 1/16-degree register pair, the
/// way the BNO055 publishes its Euler angles.
pub fn set_mock_euler_degrees(lsb_register: u8, degrees: f64) {
    let counts = (degrees * 16.0).round() as i16;
    let bytes = counts.to_le_bytes();
    set_mock_register(lsb_register, bytes[0]);
    set_mock_register(lsb_register + 1, bytes[1]);
}

pub fn set_mock_read_failure(fail: bool) {
    FAIL_READS.with(|flag| flag.set(fail));
}

pub fn reset_mock_i2c() {
    REGISTERS.with(|registers| registers.borrow_mut().clear());
    set_mock_read_failure(false);
}
