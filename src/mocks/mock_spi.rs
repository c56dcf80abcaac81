// This file is only compiled during tests

use std::cell::Cell;
use std::error::Error;

thread_local! {
    static MOCK_ADC_READING: Cell<u16> = const { Cell::new(0) };
    static FAIL_TRANSFERS: Cell<bool> = const { Cell::new(false) };
}

#[derive(Clone, Copy, Debug)]
pub enum Bus {
    Spi0,
}

#[derive(Clone, Copy, Debug)]
pub enum SlaveSelect {
    Ss0,
}

#[derive(Clone, Copy, Debug)]
pub enum Mode {
    Mode0,
}

pub struct Spi;

impl Spi {
    pub fn new(
        _bus: Bus,
        _slave_select: SlaveSelect,
        _clock_speed: u32,
        _mode: Mode,
    ) -> Result<Self, Box<dyn Error>> {
        Ok(Spi)
    }

    /// Answers any MCP3008 conversion request with the configured reading.
    pub fn transfer(&mut self, read: &mut [u8], _write: &[u8]) -> Result<usize, Box<dyn Error>> {
        if FAIL_TRANSFERS.with(|fail| fail.get()) {
            return Err("mock SPI transfer failure".into());
        }
        let value = MOCK_ADC_READING.with(|reading| reading.get());
        if read.len() >= 3 {
            read[0] = 0;
            read[1] = ((value >> 8) & 0x03) as u8;
            read[2] = (value & 0xFF) as u8;
        }
        Ok(read.len())
    }
}

// test helpers

pub fn set_mock_adc_reading(value: u16) {
    MOCK_ADC_READING.with(|reading| reading.set(value));
}

pub fn set_mock_spi_failure(fail: bool) {
    FAIL_TRANSFERS.with(|flag| flag.set(fail));
}

pub fn reset_mock_spi() {
    MOCK_ADC_READING.with(|reading| reading.set(0));
    set_mock_spi_failure(false);
}
