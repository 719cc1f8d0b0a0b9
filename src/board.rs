//! nRF52840 bindings for the hardware seams in `ports`.

use embassy_nrf::gpio::{self, Flex, OutputDrive};

use crate::ports::{ControlPin, Level, Pull};

fn to_nrf_pull(pull: Pull) -> gpio::Pull {
    match pull {
        Pull::None => gpio::Pull::None,
        Pull::Up => gpio::Pull::Up,
        Pull::Down => gpio::Pull::Down,
    }
}

fn to_nrf_level(level: Level) -> gpio::Level {
    match level {
        Level::Low => gpio::Level::Low,
        Level::High => gpio::Level::High,
    }
}

/// Control line wired to the target's button contact.
pub struct NrfControlPin<'d> {
    pin: Flex<'d>,
}

impl<'d> NrfControlPin<'d> {
    pub fn new(pin: Flex<'d>) -> Self {
        Self { pin }
    }
}

impl ControlPin for NrfControlPin<'_> {
    fn set_output(&mut self, level: Level, pull: Pull) {
        // Latch the level before enabling the driver so the line never
        // glitches through the opposite level.
        self.pin.set_level(to_nrf_level(level));
        self.pin
            .set_as_input_output(to_nrf_pull(pull), OutputDrive::Standard);
    }

    fn set_input(&mut self, pull: Pull) {
        self.pin.set_as_input(to_nrf_pull(pull));
    }

    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
