//! Press classifier and actuator.
//!
//! Turns a one-byte press kind into a timed pulse on the control pin:
//!
//! ```text
//! Idle (pin = input) ──press(kind)──▶ Pulsing (pin = output, active) ──delay──▶ Idle
//!                    ──hold()──────▶ Held    (pin = output, active) ──release()─▶ Idle
//! ```
//!
//! | kind  | pulse   | meaning     |
//! |-------|---------|-------------|
//! | 1     | 600 ms  | short press |
//! | 2     | 4000 ms | long press  |
//! | other | -       | ignored     |
//!
//! The kind byte comes from an untrusted peer; unknown values never touch
//! the pin and never raise an error.

use embedded_hal::delay::DelayNs;

use crate::config::{LONG_PRESS_MS, SHORT_PRESS_MS};
use crate::ports::{ControlPin, Level, PinMode, Pull};

/// A recognised press request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    Short,
    Long,
}

impl PressKind {
    /// Decode a wire value; `None` for anything outside the table.
    pub const fn from_kind(kind: u8) -> Option<Self> {
        match kind {
            1 => Some(PressKind::Short),
            2 => Some(PressKind::Long),
            _ => None,
        }
    }

    /// How long the control pin is held active.
    pub const fn duration_ms(self) -> u32 {
        match self {
            PressKind::Short => SHORT_PRESS_MS,
            PressKind::Long => LONG_PRESS_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorState {
    Idle,
    Pulsing(PressKind),
    Held,
}

/// Sole owner of the control pin.
pub struct Actuator<P> {
    pin: P,
    active: Level,
    mode: PinMode,
    state: ActuatorState,
    pulses: u32,
}

impl<P: ControlPin> Actuator<P> {
    /// Take ownership of `pin` and park it as a floating input.
    pub fn new(mut pin: P, active: Level) -> Self {
        pin.set_input(Pull::None);
        Self {
            pin,
            active,
            mode: PinMode::Input(Pull::None),
            state: ActuatorState::Idle,
            pulses: 0,
        }
    }

    /// Emulate the press encoded by `kind`.
    ///
    /// Blocks for the full pulse through `delay`. The pin is back in input
    /// mode when this returns. Returns `None` (and leaves the pin alone)
    /// for unknown kinds.
    pub fn press(&mut self, kind: u8, delay: &mut impl DelayNs) -> Option<PressKind> {
        let press = PressKind::from_kind(kind)?;

        self.state = ActuatorState::Pulsing(press);
        self.drive_active();
        delay.delay_ms(press.duration_ms());
        self.release();

        self.pulses = self.pulses.wrapping_add(1);
        Some(press)
    }

    /// Drive the pin active until [`release`](Self::release).
    pub fn hold(&mut self) {
        self.drive_active();
        self.state = ActuatorState::Held;
    }

    /// Return the pin to a floating input.
    pub fn release(&mut self) {
        self.pin.set_input(Pull::None);
        self.mode = PinMode::Input(Pull::None);
        self.state = ActuatorState::Idle;
    }

    fn drive_active(&mut self) {
        // Pull-down stays attached while driving, as the board expects.
        self.pin.set_output(self.active, Pull::Down);
        self.mode = PinMode::Output(self.active);
    }

    /// Whether the pin currently reads at its active level.
    ///
    /// Reads the pad rather than the commanded mode, so an external
    /// pull on a released pin reports inactive.
    pub fn is_active(&self) -> bool {
        self.pin.is_high() == (self.active == Level::High)
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Completed pulses since boot.
    pub fn pulse_count(&self) -> u32 {
        self.pulses
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
