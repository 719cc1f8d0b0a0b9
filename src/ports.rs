//! Hardware seams the core logic is written against.
//!
//! On target these are backed by `embassy-nrf` GPIO and the SoftDevice
//! (see `board.rs` and `ble/stack.rs`); host tests substitute recording
//! fakes.  The blocking delay seam is `embedded_hal::delay::DelayNs`.

use crate::error::BleError;
use crate::link::ConnectionHandle;

/// Logic level of a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// Internal pull resistor selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Direction state of a reconfigurable pin. A pin is in exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input(Pull),
    Output(Level),
}

/// A GPIO whose direction is switched at runtime.
pub trait ControlPin {
    /// Drive the pin at `level`, keeping `pull` attached.
    fn set_output(&mut self, level: Level, pull: Pull);

    /// Release the pin to a high-impedance input.
    fn set_input(&mut self, pull: Pull);

    /// Current electrical level.
    fn is_high(&self) -> bool;
}

/// HCI reason codes used when we terminate a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisconnectReason {
    /// 0x13 - Remote User Terminated Connection.
    RemoteUserTerminated,
    /// 0x3B - Unacceptable Connection Parameters.
    ConnIntervalUnacceptable,
}

impl DisconnectReason {
    pub const fn hci_code(self) -> u8 {
        match self {
            DisconnectReason::RemoteUserTerminated => 0x13,
            DisconnectReason::ConnIntervalUnacceptable => 0x3B,
        }
    }
}

/// Requests the application issues to the BLE stack.
pub trait BleStack {
    /// Terminate the link identified by `conn`.
    fn disconnect(&mut self, conn: ConnectionHandle, reason: DisconnectReason)
        -> Result<(), BleError>;

    /// Answer a PHY update request by letting the controller pick.
    fn request_auto_phy(&mut self, conn: ConnectionHandle) -> Result<(), BleError>;
}
