//! Unified error type for blepress.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // BLE
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    // Scheduler
    /// The event queue is full; the event was rejected.
    QueueFull,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,

    /// The watchdog could not be configured.
    Watchdog,
}

impl Error {
    /// Whether this error must take the device down.
    ///
    /// Only queue exhaustion is recoverable; every stack or driver failure
    /// leaves the system in a state with no defined recovery path.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::QueueFull)
    }
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
///
/// The raw SoftDevice code is logged where the call fails; only the
/// failing operation travels up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// GATT service registration failed.
    ServiceRegistration,
    /// Advertising could not be started.
    AdvertiseFailed,
    /// Disconnect request was refused.
    DisconnectFailed,
    /// PHY update request was refused.
    PhyUpdateFailed,
    /// Device name or preferred connection parameters could not be set.
    GapConfig,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
