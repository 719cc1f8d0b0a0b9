//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Stack** - SoftDevice configuration, GAP name / preferred
//!    connection parameters, and the raw disconnect / PHY requests.
//! 2. **GATT** - a vendor service with one write-only press characteristic.
//! 3. **Peripheral** - advertises (slow after boot, fast after a
//!    disconnect), serves a single link, and negotiates its connection
//!    parameters.
//!
//! Writes are handed to the scheduler queue defined in the crate root.

pub mod advertising;
pub mod conn_params;
pub mod gatt;
pub mod peripheral;
pub mod stack;
