//! Test-only library interface for blepress.
//!
//! This module re-exports the pure logic modules that can be tested
//! on the host (no embedded hardware required): the event queue, the
//! press actuator, link tracking, the BLE event handler, and the
//! advertising / connection parameter helpers.
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs provides a separate entry point for host-based testing.

#![cfg_attr(not(test), no_std)]

pub mod actuator;
pub mod app;
pub mod button_logic;
pub mod config;
pub mod error;
pub mod link;
pub mod ports;
pub mod scheduler;

#[cfg(test)]
mod testing;

// Internal module paths for the actual implementations
#[path = "ble/advertising.rs"]
mod ble_advertising_impl;
#[path = "ble/conn_params.rs"]
mod ble_conn_params_impl;

pub mod ble {
    pub mod advertising {
        pub use crate::ble_advertising_impl::{
            build_adv_data, device_name, AdvMode, ADV_DATA_MAX, DEVICE_NAME_LEN,
        };
    }
    pub mod conn_params {
        pub use crate::ble_conn_params_impl::{ConnParams, Negotiation, NegotiationStep};
    }
}

pub use error::{BleError, Error};
