//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

use crate::ports::Level;

// Scheduler

/// Maximum number of pending events in the cooperative scheduler queue.
pub const SCHED_QUEUE_SIZE: usize = 20;

// Press emulation

/// Pulse length for a short press request (kind = 1).
pub const SHORT_PRESS_MS: u32 = 600;

/// Pulse length for a long press request (kind = 2).
pub const LONG_PRESS_MS: u32 = 4000;

/// Level the control pin is driven to while a press is emulated.
/// The controlled button line is active-low.
pub const ACTUATOR_ACTIVE_LEVEL: Level = Level::Low;

// Local button

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Local holds at least this long are reported as long presses.
pub const LONG_HOLD_THRESHOLD_MS: u64 = 2000;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button       → P0.11  (input, pull-up, any edge)
//   Control pin  → P0.03  (reconfigurable, idles as input)

// Watchdog

/// Watchdog feed period (ms).
pub const WATCHDOG_FEED_INTERVAL_MS: u64 = 1000;

/// Watchdog reload value (ms).
///
/// The feed task shares the executor with the blocking pulse handler.  The
/// scheduler yields after every event, so the timeout must cover one pulse
/// (never a whole queue) plus one feed period.
pub const WATCHDOG_TIMEOUT_MS: u32 = 8000;

const _: () = assert!(WATCHDOG_TIMEOUT_MS as u64 > LONG_PRESS_MS as u64 + WATCHDOG_FEED_INTERVAL_MS);

// BLE GAP

/// Prefix of the advertised device name; followed by four address octets in hex.
pub const DEVICE_NAME_PREFIX: &str = "BLE_";

/// Bluetooth SIG company identifier carried in the manufacturer data (Nordic).
pub const COMPANY_ID: u16 = 0x0059;

/// GAP appearance value (generic / unknown).
pub const APPEARANCE: u16 = 0x0000;

/// BLE connection interval range (in 1.25 ms units).
/// 8 = 10 ms, 16 = 20 ms.
pub const BLE_CONN_INTERVAL_MIN: u16 = 8;
pub const BLE_CONN_INTERVAL_MAX: u16 = 16;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Largest ATT MTU offered to the peer.
pub const BLE_ATT_MTU: u16 = 247;

// Advertising

/// Fast advertising interval (0.625 ms units). 40 = 25 ms.
pub const ADV_FAST_INTERVAL: u32 = 40;

/// Fast advertising duration (10 ms units). 3000 = 30 s.
pub const ADV_FAST_TIMEOUT: u16 = 3000;

/// Slow advertising interval (0.625 ms units). 800 = 500 ms.
pub const ADV_SLOW_INTERVAL: u32 = 800;

/// Slow advertising duration (10 ms units). 18000 = 180 s.
pub const ADV_SLOW_TIMEOUT: u16 = 18000;

// Connection parameter negotiation

/// Delay from connect to the first connection parameter update request.
pub const FIRST_CONN_PARAMS_UPDATE_DELAY_MS: u64 = 5000;

/// Delay between subsequent update requests.
pub const NEXT_CONN_PARAMS_UPDATE_DELAY_MS: u64 = 30000;

/// Number of update attempts before giving up.
pub const MAX_CONN_PARAMS_UPDATE_COUNT: u8 = 3;

/// Drop the link when negotiation gives up.
pub const DISCONNECT_ON_CONN_PARAMS_FAIL: bool = true;
