//! Connection parameter negotiation (pure logic).
//!
//! After a connection is established the peripheral waits
//! [`FIRST_CONN_PARAMS_UPDATE_DELAY_MS`], then checks the parameters the
//! central picked.  If the interval is outside the preferred range, or the
//! slave latency or supervision timeout differ, an update is requested; the check repeats every [`NEXT_CONN_PARAMS_UPDATE_DELAY_MS`]
//! up to [`MAX_CONN_PARAMS_UPDATE_COUNT`] requests before giving up.

use crate::config::{
    BLE_CONN_INTERVAL_MAX, BLE_CONN_INTERVAL_MIN, BLE_SLAVE_LATENCY, BLE_SUP_TIMEOUT,
    DISCONNECT_ON_CONN_PARAMS_FAIL, FIRST_CONN_PARAMS_UPDATE_DELAY_MS,
    MAX_CONN_PARAMS_UPDATE_COUNT, NEXT_CONN_PARAMS_UPDATE_DELAY_MS,
};

/// GAP connection parameters (intervals in 1.25 ms units, timeout in 10 ms).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnParams {
    pub min_interval: u16,
    pub max_interval: u16,
    pub slave_latency: u16,
    pub sup_timeout: u16,
}

impl ConnParams {
    /// Parameters this peripheral asks for.
    pub const PREFERRED: Self = Self {
        min_interval: BLE_CONN_INTERVAL_MIN,
        max_interval: BLE_CONN_INTERVAL_MAX,
        slave_latency: BLE_SLAVE_LATENCY,
        sup_timeout: BLE_SUP_TIMEOUT,
    };

    /// Whether the link parameters in `current` satisfy this preference.
    ///
    /// The interval in use (`current.max_interval`) must lie inside the
    /// range; slave latency and supervision timeout must match exactly.
    pub const fn accepts(&self, current: &ConnParams) -> bool {
        current.max_interval >= self.min_interval
            && current.max_interval <= self.max_interval
            && current.slave_latency == self.slave_latency
            && current.sup_timeout == self.sup_timeout
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NegotiationStep {
    /// Send an update request, then check again after [`Negotiation::retry_delay_ms`].
    Request,
    /// The link runs with acceptable parameters.
    Done,
    /// Attempts exhausted.
    GiveUp { disconnect: bool },
}

/// Per-connection negotiation state.
#[derive(Debug, Default)]
pub struct Negotiation {
    requests: u8,
}

impl Negotiation {
    pub const fn new() -> Self {
        Self { requests: 0 }
    }

    pub const fn first_delay_ms(&self) -> u64 {
        FIRST_CONN_PARAMS_UPDATE_DELAY_MS
    }

    pub const fn retry_delay_ms(&self) -> u64 {
        NEXT_CONN_PARAMS_UPDATE_DELAY_MS
    }

    /// Update requests sent so far.
    pub const fn requests(&self) -> u8 {
        self.requests
    }

    /// Decide what to do with the parameters currently in use.
    pub fn on_check(&mut self, current: &ConnParams) -> NegotiationStep {
        if ConnParams::PREFERRED.accepts(current) {
            return NegotiationStep::Done;
        }
        if self.requests >= MAX_CONN_PARAMS_UPDATE_COUNT {
            return NegotiationStep::GiveUp {
                disconnect: DISCONNECT_ON_CONN_PARAMS_FAIL,
            };
        }
        self.requests += 1;
        NegotiationStep::Request
    }
}
