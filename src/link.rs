//! Single-link connection state.
//!
//! The device is a single-peripheral, single-link design: at most one
//! connection handle is live at a time, and it is reset to the
//! [`ConnectionHandle::INVALID`] sentinel whenever the link goes away.

/// Opaque SoftDevice connection handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionHandle(u16);

impl ConnectionHandle {
    /// `BLE_CONN_HANDLE_INVALID`.
    pub const INVALID: Self = Self(0xFFFF);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

/// Which side of the GATT link reported a timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GattRole {
    Client,
    Server,
}

/// Tracks the current link.
#[derive(Debug)]
pub struct Link {
    current: ConnectionHandle,
}

impl Link {
    pub const fn new() -> Self {
        Self {
            current: ConnectionHandle::INVALID,
        }
    }

    /// Record a freshly established link.
    pub fn connect(&mut self, conn: ConnectionHandle) {
        self.current = conn;
    }

    /// Forget the current link. Safe to call with no link.
    pub fn disconnect(&mut self) {
        self.current = ConnectionHandle::INVALID;
    }

    /// Claim the live link for a timeout-driven disconnect.
    ///
    /// Returns `Some` only if `conn` is the live link; the link is cleared
    /// so a second timeout for the same handle yields `None`.
    pub fn take_for_timeout(&mut self, conn: ConnectionHandle) -> Option<ConnectionHandle> {
        if conn.is_valid() && self.current == conn {
            self.current = ConnectionHandle::INVALID;
            Some(conn)
        } else {
            None
        }
    }

    pub fn current(&self) -> ConnectionHandle {
        self.current
    }

    pub fn is_connected(&self) -> bool {
        self.current.is_valid()
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}
