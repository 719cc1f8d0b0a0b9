//! Advertising payload and mode sequencing.
//!
//! Payload layout (legacy advertising, 31 bytes max):
//! ```text
//! [len][0x01] flags        LE only, general discoverable
//! [len][0x09] local name   "BLE_" + addr[5..=2] as hex
//! [len][0x19] appearance   u16 LE
//! [len][0xFF] manufacturer company id (u16 LE) + 6 address bytes
//! ```
//!
//! Mode sequence: boot starts slow; after a disconnect we advertise fast
//! to let the peer reconnect quickly, falling back to slow on timeout.  A
//! slow-mode timeout restarts slow, so the device never stops advertising.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{
    ADV_FAST_INTERVAL, ADV_FAST_TIMEOUT, ADV_SLOW_INTERVAL, ADV_SLOW_TIMEOUT, APPEARANCE,
    COMPANY_ID, DEVICE_NAME_PREFIX,
};
use crate::error::Error;

/// Legacy advertising data capacity.
pub const ADV_DATA_MAX: usize = 31;

/// `"BLE_"` + 8 hex digits.
pub const DEVICE_NAME_LEN: usize = 12;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;
const AD_TYPE_APPEARANCE: u8 = 0x19;
const AD_TYPE_MANUFACTURER_DATA: u8 = 0xFF;

/// `BLE_GAP_ADV_FLAGS_LE_ONLY_GENERAL_DISC_MODE`.
const FLAGS_LE_ONLY_GENERAL_DISC: u8 = 0x06;

/// Device name derived from the BLE address (`addr` is little-endian, as
/// the SoftDevice reports it).
pub fn device_name(addr: &[u8; 6]) -> String<DEVICE_NAME_LEN> {
    let mut name = String::new();
    // Capacity is exact; the write cannot fail.
    let _ = write!(
        name,
        "{}{:02X}{:02X}{:02X}{:02X}",
        DEVICE_NAME_PREFIX, addr[5], addr[4], addr[3], addr[2]
    );
    name
}

fn push_field(out: &mut Vec<u8, ADV_DATA_MAX>, ad_type: u8, parts: &[&[u8]]) -> Result<(), Error> {
    let body: usize = parts.iter().map(|p| p.len()).sum();
    out.push((body + 1) as u8)
        .map_err(|_| Error::BufferOverflow)?;
    out.push(ad_type).map_err(|_| Error::BufferOverflow)?;
    for part in parts {
        out.extend_from_slice(part)
            .map_err(|_| Error::BufferOverflow)?;
    }
    Ok(())
}

/// Build the advertising data for `name`, tagging the manufacturer block
/// with the raw address bytes.
pub fn build_adv_data(name: &str, addr: &[u8; 6]) -> Result<Vec<u8, ADV_DATA_MAX>, Error> {
    let mut out = Vec::new();
    push_field(&mut out, AD_TYPE_FLAGS, &[&[FLAGS_LE_ONLY_GENERAL_DISC]])?;
    push_field(&mut out, AD_TYPE_COMPLETE_LOCAL_NAME, &[name.as_bytes()])?;
    push_field(&mut out, AD_TYPE_APPEARANCE, &[&APPEARANCE.to_le_bytes()])?;
    push_field(
        &mut out,
        AD_TYPE_MANUFACTURER_DATA,
        &[&COMPANY_ID.to_le_bytes(), addr],
    )?;
    Ok(out)
}

/// Advertising mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvMode {
    Fast,
    Slow,
}

impl AdvMode {
    /// Mode used right after boot.
    pub const fn on_boot() -> Self {
        AdvMode::Slow
    }

    /// Mode used after a link drops.
    pub const fn after_disconnect() -> Self {
        AdvMode::Fast
    }

    /// Mode to continue with after this one timed out.
    pub const fn after_timeout(self) -> Self {
        match self {
            AdvMode::Fast => AdvMode::Slow,
            AdvMode::Slow => AdvMode::Slow,
        }
    }

    /// Interval in 0.625 ms units.
    pub const fn interval(self) -> u32 {
        match self {
            AdvMode::Fast => ADV_FAST_INTERVAL,
            AdvMode::Slow => ADV_SLOW_INTERVAL,
        }
    }

    /// Duration in 10 ms units.
    pub const fn timeout(self) -> u16 {
        match self {
            AdvMode::Fast => ADV_FAST_TIMEOUT,
            AdvMode::Slow => ADV_SLOW_TIMEOUT,
        }
    }
}
