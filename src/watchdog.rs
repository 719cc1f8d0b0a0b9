//! Hardware watchdog.
//!
//! Resets the device if the executor stops feeding it for longer than
//! [`WATCHDOG_TIMEOUT_MS`].  The feed task shares the executor with the
//! blocking pulse handler; the scheduler yields between events, so the
//! longest stall is one pulse.

use defmt::{info, warn};
use embassy_nrf::peripherals::WDT;
use embassy_nrf::wdt::{self, HaltConfig, Watchdog, WatchdogHandle};
use embassy_time::{Duration, Timer};

use crate::config::{WATCHDOG_FEED_INTERVAL_MS, WATCHDOG_TIMEOUT_MS};
use crate::error::Error;

/// WDT counts the 32.768 kHz LFCLK.
const TICKS_PER_SECOND: u32 = 32_768;

/// Start the watchdog and return the single feed handle.
pub fn start(wdt: WDT) -> Result<WatchdogHandle, Error> {
    let mut config = wdt::Config::default();
    config.timeout_ticks = WATCHDOG_TIMEOUT_MS * TICKS_PER_SECOND / 1000;
    config.action_during_debug_halt = HaltConfig::PAUSE;

    let (_wdt, [handle]) = Watchdog::try_new(wdt, config).map_err(|_| {
        warn!("watchdog: already running with a different configuration");
        Error::Watchdog
    })?;

    info!("watchdog: armed ({} ms)", WATCHDOG_TIMEOUT_MS);
    Ok(handle)
}

/// Feed the watchdog forever.
pub async fn feed_task(mut handle: WatchdogHandle) -> ! {
    loop {
        handle.pet();
        Timer::after(Duration::from_millis(WATCHDOG_FEED_INTERVAL_MS)).await;
    }
}
