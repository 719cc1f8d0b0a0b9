//! blepress - BLE-controlled button press emulator for nRF52840.
//!
//! A peer writes a one-byte press kind to the vendor characteristic; the
//! byte is queued and, from the scheduler task, turned into a timed pulse
//! on the control pin (1 = 600 ms, 2 = 4000 ms, anything else ignored).
//! The local button is mirrored onto the same pin through the same queue.
//!
//! Tasks:
//!   - `softdevice_task` - SoftDevice event pump
//!   - `ble_task`        - advertising, GATT server, parameter negotiation
//!   - `scheduler_task`  - dispatches queued events one per poll (the only pin owner)
//!   - `button_task`     - debounced local button
//!   - `watchdog_task`   - feeds the hardware watchdog

#![no_std]
#![no_main]

mod actuator;
mod app;
mod ble;
mod board;
mod button;
mod button_logic;
mod config;
mod error;
mod link;
mod ports;
mod scheduler;
mod watchdog;

use defmt::{debug, error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_nrf::gpio::{AnyPin, Flex, Pin};
use embassy_nrf::interrupt::Priority;
use embassy_nrf::wdt::WatchdogHandle;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Delay;
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::actuator::{Actuator, ActuatorState};
use crate::app::Controller;
use crate::ble::gatt::Server;
use crate::board::NrfControlPin;
use crate::config::{ACTUATOR_ACTIVE_LEVEL, SCHED_QUEUE_SIZE};
use crate::error::{BleError, Error};
use crate::scheduler::EventQueue;

/// Drain-side context: the actuator and the blocking delay it pulses with.
pub type Ctx = Controller<NrfControlPin<'static>, Delay>;

/// Scheduler queue shared by the BLE write path and the button task.
pub static QUEUE: EventQueue<Ctx, SCHED_QUEUE_SIZE> = EventQueue::new();

/// Raised after every successful enqueue.
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Log `err` and reset the chip.
pub fn fatal(err: Error) -> ! {
    error!("fatal: {}", err);
    cortex_m::peripheral::SCB::sys_reset()
}

// ═══════════════════════════════════════════════════════════════════════════
// Tasks
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server, addr: [u8; 6]) -> ! {
    ble::peripheral::run(sd, server, addr).await
}

#[embassy_executor::task]
async fn scheduler_task(mut ctx: Ctx) -> ! {
    loop {
        WAKE.wait().await;
        // A pulse blocks the executor; yield between events so the
        // watchdog and BLE tasks run at least once per pulse.
        let mut dispatched = 0usize;
        while QUEUE.dispatch_next(&mut ctx) {
            dispatched += 1;
            yield_now().await;
        }
        debug!(
            "scheduler: {} events, {} pulses, {} ignored",
            dispatched,
            ctx.actuator().pulse_count(),
            ctx.ignored_count()
        );
        if ctx.actuator().state() == ActuatorState::Idle && ctx.actuator().is_active() {
            warn!("scheduler: control pin reads active while released");
        }
    }
}

#[embassy_executor::task]
async fn button_task(pin: AnyPin) -> ! {
    button::button_task(pin).await
}

#[embassy_executor::task]
async fn watchdog_task(handle: WatchdogHandle) -> ! {
    watchdog::feed_task(handle).await
}

// ═══════════════════════════════════════════════════════════════════════════
// Entry
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("blepress starting");

    // Priorities 0, 1 and 4 belong to the SoftDevice.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    config.dcdc.reg1 = true;
    let p = embassy_nrf::init(config);

    let wdt = match watchdog::start(p.WDT) {
        Ok(handle) => handle,
        Err(e) => fatal(e),
    };

    // Control pin idles as a floating input until the first request.
    let control = NrfControlPin::new(Flex::new(p.P0_03));
    let ctx = Controller::new(Actuator::new(control, ACTUATOR_ACTIVE_LEVEL), Delay);

    let sd = Softdevice::enable(&ble::stack::softdevice_config());
    static SERVER: StaticCell<Server> = StaticCell::new();
    let server: &'static Server = match Server::new(sd) {
        Ok(server) => SERVER.init(server),
        Err(e) => {
            error!("GATT registration failed: {}", e);
            fatal(BleError::ServiceRegistration.into())
        }
    };
    let sd: &'static Softdevice = sd;
    let addr = match ble::stack::configure_gap(sd) {
        Ok(addr) => addr,
        Err(e) => fatal(e.into()),
    };

    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(watchdog_task(wdt)));
    unwrap!(spawner.spawn(scheduler_task(ctx)));
    unwrap!(spawner.spawn(button_task(p.P0_11.degrade())));
    unwrap!(spawner.spawn(ble_task(sd, server, addr)));

    info!("blepress running");
}
