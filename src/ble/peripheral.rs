//! Peripheral role: advertise, serve one link, negotiate its parameters.
//!
//! Stack events are routed through [`dispatch`] into the [`Application`]
//! handler; characteristic writes end up in the scheduler queue and wake
//! the drain task.

use core::future::pending;

use defmt::{error, info, warn};
use embassy_futures::select::select;
use embassy_time::{Duration, Timer};
use nrf_softdevice::ble::peripheral::{self, AdvertiseError};
use nrf_softdevice::ble::{gatt_server, Connection};
use nrf_softdevice::Softdevice;

use crate::app::{dispatch, remote_press, Application, BleEvent};
use crate::ble::advertising::{build_adv_data, device_name, AdvMode};
use crate::ble::conn_params::{ConnParams, Negotiation, NegotiationStep};
use crate::ble::gatt::{PressServiceEvent, Server, ServerEvent};
use crate::ble::stack::{from_raw, to_raw, SoftdeviceStack};
use crate::config::SCHED_QUEUE_SIZE;
use crate::error::{BleError, Error};
use crate::link::ConnectionHandle;
use crate::ports::{BleStack, DisconnectReason};
use crate::{fatal, Ctx, QUEUE, WAKE};

type App = Application<'static, SoftdeviceStack, Ctx, SCHED_QUEUE_SIZE>;

/// Apply the error policy to a handler result.
fn check(res: Result<(), Error>) {
    match res {
        Ok(()) => {}
        Err(e) if e.is_fatal() => fatal(e),
        Err(e) => warn!("ble: event dropped: {}", e),
    }
}

pub async fn run(sd: &'static Softdevice, server: &'static Server, addr: [u8; 6]) -> ! {
    let name = device_name(&addr);
    let adv_data = match build_adv_data(&name, &addr) {
        Ok(data) => data,
        Err(e) => fatal(e),
    };

    let mut app: App = Application::new(SoftdeviceStack, &QUEUE, remote_press);
    let mut mode = AdvMode::on_boot();

    loop {
        let config = peripheral::Config {
            interval: mode.interval(),
            timeout: Some(mode.timeout()),
            ..Default::default()
        };
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data,
            scan_data: &[],
        };

        info!("advertising: {} as {}", mode, name.as_str());
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(AdvertiseError::Timeout) => {
                mode = mode.after_timeout();
                continue;
            }
            Err(e) => {
                error!("advertising failed: {}", e);
                fatal(BleError::AdvertiseFailed.into())
            }
        };

        // Dropped before we got to look at it.
        let Some(raw_handle) = conn.handle() else {
            mode = AdvMode::after_disconnect();
            continue;
        };
        let handle = ConnectionHandle::new(raw_handle);

        info!("ble: connected ({})", handle);
        check(dispatch(&mut app, BleEvent::Connected(handle)));

        serve(&conn, server, &mut app, handle).await;

        info!("ble: disconnected ({})", handle);
        check(dispatch(&mut app, BleEvent::Disconnected(handle)));
        if app.queue_overflows() > 0 {
            warn!("ble: {} requests dropped since boot", app.queue_overflows());
        }
        mode = AdvMode::after_disconnect();
    }
}

/// Run the GATT server until the link drops.
async fn serve(conn: &Connection, server: &Server, app: &mut App, handle: ConnectionHandle) {
    let gatt = gatt_server::run(conn, server, |e| match e {
        ServerEvent::Press(PressServiceEvent::PressWrite(value)) => {
            info!("ble: press request {}", value);
            let res = dispatch(app, BleEvent::CharacteristicWrite { conn: handle, value });
            if res.is_ok() {
                WAKE.signal(());
            }
            check(res);
        }
    });

    let params = async {
        if let Err(e) = negotiate(conn).await {
            fatal(e);
        }
        pending::<()>().await
    };

    select(gatt, params).await;
}

/// Bring the link into the preferred connection interval range.
async fn negotiate(conn: &Connection) -> Result<(), Error> {
    let mut negotiation = Negotiation::new();
    Timer::after(Duration::from_millis(negotiation.first_delay_ms())).await;

    loop {
        match negotiation.on_check(&from_raw(&conn.conn_params())) {
            NegotiationStep::Done => {
                info!("conn params: accepted");
                return Ok(());
            }
            NegotiationStep::Request => {
                if let Err(e) = conn.set_conn_params(to_raw(&ConnParams::PREFERRED)) {
                    warn!("conn params: update request failed: {}", e);
                }
                Timer::after(Duration::from_millis(negotiation.retry_delay_ms())).await;
            }
            NegotiationStep::GiveUp { disconnect } => {
                warn!(
                    "conn params: rejected after {} requests",
                    negotiation.requests()
                );
                if let (true, Some(raw_handle)) = (disconnect, conn.handle()) {
                    SoftdeviceStack.disconnect(
                        ConnectionHandle::new(raw_handle),
                        DisconnectReason::ConnIntervalUnacceptable,
                    )?;
                }
                return Ok(());
            }
        }
    }
}
