//! Application wiring between the BLE stack, the scheduler and the actuator.
//!
//! Two explicit contexts replace module-level state:
//!
//! - [`Application`] lives on the BLE side.  It owns the link state and
//!   the stack handle and implements [`BleEventHandler`].  Characteristic
//!   writes are bridged into the scheduler without interpretation.
//! - [`Controller`] lives on the drain side.  It owns the actuator and the
//!   blocking delay and is what scheduler handlers receive.

use embedded_hal::delay::DelayNs;

use crate::actuator::Actuator;
use crate::button_logic::ButtonEdge;
use crate::error::Error;
use crate::link::{ConnectionHandle, GattRole, Link};
use crate::ports::{BleStack, ControlPin, DisconnectReason};
use crate::scheduler::{EventQueue, Handler, PendingEvent};

// ═══════════════════════════════════════════════════════════════════════════
// Drain side
// ═══════════════════════════════════════════════════════════════════════════

/// Consumer context handed to scheduler handlers.
pub struct Controller<P, D> {
    actuator: Actuator<P>,
    delay: D,
    ignored: u32,
}

impl<P: ControlPin, D: DelayNs> Controller<P, D> {
    pub fn new(actuator: Actuator<P>, delay: D) -> Self {
        Self {
            actuator,
            delay,
            ignored: 0,
        }
    }

    pub fn actuator(&self) -> &Actuator<P> {
        &self.actuator
    }

    /// Remote requests with an unknown kind, since boot.
    pub fn ignored_count(&self) -> u32 {
        self.ignored
    }
}

/// Scheduler handler for press requests written by the peer.
pub fn remote_press<P: ControlPin, D: DelayNs>(ctx: &mut Controller<P, D>, event: PendingEvent) {
    if ctx.actuator.press(event.kind, &mut ctx.delay).is_none() {
        ctx.ignored = ctx.ignored.wrapping_add(1);
    }
}

/// Scheduler handler mirroring the local button onto the control pin.
pub fn button_mirror<P: ControlPin, D: DelayNs>(ctx: &mut Controller<P, D>, event: PendingEvent) {
    match ButtonEdge::from_event(event) {
        Some(ButtonEdge::Pressed) => ctx.actuator.hold(),
        Some(ButtonEdge::Released) => ctx.actuator.release(),
        None => {}
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BLE side
// ═══════════════════════════════════════════════════════════════════════════

/// Events the BLE stack delivers to the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleEvent {
    Connected(ConnectionHandle),
    Disconnected(ConnectionHandle),
    PhyUpdateRequest(ConnectionHandle),
    GattTimeout(ConnectionHandle, GattRole),
    CharacteristicWrite { conn: ConnectionHandle, value: u8 },
    /// Anything the application does not react to.
    Other,
}

/// One method per event category.
///
/// An `Err` from any method other than a characteristic write means a
/// stack call failed and the caller must apply the fatal-error policy.
pub trait BleEventHandler {
    fn on_connected(&mut self, conn: ConnectionHandle) -> Result<(), Error>;
    fn on_disconnected(&mut self, conn: ConnectionHandle) -> Result<(), Error>;
    fn on_phy_update_request(&mut self, conn: ConnectionHandle) -> Result<(), Error>;
    fn on_gatt_timeout(&mut self, conn: ConnectionHandle, role: GattRole) -> Result<(), Error>;
    fn on_characteristic_write(&mut self, conn: ConnectionHandle, value: u8) -> Result<(), Error>;
}

/// Route a stack event to the matching handler method.
pub fn dispatch<H: BleEventHandler + ?Sized>(handler: &mut H, event: BleEvent) -> Result<(), Error> {
    match event {
        BleEvent::Connected(conn) => handler.on_connected(conn),
        BleEvent::Disconnected(conn) => handler.on_disconnected(conn),
        BleEvent::PhyUpdateRequest(conn) => handler.on_phy_update_request(conn),
        BleEvent::GattTimeout(conn, role) => handler.on_gatt_timeout(conn, role),
        BleEvent::CharacteristicWrite { conn, value } => {
            handler.on_characteristic_write(conn, value)
        }
        BleEvent::Other => Ok(()),
    }
}

/// Event-side application context.
pub struct Application<'q, S, C, const N: usize> {
    stack: S,
    link: Link,
    queue: &'q EventQueue<C, N>,
    on_write: Handler<C>,
}

impl<'q, S: BleStack, C, const N: usize> Application<'q, S, C, N> {
    /// `on_write` is paired with every written byte in the queue.
    pub fn new(stack: S, queue: &'q EventQueue<C, N>, on_write: Handler<C>) -> Self {
        Self {
            stack,
            link: Link::new(),
            queue,
            on_write,
        }
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn stack(&self) -> &S {
        &self.stack
    }

    /// Events rejected by a full queue, since boot.
    pub fn queue_overflows(&self) -> u32 {
        self.queue.overflow_count()
    }
}

impl<'q, S: BleStack, C, const N: usize> BleEventHandler for Application<'q, S, C, N> {
    fn on_connected(&mut self, conn: ConnectionHandle) -> Result<(), Error> {
        self.link.connect(conn);
        Ok(())
    }

    fn on_disconnected(&mut self, _conn: ConnectionHandle) -> Result<(), Error> {
        self.link.disconnect();
        Ok(())
    }

    fn on_phy_update_request(&mut self, conn: ConnectionHandle) -> Result<(), Error> {
        self.stack.request_auto_phy(conn)?;
        Ok(())
    }

    fn on_gatt_timeout(&mut self, conn: ConnectionHandle, _role: GattRole) -> Result<(), Error> {
        // Client and server timeouts can both fire for one link; only the
        // first one finds it live.
        if let Some(conn) = self.link.take_for_timeout(conn) {
            self.stack
                .disconnect(conn, DisconnectReason::RemoteUserTerminated)?;
        }
        Ok(())
    }

    fn on_characteristic_write(&mut self, _conn: ConnectionHandle, value: u8) -> Result<(), Error> {
        self.queue.enqueue(PendingEvent::new(value), self.on_write)
    }
}
