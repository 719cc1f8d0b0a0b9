//! Shared fakes for the integration tests.
//!
//! The pin, the delay and the stack all append to one timeline so tests
//! can assert on the interleaving of pin changes and waits.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use blepress::app::{remote_press, Application, Controller};
use blepress::link::ConnectionHandle;
use blepress::ports::{BleStack, ControlPin, DisconnectReason, Level, Pull};
use blepress::scheduler::EventQueue;
use blepress::{actuator::Actuator, BleError};
use embedded_hal::delay::DelayNs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Output(Level, Pull),
    Input(Pull),
    Wait(u32),
    Disconnect(u16, u8),
    AutoPhy(u16),
}

pub type Timeline = Rc<RefCell<Vec<Step>>>;

/// Control pin wired to a board with an external pull-up.
///
/// Clones share the pad level, so a clone can read what the actuator drives.
#[derive(Clone)]
pub struct TimelinePin {
    timeline: Timeline,
    high: Rc<Cell<bool>>,
}

impl ControlPin for TimelinePin {
    fn set_output(&mut self, level: Level, pull: Pull) {
        self.high.set(level == Level::High);
        self.timeline.borrow_mut().push(Step::Output(level, pull));
    }

    fn set_input(&mut self, pull: Pull) {
        self.high.set(true);
        self.timeline.borrow_mut().push(Step::Input(pull));
    }

    fn is_high(&self) -> bool {
        self.high.get()
    }
}

/// Delay that also samples the control pin at the start of every wait.
pub struct TimelineDelay {
    timeline: Timeline,
    pin: TimelinePin,
    samples: Rc<RefCell<Vec<(u32, bool)>>>,
}

impl TimelineDelay {
    fn wait(&mut self, ms: u32) {
        self.samples.borrow_mut().push((ms, self.pin.is_high()));
        self.timeline.borrow_mut().push(Step::Wait(ms));
    }
}

impl DelayNs for TimelineDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.wait(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait(ms);
    }
}

pub struct TimelineStack {
    timeline: Timeline,
}

impl BleStack for TimelineStack {
    fn disconnect(
        &mut self,
        conn: ConnectionHandle,
        reason: DisconnectReason,
    ) -> Result<(), BleError> {
        self.timeline
            .borrow_mut()
            .push(Step::Disconnect(conn.raw(), reason.hci_code()));
        Ok(())
    }

    fn request_auto_phy(&mut self, conn: ConnectionHandle) -> Result<(), BleError> {
        self.timeline.borrow_mut().push(Step::AutoPhy(conn.raw()));
        Ok(())
    }
}

pub type Ctx = Controller<TimelinePin, TimelineDelay>;
pub const QUEUE_SIZE: usize = 20;
pub type Queue = EventQueue<Ctx, QUEUE_SIZE>;
pub type App<'q> = Application<'q, TimelineStack, Ctx, QUEUE_SIZE>;

/// A device as wired at boot: control pin parked, no link.
pub struct Rig {
    pub timeline: Timeline,
    /// `(wait ms, pin reads high)` for every wait, in order.
    pub samples: Rc<RefCell<Vec<(u32, bool)>>>,
    pub ctx: Ctx,
}

impl Rig {
    pub fn new() -> Self {
        let timeline = Timeline::default();
        let samples: Rc<RefCell<Vec<(u32, bool)>>> = Rc::default();
        let pin = TimelinePin {
            timeline: timeline.clone(),
            high: Rc::new(Cell::new(true)),
        };
        let delay = TimelineDelay {
            timeline: timeline.clone(),
            pin: pin.clone(),
            samples: Rc::clone(&samples),
        };
        let ctx = Controller::new(Actuator::new(pin, Level::Low), delay);
        Self {
            timeline,
            samples,
            ctx,
        }
    }

    pub fn app<'q>(&self, queue: &'q Queue) -> App<'q> {
        let stack = TimelineStack {
            timeline: self.timeline.clone(),
        };
        Application::new(stack, queue, remote_press)
    }

    /// Steps recorded after boot.
    pub fn steps(&self) -> Vec<Step> {
        self.timeline.borrow()[1..].to_vec()
    }

    pub fn clear(&self) {
        self.timeline.borrow_mut().truncate(1);
    }
}

/// The three steps of one pulse of `ms`.
pub fn pulse(ms: u32) -> [Step; 3] {
    [
        Step::Output(Level::Low, Pull::Down),
        Step::Wait(ms),
        Step::Input(Pull::None),
    ]
}
