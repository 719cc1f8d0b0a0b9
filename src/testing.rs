//! Recording fakes for host unit tests.

use embedded_hal::delay::DelayNs;

use crate::error::BleError;
use crate::link::ConnectionHandle;
use crate::ports::{BleStack, ControlPin, DisconnectReason, Level, Pull};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinOp {
    Output(Level, Pull),
    Input(Pull),
}

/// Pin that records every reconfiguration.
#[derive(Default)]
pub struct RecordingPin {
    pub ops: Vec<PinOp>,
}

impl RecordingPin {
    pub fn output_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PinOp::Output(..)))
            .count()
    }
}

impl ControlPin for RecordingPin {
    fn set_output(&mut self, level: Level, pull: Pull) {
        self.ops.push(PinOp::Output(level, pull));
    }

    fn set_input(&mut self, pull: Pull) {
        self.ops.push(PinOp::Input(pull));
    }

    fn is_high(&self) -> bool {
        // Floating inputs read high on this board (external pull-up).
        !matches!(self.ops.last(), Some(PinOp::Output(Level::Low, _)))
    }
}

/// Delay that returns immediately and records the requested waits.
#[derive(Default)]
pub struct RecordingDelay {
    pub waits_ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackCall {
    Disconnect(ConnectionHandle, DisconnectReason),
    AutoPhy(ConnectionHandle),
}

/// Stack that records requests and can be told to refuse them.
#[derive(Default)]
pub struct MockStack {
    pub calls: Vec<StackCall>,
    pub refuse: bool,
}

impl MockStack {
    pub fn disconnects(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, StackCall::Disconnect(..)))
            .count()
    }
}

impl BleStack for MockStack {
    fn disconnect(
        &mut self,
        conn: ConnectionHandle,
        reason: DisconnectReason,
    ) -> Result<(), BleError> {
        self.calls.push(StackCall::Disconnect(conn, reason));
        if self.refuse {
            Err(BleError::DisconnectFailed)
        } else {
            Ok(())
        }
    }

    fn request_auto_phy(&mut self, conn: ConnectionHandle) -> Result<(), BleError> {
        self.calls.push(StackCall::AutoPhy(conn));
        if self.refuse {
            Err(BleError::PhyUpdateFailed)
        } else {
            Ok(())
        }
    }
}
