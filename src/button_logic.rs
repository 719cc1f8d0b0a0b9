//! Local button interpretation (pure logic).
//!
//! The button is active-low with an internal pull-up.  Edges are
//! debounced by the button task, deduplicated here, turned into scheduler
//! events for the mirror handler, and timed so each release can be
//! reported as a short or long press.

use crate::actuator::PressKind;
use crate::config::LONG_HOLD_THRESHOLD_MS;
use crate::scheduler::PendingEvent;

const EDGE_RELEASED: u8 = 0;
const EDGE_PRESSED: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    Pressed,
    Released,
}

impl ButtonEdge {
    /// Edge implied by a settled pin level.
    pub const fn from_level(is_high: bool) -> Self {
        if is_high {
            ButtonEdge::Released
        } else {
            ButtonEdge::Pressed
        }
    }

    pub const fn to_event(self) -> PendingEvent {
        match self {
            ButtonEdge::Pressed => PendingEvent::new(EDGE_PRESSED),
            ButtonEdge::Released => PendingEvent::new(EDGE_RELEASED),
        }
    }

    pub const fn from_event(event: PendingEvent) -> Option<Self> {
        match event.kind {
            EDGE_PRESSED => Some(ButtonEdge::Pressed),
            EDGE_RELEASED => Some(ButtonEdge::Released),
            _ => None,
        }
    }
}

/// Suppresses repeated levels after debounce.
pub struct Debouncer {
    last_high: bool,
}

impl Debouncer {
    /// `idle_high` is the level read at boot.
    pub const fn new(idle_high: bool) -> Self {
        Self {
            last_high: idle_high,
        }
    }

    /// Feed the level read after the debounce delay.
    pub fn settle(&mut self, is_high: bool) -> Option<ButtonEdge> {
        if is_high == self.last_high {
            return None;
        }
        self.last_high = is_high;
        Some(ButtonEdge::from_level(is_high))
    }
}

/// Classify a completed hold.
pub const fn classify_hold(held_ms: u64) -> PressKind {
    if held_ms >= LONG_HOLD_THRESHOLD_MS {
        PressKind::Long
    } else {
        PressKind::Short
    }
}

/// Measures how long the button was held.
#[derive(Default)]
pub struct HoldTimer {
    pressed_at_ms: Option<u64>,
}

impl HoldTimer {
    pub const fn new() -> Self {
        Self {
            pressed_at_ms: None,
        }
    }

    /// Returns the classified press on release.
    pub fn on_edge(&mut self, edge: ButtonEdge, now_ms: u64) -> Option<(PressKind, u64)> {
        match edge {
            ButtonEdge::Pressed => {
                self.pressed_at_ms = Some(now_ms);
                None
            }
            ButtonEdge::Released => {
                let start = self.pressed_at_ms.take()?;
                let held = now_ms.saturating_sub(start);
                Some((classify_hold(held), held))
            }
        }
    }
}
