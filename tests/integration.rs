//! Integration tests: BLE events in, pin activity out.

mod support;

use blepress::actuator::ActuatorState;
use blepress::app::{button_mirror, dispatch, BleEvent, BleEventHandler};
use blepress::button_logic::ButtonEdge;
use blepress::config::{LONG_PRESS_MS, WATCHDOG_FEED_INTERVAL_MS, WATCHDOG_TIMEOUT_MS};
use blepress::link::{ConnectionHandle, GattRole};
use blepress::ports::{ControlPin, Level, PinMode, Pull};
use blepress::Error;
use support::{pulse, Queue, Rig, Step};

const CONN: ConnectionHandle = ConnectionHandle::new(3);

fn write(value: u8) -> BleEvent {
    BleEvent::CharacteristicWrite { conn: CONN, value }
}

#[test]
fn boot_parks_control_pin_as_floating_input() {
    let rig = Rig::new();
    assert_eq!(rig.timeline.borrow()[0], Step::Input(Pull::None));
    assert_eq!(rig.ctx.actuator().mode(), PinMode::Input(Pull::None));
}

#[test]
fn short_press_over_ble() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    dispatch(&mut app, BleEvent::Connected(CONN)).unwrap();
    dispatch(&mut app, write(0x01)).unwrap();

    // Nothing moves until the queue is drained.
    assert!(rig.steps().is_empty());
    assert_eq!(queue.drain(&mut rig.ctx), 1);

    assert_eq!(rig.steps(), pulse(600));
    assert_eq!(rig.ctx.actuator().state(), ActuatorState::Idle);
    assert_eq!(app.link().current(), CONN);
}

#[test]
fn long_press_over_ble() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    dispatch(&mut app, BleEvent::Connected(CONN)).unwrap();
    dispatch(&mut app, write(0x02)).unwrap();
    queue.drain(&mut rig.ctx);

    assert_eq!(rig.steps(), pulse(4000));
}

#[test]
fn pin_reads_active_during_the_pulse_and_released_after() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    dispatch(&mut app, write(0x01)).unwrap();
    queue.drain(&mut rig.ctx);

    // Active-low board: the pad reads low for the whole 600 ms wait.
    assert_eq!(*rig.samples.borrow(), [(600, false)]);
    assert!(rig.ctx.actuator().pin().is_high());
    assert!(!rig.ctx.actuator().is_active());
}

#[test]
fn one_dispatch_step_blocks_for_at_most_one_pulse() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    dispatch(&mut app, write(0x02)).unwrap();
    dispatch(&mut app, write(0x02)).unwrap();

    assert!(queue.dispatch_next(&mut rig.ctx));
    let blocked: u32 = rig.samples.borrow().iter().map(|&(ms, _)| ms).sum();
    assert_eq!(blocked, LONG_PRESS_MS);
    assert!((blocked as u64) + WATCHDOG_FEED_INTERVAL_MS < WATCHDOG_TIMEOUT_MS as u64);
    assert_eq!(queue.len(), 1);

    rig.samples.borrow_mut().clear();
    assert!(queue.dispatch_next(&mut rig.ctx));
    assert_eq!(*rig.samples.borrow(), [(LONG_PRESS_MS, false)]);
    assert!(!queue.dispatch_next(&mut rig.ctx));
}

#[test]
fn unknown_kind_is_accepted_and_ignored() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    dispatch(&mut app, BleEvent::Connected(CONN)).unwrap();
    dispatch(&mut app, write(0x07)).unwrap();
    queue.drain(&mut rig.ctx);

    assert!(rig.steps().is_empty());
    assert_eq!(rig.ctx.ignored_count(), 1);
}

#[test]
fn writes_are_executed_in_arrival_order() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    for value in [1, 2, 1] {
        dispatch(&mut app, write(value)).unwrap();
    }
    queue.drain(&mut rig.ctx);

    let expected: Vec<Step> = [pulse(600), pulse(4000), pulse(600)].concat();
    assert_eq!(rig.steps(), expected);
}

#[test]
fn pulses_survive_disconnect_before_drain() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    dispatch(&mut app, BleEvent::Connected(CONN)).unwrap();
    dispatch(&mut app, write(1)).unwrap();
    dispatch(&mut app, BleEvent::Disconnected(CONN)).unwrap();
    assert!(!app.link().is_connected());

    queue.drain(&mut rig.ctx);
    assert_eq!(rig.steps(), pulse(600));
}

#[test]
fn full_queue_rejects_new_writes_only() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    for _ in 0..queue.capacity() {
        dispatch(&mut app, write(1)).unwrap();
    }
    assert_eq!(dispatch(&mut app, write(2)), Err(Error::QueueFull));
    assert!(!Error::QueueFull.is_fatal());
    assert_eq!(app.queue_overflows(), 1);

    assert_eq!(queue.drain(&mut rig.ctx), queue.capacity());
    let waits: Vec<u32> = rig
        .steps()
        .into_iter()
        .filter_map(|s| match s {
            Step::Wait(ms) => Some(ms),
            _ => None,
        })
        .collect();
    assert_eq!(waits, vec![600; queue.capacity()]);
}

#[test]
fn duplicate_gatt_timeouts_disconnect_once() {
    let rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    app.on_connected(CONN).unwrap();
    app.on_gatt_timeout(CONN, GattRole::Client).unwrap();
    app.on_gatt_timeout(CONN, GattRole::Server).unwrap();

    assert_eq!(rig.steps(), [Step::Disconnect(3, 0x13)]);
    assert!(!app.link().is_connected());
}

#[test]
fn stale_gatt_timeout_is_ignored() {
    let rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    app.on_connected(CONN).unwrap();
    app.on_gatt_timeout(ConnectionHandle::new(9), GattRole::Server)
        .unwrap();

    assert!(rig.steps().is_empty());
    assert_eq!(app.link().current(), CONN);
}

#[test]
fn phy_request_answered_with_auto() {
    let rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    dispatch(&mut app, BleEvent::PhyUpdateRequest(CONN)).unwrap();
    assert_eq!(rig.steps(), [Step::AutoPhy(3)]);
}

#[test]
fn reconnect_after_disconnect_tracks_new_handle() {
    let rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);
    let next = ConnectionHandle::new(4);

    dispatch(&mut app, BleEvent::Connected(CONN)).unwrap();
    dispatch(&mut app, BleEvent::Disconnected(CONN)).unwrap();
    assert_eq!(app.link().current(), ConnectionHandle::INVALID);

    dispatch(&mut app, BleEvent::Connected(next)).unwrap();
    assert_eq!(app.link().current(), next);
}

#[test]
fn button_hold_and_remote_press_share_the_queue() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    queue
        .enqueue(ButtonEdge::Pressed.to_event(), button_mirror)
        .unwrap();
    dispatch(&mut app, write(1)).unwrap();
    queue
        .enqueue(ButtonEdge::Released.to_event(), button_mirror)
        .unwrap();
    queue.drain(&mut rig.ctx);

    let mut expected = vec![Step::Output(Level::Low, Pull::Down)];
    expected.extend(pulse(600));
    expected.push(Step::Input(Pull::None));
    assert_eq!(rig.steps(), expected);
    assert_eq!(rig.ctx.actuator().state(), ActuatorState::Idle);
}

#[test]
fn rig_clear_keeps_boot_step() {
    let mut rig = Rig::new();
    let queue = Queue::new();
    let mut app = rig.app(&queue);

    dispatch(&mut app, write(1)).unwrap();
    queue.drain(&mut rig.ctx);
    rig.clear();
    assert!(rig.steps().is_empty());
    assert_eq!(rig.timeline.borrow().len(), 1);
}
