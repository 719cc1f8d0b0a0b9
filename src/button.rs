//! Local push button with async debouncing.
//!
//! The button is active-low with an internal pull-up.  Each settled edge
//! is queued for the mirror handler, so the control pin follows the
//! button through the same scheduler as remote requests.

use defmt::{debug, info, warn};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Instant, Timer};

use crate::app::button_mirror;
use crate::button_logic::{Debouncer, HoldTimer};
use crate::config::BUTTON_DEBOUNCE_MS;
use crate::{QUEUE, WAKE};

pub async fn button_task(pin: AnyPin) -> ! {
    let mut btn = Input::new(pin, Pull::Up);
    let mut debouncer = Debouncer::new(btn.is_high());
    let mut hold = HoldTimer::new();

    loop {
        btn.wait_for_any_edge().await;

        // Debounce: wait and re-read.
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        let Some(edge) = debouncer.settle(btn.is_high()) else {
            continue;
        };
        debug!("button: {}", edge);

        if let Some((kind, held_ms)) = hold.on_edge(edge, Instant::now().as_millis()) {
            info!("button: {} press ({} ms)", kind, held_ms);
        }

        match QUEUE.enqueue(edge.to_event(), button_mirror) {
            Ok(()) => WAKE.signal(()),
            Err(e) => warn!("button: edge dropped: {}", e),
        }
    }
}
