//! LED animation task
//!
//! Drives the animation engine on a 10ms ticker and pushes frames to the
//! WS2812 strip. The tick interval is faster than every mode's own update
//! gate, so mode timing is owned entirely by the engine.

use defmt::*;
use embassy_rp::peripherals::PIO0;
use embassy_time::{Duration, Instant, Ticker};

use farad_core::animation::{AnimationEngine, DEFAULT_LED_COUNT};
use farad_core::telemetry::TelemetryHub;
use farad_hal::LedStrip;
use farad_hal_rp2040::led::Ws2812Strip;

use crate::channels::{DEVICE_STATE, STATE_DIRTY, TELEMETRY};

/// Engine tick interval
const TICK_MS: u64 = 10;

/// LED task - renders animation frames and writes them to the strip
#[embassy_executor::task]
pub async fn led_task(mut strip: Ws2812Strip<'static, PIO0, 0, DEFAULT_LED_COUNT>) {
    info!("LED task started");

    let mut engine = AnimationEngine::new(strip.len());
    let mut hub = TelemetryHub::new();
    let mut state = DEVICE_STATE.lock().await.clone();

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));

    loop {
        ticker.next().await;

        // Refresh the cached state only when the controller flagged an
        // LED-affecting mutation
        if STATE_DIRTY.signaled() {
            STATE_DIRTY.reset();
            state = DEVICE_STATE.lock().await.clone();
            debug!("LED state refreshed: mode {}", state.led_mode.as_u8());
        }

        if let Some(sample) = TELEMETRY.try_take() {
            hub.update(sample);
        }

        let now_ms = Instant::now().as_millis();
        engine.tick(now_ms, &state, hub.battery_fraction());

        if strip.write(engine.frame()).await.is_err() {
            // Infallible on this board; kept for other strip drivers
            warn!("LED strip write failed");
        }
    }
}
