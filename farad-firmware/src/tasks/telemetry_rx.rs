//! Sensor UART receive task
//!
//! Drains the sensor MCU link through the frame decoder and publishes
//! every validated sample. Framing noise and checksum failures are dropped
//! silently; the sensor re-sends a fresh frame a few hundred milliseconds
//! later anyway.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use farad_protocol::FrameDecoder;

use crate::channels::{OutboundFrame, Payload, Route, OUTBOUND, TELEMETRY};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Telemetry RX task - decodes frames from the sensor MCU
#[embassy_executor::task]
pub async fn telemetry_rx_task(mut rx: BufferedUartRx) {
    info!("Telemetry RX task started");

    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("Sensor RX: {} bytes", n);

                for &byte in &buf[..n] {
                    if let Some(sample) = decoder.feed(byte) {
                        trace!("Telemetry: battery {}", sample.battery);

                        // Latest sample wins for the LED task
                        TELEMETRY.signal(sample);

                        // Broadcast to all clients, dropping if the link
                        // queue is backed up
                        let frame = OutboundFrame {
                            route: Route::Broadcast,
                            payload: Payload::Telemetry(sample),
                        };
                        if OUTBOUND.try_send(frame).is_err() {
                            warn!("Outbound queue full, dropping telemetry");
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("Sensor UART read error: {:?}", e);
            }
        }
    }
}
