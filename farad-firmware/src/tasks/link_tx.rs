//! Link UART transmit task
//!
//! Serializes outbound frames as `<client-id> TAB <json>` lines for the
//! radio co-processor, with `*` as the id on broadcasts. A serialization
//! failure drops the frame; a UART failure is logged and the task keeps
//! going with the next frame.

use core::fmt::Write as FmtWrite;

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;

use crate::channels::{Payload, Route, OUTBOUND};
use crate::link::MAX_LINE_LEN;

/// Link TX task - writes frames to the radio co-processor
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    let mut json = [0u8; MAX_LINE_LEN];

    loop {
        let frame = OUTBOUND.receive().await;

        let encoded = match &frame.payload {
            Payload::Response(msg) => serde_json_core::to_slice(msg, &mut json),
            Payload::Sync(sync) => serde_json_core::to_slice(sync, &mut json),
            Payload::Connected(ack) => serde_json_core::to_slice(ack, &mut json),
            Payload::Telemetry(sample) => serde_json_core::to_slice(sample, &mut json),
        };
        let len = match encoded {
            Ok(len) => len,
            Err(_) => {
                warn!("Outbound frame too large, dropping");
                continue;
            }
        };

        let mut prefix: String<12> = String::new();
        let result = match frame.route {
            Route::To(id) => write!(prefix, "{}\t", id),
            Route::Broadcast => write!(prefix, "*\t"),
        };
        if result.is_err() {
            continue;
        }

        if let Err(e) = send_line(&mut tx, prefix.as_bytes(), &json[..len]).await {
            warn!("Link UART write error: {:?}", e);
        }
    }
}

async fn send_line(
    tx: &mut BufferedUartTx,
    prefix: &[u8],
    json: &[u8],
) -> Result<(), embassy_rp::uart::Error> {
    tx.write_all(prefix).await?;
    tx.write_all(json).await?;
    tx.write_all(b"\n").await?;
    Ok(())
}
