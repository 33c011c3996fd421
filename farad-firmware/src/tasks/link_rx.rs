//! Link UART receive task
//!
//! Accumulates newline-delimited lines from the radio co-processor and
//! decodes them. Connect events answer with `connected` plus a full state
//! snapshot; undecodable JSON gets an `invalid_json` reply to the
//! originating client only; commands go to the controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use heapless::{String, Vec};

use farad_protocol::messages::{error_code, Connected, ServerMessage, MAX_CMD_LEN};

use crate::channels::{OutboundFrame, Payload, Route, DEVICE_STATE, INBOUND, OUTBOUND};
use crate::link::{self, Inbound, LinkError, MAX_LINE_LEN};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - decodes lines from the radio co-processor
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut line: Vec<u8, MAX_LINE_LEN> = Vec::new();
    let mut overflowed = false;
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    if byte == b'\n' {
                        if !overflowed && !line.is_empty() {
                            handle_line(&line).await;
                        }
                        line.clear();
                        overflowed = false;
                    } else if line.push(byte).is_err() {
                        // Discard the rest of an over-long line
                        overflowed = true;
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("Link UART read error: {:?}", e);
            }
        }
    }
}

/// Decode and dispatch one complete line
async fn handle_line(line: &[u8]) {
    let (client_id, json) = match link::split_line(line) {
        Ok(parts) => parts,
        Err(_) => {
            // No way to answer without a client id
            warn!("Link line with bad prefix, dropping");
            return;
        }
    };

    match link::decode(json) {
        Ok(Inbound::Connect) => {
            info!("Client {} connected", client_id);
            let sync = DEVICE_STATE.lock().await.state_sync();
            OUTBOUND
                .send(OutboundFrame {
                    route: Route::To(client_id),
                    payload: Payload::Connected(Connected::new(client_id)),
                })
                .await;
            OUTBOUND
                .send(OutboundFrame {
                    route: Route::To(client_id),
                    payload: Payload::Sync(sync),
                })
                .await;
        }
        Ok(Inbound::Disconnect) => {
            info!("Client {} disconnected", client_id);
        }
        Ok(Inbound::Command(msg)) => {
            INBOUND.send((client_id, msg)).await;
        }
        Err(LinkError::BadJson) => {
            warn!("Undecodable JSON from client {}", client_id);
            let cmd: String<MAX_CMD_LEN> = String::new();
            OUTBOUND
                .send(OutboundFrame {
                    route: Route::To(client_id),
                    payload: Payload::Response(ServerMessage::err(
                        &cmd,
                        client_id,
                        error_code::INVALID_JSON,
                    )),
                })
                .await;
        }
        Err(LinkError::BadPrefix) => {
            // split_line already handled this case
        }
    }
}
