//! Main controller task
//!
//! Dispatch loop for the control protocol: receives decoded client
//! commands, mutates the authoritative device state, applies the side
//! effects (persist, LED refresh, GPIO lines) and routes the reply.

use defmt::*;
use embassy_time::Instant;

use farad_core::control;
use farad_hal::OutputPin;
use farad_hal_rp2040::gpio::OutputLine;

use crate::channels::{
    OutboundFrame, Payload, Route, DEVICE_STATE, INBOUND, OUTBOUND, PERSIST_REQUEST, STATE_DIRTY,
};

/// Controller task - applies client commands to the device state
#[embassy_executor::task]
pub async fn controller_task(
    mut screen_line: OutputLine<'static>,
    mut ac_relay: OutputLine<'static>,
) {
    info!("Controller task started");

    // Drive the output lines from the loaded state before any command
    {
        let state = DEVICE_STATE.lock().await;
        screen_line.set_state(state.screen_enabled);
        ac_relay.set_state(state.ac_output_enabled);
    }

    loop {
        let (client_id, msg) = INBOUND.receive().await;
        debug!("Command from client {}", client_id);

        let now_ms = Instant::now().as_millis();
        let outcome = {
            let mut state = DEVICE_STATE.lock().await;
            let outcome = control::handle(&msg, client_id, now_ms, &mut state);

            if outcome.effects.persist {
                // Latest snapshot wins; the persist task writes it out
                PERSIST_REQUEST.signal(state.clone());
                screen_line.set_state(state.screen_enabled);
                ac_relay.set_state(state.ac_output_enabled);
            }
            outcome
        };

        if outcome.effects.rerender {
            STATE_DIRTY.signal(());
        }

        let route = if outcome.broadcast {
            Route::Broadcast
        } else {
            Route::To(client_id)
        };
        OUTBOUND
            .send(OutboundFrame {
                route,
                payload: Payload::Response(outcome.reply),
            })
            .await;
    }
}
