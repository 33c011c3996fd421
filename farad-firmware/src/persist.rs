//! Device state persistence
//!
//! Loads the settings record at boot and services store requests from the
//! controller. Storage failures are logged and otherwise ignored: the
//! in-memory state stays authoritative and storage reconciles on the next
//! successful write.

use defmt::*;

use farad_core::state::DeviceState;
use farad_hal::{FlashStorage as FlashStorageTrait, StorageKey};
use farad_hal_rp2040::flash::FlashStorage;

use crate::channels::PERSIST_REQUEST;

/// Load the device state from flash
///
/// Any failure (missing key, storage error, undecodable blob) falls back
/// to the compiled-in defaults.
pub async fn load_state(flash: &mut FlashStorage<'static>) -> DeviceState {
    let mut buf = [0u8; DeviceState::MAX_ENCODED_SIZE];
    match flash.read(StorageKey::DeviceState, &mut buf).await {
        Ok(len) => {
            let state = DeviceState::from_bytes(&buf[..len]);
            info!("Device state loaded from flash ({} bytes)", len);
            state
        }
        Err(e) => {
            info!("No stored device state ({:?}), using defaults", e);
            DeviceState::default()
        }
    }
}

/// Persist task - writes state snapshots to flash as they arrive
///
/// The signal holds only the latest snapshot, so a burst of commands
/// collapses into one write.
#[embassy_executor::task]
pub async fn persist_task(mut flash: FlashStorage<'static>) {
    info!("Persist task started");

    loop {
        let state = PERSIST_REQUEST.wait().await;

        let mut buf = [0u8; DeviceState::MAX_ENCODED_SIZE];
        let len = match state.to_bytes(&mut buf) {
            Ok(len) => len,
            Err(e) => {
                // Cannot happen while the record fits its own buffer
                error!("State encode failed: {:?}", e);
                continue;
            }
        };

        match flash.write(StorageKey::DeviceState, &buf[..len]).await {
            Ok(()) => trace!("Device state persisted ({} bytes)", len),
            Err(e) => warn!("Device state write failed: {:?}", e),
        }
    }
}
