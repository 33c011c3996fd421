//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy
//! tasks. Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use farad_core::state::DeviceState;
use farad_protocol::messages::{ClientMessage, Connected, ServerMessage, StateSync};
use farad_protocol::TelemetrySample;

/// Channel capacity for inbound client commands
const INBOUND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outbound link frames
const OUTBOUND_CHANNEL_SIZE: usize = 16;

/// Destination of one outbound link frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// One specific client
    To(u32),
    /// Every connected client
    Broadcast,
}

/// Payload of one outbound link frame
#[derive(Debug, Clone)]
pub enum Payload {
    Response(ServerMessage),
    Sync(StateSync),
    Connected(Connected),
    Telemetry(TelemetrySample),
}

/// One frame queued for the radio co-processor
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    pub route: Route,
    pub payload: Payload,
}

/// Decoded client commands with their originating client id
pub static INBOUND: Channel<CriticalSectionRawMutex, (u32, ClientMessage), INBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Frames waiting for the link TX task
pub static OUTBOUND: Channel<CriticalSectionRawMutex, OutboundFrame, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// The authoritative device state, mutated only by the controller task
pub static DEVICE_STATE: Mutex<CriticalSectionRawMutex, DeviceState> =
    Mutex::new(DeviceState::INITIAL);

/// Latest state snapshot waiting to be written to flash (latest wins)
pub static PERSIST_REQUEST: Signal<CriticalSectionRawMutex, DeviceState> = Signal::new();

/// Set when a mutation affected the LED output
pub static STATE_DIRTY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Latest telemetry sample for the LED task (latest wins)
pub static TELEMETRY: Signal<CriticalSectionRawMutex, TelemetrySample> = Signal::new();
