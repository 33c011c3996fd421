//! Farad link protocols
//!
//! This crate defines the two message surfaces of the power station:
//!
//! - [`frame`]: the UART telemetry link from the companion sensor MCU.
//!   Fixed 23-byte binary frames carrying five measurements:
//!
//! ```text
//! ┌──────┬──────┬──────────────────────────────┬──────────┐
//! │ 0xAA │ 0x55 │ 5 × f32 little-endian (20B)  │ CHECKSUM │
//! │ 1B   │ 1B   │ volt, ac, temp, batt, curr   │ 1B       │
//! └──────┴──────┴──────────────────────────────┴──────────┘
//! ```
//!
//! - [`messages`]: the semantic content of the browser-facing control
//!   channel (command requests, replies, state sync). Transport framing
//!   and the JSON wire encoding live outside this crate; these types carry
//!   only the fields the core logic consumes and produces.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{
    encode_frame, FrameDecoder, TelemetrySample, FRAME_HEADER1, FRAME_HEADER2, FRAME_SIZE,
    PAYLOAD_SIZE,
};
pub use messages::{
    error_code, AppliedValue, ClientMessage, CommandValue, Connected, ServerMessage, StateSync,
};
