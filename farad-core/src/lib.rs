//! Board-agnostic core logic for the power-station firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Persisted device state (screen, AC output, LED settings)
//! - Battery-level color ramp
//! - Cooperative LED animation engine
//! - Control protocol (command validation and state mutation)
//! - Telemetry hub feeding the broadcast path and the animation engine
//!
//! Everything here is synchronous and allocation-free; the firmware crate
//! schedules it from embassy tasks, and the host test suite drives it
//! directly.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod animation;
pub mod control;
pub mod ramp;
pub mod state;
pub mod telemetry;
