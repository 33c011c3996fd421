//! Farad Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. This keeps the application logic board-agnostic:
//! the same core crates drive the reference RP2040 controller board and
//! whatever board revision comes next.
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - digital I/O (AC relay,
//!   screen enable line)
//! - [`uart::UartRx`], [`uart::UartTx`] - serial links (sensor MCU, radio
//!   co-processor)
//! - [`led::LedStrip`] - addressable LED strip output
//! - [`flash::FlashStorage`] - persistent storage for device settings

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod led;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::{InputPin, OutputPin};
pub use led::LedStrip;
pub use uart::{UartRx, UartTx};
