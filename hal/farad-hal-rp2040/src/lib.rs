//! RP2040-specific HAL for the power-station firmware
//!
//! This crate provides RP2040 implementations of the shared `farad-hal`
//! traits:
//!
//! - Flash storage driver (sequential-storage over the XIP flash)
//! - WS2812 LED strip driver (PIO-based)
//! - GPIO wrappers for the relay and screen-enable lines

#![no_std]

pub mod flash;
pub mod gpio;
pub mod led;

// Re-export shared traits from farad-hal for convenience
pub use farad_hal::{FlashStorage as FlashStorageTrait, LedStrip, StorageKey};
