//! Persisted device state
//!
//! User-controllable settings stored in flash as postcard binary data.

mod device;

pub use device::*;
