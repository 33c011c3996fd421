//! Device state definition and its durable encode/decode contract
//!
//! `DeviceState` is the single record of user-chosen configuration. It is
//! loaded once at boot (falling back to compiled-in defaults on any
//! problem), mutated only by the control protocol, and written back after
//! every accepted mutation. The storage mechanism itself lives behind the
//! HAL; this module owns only the byte encoding.

use serde::{Deserialize, Serialize};

use farad_protocol::messages::{StateSync, EVENT_STATE_SYNC, MAX_COLORS};

/// Sentinel marking an unused slot in the color list
pub const UNSET_COLOR: u32 = 0xFFFF_FFFF;

/// Default single ramp color (red)
pub const DEFAULT_COLOR: u32 = 0xFF0000;

/// Upper bound of the brightness domain
pub const MAX_BRIGHTNESS: u8 = 100;

/// Errors from the durable encode path
///
/// Decoding never fails; it falls back to defaults instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateError {
    /// Encode buffer too small for the serialized record
    BufferTooSmall,
}

/// LED animation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedMode {
    /// Constant ramp color on every LED
    #[default]
    Solid,
    /// Slow triangle-wave brightness oscillation
    Breathing,
    /// Morse SOS on a fixed 2.4 s cycle
    Sos,
    /// 100 ms on/off toggle
    FastFlash,
    /// 5-LED comet scanning around the strip
    Flow,
}

impl LedMode {
    /// Decode a mode from its wire integer (0-4)
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LedMode::Solid),
            1 => Some(LedMode::Breathing),
            2 => Some(LedMode::Sos),
            3 => Some(LedMode::FastFlash),
            4 => Some(LedMode::Flow),
            _ => None,
        }
    }

    /// Get the mode as its wire integer
    pub fn as_u8(self) -> u8 {
        match self {
            LedMode::Solid => 0,
            LedMode::Breathing => 1,
            LedMode::Sos => 2,
            LedMode::FastFlash => 3,
            LedMode::Flow => 4,
        }
    }
}

/// User-controllable device configuration
///
/// Invariants, enforced by the mutators and the decode path:
/// - `led_brightness` is always within [0, 100]
/// - `color_count` is always within [0, 8]
/// - slots at and beyond `color_count` carry [`UNSET_COLOR`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    /// Front-panel screen enabled
    pub screen_enabled: bool,
    /// AC inverter output enabled
    pub ac_output_enabled: bool,
    /// LED brightness, 0-100
    pub led_brightness: u8,
    /// Active LED animation mode
    pub led_mode: LedMode,
    /// Number of meaningful entries in `led_colors`
    pub color_count: u8,
    /// Ordered ramp colors, index 0 = full battery, last used = empty
    pub led_colors: [u32; MAX_COLORS],
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl DeviceState {
    /// Maximum serialized size of the record, with headroom
    pub const MAX_ENCODED_SIZE: usize = 64;

    /// Compiled-in defaults, usable in static initializers
    pub const INITIAL: DeviceState = DeviceState {
        screen_enabled: true,
        ac_output_enabled: false,
        led_brightness: 50,
        led_mode: LedMode::Solid,
        color_count: 1,
        led_colors: {
            let mut colors = [UNSET_COLOR; MAX_COLORS];
            colors[0] = DEFAULT_COLOR;
            colors
        },
    };

    /// Set the brightness, clamping into [0, 100]
    ///
    /// Returns the applied value so replies echo what was stored, not what
    /// was requested.
    pub fn set_brightness(&mut self, value: i64) -> u8 {
        let applied = value.clamp(0, MAX_BRIGHTNESS as i64) as u8;
        self.led_brightness = applied;
        applied
    }

    /// Replace the color list
    ///
    /// Truncates to [`MAX_COLORS`] entries and resets every unused slot to
    /// the sentinel so stale entries from a longer previous list never
    /// survive. Returns the stored count.
    pub fn set_colors(&mut self, colors: &[u32]) -> u8 {
        let count = colors.len().min(MAX_COLORS);
        self.led_colors = [UNSET_COLOR; MAX_COLORS];
        self.led_colors[..count].copy_from_slice(&colors[..count]);
        self.color_count = count as u8;
        self.color_count
    }

    /// Check the record's domain invariants
    ///
    /// Used by the decode path to reject blobs that deserialize but carry
    /// out-of-domain values (a mode variant cannot be invalid post-decode,
    /// postcard rejects unknown discriminants).
    fn is_valid(&self) -> bool {
        self.led_brightness <= MAX_BRIGHTNESS && self.color_count as usize <= MAX_COLORS
    }

    /// Encode the record for durable storage
    ///
    /// Returns the number of bytes written.
    pub fn to_bytes(&self, buffer: &mut [u8]) -> Result<usize, StateError> {
        postcard::to_slice(self, buffer)
            .map(|used| used.len())
            .map_err(|_| StateError::BufferTooSmall)
    }

    /// Decode a record from durable storage
    ///
    /// Any decode failure or out-of-domain field yields the compiled-in
    /// defaults; loading never fails. State and storage reconcile on the
    /// next successful write.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        postcard::from_bytes::<DeviceState>(bytes)
            .ok()
            .filter(DeviceState::is_valid)
            .unwrap_or_default()
    }

    /// Build the connect-time state snapshot message
    pub fn state_sync(&self) -> StateSync {
        StateSync {
            event: EVENT_STATE_SYNC,
            screen: self.screen_enabled,
            ac_output: self.ac_output_enabled,
            brightness: self.led_brightness,
            led_mode: self.led_mode.as_u8(),
            color_count: self.color_count,
            colors: self.led_colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = DeviceState::default();
        assert!(state.screen_enabled);
        assert!(!state.ac_output_enabled);
        assert_eq!(state.led_brightness, 50);
        assert_eq!(state.led_mode, LedMode::Solid);
        assert_eq!(state.color_count, 1);
        assert_eq!(state.led_colors[0], DEFAULT_COLOR);
        assert!(state.led_colors[1..].iter().all(|&c| c == UNSET_COLOR));
    }

    #[test]
    fn test_brightness_clamps_both_ends() {
        let mut state = DeviceState::default();
        assert_eq!(state.set_brightness(150), 100);
        assert_eq!(state.led_brightness, 100);
        assert_eq!(state.set_brightness(-3), 0);
        assert_eq!(state.led_brightness, 0);
    }

    #[test]
    fn test_shorter_color_list_resets_stale_slots() {
        let mut state = DeviceState::default();
        assert_eq!(state.set_colors(&[1, 2, 3, 4, 5, 6, 7, 8]), 8);
        assert_eq!(state.color_count, 8);

        assert_eq!(state.set_colors(&[0xFF0000, 0x0000FF]), 2);
        assert_eq!(state.led_colors[..2], [0xFF0000, 0x0000FF]);
        assert!(state.led_colors[2..].iter().all(|&c| c == UNSET_COLOR));
    }

    #[test]
    fn test_oversized_color_list_truncates() {
        let mut state = DeviceState::default();
        let colors = [0x123456u32; 12];
        assert_eq!(state.set_colors(&colors), 8);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let mut state = DeviceState::default();
        state.set_brightness(77);
        state.led_mode = LedMode::Flow;
        state.set_colors(&[0x00FF00, 0xFFFF00, 0xFF0000]);
        state.ac_output_enabled = true;

        let mut buffer = [0u8; DeviceState::MAX_ENCODED_SIZE];
        let len = state.to_bytes(&mut buffer).unwrap();
        assert!(len <= DeviceState::MAX_ENCODED_SIZE);

        assert_eq!(DeviceState::from_bytes(&buffer[..len]), state);
    }

    #[test]
    fn test_garbage_blob_falls_back_to_defaults() {
        assert_eq!(
            DeviceState::from_bytes(&[0xDE, 0xAD, 0xBE, 0xEF]),
            DeviceState::default()
        );
        assert_eq!(DeviceState::from_bytes(&[]), DeviceState::default());
    }

    #[test]
    fn test_mode_wire_integers() {
        for value in 0..=4u8 {
            assert_eq!(LedMode::from_u8(value).unwrap().as_u8(), value);
        }
        assert_eq!(LedMode::from_u8(5), None);
        assert_eq!(LedMode::from_u8(9), None);
    }

    #[test]
    fn test_state_sync_mirrors_state() {
        let mut state = DeviceState::default();
        state.set_colors(&[0xAA00AA]);
        state.led_mode = LedMode::Breathing;
        let sync = state.state_sync();
        assert_eq!(sync.event, "state_sync");
        assert_eq!(sync.led_mode, 1);
        assert_eq!(sync.color_count, 1);
        assert_eq!(sync.colors[0], 0xAA00AA);
        assert_eq!(sync.colors[7], UNSET_COLOR);
    }
}
