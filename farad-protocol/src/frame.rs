//! Telemetry frame decoding for the sensor MCU link.
//!
//! Frame format:
//! - HEADER1 (1 byte): 0xAA synchronization byte
//! - HEADER2 (1 byte): 0x55 confirmation byte
//! - PAYLOAD (20 bytes): five little-endian IEEE-754 f32 values in the
//!   fixed order voltage, ac_voltage, temperature, battery, current
//! - CHECKSUM (1 byte): wrapping 8-bit sum of the 20 payload bytes
//!
//! The link is a short point-to-point wire at 115200 baud; telemetry is
//! periodic and stale values are acceptable for short gaps, so malformed
//! frames are dropped silently rather than surfaced as errors.

/// First synchronization byte
pub const FRAME_HEADER1: u8 = 0xAA;

/// Second synchronization byte
pub const FRAME_HEADER2: u8 = 0x55;

/// Payload size in bytes (five f32 values)
pub const PAYLOAD_SIZE: usize = 20;

/// Complete frame size (2 header + payload + checksum)
pub const FRAME_SIZE: usize = 2 + PAYLOAD_SIZE + 1;

/// One validated telemetry record from the sensor MCU
///
/// Produced atomically per valid frame; consumers never observe a
/// partially updated sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetrySample {
    /// Regulated DC bus voltage (V)
    pub voltage: f32,
    /// AC mains voltage (V)
    pub ac_voltage: f32,
    /// Ambient temperature (°C)
    pub temperature: f32,
    /// Battery level as a 0.0-1.0 fraction
    pub battery: f32,
    /// Bus current (A)
    pub current: f32,
}

impl TelemetrySample {
    /// Decode a sample from a raw 20-byte payload
    ///
    /// Explicit little-endian decode per 4-byte slice; no pointer aliasing.
    pub fn from_payload(payload: &[u8; PAYLOAD_SIZE]) -> Self {
        let field = |i: usize| {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&payload[i * 4..i * 4 + 4]);
            f32::from_le_bytes(bytes)
        };
        Self {
            voltage: field(0),
            ac_voltage: field(1),
            temperature: field(2),
            battery: field(3),
            current: field(4),
        }
    }

    /// Encode this sample into a raw 20-byte payload
    pub fn to_payload(&self) -> [u8; PAYLOAD_SIZE] {
        let mut payload = [0u8; PAYLOAD_SIZE];
        for (i, value) in [
            self.voltage,
            self.ac_voltage,
            self.temperature,
            self.battery,
            self.current,
        ]
        .iter()
        .enumerate()
        {
            payload[i * 4..i * 4 + 4].copy_from_slice(&value.to_le_bytes());
        }
        payload
    }
}

/// Wrapping 8-bit additive checksum over a payload
fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Encode a complete frame for a sample
///
/// Used by tests and the companion-side simulator.
pub fn encode_frame(sample: &TelemetrySample) -> [u8; FRAME_SIZE] {
    let payload = sample.to_payload();
    let mut frame = [0u8; FRAME_SIZE];
    frame[0] = FRAME_HEADER1;
    frame[1] = FRAME_HEADER2;
    frame[2..2 + PAYLOAD_SIZE].copy_from_slice(&payload);
    frame[FRAME_SIZE - 1] = checksum(&payload);
    frame
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Discarding bytes until the first header byte appears
    AwaitHeader1,
    /// Got 0xAA, expecting 0x55
    AwaitHeader2,
    /// Accumulating payload plus checksum
    Payload,
}

/// State machine for decoding incoming telemetry frames
///
/// Feed bytes as they arrive; a sample is emitted only when a complete
/// frame passes its checksum. Decoding is chunk-size independent: feeding
/// a byte stream one byte at a time yields exactly the same samples as
/// feeding it in batches.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    buffer: [u8; PAYLOAD_SIZE + 1],
    cursor: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new decoder waiting for the first header byte
    pub fn new() -> Self {
        Self {
            state: DecodeState::AwaitHeader1,
            buffer: [0u8; PAYLOAD_SIZE + 1],
            cursor: 0,
        }
    }

    /// Reset the decoder state
    pub fn reset(&mut self) {
        self.state = DecodeState::AwaitHeader1;
        self.cursor = 0;
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Some(sample)` when the byte completes a valid frame.
    /// Framing noise (bad preamble, header mismatch, checksum failure) is
    /// expected on the line and dropped without an error.
    pub fn feed(&mut self, byte: u8) -> Option<TelemetrySample> {
        match self.state {
            DecodeState::AwaitHeader1 => {
                if byte == FRAME_HEADER1 {
                    self.state = DecodeState::AwaitHeader2;
                }
                None
            }
            DecodeState::AwaitHeader2 => {
                // On mismatch both buffered bytes are dropped; the byte is
                // not re-examined as a header candidate (one-byte lookback,
                // matching the sensor MCU's framing on the other end).
                self.state = if byte == FRAME_HEADER2 {
                    DecodeState::Payload
                } else {
                    DecodeState::AwaitHeader1
                };
                None
            }
            DecodeState::Payload => {
                self.buffer[self.cursor] = byte;
                self.cursor += 1;
                if self.cursor < PAYLOAD_SIZE + 1 {
                    return None;
                }

                // Full frame collected; validate and reset either way
                let payload: [u8; PAYLOAD_SIZE] =
                    self.buffer[..PAYLOAD_SIZE].try_into().unwrap_or_default();
                let received = self.buffer[PAYLOAD_SIZE];
                self.reset();

                if checksum(&payload) == received {
                    Some(TelemetrySample::from_payload(&payload))
                } else {
                    None
                }
            }
        }
    }

    /// Drain a buffer of received bytes, invoking `sink` per decoded sample
    ///
    /// Greedy and non-blocking: every byte is consumed, and multiple frames
    /// in one buffer each produce a sample.
    pub fn feed_bytes(&mut self, bytes: &[u8], mut sink: impl FnMut(TelemetrySample)) {
        for &byte in bytes {
            if let Some(sample) = self.feed(byte) {
                sink(sample);
            }
        }
    }
}
