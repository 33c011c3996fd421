//! Addressable LED strip abstraction
//!
//! One frame is a slice of [`rgb::RGB8`] values, one per physical LED.
//! Implementations own the wire protocol (WS2812 timing over PIO on the
//! reference board) and must latch the full frame atomically.

use rgb::RGB8;

/// Addressable LED strip output
pub trait LedStrip {
    /// Error type for write operations
    type Error;

    /// Number of LEDs on the strip
    fn len(&self) -> usize;

    /// True if the strip has no LEDs (degenerate board config)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push one complete frame to the strip
    ///
    /// `frame` is clipped to the strip length; missing trailing LEDs are
    /// turned off.
    fn write(
        &mut self,
        frame: &[RGB8],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
