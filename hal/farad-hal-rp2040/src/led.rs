//! WS2812 LED strip driver
//!
//! Wraps the embassy-rp PIO WS2812 program behind the `farad-hal`
//! [`LedStrip`] trait. The PIO state machine owns the 800kHz bit timing;
//! a DMA transfer pushes the whole frame, so the write latches atomically
//! from the strip's point of view.

use core::convert::Infallible;

use embassy_rp::dma::AnyChannel;
use embassy_rp::pio::{Common, Instance, PioPin, StateMachine};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::Peri;
use rgb::RGB8;

use farad_hal::LedStrip;

/// WS2812 strip on one PIO state machine
///
/// `N` is the physical LED count, fixed at construction.
pub struct Ws2812Strip<'d, P: Instance, const S: usize, const N: usize> {
    driver: PioWs2812<'d, P, S, N>,
}

impl<'d, P: Instance, const S: usize, const N: usize> Ws2812Strip<'d, P, S, N> {
    /// Create a strip driver on the given state machine and data pin
    pub fn new(
        common: &mut Common<'d, P>,
        sm: StateMachine<'d, P, S>,
        dma: Peri<'d, AnyChannel>,
        pin: Peri<'d, impl PioPin>,
        program: &PioWs2812Program<'d, P>,
    ) -> Self {
        Self {
            driver: PioWs2812::new(common, sm, dma, pin, program),
        }
    }
}

impl<'d, P: Instance, const S: usize, const N: usize> LedStrip for Ws2812Strip<'d, P, S, N> {
    type Error = Infallible;

    fn len(&self) -> usize {
        N
    }

    async fn write(&mut self, frame: &[RGB8]) -> Result<(), Self::Error> {
        // The PIO driver wants a full fixed-size frame; clip or pad with
        // black as needed.
        let mut buf = [RGB8::new(0, 0, 0); N];
        let n = frame.len().min(N);
        buf[..n].copy_from_slice(&frame[..n]);
        self.driver.write(&buf).await;
        Ok(())
    }
}
