//! GPIO wrappers
//!
//! Thin adapters putting embassy-rp pins behind the shared `farad-hal`
//! traits so the control loop stays chip-agnostic.

use embassy_rp::gpio::{Input, Output};

/// Push-pull output line (AC relay, screen enable)
pub struct OutputLine<'d> {
    pin: Output<'d>,
}

impl<'d> OutputLine<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl<'d> farad_hal::OutputPin for OutputLine<'d> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Digital input line
pub struct InputLine<'d> {
    pin: Input<'d>,
}

impl<'d> InputLine<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl<'d> farad_hal::InputPin for InputLine<'d> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
