//! Frame rendering engine
//!
//! One `tick` reads the latest device state and battery fraction and
//! returns the frame buffer. Phase only moves when a mode's own interval
//! gate elapses; the frame itself is recomputed from phase + state every
//! tick, so brightness and color changes take effect on the next tick
//! without restarting any counter.

use heapless::Vec;
use rgb::RGB8;

use super::timers::ModeTimers;
use crate::ramp;
use crate::state::{DeviceState, LedMode, MAX_BRIGHTNESS};

/// Largest strip the engine can drive
pub const MAX_LEDS: usize = 60;

/// Strip length on the reference board
pub const DEFAULT_LED_COUNT: usize = 16;

/// One rendered frame, one color per physical LED
pub type LedFrame = Vec<RGB8, MAX_LEDS>;

const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Scale a channel by an 8-bit factor, truncating
fn scale8(value: u8, factor: u8) -> u8 {
    ((value as u16 * factor as u16) / 255) as u8
}

/// Scale a color by an 8-bit factor
fn scale_color(color: RGB8, factor: u8) -> RGB8 {
    RGB8 {
        r: scale8(color.r, factor),
        g: scale8(color.g, factor),
        b: scale8(color.b, factor),
    }
}

/// Map the 0-100 user brightness onto the 0-255 strip domain
fn master_scale(brightness: u8) -> u8 {
    (brightness.min(MAX_BRIGHTNESS) as u16 * 255 / MAX_BRIGHTNESS as u16) as u8
}

/// Cooperative LED animation engine
///
/// Owns the frame buffer and all per-mode timing state. Never blocks;
/// safe to tick at any rate at or above the fastest mode interval.
pub struct AnimationEngine {
    led_count: usize,
    frame: LedFrame,
    timers: ModeTimers,
    active_mode: Option<LedMode>,
}

impl AnimationEngine {
    /// Create an engine for a strip of `led_count` LEDs
    ///
    /// The count is clamped to [1, [`MAX_LEDS`]].
    pub fn new(led_count: usize) -> Self {
        let led_count = led_count.clamp(1, MAX_LEDS);
        let mut frame = Vec::new();
        for _ in 0..led_count {
            let _ = frame.push(OFF);
        }
        Self {
            led_count,
            frame,
            timers: ModeTimers::start(0),
            active_mode: None,
        }
    }

    /// Number of LEDs this engine renders
    pub fn led_count(&self) -> usize {
        self.led_count
    }

    /// The most recently rendered frame
    pub fn frame(&self) -> &[RGB8] {
        &self.frame
    }

    /// Render one animation step
    ///
    /// `now_ms` must be monotonic. Entering a mode (including re-entering
    /// one used earlier) restarts it at its initial phase; no timing state
    /// carries over between modes.
    pub fn tick(&mut self, now_ms: u64, state: &DeviceState, battery: f32) -> &[RGB8] {
        if self.active_mode != Some(state.led_mode) {
            self.timers = ModeTimers::start(now_ms);
            self.active_mode = Some(state.led_mode);
        }

        let color = ramp::interpolate(&state.led_colors, state.color_count, battery);
        let master = master_scale(state.led_brightness);

        match state.led_mode {
            LedMode::Solid => {
                self.fill(scale_color(color, master));
            }
            LedMode::Breathing => {
                self.timers.breathing.advance(now_ms);
                let breathed = scale_color(color, self.timers.breathing.level);
                self.fill(scale_color(breathed, master));
            }
            LedMode::Sos => {
                self.timers.sos.advance(now_ms);
                let out = if self.timers.sos.lit {
                    scale_color(color, master)
                } else {
                    OFF
                };
                self.fill(out);
            }
            LedMode::FastFlash => {
                self.timers.flash.advance(now_ms);
                let out = if self.timers.flash.lit {
                    scale_color(color, master)
                } else {
                    OFF
                };
                self.fill(out);
            }
            LedMode::Flow => {
                self.timers.flow.advance(now_ms, self.led_count);
                self.render_flow(color, master);
            }
        }

        &self.frame
    }

    fn fill(&mut self, color: RGB8) {
        for led in self.frame.iter_mut() {
            *led = color;
        }
    }

    /// Trailing-window comet: the head is brightest, each LED behind it
    /// steps down one level, everything else is dark.
    fn render_flow(&mut self, color: RGB8, master: u8) {
        use super::timers::FLOW_LEVELS;

        self.fill(OFF);
        let head = self.timers.flow.head;
        for (offset, &level) in FLOW_LEVELS.iter().enumerate() {
            let index = (head + self.led_count - (offset % self.led_count)) % self.led_count;
            self.frame[index] = scale_color(scale_color(color, level), master);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::timers::{BREATH_MIN, FLOW_STEP_MS, SOS_CYCLE_MS};
    use std::vec::Vec;

    fn white_state(mode: LedMode) -> DeviceState {
        let mut state = DeviceState::default();
        state.set_colors(&[0xFFFFFF]);
        state.led_brightness = 100;
        state.led_mode = mode;
        state
    }

    fn snapshot(frame: &[RGB8]) -> Vec<RGB8> {
        frame.to_vec()
    }

    #[test]
    fn test_solid_ticks_are_idempotent() {
        let mut engine = AnimationEngine::new(8);
        let state = white_state(LedMode::Solid);

        let first = snapshot(engine.tick(0, &state, 0.5));
        let second = snapshot(engine.tick(5, &state, 0.5));
        assert_eq!(first, second);
        assert!(first.iter().all(|&c| c == RGB8::new(255, 255, 255)));
    }

    #[test]
    fn test_master_brightness_scales_output() {
        let mut engine = AnimationEngine::new(4);
        let mut state = white_state(LedMode::Solid);
        state.led_brightness = 0;
        assert!(engine.tick(0, &state, 1.0).iter().all(|&c| c == OFF));

        state.led_brightness = 50;
        let frame = snapshot(engine.tick(10, &state, 1.0));
        // 50% of full scale, truncating
        assert_eq!(frame[0], RGB8::new(127, 127, 127));
    }

    #[test]
    fn test_flow_holds_frame_inside_gate() {
        let mut engine = AnimationEngine::new(10);
        let state = white_state(LedMode::Flow);

        let initial = snapshot(engine.tick(0, &state, 1.0));
        // Before the 50 ms gate elapses the frame must be unchanged
        let early = snapshot(engine.tick(FLOW_STEP_MS - 1, &state, 1.0));
        assert_eq!(initial, early);

        let advanced = snapshot(engine.tick(FLOW_STEP_MS, &state, 1.0));
        assert_ne!(initial, advanced);
        // The window moved exactly one position
        assert_eq!(advanced[1], initial[0]);
    }

    #[test]
    fn test_flow_window_levels() {
        let mut engine = AnimationEngine::new(10);
        let state = white_state(LedMode::Flow);
        let frame = snapshot(engine.tick(0, &state, 1.0));

        // Head at 0; trail wraps to the strip's tail end
        assert_eq!(frame[0], RGB8::new(255, 255, 255));
        assert_eq!(frame[9], RGB8::new(205, 205, 205));
        assert_eq!(frame[8], RGB8::new(155, 155, 155));
        assert_eq!(frame[7], RGB8::new(105, 105, 105));
        assert_eq!(frame[6], RGB8::new(55, 55, 55));
        assert!(frame[1..6].iter().all(|&c| c == OFF));
    }

    #[test]
    fn test_breathing_starts_at_floor_and_moves() {
        let mut engine = AnimationEngine::new(2);
        let state = white_state(LedMode::Breathing);

        let first = snapshot(engine.tick(0, &state, 1.0));
        assert_eq!(first[0], RGB8::new(BREATH_MIN, BREATH_MIN, BREATH_MIN));

        let later = snapshot(engine.tick(30, &state, 1.0));
        assert_eq!(later[0].r, BREATH_MIN + 5);
    }

    #[test]
    fn test_mode_switch_resets_phase() {
        let mut engine = AnimationEngine::new(10);
        let mut state = white_state(LedMode::Flow);

        // Advance flow a few positions
        let initial = snapshot(engine.tick(0, &state, 1.0));
        engine.tick(50, &state, 1.0);
        engine.tick(100, &state, 1.0);

        // Leave and re-enter the mode
        state.led_mode = LedMode::Solid;
        engine.tick(150, &state, 1.0);
        state.led_mode = LedMode::Flow;
        let reentered = snapshot(engine.tick(200, &state, 1.0));

        assert_eq!(reentered, initial);
    }

    #[test]
    fn test_sos_follows_morse_timeline() {
        let mut engine = AnimationEngine::new(3);
        let state = white_state(LedMode::Sos);
        let lit = RGB8::new(255, 255, 255);

        // Cycle starts at the first tick
        assert_eq!(engine.tick(0, &state, 1.0)[0], lit);
        // Between the first and second dot
        assert_eq!(engine.tick(150, &state, 1.0)[0], OFF);
        // Inside the first dash
        assert_eq!(engine.tick(700, &state, 1.0)[0], lit);
        // Blank tail of the cycle
        assert_eq!(engine.tick(2350, &state, 1.0)[0], OFF);
        // Next cycle's first dot
        assert_eq!(engine.tick(SOS_CYCLE_MS + 50, &state, 1.0)[0], lit);
    }

    #[test]
    fn test_fast_flash_toggles() {
        let mut engine = AnimationEngine::new(2);
        let state = white_state(LedMode::FastFlash);

        assert_ne!(engine.tick(0, &state, 1.0)[0], OFF);
        assert_ne!(engine.tick(99, &state, 1.0)[0], OFF);
        assert_eq!(engine.tick(100, &state, 1.0)[0], OFF);
        assert_ne!(engine.tick(200, &state, 1.0)[0], OFF);
    }

    #[test]
    fn test_color_change_applies_without_phase_reset() {
        let mut engine = AnimationEngine::new(10);
        let mut state = white_state(LedMode::Flow);

        engine.tick(0, &state, 1.0);
        engine.tick(50, &state, 1.0);

        // Change colors mid-gate; the head must not move but the color
        // must be picked up on the very next tick
        state.set_colors(&[0xFF0000]);
        let frame = snapshot(engine.tick(60, &state, 1.0));
        assert_eq!(frame[1], RGB8::new(255, 0, 0));
    }
}
