//! LED animation engine
//!
//! Converts device state plus the latest battery fraction into LED frames
//! under a cooperative scheduler. Each mode is gated by its own minimum
//! inter-update interval, so the engine can be ticked far more often than
//! any mode visually updates without perturbing phase accounting.

mod engine;
mod timers;

pub use engine::{AnimationEngine, LedFrame, DEFAULT_LED_COUNT, MAX_LEDS};
pub use timers::{
    sos_lit_at, BreathingTimer, FlashTimer, FlowTimer, ModeTimers, SosTimer, BREATH_MAX,
    BREATH_MIN, BREATH_STEP, BREATH_STEP_MS, FLASH_TOGGLE_MS, FLOW_LEVELS, FLOW_STEP_MS,
    SOS_CYCLE_MS, SOS_GATE_MS, SOS_LIT_INTERVALS,
};
