//! Per-mode timing state
//!
//! Each mode owns its own counters; nothing is shared between modes, and
//! the whole set is re-initialized when the active mode changes, so no
//! phase ever bleeds from one mode into another. Switching away and back
//! restarts a mode at its initial phase (reset-on-entry).

/// Breathing brightness step interval
pub const BREATH_STEP_MS: u64 = 30;

/// Breathing brightness floor
pub const BREATH_MIN: u8 = 50;

/// Breathing brightness ceiling
pub const BREATH_MAX: u8 = 255;

/// Breathing brightness step size
pub const BREATH_STEP: u8 = 5;

/// Full Morse SOS cycle length
pub const SOS_CYCLE_MS: u64 = 2400;

/// SOS evaluation gate
pub const SOS_GATE_MS: u64 = 10;

/// Fast-flash toggle interval
pub const FLASH_TOGGLE_MS: u64 = 100;

/// Flow head advance interval
pub const FLOW_STEP_MS: u64 = 50;

/// Flow window brightness levels, head first
pub const FLOW_LEVELS: [u8; 5] = [255, 205, 155, 105, 55];

/// Lit intervals within the SOS cycle, in milliseconds from cycle start
///
/// Three 100 ms dots, 100 ms group gap, three 300 ms dashes, 100 ms group
/// gap, three 100 ms dots, blank until the cycle restarts at 2400 ms.
pub const SOS_LIT_INTERVALS: [(u16, u16); 9] = [
    (0, 100),
    (200, 300),
    (400, 500),
    (600, 900),
    (1000, 1300),
    (1400, 1700),
    (1800, 1900),
    (2000, 2100),
    (2200, 2300),
];

/// Whether the SOS pattern is lit at an offset within the cycle
pub fn sos_lit_at(offset_ms: u64) -> bool {
    let offset = (offset_ms % SOS_CYCLE_MS) as u16;
    SOS_LIT_INTERVALS
        .iter()
        .any(|&(start, end)| offset >= start && offset < end)
}

/// Breathing mode state: triangle wave between the floor and ceiling
#[derive(Debug, Clone, Copy)]
pub struct BreathingTimer {
    pub last_step_ms: u64,
    pub level: u8,
    pub rising: bool,
}

impl BreathingTimer {
    fn start(now_ms: u64) -> Self {
        Self {
            last_step_ms: now_ms,
            level: BREATH_MIN,
            rising: true,
        }
    }

    /// Advance one step if the interval elapsed, reversing at the bounds
    pub fn advance(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_step_ms) < BREATH_STEP_MS {
            return;
        }
        self.last_step_ms = now_ms;

        if self.rising {
            self.level = self.level.saturating_add(BREATH_STEP).min(BREATH_MAX);
            if self.level >= BREATH_MAX {
                self.rising = false;
            }
        } else {
            self.level = self.level.saturating_sub(BREATH_STEP).max(BREATH_MIN);
            if self.level <= BREATH_MIN {
                self.rising = true;
            }
        }
    }
}

/// SOS mode state: position within the fixed cycle
#[derive(Debug, Clone, Copy)]
pub struct SosTimer {
    pub cycle_start_ms: u64,
    pub last_eval_ms: u64,
    pub lit: bool,
}

impl SosTimer {
    fn start(now_ms: u64) -> Self {
        Self {
            cycle_start_ms: now_ms,
            last_eval_ms: now_ms,
            lit: sos_lit_at(0),
        }
    }

    /// Re-evaluate the lit state if the gate elapsed
    pub fn advance(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_eval_ms) < SOS_GATE_MS {
            return;
        }
        self.last_eval_ms = now_ms;
        self.lit = sos_lit_at(now_ms.saturating_sub(self.cycle_start_ms));
    }
}

/// Fast-flash mode state: plain on/off toggle
#[derive(Debug, Clone, Copy)]
pub struct FlashTimer {
    pub last_toggle_ms: u64,
    pub lit: bool,
}

impl FlashTimer {
    fn start(now_ms: u64) -> Self {
        Self {
            last_toggle_ms: now_ms,
            lit: true,
        }
    }

    /// Toggle if the interval elapsed
    pub fn advance(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_toggle_ms) < FLASH_TOGGLE_MS {
            return;
        }
        self.last_toggle_ms = now_ms;
        self.lit = !self.lit;
    }
}

/// Flow mode state: head position of the scanning window
#[derive(Debug, Clone, Copy)]
pub struct FlowTimer {
    pub last_step_ms: u64,
    pub head: usize,
}

impl FlowTimer {
    fn start(now_ms: u64) -> Self {
        Self {
            last_step_ms: now_ms,
            head: 0,
        }
    }

    /// Advance the head one position if the interval elapsed
    pub fn advance(&mut self, now_ms: u64, strip_len: usize) {
        if now_ms.saturating_sub(self.last_step_ms) < FLOW_STEP_MS {
            return;
        }
        self.last_step_ms = now_ms;
        self.head = (self.head + 1) % strip_len.max(1);
    }
}

/// The complete set of per-mode timers
#[derive(Debug, Clone, Copy)]
pub struct ModeTimers {
    pub breathing: BreathingTimer,
    pub sos: SosTimer,
    pub flash: FlashTimer,
    pub flow: FlowTimer,
}

impl ModeTimers {
    /// Initialize every mode at its starting phase, anchored at `now_ms`
    pub fn start(now_ms: u64) -> Self {
        Self {
            breathing: BreathingTimer::start(now_ms),
            sos: SosTimer::start(now_ms),
            flash: FlashTimer::start(now_ms),
            flow: FlowTimer::start(now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sos_timeline_groups() {
        // First dot group
        assert!(sos_lit_at(50));
        assert!(!sos_lit_at(150));
        assert!(sos_lit_at(250));
        // Group gap
        assert!(!sos_lit_at(550));
        // Dash group
        assert!(sos_lit_at(700));
        assert!(sos_lit_at(1650));
        assert!(!sos_lit_at(950));
        // Trailing dot group and blank tail
        assert!(sos_lit_at(2250));
        assert!(!sos_lit_at(2350));
        // Wraps modulo the cycle
        assert!(sos_lit_at(SOS_CYCLE_MS + 50));
    }

    #[test]
    fn test_breathing_reverses_at_bounds() {
        let mut timer = BreathingTimer::start(0);
        let mut now = 0;
        let mut seen_max = false;
        let mut seen_min_again = false;

        for _ in 0..200 {
            now += BREATH_STEP_MS;
            timer.advance(now);
            assert!(timer.level >= BREATH_MIN && timer.level <= BREATH_MAX);
            if timer.level == BREATH_MAX {
                seen_max = true;
            }
            if seen_max && timer.level == BREATH_MIN {
                seen_min_again = true;
            }
        }
        assert!(seen_max);
        assert!(seen_min_again);
    }

    #[test]
    fn test_breathing_gate_freezes_level() {
        let mut timer = BreathingTimer::start(0);
        timer.advance(BREATH_STEP_MS);
        let level = timer.level;
        // Sub-interval calls are no-ops
        timer.advance(BREATH_STEP_MS + 5);
        timer.advance(BREATH_STEP_MS + 29);
        assert_eq!(timer.level, level);
        timer.advance(BREATH_STEP_MS * 2);
        assert_eq!(timer.level, level + BREATH_STEP);
    }

    #[test]
    fn test_flow_wraps_modulo_strip() {
        let mut timer = FlowTimer::start(0);
        let mut now = 0;
        for expected in [1, 2, 0, 1] {
            now += FLOW_STEP_MS;
            timer.advance(now, 3);
            assert_eq!(timer.head, expected);
        }
    }

    #[test]
    fn test_flash_toggles_on_interval() {
        let mut timer = FlashTimer::start(0);
        assert!(timer.lit);
        timer.advance(99);
        assert!(timer.lit);
        timer.advance(100);
        assert!(!timer.lit);
        timer.advance(200);
        assert!(timer.lit);
    }
}
