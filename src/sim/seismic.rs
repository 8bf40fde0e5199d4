//! Earthquake state machine
//!
//! One event at a time: intensity ramps up over the first 20% of the event,
//! holds, then ramps down over the last 20%. Phases are derived from the
//! frame counter rather than stored.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Phase of the current earthquake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuakePhase {
    Idle,
    RampUp,
    Sustain,
    RampDown,
}

impl QuakePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuakePhase::Idle => "idle",
            QuakePhase::RampUp => "ramp-up",
            QuakePhase::Sustain => "sustain",
            QuakePhase::RampDown => "ramp-down",
        }
    }
}

/// Earthquake intensity and progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeismicState {
    pub active: bool,
    /// Effect scale in [0, 1]
    pub intensity: f32,
    /// Frames since activation
    pub duration: u32,
    pub max_duration: u32,
}

impl Default for SeismicState {
    fn default() -> Self {
        Self::new(QUAKE_MAX_DURATION)
    }
}

impl SeismicState {
    pub fn new(max_duration: u32) -> Self {
        Self {
            active: false,
            intensity: 0.0,
            duration: 0,
            max_duration,
        }
    }

    /// Begin an earthquake. No-op (returns false) while one is running.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.intensity = 0.0;
        self.duration = 0;
        true
    }

    /// Phase for the current frame counter
    pub fn phase(&self) -> QuakePhase {
        if !self.active {
            return QuakePhase::Idle;
        }
        let max = self.max_duration as f32;
        let d = self.duration as f32;
        if d < max * QUAKE_RAMP_UP_FRACTION {
            QuakePhase::RampUp
        } else if d > max * QUAKE_RAMP_DOWN_FRACTION {
            QuakePhase::RampDown
        } else {
            QuakePhase::Sustain
        }
    }

    /// Count a frame and ramp intensity for the resulting phase
    pub fn advance(&mut self) {
        if !self.active {
            return;
        }
        self.duration += 1;
        match self.phase() {
            QuakePhase::RampUp => {
                self.intensity = (self.intensity + QUAKE_INTENSITY_STEP).min(1.0);
            }
            QuakePhase::RampDown => {
                self.intensity = (self.intensity - QUAKE_INTENSITY_STEP).max(0.0);
            }
            QuakePhase::Sustain | QuakePhase::Idle => {}
        }
    }

    /// End the event once it has run its full length.
    ///
    /// Intensity and duration keep their last values until the next `start`.
    pub fn finish_if_elapsed(&mut self) -> bool {
        if self.active && self.duration >= self.max_duration {
            self.active = false;
            return true;
        }
        false
    }

    /// Collapse rolls only happen after the onset delay
    pub fn collapse_window_open(&self) -> bool {
        self.active && self.duration > COLLAPSE_ONSET_FRAMES
    }
}
