use std::time::Duration;

use crate::pitch::PitchState;

/// Minimum gap between two collected sounds.
pub const SOUND_INTERVAL: Duration = Duration::from_millis(20);

/// Volume every collected sound is played at.
pub const COLLECT_VOLUME: f32 = 0.3;

/// Rate limiter for the collected sound that also owns its pitch oscillator.
#[derive(Debug, Clone)]
pub struct SoundThrottle {
    last_sound_time: Duration,
    interval: Duration,
    pitch: PitchState,
}

impl Default for SoundThrottle {
    fn default() -> Self {
        Self::new(SOUND_INTERVAL)
    }
}

impl SoundThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            last_sound_time: Duration::ZERO,
            interval,
            pitch: PitchState::default(),
        }
    }

    /// Restarts the throttle window at `now` without touching the pitch.
    pub fn reset(&mut self, now: Duration) {
        self.last_sound_time = now;
    }

    /// The pitch state the next sound would use, if more than the interval
    /// has passed since the last emission. Does not change the throttle.
    pub fn peek_emit(&self, now: Duration) -> Option<PitchState> {
        if now.saturating_sub(self.last_sound_time) <= self.interval {
            return None;
        }
        Some(self.pitch.step())
    }

    /// Records a sound that was actually played at `now` with `pitch`.
    pub fn commit(&mut self, now: Duration, pitch: PitchState) {
        self.pitch = pitch;
        self.last_sound_time = now;
    }

    pub fn last_sound_time(&self) -> Duration {
        self.last_sound_time
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn pitch(&self) -> PitchState {
        self.pitch
    }
}
