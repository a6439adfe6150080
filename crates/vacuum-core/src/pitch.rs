//! Triangle-wave pitch for the collected sound.
//!
//! Each emission moves the pitch by [`PITCH_STEP`] in the current direction.
//! Overshooting a bound folds the excess back inside the range and turns the
//! direction around, so the sequence bounces between [`MIN_PITCH`] and
//! [`MAX_PITCH`] instead of sticking to a clamped edge.

pub const MIN_PITCH: f32 = 0.5;
pub const MAX_PITCH: f32 = 2.0;
pub const PITCH_STEP: f32 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchDirection {
    Ascending,
    Descending,
}

impl PitchDirection {
    fn sign(self) -> f32 {
        match self {
            PitchDirection::Ascending => 1.0,
            PitchDirection::Descending => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchState {
    pub pitch: f32,
    pub direction: PitchDirection,
}

impl Default for PitchState {
    fn default() -> Self {
        Self {
            pitch: MIN_PITCH,
            direction: PitchDirection::Ascending,
        }
    }
}

impl PitchState {
    /// The state after one more emission.
    #[must_use]
    pub fn step(self) -> Self {
        let mut pitch = self.pitch + PITCH_STEP * self.direction.sign();
        let mut direction = self.direction;
        if pitch >= MAX_PITCH {
            pitch -= (pitch - MAX_PITCH) * 2.0;
            direction = PitchDirection::Descending;
        } else if pitch <= MIN_PITCH {
            pitch += (MIN_PITCH - pitch) * 2.0;
            direction = PitchDirection::Ascending;
        }
        Self { pitch, direction }
    }
}
