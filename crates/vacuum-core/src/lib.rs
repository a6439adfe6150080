//! Particle vacuum: a per-frame behavior that sucks a particle system into a
//! moving target, expires particles as they arrive and plays a throttled,
//! pitch-oscillating collection sound.

pub mod effect;
pub mod error;
pub mod pitch;
pub mod settings;
pub mod throttle;

pub use effect::{damping_multiplier, expel, integrate, VacuumEffect};
pub use error::{Result, VacuumError};
pub use pitch::{PitchDirection, PitchState};
pub use settings::VacuumSettings;
pub use throttle::{SoundThrottle, COLLECT_VOLUME, SOUND_INTERVAL};
