//! Host-side contracts so `vacuum-core` stays engine-agnostic.
//!
//! The vacuum behavior never owns particles, transforms or audio output. It
//! reaches them through the traits below, which a host engine implements.
//! Small in-memory implementations live in [`buffer`], [`clock`] and
//! [`transforms`] for demos and tests.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub mod buffer;
pub mod clock;
pub mod transforms;

pub use buffer::ParticleBuffer;
pub use clock::{ManualClock, SystemClock};
pub use transforms::TransformTable;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Per-particle state as seen by behaviors. `offset` is relative to the
/// particle system origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleState {
    pub offset: Vec3,
    pub velocity: Vec3,
    pub age: f32,
}

impl ParticleState {
    pub fn new(offset: Vec3, velocity: Vec3) -> Self {
        Self {
            offset,
            velocity,
            age: 0.0,
        }
    }
}

/// Handle into a [`TransformRegistry`]. Holding one does not keep the
/// transform alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformId(pub u32);

/// Opaque reference to a loaded sound asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundId(pub String);

impl SoundId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the position passed to [`AudioSystem::play_sound`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioPositionKind {
    /// Position is in world space.
    AbsoluteWorld,
    /// Position is relative to the listener.
    ListenerRelative,
    /// Position is ignored.
    NonSpatial,
}

/// A particle collection updated in bulk.
pub trait ParticleSystem {
    /// Runs `mutator` once for every live particle. Not reentrant.
    fn modify_all_particles(&mut self, mutator: &mut dyn FnMut(&mut ParticleState));
    fn particle_count(&self) -> usize;
    /// Age at which a particle expires. Writing this value into
    /// [`ParticleState::age`] kills the particle on the next aging pass.
    fn particle_lifetime(&self) -> f32;
    /// World position of the particle system itself.
    fn origin(&self) -> Vec3;
}

/// Read-only access to world positions owned by the host.
pub trait TransformRegistry {
    /// `None` once the transform has been removed.
    fn position(&self, id: TransformId) -> Option<Vec3>;
}

/// Sound output.
pub trait AudioSystem {
    fn play_sound(
        &mut self,
        sound: &SoundId,
        volume: f32,
        pitch: f32,
        position: Vec3,
        kind: AudioPositionKind,
    ) -> Result<()>;
}

/// Monotonic time source, injected so throttling stays deterministic under test.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Object lifecycle hooks a behavior may call back into.
pub trait HostLifecycle {
    /// Ask the host to destroy the object owning the calling behavior.
    fn destroy_owner(&mut self);
}

pub type SharedAudio = Rc<RefCell<dyn AudioSystem>>;

/// Engine-wide systems that behaviors resolve when they start.
#[derive(Clone, Default)]
pub struct SystemRegistry {
    audio: Option<SharedAudio>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audio(mut self, audio: SharedAudio) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn audio(&self) -> Option<SharedAudio> {
        self.audio.clone()
    }
}

/// Everything a behavior can touch during one frame.
pub struct FrameContext<'a> {
    pub delta_seconds: f32,
    pub particles: &'a mut dyn ParticleSystem,
    pub transforms: &'a dyn TransformRegistry,
    pub clock: &'a dyn Clock,
    pub host: &'a mut dyn HostLifecycle,
}

/// A per-object script driven by the host: `start` once, then `update` every frame.
pub trait Behavior {
    type Error;

    fn start(
        &mut self,
        registry: &SystemRegistry,
        clock: &dyn Clock,
    ) -> std::result::Result<(), Self::Error>;
    fn update(&mut self, frame: &mut FrameContext<'_>) -> std::result::Result<(), Self::Error>;
}
