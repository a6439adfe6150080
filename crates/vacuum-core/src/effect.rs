//! The vacuum behavior: pulls every particle of a system toward a target,
//! collects the ones that arrive and plays a rising/falling blip for them.

use std::time::Duration;

use glam::Vec3;
use tracing::{debug, info, trace, warn};
use vacuum_platform::{
    AudioPositionKind, Behavior, Clock, FrameContext, ParticleState, ParticleSystem, SharedAudio,
    SoundId, SystemRegistry, TransformId,
};

use crate::error::{Result, VacuumError};
use crate::settings::VacuumSettings;
use crate::throttle::{SoundThrottle, COLLECT_VOLUME};

/// Velocity lost per reference tick.
pub const DAMPING_PER_TICK: f32 = 0.1;
/// Tick rate the damping constant is expressed against.
pub const REFERENCE_FPS: f32 = 60.0;

/// Velocity multiplier for a frame of `dt` seconds.
///
/// Linear in `dt`, not exponential: above `1 / (DAMPING_PER_TICK * REFERENCE_FPS)`
/// seconds it turns negative and velocities flip sign.
pub fn damping_multiplier(dt: f32) -> f32 {
    1.0 - DAMPING_PER_TICK * (dt * REFERENCE_FPS)
}

/// Pushes every particle away from the system origin, proportionally to its
/// distance from it.
pub fn expel(particles: &mut dyn ParticleSystem, strength: f32) {
    let origin = particles.origin();
    particles.modify_all_particles(&mut |particle: &mut ParticleState| {
        particle.velocity += (particle.offset - origin) * strength;
    });
}

/// Advances one particle's velocity toward `target` and returns its distance
/// to the target before the step.
pub fn integrate(particle: &mut ParticleState, target: Vec3, acceleration: f32, dt: f32) -> f32 {
    // Keep the difference materialized before normalizing it; normalizing the
    // subtraction expression directly has produced wrong directions under
    // some SIMD code paths.
    let difference = target - particle.offset;
    let direction = difference.normalize_or_zero();
    particle.velocity = particle.velocity * damping_multiplier(dt) + direction * acceleration * dt;
    difference.length()
}

pub struct VacuumEffect {
    settings: VacuumSettings,
    target: TransformId,
    sound: SoundId,
    audio: Option<SharedAudio>,
    throttle: SoundThrottle,
    destroyed: bool,
    warned_negative_damping: bool,
}

impl VacuumEffect {
    /// Creates an effect with default tunables and the given arrival radius.
    pub fn new(
        particles: &mut dyn ParticleSystem,
        target: TransformId,
        sound: SoundId,
        deletion_distance: f32,
    ) -> Result<Self> {
        let settings = VacuumSettings {
            deletion_distance,
            ..VacuumSettings::default()
        };
        Self::with_settings(settings, particles, target, sound)
    }

    /// Creates an effect and applies the initial expulsion to `particles`.
    pub fn with_settings(
        settings: VacuumSettings,
        particles: &mut dyn ParticleSystem,
        target: TransformId,
        sound: SoundId,
    ) -> Result<Self> {
        settings.validate()?;
        expel(particles, settings.initial_expulsion_velocity);
        info!(
            particles = particles.particle_count(),
            target_transform = ?target,
            %sound,
            deletion_distance = settings.deletion_distance,
            "vacuum effect created"
        );
        Ok(Self {
            settings,
            target,
            sound,
            audio: None,
            throttle: SoundThrottle::default(),
            destroyed: false,
            warned_negative_damping: false,
        })
    }

    pub fn settings(&self) -> &VacuumSettings {
        &self.settings
    }

    pub fn acceleration(&self) -> f32 {
        self.settings.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: f32) -> Result<()> {
        self.update_settings(VacuumSettings {
            acceleration,
            ..self.settings
        })
    }

    pub fn initial_expulsion_velocity(&self) -> f32 {
        self.settings.initial_expulsion_velocity
    }

    /// Stored only. The expulsion already happened at construction.
    pub fn set_initial_expulsion_velocity(&mut self, velocity: f32) -> Result<()> {
        self.update_settings(VacuumSettings {
            initial_expulsion_velocity: velocity,
            ..self.settings
        })
    }

    pub fn deletion_distance(&self) -> f32 {
        self.settings.deletion_distance
    }

    pub fn set_deletion_distance(&mut self, distance: f32) -> Result<()> {
        self.update_settings(VacuumSettings {
            deletion_distance: distance,
            ..self.settings
        })
    }

    pub fn destroy_after_particles_empty(&self) -> bool {
        self.settings.destroy_after_particles_empty
    }

    pub fn set_destroy_after_particles_empty(&mut self, enabled: bool) {
        self.settings.destroy_after_particles_empty = enabled;
    }

    /// Replaces the settings if they validate; keeps the old ones otherwise.
    fn update_settings(&mut self, settings: VacuumSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn target(&self) -> TransformId {
        self.target
    }

    pub fn throttle(&self) -> &SoundThrottle {
        &self.throttle
    }

    pub fn is_started(&self) -> bool {
        self.audio.is_some()
    }

    /// True once the owner destruction has been requested.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn play_collected_sound(
        &mut self,
        audio: &SharedAudio,
        now: Duration,
        position: Vec3,
    ) -> Result<()> {
        let Some(next) = self.throttle.peek_emit(now) else {
            return Ok(());
        };
        debug!(pitch = next.pitch, sound = %self.sound, "playing collected sound");
        audio
            .borrow_mut()
            .play_sound(
                &self.sound,
                COLLECT_VOLUME,
                next.pitch,
                position,
                AudioPositionKind::AbsoluteWorld,
            )
            .map_err(VacuumError::Audio)?;
        self.throttle.commit(now, next);
        Ok(())
    }
}

impl Behavior for VacuumEffect {
    type Error = VacuumError;

    fn start(&mut self, registry: &SystemRegistry, clock: &dyn Clock) -> Result<()> {
        let audio = registry.audio().ok_or(VacuumError::MissingSystem("audio"))?;
        self.audio = Some(audio);
        self.throttle.reset(clock.now());
        info!(target_transform = ?self.target, "vacuum effect started");
        Ok(())
    }

    fn update(&mut self, frame: &mut FrameContext<'_>) -> Result<()> {
        if self.destroyed {
            trace!("update on destroyed vacuum effect ignored");
            return Ok(());
        }
        let audio = self.audio.clone().ok_or(VacuumError::NotStarted)?;
        let target = frame
            .transforms
            .position(self.target)
            .ok_or(VacuumError::TargetMissing(self.target))?;

        let dt = frame.delta_seconds;
        if damping_multiplier(dt) < 0.0 && !self.warned_negative_damping {
            warn!(
                dt,
                multiplier = damping_multiplier(dt),
                "frame time too large, damping reverses velocity"
            );
            self.warned_negative_damping = true;
        }

        let lifetime = frame.particles.particle_lifetime();
        let acceleration = self.settings.acceleration;
        let deletion_distance = self.settings.deletion_distance;
        let mut arrivals = 0usize;
        frame.particles.modify_all_particles(&mut |particle: &mut ParticleState| {
            let distance = integrate(particle, target, acceleration, dt);
            if distance <= deletion_distance {
                particle.age = lifetime;
                arrivals += 1;
            }
        });

        // A failed sound must not skip the empty check below.
        let mut sound_result = Ok(());
        for _ in 0..arrivals {
            sound_result = self.play_collected_sound(&audio, frame.clock.now(), target);
            if sound_result.is_err() {
                break;
            }
        }

        let remaining = frame.particles.particle_count();
        trace!(arrivals, remaining, "vacuum frame");
        if remaining == 0 && self.settings.destroy_after_particles_empty {
            info!("particle system empty, destroying vacuum effect owner");
            self.destroyed = true;
            frame.host.destroy_owner();
        }
        sound_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vacuum_platform::ParticleBuffer;

    #[test]
    fn expel_pushes_away_from_system_origin() {
        let mut particles = ParticleBuffer::new(Vec3::new(1.0, 0.0, 0.0), 5.0);
        particles.spawn(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
        particles.spawn(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        expel(&mut particles, 40.0);
        assert_eq!(particles.particles()[0].velocity, Vec3::new(80.0, 0.0, 0.0));
        assert_eq!(particles.particles()[1].velocity, Vec3::new(0.0, -39.0, 0.0));
    }

    #[test]
    fn integrate_accelerates_toward_target() {
        let mut particle = ParticleState::new(Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO);
        let distance = integrate(&mut particle, Vec3::ZERO, 150.0, 0.1);
        assert_eq!(distance, 2.0);
        assert!((particle.velocity - Vec3::new(-15.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn integrate_with_zero_dt_keeps_velocity() {
        let velocity = Vec3::new(0.3, -4.0, 12.5);
        let mut particle = ParticleState::new(Vec3::new(1.0, 1.0, 1.0), velocity);
        integrate(&mut particle, Vec3::new(-3.0, 0.0, 2.0), 150.0, 0.0);
        assert_eq!(particle.velocity, velocity);
    }

    #[test]
    fn integrate_at_target_stays_finite() {
        let mut particle = ParticleState::new(Vec3::ONE, Vec3::X);
        let distance = integrate(&mut particle, Vec3::ONE, 150.0, 1.0 / 60.0);
        assert_eq!(distance, 0.0);
        assert!(particle.velocity.is_finite());
        assert!((particle.velocity - Vec3::X * 0.9).length() < 1e-5);
    }

    #[test]
    fn large_dt_flips_velocity() {
        assert!((damping_multiplier(0.5) + 2.0).abs() < 1e-5);
        let mut particle = ParticleState::new(Vec3::ZERO, Vec3::X);
        integrate(&mut particle, Vec3::ZERO, 0.0, 0.5);
        assert!((particle.velocity - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn setters_reject_invalid_values() {
        let mut particles = ParticleBuffer::new(Vec3::ZERO, 5.0);
        let mut effect =
            VacuumEffect::new(&mut particles, TransformId(0), SoundId::new("s"), 0.25).unwrap();

        assert!(matches!(
            effect.set_deletion_distance(-1.0),
            Err(VacuumError::InvalidSettings(_))
        ));
        assert!(effect.set_deletion_distance(f32::NAN).is_err());
        assert!(effect.set_acceleration(f32::INFINITY).is_err());
        assert!(effect.set_initial_expulsion_velocity(f32::NAN).is_err());
        assert_eq!(*effect.settings(), VacuumSettings::default());

        effect.set_deletion_distance(0.5).unwrap();
        effect.set_acceleration(-20.0).unwrap();
        assert_eq!(effect.deletion_distance(), 0.5);
        assert_eq!(effect.acceleration(), -20.0);
    }

    #[test]
    fn damping_matches_reference_tick() {
        assert!((damping_multiplier(1.0 / 60.0) - 0.9).abs() < 1e-6);
        assert_eq!(damping_multiplier(0.0), 1.0);
    }
}
