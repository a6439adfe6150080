//! Headless host that drives a [`VacuumEffect`] over a generated particle cloud.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use vacuum_core::{Result, VacuumEffect};
use vacuum_platform::{
    AudioPositionKind, AudioSystem, Behavior, FrameContext, HostLifecycle, ManualClock,
    ParticleBuffer, SoundId, SystemRegistry, TransformTable,
};

use crate::config::DemoConfig;

/// Audio backend that only logs what it was asked to play.
#[derive(Debug, Default)]
pub struct TracingAudio {
    pub played: usize,
}

impl AudioSystem for TracingAudio {
    fn play_sound(
        &mut self,
        sound: &SoundId,
        volume: f32,
        pitch: f32,
        position: Vec3,
        kind: AudioPositionKind,
    ) -> vacuum_platform::Result<()> {
        self.played += 1;
        debug!(%sound, volume, pitch, ?position, ?kind, "play sound");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct DemoHost {
    owner_destroyed: bool,
}

impl HostLifecycle for DemoHost {
    fn destroy_owner(&mut self) {
        self.owner_destroyed = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoReport {
    pub frames: u32,
    pub sounds_played: usize,
    pub particles_remaining: usize,
    pub owner_destroyed: bool,
}

fn spawn_cloud(particles: &mut ParticleBuffer, config: &DemoConfig) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    for _ in 0..config.particle_count {
        let direction = Vec3::new(
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
        )
        .normalize_or_zero();
        let direction = if direction == Vec3::ZERO { Vec3::X } else { direction };
        let radius = rng.gen_range(config.spawn_radius * 0.5..=config.spawn_radius);
        particles.spawn(direction * radius, Vec3::ZERO);
    }
}

fn orbit(config: &DemoConfig, seconds: f32) -> Vec3 {
    let angle = seconds * config.target_orbit_speed;
    Vec3::new(angle.cos(), 0.0, angle.sin()) * config.target_orbit_radius
}

/// Runs the effect at a fixed step until it destroys its owner or
/// `max_frames` is reached.
pub fn run(config: &DemoConfig) -> Result<DemoReport> {
    config.validate()?;
    let dt = config.frame_seconds();

    let mut particles = ParticleBuffer::new(Vec3::ZERO, config.particle_lifetime);
    spawn_cloud(&mut particles, config);
    let mut transforms = TransformTable::new();
    let target = transforms.insert(orbit(config, 0.0));
    let clock = ManualClock::new();
    let audio = Rc::new(RefCell::new(TracingAudio::default()));
    let registry = SystemRegistry::new().with_audio(audio.clone());
    let mut host = DemoHost::default();

    let mut effect = VacuumEffect::with_settings(
        config.effect,
        &mut particles,
        target,
        SoundId::new(config.sound.clone()),
    )?;
    effect.start(&registry, &clock)?;

    let mut frames = 0;
    while frames < config.max_frames && !host.owner_destroyed {
        frames += 1;
        clock.advance_secs(dt);
        transforms.set_position(target, orbit(config, frames as f32 * dt));
        let mut frame = FrameContext {
            delta_seconds: dt,
            particles: &mut particles,
            transforms: &transforms,
            clock: &clock,
            host: &mut host,
        };
        effect.update(&mut frame)?;
        particles.step(dt);
    }

    let report = DemoReport {
        frames,
        sounds_played: audio.borrow().played,
        particles_remaining: particles.len(),
        owner_destroyed: host.owner_destroyed,
    };
    if report.owner_destroyed {
        info!(frames, sounds = report.sounds_played, "all particles collected");
    } else {
        warn!(
            frames,
            remaining = report.particles_remaining,
            "frame limit reached before collection finished"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stationary(count: usize) -> DemoConfig {
        DemoConfig {
            particle_count: count,
            target_orbit_radius: 0.0,
            ..DemoConfig::default()
        }
    }

    #[test]
    fn stationary_target_collects_everything() {
        let report = run(&stationary(25)).unwrap();
        assert!(report.owner_destroyed);
        assert_eq!(report.particles_remaining, 0);
        assert!(report.frames < 3600);
        assert!(report.sounds_played >= 1);
    }

    #[test]
    fn same_seed_gives_same_run() {
        let config = DemoConfig {
            particle_count: 40,
            ..DemoConfig::default()
        };
        assert_eq!(run(&config).unwrap(), run(&config).unwrap());
    }

    #[test]
    fn empty_cloud_destroys_on_first_frame() {
        let report = run(&stationary(0)).unwrap();
        assert!(report.owner_destroyed);
        assert_eq!(report.frames, 1);
        assert_eq!(report.sounds_played, 0);
    }

    #[test]
    fn frame_limit_stops_the_run() {
        let config = DemoConfig {
            max_frames: 3,
            ..stationary(10)
        };
        let report = run(&config).unwrap();
        assert_eq!(report.frames, 3);
        assert!(!report.owner_destroyed);
        assert_eq!(report.particles_remaining, 10);
    }
}
