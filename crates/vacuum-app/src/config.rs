use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vacuum_core::{Result, VacuumError, VacuumSettings};

/// Everything the demo needs besides the effect tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub effect: VacuumSettings,
    pub particle_count: usize,
    pub particle_lifetime: f32,
    /// Particles spawn between half this radius and the full radius.
    pub spawn_radius: f32,
    pub frame_rate: f32,
    pub max_frames: u32,
    pub target_orbit_radius: f32,
    /// Radians per second.
    pub target_orbit_speed: f32,
    pub seed: u64,
    pub sound: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            effect: VacuumSettings::default(),
            particle_count: 200,
            particle_lifetime: 30.0,
            spawn_radius: 2.0,
            frame_rate: 60.0,
            max_frames: 3600,
            target_orbit_radius: 0.5,
            target_orbit_speed: 1.0,
            seed: 7,
            sound: "collect.wav".into(),
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.effect.validate()?;
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(VacuumError::InvalidSettings(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if !(self.spawn_radius.is_finite() && self.spawn_radius > 0.0) {
            return Err(VacuumError::InvalidSettings(format!(
                "spawn_radius must be positive, got {}",
                self.spawn_radius
            )));
        }
        if !(self.particle_lifetime.is_finite() && self.particle_lifetime > 0.0) {
            return Err(VacuumError::InvalidSettings(format!(
                "particle_lifetime must be positive, got {}",
                self.particle_lifetime
            )));
        }
        Ok(())
    }

    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_table_overrides_defaults() {
        let config = DemoConfig::from_toml_str(
            r#"
particle_count = 12

[effect]
acceleration = 75.0
"#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.effect.acceleration, 75.0);
        assert_eq!(config.effect.deletion_distance, 0.25);
        assert_eq!(config.frame_rate, 60.0);
    }

    #[test]
    fn bundled_demo_config_parses() {
        let config = DemoConfig::from_toml_str(include_str!("../demo.toml")).unwrap();
        assert_eq!(config.particle_count, 300);
        assert_eq!(config.seed, 42);
        assert_eq!(config.effect, VacuumSettings::default());
    }

    #[test]
    fn zero_frame_rate_is_rejected() {
        assert!(DemoConfig::from_toml_str("frame_rate = 0.0").is_err());
    }
}
