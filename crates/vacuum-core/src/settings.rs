use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VacuumError};

/// Tunables for a [`VacuumEffect`](crate::VacuumEffect).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacuumSettings {
    /// Pull toward the target, in units/s².
    pub acceleration: f32,
    /// Scale of the one-time outward push applied at construction.
    pub initial_expulsion_velocity: f32,
    /// Particles at or closer than this to the target are collected.
    pub deletion_distance: f32,
    pub destroy_after_particles_empty: bool,
}

impl Default for VacuumSettings {
    fn default() -> Self {
        Self {
            acceleration: 150.0,
            initial_expulsion_velocity: 40.0,
            deletion_distance: 0.25,
            destroy_after_particles_empty: true,
        }
    }
}

impl VacuumSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("acceleration", self.acceleration),
            ("initial_expulsion_velocity", self.initial_expulsion_velocity),
            ("deletion_distance", self.deletion_distance),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(VacuumError::InvalidSettings(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.deletion_distance < 0.0 {
            return Err(VacuumError::InvalidSettings(format!(
                "deletion_distance must not be negative, got {}",
                self.deletion_distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings = VacuumSettings::from_toml_str("acceleration = 90.0\n").unwrap();
        assert_eq!(settings.acceleration, 90.0);
        assert_eq!(settings.initial_expulsion_velocity, 40.0);
        assert_eq!(settings.deletion_distance, 0.25);
        assert!(settings.destroy_after_particles_empty);
    }

    #[test]
    fn negative_deletion_distance_is_rejected() {
        let err = VacuumSettings::from_toml_str("deletion_distance = -1.0\n").unwrap_err();
        assert!(matches!(err, VacuumError::InvalidSettings(_)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let settings = VacuumSettings {
            acceleration: f32::NAN,
            ..VacuumSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = VacuumSettings::from_toml_str("acceleration = \"fast\"").unwrap_err();
        assert!(matches!(err, VacuumError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "deletion_distance = 0.5").unwrap();
        writeln!(file, "destroy_after_particles_empty = false").unwrap();
        let settings = VacuumSettings::load(file.path()).unwrap();
        assert_eq!(settings.deletion_distance, 0.5);
        assert!(!settings.destroy_after_particles_empty);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = VacuumSettings::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, VacuumError::Io(_)));
    }
}
