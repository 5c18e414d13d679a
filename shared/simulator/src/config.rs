use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Tunables for a single turret. Distances are world units, times are seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretConfig {
    pub bullet_speed: f64,
    pub rotation_speed: f64,
    pub detection_radius: f64,
    pub check_interval: f64,
    pub shoot_interval: f64,
    pub bullet_ttl: f64,
    /// Spawn point relative to the turret, in the turret's frame.
    pub bullet_spawn_offset: [f64; 2],
    pub bullet_radius: f64,
}

impl Default for TurretConfig {
    fn default() -> Self {
        TurretConfig {
            bullet_speed: 2.0,
            rotation_speed: 2.0,
            detection_radius: 5.0,
            check_interval: 0.5,
            shoot_interval: 1.0,
            bullet_ttl: 5.0,
            bullet_spawn_offset: [0.0, 0.5],
            bullet_radius: 0.1,
        }
    }
}

impl TurretConfig {
    pub fn from_json(s: &str) -> Result<TurretConfig, Error> {
        let config: TurretConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("detection_radius", self.detection_radius),
            ("check_interval", self.check_interval),
            ("shoot_interval", self.shoot_interval),
            ("bullet_ttl", self.bullet_ttl),
            ("bullet_radius", self.bullet_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::new(format!("{} must be positive, got {}", name, value)));
            }
        }
        let non_negative = [
            ("bullet_speed", self.bullet_speed),
            ("rotation_speed", self.rotation_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::new(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        if !self.bullet_spawn_offset.iter().all(|x| x.is_finite()) {
            return Err(Error::new("bullet_spawn_offset must be finite"));
        }
        Ok(())
    }
}
