//! Player preferences
//!
//! Kept separate from gameplay tuning: nothing here changes the simulation,
//! only how it is presented.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Camera shake on damage
    pub screen_shake: bool,
    /// Damage flash on the player sprite
    pub damage_flash: bool,

    // === HUD ===
    /// Show the stage label next to the timer
    pub show_stage: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no flashing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Visual effects - all on by default
            screen_shake: true,
            damage_flash: true,

            // HUD
            show_stage: true,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            // Accessibility
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        for (field, value) in [
            ("master_volume", settings.master_volume),
            ("sfx_volume", settings.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        info!("Loaded settings");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective damage flash (respects reduced_motion)
    pub fn effective_damage_flash(&self) -> bool {
        self.damage_flash && !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_damage_flash());
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{ "muted": true }"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_volume_out_of_range() {
        assert!(Settings::from_json(r#"{ "sfx_volume": 2.0 }"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
