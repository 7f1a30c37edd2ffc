//! Data-driven game balance
//!
//! [`Tuning`] mirrors the gameplay constants in [`crate::consts`]. Every field
//! defaults to its constant, so a JSON file only needs the values it wants to
//! change. `consts` stays the authoritative default source.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Runtime-tunable gameplay numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── World ────────────────────────────────────────────────────────────────
    pub gravity: f32,
    pub death_y: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub move_speed: f32,
    pub jump_force: f32,
    pub idle_damping: f32,
    pub ground_clear_velocity: f32,
    pub invincibility_secs: f32,

    // ── Enemies ──────────────────────────────────────────────────────────────
    pub bug_speed: f32,
    pub goomba_speed: f32,
    pub koopa_speed: f32,
    pub shell_speed: f32,
    pub shell_timeout_secs: f32,
    pub shell_kick_delay_secs: f32,
    pub probe_ahead: f32,
    pub probe_drop: f32,

    // ── Collectibles ─────────────────────────────────────────────────────────
    pub mushroom_speed: f32,

    // ── Contacts and scoring ─────────────────────────────────────────────────
    pub stomp_threshold: f32,
    pub stomp_bounce: f32,
    pub collect_bonus: u32,
    pub kill_bonus: u32,
    pub stomp_bonus: u32,

    // ── Session ──────────────────────────────────────────────────────────────
    pub starting_lives: u8,
    pub timer_budget_secs: f32,

    // ── Camera ───────────────────────────────────────────────────────────────
    pub follow_speed: f32,
    pub dead_zone: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // World
            gravity: GRAVITY,
            death_y: DEATH_Y,
            // Player
            move_speed: PLAYER_MOVE_SPEED,
            jump_force: PLAYER_JUMP_FORCE,
            idle_damping: IDLE_DAMPING,
            ground_clear_velocity: GROUND_CLEAR_VELOCITY,
            invincibility_secs: INVINCIBILITY_SECS,
            // Enemies
            bug_speed: BUG_SPEED,
            goomba_speed: GOOMBA_SPEED,
            koopa_speed: KOOPA_SPEED,
            shell_speed: SHELL_SPEED,
            shell_timeout_secs: SHELL_TIMEOUT_SECS,
            shell_kick_delay_secs: SHELL_KICK_DELAY_SECS,
            probe_ahead: PROBE_AHEAD,
            probe_drop: PROBE_DROP,
            // Collectibles
            mushroom_speed: MUSHROOM_SPEED,
            // Contacts and scoring
            stomp_threshold: STOMP_THRESHOLD,
            stomp_bounce: STOMP_BOUNCE,
            collect_bonus: COLLECT_BONUS,
            kill_bonus: KILL_BONUS,
            stomp_bonus: STOMP_BONUS,
            // Session
            starting_lives: STARTING_LIVES,
            timer_budget_secs: TIMER_BUDGET_SECS,
            // Camera
            follow_speed: CAMERA_FOLLOW_SPEED,
            dead_zone: CAMERA_DEAD_ZONE,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning file
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse a tuning file, falling back to defaults on any problem
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                warn!("Ignoring tuning file: {err}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("move_speed", self.move_speed),
            ("jump_force", self.jump_force),
            ("invincibility_secs", self.invincibility_secs),
            ("shell_speed", self.shell_speed),
            ("shell_timeout_secs", self.shell_timeout_secs),
            ("timer_budget_secs", self.timer_budget_secs),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("bug_speed", self.bug_speed),
            ("goomba_speed", self.goomba_speed),
            ("koopa_speed", self.koopa_speed),
            ("mushroom_speed", self.mushroom_speed),
            ("shell_kick_delay_secs", self.shell_kick_delay_secs),
            ("stomp_threshold", self.stomp_threshold),
            ("dead_zone", self.dead_zone),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if !(self.follow_speed > 0.0 && self.follow_speed <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "follow_speed",
                value: self.follow_speed,
            });
        }
        if !(0.0..=1.0).contains(&self.idle_damping) {
            return Err(ConfigError::OutOfRange {
                field: "idle_damping",
                value: self.idle_damping,
            });
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::OutOfRange {
                field: "starting_lives",
                value: 0.0,
            });
        }
        // Stomping has to pay more than a shell or side kill
        if self.stomp_bonus <= self.kill_bonus {
            return Err(ConfigError::OutOfRange {
                field: "stomp_bonus",
                value: self.stomp_bonus as f32,
            });
        }
        Ok(())
    }
}
