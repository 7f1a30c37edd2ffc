//! Star Dash - a single-stage side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic gameplay simulation (player, enemies, contacts, camera, session)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (shake, volume)
//! - `audio`: Fire-and-forget sound cues driven by simulation events
//! - `hud`: Derived display values

pub mod audio;
pub mod error;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, LevelError};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport the camera frames (landscape phone, points)
    pub const VIEWPORT_WIDTH: f32 = 844.0;
    pub const VIEWPORT_HEIGHT: f32 = 390.0;

    /// Gravity: 9.8 m/s² at 150 points per meter
    pub const GRAVITY: f32 = -1470.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 56.0;
    pub const PLAYER_SUPER_HEIGHT: f32 = 72.0;
    pub const PLAYER_MOVE_SPEED: f32 = 200.0;
    pub const PLAYER_JUMP_FORCE: f32 = 700.0;
    /// Multiplicative horizontal damping per idle tick
    pub const IDLE_DAMPING: f32 = 0.8;
    /// Falling faster than this clears the ground flag
    pub const GROUND_CLEAR_VELOCITY: f32 = -10.0;
    /// Feet this far below a ground top still count as standing on it
    pub const LANDING_TOLERANCE: f32 = 2.0;
    pub const INVINCIBILITY_SECS: f32 = 3.0;
    /// One fade-out + fade-in cycle of the damage flash
    pub const FLASH_PERIOD_SECS: f32 = 0.2;
    pub const FLASH_MIN_OPACITY: f32 = 0.3;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 32.0;
    pub const BUG_SPEED: f32 = 50.0;
    pub const GOOMBA_SPEED: f32 = 30.0;
    pub const KOOPA_SPEED: f32 = 40.0;
    pub const SHELL_SPEED: f32 = 200.0;
    pub const SHELL_TIMEOUT_SECS: f32 = 10.0;
    pub const SHELL_KICK_DELAY_SECS: f32 = 0.5;
    /// Edge probe: distance ahead and below the enemy center
    pub const PROBE_AHEAD: f32 = 30.0;
    pub const PROBE_DROP: f32 = 20.0;
    /// Squash (0.1s) + fade (0.3s)
    pub const DEATH_EFFECT_SECS: f32 = 0.4;

    /// Collectible defaults
    pub const STAR_SIZE: f32 = 20.0;
    pub const MUSHROOM_SIZE: f32 = 24.0;
    pub const MUSHROOM_SPEED: f32 = 50.0;
    pub const COLLECT_EFFECT_SECS: f32 = 0.3;

    /// Contact policy
    pub const STOMP_THRESHOLD: f32 = 20.0;
    pub const STOMP_BOUNCE: f32 = 300.0;
    pub const COLLECT_BONUS: u32 = 100;
    pub const KILL_BONUS: u32 = 100;
    pub const STOMP_BONUS: u32 = 200;

    /// Session defaults
    pub const STARTING_LIVES: u8 = 3;
    pub const TIMER_BUDGET_SECS: f32 = 300.0;
    pub const DEATH_Y: f32 = -500.0;

    /// Camera defaults
    pub const CAMERA_FOLLOW_SPEED: f32 = 0.1;
    pub const CAMERA_DEAD_ZONE: f32 = 50.0;
    pub const FOCUS_PADDING: f32 = 0.8;
    pub const FOCUS_HOLD_SECS: f32 = 1.0;
    pub const ZOOM_RESTORE_SECS: f32 = 0.5;
    pub const DAMAGE_SHAKE_INTENSITY: f32 = 10.0;
    pub const DAMAGE_SHAKE_SECS: f32 = 0.5;
}

/// Convert a duration in seconds to a whole number of simulation ticks (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    ((secs / consts::SIM_DT).round() as u32).max(1)
}

/// Move `current` a fraction of the way toward `target`
#[inline]
pub fn approach(current: f32, target: f32, fraction: f32) -> f32 {
    current + (target - current) * fraction
}
