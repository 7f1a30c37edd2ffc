//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Timed effects counted in ticks, never callbacks
//! - No rendering, audio or platform dependencies

pub mod camera;
pub mod category;
pub mod collectible;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod level;
pub mod physics;
pub mod platform;
pub mod player;
pub mod state;
pub mod tick;

pub use camera::{Camera, CameraBounds};
pub use category::Category;
pub use collectible::{Collectible, CollectibleKind};
pub use collision::{EnemyContact, classify_enemy_contact, resolve_contacts};
pub use enemy::{Enemy, EnemyKind, EnemyType, ShellState};
pub use entity::{Bodied, Entity, EntityId, Facing, TimedEffect};
pub use level::{LevelData, level_one};
pub use physics::{ArcadeWorld, BodyDesc, Contact, PhysicsWorld};
pub use platform::MovingPlatform;
pub use player::{DamageOutcome, Player, PlayerAnim};
pub use state::{GameEvent, GamePhase, GameState, SessionState};
pub use tick::{InputBuffer, TickInput, tick};
