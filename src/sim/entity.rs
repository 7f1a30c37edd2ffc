//! Shared entity record and timed effects
//!
//! Player, enemies and collectibles each embed an [`Entity`]: the gameplay
//! copy of a physics body. The physics world owns the authoritative kinematic
//! body; the tick pushes gameplay changes in and pulls integrated motion back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::physics::BodyDesc;
use crate::secs_to_ticks;

/// Stable identifier shared between the simulation and the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Horizontal facing (sprite orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 { Facing::Left } else { Facing::Right }
    }

    /// -1.0 for left, 1.0 for right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap test; positive `margin` grows both boxes, negative shrinks them
    pub fn overlaps(&self, other: &Aabb, margin: f32) -> bool {
        self.min.x - margin < other.max.x
            && self.max.x + margin > other.min.x
            && self.min.y - margin < other.max.y
            && self.max.y + margin > other.min.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Base gameplay record for anything with a body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub category: Category,
    pub collision_mask: Category,
    pub contact_mask: Category,
    pub is_dynamic: bool,
    pub alive: bool,
    /// Collider shape changed; the body must be recreated before the next step
    #[serde(default)]
    pub needs_rebuild: bool,
}

impl Entity {
    pub fn new(id: EntityId, pos: Vec2, size: Vec2, category: Category) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size,
            category,
            collision_mask: Category::NONE,
            contact_mask: Category::NONE,
            is_dynamic: true,
            alive: true,
            needs_rebuild: false,
        }
    }

    pub fn with_masks(mut self, collision_mask: Category, contact_mask: Category) -> Self {
        self.collision_mask = collision_mask;
        self.contact_mask = contact_mask;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_dynamic = false;
        self
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Bottom edge (feet) y coordinate
    pub fn bottom(&self) -> f32 {
        self.pos.y - self.size.y * 0.5
    }

    /// Body description for the physics world
    pub fn body_desc(&self) -> BodyDesc {
        BodyDesc {
            id: self.id,
            pos: self.pos,
            vel: self.vel,
            size: self.size,
            is_dynamic: self.is_dynamic,
            category: self.category,
            collision_mask: self.collision_mask,
            contact_mask: self.contact_mask,
        }
    }

    /// Change the collider height, keeping the feet where they are
    pub fn resize_keep_feet(&mut self, size: Vec2) {
        let feet = self.bottom();
        self.size = size;
        self.pos.y = feet + size.y * 0.5;
        self.needs_rebuild = true;
    }
}

/// Anything that carries a physics body
pub trait Bodied {
    fn body(&self) -> &Entity;
    fn body_mut(&mut self) -> &mut Entity;
}

/// What happens when a timed effect runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndAction {
    /// Remove the entity and its body
    Despawn,
}

/// Named animation the presentation layer plays for an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Enemy death: squash then fade
    SquashFade,
    /// Collectible pickup: scale up, shrink and fade
    Pop,
}

/// A data-described "play for a while, then do something" sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub kind: EffectKind,
    pub duration_ticks: u32,
    pub elapsed_ticks: u32,
    pub end: EndAction,
}

impl TimedEffect {
    pub fn new(kind: EffectKind, secs: f32, end: EndAction) -> Self {
        Self {
            kind,
            duration_ticks: secs_to_ticks(secs),
            elapsed_ticks: 0,
            end,
        }
    }

    /// Advance one tick; returns the end action once the effect has finished
    pub fn advance(&mut self) -> Option<EndAction> {
        if self.elapsed_ticks < self.duration_ticks {
            self.elapsed_ticks += 1;
        }
        self.is_finished().then_some(self.end)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ticks >= self.duration_ticks
    }

    /// Normalized progress 0..=1 for animation
    pub fn progress(&self) -> f32 {
        self.elapsed_ticks as f32 / self.duration_ticks as f32
    }
}
