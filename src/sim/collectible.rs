//! Collectibles
//!
//! Stars are static score pickups. Mushrooms walk along the ground and grant
//! the super tier; fire flowers grant it plus fire power. Collecting one plays
//! a short pop effect before the entity despawns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::entity::{Bodied, EffectKind, EndAction, Entity, EntityId, Facing, TimedEffect};
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectibleKind {
    #[default]
    Star,
    Mushroom,
    FireFlower,
}

impl CollectibleKind {
    pub fn size(self) -> f32 {
        match self {
            CollectibleKind::Star | CollectibleKind::FireFlower => STAR_SIZE,
            CollectibleKind::Mushroom => MUSHROOM_SIZE,
        }
    }
}

/// What the player gets for picking something up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub score: u32,
    pub power_up: bool,
    pub fire_power: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub body: Entity,
    pub kind: CollectibleKind,
    pub facing: Facing,
    /// Pop effect, present once collected
    pub effect: Option<TimedEffect>,
    move_speed: f32,
    bonus: u32,
}

impl Collectible {
    pub fn new(id: EntityId, kind: CollectibleKind, pos: Vec2, tuning: &Tuning) -> Self {
        let size = Vec2::splat(kind.size());
        let body = Entity::new(id, pos, size, Category::COLLECTIBLE);
        let (body, move_speed) = match kind {
            CollectibleKind::Mushroom => {
                let mut body = body.with_masks(Category::GROUND, Category::PLAYER);
                body.vel.x = tuning.mushroom_speed;
                (body, tuning.mushroom_speed)
            }
            CollectibleKind::Star | CollectibleKind::FireFlower => {
                (body.with_masks(Category::NONE, Category::PLAYER).fixed(), 0.0)
            }
        };

        Self {
            body,
            kind,
            facing: Facing::Right,
            effect: None,
            move_speed,
            bonus: tuning.collect_bonus,
        }
    }

    pub fn is_collected(&self) -> bool {
        !self.body.alive
    }

    /// Pick this up. Returns None if it was already collected.
    pub fn collect(&mut self) -> Option<Reward> {
        if self.is_collected() {
            return None;
        }

        self.body.alive = false;
        self.body.vel = Vec2::ZERO;
        self.body.category = Category::NONE;
        self.body.contact_mask = Category::NONE;
        if self.body.is_dynamic {
            // Freeze in place for the pop
            self.body.is_dynamic = false;
            self.body.needs_rebuild = true;
        }
        self.effect = Some(TimedEffect::new(
            EffectKind::Pop,
            COLLECT_EFFECT_SECS,
            EndAction::Despawn,
        ));

        Some(Reward {
            score: self.bonus,
            power_up: matches!(
                self.kind,
                CollectibleKind::Mushroom | CollectibleKind::FireFlower
            ),
            fire_power: self.kind == CollectibleKind::FireFlower,
        })
    }

    /// Advance one tick. Returns true when the entity should despawn.
    pub fn tick(&mut self) -> bool {
        if let Some(effect) = &mut self.effect {
            return effect.advance() == Some(EndAction::Despawn);
        }

        if self.move_speed > 0.0 {
            // Bounce off whatever stopped us
            if self.body.vel.x == 0.0 {
                self.facing = self.facing.flipped();
            }
            self.body.vel.x = self.move_speed * self.facing.sign();
        }
        false
    }
}

impl Bodied for Collectible {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}
