//! Player controller
//!
//! Movement intent, jump gating, power tier and invincibility window.
//! Ground contact is the only thing that sets `on_ground`; jumping and
//! falling only ever clear it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::{Category, PLAYER_COLLISION_MASK, PLAYER_CONTACT_MASK};
use super::entity::{Bodied, Entity, EntityId, Facing};
use crate::consts::*;
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Animation the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerAnim {
    #[default]
    Idle,
    Run,
    Jump,
}

/// Result of a damage attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible, nothing happened
    Ignored,
    /// Lost the power tier, kept the life
    Demoted,
    /// A life must be taken from the session
    LifeLost,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Entity,
    pub move_speed: f32,
    pub jump_force: f32,
    pub on_ground: bool,
    pub moving_left: bool,
    pub moving_right: bool,
    pub facing: Facing,
    pub is_super: bool,
    pub has_fire_power: bool,
    pub is_invincible: bool,
    /// Ticks left in the invincibility window
    pub invincible_ticks: u32,
    /// Sprite opacity (flashes while invincible)
    pub opacity: f32,
    pub anim: PlayerAnim,
    idle_damping: f32,
    ground_clear_velocity: f32,
    invincibility_secs: f32,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2, tuning: &Tuning) -> Self {
        let body = Entity::new(
            id,
            pos,
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            Category::PLAYER,
        )
        .with_masks(PLAYER_COLLISION_MASK, PLAYER_CONTACT_MASK);

        Self {
            body,
            move_speed: tuning.move_speed,
            jump_force: tuning.jump_force,
            on_ground: false,
            moving_left: false,
            moving_right: false,
            facing: Facing::Right,
            is_super: false,
            has_fire_power: false,
            is_invincible: false,
            invincible_ticks: 0,
            opacity: 1.0,
            anim: PlayerAnim::Idle,
            idle_damping: tuning.idle_damping,
            ground_clear_velocity: tuning.ground_clear_velocity,
            invincibility_secs: tuning.invincibility_secs,
        }
    }

    /// Record the buttons currently held
    pub fn set_intent(&mut self, left: bool, right: bool) {
        self.moving_left = left;
        self.moving_right = right;
    }

    /// Jump if grounded. Returns true if the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.body.vel.y = self.jump_force;
        self.on_ground = false;
        self.anim = PlayerAnim::Jump;
        true
    }

    /// Ground contact began (the only writer of `on_ground = true`)
    pub fn land(&mut self) {
        self.on_ground = true;
    }

    /// Resolve movement and advance the invincibility window
    pub fn tick(&mut self) {
        let direction = match (self.moving_left, self.moving_right) {
            (true, false) => Some(Facing::Left),
            (false, true) => Some(Facing::Right),
            _ => None,
        };

        match direction {
            Some(facing) => {
                self.facing = facing;
                self.body.vel.x = facing.sign() * self.move_speed;
            }
            None => self.body.vel.x *= self.idle_damping,
        }
        self.body.vel.x = self.body.vel.x.clamp(-self.move_speed, self.move_speed);

        if self.body.vel.y < self.ground_clear_velocity {
            self.on_ground = false;
        }

        self.anim = if !self.on_ground {
            PlayerAnim::Jump
        } else if direction.is_some() {
            PlayerAnim::Run
        } else {
            PlayerAnim::Idle
        };

        self.tick_invincibility();
    }

    fn tick_invincibility(&mut self) {
        if !self.is_invincible {
            return;
        }
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
        if self.invincible_ticks == 0 {
            self.end_invincibility();
            return;
        }

        // Fade to 0.3 and back every flash period
        let period = secs_to_ticks(FLASH_PERIOD_SECS);
        let half = (period / 2).max(1);
        let phase = self.invincible_ticks % period;
        let t = if phase < half {
            phase as f32 / half as f32
        } else {
            (period - phase) as f32 / half as f32
        };
        self.opacity = 1.0 - (1.0 - FLASH_MIN_OPACITY) * t;
    }

    /// Take a hit from an enemy
    pub fn take_damage(&mut self) -> DamageOutcome {
        if self.is_invincible {
            return DamageOutcome::Ignored;
        }

        if self.is_super {
            self.demote();
            self.start_invincibility();
            DamageOutcome::Demoted
        } else {
            self.start_invincibility();
            DamageOutcome::LifeLost
        }
    }

    /// Base to super tier (idempotent)
    pub fn power_up(&mut self) -> bool {
        if self.is_super {
            return false;
        }
        self.is_super = true;
        self.body.resize_keep_feet(Vec2::new(PLAYER_WIDTH, PLAYER_SUPER_HEIGHT));
        true
    }

    fn demote(&mut self) {
        self.is_super = false;
        self.has_fire_power = false;
        self.body.resize_keep_feet(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT));
    }

    pub fn start_invincibility(&mut self) {
        self.is_invincible = true;
        self.invincible_ticks = secs_to_ticks(self.invincibility_secs);
        self.body.contact_mask = PLAYER_CONTACT_MASK.without(Category::ENEMY);
    }

    fn end_invincibility(&mut self) {
        self.is_invincible = false;
        self.invincible_ticks = 0;
        self.opacity = 1.0;
        self.body.contact_mask = PLAYER_CONTACT_MASK;
    }

    /// Put the player back at `pos` in a clean base state
    pub fn respawn(&mut self, pos: Vec2) {
        if self.is_super {
            self.demote();
        }
        self.end_invincibility();
        self.body.pos = pos;
        self.body.vel = Vec2::ZERO;
        self.body.category = Category::PLAYER;
        self.body.collision_mask = PLAYER_COLLISION_MASK;
        self.on_ground = false;
        self.moving_left = false;
        self.moving_right = false;
        self.facing = Facing::Right;
        self.anim = PlayerAnim::Idle;
    }
}

impl Bodied for Player {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(EntityId(1), Vec2::new(0.0, 28.0), &Tuning::default())
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut p = player();
        assert!(!p.jump());
        assert_eq!(p.body.vel.y, 0.0);

        p.land();
        assert!(p.jump());
        assert!(!p.on_ground);
        assert_eq!(p.body.vel.y, PLAYER_JUMP_FORCE);

        // No double jump
        p.body.vel.y = 100.0;
        assert!(!p.jump());
        assert_eq!(p.body.vel.y, 100.0);
    }

    #[test]
    fn test_intent_sets_velocity_and_facing() {
        let mut p = player();
        p.set_intent(true, false);
        p.tick();
        assert_eq!(p.body.vel.x, -PLAYER_MOVE_SPEED);
        assert_eq!(p.facing, Facing::Left);

        p.set_intent(false, true);
        p.tick();
        assert_eq!(p.body.vel.x, PLAYER_MOVE_SPEED);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn test_idle_and_both_pressed_damp() {
        let mut p = player();
        p.body.vel.x = 100.0;
        p.tick();
        assert!((p.body.vel.x - 80.0).abs() < 0.001);

        p.set_intent(true, true);
        p.tick();
        assert!((p.body.vel.x - 64.0).abs() < 0.001);
    }

    #[test]
    fn test_horizontal_clamp() {
        let mut p = player();
        p.body.vel.x = -900.0;
        p.tick();
        assert_eq!(p.body.vel.x, -PLAYER_MOVE_SPEED);
    }

    #[test]
    fn test_falling_clears_ground() {
        let mut p = player();
        p.land();
        p.body.vel.y = -5.0;
        p.tick();
        assert!(p.on_ground);

        p.body.vel.y = -12.0;
        p.tick();
        assert!(!p.on_ground);
        assert_eq!(p.anim, PlayerAnim::Jump);
    }

    #[test]
    fn test_damage_while_small_loses_life() {
        let mut p = player();
        assert_eq!(p.take_damage(), DamageOutcome::LifeLost);
        assert!(p.is_invincible);
        assert!(!p.body.contact_mask.intersects(Category::ENEMY));

        // Immune during the window
        assert_eq!(p.take_damage(), DamageOutcome::Ignored);
    }

    #[test]
    fn test_damage_while_super_demotes() {
        let mut p = player();
        assert!(p.power_up());
        p.has_fire_power = true;
        p.body.needs_rebuild = false;

        assert_eq!(p.take_damage(), DamageOutcome::Demoted);
        assert!(!p.is_super);
        assert!(!p.has_fire_power);
        assert_eq!(p.body.size.y, PLAYER_HEIGHT);
        assert!(p.body.needs_rebuild);
    }

    #[test]
    fn test_power_up_idempotent() {
        let mut p = player();
        assert!(p.power_up());
        assert_eq!(p.body.size.y, PLAYER_SUPER_HEIGHT);
        assert!(!p.power_up());
        assert_eq!(p.body.size.y, PLAYER_SUPER_HEIGHT);
    }

    #[test]
    fn test_invincibility_expires_and_restores_mask() {
        let mut p = player();
        p.take_damage();
        let ticks = secs_to_ticks(INVINCIBILITY_SECS);

        let mut saw_dim = false;
        for _ in 0..ticks - 1 {
            p.tick();
            assert!(p.is_invincible);
            assert!(!p.body.contact_mask.intersects(Category::ENEMY));
            saw_dim |= p.opacity < 0.5;
        }
        assert!(saw_dim);

        p.tick();
        assert!(!p.is_invincible);
        assert_eq!(p.opacity, 1.0);
        assert_eq!(p.body.contact_mask, PLAYER_CONTACT_MASK);
    }

    #[test]
    fn test_respawn_restores_invariants() {
        let mut p = player();
        p.power_up();
        p.take_damage();
        p.set_intent(true, false);
        p.body.vel = Vec2::new(-200.0, -300.0);

        p.respawn(Vec2::new(-400.0, 100.0));
        assert!(!p.is_invincible);
        assert!(!p.is_super);
        assert_eq!(p.body.contact_mask, PLAYER_CONTACT_MASK);
        assert_eq!(p.body.vel, Vec2::ZERO);
        assert_eq!(p.body.pos, Vec2::new(-400.0, 100.0));
        assert!(!p.moving_left);
    }
}
