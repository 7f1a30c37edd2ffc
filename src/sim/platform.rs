//! Moving platforms
//!
//! Ground tiles that shuttle out along a fixed offset and back at constant
//! speed. Position is a pure function of the elapsed tick count, so restarts
//! and replays put every platform on the same path. The physics world sees a
//! static ground body with a velocity, and carries whatever rests on top.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::entity::EntityId;
use super::level::PlatformSpawn;
use super::physics::{BodyDesc, PhysicsWorld};
use crate::secs_to_ticks;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub id: EntityId,
    /// Current center
    pub pos: Vec2,
    pub size: Vec2,
    origin: Vec2,
    travel: Vec2,
    leg_ticks: u32,
}

impl MovingPlatform {
    pub fn new(id: EntityId, spawn: &PlatformSpawn) -> Self {
        Self {
            id,
            pos: spawn.center,
            size: spawn.size,
            origin: spawn.center,
            travel: spawn.travel,
            leg_ticks: secs_to_ticks(spawn.leg_secs),
        }
    }

    /// Center after `ticks` ticks: out to `origin + travel`, then back
    pub fn position_at(&self, ticks: u64) -> Vec2 {
        let leg = u64::from(self.leg_ticks);
        let phase = ticks % (2 * leg);
        let along = if phase < leg { phase } else { 2 * leg - phase };
        self.origin + self.travel * (along as f32 / leg as f32)
    }

    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    pub fn body_desc(&self) -> BodyDesc {
        BodyDesc {
            id: self.id,
            pos: self.pos,
            vel: Vec2::ZERO,
            size: self.size,
            is_dynamic: false,
            category: Category::GROUND,
            collision_mask: Category::NONE,
            contact_mask: Category::NONE,
        }
    }

    /// Place the platform for `elapsed` ticks and give it the velocity that
    /// reaches the next position over one step of `dt`
    pub fn drive<W: PhysicsWorld>(&mut self, world: &mut W, elapsed: u64, dt: f32) {
        self.pos = self.position_at(elapsed);
        let next = self.position_at(elapsed + 1);
        world.set_position(self.id, self.pos);
        world.set_velocity(self.id, (next - self.pos) / dt);
    }

    /// Back to the start of the path, at rest
    pub fn reset<W: PhysicsWorld>(&mut self, world: &mut W) {
        self.pos = self.origin;
        world.set_position(self.id, self.origin);
        world.set_velocity(self.id, Vec2::ZERO);
    }
}
