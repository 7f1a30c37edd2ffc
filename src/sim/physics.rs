//! Physics world boundary
//!
//! The simulation does not own a rigid-body engine. It talks to one through
//! [`PhysicsWorld`]: create bodies with a category and masks, set velocities,
//! probe points, and step to receive contact-begin pairs.
//!
//! [`ArcadeWorld`] is a small AABB implementation of that boundary: gravity,
//! axis-separated blocking against static bodies, no rotation or friction.
//! A static body given a velocity moves kinematically and carries the
//! dynamic bodies resting on its top. It backs the demo binary and the tests.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::category::Category;
use super::entity::{Aabb, EntityId};

/// Touching bodies closer than this still count as in contact
pub const CONTACT_SLOP: f32 = 0.5;
/// Blocking ignores overlaps shallower than this (resting contact jitter)
const BLOCK_EPSILON: f32 = 0.01;

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub is_dynamic: bool,
    pub category: Category,
    pub collision_mask: Category,
    pub contact_mask: Category,
}

/// One side of a contact pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBody {
    pub id: EntityId,
    pub category: Category,
}

/// Two bodies started touching this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: ContactBody,
    pub b: ContactBody,
}

impl Contact {
    /// Union of both categories (unordered pair key)
    pub fn pair(&self) -> Category {
        self.a.category.union(self.b.category)
    }

    /// The side with the given category, and the other side
    pub fn split(&self, category: Category) -> Option<(ContactBody, ContactBody)> {
        if self.a.category == category {
            Some((self.a, self.b))
        } else if self.b.category == category {
            Some((self.b, self.a))
        } else {
            None
        }
    }
}

/// Capability set the simulation needs from a physics engine
pub trait PhysicsWorld {
    fn set_gravity(&mut self, gravity: Vec2);
    /// Create (or replace) the body for `desc.id`
    fn create_body(&mut self, desc: BodyDesc);
    /// Remove a body; unknown ids are ignored
    fn remove_body(&mut self, id: EntityId);
    fn set_velocity(&mut self, id: EntityId, vel: Vec2);
    fn set_position(&mut self, id: EntityId, pos: Vec2);
    fn set_filter(&mut self, id: EntityId, category: Category, contact_mask: Category);
    /// Current (position, velocity) of a body
    fn body_state(&self, id: EntityId) -> Option<(Vec2, Vec2)>;
    /// Categories of every body containing the point (empty if none)
    fn query_point(&self, point: Vec2) -> Category;
    /// Integrate one step and return the pairs that began touching
    fn step(&mut self, dt: f32) -> Vec<Contact>;
}

#[derive(Debug, Clone)]
struct Body {
    pos: Vec2,
    vel: Vec2,
    size: Vec2,
    is_dynamic: bool,
    category: Category,
    collision_mask: Category,
    contact_mask: Category,
}

impl Body {
    fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    fn raises_contact_with(&self, other: &Body) -> bool {
        self.contact_mask.intersects(other.category) || other.contact_mask.intersects(self.category)
    }

    /// Standing on `support`: feet within the contact slop of its top
    fn rests_on(&self, support: &Body) -> bool {
        let (feet, top) = (self.aabb(), support.aabb());
        self.collision_mask.intersects(support.category)
            && (feet.min.y - top.max.y).abs() <= CONTACT_SLOP
            && feet.min.x < top.max.x
            && feet.max.x > top.min.x
    }
}

/// Minimal AABB world (stable iteration by id)
#[derive(Debug, Clone, Default)]
pub struct ArcadeWorld {
    gravity: Vec2,
    bodies: BTreeMap<EntityId, Body>,
    touching: BTreeSet<(EntityId, EntityId)>,
}

impl ArcadeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn contact_mask(&self, id: EntityId) -> Option<Category> {
        self.bodies.get(&id).map(|b| b.contact_mask)
    }

    pub fn body_size(&self, id: EntityId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.size)
    }

    /// Move a kinematic static and the dynamic bodies riding on it
    fn move_kinematic(&mut self, id: EntityId, delta: Vec2) {
        let Some(support) = self.bodies.get(&id) else {
            return;
        };
        let riders: Vec<EntityId> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_dynamic && b.rests_on(support))
            .map(|(id, _)| *id)
            .collect();

        for body_id in riders.into_iter().chain(std::iter::once(id)) {
            if let Some(body) = self.bodies.get_mut(&body_id) {
                body.pos += delta;
            }
        }
    }

    /// Move one dynamic body along one axis and push it out of blocking statics
    fn move_axis(&mut self, id: EntityId, statics: &[(Aabb, Category)], delta: Vec2) {
        let Some(body) = self.bodies.get_mut(&id) else {
            return;
        };
        body.pos += delta;
        if body.collision_mask.is_empty() {
            return;
        }

        let half = body.size * 0.5;
        for (other, category) in statics {
            if !body.collision_mask.intersects(*category) {
                continue;
            }
            if !body.aabb().overlaps(other, -BLOCK_EPSILON) {
                continue;
            }
            if delta.x > 0.0 {
                body.pos.x = other.min.x - half.x;
                body.vel.x = 0.0;
            } else if delta.x < 0.0 {
                body.pos.x = other.max.x + half.x;
                body.vel.x = 0.0;
            } else if delta.y > 0.0 {
                body.pos.y = other.min.y - half.y;
                body.vel.y = 0.0;
            } else if delta.y < 0.0 {
                body.pos.y = other.max.y + half.y;
                body.vel.y = 0.0;
            }
        }
    }

    fn current_contacts(&self) -> BTreeSet<(EntityId, EntityId)> {
        let mut pairs = BTreeSet::new();
        let entries: Vec<_> = self.bodies.iter().collect();
        for (i, (id_a, a)) in entries.iter().enumerate() {
            for (id_b, b) in &entries[i + 1..] {
                if !a.is_dynamic && !b.is_dynamic {
                    continue;
                }
                if !a.raises_contact_with(b) {
                    continue;
                }
                if a.aabb().overlaps(&b.aabb(), CONTACT_SLOP) {
                    pairs.insert((**id_a, **id_b));
                }
            }
        }
        pairs
    }
}

impl PhysicsWorld for ArcadeWorld {
    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn create_body(&mut self, desc: BodyDesc) {
        self.bodies.insert(
            desc.id,
            Body {
                pos: desc.pos,
                vel: desc.vel,
                size: desc.size,
                is_dynamic: desc.is_dynamic,
                category: desc.category,
                collision_mask: desc.collision_mask,
                contact_mask: desc.contact_mask,
            },
        );
    }

    fn remove_body(&mut self, id: EntityId) {
        self.bodies.remove(&id);
        self.touching.retain(|(a, b)| *a != id && *b != id);
    }

    fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.vel = vel;
        }
    }

    fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.pos = pos;
        }
    }

    fn set_filter(&mut self, id: EntityId, category: Category, contact_mask: Category) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.category = category;
            body.contact_mask = contact_mask;
        }
    }

    fn body_state(&self, id: EntityId) -> Option<(Vec2, Vec2)> {
        self.bodies.get(&id).map(|b| (b.pos, b.vel))
    }

    fn query_point(&self, point: Vec2) -> Category {
        self.bodies
            .values()
            .filter(|b| b.aabb().contains_point(point))
            .fold(Category::NONE, |acc, b| acc.union(b.category))
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        let kinematic: Vec<(EntityId, Vec2)> = self
            .bodies
            .iter()
            .filter(|(_, b)| !b.is_dynamic && b.vel != Vec2::ZERO)
            .map(|(id, b)| (*id, b.vel * dt))
            .collect();
        for (id, delta) in kinematic {
            self.move_kinematic(id, delta);
        }

        let statics: Vec<(Aabb, Category)> = self
            .bodies
            .values()
            .filter(|b| !b.is_dynamic)
            .map(|b| (b.aabb(), b.category))
            .collect();
        let dynamic_ids: Vec<EntityId> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_dynamic)
            .map(|(id, _)| *id)
            .collect();

        for id in dynamic_ids {
            let Some(body) = self.bodies.get_mut(&id) else {
                continue;
            };
            body.vel += self.gravity * dt;
            let delta = body.vel * dt;
            self.move_axis(id, &statics, Vec2::new(delta.x, 0.0));
            self.move_axis(id, &statics, Vec2::new(0.0, delta.y));
        }

        let current = self.current_contacts();
        let began: Vec<Contact> = current
            .difference(&self.touching)
            .filter_map(|(a, b)| {
                let body_a = self.bodies.get(a)?;
                let body_b = self.bodies.get(b)?;
                Some(Contact {
                    a: ContactBody {
                        id: *a,
                        category: body_a.category,
                    },
                    b: ContactBody {
                        id: *b,
                        category: body_b.category,
                    },
                })
            })
            .collect();
        self.touching = current;
        began
    }
}
