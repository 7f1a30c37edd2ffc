//! Physics categories for contact filtering
//!
//! A body has one category (what it is) and two masks built from the same
//! flags: a collision mask (what physically blocks it) and a contact mask
//! (what raises a gameplay event when touched).

use serde::{Deserialize, Serialize};

/// Set of category flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Category(u32);

impl Category {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(1 << 0);
    pub const GROUND: Self = Self(1 << 1);
    pub const ENEMY: Self = Self(1 << 2);
    pub const COLLECTIBLE: Self = Self(1 << 3);
    pub const WALL: Self = Self(1 << 4);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// True if every flag in `other` is set
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any flag is shared
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Category {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Category {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// Masks the player is created with
pub const PLAYER_COLLISION_MASK: Category = Category::GROUND.union(Category::WALL);
pub const PLAYER_CONTACT_MASK: Category = Category::GROUND
    .union(Category::ENEMY)
    .union(Category::COLLECTIBLE);

/// Masks every enemy walks with
pub const ENEMY_COLLISION_MASK: Category = Category::GROUND.union(Category::WALL);
pub const ENEMY_CONTACT_MASK: Category = Category::PLAYER;
/// A shell can be bumped by the player and hits other enemies
pub const SHELL_CONTACT_MASK: Category = Category::PLAYER.union(Category::ENEMY);
