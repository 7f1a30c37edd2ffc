//! Slack-follow camera
//!
//! The camera only reacts once the target leaves a dead-zone box around it,
//! and then only catches up to the edge of that box. The desired position is
//! clamped to the level bounds and approached by a fixed fraction per tick.
//!
//! Transient effects (shake, zoom tweens, focus on an area) are tick-counted.
//! Shake only perturbs [`Camera::render_position`], never the tracking state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::consts::*;
use crate::{approach, secs_to_ticks};

/// World rectangle the camera center may occupy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for CameraBounds {
    fn default() -> Self {
        Self {
            min_x: -4000.0,
            max_x: 8000.0,
            min_y: -300.0,
            max_y: 500.0,
        }
    }
}

impl CameraBounds {
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y.clamp(self.min_y, self.max_y),
        )
    }
}

/// Values a tween can interpolate
pub trait Lerp: Copy {
    fn lerp_to(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

/// Linear tick-counted interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    elapsed_ticks: u32,
    duration_ticks: u32,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, secs: f32) -> Self {
        Self {
            from,
            to,
            elapsed_ticks: 0,
            duration_ticks: secs_to_ticks(secs),
        }
    }

    /// Advance one tick and return the new value
    pub fn advance(&mut self) -> T {
        self.elapsed_ticks = (self.elapsed_ticks + 1).min(self.duration_ticks);
        self.value()
    }

    pub fn value(&self) -> T {
        let t = self.elapsed_ticks as f32 / self.duration_ticks as f32;
        self.from.lerp_to(self.to, t)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed_ticks >= self.duration_ticks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Shake {
    intensity: f32,
    remaining_ticks: u32,
}

/// Focus-on-area sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Focus {
    Idle,
    /// Panning and zooming toward the area
    Approach {
        pan: Tween<Vec2>,
        zoom: Tween<f32>,
        saved_target: Option<EntityId>,
    },
    /// Holding on the area before handing back to the target
    Hold {
        ticks_left: u32,
        saved_target: Option<EntityId>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Followed entity; the camera does not own it
    pub target: Option<EntityId>,
    pub position: Vec2,
    /// Where the camera was heading after the last tick (post-clamp)
    pub desired: Vec2,
    /// Offset range (camera - target) that needs no correction
    pub dead_zone_min: Vec2,
    pub dead_zone_max: Vec2,
    pub bounds: CameraBounds,
    /// Fraction of the remaining distance covered per tick, in (0, 1]
    pub follow_speed: f32,
    pub zoom: f32,
    zoom_tween: Option<Tween<f32>>,
    focus: Focus,
    shake: Option<Shake>,
    shake_seed: u64,
    ticks: u64,
}

impl Camera {
    pub fn new(position: Vec2, bounds: CameraBounds, follow_speed: f32, dead_zone: f32) -> Self {
        Self {
            target: None,
            position,
            desired: position,
            dead_zone_min: Vec2::splat(-dead_zone),
            dead_zone_max: Vec2::splat(dead_zone),
            bounds,
            follow_speed,
            zoom: 1.0,
            zoom_tween: None,
            focus: Focus::Idle,
            shake: None,
            shake_seed: 0,
            ticks: 0,
        }
    }

    /// Seed for the shake offsets (deterministic replays)
    pub fn with_shake_seed(mut self, seed: u64) -> Self {
        self.shake_seed = seed;
        self
    }

    pub fn follow(&mut self, target: EntityId) {
        self.target = Some(target);
    }

    /// Jump straight to a position (level start, respawn)
    pub fn snap_to(&mut self, position: Vec2) {
        self.position = self.bounds.clamp(position);
        self.desired = self.position;
    }

    pub fn is_focusing(&self) -> bool {
        !matches!(self.focus, Focus::Idle)
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    /// Advance one tick; `locate` resolves the target's current position
    pub fn tick<F>(&mut self, locate: F)
    where
        F: Fn(EntityId) -> Option<Vec2>,
    {
        self.ticks += 1;
        self.tick_focus();

        if let Some(tween) = &mut self.zoom_tween {
            self.zoom = tween.advance();
            if tween.is_done() {
                self.zoom_tween = None;
            }
        }

        if let Some(shake) = &mut self.shake {
            shake.remaining_ticks = shake.remaining_ticks.saturating_sub(1);
            if shake.remaining_ticks == 0 {
                self.shake = None;
            }
        }

        if let Some(target_pos) = self.target.and_then(locate) {
            self.track(target_pos);
        }
    }

    /// Dead-zone correction, bounds clamp, exponential approach
    fn track(&mut self, target: Vec2) {
        let offset = self.position - target;
        let inside = offset.x >= self.dead_zone_min.x
            && offset.x <= self.dead_zone_max.x
            && offset.y >= self.dead_zone_min.y
            && offset.y <= self.dead_zone_max.y;

        let desired = if inside {
            self.position
        } else {
            let (min, max) = (self.dead_zone_min, self.dead_zone_max);
            Vec2::new(
                Self::edge_axis(self.position.x, target.x, offset.x, min.x, max.x),
                Self::edge_axis(self.position.y, target.y, offset.y, min.y, max.y),
            )
        };

        self.desired = self.bounds.clamp(desired);
        self.position = Vec2::new(
            approach(self.position.x, self.desired.x, self.follow_speed),
            approach(self.position.y, self.desired.y, self.follow_speed),
        );
    }

    /// Pull one axis back to the nearest dead-zone edge
    fn edge_axis(current: f32, target: f32, offset: f32, min: f32, max: f32) -> f32 {
        if offset < min {
            target + min
        } else if offset > max {
            target + max
        } else {
            current
        }
    }

    fn tick_focus(&mut self) {
        match &mut self.focus {
            Focus::Idle => {}
            Focus::Approach {
                pan,
                zoom,
                saved_target,
            } => {
                self.position = pan.advance();
                self.desired = self.position;
                self.zoom = zoom.advance();
                if pan.is_done() && zoom.is_done() {
                    let saved_target = *saved_target;
                    self.focus = Focus::Hold {
                        ticks_left: secs_to_ticks(FOCUS_HOLD_SECS),
                        saved_target,
                    };
                }
            }
            Focus::Hold {
                ticks_left,
                saved_target,
            } => {
                *ticks_left = ticks_left.saturating_sub(1);
                if *ticks_left == 0 {
                    self.target = *saved_target;
                    self.focus = Focus::Idle;
                    self.zoom_to(1.0, ZOOM_RESTORE_SECS);
                }
            }
        }
    }

    /// Start a horizontal shake for `secs`
    pub fn shake(&mut self, intensity: f32, secs: f32) {
        self.shake = Some(Shake {
            intensity,
            remaining_ticks: secs_to_ticks(secs),
        });
    }

    pub fn zoom_to(&mut self, scale: f32, secs: f32) {
        self.zoom_tween = Some(Tween::new(self.zoom, scale, secs));
    }

    /// Detach from the target, frame `size` around `center`, hold, then return
    pub fn focus_on_area(&mut self, center: Vec2, size: Vec2, secs: f32) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let scale = (VIEWPORT_WIDTH / size.x).min(VIEWPORT_HEIGHT / size.y) * FOCUS_PADDING;
        let saved_target = match self.focus {
            Focus::Approach { saved_target, .. } | Focus::Hold { saved_target, .. } => saved_target,
            Focus::Idle => self.target,
        };

        self.target = None;
        self.zoom_tween = None;
        self.focus = Focus::Approach {
            pan: Tween::new(self.position, center, secs),
            zoom: Tween::new(self.zoom, scale, secs),
            saved_target,
        };
    }

    /// Position to render from, including shake when enabled
    pub fn render_position(&self, shake_enabled: bool) -> Vec2 {
        match self.shake {
            Some(shake) if shake_enabled && shake.intensity > 0.0 => {
                let mut rng = Pcg32::seed_from_u64(self.shake_seed.wrapping_add(self.ticks));
                let dx = rng.random_range(-shake.intensity..=shake.intensity);
                self.position + Vec2::new(dx, 0.0)
            }
            _ => self.position,
        }
    }

    /// Drop transient effects (restart)
    pub fn reset_effects(&mut self) {
        if let Focus::Approach { saved_target, .. } | Focus::Hold { saved_target, .. } = self.focus {
            self.target = saved_target;
        }
        self.focus = Focus::Idle;
        self.shake = None;
        self.zoom_tween = None;
        self.zoom = 1.0;
    }
}
