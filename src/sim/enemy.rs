//! Enemy AI
//!
//! One struct for every enemy with a tagged [`EnemyKind`] carrying the
//! kind-specific state. Patrolling enemies probe ahead for ground and walls
//! and turn around at edges. Koopas retreat into a shell on the first hit,
//! can be kicked, and self-destruct if a kicked shell is never touched again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::{Category, ENEMY_COLLISION_MASK, ENEMY_CONTACT_MASK, SHELL_CONTACT_MASK};
use super::entity::{Bodied, EffectKind, EndAction, Entity, EntityId, Facing, TimedEffect};
use super::physics::PhysicsWorld;
use crate::consts::*;
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Vertical speed below which an enemy counts as standing on something
const REST_VELOCITY: f32 = 1.0;
/// Gap between the enemy's side and the wall probe
const WALL_PROBE_GAP: f32 = 2.0;

/// Spawnable enemy types (level data)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyType {
    #[default]
    Bug,
    Goomba,
    Koopa,
}

/// Shell lifecycle of a Koopa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellState {
    /// Out of the shell, patrolling
    Walking,
    /// In the shell and still; kickable once `kick_delay_ticks` reaches 0
    Idle { kick_delay_ticks: u32 },
    /// Kicked; self-destructs when `fuse_ticks` runs out
    Sliding { fuse_ticks: u32 },
}

/// Kind-specific enemy data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Bug,
    Goomba,
    Koopa { shell: ShellState, shell_speed: f32 },
}

impl EnemyKind {
    pub fn enemy_type(&self) -> EnemyType {
        match self {
            EnemyKind::Bug => EnemyType::Bug,
            EnemyKind::Goomba => EnemyType::Goomba,
            EnemyKind::Koopa { .. } => EnemyType::Koopa,
        }
    }
}

/// How an enemy was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Player landed on it from above
    Stomp,
    /// Struck by a sliding shell
    Shell,
    /// Player touched its sliding shell again
    Bump,
    /// Sliding shell fuse ran out
    Timeout,
}

/// Result of [`Enemy::take_damage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Already dead
    Ignored,
    /// Koopa retreated into its shell
    Shelled,
    /// Died; `award` goes to the session score
    Killed { award: u32 },
}

/// Enemy lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Active,
    /// Playing the death effect; despawns when it ends
    Dead(TimedEffect),
}

/// Something the game loop needs to act on after an AI tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiEvent {
    None,
    Turned,
    /// Sliding shell fuse expired
    SelfDestructed { award: u32 },
    /// Death effect finished; remove the body
    Despawn,
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Entity,
    pub kind: EnemyKind,
    pub move_speed: f32,
    pub facing: Facing,
    pub state: AiState,
    kill_bonus: u32,
    stomp_bonus: u32,
    probe_ahead: f32,
    probe_drop: f32,
    shell_timeout_secs: f32,
    shell_kick_delay_secs: f32,
}

impl Enemy {
    pub fn new(id: EntityId, enemy_type: EnemyType, pos: Vec2, tuning: &Tuning) -> Self {
        let (kind, move_speed) = match enemy_type {
            EnemyType::Bug => (EnemyKind::Bug, tuning.bug_speed),
            EnemyType::Goomba => (EnemyKind::Goomba, tuning.goomba_speed),
            EnemyType::Koopa => (
                EnemyKind::Koopa {
                    shell: ShellState::Walking,
                    shell_speed: tuning.shell_speed,
                },
                tuning.koopa_speed,
            ),
        };

        let mut body = Entity::new(id, pos, Vec2::splat(ENEMY_SIZE), Category::ENEMY)
            .with_masks(ENEMY_COLLISION_MASK, ENEMY_CONTACT_MASK);
        body.vel.x = move_speed;

        Self {
            body,
            kind,
            move_speed,
            facing: Facing::Right,
            state: AiState::Active,
            kill_bonus: tuning.kill_bonus,
            stomp_bonus: tuning.stomp_bonus,
            probe_ahead: tuning.probe_ahead,
            probe_drop: tuning.probe_drop,
            shell_timeout_secs: tuning.shell_timeout_secs,
            shell_kick_delay_secs: tuning.shell_kick_delay_secs,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.body.alive
    }

    /// -1.0 or 1.0
    pub fn direction(&self) -> f32 {
        self.facing.sign()
    }

    pub fn shell(&self) -> Option<ShellState> {
        match self.kind {
            EnemyKind::Koopa { shell, .. } => Some(shell),
            _ => None,
        }
    }

    pub fn in_shell(&self) -> bool {
        matches!(
            self.shell(),
            Some(ShellState::Idle { .. } | ShellState::Sliding { .. })
        )
    }

    /// Idle shell whose kick delay has passed
    pub fn is_kickable(&self) -> bool {
        matches!(
            self.shell(),
            Some(ShellState::Idle {
                kick_delay_ticks: 0
            })
        )
    }

    pub fn is_sliding_shell(&self) -> bool {
        matches!(self.shell(), Some(ShellState::Sliding { .. }))
    }

    /// Apply a hit. Dead enemies ignore further hits.
    pub fn take_damage(&mut self, hit: Hit) -> HitOutcome {
        if !self.is_alive() {
            return HitOutcome::Ignored;
        }

        if let EnemyKind::Koopa {
            shell: ShellState::Walking,
            ..
        } = self.kind
        {
            self.enter_shell();
            return HitOutcome::Shelled;
        }

        let award = match hit {
            Hit::Stomp => self.stomp_bonus,
            Hit::Shell | Hit::Bump | Hit::Timeout => self.kill_bonus,
        };
        self.die();
        HitOutcome::Killed { award }
    }

    fn enter_shell(&mut self) {
        let kick_delay_ticks = secs_to_ticks(self.shell_kick_delay_secs);
        if let EnemyKind::Koopa { shell, .. } = &mut self.kind {
            *shell = ShellState::Idle { kick_delay_ticks };
        }
        self.body.vel = Vec2::ZERO;
        self.body.contact_mask = SHELL_CONTACT_MASK;
    }

    /// Launch an idle shell. Returns false (no-op) if not an idle shell.
    pub fn kick_shell(&mut self, direction: Facing) -> bool {
        let fuse_ticks = secs_to_ticks(self.shell_timeout_secs);
        let EnemyKind::Koopa { shell, shell_speed } = &mut self.kind else {
            return false;
        };
        if !matches!(shell, ShellState::Idle { .. }) {
            return false;
        }

        *shell = ShellState::Sliding { fuse_ticks };
        self.facing = direction;
        self.body.vel.x = *shell_speed * direction.sign();
        self.body.category = Category::COLLECTIBLE;
        true
    }

    fn die(&mut self) {
        self.body.alive = false;
        self.body.vel = Vec2::ZERO;
        self.body.category = Category::NONE;
        self.body.contact_mask = Category::NONE;
        self.state = AiState::Dead(TimedEffect::new(
            EffectKind::SquashFade,
            DEATH_EFFECT_SECS,
            EndAction::Despawn,
        ));
    }

    /// Advance AI one tick (after physics has moved the body)
    pub fn tick<W: PhysicsWorld>(&mut self, world: &W) -> AiEvent {
        if let AiState::Dead(effect) = &mut self.state {
            self.body.vel.x = 0.0;
            return match effect.advance() {
                Some(EndAction::Despawn) => AiEvent::Despawn,
                None => AiEvent::None,
            };
        }

        match &mut self.kind {
            EnemyKind::Koopa {
                shell: ShellState::Idle { kick_delay_ticks },
                ..
            } => {
                *kick_delay_ticks = kick_delay_ticks.saturating_sub(1);
                self.body.vel.x = 0.0;
                AiEvent::None
            }
            EnemyKind::Koopa {
                shell: ShellState::Sliding { fuse_ticks },
                shell_speed,
            } => {
                let speed = *shell_speed;
                *fuse_ticks = fuse_ticks.saturating_sub(1);
                if *fuse_ticks == 0 {
                    return match self.take_damage(Hit::Timeout) {
                        HitOutcome::Killed { award } => AiEvent::SelfDestructed { award },
                        _ => AiEvent::None,
                    };
                }
                let turned = self.wall_ahead(world);
                if turned {
                    self.facing = self.facing.flipped();
                }
                self.body.vel.x = speed * self.direction();
                if turned { AiEvent::Turned } else { AiEvent::None }
            }
            _ => self.patrol(world),
        }
    }

    fn patrol<W: PhysicsWorld>(&mut self, world: &W) -> AiEvent {
        let mut turned = false;
        if self.body.vel.y.abs() < REST_VELOCITY {
            let dir = self.direction();
            let probe = self.body.pos + Vec2::new(dir * self.probe_ahead, -self.probe_drop);
            let at_edge = !world.query_point(probe).contains(Category::GROUND);
            // A stopped walker was blocked by something solid
            let blocked = self.body.vel.x == 0.0 && self.move_speed > 0.0;

            if at_edge || blocked || self.wall_ahead(world) {
                self.facing = self.facing.flipped();
                turned = true;
            }
        }

        self.body.vel.x = self.move_speed * self.direction();
        if turned { AiEvent::Turned } else { AiEvent::None }
    }

    fn wall_ahead<W: PhysicsWorld>(&self, world: &W) -> bool {
        let reach = self.body.size.x * 0.5 + WALL_PROBE_GAP;
        let probe = self.body.pos + Vec2::new(self.direction() * reach, 0.0);
        world.query_point(probe).contains(Category::WALL)
    }
}

impl Bodied for Enemy {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}
