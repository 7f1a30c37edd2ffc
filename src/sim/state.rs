//! Game state and session flow
//!
//! Everything the tick mutates lives here as plain serializable data. The
//! physics world is passed in alongside it, never owned by it.

use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::category::Category;
use super::collectible::{Collectible, CollectibleKind};
use super::enemy::Enemy;
use super::entity::{Aabb, Bodied, EntityId};
use super::level::{LevelData, SolidKind};
use super::physics::{BodyDesc, PhysicsWorld};
use super::platform::MovingPlatform;
use super::player::Player;
use crate::error::LevelError;
use crate::tuning::Tuning;

/// Session flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Playing,
    /// Toggled by pause input; Restart also allowed from here
    Paused,
    /// Stage end reached, waiting for Continue
    Won,
    /// Out of lives or time, waiting for Restart
    GameOver,
}

/// Score, lives, stage and timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub lives: u8,
    pub stage: u32,
    /// Seconds left, never negative
    pub timer: f32,
    pub phase: GamePhase,
    starting_lives: u8,
    timer_budget: f32,
}

impl SessionState {
    pub fn new(starting_lives: u8, timer_budget: f32) -> Self {
        Self {
            score: 0,
            lives: starting_lives,
            stage: 1,
            timer: timer_budget,
            phase: GamePhase::Playing,
            starting_lives,
            timer_budget,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Take a life; returns true if that was the last one
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Count the timer down; returns true when it has run out
    pub fn count_down(&mut self, dt: f32) -> bool {
        self.timer = (self.timer - dt).max(0.0);
        self.timer <= 0.0
    }

    /// Back to the initial values
    pub fn reset(&mut self) {
        *self = Self::new(self.starting_lives, self.timer_budget);
    }
}

/// Things that happened during a tick, drained by the host (audio, HUD, logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    PlayerHurt,
    PlayerDemoted,
    PoweredUp,
    Collected { kind: CollectibleKind },
    EnemyStomped { id: EntityId },
    EnemyKilled { id: EntityId },
    EnemyShelled { id: EntityId },
    ShellKicked { id: EntityId },
    LifeLost,
    Respawned,
    StageWon { stage: u32 },
    StageStarted { stage: u32 },
    GameOver,
    Paused,
    Resumed,
    Restarted,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub level: LevelData,
    pub session: SessionState,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub enemies: Vec<Enemy>,
    /// Sorted by id for deterministic iteration
    pub collectibles: Vec<Collectible>,
    pub platforms: Vec<MovingPlatform>,
    /// Installed static solids (ground tops for landing checks)
    solids: Vec<(EntityId, Aabb)>,
    pub camera: Camera,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Validate the level and install it into `world`
    pub fn new<W: PhysicsWorld>(
        level: LevelData,
        tuning: Tuning,
        world: &mut W,
        seed: u64,
    ) -> Result<Self, LevelError> {
        level.validate()?;

        let mut next_id = 1;
        let player_id = EntityId(next_id);
        next_id += 1;

        let player = Player::new(player_id, level.player_start, &tuning);
        let mut camera = Camera::new(
            level.player_start,
            level.camera_bounds,
            tuning.follow_speed,
            tuning.dead_zone,
        )
        .with_shake_seed(seed);
        camera.follow(player_id);
        camera.snap_to(level.player_start);

        let mut state = Self {
            session: SessionState::new(tuning.starting_lives, tuning.timer_budget_secs),
            tuning,
            level,
            player,
            enemies: Vec::new(),
            collectibles: Vec::new(),
            platforms: Vec::new(),
            solids: Vec::new(),
            camera,
            time_ticks: 0,
            events: Vec::new(),
            next_id,
        };

        world.set_gravity(Vec2::new(0.0, state.tuning.gravity));
        state.install_solids(world);
        state.install_platforms(world);
        world.create_body(state.player.body.body_desc());
        state.spawn_entities(world);

        info!(
            "Installed level {}: {} solids, {} platforms, {} enemies, {} collectibles",
            state.level.name,
            state.level.solids.len(),
            state.platforms.len(),
            state.enemies.len(),
            state.collectibles.len()
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn install_solids<W: PhysicsWorld>(&mut self, world: &mut W) {
        let solids = self.level.solids.clone();
        for solid in solids {
            let category = match solid.kind {
                SolidKind::Ground => Category::GROUND,
                SolidKind::Wall => Category::WALL,
            };
            let id = self.next_entity_id();
            world.create_body(BodyDesc {
                id,
                pos: solid.center,
                vel: Vec2::ZERO,
                size: solid.size,
                is_dynamic: false,
                category,
                collision_mask: Category::NONE,
                contact_mask: Category::NONE,
            });
            self.solids.push((id, Aabb::from_center(solid.center, solid.size)));
        }
    }

    fn install_platforms<W: PhysicsWorld>(&mut self, world: &mut W) {
        let spawns = self.level.platforms.clone();
        for spawn in spawns {
            let id = self.next_entity_id();
            let platform = MovingPlatform::new(id, &spawn);
            world.create_body(platform.body_desc());
            self.platforms.push(platform);
        }
    }

    /// Spawn the level's enemies and collectibles
    fn spawn_entities<W: PhysicsWorld>(&mut self, world: &mut W) {
        let enemy_spawns = self.level.enemies.clone();
        for spawn in enemy_spawns {
            let id = self.next_entity_id();
            let enemy = Enemy::new(id, spawn.kind, spawn.pos, &self.tuning);
            world.create_body(enemy.body.body_desc());
            self.enemies.push(enemy);
        }

        let collectible_spawns = self.level.collectibles.clone();
        for spawn in collectible_spawns {
            let id = self.next_entity_id();
            let collectible = Collectible::new(id, spawn.kind, spawn.pos, &self.tuning);
            world.create_body(collectible.body.body_desc());
            self.collectibles.push(collectible);
        }
    }

    /// Remove every enemy and collectible, bodies included
    fn clear_entities<W: PhysicsWorld>(&mut self, world: &mut W) {
        for enemy in self.enemies.drain(..) {
            world.remove_body(enemy.body.id);
        }
        for collectible in self.collectibles.drain(..) {
            world.remove_body(collectible.body.id);
        }
    }

    /// Full reset: session, player, camera and level entities
    pub fn restart<W: PhysicsWorld>(&mut self, world: &mut W) {
        self.session.reset();
        self.time_ticks = 0;

        self.reinstall_player(world);
        for platform in &mut self.platforms {
            platform.reset(world);
        }

        self.clear_entities(world);
        self.spawn_entities(world);

        self.camera.reset_effects();
        self.camera.follow(self.player.body.id);
        self.camera.snap_to(self.level.player_start);

        self.events.push(GameEvent::Restarted);
        info!("Game restarted");
    }

    /// Won -> Playing on the next stage
    pub fn continue_stage<W: PhysicsWorld>(&mut self, world: &mut W) {
        self.session.stage += 1;
        self.session.phase = GamePhase::Playing;

        let start = Vec2::new(self.level.stage_start_x, self.level.player_start.y);
        self.player.set_intent(false, false);
        self.player.body.pos = start;
        self.player.body.vel = Vec2::ZERO;
        world.set_position(self.player.body.id, start);
        world.set_velocity(self.player.body.id, Vec2::ZERO);
        self.camera.snap_to(start);

        let stage = self.session.stage;
        self.events.push(GameEvent::StageStarted { stage });
        info!("Starting stage {stage}");
    }

    /// Fall-death respawn at the stage start
    pub fn respawn_player<W: PhysicsWorld>(&mut self, world: &mut W) {
        self.reinstall_player(world);
        self.camera.snap_to(self.level.player_start);
        self.events.push(GameEvent::Respawned);
        info!("Player respawned, {} lives left", self.session.lives);
    }

    /// Fresh player body at the level start. Removing the old body first
    /// drops its touching pairs, so the ground contact begins again.
    fn reinstall_player<W: PhysicsWorld>(&mut self, world: &mut W) {
        self.player.respawn(self.level.player_start);
        self.player.body.needs_rebuild = false;
        world.remove_body(self.player.body.id);
        world.create_body(self.player.body.body_desc());
    }

    /// Enter GameOver (idempotent)
    pub fn game_over(&mut self) {
        if self.session.phase == GamePhase::GameOver {
            return;
        }
        self.session.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver);
        info!("Game over with score {}", self.session.score);
    }

    /// Position of an entity by id (camera target lookup)
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        if self.player.body.id == id {
            return Some(self.player.body.pos);
        }
        self.enemies
            .iter()
            .map(Bodied::body)
            .chain(self.collectibles.iter().map(Bodied::body))
            .find(|body| body.id == id)
            .map(|body| body.pos)
    }

    /// Top edge of a ground body, static or moving
    pub fn ground_top(&self, id: EntityId) -> Option<f32> {
        if let Some(platform) = self.platforms.iter().find(|p| p.id == id) {
            return Some(platform.top());
        }
        self.solids
            .iter()
            .find(|(solid, _)| *solid == id)
            .map(|(_, aabb)| aabb.max.y)
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
