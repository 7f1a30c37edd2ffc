//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Per tick:
//! input, player, moving platforms, physics step, contacts, enemy AI and
//! collectibles, camera, then timer, stage bounds, win and fall checks.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::collectible::Collectible;
use super::collision::resolve_contacts;
use super::enemy::{AiEvent, Enemy};
use super::entity::{Bodied, Entity};
use super::physics::PhysicsWorld;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held movement buttons
    pub left: bool,
    pub right: bool,
    /// Jump was pressed since the last tick
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart (from game over or pause)
    pub restart: bool,
    /// Continue to the next stage (after a win)
    pub continue_stage: bool,
}

/// Collects host input between ticks
///
/// Held state (left/right) persists; presses are one-shot and cleared once
/// a tick has consumed them. Jump is edge-triggered: holding the button
/// does not queue another jump until it has been released.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    left: bool,
    right: bool,
    jump_held: bool,
    jump: bool,
    pause: bool,
    restart: bool,
    continue_stage: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_intent(&mut self, left: bool, right: bool) {
        self.left = left;
        self.right = right;
    }

    pub fn jump_pressed(&mut self) {
        if !self.jump_held {
            self.jump = true;
        }
        self.jump_held = true;
    }

    pub fn jump_released(&mut self) {
        self.jump_held = false;
    }

    pub fn pause_pressed(&mut self) {
        self.pause = true;
    }

    pub fn restart_pressed(&mut self) {
        self.restart = true;
    }

    pub fn continue_pressed(&mut self) {
        self.continue_stage = true;
    }

    /// Input for the next tick (one-shots still queued)
    pub fn peek(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
            pause: self.pause,
            restart: self.restart,
            continue_stage: self.continue_stage,
        }
    }

    /// Clear one-shot inputs after a tick consumed them
    pub fn clear_one_shots(&mut self) {
        self.jump = false;
        self.pause = false;
        self.restart = false;
        self.continue_stage = false;
    }

    /// Input for the next tick, clearing the one-shots
    pub fn take(&mut self) -> TickInput {
        let input = self.peek();
        self.clear_one_shots();
        input
    }

    /// Drop everything, held buttons included (restart, stage change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Advance the game state by one fixed timestep
pub fn tick<W: PhysicsWorld>(state: &mut GameState, world: &mut W, input: &TickInput, dt: f32) {
    // Session transitions first
    match state.session.phase {
        GamePhase::GameOver | GamePhase::Paused if input.restart => {
            state.restart(world);
            return;
        }
        GamePhase::Won if input.continue_stage => {
            state.continue_stage(world);
            return;
        }
        _ => {}
    }

    if input.pause {
        match state.session.phase {
            GamePhase::Playing => {
                state.session.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                info!("Game paused");
                return;
            }
            GamePhase::Paused => {
                state.session.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                info!("Game resumed");
            }
            _ => {}
        }
    }

    // Don't tick if paused, won or game over
    if state.session.phase != GamePhase::Playing {
        return;
    }

    let elapsed = state.time_ticks;
    state.time_ticks += 1;

    // Movement intent and jump gate
    state.player.set_intent(input.left, input.right);
    if input.jump && state.player.jump() {
        debug!("Jump at x={:.1}", state.player.body.pos.x);
        state.events.push(GameEvent::Jumped);
    }
    state.player.tick();

    // Physics: push gameplay changes, integrate, pull motion back
    for platform in &mut state.platforms {
        platform.drive(world, elapsed, dt);
    }
    push_bodies(state, world);
    let contacts = world.step(dt);
    pull_bodies(state, world);

    resolve_contacts(state, &contacts);

    tick_enemies(state, world);
    tick_collectibles(state, world);

    let target = state.camera.target.and_then(|id| state.position_of(id));
    state.camera.tick(|_| target);

    if state.session.phase != GamePhase::Playing {
        return;
    }

    if state.session.count_down(dt) {
        info!("Time up");
        state.game_over();
        return;
    }

    // Stage start is a hard wall
    let start_x = state.level.stage_start_x;
    if state.player.body.pos.x < start_x {
        state.player.body.pos.x = start_x;
        state.player.body.vel.x = 0.0;
    }

    // Stage end: Won latches until Continue
    if state.player.body.pos.x >= state.level.stage_end_x {
        let stage = state.session.stage;
        state.session.phase = GamePhase::Won;
        state.events.push(GameEvent::StageWon { stage });
        info!("Player won stage {stage} with score {}", state.session.score);
        return;
    }

    // Fell out of the level
    if state.player.body.pos.y < state.tuning.death_y {
        state.events.push(GameEvent::LifeLost);
        if state.session.lose_life() {
            state.game_over();
        } else {
            state.respawn_player(world);
        }
    }
}

fn push_body<W: PhysicsWorld>(world: &mut W, body: &mut Entity) {
    if body.needs_rebuild {
        world.create_body(body.body_desc());
        body.needs_rebuild = false;
        return;
    }
    world.set_position(body.id, body.pos);
    world.set_velocity(body.id, body.vel);
    world.set_filter(body.id, body.category, body.contact_mask);
}

fn pull_body<W: PhysicsWorld>(world: &W, body: &mut Entity) {
    if let Some((pos, vel)) = world.body_state(body.id) {
        body.pos = pos;
        body.vel = vel;
    }
}

fn push_bodies<W: PhysicsWorld>(state: &mut GameState, world: &mut W) {
    push_body(world, state.player.body_mut());
    for enemy in &mut state.enemies {
        push_body(world, enemy.body_mut());
    }
    for collectible in &mut state.collectibles {
        push_body(world, collectible.body_mut());
    }
}

fn pull_bodies<W: PhysicsWorld>(state: &mut GameState, world: &W) {
    for platform in &mut state.platforms {
        if let Some((pos, _)) = world.body_state(platform.id) {
            platform.pos = pos;
        }
    }
    pull_body(world, state.player.body_mut());
    for enemy in &mut state.enemies {
        pull_body(world, enemy.body_mut());
    }
    for collectible in &mut state.collectibles {
        pull_body(world, collectible.body_mut());
    }
}

fn tick_enemies<W: PhysicsWorld>(state: &mut GameState, world: &mut W) {
    let mut despawned = Vec::new();
    for enemy in &mut state.enemies {
        match enemy.tick(&*world) {
            AiEvent::None | AiEvent::Turned => {}
            AiEvent::SelfDestructed { award } => {
                debug!("Shell {} self-destructed", enemy.body.id.0);
                state.session.add_score(award);
                state.events.push(GameEvent::EnemyKilled { id: enemy.body.id });
            }
            AiEvent::Despawn => despawned.push(enemy.body.id),
        }
    }

    if !despawned.is_empty() {
        for id in &despawned {
            world.remove_body(*id);
        }
        state
            .enemies
            .retain(|e: &Enemy| !despawned.contains(&e.body.id));
    }
}

fn tick_collectibles<W: PhysicsWorld>(state: &mut GameState, world: &mut W) {
    let death_y = state.tuning.death_y;
    let mut despawned = Vec::new();
    for collectible in &mut state.collectibles {
        // Walkers that fell out of the level go too
        if collectible.tick() || collectible.body.pos.y < death_y {
            despawned.push(collectible.body.id);
        }
    }

    if !despawned.is_empty() {
        for id in &despawned {
            world.remove_body(*id);
        }
        state
            .collectibles
            .retain(|c: &Collectible| !despawned.contains(&c.body.id));
    }
}
