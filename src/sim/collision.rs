//! Contact resolution by category pair
//!
//! Each contact-begin pair from the physics world is dispatched on the union
//! of its two categories, so new entity types plug in by declaring categories
//! and masks only. Handlers re-check liveness because an earlier contact in
//! the same step may already have killed or collected an entity.

use log::debug;

use super::category::Category;
use super::enemy::{Hit, HitOutcome};
use super::entity::{EntityId, Facing};
use super::physics::Contact;
use super::player::DamageOutcome;
use super::state::{GameEvent, GameState};
use crate::consts::*;

const PLAYER_GROUND: Category = Category::PLAYER.union(Category::GROUND);
const PLAYER_ENEMY: Category = Category::PLAYER.union(Category::ENEMY);
const PLAYER_COLLECTIBLE: Category = Category::PLAYER.union(Category::COLLECTIBLE);
const ENEMY_COLLECTIBLE: Category = Category::ENEMY.union(Category::COLLECTIBLE);

/// How a player-enemy contact is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyContact {
    Stomp,
    SideHit,
}

/// Strictly above the enemy by more than the threshold is a stomp
pub fn classify_enemy_contact(player_y: f32, enemy_y: f32, threshold: f32) -> EnemyContact {
    if player_y > enemy_y + threshold {
        EnemyContact::Stomp
    } else {
        EnemyContact::SideHit
    }
}

/// Apply the gameplay effect of every contact, in order
pub fn resolve_contacts(state: &mut GameState, contacts: &[Contact]) {
    for contact in contacts {
        match contact.pair() {
            PLAYER_GROUND => {
                if let Some((_, ground)) = contact.split(Category::PLAYER) {
                    player_ground(state, ground.id);
                }
            }
            PLAYER_ENEMY => {
                if let Some((_, enemy)) = contact.split(Category::PLAYER) {
                    player_enemy(state, enemy.id);
                }
            }
            PLAYER_COLLECTIBLE => {
                if let Some((_, item)) = contact.split(Category::PLAYER) {
                    player_collectible(state, item.id);
                }
            }
            ENEMY_COLLECTIBLE => {
                if let Some((item, enemy)) = contact.split(Category::COLLECTIBLE) {
                    shell_enemy(state, item.id, enemy.id);
                }
            }
            _ => {}
        }
    }
}

fn enemy_index(state: &GameState, id: EntityId) -> Option<usize> {
    state.enemies.binary_search_by_key(&id, |e| e.body.id).ok()
}

fn collectible_index(state: &GameState, id: EntityId) -> Option<usize> {
    state
        .collectibles
        .binary_search_by_key(&id, |c| c.body.id)
        .ok()
}

fn player_ground(state: &mut GameState, ground: EntityId) {
    // Head bumps and side scrapes are not landings
    if let Some(top) = state.ground_top(ground) {
        if state.player.body.bottom() < top - LANDING_TOLERANCE {
            return;
        }
    }
    if !state.player.on_ground {
        state.events.push(GameEvent::Landed);
    }
    state.player.land();
}

fn player_enemy(state: &mut GameState, enemy_id: EntityId) {
    let Some(idx) = enemy_index(state, enemy_id) else {
        return;
    };
    if !state.enemies[idx].is_alive() {
        return;
    }

    let player_y = state.player.body.pos.y;
    let enemy = &mut state.enemies[idx];
    let kind = classify_enemy_contact(player_y, enemy.body.pos.y, state.tuning.stomp_threshold);

    if kind == EnemyContact::Stomp {
        match enemy.take_damage(Hit::Stomp) {
            HitOutcome::Killed { award } => {
                debug!("Stomped enemy {} (+{award})", enemy_id.0);
                state.session.add_score(award);
                state.events.push(GameEvent::EnemyStomped { id: enemy_id });
            }
            HitOutcome::Shelled => {
                debug!("Enemy {} retreated into its shell", enemy_id.0);
                state.events.push(GameEvent::EnemyShelled { id: enemy_id });
            }
            HitOutcome::Ignored => return,
        }
        state.player.body.vel.y = state.tuning.stomp_bounce;
        return;
    }

    // Side contact with a resting shell: kick it once it's ready, otherwise ignore
    if enemy.in_shell() && !enemy.is_sliding_shell() {
        if enemy.is_kickable() {
            let away = Facing::from_sign(enemy.body.pos.x - state.player.body.pos.x);
            if enemy.kick_shell(away) {
                debug!("Kicked shell {} {:?}", enemy_id.0, away);
                state.events.push(GameEvent::ShellKicked { id: enemy_id });
            }
        }
        return;
    }

    hurt_player(state);
}

/// Enemy side hit on the player
fn hurt_player(state: &mut GameState) {
    match state.player.take_damage() {
        DamageOutcome::Ignored => {}
        DamageOutcome::Demoted => {
            debug!("Player demoted");
            state.events.push(GameEvent::PlayerHurt);
            state.events.push(GameEvent::PlayerDemoted);
            state.camera.shake(DAMAGE_SHAKE_INTENSITY, DAMAGE_SHAKE_SECS);
        }
        DamageOutcome::LifeLost => {
            state.events.push(GameEvent::PlayerHurt);
            state.events.push(GameEvent::LifeLost);
            state.camera.shake(DAMAGE_SHAKE_INTENSITY, DAMAGE_SHAKE_SECS);
            if state.session.lose_life() {
                state.game_over();
            }
        }
    }
}

fn player_collectible(state: &mut GameState, id: EntityId) {
    // A sliding shell is categorised as collectible; touching it again destroys it
    if let Some(idx) = enemy_index(state, id) {
        let shell = &mut state.enemies[idx];
        if !shell.is_sliding_shell() {
            return;
        }
        if let HitOutcome::Killed { award } = shell.take_damage(Hit::Bump) {
            debug!("Bumped shell {} (+{award})", id.0);
            state.session.add_score(award);
            state.events.push(GameEvent::EnemyKilled { id });
        }
        return;
    }

    let Some(idx) = collectible_index(state, id) else {
        return;
    };
    let item = &mut state.collectibles[idx];
    let kind = item.kind;
    let Some(reward) = item.collect() else {
        return;
    };

    debug!("Collected {kind:?} (+{})", reward.score);
    state.session.add_score(reward.score);
    state.events.push(GameEvent::Collected { kind });

    if reward.power_up && state.player.power_up() {
        state.events.push(GameEvent::PoweredUp);
    }
    if reward.fire_power && !state.player.has_fire_power {
        state.player.has_fire_power = true;
        state.events.push(GameEvent::PoweredUp);
    }
}

fn shell_enemy(state: &mut GameState, shell_id: EntityId, enemy_id: EntityId) {
    let Some(shell_idx) = enemy_index(state, shell_id) else {
        return;
    };
    if !state.enemies[shell_idx].is_sliding_shell() {
        return;
    }
    let Some(idx) = enemy_index(state, enemy_id) else {
        return;
    };

    match state.enemies[idx].take_damage(Hit::Shell) {
        HitOutcome::Killed { award } => {
            debug!("Shell {} hit enemy {} (+{award})", shell_id.0, enemy_id.0);
            state.session.add_score(award);
            state.events.push(GameEvent::EnemyKilled { id: enemy_id });
        }
        HitOutcome::Shelled => {
            state.events.push(GameEvent::EnemyShelled { id: enemy_id });
        }
        HitOutcome::Ignored => {}
    }
}
