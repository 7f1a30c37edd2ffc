//! End-to-end gameplay scenarios driven through `tick` and the reference world

use glam::Vec2;

use star_dash::{Tuning, secs_to_ticks};
use star_dash::consts::*;
use star_dash::sim::category::PLAYER_CONTACT_MASK;
use star_dash::sim::level::{CollectibleSpawn, EnemySpawn, PlatformSpawn, Solid, SolidKind};
use star_dash::sim::{
    ArcadeWorld, Category, CollectibleKind, EnemyType, GameEvent, GamePhase, GameState,
    InputBuffer, LevelData, PhysicsWorld, ShellState, TickInput, level_one, tick,
};

/// Long flat ground with its top at y=0, stage from -1000 to 4500
fn flat_level(enemies: Vec<EnemySpawn>) -> LevelData {
    LevelData {
        name: "flat".to_string(),
        solids: vec![Solid {
            kind: SolidKind::Ground,
            center: Vec2::new(2000.0, -16.0),
            size: Vec2::new(6000.0, 32.0),
        }],
        platforms: Vec::new(),
        enemies,
        collectibles: Vec::new(),
        player_start: Vec2::new(0.0, 28.0),
        stage_start_x: -1000.0,
        stage_end_x: 4500.0,
        camera_bounds: Default::default(),
    }
}

fn start(level: LevelData) -> (GameState, ArcadeWorld) {
    let mut world = ArcadeWorld::new();
    let state = GameState::new(level, Tuning::default(), &mut world, 7).unwrap();
    (state, world)
}

fn idle(state: &mut GameState, world: &mut ArcadeWorld, ticks: u32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        tick(state, world, &TickInput::default(), SIM_DT);
        events.extend(state.drain_events());
    }
    events
}

/// Run `ticks` ticks of `input`, collecting events
fn run(
    state: &mut GameState,
    world: &mut ArcadeWorld,
    input: &mut InputBuffer,
    ticks: u32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        tick(state, world, &input.take(), SIM_DT);
        events.extend(state.drain_events());
    }
    events
}

fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
    events.iter().filter(|e| **e == wanted).count()
}

/// Put the player at `pos`, at rest
fn place_player(state: &mut GameState, pos: Vec2) {
    state.player.body.pos = pos;
    state.player.body.vel = Vec2::ZERO;
}

#[test]
fn three_side_hits_end_the_game() {
    let bug = EnemySpawn {
        kind: EnemyType::Bug,
        pos: Vec2::new(3000.0, 16.0),
    };
    let (mut state, mut world) = start(flat_level(vec![bug]));
    idle(&mut state, &mut world, 10);

    let mut events = Vec::new();
    for round in 0..3 {
        // Walk the bug into the player's side
        let player = state.player.body.pos;
        state.enemies[0].body.pos = Vec2::new(player.x + 30.0, 16.0);
        events.extend(idle(&mut state, &mut world, 1));
        assert_eq!(state.session.lives, STARTING_LIVES - 1 - round);

        // Send it away and wait out the invincibility window
        state.enemies[0].body.pos = Vec2::new(3000.0, 16.0);
        events.extend(idle(&mut state, &mut world, 400));
    }

    assert_eq!(state.session.lives, 0);
    assert_eq!(state.session.phase, GamePhase::GameOver);
    assert_eq!(count(&events, GameEvent::PlayerHurt), 3);
    assert_eq!(count(&events, GameEvent::GameOver), 1);

    // Frozen afterwards
    let ticks = state.time_ticks;
    idle(&mut state, &mut world, 60);
    assert_eq!(state.time_ticks, ticks);
    assert_eq!(state.session.lives, 0);
}

#[test]
fn invincibility_drops_enemy_contacts_until_expiry() {
    let bug = EnemySpawn {
        kind: EnemyType::Bug,
        pos: Vec2::new(3000.0, 16.0),
    };
    let (mut state, mut world) = start(flat_level(vec![bug]));
    idle(&mut state, &mut world, 10);
    let player_id = state.player.body.id;

    let player = state.player.body.pos;
    state.enemies[0].body.pos = Vec2::new(player.x + 30.0, 16.0);
    idle(&mut state, &mut world, 1);
    state.enemies[0].body.pos = Vec2::new(3000.0, 16.0);

    assert!(state.player.is_invincible);
    idle(&mut state, &mut world, 1);
    let mask = world.contact_mask(player_id).unwrap();
    assert!(!mask.intersects(Category::ENEMY));

    idle(&mut state, &mut world, secs_to_ticks(INVINCIBILITY_SECS));
    assert!(!state.player.is_invincible);
    assert_eq!(state.player.body.contact_mask, PLAYER_CONTACT_MASK);
    assert_eq!(world.contact_mask(player_id), Some(PLAYER_CONTACT_MASK));
}

#[test]
fn koopa_shell_kick_then_self_destruct() {
    let koopa = EnemySpawn {
        kind: EnemyType::Koopa,
        pos: Vec2::new(200.0, 16.0),
    };
    let (mut state, mut world) = start(flat_level(vec![koopa]));
    let koopa_id = state.enemies[0].body.id;

    // Drop onto it from above
    place_player(&mut state, Vec2::new(200.0, 50.0));
    let events = idle(&mut state, &mut world, 1);
    assert!(events.contains(&GameEvent::EnemyShelled { id: koopa_id }));
    assert!(state.enemies[0].in_shell());
    assert_eq!(state.session.lives, STARTING_LIVES);

    // Resting shell does not move
    place_player(&mut state, Vec2::new(-500.0, 28.0));
    let rest_x = state.enemies[0].body.pos.x;
    idle(&mut state, &mut world, 70);
    assert_eq!(state.enemies[0].body.pos.x, rest_x);
    assert!(state.enemies[0].is_kickable());

    // Side contact from the left kicks it right
    place_player(&mut state, Vec2::new(rest_x - 35.0, 28.0));
    let events = idle(&mut state, &mut world, 1);
    assert!(events.contains(&GameEvent::ShellKicked { id: koopa_id }));
    assert!(matches!(
        state.enemies[0].shell(),
        Some(ShellState::Sliding { .. })
    ));
    assert_eq!(state.enemies[0].body.vel.x, SHELL_SPEED);
    assert_eq!(state.session.lives, STARTING_LIVES);

    // Still sliding well before the fuse runs out
    place_player(&mut state, Vec2::new(-500.0, 28.0));
    let mut events = idle(&mut state, &mut world, 1000);
    assert!(state.enemies[0].is_sliding_shell());
    assert!(state.enemies[0].body.pos.x > rest_x + 1000.0);

    let score = state.session.score;
    events.extend(idle(&mut state, &mut world, 300));
    assert_eq!(count(&events, GameEvent::EnemyKilled { id: koopa_id }), 1);
    assert_eq!(state.session.score, score + KILL_BONUS);
    assert!(state.enemies.is_empty());
    assert!(!world.contains(koopa_id));
}

#[test]
fn win_fires_once_while_waiting_for_continue() {
    let (mut state, mut world) = start(flat_level(Vec::new()));
    place_player(&mut state, Vec2::new(4490.0, 28.0));

    let mut input = InputBuffer::new();
    input.set_intent(false, true);
    let mut events = Vec::new();
    for _ in 0..30 {
        tick(&mut state, &mut world, &input.take(), SIM_DT);
        events.extend(state.drain_events());
    }
    assert!(state.session.is_won());

    // Position oscillating across the boundary changes nothing
    for x in [4499.0, 4510.0, 4480.0, 4520.0] {
        place_player(&mut state, Vec2::new(x, 28.0));
        tick(&mut state, &mut world, &input.take(), SIM_DT);
        events.extend(state.drain_events());
    }
    assert_eq!(count(&events, GameEvent::StageWon { stage: 1 }), 1);

    input.continue_pressed();
    tick(&mut state, &mut world, &input.take(), SIM_DT);
    assert!(
        state
            .drain_events()
            .contains(&GameEvent::StageStarted { stage: 2 })
    );
    assert_eq!(state.session.phase, GamePhase::Playing);
    assert_eq!(state.player.body.pos.x, state.level.stage_start_x);
}

#[test]
fn jump_clears_ground_until_landing() {
    let (mut state, mut world) = start(flat_level(Vec::new()));
    place_player(&mut state, Vec2::new(0.0, 40.0));
    idle(&mut state, &mut world, 30);
    assert!(state.player.on_ground);

    let mut input = InputBuffer::new();
    input.jump_pressed();
    tick(&mut state, &mut world, &input.take(), SIM_DT);
    assert!(!state.player.on_ground);

    let mut landed = false;
    for _ in 0..240 {
        tick(&mut state, &mut world, &input.take(), SIM_DT);
        let events = state.drain_events();
        if events.contains(&GameEvent::Landed) {
            landed = true;
            break;
        }
        assert!(!state.player.on_ground, "grounded without a ground contact");
    }
    assert!(landed);
    assert!(state.player.on_ground);
}

#[test]
fn restart_reinstalls_level_one() {
    let mut fresh_world = ArcadeWorld::new();
    let fresh = GameState::new(level_one(), Tuning::default(), &mut fresh_world, 1).unwrap();

    let mut world = ArcadeWorld::new();
    let mut state = GameState::new(level_one(), Tuning::default(), &mut world, 1).unwrap();
    let mut input = InputBuffer::new();
    input.set_intent(false, true);
    for i in 0..600 {
        if i % 90 == 0 {
            input.jump_released();
            input.jump_pressed();
        }
        tick(&mut state, &mut world, &input.take(), SIM_DT);
    }
    state.session.score += 1234;

    if !state.session.is_game_over() {
        input.pause_pressed();
        tick(&mut state, &mut world, &input.take(), SIM_DT);
    }
    input.reset();
    input.restart_pressed();
    tick(&mut state, &mut world, &input.take(), SIM_DT);

    assert_eq!(state.session, fresh.session);
    assert_eq!(state.player.body.pos, state.level.player_start);
    assert!(!state.player.is_super);
    assert!(!state.player.is_invincible);
    assert_eq!(state.camera.position, fresh.camera.position);

    let spawns = |s: &GameState| -> Vec<(EnemyType, Vec2)> {
        s.enemies
            .iter()
            .map(|e| (e.kind.enemy_type(), e.body.pos))
            .collect()
    };
    assert_eq!(spawns(&state), spawns(&fresh));
    assert_eq!(state.collectibles.len(), fresh.collectibles.len());
    assert_eq!(world.body_count(), fresh_world.body_count());
}

#[test]
fn fall_into_pit_costs_a_life_and_respawns() {
    let mut level = flat_level(Vec::new());
    // Gap from x=100 to x=400
    level.solids = vec![
        Solid {
            kind: SolidKind::Ground,
            center: Vec2::new(-450.0, -16.0),
            size: Vec2::new(1100.0, 32.0),
        },
        Solid {
            kind: SolidKind::Ground,
            center: Vec2::new(2950.0, -16.0),
            size: Vec2::new(5100.0, 32.0),
        },
    ];
    let (mut state, mut world) = start(level);
    place_player(&mut state, Vec2::new(250.0, 28.0));

    let events = idle(&mut state, &mut world, 240);
    assert_eq!(count(&events, GameEvent::LifeLost), 1);
    assert_eq!(count(&events, GameEvent::Respawned), 1);
    assert_eq!(state.session.lives, STARTING_LIVES - 1);
    assert_eq!(state.session.phase, GamePhase::Playing);
}

#[test]
fn restart_on_the_same_ground_can_jump_again() {
    let (mut state, mut world) = start(flat_level(Vec::new()));
    idle(&mut state, &mut world, 60);
    assert!(state.player.on_ground);

    let mut input = InputBuffer::new();
    input.set_intent(false, true);
    run(&mut state, &mut world, &mut input, 60);
    assert!(state.player.body.pos.x > 50.0);

    input.reset();
    input.pause_pressed();
    run(&mut state, &mut world, &mut input, 1);
    input.restart_pressed();
    run(&mut state, &mut world, &mut input, 1);
    assert_eq!(state.player.body.pos, state.level.player_start);

    let events = idle(&mut state, &mut world, 120);
    assert_eq!(count(&events, GameEvent::Landed), 1);
    assert!(state.player.on_ground);

    input.jump_pressed();
    let events = run(&mut state, &mut world, &mut input, 1);
    assert!(events.contains(&GameEvent::Jumped));
    assert!(state.player.body.vel.y > 0.0);
}

#[test]
fn power_up_and_damage_rebuild_the_player_body() {
    let bug = EnemySpawn {
        kind: EnemyType::Bug,
        pos: Vec2::new(3000.0, 16.0),
    };
    let mut level = flat_level(vec![bug]);
    level.collectibles = vec![CollectibleSpawn {
        kind: CollectibleKind::Mushroom,
        pos: Vec2::new(0.0, 12.0),
    }];
    let (mut state, mut world) = start(level);
    let player_id = state.player.body.id;
    let feet = state.player.body.bottom();
    assert_eq!(world.body_size(player_id), Some(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)));

    // Collected on the first step, collider rebuilt on the next push
    let events = idle(&mut state, &mut world, 2);
    assert!(events.contains(&GameEvent::PoweredUp));
    assert!(state.player.is_super);
    assert_eq!(world.body_size(player_id), Some(Vec2::new(PLAYER_WIDTH, PLAYER_SUPER_HEIGHT)));
    let (pos, _) = world.body_state(player_id).unwrap();
    assert!((pos.y - PLAYER_SUPER_HEIGHT / 2.0 - feet).abs() < 0.01);

    // Side hit demotes back to the base collider
    let player = state.player.body.pos;
    state.enemies[0].body.pos = Vec2::new(player.x + 30.0, 16.0);
    let events = idle(&mut state, &mut world, 1);
    assert!(events.contains(&GameEvent::PlayerDemoted));
    assert_eq!(state.session.lives, STARTING_LIVES);
    state.enemies[0].body.pos = Vec2::new(3000.0, 16.0);

    idle(&mut state, &mut world, 1);
    assert!(!state.player.is_super);
    assert_eq!(world.body_size(player_id), Some(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)));
    let (pos, _) = world.body_state(player_id).unwrap();
    assert!((pos.y - PLAYER_HEIGHT / 2.0 - feet).abs() < 0.01);
    assert!((state.player.body.bottom() - feet).abs() < 0.01);
}

#[test]
fn lift_carries_the_player_and_keeps_them_grounded() {
    let mut level = flat_level(Vec::new());
    level.platforms = vec![PlatformSpawn {
        center: Vec2::new(300.0, 100.0),
        size: Vec2::new(96.0, 16.0),
        travel: Vec2::new(0.0, 96.0),
        leg_secs: 1.0,
    }];
    let (mut state, mut world) = start(level);
    let lift = state.platforms[0].id;
    place_player(&mut state, Vec2::new(300.0, 108.0 + PLAYER_HEIGHT / 2.0));

    // Up one leg, then back down one leg
    let mut events = Vec::new();
    for _ in 0..240 {
        events.extend(idle(&mut state, &mut world, 1));
        let top = state.ground_top(lift).unwrap();
        assert!((state.player.body.bottom() - top).abs() < 0.01);
        assert!(state.player.on_ground);
    }
    assert_eq!(count(&events, GameEvent::Landed), 1);
    assert!((state.platforms[0].pos.y - 100.0).abs() < 0.01);

    // Jump off at the top of the path
    idle(&mut state, &mut world, 120);
    assert!((state.platforms[0].pos.y - 196.0).abs() < 0.01);
    let mut input = InputBuffer::new();
    input.jump_pressed();
    let events = run(&mut state, &mut world, &mut input, 1);
    assert!(events.contains(&GameEvent::Jumped));
}

#[test]
fn head_bump_under_a_platform_gives_no_extra_jump() {
    let mut level = flat_level(Vec::new());
    // Low ceiling slab: player hits its underside while jumping
    level.solids.push(Solid {
        kind: SolidKind::Ground,
        center: Vec2::new(0.0, 108.0),
        size: Vec2::new(200.0, 16.0),
    });
    let (mut state, mut world) = start(level);
    idle(&mut state, &mut world, 10);
    assert!(state.player.on_ground);

    let mut input = InputBuffer::new();
    input.jump_pressed();
    let mut events = run(&mut state, &mut world, &mut input, 1);
    assert!(events.contains(&GameEvent::Jumped));

    // Hold jump: only a fresh landing on the floor may allow another
    input.jump_released();
    input.jump_pressed();
    for _ in 0..240 {
        tick(&mut state, &mut world, &input.peek(), SIM_DT);
        let tick_events = state.drain_events();
        if tick_events.contains(&GameEvent::Landed) {
            events.extend(tick_events);
            break;
        }
        assert!(!tick_events.contains(&GameEvent::Jumped), "jumped off a ceiling");
        events.extend(tick_events);
    }
    assert_eq!(count(&events, GameEvent::Jumped), 1);
    assert_eq!(count(&events, GameEvent::Landed), 1);
    assert!(state.player.body.bottom().abs() < 0.01);
}

#[test]
fn mushroom_that_walks_off_the_world_is_removed() {
    let mut level = flat_level(Vec::new());
    level.collectibles = vec![CollectibleSpawn {
        kind: CollectibleKind::Mushroom,
        pos: Vec2::new(4980.0, 12.0),
    }];
    let (mut state, mut world) = start(level);
    let id = state.collectibles[0].body.id;

    idle(&mut state, &mut world, 60);
    assert_eq!(state.collectibles.len(), 1);

    idle(&mut state, &mut world, 400);
    assert!(state.collectibles.is_empty());
    assert!(!world.contains(id));
    assert_eq!(world.query_point(Vec2::new(5100.0, -600.0)), Category::NONE);
}
