//! Property tests for the gameplay invariants

use glam::Vec2;
use proptest::prelude::*;

use star_dash::Tuning;
use star_dash::consts::*;
use star_dash::sim::level::{EnemySpawn, Solid, SolidKind};
use star_dash::sim::{
    ArcadeWorld, Camera, CameraBounds, Category, EnemyContact, EnemyType, EntityId, GamePhase,
    GameState, LevelData, Player, SessionState, TickInput, classify_enemy_contact, tick,
};

/// Two ground strips with a pit between them and a few walkers
fn pit_level() -> LevelData {
    let ground = |from: f32, to: f32| Solid {
        kind: SolidKind::Ground,
        center: Vec2::new((from + to) / 2.0, -16.0),
        size: Vec2::new(to - from, 32.0),
    };
    LevelData {
        name: "pit".to_string(),
        solids: vec![ground(-600.0, 300.0), ground(450.0, 2000.0)],
        platforms: Vec::new(),
        enemies: [150.0, 600.0, 900.0]
            .into_iter()
            .zip([EnemyType::Bug, EnemyType::Goomba, EnemyType::Koopa])
            .map(|(x, kind)| EnemySpawn {
                kind,
                pos: Vec2::new(x, 16.0),
            })
            .collect(),
        collectibles: Vec::new(),
        player_start: Vec2::new(0.0, 28.0),
        stage_start_x: -500.0,
        stage_end_x: 1800.0,
        camera_bounds: Default::default(),
    }
}

fn tick_input() -> impl Strategy<Value = TickInput> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::bool::weighted(0.1),
        prop::bool::weighted(0.01),
    )
        .prop_map(|(left, right, jump, pause)| TickInput {
            left,
            right,
            jump,
            pause,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn horizontal_speed_never_exceeds_move_speed(
        vx in -5000.0f32..5000.0,
        left in any::<bool>(),
        right in any::<bool>(),
    ) {
        let tuning = Tuning::default();
        let mut player = Player::new(EntityId(1), Vec2::ZERO, &tuning);
        player.body.vel.x = vx;
        player.set_intent(left, right);
        player.tick();
        prop_assert!(player.body.vel.x.abs() <= tuning.move_speed);
    }

    #[test]
    fn dead_zone_leaves_camera_in_place(
        cam_x in -1000.0f32..1000.0,
        cam_y in -200.0f32..200.0,
        dx in -CAMERA_DEAD_ZONE..=CAMERA_DEAD_ZONE,
        dy in -CAMERA_DEAD_ZONE..=CAMERA_DEAD_ZONE,
    ) {
        let start = Vec2::new(cam_x, cam_y);
        let mut camera = Camera::new(
            start,
            CameraBounds::default(),
            CAMERA_FOLLOW_SPEED,
            CAMERA_DEAD_ZONE,
        );
        camera.follow(EntityId(1));
        let target = start - Vec2::new(dx, dy);
        camera.tick(|_| Some(target));
        prop_assert_eq!(camera.desired, start);
        prop_assert_eq!(camera.position, start);
    }

    #[test]
    fn stomp_needs_strictly_more_than_threshold(
        enemy_y in -500.0f32..500.0,
        above in 0.0f32..100.0,
    ) {
        let player_y = enemy_y + above;
        let kind = classify_enemy_contact(player_y, enemy_y, STOMP_THRESHOLD);
        if player_y > enemy_y + STOMP_THRESHOLD {
            prop_assert_eq!(kind, EnemyContact::Stomp);
        } else {
            prop_assert_eq!(kind, EnemyContact::SideHit);
        }
    }

    #[test]
    fn lives_only_count_down_to_zero(hits in 0usize..10) {
        let mut session = SessionState::new(STARTING_LIVES, TIMER_BUDGET_SECS);
        let mut last_life_at = None;
        for i in 0..hits {
            if session.lose_life() && last_life_at.is_none() {
                last_life_at = Some(i);
            }
        }
        prop_assert_eq!(session.lives as usize, (STARTING_LIVES as usize).saturating_sub(hits));
        if hits >= STARTING_LIVES as usize {
            prop_assert_eq!(last_life_at, Some(STARTING_LIVES as usize - 1));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn session_invariants_hold_under_random_play(
        inputs in prop::collection::vec(tick_input(), 1..600),
    ) {
        let mut world = ArcadeWorld::new();
        let mut state = GameState::new(pit_level(), Tuning::default(), &mut world, 11).unwrap();

        let mut score = 0;
        let mut lives = STARTING_LIVES;
        let mut timer = TIMER_BUDGET_SECS;
        for input in &inputs {
            tick(&mut state, &mut world, input, SIM_DT);
            let session = &state.session;

            prop_assert!(session.score >= score);
            prop_assert!(session.lives <= lives);
            prop_assert!(session.timer <= timer && session.timer >= 0.0);
            if session.phase == GamePhase::Playing {
                prop_assert!(state.player.body.pos.x >= state.level.stage_start_x);
            }
            prop_assert!(state.player.body.vel.x.abs() <= state.tuning.move_speed);
            if state.player.is_invincible {
                prop_assert!(!state.player.body.contact_mask.intersects(Category::ENEMY));
            }
            if session.lives == 0 {
                prop_assert_eq!(session.phase, GamePhase::GameOver);
            }

            score = session.score;
            lives = session.lives;
            timer = session.timer;
        }
    }

    #[test]
    fn restart_always_restores_the_opening_state(
        inputs in prop::collection::vec(tick_input(), 0..400),
        bonus in 0u32..100_000,
    ) {
        let mut world = ArcadeWorld::new();
        let mut state = GameState::new(pit_level(), Tuning::default(), &mut world, 5).unwrap();
        for input in &inputs {
            tick(&mut state, &mut world, input, SIM_DT);
        }
        state.session.add_score(bonus);

        // Restart is honoured from pause or game over
        if state.session.phase != GamePhase::GameOver {
            state.session.phase = GamePhase::Paused;
        }
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &mut world, &restart, SIM_DT);

        prop_assert_eq!(state.session.score, 0);
        prop_assert_eq!(state.session.lives, STARTING_LIVES);
        prop_assert_eq!(state.session.stage, 1);
        prop_assert_eq!(state.session.timer, TIMER_BUDGET_SECS);
        prop_assert_eq!(state.session.phase, GamePhase::Playing);
        prop_assert_eq!(state.player.body.pos, state.level.player_start);
        prop_assert!(!state.player.is_invincible);
        prop_assert_eq!(state.enemies.len(), 3);
    }
}
