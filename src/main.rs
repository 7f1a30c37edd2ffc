//! Headless Star Dash runner
//!
//! Plays level one with a scripted input track at a simulated 60 Hz frame
//! rate, driving the fixed-step simulation the way a windowed host would.
//!
//! Usage: `star-dash [tuning.json] [settings.json]`

use std::fs;
use std::process::ExitCode;

use star_dash::Settings;
use star_dash::Tuning;
use star_dash::audio::{AudioManager, LogBackend};
use star_dash::consts::{MAX_SUBSTEPS, SIM_DT};
use star_dash::hud::{Hud, player_opacity};
use star_dash::sim::{ArcadeWorld, GameState, InputBuffer, level_one, tick};

/// Host frame time
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many host frames
const MAX_FRAMES: u32 = 60 * 120;
const SEED: u64 = 0x5747_4453;

/// Game instance holding all state
struct Game {
    state: GameState,
    world: ArcadeWorld,
    input: InputBuffer,
    audio: AudioManager<LogBackend>,
    settings: Settings,
    accumulator: f32,
    frame: u32,
}

impl Game {
    fn new(tuning: Tuning, settings: Settings) -> Result<Self, star_dash::LevelError> {
        let mut world = ArcadeWorld::new();
        let state = GameState::new(level_one(), tuning, &mut world, SEED)?;
        let mut audio = AudioManager::new(LogBackend);
        audio.apply_settings(&settings);
        Ok(Self {
            state,
            world,
            input: InputBuffer::new(),
            audio,
            settings,
            accumulator: 0.0,
            frame: 0,
        })
    }

    /// Scripted player: run right, hop every second, continue after a win
    fn script_input(&mut self) {
        self.input.set_intent(false, true);
        match self.frame % 60 {
            0 => self.input.jump_pressed(),
            20 => self.input.jump_released(),
            _ => {}
        }
        if self.state.session.is_won() {
            self.input.continue_pressed();
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // One-shot inputs are cleared once a tick has consumed them
            let input = self.input.take();
            tick(&mut self.state, &mut self.world, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        let events = self.state.drain_events();
        self.audio.handle_events(&events);
        for event in &events {
            log::debug!("frame {}: {event:?}", self.frame);
        }
        self.frame += 1;
    }

    fn log_hud(&self) {
        let hud = Hud::from_session(&self.state.session, &self.settings);
        let cam = self
            .state
            .camera
            .render_position(self.settings.effective_screen_shake());
        log::info!(
            "{}{} | {} | lives {:?} | player alpha {:.2} | camera ({:.0}, {:.0}){}",
            hud.stage.map(|s| format!("{s} | ")).unwrap_or_default(),
            hud.score,
            hud.timer,
            hud.hearts,
            player_opacity(&self.state.player, &self.settings),
            cam.x,
            cam.y,
            hud.banner.map(|b| format!(" | {b}")).unwrap_or_default()
        );
    }
}

/// Read an optional JSON file; a missing or unreadable file falls back to defaults
fn read_config(path: Option<String>) -> Option<String> {
    let path = path?;
    match fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(err) => {
            log::warn!("Could not read {path}: {err}");
            None
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Star Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = read_config(args.next())
        .map(|json| Tuning::from_json_or_default(&json))
        .unwrap_or_default();
    let settings = match read_config(args.next()).map(|json| Settings::from_json(&json)) {
        Some(Ok(settings)) => settings,
        Some(Err(err)) => {
            log::warn!("Invalid settings, using defaults: {err}");
            Settings::default()
        }
        None => Settings::default(),
    };

    let mut game = match Game::new(tuning, settings) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Could not load level: {err}");
            return ExitCode::FAILURE;
        }
    };

    while game.frame < MAX_FRAMES {
        game.script_input();
        game.update(FRAME_DT);

        if game.frame % 60 == 0 {
            game.log_hud();
        }
        // Stop after the first clear has been continued past
        if game.state.session.is_game_over() || game.state.session.stage > 1 {
            break;
        }
    }

    game.log_hud();
    let session = &game.state.session;
    log::info!(
        "Finished after {} ticks: stage {}, score {}, lives {}",
        game.state.time_ticks,
        session.stage,
        session.score,
        session.lives
    );
    ExitCode::SUCCESS
}
