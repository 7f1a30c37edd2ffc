//! Derived display values
//!
//! The presentation layer reads these; the session state never formats text.

use crate::settings::Settings;
use crate::sim::{GamePhase, Player, SessionState};

/// Hearts shown regardless of remaining lives
pub const HEART_SLOTS: usize = 3;
const HEART_FULL: f32 = 1.0;
const HEART_DIM: f32 = 0.3;

/// Everything the HUD draws this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    /// Six zero-padded digits
    pub score: String,
    /// MM:SS, seconds truncated
    pub timer: String,
    pub hearts: [f32; HEART_SLOTS],
    /// Hidden when the stage label is turned off
    pub stage: Option<String>,
    /// Overlay banner, if any
    pub banner: Option<&'static str>,
}

impl Hud {
    pub fn from_session(session: &SessionState, settings: &Settings) -> Self {
        Self {
            score: format_score(session.score),
            timer: format_timer(session.timer),
            hearts: hearts(session.lives),
            stage: settings
                .show_stage
                .then(|| format!("STAGE {}", session.stage)),
            banner: banner(session.phase),
        }
    }
}

/// Sprite opacity to draw the player with; steady when flashing is off
pub fn player_opacity(player: &Player, settings: &Settings) -> f32 {
    if settings.effective_damage_flash() {
        player.opacity
    } else {
        1.0
    }
}

pub fn format_score(score: u32) -> String {
    format!("{score:06}")
}

pub fn format_timer(secs: f32) -> String {
    let whole = secs.max(0.0) as u32;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Full opacity for remaining lives, dimmed for lost ones
pub fn hearts(lives: u8) -> [f32; HEART_SLOTS] {
    std::array::from_fn(|i| {
        if i < lives as usize {
            HEART_FULL
        } else {
            HEART_DIM
        }
    })
}

fn banner(phase: GamePhase) -> Option<&'static str> {
    match phase {
        GamePhase::Playing => None,
        GamePhase::Paused => Some("PAUSED"),
        GamePhase::Won => Some("YOU WIN!"),
        GamePhase::GameOver => Some("GAME OVER"),
    }
}
