//! Level data
//!
//! A level is a declarative list of typed records: static solids, moving
//! platforms, enemy and collectible spawns, the player start and the stage
//! boundaries. The
//! simulation only iterates over these; it never cares how they were authored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::CameraBounds;
use super::collectible::CollectibleKind;
use super::enemy::EnemyType;
use crate::consts::*;
use crate::error::{ConfigError, LevelError};

const TILE: f32 = 32.0;
/// Ground surface row center (bottom of the viewport plus half a tile)
const GROUND_ROW_Y: f32 = -VIEWPORT_HEIGHT / 2.0 + TILE / 2.0;
/// Rows of ground below the surface row
const UNDERGROUND_ROWS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolidKind {
    /// Walkable; also what enemy edge probes look for
    Ground,
    /// Blocks sideways motion
    Wall,
}

/// A static body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub kind: SolidKind,
    pub center: Vec2,
    pub size: Vec2,
}

/// Ground tile that moves out by `travel` over `leg_secs`, then back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpawn {
    pub center: Vec2,
    pub size: Vec2,
    pub travel: Vec2,
    pub leg_secs: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyType,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSpawn {
    pub kind: CollectibleKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub solids: Vec<Solid>,
    #[serde(default)]
    pub platforms: Vec<PlatformSpawn>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleSpawn>,
    pub player_start: Vec2,
    pub stage_start_x: f32,
    pub stage_end_x: f32,
    #[serde(default)]
    pub camera_bounds: CameraBounds,
}

impl LevelData {
    /// Parse and validate a JSON level
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let level: LevelData = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if !self.solids.iter().any(|s| s.kind == SolidKind::Ground) {
            return Err(LevelError::NoGround);
        }
        if !(self.stage_end_x > self.stage_start_x) {
            return Err(LevelError::EmptyStage {
                start_x: self.stage_start_x,
                end_x: self.stage_end_x,
            });
        }
        let x = self.player_start.x;
        if x < self.stage_start_x || x >= self.stage_end_x {
            return Err(LevelError::StartOutsideStage {
                x,
                start_x: self.stage_start_x,
                end_x: self.stage_end_x,
            });
        }
        if let Some((index, solid)) = self
            .solids
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.size.x > 0.0 && s.size.y > 0.0))
        {
            return Err(LevelError::BadBodySize {
                index,
                width: solid.size.x,
                height: solid.size.y,
            });
        }
        if let Some(index) = self.platforms.iter().position(|p| {
            !(p.size.x > 0.0 && p.size.y > 0.0 && p.leg_secs > 0.0)
        }) {
            return Err(LevelError::BadPlatform { index });
        }
        Ok(())
    }
}

/// Horizontal run of tiles `first..=last` merged into one body
fn tile_strip(kind: SolidKind, first: i32, last: i32, center_y: f32, height: f32) -> Solid {
    let left = first as f32 * TILE - TILE / 2.0;
    let right = last as f32 * TILE + TILE / 2.0;
    Solid {
        kind,
        center: Vec2::new((left + right) / 2.0, center_y),
        size: Vec2::new(right - left, height),
    }
}

fn platform(first: i32, last: i32, rows_up: f32) -> Solid {
    tile_strip(
        SolidKind::Ground,
        first,
        last,
        GROUND_ROW_Y + rows_up * TILE,
        TILE / 2.0,
    )
}

fn at_tile(x: i32, rows_up: f32) -> Vec2 {
    Vec2::new(x as f32 * TILE, GROUND_ROW_Y + rows_up * TILE)
}

/// The hand-authored first stage
pub fn level_one() -> LevelData {
    let mut solids = Vec::new();

    // Surface row plus underground rows as a single slab
    let top = GROUND_ROW_Y + TILE / 2.0;
    let bottom = GROUND_ROW_Y - UNDERGROUND_ROWS * TILE - TILE / 2.0;
    solids.push(tile_strip(
        SolidKind::Ground,
        -100,
        200,
        (top + bottom) / 2.0,
        top - bottom,
    ));

    let platforms: [(i32, i32, f32); 20] = [
        // Early
        (5, 8, 3.0),
        (12, 15, 5.0),
        (20, 22, 2.0),
        (25, 28, 6.0),
        (35, 37, 4.0),
        // Mid
        (45, 48, 3.0),
        (55, 58, 5.0),
        (65, 67, 2.0),
        (75, 78, 6.0),
        (85, 87, 4.0),
        // Late
        (95, 98, 3.0),
        (105, 108, 5.0),
        (115, 117, 2.0),
        (125, 128, 6.0),
        (135, 137, 4.0),
        // End area
        (145, 148, 3.0),
        (155, 158, 5.0),
        (165, 167, 2.0),
        (175, 178, 6.0),
        (185, 190, 4.0),
    ];
    solids.extend(platforms.iter().map(|&(a, b, up)| platform(a, b, up)));

    // Single-tile lifts, three rows of travel, slower further in
    let lifts = [(30, 8.0, 2.0), (70, 7.0, 2.5), (110, 8.0, 3.0)];
    let moving_platforms = lifts
        .iter()
        .map(|&(x, up, leg_secs)| PlatformSpawn {
            center: at_tile(x, up),
            size: Vec2::new(TILE, TILE / 2.0),
            travel: Vec2::new(0.0, 3.0 * TILE),
            leg_secs,
        })
        .collect();

    let mut collectibles = Vec::new();
    let star = |pos| CollectibleSpawn {
        kind: CollectibleKind::Star,
        pos,
    };

    let ground_stars = [
        3, 6, 9, 12, 16, 19, 23, 26, 29, 32, 35, 38, 41, 43, 46, 49, 52, 56, 59, 62, 65, 69, 72,
        76, 79, 83, 86, 89, 92, 96, 99, 103, 106, 109, 112, 116, 119, 123, 126, 129, 132, 136, 139,
        143, 146, 149, 152, 156, 159, 163, 166, 169, 172, 176, 179, 183,
    ];
    collectibles.extend(ground_stars.iter().map(|&x| star(at_tile(x, 2.0))));

    let platform_stars = [
        (6, 5),
        (9, 6),
        (13, 7),
        (16, 8),
        (26, 8),
        (29, 7),
        (33, 6),
        (46, 5),
        (49, 6),
        (56, 7),
        (59, 8),
        (63, 7),
        (76, 8),
        (79, 7),
        (83, 6),
        (96, 5),
        (99, 6),
        (106, 7),
        (109, 8),
        (113, 7),
        (126, 8),
        (129, 7),
        (133, 6),
        (146, 5),
        (149, 6),
        (156, 7),
        (159, 8),
        (163, 7),
        (176, 8),
        (179, 7),
    ];
    collectibles.extend(
        platform_stars
            .iter()
            .map(|&(x, up)| star(at_tile(x, up as f32))),
    );

    // Diagonal trails
    collectibles.extend((0..=8).map(|i| star(at_tile(40 + i * 2, (3 + i) as f32))));
    collectibles.extend((0..=6).map(|i| star(at_tile(80 + i * 2, (4 + i) as f32))));

    // Power-ups resting on the surface and on a mid-level platform
    let surface = GROUND_ROW_Y + TILE / 2.0;
    collectibles.push(CollectibleSpawn {
        kind: CollectibleKind::Mushroom,
        pos: Vec2::new(10.0 * TILE, surface + MUSHROOM_SIZE / 2.0),
    });
    collectibles.push(CollectibleSpawn {
        kind: CollectibleKind::Mushroom,
        pos: Vec2::new(90.0 * TILE, surface + MUSHROOM_SIZE / 2.0),
    });
    collectibles.push(CollectibleSpawn {
        kind: CollectibleKind::FireFlower,
        pos: at_tile(57, 5.0) + Vec2::new(0.0, TILE / 4.0 + STAR_SIZE / 2.0),
    });

    let ground_enemies = [
        8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 48, 52, 56, 60, 64, 68, 72, 76, 80, 84, 88, 92, 96,
        100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144, 148, 152, 156, 160, 164, 168,
        172, 176, 180, 184, 188, 192, 196,
    ];
    let platform_enemies = [
        (15, 6),
        (25, 7),
        (35, 8),
        (45, 6),
        (55, 7),
        (65, 8),
        (75, 6),
        (85, 7),
        (95, 8),
        (105, 6),
        (115, 7),
        (125, 8),
        (135, 6),
        (145, 7),
        (155, 8),
        (165, 6),
        (175, 7),
        (185, 8),
        (195, 6),
    ];

    let mut enemies = Vec::new();
    enemies.extend(ground_enemies.iter().enumerate().map(|(i, &x)| EnemySpawn {
        kind: if i % 6 == 5 { EnemyType::Koopa } else { EnemyType::Bug },
        pos: at_tile(x, 1.0),
    }));
    enemies.extend(
        platform_enemies
            .iter()
            .enumerate()
            .map(|(i, &(x, up))| EnemySpawn {
                kind: if i % 5 == 4 { EnemyType::Goomba } else { EnemyType::Bug },
                pos: at_tile(x, up as f32),
            }),
    );

    LevelData {
        name: "1-1".to_string(),
        solids,
        platforms: moving_platforms,
        enemies,
        collectibles,
        player_start: Vec2::new(-400.0, 100.0),
        stage_start_x: -400.0,
        stage_end_x: 6400.0,
        camera_bounds: CameraBounds::default(),
    }
}
