//! Level data provider
//!
//! An ordered, read-only table of level descriptors. Level numbers are
//! 1-based; lookups clamp into the table.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::ObstacleKind;
use crate::error::ConfigError;

/// Where to put an obstacle; unspecified size/hp use the kind's defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub hp: Option<f32>,
}

impl ObstaclePlacement {
    pub fn new(kind: ObstacleKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(x, y),
            width: None,
            height: None,
            hp: None,
        }
    }
}

/// One level's layout and enemy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub id: u32,
    pub name: String,
    pub enemy_count: u32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub obstacles: Vec<ObstaclePlacement>,
    /// Descriptive difficulty shown to the player (0-1)
    pub enemy_aggression: f32,
    /// Descriptive difficulty shown to the player (0-1)
    pub enemy_accuracy: f32,
    /// Multiplier on enemy movement speed
    pub enemy_speed: f32,
}

/// The ordered level list, never empty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelData>", into = "Vec<LevelData>")]
pub struct LevelTable {
    levels: Vec<LevelData>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<LevelData>> for LevelTable {
    type Error = ConfigError;

    fn try_from(levels: Vec<LevelData>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<LevelTable> for Vec<LevelData> {
    fn from(table: LevelTable) -> Self {
        table.levels
    }
}

impl LevelTable {
    /// Build a table from explicit levels, rejecting unusable entries
    pub fn new(levels: Vec<LevelData>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (i, level) in levels.iter().enumerate() {
            let number = i as u32 + 1;
            if !(level.arena_width > 0.0 && level.arena_height > 0.0) {
                return Err(ConfigError::InvalidLevel {
                    level: number,
                    reason: format!(
                        "arena must have a positive size, got {}x{}",
                        level.arena_width, level.arena_height
                    ),
                });
            }
            if level.enemy_count == 0 {
                return Err(ConfigError::InvalidLevel {
                    level: number,
                    reason: "needs at least one enemy".to_string(),
                });
            }
            if !(level.enemy_speed > 0.0) {
                return Err(ConfigError::InvalidLevel {
                    level: number,
                    reason: format!("enemy speed multiplier {} is not positive", level.enemy_speed),
                });
            }
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of level descriptors
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<LevelData> = serde_json::from_str(json)?;
        let table = Self::new(levels)?;
        log::info!("Loaded {} levels", table.len());
        Ok(table)
    }

    pub fn len(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Descriptor for a 1-based level number (clamped into range)
    pub fn get(&self, level: u32) -> Option<&LevelData> {
        let last = self.levels.len().checked_sub(1)?;
        let idx = (level.max(1) as usize - 1).min(last);
        self.levels.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelData> {
        self.levels.iter()
    }

    /// The shipped campaign: ten levels, larger arenas and more enemies as it
    /// goes
    pub fn builtin() -> Self {
        use ObstacleKind::*;
        let p = ObstaclePlacement::new;

        let levels = vec![
            level(1, "First Frost", 2, 800.0, 600.0, 0.8, vec![
                p(Fort, 300.0, 200.0),
                p(Fort, 500.0, 400.0),
                p(Tree, 400.0, 300.0),
            ]),
            level(2, "Snow Day", 3, 800.0, 600.0, 0.85, vec![
                p(Fort, 280.0, 300.0),
                p(Fort, 520.0, 300.0),
                p(Snowman, 400.0, 150.0),
                p(Snowman, 400.0, 450.0),
            ]),
            level(3, "Fort Knocks", 3, 850.0, 620.0, 0.9, vec![
                p(Fort, 250.0, 160.0),
                p(Fort, 250.0, 460.0),
                p(Fort, 600.0, 310.0),
                p(Rock, 425.0, 310.0),
                p(Tree, 425.0, 120.0),
            ]),
            level(4, "Powder Keg", 4, 850.0, 620.0, 0.95, vec![
                p(Snowman, 300.0, 200.0),
                p(Snowman, 300.0, 420.0),
                p(Fort, 550.0, 200.0),
                p(Fort, 550.0, 420.0),
                p(Tree, 425.0, 310.0),
            ]),
            level(5, "Blizzard Alley", 4, 900.0, 640.0, 1.0, vec![
                ObstaclePlacement {
                    width: Some(120.0),
                    ..p(Fort, 450.0, 320.0)
                },
                p(Rock, 300.0, 150.0),
                p(Rock, 600.0, 490.0),
                p(Tree, 300.0, 490.0),
                p(Tree, 600.0, 150.0),
            ]),
            level(6, "Frozen Flats", 5, 900.0, 640.0, 1.05, vec![
                p(Snowman, 250.0, 320.0),
                p(Snowman, 650.0, 320.0),
                p(Fort, 450.0, 180.0),
                p(Fort, 450.0, 460.0),
            ]),
            level(7, "Icicle Ridge", 5, 950.0, 660.0, 1.1, vec![
                ObstaclePlacement {
                    hp: Some(120.0),
                    ..p(Fort, 320.0, 330.0)
                },
                p(Fort, 630.0, 200.0),
                p(Fort, 630.0, 460.0),
                p(Rock, 475.0, 330.0),
                p(Tree, 320.0, 130.0),
                p(Tree, 320.0, 530.0),
            ]),
            level(8, "Avalanche", 6, 950.0, 660.0, 1.15, vec![
                p(Snowman, 300.0, 200.0),
                p(Snowman, 300.0, 460.0),
                p(Snowman, 650.0, 330.0),
                p(Rock, 475.0, 200.0),
                p(Rock, 475.0, 460.0),
            ]),
            level(9, "Whiteout", 6, 1000.0, 700.0, 1.2, vec![
                p(Fort, 300.0, 175.0),
                p(Fort, 300.0, 525.0),
                p(Fort, 700.0, 175.0),
                p(Fort, 700.0, 525.0),
                p(Tree, 500.0, 350.0),
                p(Snowman, 500.0, 150.0),
                p(Snowman, 500.0, 550.0),
            ]),
            level(10, "Winter King", 7, 1000.0, 700.0, 1.25, vec![
                ObstaclePlacement {
                    width: Some(40.0),
                    height: Some(140.0),
                    ..p(Fort, 500.0, 350.0)
                },
                p(Rock, 300.0, 200.0),
                p(Rock, 300.0, 500.0),
                p(Snowman, 700.0, 200.0),
                p(Snowman, 700.0, 500.0),
                p(Tree, 500.0, 120.0),
                p(Tree, 500.0, 580.0),
            ]),
        ];

        Self { levels }
    }
}

fn level(
    id: u32,
    name: &str,
    enemy_count: u32,
    arena_width: f32,
    arena_height: f32,
    enemy_speed: f32,
    obstacles: Vec<ObstaclePlacement>,
) -> LevelData {
    // Descriptive difficulty follows the same curve the AI uses
    let t = (id.saturating_sub(1) as f32 / 9.0).clamp(0.0, 1.0);
    LevelData {
        id,
        name: name.to_string(),
        enemy_count,
        arena_width,
        arena_height,
        obstacles,
        enemy_aggression: 0.4 + t * 0.5,
        enemy_accuracy: 0.3 + t * 0.6,
        enemy_speed,
    }
}
