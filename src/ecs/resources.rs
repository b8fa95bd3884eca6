use bracket_geometry::prelude::Point;

use crate::config::GameConfig;
use crate::data::monsters::MonsterId;
use crate::map::{Dungeon, WorldPoint};

/// Distances that drive the chase system.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChaseTuning {
    pub sight_radius: f32,
    pub strike_radius: f32,
    pub step: f32,
}

impl Default for ChaseTuning {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

impl From<&GameConfig> for ChaseTuning {
    fn from(config: &GameConfig) -> Self {
        Self {
            sight_radius: config.chase_radius,
            strike_radius: config.strike_radius,
            step: config.chase_step,
        }
    }
}

/// Per-tick snapshot of what monsters need to know about the floor.
#[derive(Clone)]
pub struct ChaseContext {
    pub player: WorldPoint,
    pub tuning: ChaseTuning,
    width: i32,
    height: i32,
    walkable: Vec<bool>,
}

impl ChaseContext {
    pub fn from_dungeon(dungeon: &Dungeon, player: WorldPoint, tuning: ChaseTuning) -> Self {
        let mut walkable = vec![false; (dungeon.width.max(0) * dungeon.height.max(0)) as usize];
        for point in dungeon.floor_cells() {
            walkable[(point.y * dungeon.width + point.x) as usize] = true;
        }

        Self {
            player,
            tuning,
            width: dungeon.width,
            height: dungeon.height,
            walkable,
        }
    }

    fn to_grid(&self, point: WorldPoint) -> Point {
        Point::new(
            (point.x + (self.width / 2) as f32).floor() as i32,
            (point.y + (self.height / 2) as f32).floor() as i32,
        )
    }

    pub fn is_walkable(&self, point: WorldPoint) -> bool {
        let cell = self.to_grid(point);
        if cell.x < 0 || cell.x >= self.width || cell.y < 0 || cell.y >= self.height {
            return false;
        }
        let idx = (cell.y * self.width + cell.x) as usize;
        self.walkable.get(idx).copied().unwrap_or(false)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Strike {
    pub monster: MonsterId,
    pub damage: i32,
}

/// Strikes landed on the player during the last dispatch.
#[derive(Default)]
pub struct StrikeLog {
    pub strikes: Vec<Strike>,
}

impl StrikeLog {
    pub fn push(&mut self, strike: Strike) {
        self.strikes.push(strike);
    }
}
