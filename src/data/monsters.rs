use std::fmt;

use serde::{Deserialize, Serialize};

use crate::map::WorldPoint;

pub const BASE_HEALTH: i32 = 50;
pub const HEALTH_PER_FLOOR: i32 = 10;
pub const BASE_DAMAGE: i32 = 10;
pub const DAMAGE_PER_FLOOR: i32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterKind {
    Goblin,
    Orc,
    Skeleton,
}

pub const MONSTER_KINDS: [MonsterKind; 3] =
    [MonsterKind::Goblin, MonsterKind::Orc, MonsterKind::Skeleton];

impl MonsterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonsterKind::Goblin => "goblin",
            MonsterKind::Orc => "orc",
            MonsterKind::Skeleton => "skeleton",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            MonsterKind::Goblin => 'g',
            MonsterKind::Orc => 'o',
            MonsterKind::Skeleton => 's',
        }
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monster-{}", self.0)
    }
}

/// Floor-scaled stat line shared by every kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MonsterStats {
    pub health: i32,
    pub damage: i32,
}

impl MonsterStats {
    pub fn for_floor(floor: u32) -> Self {
        let floor = floor as i32;
        Self {
            health: BASE_HEALTH + HEALTH_PER_FLOOR * floor,
            damage: BASE_DAMAGE + DAMAGE_PER_FLOOR * floor,
        }
    }
}

/// Value view of a monster, as produced by the spawner and as read back from
/// the floor's entity world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub position: WorldPoint,
    pub health: i32,
    pub damage: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_scale_linearly_with_floor() {
        assert_eq!(
            MonsterStats::for_floor(1),
            MonsterStats {
                health: 60,
                damage: 12
            }
        );
        assert_eq!(
            MonsterStats::for_floor(4),
            MonsterStats {
                health: 90,
                damage: 18
            }
        );
    }

    #[test]
    fn ids_and_kinds_render_lowercase() {
        assert_eq!(MonsterId(3).to_string(), "monster-3");
        assert_eq!(MonsterKind::Skeleton.to_string(), "skeleton");
    }
}
