use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;

use crate::config::GameConfig;
use crate::data::monsters::{MONSTER_KINDS, Monster, MonsterId, MonsterKind, MonsterStats};
use crate::map::{Dungeon, WorldPoint};

/// Where monsters may be dropped onto a floor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnArea {
    pub half_extent: f32,
    /// Candidates with both axis deltas to the avoid point within this
    /// distance are rejected.
    pub exclusion: f32,
    pub attempts: usize,
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

impl From<&GameConfig> for SpawnArea {
    fn from(config: &GameConfig) -> Self {
        Self {
            half_extent: config.spawn_half_extent,
            exclusion: config.spawn_exclusion,
            attempts: config.spawn_attempts,
        }
    }
}

impl SpawnArea {
    fn too_close(&self, candidate: WorldPoint, avoid: WorldPoint) -> bool {
        (candidate.x - avoid.x).abs() <= self.exclusion
            && (candidate.y - avoid.y).abs() <= self.exclusion
    }

    fn sample(&self, rng: &mut RandomNumberGenerator) -> WorldPoint {
        if !(self.half_extent > 0.0) {
            return WorldPoint::ORIGIN;
        }
        WorldPoint::new(
            rng.range(-self.half_extent, self.half_extent),
            rng.range(-self.half_extent, self.half_extent),
        )
    }
}

fn room_fallback(dungeon: &Dungeon, rng: &mut RandomNumberGenerator) -> Option<WorldPoint> {
    let room = rng.random_slice_entry(&dungeon.rooms)?;
    let corner = dungeon.grid_to_world(Point::new(room.x, room.y));
    Some(WorldPoint::new(
        corner.x + 1.0 + rng.range(0.0, (room.width - 2) as f32),
        corner.y + 1.0 + rng.range(0.0, (room.height - 2) as f32),
    ))
}

fn place(
    dungeon: &Dungeon,
    avoid: WorldPoint,
    area: &SpawnArea,
    rng: &mut RandomNumberGenerator,
) -> WorldPoint {
    let mut candidate = avoid;
    for _ in 0..area.attempts {
        candidate = area.sample(rng);
        if dungeon.is_floor_at(candidate) && !area.too_close(candidate, avoid) {
            return candidate;
        }
    }

    // The fallback is not re-validated against the grid; with no rooms the
    // last rejected candidate stands.
    room_fallback(dungeon, rng).unwrap_or(candidate)
}

/// Places `count` monsters scaled to `floor`, keeping clear of `avoid`
/// (the player's spawn point) where the layout allows it.
pub fn spawn(
    count: usize,
    floor: u32,
    dungeon: &Dungeon,
    avoid: WorldPoint,
    area: &SpawnArea,
    rng: &mut RandomNumberGenerator,
) -> Vec<Monster> {
    let stats = MonsterStats::for_floor(floor);
    (0..count)
        .map(|i| {
            let position = place(dungeon, avoid, area, rng);
            let kind = rng
                .random_slice_entry(&MONSTER_KINDS)
                .copied()
                .unwrap_or(MonsterKind::Goblin);
            Monster {
                id: MonsterId(i as u32),
                kind,
                position,
                health: stats.health,
                damage: stats.damage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::map::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, Room};

    #[test]
    fn spawns_requested_count_with_floor_stats_and_unique_ids() {
        let mut rng = RandomNumberGenerator::seeded(11);
        let dungeon = Dungeon::generate(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, 3, &mut rng);
        let area = SpawnArea::default();
        let monsters = spawn(8, 3, &dungeon, dungeon.spawn_point(), &area, &mut rng);

        assert_eq!(monsters.len(), 8);
        let ids: HashSet<_> = monsters.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 8);
        for monster in &monsters {
            assert_eq!(monster.health, 80);
            assert_eq!(monster.damage, 16);
            assert!(MONSTER_KINDS.contains(&monster.kind));
        }
    }

    #[test]
    fn monsters_land_on_floor_or_inside_a_room() {
        for seed in 0..50 {
            let mut rng = RandomNumberGenerator::seeded(seed);
            let dungeon = Dungeon::generate(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, 1, &mut rng);
            if dungeon.rooms.is_empty() {
                continue;
            }
            let area = SpawnArea::default();
            let monsters = spawn(5, 1, &dungeon, dungeon.spawn_point(), &area, &mut rng);
            for monster in monsters {
                let cell = dungeon.world_to_grid(monster.position);
                let in_room = dungeon.rooms.iter().any(|room| room.contains(cell));
                assert!(dungeon.is_floor(cell) || in_room, "seed {seed}: {monster:?}");
            }
        }
    }

    #[test]
    fn sampled_positions_respect_the_exclusion_box() {
        // One big room around the origin: random samples almost always land on
        // floor, so every accepted sample must clear the exclusion box.
        let dungeon = Dungeon::from_rooms(20, 20, 1, vec![Room::new(2, 2, 15, 15)]);
        let area = SpawnArea::default();
        let mut rng = RandomNumberGenerator::seeded(5);
        for monster in spawn(40, 1, &dungeon, WorldPoint::ORIGIN, &area, &mut rng) {
            let p = monster.position;
            assert!(p.x.abs() > 2.0 || p.y.abs() > 2.0, "{p:?}");
        }
    }

    #[test]
    fn spawns_even_without_rooms() {
        let dungeon = Dungeon::walled(20, 20, 1);
        let area = SpawnArea::default();
        for seed in 0..20 {
            let mut rng = RandomNumberGenerator::seeded(seed);
            let monsters = spawn(6, 1, &dungeon, WorldPoint::ORIGIN, &area, &mut rng);
            assert_eq!(monsters.len(), 6);
            for monster in monsters {
                let p = monster.position;
                assert!(p.x.abs() <= area.half_extent, "{p:?}");
                assert!(p.y.abs() <= area.half_extent, "{p:?}");
            }
        }
    }

    #[test]
    fn degenerate_spawn_area_does_not_panic() {
        let dungeon = Dungeon::from_rooms(20, 20, 1, vec![Room::new(4, 4, 4, 4)]);
        let area = SpawnArea {
            half_extent: 0.0,
            ..SpawnArea::default()
        };
        let mut rng = RandomNumberGenerator::seeded(2);
        let monsters = spawn(5, 1, &dungeon, WorldPoint::ORIGIN, &area, &mut rng);
        assert_eq!(monsters.len(), 5);
        for monster in monsters {
            let cell = dungeon.world_to_grid(monster.position);
            assert!(dungeon.rooms[0].contains(cell), "{monster:?}");
        }
    }

    #[test]
    fn falls_back_to_a_room_when_sampling_fails() {
        let dungeon = Dungeon::from_rooms(20, 20, 1, vec![Room::new(4, 4, 4, 4)]);
        let area = SpawnArea {
            attempts: 0,
            ..SpawnArea::default()
        };
        let mut rng = RandomNumberGenerator::seeded(9);
        for monster in spawn(10, 1, &dungeon, WorldPoint::ORIGIN, &area, &mut rng) {
            let p = monster.position;
            assert!((-5.0..-3.0).contains(&p.x), "{p:?}");
            assert!((-5.0..-3.0).contains(&p.y), "{p:?}");
        }
    }
}
