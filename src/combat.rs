use bracket_random::prelude::RandomNumberGenerator;
use smallvec::SmallVec;

use crate::data::items::{DROP_TABLE, Item, ItemIds, ItemKind, slug};
use crate::data::monsters::MonsterKind;

pub const CRITICAL_CHANCE: f32 = 0.1;
pub const CRITICAL_MULTIPLIER: i32 = 2;
pub const CRITICAL_EFFECT: &str = "Critical Hit!";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackResult {
    pub damage: i32,
    pub critical: bool,
    pub effects: Vec<String>,
}

pub fn resolve_attack(attacker_damage: i32, rng: &mut RandomNumberGenerator) -> AttackResult {
    let critical = rng.range(0.0f32, 1.0) < CRITICAL_CHANCE;
    if critical {
        AttackResult {
            damage: attacker_damage * CRITICAL_MULTIPLIER,
            critical,
            effects: vec![CRITICAL_EFFECT.to_string()],
        }
    } else {
        AttackResult {
            damage: attacker_damage,
            critical,
            effects: Vec::new(),
        }
    }
}

/// At most one item per drop table entry.
pub type Drops = SmallVec<[Item; 4]>;

/// Rolls every drop table entry independently for a defeated `source`.
pub fn roll_drops(source: MonsterKind, rng: &mut RandomNumberGenerator, ids: &mut ItemIds) -> Drops {
    let mut drops = Drops::new();
    for entry in DROP_TABLE.iter() {
        if rng.range(0.0f32, 1.0) >= entry.chance {
            continue;
        }
        let item = Item::new(
            ids.mint(&slug(entry.name)),
            entry.name,
            ItemKind::Material,
            entry.icon,
            format!("Dropped by {source}"),
        );
        tracing::debug!(item = %item.name, %source, "material dropped");
        drops.push(item);
    }
    drops
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn critical_rate_is_about_ten_percent() {
        let mut rng = RandomNumberGenerator::seeded(42);
        let trials = 100_000;
        let crits = (0..trials)
            .filter(|_| resolve_attack(20, &mut rng).critical)
            .count();
        let rate = crits as f64 / trials as f64;
        assert!((0.09..0.11).contains(&rate), "critical rate {rate}");
    }

    #[test]
    fn critical_hits_double_damage_and_carry_a_flag() {
        let mut rng = RandomNumberGenerator::seeded(3);
        let mut seen_crit = false;
        let mut seen_plain = false;
        for _ in 0..1_000 {
            let result = resolve_attack(17, &mut rng);
            if result.critical {
                seen_crit = true;
                assert_eq!(result.damage, 34);
                assert_eq!(result.effects, vec![CRITICAL_EFFECT.to_string()]);
            } else {
                seen_plain = true;
                assert_eq!(result.damage, 17);
                assert!(result.effects.is_empty());
            }
        }
        assert!(seen_crit && seen_plain);
    }

    #[test]
    fn drops_come_only_from_the_table_without_repeats() {
        let mut rng = RandomNumberGenerator::seeded(8);
        let mut ids = ItemIds::default();
        let table: HashSet<&str> = DROP_TABLE.iter().map(|entry| entry.name).collect();
        let mut counts = [0usize; 5];

        for _ in 0..5_000 {
            let drops = roll_drops(MonsterKind::Orc, &mut rng, &mut ids);
            counts[drops.len()] += 1;
            let names: HashSet<&str> = drops.iter().map(|item| item.name.as_str()).collect();
            assert_eq!(names.len(), drops.len());
            for item in &drops {
                assert!(table.contains(item.name.as_str()));
                assert_eq!(item.kind, ItemKind::Material);
                assert_eq!(item.quantity, 1);
                assert_eq!(item.description, "Dropped by orc");
            }
        }

        // P(no drop) = 0.7 * 0.6 * 0.8 * 0.9 ~= 0.30
        assert!(counts[0] > 1_200 && counts[0] < 1_800, "{counts:?}");
    }

    #[test]
    fn drop_ids_are_unique() {
        let mut rng = RandomNumberGenerator::seeded(1);
        let mut ids = ItemIds::default();
        let mut seen = HashSet::new();
        for _ in 0..500 {
            for item in roll_drops(MonsterKind::Goblin, &mut rng, &mut ids) {
                assert!(seen.insert(item.id));
            }
        }
    }
}
