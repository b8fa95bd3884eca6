use specs::prelude::*;

use super::{
    components::{CombatStats, MonsterTag, Position},
    resources::{ChaseContext, Strike, StrikeLog},
};
use crate::map::WorldPoint;

/// Greedy approach-and-attack: monsters that can see the player take one
/// small step toward them, and those already within reach strike.
#[derive(Default)]
pub struct ChaseSystem;

impl<'a> System<'a> for ChaseSystem {
    type SystemData = (
        WriteStorage<'a, Position>,
        ReadStorage<'a, MonsterTag>,
        ReadStorage<'a, CombatStats>,
        ReadExpect<'a, ChaseContext>,
        WriteExpect<'a, StrikeLog>,
    );

    fn run(&mut self, (mut positions, tags, stats, chase, mut log): Self::SystemData) {
        for (pos, tag, stat) in (&mut positions, &tags, &stats).join() {
            if stat.health <= 0 {
                continue;
            }

            let distance = pos.point.distance(chase.player);
            if distance >= chase.tuning.sight_radius {
                continue;
            }

            if let Some(next) = step_towards(pos.point, chase.player, &chase) {
                pos.point = next;
            }

            if distance < chase.tuning.strike_radius {
                log.push(Strike {
                    monster: tag.id,
                    damage: stat.damage,
                });
            }
        }
    }
}

/// Steps diagonally when possible, else along whichever single axis is open.
fn step_towards(from: WorldPoint, to: WorldPoint, chase: &ChaseContext) -> Option<WorldPoint> {
    let step = chase.tuning.step;
    let dx = axis_sign(to.x - from.x) * step;
    let dy = axis_sign(to.y - from.y) * step;
    let candidates = [
        from.offset(dx, dy),
        from.offset(dx, 0.0),
        from.offset(0.0, dy),
    ];
    candidates
        .into_iter()
        .filter(|candidate| *candidate != from)
        .find(|candidate| chase.is_walkable(*candidate))
}

fn axis_sign(delta: f32) -> f32 {
    if delta > 0.0 {
        1.0
    } else if delta < 0.0 {
        -1.0
    } else {
        0.0
    }
}
