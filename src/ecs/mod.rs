pub mod components;
pub mod resources;
pub mod systems;

use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::data::monsters::{Monster, MonsterId};
use crate::map::WorldPoint;

use self::{
    components::{CombatStats, MonsterTag, Position},
    resources::{ChaseContext, Strike, StrikeLog},
    systems::ChaseSystem,
};

/// Outcome of routing damage to a monster.
#[derive(Clone, Debug, PartialEq)]
pub enum DamageOutcome {
    Wounded { remaining: i32 },
    /// The monster reached zero health and has been removed from the floor.
    Slain(Monster),
}

/// The authoritative monster collection of one floor.
pub struct EcsWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
}

impl EcsWorld {
    pub fn new() -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(StrikeLog::default());
        let dispatcher = DispatcherBuilder::new()
            .with(ChaseSystem, "chase", &[])
            .build();

        Self {
            specs_world,
            dispatcher,
        }
    }

    pub fn with_monsters(monsters: impl IntoIterator<Item = Monster>) -> Self {
        let mut world = Self::new();
        for monster in monsters {
            world.spawn_monster(&monster);
        }
        world
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<MonsterTag>();
        world.register::<CombatStats>();
    }

    pub fn spawn_monster(&mut self, monster: &Monster) -> Entity {
        self.specs_world
            .create_entity()
            .with(Position {
                point: monster.position,
            })
            .with(MonsterTag {
                id: monster.id,
                kind: monster.kind,
            })
            .with(CombatStats {
                health: monster.health,
                damage: monster.damage,
            })
            .build()
    }

    /// Runs one chase pass and returns the strikes landed on the player.
    pub fn advance(&mut self, context: ChaseContext) -> Vec<Strike> {
        self.specs_world.insert(context);
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();

        let mut log = self.specs_world.write_resource::<StrikeLog>();
        std::mem::take(&mut log.strikes)
    }

    fn entity_of(&self, id: MonsterId) -> Option<Entity> {
        let entities = self.specs_world.entities();
        let tags = self.specs_world.read_component::<MonsterTag>();
        (&entities, &tags)
            .join()
            .find(|(_, tag)| tag.id == id)
            .map(|(entity, _)| entity)
    }

    fn snapshot(&self, entity: Entity) -> Option<Monster> {
        let positions = self.specs_world.read_component::<Position>();
        let tags = self.specs_world.read_component::<MonsterTag>();
        let stats = self.specs_world.read_component::<CombatStats>();
        let (pos, tag, stat) = (positions.get(entity)?, tags.get(entity)?, stats.get(entity)?);
        Some(Monster {
            id: tag.id,
            kind: tag.kind,
            position: pos.point,
            health: stat.health,
            damage: stat.damage,
        })
    }

    /// Subtracts `amount` from the monster's health, removing it once health
    /// reaches zero. Unknown ids yield `None`.
    pub fn apply_damage(&mut self, id: MonsterId, amount: i32) -> Option<DamageOutcome> {
        let entity = self.entity_of(id)?;
        let remaining = {
            let mut stats = self.specs_world.write_component::<CombatStats>();
            let stat = stats.get_mut(entity)?;
            stat.health -= amount;
            stat.health
        };

        if remaining > 0 {
            return Some(DamageOutcome::Wounded { remaining });
        }

        let slain = self.snapshot(entity)?;
        let _ = self.specs_world.delete_entity(entity);
        Some(DamageOutcome::Slain(slain))
    }

    pub fn monster(&self, id: MonsterId) -> Option<Monster> {
        self.entity_of(id).and_then(|entity| self.snapshot(entity))
    }

    /// Live monsters ordered by id.
    pub fn monsters(&self) -> Vec<Monster> {
        let positions = self.specs_world.read_component::<Position>();
        let tags = self.specs_world.read_component::<MonsterTag>();
        let stats = self.specs_world.read_component::<CombatStats>();
        let mut monsters: Vec<Monster> = (&positions, &tags, &stats)
            .join()
            .filter(|(_, _, stat)| stat.health > 0)
            .map(|(pos, tag, stat)| Monster {
                id: tag.id,
                kind: tag.kind,
                position: pos.point,
                health: stat.health,
                damage: stat.damage,
            })
            .collect();
        monsters.sort_by_key(|monster| monster.id);
        monsters
    }

    pub fn alive_count(&self) -> usize {
        let stats = self.specs_world.read_component::<CombatStats>();
        (&stats).join().filter(|stat| stat.health > 0).count()
    }

    /// Closest live monster within `reach` of `point` on both axes. Ties go
    /// to the lower id.
    pub fn nearest_within(&self, point: WorldPoint, reach: f32) -> Option<MonsterId> {
        self.monsters()
            .into_iter()
            .filter(|monster| {
                (monster.position.x - point.x).abs() < reach
                    && (monster.position.y - point.y).abs() < reach
            })
            .min_by(|a, b| {
                a.position
                    .distance(point)
                    .total_cmp(&b.position.distance(point))
            })
            .map(|monster| monster.id)
    }
}

impl Default for EcsWorld {
    fn default() -> Self {
        Self::new()
    }
}
