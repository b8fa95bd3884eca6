use specs::prelude::{Component, VecStorage};

use crate::data::monsters::{MonsterId, MonsterKind};
use crate::map::WorldPoint;

#[derive(Clone, Debug)]
pub struct Position {
    pub point: WorldPoint,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct MonsterTag {
    pub id: MonsterId,
    pub kind: MonsterKind,
}

impl Component for MonsterTag {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct CombatStats {
    pub health: i32,
    pub damage: i32,
}

impl Component for CombatStats {
    type Storage = VecStorage<Self>;
}
