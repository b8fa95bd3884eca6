//! The run state machine: one playthrough from floor 1 until game over.
//!
//! `RunState` owns the current floor (dungeon plus its monster world), the
//! player's vitals and the monster tick task. Every operation is a plain
//! `&mut self` call; invalid requests are ignored rather than reported as
//! errors.

pub mod timing;

use std::time::Duration;

use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};

use crate::combat::{self, AttackResult};
use crate::config::GameConfig;
use crate::data::items::{Item, ItemIds};
use crate::data::monsters::{Monster, MonsterId};
use crate::ecs::{
    DamageOutcome, EcsWorld,
    resources::{ChaseContext, ChaseTuning, Strike},
};
use crate::map::{Dungeon, WorldPoint};
use crate::spawner::{self, SpawnArea};

use self::timing::MonsterTicker;

pub const MAX_HEALTH: i32 = 100;
pub const EXP_PER_LEVEL: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Ready,
    Playing,
    GameOver,
    Sanctum,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameOver",
            GamePhase::Sanctum => "sanctum",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttackReport {
    pub target: MonsterId,
    pub attack: AttackResult,
    pub outcome: DamageOutcome,
}

/// What the context-sensitive action key ended up doing.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Attacked(AttackReport),
    Descended { floor: u32 },
    Idle,
}

/// One floor's dungeon and the monsters living on it. Always replaced as a
/// unit so the two can never belong to different floors.
struct FloorState {
    number: u32,
    dungeon: Dungeon,
    monsters: EcsWorld,
}

pub struct RunState {
    config: GameConfig,
    rng: RandomNumberGenerator,
    item_ids: ItemIds,
    phase: GamePhase,
    player_position: WorldPoint,
    player_health: i32,
    player_level: u32,
    player_exp: u32,
    floor: FloorState,
    pending_drops: Vec<Item>,
    ticker: MonsterTicker,
}

impl RunState {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, RandomNumberGenerator::new())
    }

    pub fn with_rng(config: GameConfig, mut rng: RandomNumberGenerator) -> Self {
        let (floor, spawn) = Self::build_floor(&config, &mut rng, 1, config.initial_monsters);
        let ticker = MonsterTicker::new(config.tick_interval());
        Self {
            config,
            rng,
            item_ids: ItemIds::default(),
            phase: GamePhase::Ready,
            player_position: spawn,
            player_health: MAX_HEALTH,
            player_level: 1,
            player_exp: 0,
            floor,
            pending_drops: Vec::new(),
            ticker,
        }
    }

    fn build_floor(
        config: &GameConfig,
        rng: &mut RandomNumberGenerator,
        number: u32,
        monster_count: usize,
    ) -> (FloorState, WorldPoint) {
        let dungeon = Dungeon::generate(config.map_width, config.map_height, number, rng);
        let spawn = dungeon.spawn_point();
        let monsters = spawner::spawn(
            monster_count,
            number,
            &dungeon,
            spawn,
            &SpawnArea::from(config),
            rng,
        );
        let floor = FloorState {
            number,
            dungeon,
            monsters: EcsWorld::with_monsters(monsters),
        };
        (floor, spawn)
    }

    // ---- read model ----

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player_position(&self) -> WorldPoint {
        self.player_position
    }

    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    pub fn player_level(&self) -> u32 {
        self.player_level
    }

    pub fn player_exp(&self) -> u32 {
        self.player_exp
    }

    pub fn current_floor(&self) -> u32 {
        self.floor.number
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.floor.dungeon
    }

    pub fn monsters(&self) -> Vec<Monster> {
        self.floor.monsters.monsters()
    }

    pub fn monster(&self, id: MonsterId) -> Option<Monster> {
        self.floor.monsters.monster(id)
    }

    pub fn monsters_remaining(&self) -> usize {
        self.floor.monsters.alive_count()
    }

    pub fn floor_cleared(&self) -> bool {
        self.monsters_remaining() == 0
    }

    pub fn pending_drops(&self) -> &[Item] {
        &self.pending_drops
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    // ---- life cycle ----

    /// Builds floor 1 with fresh vitals and parks the run in `ready`.
    pub fn initialize_game(&mut self) {
        self.ticker.cancel();
        let (floor, spawn) = Self::build_floor(
            &self.config,
            &mut self.rng,
            1,
            self.config.initial_monsters,
        );
        self.floor = floor;
        self.player_position = spawn;
        self.player_health = MAX_HEALTH;
        self.player_level = 1;
        self.player_exp = 0;
        self.pending_drops.clear();
        self.phase = GamePhase::Ready;
        tracing::info!(rooms = self.floor.dungeon.rooms.len(), "run initialized");
    }

    /// `ready -> playing` on a freshly initialized floor 1.
    pub fn start_run(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            tracing::debug!(phase = self.phase.as_str(), "start ignored");
            return false;
        }
        self.initialize_game();
        self.enter_playing();
        true
    }

    /// Re-initializes the run from any phase and returns to `ready`. Sanctum
    /// progress lives elsewhere and is unaffected.
    pub fn reset_run(&mut self) {
        self.initialize_game();
    }

    pub fn enter_sanctum(&mut self) {
        self.leave_playing();
        self.phase = GamePhase::Sanctum;
        tracing::info!("entered sanctum");
    }

    pub fn exit_sanctum(&mut self) -> bool {
        if self.phase != GamePhase::Sanctum {
            return false;
        }
        self.phase = GamePhase::Ready;
        tracing::info!("left sanctum");
        true
    }

    /// Generic phase entry point. `ready -> playing` resumes the run in
    /// progress; use [`RunState::start_run`] for a fresh one.
    pub fn set_game_phase(&mut self, phase: GamePhase) -> bool {
        use GamePhase::*;

        match (self.phase, phase) {
            (from, to) if from == to => true,
            (_, Sanctum) => {
                self.enter_sanctum();
                true
            }
            (Sanctum, Ready) => self.exit_sanctum(),
            (GameOver, Ready) => {
                self.reset_run();
                true
            }
            (Ready, Playing) if self.player_health > 0 => {
                self.enter_playing();
                true
            }
            (Playing, Ready) => {
                self.leave_playing();
                self.phase = Ready;
                true
            }
            (from, to) => {
                tracing::debug!(
                    from = from.as_str(),
                    to = to.as_str(),
                    "phase transition rejected"
                );
                false
            }
        }
    }

    fn enter_playing(&mut self) {
        self.phase = GamePhase::Playing;
        self.ticker.start();
        tracing::info!(floor = self.floor.number, "playing");
    }

    fn leave_playing(&mut self) {
        if self.phase == GamePhase::Playing {
            self.ticker.cancel();
        }
    }

    /// Descends once the floor is cleared: new dungeon, `5 + floor` monsters,
    /// player at the new spawn point. Vitals carry over.
    pub fn next_floor(&mut self) -> bool {
        if self.phase != GamePhase::Playing || !self.floor_cleared() {
            tracing::debug!(
                remaining = self.monsters_remaining(),
                "next floor ignored"
            );
            return false;
        }

        let number = self.floor.number + 1;
        let count = self.config.initial_monsters + number as usize;
        let (floor, spawn) = Self::build_floor(&self.config, &mut self.rng, number, count);
        self.floor = floor;
        self.player_position = spawn;
        tracing::info!(floor = number, monsters = count, "descended");
        true
    }

    // ---- player ----

    /// Moves by `(dx, dy)` unless the target leaves the playable bound or
    /// the grid, or lands on a wall.
    pub fn move_player(&mut self, dx: f32, dy: f32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }

        let target = self.player_position.offset(dx, dy);
        let bound = self.config.playable_half_extent;
        if target.x.abs() > bound || target.y.abs() > bound {
            return false;
        }

        let dungeon = &self.floor.dungeon;
        if !dungeon.is_floor(dungeon.world_to_grid(target)) {
            tracing::debug!(x = target.x, y = target.y, "movement blocked");
            return false;
        }

        self.player_position = target;
        true
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.player_health = (self.player_health - amount).clamp(0, MAX_HEALTH);
        if self.player_health == 0 && self.phase == GamePhase::Playing {
            self.ticker.cancel();
            self.phase = GamePhase::GameOver;
            tracing::info!(floor = self.floor.number, level = self.player_level, "game over");
        }
    }

    pub fn heal_player(&mut self, amount: i32) {
        self.player_health = (self.player_health + amount).clamp(0, MAX_HEALTH);
    }

    /// Adds experience, converting every full 100 into a level.
    pub fn gain_exp(&mut self, amount: u32) {
        self.player_exp += amount;
        while self.player_exp >= EXP_PER_LEVEL {
            self.player_exp -= EXP_PER_LEVEL;
            self.player_level += 1;
            tracing::info!(level = self.player_level, "level up");
        }
    }

    // ---- combat ----

    /// The single entry point for monster health changes. A kill removes the
    /// monster, queues its drops and awards experience.
    pub fn apply_damage(&mut self, id: MonsterId, amount: i32) -> Option<DamageOutcome> {
        let outcome = self.floor.monsters.apply_damage(id, amount)?;
        if let DamageOutcome::Slain(monster) = &outcome {
            let drops = combat::roll_drops(monster.kind, &mut self.rng, &mut self.item_ids);
            tracing::info!(monster = %monster.id, drops = drops.len(), "monster slain");
            self.pending_drops.extend(drops);
            self.gain_exp(self.config.kill_exp);
        }
        Some(outcome)
    }

    pub fn attack_monster(&mut self, id: MonsterId) -> Option<AttackReport> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        self.floor.monsters.monster(id)?;

        let attack = combat::resolve_attack(self.config.player_damage, &mut self.rng);
        let outcome = self.apply_damage(id, attack.damage)?;
        Some(AttackReport {
            target: id,
            attack,
            outcome,
        })
    }

    pub fn nearby_monster(&self) -> Option<MonsterId> {
        self.floor
            .monsters
            .nearest_within(self.player_position, self.config.attack_reach)
    }

    /// The action key: attack whatever is in reach, otherwise descend if the
    /// floor has been cleared.
    pub fn act(&mut self) -> ActionOutcome {
        if self.phase != GamePhase::Playing {
            return ActionOutcome::Idle;
        }
        if let Some(id) = self.nearby_monster() {
            return self
                .attack_monster(id)
                .map_or(ActionOutcome::Idle, ActionOutcome::Attacked);
        }
        if self.next_floor() {
            return ActionOutcome::Descended {
                floor: self.floor.number,
            };
        }
        ActionOutcome::Idle
    }

    /// Hands every queued drop to the caller and empties the queue.
    pub fn take_pending_drops(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.pending_drops)
    }

    // ---- simulation ----

    /// Feeds elapsed time to the monster tick task and runs each due tick.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Strike> {
        let due = self.ticker.advance(elapsed);
        let mut landed = Vec::new();
        for _ in 0..due {
            if self.phase != GamePhase::Playing {
                break;
            }
            landed.extend(self.monster_tick());
        }
        landed
    }

    fn monster_tick(&mut self) -> Vec<Strike> {
        let context = ChaseContext::from_dungeon(
            &self.floor.dungeon,
            self.player_position,
            ChaseTuning::from(&self.config),
        );
        let strikes = self.floor.monsters.advance(context);
        let mut landed = Vec::with_capacity(strikes.len());
        for strike in strikes {
            if self.phase != GamePhase::Playing {
                break;
            }
            tracing::debug!(monster = %strike.monster, damage = strike.damage, "player struck");
            self.take_damage(strike.damage);
            landed.push(strike);
        }
        landed
    }
}
