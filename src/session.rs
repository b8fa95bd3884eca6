//! Composition root for one player: the current run, the carried inventory
//! and the sanctum, plus the input throttle a front-end drives them through.

use std::time::{Duration, Instant};

use bracket_random::prelude::RandomNumberGenerator;

use crate::config::GameConfig;
use crate::data::items::{Item, ItemIds};
use crate::data::monsters::MonsterId;
use crate::ecs::resources::Strike;
use crate::inventory::{Inventory, ItemUse};
use crate::run::{
    ActionOutcome, AttackReport, GamePhase, RunState, timing::ActionThrottle,
};
use crate::sanctum::{Sanctum, storage::KeyValueStore};

/// Distance covered by one movement input.
pub const MOVE_STEP: f32 = 1.0;

pub struct GameSession {
    run: RunState,
    inventory: Inventory,
    sanctum: Sanctum,
    throttle: ActionThrottle,
    crafted_ids: ItemIds,
}

impl GameSession {
    pub fn new(config: GameConfig, storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_rng(config, storage, RandomNumberGenerator::new())
    }

    pub fn with_rng(
        config: GameConfig,
        storage: Box<dyn KeyValueStore>,
        rng: RandomNumberGenerator,
    ) -> Self {
        let throttle = ActionThrottle::new(config.move_cooldown(), config.action_cooldown());
        let inventory = Inventory::new().with_potion_heal(config.potion_heal);
        Self {
            run: RunState::with_rng(config, rng),
            inventory,
            sanctum: Sanctum::load(storage),
            throttle,
            crafted_ids: ItemIds::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        self.run.config()
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn sanctum(&self) -> &Sanctum {
        &self.sanctum
    }

    pub fn phase(&self) -> GamePhase {
        self.run.phase()
    }

    fn collect_drops(&mut self) {
        for item in self.run.take_pending_drops() {
            self.inventory.add_item(item);
        }
    }

    // ---- life cycle ----

    pub fn initialize_game(&mut self) {
        self.run.initialize_game();
        self.throttle.movement.reset();
        self.throttle.action.reset();
    }

    pub fn start_run(&mut self) -> bool {
        self.run.start_run()
    }

    pub fn reset_run(&mut self) {
        self.run.reset_run();
    }

    pub fn set_game_phase(&mut self, phase: GamePhase) -> bool {
        self.run.set_game_phase(phase)
    }

    pub fn enter_sanctum(&mut self) {
        self.run.enter_sanctum();
    }

    pub fn exit_sanctum(&mut self) -> bool {
        self.run.exit_sanctum()
    }

    pub fn next_floor(&mut self) -> bool {
        self.run.next_floor()
    }

    // ---- run actions ----

    pub fn move_player(&mut self, dx: f32, dy: f32) -> bool {
        self.run.move_player(dx, dy)
    }

    /// Throttled movement of one step in direction `(dx, dy)`.
    pub fn try_move(&mut self, now: Instant, dx: f32, dy: f32) -> bool {
        if self.run.phase() != GamePhase::Playing || !self.throttle.movement.try_fire(now) {
            return false;
        }
        self.run.move_player(dx * MOVE_STEP, dy * MOVE_STEP)
    }

    /// Throttled action key.
    pub fn try_action(&mut self, now: Instant) -> ActionOutcome {
        if self.run.phase() != GamePhase::Playing || !self.throttle.action.try_fire(now) {
            return ActionOutcome::Idle;
        }
        let outcome = self.run.act();
        self.collect_drops();
        outcome
    }

    pub fn attack_monster(&mut self, id: MonsterId) -> Option<AttackReport> {
        let report = self.run.attack_monster(id);
        self.collect_drops();
        report
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<Strike> {
        self.run.advance(elapsed)
    }

    // ---- items ----

    pub fn add_item(&mut self, item: Item) {
        self.inventory.add_item(item);
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        self.inventory.remove_item(id)
    }

    /// Uses an inventory item and applies its effect: potions heal the
    /// player, materials go to sanctum storage.
    pub fn use_item(&mut self, id: &str) -> Option<ItemUse> {
        let effect = self.inventory.use_item(id)?;
        match &effect {
            ItemUse::Heal(amount) => self.run.heal_player(*amount),
            ItemUse::Deposit { key, quantity } => self.sanctum.add_material(key, *quantity),
        }
        Some(effect)
    }

    pub fn craft(&mut self, recipe_id: &str) -> Option<String> {
        self.inventory.craft(recipe_id, &mut self.crafted_ids)
    }

    pub fn upgrade_room(&mut self, key: &str) -> bool {
        self.sanctum.upgrade_room(key)
    }
}
