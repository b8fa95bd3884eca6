mod render;

use std::time::{Duration, Instant};

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use tracing_subscriber::EnvFilter;

use render::{HudPanel, draw_dungeon, draw_log, draw_sanctum};
use sanctum_crawler::data::recipes::RECIPES;
use sanctum_crawler::ecs::DamageOutcome;
use sanctum_crawler::inventory::ItemUse;
use sanctum_crawler::sanctum::ROOM_KEYS;
use sanctum_crawler::sanctum::storage::{FileStore, KeyValueStore, MemoryStore};
use sanctum_crawler::{ActionOutcome, GameConfig, GamePhase, GameSession};

const SCREEN_HEIGHT: i32 = 50;
const MAP_ORIGIN_X: i32 = 2;
const MAP_ORIGIN_Y: i32 = 8;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 7;
const LOG_MAX_ENTRIES: usize = 8;

struct CrawlerState {
    session: GameSession,
    hud: HudPanel,
    message_log: Vec<String>,
    last_phase: GamePhase,
}

impl GameState for CrawlerState {
    fn tick(&mut self, ctx: &mut BTerm) {
        let now = Instant::now();
        self.handle_input(ctx, now);

        let elapsed = Duration::from_secs_f32(ctx.frame_time_ms.max(0.0) / 1000.0);
        for strike in self.session.advance(elapsed) {
            self.push_log_entry(format!("{} hits you for {}", strike.monster, strike.damage));
        }
        self.note_phase_change();

        ctx.cls();
        self.draw_scene(ctx);
    }
}

impl CrawlerState {
    fn new(session: GameSession) -> Self {
        let last_phase = session.phase();
        Self {
            session,
            hud: HudPanel::new(),
            message_log: vec!["Press Enter to descend.".to_string()],
            last_phase,
        }
    }

    fn handle_input(&mut self, ctx: &mut BTerm, now: Instant) {
        let Some(key) = ctx.key else {
            return;
        };

        if self.session.phase() == GamePhase::Sanctum {
            self.handle_sanctum_input(key);
            return;
        }

        match key {
            VirtualKeyCode::Return => self.start_or_restart(),
            VirtualKeyCode::Left | VirtualKeyCode::A => self.try_step(now, -1.0, 0.0),
            VirtualKeyCode::Right | VirtualKeyCode::D => self.try_step(now, 1.0, 0.0),
            VirtualKeyCode::Up | VirtualKeyCode::W => self.try_step(now, 0.0, 1.0),
            VirtualKeyCode::Down | VirtualKeyCode::S => self.try_step(now, 0.0, -1.0),
            VirtualKeyCode::Space => self.act(now),
            VirtualKeyCode::Key1 => self.use_slot(0),
            VirtualKeyCode::Key2 => self.use_slot(1),
            VirtualKeyCode::Key3 => self.use_slot(2),
            VirtualKeyCode::Key4 => self.use_slot(3),
            VirtualKeyCode::Key5 => self.use_slot(4),
            VirtualKeyCode::F1 => self.craft(0),
            VirtualKeyCode::F2 => self.craft(1),
            VirtualKeyCode::F3 => self.craft(2),
            VirtualKeyCode::B => self.session.enter_sanctum(),
            VirtualKeyCode::Q => ctx.quit(),
            _ => {}
        }
    }

    fn handle_sanctum_input(&mut self, key: VirtualKeyCode) {
        let room = match key {
            VirtualKeyCode::Key1 => 0,
            VirtualKeyCode::Key2 => 1,
            VirtualKeyCode::Key3 => 2,
            VirtualKeyCode::Key4 => 3,
            VirtualKeyCode::Escape => {
                self.session.exit_sanctum();
                return;
            }
            _ => return,
        };

        let key = ROOM_KEYS[room];
        if self.session.upgrade_room(key) {
            let level = self.session.sanctum().room(key).map_or(0, |room| room.level);
            self.push_log_entry(format!("Upgraded {key} to level {level}"));
        } else {
            self.push_log_entry(format!("Cannot upgrade {key}"));
        }
    }

    fn start_or_restart(&mut self) {
        match self.session.phase() {
            GamePhase::Ready => {
                self.session.start_run();
            }
            GamePhase::GameOver => {
                self.session.reset_run();
                self.session.start_run();
            }
            _ => {}
        }
    }

    fn try_step(&mut self, now: Instant, dx: f32, dy: f32) {
        self.session.try_move(now, dx, dy);
    }

    fn act(&mut self, now: Instant) {
        match self.session.try_action(now) {
            ActionOutcome::Attacked(report) => {
                let crit = if report.attack.critical { " Critical Hit!" } else { "" };
                self.push_log_entry(format!(
                    "You hit {} for {}.{}",
                    report.target, report.attack.damage, crit
                ));
                if let DamageOutcome::Slain(monster) = report.outcome {
                    self.push_log_entry(format!("The {} falls.", monster.kind));
                }
            }
            ActionOutcome::Descended { floor } => {
                self.push_log_entry(format!("You descend to floor {floor}."));
            }
            ActionOutcome::Idle => {}
        }
    }

    fn use_slot(&mut self, slot: usize) {
        let Some(item) = self.session.inventory().items().get(slot).cloned() else {
            return;
        };
        match self.session.use_item(&item.id) {
            Some(ItemUse::Heal(amount)) => {
                self.push_log_entry(format!("{} restores {amount} health", item.name));
            }
            Some(ItemUse::Deposit { key, .. }) => {
                self.push_log_entry(format!("Sent {} to the sanctum as {key}", item.name));
            }
            None => self.push_log_entry(format!("{} cannot be used", item.name)),
        }
    }

    fn craft(&mut self, index: usize) {
        let Some(recipe) = RECIPES.get(index) else {
            return;
        };
        match self.session.craft(recipe.id) {
            Some(name) => self.push_log_entry(format!("Crafted {name}")),
            None => self.push_log_entry(format!("Missing ingredients for {}", recipe.name)),
        }
    }

    fn note_phase_change(&mut self) {
        let phase = self.session.phase();
        if phase == self.last_phase {
            return;
        }
        self.last_phase = phase;
        match phase {
            GamePhase::GameOver => self.push_log_entry("You have fallen."),
            GamePhase::Playing => self.push_log_entry(format!(
                "Floor {} awaits.",
                self.session.run().current_floor()
            )),
            GamePhase::Sanctum => self.push_log_entry("You rest in the sanctum."),
            GamePhase::Ready => {}
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    fn draw_scene(&self, ctx: &mut BTerm) {
        let run = self.session.run();
        self.hud.draw(ctx, run, self.session.inventory());

        if run.phase() == GamePhase::Sanctum {
            draw_sanctum(ctx, self.session.sanctum(), MAP_ORIGIN_Y - 1);
        } else {
            draw_dungeon(
                ctx,
                run.dungeon(),
                &run.monsters(),
                run.player_position(),
                Point::new(MAP_ORIGIN_X, MAP_ORIGIN_Y),
            );
        }

        draw_log(ctx, &self.message_log, LOG_PANEL_START);
    }
}

fn open_storage(config: &GameConfig) -> Box<dyn KeyValueStore> {
    match FileStore::new(&config.data_dir) {
        Ok(store) => Box::new(store),
        Err(err) => {
            tracing::warn!("Sanctum progress will not be saved: {}", err);
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> BError {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!("Falling back to default config: {}", err);
        GameConfig::default()
    });
    let storage = open_storage(&config);
    let session = GameSession::new(config, storage);

    let context = BTermBuilder::simple80x50()
        .with_title("Sanctum Crawler")
        .build()?;
    main_loop(context, CrawlerState::new(session))
}
