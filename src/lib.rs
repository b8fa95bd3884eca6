//! Dungeon generation and run simulation for a small sanctum-building
//! crawler. The binary in `main.rs` is a terminal front-end over
//! [`session::GameSession`].

pub mod combat;
pub mod config;
pub mod data;
pub mod ecs;
pub mod inventory;
pub mod map;
pub mod run;
pub mod sanctum;
pub mod session;
pub mod spawner;

pub use config::{ConfigError, GameConfig};
pub use map::{Dungeon, Room, TileKind, WorldPoint};
pub use run::{ActionOutcome, GamePhase, RunState};
pub use sanctum::{Sanctum, SanctumState};
pub use session::GameSession;
