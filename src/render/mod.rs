use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use sanctum_crawler::data::monsters::Monster;
use sanctum_crawler::inventory::Inventory;
use sanctum_crawler::map::{Dungeon, TileKind, WorldPoint};
use sanctum_crawler::run::{GamePhase, RunState};
use sanctum_crawler::sanctum::{ROOM_KEYS, Sanctum};

pub const LOG_VISIBLE_ENTRIES: usize = 5;

/// Top panel: vitals, floor and the first inventory slots.
pub struct HudPanel;

impl HudPanel {
    pub const fn new() -> Self {
        Self
    }

    pub fn draw(&self, ctx: &mut BTerm, run: &RunState, inventory: &Inventory) {
        let (width, _) = ctx.get_char_size();
        ctx.draw_box(0, 0, width - 1, 6, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(
            2,
            1,
            RGB::named(WHITE),
            RGB::named(BLACK),
            format!(
                "Floor {} · Monsters left {} · {}",
                run.current_floor(),
                run.monsters_remaining(),
                phase_label(run.phase())
            ),
        );

        let health = run.player_health();
        ctx.print_color(
            2,
            2,
            health_color(health),
            RGB::named(BLACK),
            format!("HP {health}/100"),
        );
        ctx.print_color(
            16,
            2,
            RGB::named(LIGHT_BLUE),
            RGB::named(BLACK),
            format!("Level {} · XP {}/100", run.player_level(), run.player_exp()),
        );

        let mut x = 2;
        for (idx, item) in inventory.items().iter().take(5).enumerate() {
            let label = format!("[{}] {} x{}", idx + 1, item.name, item.quantity);
            ctx.print_color(x, 4, RGB::named(LIGHT_GREEN), RGB::named(BLACK), &label);
            x += label.len() as i32 + 2;
        }
    }
}

/// Green when healthy, shading to red as health runs out.
pub fn health_color(health: i32) -> RGB {
    if health <= 30 {
        RGB::named(RED)
    } else if health <= 60 {
        RGB::named(ORANGE)
    } else {
        RGB::named(LIGHT_GREEN)
    }
}

fn phase_label(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Ready => "Press Enter to start",
        GamePhase::Playing => "Space: attack / descend",
        GamePhase::GameOver => "You died. Enter to restart",
        GamePhase::Sanctum => "Sanctum",
    }
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let height = (log.len() as i32).min(LOG_VISIBLE_ENTRIES as i32) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(2, top + 1, RGB::named(WHITE), RGB::named(BLACK), "Event Log");
    for (row, entry) in log.iter().take(LOG_VISIBLE_ENTRIES).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}

/// Screen cell for a grid cell. World `y` grows upward, so rows are flipped.
fn screen_cell(dungeon: &Dungeon, origin: Point, grid: Point) -> Point {
    Point::new(origin.x + grid.x, origin.y + (dungeon.height - 1 - grid.y))
}

fn screen_of(dungeon: &Dungeon, origin: Point, point: WorldPoint) -> Option<Point> {
    let grid = dungeon.world_to_grid(point);
    dungeon
        .in_bounds(grid)
        .then(|| screen_cell(dungeon, origin, grid))
}

pub fn draw_dungeon(
    ctx: &mut BTerm,
    dungeon: &Dungeon,
    monsters: &[Monster],
    player: WorldPoint,
    origin: Point,
) {
    for x in 0..dungeon.width {
        for y in 0..dungeon.height {
            let grid = Point::new(x, y);
            let Some(tile) = dungeon.tile(grid) else {
                continue;
            };
            let (fg, glyph) = match tile {
                TileKind::Floor => (RGB::named(DARK_GRAY), '.'),
                TileKind::Wall => (RGB::named(GRAY), '#'),
            };
            let cell = screen_cell(dungeon, origin, grid);
            ctx.set(cell.x, cell.y, fg, RGB::named(BLACK), to_cp437(glyph));
        }
    }

    for monster in monsters {
        if let Some(cell) = screen_of(dungeon, origin, monster.position) {
            ctx.set(
                cell.x,
                cell.y,
                RGB::named(RED),
                RGB::named(BLACK),
                to_cp437(monster.kind.glyph()),
            );
        }
    }

    if let Some(cell) = screen_of(dungeon, origin, player) {
        ctx.set(cell.x, cell.y, RGB::named(YELLOW), RGB::named(BLACK), to_cp437('@'));
    }
}

pub fn draw_sanctum(ctx: &mut BTerm, sanctum: &Sanctum, top: i32) {
    let (width, _) = ctx.get_char_size();
    ctx.draw_box(0, top, width - 1, 30, RGB::named(GRAY), RGB::named(BLACK));
    ctx.print_color(
        2,
        top + 1,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        "Sanctum · 1-4 upgrade a room · Esc to leave",
    );

    let materials = sanctum
        .state()
        .materials
        .iter()
        .map(|(name, count)| format!("{name} {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    ctx.print(2, top + 3, format!("Materials: {materials}"));

    let mut y = top + 5;
    for (idx, key) in ROOM_KEYS.iter().enumerate() {
        let Some(room) = sanctum.room(key) else {
            continue;
        };
        let fg = if sanctum.can_upgrade_room(key) {
            RGB::named(LIGHT_GREEN)
        } else {
            RGB::named(WHITE)
        };
        ctx.print_color(
            2,
            y,
            fg,
            RGB::named(BLACK),
            format!("[{}] {} (level {})", idx + 1, key, room.level),
        );
        ctx.print(6, y + 1, &room.description);
        ctx.print(6, y + 2, room.effects.join(", "));
        let cost = sanctum
            .room_upgrade_cost(key)
            .iter()
            .map(|(name, count)| format!("{name} {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        ctx.print_color(
            6,
            y + 3,
            RGB::named(DARK_GRAY),
            RGB::named(BLACK),
            format!("next: {cost}"),
        );
        y += 5;
    }
}
