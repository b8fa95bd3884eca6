use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAP_WIDTH: i32 = 20;
pub const DEFAULT_MAP_HEIGHT: i32 = 20;

pub const ROOM_PLACEMENT_ATTEMPTS: usize = 100;
pub const BASE_ROOM_TARGET: usize = 8;
pub const MAX_ROOM_TARGET: usize = 15;

const EDGE_MARGIN: i32 = 2;
const MIN_ROOM_SIDE: i32 = 4;
const MAX_ROOM_SIDE: i32 = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    Wall,
}

impl TileKind {
    pub fn blocks_move(self) -> bool {
        matches!(self, TileKind::Wall)
    }
}

/// Continuous position in world space. The grid is centered on the origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const ORIGIN: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::with_size(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// True when the rooms overlap or touch without a free cell between them.
    /// The inclusive edge test on the rects is exactly the one-cell buffer.
    pub fn crowds(&self, other: &Room) -> bool {
        self.rect().intersect(&other.rect())
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

fn corridor_path(start: Point, end: Point) -> Vec<Point> {
    let mut path = Vec::new();
    let mut cursor = start;
    path.push(cursor);

    while cursor.x != end.x {
        cursor.x += if end.x > cursor.x { 1 } else { -1 };
        path.push(cursor);
    }

    while cursor.y != end.y {
        cursor.y += if end.y > cursor.y { 1 } else { -1 };
        path.push(cursor);
    }

    path
}

/// Number of rooms the generator tries to place on `floor`.
pub fn room_target(floor: u32) -> usize {
    (BASE_ROOM_TARGET + floor as usize).min(MAX_ROOM_TARGET)
}

/// One generated floor: a wall/floor grid addressed `[x][y]` plus the rooms
/// carved into it, in placement order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dungeon {
    pub width: i32,
    pub height: i32,
    pub floor: u32,
    pub rooms: Vec<Room>,
    tiles: Vec<TileKind>,
}

impl Dungeon {
    pub fn walled(width: i32, height: i32, floor: u32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            floor,
            rooms: Vec::new(),
            tiles: vec![TileKind::Wall; size],
        }
    }

    /// Carves `rooms` into a walled grid and joins consecutive rooms with
    /// L-shaped corridors (horizontal along the source row first).
    pub fn from_rooms(width: i32, height: i32, floor: u32, rooms: Vec<Room>) -> Self {
        let mut dungeon = Self::walled(width, height, floor);

        for room in &rooms {
            room.rect().for_each(|pt| dungeon.paint_floor(pt));
        }

        for pair in rooms.windows(2) {
            for pt in corridor_path(pair[0].center(), pair[1].center()) {
                dungeon.paint_floor(pt);
            }
        }

        dungeon.rooms = rooms;
        dungeon
    }

    pub fn generate(width: i32, height: i32, floor: u32, rng: &mut RandomNumberGenerator) -> Self {
        let target = room_target(floor);
        let x_limit = width - (MIN_ROOM_SIDE + EDGE_MARGIN);
        let y_limit = height - (MIN_ROOM_SIDE + EDGE_MARGIN);
        let mut rooms: Vec<Room> = Vec::with_capacity(target);

        if x_limit > EDGE_MARGIN && y_limit > EDGE_MARGIN {
            for _ in 0..ROOM_PLACEMENT_ATTEMPTS {
                if rooms.len() >= target {
                    break;
                }

                let candidate = Room::new(
                    rng.range(EDGE_MARGIN, x_limit),
                    rng.range(EDGE_MARGIN, y_limit),
                    rng.range(MIN_ROOM_SIDE, MAX_ROOM_SIDE + 1),
                    rng.range(MIN_ROOM_SIDE, MAX_ROOM_SIDE + 1),
                );

                if candidate.x + candidate.width >= width - EDGE_MARGIN
                    || candidate.y + candidate.height >= height - EDGE_MARGIN
                {
                    continue;
                }

                if rooms.iter().any(|room| room.crowds(&candidate)) {
                    continue;
                }

                rooms.push(candidate);
            }
        }

        tracing::debug!(
            floor,
            placed = rooms.len(),
            target,
            "generated dungeon {}x{}",
            width,
            height
        );

        Self::from_rooms(width, height, floor, rooms)
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some((x * self.height + y) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    fn paint_floor(&mut self, point: Point) {
        if let Some(idx) = self.idx(point.x, point.y) {
            self.tiles[idx] = TileKind::Floor;
        }
    }

    pub fn tile(&self, point: Point) -> Option<TileKind> {
        self.idx(point.x, point.y).map(|idx| self.tiles[idx])
    }

    pub fn is_floor(&self, point: Point) -> bool {
        self.tile(point).is_some_and(|tile| !tile.blocks_move())
    }

    pub fn floor_cells(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let point = Point::new(x, y);
                if self.is_floor(point) {
                    points.push(point);
                }
            }
        }
        points
    }

    fn half_extent(&self) -> (f32, f32) {
        ((self.width / 2) as f32, (self.height / 2) as f32)
    }

    pub fn world_to_grid(&self, point: WorldPoint) -> Point {
        let (half_w, half_h) = self.half_extent();
        Point::new(
            (point.x + half_w).floor() as i32,
            (point.y + half_h).floor() as i32,
        )
    }

    pub fn grid_to_world(&self, point: Point) -> WorldPoint {
        let (half_w, half_h) = self.half_extent();
        WorldPoint::new(point.x as f32 - half_w, point.y as f32 - half_h)
    }

    pub fn is_floor_at(&self, point: WorldPoint) -> bool {
        self.is_floor(self.world_to_grid(point))
    }

    /// Center of the first room in world space, or the origin when no room
    /// could be placed.
    pub fn spawn_point(&self) -> WorldPoint {
        self.rooms
            .first()
            .map(|room| self.grid_to_world(room.center()))
            .unwrap_or(WorldPoint::ORIGIN)
    }
}
