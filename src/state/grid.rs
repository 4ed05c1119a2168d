//! Grid, tiles and level generation.

use rand::Rng;
use serde::Serialize;

use super::level::LevelConfig;

/// The start cell. Generation never places anything here.
pub const ORIGIN: Position = Position { x: 0, y: 0 };

/// Tile types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    #[default]
    Empty,
    /// Collectible; turns into `Empty` when picked up
    Bone,
    /// Slows the player down; never consumed
    Mud,
}

impl Tile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Bone => "bone",
            Self::Mud => "mud",
        }
    }
}

/// Movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Grid position. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Check if position is inside a `width` x `height` grid.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x < width && self.y < height
    }

    /// One step in `direction`, clamped to the grid.
    pub fn step(&self, direction: Direction, width: u32, height: u32) -> Position {
        let max_x = width.saturating_sub(1);
        let max_y = height.saturating_sub(1);
        match direction {
            Direction::Up => Position::new(self.x, self.y.saturating_sub(1)),
            Direction::Down => Position::new(self.x, (self.y + 1).min(max_y)),
            Direction::Left => Position::new(self.x.saturating_sub(1), self.y),
            Direction::Right => Position::new((self.x + 1).min(max_x), self.y),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({"x": self.x, "y": self.y})
    }
}

/// Row-major grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Tile>,
}

impl Grid {
    /// Create an all-empty grid.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Tile::Empty; width as usize * height as usize],
        }
    }

    /// Build a grid from rows of tiles.
    ///
    /// # Panics
    ///
    /// If the rows do not all have the same length.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len() as u32);
        assert!(
            rows.iter().all(|r| r.len() as u32 == width),
            "ragged grid rows"
        );
        Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.is_within(self.width, self.height) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Get tile at position.
    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.index(pos).map(|i| self.cells[i])
    }

    fn set(&mut self, pos: Position, tile: Tile) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = tile;
        }
    }

    /// Pick up the bone at `pos`. Returns false if there was none.
    pub fn collect_bone(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(i) if self.cells[i] == Tile::Bone => {
                self.cells[i] = Tile::Empty;
                true
            }
            _ => false,
        }
    }

    /// Count tiles of a type.
    pub fn count(&self, tile: Tile) -> u32 {
        self.cells.iter().filter(|t| **t == tile).count() as u32
    }

    /// All positions holding `tile`, row by row.
    pub fn positions_of(&self, tile: Tile) -> Vec<Position> {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == tile)
            .map(|(i, _)| Position::new((i % width) as u32, (i / width) as u32))
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows()
            .map(|row| {
                let cells: Vec<serde_json::Value> =
                    row.iter().map(|t| serde_json::json!(t.as_str())).collect();
                serde_json::Value::Array(cells)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

/// Generate a fresh grid for a level.
///
/// Bones are placed first, then mud, each on distinct uniformly random cells
/// other than [`ORIGIN`]. Placement uses rejection sampling, which always
/// terminates because `LevelConfig` leaves at least one free cell beyond the
/// start cell.
///
/// # Panics
///
/// If `bone_count + mud_count + 1 > width * height`. `LevelConfig::for_level`
/// never produces such a config.
pub fn generate<R: Rng + ?Sized>(level: &LevelConfig, rng: &mut R) -> Grid {
    assert!(
        level.is_placeable(),
        "level config cannot fit {} bones and {} mud on a {}x{} grid",
        level.bone_count,
        level.mud_count,
        level.width,
        level.height
    );

    let mut grid = Grid::empty(level.width, level.height);
    place(&mut grid, Tile::Bone, level.bone_count, rng);
    place(&mut grid, Tile::Mud, level.mud_count, rng);
    grid
}

fn place<R: Rng + ?Sized>(grid: &mut Grid, tile: Tile, count: u32, rng: &mut R) {
    let mut placed = 0;
    while placed < count {
        let pos = Position::new(
            rng.gen_range(0..grid.width),
            rng.gen_range(0..grid.height),
        );
        if pos == ORIGIN || grid.get(pos) != Some(Tile::Empty) {
            continue;
        }
        grid.set(pos, tile);
        placed += 1;
    }
}
