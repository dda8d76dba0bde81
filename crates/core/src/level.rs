//! Level geometry - static tiles plus the spawn list for dynamic entities.
//!
//! Tiles occupy unit cells `[x, x+1) × [y, y+1)`. Anything outside the grid is
//! empty, so a gap in the ground is a pit the player can fall through.

use thiserror::Error;

use crate::types::{EntityKind, MATRIX_HEIGHT};

/// Default map width in tiles.
pub const DEFAULT_LEVEL_WIDTH: u16 = 200;

/// Rows of ground at the bottom of the default map.
pub const GROUND_HEIGHT: u16 = 4;

/// Largest level accepted by [`Level::parse`].
pub const MAX_LEVEL_WIDTH: usize = 4096;

/// A static level cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Empty,
    Ground,
    Brick,
}

impl Tile {
    pub fn is_solid(&self) -> bool {
        !matches!(self, Tile::Empty)
    }
}

/// A dynamic entity placed at level load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
}

/// Goal pole: reaching column `x` wins the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    pub x: u16,
    pub top: u16,
    pub bottom: u16,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level text is empty")]
    Empty,
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },
    #[error("level has no player spawn (`P`)")]
    MissingPlayer,
    #[error("level has more than one player spawn")]
    MultiplePlayers,
    #[error("level is {width}x{height}, which exceeds the supported size")]
    TooLarge { width: usize, height: usize },
}

/// Static tile grid plus spawn metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    width: u16,
    height: u16,
    tiles: Vec<Tile>,
    spawns: Vec<Spawn>,
    player_spawn: (f32, f32),
    checkpoints: Vec<(f32, f32)>,
    goal: Option<Goal>,
}

impl Level {
    /// An empty level with the player spawn at the top-left.
    pub fn empty(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; (width as usize) * (height as usize)],
            spawns: Vec::new(),
            player_spawn: (0.0, 0.0),
            checkpoints: Vec::new(),
            goal: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.idx(x, y).map(|i| self.tiles[i]).unwrap_or(Tile::Empty)
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_solid()
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.idx(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Fill an inclusive-exclusive rectangle of tiles.
    pub fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, tile: Tile) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_tile(x, y, tile);
            }
        }
    }

    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }

    pub fn add_spawn(&mut self, kind: EntityKind, x: f32, y: f32) {
        self.spawns.push(Spawn { kind, x, y });
    }

    /// Top-left corner where the player appears.
    pub fn player_spawn(&self) -> (f32, f32) {
        self.player_spawn
    }

    pub fn set_player_spawn(&mut self, x: f32, y: f32) {
        self.player_spawn = (x, y);
    }

    /// Respawn points, sorted by x.
    pub fn checkpoints(&self) -> &[(f32, f32)] {
        &self.checkpoints
    }

    pub fn add_checkpoint(&mut self, x: f32, y: f32) {
        self.checkpoints.push((x, y));
        self.checkpoints.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    pub fn goal(&self) -> Option<Goal> {
        self.goal
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.goal = Some(goal);
    }

    /// The stock 200-column level.
    ///
    /// Ground, platforms, coins and walkers follow the classic layout; the
    /// power-ups, chaser, pits, checkpoint and goal sit further right.
    pub fn default_level() -> Self {
        let width = DEFAULT_LEVEL_WIDTH;
        let height = MATRIX_HEIGHT;
        let ground_top = (height - GROUND_HEIGHT) as i32;
        let mut level = Level::empty(width, height);

        level.fill(0, ground_top, width as i32, height as i32, Tile::Ground);
        // Pits.
        level.fill(70, ground_top, 73, height as i32, Tile::Empty);
        level.fill(120, ground_top, 123, height as i32, Tile::Empty);

        // Platforms.
        level.fill(10, ground_top - 5, 15, ground_top - 4, Tile::Brick);
        level.fill(20, ground_top - 8, 25, ground_top - 7, Tile::Brick);
        level.fill(30, ground_top - 7, 35, ground_top - 5, Tile::Brick);
        level.fill(150, ground_top - 5, 157, ground_top - 4, Tile::Brick);

        let g = ground_top as f32;
        for (x, y) in [(12.0, g - 7.0), (22.0, g - 10.0), (32.0, g - 8.0), (45.0, g - 3.0)] {
            level.add_spawn(EntityKind::Coin, x, y);
        }
        for x in [25.0, 40.0, 60.0, 140.0] {
            level.add_spawn(EntityKind::Walker, x, g - 1.0);
        }
        level.add_spawn(EntityKind::Chaser, 90.0, g - 1.0);
        level.add_spawn(EntityKind::Mushroom, 14.0, g - 6.0);
        level.add_spawn(EntityKind::FireFlower, 34.0, g - 8.0);

        level.set_player_spawn(2.0, g - 2.0);
        level.add_checkpoint(100.0, g - 2.0);
        level.set_goal(Goal {
            x: 195,
            top: 10,
            bottom: (ground_top - 1) as u16,
        });
        level
    }

    /// Parse an ASCII level.
    ///
    /// | Char | Meaning |
    /// |------|---------|
    /// | `.` or space | empty |
    /// | `#` | ground |
    /// | `B` | brick |
    /// | `o` | coin |
    /// | `e` | walker |
    /// | `t` | chaser |
    /// | `m` | mushroom |
    /// | `f` | fire flower |
    /// | `P` | player (bottom-left cell of the 2x2 sprite) |
    /// | `C` | checkpoint (same anchor as `P`) |
    /// | `G` | goal pole cell |
    ///
    /// Every row must have the same width. Blank leading/trailing lines are
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .skip_while(|l| l.trim().is_empty())
            .collect();
        let rows: Vec<&str> = match rows.iter().rposition(|l| !l.trim().is_empty()) {
            Some(last) => rows[..=last].to_vec(),
            None => return Err(LevelError::Empty),
        };

        let width = rows[0].chars().count();
        let height = rows.len();
        if width > MAX_LEVEL_WIDTH || height > u16::MAX as usize {
            return Err(LevelError::TooLarge { width, height });
        }

        let mut level = Level::empty(width as u16, height as u16);
        let mut player = None;
        let mut goal: Option<Goal> = None;

        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: width,
                    actual,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let (x, y) = (col as i32, row as i32);
                let (fx, fy) = (col as f32, row as f32);
                match ch {
                    '.' | ' ' => {}
                    '#' => level.set_tile(x, y, Tile::Ground),
                    'B' => level.set_tile(x, y, Tile::Brick),
                    'o' => level.add_spawn(EntityKind::Coin, fx, fy),
                    'e' => level.add_spawn(EntityKind::Walker, fx, fy),
                    't' => level.add_spawn(EntityKind::Chaser, fx, fy),
                    'm' => level.add_spawn(EntityKind::Mushroom, fx, fy),
                    'f' => level.add_spawn(EntityKind::FireFlower, fx, fy),
                    'P' => {
                        if player.is_some() {
                            return Err(LevelError::MultiplePlayers);
                        }
                        player = Some((fx, fy - 1.0));
                    }
                    'C' => level.add_checkpoint(fx, fy - 1.0),
                    'G' => {
                        let g = goal.get_or_insert(Goal {
                            x: col as u16,
                            top: row as u16,
                            bottom: row as u16,
                        });
                        g.top = g.top.min(row as u16);
                        g.bottom = g.bottom.max(row as u16);
                    }
                    _ => return Err(LevelError::UnknownTile { ch, row, col }),
                }
            }
        }

        let (px, py) = player.ok_or(LevelError::MissingPlayer)?;
        level.set_player_spawn(px, py);
        if let Some(goal) = goal {
            level.set_goal(goal);
        }
        Ok(level)
    }
}
