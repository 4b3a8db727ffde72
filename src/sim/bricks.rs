//! Brick field storage and level layout generation

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use super::geometry::Rect;
use super::state::{Brick, BrickKind, Color, GridPos};
use crate::config::GameConfig;

/// Row colors for normal bricks, cycled by row index
const ROW_PALETTE: [Color; 6] = [
    [200, 90, 90],
    [230, 150, 90],
    [200, 200, 90],
    [120, 200, 140],
    [100, 160, 230],
    [160, 120, 220],
];

/// Color of every bomb brick
pub const BOMB_COLOR: Color = [230, 130, 70];

/// Color for a normal brick in `row`
pub fn row_color(row: u32) -> Color {
    ROW_PALETTE[row as usize % ROW_PALETTE.len()]
}

/// Live bricks of a level, keyed by grid coordinate.
///
/// Iteration is row-major, which is also the order bricks are tested
/// against a ball.
#[derive(Debug, Clone, Default)]
pub struct BrickField {
    bricks: BTreeMap<GridPos, Brick>,
}

impl BrickField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a brick, replacing any brick already at its coordinate
    pub fn insert(&mut self, brick: Brick) -> Option<Brick> {
        self.bricks.insert(brick.pos, brick)
    }

    /// Remove the brick at `pos`; missing coordinates are a no-op
    pub fn remove(&mut self, pos: GridPos) -> Option<Brick> {
        self.bricks.remove(&pos)
    }

    pub fn get(&self, pos: GridPos) -> Option<&Brick> {
        self.bricks.get(&pos)
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Brick> {
        self.bricks.get_mut(&pos)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.bricks.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.values()
    }
}

impl FromIterator<Brick> for BrickField {
    fn from_iter<T: IntoIterator<Item = Brick>>(iter: T) -> Self {
        let mut field = BrickField::new();
        for brick in iter {
            field.insert(brick);
        }
        field
    }
}

/// Screen rectangle of the grid cell at (row, col), gutter removed
pub fn brick_rect(config: &GameConfig, row: u32, col: u32) -> Rect {
    let cell_w = config.brick_cell_width();
    Rect::new(
        config.brick_area_margin + col as f32 * cell_w,
        config.brick_top + row as f32 * config.brick_height,
        (cell_w - config.brick_gap).max(1.0),
        (config.brick_height - config.brick_gap).max(1.0),
    )
}

/// Build a level's brick layout.
///
/// Each row starts full, loses up to `max_gaps_per_row` random columns, and
/// is sometimes shuffled. Rows may come out empty; callers must cope with
/// fewer bricks than the nominal grid.
pub fn generate_bricks<R: Rng + ?Sized>(
    config: &GameConfig,
    rows: u32,
    rng: &mut R,
) -> BrickField {
    let cols = config.brick_cols.max(1) as usize;
    let mut field = BrickField::new();

    for row in 0..rows {
        let mut pattern = vec![true; cols];
        let gaps = rng.random_range(0..=config.max_gaps_per_row);
        for _ in 0..gaps {
            let idx = rng.random_range(0..cols);
            pattern[idx] = false;
        }
        if rng.random_bool(config.row_shuffle_chance) {
            pattern.shuffle(rng);
        }

        for (col, _) in pattern.iter().enumerate().filter(|(_, present)| **present) {
            let col = col as u32;
            let hits = if rng.random_bool(config.double_hit_chance) {
                2
            } else {
                1
            };
            let kind = if rng.random_bool(config.bomb_chance) {
                BrickKind::Bomb
            } else {
                BrickKind::Normal
            };
            let color = match kind {
                BrickKind::Normal => row_color(row),
                BrickKind::Bomb => BOMB_COLOR,
            };

            field.insert(Brick {
                pos: GridPos::new(row as i32, col as i32),
                rect: brick_rect(config, row, col),
                hits,
                color,
                kind,
            });
        }
    }

    field
}
