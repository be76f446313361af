use glam::Vec2;
use std::fmt;
use tilecraft_core::{BlockKind, Rejection};

/// Default edge length of one tile in world units.
pub const DEFAULT_TILE_SIZE: f32 = 32.0;

/// Integer cell coordinate (column, row). Row 0 is the top of the world.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct TilePos {
    pub col: i32,
    pub row: i32,
}

impl TilePos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Axis-aligned world-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldRect {
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &WorldRect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Fixed-size rectangular block grid.
///
/// Reads outside the grid answer [`BlockKind::Empty`]; writes outside the grid
/// are rejected. The grid is never resized after creation.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    cells: Vec<BlockKind>,
    changed: Vec<TilePos>,
}

impl TileGrid {
    /// Allocate an empty grid.
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        debug_assert!(tile_size > 0.0);
        Self {
            width,
            height,
            tile_size,
            cells: vec![BlockKind::Empty; width * height],
            changed: Vec::new(),
        }
    }

    /// Build a grid from rows of equal length (row 0 first).
    ///
    /// Returns `None` when rows have different lengths.
    pub fn from_rows(rows: &[Vec<BlockKind>], tile_size: f32) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        let cells = rows.iter().flatten().copied().collect();
        Some(Self {
            width,
            height,
            tile_size,
            cells,
            changed: Vec::new(),
        })
    }

    /// Parse an ASCII layout, one line per row.
    ///
    /// `.` is empty; `d` dirt, `s` stone, `c` coal, `w` wood, `l` leaf,
    /// `g` grass, `a` sand, `n` snow. Unknown glyphs yield `None`.
    pub fn from_ascii(layout: &str, tile_size: f32) -> Option<Self> {
        let rows: Option<Vec<Vec<BlockKind>>> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(glyph_kind).collect())
            .collect();
        Self::from_rows(&rows?, tile_size)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World size in world units.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        self.in_bounds(col, row)
            .then(|| row as usize * self.width + col as usize)
    }

    /// Block at a cell; out-of-range cells are empty.
    pub fn get(&self, col: i32, row: i32) -> BlockKind {
        self.index(col, row)
            .map_or(BlockKind::Empty, |idx| self.cells[idx])
    }

    /// Overwrite a cell. Callers own preconditions such as "place only onto empty".
    pub fn set(&mut self, col: i32, row: i32, kind: BlockKind) -> Result<(), Rejection> {
        let idx = self
            .index(col, row)
            .ok_or(Rejection::OutOfBounds { col, row })?;
        if self.cells[idx] != kind {
            self.cells[idx] = kind;
            self.changed.push(TilePos::new(col, row));
        }
        Ok(())
    }

    #[inline]
    pub fn is_solid_at(&self, col: i32, row: i32) -> bool {
        self.get(col, row).is_solid()
    }

    /// Cell containing a world-space point (floor division).
    pub fn tile_at_world(&self, point: Vec2) -> TilePos {
        TilePos::new(
            (point.x / self.tile_size).floor() as i32,
            (point.y / self.tile_size).floor() as i32,
        )
    }

    pub fn cell_rect(&self, pos: TilePos) -> WorldRect {
        let min = Vec2::new(pos.col as f32, pos.row as f32) * self.tile_size;
        WorldRect::from_origin_size(min, Vec2::splat(self.tile_size))
    }

    /// Whether any solid cell strictly overlaps `rect`.
    pub fn overlaps_solid(&self, rect: &WorldRect) -> bool {
        let first = self.tile_at_world(rect.min);
        let last = TilePos::new(
            (rect.max.x / self.tile_size).ceil() as i32 - 1,
            (rect.max.y / self.tile_size).ceil() as i32 - 1,
        );
        (first.row..=last.row)
            .flat_map(|row| (first.col..=last.col).map(move |col| TilePos::new(col, row)))
            .any(|pos| self.get(pos.col, pos.row).is_solid() && self.cell_rect(pos).overlaps(rect))
    }

    /// Topmost solid row in a column, if any.
    pub fn surface_row(&self, col: i32) -> Option<i32> {
        (0..self.height as i32).find(|&row| self.is_solid_at(col, row))
    }

    /// Drain the cells changed since the last call.
    pub fn take_changed(&mut self) -> Vec<TilePos> {
        std::mem::take(&mut self.changed)
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[BlockKind]> {
        self.cells.chunks(self.width.max(1))
    }
}

fn glyph_kind(glyph: char) -> Option<BlockKind> {
    match glyph {
        '.' => Some(BlockKind::Empty),
        'd' => Some(BlockKind::Dirt),
        's' => Some(BlockKind::Stone),
        'c' => Some(BlockKind::Coal),
        'w' => Some(BlockKind::Wood),
        'l' => Some(BlockKind::Leaf),
        'g' => Some(BlockKind::Grass),
        'a' => Some(BlockKind::Sand),
        'n' => Some(BlockKind::Snow),
        _ => None,
    }
}
