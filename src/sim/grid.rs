//! The discrete board
//!
//! Row-major storage with fixed dimensions. Pipeline stages take `&Grid` and
//! return a fresh `Grid`; the input is never touched.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::rng::{RandomSource, unit_to_index};
use crate::consts::{MAX_PLACEMENT_ATTEMPTS, SEED_CELLS_MIN, SEED_CELLS_SPREAD};

/// Board size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    pub rows: usize,
    pub cols: usize,
}

impl GridDims {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub const fn square(size: usize) -> Self {
        Self {
            rows: size,
            cols: size,
        }
    }
}

/// Board coordinate. Ordered row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Scratch annotations valid for the current turn only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellMarks {
    /// Produced by a merge during this swipe; cannot merge again
    pub merged_this_swipe: bool,
    /// Member of a large enough connected alive component
    pub colony_eligible: bool,
}

/// Fixed-size board of cells plus the per-turn mark layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    marks: Vec<CellMarks>,
}

impl Grid {
    /// Empty board
    pub fn new(dims: GridDims) -> Self {
        let len = dims.rows * dims.cols;
        Self {
            rows: dims.rows,
            cols: dims.cols,
            cells: vec![Cell::Empty; len],
            marks: vec![CellMarks::default(); len],
        }
    }

    /// Build from explicit rows. Rows are expected to share one width.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == cols), "ragged grid rows");
        let row_count = rows.len();
        let cells: Vec<Cell> = rows.into_iter().flatten().collect();
        let marks = vec![CellMarks::default(); cells.len()];
        Self {
            rows: row_count,
            cols,
            cells,
            marks,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        GridDims::new(self.rows, self.cols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    #[inline]
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Cell at `pos`. Panics when out of bounds.
    #[inline]
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    /// Signed lookup, `None` outside the board
    #[inline]
    pub fn get(&self, row: isize, col: isize) -> Option<&Cell> {
        if self.in_bounds(row, col) {
            Some(self.cell(Position::new(row as usize, col as usize)))
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let i = self.index(pos);
        self.cells[i] = cell;
    }

    #[inline]
    pub fn marks(&self, pos: Position) -> CellMarks {
        self.marks[self.index(pos)]
    }

    #[inline]
    pub fn set_marks(&mut self, pos: Position, marks: CellMarks) {
        let i = self.index(pos);
        self.marks[i] = marks;
    }

    /// Place a cell together with its marks
    #[inline]
    pub fn put(&mut self, pos: Position, cell: Cell, marks: CellMarks) {
        let i = self.index(pos);
        self.cells[i] = cell;
        self.marks[i] = marks;
    }

    /// Reset `pos` to an empty cell with cleared marks
    #[inline]
    pub fn clear(&mut self, pos: Position) {
        self.put(pos, Cell::Empty, CellMarks::default());
    }

    pub fn clear_marks(&mut self) {
        self.marks.fill(CellMarks::default());
    }

    /// All positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = self.cols;
        (0..self.cells.len()).map(move |i| Position::new(i / cols, i % cols))
    }

    /// `(position, cell)` pairs, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.positions().zip(self.cells.iter())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn positions_where<F>(&self, predicate: F) -> Vec<Position>
    where
        F: Fn(&Cell) -> bool,
    {
        self.iter()
            .filter(|(_, cell)| predicate(*cell))
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Cell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(*cell)).count()
    }

    /// Copy out as nested rows (debugging, assertions)
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(<[Cell]>::to_vec).collect()
    }
}

/// Allocate an empty board and seed 2-4 alive E=1 cells
///
/// The seed count and every position come from `rng`. A colliding position
/// is redrawn up to [`MAX_PLACEMENT_ATTEMPTS`] times; if the board stays
/// crowded that seed cell is skipped.
pub fn create_grid(dims: GridDims, rng: &mut dyn RandomSource) -> Grid {
    let mut grid = Grid::new(dims);
    if grid.is_empty() {
        return grid;
    }

    let target = SEED_CELLS_MIN + unit_to_index(rng.next_unit(), SEED_CELLS_SPREAD);

    let mut placed = 0;
    for _ in 0..target {
        let mut pos = draw_position(dims, rng);
        let mut attempts = 0;
        while !grid.cell(pos).is_empty() && attempts < MAX_PLACEMENT_ATTEMPTS {
            pos = draw_position(dims, rng);
            attempts += 1;
        }

        if grid.cell(pos).is_empty() {
            grid.set(pos, Cell::alive(1));
            placed += 1;
        }
    }

    if placed < target {
        log::debug!("Seeded {placed} of {target} cells (board too crowded)");
    }

    grid
}

fn draw_position(dims: GridDims, rng: &mut dyn RandomSource) -> Position {
    let row = unit_to_index(rng.next_unit(), dims.rows);
    let col = unit_to_index(rng.next_unit(), dims.cols);
    Position::new(row, col)
}
