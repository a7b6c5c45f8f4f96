//! Directional slide with merging
//!
//! Cells are processed nearest-the-target-edge first so that a cell which
//! already moved is never picked up again. This order decides merge chains.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::grid::{CellMarks, Grid, Position};
use super::merge::{MergeContext, apply_catalyst, merge_cells};
use super::neighbors::VON_NEUMANN_OFFSETS;
use crate::consts::{DEFAULT_COLONY_SIZE_THRESHOLD, DEFAULT_E_CAP};
use crate::error::EngineError;

/// Swipe direction on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row/column step toward the target edge
    #[inline]
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Compass heading used by input collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    N,
    E,
    S,
    W,
}

impl From<Compass> for Direction {
    fn from(heading: Compass) -> Self {
        match heading {
            Compass::N => Direction::Up,
            Compass::E => Direction::Right,
            Compass::S => Direction::Down,
            Compass::W => Direction::Left,
        }
    }
}

/// Swipe parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeOptions {
    pub e_cap: u32,
    pub colony_bonus: bool,
    pub colony_size_threshold: usize,
}

impl Default for SwipeOptions {
    fn default() -> Self {
        Self {
            e_cap: DEFAULT_E_CAP,
            colony_bonus: false,
            colony_size_threshold: DEFAULT_COLONY_SIZE_THRESHOLD,
        }
    }
}

/// Result of one swipe
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeResult {
    pub grid: Grid,
    pub merges: u32,
    /// Catalyst tokens consumed by sliding cells
    pub catalyst_uses: u32,
    /// Any cell changed position (slides, merges, catalyst pass-through)
    pub moved: bool,
}

#[derive(Default)]
struct SlideOutcome {
    merges: u32,
    catalyst_uses: u32,
    moved: bool,
}

/// Slide every alive cell toward `direction`
pub fn apply_swipe(
    grid: &Grid,
    direction: Direction,
    options: &SwipeOptions,
) -> Result<SwipeResult, EngineError> {
    let mut working = grid.clone();
    working.clear_marks();
    if options.colony_bonus {
        for pos in colony_members(grid, options.colony_size_threshold) {
            working.set_marks(
                pos,
                CellMarks {
                    colony_eligible: true,
                    ..CellMarks::default()
                },
            );
        }
    }

    let mut result = SwipeResult {
        grid: grid.clone(),
        merges: 0,
        catalyst_uses: 0,
        moved: false,
    };

    for pos in traversal_order(working.rows(), working.cols(), direction) {
        let slide = slide_cell(&mut working, pos, direction, options)?;
        result.merges += slide.merges;
        result.catalyst_uses += slide.catalyst_uses;
        result.moved |= slide.moved;
    }

    log::trace!(
        "swipe {:?}: merges={} catalysts={} moved={}",
        direction,
        result.merges,
        result.catalyst_uses,
        result.moved
    );

    result.grid = working;
    Ok(result)
}

/// Positions ordered so cells closest to the target edge come first
pub fn traversal_order(rows: usize, cols: usize, direction: Direction) -> Vec<Position> {
    let mut order = Vec::with_capacity(rows * cols);
    match direction {
        Direction::Left => {
            for row in 0..rows {
                order.extend((0..cols).map(|col| Position::new(row, col)));
            }
        }
        Direction::Right => {
            for row in 0..rows {
                order.extend((0..cols).rev().map(|col| Position::new(row, col)));
            }
        }
        Direction::Up => {
            for col in 0..cols {
                order.extend((0..rows).map(|row| Position::new(row, col)));
            }
        }
        Direction::Down => {
            for col in 0..cols {
                order.extend((0..rows).rev().map(|row| Position::new(row, col)));
            }
        }
    }
    order
}

fn slide_cell(
    grid: &mut Grid,
    start: Position,
    direction: Direction,
    options: &SwipeOptions,
) -> Result<SlideOutcome, EngineError> {
    let mut moving = *grid.cell(start);
    if !moving.is_alive() {
        return Ok(SlideOutcome::default());
    }

    let mut marks = grid.marks(start);
    let (dr, dc) = direction.delta();
    let mut current = start;
    let mut outcome = SlideOutcome::default();

    loop {
        let next_row = current.row as isize + dr;
        let next_col = current.col as isize + dc;
        let Some(target) = grid.get(next_row, next_col).copied() else {
            break;
        };
        let next = Position::new(next_row as usize, next_col as usize);

        match target {
            Cell::Empty => {
                grid.clear(current);
                current = next;
                outcome.moved = true;
            }
            Cell::Catalyst => {
                moving = apply_catalyst(&moving, options.e_cap);
                grid.clear(current);
                current = next;
                outcome.catalyst_uses += 1;
                outcome.moved = true;
            }
            Cell::Alive { .. } | Cell::Dormant { .. } => {
                let target_marks = grid.marks(next);
                if target_marks.merged_this_swipe {
                    break;
                }

                let colony_bonus_eligible = options.colony_bonus
                    && marks.colony_eligible
                    && target_marks.colony_eligible;
                moving = merge_cells(
                    &moving,
                    &target,
                    MergeContext {
                        e_cap: options.e_cap,
                        colony_bonus_eligible,
                    },
                )?;
                marks = CellMarks {
                    merged_this_swipe: true,
                    colony_eligible: false,
                };
                grid.clear(current);
                current = next;
                outcome.merges += 1;
                outcome.moved = true;
                break;
            }
            Cell::Blight { .. } => break,
        }
    }

    grid.put(current, moving, marks);
    Ok(outcome)
}

/// Alive cells in 4-connected components of at least `threshold` cells
pub fn colony_members(grid: &Grid, threshold: usize) -> Vec<Position> {
    let mut visited = vec![false; grid.len()];
    let mut members = Vec::new();
    let index = |pos: Position| pos.row * grid.cols() + pos.col;

    for start in grid.positions() {
        if visited[index(start)] {
            continue;
        }
        visited[index(start)] = true;
        if !grid.cell(start).is_alive() {
            continue;
        }

        let mut stack = vec![start];
        let mut component = Vec::new();
        while let Some(pos) = stack.pop() {
            component.push(pos);
            for (dr, dc) in VON_NEUMANN_OFFSETS {
                let row = pos.row as isize + dr;
                let col = pos.col as isize + dc;
                if !grid.in_bounds(row, col) {
                    continue;
                }
                let neighbor = Position::new(row as usize, col as usize);
                if visited[index(neighbor)] {
                    continue;
                }
                visited[index(neighbor)] = true;
                if grid.cell(neighbor).is_alive() {
                    stack.push(neighbor);
                }
            }
        }

        if component.len() >= threshold {
            members.extend(component);
        }
    }

    members
}
