//! Match detection - horizontal and vertical runs of 3+ same-colored blocks
//!
//! Each row is swept left to right one step past the last column so the final
//! run is flushed, then each column top to bottom. A cell sitting in both a
//! horizontal and a vertical run (L/T shapes) is registered once.

use log::debug;

use crate::core::Grid;
use crate::idle::hero_cell_fulfills_idle;
use crate::types::{BlockColor, BlockState, MIN_RUN_LENGTH};

/// Result of a match pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Item names of matched entries, in registration order
    pub matches: Vec<String>,
    /// Matched positions as (row, col), in registration order
    pub cells: Vec<(usize, usize)>,
}

impl MatchReport {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Registration-ordered set of matrix positions
struct MatchSet {
    cols: usize,
    mask: Vec<bool>,
    order: Vec<(usize, usize)>,
}

impl MatchSet {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            mask: vec![false; rows * cols],
            order: Vec::new(),
        }
    }

    fn register(&mut self, pos: (usize, usize)) {
        let idx = pos.0 * self.cols + pos.1;
        if !self.mask[idx] {
            self.mask[idx] = true;
            self.order.push(pos);
        }
    }

    fn contains(&self, pos: (usize, usize)) -> bool {
        self.mask[pos.0 * self.cols + pos.1]
    }
}

/// Color a cell contributes to run detection
///
/// `None` for hero-exempt cells, cells without an entry and empty colors.
fn effective_color<G: Grid + ?Sized>(grid: &G, row: usize, col: usize) -> Option<&BlockColor> {
    let entry = grid.slot(row, col).entry();
    if hero_cell_fulfills_idle(grid, row, col, entry) {
        return None;
    }
    entry.and_then(|e| e.match_color())
}

/// Sweep `lines` lines of `len` cells each; `at(line, i)` maps to (row, col)
fn sweep<G, F>(grid: &G, lines: usize, len: usize, at: F, set: &mut MatchSet)
where
    G: Grid + ?Sized,
    F: Fn(usize, usize) -> (usize, usize),
{
    let mut run: Vec<(usize, usize)> = Vec::new();
    for line in 0..lines {
        let mut run_color: Option<&BlockColor> = None;
        run.clear();
        for i in 0..=len {
            let pos = at(line, i);
            let color = if i < len {
                effective_color(grid, pos.0, pos.1)
            } else {
                None
            };

            if color.is_some() && color == run_color {
                run.push(pos);
                continue;
            }
            if run_color.is_some() && run.len() >= MIN_RUN_LENGTH {
                for &cell in &run {
                    set.register(cell);
                }
            }
            run_color = color;
            run.clear();
            if color.is_some() {
                run.push(pos);
            }
        }
    }
}

fn collect_matches<G: Grid + ?Sized>(grid: &G) -> MatchSet {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut set = MatchSet::new(rows, cols);
    sweep(grid, rows, cols, |row, col| (row, col), &mut set);
    sweep(grid, cols, rows, |col, row| (row, col), &mut set);
    set
}

/// Positions currently forming runs, without touching block states
pub fn find_matched_cells<G: Grid + ?Sized>(grid: &mut G) -> Vec<(usize, usize)> {
    grid.ensure_matrix();
    collect_matches(&*grid).order
}

/// Flag every block in a run as `matched`
///
/// Blocks left over as `matched` from an earlier pass that no longer sit in
/// any run are put back to `idle`.
pub fn mark_matched_blocks<G: Grid + ?Sized>(grid: &mut G) -> MatchReport {
    grid.ensure_matrix();
    let set = collect_matches(&*grid);

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let Some(entry) = grid.entry_mut(row, col) else {
                continue;
            };
            if set.contains((row, col)) {
                entry.set_block_state(BlockState::Matched);
            } else if entry.block_state() == BlockState::Matched {
                entry.set_block_state(BlockState::Idle);
            }
        }
    }

    let matches: Vec<String> = set
        .order
        .iter()
        .filter_map(|&(row, col)| grid.slot(row, col).entry())
        .filter_map(|entry| entry.name().map(str::to_owned))
        .collect();

    if !set.order.is_empty() {
        debug!(
            "match pass flagged {} cells ({} named)",
            set.order.len(),
            matches.len()
        );
    }

    MatchReport {
        matches,
        cells: set.order,
    }
}
