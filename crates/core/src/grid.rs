//! Grid module - the board capability the engine talks to
//!
//! [`Grid`] is what a scene exposes to the resolution engine. [`BattleGrid`]
//! is the in-memory store shipped with the crate.
//!
//! A matrix slot is one of three things:
//! - `NoWrapper`: nothing at all at this position
//! - `EmptyWrapper`: a cell wrapper exists but holds no block
//! - `Occupied`: a wrapper holding a block entry
//!
//! [`Grid::block_entry_at`] reports both of the first two as `None`.

use std::collections::BTreeSet;

use log::debug;

use crate::entry::BlockEntry;
use crate::ids::IdGenerator;
use crate::matrix::ColorMatrix;
use crate::types::{BlockState, BoardState};

/// Contents of one matrix position
#[derive(Debug, Clone, Copy)]
pub enum CellSlot<'a> {
    NoWrapper,
    EmptyWrapper,
    Occupied(&'a BlockEntry),
}

impl<'a> CellSlot<'a> {
    pub fn entry(&self) -> Option<&'a BlockEntry> {
        match self {
            CellSlot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn has_wrapper(&self) -> bool {
        !matches!(self, CellSlot::NoWrapper)
    }
}

/// Holder for at most one block
#[derive(Debug, Clone, Default)]
pub struct CellWrapper {
    pub entry: Option<BlockEntry>,
}

impl CellWrapper {
    pub fn holding(entry: BlockEntry) -> Self {
        Self { entry: Some(entry) }
    }
}

/// Board capabilities required by the resolution engine
///
/// Rows and columns are `0..rows()` / `0..cols()`; implementations must return
/// `NoWrapper` (not panic) for positions they have not materialized.
pub trait Grid {
    /// Materialize the matrix to `rows() x cols()` before it is read
    fn ensure_matrix(&mut self);

    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    /// Direct read of a matrix slot
    fn slot(&self, row: usize, col: usize) -> CellSlot<'_>;

    fn block_entry_at(&self, row: usize, col: usize) -> Option<&BlockEntry> {
        self.slot(row, col).entry()
    }

    fn entry_mut(&mut self, row: usize, col: usize) -> Option<&mut BlockEntry>;

    /// Cell permanently exempt from matching because a hero sits on it
    fn is_hero_occupied_cell(&self, row: usize, col: usize) -> bool;

    /// Canonicalize a state before comparison
    fn normalize_state(&self, state: BlockState) -> BlockState {
        state
    }

    fn post_swap_cascading(&self) -> bool;

    fn set_post_swap_cascading(&mut self, cascading: bool);

    /// Ask the host to move the whole board into `state`
    fn request_state(&mut self, state: BoardState);
}

/// In-memory grid store
#[derive(Debug, Clone)]
pub struct BattleGrid {
    rows: usize,
    cols: usize,
    matrix: Vec<Vec<Option<CellWrapper>>>,
    hero_cells: BTreeSet<(usize, usize)>,
    post_swap_cascading: bool,
    board_state: BoardState,
    state_requests: usize,
}

impl BattleGrid {
    /// Create a grid; the matrix is materialized lazily by `ensure_matrix`
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            matrix: Vec::new(),
            hero_cells: BTreeSet::new(),
            post_swap_cascading: false,
            board_state: BoardState::Idle,
            state_requests: 0,
        }
    }

    /// Change the dimensions; takes effect at the next `ensure_matrix`
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
    }

    pub fn board_state(&self) -> BoardState {
        self.board_state
    }

    /// Number of `request_state` calls received
    pub fn state_requests(&self) -> usize {
        self.state_requests
    }

    pub fn set_hero_occupied(&mut self, row: usize, col: usize, occupied: bool) {
        if occupied {
            self.hero_cells.insert((row, col));
        } else {
            self.hero_cells.remove(&(row, col));
        }
    }

    fn wrapper_mut(&mut self, row: usize, col: usize) -> Option<&mut Option<CellWrapper>> {
        self.matrix.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Put `entry` at (row, col), creating the wrapper if needed
    ///
    /// The entry's own row/column are updated to match. Returns the entry
    /// previously held there. Out-of-bounds placements hand the entry back.
    pub fn place_entry(
        &mut self,
        row: usize,
        col: usize,
        mut entry: BlockEntry,
    ) -> Result<Option<BlockEntry>, BlockEntry> {
        if row >= self.rows || col >= self.cols {
            return Err(entry);
        }
        self.ensure_matrix();
        entry.row = row as i32;
        entry.column = col as i32;
        match self.wrapper_mut(row, col) {
            Some(slot) => {
                let wrapper = slot.get_or_insert_with(CellWrapper::default);
                Ok(wrapper.entry.replace(entry))
            }
            None => Err(entry),
        }
    }

    /// Remove the entry at (row, col), leaving an empty wrapper
    pub fn take_entry(&mut self, row: usize, col: usize) -> Option<BlockEntry> {
        self.wrapper_mut(row, col)
            .and_then(|slot| slot.as_mut())
            .and_then(|wrapper| wrapper.entry.take())
    }

    /// Remove the wrapper itself, returning any entry it held
    pub fn remove_wrapper(&mut self, row: usize, col: usize) -> Option<BlockEntry> {
        self.wrapper_mut(row, col)
            .and_then(Option::take)
            .and_then(|wrapper| wrapper.entry)
    }

    /// Exchange the contents of two cells, keeping entry positions in sync
    ///
    /// Returns false if either position is outside the grid.
    pub fn swap_entries(&mut self, a: (usize, usize), b: (usize, usize)) -> bool {
        if a.0 >= self.rows || a.1 >= self.cols || b.0 >= self.rows || b.1 >= self.cols {
            return false;
        }
        self.ensure_matrix();
        let first = self.take_entry(a.0, a.1);
        let second = self.take_entry(b.0, b.1);
        if let Some(entry) = second {
            let _ = self.place_entry(a.0, a.1, entry);
        }
        if let Some(entry) = first {
            let _ = self.place_entry(b.0, b.1, entry);
        }
        true
    }

    /// Fill the board from a generated color matrix
    ///
    /// Hero-occupied cells and cells without a color become empty wrappers;
    /// every other cell receives a fresh idle entry named by `ids`. Cells
    /// outside the matrix are left untouched.
    pub fn apply_color_matrix<I: IdGenerator>(&mut self, colors: &ColorMatrix, ids: &mut I) {
        self.ensure_matrix();
        let mut created = 0usize;
        for row in 0..self.rows.min(colors.rows()) {
            let width = colors.row(row).map_or(0, |r| r.len());
            for col in 0..self.cols.min(width) {
                let color = if self.hero_cells.contains(&(row, col)) {
                    None
                } else {
                    colors.get(row, col).cloned()
                };
                match color {
                    Some(color) => {
                        let entry = BlockEntry::new(color).with_name(ids.next_id("block_core"));
                        let _ = self.place_entry(row, col, entry);
                        created += 1;
                    }
                    None => {
                        if let Some(slot) = self.wrapper_mut(row, col) {
                            *slot = Some(CellWrapper::default());
                        }
                    }
                }
            }
        }
        debug!(
            "applied {}x{} color matrix: {} entries",
            colors.rows(),
            colors.cols(),
            created
        );
    }

    /// Current colors, hero cells and empty cells reading as `None`
    pub fn color_matrix(&self) -> ColorMatrix {
        let mut out = ColorMatrix::new(self.rows, self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.hero_cells.contains(&(row, col)) {
                    continue;
                }
                let color = self
                    .block_entry_at(row, col)
                    .filter(|e| !e.is_hero_linked())
                    .and_then(BlockEntry::match_color)
                    .cloned();
                out.set(row, col, color);
            }
        }
        out
    }

    /// Number of cells holding an entry
    pub fn occupied(&self) -> usize {
        self.matrix
            .iter()
            .flatten()
            .filter(|slot| slot.as_ref().is_some_and(|w| w.entry.is_some()))
            .count()
    }
}

impl Grid for BattleGrid {
    fn ensure_matrix(&mut self) {
        let cols = self.cols;
        self.matrix.truncate(self.rows);
        for row in &mut self.matrix {
            row.truncate(cols);
            row.resize_with(cols, || Some(CellWrapper::default()));
        }
        while self.matrix.len() < self.rows {
            self.matrix
                .push((0..cols).map(|_| Some(CellWrapper::default())).collect());
        }
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn slot(&self, row: usize, col: usize) -> CellSlot<'_> {
        match self.matrix.get(row).and_then(|r| r.get(col)) {
            Some(Some(CellWrapper { entry: Some(entry) })) => CellSlot::Occupied(entry),
            Some(Some(CellWrapper { entry: None })) => CellSlot::EmptyWrapper,
            _ => CellSlot::NoWrapper,
        }
    }

    fn entry_mut(&mut self, row: usize, col: usize) -> Option<&mut BlockEntry> {
        self.wrapper_mut(row, col)
            .and_then(|slot| slot.as_mut())
            .and_then(|wrapper| wrapper.entry.as_mut())
    }

    fn is_hero_occupied_cell(&self, row: usize, col: usize) -> bool {
        self.hero_cells.contains(&(row, col))
    }

    fn post_swap_cascading(&self) -> bool {
        self.post_swap_cascading
    }

    fn set_post_swap_cascading(&mut self, cascading: bool) {
        self.post_swap_cascading = cascading;
    }

    fn request_state(&mut self, state: BoardState) {
        self.board_state = state;
        self.state_requests += 1;
    }
}
