//! Idle and cascade tracking
//!
//! The predicates differ only in how they treat a missing cell (no wrapper,
//! or a wrapper without an entry):
//!
//! | Predicate | Missing cell | Non-idle entry |
//! |-----------|--------------|----------------|
//! | [`all_entries_idle_allow_missing`] | skipped | fails unless hero-exempt |
//! | [`all_entries_idle_no_missing`] | fails unless hero-exempt | fails unless hero-exempt |
//! | [`all_entries_idle_destroyed_or_missing`] | skipped | fails unless `idle`/`destroyed` or hero-exempt |
//! | [`has_missing_or_destroyed_blocks`] | `true` at once | `true` if `destroyed` |
//!
//! Every predicate materializes the matrix first and compares normalized states.

use log::debug;

use crate::core::{BlockEntry, Grid};
use crate::types::{BlockState, BoardState};

/// A hero-occupied cell, or an entry linked to a hero, counts as settled
/// whatever its state.
pub fn hero_cell_fulfills_idle<G: Grid + ?Sized>(
    grid: &G,
    row: usize,
    col: usize,
    entry: Option<&BlockEntry>,
) -> bool {
    grid.is_hero_occupied_cell(row, col) || entry.is_some_and(BlockEntry::is_hero_linked)
}

fn normalized<G: Grid + ?Sized>(grid: &G, entry: &BlockEntry) -> BlockState {
    grid.normalize_state(entry.block_state())
}

/// Every present entry is idle; missing cells are ignored
pub fn all_entries_idle_allow_missing<G: Grid + ?Sized>(grid: &mut G) -> bool {
    grid.ensure_matrix();
    let grid: &G = grid;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let Some(entry) = grid.block_entry_at(row, col) else {
                continue;
            };
            if normalized(grid, entry) != BlockState::Idle
                && !hero_cell_fulfills_idle(grid, row, col, Some(entry))
            {
                return false;
            }
        }
    }
    true
}

/// Every cell holds an idle entry; only hero cells may be missing or busy
pub fn all_entries_idle_no_missing<G: Grid + ?Sized>(grid: &mut G) -> bool {
    grid.ensure_matrix();
    let grid: &G = grid;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let entry = grid.block_entry_at(row, col);
            let settled = entry.is_some_and(|e| normalized(grid, e) == BlockState::Idle);
            if !settled && !hero_cell_fulfills_idle(grid, row, col, entry) {
                return false;
            }
        }
    }
    true
}

/// Every present entry is idle or destroyed; missing cells are ignored
pub fn all_entries_idle_destroyed_or_missing<G: Grid + ?Sized>(grid: &mut G) -> bool {
    grid.ensure_matrix();
    let grid: &G = grid;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let Some(entry) = grid.block_entry_at(row, col) else {
                continue;
            };
            let state = normalized(grid, entry);
            if state != BlockState::Idle
                && state != BlockState::Destroyed
                && !hero_cell_fulfills_idle(grid, row, col, Some(entry))
            {
                return false;
            }
        }
    }
    true
}

/// Some cell is missing its entry, or holds a destroyed one
pub fn has_missing_or_destroyed_blocks<G: Grid + ?Sized>(grid: &mut G) -> bool {
    grid.ensure_matrix();
    let grid: &G = grid;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            match grid.block_entry_at(row, col) {
                None => return true,
                Some(entry) if normalized(grid, entry) == BlockState::Destroyed => return true,
                Some(_) => {}
            }
        }
    }
    false
}

/// Some entry is launching, matching or exploding
pub fn has_active_non_idle_blocks<G: Grid + ?Sized>(grid: &mut G) -> bool {
    grid.ensure_matrix();
    let grid: &G = grid;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if let Some(entry) = grid.block_entry_at(row, col) {
                if normalized(grid, entry).is_active() {
                    return true;
                }
            }
        }
    }
    false
}

/// Some entry is flagged `matched`
pub fn has_matched_blocks<G: Grid + ?Sized>(grid: &mut G) -> bool {
    grid.ensure_matrix();
    let grid: &G = grid;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if let Some(entry) = grid.block_entry_at(row, col) {
                if normalized(grid, entry) == BlockState::Matched {
                    return true;
                }
            }
        }
    }
    false
}

/// End a post-swap cascade once the board has refilled and nothing is active
///
/// Returns true only on the call that clears the cascading flag; the board is
/// asked to go idle exactly then. Every other call is a no-op.
pub fn handle_post_swap_cascade_resolution<G: Grid + ?Sized>(grid: &mut G) -> bool {
    if !grid.post_swap_cascading() {
        return false;
    }
    if has_missing_or_destroyed_blocks(grid) {
        return false;
    }
    if has_active_non_idle_blocks(grid) {
        return false;
    }
    grid.set_post_swap_cascading(false);
    grid.request_state(BoardState::Idle);
    debug!("post-swap cascade resolved on {}x{} grid", grid.rows(), grid.cols());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BattleGrid, HeroLink};

    fn filled(rows: usize, cols: usize) -> BattleGrid {
        let mut grid = BattleGrid::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                grid.place_entry(row, col, BlockEntry::new("red")).unwrap();
            }
        }
        grid
    }

    fn set_state(grid: &mut BattleGrid, row: usize, col: usize, state: BlockState) {
        grid.entry_mut(row, col).unwrap().set_block_state(state);
    }

    #[test]
    fn hero_link_on_entry_exempts_cell() {
        let mut grid = filled(1, 2);
        grid.entry_mut(0, 1).unwrap().hero = HeroLink {
            hero_linked: true,
            ..HeroLink::default()
        };
        set_state(&mut grid, 0, 1, BlockState::Launch);

        assert!(all_entries_idle_allow_missing(&mut grid));
        assert!(all_entries_idle_no_missing(&mut grid));
        // Activity checks do not look at hero links
        assert!(has_active_non_idle_blocks(&mut grid));
    }

    #[test]
    fn missing_hero_cell_passes_strict_check() {
        let mut grid = filled(1, 2);
        grid.take_entry(0, 0);
        assert!(!all_entries_idle_no_missing(&mut grid));

        grid.set_hero_occupied(0, 0, true);
        assert!(all_entries_idle_no_missing(&mut grid));
        // ...but still counts as missing for cascade purposes
        assert!(has_missing_or_destroyed_blocks(&mut grid));
    }

    #[test]
    fn destroyed_is_tolerated_only_by_destroyed_or_missing() {
        let mut grid = filled(2, 2);
        set_state(&mut grid, 1, 1, BlockState::Destroyed);

        assert!(!all_entries_idle_allow_missing(&mut grid));
        assert!(all_entries_idle_destroyed_or_missing(&mut grid));
        assert!(has_missing_or_destroyed_blocks(&mut grid));
    }

    #[test]
    fn matched_detection() {
        let mut grid = filled(2, 2);
        assert!(!has_matched_blocks(&mut grid));
        set_state(&mut grid, 0, 1, BlockState::Matched);
        assert!(has_matched_blocks(&mut grid));
        assert!(!has_active_non_idle_blocks(&mut grid));
    }

    #[test]
    fn cascade_waits_for_active_blocks() {
        let mut grid = filled(2, 2);
        grid.set_post_swap_cascading(true);
        set_state(&mut grid, 0, 0, BlockState::Explode);

        assert!(!handle_post_swap_cascade_resolution(&mut grid));
        assert!(grid.post_swap_cascading());

        set_state(&mut grid, 0, 0, BlockState::Idle);
        assert!(handle_post_swap_cascade_resolution(&mut grid));
        assert!(!grid.post_swap_cascading());
        assert_eq!(grid.board_state(), BoardState::Idle);
    }

    #[test]
    fn cascade_waits_for_refill() {
        let mut grid = filled(2, 2);
        grid.set_post_swap_cascading(true);
        grid.take_entry(1, 0);

        assert!(!handle_post_swap_cascade_resolution(&mut grid));
        assert_eq!(grid.state_requests(), 0);
    }

    #[test]
    fn cascade_ignores_idle_board_without_flag() {
        let mut grid = filled(2, 2);
        assert!(!handle_post_swap_cascade_resolution(&mut grid));
        assert_eq!(grid.state_requests(), 0);
    }
}
