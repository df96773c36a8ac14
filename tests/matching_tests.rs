//! Match detection through the facade

use blockwars::core::{BattleGrid, BlockEntry, Grid, HeroLink};
use blockwars::engine::{find_matched_cells, has_matched_blocks, mark_matched_blocks};
use blockwars::types::BlockState;

fn grid_from(rows: &[&[&str]]) -> BattleGrid {
    let mut grid = BattleGrid::new(rows.len(), rows[0].len());
    for (r, row) in rows.iter().enumerate() {
        for (c, color) in row.iter().enumerate() {
            if color.is_empty() {
                continue;
            }
            let entry = BlockEntry::new(*color).with_name(format!("{}_{}_{}", color, r, c));
            grid.place_entry(r, c, entry).unwrap();
        }
    }
    grid
}

fn state_at(grid: &BattleGrid, row: usize, col: usize) -> BlockState {
    grid.block_entry_at(row, col).unwrap().block_state()
}

#[test]
fn test_single_row_scenario() {
    let mut grid = grid_from(&[&["red", "red", "red", "blue", "green"]]);
    let report = mark_matched_blocks(&mut grid);

    assert_eq!(report.matches, ["red_0_0", "red_0_1", "red_0_2"]);
    assert_eq!(state_at(&grid, 0, 3), BlockState::Idle);
    assert_eq!(state_at(&grid, 0, 4), BlockState::Idle);
}

#[test]
fn test_vertical_run() {
    let mut grid = grid_from(&[
        &["blue", "green", "red"],
        &["blue", "red", "green"],
        &["blue", "green", "red"],
    ]);
    let report = mark_matched_blocks(&mut grid);
    assert_eq!(report.cells, [(0, 0), (1, 0), (2, 0)]);
}

#[test]
fn test_long_run_and_separate_runs() {
    let mut grid = grid_from(&[
        &["red", "red", "red", "red", "blue"],
        &["green", "blue", "green", "blue", "blue"],
        &["yellow", "yellow", "yellow", "green", "blue"],
    ]);
    let report = mark_matched_blocks(&mut grid);

    // Row 0 run of four, row 2 run of three, column 4 run of three
    assert_eq!(report.cells.len(), 4 + 3 + 3);
    assert!(report.matches.iter().any(|n| n == "red_0_3"));
    assert!(report.matches.iter().any(|n| n == "blue_2_4"));
    assert!(!report.matches.iter().any(|n| n == "green_1_0"));
}

#[test]
fn test_l_shape_counts_corner_once() {
    let mut grid = grid_from(&[
        &["red", "blue", "green"],
        &["red", "green", "blue"],
        &["red", "red", "red"],
    ]);
    let report = mark_matched_blocks(&mut grid);
    assert_eq!(report.cells.len(), 5);
    let corner = report.matches.iter().filter(|n| *n == "red_2_0").count();
    assert_eq!(corner, 1);
}

#[test]
fn test_repeated_pass_is_stable() {
    let mut grid = grid_from(&[&["red", "red", "red", "blue"]]);
    let first = mark_matched_blocks(&mut grid);
    let second = mark_matched_blocks(&mut grid);
    assert_eq!(first, second);
}

#[test]
fn test_stale_matched_flag_is_cleared() {
    let mut grid = grid_from(&[&["red", "blue", "red", "blue"]]);
    grid.entry_mut(0, 1)
        .unwrap()
        .set_block_state(BlockState::Matched);
    grid.entry_mut(0, 2)
        .unwrap()
        .set_block_state(BlockState::Explode);

    let report = mark_matched_blocks(&mut grid);
    assert!(report.is_empty());
    assert_eq!(state_at(&grid, 0, 1), BlockState::Idle);
    // Only stale `matched` flags are touched
    assert_eq!(state_at(&grid, 0, 2), BlockState::Explode);
    assert!(!has_matched_blocks(&mut grid));
}

#[test]
fn test_broken_run_loses_flag_after_swap() {
    let mut grid = grid_from(&[&["red", "red", "red", "blue"]]);
    mark_matched_blocks(&mut grid);
    assert!(has_matched_blocks(&mut grid));

    assert!(grid.swap_entries((0, 2), (0, 3)));
    let report = mark_matched_blocks(&mut grid);
    assert!(report.is_empty());
    assert!(!has_matched_blocks(&mut grid));
}

#[test]
fn test_hero_linked_entry_is_exempt() {
    let mut grid = grid_from(&[&["red", "red", "red"]]);
    grid.entry_mut(0, 2).unwrap().hero = HeroLink::bound("hero_7");
    assert!(mark_matched_blocks(&mut grid).is_empty());
}

#[test]
fn test_missing_wrapper_breaks_run() {
    let mut grid = grid_from(&[&["red", "red", "red", "red"]]);
    grid.remove_wrapper(0, 1);
    assert!(find_matched_cells(&mut grid).is_empty());
}

#[test]
fn test_state_listener_sees_matched_transition() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut grid = grid_from(&[&["red", "red", ""]]);
    let log = Rc::clone(&seen);
    let entry = BlockEntry::new("red")
        .with_name("watched")
        .with_state_listener(move |e, previous| {
            log.borrow_mut().push((previous, e.block_state()));
        });
    grid.place_entry(0, 2, entry).unwrap();

    mark_matched_blocks(&mut grid);
    mark_matched_blocks(&mut grid);
    assert_eq!(*seen.borrow(), [(BlockState::Idle, BlockState::Matched)]);
}
