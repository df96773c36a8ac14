//! Board generator - random starting boards without ready-made matches
//!
//! Generation runs in two steps:
//!
//! 1. [`build_match_safe_matrix`] fills cells row by row, picking for each cell
//!    a color that does not complete a run with its already-placed neighbours.
//!    With two colors a cell can be boxed in (`A A ?` with `B B` above), so the
//!    fill backtracks within a step budget. If the budget runs out it redoes the
//!    fill greedily, giving boxed-in cells a random color.
//! 2. [`scrub_matrix_matches`] repairs whatever runs survived, for at most
//!    [`MAX_SCRUB_PASSES`] passes. A run is broken at whichever of its cells can
//!    take another color without completing a new run.
//!
//! The result is best effort: a one-color palette, or hero cells that pin
//! the layout, can still leave runs behind. [`matrix_has_matches`] checks a
//! matrix independently.

use arrayvec::ArrayVec;
use log::trace;

use crate::core::{ColorMatrix, Grid, GridRng};
use crate::types::{BlockColor, Palette, MAX_SCRUB_PASSES, MIN_RUN_LENGTH};

/// Neighbour pairs that would complete a run together with the center cell
type RunPatterns<'a> = ArrayVec<(Option<&'a BlockColor>, Option<&'a BlockColor>), 6>;

fn run_patterns(matrix: &ColorMatrix, row: usize, col: usize) -> RunPatterns<'_> {
    let (r, c) = (row as isize, col as isize);
    let at = move |dr: isize, dc: isize| matrix.get_signed(r + dr, c + dc);

    let mut patterns = ArrayVec::new();
    // Horizontal: two to the left, two to the right, one on each side
    patterns.push((at(0, -1), at(0, -2)));
    patterns.push((at(0, 1), at(0, 2)));
    patterns.push((at(0, -1), at(0, 1)));
    // Vertical
    patterns.push((at(-1, 0), at(-2, 0)));
    patterns.push((at(1, 0), at(2, 0)));
    patterns.push((at(-1, 0), at(1, 0)));
    patterns
}

/// Placing `candidate` at (row, col) would complete a run of three
pub fn creates_run(matrix: &ColorMatrix, row: usize, col: usize, candidate: &BlockColor) -> bool {
    run_patterns(matrix, row, col)
        .iter()
        .any(|&(a, b)| a == Some(candidate) && b == Some(candidate))
}

/// Pick a color for (row, col) that does not complete a local run
///
/// Candidates are drawn from a shuffled copy of the palette without
/// replacement; `replacing` is never chosen. If no candidate is safe a random
/// color is returned regardless, preferring one that differs from `replacing`.
pub fn select_alternate_color<R: GridRng>(
    matrix: &ColorMatrix,
    row: usize,
    col: usize,
    palette: &Palette,
    rng: &mut R,
    replacing: Option<&BlockColor>,
) -> BlockColor {
    let mut pool: Vec<&BlockColor> = palette
        .colors()
        .iter()
        .filter(|c| Some(*c) != replacing)
        .collect();
    rng.shuffle(&mut pool);

    if let Some(safe) = pool.iter().find(|c| !creates_run(matrix, row, col, c)) {
        return (*safe).clone();
    }

    trace!("no safe color at ({}, {}), falling back to random pick", row, col);
    if pool.is_empty() {
        let colors = palette.colors();
        return colors[rng.next_range(colors.len())].clone();
    }
    pool[rng.next_range(pool.len())].clone()
}

/// Search steps allowed per cell before the backtracking fill gives up
const SEARCH_STEPS_PER_CELL: usize = 256;

/// Step 1: fill a rows x cols matrix, leaving `is_hero(row, col)` cells empty
pub fn build_match_safe_matrix<R, F>(
    rows: usize,
    cols: usize,
    is_hero: F,
    palette: &Palette,
    rng: &mut R,
) -> ColorMatrix
where
    R: GridRng,
    F: Fn(usize, usize) -> bool,
{
    let palette = Palette::or_default(Some(palette));
    let cells: Vec<(usize, usize)> = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .filter(|&(row, col)| !is_hero(row, col))
        .collect();

    let mut matrix = ColorMatrix::new(rows, cols);
    let budget = cells.len().saturating_mul(SEARCH_STEPS_PER_CELL);
    if fill_with_backtracking(&mut matrix, &cells, &palette, rng, budget) {
        return matrix;
    }

    trace!("no match-free {}x{} fill within budget, filling greedily", rows, cols);
    let mut matrix = ColorMatrix::new(rows, cols);
    for &(row, col) in &cells {
        let color = select_alternate_color(&matrix, row, col, &palette, rng, None);
        matrix.set(row, col, Some(color));
    }
    matrix
}

/// Depth-first fill of `cells` in order, trying the safe colors of each cell
/// in shuffled order. Returns false (with a partial matrix) when the search
/// is exhausted or takes more than `budget` steps.
fn fill_with_backtracking<R: GridRng>(
    matrix: &mut ColorMatrix,
    cells: &[(usize, usize)],
    palette: &Palette,
    rng: &mut R,
    budget: usize,
) -> bool {
    // Untried candidates for every placed cell, innermost last
    let mut frames: Vec<Vec<BlockColor>> = Vec::with_capacity(cells.len());
    let mut steps = 0usize;

    while frames.len() < cells.len() {
        let (row, col) = cells[frames.len()];
        let mut candidates: Vec<BlockColor> = palette
            .colors()
            .iter()
            .filter(|c| !creates_run(matrix, row, col, c))
            .cloned()
            .collect();
        rng.shuffle(&mut candidates);
        frames.push(candidates);

        loop {
            steps += 1;
            if steps > budget {
                return false;
            }
            let depth = frames.len() - 1;
            let (row, col) = cells[depth];
            match frames[depth].pop() {
                Some(color) => {
                    matrix.set(row, col, Some(color));
                    break;
                }
                None => {
                    matrix.set(row, col, None);
                    frames.pop();
                    if frames.is_empty() {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Give one cell of a three-cell run a color that completes no other run
///
/// Tries the last cell first, then the middle, then the first. Returns the
/// index within `run` that was recolored and its new color. When no cell
/// has a safe alternative, the last cell gets an unsafe pick, which is the
/// run color itself only if the palette has nothing else.
fn repair_run<R: GridRng>(
    matrix: &mut ColorMatrix,
    run: &[(usize, usize)],
    run_color: &BlockColor,
    palette: &Palette,
    rng: &mut R,
) -> (usize, BlockColor) {
    for idx in (0..run.len()).rev() {
        let (row, col) = run[idx];
        let mut alternatives: Vec<&BlockColor> =
            palette.colors().iter().filter(|c| *c != run_color).collect();
        rng.shuffle(&mut alternatives);
        if let Some(safe) = alternatives
            .into_iter()
            .find(|c| !creates_run(matrix, row, col, c))
        {
            matrix.set(row, col, Some(safe.clone()));
            return (idx, safe.clone());
        }
    }

    let last = run.len() - 1;
    let (row, col) = run[last];
    let replacement = select_alternate_color(matrix, row, col, palette, rng, Some(run_color));
    matrix.set(row, col, Some(replacement.clone()));
    (last, replacement)
}

/// Repair runs along one axis. Returns true if any cell changed
fn reroll_runs<R, F>(
    matrix: &mut ColorMatrix,
    lines: usize,
    len: usize,
    at: F,
    palette: &Palette,
    rng: &mut R,
) -> bool
where
    R: GridRng,
    F: Fn(usize, usize) -> (usize, usize),
{
    let mut changed = false;
    let mut run: Vec<(usize, usize)> = Vec::with_capacity(MIN_RUN_LENGTH);
    for line in 0..lines {
        let mut run_color: Option<BlockColor> = None;
        run.clear();
        for i in 0..len {
            let pos = at(line, i);
            let color = matrix.get(pos.0, pos.1).cloned();
            let Some(current) = color.filter(|c| Some(c) == run_color.as_ref()) else {
                run_color = matrix.get(pos.0, pos.1).cloned();
                run.clear();
                if run_color.is_some() {
                    run.push(pos);
                }
                continue;
            };

            run.push(pos);
            if run.len() < MIN_RUN_LENGTH {
                continue;
            }

            let (idx, replacement) = repair_run(matrix, &run, &current, palette, rng);
            if replacement != current {
                changed = true;
            }
            if idx + 1 == run.len() {
                // The run now ends before `pos`
                run_color = Some(replacement);
                run.clear();
                run.push(pos);
            } else {
                run.drain(..=idx);
            }
        }
    }
    changed
}

/// Break every horizontal run
pub fn reroll_row_matches<R: GridRng>(
    matrix: &mut ColorMatrix,
    palette: &Palette,
    rng: &mut R,
) -> bool {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    reroll_runs(matrix, rows, cols, |row, col| (row, col), palette, rng)
}

/// Break every vertical run
pub fn reroll_column_matches<R: GridRng>(
    matrix: &mut ColorMatrix,
    palette: &Palette,
    rng: &mut R,
) -> bool {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    reroll_runs(matrix, cols, rows, |col, row| (row, col), palette, rng)
}

/// Step 2: reroll until a pass changes nothing or the pass budget runs out
///
/// Returns the number of passes that changed the matrix.
pub fn scrub_matrix_matches<R: GridRng>(
    matrix: &mut ColorMatrix,
    palette: &Palette,
    rng: &mut R,
) -> usize {
    let palette = Palette::or_default(Some(palette));
    let mut mutating_passes = 0;
    for _ in 0..MAX_SCRUB_PASSES {
        let rows_changed = reroll_row_matches(matrix, &palette, rng);
        let cols_changed = reroll_column_matches(matrix, &palette, rng);
        if !rows_changed && !cols_changed {
            break;
        }
        mutating_passes += 1;
    }
    mutating_passes
}

/// Any row or column holds a run of 3+ of one color
pub fn matrix_has_matches(matrix: &ColorMatrix) -> bool {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    let line_has_run = |lines: usize, len: usize, at: &dyn Fn(usize, usize) -> (usize, usize)| {
        (0..lines).any(|line| {
            let mut run_color: Option<&BlockColor> = None;
            let mut run_len = 0usize;
            (0..len).any(|i| {
                let (row, col) = at(line, i);
                let color = matrix.get(row, col);
                if color.is_some() && color == run_color {
                    run_len += 1;
                } else {
                    run_color = color;
                    run_len = usize::from(color.is_some());
                }
                run_len >= MIN_RUN_LENGTH
            })
        })
    };
    line_has_run(rows, cols, &|row, col| (row, col))
        || line_has_run(cols, rows, &|col, row| (row, col))
}

/// Produce a match-free color matrix sized for `grid`
///
/// Hero-occupied cells stay empty. The grid itself is not modified. Without a
/// palette (or with an empty one) `red, green, yellow, blue` is used.
pub fn generate_match_free_matrix<G, R>(
    grid: &G,
    palette: Option<&Palette>,
    rng: &mut R,
) -> ColorMatrix
where
    G: Grid + ?Sized,
    R: GridRng,
{
    let palette = Palette::or_default(palette);
    let mut matrix = build_match_safe_matrix(
        grid.rows(),
        grid.cols(),
        |row, col| grid.is_hero_occupied_cell(row, col),
        &palette,
        rng,
    );
    scrub_matrix_matches(&mut matrix, &palette, rng);
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BattleGrid, SimpleRng};

    fn names(rows: Vec<Vec<Option<&str>>>) -> ColorMatrix {
        ColorMatrix::from_names(rows)
    }

    #[test]
    fn creates_run_checks_all_six_patterns() {
        let red = BlockColor::from("red");
        // left pair
        let m = names(vec![vec![Some("red"), Some("red"), None]]);
        assert!(creates_run(&m, 0, 2, &red));
        // right pair
        let m = names(vec![vec![None, Some("red"), Some("red")]]);
        assert!(creates_run(&m, 0, 0, &red));
        // straddle
        let m = names(vec![vec![Some("red"), None, Some("red")]]);
        assert!(creates_run(&m, 0, 1, &red));
        // vertical straddle
        let m = names(vec![vec![Some("red")], vec![None], vec![Some("red")]]);
        assert!(creates_run(&m, 1, 0, &red));
        // mixed pair is safe
        let m = names(vec![vec![Some("red"), Some("blue"), None]]);
        assert!(!creates_run(&m, 0, 2, &red));
    }

    #[test]
    fn select_alternate_color_avoids_runs() {
        let palette = Palette::parse_list("red,blue").unwrap();
        let m = names(vec![vec![Some("red"), Some("red"), None]]);
        let mut rng = SimpleRng::new(3);
        for _ in 0..20 {
            assert_eq!(
                select_alternate_color(&m, 0, 2, &palette, &mut rng, None).as_str(),
                "blue"
            );
        }
    }

    #[test]
    fn select_alternate_color_never_returns_replaced_color() {
        let palette = Palette::parse_list("red,blue").unwrap();
        let m = names(vec![vec![Some("blue"), Some("blue"), None, Some("red"), Some("red")]]);
        let red = BlockColor::from("red");
        let mut rng = SimpleRng::new(11);
        // Both colors complete a run; the fallback still avoids `red`
        for _ in 0..20 {
            let picked = select_alternate_color(&m, 0, 2, &palette, &mut rng, Some(&red));
            assert_eq!(picked.as_str(), "blue");
        }
    }

    #[test]
    fn single_color_palette_falls_back() {
        let palette = Palette::parse_list("red").unwrap();
        let mut rng = SimpleRng::new(1);
        let m = build_match_safe_matrix(1, 4, |_, _| false, &palette, &mut rng);
        assert_eq!(m.filled(), 4);
        assert!(matrix_has_matches(&m));
    }

    #[test]
    fn reroll_row_matches_breaks_long_run() {
        let palette = Palette::default();
        let mut m = names(vec![vec![Some("red"); 6]]);
        let mut rng = SimpleRng::new(9);
        assert!(reroll_row_matches(&mut m, &palette, &mut rng));
        assert!(!matrix_has_matches(&m));
        assert!(!reroll_row_matches(&mut m, &palette, &mut rng));
    }

    #[test]
    fn reroll_breaks_run_at_middle_when_last_cell_is_boxed_in() {
        // Blue at (0, 2) would complete the blue column below it
        let palette = Palette::parse_list("red,blue").unwrap();
        let mut m = names(vec![
            vec![Some("red"), Some("red"), Some("red")],
            vec![Some("red"), Some("blue"), Some("blue")],
            vec![Some("blue"), Some("red"), Some("blue")],
        ]);
        let mut rng = SimpleRng::new(3);
        assert!(reroll_row_matches(&mut m, &palette, &mut rng));
        assert_eq!(m.get(0, 1).map(|c| c.as_str()), Some("blue"));
        assert_eq!(m.get(0, 2).map(|c| c.as_str()), Some("red"));
        assert!(!matrix_has_matches(&m));
    }

    #[test]
    fn two_color_fill_backtracks_out_of_boxed_cells() {
        let palette = Palette::parse_list("red,blue").unwrap();
        for seed in 1..=20 {
            let mut rng = SimpleRng::new(seed);
            let m = build_match_safe_matrix(6, 6, |_, _| false, &palette, &mut rng);
            assert_eq!(m.filled(), 36);
            assert!(!matrix_has_matches(&m), "seed {seed}");
        }
    }

    #[test]
    fn reroll_column_matches_breaks_vertical_run() {
        let palette = Palette::default();
        let mut m = names(vec![vec![Some("green")]; 4]);
        let mut rng = SimpleRng::new(4);
        assert!(reroll_column_matches(&mut m, &palette, &mut rng));
        assert!(!matrix_has_matches(&m));
    }

    #[test]
    fn scrub_stops_after_clean_pass() {
        let palette = Palette::default();
        let mut m = names(vec![vec![Some("red"), Some("blue"), Some("red")]]);
        let mut rng = SimpleRng::new(2);
        assert_eq!(scrub_matrix_matches(&mut m, &palette, &mut rng), 0);
    }

    #[test]
    fn matrix_has_matches_ignores_empty_cells() {
        assert!(!matrix_has_matches(&ColorMatrix::new(4, 4)));
        let m = names(vec![vec![Some("red"), None, Some("red"), Some("red")]]);
        assert!(!matrix_has_matches(&m));
        let m = names(vec![vec![Some("red")], vec![Some("red")], vec![Some("red")]]);
        assert!(matrix_has_matches(&m));
    }

    #[test]
    fn generation_leaves_hero_cells_empty() {
        let mut grid = BattleGrid::new(5, 5);
        grid.set_hero_occupied(2, 2, true);
        let mut rng = SimpleRng::new(77);

        let m = generate_match_free_matrix(&grid, None, &mut rng);
        assert_eq!(m.get(2, 2), None);
        assert_eq!(m.filled(), 24);
        assert!(!matrix_has_matches(&m));
        // Generation does not touch the grid
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let grid = BattleGrid::new(6, 7);
        let a = generate_match_free_matrix(&grid, None, &mut SimpleRng::new(5));
        let b = generate_match_free_matrix(&grid, None, &mut SimpleRng::new(5));
        assert_eq!(a, b);
    }
}
