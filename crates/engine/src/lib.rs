//! Resolution engine - match detection, settle tracking and board generation
//!
//! Everything here works through the [`Grid`](core::Grid) capability; the
//! engine never creates or destroys entries. The only state it writes is the
//! `matched`/`idle` flag set by [`mark_matched_blocks`].
//!
//! # Module Structure
//!
//! - [`matching`]: horizontal and vertical run detection
//! - [`idle`]: settle predicates and post-swap cascade resolution
//! - [`generator`]: match-free starting boards
//! - [`serialize`]: flattening the board into block records
//!
//! # Example
//!
//! ```
//! use blockwars_core::{BattleGrid, BlockEntry};
//! use blockwars_engine::{all_entries_idle_allow_missing, mark_matched_blocks};
//!
//! let mut grid = BattleGrid::new(1, 5);
//! for (col, color) in ["red", "red", "red", "blue", "green"].into_iter().enumerate() {
//!     let entry = BlockEntry::new(color).with_name(format!("b{}", col));
//!     grid.place_entry(0, col, entry).unwrap();
//! }
//!
//! let report = mark_matched_blocks(&mut grid);
//! assert_eq!(report.matches, ["b0", "b1", "b2"]);
//! assert!(!all_entries_idle_allow_missing(&mut grid));
//! ```

pub mod generator;
pub mod idle;
pub mod matching;
pub mod serialize;

pub use blockwars_core as core;
pub use blockwars_types as types;

pub use generator::{
    build_match_safe_matrix, creates_run, generate_match_free_matrix, matrix_has_matches,
    reroll_column_matches, reroll_row_matches, scrub_matrix_matches, select_alternate_color,
};
pub use idle::{
    all_entries_idle_allow_missing, all_entries_idle_destroyed_or_missing,
    all_entries_idle_no_missing, handle_post_swap_cascade_resolution, has_active_non_idle_blocks,
    has_matched_blocks, has_missing_or_destroyed_blocks, hero_cell_fulfills_idle,
};
pub use matching::{find_matched_cells, mark_matched_blocks, MatchReport};
pub use serialize::serialize_blocks;
