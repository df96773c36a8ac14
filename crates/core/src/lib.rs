//! Core grid module - block entries, the grid capability and its in-memory store
//!
//! This crate holds the data the resolution engine works on. It has no
//! dependencies on rendering, input or the scene graph:
//!
//! - **Explicit**: a cell is one of `NoWrapper`, `EmptyWrapper` or `Occupied`,
//!   never an implicit null
//! - **Deterministic**: every random choice goes through an injected [`GridRng`]
//! - **Host-agnostic**: the engine only talks to the [`Grid`] trait, so any
//!   scene can expose its own board
//!
//! # Module Structure
//!
//! - [`entry`]: block entries, hero linkage and optional entry capabilities
//! - [`grid`]: the [`Grid`] capability trait, cell slots and [`BattleGrid`]
//! - [`matrix`]: plain color matrices produced by the board generator
//! - [`rng`]: the [`GridRng`] trait and a seedable LCG
//! - [`pool`]: per-queue color sequences for refilling the board
//! - [`ids`]: injected item name generation
//!
//! # Example
//!
//! ```
//! use blockwars_core::{BattleGrid, BlockEntry, Grid};
//! use blockwars_types::BlockState;
//!
//! let mut grid = BattleGrid::new(2, 2);
//! grid.ensure_matrix();
//! grid.place_entry(0, 1, BlockEntry::new("red").with_name("block_a")).unwrap();
//!
//! let entry = grid.block_entry_at(0, 1).unwrap();
//! assert_eq!(entry.block_state(), BlockState::Idle);
//! assert!(grid.block_entry_at(1, 1).is_none());
//! ```

pub mod entry;
pub mod grid;
pub mod ids;
pub mod matrix;
pub mod pool;
pub mod rng;

pub use blockwars_types as types;

pub use entry::{BlockEntry, BlockRecord, EntryCapabilities, HeroLink};
pub use grid::{BattleGrid, CellSlot, CellWrapper, Grid};
pub use ids::{IdGenerator, SequentialIds};
pub use matrix::ColorMatrix;
pub use pool::ColorPool;
pub use rng::{GridRng, SimpleRng};
