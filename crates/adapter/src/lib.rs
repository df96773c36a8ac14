//! Adapter module - everything between the engine and a hosting scene
//!
//! The engine itself only sees the [`Grid`](core::Grid) capability. This crate
//! covers the pieces a host needs around it:
//!
//! - [`config`]: board size, seed and palette from the environment
//! - [`layout`]: pixel positions of grid cells
//! - [`scene`]: drag items and the [`SceneHost`](scene::SceneHost) seam
//! - [`spawn`]: building blocks (with an optional drop-in) and sidebar cards
//! - [`checksum`] and [`snapshot`]: serialized boards that detect tampering
//!
//! # Example
//!
//! ```
//! use blockwars_adapter::snapshot::BoardSnapshot;
//! use blockwars_core::{BattleGrid, SequentialIds, SimpleRng};
//! use blockwars_engine::generate_match_free_matrix;
//!
//! let mut grid = BattleGrid::new(4, 4);
//! let colors = generate_match_free_matrix(&grid, None, &mut SimpleRng::new(9));
//! grid.apply_color_matrix(&colors, &mut SequentialIds::with_epoch(0));
//!
//! let json = BoardSnapshot::capture(&mut grid).unwrap().to_json().unwrap();
//! let restored = BoardSnapshot::from_json(&json).unwrap();
//! assert_eq!(restored.blocks.len(), 16);
//! ```

pub mod checksum;
pub mod config;
pub mod layout;
pub mod scene;
pub mod snapshot;
pub mod spawn;

pub use blockwars_core as core;
pub use blockwars_engine as engine;
pub use blockwars_types as types;

pub use checksum::crc32_hex;
pub use config::{ConfigError, GridConfig};
pub use layout::{GridLayout, GridPos};
pub use scene::{DragItem, DropPhase, SceneHost, SceneRegistry};
pub use snapshot::{BoardSnapshot, SnapshotError, MAX_SNAPSHOT_CELLS};
pub use spawn::{
    spawn_block, spawn_card, BlockSpawnOptions, CardSpawnOptions, HeroPreview, SpawnedBlock,
    SpawnedCard,
};
