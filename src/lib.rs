//! Blockwars board engine (workspace facade crate).
//!
//! This package exposes `blockwars::{core,engine,adapter,types}` while the
//! implementation lives in dedicated crates under `crates/`. The command line
//! front end is in [`cli`].

pub mod cli;

pub use blockwars_adapter as adapter;
pub use blockwars_core as core;
pub use blockwars_engine as engine;
pub use blockwars_types as types;
