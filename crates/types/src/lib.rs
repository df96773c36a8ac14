//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no engine logic attached, making them usable
//! from the grid store, the resolution engine and the scene adapter alike.
//!
//! # Board Rules
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_RUN_LENGTH` | 3 | Shortest same-color run that counts as a match |
//! | `MAX_SCRUB_PASSES` | 8 | Reroll passes the board generator attempts |
//! | `DEFAULT_HEALTH` | 5 | Health assigned to freshly generated blocks |
//!
//! # Palettes
//!
//! The generator palette defaults to `red, green, yellow, blue`. The color pool
//! uses its own index order (`red, blue, yellow, green`) and reports `black`
//! for indices it cannot map.
//!
//! # Examples
//!
//! ```
//! use blockwars_types::{BlockColor, BlockState, Palette};
//!
//! // Parse a state (case-insensitive)
//! assert_eq!(BlockState::from_str("Matched"), Some(BlockState::Matched));
//!
//! // Empty colors never take part in matching
//! assert!(BlockColor::none().is_none());
//!
//! // Palettes parse from comma separated lists
//! let palette = Palette::parse_list("red, blue").unwrap();
//! assert_eq!(palette.len(), 2);
//! assert_eq!(Palette::default().len(), 4);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shortest run of same-colored cells that counts as a match
pub const MIN_RUN_LENGTH: usize = 3;

/// Upper bound on reroll passes when scrubbing a generated board
pub const MAX_SCRUB_PASSES: usize = 8;

/// Health assigned to blocks created from a generated color matrix
pub const DEFAULT_HEALTH: i32 = 5;

/// Generator palette used when the caller supplies none
pub const DEFAULT_PALETTE: [&str; 4] = ["red", "green", "yellow", "blue"];

/// Color pool index order
pub const POOL_COLORS: [&str; 4] = ["red", "blue", "yellow", "green"];

/// Color reported by the pool for indices outside [`POOL_COLORS`]
pub const POOL_FALLBACK_COLOR: &str = "black";

/// Color given to spawned blocks when none is requested
pub const DEFAULT_BLOCK_COLOR: &str = "red";

/// A block color name
///
/// An empty name means "no color": such blocks never take part in run
/// detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockColor(String);

impl BlockColor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The empty color
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the color is empty
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    /// `Some(self)` unless the color is empty
    pub fn as_match_color(&self) -> Option<&BlockColor> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

impl From<&str> for BlockColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BlockColor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BlockColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered, non-empty set of colors the board generator draws from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<BlockColor>,
}

impl Palette {
    /// Build a palette, dropping empty names and duplicates.
    ///
    /// Returns `None` if nothing usable is left.
    pub fn new<I, C>(colors: I) -> Option<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<BlockColor>,
    {
        let mut out: Vec<BlockColor> = Vec::new();
        for color in colors {
            let color = color.into();
            if color.is_none() || out.contains(&color) {
                continue;
            }
            out.push(color);
        }
        if out.is_empty() {
            None
        } else {
            Some(Self { colors: out })
        }
    }

    /// Parse a comma separated list such as `"red,green, blue"`
    pub fn parse_list(s: &str) -> Option<Self> {
        Self::new(s.split(',').map(str::trim))
    }

    /// The supplied palette, or the default one when it is missing or empty
    pub fn or_default(palette: Option<&Palette>) -> Palette {
        match palette {
            Some(p) if !p.is_empty() => p.clone(),
            _ => Palette::default(),
        }
    }

    pub fn colors(&self) -> &[BlockColor] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<&BlockColor> {
        self.colors.get(index)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| BlockColor::from(*c)).collect(),
        }
    }
}

/// Lifecycle state of a single block
///
/// The engine only ever writes `Matched` (and demotes stale `Matched` back to
/// `Idle`); every other transition belongs to gameplay code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockState {
    #[default]
    Idle,
    Animating,
    Launch,
    Match,
    Matched,
    Explode,
    Destroyed,
}

impl BlockState {
    /// Parse a state name (case-insensitive, surrounding whitespace ignored)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockwars_types::BlockState;
    ///
    /// assert_eq!(BlockState::from_str("idle"), Some(BlockState::Idle));
    /// assert_eq!(BlockState::from_str(" EXPLODE "), Some(BlockState::Explode));
    /// assert_eq!(BlockState::from_str("sleeping"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "idle" => Some(BlockState::Idle),
            "animating" => Some(BlockState::Animating),
            "launch" => Some(BlockState::Launch),
            "match" => Some(BlockState::Match),
            "matched" => Some(BlockState::Matched),
            "explode" => Some(BlockState::Explode),
            "destroyed" => Some(BlockState::Destroyed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockState::Idle => "idle",
            BlockState::Animating => "animating",
            BlockState::Launch => "launch",
            BlockState::Match => "match",
            BlockState::Matched => "matched",
            BlockState::Explode => "explode",
            BlockState::Destroyed => "destroyed",
        }
    }

    /// States that keep a cascade running (`launch`, `match`, `explode`)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BlockState::Launch | BlockState::Match | BlockState::Explode
        )
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall board state a grid host can be asked to enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardState {
    #[default]
    Idle,
    Swapping,
    Cascading,
}

impl BoardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardState::Idle => "idle",
            BoardState::Swapping => "swapping",
            BoardState::Cascading => "cascading",
        }
    }
}

/// A pixel position in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
