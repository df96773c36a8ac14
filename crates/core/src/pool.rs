//! Color pool - a fixed color sequence read through independent queues
//!
//! Every player (or board side) reads the same pool with its own cursor, so
//! two boards fed from one pool receive identical refill colors in the same
//! order. Cursors wrap to the start once they pass the end of the pool.

use std::collections::BTreeMap;

use crate::rng::GridRng;
use crate::types::{BlockColor, POOL_COLORS, POOL_FALLBACK_COLOR};

#[derive(Debug, Clone, Default)]
pub struct ColorPool {
    /// Color indices into [`POOL_COLORS`]
    numbers: Vec<u8>,
    /// Last index consumed per queue
    cursors: BTreeMap<u32, usize>,
}

impl ColorPool {
    /// Build from a digit string such as `"0132021..."`
    ///
    /// Digits outside the pool palette and non-digit characters are skipped.
    pub fn from_digits(text: &str) -> Self {
        let numbers = text
            .chars()
            .filter_map(|c| c.to_digit(10))
            .filter(|d| (*d as usize) < POOL_COLORS.len())
            .map(|d| d as u8)
            .collect();
        Self::from_indices(numbers)
    }

    /// Build from raw indices; values outside the palette read as `black`
    pub fn from_indices(numbers: Vec<u8>) -> Self {
        Self {
            numbers,
            cursors: BTreeMap::new(),
        }
    }

    /// Generate a pool of `len` random palette indices
    pub fn generate<R: GridRng>(rng: &mut R, len: usize) -> Self {
        let numbers = (0..len)
            .map(|_| rng.next_range(POOL_COLORS.len()) as u8)
            .collect();
        Self::from_indices(numbers)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Index the next draw on `queue` will read
    fn next_index(&self, queue: u32) -> usize {
        match self.cursors.get(&queue) {
            Some(&current) if current + 1 < self.numbers.len() => current + 1,
            _ => 0,
        }
    }

    /// Treat `current_index` as the last index consumed by `queue`
    pub fn seek(&mut self, queue: u32, current_index: usize) {
        self.cursors.insert(queue, current_index);
    }

    /// Position of the last draw on `queue`, if it has drawn yet
    pub fn cursor(&self, queue: u32) -> Option<usize> {
        self.cursors.get(&queue).copied()
    }

    /// Draw the next palette index for `queue`. An empty pool yields 0
    pub fn next_number(&mut self, queue: u32) -> u8 {
        let index = self.next_index(queue);
        self.cursors.insert(queue, index);
        self.numbers.get(index).copied().unwrap_or(0)
    }

    /// Draw the next color for `queue`
    pub fn next_color(&mut self, queue: u32) -> BlockColor {
        color_for(self.next_number(queue))
    }

    /// Color the next draw on `queue` would return, without consuming it
    pub fn peek_color(&self, queue: u32) -> BlockColor {
        color_for(self.numbers.get(self.next_index(queue)).copied().unwrap_or(0))
    }
}

fn color_for(number: u8) -> BlockColor {
    POOL_COLORS
        .get(number as usize)
        .copied()
        .unwrap_or(POOL_FALLBACK_COLOR)
        .into()
}
