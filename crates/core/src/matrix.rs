//! Color matrix - a rows x cols grid of optional colors
//!
//! `None` marks a cell that takes no color (hero-occupied or empty).

use serde::{Deserialize, Serialize};

use crate::types::BlockColor;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMatrix {
    cells: Vec<Vec<Option<BlockColor>>>,
}

impl ColorMatrix {
    /// Create a matrix with every cell empty
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![None; cols]; rows],
        }
    }

    /// Build from color names; `None` and `""` both become empty cells
    pub fn from_names<R, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<Option<S>>>,
        S: AsRef<str>,
    {
        let cells = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|c| c.map(|s| BlockColor::new(s.as_ref())).filter(|c| !c.is_none()))
                    .collect()
            })
            .collect();
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Width of the first row (0 for an empty matrix)
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Color at (row, col); `None` if empty or out of bounds
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&BlockColor> {
        self.cells.get(row).and_then(|r| r.get(col)).and_then(Option::as_ref)
    }

    /// Color at signed coordinates, `None` outside the matrix
    #[inline]
    pub fn get_signed(&self, row: isize, col: isize) -> Option<&BlockColor> {
        if row < 0 || col < 0 {
            return None;
        }
        self.get(row as usize, col as usize)
    }

    /// Set a cell. Returns false if out of bounds
    pub fn set(&mut self, row: usize, col: usize, color: Option<BlockColor>) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = color.filter(|c| !c.is_none());
                true
            }
            None => false,
        }
    }

    pub fn row(&self, row: usize) -> Option<&[Option<BlockColor>]> {
        self.cells.get(row).map(Vec::as_slice)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<BlockColor>]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Number of cells holding a color
    pub fn filled(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Every row has the same width
    pub fn is_rectangular(&self) -> bool {
        let cols = self.cols();
        self.cells.iter().all(|r| r.len() == cols)
    }
}
