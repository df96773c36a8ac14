//! Layout math - pixel positions for cells laid out in a grid

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Position of a linear index inside a [`GridLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: f64,
    pub y: f64,
    pub row: usize,
    pub col: usize,
}

/// Cell size, spacing and origin of a laid-out grid
///
/// Zero values fall back to the defaults (6 columns of 64x64 cells, 8px gaps,
/// origin at 0,0), so a partially filled layout still produces positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridLayout {
    pub cols: usize,
    pub cell_w: f64,
    pub cell_h: f64,
    pub gap_x: f64,
    pub gap_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cols: 6,
            cell_w: 64.0,
            cell_h: 64.0,
            gap_x: 8.0,
            gap_y: 8.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

fn or_default(value: f64, default: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        default
    } else {
        value
    }
}

impl GridLayout {
    /// A default layout with `cols` columns
    pub fn with_cols(cols: usize) -> Self {
        Self {
            cols,
            ..Self::default()
        }
    }

    fn resolved(&self) -> Self {
        let d = Self::default();
        Self {
            cols: if self.cols == 0 { d.cols } else { self.cols },
            cell_w: or_default(self.cell_w, d.cell_w),
            cell_h: or_default(self.cell_h, d.cell_h),
            gap_x: or_default(self.gap_x, d.gap_x),
            gap_y: or_default(self.gap_y, d.gap_y),
            origin_x: or_default(self.origin_x, d.origin_x),
            origin_y: or_default(self.origin_y, d.origin_y),
        }
    }

    /// Row, column and top-left pixel of the `index`-th cell
    pub fn position(&self, index: usize) -> GridPos {
        let o = self.resolved();
        let col = index % o.cols;
        let row = index / o.cols;
        GridPos {
            x: o.origin_x + col as f64 * (o.cell_w + o.gap_x),
            y: o.origin_y + row as f64 * (o.cell_h + o.gap_y),
            row,
            col,
        }
    }

    /// Top-left pixel of the cell at (row, col)
    pub fn cell_position(&self, row: usize, col: usize) -> Point {
        let o = self.resolved();
        Point::new(
            o.origin_x + col as f64 * (o.cell_w + o.gap_x),
            o.origin_y + row as f64 * (o.cell_h + o.gap_y),
        )
    }
}
