//! Board snapshots - serialized blocks with a checksum
//!
//! The checksum is the CRC-32 of the JSON-encoded `(rows, cols, blocks)`
//! triple, so a snapshot edited by hand (or truncated in transit) is rejected
//! on decode, dimensions included. Boards larger than [`MAX_SNAPSHOT_CELLS`]
//! are refused before anything is allocated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checksum::crc32_hex;
use crate::core::{BattleGrid, BlockEntry, BlockRecord, Grid, IdGenerator};
use crate::engine::serialize_blocks;

/// Largest board (rows times cols) a snapshot may describe
pub const MAX_SNAPSHOT_CELLS: usize = 4096;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("checksum mismatch: recorded {recorded}, computed {computed}")]
    ChecksumMismatch { recorded: String, computed: String },
    #[error("block at ({row}, {column}) lies outside a {rows}x{cols} board")]
    OutOfBounds {
        row: i32,
        column: i32,
        rows: usize,
        cols: usize,
    },
    #[error("two blocks claim cell ({row}, {column})")]
    DuplicateCell { row: i32, column: i32 },
    #[error("a {rows}x{cols} board is too large for a snapshot")]
    InvalidDimensions { rows: usize, cols: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub blocks: Vec<BlockRecord>,
    pub checksum: String,
}

fn snapshot_checksum(
    rows: usize,
    cols: usize,
    blocks: &[BlockRecord],
) -> Result<String, SnapshotError> {
    Ok(crc32_hex(&serde_json::to_string(&(rows, cols, blocks))?))
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), SnapshotError> {
    match rows.checked_mul(cols) {
        Some(cells) if cells <= MAX_SNAPSHOT_CELLS => Ok(()),
        _ => Err(SnapshotError::InvalidDimensions { rows, cols }),
    }
}

impl BoardSnapshot {
    /// Serialize every block on `grid`
    pub fn capture<G: Grid + ?Sized>(grid: &mut G) -> Result<Self, SnapshotError> {
        let (rows, cols) = (grid.rows(), grid.cols());
        check_dimensions(rows, cols)?;
        let blocks = serialize_blocks(grid);
        let checksum = snapshot_checksum(rows, cols, &blocks)?;
        Ok(Self {
            rows,
            cols,
            blocks,
            checksum,
        })
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode, then check dimensions and checksum
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(text)?;
        snapshot.verify()?;
        Ok(snapshot)
    }

    pub fn verify(&self) -> Result<(), SnapshotError> {
        check_dimensions(self.rows, self.cols)?;
        let computed = snapshot_checksum(self.rows, self.cols, &self.blocks)?;
        if !computed.eq_ignore_ascii_case(&self.checksum) {
            return Err(SnapshotError::ChecksumMismatch {
                recorded: self.checksum.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// Rebuild a grid holding one idle entry per record
    ///
    /// Entries get fresh names from `ids`; extra fields from custom
    /// serializers are not restored.
    pub fn restore<I: IdGenerator>(&self, ids: &mut I) -> Result<BattleGrid, SnapshotError> {
        check_dimensions(self.rows, self.cols)?;
        let mut grid = BattleGrid::new(self.rows, self.cols);
        grid.ensure_matrix();
        for record in &self.blocks {
            let out_of_bounds = SnapshotError::OutOfBounds {
                row: record.row,
                column: record.column,
                rows: self.rows,
                cols: self.cols,
            };
            let (Ok(row), Ok(col)) = (usize::try_from(record.row), usize::try_from(record.column))
            else {
                return Err(out_of_bounds);
            };
            if grid.block_entry_at(row, col).is_some() {
                return Err(SnapshotError::DuplicateCell {
                    row: record.row,
                    column: record.column,
                });
            }
            let entry = BlockEntry::new(record.block_color.clone())
                .with_health(record.health)
                .with_name(ids.next_id("block_core"));
            if grid.place_entry(row, col, entry).is_err() {
                return Err(out_of_bounds);
            }
        }
        Ok(grid)
    }
}
