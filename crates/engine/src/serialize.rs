//! Serializer - flatten the board into block records

use crate::core::{BlockRecord, Grid};

/// Records for every occupied cell, row-major
///
/// Empty wrappers and absent cells are skipped. Entries carrying a custom
/// serializer produce whatever it returns.
pub fn serialize_blocks<G: Grid + ?Sized>(grid: &mut G) -> Vec<BlockRecord> {
    grid.ensure_matrix();
    let grid: &G = grid;
    let mut records = Vec::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if let Some(entry) = grid.slot(row, col).entry() {
                records.push(entry.to_record());
            }
        }
    }
    records
}
