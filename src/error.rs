//! Structured error types for the bordure engine.
//!
//! Malformed span data never surfaces here; the collapse pass repairs it
//! and warns instead. Errors are reserved for caller contract violations:
//! out-of-range boundary indices, impossible row ranges, cells placed past
//! the column bound, and unparseable input.

use thiserror::Error;

/// The unified error type returned by all public bordure API functions.
#[derive(Debug, Error)]
pub enum BordureError {
    /// A horizontal-edge index past the grid's last row boundary.
    #[error("row boundary {index} is out of range ({count} horizontal edge rows)")]
    RowBoundaryOutOfRange { index: usize, count: usize },

    /// A vertical-edge index past the grid's last column boundary.
    #[error("column boundary {index} is out of range ({count} vertical edge columns)")]
    ColumnBoundaryOutOfRange { index: usize, count: usize },

    /// A sub-range that does not fit the edge it was asked of.
    #[error("sub-range {start}..{end} is out of range for an edge of length {len}")]
    EdgeRangeOutOfRange {
        start: usize,
        end: usize,
        len: usize,
    },

    /// A collapse row range that does not fit the cell grid.
    #[error("row range {start}..={finish} does not fit a table of {rows} rows")]
    InvalidRowRange {
        start: usize,
        finish: usize,
        rows: usize,
    },

    /// A cell whose column span crosses the table's right edge.
    #[error("cell at ({row}, {col}) spans past the table's {columns} columns")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        columns: usize,
    },

    /// Two cells claiming the same origin slot.
    #[error("cell origin ({row}, {col}) is already occupied")]
    SlotOccupied { row: usize, col: usize },

    /// JSON input failed to parse as a table description.
    #[error("failed to parse table description: {0}")]
    Parse(#[from] serde_json::Error),
}
