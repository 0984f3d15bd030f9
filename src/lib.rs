//! # Bordure
//!
//! The border-collapsing engine for page-native table layout.
//!
//! A table cell grid is over-specified about its borders: every interior
//! edge is claimed by two cells, the outer ring is claimed again by the
//! table's own frame, and row/column spans stretch one request across
//! many edges. Painting the requests as-is gives doubled lines and
//! mismatched weights at every junction. And once a table breaks across
//! pages, the edge at the split has to match what the previous page
//! already committed.
//!
//! Bordure resolves all of it up front, CSS-table style: **the widest
//! border wins every shared edge**, equal-width ties go to the edge
//! evaluated later (bottom and right), and the result is written back
//! onto the cells so the painter never sees a losing request.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]     — cells, spans, border requests, table frame
//!       ↓
//!   [collapse]  — widest-wins resolution into one shared border grid
//!       ↓
//!   queries     — per-edge lookups, page-fragment edges, width reservation
//! ```
//!
//! The engine is synchronous and owns nothing shared: one engine, one
//! border grid, one in-flight layout pass per table.

pub mod collapse;
pub mod error;
pub mod model;

use collapse::CollapseEngine;
use error::BordureError;
use model::{CellGrid, FrameBorders, TableSpec};

/// Collapse a whole table in one pass.
///
/// This is the primary entry point. Resolves every shared edge of the
/// grid, mutating the cells' border requests in place, and returns the
/// engine holding the resolved border grid for queries.
pub fn collapse(cells: &mut CellGrid, frame: FrameBorders) -> Result<CollapseEngine, BordureError> {
    let mut engine = CollapseEngine::new(cells.num_columns());
    if cells.num_rows() > 0 {
        let finish = cells.num_rows() - 1;
        engine.collapse(cells, frame, 0, finish)?;
    }
    Ok(engine)
}

/// Collapse a table described as JSON.
///
/// Parses a [`TableSpec`] document, builds the cell grid, and collapses
/// it. Returns the mutated cell grid alongside the engine.
pub fn collapse_json(json: &str) -> Result<(CellGrid, CollapseEngine), BordureError> {
    let spec: TableSpec = serde_json::from_str(json)?;
    let (mut cells, frame) = spec.into_grid()?;
    let engine = collapse(&mut cells, frame)?;
    Ok((cells, engine))
}
