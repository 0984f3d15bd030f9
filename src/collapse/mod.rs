//! # Border Collapsing
//!
//! This is the heart of bordure and the reason it exists.
//!
//! A table grid where every cell carries its own four border requests is
//! over-specified: each interior edge is claimed by two cells, the outer
//! ring is also claimed by the table frame, and a row or column span makes
//! a single request stretch across several edges. Painting what every cell
//! asks for produces doubled lines and mismatched weights, the classic
//! broken-table look.
//!
//! The collapse pass resolves the conflict once, up front:
//!
//! 1. Rows fully consumed by spans from earlier rows are elided, and the
//!    spans that crossed them shrink to match.
//! 2. Every cell's four sides are folded into a shared [`BorderGrid`],
//!    widest request first, with bottom and right edges allowed to break
//!    equal-width ties because they are evaluated with more complete
//!    information.
//! 3. Whenever the grid already holds a winning border, the losing cell's
//!    own request is overwritten in place, so the cell renders the edge
//!    the table agreed on rather than the one it asked for.
//!
//! Before a cell commits its own sides, every structurally adjacent cell
//! gets its sides folded in first. Two cells sharing an edge therefore
//! always converge on the same resolved value, regardless of the order the
//! caller placed them in.

pub mod continuity;
pub mod grid;

use std::collections::HashSet;

use tracing::warn;

use crate::error::BordureError;
use crate::model::{Border, CellGrid, CellId, FrameBorders, RowRange, Side};

pub use grid::{widest_border, widest_border_in, BorderGrid, EdgeKind};

/// Collapse a cell border with the table frame's border on the same side.
///
/// The frame wins whenever it is present and the cell border is absent or
/// narrower; otherwise the cell border wins. A cell at the table edge is
/// never left unresolved: with nothing requested on either side it gets
/// the [`Border::NONE`] sentinel.
pub fn collapsed_border(cell: Option<Border>, frame: Option<Border>) -> Border {
    if let Some(frame) = frame {
        if cell.map_or(true, |c| c.width < frame.width) {
            return frame;
        }
    }
    cell.unwrap_or(Border::NONE)
}

/// The border-collapsing engine for one table.
///
/// Owns the resolved [`BorderGrid`], the current page fragment's
/// [`RowRange`], and the continuation borders carried over a page break.
/// The cell table itself stays externally owned; every operation that
/// needs it takes it as a parameter.
#[derive(Debug, Clone)]
pub struct CollapseEngine {
    grid: BorderGrid,
    num_columns: usize,
    frame: FrameBorders,
    row_range: RowRange,
    has_content: bool,
    top_collapse_with: Vec<Option<Border>>,
    bottom_collapse_with: Vec<Option<Border>>,
}

impl CollapseEngine {
    pub fn new(num_columns: usize) -> Self {
        Self {
            grid: BorderGrid::new(),
            num_columns,
            frame: FrameBorders::none(),
            row_range: RowRange::new(0, 0),
            has_content: true,
            top_collapse_with: Vec::new(),
            bottom_collapse_with: Vec::new(),
        }
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn frame(&self) -> FrameBorders {
        self.frame
    }

    pub fn row_range(&self) -> RowRange {
        self.row_range
    }

    /// The resolved edge grid. Read-only; all mutation goes through the
    /// collapse pass and the page-break insertion entry points.
    pub fn grid(&self) -> &BorderGrid {
        &self.grid
    }

    /// Resolve every shared edge of the rows in `start_row..=finish_row`.
    ///
    /// Elides empty rows first, then folds each cell's border requests
    /// into the grid, mutating the cells in place where a neighbor's wider
    /// request wins. Returns the finish row after elision, which the
    /// engine also records as its row range. Out-of-range input is a
    /// caller bug and fails fast; inconsistent span data is repaired with
    /// a warning instead.
    pub fn collapse(
        &mut self,
        cells: &mut CellGrid,
        frame: FrameBorders,
        start_row: usize,
        finish_row: usize,
    ) -> Result<usize, BordureError> {
        if start_row > finish_row || finish_row >= cells.num_rows() {
            return Err(BordureError::InvalidRowRange {
                start: start_row,
                finish: finish_row,
                rows: cells.num_rows(),
            });
        }
        self.frame = frame;

        let finish_row = match self.elide_empty_rows(cells, start_row, finish_row) {
            Some(finish) => finish,
            None => {
                // every row in range was consumed by spans; nothing to fold
                self.row_range = RowRange::new(start_row, start_row);
                return Ok(start_row);
            }
        };

        self.grid.ensure_capacity(cells.num_rows(), self.num_columns);

        let mut folded: HashSet<CellId> = HashSet::new();
        for row in start_row..=finish_row {
            let mut col = 0;
            while col < self.num_columns {
                let Some(id) = cells.origin_at(row, col) else {
                    col += 1;
                    continue;
                };

                // frame participation on the table's outer vertical ring
                let cell = cells.cell(id);
                let span = cell.col_span;
                if col == 0 {
                    let resolved = collapsed_border(cell.left, self.frame.left);
                    cells.cell_mut(id).set_border(Side::Left, Some(resolved));
                }
                let cell = cells.cell(id);
                if cell.end_col() == self.num_columns {
                    let resolved = collapsed_border(cell.right, self.frame.right);
                    cells.cell_mut(id).set_border(Side::Right, Some(resolved));
                }

                self.propagate(cells, id, &mut folded);
                col += span;
            }
        }

        self.row_range = RowRange::new(start_row, finish_row);
        Ok(finish_row)
    }

    /// Remove rows in range that contain no cell origins, shrinking the
    /// spans that crossed them. Returns the adjusted finish row, or `None`
    /// when the whole range was elided.
    fn elide_empty_rows(
        &self,
        cells: &mut CellGrid,
        start: usize,
        finish: usize,
    ) -> Option<usize> {
        let empty: Vec<usize> = (start..=finish).filter(|&r| cells.row_is_empty(r)).collect();
        if empty.is_empty() {
            return Some(finish);
        }
        if empty.contains(&finish) {
            warn!(
                start,
                finish, "table range ends in a row with no cells; the trailing row is incomplete"
            );
        }
        let clamped = cells.apply_row_elision(&empty);
        if clamped > 0 {
            warn!(
                clamped,
                "row span shrank below one row while collapsing empty rows; clamped"
            );
        }
        if empty.len() > finish - start {
            return None;
        }
        Some(finish - empty.len())
    }

    /// Fold a cell's sides into the grid, neighbors first.
    ///
    /// Every structurally adjacent cell that has not contributed yet gets
    /// its sides folded in (without write-back) before the current cell
    /// commits its own, so the current cell's write-back sees the final
    /// value of every edge it shares.
    fn propagate(&mut self, cells: &mut CellGrid, id: CellId, folded: &mut HashSet<CellId>) {
        for neighbor in adjacent_cells(cells, id) {
            if folded.insert(neighbor) {
                self.fold_cell(cells, neighbor, false);
            }
        }
        folded.insert(id);
        self.fold_cell(cells, id, true);
    }

    /// Offer a cell's four border requests to the grid. With `resolve`,
    /// every offer the grid declines overwrites the cell's own request
    /// with the stored winner, so the cell renders the agreed edge.
    fn fold_cell(&mut self, cells: &mut CellGrid, id: CellId, resolve: bool) {
        let cell = cells.cell(id).clone();
        let (row, col) = (cell.row, cell.col);
        let (rs, cs) = (cell.row_span, cell.col_span);

        // every slot the span touches must exist before the offers run
        self.grid
            .ensure_capacity(row + rs, self.num_columns.max(col + cs));

        for i in 0..cs {
            if !self.grid.try_set(EdgeKind::Horizontal, row, col + i, cell.top, false) && resolve {
                let stored = self.grid.get(EdgeKind::Horizontal, row, col + i);
                cells.cell_mut(id).set_border(Side::Top, stored);
            }
        }
        // bottom and right are evaluated later than the guess made from the
        // other side of the edge, so they may take equal-width ties
        for i in 0..cs {
            if !self
                .grid
                .try_set(EdgeKind::Horizontal, row + rs, col + i, cell.bottom, true)
                && resolve
            {
                let stored = self.grid.get(EdgeKind::Horizontal, row + rs, col + i);
                cells.cell_mut(id).set_border(Side::Bottom, stored);
            }
        }
        for r in row..row + rs {
            if !self.grid.try_set(EdgeKind::Vertical, col, r, cell.left, false) && resolve {
                let stored = self.grid.get(EdgeKind::Vertical, col, r);
                cells.cell_mut(id).set_border(Side::Left, stored);
            }
        }
        for r in row..row + rs {
            if !self.grid.try_set(EdgeKind::Vertical, col + cs, r, cell.right, true) && resolve {
                let stored = self.grid.get(EdgeKind::Vertical, col + cs, r);
                cells.cell_mut(id).set_border(Side::Right, stored);
            }
        }
    }
}

/// Every cell structurally adjacent to `id`: the band along its left edge,
/// the cells abutting below, and the band along its right edge, in that
/// order. Cells below count only when their top boundary is exactly this
/// cell's bottom boundary; an edge further down is owned by another pair.
fn adjacent_cells(cells: &CellGrid, id: CellId) -> Vec<CellId> {
    let cell = cells.cell(id);
    let (row, col) = (cell.row, cell.col);
    let (rs, cs) = (cell.row_span, cell.col_span);
    let mut out = Vec::new();
    let push = |n: CellId, out: &mut Vec<CellId>| {
        if n != id && !out.contains(&n) {
            out.push(n);
        }
    };

    if col > 0 {
        for r in row..row + rs {
            if let Some(n) = cells.covering(r, col - 1) {
                push(n, &mut out);
            }
        }
    }

    let below = row + rs;
    let mut c = col;
    while c < col + cs {
        match cells.covering(below, c) {
            Some(n) => {
                let ncell = cells.cell(n);
                if ncell.row == below {
                    push(n, &mut out);
                }
                c = ncell.end_col().max(c + 1);
            }
            None => c += 1,
        }
    }

    if col + cs < cells.num_columns() {
        for r in row..row + rs {
            if let Some(n) = cells.covering(r, col + cs) {
                push(n, &mut out);
            }
        }
    }

    out
}
