//! # Table Model
//!
//! The input representation for the border-collapsing engine. A table is a
//! fixed number of columns, a set of cells placed on a row/column grid
//! (each possibly spanning several rows or columns), and four frame
//! borders belonging to the table as a whole. This is designed to be
//! easily produced by a layout engine's cell renderers or by direct JSON
//! construction.
//!
//! Cells live in an arena owned by [`CellGrid`]; everything else addresses
//! them through [`CellId`] handles. The slot table marks a cell only at its
//! origin; slots covered by a span stay empty, which is how the engine
//! tells a real cell start from a span continuation.

use serde::{Deserialize, Serialize};

use crate::error::BordureError;

/// A border request: a width in points plus a line style.
///
/// Collapsing compares widths only; the style rides along so the winning
/// request can still be painted correctly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    /// Line width in points (1/72 inch). Never negative.
    pub width: f64,
    /// Line style identity.
    #[serde(default)]
    pub kind: BorderKind,
}

impl Border {
    /// The "no border requested" sentinel. A resolved edge is never left
    /// unset; when nothing claims it, it resolves to this.
    pub const NONE: Border = Border {
        width: 0.0,
        kind: BorderKind::None,
    };

    pub fn new(width: f64, kind: BorderKind) -> Self {
        Self { width, kind }
    }

    /// A solid border of the given width.
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            kind: BorderKind::Solid,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == BorderKind::None
    }
}

/// Line styles a border can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BorderKind {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    /// No visible line. Used by [`Border::NONE`].
    None,
}

/// One side of a cell or of the table frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Borders belonging to the table frame as a whole, distinct from any
/// individual cell's borders. They participate in collapsing with the
/// outermost ring of cell borders.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FrameBorders {
    #[serde(default)]
    pub top: Option<Border>,
    #[serde(default)]
    pub right: Option<Border>,
    #[serde(default)]
    pub bottom: Option<Border>,
    #[serde(default)]
    pub left: Option<Border>,
}

impl FrameBorders {
    /// No frame border on any side.
    pub fn none() -> Self {
        Self::default()
    }

    /// The same border on all four sides.
    pub fn uniform(border: Border) -> Self {
        Self {
            top: Some(border),
            right: Some(border),
            bottom: Some(border),
            left: Some(border),
        }
    }

    pub fn side(&self, side: Side) -> Option<Border> {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

/// The subset of table rows rendered on the current page fragment,
/// inclusive on both ends. Updated by the caller each time the table is
/// re-entered after a page break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub finish: usize,
}

impl RowRange {
    pub fn new(start: usize, finish: usize) -> Self {
        Self { start, finish }
    }
}

/// One table cell: its origin on the grid, its span, and up to four border
/// requests. The engine mutates the requests in place; that is how a
/// resolved grid edge is written back onto the cell that will render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// Grid row of the cell's top-left corner.
    pub row: usize,
    /// Grid column of the cell's top-left corner.
    pub col: usize,
    /// Number of rows occupied, starting at `row`.
    #[serde(default = "default_one")]
    pub row_span: usize,
    /// Number of columns occupied, starting at `col`.
    #[serde(default = "default_one")]
    pub col_span: usize,
    #[serde(default)]
    pub top: Option<Border>,
    #[serde(default)]
    pub right: Option<Border>,
    #[serde(default)]
    pub bottom: Option<Border>,
    #[serde(default)]
    pub left: Option<Border>,
}

fn default_one() -> usize {
    1
}

impl TableCell {
    /// A 1×1 cell with no border requests.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
            top: None,
            right: None,
            bottom: None,
            left: None,
        }
    }

    pub fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span.max(1);
        self.col_span = col_span.max(1);
        self
    }

    pub fn with_border(mut self, side: Side, border: Border) -> Self {
        self.set_border(side, Some(border));
        self
    }

    /// The same border requested on all four sides.
    pub fn with_all_borders(mut self, border: Border) -> Self {
        for side in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
            self.set_border(side, Some(border));
        }
        self
    }

    pub fn border(&self, side: Side) -> Option<Border> {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set_border(&mut self, side: Side, border: Option<Border>) {
        match side {
            Side::Top => self.top = border,
            Side::Right => self.right = border,
            Side::Bottom => self.bottom = border,
            Side::Left => self.left = border,
        }
    }

    /// The last grid row this cell occupies.
    pub fn last_row(&self) -> usize {
        self.row + self.row_span - 1
    }

    /// The column just past the cell's right edge.
    pub fn end_col(&self) -> usize {
        self.col + self.col_span
    }

    /// Whether the cell's occupied region contains the given slot.
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.row <= row
            && row < self.row + self.row_span
            && self.col <= col
            && col < self.col + self.col_span
    }
}

/// Handle to a cell inside a [`CellGrid`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub(crate) usize);

/// The externally-owned cell table: an arena of cells plus a row-major
/// slot table. A slot holds a [`CellId`] only at the cell's origin; slots
/// covered by a row or column span stay `None`.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    num_columns: usize,
    cells: Vec<TableCell>,
    slots: Vec<Vec<Option<CellId>>>,
}

impl CellGrid {
    pub fn new(num_columns: usize) -> Self {
        Self {
            num_columns,
            cells: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Build a grid from a list of cells. Fails on the first cell that
    /// violates the column bound or lands on an occupied origin slot.
    pub fn from_cells(num_columns: usize, cells: Vec<TableCell>) -> Result<Self, BordureError> {
        let mut grid = Self::new(num_columns);
        for cell in cells {
            grid.insert(cell)?;
        }
        Ok(grid)
    }

    /// Place a cell at its origin slot, growing the row table so the whole
    /// span region exists. Every cell must satisfy
    /// `col + col_span <= num_columns`.
    pub fn insert(&mut self, cell: TableCell) -> Result<CellId, BordureError> {
        if cell.col + cell.col_span > self.num_columns {
            return Err(BordureError::CellOutOfBounds {
                row: cell.row,
                col: cell.col,
                columns: self.num_columns,
            });
        }
        let needed_rows = cell.row + cell.row_span;
        while self.slots.len() < needed_rows {
            self.slots.push(vec![None; self.num_columns]);
        }
        if self.slots[cell.row][cell.col].is_some() {
            return Err(BordureError::SlotOccupied {
                row: cell.row,
                col: cell.col,
            });
        }
        let id = CellId(self.cells.len());
        self.slots[cell.row][cell.col] = Some(id);
        self.cells.push(cell);
        Ok(id)
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_rows(&self) -> usize {
        self.slots.len()
    }

    pub fn cell(&self, id: CellId) -> &TableCell {
        &self.cells[id.0]
    }

    pub fn cell_mut(&mut self, id: CellId) -> &mut TableCell {
        &mut self.cells[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len()).map(CellId)
    }

    /// The cell whose origin sits exactly at the slot, if any.
    pub fn origin_at(&self, row: usize, col: usize) -> Option<CellId> {
        self.slots.get(row)?.get(col).copied().flatten()
    }

    /// Whether the row exists and contains no cell origins. Rows like this
    /// appear when a large row span from an earlier row consumes the whole
    /// row; the collapse pass elides them.
    pub fn row_is_empty(&self, row: usize) -> bool {
        match self.slots.get(row) {
            Some(slots) => slots.iter().all(|slot| slot.is_none()),
            None => false,
        }
    }

    /// The cell whose occupied region contains the slot, if any.
    ///
    /// Walks up the slot's column to the nearest origin, then leftward
    /// column by column. In a well-formed grid the nearest origin above a
    /// covered slot in each column is the only candidate there, so the
    /// first origin whose span reaches the slot is the covering cell.
    pub fn covering(&self, row: usize, col: usize) -> Option<CellId> {
        if row >= self.slots.len() || col >= self.num_columns {
            return None;
        }
        let mut c = col + 1;
        while c > 0 {
            c -= 1;
            if let Some(id) = self.first_origin_above(row, c) {
                if self.cell(id).covers(row, col) {
                    return Some(id);
                }
            }
        }
        None
    }

    /// The nearest origin at or above `row` in the given column.
    fn first_origin_above(&self, row: usize, col: usize) -> Option<CellId> {
        (0..=row.min(self.slots.len().saturating_sub(1)))
            .rev()
            .find_map(|r| self.origin_at(r, col))
    }

    /// Remove the given rows from the slot table, shifting survivors up
    /// and shrinking every span that crossed a removed row. `rows` must be
    /// sorted ascending. Returns how many spans had to be clamped back to
    /// 1. A non-zero count means the span data was inconsistent.
    pub(crate) fn apply_row_elision(&mut self, rows: &[usize]) -> usize {
        if rows.is_empty() {
            return 0;
        }
        let mut clamped = 0;
        for cell in &mut self.cells {
            let crossed = rows
                .iter()
                .filter(|&&r| cell.row < r && r < cell.row + cell.row_span)
                .count();
            let shift = rows.iter().filter(|&&r| r < cell.row).count();
            cell.row -= shift;
            if crossed > 0 {
                if cell.row_span <= crossed {
                    clamped += 1;
                    cell.row_span = 1;
                } else {
                    cell.row_span -= crossed;
                }
            }
        }
        let num_columns = self.num_columns;
        let kept = self.slots.len() - rows.len();
        self.slots.clear();
        self.slots.resize(kept, vec![None; num_columns]);
        for (index, cell) in self.cells.iter().enumerate() {
            self.slots[cell.row][cell.col] = Some(CellId(index));
        }
        clamped
    }
}

/// A complete table description, ready to collapse. This is the JSON input
/// surface of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    /// Number of grid columns. Fixed for the table's lifetime.
    pub num_columns: usize,
    /// The table's own frame borders.
    #[serde(default)]
    pub frame: FrameBorders,
    /// The cells, in any order. Slots not covered by any cell stay empty.
    pub cells: Vec<TableCell>,
}

impl TableSpec {
    pub fn into_grid(self) -> Result<(CellGrid, FrameBorders), BordureError> {
        let frame = self.frame;
        let grid = CellGrid::from_cells(self.num_columns, self.cells)?;
        Ok((grid, frame))
    }
}
