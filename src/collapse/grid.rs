//! # Border Grid
//!
//! The core mutable structure behind collapsing: two growable sparse
//! collections of resolved edges. Horizontal edges are indexed by row
//! boundary then column (`0..=row_count` boundaries, `row_count` rows of
//! cells produce `row_count + 1` edge rows); vertical edges by column
//! boundary then row. A slot holds at most one resolved border; `None`
//! means no border is known for that edge yet.
//!
//! All conflict resolution funnels through [`BorderGrid::try_set`], the
//! single source of truth for which border wins a shared edge.

use crate::error::BordureError;
use crate::model::Border;

/// Which of the two edge collections an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Edges between cell rows, indexed `[row_boundary][col]`.
    Horizontal,
    /// Edges between cell columns, indexed `[col_boundary][row]`.
    Vertical,
}

/// Resolved borders for every shared edge of one table.
///
/// Dimensions only grow. Rows and columns are appended to accommodate
/// spans crossing the currently known extent, never removed.
#[derive(Debug, Clone, Default)]
pub struct BorderGrid {
    horizontal: Vec<Vec<Option<Border>>>,
    vertical: Vec<Vec<Option<Border>>>,
}

impl BorderGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow both collections so a table of `rows` × `cols` cells can be
    /// indexed: `rows + 1` horizontal edge rows of `cols` slots, and
    /// `cols + 1` vertical edge columns of `rows` slots. Newly created
    /// slots are unresolved. Never shrinks.
    pub fn ensure_capacity(&mut self, rows: usize, cols: usize) {
        while self.horizontal.len() < rows + 1 {
            self.horizontal.push(Vec::new());
        }
        for edge_row in &mut self.horizontal {
            if edge_row.len() < cols {
                edge_row.resize(cols, None);
            }
        }
        if rows > 0 {
            while self.vertical.len() < cols + 1 {
                self.vertical.push(Vec::new());
            }
        }
        for edge_col in &mut self.vertical {
            if edge_col.len() < rows {
                edge_col.resize(rows, None);
            }
        }
    }

    /// Number of horizontal edge rows currently allocated.
    pub fn horizontal_count(&self) -> usize {
        self.horizontal.len()
    }

    /// Number of vertical edge columns currently allocated.
    pub fn vertical_count(&self) -> usize {
        self.vertical.len()
    }

    /// Read one edge slot. Out-of-range slots read as unresolved.
    pub fn get(&self, kind: EdgeKind, boundary: usize, line: usize) -> Option<Border> {
        let lanes = match kind {
            EdgeKind::Horizontal => &self.horizontal,
            EdgeKind::Vertical => &self.vertical,
        };
        lanes.get(boundary)?.get(line).copied().flatten()
    }

    /// Offer a candidate for one edge slot and report whether the stored
    /// value changed. The rule, in order:
    ///
    /// - an unresolved slot stores any present candidate;
    /// - a candidate equal to the stored value is a no-op (this is what
    ///   makes a second collapse pass report every offer as unchanged);
    /// - a strictly wider candidate replaces;
    /// - an equal-width candidate replaces only with `has_priority`;
    /// - anything narrower, or an absent candidate, never replaces.
    ///
    /// The addressed slot is created on demand; growth pre-fills with
    /// unresolved slots rather than indexing unsafely.
    pub fn try_set(
        &mut self,
        kind: EdgeKind,
        boundary: usize,
        line: usize,
        candidate: Option<Border>,
        has_priority: bool,
    ) -> bool {
        let lanes = match kind {
            EdgeKind::Horizontal => &mut self.horizontal,
            EdgeKind::Vertical => &mut self.vertical,
        };
        while lanes.len() <= boundary {
            lanes.push(Vec::new());
        }
        let lane = &mut lanes[boundary];
        if lane.len() <= line {
            lane.resize(line + 1, None);
        }
        let slot = &mut lane[line];
        match (*slot, candidate) {
            (_, None) => false,
            (None, Some(_)) => {
                *slot = candidate;
                true
            }
            (Some(current), Some(offered)) => {
                if current == offered {
                    false
                } else if offered.width > current.width
                    || (has_priority && offered.width == current.width)
                {
                    *slot = candidate;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// All resolved edges along one row boundary.
    pub fn horizontal_edge(&self, boundary: usize) -> Result<&[Option<Border>], BordureError> {
        self.horizontal
            .get(boundary)
            .map(Vec::as_slice)
            .ok_or(BordureError::RowBoundaryOutOfRange {
                index: boundary,
                count: self.horizontal.len(),
            })
    }

    /// All resolved edges along one column boundary.
    pub fn vertical_edge(&self, boundary: usize) -> Result<&[Option<Border>], BordureError> {
        self.vertical
            .get(boundary)
            .map(Vec::as_slice)
            .ok_or(BordureError::ColumnBoundaryOutOfRange {
                index: boundary,
                count: self.vertical.len(),
            })
    }

    /// Insert a horizontal edge row at `boundary`, either cloning the row
    /// currently there or starting unresolved. Used by the layout engine
    /// to introduce a page break mid-table.
    pub fn insert_horizontal_edge(
        &mut self,
        boundary: usize,
        use_previous: bool,
    ) -> Result<(), BordureError> {
        if boundary >= self.horizontal.len() {
            return Err(BordureError::RowBoundaryOutOfRange {
                index: boundary,
                count: self.horizontal.len(),
            });
        }
        let row = if use_previous {
            self.horizontal[boundary].clone()
        } else {
            vec![None; self.horizontal[boundary].len()]
        };
        self.horizontal.insert(boundary, row);
        Ok(())
    }

    /// Insert a row position at `boundary` into every vertical edge
    /// column, cloning the slot currently there or starting unresolved.
    pub fn insert_vertical_edge(
        &mut self,
        boundary: usize,
        use_previous: bool,
    ) -> Result<(), BordureError> {
        for edge_col in &mut self.vertical {
            if boundary > edge_col.len() {
                return Err(BordureError::RowBoundaryOutOfRange {
                    index: boundary,
                    count: edge_col.len(),
                });
            }
            let slot = if use_previous {
                edge_col.get(boundary).copied().flatten()
            } else {
                None
            };
            edge_col.insert(boundary, slot);
        }
        Ok(())
    }
}

/// The widest present border in the sequence, or `None` if every slot is
/// unresolved. Ties keep the earliest.
pub fn widest_border(borders: &[Option<Border>]) -> Option<Border> {
    let mut widest: Option<Border> = None;
    for border in borders.iter().flatten() {
        match widest {
            Some(current) if border.width <= current.width => {}
            _ => widest = Some(*border),
        }
    }
    widest
}

/// [`widest_border`] restricted to a half-open sub-range of the sequence.
pub fn widest_border_in(
    borders: &[Option<Border>],
    start: usize,
    end: usize,
) -> Result<Option<Border>, BordureError> {
    let slice = borders
        .get(start..end)
        .ok_or(BordureError::EdgeRangeOutOfRange {
            start,
            end,
            len: borders.len(),
        })?;
    Ok(widest_border(slice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BorderKind;

    #[test]
    fn test_try_set_fills_unresolved_slot() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(2, 2);
        assert!(grid.try_set(EdgeKind::Horizontal, 0, 0, Some(Border::solid(1.0)), false));
        assert_eq!(grid.get(EdgeKind::Horizontal, 0, 0), Some(Border::solid(1.0)));
    }

    #[test]
    fn test_try_set_wider_wins() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(1, 1);
        grid.try_set(EdgeKind::Vertical, 0, 0, Some(Border::solid(1.0)), false);
        assert!(grid.try_set(EdgeKind::Vertical, 0, 0, Some(Border::solid(3.0)), false));
        assert!(!grid.try_set(EdgeKind::Vertical, 0, 0, Some(Border::solid(2.0)), false));
        assert_eq!(grid.get(EdgeKind::Vertical, 0, 0), Some(Border::solid(3.0)));
    }

    #[test]
    fn test_try_set_equal_width_needs_priority() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(1, 1);
        let dashed = Border::new(2.0, BorderKind::Dashed);
        let dotted = Border::new(2.0, BorderKind::Dotted);
        grid.try_set(EdgeKind::Horizontal, 0, 0, Some(dashed), false);
        assert!(!grid.try_set(EdgeKind::Horizontal, 0, 0, Some(dotted), false));
        assert_eq!(grid.get(EdgeKind::Horizontal, 0, 0), Some(dashed));
        assert!(grid.try_set(EdgeKind::Horizontal, 0, 0, Some(dotted), true));
        assert_eq!(grid.get(EdgeKind::Horizontal, 0, 0), Some(dotted));
    }

    #[test]
    fn test_try_set_same_value_is_unchanged() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(1, 1);
        let border = Border::solid(2.0);
        assert!(grid.try_set(EdgeKind::Horizontal, 1, 0, Some(border), true));
        // re-offering the stored value reports unchanged, even with priority
        assert!(!grid.try_set(EdgeKind::Horizontal, 1, 0, Some(border), true));
    }

    #[test]
    fn test_try_set_absent_candidate_never_replaces() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(1, 1);
        assert!(!grid.try_set(EdgeKind::Horizontal, 0, 0, None, true));
        grid.try_set(EdgeKind::Horizontal, 0, 0, Some(Border::solid(1.0)), false);
        assert!(!grid.try_set(EdgeKind::Horizontal, 0, 0, None, true));
        assert_eq!(grid.get(EdgeKind::Horizontal, 0, 0), Some(Border::solid(1.0)));
    }

    #[test]
    fn test_try_set_grows_missing_slots() {
        let mut grid = BorderGrid::new();
        // no ensure_capacity: the slot is created on demand
        assert!(grid.try_set(EdgeKind::Vertical, 3, 2, Some(Border::solid(1.0)), false));
        assert_eq!(grid.get(EdgeKind::Vertical, 3, 2), Some(Border::solid(1.0)));
        assert_eq!(grid.get(EdgeKind::Vertical, 3, 1), None);
    }

    #[test]
    fn test_ensure_capacity_never_shrinks() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(4, 3);
        grid.ensure_capacity(1, 1);
        assert_eq!(grid.horizontal_count(), 5);
        assert_eq!(grid.vertical_count(), 4);
        assert_eq!(grid.horizontal_edge(4).unwrap().len(), 3);
    }

    #[test]
    fn test_edge_accessors_fail_fast_out_of_range() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(1, 2);
        assert!(grid.horizontal_edge(1).is_ok());
        assert!(matches!(
            grid.horizontal_edge(9),
            Err(BordureError::RowBoundaryOutOfRange { index: 9, count: 2 })
        ));
        assert!(matches!(
            grid.vertical_edge(9),
            Err(BordureError::ColumnBoundaryOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_widest_border_scenarios() {
        assert_eq!(widest_border(&[None, None, None]), None);
        let row = [None, Some(Border::solid(2.0)), Some(Border::solid(5.0)), None];
        assert_eq!(widest_border(&row), Some(Border::solid(5.0)));
        assert_eq!(widest_border_in(&row, 0, 2).unwrap(), Some(Border::solid(2.0)));
        assert!(widest_border_in(&row, 2, 9).is_err());
    }

    #[test]
    fn test_insert_horizontal_edge_clones_or_blanks() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(2, 2);
        grid.try_set(EdgeKind::Horizontal, 1, 0, Some(Border::solid(2.0)), false);
        grid.insert_horizontal_edge(1, true).unwrap();
        assert_eq!(grid.horizontal_count(), 4);
        assert_eq!(grid.get(EdgeKind::Horizontal, 1, 0), Some(Border::solid(2.0)));
        assert_eq!(grid.get(EdgeKind::Horizontal, 2, 0), Some(Border::solid(2.0)));
        grid.insert_horizontal_edge(2, false).unwrap();
        assert_eq!(grid.get(EdgeKind::Horizontal, 2, 0), None);
    }

    #[test]
    fn test_insert_vertical_edge_shifts_every_column() {
        let mut grid = BorderGrid::new();
        grid.ensure_capacity(2, 1);
        grid.try_set(EdgeKind::Vertical, 0, 0, Some(Border::solid(1.0)), false);
        grid.insert_vertical_edge(0, false).unwrap();
        assert_eq!(grid.get(EdgeKind::Vertical, 0, 0), None);
        assert_eq!(grid.get(EdgeKind::Vertical, 0, 1), Some(Border::solid(1.0)));
    }
}
