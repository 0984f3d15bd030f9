//! # Page Continuity
//!
//! A table rarely fits on one page. When it splits, the borders at the
//! split must stay consistent: the bottom edge drawn on one fragment and
//! the top edge drawn on the next are the same visual line, and whichever
//! fragment is painted second must honor what the first already committed.
//!
//! The caller hands the engine two continuation vectors holding the
//! borders the adjacent fragments already own. This module blends them with the
//! frame border and with the cells that terminate on the fragment's first
//! and last rows. Everything between the fragment's edges comes straight
//! from the resolved grid.

use crate::error::BordureError;
use crate::model::{Border, CellGrid, RowRange, Side};

use super::grid::{widest_border, widest_border_in};
use super::CollapseEngine;

impl CollapseEngine {
    /// Replace the row range rendered on the current page fragment.
    pub fn set_row_range(&mut self, range: RowRange) {
        self.row_range = range;
    }

    /// Whether the current fragment contains at least one rendered row of
    /// this table, as opposed to an empty placeholder fragment carrying
    /// only a trailing border. Shifts which boundary counts as the bottom.
    pub fn set_has_content(&mut self, has_content: bool) {
        self.has_content = has_content;
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Replace the borders carried over from the previous fragment.
    pub fn set_top_collapse_with(&mut self, borders: Vec<Option<Border>>) {
        self.top_collapse_with = borders;
    }

    /// Replace the borders carried over from the next fragment.
    pub fn set_bottom_collapse_with(&mut self, borders: Vec<Option<Border>>) {
        self.bottom_collapse_with = borders;
    }

    /// The horizontal edge to paint at a row boundary of the current page
    /// fragment.
    ///
    /// The fragment's first and last boundaries are synthesized: seeded
    /// from the continuation vector (frame border filling in), then
    /// widened by the declared top/bottom request of every cell that
    /// terminates on the fragment's first/last row. The raw grid row is
    /// not used there: the true edge of a fragment depends on what the
    /// neighboring fragment committed, not on the original top-of-table
    /// resolution. Boundaries in between return the resolved grid row.
    pub fn horizontal_edge_for_page_row(
        &self,
        cells: &CellGrid,
        index: usize,
    ) -> Result<Vec<Option<Border>>, BordureError> {
        let bottom_index = self.row_range.finish + usize::from(self.has_content);
        if index == self.row_range.start && cells.num_rows() > 0 {
            let mut edge =
                seeded_edge_row(&self.top_collapse_with, self.frame.top, self.num_columns);
            self.widen_from_terminating_cells(cells, index, Side::Top, &mut edge);
            Ok(edge)
        } else if index == bottom_index && cells.num_rows() > 0 && index > 0 {
            let mut edge =
                seeded_edge_row(&self.bottom_collapse_with, self.frame.bottom, self.num_columns);
            self.widen_from_terminating_cells(cells, index - 1, Side::Bottom, &mut edge);
            Ok(edge)
        } else {
            Ok(self.grid().horizontal_edge(index)?.to_vec())
        }
    }

    /// The last horizontal edge of the current fragment.
    pub fn last_horizontal_edge(
        &self,
        cells: &CellGrid,
    ) -> Result<Vec<Option<Border>>, BordureError> {
        let last = self.grid().horizontal_count().saturating_sub(1);
        self.horizontal_edge_for_page_row(cells, last)
    }

    /// Direct vertical-edge lookup by column boundary.
    pub fn vertical_edge(&self, boundary: usize) -> Result<&[Option<Border>], BordureError> {
        self.grid().vertical_edge(boundary)
    }

    pub fn first_vertical_edge(&self) -> Result<&[Option<Border>], BordureError> {
        self.vertical_edge(0)
    }

    pub fn last_vertical_edge(&self) -> Result<&[Option<Border>], BordureError> {
        self.vertical_edge(self.grid().vertical_count().saturating_sub(1))
    }

    /// Widest border along one horizontal boundary, as painted on the
    /// current fragment.
    pub fn widest_horizontal_border(
        &self,
        cells: &CellGrid,
        boundary: usize,
    ) -> Result<Option<Border>, BordureError> {
        Ok(widest_border(
            &self.horizontal_edge_for_page_row(cells, boundary)?,
        ))
    }

    /// Widest border in a column sub-range of one horizontal boundary.
    pub fn widest_horizontal_border_in(
        &self,
        cells: &CellGrid,
        boundary: usize,
        start: usize,
        end: usize,
    ) -> Result<Option<Border>, BordureError> {
        widest_border_in(&self.horizontal_edge_for_page_row(cells, boundary)?, start, end)
    }

    /// Widest border along one vertical boundary.
    pub fn widest_vertical_border(&self, boundary: usize) -> Result<Option<Border>, BordureError> {
        Ok(widest_border(self.grid().vertical_edge(boundary)?))
    }

    /// Widest border in a row sub-range of one vertical boundary.
    pub fn widest_vertical_border_in(
        &self,
        boundary: usize,
        start: usize,
        end: usize,
    ) -> Result<Option<Border>, BordureError> {
        widest_border_in(self.grid().vertical_edge(boundary)?, start, end)
    }

    /// The width the layout engine must reserve on one side of the table:
    /// the frame border's width (when `collapse_with_frame`), raised to
    /// the widest border found on the corresponding boundary.
    pub fn max_edge_width(
        &self,
        cells: &CellGrid,
        side: Side,
        collapse_with_frame: bool,
    ) -> Result<f64, BordureError> {
        let floor = if collapse_with_frame {
            self.frame().side(side).map_or(0.0, |b| b.width)
        } else {
            0.0
        };
        let widest = match side {
            Side::Top => self.widest_horizontal_border(cells, self.row_range().start)?,
            Side::Bottom => {
                let last = self.grid().horizontal_count().saturating_sub(1);
                self.widest_horizontal_border(cells, last)?
            }
            Side::Left => self.widest_vertical_border(0)?,
            Side::Right => {
                let last = self.grid().vertical_count().saturating_sub(1);
                self.widest_vertical_border(last)?
            }
        };
        Ok(match widest {
            Some(border) if border.width >= floor => border.width,
            _ => floor,
        })
    }

    /// Insert a synthetic horizontal edge row, cloning the row currently
    /// at `boundary` or starting unresolved. Entry point for a layout
    /// engine introducing a page break mid-table.
    pub fn insert_horizontal_edge(
        &mut self,
        boundary: usize,
        use_previous: bool,
    ) -> Result<(), BordureError> {
        self.grid.insert_horizontal_edge(boundary, use_previous)
    }

    /// Insert a synthetic row position into every vertical edge column.
    pub fn insert_vertical_edge(
        &mut self,
        boundary: usize,
        use_previous: bool,
    ) -> Result<(), BordureError> {
        self.grid.insert_vertical_edge(boundary, use_previous)
    }

    /// Compare each terminating cell's declared request on `side` against
    /// the seeded edge, keeping the wider and writing the winner across
    /// the cell's column span. A cell terminates when its last occupied
    /// row is `row`; a span continuing onto the next fragment leaves the
    /// carried-over seed in charge.
    fn widen_from_terminating_cells(
        &self,
        cells: &CellGrid,
        row: usize,
        side: Side,
        edge: &mut [Option<Border>],
    ) {
        let mut col = 0;
        while col < self.num_columns() {
            let Some(id) = cells.covering(row, col) else {
                col += 1;
                continue;
            };
            let cell = cells.cell(id);
            let span_end = cell.end_col().min(self.num_columns()).max(col + 1);
            if cell.last_row() == row {
                let declared = cell.border(side);
                let replace = match (edge[col], declared) {
                    (None, _) => true,
                    (Some(seed), Some(d)) => d.width > seed.width,
                    (Some(_), None) => false,
                };
                if replace {
                    for slot in &mut edge[col..span_end] {
                        *slot = declared;
                    }
                }
            }
            col = span_end;
        }
    }
}

/// Build one edge row of length `n` from a continuation vector and the
/// frame border on that side: the frame fills missing columns and
/// supersedes any carried-over border of less or equal width.
fn seeded_edge_row(
    continuation: &[Option<Border>],
    frame: Option<Border>,
    n: usize,
) -> Vec<Option<Border>> {
    let mut edge: Vec<Option<Border>> = continuation.iter().copied().take(n).collect();
    let carried = edge.len();
    edge.resize(n, frame);
    if let Some(frame) = frame {
        for slot in &mut edge[..carried] {
            if slot.map_or(true, |b| b.width <= frame.width) {
                *slot = Some(frame);
            }
        }
    }
    edge
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collapse::EdgeKind;
    use crate::model::{CellGrid, FrameBorders, TableCell};

    fn engine_for(cells: &mut CellGrid, frame: FrameBorders) -> CollapseEngine {
        let mut engine = CollapseEngine::new(cells.num_columns());
        let finish = cells.num_rows() - 1;
        engine.collapse(cells, frame, 0, finish).unwrap();
        engine
    }

    #[test]
    fn seeded_row_lets_frame_take_ties() {
        let carried = vec![None, Some(Border::solid(1.0)), Some(Border::solid(3.0))];
        let edge = seeded_edge_row(&carried, Some(Border::solid(1.0)), 4);
        assert_eq!(edge[0], Some(Border::solid(1.0)));
        assert_eq!(edge[1], Some(Border::solid(1.0)));
        assert_eq!(edge[2], Some(Border::solid(3.0)));
        assert_eq!(edge[3], Some(Border::solid(1.0)));
    }

    #[test]
    fn seeded_row_without_frame_keeps_carryover() {
        let carried = vec![Some(Border::solid(2.0)), None];
        let edge = seeded_edge_row(&carried, None, 2);
        assert_eq!(edge[0], Some(Border::solid(2.0)));
        assert_eq!(edge[1], None);
    }

    #[test]
    fn top_edge_blends_frame_and_cell_requests() {
        let mut cells = CellGrid::new(2);
        cells
            .insert(TableCell::new(0, 0).with_border(Side::Top, Border::solid(3.0)))
            .unwrap();
        cells.insert(TableCell::new(0, 1)).unwrap();
        let engine = engine_for(&mut cells, FrameBorders::uniform(Border::solid(1.0)));

        let top = engine.horizontal_edge_for_page_row(&cells, 0).unwrap();
        assert_eq!(top[0], Some(Border::solid(3.0)));
        assert_eq!(top[1], Some(Border::solid(1.0)));
    }

    #[test]
    fn bottom_edge_keeps_wider_carryover_seed() {
        // page split: the next fragment already committed a width-4 border;
        // a cell ending on this fragment's last row asks for 2 and loses
        let mut cells = CellGrid::new(2);
        cells
            .insert(TableCell::new(0, 0).with_border(Side::Bottom, Border::solid(2.0)))
            .unwrap();
        cells
            .insert(TableCell::new(0, 1).with_border(Side::Bottom, Border::solid(5.0)))
            .unwrap();
        let mut engine = engine_for(&mut cells, FrameBorders::none());
        engine.set_has_content(true);
        engine.set_bottom_collapse_with(vec![Some(Border::solid(4.0)), Some(Border::solid(4.0))]);

        let bottom = engine.horizontal_edge_for_page_row(&cells, 1).unwrap();
        assert_eq!(bottom[0], Some(Border::solid(4.0)));
        assert_eq!(bottom[1], Some(Border::solid(5.0)));
    }

    #[test]
    fn span_continuing_past_fragment_leaves_seed_alone() {
        let mut cells = CellGrid::new(2);
        cells
            .insert(
                TableCell::new(0, 0)
                    .with_span(2, 1)
                    .with_border(Side::Bottom, Border::solid(9.0)),
            )
            .unwrap();
        cells.insert(TableCell::new(0, 1)).unwrap();
        cells.insert(TableCell::new(1, 1)).unwrap();

        let mut engine = CollapseEngine::new(2);
        engine.collapse(&mut cells, FrameBorders::none(), 0, 1).unwrap();
        // fragment ends after row 0; the spanning cell continues
        engine.set_row_range(RowRange::new(0, 0));
        engine.set_has_content(true);
        engine.set_bottom_collapse_with(vec![Some(Border::solid(1.0)), Some(Border::solid(1.0))]);

        let bottom = engine.horizontal_edge_for_page_row(&cells, 1).unwrap();
        // the width-9 request belongs to the next fragment's bottom, not this split
        assert_eq!(bottom[0], Some(Border::solid(1.0)));
        assert_eq!(bottom[1], Some(Border::solid(1.0)));
    }

    #[test]
    fn placeholder_fragment_shifts_bottom_boundary() {
        let mut cells = CellGrid::new(1);
        cells
            .insert(TableCell::new(0, 0).with_border(Side::Bottom, Border::solid(2.0)))
            .unwrap();
        cells.insert(TableCell::new(1, 0)).unwrap();
        let mut engine = engine_for(&mut cells, FrameBorders::none());
        engine.set_bottom_collapse_with(vec![Some(Border::solid(9.0))]);

        // fragment with content: boundary 1 is interior, straight from the grid
        assert_eq!(
            engine.horizontal_edge_for_page_row(&cells, 1).unwrap()[0],
            Some(Border::solid(2.0))
        );
        // empty placeholder fragment: boundary 1 becomes the bottom and
        // blends the carried-over border instead
        engine.set_has_content(false);
        assert_eq!(
            engine.horizontal_edge_for_page_row(&cells, 1).unwrap()[0],
            Some(Border::solid(9.0))
        );
    }

    #[test]
    fn middle_boundaries_come_from_the_grid() {
        let mut cells = CellGrid::new(1);
        cells
            .insert(TableCell::new(0, 0).with_border(Side::Bottom, Border::solid(2.0)))
            .unwrap();
        cells.insert(TableCell::new(1, 0)).unwrap();
        cells.insert(TableCell::new(2, 0)).unwrap();
        let engine = engine_for(&mut cells, FrameBorders::none());

        let middle = engine.horizontal_edge_for_page_row(&cells, 1).unwrap();
        assert_eq!(middle[0], engine.grid().get(EdgeKind::Horizontal, 1, 0));
        assert_eq!(middle[0], Some(Border::solid(2.0)));
    }

    #[test]
    fn page_row_query_fails_fast_out_of_range() {
        let mut cells = CellGrid::new(1);
        cells.insert(TableCell::new(0, 0)).unwrap();
        let engine = engine_for(&mut cells, FrameBorders::none());
        assert!(engine.horizontal_edge_for_page_row(&cells, 7).is_err());
    }

    #[test]
    fn max_edge_width_takes_frame_floor_or_widest() {
        let mut cells = CellGrid::new(2);
        cells
            .insert(TableCell::new(0, 0).with_border(Side::Left, Border::solid(4.0)))
            .unwrap();
        cells.insert(TableCell::new(0, 1)).unwrap();
        let engine = engine_for(&mut cells, FrameBorders::uniform(Border::solid(1.0)));

        let left = engine.max_edge_width(&cells, Side::Left, true).unwrap();
        assert!((left - 4.0).abs() < 1e-9);
        let right = engine.max_edge_width(&cells, Side::Right, true).unwrap();
        assert!((right - 1.0).abs() < 1e-9);
        let right_bare = engine.max_edge_width(&cells, Side::Right, false).unwrap();
        assert!((right_bare - 1.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_edge_accessors() {
        let mut cells = CellGrid::new(2);
        cells
            .insert(TableCell::new(0, 0).with_border(Side::Left, Border::solid(2.0)))
            .unwrap();
        cells.insert(TableCell::new(0, 1)).unwrap();
        let engine = engine_for(&mut cells, FrameBorders::none());

        assert_eq!(engine.first_vertical_edge().unwrap()[0], Some(Border::solid(2.0)));
        assert_eq!(engine.last_vertical_edge().unwrap()[0], Some(Border::NONE));
        assert!(engine.vertical_edge(9).is_err());
    }
}
