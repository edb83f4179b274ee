//! The grid seam: rectangular reads and writes over one tab.
//!
//! Row arguments are 0-based indices, like `CellAddr::row`.

use ctrlsync_engine::{CellAddr, CellValue, RangeAddr, Sheet};

use crate::error::ReconError;

pub trait Grid {
    fn name(&self) -> &str;

    /// Row count of the grid, populated or not.
    fn max_rows(&self) -> usize;

    fn values(&self, range: &RangeAddr) -> Vec<Vec<CellValue>>;

    fn set_values(&mut self, range: &RangeAddr, values: &[Vec<CellValue>]) -> Result<(), ReconError>;

    fn insert_row_before(&mut self, row: usize);

    fn delete_row(&mut self, row: usize);

    fn merge_across(&mut self, range: &RangeAddr);

    fn set_background(&mut self, range: &RangeAddr, color: Option<&str>);

    fn set_font(&mut self, addr: CellAddr, size: f32, bold: bool);

    /// Number of rows up to and including the last one with content; 0 when empty.
    fn last_row(&self) -> usize;

    fn clear(&mut self);

    fn value(&self, addr: CellAddr) -> CellValue {
        self.values(&RangeAddr::cell(addr))
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or_default()
    }

    fn text(&self, addr: CellAddr) -> String {
        self.value(addr).display()
    }

    fn set_value(&mut self, addr: CellAddr, value: CellValue) -> Result<(), ReconError> {
        self.set_values(&RangeAddr::cell(addr), &[vec![value]])
    }

    /// True when any cell of the range is non-blank.
    fn has_values(&self, range: &RangeAddr) -> bool {
        self.values(range)
            .iter()
            .any(|row| row.iter().any(|v| !v.is_blank()))
    }

    /// Append a line in column A below the last populated row.
    fn append_line(&mut self, text: &str) -> Result<(), ReconError> {
        let row = self.last_row();
        self.set_value(CellAddr::new(row, 0), CellValue::text(text))
    }
}

impl Grid for Sheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_rows(&self) -> usize {
        self.rows
    }

    fn values(&self, range: &RangeAddr) -> Vec<Vec<CellValue>> {
        Sheet::values(self, range)
    }

    fn set_values(&mut self, range: &RangeAddr, values: &[Vec<CellValue>]) -> Result<(), ReconError> {
        Sheet::set_values(self, range, values).map_err(ReconError::Range)
    }

    fn insert_row_before(&mut self, row: usize) {
        self.insert_rows(row, 1);
    }

    fn delete_row(&mut self, row: usize) {
        self.delete_rows(row, 1);
    }

    fn merge_across(&mut self, range: &RangeAddr) {
        Sheet::merge_across(self, range);
    }

    fn set_background(&mut self, range: &RangeAddr, color: Option<&str>) {
        Sheet::set_background(self, range, color);
    }

    fn set_font(&mut self, addr: CellAddr, size: f32, bold: bool) {
        Sheet::set_font(self, addr, Some(size), bold);
    }

    fn last_row(&self) -> usize {
        Sheet::last_row(self).map_or(0, |r| r + 1)
    }

    fn clear(&mut self) {
        Sheet::clear(self);
    }
}
