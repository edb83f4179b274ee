use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::address::{AddressError, CellAddr, RangeAddr};
use crate::cell::{Cell, CellStyle, CellValue};

/// A single tab: a sparse grid of cells plus merged regions.
///
/// `rows`/`cols` are the grid dimensions the host reports as max rows/columns,
/// independent of how many cells actually hold data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SheetData", into = "SheetData")]
pub struct Sheet {
    pub name: String,
    cells: HashMap<(usize, usize), Cell>,
    pub rows: usize,
    pub cols: usize,
    merges: Vec<RangeAddr>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
            rows,
            cols,
            merges: Vec::new(),
        }
    }

    pub fn get_value(&self, addr: CellAddr) -> CellValue {
        self.cells
            .get(&(addr.row, addr.col))
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Set a value, growing the grid when the address lies outside it.
    pub fn set_value(&mut self, addr: CellAddr, value: CellValue) {
        self.grow_to(addr);
        let cell = self.cells.entry((addr.row, addr.col)).or_insert_with(Cell::new);
        cell.value = value;
        if cell.is_vacant() {
            self.cells.remove(&(addr.row, addr.col));
        }
    }

    pub fn get_style(&self, addr: CellAddr) -> CellStyle {
        self.cells
            .get(&(addr.row, addr.col))
            .map(|c| c.style.clone())
            .unwrap_or_default()
    }

    pub fn set_style(&mut self, addr: CellAddr, style: CellStyle) {
        self.grow_to(addr);
        let cell = self.cells.entry((addr.row, addr.col)).or_insert_with(Cell::new);
        cell.style = style;
        if cell.is_vacant() {
            self.cells.remove(&(addr.row, addr.col));
        }
    }

    /// Values of a rectangular range, row-major.
    pub fn values(&self, range: &RangeAddr) -> Vec<Vec<CellValue>> {
        (range.start.row..=range.end.row)
            .map(|r| {
                (range.start.col..=range.end.col)
                    .map(|c| self.get_value(CellAddr::new(r, c)))
                    .collect()
            })
            .collect()
    }

    /// Overwrite a range with a block of exactly matching dimensions.
    pub fn set_values(&mut self, range: &RangeAddr, values: &[Vec<CellValue>]) -> Result<(), String> {
        check_dimensions(range, values.len(), values.iter().map(Vec::len))?;
        for (dr, row) in values.iter().enumerate() {
            for (dc, value) in row.iter().enumerate() {
                let addr = CellAddr::new(range.start.row + dr, range.start.col + dc);
                self.set_value(addr, value.clone());
            }
        }
        Ok(())
    }

    /// Set (or with `None`, reset) the background of every cell in a range.
    pub fn set_background(&mut self, range: &RangeAddr, color: Option<&str>) {
        for addr in range.cells() {
            let mut style = self.get_style(addr);
            style.background = color.map(str::to_string);
            self.set_style(addr, style);
        }
    }

    pub fn set_font(&mut self, addr: CellAddr, size: Option<f32>, bold: bool) {
        let mut style = self.get_style(addr);
        style.font_size = size;
        style.font_weight = bold.then(|| "bold".to_string());
        self.set_style(addr, style);
    }

    /// Merge each row of the range across its columns.
    pub fn merge_across(&mut self, range: &RangeAddr) {
        for row in range.start.row..=range.end.row {
            let merged = RangeAddr::new(
                CellAddr::new(row, range.start.col),
                CellAddr::new(row, range.end.col),
            );
            if merged.is_single_cell() {
                continue;
            }
            self.merges.retain(|m| !overlaps(m, &merged));
            self.merges.push(merged);
        }
    }

    pub fn merges(&self) -> &[RangeAddr] {
        &self.merges
    }

    /// Insert rows at the specified position, shifting existing rows down
    pub fn insert_rows(&mut self, at_row: usize, count: usize) {
        let cells_to_shift: Vec<_> = self
            .cells
            .iter()
            .filter(|((r, _), _)| *r >= at_row)
            .map(|((r, c), cell)| ((*r, *c), cell.clone()))
            .collect();

        for ((r, c), _) in &cells_to_shift {
            self.cells.remove(&(*r, *c));
        }

        for ((r, c), cell) in cells_to_shift {
            self.cells.insert((r + count, c), cell);
        }

        for merge in &mut self.merges {
            if merge.start.row >= at_row {
                merge.start.row += count;
                merge.end.row += count;
            } else if merge.end.row >= at_row {
                merge.end.row += count;
            }
        }

        self.rows += count;
    }

    /// Delete rows at the specified position, shifting remaining rows up
    pub fn delete_rows(&mut self, start_row: usize, count: usize) {
        let end = start_row + count;
        self.cells.retain(|(r, _), _| *r < start_row || *r >= end);

        let cells_to_shift: Vec<_> = self
            .cells
            .iter()
            .filter(|((r, _), _)| *r >= end)
            .map(|((r, c), cell)| ((*r, *c), cell.clone()))
            .collect();

        for ((r, c), _) in &cells_to_shift {
            self.cells.remove(&(*r, *c));
        }

        for ((r, c), cell) in cells_to_shift {
            self.cells.insert((r - count, c), cell);
        }

        self.merges.retain(|m| m.start.row < start_row || m.end.row >= end);
        for merge in &mut self.merges {
            if merge.start.row >= end {
                merge.start.row -= count;
                merge.end.row -= count;
            } else if merge.end.row >= start_row {
                // Merge straddles the deleted block.
                merge.end.row -= count.min(merge.end.row + 1 - start_row);
            }
        }

        self.rows = self.rows.saturating_sub(count);
    }

    /// Index of the last row holding a non-blank value.
    pub fn last_row(&self) -> Option<usize> {
        self.cells
            .iter()
            .filter(|(_, c)| !c.value.is_blank())
            .map(|((r, _), _)| *r)
            .max()
    }

    /// Index of the last column holding a non-blank value.
    pub fn last_col(&self) -> Option<usize> {
        self.cells
            .iter()
            .filter(|(_, c)| !c.value.is_blank())
            .map(|((_, c), _)| *c)
            .max()
    }

    /// Values of the data range: A1 through the last populated row and column.
    pub fn data_values(&self) -> Vec<Vec<CellValue>> {
        match (self.last_row(), self.last_col()) {
            (Some(r), Some(c)) => self.values(&RangeAddr::new(CellAddr::new(0, 0), CellAddr::new(r, c))),
            _ => Vec::new(),
        }
    }

    /// Clear contents, formats and merges; dimensions are kept.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.merges.clear();
    }

    /// Iterate over all populated cells
    pub fn cells_iter(&self) -> impl Iterator<Item = (CellAddr, &Cell)> {
        self.cells.iter().map(|((r, c), cell)| (CellAddr::new(*r, *c), cell))
    }

    fn grow_to(&mut self, addr: CellAddr) {
        self.rows = self.rows.max(addr.row + 1);
        self.cols = self.cols.max(addr.col + 1);
    }
}

fn check_dimensions(
    range: &RangeAddr,
    height: usize,
    mut widths: impl Iterator<Item = usize>,
) -> Result<(), String> {
    if height != range.height() || !widths.all(|w| w == range.width()) {
        return Err(format!(
            "data does not match range {range} ({} x {})",
            range.height(),
            range.width()
        ));
    }
    Ok(())
}

fn overlaps(a: &RangeAddr, b: &RangeAddr) -> bool {
    a.start.row <= b.end.row
        && b.start.row <= a.end.row
        && a.start.col <= b.end.col
        && b.start.col <= a.end.col
}

// ---------------------------------------------------------------------------
// Serialized form: A1-keyed maps so workspace files are hand-editable
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct SheetData {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cols: Option<usize>,
    #[serde(default)]
    cells: BTreeMap<String, CellValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    styles: BTreeMap<String, CellStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    merges: Vec<String>,
}

impl TryFrom<SheetData> for Sheet {
    type Error = AddressError;

    fn try_from(data: SheetData) -> Result<Self, Self::Error> {
        let mut sheet = Sheet::new(data.name, data.rows.unwrap_or(1), data.cols.unwrap_or(1));
        for (a1, value) in data.cells {
            sheet.set_value(CellAddr::parse(&a1)?, value);
        }
        for (a1, style) in data.styles {
            sheet.set_style(CellAddr::parse(&a1)?, style);
        }
        for a1 in data.merges {
            sheet.merges.push(RangeAddr::parse(&a1)?);
        }
        Ok(sheet)
    }
}

impl From<Sheet> for SheetData {
    fn from(sheet: Sheet) -> Self {
        let mut cells = BTreeMap::new();
        let mut styles = BTreeMap::new();
        for (addr, cell) in sheet.cells_iter() {
            if cell.value != CellValue::Empty {
                cells.insert(addr.to_string(), cell.value.clone());
            }
            if !cell.style.is_default() {
                styles.insert(addr.to_string(), cell.style.clone());
            }
        }
        SheetData {
            name: sheet.name,
            rows: Some(sheet.rows),
            cols: Some(sheet.cols),
            cells,
            styles,
            merges: sheet.merges.iter().map(ToString::to_string).collect(),
        }
    }
}
