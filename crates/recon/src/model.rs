use ctrlsync_engine::CellValue;

// ---------------------------------------------------------------------------
// Records persisted in sheets
// ---------------------------------------------------------------------------

pub const INVENTORY_HEADERS: [&str; 3] = ["Control ID", "Control sheet", "Control name"];
/// 0-based index of the first inventory data row (row 3).
pub const INVENTORY_FIRST_ROW: usize = 2;

pub const MAPPING_HEADERS: [&str; 5] = [
    "Tested ID",
    "Tested sheet",
    "Documented ID",
    "Documented sheet",
    "Matched name",
];
/// 0-based index of the first mapping data row (row 2).
pub const MAPPING_FIRST_ROW: usize = 1;

/// One spreadsheet representing a single audit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRecord {
    pub id: String,
    /// Name of the first tab, the working sheet of the control.
    pub first_sheet: String,
    pub display_name: String,
}

impl ControlRecord {
    pub fn to_cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(&self.id),
            CellValue::text(&self.first_sheet),
            CellValue::text(&self.display_name),
        ]
    }

    /// Read a record from an inventory row; rows without an id are skipped.
    pub fn from_cells(row: &[CellValue]) -> Option<Self> {
        let id = cell_text(row, 0);
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id,
            first_sheet: cell_text(row, 1),
            display_name: cell_text(row, 2),
        })
    }
}

/// Associates a tested control with a documented control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub source_id: String,
    pub source_sheet: String,
    pub dest_id: String,
    pub dest_sheet: String,
    /// Documented-side name that satisfied the match, or the new copy's name.
    pub matched_name: String,
}

impl MappingRow {
    pub fn to_cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(&self.source_id),
            CellValue::text(&self.source_sheet),
            CellValue::text(&self.dest_id),
            CellValue::text(&self.dest_sheet),
            CellValue::text(&self.matched_name),
        ]
    }

    pub fn from_cells(row: &[CellValue]) -> Option<Self> {
        let source_id = cell_text(row, 0);
        let dest_id = cell_text(row, 2);
        if source_id.is_empty() && dest_id.is_empty() {
            return None;
        }
        Some(Self {
            source_id,
            source_sheet: cell_text(row, 1),
            dest_id,
            dest_sheet: cell_text(row, 3),
            matched_name: cell_text(row, 4),
        })
    }
}

fn cell_text(row: &[CellValue], col: usize) -> String {
    row.get(col)
        .map(|v| v.display().trim().to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Run summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySummary {
    pub captured: usize,
    /// Foreign-format spreadsheets whose id could not be extracted.
    pub foreign_skipped: usize,
    /// Native spreadsheets whose first tab could not be read.
    pub unreadable: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub matched: usize,
    pub created: usize,
    pub declined: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Updated {
        /// Labels of the fields copied, in copy order.
        copied: Vec<String>,
        /// Whether a tracking row was found and updated.
        tracked: bool,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationSummary {
    pub outcomes: Vec<(String, RowOutcome)>,
}

impl PropagationSummary {
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, RowOutcome::Updated { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.updated()
    }

    pub fn untracked(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, RowOutcome::Updated { tracked: false, .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedParent {
    pub name: String,
    pub folder_id: String,
    pub spreadsheet_id: String,
    pub roll_forward_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_cells_trims_and_skips_blank() {
        let row = vec![
            CellValue::text(" T1 "),
            CellValue::text("Sheet1"),
            CellValue::text("PAYROLL"),
        ];
        let rec = ControlRecord::from_cells(&row).unwrap();
        assert_eq!(rec.id, "T1");
        assert_eq!(rec.display_name, "PAYROLL");

        assert!(ControlRecord::from_cells(&[CellValue::Empty, CellValue::text("x")]).is_none());
        assert!(ControlRecord::from_cells(&[]).is_none());
    }

    #[test]
    fn mapping_row_short_row_pads_blank() {
        let row = MappingRow::from_cells(&[CellValue::text("T1"), CellValue::text("Sheet1")]).unwrap();
        assert_eq!(row.dest_id, "");
        assert_eq!(row.matched_name, "");
    }

    #[test]
    fn summary_counts() {
        let summary = PropagationSummary {
            outcomes: vec![
                ("A".into(), RowOutcome::Updated { copied: vec![], tracked: true }),
                ("B".into(), RowOutcome::Updated { copied: vec![], tracked: false }),
                ("C".into(), RowOutcome::Skipped { reason: "missing".into() }),
            ],
        };
        assert_eq!(summary.updated(), 2);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.untracked(), 1);
    }
}
