//! Layout detection and correction of control sheets.

use ctrlsync_engine::{CellAddr, RangeAddr};

use crate::grid::Grid;
use crate::runlog::LogSink;
use crate::template::{
    LayoutVariant, CONTROL_TYPE_LABELS, DESCRIPTION_LABEL, EVIDENCE_LABEL, EVIDENCE_UPDATES_LABEL,
    SAMPLE_LABEL, TEST_LABEL, TEST_TITLE, TITLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRole {
    Source,
    Destination,
}

impl std::fmt::Display for SheetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// A stray row above the title was deleted.
    RemovedLeadingRow,
    /// The blank row before the test description was restored.
    InsertedGapRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// Already canonical; nothing touched.
    Conforming,
    Corrected(Vec<Correction>),
    /// Non-canonical but recognized, and no rule applied.
    Untouched,
    /// Neither known layout, and no rule applied.
    Unrecognized,
}

fn a1(row_number: usize, col: char) -> CellAddr {
    CellAddr::at(row_number, col)
}

fn is_control_type_label(text: &str) -> bool {
    CONTROL_TYPE_LABELS.contains(&text.trim())
}

pub fn detect_variant<G: Grid + ?Sized>(grid: &G) -> LayoutVariant {
    if is_control_type_label(&grid.text(a1(2, 'A'))) {
        LayoutVariant::FiveRowHeader
    } else if is_control_type_label(&grid.text(a1(3, 'A'))) {
        LayoutVariant::SixRowHeader
    } else {
        LayoutVariant::Unrecognized
    }
}

/// True when every canonical anchor carries its expected text.
pub fn conforms<G: Grid + ?Sized>(grid: &G) -> bool {
    let anchors = [
        (a1(1, 'A'), TITLE),
        (a1(2, 'A'), CONTROL_TYPE_LABELS[0]),
        (a1(6, 'A'), DESCRIPTION_LABEL),
        (a1(8, 'A'), EVIDENCE_LABEL),
        (a1(11, 'A'), TEST_TITLE),
        (a1(12, 'A'), TEST_LABEL),
        (a1(14, 'E'), SAMPLE_LABEL),
    ];
    anchors
        .iter()
        .all(|(addr, expected)| grid.text(*addr).contains(expected))
}

/// Force a control sheet towards the canonical layout.
///
/// Never fails: a sheet no rule can fix is left as it is and the fact is logged.
pub fn normalize<G: Grid + ?Sized>(grid: &mut G, role: SheetRole, log: &mut dyn LogSink) -> NormalizeOutcome {
    if conforms(grid) {
        return NormalizeOutcome::Conforming;
    }

    let name = grid.name().to_string();
    let mut applied = Vec::new();

    if is_control_type_label(&grid.text(a1(3, 'A'))) && grid.text(a1(2, 'A')).contains(TITLE) {
        grid.delete_row(0);
        applied.push(Correction::RemovedLeadingRow);
        log.warn(&format!(
            "Updated the layout of the {role} sheet \"{name}\": removed a stray row above the title."
        ));
    }

    if grid.text(a1(10, 'A')).contains(TEST_TITLE)
        && grid.text(a1(9, 'A')).contains(EVIDENCE_UPDATES_LABEL)
    {
        let gap = RangeAddr::row_span(10, 'A', 'F');
        grid.insert_row_before(9);
        grid.set_background(&gap, None);
        grid.merge_across(&gap);
        applied.push(Correction::InsertedGapRow);
        log.warn(&format!(
            "Updated the layout of the {role} sheet \"{name}\": inserted the missing row before the test description."
        ));
    }

    if !applied.is_empty() {
        return NormalizeOutcome::Corrected(applied);
    }

    if detect_variant(grid) == LayoutVariant::Unrecognized {
        log.warn(&format!(
            "The {role} sheet \"{name}\": layout unrecognized, no action taken."
        ));
        NormalizeOutcome::Unrecognized
    } else {
        log.warn(&format!(
            "The {role} sheet \"{name}\" does not follow the standard layout and no correction applies."
        ));
        NormalizeOutcome::Untouched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{canonical_fixture, test_log as log};
    use crate::runlog::Level;
    use ctrlsync_engine::{CellValue, Sheet};

    fn with_stray_row() -> Sheet {
        let mut sheet = canonical_fixture("PAYROLL");
        sheet.insert_rows(0, 1);
        sheet.set_value(CellAddr::at(1, 'A'), CellValue::text("stray"));
        sheet
    }

    fn without_gap_row() -> Sheet {
        let mut sheet = canonical_fixture("PAYROLL");
        sheet.delete_rows(9, 1);
        sheet
    }

    #[test]
    fn canonical_is_conforming_and_untouched() {
        let mut sheet = canonical_fixture("PAYROLL");
        let before = sheet.clone();
        let mut log = log();

        assert_eq!(detect_variant(&sheet), LayoutVariant::FiveRowHeader);
        assert_eq!(normalize(&mut sheet, SheetRole::Destination, &mut log), NormalizeOutcome::Conforming);
        assert_eq!(sheet, before);
        assert!(log.lines().is_empty());
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut sheet = with_stray_row();
        let mut log = log();
        normalize(&mut sheet, SheetRole::Source, &mut log);
        let once = sheet.clone();
        assert_eq!(normalize(&mut sheet, SheetRole::Source, &mut log), NormalizeOutcome::Conforming);
        assert_eq!(sheet, once);
    }

    #[test]
    fn stray_leading_row_is_deleted_once() {
        let mut sheet = with_stray_row();
        assert_eq!(detect_variant(&sheet), LayoutVariant::SixRowHeader);
        let rows_before = sheet.rows;
        let mut log = log();

        let outcome = normalize(&mut sheet, SheetRole::Source, &mut log);

        assert_eq!(outcome, NormalizeOutcome::Corrected(vec![Correction::RemovedLeadingRow]));
        assert_eq!(sheet.rows, rows_before - 1);
        assert_eq!(detect_variant(&sheet), LayoutVariant::FiveRowHeader);
        assert!(conforms(&sheet));
        assert_eq!(log.count(Level::Warn), 1);
        assert!(log.lines()[0].text.contains("source sheet \"PAYROLL\""));
    }

    #[test]
    fn missing_gap_row_is_inserted_and_merged() {
        let mut sheet = without_gap_row();
        let mut log = log();

        let outcome = normalize(&mut sheet, SheetRole::Destination, &mut log);

        assert_eq!(outcome, NormalizeOutcome::Corrected(vec![Correction::InsertedGapRow]));
        assert!(conforms(&sheet));
        assert!(sheet.merges().contains(&RangeAddr::row_span(10, 'A', 'F')));
        assert_eq!(sheet.get_value(CellAddr::at(10, 'A')), CellValue::Empty);
        assert!(log.lines()[0].text.contains("destination sheet"));
    }

    #[test]
    fn unrecognized_layout_is_logged_distinctly() {
        let mut sheet = Sheet::new("Notes", 20, 6);
        sheet.set_value(CellAddr::at(1, 'A'), CellValue::text("Meeting notes"));
        let before = sheet.clone();
        let mut log = log();

        assert_eq!(normalize(&mut sheet, SheetRole::Source, &mut log), NormalizeOutcome::Unrecognized);
        assert_eq!(sheet, before);
        assert!(log.contains("layout unrecognized, no action taken"));
    }

    #[test]
    fn recognized_but_unfixable_is_untouched() {
        let mut sheet = canonical_fixture("PAYROLL");
        sheet.set_value(CellAddr::at(14, 'E'), CellValue::text("Sample"));
        let mut log = log();

        assert_eq!(normalize(&mut sheet, SheetRole::Destination, &mut log), NormalizeOutcome::Untouched);
        assert!(!log.contains("layout unrecognized"));
        assert_eq!(log.count(Level::Warn), 1);
    }

    #[test]
    fn clase_label_counts_as_control_type() {
        let mut sheet = canonical_fixture("PAYROLL");
        sheet.set_value(CellAddr::at(2, 'A'), CellValue::text("Clase"));
        assert_eq!(detect_variant(&sheet), LayoutVariant::FiveRowHeader);
    }
}
