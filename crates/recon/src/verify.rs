//! Advisory structure checks on a documented control after propagation.

use crate::grid::Grid;
use crate::runlog::LogSink;
use crate::template::{TemplateMap, SAMPLE_LABEL, TEST_LABEL};

/// Check a destination sheet against the pre-test expectations of its layout.
///
/// Blank/filled checks only run while the test label still reads
/// `Prueba a realizar`. Findings are logged as warnings and counted; nothing
/// is modified.
pub fn verify_cells<G: Grid + ?Sized>(grid: &G, map: &TemplateMap, log: &mut dyn LogSink) -> usize {
    let mut warnings = 0;
    let pre_test = grid.text(map.test_label()).trim() == TEST_LABEL;

    if pre_test {
        for range in map.must_be_blank() {
            if grid.has_values(&range) {
                log.warn(&format!("The field \"{range}\" is NOT empty when it should be."));
                warnings += 1;
            }
        }
        for range in map.must_be_filled() {
            if !grid.has_values(&range) {
                log.warn(&format!("The field \"{range}\" is empty but should have data."));
                warnings += 1;
            }
        }
    }

    if grid.max_rows() > map.canonical_rows() && grid.text(map.sample_label()).contains(SAMPLE_LABEL) {
        log.warn("One or more extra rows are present that should not be.");
        warnings += 1;
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{documented_fixture, put, test_log};
    use crate::runlog::Level;

    #[test]
    fn clean_documented_sheet_has_no_warnings() {
        let sheet = documented_fixture("PAYROLL");
        let mut log = test_log();
        assert_eq!(verify_cells(&sheet, &TemplateMap::canonical(), &mut log), 0);
        assert!(log.lines().is_empty());
    }

    #[test]
    fn non_empty_update_row_warns_once_naming_range() {
        let mut sheet = documented_fixture("PAYROLL");
        put(&mut sheet, "C9", "leftover");
        let mut log = test_log();

        assert_eq!(verify_cells(&sheet, &TemplateMap::canonical(), &mut log), 1);
        assert_eq!(
            log.lines()[0].text,
            "WARNING: The field \"B9:F9\" is NOT empty when it should be."
        );
    }

    #[test]
    fn empty_documented_field_warns() {
        let mut sheet = documented_fixture("PAYROLL");
        put(&mut sheet, "B8", "");
        let mut log = test_log();

        verify_cells(&sheet, &TemplateMap::canonical(), &mut log);
        assert!(log.contains("\"B8:F8\" is empty"));
    }

    #[test]
    fn checks_skipped_after_testing() {
        let mut sheet = documented_fixture("PAYROLL");
        put(&mut sheet, "A12", "Prueba realizada");
        put(&mut sheet, "B13", "leftover");
        let mut log = test_log();

        assert_eq!(verify_cells(&sheet, &TemplateMap::canonical(), &mut log), 0);
    }

    #[test]
    fn extra_trailing_row_warns() {
        let mut sheet = documented_fixture("PAYROLL");
        sheet.rows = 15;
        let mut log = test_log();

        assert_eq!(verify_cells(&sheet, &TemplateMap::canonical(), &mut log), 1);
        assert_eq!(log.count(Level::Warn), 1);
        assert!(log.contains("extra rows"));
    }
}
