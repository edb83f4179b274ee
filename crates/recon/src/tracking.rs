//! Status updates in the master tracking (agenda) sheet.

use ctrlsync_engine::{CellAddr, CellValue, RangeAddr};

use crate::config::TrackingConfig;
use crate::error::ReconError;
use crate::grid::Grid;

pub struct TrackingUpdate<'a> {
    pub control: &'a str,
    /// Labels of the fields copied for this control.
    pub copied: &'a [String],
    pub frequency: String,
    pub sample_size: String,
}

/// Mark every row whose column A matches the control (trimmed, case-insensitive).
///
/// Writes the OK marker to B, the copied labels to C, `"<frequency>, <sample>"` to D
/// and the sample size to E. Returns the number of rows updated; no match is not an error.
pub fn update_tracking<G: Grid + ?Sized>(
    grid: &mut G,
    config: &TrackingConfig,
    update: &TrackingUpdate<'_>,
) -> Result<usize, ReconError> {
    let key = update.control.trim().to_lowercase();
    if key.is_empty() {
        return Ok(0);
    }

    let first = config.first_row.saturating_sub(1);
    let last = grid.last_row();
    let mut updated = 0;

    for row in first..last {
        let name = grid.text(CellAddr::new(row, 0));
        if name.trim().to_lowercase() != key {
            continue;
        }
        let cells = vec![
            CellValue::text(&config.ok_marker),
            CellValue::text(update.copied.join(", ")),
            CellValue::text(format!("{}, {}", update.frequency, update.sample_size)),
            CellValue::text(&update.sample_size),
        ];
        let range = RangeAddr::new(CellAddr::new(row, 1), CellAddr::new(row, 4));
        grid.set_values(&range, &[cells])?;
        updated += 1;
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctrlsync_engine::Sheet;

    fn agenda() -> Sheet {
        let mut sheet = Sheet::new("Agenda", 100, 6);
        sheet.set_value(CellAddr::new(0, 0), CellValue::text("Agenda 2025"));
        sheet.set_value(CellAddr::new(1, 0), CellValue::text("Control"));
        sheet.set_value(CellAddr::new(2, 0), CellValue::text("ACCESS REVIEW"));
        sheet.set_value(CellAddr::new(3, 0), CellValue::text("PAYROLL"));
        sheet.set_value(CellAddr::new(4, 0), CellValue::text(" access review "));
        sheet
    }

    fn update<'a>(control: &'a str, copied: &'a [String]) -> TrackingUpdate<'a> {
        TrackingUpdate {
            control,
            copied,
            frequency: "Mensual".into(),
            sample_size: "3".into(),
        }
    }

    #[test]
    fn updates_every_matching_row() {
        let mut sheet = agenda();
        let copied = vec!["Descripción. Actualizaciones".to_string(), "Tamaño Muestra.".to_string()];

        let n = update_tracking(&mut sheet, &TrackingConfig::default(), &update("access review", &copied)).unwrap();

        assert_eq!(n, 2);
        for row in [2, 4] {
            assert_eq!(sheet.get_value(CellAddr::new(row, 1)), CellValue::text("OK"));
            assert_eq!(
                sheet.get_value(CellAddr::new(row, 2)),
                CellValue::text("Descripción. Actualizaciones, Tamaño Muestra.")
            );
            assert_eq!(sheet.get_value(CellAddr::new(row, 3)), CellValue::text("Mensual, 3"));
            assert_eq!(sheet.get_value(CellAddr::new(row, 4)), CellValue::text("3"));
        }
        assert_eq!(sheet.get_value(CellAddr::new(3, 1)), CellValue::Empty);
    }

    #[test]
    fn header_rows_are_not_keys() {
        let mut sheet = agenda();
        let n = update_tracking(&mut sheet, &TrackingConfig::default(), &update("Control", &[])).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn missing_key_is_silent_no_op() {
        let mut sheet = agenda();
        let before = sheet.clone();
        let n = update_tracking(&mut sheet, &TrackingConfig::default(), &update("BACKUPS", &[])).unwrap();
        assert_eq!(n, 0);
        assert_eq!(sheet, before);
    }

    #[test]
    fn blank_control_matches_nothing() {
        let mut sheet = agenda();
        sheet.set_value(CellAddr::new(6, 1), CellValue::text("stray"));
        let n = update_tracking(&mut sheet, &TrackingConfig::default(), &update("  ", &[])).unwrap();
        assert_eq!(n, 0);
    }
}
