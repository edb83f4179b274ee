//! Sheet and log builders shared by the unit tests.

use chrono::NaiveDate;
use ctrlsync_engine::{CellAddr, CellValue, RangeAddr, Sheet};

use crate::runlog::RunLog;
use crate::template::{EVIDENCE_UPDATES_LABEL, TEST_LABEL, TEST_TITLE, TITLE};

/// A canonical control sheet with its anchor labels filled in and content cells blank.
pub fn canonical_fixture(name: &str) -> Sheet {
    let mut sheet = Sheet::new(name, 14, 6);
    let labels = [
        ("A1", TITLE),
        ("A2", "Tipo de Control"),
        ("B2", "Naturaleza"),
        ("C2", "Nivel"),
        ("D2", "Frecuencia"),
        ("E2", "Riesgo"),
        ("F2", "Clave"),
        ("A4", "Tipo de Control. Actualizaciones"),
        ("B4", "Naturaleza. Actualizaciones"),
        ("C4", "Nivel. Actualizaciones"),
        ("D4", "Frecuencia. Actualizaciones"),
        ("E4", "Riesgo. Actualizaciones"),
        ("F4", "Clave. Actualizaciones"),
        ("A6", "Descripción"),
        ("A7", "Descripción. Actualizaciones"),
        ("A8", "Evidencia"),
        ("A9", EVIDENCE_UPDATES_LABEL),
        ("A11", TEST_TITLE),
        ("A12", TEST_LABEL),
        ("A13", "Prueba a realizar. Actualizaciones"),
        ("E14", "Tamaño Muestra."),
    ];
    for (addr, text) in labels {
        sheet.set_value(CellAddr::parse(addr).unwrap(), CellValue::text(text));
    }
    sheet.merge_across(&RangeAddr::row_span(1, 'A', 'F'));
    sheet.merge_across(&RangeAddr::row_span(10, 'A', 'F'));
    sheet.merge_across(&RangeAddr::row_span(11, 'A', 'F'));
    sheet
}

/// A documented control in pre-test state: documented fields filled, updates blank.
pub fn documented_fixture(name: &str) -> Sheet {
    let mut sheet = canonical_fixture(name);
    put(&mut sheet, "A3", "Manual");
    put(&mut sheet, "D3", "Mensual");
    put(&mut sheet, "B6", "Payroll is reviewed monthly");
    put(&mut sheet, "B8", "Signed payroll report");
    put(&mut sheet, "B12", "Inspect three payroll runs");
    sheet.set_value(CellAddr::parse("F14").unwrap(), CellValue::Number(3.0));
    sheet
}

pub fn put(sheet: &mut Sheet, a1: &str, text: &str) {
    sheet.set_value(CellAddr::parse(a1).unwrap(), CellValue::text(text));
}

pub fn get(sheet: &Sheet, a1: &str) -> CellValue {
    sheet.get_value(CellAddr::parse(a1).unwrap())
}

pub fn test_log() -> RunLog {
    let started = NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    RunLog::new("test", started)
}
