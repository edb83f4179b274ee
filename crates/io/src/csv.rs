// CSV/TSV export of a single sheet

use std::path::Path;

use ctrlsync_engine::{CellAddr, RangeAddr, Sheet};

pub fn export_sheet(sheet: &Sheet, path: &Path) -> Result<(), String> {
    export_with_delimiter(sheet, path, b',')
}

pub fn export_tsv(sheet: &Sheet, path: &Path) -> Result<(), String> {
    export_with_delimiter(sheet, path, b'\t')
}

fn export_with_delimiter(sheet: &Sheet, path: &Path, delimiter: u8) -> Result<(), String> {
    // Rows may be variable width because trailing empties are omitted,
    // so different rows can have different field counts.
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    for record in data_records(sheet) {
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

/// Display strings of the data range, trailing blanks trimmed per row and per sheet.
///
/// Cells hidden under a merge are forced empty.
fn data_records(sheet: &Sheet) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut last_non_empty_row = 0;

    for (row, values) in sheet.data_values().iter().enumerate() {
        let mut record: Vec<String> = Vec::new();
        let mut last_non_empty_col = 0;

        for (col, cell) in values.iter().enumerate() {
            let value = if is_merge_hidden(sheet.merges(), CellAddr::new(row, col)) {
                String::new()
            } else {
                cell.display()
            };
            if !value.trim().is_empty() {
                last_non_empty_col = col + 1;
                last_non_empty_row = row + 1;
            }
            record.push(value);
        }

        record.truncate(last_non_empty_col);
        rows.push(record);
    }

    rows.truncate(last_non_empty_row);
    rows
}

fn is_merge_hidden(merges: &[RangeAddr], addr: CellAddr) -> bool {
    merges
        .iter()
        .any(|m| m.contains(addr) && m.start != addr)
}
