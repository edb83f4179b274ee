//! Control inventories: one record per control spreadsheet found under a folder.

use ctrlsync_engine::{CellAddr, CellValue, RangeAddr};

use crate::config::InventoryConfig;
use crate::error::ReconError;
use crate::grid::Grid;
use crate::model::{ControlRecord, InventorySummary, INVENTORY_FIRST_ROW, INVENTORY_HEADERS};
use crate::runlog::LogSink;
use crate::store::{DocumentStore, FileEntry, FileKind};

/// Cut the name at the first configured status suffix found, trying suffixes in order.
pub fn clean_control_name(name: &str, suffixes: &[String]) -> String {
    for suffix in suffixes {
        if let Some(idx) = name.find(suffix.as_str()) {
            return name[..idx].to_string();
        }
    }
    name.to_string()
}

/// Inventory a folder of control folders: each subfolder is one control.
///
/// The display name is the subfolder name with its status suffix removed.
pub fn build_nested<S: DocumentStore>(
    store: &mut S,
    root_folder: &str,
    book: &str,
    sheet_name: &str,
    config: &InventoryConfig,
    log: &mut dyn LogSink,
) -> Result<(Vec<ControlRecord>, InventorySummary), ReconError> {
    let mut writer = InventoryWriter::start(store, root_folder, book, sheet_name)?;

    for folder in store.subfolders(root_folder)? {
        let display = clean_control_name(&folder.name, &config.status_suffixes);
        for file in store.files(&folder.id)? {
            writer.capture(store, &file, &display, log)?;
        }
    }

    Ok(writer.finish())
}

/// Inventory a folder of control spreadsheets: each file is one control,
/// named by its own file name.
pub fn build_flat<S: DocumentStore>(
    store: &mut S,
    root_folder: &str,
    book: &str,
    sheet_name: &str,
    log: &mut dyn LogSink,
) -> Result<(Vec<ControlRecord>, InventorySummary), ReconError> {
    let mut writer = InventoryWriter::start(store, root_folder, book, sheet_name)?;

    for file in store.files(root_folder)? {
        let display = file.name.clone();
        writer.capture(store, &file, &display, log)?;
    }

    Ok(writer.finish())
}

/// Read records back from an inventory sheet; rows without an id are skipped.
pub fn read_inventory<G: Grid + ?Sized>(grid: &G) -> Vec<ControlRecord> {
    let last = grid.last_row();
    if last <= INVENTORY_FIRST_ROW {
        return Vec::new();
    }
    let range = RangeAddr::new(
        CellAddr::new(INVENTORY_FIRST_ROW, 0),
        CellAddr::new(last - 1, 2),
    );
    grid.values(&range)
        .iter()
        .filter_map(|row| ControlRecord::from_cells(row))
        .collect()
}

struct InventoryWriter {
    book: String,
    sheet_name: String,
    next_row: usize,
    records: Vec<ControlRecord>,
    summary: InventorySummary,
}

impl InventoryWriter {
    /// Validate the root folder, then create or clear the sheet and write its header.
    fn start<S: DocumentStore>(
        store: &mut S,
        root_folder: &str,
        book: &str,
        sheet_name: &str,
    ) -> Result<Self, ReconError> {
        let root_name = store.folder_name(root_folder)?;

        let sheet = store.reset_sheet(book, sheet_name)?;
        sheet.set_value(CellAddr::new(0, 0), CellValue::text(root_name))?;
        let headers: Vec<CellValue> = INVENTORY_HEADERS.iter().map(|h| CellValue::text(*h)).collect();
        sheet.set_values(&row_range(1), &[headers])?;

        Ok(Self {
            book: book.to_string(),
            sheet_name: sheet_name.to_string(),
            next_row: INVENTORY_FIRST_ROW,
            records: Vec::new(),
            summary: InventorySummary::default(),
        })
    }

    fn capture<S: DocumentStore>(
        &mut self,
        store: &mut S,
        file: &FileEntry,
        display: &str,
        log: &mut dyn LogSink,
    ) -> Result<(), ReconError> {
        match file.kind() {
            FileKind::ForeignSpreadsheet => {
                log.error(&format!(
                    "The control \"{display}\" is in a foreign spreadsheet format and its ID cannot be extracted."
                ));
                self.summary.foreign_skipped += 1;
            }
            FileKind::NativeSpreadsheet => match store.first_sheet_name(&file.id) {
                Ok(first_sheet) => {
                    let record = ControlRecord {
                        id: file.id.clone(),
                        first_sheet,
                        display_name: display.to_string(),
                    };
                    let sheet = store.sheet_mut(&self.book, &self.sheet_name)?;
                    sheet.set_values(&row_range(self.next_row), &[record.to_cells()])?;
                    self.next_row += 1;
                    log.info(&format!("Captured ID of control \"{display}\"."));
                    self.records.push(record);
                    self.summary.captured += 1;
                }
                Err(e) => {
                    log.error(&format!(
                        "Could not read the first sheet of control \"{display}\": {e}"
                    ));
                    self.summary.unreadable += 1;
                }
            },
            FileKind::Other => {}
        }
        Ok(())
    }

    fn finish(self) -> (Vec<ControlRecord>, InventorySummary) {
        (self.records, self.summary)
    }
}

/// Columns A-C of a 0-based row.
fn row_range(row: usize) -> RangeAddr {
    RangeAddr::new(CellAddr::new(row, 0), CellAddr::new(row, 2))
}
