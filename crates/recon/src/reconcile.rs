//! Reconciliation of a tested inventory against a documented one.

use ctrlsync_engine::{CellAddr, CellValue, RangeAddr};

use crate::error::ReconError;
use crate::grid::Grid;
use crate::interact::{ask_non_empty, ask_yes_no};
use crate::matcher::NamePool;
use crate::model::{ControlRecord, MappingRow, ReconcileSummary, MAPPING_FIRST_ROW, MAPPING_HEADERS};
use crate::session::Session;
use crate::store::DocumentStore;

pub struct ReconcileInput<'a> {
    pub tested: &'a [ControlRecord],
    pub documented: &'a [ControlRecord],
    /// Folder that receives copies of unmatched tested controls.
    pub documented_folder: &'a str,
}

/// Where mapping rows are written.
pub struct MappingSheet<'a> {
    pub book: &'a str,
    pub sheet: &'a str,
}

struct DocumentedRef {
    id: String,
    first_sheet: String,
}

/// Match every tested control against the documented pool.
///
/// Rows are written to the mapping sheet as soon as they are decided. An
/// unmatched control is offered for copying into the documented folder; a
/// declined or failed copy yields no row.
pub fn reconcile<S: DocumentStore>(
    session: &mut Session<'_, S>,
    input: &ReconcileInput<'_>,
    target: &MappingSheet<'_>,
) -> Result<(Vec<MappingRow>, ReconcileSummary), ReconError> {
    let sheet = session.store.reset_sheet(target.book, target.sheet)?;
    let headers: Vec<CellValue> = MAPPING_HEADERS.iter().map(|h| CellValue::text(*h)).collect();
    sheet.set_values(&row_range(0), &[headers])?;

    let pool: NamePool<DocumentedRef> = input
        .documented
        .iter()
        .map(|r| {
            (
                r.display_name.clone(),
                DocumentedRef {
                    id: r.id.clone(),
                    first_sheet: r.first_sheet.clone(),
                },
            )
        })
        .collect();

    let mut rows = Vec::new();
    let mut summary = ReconcileSummary::default();

    for tested in input.tested {
        if let Some((name, doc)) = pool.find(&tested.display_name) {
            let row = MappingRow {
                source_id: tested.id.clone(),
                source_sheet: tested.first_sheet.clone(),
                dest_id: doc.id.clone(),
                dest_sheet: doc.first_sheet.clone(),
                matched_name: name.to_string(),
            };
            emit(session, target, &mut rows, row)?;
            session
                .log
                .info(&format!("Matched control \"{}\" with \"{name}\".", tested.display_name));
            summary.matched += 1;
            continue;
        }

        let name = &tested.display_name;
        let create = ask_yes_no(
            &mut *session.prompter,
            &format!(
                "Control \"{name}\" was not found among the documented controls.\n\
                 Create \"{name}\" in the documented controls folder? (y/n)"
            ),
        )?;

        if !create {
            session.log.warn(&format!("control not created: \"{name}\""));
            summary.declined += 1;
            continue;
        }

        let new_name = ask_non_empty(
            &mut *session.prompter,
            &format!("Name for the copy of \"{name}\" in the documented controls folder:"),
        )?;

        match copy_control(session.store, &tested.id, input.documented_folder, &new_name) {
            Ok((new_id, first_sheet)) => {
                let row = MappingRow {
                    source_id: tested.id.clone(),
                    source_sheet: tested.first_sheet.clone(),
                    dest_id: new_id.clone(),
                    dest_sheet: first_sheet,
                    matched_name: new_name.clone(),
                };
                emit(session, target, &mut rows, row)?;
                session
                    .log
                    .info(&format!("Control created: \"{new_name}\" with ID \"{new_id}\""));
                summary.created += 1;
            }
            Err(e) => {
                let msg = format!("could not copy tested control: {e}");
                session.prompter.alert(&format!("ERROR: {msg}"));
                session.log.error(&msg);
                summary.failed += 1;
            }
        }
    }

    Ok((rows, summary))
}

/// Copy a tested control into the documented folder and read the copy's first tab.
///
/// A copy whose first tab cannot be read is trashed before the error is returned.
fn copy_control<S: DocumentStore>(
    store: &mut S,
    file_id: &str,
    folder_id: &str,
    new_name: &str,
) -> Result<(String, String), ReconError> {
    let new_id = store.copy_file(file_id, folder_id, new_name)?;
    match store.first_sheet_name(&new_id) {
        Ok(first_sheet) => Ok((new_id, first_sheet)),
        Err(e) => {
            if let Err(trash) = store.trash_file(&new_id) {
                log::warn!("could not trash unreadable copy {new_id}: {trash}");
            }
            Err(e)
        }
    }
}

fn emit<S: DocumentStore>(
    session: &mut Session<'_, S>,
    target: &MappingSheet<'_>,
    rows: &mut Vec<MappingRow>,
    row: MappingRow,
) -> Result<(), ReconError> {
    let sheet = session.store.sheet_mut(target.book, target.sheet)?;
    sheet.set_values(&row_range(MAPPING_FIRST_ROW + rows.len()), &[row.to_cells()])?;
    rows.push(row);
    Ok(())
}

/// Read mapping rows back, top to bottom, skipping blank rows.
pub fn read_mapping<G: Grid + ?Sized>(grid: &G) -> Vec<MappingRow> {
    let last = grid.last_row();
    if last <= MAPPING_FIRST_ROW {
        return Vec::new();
    }
    let range = RangeAddr::new(CellAddr::new(MAPPING_FIRST_ROW, 0), CellAddr::new(last - 1, 4));
    grid.values(&range)
        .iter()
        .filter_map(|row| MappingRow::from_cells(row))
        .collect()
}

/// Columns A-E of a 0-based row.
fn row_range(row: usize) -> RangeAddr {
    RangeAddr::new(CellAddr::new(row, 0), CellAddr::new(row, 4))
}
