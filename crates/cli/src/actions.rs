//! The four pipeline actions as the CLI and the menu run them.
//!
//! Every action opens a [`RunLog`] named after the dated log sheet, runs its
//! stage, and then writes the log sheet into the control book whether the
//! stage succeeded or not.

use chrono::NaiveDateTime;
use ctrlsync_recon::inventory::{build_flat, build_nested, read_inventory};
use ctrlsync_recon::model::{InventorySummary, PropagationSummary, ProvisionedParent, ReconcileSummary};
use ctrlsync_recon::propagate::{propagate, PropagateTarget};
use ctrlsync_recon::provision::provision;
use ctrlsync_recon::reconcile::{reconcile, MappingSheet, ReconcileInput};
use ctrlsync_recon::runlog::sheet_name;
use ctrlsync_recon::{ControlConfig, DocumentStore, Prompter, ReconError, RunLog, Session};

pub const ACTION_INVENTORY_TESTED: &str = "COPY IDs Controls";
pub const ACTION_INVENTORY_DOCUMENTED: &str = "COPY IDs Documented";
pub const ACTION_COMPARE: &str = "COMPARE IDs Controls";
pub const ACTION_UPDATE: &str = "UPDATES Controls";
pub const ACTION_PROVISION: &str = "CREATE FOLDERS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryMode {
    /// A folder of control folders (tested controls).
    Nested,
    /// A folder of control spreadsheets (documented controls).
    Flat,
}

pub struct CompareSheets<'a> {
    pub tested_sheet: &'a str,
    pub documented_sheet: &'a str,
    pub documented_folder: &'a str,
    pub mapping_sheet: &'a str,
}

fn open_log(now: NaiveDateTime, action: &str, subject: Option<&str>) -> RunLog {
    RunLog::new(sheet_name(now.date(), action, subject), now)
}

fn write_log<S: DocumentStore>(store: &mut S, config: &ControlConfig, log: &RunLog) -> Result<(), ReconError> {
    let sheet = store.reset_sheet(&config.control_book, log.name())?;
    log.write_to(sheet, config.log.header_font_size)?;
    log::debug!("wrote {} log lines to \"{}\"", log.lines().len(), log.name());
    Ok(())
}

/// Write the log sheet, then hand back the stage result. A stage error wins
/// over a failure to write the log.
fn finish<S: DocumentStore, T>(
    store: &mut S,
    config: &ControlConfig,
    log: &RunLog,
    result: Result<T, ReconError>,
) -> Result<T, ReconError> {
    let written = write_log(store, config, log);
    let value = result?;
    written?;
    Ok(value)
}

pub fn inventory<S: DocumentStore>(
    store: &mut S,
    prompter: &mut dyn Prompter,
    config: &ControlConfig,
    mode: InventoryMode,
    folder: &str,
    sheet: &str,
    now: NaiveDateTime,
) -> Result<InventorySummary, ReconError> {
    let action = match mode {
        InventoryMode::Nested => ACTION_INVENTORY_TESTED,
        InventoryMode::Flat => ACTION_INVENTORY_DOCUMENTED,
    };
    let mut log = open_log(now, action, Some(sheet));
    prompter.alert(&format!(
        "Capturing control IDs from folder \"{folder}\" into sheet \"{sheet}\".\nThe log of this run goes to sheet \"{}\".",
        log.name()
    ));

    let book = config.control_book.as_str();
    let result = match mode {
        InventoryMode::Nested => build_nested(store, folder, book, sheet, &config.inventory, &mut log),
        InventoryMode::Flat => build_flat(store, folder, book, sheet, &mut log),
    };
    let (_, summary) = finish(store, config, &log, result)?;

    prompter.alert("Finished capturing control IDs.");
    Ok(summary)
}

pub fn compare<S: DocumentStore>(
    store: &mut S,
    prompter: &mut dyn Prompter,
    config: &ControlConfig,
    sheets: &CompareSheets<'_>,
    now: NaiveDateTime,
) -> Result<ReconcileSummary, ReconError> {
    let book = config.control_book.as_str();
    let tested = read_inventory(store.sheet(book, sheets.tested_sheet)?);
    let documented = read_inventory(store.sheet(book, sheets.documented_sheet)?);
    log::info!(
        "comparing {} tested against {} documented controls",
        tested.len(),
        documented.len()
    );

    let mut log = open_log(now, ACTION_COMPARE, Some(sheets.mapping_sheet));
    prompter.alert(&format!(
        "Comparing \"{}\" with \"{}\" into sheet \"{}\".\nThe log of this run goes to sheet \"{}\".",
        sheets.tested_sheet,
        sheets.documented_sheet,
        sheets.mapping_sheet,
        log.name()
    ));

    let input = ReconcileInput {
        tested: &tested,
        documented: &documented,
        documented_folder: sheets.documented_folder,
    };
    let target = MappingSheet { book, sheet: sheets.mapping_sheet };
    let result = {
        let mut session = Session::new(&mut *store, &mut *prompter, &mut log);
        reconcile(&mut session, &input, &target)
    };
    let (_, summary) = finish(store, config, &log, result)?;

    prompter.alert("Finished comparing controls.");
    Ok(summary)
}

pub fn update<S: DocumentStore>(
    store: &mut S,
    prompter: &mut dyn Prompter,
    config: &ControlConfig,
    tracking_sheet: &str,
    mapping_sheet: &str,
    now: NaiveDateTime,
) -> Result<PropagationSummary, ReconError> {
    let mut log = open_log(now, ACTION_UPDATE, Some(tracking_sheet));
    prompter.alert(&format!(
        "Updating documented controls from mapping \"{mapping_sheet}\".\nThe log of this run goes to sheet \"{}\".",
        log.name()
    ));

    let target = PropagateTarget {
        book: &config.control_book,
        mapping_sheet,
        tracking_sheet,
    };
    let result = {
        let mut session = Session::new(&mut *store, &mut *prompter, &mut log);
        propagate(&mut session, &target, &config.tracking)
    };
    let summary = finish(store, config, &log, result)?;

    prompter.alert("Finished updating documented controls.");
    Ok(summary)
}

pub fn create_folders<S: DocumentStore>(
    store: &mut S,
    prompter: &mut dyn Prompter,
    config: &ControlConfig,
    now: NaiveDateTime,
) -> Result<Vec<ProvisionedParent>, ReconError> {
    let mut log = open_log(now, ACTION_PROVISION, None);
    let result = {
        let mut session = Session::new(&mut *store, &mut *prompter, &mut log);
        provision(&mut session, &config.control_book, &config.provision)
    };
    let created = finish(store, config, &log, result)?;

    prompter.alert(&format!("Created {} folder(s).", created.len()));
    Ok(created)
}
