//! Batch creation of audit folder trees from the provisioning sheet.
//!
//! Sheet layout: the top-level folder id in C7, a spreadsheet name extension
//! in C9, parent folder names in column A from row 14 and the comma-separated
//! child folder names in B14, shared by every parent.

use ctrlsync_engine::spreadsheet::{DEFAULT_COLS, DEFAULT_ROWS};
use ctrlsync_engine::{CellAddr, CellValue};

use crate::config::ProvisionConfig;
use crate::error::ReconError;
use crate::grid::Grid;
use crate::model::ProvisionedParent;
use crate::runlog::SEPARATOR;
use crate::session::Session;
use crate::store::DocumentStore;

/// 0-based row of the first parent entry (row 14).
const FIRST_PARENT_ROW: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPlan {
    pub top_folder: String,
    pub extension: String,
    pub children: Vec<String>,
    /// `(0-based row, parent name)` for every non-blank name in column A.
    pub parents: Vec<(usize, String)>,
}

impl ProvisionPlan {
    pub fn from_grid<G: Grid + ?Sized>(grid: &G) -> Self {
        let children = grid
            .text(CellAddr::at(14, 'B'))
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let parents = (FIRST_PARENT_ROW..grid.last_row())
            .filter_map(|row| {
                let name = grid.text(CellAddr::new(row, 0)).trim().to_string();
                (!name.is_empty()).then_some((row, name))
            })
            .collect();

        Self {
            top_folder: grid.text(CellAddr::at(7, 'C')).trim().to_string(),
            extension: grid.text(CellAddr::at(9, 'C')).trim().to_string(),
            children,
            parents,
        }
    }
}

/// Create every parent folder of the plan with its children and spreadsheets.
///
/// Created ids go back into the provisioning sheet: the parent spreadsheet in
/// column C, the roll-forward spreadsheet in column D of the parent's row.
pub fn provision<S: DocumentStore>(
    session: &mut Session<'_, S>,
    book: &str,
    config: &ProvisionConfig,
) -> Result<Vec<ProvisionedParent>, ReconError> {
    let plan = ProvisionPlan::from_grid(session.store.sheet(book, &config.sheet)?);

    if session.store.folder_name(&plan.top_folder).is_err() {
        let msg = format!(
            "The folder with the ID given in cell C7 (\"{}\") does not exist. Please check that the ID is correct.",
            plan.top_folder
        );
        session.prompter.alert(&msg);
        session.log.error(&msg);
        return Err(ReconError::FolderNotFound(plan.top_folder));
    }

    let mut created = Vec::new();
    for (row, parent) in &plan.parents {
        let result = provision_parent(session, &plan, parent, config)?;

        let sheet = session.store.sheet_mut(book, &config.sheet)?;
        sheet.set_value(CellAddr::new(*row, 2), CellValue::text(&result.spreadsheet_id))?;
        if let Some(id) = &result.roll_forward_id {
            sheet.set_value(CellAddr::new(*row, 3), CellValue::text(id))?;
        }
        created.push(result);
    }

    log::info!("provisioned {} parent folders", created.len());
    Ok(created)
}

fn provision_parent<S: DocumentStore>(
    session: &mut Session<'_, S>,
    plan: &ProvisionPlan,
    parent: &str,
    config: &ProvisionConfig,
) -> Result<ProvisionedParent, ReconError> {
    let store = &mut *session.store;
    let log = &mut *session.log;

    let folder_id = store.create_folder(&plan.top_folder, parent)?;
    log.info(SEPARATOR);
    log.info(&format!("Folder \"{parent}\" created."));

    let mut roll_forward = None;
    for child in &plan.children {
        let child_id = store.create_folder(&folder_id, child)?;
        if *child == config.roll_forward_folder {
            let name = format!("{parent}_{}{}", config.roll_forward_folder, plan.extension);
            let id = store.create_spreadsheet(&name, DEFAULT_ROWS, DEFAULT_COLS)?;
            store.move_file(&id, &child_id)?;
            roll_forward = Some((name, id));
        }
    }
    let quoted: Vec<String> = plan.children.iter().map(|c| format!("\"{c}\"")).collect();
    log.info(&format!(
        "Subfolders {} created for folder \"{parent}\".",
        quoted.join(", ")
    ));

    let name = format!("{parent}{}", plan.extension);
    let spreadsheet_id = store.create_spreadsheet(&name, config.rows, config.cols)?;
    store.move_file(&spreadsheet_id, &folder_id)?;

    match &roll_forward {
        Some((rf_name, _)) => log.info(&format!(
            "Spreadsheets \"{name}\" and \"{rf_name}\" created for folder \"{parent}\"."
        )),
        None => log.info(&format!("Spreadsheet \"{name}\" created for folder \"{parent}\".")),
    }
    log.info(SEPARATOR);

    Ok(ProvisionedParent {
        name: parent.to_string(),
        folder_id,
        spreadsheet_id,
        roll_forward_id: roll_forward.map(|(_, id)| id),
    })
}
