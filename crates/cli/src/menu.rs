//! Interactive menu: the numbered action loop run by `ctrlsync menu`.

use chrono::NaiveDateTime;
use ctrlsync_recon::interact::{ask_existing_sheet, ask_non_empty, ask_yes_no, Button};
use ctrlsync_recon::{ControlConfig, DocumentStore, Prompter, ReconError};

use crate::actions::{self, CompareSheets, InventoryMode};

pub const MENU_PROMPT: &str = "Enter the number of the action to run:\n\
    (1) Copy IDs from the folder of documented controls.\n\
    (2) Copy IDs from a folder of tested control folders.\n\
    (3) Compare tested and documented controls.\n\
    (4) Update documented controls.\n\
    (5) Exit.";

const ANOTHER_ACTION: &str = "Do you want to run another action? (y/n)";

enum Step {
    Continue,
    Exit,
}

/// Run menu actions until the user picks Exit or declines another action.
///
/// A failing action is reported and the loop goes on. An interaction error
/// ends the menu, since no further answer can be read.
pub fn run<S: DocumentStore>(
    store: &mut S,
    prompter: &mut dyn Prompter,
    config: &ControlConfig,
    now: NaiveDateTime,
) -> Result<(), ReconError> {
    loop {
        let choice = prompter.prompt(MENU_PROMPT)?;
        if choice.button == Button::Close {
            break;
        }

        match run_choice(store, prompter, config, choice.text.trim(), now) {
            Ok(Step::Exit) => break,
            Ok(Step::Continue) => {}
            Err(e @ ReconError::Interaction(_)) => return Err(e),
            Err(e) => {
                log::warn!("menu action failed: {e}");
                prompter.alert(&format!("ERROR: {e}"));
            }
        }

        if !ask_yes_no(prompter, ANOTHER_ACTION)? {
            break;
        }
    }

    prompter.alert("The program has finished.");
    Ok(())
}

fn run_choice<S: DocumentStore>(
    store: &mut S,
    prompter: &mut dyn Prompter,
    config: &ControlConfig,
    choice: &str,
    now: NaiveDateTime,
) -> Result<Step, ReconError> {
    let book = config.control_book.as_str();
    match choice {
        "1" | "2" => {
            let (mode, kind) = if choice == "1" {
                (InventoryMode::Flat, "the documented controls")
            } else {
                (InventoryMode::Nested, "the tested control folders")
            };
            let folder = ask_non_empty(prompter, &format!("Enter the ID of the FOLDER holding {kind}:"))?;
            let sheet = ask_non_empty(prompter, "Enter the NAME of the SHEET that will hold the control IDs:")?;
            actions::inventory(store, prompter, config, mode, &folder, &sheet, now)?;
        }
        "3" => {
            let exists = |name: &str| store.sheet_exists(book, name);
            let Some(tested) = ask_existing_sheet(prompter, "Enter the NAME of the SHEET with the tested control IDs:", exists)? else {
                return Ok(Step::Continue);
            };
            let Some(documented) = ask_existing_sheet(prompter, "Enter the NAME of the SHEET with the documented control IDs:", exists)? else {
                return Ok(Step::Continue);
            };
            let folder = ask_non_empty(prompter, "Enter the ID of the FOLDER holding the documented controls:")?;
            let mapping = ask_non_empty(prompter, "Enter the NAME of the SHEET that will hold the comparison:")?;
            let sheets = CompareSheets {
                tested_sheet: &tested,
                documented_sheet: &documented,
                documented_folder: &folder,
                mapping_sheet: &mapping,
            };
            actions::compare(store, prompter, config, &sheets, now)?;
        }
        "4" => {
            let exists = |name: &str| store.sheet_exists(book, name);
            let Some(tracking) = ask_existing_sheet(prompter, "Enter the NAME of the tracking SHEET:", exists)? else {
                return Ok(Step::Continue);
            };
            let Some(mapping) = ask_existing_sheet(prompter, "Enter the NAME of the SHEET with the comparison:", exists)? else {
                return Ok(Step::Continue);
            };
            actions::update(store, prompter, config, &tracking, &mapping, now)?;
        }
        "5" => return Ok(Step::Exit),
        other => prompter.alert(&format!("Invalid option \"{other}\". Please enter a number from 1 to 5.")),
    }
    Ok(Step::Continue)
}
