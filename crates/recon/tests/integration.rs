use std::path::PathBuf;

use chrono::NaiveDate;
use ctrlsync_engine::{CellAddr, CellValue, Sheet};
use ctrlsync_recon::config::ControlConfig;
use ctrlsync_recon::inventory::{build_flat, build_nested};
use ctrlsync_recon::layout::{conforms, detect_variant, normalize, NormalizeOutcome, SheetRole};
use ctrlsync_recon::model::{ReconcileSummary, RowOutcome};
use ctrlsync_recon::propagate::{propagate, PropagateTarget};
use ctrlsync_recon::provision::provision;
use ctrlsync_recon::reconcile::{reconcile, MappingSheet, ReconcileInput};
use ctrlsync_recon::runlog::{Level, RunLog};
use ctrlsync_recon::template::LayoutVariant;
use ctrlsync_recon::{DocumentStore, ScriptedPrompter, Session, Workspace};

const BOOK: &str = "file-1";
const TESTED_ROOT: &str = "folder-1";
const DOCUMENTED_ROOT: &str = "folder-5";

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_workspace() -> Workspace {
    let path = fixtures_dir().join("audit.workspace.json");
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_json::from_str(&json).unwrap()
}

fn load_config() -> ControlConfig {
    let toml = std::fs::read_to_string(fixtures_dir().join("ctrlsync.toml")).unwrap();
    let config = ControlConfig::from_toml(&toml).unwrap();
    config.validate().unwrap();
    config
}

fn run_log(name: &str) -> RunLog {
    let started = NaiveDate::from_ymd_opt(2025, 3, 4)
        .unwrap()
        .and_hms_opt(9, 5, 0)
        .unwrap();
    RunLog::new(name, started)
}

fn cell(ws: &Workspace, file: &str, sheet: &str, a1: &str) -> CellValue {
    ws.sheet(file, sheet)
        .unwrap()
        .get_value(CellAddr::parse(a1).unwrap())
}

/// Inventory both folders and reconcile them, answering prompts from `answers`.
fn inventory_and_compare(ws: &mut Workspace, answers: &[&str]) -> (ReconcileSummary, ScriptedPrompter, RunLog) {
    let config = load_config();
    let mut log = run_log("compare");
    let (tested, _) = build_nested(ws, TESTED_ROOT, BOOK, "Tested", &config.inventory, &mut log).unwrap();
    let (documented, _) = build_flat(ws, DOCUMENTED_ROOT, BOOK, "Documented", &mut log).unwrap();

    let mut prompter = ScriptedPrompter::new(answers.iter().copied());
    let summary = {
        let mut session = Session::new(ws, &mut prompter, &mut log);
        let input = ReconcileInput {
            tested: &tested,
            documented: &documented,
            documented_folder: DOCUMENTED_ROOT,
        };
        let target = MappingSheet { book: BOOK, sheet: "Mapping" };
        reconcile(&mut session, &input, &target).unwrap().1
    };
    (summary, prompter, log)
}

fn update(ws: &mut Workspace) -> (Vec<(String, RowOutcome)>, RunLog) {
    let config = load_config();
    let mut prompter = ScriptedPrompter::default();
    let mut log = run_log("update");
    let summary = {
        let mut session = Session::new(ws, &mut prompter, &mut log);
        let target = PropagateTarget {
            book: BOOK,
            mapping_sheet: "Mapping",
            tracking_sheet: "Agenda",
        };
        propagate(&mut session, &target, &config.tracking).unwrap()
    };
    (summary.outcomes, log)
}

// -------------------------------------------------------------------------
// Layout normalization on stored sheets
// -------------------------------------------------------------------------

#[test]
fn stray_header_row_removed_and_normalize_idempotent() {
    let mut ws = load_workspace();
    let mut log = run_log("layout");
    let sheet: &mut Sheet = ws.sheet_mut("file-3", "Hoja 1").unwrap();
    assert_eq!(detect_variant(sheet), LayoutVariant::SixRowHeader);

    let first = normalize(sheet, SheetRole::Source, &mut log);
    assert!(matches!(first, NormalizeOutcome::Corrected(_)));
    assert_eq!(detect_variant(sheet), LayoutVariant::FiveRowHeader);
    assert!(conforms(sheet));
    assert_eq!(sheet.rows, 14);

    let snapshot = sheet.clone();
    assert_eq!(normalize(sheet, SheetRole::Source, &mut log), NormalizeOutcome::Conforming);
    assert_eq!(*sheet, snapshot);
    assert_eq!(log.count(Level::Warn), 1);
}

#[test]
fn missing_gap_row_restored_in_documented_sheet() {
    let mut ws = load_workspace();
    let mut log = run_log("layout");
    let sheet = ws.sheet_mut("file-6", "Control").unwrap();
    assert!(!conforms(sheet));

    normalize(sheet, SheetRole::Destination, &mut log);

    assert!(conforms(sheet));
    assert_eq!(sheet.get_value(CellAddr::parse("F14").unwrap()), CellValue::Number(2.0));
    assert_eq!(sheet.get_value(CellAddr::parse("B12").unwrap()), CellValue::text("Inspect two reviews"));
}

// -------------------------------------------------------------------------
// End to end: inventory -> compare -> update
// -------------------------------------------------------------------------

#[test]
fn full_pipeline_updates_documented_controls_and_agenda() {
    let mut ws = load_workspace();

    let (summary, prompter, log) = inventory_and_compare(&mut ws, &[]);
    assert_eq!(summary, ReconcileSummary { matched: 2, ..Default::default() });
    assert!(prompter.prompts.is_empty());
    // The foreign-format BACKUPS file cannot be inventoried.
    assert_eq!(log.count(Level::Error), 1);
    assert_eq!(cell(&ws, BOOK, "Tested", "A1"), CellValue::text("Tested 2024"));
    assert_eq!(cell(&ws, BOOK, "Mapping", "E2"), CellValue::text("PAYROLL"));
    assert_eq!(cell(&ws, BOOK, "Mapping", "E3"), CellValue::text("ACCESS REVIEW_DOC"));

    let (outcomes, log) = update(&mut ws);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|(_, o)| matches!(o, RowOutcome::Updated { tracked: true, .. })));

    // PAYROLL: frequency and description copied, evidence left alone.
    assert_eq!(cell(&ws, "file-5", "Control", "D3"), CellValue::text("Trimestral"));
    assert_eq!(
        cell(&ws, "file-5", "Control", "B6"),
        CellValue::text("Payroll is now reviewed quarterly")
    );
    assert_eq!(cell(&ws, "file-5", "Control", "B8"), CellValue::text("Signed payroll report"));
    assert_eq!(cell(&ws, "file-5", "Control", "F14"), CellValue::Number(5.0));

    // ACCESS REVIEW: both sheets were normalized before copying.
    assert_eq!(cell(&ws, "file-6", "Control", "A3"), CellValue::text("Automático"));
    assert_eq!(
        cell(&ws, "file-6", "Control", "B6"),
        CellValue::text("Access list reviewed weekly")
    );
    assert_eq!(cell(&ws, "file-6", "Control", "F14"), CellValue::Number(10.0));

    assert_eq!(cell(&ws, BOOK, "Agenda", "B3"), CellValue::text("OK"));
    assert_eq!(cell(&ws, BOOK, "Agenda", "D3"), CellValue::text("Trimestral, 5"));
    assert_eq!(cell(&ws, BOOK, "Agenda", "E4"), CellValue::text("10"));
    assert_eq!(cell(&ws, BOOK, "Agenda", "B5"), CellValue::Empty);
    assert_eq!(log.count(Level::Warn), 2);
}

#[test]
fn copied_labels_listed_once_per_field() {
    let mut ws = load_workspace();
    inventory_and_compare(&mut ws, &[]);
    let (outcomes, _) = update(&mut ws);

    let RowOutcome::Updated { copied, .. } = &outcomes[0].1 else {
        panic!("PAYROLL row skipped");
    };
    for label in copied {
        assert_eq!(copied.iter().filter(|l| *l == label).count(), 1, "{label} repeated");
    }
    let agenda = cell(&ws, BOOK, "Agenda", "C3").display();
    assert_eq!(agenda.matches("Descripción. Actualizaciones").count(), 1);
}

#[test]
fn declined_copy_leaves_store_and_mapping_unchanged() {
    let mut ws = load_workspace();
    ws.files.retain(|f| f.id != "file-6");
    let files_before = ws.files.len();

    let (summary, prompter, log) = inventory_and_compare(&mut ws, &["n"]);

    assert_eq!(summary, ReconcileSummary { matched: 1, declined: 1, ..Default::default() });
    assert_eq!(prompter.prompts.len(), 1);
    assert_eq!(ws.files.len(), files_before);
    assert_eq!(cell(&ws, BOOK, "Mapping", "A3"), CellValue::Empty);
    assert!(log.contains("WARNING: control not created: \"ACCESS REVIEW\""));
}

#[test]
fn accepted_copy_is_mapped_and_propagated() {
    let mut ws = load_workspace();
    ws.files.retain(|f| f.id != "file-6");

    let (summary, _, _) = inventory_and_compare(&mut ws, &["yes", "Y", "ACCESS REVIEW_2025"]);
    assert_eq!(summary.created, 1);

    let copy = ws
        .files(DOCUMENTED_ROOT)
        .unwrap()
        .into_iter()
        .find(|f| f.name == "ACCESS REVIEW_2025")
        .unwrap();
    assert_eq!(cell(&ws, BOOK, "Mapping", "C3"), CellValue::text(&copy.id));
    assert_eq!(cell(&ws, BOOK, "Mapping", "D3"), CellValue::text("Hoja 1"));

    let (outcomes, _) = update(&mut ws);
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[1].1, RowOutcome::Updated { tracked: false, .. }));
}

#[test]
fn leftover_update_value_warns_exactly_once() {
    let mut ws = load_workspace();
    ws.sheet_mut("file-5", "Control")
        .unwrap()
        .set_value(CellAddr::parse("C13").unwrap(), CellValue::text("left over"));

    inventory_and_compare(&mut ws, &[]);
    let (_, log) = update(&mut ws);

    let warnings: Vec<&str> = log
        .lines()
        .iter()
        .filter(|l| l.level == Level::Warn && l.text.contains("NOT empty"))
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(warnings, vec!["WARNING: The field \"B13:F13\" is NOT empty when it should be."]);
}

// -------------------------------------------------------------------------
// Provisioning
// -------------------------------------------------------------------------

#[test]
fn provisioning_builds_folders_under_top_level() {
    let mut ws = load_workspace();
    let config = load_config();
    {
        let book = ws.spreadsheet_mut(BOOK).unwrap();
        let sheet = book.insert_sheet(&config.provision.sheet).unwrap();
        sheet.set_value(CellAddr::parse("C7").unwrap(), CellValue::text(DOCUMENTED_ROOT));
        sheet.set_value(CellAddr::parse("A14").unwrap(), CellValue::text("BACKUPS"));
        sheet.set_value(CellAddr::parse("B14").unwrap(), CellValue::text("ROLL FORWARD, EVIDENCIAS"));
    }

    let mut prompter = ScriptedPrompter::default();
    let mut log = run_log("provision");
    let created = {
        let mut session = Session::new(&mut ws, &mut prompter, &mut log);
        provision(&mut session, BOOK, &config.provision).unwrap()
    };

    assert_eq!(created.len(), 1);
    let parent = ws
        .subfolders(DOCUMENTED_ROOT)
        .unwrap()
        .into_iter()
        .find(|f| f.name == "BACKUPS")
        .unwrap();
    assert_eq!(parent.id, created[0].folder_id);
    assert_eq!(ws.subfolders(&parent.id).unwrap().len(), 2);
    assert_eq!(ws.files(&parent.id).unwrap()[0].name, "BACKUPS");
    assert!(created[0].roll_forward_id.is_some());
    assert!(log.contains("Folder \"BACKUPS\" created."));
}
