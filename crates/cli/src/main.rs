// ctrlsync CLI - audit control inventory, reconciliation and update pipeline

mod actions;
mod context;
mod exit_codes;
mod menu;
mod prompter;
mod store_ops;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use ctrlsync_recon::model::RowOutcome;
use ctrlsync_recon::runlog::sheet_name;
use ctrlsync_recon::{DocumentStore, Prompter, ReconError};

use actions::{CompareSheets, InventoryMode};
use context::Context;
use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_EXPORT_IO, EXIT_SUCCESS, EXIT_UPDATE_SKIPPED, EXIT_USAGE};
use prompter::{ReplayPrompter, TerminalPrompter};

#[derive(Parser)]
#[command(name = "ctrlsync")]
#[command(about = "Inventory, compare and update audit control spreadsheets")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file; its `workspace` path is resolved relative to it
    #[arg(long, short = 'c', global = true, default_value = "ctrlsync.toml", env = "CTRLSYNC_CONFIG")]
    config: PathBuf,

    /// Answer prompts from FILE (one answer per line, `<close>` dismisses) instead of the terminal
    #[arg(long, global = true, value_name = "FILE")]
    answers: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture control ids from a folder into an inventory sheet of the control book
    #[command(subcommand)]
    Inventory(InventoryCommands),

    /// Match a tested inventory against a documented one and write the mapping sheet
    #[command(after_help = "\
Examples:
  ctrlsync compare --tested Tested --documented Documented --folder folder-5 --mapping Mapping
  ctrlsync compare --tested Tested --documented Documented --folder folder-5 --mapping Mapping --answers answers.txt

Unmatched tested controls prompt for a copy into --folder.")]
    Compare {
        /// Inventory sheet of tested controls
        #[arg(long)]
        tested: String,

        /// Inventory sheet of documented controls
        #[arg(long)]
        documented: String,

        /// Folder that receives copies of unmatched tested controls
        #[arg(long)]
        folder: String,

        /// Mapping sheet to create or overwrite
        #[arg(long)]
        mapping: String,
    },

    /// Copy tested fields into documented controls and update the tracking sheet
    #[command(after_help = "\
Examples:
  ctrlsync update --tracking Agenda --mapping Mapping

Exits 12 when one or more mapping rows were skipped; the run log sheet says why.")]
    Update {
        /// Tracking sheet of the control book
        #[arg(long)]
        tracking: String,

        /// Mapping sheet written by `compare`
        #[arg(long)]
        mapping: String,
    },

    /// Create the folder tree described by the provisioning sheet
    Provision,

    /// Run the interactive numbered menu
    Menu,

    /// Check the config and that the workspace and control book load
    Validate,

    /// Export one tab of a spreadsheet as CSV
    #[command(after_help = "\
Examples:
  ctrlsync export file-1 Mapping -o mapping.csv
  ctrlsync export file-1 Agenda -o agenda.tsv --tsv")]
    Export {
        /// Spreadsheet id
        file: String,

        /// Tab name
        sheet: String,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Tab-separated instead of comma-separated
        #[arg(long)]
        tsv: bool,
    },

    /// Inspect or tidy the workspace
    #[command(subcommand)]
    Store(StoreCommands),
}

#[derive(Subcommand)]
enum InventoryCommands {
    /// Each subfolder of FOLDER is one tested control
    Nested {
        /// Folder holding one folder per control
        #[arg(long)]
        folder: String,

        /// Inventory sheet to create or overwrite
        #[arg(long)]
        sheet: String,
    },
    /// Each spreadsheet in FOLDER is one documented control
    Flat {
        /// Folder holding the control spreadsheets
        #[arg(long)]
        folder: String,

        /// Inventory sheet to create or overwrite
        #[arg(long)]
        sheet: String,
    },
}

#[derive(Subcommand)]
enum StoreCommands {
    /// List folders, files and tabs as a tree
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename a file
    Rename { file: String, name: String },
    /// Delete a tab from a spreadsheet
    DropSheet { file: String, sheet: String },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("CTRLSYNC_COMMIT"), ")",
            "\nrecon:   ctrlsync-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("CTRLSYNC_TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("CTRLSYNC_COMMIT"), ")",
            "\nrecon:   ctrlsync-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("CTRLSYNC_TARGET"),
        )
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_path();
    let answers = cli.answers.as_deref();

    let result = match cli.command {
        None => {
            eprintln!("Usage: ctrlsync <command> [options]");
            eprintln!("       ctrlsync --help for more information");
            Ok(())
        }
        Some(Commands::Inventory(cmd)) => match cmd {
            InventoryCommands::Nested { folder, sheet } => {
                cmd_inventory(config, answers, InventoryMode::Nested, folder, sheet)
            }
            InventoryCommands::Flat { folder, sheet } => {
                cmd_inventory(config, answers, InventoryMode::Flat, folder, sheet)
            }
        },
        Some(Commands::Compare { tested, documented, folder, mapping }) => {
            cmd_compare(config, answers, tested, documented, folder, mapping)
        }
        Some(Commands::Update { tracking, mapping }) => cmd_update(config, answers, tracking, mapping),
        Some(Commands::Provision) => cmd_provision(config, answers),
        Some(Commands::Menu) => cmd_menu(config, answers),
        Some(Commands::Validate) => cmd_validate(config),
        Some(Commands::Export { file, sheet, output, tsv }) => cmd_export(config, file, sheet, output, tsv),
        Some(Commands::Store(cmd)) => match cmd {
            StoreCommands::Ls { json } => cmd_store_ls(config, json),
            StoreCommands::Rename { file, name } => cmd_store_rename(config, file, name),
            StoreCommands::DropSheet { file, sheet } => cmd_store_drop_sheet(config, file, sheet),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self { code: EXIT_EXPORT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::FolderNotFound(_) | ReconError::FileNotFound(_) => {
                Some("run `ctrlsync store ls` to list folder and file ids".to_string())
            }
            ReconError::SheetNotFound { .. } => {
                Some("run `ctrlsync store ls` to see the tabs of each spreadsheet".to_string())
            }
            ReconError::Interaction(_) => {
                Some("with --answers, the file needs one line per prompt".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn open_prompter(answers: Option<&Path>) -> Result<Box<dyn Prompter>, CliError> {
    match answers {
        Some(path) => {
            let replay = ReplayPrompter::from_file(path).map_err(CliError::usage)?;
            Ok(Box::new(replay))
        }
        None => Ok(Box::new(TerminalPrompter)),
    }
}

// ---------------------------------------------------------------------------
// Pipeline commands
// ---------------------------------------------------------------------------
//
// Each one saves the workspace whether or not the action succeeds.

fn cmd_inventory(
    config: &Path,
    answers: Option<&Path>,
    mode: InventoryMode,
    folder: String,
    sheet: String,
) -> Result<(), CliError> {
    let mut ctx = Context::load(config)?;
    let mut prompter = open_prompter(answers)?;

    let result = actions::inventory(&mut ctx.workspace, prompter.as_mut(), &ctx.config, mode, &folder, &sheet, now());
    ctx.save()?;
    let summary = result?;

    println!(
        "captured {} control(s) into \"{}\" ({} foreign, {} unreadable)",
        summary.captured, sheet, summary.foreign_skipped, summary.unreadable
    );
    Ok(())
}

fn cmd_compare(
    config: &Path,
    answers: Option<&Path>,
    tested: String,
    documented: String,
    folder: String,
    mapping: String,
) -> Result<(), CliError> {
    let mut ctx = Context::load(config)?;
    let mut prompter = open_prompter(answers)?;

    let sheets = CompareSheets {
        tested_sheet: &tested,
        documented_sheet: &documented,
        documented_folder: &folder,
        mapping_sheet: &mapping,
    };
    let result = actions::compare(&mut ctx.workspace, prompter.as_mut(), &ctx.config, &sheets, now());
    ctx.save()?;
    let summary = result?;

    println!(
        "mapping \"{}\": {} matched, {} created, {} declined, {} failed",
        mapping, summary.matched, summary.created, summary.declined, summary.failed
    );
    Ok(())
}

fn cmd_update(config: &Path, answers: Option<&Path>, tracking: String, mapping: String) -> Result<(), CliError> {
    let mut ctx = Context::load(config)?;
    let mut prompter = open_prompter(answers)?;
    let started = now();

    let result = actions::update(&mut ctx.workspace, prompter.as_mut(), &ctx.config, &tracking, &mapping, started);
    ctx.save()?;
    let summary = result?;

    for (control, outcome) in &summary.outcomes {
        match outcome {
            RowOutcome::Updated { copied, tracked } => {
                let fields = if copied.is_empty() { "no fields".to_string() } else { copied.join(", ") };
                let tracking_note = if *tracked { "" } else { " (no tracking row)" };
                println!("updated  {control}: {fields}{tracking_note}");
            }
            RowOutcome::Skipped { reason } => println!("skipped  {control}: {reason}"),
        }
    }
    println!("{} updated, {} skipped", summary.updated(), summary.skipped());

    if summary.skipped() > 0 {
        let log_sheet = sheet_name(started.date(), actions::ACTION_UPDATE, Some(&tracking));
        return Err(CliError {
            code: EXIT_UPDATE_SKIPPED,
            message: format!("{} mapping row(s) skipped", summary.skipped()),
            hint: Some(format!("see the log sheet \"{log_sheet}\"")),
        });
    }
    Ok(())
}

fn cmd_provision(config: &Path, answers: Option<&Path>) -> Result<(), CliError> {
    let mut ctx = Context::load(config)?;
    let mut prompter = open_prompter(answers)?;

    let result = actions::create_folders(&mut ctx.workspace, prompter.as_mut(), &ctx.config, now());
    ctx.save()?;

    for parent in result? {
        println!(
            "{}  folder {}  spreadsheet {}  roll-forward {}",
            parent.name,
            parent.folder_id,
            parent.spreadsheet_id,
            parent.roll_forward_id.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn cmd_menu(config: &Path, answers: Option<&Path>) -> Result<(), CliError> {
    let mut ctx = Context::load(config)?;
    let mut prompter = open_prompter(answers)?;

    let result = menu::run(&mut ctx.workspace, prompter.as_mut(), &ctx.config, now());
    ctx.save()?;
    result.map_err(CliError::from)
}

// ---------------------------------------------------------------------------
// Workspace commands
// ---------------------------------------------------------------------------

fn cmd_validate(config: &Path) -> Result<(), CliError> {
    let ctx = Context::load(config)?;
    let book = &ctx.config.control_book;
    let tabs = ctx
        .workspace
        .sheet_names(book)
        .map_err(|e| CliError::from(e).with_hint("`control_book` must be the id of a spreadsheet in the workspace"))?;

    eprintln!(
        "valid: control book \"{}\" with {} tab(s), workspace {} with {} folder(s) and {} file(s)",
        book,
        tabs.len(),
        ctx.workspace_path.display(),
        ctx.workspace.folders.len(),
        ctx.workspace.files.len(),
    );
    Ok(())
}

fn cmd_export(config: &Path, file: String, sheet: String, output: PathBuf, tsv: bool) -> Result<(), CliError> {
    let ctx = Context::load(config)?;
    let tab = ctx.workspace.sheet(&file, &sheet)?;

    let written = if tsv {
        ctrlsync_io::csv::export_tsv(tab, &output)
    } else {
        ctrlsync_io::csv::export_sheet(tab, &output)
    };
    written.map_err(CliError::export)?;

    eprintln!("exported {}/{} to {}", file, sheet, output.display());
    Ok(())
}

fn cmd_store_ls(config: &Path, json: bool) -> Result<(), CliError> {
    let ctx = Context::load(config)?;
    let entries = store_ops::list(&ctx.workspace)?;

    if json {
        let out = serde_json::to_string_pretty(&entries).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: e.to_string(),
            hint: None,
        })?;
        println!("{out}");
    } else {
        for entry in &entries {
            println!("{}", store_ops::format_entry(entry));
        }
    }
    Ok(())
}

fn cmd_store_rename(config: &Path, file: String, name: String) -> Result<(), CliError> {
    let mut ctx = Context::load(config)?;
    ctx.workspace.rename_file(&file, &name)?;
    ctx.save()?;
    eprintln!("renamed {} to \"{}\"", file, name);
    Ok(())
}

fn cmd_store_drop_sheet(config: &Path, file: String, sheet: String) -> Result<(), CliError> {
    let mut ctx = Context::load(config)?;
    ctx.workspace.delete_sheet(&file, &sheet)?;
    ctx.save()?;
    eprintln!("deleted tab \"{}\" from {}", sheet, file);
    Ok(())
}
