// Config and workspace loading shared by every command.

use std::path::{Path, PathBuf};

use ctrlsync_io::workspace_file;
use ctrlsync_recon::{ControlConfig, Workspace};

use crate::exit_codes::{EXIT_CONFIG, EXIT_WORKSPACE_IO};
use crate::CliError;

pub struct Context {
    pub config: ControlConfig,
    pub workspace_path: PathBuf,
    pub workspace: Workspace,
}

impl Context {
    /// Read and validate the config, then load the workspace it points at.
    /// The workspace path is resolved against the config file's directory.
    pub fn load(config_path: &Path) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        let base = config_path.parent().unwrap_or_else(|| Path::new(""));
        let workspace_path = base.join(&config.workspace);
        let workspace = workspace_file::load(&workspace_path).map_err(|e| CliError {
            code: EXIT_WORKSPACE_IO,
            message: e,
            hint: Some(format!(
                "the `workspace` key in {} is resolved relative to that file",
                config_path.display()
            )),
        })?;
        log::debug!(
            "loaded workspace {} ({} folders, {} files)",
            workspace_path.display(),
            workspace.folders.len(),
            workspace.files.len()
        );
        Ok(Self { config, workspace_path, workspace })
    }

    pub fn save(&self) -> Result<(), CliError> {
        workspace_file::save(&self.workspace, &self.workspace_path).map_err(|e| CliError {
            code: EXIT_WORKSPACE_IO,
            message: e,
            hint: None,
        })
    }
}

pub fn load_config(path: &Path) -> Result<ControlConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError {
            code: EXIT_CONFIG,
            message: format!("cannot read config {}: {}", path.display(), e),
            hint: None,
        }
        .with_hint("pass --config <FILE> or create ctrlsync.toml in the current directory")
    })?;
    ControlConfig::from_toml(&text).map_err(|e| CliError::from(e).with_hint(format!("in {}", path.display())))
}
