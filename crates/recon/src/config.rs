use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    /// Workspace file, relative to the config file.
    #[serde(default = "default_workspace")]
    pub workspace: String,
    /// Spreadsheet hosting the inventory, mapping, tracking and log tabs.
    pub control_book: String,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub provision: ProvisionConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_workspace() -> String {
    "workspace.json".into()
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    /// Status suffixes cut from nested-mode display names; first hit wins.
    #[serde(default = "default_status_suffixes")]
    pub status_suffixes: Vec<String>,
}

fn default_status_suffixes() -> Vec<String> {
    vec!["_PASA".into(), "_FALLA".into(), "_INCONCLUSO".into()]
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            status_suffixes: default_status_suffixes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// 1-based row of the first tracked control.
    #[serde(default = "default_first_row")]
    pub first_row: usize,
    #[serde(default = "default_ok_marker")]
    pub ok_marker: String,
}

fn default_first_row() -> usize {
    3
}

fn default_ok_marker() -> String {
    "OK".into()
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            first_row: default_first_row(),
            ok_marker: default_ok_marker(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionConfig {
    #[serde(default = "default_provision_sheet")]
    pub sheet: String,
    /// Child folder that also receives a roll-forward spreadsheet.
    #[serde(default = "default_roll_forward")]
    pub roll_forward_folder: String,
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
}

fn default_provision_sheet() -> String {
    "Crear Carpetas".into()
}

fn default_roll_forward() -> String {
    "ROLL FORWARD".into()
}

fn default_rows() -> usize {
    100
}

fn default_cols() -> usize {
    50
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            sheet: default_provision_sheet(),
            roll_forward_folder: default_roll_forward(),
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_header_font_size")]
    pub header_font_size: f32,
}

fn default_header_font_size() -> f32 {
    14.0
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            header_font_size: default_header_font_size(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ControlConfig {
    /// Config with every section at its default, bound to one control book.
    pub fn for_book(control_book: impl Into<String>) -> Self {
        Self {
            workspace: default_workspace(),
            control_book: control_book.into(),
            inventory: InventoryConfig::default(),
            tracking: TrackingConfig::default(),
            provision: ProvisionConfig::default(),
            log: LogConfig::default(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ControlConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.control_book.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "control_book must not be empty".into(),
            ));
        }

        if self.workspace.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "workspace must not be empty".into(),
            ));
        }

        if let Some(i) = self
            .inventory
            .status_suffixes
            .iter()
            .position(|s| s.is_empty())
        {
            return Err(ReconError::ConfigValidation(format!(
                "inventory.status_suffixes[{i}] is empty"
            )));
        }

        if self.tracking.first_row == 0 {
            return Err(ReconError::ConfigValidation(
                "tracking.first_row is 1-based, got 0".into(),
            ));
        }

        if self.tracking.ok_marker.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "tracking.ok_marker must not be blank".into(),
            ));
        }

        if self.provision.sheet.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "provision.sheet must not be empty".into(),
            ));
        }

        if self.provision.rows == 0 || self.provision.cols == 0 {
            return Err(ReconError::ConfigValidation(format!(
                "provision spreadsheet size must be non-zero, got {} x {}",
                self.provision.rows, self.provision.cols
            )));
        }

        if !(self.log.header_font_size > 0.0) {
            return Err(ReconError::ConfigValidation(format!(
                "log.header_font_size must be positive, got {}",
                self.log.header_font_size
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
