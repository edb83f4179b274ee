use std::fmt;

use ctrlsync_engine::AddressError;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty suffix list, zero-sized sheet, etc.).
    ConfigValidation(String),
    /// No folder with this id in the document store.
    FolderNotFound(String),
    /// No file with this id in the document store.
    FileNotFound(String),
    /// The file exists but has no tab with this name.
    SheetNotFound { file: String, sheet: String },
    /// The file exists but is not a native spreadsheet.
    NotASpreadsheet(String),
    /// Bad range reference or data shape.
    Range(String),
    /// The user-interaction channel failed or was closed.
    Interaction(String),
    /// Any other document-store failure.
    Store(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::FolderNotFound(id) => write!(f, "folder not found: \"{id}\""),
            Self::FileNotFound(id) => write!(f, "file not found: \"{id}\""),
            Self::SheetNotFound { file, sheet } => {
                write!(f, "file \"{file}\": no sheet named \"{sheet}\"")
            }
            Self::NotASpreadsheet(id) => write!(f, "file \"{id}\" is not a spreadsheet"),
            Self::Range(msg) => write!(f, "range error: {msg}"),
            Self::Interaction(msg) => write!(f, "interaction error: {msg}"),
            Self::Store(msg) => write!(f, "document store error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<AddressError> for ReconError {
    fn from(e: AddressError) -> Self {
        Self::Range(e.to_string())
    }
}
