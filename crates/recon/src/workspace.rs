//! In-memory document store, serialized as a JSON workspace file.

use ctrlsync_engine::{Sheet, Spreadsheet};
use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::store::{DocumentStore, FileEntry, FolderEntry, SPREADSHEET_MIME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub mime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Tab contents; present only for native spreadsheets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreadsheet: Option<Spreadsheet>,
}

/// Folders and files in insertion order, which is also the listing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub folders: Vec<FolderRecord>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&mut self, parent: Option<&str>, name: &str) -> String {
        let id = self.fresh_id("folder");
        self.folders.push(FolderRecord {
            id: id.clone(),
            name: name.to_string(),
            parent: parent.map(str::to_string),
        });
        id
    }

    pub fn add_spreadsheet(&mut self, folder: Option<&str>, name: &str, spreadsheet: Spreadsheet) -> String {
        let id = self.fresh_id("file");
        self.files.push(FileRecord {
            id: id.clone(),
            name: name.to_string(),
            mime: SPREADSHEET_MIME.to_string(),
            folder: folder.map(str::to_string),
            spreadsheet: Some(spreadsheet),
        });
        id
    }

    /// Register a file the store cannot open, e.g. an uploaded `.xlsx`.
    pub fn add_file(&mut self, folder: Option<&str>, name: &str, mime: &str) -> String {
        let id = self.fresh_id("file");
        self.files.push(FileRecord {
            id: id.clone(),
            name: name.to_string(),
            mime: mime.to_string(),
            folder: folder.map(str::to_string),
            spreadsheet: None,
        });
        id
    }

    pub fn folder(&self, id: &str) -> Option<&FolderRecord> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn file(&self, id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn spreadsheet(&self, id: &str) -> Result<&Spreadsheet, ReconError> {
        let file = self.file(id).ok_or_else(|| ReconError::FileNotFound(id.to_string()))?;
        file.spreadsheet
            .as_ref()
            .ok_or_else(|| ReconError::NotASpreadsheet(id.to_string()))
    }

    pub fn spreadsheet_mut(&mut self, id: &str) -> Result<&mut Spreadsheet, ReconError> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| ReconError::FileNotFound(id.to_string()))?;
        file.spreadsheet
            .as_mut()
            .ok_or_else(|| ReconError::NotASpreadsheet(id.to_string()))
    }

    fn file_mut(&mut self, id: &str) -> Result<&mut FileRecord, ReconError> {
        self.files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| ReconError::FileNotFound(id.to_string()))
    }

    fn require_folder(&self, id: &str) -> Result<&FolderRecord, ReconError> {
        self.folder(id)
            .ok_or_else(|| ReconError::FolderNotFound(id.to_string()))
    }

    fn id_taken(&self, id: &str) -> bool {
        self.folders.iter().any(|f| f.id == id) || self.files.iter().any(|f| f.id == id)
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let mut n = self.folders.len() + self.files.len() + 1;
        loop {
            let id = format!("{prefix}-{n}");
            if !self.id_taken(&id) {
                return id;
            }
            n += 1;
        }
    }
}

impl DocumentStore for Workspace {
    type Sheet = Sheet;

    fn folder_name(&self, folder_id: &str) -> Result<String, ReconError> {
        Ok(self.require_folder(folder_id)?.name.clone())
    }

    fn subfolders(&self, folder_id: &str) -> Result<Vec<FolderEntry>, ReconError> {
        self.require_folder(folder_id)?;
        Ok(self
            .folders
            .iter()
            .filter(|f| f.parent.as_deref() == Some(folder_id))
            .map(|f| FolderEntry {
                id: f.id.clone(),
                name: f.name.clone(),
            })
            .collect())
    }

    fn files(&self, folder_id: &str) -> Result<Vec<FileEntry>, ReconError> {
        self.require_folder(folder_id)?;
        Ok(self
            .files
            .iter()
            .filter(|f| f.folder.as_deref() == Some(folder_id))
            .map(|f| FileEntry {
                id: f.id.clone(),
                name: f.name.clone(),
                mime: f.mime.clone(),
            })
            .collect())
    }

    fn create_folder(&mut self, parent_id: &str, name: &str) -> Result<String, ReconError> {
        self.require_folder(parent_id)?;
        Ok(self.add_folder(Some(parent_id), name))
    }

    fn create_spreadsheet(&mut self, name: &str, rows: usize, cols: usize) -> Result<String, ReconError> {
        Ok(self.add_spreadsheet(None, name, Spreadsheet::with_size(rows, cols)))
    }

    fn move_file(&mut self, file_id: &str, folder_id: &str) -> Result<(), ReconError> {
        self.require_folder(folder_id)?;
        self.file_mut(file_id)?.folder = Some(folder_id.to_string());
        Ok(())
    }

    fn copy_file(&mut self, file_id: &str, folder_id: &str, new_name: &str) -> Result<String, ReconError> {
        self.require_folder(folder_id)?;
        let source = self
            .file(file_id)
            .cloned()
            .ok_or_else(|| ReconError::FileNotFound(file_id.to_string()))?;
        let id = self.fresh_id("file");
        self.files.push(FileRecord {
            id: id.clone(),
            name: new_name.to_string(),
            folder: Some(folder_id.to_string()),
            ..source
        });
        Ok(id)
    }

    fn trash_file(&mut self, file_id: &str) -> Result<(), ReconError> {
        let index = self
            .files
            .iter()
            .position(|f| f.id == file_id)
            .ok_or_else(|| ReconError::FileNotFound(file_id.to_string()))?;
        self.files.remove(index);
        Ok(())
    }

    fn rename_file(&mut self, file_id: &str, new_name: &str) -> Result<(), ReconError> {
        self.file_mut(file_id)?.name = new_name.to_string();
        Ok(())
    }

    fn file_name(&self, file_id: &str) -> Result<String, ReconError> {
        self.file(file_id)
            .map(|f| f.name.clone())
            .ok_or_else(|| ReconError::FileNotFound(file_id.to_string()))
    }

    fn sheet_names(&self, file_id: &str) -> Result<Vec<String>, ReconError> {
        Ok(self
            .spreadsheet(file_id)?
            .sheet_names()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    fn sheet(&self, file_id: &str, sheet_name: &str) -> Result<&Sheet, ReconError> {
        self.spreadsheet(file_id)?
            .sheet_by_name(sheet_name)
            .ok_or_else(|| ReconError::SheetNotFound {
                file: file_id.to_string(),
                sheet: sheet_name.to_string(),
            })
    }

    fn sheet_mut(&mut self, file_id: &str, sheet_name: &str) -> Result<&mut Sheet, ReconError> {
        self.spreadsheet_mut(file_id)?
            .sheet_by_name_mut(sheet_name)
            .ok_or_else(|| ReconError::SheetNotFound {
                file: file_id.to_string(),
                sheet: sheet_name.to_string(),
            })
    }

    fn insert_sheet(&mut self, file_id: &str, name: &str) -> Result<(), ReconError> {
        self.spreadsheet_mut(file_id)?
            .insert_sheet(name)
            .map(|_| ())
            .ok_or_else(|| {
                ReconError::Store(format!("cannot add sheet \"{name}\" to \"{file_id}\""))
            })
    }

    fn delete_sheet(&mut self, file_id: &str, name: &str) -> Result<(), ReconError> {
        let spreadsheet = self.spreadsheet_mut(file_id)?;
        if spreadsheet.sheet_by_name(name).is_none() {
            return Err(ReconError::SheetNotFound {
                file: file_id.to_string(),
                sheet: name.to_string(),
            });
        }
        if !spreadsheet.delete_sheet(name) {
            return Err(ReconError::Store(format!(
                "cannot delete \"{name}\", the only sheet of \"{file_id}\""
            )));
        }
        Ok(())
    }
}
