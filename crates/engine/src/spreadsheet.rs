use serde::{Deserialize, Serialize};

use crate::sheet::Sheet;

pub const DEFAULT_ROWS: usize = 1000;
pub const DEFAULT_COLS: usize = 26;

/// A spreadsheet document: an ordered list of uniquely named tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spreadsheet {
    sheets: Vec<Sheet>,
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Spreadsheet {
    /// Create a spreadsheet with one default tab
    pub fn new() -> Self {
        Self::with_size(DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Create a spreadsheet whose single tab has the given dimensions.
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            sheets: vec![Sheet::new("Sheet1", rows, cols)],
        }
    }

    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn first_sheet_mut(&mut self) -> Option<&mut Sheet> {
        self.sheets.first_mut()
    }

    /// Append a new empty tab.
    /// Returns None if the name is blank or already taken.
    pub fn insert_sheet(&mut self, name: &str) -> Option<&mut Sheet> {
        if !is_valid_sheet_name(name) || self.sheet_by_name(name).is_some() {
            return None;
        }
        self.sheets.push(Sheet::new(name, DEFAULT_ROWS, DEFAULT_COLS));
        self.sheets.last_mut()
    }

    /// Append a copy of an existing tab under a new name.
    pub fn insert_sheet_copy(&mut self, sheet: &Sheet, name: &str) -> Option<&mut Sheet> {
        if !is_valid_sheet_name(name) || self.sheet_by_name(name).is_some() {
            return None;
        }
        let mut copy = sheet.clone();
        copy.name = name.to_string();
        self.sheets.push(copy);
        self.sheets.last_mut()
    }

    /// Delete a tab by name. The last remaining tab cannot be deleted.
    pub fn delete_sheet(&mut self, name: &str) -> bool {
        if self.sheets.len() <= 1 {
            return false;
        }
        let before = self.sheets.len();
        self.sheets.retain(|s| s.name != name);
        self.sheets.len() != before
    }

    /// Rename a tab.
    /// Returns false if the tab is missing or the new name is invalid or taken by another tab.
    pub fn rename_sheet(&mut self, from: &str, to: &str) -> bool {
        if !is_valid_sheet_name(to) || (from != to && self.sheet_by_name(to).is_some()) {
            return false;
        }
        match self.sheet_by_name_mut(from) {
            Some(sheet) => {
                sheet.name = to.to_string();
                true
            }
            None => false,
        }
    }
}

pub fn is_valid_sheet_name(name: &str) -> bool {
    !name.trim().is_empty()
}
