//! `ctrlsync store`: look at and tidy the workspace directly.

use serde::Serialize;
use ctrlsync_recon::store::FileKind;
use ctrlsync_recon::{DocumentStore, ReconError, Workspace};

/// One line of the `store ls` listing.
#[derive(Debug, Serialize)]
pub struct Entry {
    pub depth: usize,
    pub id: String,
    pub name: String,
    /// `folder`, `spreadsheet`, `foreign` or `file`.
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sheets: Vec<String>,
}

/// The workspace as a depth-first tree: each folder, then its files, then its subfolders.
pub fn list(ws: &Workspace) -> Result<Vec<Entry>, ReconError> {
    let mut out = Vec::new();
    for file in ws.files.iter().filter(|f| f.folder.is_none()) {
        push_file(ws, &mut out, 0, &file.id)?;
    }
    for folder in ws.folders.iter().filter(|f| f.parent.is_none()) {
        walk(ws, &mut out, 0, &folder.id, &folder.name)?;
    }
    Ok(out)
}

fn walk(ws: &Workspace, out: &mut Vec<Entry>, depth: usize, id: &str, name: &str) -> Result<(), ReconError> {
    out.push(Entry {
        depth,
        id: id.to_string(),
        name: name.to_string(),
        kind: "folder",
        sheets: Vec::new(),
    });
    for file in ws.files(id)? {
        push_file(ws, out, depth + 1, &file.id)?;
    }
    for sub in ws.subfolders(id)? {
        walk(ws, out, depth + 1, &sub.id, &sub.name)?;
    }
    Ok(())
}

fn push_file(ws: &Workspace, out: &mut Vec<Entry>, depth: usize, id: &str) -> Result<(), ReconError> {
    let record = ws.file(id).ok_or_else(|| ReconError::FileNotFound(id.to_string()))?;
    let (kind, sheets) = match FileKind::from_mime(&record.mime) {
        FileKind::NativeSpreadsheet => ("spreadsheet", ws.sheet_names(id)?),
        FileKind::ForeignSpreadsheet => ("foreign", Vec::new()),
        FileKind::Other => ("file", Vec::new()),
    };
    out.push(Entry {
        depth,
        id: id.to_string(),
        name: record.name.clone(),
        kind,
        sheets,
    });
    Ok(())
}

pub fn format_entry(entry: &Entry) -> String {
    let indent = "  ".repeat(entry.depth);
    match entry.kind {
        "folder" => format!("{indent}{}  {}/", entry.id, entry.name),
        "spreadsheet" => format!("{indent}{}  {}  [{}]", entry.id, entry.name, entry.sheets.join(", ")),
        kind => format!("{indent}{}  {}  ({kind})", entry.id, entry.name),
    }
}
