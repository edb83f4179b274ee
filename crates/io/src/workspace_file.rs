// JSON workspace files: the persisted form of the document store

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ctrlsync_recon::Workspace;

pub fn load(path: &Path) -> Result<Workspace, String> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("{}: invalid workspace file: {e}", path.display()))
}

/// Save as pretty JSON (atomic: write .tmp then rename)
pub fn save(workspace: &Workspace, path: &Path) -> Result<(), String> {
    let temp_path = path.with_extension("json.tmp");
    {
        let file = File::create(&temp_path).map_err(|e| e.to_string())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, workspace).map_err(|e| e.to_string())?;
        writer.write_all(b"\n").map_err(|e| e.to_string())?;
        writer.flush().map_err(|e| e.to_string())?;
    }
    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        format!("failed to replace {}: {e}", path.display())
    })
}
