//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | setup            | Config, workspace file, export target    |
//! | 10-19   | pipeline         | Inventory, compare, update, provision    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use ctrlsync_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable answers file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Setup (3-9)
// =============================================================================

/// Config file missing, unparsable, or failing validation.
pub const EXIT_CONFIG: u8 = 3;

/// Workspace file could not be read, parsed, or saved.
pub const EXIT_WORKSPACE_IO: u8 = 4;

/// Export target could not be written.
pub const EXIT_EXPORT_IO: u8 = 5;

// =============================================================================
// Pipeline (10-19)
// =============================================================================

/// A folder, file, or tab named on the command line or in the config does not exist.
pub const EXIT_NOT_FOUND: u8 = 10;

/// The prompt channel failed, or a scripted answer list ran out.
pub const EXIT_INTERACTION: u8 = 11;

/// `update` finished but one or more mapping rows were skipped.
/// The run log sheet lists the reasons.
pub const EXIT_UPDATE_SKIPPED: u8 = 12;

/// A cell range was out of bounds or malformed, or the store refused an operation.
pub const EXIT_STORE: u8 = 13;

// =============================================================================
// Recon Error Types
// =============================================================================

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::FolderNotFound(_)
        | ReconError::FileNotFound(_)
        | ReconError::SheetNotFound { .. }
        | ReconError::NotASpreadsheet(_) => EXIT_NOT_FOUND,
        ReconError::Interaction(_) => EXIT_INTERACTION,
        ReconError::Range(_) | ReconError::Store(_) => EXIT_STORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_share_one_code() {
        let errors = [
            ReconError::FolderNotFound("f".into()),
            ReconError::FileNotFound("x".into()),
            ReconError::SheetNotFound { file: "x".into(), sheet: "Mapping".into() },
            ReconError::NotASpreadsheet("x".into()),
        ];
        for err in &errors {
            assert_eq!(recon_exit_code(err), EXIT_NOT_FOUND, "{err}");
        }
    }

    #[test]
    fn config_and_interaction_codes() {
        assert_eq!(recon_exit_code(&ReconError::ConfigParse("bad".into())), EXIT_CONFIG);
        assert_eq!(recon_exit_code(&ReconError::ConfigValidation("bad".into())), EXIT_CONFIG);
        assert_eq!(recon_exit_code(&ReconError::Interaction("eof".into())), EXIT_INTERACTION);
        assert_eq!(recon_exit_code(&ReconError::Range("Z0".into())), EXIT_STORE);
    }

    #[test]
    fn codes_stay_in_their_ranges() {
        for code in [EXIT_CONFIG, EXIT_WORKSPACE_IO, EXIT_EXPORT_IO] {
            assert!((3..=9).contains(&code));
        }
        for code in [EXIT_NOT_FOUND, EXIT_INTERACTION, EXIT_UPDATE_SKIPPED, EXIT_STORE] {
            assert!((10..=19).contains(&code));
        }
    }
}
