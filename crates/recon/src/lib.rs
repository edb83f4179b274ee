//! `ctrlsync-recon`: audit-control reconciliation over a spreadsheet document store.
//!
//! Builds control inventories, matches tested controls against documented
//! ones, and propagates tested field values into the documented templates.
//! Storage, prompting and logging are reached only through the
//! [`DocumentStore`], [`Prompter`] and [`LogSink`] seams.

pub mod config;
pub mod error;
pub mod grid;
pub mod interact;
pub mod inventory;
pub mod layout;
pub mod matcher;
pub mod model;
pub mod propagate;
pub mod provision;
pub mod reconcile;
pub mod runlog;
pub mod session;
pub mod store;
pub mod template;
pub mod tracking;
pub mod verify;
pub mod workspace;

#[cfg(test)]
mod fixtures;

pub use config::ControlConfig;
pub use error::ReconError;
pub use grid::Grid;
pub use interact::{PromptResponse, Prompter, ScriptedPrompter};
pub use model::{ControlRecord, MappingRow};
pub use runlog::{LogSink, RunLog};
pub use session::Session;
pub use store::DocumentStore;
pub use workspace::Workspace;
