//! Prompt channels for the CLI: the terminal, or a file of scripted answers.

use std::io;
use std::path::Path;

use dialoguer::Input;
use ctrlsync_recon::interact::Button;
use ctrlsync_recon::{PromptResponse, Prompter, ReconError, ScriptedPrompter};

/// Line in an answers file that stands for a dismissed dialog.
pub const CLOSE_MARKER: &str = "<close>";

/// Reads answers from the terminal. End of input counts as a dismissed dialog.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, message: &str) -> Result<PromptResponse, ReconError> {
        println!("{message}");
        let answer = Input::<String>::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text();
        match answer {
            Ok(text) => Ok(PromptResponse::ok(text)),
            Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Ok(PromptResponse::closed())
            }
            Err(e) => Err(ReconError::Interaction(e.to_string())),
        }
    }

    fn alert(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Replays an answers file and echoes the conversation to stdout.
pub struct ReplayPrompter {
    inner: ScriptedPrompter,
}

impl ReplayPrompter {
    /// One answer per line; a line holding only `<close>` dismisses the dialog.
    pub fn parse(text: &str) -> Self {
        let mut inner = ScriptedPrompter::default();
        for line in text.lines() {
            if line.trim() == CLOSE_MARKER {
                inner.push(PromptResponse::closed());
            } else {
                inner.push(PromptResponse::ok(line));
            }
        }
        Self { inner }
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read answers file {}: {}", path.display(), e))?;
        Ok(Self::parse(&text))
    }
}

impl Prompter for ReplayPrompter {
    fn prompt(&mut self, message: &str) -> Result<PromptResponse, ReconError> {
        println!("{message}");
        let response = self.inner.prompt(message)?;
        match response.button {
            Button::Ok => println!("> {}", response.text),
            Button::Close => println!("> {CLOSE_MARKER}"),
        }
        Ok(response)
    }

    fn alert(&mut self, message: &str) {
        println!("{message}");
        self.inner.alert(message);
    }
}
