//! The user-interaction seam and the validation loops built on it.

use std::collections::VecDeque;

use crate::error::ReconError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Ok,
    /// The dialog was dismissed without an answer.
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptResponse {
    pub text: String,
    pub button: Button,
}

impl PromptResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            button: Button::Ok,
        }
    }

    pub fn closed() -> Self {
        Self {
            text: String::new(),
            button: Button::Close,
        }
    }
}

/// Modal single-line prompt plus informational alert.
pub trait Prompter {
    fn prompt(&mut self, message: &str) -> Result<PromptResponse, ReconError>;

    fn alert(&mut self, message: &str);
}

/// Ask until the answer is `y` or `n` (trimmed, any case).
///
/// A closed dialog carries empty text and is re-asked like any other invalid answer.
pub fn ask_yes_no(prompter: &mut dyn Prompter, question: &str) -> Result<bool, ReconError> {
    loop {
        let response = prompter.prompt(question)?;
        match response.text.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => prompter.alert("Invalid answer. Please enter \"y\" or \"n\"."),
        }
    }
}

/// Ask until the trimmed answer is non-empty, and return it trimmed.
pub fn ask_non_empty(prompter: &mut dyn Prompter, question: &str) -> Result<String, ReconError> {
    loop {
        let response = prompter.prompt(question)?;
        let text = response.text.trim();
        if !text.is_empty() {
            return Ok(text.to_string());
        }
        prompter.alert("An answer is required.");
    }
}

/// Ask for a tab name until `exists` accepts it. `None` when the dialog is closed.
pub fn ask_existing_sheet(
    prompter: &mut dyn Prompter,
    question: &str,
    exists: impl Fn(&str) -> bool,
) -> Result<Option<String>, ReconError> {
    loop {
        let response = prompter.prompt(question)?;
        if response.button == Button::Close {
            return Ok(None);
        }
        let name = response.text.trim();
        if exists(name) {
            return Ok(Some(name.to_string()));
        }
        prompter.alert(&format!(
            "The sheet \"{}\" does not exist. Please try again.",
            response.text
        ));
    }
}

// ---------------------------------------------------------------------------
// Scripted prompter
// ---------------------------------------------------------------------------

/// Answers prompts from a fixed queue and records everything it was shown.
///
/// Running out of answers is an `Interaction` error, so a script that is too
/// short fails instead of looping forever.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<PromptResponse>,
    pub prompts: Vec<String>,
    pub alerts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(PromptResponse::ok).collect(),
            prompts: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn push(&mut self, response: PromptResponse) {
        self.answers.push_back(response);
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, message: &str) -> Result<PromptResponse, ReconError> {
        self.prompts.push(message.to_string());
        self.answers.pop_front().ok_or_else(|| {
            ReconError::Interaction(format!("no scripted answer left for: {message}"))
        })
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_reprompts_on_invalid() {
        let mut p = ScriptedPrompter::new(["maybe", "", " Y "]);
        assert!(ask_yes_no(&mut p, "create? (y/n)").unwrap());
        assert_eq!(p.prompts.len(), 3);
        assert_eq!(p.alerts.len(), 2);
    }

    #[test]
    fn yes_no_accepts_n() {
        let mut p = ScriptedPrompter::new(["N"]);
        assert!(!ask_yes_no(&mut p, "q").unwrap());
        assert!(p.alerts.is_empty());
    }

    #[test]
    fn yes_no_closed_dialog_is_reasked() {
        let mut p = ScriptedPrompter::default();
        p.push(PromptResponse::closed());
        p.push(PromptResponse::ok("n"));
        assert!(!ask_yes_no(&mut p, "q").unwrap());
        assert_eq!(p.alerts.len(), 1);
    }

    #[test]
    fn exhausted_script_is_interaction_error() {
        let mut p = ScriptedPrompter::new(["?"]);
        let err = ask_yes_no(&mut p, "q").unwrap_err();
        assert!(matches!(err, ReconError::Interaction(_)));
    }

    #[test]
    fn non_empty_trims() {
        let mut p = ScriptedPrompter::new(["   ", "  PAYROLL_2025 "]);
        assert_eq!(ask_non_empty(&mut p, "name?").unwrap(), "PAYROLL_2025");
        assert_eq!(p.alerts.len(), 1);
    }

    #[test]
    fn existing_sheet_retries_then_closes() {
        let mut p = ScriptedPrompter::new(["Nope"]);
        p.push(PromptResponse::closed());
        let got = ask_existing_sheet(&mut p, "sheet?", |n| n == "Inventory").unwrap();
        assert_eq!(got, None);
        assert!(p.alerts[0].contains("\"Nope\""));
    }

    #[test]
    fn existing_sheet_found() {
        let mut p = ScriptedPrompter::new([" Inventory "]);
        let got = ask_existing_sheet(&mut p, "sheet?", |n| n == "Inventory").unwrap();
        assert_eq!(got.as_deref(), Some("Inventory"));
    }
}
