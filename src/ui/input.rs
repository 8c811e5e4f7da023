//! Operator input sources
//!
//! Device selection reads answers through the [`InputSource`] trait so the
//! selection loop can be driven from the console or from a script in tests.

#[cfg(test)]
use std::collections::VecDeque;

use inquire::{InquireError, Text};

use crate::error::{Result, WizardError};

/// Source of line-oriented operator answers
pub trait InputSource {
    /// Show `prompt` and return the answer exactly as typed
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Interactive console input
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl InputSource for ConsoleInput {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match Text::new(prompt).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Err(WizardError::InputClosed)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Pre-recorded answers, returned in order
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(WizardError::InputClosed)
    }
}
