//! Interactive prompting.
//!
//! Resolution asks the operator for a value only through a [`Prompter`].
//! [`TerminalPrompter`] drives the terminal with `dialoguer`;
//! [`ScriptedPrompter`] answers from a fixed queue and is meant for tests
//! and for hosts that collect answers some other way.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

use dialoguer::{Input, Password, Select};

/// Line, secret and choice prompting.
pub trait Prompter {
    /// Ask for a line of text.
    ///
    /// # Errors
    ///
    /// Returns an error when no answer can be read.
    fn prompt(&self, text: &str) -> io::Result<String>;

    /// Ask for a line of text without echoing it.
    ///
    /// # Errors
    ///
    /// Returns an error when no answer can be read.
    fn prompt_secret(&self, text: &str) -> io::Result<String>;

    /// Ask the operator to pick one of `options`; returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error when no answer can be read.
    fn choose(&self, text: &str, options: &[String]) -> io::Result<usize>;
}

fn into_io(err: dialoguer::Error) -> io::Error {
    io::Error::other(err)
}

/// Prompts on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&self, text: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(text)
            .allow_empty(true)
            .interact_text()
            .map_err(into_io)
    }

    fn prompt_secret(&self, text: &str) -> io::Result<String> {
        Password::new()
            .with_prompt(text)
            .allow_empty_password(true)
            .interact()
            .map_err(into_io)
    }

    fn choose(&self, text: &str, options: &[String]) -> io::Result<usize> {
        Select::new()
            .with_prompt(text)
            .items(options)
            .default(0)
            .interact()
            .map_err(into_io)
    }
}

/// Answers prompts from a queue, recording every question asked.
///
/// Choice prompts pick the option equal to the next answer.
///
/// # Examples
///
/// ```
/// use knob::{Prompter, ScriptedPrompter};
///
/// let prompter = ScriptedPrompter::new(["Release"]);
/// let options = vec!["Debug".to_string(), "Release".to_string()];
/// assert_eq!(prompter.choose("Configuration", &options).unwrap(), 1);
/// assert!(prompter.prompt("Anything else").is_err());
/// assert_eq!(prompter.asked(), vec!["Configuration", "Anything else"]);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    /// Creates a prompter that gives `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn next_answer(&self, text: &str) -> io::Result<String> {
        self.asked.borrow_mut().push(text.to_string());
        self.answers.borrow_mut().pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer left for '{text}'"),
            )
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, text: &str) -> io::Result<String> {
        self.next_answer(text)
    }

    fn prompt_secret(&self, text: &str) -> io::Result<String> {
        self.next_answer(text)
    }

    fn choose(&self, text: &str, options: &[String]) -> io::Result<usize> {
        let answer = self.next_answer(text)?;
        options.iter().position(|o| *o == answer).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("scripted answer '{answer}' is not one of the choices"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let prompter = ScriptedPrompter::new(["first", "second"]);
        assert_eq!(prompter.prompt("a").unwrap(), "first");
        assert_eq!(prompter.prompt_secret("b").unwrap(), "second");
        let err = prompter.prompt("c").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(prompter.asked(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_scripted_choice_must_match() {
        let prompter = ScriptedPrompter::new(["Profile"]);
        let options = vec!["Debug".to_string(), "Release".to_string()];
        let err = prompter.choose("Configuration", &options).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
