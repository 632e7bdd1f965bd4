//! Line prompts for interactive commands
//!
//! Handlers talk to a [`Prompter`] instead of a terminal so the interactive
//! flows can be driven by a script in tests.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::VecDeque;

use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{ColorMode, Editor, Helper};

use crate::error::Result;

/// Source of user answers.
pub trait Prompter {
    /// Shows `prompt` and reads one line.
    ///
    /// Returns `None` when the user cancels (Ctrl-C or end of input).
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Like [`ask`](Prompter::ask), but the typed characters are not shown.
    fn ask_secret(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Prints a line of output between prompts.
    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Line helper that redraws the input as `*` while `masking` is set.
#[derive(Debug, Default)]
pub struct MaskingHelper {
    pub masking: bool,
}

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Owned("*".repeat(line.chars().count()))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.masking
    }
}

impl Completer for MaskingHelper {
    type Candidate = String;
}

impl Hinter for MaskingHelper {
    type Hint = String;
}

impl Validator for MaskingHelper {}

impl Helper for MaskingHelper {}

/// Prompter backed by a rustyline editor.
pub struct ReadlinePrompter {
    editor: Editor<MaskingHelper, DefaultHistory>,
}

impl ReadlinePrompter {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(MaskingHelper::default()));
        Ok(Self { editor })
    }

    fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_masking(&mut self, masking: bool) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.masking = masking;
        }
        // Highlighting, and so masking, is skipped unless colors are forced.
        self.editor.set_color_mode(if masking {
            ColorMode::Forced
        } else {
            ColorMode::Enabled
        });
    }
}

impl Prompter for ReadlinePrompter {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.read(prompt)
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        self.set_masking(true);
        let answer = self.read(prompt);
        self.set_masking(false);
        answer
    }
}

/// Prompter that replays canned answers and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Prompts and output lines in the order they were shown.
    pub transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        self.ask(prompt)
    }

    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }
}
