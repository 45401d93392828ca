//! The console port and its two adapters: a real terminal and a scripted bot.
//!
//! Everything the framework shows or asks goes through [`Console`], so render
//! loops can be driven from a queue of answers in tests or from a script file.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use crossterm::style::Stylize;

use crate::console::colors::tone_color;
use crate::error::{ConsoleError, Result};

/// How a line should stand out when the adapter can show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Notice,
    Error,
}

/// Line-oriented console I/O.
pub trait Console {
    /// Show `prompt`, block for one line, return it without the line ending.
    fn prompt_user(&mut self, prompt: &str) -> Result<String>;

    fn println(&mut self, message: &str) -> Result<()>;

    fn println_styled(&mut self, message: &str, tone: Tone) -> Result<()> {
        let _ = tone;
        self.println(message)
    }
}

/// Stdin/stdout console with optional colour.
pub struct TerminalConsole {
    color: bool,
}

impl TerminalConsole {
    /// Colour is only used when stdout is a terminal and `no_color` is off.
    pub fn new(no_color: bool) -> Self {
        TerminalConsole { color: !no_color && io::stdout().is_terminal() }
    }
}

impl Console for TerminalConsole {
    fn prompt_user(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(ConsoleError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn println(&mut self, message: &str) -> Result<()> {
        writeln!(io::stdout().lock(), "{}", message)?;
        Ok(())
    }

    fn println_styled(&mut self, message: &str, tone: Tone) -> Result<()> {
        match tone_color(tone) {
            Some(color) if self.color => {
                let styled = if tone == Tone::Heading {
                    message.with(color).bold()
                } else {
                    message.with(color)
                };
                writeln!(io::stdout().lock(), "{}", styled)?;
                Ok(())
            }
            _ => self.println(message),
        }
    }
}

/// A console that answers prompts from a queue and records what it printed.
///
/// Prompts are recorded in the transcript together with the answer given, as
/// `"<prompt><answer>"`. When the queue runs dry the next prompt fails with
/// [`ConsoleError::InputClosed`].
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
    echo: bool,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedConsole {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
            echo: false,
        }
    }

    /// Load answers from a file, one per line. Output is echoed to stdout.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut console = ScriptedConsole::new(text.lines());
        console.echo = true;
        Ok(console)
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn record(&mut self, line: String) -> Result<()> {
        if self.echo {
            writeln!(io::stdout().lock(), "{}", line)?;
        }
        self.transcript.push(line);
        Ok(())
    }
}

impl Console for ScriptedConsole {
    fn prompt_user(&mut self, prompt: &str) -> Result<String> {
        let answer = self.answers.pop_front().ok_or(ConsoleError::InputClosed)?;
        self.record(format!("{}{}", prompt, answer))?;
        Ok(answer)
    }

    fn println(&mut self, message: &str) -> Result<()> {
        self.record(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_console_replays_answers_in_order() {
        let mut console = ScriptedConsole::new(["first", "second"]);
        assert_eq!(console.prompt_user("> ").unwrap(), "first");
        console.println("hello").unwrap();
        assert_eq!(console.prompt_user("> ").unwrap(), "second");
        assert!(matches!(console.prompt_user("> "), Err(ConsoleError::InputClosed)));
        assert_eq!(console.transcript(), ["> first", "hello", "> second"]);
    }

    #[test]
    fn test_scripted_console_loads_answers_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.txt");
        fs::write(&path, "1\nn\n\nq\n").unwrap();

        let console = ScriptedConsole::from_file(&path).unwrap();
        assert_eq!(console.remaining(), 4);
    }
}
