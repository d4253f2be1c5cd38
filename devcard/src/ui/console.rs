//! Line-oriented terminal I/O
//!
//! Generic over the reader and writer so flows can be driven by scripted
//! input in tests. Output errors are ignored: a closed terminal simply makes
//! the next `ask` hit end of input.

use std::fmt::Display;
use std::io::{self, BufRead, Stdout, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt and read one trimmed line; `None` at end of input
    pub fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{}: ", question);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// Like [`ask`](Self::ask) but an empty answer means "cancel"
    pub fn ask_path(&mut self, question: &str) -> Option<String> {
        self.ask(question).filter(|answer| !answer.is_empty())
    }

    /// Prompt with a prefilled value; an empty answer keeps it
    pub fn ask_default(&mut self, question: &str, default: &str) -> Option<String> {
        let answer = self.ask(&format!("{} [{}]", question, default))?;
        if answer.is_empty() {
            Some(default.to_string())
        } else {
            Some(answer)
        }
    }

    /// Raw line with only the terminator removed
    pub fn ask_raw(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{}: ", question);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    pub fn print(&mut self, text: impl Display) {
        let _ = writeln!(self.output, "{}", text);
    }

    pub fn info(&mut self, text: impl Display) {
        let _ = writeln!(self.output, "[OK] {}", text);
    }

    pub fn error(&mut self, error: impl Display) {
        let _ = writeln!(self.output, "[ERROR] {}", error);
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
