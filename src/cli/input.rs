//! Console input.
//!
//! The menu reads through [`InputSource`] so it can be driven by stdin
//! in production and by a fixed script in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use tokio::sync::mpsc;
use tracing::debug;

/// A line-oriented prompt/response source.
#[async_trait]
pub trait InputSource: Send {
    /// Show `prompt` and read one line, trimmed. `Ok(None)` at end of input.
    ///
    /// Implementations must be cancel-safe: the menu races this against
    /// Ctrl+C.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive input from the terminal.
///
/// Lines are read on a dedicated OS thread and handed over through a
/// channel. A read blocked on the terminal never holds a runtime thread,
/// so the runtime can shut down while a prompt is still open.
pub struct StdinInput {
    lines: mpsc::Receiver<std::io::Result<String>>,
}

impl StdinInput {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(std::io::stdin()))
    }

    /// Read lines from any blocking reader on a background thread.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        std::thread::spawn(move || {
            for line in reader.lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            debug!("Input reader finished");
        });
        Self { lines: rx }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for StdinInput {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush().context("Failed to flush stdout")?;
        match self.lines.recv().await {
            Some(line) => {
                let line = line.context("Failed to read from stdin")?;
                Ok(Some(line.trim().to_string()))
            }
            None => Ok(None),
        }
    }
}

/// Pre-recorded answers, consumed in order. Records every prompt shown.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front().map(|l| l.trim().to_string()))
    }
}
