/*!
 * Terminal surface for an interactive session.
 *
 * Reads commands and draft text line by line, forwards actions to the
 * `Desk`, and renders the session state after re-reading it from the store.
 */

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app_controller::{Desk, TranslateOutcome};
use crate::model_registry::{ModelEntry, ModelRegistry};
use crate::session::SessionStore;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the model pairs
    Models,
    /// Select a model pair
    SelectModel(String),
    /// Upload a `.txt` file into the draft
    Upload(PathBuf),
    /// Translate the draft
    Translate,
    /// Clear both histories and the draft
    Clear,
    /// Show the translation history
    History,
    /// Show the file upload history
    Files,
    /// Show the current draft
    Draft,
    /// Export the history as JSON, optionally to a given path
    Export(Option<PathBuf>),
    /// Show the about text
    About,
    /// Show the command list
    Help,
    /// End the session
    Quit,
    /// Plain text replacing the draft
    Text(String),
    /// Blank line
    Empty,
    /// A `:` command that needs an argument it did not get, or is unknown
    Invalid(String),
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Command::Empty;
        }

        // A doubled colon stages text that itself starts with ':'
        if trimmed.starts_with("::") {
            return Command::Text(line.replacen("::", ":", 1));
        }

        let Some(command_line) = trimmed.strip_prefix(':') else {
            return Command::Text(line.to_string());
        };

        let (name, argument) = match command_line.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command_line, ""),
        };

        match (name.to_lowercase().as_str(), argument.is_empty()) {
            ("models", _) => Command::Models,
            ("model" | "m", true) => Command::Models,
            ("model" | "m", false) => Command::SelectModel(argument.to_string()),
            ("upload" | "u", false) => Command::Upload(PathBuf::from(argument)),
            ("upload" | "u", true) => Command::Invalid("Usage: :upload <file.txt>".to_string()),
            ("translate" | "t", _) => Command::Translate,
            ("clear", _) => Command::Clear,
            ("history" | "h", _) => Command::History,
            ("files" | "f", _) => Command::Files,
            ("draft" | "d", _) => Command::Draft,
            ("export", true) => Command::Export(None),
            ("export", false) => Command::Export(Some(PathBuf::from(argument))),
            ("about", _) => Command::About,
            ("help" | "?", _) => Command::Help,
            ("quit" | "q" | "exit", _) => Command::Quit,
            (other, _) => Command::Invalid(format!(
                "Unknown command ':{}'. Type :help for commands, or start the line with '::' to enter text beginning with ':'.",
                other
            )),
        }
    }
}

/// Whether the loop should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Render the translation history, most recent first
pub fn render_translation_history<W: Write>(store: &SessionStore, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Translation History")?;
    let total = store.translation_count();
    if total == 0 {
        return writeln!(out, "No translations yet.");
    }

    for (i, entry) in store.list_translations().enumerate() {
        writeln!(out, "Translation {}:", total - i)?;
        writeln!(out, "  Configuration: {}", entry.configuration())?;
        writeln!(out, "  Input: {}", entry.input())?;
        writeln!(out, "  Output: {}", entry.output())?;
        writeln!(out, "---")?;
    }
    Ok(())
}

/// Render the file upload history, most recent first
pub fn render_file_history<W: Write>(store: &SessionStore, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "File Upload History")?;
    let total = store.file_upload_count();
    if total == 0 {
        return writeln!(out, "No files uploaded yet.");
    }

    for (i, entry) in store.list_file_uploads().enumerate() {
        writeln!(out, "File {}: {}", total - i, entry.file_name())?;
        for line in entry.content().lines() {
            writeln!(out, "  | {}", line)?;
        }
        writeln!(out, "---")?;
    }
    Ok(())
}

/// Render the model list with the current selection marked
pub fn render_models<W: Write>(registry: ModelRegistry, selected: &ModelEntry, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Select translation model (:model <name|number|en-de>)")?;
    for (i, entry) in registry.entries().iter().enumerate() {
        let marker = if entry == selected { "*" } else { " " };
        writeln!(out, "{} {:>2}. {:<20} {}", marker, i + 1, entry.label, entry.model_id)?;
    }
    Ok(())
}

/// Render the about and work process text
pub fn render_about<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "About")?;
    writeln!(out, "mtdesk is a machine translation desk over pretrained translation models.")?;
    writeln!(out)?;
    writeln!(out, "Work Process")?;
    writeln!(
        out,
        "Select a translation model, upload a text file or enter text, and run :translate to see the translation."
    )
}

/// Render the command list
pub fn render_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Type text to replace the draft (end a line with \\ to continue it).")?;
    writeln!(out, "Start a line with :: to enter text that begins with ':'.")?;
    writeln!(out, "  :models                 list model pairs")?;
    writeln!(out, "  :model <name|n|en-de>   select a model pair")?;
    writeln!(out, "  :upload <file.txt>      load a text file into the draft")?;
    writeln!(out, "  :translate, :t          translate the draft")?;
    writeln!(out, "  :draft                  show the draft")?;
    writeln!(out, "  :history                show translation history")?;
    writeln!(out, "  :files                  show file upload history")?;
    writeln!(out, "  :clear                  clear all history and the draft")?;
    writeln!(out, "  :export [path]          write the history as JSON")?;
    writeln!(out, "  :about, :help, :quit")
}

/// Interactive loop over a desk
pub struct Console<W: Write> {
    desk: Desk,
    out: W,
    /// Show prompts and a spinner; off when input is piped or under test
    interactive: bool,
    /// Where `:export` without a path writes to
    export_dir: PathBuf,
}

impl<W: Write> Console<W> {
    pub fn new(desk: Desk, out: W, interactive: bool, export_dir: PathBuf) -> Self {
        Self {
            desk,
            out,
            interactive,
            export_dir,
        }
    }

    pub fn desk(&self) -> &Desk {
        &self.desk
    }

    /// Consume the console, returning the output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Read lines until `:quit` or end of input
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        let mut pending: Option<String> = None;

        writeln!(
            self.out,
            "Machine Translation Model | {} | backend: {}",
            self.desk.selected_model().label,
            self.desk.translator_description()
        )?;
        writeln!(self.out, "Type :help for commands.")?;

        loop {
            if self.interactive {
                write!(self.out, "{}", if pending.is_some() { ". " } else { "> " })?;
                self.out.flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };

            // Continuation lines accumulate until one does not end with '\'
            if let Some(mut buffer) = pending.take() {
                match line.strip_suffix('\\') {
                    Some(head) => {
                        buffer.push_str(head);
                        buffer.push('\n');
                        pending = Some(buffer);
                    }
                    None => {
                        buffer.push_str(&line);
                        self.execute(Command::Text(buffer)).await?;
                    }
                }
                continue;
            }

            let command = Command::parse(&line);
            if let Command::Text(text) = &command {
                if let Some(head) = text.strip_suffix('\\') {
                    pending = Some(format!("{}\n", head));
                    continue;
                }
            }

            if self.execute(command).await? == Flow::Quit {
                break;
            }
        }

        if let Some(buffer) = pending {
            self.execute(Command::Text(buffer.trim_end_matches('\n').to_string())).await?;
        }

        Ok(())
    }

    /// Apply one command and render its result
    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!("Executing {:?}", command);
        match command {
            Command::Models => {
                render_models(self.desk.registry(), self.desk.selected_model(), &mut self.out)?;
            }
            Command::SelectModel(query) => match self.desk.select_model(&query) {
                Ok(entry) => writeln!(self.out, "Selected: {}", entry)?,
                Err(e) => writeln!(self.out, "Warning: {}", e)?,
            },
            Command::Upload(path) => match self.desk.upload_file(&path) {
                Ok(record) => writeln!(
                    self.out,
                    "Uploaded {} ({} chars) into the draft.",
                    record.file_name(),
                    record.content().chars().count()
                )?,
                Err(e) => {
                    error!("{}", e);
                    writeln!(self.out, "Error: {}", e)?;
                }
            },
            Command::Translate => self.translate().await?,
            Command::Clear => {
                self.desk.clear();
                writeln!(self.out, "All history cleared.")?;
            }
            Command::History => render_translation_history(self.desk.store(), &mut self.out)?,
            Command::Files => render_file_history(self.desk.store(), &mut self.out)?,
            Command::Draft => {
                let draft = self.desk.store().draft_input();
                if draft.is_empty() {
                    writeln!(self.out, "Draft is empty.")?;
                } else {
                    writeln!(self.out, "Draft:\n{}", draft)?;
                }
            }
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| crate::file_utils::FileManager::generate_export_path(&self.export_dir));
                match self.desk.export_history(&path) {
                    Ok(written) => writeln!(self.out, "History exported to {}", written.display())?,
                    Err(e) => writeln!(self.out, "Error: {}", e)?,
                }
            }
            Command::About => render_about(&mut self.out)?,
            Command::Help => render_help(&mut self.out)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Text(text) => {
                let chars = text.chars().count();
                self.desk.set_draft(text);
                writeln!(self.out, "Draft updated ({} chars).", chars)?;
            }
            Command::Empty => {}
            Command::Invalid(message) => writeln!(self.out, "{}", message)?,
        }
        Ok(Flow::Continue)
    }

    async fn translate(&mut self) -> Result<()> {
        let spinner = if self.interactive {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            ProgressBar::hidden()
        };
        spinner.set_message("Translating...");

        let result = self.desk.translate().await;
        spinner.finish_and_clear();

        match result {
            Ok(TranslateOutcome::Translated(record)) => {
                writeln!(self.out, "Translated Text: {}", record.output())?;
            }
            Ok(TranslateOutcome::EmptyInput) => {
                writeln!(self.out, "Warning: Please enter text for translation.")?;
            }
            Err(e) => {
                error!("Translation failed: {}", e);
                writeln!(self.out, "Error: {}", e)?;
            }
        }
        Ok(())
    }
}
