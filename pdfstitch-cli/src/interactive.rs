//! Interactive command loop.
//!
//! The shell reads one command per line, applies it to a [`MergeSession`]
//! and re-renders the file list. Rows shown to the user are 1-based and are
//! translated back to entry ids through the row map captured at the last
//! render, so a row number always refers to what the user saw.
//!
//! While a merge runs the shell keeps reading commands. List edits are
//! passed to the session, which rejects them until the merge finishes.

use std::io::{self, Write};
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use pdfstitch::collection::{EntryId, MoveDirection};
use pdfstitch::config::Config;
use pdfstitch::error::{Result, StitchError};
use pdfstitch::io::{PdfWriter, SourceReader};
use pdfstitch::merge::Merger;
use pdfstitch::output::{
    Notification, OutputFormatter, ProgressBar, ProgressStyle, display_merge_summary,
};
use pdfstitch::session::MergeSession;

use crate::needs_confirmation;

const HELP: &str = "\
Commands:
  add <path|glob>...  Add PDF files to the end of the list
  list                Show the list
  up <row>            Move a file one row up
  down <row>          Move a file one row down
  rm <row>            Remove a file
  clear               Remove all files and discard the merged PDF
  merge               Merge the files in list order
  save [name]         Write the merged PDF (default: merged-document.pdf)
  help                Show this help
  quit                Leave";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<String>),
    List,
    Up(usize),
    Down(usize),
    Remove(usize),
    Clear,
    Merge,
    Save(Option<String>),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("Empty command".to_string());
        };
        let args: Vec<&str> = words.collect();

        match verb {
            "add" if args.is_empty() => Err("Usage: add <path|glob>...".to_string()),
            "add" => Ok(Self::Add(args.iter().map(|s| s.to_string()).collect())),
            "list" | "ls" => Ok(Self::List),
            "up" => parse_row(verb, &args).map(Self::Up),
            "down" => parse_row(verb, &args).map(Self::Down),
            "rm" | "remove" => parse_row(verb, &args).map(Self::Remove),
            "clear" => Ok(Self::Clear),
            "merge" => Ok(Self::Merge),
            // Names may contain spaces; keep everything after the verb.
            "save" => Ok(Self::Save(
                line.trim_start()
                    .strip_prefix("save")
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            )),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("Unknown command: {other}. Type 'help' for a list")),
        }
    }
}

fn parse_row(verb: &str, args: &[&str]) -> std::result::Result<usize, String> {
    match args {
        [row] => row
            .parse::<usize>()
            .ok()
            .filter(|row| *row > 0)
            .ok_or_else(|| format!("Invalid row: {row}")),
        _ => Err(format!("Usage: {verb} <row>")),
    }
}

/// Line-driven front end over a [`MergeSession`].
pub struct Shell<R> {
    session: MergeSession,
    config: Config,
    formatter: OutputFormatter,
    lines: Lines<R>,
    /// Entry ids in the order they were last rendered.
    rows: Vec<EntryId>,
}

impl Shell<BufReader<Stdin>> {
    /// Create a shell reading commands from stdin.
    pub fn stdin(config: Config, formatter: OutputFormatter) -> Self {
        Self::new(config, formatter, BufReader::new(tokio::io::stdin()))
    }
}

impl<R> Shell<R>
where
    R: AsyncBufRead + Unpin,
{
    /// Create a shell reading commands from `reader`.
    pub fn new(config: Config, formatter: OutputFormatter, reader: R) -> Self {
        Self {
            session: MergeSession::new(),
            config,
            formatter,
            lines: reader.lines(),
            rows: Vec::new(),
        }
    }

    /// Run until `quit` or end of input.
    ///
    /// Inputs given on the command line are added before the first prompt.
    /// Failed commands are reported and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading commands fails.
    pub async fn run(&mut self) -> Result<()> {
        self.formatter.info(&format!(
            "{} v{} - type 'help' for commands",
            pdfstitch::NAME,
            pdfstitch::VERSION
        ));

        if !self.config.inputs.is_empty() {
            let initial = self.config.inputs.clone();
            let outcome = self.add(initial).await;
            self.report(outcome);
        }
        self.render();

        loop {
            prompt();
            let Some(line) = self.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await,
                Err(message) => self.formatter.warning(&message),
            }
        }

        Ok(())
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        self.lines
            .next_line()
            .await
            .map_err(|err| StitchError::other(format!("Failed to read input: {err}")))
    }

    async fn execute(&mut self, command: Command) {
        let outcome = match command {
            Command::Add(patterns) => self.add(patterns).await,
            Command::List => Ok(()),
            Command::Up(row) => self.move_row(row, MoveDirection::Previous),
            Command::Down(row) => self.move_row(row, MoveDirection::Next),
            Command::Remove(row) => self.remove_row(row),
            Command::Clear => self.session.clear(),
            Command::Merge => self.merge().await,
            Command::Save(name) => {
                let outcome = self.save(name).await;
                self.report(outcome);
                return;
            }
            Command::Help => {
                println!("{HELP}");
                return;
            }
            Command::Quit => return,
        };

        self.report(outcome);
        self.render();
    }

    async fn add(&mut self, patterns: Vec<String>) -> Result<()> {
        let candidates = SourceReader::new().open_all(&patterns).await?;
        let offered = candidates.len();
        let added = self.session.add(candidates)?;
        self.formatter.notify(&Notification::added(added, offered));
        Ok(())
    }

    fn entry_at(&self, row: usize) -> Result<EntryId> {
        row.checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .copied()
            .ok_or_else(|| StitchError::other(format!("No file at row {row}")))
    }

    fn move_row(&mut self, row: usize, direction: MoveDirection) -> Result<()> {
        let id = self.entry_at(row)?;
        self.session.move_entry(id, direction)?;
        Ok(())
    }

    fn remove_row(&mut self, row: usize) -> Result<()> {
        let id = self.entry_at(row)?;
        self.session.remove(id)?;
        Ok(())
    }

    /// Run a merge while still answering commands.
    async fn merge(&mut self) -> Result<()> {
        let job = self.session.begin_merge()?;
        let merger = Merger::from_config(&self.config);

        let mut progress = if self.formatter.should_print() {
            ProgressBar::new(job.len(), ProgressStyle::Counter)
        } else {
            ProgressBar::disabled()
        };

        let finished = {
            let run = job.run(&merger, |event| progress.observe(event));
            tokio::pin!(run);

            let mut input_open = true;
            loop {
                tokio::select! {
                    finished = &mut run => break finished,
                    line = self.lines.next_line(), if input_open => match line {
                        Ok(Some(line)) => self.while_merging(&line),
                        Ok(None) | Err(_) => input_open = false,
                    },
                }
            }
        };
        progress.clear();

        self.session.finish_merge(finished)?;
        self.formatter.notify(&Notification::merged());
        self.formatter.info("Use 'save [name]' to write the merged PDF");
        Ok(())
    }

    /// Handle a command that arrived while a merge is running.
    fn while_merging(&mut self, line: &str) {
        let outcome = match line.parse::<Command>() {
            Ok(Command::List) => {
                self.render();
                return;
            }
            Ok(Command::Help) => {
                println!("{HELP}");
                return;
            }
            Ok(Command::Save(_)) | Ok(Command::Quit) => {
                self.formatter.info("Merging... wait for it to finish");
                return;
            }
            Ok(Command::Add(_)) => self.session.add(Vec::new()).map(drop),
            Ok(Command::Up(row)) => self.move_row(row, MoveDirection::Previous),
            Ok(Command::Down(row)) => self.move_row(row, MoveDirection::Next),
            Ok(Command::Remove(row)) => self.remove_row(row),
            Ok(Command::Clear) => self.session.clear(),
            Ok(Command::Merge) => self.session.begin_merge().map(drop),
            Err(message) => {
                self.formatter.warning(&message);
                return;
            }
        };
        self.report(outcome);
    }

    async fn save(&mut self, name: Option<String>) -> Result<()> {
        let requested = name.or_else(|| self.config.output_name.clone()).unwrap_or_default();
        let download = self.session.download(&requested)?;
        let output_path = self.config.output_path(download.file_name());

        let writer = PdfWriter::new();
        writer.can_write(&output_path).await?;

        if needs_confirmation(&self.config, &self.formatter, &output_path).await? {
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let answer = self
                .lines
                .next_line()
                .await
                .map_err(|err| StitchError::other(format!("Failed to read input: {err}")))?
                .unwrap_or_default();
            if !crate::is_affirmative(&answer) {
                return Err(StitchError::Cancelled);
            }
        }

        let write_stats = writer.save(download.shared_bytes(), &output_path).await?;
        self.formatter
            .notify(&Notification::downloaded(download.file_name()));
        display_merge_summary(&self.formatter, download.statistics(), &write_stats);
        Ok(())
    }

    /// Show the list and capture the row map.
    fn render(&mut self) {
        self.rows = self.session.entries().iter().map(|entry| entry.id).collect();
        self.formatter.entry_list(self.session.entries());

        if self.session.merged().is_some() {
            self.formatter.detail("State", &self.session.state().to_string());
        }
    }

    fn report(&self, outcome: Result<()>) {
        if let Err(err) = outcome {
            log::debug!("Command failed: {err:?}");
            self.formatter.notify(&Notification::from(&err));
        }
    }
}

fn prompt() {
    print!("> ");
    io::stdout().flush().ok();
}
