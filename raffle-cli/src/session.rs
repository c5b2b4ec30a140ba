use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info, warn};

use raffle_core::{DrawTimer, Raffle, Scheduler};
use raffle_types::{DisplayUpdate, RaffleError};

use crate::commands::{Command, HELP_TEXT, is_confirmed};
use crate::config::OutputMode;
use crate::json::write_update;
use crate::output::SharedOutput;
use crate::terminal::{format_names, format_settings, format_winners};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One interactive session: turns input lines into raffle calls and
/// prints replies alongside whatever the renderer draws.
pub struct CliSession<S: Scheduler> {
    raffle: Raffle<S>,
    output: OutputMode,
    out: SharedOutput,
    pending: Option<Command>, // Waiting for yes/no
}

impl<S: Scheduler> CliSession<S> {
    pub fn new(raffle: Raffle<S>, output: OutputMode, out: SharedOutput) -> Self {
        Self {
            raffle,
            output,
            out,
            pending: None,
        }
    }

    pub fn raffle(&self) -> &Raffle<S> {
        &self.raffle
    }

    pub fn raffle_mut(&mut self) -> &mut Raffle<S> {
        &mut self.raffle
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.pending.is_some()
    }

    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        if let Some(command) = self.pending.take() {
            if is_confirmed(line) {
                self.execute(command)?;
            } else {
                debug!("{:?} declined", command);
                self.message("Cancelled")?;
            }
            return Ok(Flow::Continue);
        }

        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if let Some(question) = command.confirmation_prompt() {
                    self.pending = Some(command);
                    self.prompt(question)?;
                    return Ok(Flow::Continue);
                }
                self.execute(command)
            }
            Err(e) => {
                self.message(&e.to_string())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Feed one due timer to the raffle. An aborted draw is shown as a notice.
    pub fn handle_timer(&mut self, timer: DrawTimer) -> anyhow::Result<()> {
        if let Err(e) = self.raffle.handle_timer(timer) {
            self.notice(&e)?;
        }
        Ok(())
    }

    /// Replace the participant list with the contents of `path`.
    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                return self.message(&format!("Could not read {}: {}", path.display(), e));
            }
        };

        match self.raffle.load_participants(&raw) {
            Ok(count) => {
                info!("Loaded {} names from {}", count, path.display());
                self.message(&format!("Loaded {} names from {}", count, path.display()))
            }
            Err(e) => self.notice(&e),
        }
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        match command {
            Command::Load(path) => self.load_file(&path)?,
            Command::Draw => {
                if let Err(e) = self.raffle.start_draw() {
                    self.notice(&e)?;
                }
            }
            Command::ResetWheel => self.raffle.reset_wheel_display(),
            Command::ResetRound => self.raffle.reset_round(),
            Command::ClearHistory => self.raffle.clear_history(),
            Command::Sound(on) => self.raffle.set_sound(on),
            Command::RemoveWinner(enabled) => self.raffle.set_remove_winner(enabled),
            Command::Countdown(enabled) => self.raffle.set_countdown(enabled),
            Command::SingleDisplay(enabled) => self.raffle.set_single_display(enabled),
            Command::DarkMode(Some(enabled)) => self.raffle.set_dark_mode(enabled),
            Command::DarkMode(None) => {
                self.raffle.toggle_dark_mode();
            }
            Command::Names => self.show_names()?,
            Command::Winners => self.show_winners()?,
            Command::Status => self.show_status()?,
            Command::Help => self.message(HELP_TEXT)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn show_names(&mut self) -> anyhow::Result<()> {
        let names = self.raffle.eligible_names();
        match self.output {
            OutputMode::Text => self.message(&format!(
                "Eligible ({} of {}): {}",
                names.len(),
                self.raffle.all_names().len(),
                format_names(&names)
            )),
            OutputMode::Json => self.emit(&DisplayUpdate::EligibleList {
                count: names.len(),
                names,
            }),
        }
    }

    fn show_winners(&mut self) -> anyhow::Result<()> {
        let records = self.raffle.winners();
        match self.output {
            OutputMode::Text if records.is_empty() => self.message("No winners yet"),
            OutputMode::Text => self.message(&format_winners(&records).join("\n")),
            OutputMode::Json => self.emit(&DisplayUpdate::WinnerHistory { records }),
        }
    }

    fn show_status(&mut self) -> anyhow::Result<()> {
        let mut text = format!(
            "Status: {:?}, {} of {} names eligible, {} winners",
            self.raffle.status(),
            self.raffle.eligible_names().len(),
            self.raffle.all_names().len(),
            self.raffle.history().len()
        );
        if let Some(winner) = self.raffle.last_winner() {
            text.push_str(&format!(", last winner {}", winner));
        }
        text.push_str(&format!("\nSettings: {}", format_settings(self.raffle.settings())));
        self.message(&text)
    }

    fn notice(&mut self, error: &RaffleError) -> anyhow::Result<()> {
        match self.output {
            OutputMode::Text => self.message(&format!("! {}", error)),
            OutputMode::Json => self.emit(&DisplayUpdate::Notice {
                error: error.clone(),
            }),
        }
    }

    fn prompt(&mut self, question: &str) -> anyhow::Result<()> {
        match self.output {
            OutputMode::Text => self.message(question),
            OutputMode::Json => self.emit(&DisplayUpdate::ConfirmPrompt {
                question: question.to_string(),
            }),
        }
    }

    fn message(&mut self, text: &str) -> anyhow::Result<()> {
        match self.output {
            OutputMode::Text => {
                writeln!(self.out, "{}", text).context("Failed to write to stdout")?;
                self.out.flush().context("Failed to flush stdout")
            }
            OutputMode::Json => self.emit(&DisplayUpdate::Message {
                text: text.to_string(),
            }),
        }
    }

    fn emit(&mut self, update: &DisplayUpdate) -> anyhow::Result<()> {
        write_update(&mut self.out, update).context("Failed to write to stdout")
    }
}
