use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Draw,
    ResetWheel,
    ResetRound,
    ClearHistory,
    Sound(bool),
    RemoveWinner(bool),
    Countdown(bool),
    SingleDisplay(bool),
    DarkMode(Option<bool>), // None toggles
    Names,
    Winners,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Destructive commands that need a yes/no answer before they run.
    pub fn confirmation_prompt(&self) -> Option<&'static str> {
        match self {
            Command::ResetRound => {
                Some("Put every removed winner back into the draw? History is kept. (yes/no)")
            }
            Command::ClearHistory => {
                Some("Erase all past winners and restore every name? (yes/no)")
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("Expected 'on' or 'off', got '{0}'")]
    InvalidToggle(String),
    #[error("'{command}' takes no argument, got '{argument}'")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },
}

fn parse_toggle(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(CommandError::InvalidToggle(value.to_string())),
    }
}

fn required_toggle(command: &'static str, argument: Option<&str>) -> Result<bool, CommandError> {
    let value = argument.ok_or(CommandError::MissingArgument {
        command,
        expected: "'on' or 'off'",
    })?;
    parse_toggle(value)
}

fn no_argument(
    command: &'static str,
    argument: Option<&str>,
    parsed: Command,
) -> Result<Command, CommandError> {
    match argument {
        Some(argument) => Err(CommandError::UnexpectedArgument {
            command,
            argument: argument.to_string(),
        }),
        None => Ok(parsed),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|rest| !rest.is_empty())),
            None => (line, None),
        };

        match name.to_ascii_lowercase().as_str() {
            "load" => argument
                .map(|path| Command::Load(PathBuf::from(path)))
                .ok_or(CommandError::MissingArgument {
                    command: "load",
                    expected: "a file path",
                }),
            "draw" | "spin" => no_argument("draw", argument, Command::Draw),
            "reset-wheel" => no_argument("reset-wheel", argument, Command::ResetWheel),
            "reset-round" => no_argument("reset-round", argument, Command::ResetRound),
            "clear-history" => no_argument("clear-history", argument, Command::ClearHistory),
            "sound" => required_toggle("sound", argument).map(Command::Sound),
            "remove-winner" => required_toggle("remove-winner", argument).map(Command::RemoveWinner),
            "countdown" => required_toggle("countdown", argument).map(Command::Countdown),
            "single-display" => {
                required_toggle("single-display", argument).map(Command::SingleDisplay)
            }
            "dark-mode" => argument
                .map(parse_toggle)
                .transpose()
                .map(Command::DarkMode),
            "names" => no_argument("names", argument, Command::Names),
            "winners" => no_argument("winners", argument, Command::Winners),
            "status" => no_argument("status", argument, Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

/// Anything but an explicit yes declines.
pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y")
}

pub const HELP_TEXT: &str = "\
Commands:
  load <path>                 replace the participant list with a file, one name per line
  draw                        spin the wheel and reveal a winner
  reset-wheel                 clear the result display
  reset-round                 put removed winners back into the draw
  clear-history               erase all winners
  sound on|off                play sounds during the draw
  remove-winner on|off        take winners out of later draws
  countdown on|off            count down from 10 before spinning
  single-display on|off       show only the winner panel
  dark-mode [on|off]          switch the colour theme
  names                       list eligible participants
  winners                     list past winners, most recent first
  status                      show the draw state and settings
  quit                        leave";
