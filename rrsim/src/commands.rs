//! # Driver Commands
//!
//! Provides the command surface for driving a simulation.
//!
//! ## Command Set
//!
//! - `step [n]` - Advance `n` ticks (default 1)
//! - `back [n]` - Undo `n` ticks (default 1)
//! - `play [n]` - Advance one tick per loop step, up to `n` ticks or until finished
//! - `run` - Advance until finished
//! - `reset` - Restart from the configuration with a new run id
//! - `status` - Print the current view
//! - `stats` - Print the final report
//! - `quit` - Stop the driver
//!
//! ## Philosophy
//!
//! - Commands only drive the engine
//! - The engine does the actual work

use thiserror::Error;

/// Driver command error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid count: {0}")]
    InvalidCount(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Driver commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    /// Advance a number of ticks
    Step { count: usize },

    /// Undo a number of ticks
    Back { count: usize },

    /// Advance tick by tick, optionally bounded
    Play { count: Option<usize> },

    /// Advance until finished
    Run,

    /// Restart the simulation
    Reset,

    /// Show the current view
    Status,

    /// Show the final report
    Stats,

    /// Stop the driver
    Quit,
}

/// Driver command parser
pub struct DriverCommandParser;

impl DriverCommandParser {
    /// Parses a command string
    pub fn parse(input: &str) -> Result<DriverCommand, CommandError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(CommandError::InvalidCommand("Empty command".to_string()));
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "step" | "s" => Ok(DriverCommand::Step {
                count: Self::parse_count(args)?.unwrap_or(1),
            }),
            "back" | "b" => Ok(DriverCommand::Back {
                count: Self::parse_count(args)?.unwrap_or(1),
            }),
            "play" => Ok(DriverCommand::Play {
                count: Self::parse_count(args)?,
            }),
            "run" => Self::no_args(args, DriverCommand::Run),
            "reset" => Self::no_args(args, DriverCommand::Reset),
            "status" => Self::no_args(args, DriverCommand::Status),
            "stats" | "report" => Self::no_args(args, DriverCommand::Stats),
            "quit" | "exit" => Self::no_args(args, DriverCommand::Quit),
            _ => Err(CommandError::UnknownCommand(cmd)),
        }
    }

    /// Parses an optional positive count
    fn parse_count(args: &[&str]) -> Result<Option<usize>, CommandError> {
        match args {
            [] => Ok(None),
            [value] => match value.parse::<usize>() {
                Ok(count) if count > 0 => Ok(Some(count)),
                _ => Err(CommandError::InvalidCount(value.to_string())),
            },
            [_, extra, ..] => Err(CommandError::UnexpectedArgument(extra.to_string())),
        }
    }

    fn no_args(args: &[&str], command: DriverCommand) -> Result<DriverCommand, CommandError> {
        match args.first() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_step_default() {
        let cmd = DriverCommandParser::parse("step").unwrap();
        assert_eq!(cmd, DriverCommand::Step { count: 1 });
    }

    #[test]
    fn test_parse_step_with_count() {
        let cmd = DriverCommandParser::parse("step 5").unwrap();
        assert_eq!(cmd, DriverCommand::Step { count: 5 });
    }

    #[test]
    fn test_parse_back() {
        assert_eq!(
            DriverCommandParser::parse("back").unwrap(),
            DriverCommand::Back { count: 1 }
        );
        assert_eq!(
            DriverCommandParser::parse("b 3").unwrap(),
            DriverCommand::Back { count: 3 }
        );
    }

    #[test]
    fn test_parse_play() {
        assert_eq!(
            DriverCommandParser::parse("play").unwrap(),
            DriverCommand::Play { count: None }
        );
        assert_eq!(
            DriverCommandParser::parse("play 10").unwrap(),
            DriverCommand::Play { count: Some(10) }
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(DriverCommandParser::parse("run").unwrap(), DriverCommand::Run);
        assert_eq!(
            DriverCommandParser::parse("reset").unwrap(),
            DriverCommand::Reset
        );
        assert_eq!(
            DriverCommandParser::parse("status").unwrap(),
            DriverCommand::Status
        );
        assert_eq!(
            DriverCommandParser::parse("stats").unwrap(),
            DriverCommand::Stats
        );
        assert_eq!(DriverCommandParser::parse("quit").unwrap(), DriverCommand::Quit);
        assert_eq!(DriverCommandParser::parse("exit").unwrap(), DriverCommand::Quit);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(
            DriverCommandParser::parse("  STEP 2 ").unwrap(),
            DriverCommand::Step { count: 2 }
        );
    }

    #[test]
    fn test_parse_empty_command() {
        assert!(matches!(
            DriverCommandParser::parse("   "),
            Err(CommandError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_zero_count() {
        assert_eq!(
            DriverCommandParser::parse("step 0"),
            Err(CommandError::InvalidCount("0".to_string()))
        );
    }

    #[test]
    fn test_parse_invalid_count() {
        assert_eq!(
            DriverCommandParser::parse("back many"),
            Err(CommandError::InvalidCount("many".to_string()))
        );
    }

    #[test]
    fn test_parse_extra_argument() {
        assert_eq!(
            DriverCommandParser::parse("run now"),
            Err(CommandError::UnexpectedArgument("now".to_string()))
        );
        assert_eq!(
            DriverCommandParser::parse("step 1 2"),
            Err(CommandError::UnexpectedArgument("2".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            DriverCommandParser::parse("fork"),
            Err(CommandError::UnknownCommand("fork".to_string()))
        );
    }
}
