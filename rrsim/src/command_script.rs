//! # Command Script Parser
//!
//! Provides a line-based command format for deterministic runs and demos.
//!
//! ## Format
//!
//! - One driver command per line (see [`crate::commands`])
//! - Comments: `# This is a comment`, on their own line or after a command
//! - Blank lines are ignored
//!
//! ## Example
//!
//! ```text
//! # Watch the first quantum, undo it, then finish
//! step 2
//! status
//! back       # undo one tick
//! run
//! stats
//! ```

use crate::commands::{CommandError, DriverCommand, DriverCommandParser};
use std::collections::VecDeque;
use thiserror::Error;

/// Command script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandScriptError {
    #[error("Parse error at line {line}: {source}")]
    ParseError { line: usize, source: CommandError },

    #[error("Empty script")]
    EmptyScript,
}

/// Command script
///
/// Queue of parsed commands consumed in order.
#[derive(Debug, Clone, Default)]
pub struct CommandScript {
    commands: VecDeque<DriverCommand>,
}

impl CommandScript {
    /// Creates a script from already-parsed commands
    pub fn from_commands(commands: impl IntoIterator<Item = DriverCommand>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, CommandScriptError> {
        let mut commands = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let command =
                DriverCommandParser::parse(line).map_err(|source| CommandScriptError::ParseError {
                    line: line_num + 1,
                    source,
                })?;
            commands.push_back(command);
        }

        if commands.is_empty() {
            return Err(CommandScriptError::EmptyScript);
        }

        Ok(Self { commands })
    }

    /// Takes the next command
    pub fn next_command(&mut self) -> Option<DriverCommand> {
        self.commands.pop_front()
    }

    pub fn has_more(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = CommandScript::from_text(
            r#"
            # setup
            step 2
            status   # show it
            back

            run
            stats
            "#,
        )
        .unwrap();
        assert_eq!(script.remaining(), 5);
    }

    #[test]
    fn test_commands_in_order() {
        let mut script = CommandScript::from_text("step 3\nback\nquit").unwrap();
        assert_eq!(
            script.next_command(),
            Some(DriverCommand::Step { count: 3 })
        );
        assert_eq!(
            script.next_command(),
            Some(DriverCommand::Back { count: 1 })
        );
        assert_eq!(script.next_command(), Some(DriverCommand::Quit));
        assert_eq!(script.next_command(), None);
        assert!(!script.has_more());
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(
            CommandScript::from_text("# only comments\n\n").unwrap_err(),
            CommandScriptError::EmptyScript
        );
    }

    #[test]
    fn test_error_reports_line() {
        let err = CommandScript::from_text("step\n\nwarp 9").unwrap_err();
        assert_eq!(
            err,
            CommandScriptError::ParseError {
                line: 3,
                source: CommandError::UnknownCommand("warp".to_string()),
            }
        );
    }
}
