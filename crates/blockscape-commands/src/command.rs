//! Command identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Every command the editor can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    /// Create a modifiable source block.
    CreateSource,
    /// Create a modifier effect block.
    CreateEffect,
    /// Delete whichever block is selected.
    DeleteSelected,
    Undo,
    Redo,
    /// Change a named parameter of a block.
    SetParam,
    /// Move a block to a new position.
    MoveBlock,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::CreateSource,
        Command::CreateEffect,
        Command::DeleteSelected,
        Command::Undo,
        Command::Redo,
        Command::SetParam,
        Command::MoveBlock,
    ];

    /// Kebab-case name used in scripts and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::CreateSource => "create-source",
            Command::CreateEffect => "create-effect",
            Command::DeleteSelected => "delete-selected",
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::SetParam => "set-param",
            Command::MoveBlock => "move-block",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown command '{0}'")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Command::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ParseCommandError(s.to_string()))
    }
}
