//! External MP3 player invocation.

use std::path::Path;
use std::process::{Command, Stdio};

use super::TtsError;

/// Platform default player, if one is known.
pub fn default_player() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("afplay")
    } else if cfg!(target_os = "linux") {
        Some("mpg123 -q")
    } else {
        None
    }
}

/// A player program plus leading arguments; the audio path is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    /// Split a command line such as `"ffplay -nodisp -autoexit"` on
    /// whitespace.  Blank input yields `None`.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Configured command if any, else [`default_player`].
    pub fn resolve(configured: Option<&str>) -> Option<Self> {
        configured
            .and_then(Self::parse)
            .or_else(|| default_player().and_then(Self::parse))
    }

    /// Play `path` and wait for the player to exit.
    pub fn play(&self, path: &Path) -> Result<(), TtsError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| TtsError::Playback(format!("{}: {e}", self.program)))?;

        if status.success() {
            Ok(())
        } else {
            Err(TtsError::Playback(format!("{} exited with {status}", self.program)))
        }
    }
}
