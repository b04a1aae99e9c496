//! [`SwitchProfile`] holds the prompt patterns and timings which vary between
//! switch firmwares.  The defaults work with common Cisco-style consoles.
//!
//! A profile can be loaded from a TOML file, where every field is optional:
//!
//! ```toml
//! username_prompt = "login:"
//! password_prompt = "Password:"
//! line_delay_ms = 50
//! tolerated_prefixes = ["define interface-range", "banner"]
//! ```
use crate::constants::*;
use crate::Error;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchProfile {
    /// Console text asking for a username
    pub username_prompt: String,
    /// Console text asking for a password
    pub password_prompt: String,
    /// Console text shown when credentials are rejected
    pub auth_failed_marker: String,
    /// Console text (matched case-insensitively) shown when a command is
    /// rejected
    pub command_error_marker: String,
    /// Configuration command which takes a long time to complete
    pub long_command_marker: String,
    /// Lines which may be rejected without failing the upload
    pub tolerated_lines: Vec<String>,
    /// Line prefixes which may be rejected without failing the upload
    pub tolerated_prefixes: Vec<String>,
    pub poll_interval_ms: u64,
    pub line_delay_ms: u64,
    pub long_command_wait_ms: u64,
    pub response_tries: u32,
    pub long_command_tries: u32,
    pub prompt_tries: u32,
}

impl Default for SwitchProfile {
    fn default() -> Self {
        SwitchProfile {
            username_prompt: USERNAME_PROMPT.to_string(),
            password_prompt: PASSWORD_PROMPT.to_string(),
            auth_failed_marker: AUTH_FAILED_MARKER.to_string(),
            command_error_marker: COMMAND_ERROR_MARKER.to_string(),
            long_command_marker: LONG_COMMAND_MARKER.to_string(),
            tolerated_lines: vec!["y".to_string()],
            tolerated_prefixes: vec!["define interface-range".to_string()],
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            line_delay_ms: DEFAULT_LINE_DELAY.as_millis() as u64,
            long_command_wait_ms: DEFAULT_LONG_COMMAND_WAIT.as_millis() as u64,
            response_tries: DEFAULT_RESPONSE_TRIES,
            long_command_tries: DEFAULT_LONG_COMMAND_TRIES,
            prompt_tries: DEFAULT_PROMPT_TRIES,
        }
    }
}

impl SwitchProfile {
    /// Loads and validates a profile from a TOML file
    ///
    /// # Errors
    /// * [`Error::ConfigFile`] if the file can't be read
    /// * [`Error::Args`] if the file isn't a valid profile
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Loading switch profile from {}", path.display());
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::config_file(path, &e))?;
        Self::from_toml(&contents).inspect_err(|e| warn!("{}: {e}", path.display()))
    }

    /// Parses and validates a profile from TOML text
    ///
    /// # Errors
    /// [`Error::Args`] if the text isn't a valid profile
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        let profile: SwitchProfile = toml::from_str(contents).map_err(|e| Error::Args {
            message: format!("invalid switch profile: {e}"),
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Checks the profile can't lead to a console wait which never succeeds
    /// or never gives up
    pub fn validate(&self) -> Result<(), Error> {
        let markers = [
            ("username_prompt", &self.username_prompt),
            ("password_prompt", &self.password_prompt),
            ("auth_failed_marker", &self.auth_failed_marker),
            ("command_error_marker", &self.command_error_marker),
        ];
        for (name, value) in markers {
            if value.is_empty() {
                return Err(Error::Args {
                    message: format!("switch profile {name} must not be empty"),
                });
            }
        }

        let tries = [
            ("response_tries", self.response_tries),
            ("long_command_tries", self.long_command_tries),
            ("prompt_tries", self.prompt_tries),
        ];
        for (name, value) in tries {
            if value == 0 {
                return Err(Error::Args {
                    message: format!("switch profile {name} must be at least 1"),
                });
            }
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn line_delay(&self) -> Duration {
        Duration::from_millis(self.line_delay_ms)
    }

    pub fn long_command_wait(&self) -> Duration {
        Duration::from_millis(self.long_command_wait_ms)
    }

    /// Whether the switch rejecting `line` should not fail the upload
    pub fn is_tolerated(&self, line: &str) -> bool {
        self.tolerated_lines.iter().any(|l| l == line)
            || self.tolerated_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Whether `line` is a command the switch takes a long time to process
    pub fn is_long_command(&self, line: &str) -> bool {
        !self.long_command_marker.is_empty() && line.contains(&self.long_command_marker)
    }

    /// Whether the console `response` reports a rejected command
    pub fn is_error_response(&self, response: &str) -> bool {
        response
            .to_lowercase()
            .contains(&self.command_error_marker.to_lowercase())
    }
}
