//! [`Console`] is the main interface for talking to a switch's serial console.
//! Its use is preferred over direct use of [`Device`].
use crate::constants::*;
use crate::{Device, Error, SwitchProfile};
use line::LinePolicy;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::fmt;
use std::thread::sleep;

pub mod builder;
pub mod line;

pub use builder::ConsoleBuilder;

/// Where the [`Console`] believes the switch's console is.
///
/// The switch doesn't report this, so it is tracked from the commands sent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConsoleMode {
    /// Nothing has been sent yet
    #[default]
    Unknown,
    /// The console answered after being reset with `exit` and `disable`
    TopLevel,
    /// Logged in with a username and password
    Authenticated,
    /// `enable` has been accepted
    Privileged,
    /// `configure terminal` has been accepted
    Configuring,
}

impl fmt::Display for ConsoleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleMode::Unknown => write!(f, "Unknown"),
            ConsoleMode::TopLevel => write!(f, "Top level"),
            ConsoleMode::Authenticated => write!(f, "Authenticated"),
            ConsoleMode::Privileged => write!(f, "Privileged"),
            ConsoleMode::Configuring => write!(f, "Configuring"),
        }
    }
}

/// The [`Console`] struct provides the line and prompt level primitives used
/// to configure a switch:
/// * send_line (send a line and read the response)
/// * wait_for (probe the console until a prompt appears)
/// * login (username/password handshake)
/// * reset_to_top_level (back out of any mode a previous session left)
/// * open_config_mode (reset, login, enable and configure terminal)
///
/// Use [`ConsoleBuilder`] to create a new [`Console`] on a serial device.
#[derive(Debug)]
pub struct Console<D: Device> {
    device: D,
    profile: SwitchProfile,
    mode: ConsoleMode,
}

/// Public [`Console`] functions
impl<D: Device> Console<D> {
    /// Creates a new console on an already created [`Device`].
    ///
    /// Prefer using [`ConsoleBuilder`] for serial devices.
    ///
    /// # Example
    /// ```
    /// use serial_uploader::{Console, MockDevice, SwitchProfile};
    ///
    /// let device = MockDevice::with_responder(|_| Some("switch>".to_string()));
    /// let mut console = Console::new(device, SwitchProfile::default());
    /// console.reset_to_top_level().unwrap();
    /// ```
    #[must_use]
    pub fn new(device: D, profile: SwitchProfile) -> Self {
        trace!("Console::new device {}", device.name());
        Console {
            device,
            profile,
            mode: ConsoleMode::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> ConsoleMode {
        self.mode
    }

    #[must_use]
    pub fn profile(&self) -> &SwitchProfile {
        &self.profile
    }

    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Consumes the console, returning the device
    pub fn into_device(self) -> D {
        self.device
    }

    /// Send a line to the console and, unless the policy says otherwise, read
    /// the response.
    ///
    /// The line is trimmed and `\r\n` appended, unless the policy is raw.
    /// The response is read until the device has no more bytes waiting,
    /// polling up to `policy.tries` times for the first byte to arrive.
    ///
    /// # Args:
    /// * `line` - the line to send
    /// * `policy` - how to send the line and treat the response
    ///
    /// # Returns
    /// * `Ok(Some(String))` - the response, when waiting
    /// * `Ok(None)` - when not waiting
    /// * `Err(Error)` - if the device failed, no response arrived in time,
    ///   or the response reported an error and failure isn't allowed
    ///
    /// # Errors
    /// [`Error::Timeout`], [`Error::Communication`]
    pub fn send_line(&mut self, line: &str, policy: &LinePolicy) -> Result<Option<String>, Error> {
        let data = if policy.raw {
            line.to_string()
        } else {
            format!("{}{LINE_ENDING}", line.trim())
        };

        let shown = if policy.secret { "********" } else { line.trim() };
        trace!("Console::send_line {shown:?} ({policy})");

        self.device.write_all(data.as_bytes())?;
        self.device.flush()?;
        if !policy.wait {
            return Ok(None);
        }

        if !policy.extra_wait.is_zero() {
            info!("Waiting an extra {:?}...", policy.extra_wait);
            sleep(policy.extra_wait);
        }

        let response = self.read_response(policy.tries)?;
        if response.is_empty() {
            return Err(Error::Timeout {
                waiting_for: format!("response to {shown:?}"),
                tries: policy.tries,
            });
        }

        if self.profile.is_error_response(&response) {
            if policy.allow_fail {
                debug!("Ignoring error response to {shown:?}: {}", response.trim());
            } else {
                warn!("Switch rejected {shown:?}");
                return Err(Error::Communication {
                    kind: crate::CommunicationKind::CommandRejected {
                        line: shown.to_string(),
                        response,
                    },
                });
            }
        }

        Ok(Some(response))
    }

    /// Probe the console with empty lines until the response contains
    /// `marker`.
    ///
    /// # Args:
    /// * `marker` - text to wait for, such as a prompt
    /// * `tries` - number of probes before giving up
    ///
    /// # Returns
    /// * `Ok(String)` - the response containing the marker
    /// * `Err(Error)` - [`Error::Timeout`] if the marker never appears, or
    ///   a device error
    ///
    /// # Errors
    /// If the marker doesn't appear
    pub fn wait_for(&mut self, marker: &str, tries: u32) -> Result<String, Error> {
        info!("Waiting for {marker}...");
        let probe = LinePolicy::new(PROMPT_PROBE_TRIES).allow_fail();

        for attempt in 1..=tries {
            match self.send_line("", &probe) {
                Ok(Some(response)) if response.contains(marker) => {
                    debug!("Found {marker} after {attempt} probes");
                    return Ok(response);
                }
                Ok(_) | Err(Error::Timeout { .. }) => {
                    debug!("Retrying wait for {marker} ({attempt}/{tries})");
                }
                Err(e) => return Err(e),
            }
        }

        warn!("Timed out waiting for {marker}");
        Err(Error::Timeout {
            waiting_for: marker.to_string(),
            tries,
        })
    }

    /// Log in to the switch.
    ///
    /// Waits for the username prompt, sends the username, waits for the
    /// password prompt if the switch didn't already show it, and sends the
    /// password.
    ///
    /// # Errors
    /// * [`Error::Auth`] - if the password is empty or the switch rejects the
    ///   credentials
    /// * [`Error::Timeout`] - if a prompt never appears
    pub fn login(&mut self, user: &str, password: &str) -> Result<(), Error> {
        if password.is_empty() {
            return Err(Error::Auth {
                message: format!("no password provided for user {user}"),
            });
        }

        if self.mode != ConsoleMode::TopLevel {
            warn!("Login called when console was in mode {}", self.mode);
        }

        info!("Authenticating as {user}...");
        let username_prompt = self.profile.username_prompt.clone();
        let password_prompt = self.profile.password_prompt.clone();
        let tries = self.profile.prompt_tries;

        self.wait_for(&username_prompt, tries)?;

        let response = self.send_raw(&format!("{user}{RAW_LINE_ENDING}"))?;
        if !response.contains(&password_prompt) {
            self.wait_for(&password_prompt, tries)?;
        }

        let response = self.send_password(password)?;
        if response.contains(&self.profile.auth_failed_marker) {
            warn!("Switch rejected credentials for {user}");
            return Err(Error::Auth {
                message: format!("switch rejected credentials for user {user}"),
            });
        }

        info!("Authenticated as {user}");
        self.mode = ConsoleMode::Authenticated;
        Ok(())
    }

    /// Back the console out of whatever mode it was left in, by sending
    /// `exit` and `disable` several times, then probe until it answers.
    ///
    /// # Errors
    /// [`Error::Timeout`] if the console never answers
    pub fn reset_to_top_level(&mut self) -> Result<(), Error> {
        debug!("Exiting several times to make sure we are at the top level");
        let fire_and_forget = LinePolicy::new(0).no_wait().allow_fail();
        for _ in 0..RESET_EXIT_COUNT {
            self.send_line(CMD_EXIT, &fire_and_forget)?;
        }

        debug!("Sending a few {CMD_DISABLE}, just in case");
        for _ in 0..RESET_DISABLE_COUNT {
            self.send_line(CMD_DISABLE, &fire_and_forget)?;
        }

        debug!("Sending newlines until the console answers");
        let probe = LinePolicy::new(PROMPT_PROBE_TRIES).allow_fail();
        let tries = self.profile.prompt_tries;
        for attempt in 1..=tries {
            self.send_line("", &fire_and_forget)?;
            self.send_line("", &fire_and_forget)?;
            match self.send_line("", &probe) {
                Ok(Some(_)) => {
                    self.mode = ConsoleMode::TopLevel;
                    return Ok(());
                }
                Ok(None) | Err(Error::Timeout { .. }) => {
                    debug!("No answer from console ({attempt}/{tries})");
                }
                Err(e) => return Err(e),
            }
        }

        warn!("Console never answered after reset");
        Err(Error::Timeout {
            waiting_for: "console to answer".to_string(),
            tries,
        })
    }

    /// Get the console into configuration mode: reset to the top level, log
    /// in if a user is given, `enable` (answering its password prompt if the
    /// switch asks) and `configure terminal`.
    ///
    /// # Args:
    /// * `credentials` - username and password, if the switch requires login
    ///
    /// # Errors
    /// [`Error::Auth`] if login or enable is rejected, or enable asks for a
    /// password and none was given.  [`Error::Timeout`] if the console
    /// stops answering.
    pub fn open_config_mode(&mut self, credentials: Option<&Credentials>) -> Result<(), Error> {
        self.reset_to_top_level()?;

        if let Some(credentials) = credentials {
            self.login(&credentials.user, &credentials.password)?;
        }

        let response = self.send_line(
            &format!("{CMD_ENABLE}{RAW_LINE_ENDING}"),
            &LinePolicy::new(self.profile.response_tries).raw().allow_fail(),
        )?;
        // Some configurations require re-authentication for enable
        if response
            .as_deref()
            .is_some_and(|r| r.contains(&self.profile.password_prompt))
        {
            let password = credentials
                .map(|c| c.password.as_str())
                .filter(|p| !p.is_empty())
                .ok_or_else(|| Error::Auth {
                    message: "enable asked for a password but none was provided".to_string(),
                })?;
            let response = self.send_password(password)?;
            if response.contains(&self.profile.auth_failed_marker) {
                return Err(Error::Auth {
                    message: "enable authentication failed".to_string(),
                });
            }
        }
        self.mode = ConsoleMode::Privileged;

        let policy = LinePolicy::new(self.profile.response_tries);
        self.send_line(CMD_CONFIGURE_TERMINAL, &policy)?;
        self.send_line("", &policy)?;
        self.mode = ConsoleMode::Configuring;
        info!("Console is in configuration mode");
        Ok(())
    }
}

/// Private functions for Console
impl<D: Device> Console<D> {
    /// Read the response to a line.
    ///
    /// Keeps reading while the device has bytes waiting, or while nothing
    /// has been received and tries remain.
    fn read_response(&mut self, tries: u32) -> Result<String, Error> {
        let poll_interval = self.profile.poll_interval();
        let mut response = Vec::new();
        let mut tries_left = tries;

        loop {
            let waiting = self.device.bytes_to_read()?;
            if waiting == 0 && (!response.is_empty() || tries_left == 0) {
                break;
            }

            if waiting > 0 {
                if !response.is_empty() {
                    trace!("Waiting for {waiting} bytes, got {}...", response.len());
                }
                let mut chunk = vec![0u8; waiting];
                let size = self.device.read(&mut chunk)?;
                response.extend_from_slice(&chunk[..size]);
            }

            sleep(poll_interval);
            tries_left = tries_left.saturating_sub(1);
        }

        let response = String::from_utf8_lossy(&response).into_owned();
        trace!("Console response {response:?}");
        Ok(response)
    }

    fn send_raw(&mut self, data: &str) -> Result<String, Error> {
        let policy = LinePolicy::new(self.profile.response_tries).raw();
        self.send_line(data, &policy)
            .map(Option::unwrap_or_default)
    }

    fn send_password(&mut self, password: &str) -> Result<String, Error> {
        let policy = LinePolicy::new(self.profile.response_tries).secret();
        self.send_line(password, &policy)
            .map(Option::unwrap_or_default)
    }
}

/// Username and password used to log in to the switch
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"********")
            .finish()
    }
}
