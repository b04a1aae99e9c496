//! Uploads a configuration file to a switch, line by line.
use crate::console::line::LinePlanner;
use crate::{Console, Credentials, Device, Error, SwitchProfile};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// A configuration file, read fully into memory before anything is sent to
/// the switch
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl ConfigFile {
    /// Reads the configuration file at `path`
    ///
    /// # Errors
    /// [`Error::ConfigFile`] if the file is missing or can't be read
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            warn!("Failed to read {}: {e}", path.display());
            Error::config_file(path, &e)
        })?;
        let lines = contents.lines().map(str::to_string).collect::<Vec<_>>();
        debug!("Read {} lines from {}", lines.len(), path.display());
        Ok(ConfigFile {
            path: path.to_path_buf(),
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The outcome of a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    /// Number of configuration lines sent
    pub lines_sent: usize,
    /// Time taken, including login
    pub elapsed: Duration,
}

/// Drives a complete upload over a [`Console`]:
/// * open configuration mode (reset, login, enable, configure terminal)
/// * send every line of the [`ConfigFile`] in order
/// * back out to the top level again
///
/// # Example
/// ```no_run
/// use serial_uploader::{ConfigFile, ConsoleBuilder, Uploader};
///
/// let config = ConfigFile::load("switch.conf").unwrap();
/// let console = ConsoleBuilder::new().path("/dev/ttyUSB0").build().unwrap();
/// let report = Uploader::new(console).run(&config).unwrap();
/// println!("Sent {} lines", report.lines_sent);
/// ```
#[derive(Debug)]
pub struct Uploader<D: Device> {
    console: Console<D>,
    credentials: Option<Credentials>,
    line_delay: Duration,
}

impl<D: Device> Uploader<D> {
    #[must_use]
    pub fn new(console: Console<D>) -> Self {
        let line_delay = console.profile().line_delay();
        Uploader {
            console,
            credentials: None,
            line_delay,
        }
    }

    /// Log in with these credentials before configuring the switch
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Pause between configuration lines, overriding the profile's delay
    #[must_use]
    pub fn line_delay(mut self, line_delay: Duration) -> Self {
        self.line_delay = line_delay;
        self
    }

    #[must_use]
    pub fn console(&self) -> &Console<D> {
        &self.console
    }

    /// Consumes the uploader, returning the console
    pub fn into_console(self) -> Console<D> {
        self.console
    }

    /// Upload `config` to the switch.
    ///
    /// # Returns
    /// * `Ok(UploadReport)` - if every line was accepted
    /// * `Err(Error)` - on the first failure.  Lines before the failing one
    ///   have been applied to the switch.
    ///
    /// # Errors
    /// [`Error::Auth`], [`Error::Timeout`] or [`Error::Communication`]
    pub fn run(&mut self, config: &ConfigFile) -> Result<UploadReport, Error> {
        let start = Instant::now();
        info!(
            "Uploading config {} to device {}",
            config.path().display(),
            self.console.device().name()
        );

        self.console.open_config_mode(self.credentials.as_ref())?;

        let total = config.len();
        let profile = self.console.profile().clone();
        let mut planner = LinePlanner::new(&profile);
        for (index, line) in config.lines().iter().enumerate() {
            let policy = planner.plan(line);
            info!(
                "Sending line number {} of {total}: {} ({policy})",
                index + 1,
                line.trim()
            );
            self.console.send_line(line, &policy)?;

            if profile.is_long_command(line) {
                warn!("The next command might take a while to execute, be patient!");
            }

            if !self.line_delay.is_zero() {
                sleep(self.line_delay);
            }
        }

        self.console.reset_to_top_level()?;

        let elapsed = start.elapsed();
        info!("Uploaded {total} lines in {:.1}s", elapsed.as_secs_f64());
        Ok(UploadReport {
            lines_sent: total,
            elapsed,
        })
    }
}

/// What to upload and how, as given on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadOptions {
    /// Configuration file to upload
    pub config_file: PathBuf,
    /// TOML switch profile.  If None the default profile is used.
    pub profile: Option<PathBuf>,
    /// Username to log in with
    pub user: Option<String>,
    /// Overrides the profile's delay between lines
    pub line_delay: Option<Duration>,
}

/// Runs a complete upload described by `options`.
///
/// The configuration file and profile are read first, then the password is
/// asked for (only if there is a user), and only then is the console opened.
/// A missing file therefore fails without any serial I/O.
///
/// # Args:
/// * `options` - what to upload
/// * `password` - asked for the password when logging in
/// * `open` - opens the console using the loaded profile
///
/// # Example
/// ```no_run
/// use serial_uploader::password::prompt_password;
/// use serial_uploader::upload::{upload, UploadOptions};
/// use serial_uploader::ConsoleBuilder;
///
/// let options = UploadOptions {
///     config_file: "switch.conf".into(),
///     user: Some("admin".to_string()),
///     ..Default::default()
/// };
/// let report = upload(
///     &options,
///     || prompt_password("Password: "),
///     |profile| ConsoleBuilder::new().path("/dev/ttyUSB0").profile(profile).build(),
/// )
/// .unwrap();
/// println!("Sent {} lines", report.lines_sent);
/// ```
pub fn upload<D, P, O>(options: &UploadOptions, password: P, open: O) -> Result<UploadReport, Error>
where
    D: Device,
    P: FnOnce() -> Result<String, Error>,
    O: FnOnce(SwitchProfile) -> Result<Console<D>, Error>,
{
    let config = ConfigFile::load(&options.config_file)?;
    let profile = match &options.profile {
        Some(path) => SwitchProfile::from_file(path)?,
        None => SwitchProfile::default(),
    };

    let credentials = match &options.user {
        Some(user) => Some(Credentials::new(user.clone(), password()?)),
        None => None,
    };

    let console = open(profile)?;

    let mut uploader = Uploader::new(console);
    if let Some(credentials) = credentials {
        uploader = uploader.credentials(credentials);
    }
    if let Some(line_delay) = options.line_delay {
        uploader = uploader.line_delay(line_delay);
    }

    uploader.run(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigFileKind;
    use std::io::Write;

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "hostname sw1\r\n\nvlan 10\n name users\n").unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.lines(), &["hostname sw1", "", "vlan 10", " name users"]);
        assert_eq!(config.len(), 4);
        assert_eq!(config.path(), file.path());
    }

    #[test]
    fn test_load_missing() {
        let result = ConfigFile::load("/nonexistent/switch.conf");
        assert_eq!(
            result,
            Err(Error::ConfigFile {
                path: PathBuf::from("/nonexistent/switch.conf"),
                kind: ConfigFileKind::NotFound
            })
        );
    }

    #[test]
    fn test_load_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = ConfigFile::load(file.path()).unwrap();
        assert!(config.is_empty());
    }
}
