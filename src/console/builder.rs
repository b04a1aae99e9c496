use crate::constants::{DEFAULT_BAUD_RATE, DEFAULT_PORT_TIMEOUT, DEFAULT_SERIAL_DEVICE};
use crate::{Console, Device, Error, SerialDevice, SerialDeviceConfig, SwitchProfile};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::path::PathBuf;
use std::time::Duration;

/// A builder pattern for creating [`Console`] instances on a serial port
/// with custom configuration.
///
/// Allows setting optional parameters like the device path, baud rate and
/// switch profile before opening the port and creating the final
/// [`Console`] instance.
///
/// # Examples
///
/// ## A simple example
///
/// ```no_run
/// use serial_uploader::ConsoleBuilder;
///
/// // Opens /dev/ttyUSB0 at 9600 baud
/// let console = ConsoleBuilder::new()
///     .build()
///     .unwrap();
/// ```
///
/// ## A more complex example
///
/// ```no_run
/// use serial_uploader::{ConsoleBuilder, SwitchProfile};
/// use std::time::Duration;
///
/// let profile = SwitchProfile {
///     line_delay_ms: 100,
///     ..Default::default()
/// };
///
/// let console = ConsoleBuilder::new()
///     .path("/dev/ttyS1")
///     .baud_rate(115_200)
///     .timeout(Duration::from_secs(2))
///     .profile(profile)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ConsoleBuilder {
    path: Option<PathBuf>,
    baud_rate: Option<u32>,
    timeout: Option<Duration>,
    profile: Option<SwitchProfile>,
}

impl ConsoleBuilder {
    /// Creates a new [`ConsoleBuilder`] instance with default values.
    ///
    /// All fields are initialized to None and can be set using the builder
    /// methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the serial device and returns a new [`Console`] on it, using
    /// the configured parameters.
    ///
    /// # Returns
    /// * `Ok(Console)` - the constructed Console instance if successful
    /// * `Err(Error)` - if the profile is invalid or the device couldn't be
    ///   opened.  Nothing has been written to the device in this case.
    ///
    /// # Notes:
    /// Uses default values for any parameters that weren't set
    pub fn build(&mut self) -> Result<Console<SerialDevice>, Error> {
        let profile = self.profile.take().unwrap_or_default();
        profile.validate()?;

        let config = SerialDeviceConfig {
            path: self
                .path
                .take()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SERIAL_DEVICE)),
            baud_rate: self.baud_rate.unwrap_or(DEFAULT_BAUD_RATE),
            timeout: self.timeout.unwrap_or(DEFAULT_PORT_TIMEOUT),
        };
        trace!("ConsoleBuilder::build {config:?}");

        let device = SerialDevice::new(Some(config))?;
        Ok(Console::new(device, profile))
    }

    /// Sets the serial device path.
    ///
    /// # Note:
    /// If not set, defaults to `/dev/ttyUSB0`
    pub fn path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the baud rate.  Data bits, parity and stop bits are always 8N1.
    ///
    /// # Note:
    /// If not set, defaults to 9600
    pub fn baud_rate(&mut self, baud_rate: u32) -> &mut Self {
        self.baud_rate = Some(baud_rate);
        self
    }

    /// Sets the timeout for individual serial reads and writes.
    pub fn timeout(&mut self, duration: Duration) -> &mut Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the [`SwitchProfile`] with the prompt patterns and timings for
    /// the switch.
    pub fn profile(&mut self, profile: SwitchProfile) -> &mut Self {
        self.profile = Some(profile);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeviceAccessKind;

    #[test]
    fn test_missing_device() {
        let result = ConsoleBuilder::new()
            .path("/dev/serial-uploader-missing")
            .build();
        assert!(matches!(
            result,
            Err(Error::DeviceAccess {
                kind: DeviceAccessKind::NotFound { .. }
            })
        ));
    }

    #[test]
    fn test_invalid_profile_checked_first() {
        let profile = SwitchProfile {
            prompt_tries: 0,
            ..Default::default()
        };
        let result = ConsoleBuilder::new()
            .path("/dev/serial-uploader-missing")
            .profile(profile)
            .build();
        assert!(matches!(result, Err(Error::Args { .. })));
    }
}
