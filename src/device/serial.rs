#[allow(unused_imports)]
use crate::constants::*;
use crate::{Device, DeviceAccessKind, Error};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

/// SerialDevice represents the serial port the switch's console is attached
/// to.
///
/// It is unlikely to be necessary to use this struct directly as
/// [`crate::Console`] provides the line and prompt level interface the
/// uploader needs.
///
/// Instead of using [`SerialDevice::new`] it is recommended to use
/// [`crate::ConsoleBuilder::build`], which will create both the Console
/// object, and at the same time the Device object.
///
/// The port is flushed and closed when the SerialDevice is dropped.
pub struct SerialDevice {
    port: Box<dyn SerialPort>,
    config: SerialDeviceConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SerialDeviceConfig {
    /// Path of the serial device, for example `/dev/ttyUSB0`
    pub path: PathBuf,

    /// Baud rate.  Data bits, parity and stop bits are fixed at 8N1.
    pub baud_rate: u32,

    /// Timeout for individual reads and writes
    pub timeout: Duration,
}

impl Default for SerialDeviceConfig {
    fn default() -> Self {
        SerialDeviceConfig {
            path: PathBuf::from(DEFAULT_SERIAL_DEVICE),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_PORT_TIMEOUT,
        }
    }
}

impl fmt::Debug for SerialDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialDevice")
            .field("config", &self.config)
            .finish()
    }
}

impl SerialDevice {
    /// Returns the configuration this device was opened with
    pub fn config(&self) -> &SerialDeviceConfig {
        &self.config
    }
}

/// Public Device functions
impl Device for SerialDevice {
    type Config = SerialDeviceConfig;

    fn new(config: Option<Self::Config>) -> Result<Self, Error> {
        trace!("SerialDevice::new");

        let config = config.unwrap_or_default();
        trace!("SerialDevice::new config {:?}", config);

        // serialport reports some missing paths as generic open failures
        if !config.path.exists() {
            warn!("Serial device {} does not exist", config.path.display());
            return Err(Error::DeviceAccess {
                kind: DeviceAccessKind::NotFound {
                    path: config.path.clone(),
                },
            });
        }

        let port = serialport::new(config.path.to_string_lossy(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|e| {
                warn!("Failed to open {}: {}", config.path.display(), e);
                Error::device_access(&config.path, &e)
            })?;

        info!(
            "Opened serial device {} at {} baud",
            config.path.display(),
            config.baud_rate
        );

        Ok(Self { port, config })
    }

    fn name(&self) -> String {
        self.config.path.display().to_string()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Error> {
        trace!("SerialDevice::write_all data.len() {}", data.len());
        self.port.write_all(data)?;
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<usize, Error> {
        let count = self.port.bytes_to_read()?;
        Ok(count as usize)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        let size = self.port.read(buffer)?;
        trace!("SerialDevice::read got {size} bytes");
        Ok(size)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.port.flush()?;
        Ok(())
    }
}

impl Drop for SerialDevice {
    fn drop(&mut self) {
        trace!("SerialDevice::drop");
        // Ignoring errors since we're in drop
        let _ = self.port.flush();
        debug!("Closed serial device {}", self.config.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_not_found() {
        let config = SerialDeviceConfig {
            path: PathBuf::from("/dev/serial-uploader-does-not-exist"),
            ..Default::default()
        };
        let result = SerialDevice::new(Some(config));
        assert!(matches!(
            result,
            Err(Error::DeviceAccess {
                kind: DeviceAccessKind::NotFound { .. }
            })
        ));
    }

    #[test]
    fn test_not_a_serial_device() {
        // A regular file exists, but can't be configured as a serial port
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = SerialDeviceConfig {
            path: file.path().to_path_buf(),
            ..Default::default()
        };
        let result = SerialDevice::new(Some(config));
        assert!(matches!(result, Err(Error::DeviceAccess { .. })));
    }

    #[test]
    fn test_default_config() {
        let config = SerialDeviceConfig::default();
        assert_eq!(config.path, PathBuf::from("/dev/ttyUSB0"));
        assert_eq!(config.baud_rate, 9600);
    }
}
