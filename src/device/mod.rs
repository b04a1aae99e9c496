//! The [`Device`] module provides the low-level byte interface to the switch's
//! serial console.  Prefer [`crate::Console`] for most use cases.
//!
//! Two implementations are provided:
//! * [`SerialDevice`] - a real serial port, opened via the `serialport` crate
//! * [`MockDevice`] - a scripted in-memory device, used for testing

pub mod mock;
pub mod serial;

pub use mock::{MockDevice, MockDeviceConfig};
pub use serial::{SerialDevice, SerialDeviceConfig};

use crate::Error;

/// The core Device trait, which allows Device to be mocked out for testing
pub trait Device: std::fmt::Debug + Send {
    type Config;

    /// Creates a new Device using the provided config, which can be
    /// omitted in order to create a Device using default configuration.
    ///
    /// # Arguments
    /// * `config` - Configuration for the device, or None for default
    ///
    /// # Returns
    /// * `Ok(Device)` - Successfully created device instance
    /// * `Err(Error)` - If device creation fails (device not found,
    ///   permissions problem, or serial error)
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use serial_uploader::{Device, SerialDevice};
    ///
    /// // Open /dev/ttyUSB0 at 9600 8N1
    /// let device = SerialDevice::new(None).unwrap();
    /// ```
    fn new(config: Option<Self::Config>) -> Result<Self, Error>
    where
        Self: Sized;

    /// A human readable name for this device, used in log messages
    fn name(&self) -> String;

    /// Writes all of `data` to the device
    ///
    /// # Returns
    /// * `Ok(())` - On success
    /// * `Err(Error)` - On failure, in which case some of the data may have
    ///   been written
    fn write_all(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Returns the number of bytes received from the device and waiting to
    /// be read
    fn bytes_to_read(&mut self) -> Result<usize, Error>;

    /// Reads data from the device
    ///
    /// Reads at most `buffer.len()` bytes.  Callers should check
    /// [`Device::bytes_to_read`] first, as this may block until the device's
    /// timeout if no data is waiting.
    ///
    /// # Returns
    /// * `Ok(usize)` - On success, number of bytes read
    /// * `Err(Error>` - On failure
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error>;

    /// Flushes any buffered output to the device
    fn flush(&mut self) -> Result<(), Error>;
}
