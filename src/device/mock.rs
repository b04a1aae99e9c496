//! A scripted in-memory [`Device`], used to test [`crate::Console`] and
//! [`crate::Uploader`] without a switch attached.
//!
//! Each write is recorded and passed to a responder, which returns the bytes
//! the "switch" sends back, if any.  Those bytes are then available to read.
use crate::{CommunicationKind, Device, Error};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::collections::VecDeque;
use std::fmt;

/// Produces the console output for a line written to a [`MockDevice`]
pub type Responder = Box<dyn FnMut(&str) -> Option<String> + Send>;

#[derive(Default)]
pub struct MockDeviceConfig {
    /// Called with each write.  If None the device never answers.
    pub responder: Option<Responder>,
}

impl fmt::Debug for MockDeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDeviceConfig")
            .field("responder", &self.responder.is_some())
            .finish()
    }
}

pub struct MockDevice {
    responder: Option<Responder>,
    written: Vec<String>,
    pending: VecDeque<u8>,
    disconnected: bool,
}

impl fmt::Debug for MockDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDevice")
            .field("written", &self.written.len())
            .field("pending", &self.pending.len())
            .field("disconnected", &self.disconnected)
            .finish()
    }
}

impl MockDevice {
    /// Creates a MockDevice which answers each write using `responder`
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(&str) -> Option<String> + Send + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            written: Vec::new(),
            pending: VecDeque::new(),
            disconnected: false,
        }
    }

    /// Creates a MockDevice which never answers
    pub fn silent() -> Self {
        Self {
            responder: None,
            written: Vec::new(),
            pending: VecDeque::new(),
            disconnected: false,
        }
    }

    /// Every write made to this device, in order, exactly as written
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Every write made to this device with line endings removed
    pub fn written_lines(&self) -> Vec<&str> {
        self.written
            .iter()
            .map(|w| w.trim_end_matches(&['\r', '\n'][..]))
            .collect()
    }

    /// Queues unsolicited console output, as if the switch had sent it
    pub fn push_output(&mut self, output: &str) {
        self.pending.extend(output.as_bytes());
    }

    /// Makes all further operations fail as if the device was unplugged
    pub fn disconnect(&mut self) {
        self.disconnected = true;
    }

    fn check_connected(&self) -> Result<(), Error> {
        if self.disconnected {
            Err(Error::Communication {
                kind: CommunicationKind::Disconnected,
            })
        } else {
            Ok(())
        }
    }
}

impl Device for MockDevice {
    type Config = MockDeviceConfig;

    fn new(config: Option<Self::Config>) -> Result<Self, Error> {
        let config = config.unwrap_or_default();
        Ok(Self {
            responder: config.responder,
            written: Vec::new(),
            pending: VecDeque::new(),
            disconnected: false,
        })
    }

    fn name(&self) -> String {
        "mock".to_string()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Error> {
        self.check_connected()?;
        let line = String::from_utf8_lossy(data).into_owned();
        trace!("MockDevice::write_all {line:?}");
        if let Some(responder) = self.responder.as_mut() {
            if let Some(output) = responder(&line) {
                self.pending.extend(output.as_bytes());
            }
        }
        self.written.push(line);
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<usize, Error> {
        self.check_connected()?;
        Ok(self.pending.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        self.check_connected()?;
        let size = buffer.len().min(self.pending.len());
        for (slot, byte) in buffer.iter_mut().zip(self.pending.drain(..size)) {
            *slot = byte;
        }
        Ok(size)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.check_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responder_output_is_readable() {
        let mut device = MockDevice::with_responder(|line| Some(format!("echo {line}")));
        device.write_all(b"show version\r\n").unwrap();

        assert_eq!(device.bytes_to_read().unwrap(), 19);
        let mut buf = [0u8; 8];
        assert_eq!(device.read(&mut buf).unwrap(), 8);
        assert_eq!(&buf, b"echo sho");
        assert_eq!(device.bytes_to_read().unwrap(), 11);
        assert_eq!(device.written_lines(), vec!["show version"]);
    }

    #[test]
    fn test_silent_device() {
        let mut device = MockDevice::new(None).unwrap();
        device.write_all(b"\r\n").unwrap();
        assert_eq!(device.bytes_to_read().unwrap(), 0);
        assert_eq!(device.written(), &["\r\n".to_string()]);
    }

    #[test]
    fn test_disconnect() {
        let mut device = MockDevice::silent();
        device.disconnect();
        assert_eq!(
            device.write_all(b"exit\r\n"),
            Err(Error::Communication {
                kind: CommunicationKind::Disconnected
            })
        );
        assert!(device.written().is_empty());
    }
}
