//! Error objects for the serial-uploader crate
use libc::{EACCES, EINVAL, EIO, ENODEV, ENOENT, EPERM, ETIMEDOUT};
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the serial-uploader crate
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Invalid arguments passed to the library or on the command line
    #[error("Invalid arguments: {message}")]
    Args { message: String },

    /// Problems reading the configuration file to upload
    #[error("Configuration file {}: {kind}", path.display())]
    ConfigFile { path: PathBuf, kind: ConfigFile },

    /// DeviceAccess holds a variety of errors relating to opening the serial
    /// device
    #[error("{kind}")]
    DeviceAccess { kind: DeviceAccess },

    /// Failure in communicating with the switch
    #[error("Serial communication error: {kind}")]
    Communication { kind: Communication },

    /// The switch did not answer in time
    #[error("Timed out waiting for {waiting_for} after {tries} tries")]
    Timeout { waiting_for: String, tries: u32 },

    /// Failure logging in to the switch
    #[error("Authentication error: {message}")]
    Auth { message: String },
}

/// Used to differentiate between different problems reading the
/// configuration file
#[derive(Debug, Error, PartialEq)]
pub enum ConfigFile {
    #[error("file not found")]
    NotFound,

    #[error("permission denied")]
    Permission,

    #[error("failed to read: {message}")]
    Read { message: String },
}

/// Used to differentiate between different types of problems accessing the
/// serial device
#[derive(Debug, Error, PartialEq)]
pub enum DeviceAccess {
    #[error("Serial device {} not found - is it connected?", path.display())]
    NotFound { path: PathBuf },

    #[error("Hit permissions error while opening serial device {}.  Are you sure you have suitable permissions?  You may need to add yourself to the dialout group.", path.display())]
    Permission { path: PathBuf },

    #[error("Failed to open serial device {}: {message}", path.display())]
    Open { path: PathBuf, message: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum Communication {
    /// Hit an IO error reading or writing the serial device
    #[error("IO error: {message}")]
    Io { message: String },

    /// The serial device went away
    #[error("Serial device disconnected")]
    Disconnected,

    /// The switch reported an error in response to a line
    #[error("Error while sending line:\n{line}\n\nGot result:\n{response}")]
    CommandRejected { line: String, response: String },
}

impl Error {
    /// Returns the errno equivalent of this error, used as the process exit
    /// code
    pub fn to_errno(&self) -> i32 {
        match self {
            Error::Args { .. } => EINVAL,
            Error::ConfigFile { kind, .. } => match kind {
                ConfigFile::NotFound => ENOENT,
                ConfigFile::Permission => EACCES,
                ConfigFile::Read { .. } => EIO,
            },
            Error::DeviceAccess { kind } => match kind {
                DeviceAccess::NotFound { .. } => ENOENT,
                DeviceAccess::Permission { .. } => EACCES,
                DeviceAccess::Open { .. } => ENODEV,
            },
            Error::Communication { .. } => EIO,
            Error::Timeout { .. } => ETIMEDOUT,
            Error::Auth { .. } => EPERM,
        }
    }

    /// Builds a [`Error::ConfigFile`] from an IO error hit reading `path`
    pub fn config_file(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::NotFound => ConfigFile::NotFound,
            ErrorKind::PermissionDenied => ConfigFile::Permission,
            _ => ConfigFile::Read {
                message: err.to_string(),
            },
        };
        Error::ConfigFile {
            path: path.into(),
            kind,
        }
    }

    /// Builds a [`Error::DeviceAccess`] from a serialport error hit opening
    /// `path`
    pub fn device_access(path: impl Into<PathBuf>, err: &serialport::Error) -> Self {
        let path = path.into();
        let kind = match err.kind() {
            serialport::ErrorKind::NoDevice => DeviceAccess::NotFound { path },
            serialport::ErrorKind::Io(ErrorKind::NotFound) => DeviceAccess::NotFound { path },
            serialport::ErrorKind::Io(ErrorKind::PermissionDenied) => {
                DeviceAccess::Permission { path }
            }
            _ => DeviceAccess::Open {
                path,
                message: err.to_string(),
            },
        };
        Error::DeviceAccess { kind }
    }
}

// Map std::io::Error to Error, for errors hit once the device is open
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::BrokenPipe | ErrorKind::NotConnected | ErrorKind::UnexpectedEof => {
                Communication::Disconnected
            }
            _ => Communication::Io {
                message: err.to_string(),
            },
        };
        Self::Communication { kind }
    }
}

// Map serialport::Error to Error, for errors hit once the device is open
impl From<serialport::Error> for Error {
    fn from(err: serialport::Error) -> Self {
        let kind = match err.kind() {
            serialport::ErrorKind::NoDevice => Communication::Disconnected,
            _ => Communication::Io {
                message: err.to_string(),
            },
        };
        Self::Communication { kind }
    }
}

// Map Communication to Error
impl From<Communication> for Error {
    fn from(kind: Communication) -> Self {
        Self::Communication { kind }
    }
}

// Map DeviceAccess to Error
impl From<DeviceAccess> for Error {
    fn from(kind: DeviceAccess) -> Self {
        Self::DeviceAccess { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        let err = Error::config_file(
            "/nonexistent",
            &std::io::Error::from(ErrorKind::NotFound),
        );
        assert_eq!(err.to_errno(), ENOENT);

        let err = Error::config_file(
            "/root/secret",
            &std::io::Error::from(ErrorKind::PermissionDenied),
        );
        assert_eq!(err.to_errno(), EACCES);

        let err = Error::Timeout {
            waiting_for: "Username".to_string(),
            tries: 10,
        };
        assert_eq!(err.to_errno(), ETIMEDOUT);

        let err = Error::Auth {
            message: "no password".to_string(),
        };
        assert_eq!(err.to_errno(), EPERM);
    }

    #[test]
    fn test_device_access_from_serialport() {
        let err = serialport::Error::new(
            serialport::ErrorKind::Io(ErrorKind::PermissionDenied),
            "Permission denied",
        );
        let err = Error::device_access("/dev/ttyUSB0", &err);
        assert!(matches!(
            err,
            Error::DeviceAccess {
                kind: DeviceAccess::Permission { .. }
            }
        ));
        assert_eq!(err.to_errno(), EACCES);

        let err = serialport::Error::new(serialport::ErrorKind::NoDevice, "gone");
        let err = Error::device_access("/dev/ttyUSB9", &err);
        assert_eq!(
            err,
            Error::DeviceAccess {
                kind: DeviceAccess::NotFound {
                    path: PathBuf::from("/dev/ttyUSB9")
                }
            }
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: Error = std::io::Error::from(ErrorKind::BrokenPipe).into();
        assert_eq!(
            err,
            Error::Communication {
                kind: Communication::Disconnected
            }
        );
    }
}
