//! # serial-uploader
//!
//! This crate uploads a text configuration file to a network switch through
//! the switch's serial console, over an RS-232 or USB-serial adapter.  It
//! optionally logs in with a username and password first.
//!
//! ## Overview
//!
//! The serial-uploader crate is structured around two main components:
//!
//! - A high-level [`Console`] interface for console operations
//! - A lower-level [`Device`] interface for raw serial bytes
//!
//! [`Uploader`] ties these together to push a [`ConfigFile`] to a switch, and
//! the `serial-uploader` binary wraps it in a command line interface.
//!
//! ## Architecture
//!
//! ### Console Layer
//!
//! The [`Console`] struct is the primary interface most users should interact
//! with.  It provides:
//!
//! - Sending lines and reading the switch's response
//! - Waiting for prompts, such as `Username` and `Password`
//! - Logging in
//! - Backing out to the top level with `exit` and `disable`
//! - Entering configuration mode with `enable` and `configure terminal`
//!
//! Prompt patterns and timings vary between switch firmwares, so they are
//! gathered in a [`SwitchProfile`], which can be loaded from a TOML file.
//!
//! ### Device Layer
//!
//! The [`Device`] trait provides byte level access to the console:
//!
//! - [`SerialDevice`] opens a serial port at 9600 baud, 8N1 by default
//! - [`MockDevice`] is a scripted in-memory device for testing
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use serial_uploader::{ConfigFile, ConsoleBuilder, Credentials, Error, Uploader};
//!
//! fn main() -> Result<(), Error> {
//!     // Read the whole config before touching the switch
//!     let config = ConfigFile::load("switch.conf")?;
//!
//!     // Open the serial port
//!     let console = ConsoleBuilder::new().path("/dev/ttyUSB0").build()?;
//!
//!     // Log in, enter configuration mode and send every line
//!     let report = Uploader::new(console)
//!         .credentials(Credentials::new("admin", "secret"))
//!         .run(&config)?;
//!
//!     println!("Sent {} lines in {:?}", report.lines_sent, report.elapsed);
//!
//!     // No need to close the serial port, it will be closed when the
//!     // uploader goes out of scope
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The library uses a custom [`Error`] type that covers:
//!
//! - Configuration file errors (missing, unreadable)
//! - Device access errors (not found, permissions)
//! - Communication failures (IO errors, disconnects, rejected commands)
//! - Timeouts waiting for the switch
//! - Authentication failures
//!
//! [`Error::to_errno`] maps each error to an errno value, which the binary
//! uses as its exit code.
//!
//! ## Logging
//!
//! The library uses the `log` crate for diagnostic output:
//!
//! - Error: Critical failures
//! - Warn: Rejected commands, timeouts, and slow commands
//! - Info: Upload progress
//! - Debug: Console state changes
//! - Trace: Function entry and raw console traffic (passwords are masked)
//!
//! To enable logging, use [`env_logger::init`](https://docs.rs/env_logger/latest/env_logger/index.html)
//! and set the `RUST_LOG` environment variable.
//!
//! ## License
//!
//! This library is licensed under the GNU General Public License Version 3 (GPLv3).

pub mod console;
pub mod constants;
pub mod device;
pub mod error;
pub mod password;
pub mod profile;
pub mod upload;

pub use crate::console::line::{LinePlanner, LinePolicy};
pub use crate::console::{Console, ConsoleBuilder, ConsoleMode, Credentials};
pub use crate::device::*;
pub use crate::error::{
    Communication as CommunicationKind, ConfigFile as ConfigFileKind,
    DeviceAccess as DeviceAccessKind, Error,
};
pub use crate::profile::SwitchProfile;
pub use crate::upload::{upload, ConfigFile, UploadOptions, UploadReport, Uploader};

/// Use to create a Console on a serial port
pub type SerialConsole = Console<SerialDevice>;
