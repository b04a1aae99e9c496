//! Constants used when talking to a switch's serial console
use std::time::Duration;

/// Serial port settings

/// Default serial device path
pub const DEFAULT_SERIAL_DEVICE: &str = "/dev/ttyUSB0";
/// Baud rate used by most switch consoles out of the box
pub const DEFAULT_BAUD_RATE: u32 = 9600;
/// Used to bound individual reads and writes on the serial port
pub const DEFAULT_PORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Line handling

/// Terminator appended to every line sent to the console
pub const LINE_ENDING: &str = "\r\n";
/// Terminator used when sending the username, which some firmwares treat
/// differently from a full line ending
pub const RAW_LINE_ENDING: &str = "\n";

/// Timings

/// Used to wait between polls of the serial port for response bytes
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Used to wait between configuration lines.  Zero as most switches buffer
/// the console input well enough
pub const DEFAULT_LINE_DELAY: Duration = Duration::from_millis(0);
/// Extra wait before reading the response to a long running command
pub const DEFAULT_LONG_COMMAND_WAIT: Duration = Duration::from_secs(2);

/// Retry budgets

/// Number of polls to wait for a response to a line
pub const DEFAULT_RESPONSE_TRIES: u32 = 100;
/// Number of polls to wait for a response to a line following a long
/// running command
pub const DEFAULT_LONG_COMMAND_TRIES: u32 = 5000;
/// Number of polls to wait for a response when probing for a prompt
pub const PROMPT_PROBE_TRIES: u32 = 10;
/// Number of times to probe for a prompt before giving up
pub const DEFAULT_PROMPT_TRIES: u32 = 10;

/// Console markers

/// Text in the console output when asking for a username
pub const USERNAME_PROMPT: &str = "Username";
/// Text in the console output when asking for a password
pub const PASSWORD_PROMPT: &str = "Password";
/// Text in the console output when the credentials were rejected
pub const AUTH_FAILED_MARKER: &str = "Authentication failed";
/// Text (matched case-insensitively) in the console output when a command
/// was rejected
pub const COMMAND_ERROR_MARKER: &str = "invalid";
/// Configuration command which can take a long time to complete
pub const LONG_COMMAND_MARKER: &str = "crypto key generate";

/// Console commands

/// Leaves the current console context
pub const CMD_EXIT: &str = "exit";
/// Leaves privileged mode
pub const CMD_DISABLE: &str = "disable";
/// Enters privileged mode
pub const CMD_ENABLE: &str = "enable";
/// Enters configuration mode from privileged mode
pub const CMD_CONFIGURE_TERMINAL: &str = "configure terminal";

/// Number of `exit` commands sent to get back to the top level
pub const RESET_EXIT_COUNT: usize = 6;
/// Number of `disable` commands sent to drop privileges
pub const RESET_DISABLE_COUNT: usize = 4;
