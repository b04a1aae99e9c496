//! Reads the switch password from the controlling terminal without echoing
//! it.
use crate::Error;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::io::{BufRead, Write};

/// Prompts for a password on the controlling terminal, with echo disabled.
///
/// # Returns
/// * `Ok(String)` - the password, without its line ending
/// * `Err(Error)` - [`Error::Auth`] if there is no terminal, input ended, or
///   the password is empty
pub fn prompt_password(prompt: &str) -> Result<String, Error> {
    imp::prompt_password(prompt)
}

/// Reads a password line from `reader`.
///
/// An empty password, or no input at all, is an [`Error::Auth`].
pub fn read_password<R: BufRead>(reader: &mut R) -> Result<String, Error> {
    let mut line = String::new();
    let size = reader.read_line(&mut line).map_err(|e| Error::Auth {
        message: format!("failed to read password: {e}"),
    })?;
    if size == 0 {
        return Err(Error::Auth {
            message: "no password entered".to_string(),
        });
    }

    let password = line.trim_end_matches(&['\r', '\n'][..]);
    if password.is_empty() {
        return Err(Error::Auth {
            message: "no password entered".to_string(),
        });
    }
    Ok(password.to_string())
}

/// Writes the prompt to `out` and flushes it, so it shows before input is
/// read
fn write_prompt<W: Write>(out: &mut W, prompt: &str) -> Result<(), Error> {
    out.write_all(prompt.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| Error::Auth {
            message: format!("failed to write password prompt: {e}"),
        })
}

#[cfg(unix)]
mod imp {
    use super::{read_password, write_prompt};
    use crate::Error;

    #[allow(unused_imports)]
    use log::{debug, error, info, trace, warn};
    use nix::sys::termios::{self, LocalFlags, SetArg, Termios};
    use std::fs::{File, OpenOptions};
    use std::io::BufReader;

    const TTY_PATH: &str = "/dev/tty";

    /// Restores the terminal settings when dropped, so echo comes back even
    /// if reading the password fails
    struct EchoGuard<'a> {
        tty: &'a File,
        original: Termios,
    }

    impl<'a> EchoGuard<'a> {
        fn disable(tty: &'a File) -> Result<Self, Error> {
            let original = termios::tcgetattr(tty).map_err(|e| Error::Auth {
                message: format!("failed to read terminal settings: {e}"),
            })?;
            let mut silent = original.clone();
            silent.local_flags.remove(LocalFlags::ECHO);
            silent.local_flags.insert(LocalFlags::ECHONL);
            termios::tcsetattr(tty, SetArg::TCSANOW, &silent).map_err(|e| Error::Auth {
                message: format!("failed to disable terminal echo: {e}"),
            })?;
            Ok(EchoGuard { tty, original })
        }
    }

    impl Drop for EchoGuard<'_> {
        fn drop(&mut self) {
            trace!("EchoGuard::drop");
            let _ = termios::tcsetattr(self.tty, SetArg::TCSANOW, &self.original);
        }
    }

    pub(super) fn prompt_password(prompt: &str) -> Result<String, Error> {
        let mut tty = OpenOptions::new()
            .read(true)
            .write(true)
            .open(TTY_PATH)
            .map_err(|e| Error::Auth {
                message: format!("can't prompt for a password without a terminal: {e}"),
            })?;

        write_prompt(&mut tty, prompt)?;

        let _guard = EchoGuard::disable(&tty)?;
        let mut reader = BufReader::new(&tty);
        read_password(&mut reader)
    }
}

#[cfg(not(unix))]
mod imp {
    use super::{read_password, write_prompt};
    use crate::Error;

    #[allow(unused_imports)]
    use log::{debug, error, info, trace, warn};

    pub(super) fn prompt_password(prompt: &str) -> Result<String, Error> {
        warn!("Password input will be echoed on this platform");
        write_prompt(&mut std::io::stdout(), prompt)?;
        read_password(&mut std::io::stdin().lock())
    }
}
