//! Per-line send options

use crate::SwitchProfile;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::fmt;
use std::time::Duration;

/// How [`crate::Console::send_line`] sends a line and treats the response.
///
/// Build one with [`LinePolicy::new`] and the chaining modifiers, or let a
/// [`LinePlanner`] derive one from the content of a configuration line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePolicy {
    /// Whether to wait for and return the console's response
    pub wait: bool,
    /// Whether a response containing the command error marker is accepted
    pub allow_fail: bool,
    /// Number of polls to wait for a response
    pub tries: u32,
    /// Wait before starting to poll for the response
    pub extra_wait: Duration,
    /// Send the line exactly as given, without trimming or adding `\r\n`
    pub raw: bool,
    /// Keep the line contents out of the logs
    pub secret: bool,
}

impl LinePolicy {
    #[must_use]
    pub fn new(tries: u32) -> Self {
        LinePolicy {
            wait: true,
            allow_fail: false,
            tries,
            extra_wait: Duration::ZERO,
            raw: false,
            secret: false,
        }
    }

    #[must_use]
    pub fn no_wait(mut self) -> Self {
        self.wait = false;
        self
    }

    #[must_use]
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    #[must_use]
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    #[must_use]
    pub fn extra_wait(mut self, extra_wait: Duration) -> Self {
        self.extra_wait = extra_wait;
        self
    }
}

impl fmt::Display for LinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.wait {
            return write!(f, "no wait");
        }
        write!(f, "{} tries", self.tries)?;
        if self.allow_fail {
            write!(f, ", failure allowed")?;
        }
        if !self.extra_wait.is_zero() {
            write!(f, ", extra wait {:?}", self.extra_wait)?;
        }
        Ok(())
    }
}

/// Derives the [`LinePolicy`] for each line of a configuration file.
///
/// Long running commands get an extra wait before their response is read,
/// and the line after them gets a larger retry budget, as the switch may
/// still be busy when it arrives.  Lines the profile tolerates may be
/// rejected by the switch.
#[derive(Debug)]
pub struct LinePlanner<'a> {
    profile: &'a SwitchProfile,
    next_tries: u32,
}

impl<'a> LinePlanner<'a> {
    pub fn new(profile: &'a SwitchProfile) -> Self {
        LinePlanner {
            profile,
            next_tries: profile.response_tries,
        }
    }

    /// Returns the policy for `line`, which must be the next line to be sent
    pub fn plan(&mut self, line: &str) -> LinePolicy {
        let line = line.trim();
        let mut policy = LinePolicy::new(self.next_tries);

        if self.profile.is_tolerated(line) {
            policy = policy.allow_fail();
        }

        if self.profile.is_long_command(line) {
            trace!("Long running command: {line}");
            policy = policy.extra_wait(self.profile.long_command_wait());
            self.next_tries = self.profile.long_command_tries;
        } else {
            self.next_tries = self.profile.response_tries;
        }

        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines() {
        let profile = SwitchProfile::default();
        let mut planner = LinePlanner::new(&profile);
        assert_eq!(planner.plan("hostname core-sw1"), LinePolicy::new(100));
        assert_eq!(planner.plan("  vlan 10  "), LinePolicy::new(100));
    }

    #[test]
    fn test_tolerated_lines() {
        let profile = SwitchProfile::default();
        let mut planner = LinePlanner::new(&profile);
        assert!(planner.plan("y").allow_fail);
        assert!(planner.plan("define interface-range access gi1/0/1-24").allow_fail);
        assert!(!planner.plan("yes").allow_fail);
    }

    #[test]
    fn test_long_command_raises_next_tries() {
        let profile = SwitchProfile::default();
        let mut planner = LinePlanner::new(&profile);

        let policy = planner.plan("crypto key generate rsa modulus 2048");
        assert_eq!(policy.tries, 100);
        assert_eq!(policy.extra_wait, Duration::from_secs(2));

        let policy = planner.plan("ip ssh version 2");
        assert_eq!(policy.tries, 5000);
        assert_eq!(policy.extra_wait, Duration::ZERO);

        let policy = planner.plan("line vty 0 4");
        assert_eq!(policy.tries, 100);
    }

    #[test]
    fn test_display() {
        assert_eq!(LinePolicy::new(10).no_wait().to_string(), "no wait");
        assert_eq!(
            LinePolicy::new(10).allow_fail().to_string(),
            "10 tries, failure allowed"
        );
    }
}
