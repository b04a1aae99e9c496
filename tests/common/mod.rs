use serial_uploader::{MockDevice, SwitchProfile};
use std::sync::{Arc, Mutex};

/// Where the simulated switch console is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    Username,
    Password,
    User,
    EnablePassword,
    Privileged,
    Config,
}

/// A minimal simulated switch console, answering lines the way a
/// Cisco-style console does
#[derive(Debug)]
pub struct Switch {
    pub state: State,
    pub login: Option<(String, String)>,
    pub enable_secret: Option<String>,
    /// Config lines accepted while in configuration mode
    pub applied: Vec<String>,
}

impl Switch {
    /// A switch which needs no login
    pub fn open() -> Self {
        Switch {
            state: State::User,
            login: None,
            enable_secret: None,
            applied: Vec::new(),
        }
    }

    /// A switch sitting at its username prompt
    pub fn with_login(user: &str, password: &str) -> Self {
        Switch {
            state: State::Username,
            login: Some((user.to_string(), password.to_string())),
            enable_secret: None,
            applied: Vec::new(),
        }
    }

    fn logged_out(&self) -> State {
        if self.login.is_some() {
            State::Username
        } else {
            State::User
        }
    }

    fn prompt(&self) -> &'static str {
        match self.state {
            State::Username => "\r\nUsername: ",
            State::Password | State::EnablePassword => "\r\nPassword: ",
            State::User => "\r\nswitch>",
            State::Privileged => "\r\nswitch#",
            State::Config => "\r\nswitch(config)#",
        }
    }

    pub fn respond(&mut self, written: &str) -> Option<String> {
        let cmd = written.trim();
        let mut output = String::new();

        match self.state {
            State::Username => {
                if !cmd.is_empty() {
                    self.state = State::Password;
                }
            }
            State::Password => {
                let accepted = self
                    .login
                    .as_ref()
                    .is_some_and(|(_, password)| password == cmd);
                if accepted {
                    self.state = State::User;
                } else {
                    output.push_str("\r\n% Authentication failed");
                    self.state = State::Username;
                }
            }
            State::User => match cmd {
                "" | "disable" => {}
                "exit" => self.state = self.logged_out(),
                "enable" => {
                    self.state = if self.enable_secret.is_some() {
                        State::EnablePassword
                    } else {
                        State::Privileged
                    }
                }
                _ => output.push_str("\r\n% Invalid input detected at '^' marker."),
            },
            State::EnablePassword => {
                if self.enable_secret.as_deref() == Some(cmd) {
                    self.state = State::Privileged;
                } else {
                    output.push_str("\r\n% Authentication failed");
                    self.state = State::User;
                }
            }
            State::Privileged => match cmd {
                "" => {}
                "disable" => self.state = State::User,
                "exit" => self.state = self.logged_out(),
                "configure terminal" => self.state = State::Config,
                _ => output.push_str("\r\n% Invalid input detected at '^' marker."),
            },
            State::Config => match cmd {
                "" => {}
                "end" | "exit" => self.state = State::Privileged,
                _ if cmd.starts_with("bogus") || cmd == "y" => {
                    output.push_str("\r\n% Invalid input detected at '^' marker.")
                }
                _ => self.applied.push(cmd.to_string()),
            },
        }

        output.push_str(self.prompt());
        Some(output)
    }
}

/// Wraps a [`Switch`] in a [`MockDevice`], returning a handle to inspect it
pub fn mock_switch(switch: Switch) -> (MockDevice, Arc<Mutex<Switch>>) {
    let switch = Arc::new(Mutex::new(switch));
    let handle = switch.clone();
    let device = MockDevice::with_responder(move |line| switch.lock().unwrap().respond(line));
    (device, handle)
}

/// Default profile with no waiting between polls
pub fn quick_profile() -> SwitchProfile {
    SwitchProfile {
        poll_interval_ms: 0,
        long_command_wait_ms: 0,
        response_tries: 5,
        long_command_tries: 10,
        prompt_tries: 5,
        ..Default::default()
    }
}
