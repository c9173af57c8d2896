//! In-memory transport that records every call instead of reaching a host

use async_trait::async_trait;
use static_deploy::transport::{CommandOutput, RemoteSession, Result, Transport, TransportError};
use static_deploy::types::TargetHost;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect { host: String },
    Upload { host: String, local: PathBuf, remote: String },
    Run { host: String, command: String },
}

#[derive(Debug, Clone)]
enum Rule {
    RefuseConnect { host: String },
    FailUpload { host: String },
    FailCommand { host: Option<String>, needle: String, exit_code: i32 },
    RaiseOnCommand { host: Option<String>, needle: String },
    Stdout { needle: String, stdout: String },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<Call>>>,
    rules: Arc<Mutex<Vec<Rule>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Commands run on `host`, in order
    pub fn commands_for(&self, host: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Run { host: h, command } if h == host => Some(command),
                _ => None,
            })
            .collect()
    }

    pub fn refuse_connect(&self, host: &str) {
        self.push(Rule::RefuseConnect {
            host: host.to_string(),
        });
    }

    pub fn fail_upload(&self, host: &str) {
        self.push(Rule::FailUpload {
            host: host.to_string(),
        });
    }

    /// Any command containing `needle` exits with `exit_code`
    pub fn fail_command(&self, host: Option<&str>, needle: &str, exit_code: i32) {
        self.push(Rule::FailCommand {
            host: host.map(str::to_string),
            needle: needle.to_string(),
            exit_code,
        });
    }

    /// Any command containing `needle` fails in the transport itself, as a
    /// dropped connection would
    pub fn raise_on_command(&self, host: Option<&str>, needle: &str) {
        self.push(Rule::RaiseOnCommand {
            host: host.map(str::to_string),
            needle: needle.to_string(),
        });
    }

    pub fn respond(&self, needle: &str, stdout: &str) {
        self.push(Rule::Stdout {
            needle: needle.to_string(),
            stdout: stdout.to_string(),
        });
    }

    fn push(&self, rule: Rule) {
        self.rules.lock().unwrap().push(rule);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn connect(&self, host: &TargetHost) -> Result<Box<dyn RemoteSession>> {
        let name = host.display_name().to_string();
        self.record(Call::Connect { host: name.clone() });

        let refused = self.rules.lock().unwrap().iter().any(|rule| {
            matches!(rule, Rule::RefuseConnect { host } if *host == name)
        });
        if refused {
            return Err(TransportError::Spawn {
                program: "ssh".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            });
        }

        Ok(Box::new(RecordingSession {
            host: name,
            transport: self.clone(),
        }))
    }
}

struct RecordingSession {
    host: String,
    transport: RecordingTransport,
}

#[async_trait]
impl RemoteSession for RecordingSession {
    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        self.transport.record(Call::Upload {
            host: self.host.clone(),
            local: local_path.to_path_buf(),
            remote: remote_path.to_string(),
        });

        let failed = self.transport.rules.lock().unwrap().iter().any(|rule| {
            matches!(rule, Rule::FailUpload { host } if *host == self.host)
        });
        if failed {
            return Err(TransportError::Upload {
                local: local_path.display().to_string(),
                remote: remote_path.to_string(),
                reason: "lost connection".to_string(),
            });
        }
        Ok(())
    }

    async fn run(&self, command: &str) -> Result<CommandOutput> {
        self.transport.record(Call::Run {
            host: self.host.clone(),
            command: command.to_string(),
        });

        let rules = self.transport.rules.lock().unwrap().clone();
        for rule in rules {
            match rule {
                Rule::FailCommand {
                    host,
                    needle,
                    exit_code,
                } if command.contains(&needle)
                    && host.as_deref().map_or(true, |h| h == self.host) =>
                {
                    return Ok(CommandOutput {
                        success: false,
                        exit_code,
                        stdout: String::new(),
                        stderr: format!("{needle}: simulated failure\n"),
                    });
                }
                Rule::RaiseOnCommand { host, needle }
                    if command.contains(&needle)
                        && host.as_deref().map_or(true, |h| h == self.host) =>
                {
                    return Err(TransportError::Connection {
                        destination: self.host.clone(),
                        stderr: "Connection reset by peer".to_string(),
                    });
                }
                Rule::Stdout { needle, stdout } if command.contains(&needle) => {
                    return Ok(CommandOutput {
                        success: true,
                        exit_code: 0,
                        stdout,
                        stderr: String::new(),
                    });
                }
                _ => {}
            }
        }

        Ok(CommandOutput {
            success: true,
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}
