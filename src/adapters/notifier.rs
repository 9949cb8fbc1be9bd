//! Alert transports.
//!
//! | Notifier          | Used when      | Side effects                  |
//! |-------------------|----------------|-------------------------------|
//! | `ConsoleNotifier` | `debug = true` | log lines only                |
//! | `TwilioNotifier`  | `debug = false`| one SMS per recipient per send|
//!
//! The live notifier talks to the Twilio Messages REST endpoint through
//! `curl`, passing credentials on stdin so they never appear in the
//! process list, and decodes the JSON receipt.

use std::io::Write as _;
use std::process::{Command, Stdio};

use log::{debug, info};
use serde::Deserialize;

use crate::app::ports::Notifier;
use crate::config::TwilioConfig;
use crate::error::NotifyError;

/// Prints alerts instead of sending them.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    sent: usize,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages "sent" so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Notifier for ConsoleNotifier {
    fn send(&mut self, recipient: &str, body: &str) -> Result<(), NotifyError> {
        info!("Message sent to \"{}\":\n{}", recipient, body);
        self.sent += 1;
        Ok(())
    }
}

const API_BASE: &str = "https://api.twilio.com/2010-04-01/Accounts";
/// Upper bound for one HTTP exchange, seconds.
const REQUEST_TIMEOUT_SECS: u32 = 20;

/// Fields of a Twilio reply that matter here; success and error bodies
/// share the endpoint.
#[derive(Debug, Deserialize)]
struct TwilioReply {
    sid: Option<String>,
    message: Option<String>,
}

/// Sends alerts as SMS through Twilio.
pub struct TwilioNotifier {
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioNotifier {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from: config.messenger_number.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/Messages.json", API_BASE, self.account_sid)
    }
}

impl Notifier for TwilioNotifier {
    fn send(&mut self, recipient: &str, body: &str) -> Result<(), NotifyError> {
        let mut child = Command::new("curl")
            .args(["--silent", "--show-error", "--config", "-"])
            .args(["--max-time", &REQUEST_TIMEOUT_SECS.to_string()])
            .args(["--write-out", "\n%{http_code}"])
            .arg("--data-urlencode")
            .arg(format!("To={recipient}"))
            .arg("--data-urlencode")
            .arg(format!("From={}", self.from))
            .arg("--data-urlencode")
            .arg(format!("Body={body}"))
            .arg(self.endpoint())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|_| NotifyError::Unreachable)?;

        if let Some(mut stdin) = child.stdin.take() {
            writeln!(stdin, "user = \"{}:{}\"", self.account_sid, self.auth_token)
                .map_err(|_| NotifyError::Unreachable)?;
        }

        let output = child
            .wait_with_output()
            .map_err(|_| NotifyError::Unreachable)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let (body, status) = stdout.rsplit_once('\n').ok_or(NotifyError::Unreachable)?;
        let status: u16 = status.trim().parse().map_err(|_| NotifyError::Unreachable)?;
        if status == 0 {
            return Err(NotifyError::Unreachable);
        }

        let sid = parse_reply(status, body)?;
        debug!("Twilio accepted message {} for {}", sid, recipient);
        Ok(())
    }
}

/// Decode a Twilio reply into the message SID.
fn parse_reply(status: u16, body: &str) -> Result<String, NotifyError> {
    let reply: TwilioReply = serde_json::from_str(body).map_err(|_| NotifyError::BadResponse)?;
    if !(200..300).contains(&status) {
        return Err(NotifyError::Rejected {
            status,
            message: reply.message.unwrap_or_default(),
        });
    }
    reply.sid.ok_or(NotifyError::BadResponse)
}
