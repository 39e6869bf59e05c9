//! Outlook automation through a PowerShell host.
//!
//! Outlook exposes its object model over COM. Rather than binding COM
//! directly, each draft gets a short-lived PowerShell child that holds the
//! `Outlook.Application` and `MailItem` objects and answers one line per
//! request on stdout:
//!
//! | request (stdin)    | reply (stdout) |
//! |--------------------|----------------|
//! | *(spawn)*          | `CONNECTED`    |
//! | draft as JSON      | `COMPOSED`     |
//! | `display`          | `DISPLAYED`    |
//! | `discard`          | `DISCARDED`    |
//!
//! Any failure is reported as `ERR <message>` and ends the host. The child
//! is spawned with `kill_on_drop`, so dropping a session never leaves an
//! automation host behind.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, trace};

use super::{Draft, MailBackend, MailError, Step};
use crate::config::MailSettings;

const BRIDGE_SCRIPT: &str = r#"
$ErrorActionPreference = 'Stop';
function Fail($code) { [Console]::Out.WriteLine('ERR ' + $_.Exception.Message); exit $code };
try { $outlook = New-Object -ComObject Outlook.Application } catch { Fail 1 };
[Console]::Out.WriteLine('CONNECTED');
$line = [Console]::In.ReadLine();
if ($null -eq $line) { exit 0 };
try {
  $draft = ConvertFrom-Json $line;
  $mail = $outlook.CreateItem(0);
  $mail.To = $draft.to;
  $mail.Subject = $draft.subject;
  $mail.Body = $draft.body;
} catch { Fail 2 };
[Console]::Out.WriteLine('COMPOSED');
if ([Console]::In.ReadLine() -ne 'display') { exit 0 };
try { $mail.Display($false) } catch { Fail 3 };
[Console]::Out.WriteLine('DISPLAYED');
if ([Console]::In.ReadLine() -ne 'discard') { exit 0 };
try { $mail.GetInspector.Close(1) } catch { Fail 4 };
[Console]::Out.WriteLine('DISCARDED');
"#;

/// Live pipes to one automation host.
struct BridgeSession {
    child: Child,
    stdin: ChildStdin,
    replies: Lines<BufReader<ChildStdout>>,
}

/// [`MailBackend`] that drives Outlook via a PowerShell host process.
pub struct OutlookBridge {
    program: String,
    args: Vec<String>,
    reply_timeout: Duration,
    session: Option<BridgeSession>,
}

impl OutlookBridge {
    pub fn new(settings: &MailSettings) -> Self {
        let args = [
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            BRIDGE_SCRIPT,
        ]
        .iter()
        .map(|a| (*a).to_string())
        .collect();
        Self::with_host(
            settings.powershell.clone(),
            args,
            Duration::from_secs(settings.reply_timeout_secs),
        )
    }

    /// Use an arbitrary host program that speaks the bridge protocol.
    pub fn with_host(program: String, args: Vec<String>, reply_timeout: Duration) -> Self {
        Self {
            program,
            args,
            reply_timeout,
            session: None,
        }
    }

    fn session(&mut self, step: Step) -> Result<&mut BridgeSession, MailError> {
        self.session.as_mut().ok_or(MailError::NotConnected { step })
    }

    async fn send(&mut self, step: Step, line: &str) -> Result<(), MailError> {
        let session = self.session(step)?;
        trace!(target: "ghostwriter::mail", %step, bytes = line.len(), "Bridge request");
        let io = |source| MailError::Io { step, source };
        session.stdin.write_all(line.as_bytes()).await.map_err(io)?;
        session.stdin.write_all(b"\n").await.map_err(io)?;
        session.stdin.flush().await.map_err(io)
    }

    /// Send one request and wait for its reply. Any failure ends the
    /// session, which kills the host.
    async fn request(&mut self, step: Step, line: &str, want: &str) -> Result<(), MailError> {
        let result = match self.send(step, line).await {
            Ok(()) => self.expect(step, want).await,
            Err(err) => Err(err),
        };
        if result.is_err() {
            self.session = None;
        }
        result
    }

    async fn expect(&mut self, step: Step, want: &str) -> Result<(), MailError> {
        let timeout = self.reply_timeout;
        let session = self.session(step)?;
        loop {
            let line = tokio::time::timeout(timeout, session.replies.next_line())
                .await
                .map_err(|_| MailError::Timeout { step })?
                .map_err(|source| MailError::Io { step, source })?
                .ok_or(MailError::BridgeClosed { step })?;
            let reply = line.trim();
            if reply.is_empty() {
                continue;
            }
            trace!(target: "ghostwriter::mail", %step, %reply, "Bridge reply");
            if reply == want {
                return Ok(());
            }
            return Err(match reply.strip_prefix("ERR") {
                Some(message) if step == Step::Connect => {
                    MailError::Unavailable(message.trim().to_string())
                }
                Some(message) => MailError::Automation {
                    step,
                    message: message.trim().to_string(),
                },
                None => MailError::UnexpectedReply {
                    step,
                    reply: reply.to_string(),
                },
            });
        }
    }
}

impl MailBackend for OutlookBridge {
    fn name(&self) -> &'static str {
        "outlook"
    }

    async fn connect(&mut self) -> Result<(), MailError> {
        // A previous session that never reached discard is killed here.
        self.session = None;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| MailError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let closed = MailError::BridgeClosed { step: Step::Connect };
        let stdin = child.stdin.take().ok_or(closed)?;
        let stdout = child
            .stdout
            .take()
            .ok_or(MailError::BridgeClosed { step: Step::Connect })?;
        debug!(target: "ghostwriter::mail", program = %self.program, pid = ?child.id(), "Automation host started");

        self.session = Some(BridgeSession {
            child,
            stdin,
            replies: BufReader::new(stdout).lines(),
        });
        let connected = self.expect(Step::Connect, "CONNECTED").await;
        if connected.is_err() {
            self.session = None;
        }
        connected
    }

    async fn compose(&mut self, draft: &Draft) -> Result<(), MailError> {
        let payload = serde_json::to_string(draft)?;
        self.request(Step::Compose, &payload, "COMPOSED").await
    }

    async fn display(&mut self) -> Result<(), MailError> {
        self.request(Step::Display, "display", "DISPLAYED").await
    }

    async fn discard(&mut self) -> Result<(), MailError> {
        self.request(Step::Discard, "discard", "DISCARDED").await?;
        if let Some(mut session) = self.session.take() {
            drop(session.stdin);
            match tokio::time::timeout(self.reply_timeout, session.child.wait()).await {
                Ok(Ok(status)) => {
                    debug!(target: "ghostwriter::mail", %status, "Automation host exited")
                }
                Ok(Err(err)) => {
                    debug!(target: "ghostwriter::mail", error = %err, "Waiting on automation host failed")
                }
                Err(_) => debug!(target: "ghostwriter::mail", "Automation host lingering; killing"),
            }
        }
        Ok(())
    }
}
