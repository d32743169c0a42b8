//! Delivery through a sendmail-compatible program.
//!
//! The message is written to the program's stdin as a plain RFC 5322
//! document, so anything that accepts `sendmail -t` input works
//! (sendmail, msmtp, ssmtp, ...).

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{WorkdayError, WorkdayResult};
use crate::notify::Message;

#[derive(Debug, Clone)]
pub struct Sendmail {
    program: String,
    args: Vec<String>,
    from: Option<String>,
    timeout: Duration,
}

impl Sendmail {
    /// `command` is split on whitespace into a program and its arguments.
    pub fn new(command: &str, from: Option<String>, timeout: Duration) -> Self {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next().unwrap_or_default();
        Sendmail {
            program,
            args: parts.collect(),
            from,
            timeout,
        }
    }

    fn program_path(&self) -> WorkdayResult<std::path::PathBuf> {
        which::which(&self.program)
            .map_err(|_| WorkdayError::NotifierNotInstalled(self.program.clone()))
    }

    pub async fn send(&self, message: &Message) -> WorkdayResult<()> {
        timeout(self.timeout, self.deliver(message))
            .await
            .map_err(|_| WorkdayError::NotifierTimeout(self.timeout.as_secs()))?
    }

    async fn deliver(&self, message: &Message) -> WorkdayResult<()> {
        let program_path = self.program_path()?;

        let mut child = Command::new(&program_path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                WorkdayError::Notification(format!(
                    "Failed to spawn {}: {}",
                    program_path.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| WorkdayError::Notification("mailer stdin unavailable".into()))?;
        // Exit status takes precedence over a broken pipe.
        let written = stdin.write_all(self.render(message).as_bytes()).await;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WorkdayError::Notification(format!(
                "{} exited with status {}: {}",
                self.program,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        written?;
        Ok(())
    }

    fn render(&self, message: &Message) -> String {
        let mut out = String::new();
        if let Some(from) = &self.from {
            out.push_str(&format!("From: {}\n", header_value(from)));
        }
        out.push_str(&format!("To: {}\n", header_value(&message.to)));
        out.push_str(&format!("Subject: {}\n", header_value(&message.subject)));
        out.push_str("MIME-Version: 1.0\n");
        out.push_str("Content-Type: text/html; charset=utf-8\n");
        out.push('\n');
        out.push_str(&message.html);
        out
    }
}

/// Header values must stay on one line.
fn header_value(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_message() -> Message {
        Message {
            to: "robin@example.com".to_string(),
            subject: "Hello".to_string(),
            html: "<p>hi</p>".to_string(),
        }
    }

    #[test]
    fn test_command_is_split_into_program_and_args() {
        let sendmail = Sendmail::new("sendmail -t -i", None, Duration::from_secs(5));
        assert_eq!(sendmail.program, "sendmail");
        assert_eq!(sendmail.args, vec!["-t", "-i"]);
    }

    #[test]
    fn test_render_headers() {
        let sendmail = Sendmail::new(
            "sendmail -t",
            Some("club@example.com".to_string()),
            Duration::from_secs(5),
        );
        let rendered = sendmail.render(&make_message());

        assert!(rendered.starts_with("From: club@example.com\nTo: robin@example.com\n"));
        assert!(rendered.contains("Subject: Hello\n"));
        assert!(rendered.contains("Content-Type: text/html; charset=utf-8\n\n<p>hi</p>"));
    }

    #[test]
    fn test_header_injection_is_flattened() {
        let sendmail = Sendmail::new("sendmail -t", None, Duration::from_secs(5));
        let mut message = make_message();
        message.subject = "Hi\nBcc: everyone@example.com".to_string();

        let rendered = sendmail.render(&message);
        assert!(rendered.contains("Subject: Hi Bcc: everyone@example.com\n"));
        assert!(!rendered.contains("\nBcc:"));
    }

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let sendmail = Sendmail::new("workday-no-such-mailer-binary", None, Duration::from_secs(1));
        let err = sendmail.send(&make_message()).await.unwrap_err();
        assert!(matches!(err, WorkdayError::NotifierNotInstalled(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_delivers_through_program_stdin() {
        // `cat` accepts stdin and exits zero, standing in for a mailer.
        let sendmail = Sendmail::new("cat", None, Duration::from_secs(5));
        sendmail.send(&make_message()).await.unwrap();

        let failing = Sendmail::new("false", None, Duration::from_secs(5));
        let err = failing.send(&make_message()).await.unwrap_err();
        assert!(matches!(err, WorkdayError::Notification(_)));
    }
}
