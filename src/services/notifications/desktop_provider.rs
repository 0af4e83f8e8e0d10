//! Desktop notification channel.
//!
//! Shows a notification through the platform's notifier: `notify-send` on
//! Linux and the BSDs, `osascript` on macOS. A custom program can replace
//! either and is invoked as `<program> <summary> <body>`.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::provider::{DeliveryPayload, Notifier};
use crate::error::PipelineError;

/// How a desktop notification is raised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyCommand {
    /// `notify-send <summary> <body>`
    NotifySend,
    /// `osascript -e 'display notification ...'`
    Osascript,
    /// `<program> <summary> <body>`
    Program(String),
    /// No notifier exists for this platform
    Unsupported,
}

impl NotifyCommand {
    /// The notifier for the platform this binary was built for
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Osascript
        } else if cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Self::NotifySend
        } else {
            Self::Unsupported
        }
    }

    /// Program and arguments for one notification, or `None` if unsupported
    fn invocation(&self, summary: &str, body: &str) -> Option<(String, Vec<String>)> {
        match self {
            Self::NotifySend => Some((
                "notify-send".to_string(),
                vec![summary.to_string(), body.to_string()],
            )),
            Self::Osascript => Some((
                "osascript".to_string(),
                vec![
                    "-e".to_string(),
                    format!(
                        "display notification \"{}\" with title \"{}\"",
                        escape_applescript(body),
                        escape_applescript(summary)
                    ),
                ],
            )),
            Self::Program(program) => {
                Some((program.clone(), vec![summary.to_string(), body.to_string()]))
            }
            Self::Unsupported => None,
        }
    }
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Local desktop channel. Also the fixed fallback for escalations.
#[derive(Debug, Clone)]
pub struct DesktopChannel {
    summary: String,
    command: NotifyCommand,
}

impl DesktopChannel {
    pub fn new(summary: impl Into<String>, command: NotifyCommand) -> Self {
        Self {
            summary: summary.into(),
            command,
        }
    }

    pub fn command(&self) -> &NotifyCommand {
        &self.command
    }
}

#[async_trait]
impl Notifier for DesktopChannel {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<(), PipelineError> {
        let (program, args) = self
            .command
            .invocation(&self.summary, payload.text())
            .ok_or_else(|| {
                PipelineError::delivery("Desktop notifications are not supported on this platform")
            })?;

        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                PipelineError::delivery(format!(
                    "Failed to run desktop notifier '{}': {}",
                    program, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::delivery(format!(
                "Desktop notifier '{}' exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "desktop"
    }

    fn display_name(&self) -> &'static str {
        "Desktop"
    }
}
