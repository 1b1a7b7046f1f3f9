//! Capability interface between the controller and its environment.
//!
//! The controller never touches a terminal, a process or a channel directly;
//! everything outward goes through [`Host`], and everything inward arrives as
//! an [`InboundMessage`] that must pass the origin check in [`parse_inbound`].

use crate::dispatch::PlaybackCommand;
use crate::embed::EmbedSpec;
use crate::error::{MoodError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub trait Host {
    /// Create the player surface for `spec`. Completion is reported later
    /// through an inbound message.
    fn mount_embed(&mut self, spec: &EmbedSpec) -> Result<()>;

    fn teardown_embed(&mut self, spec: &EmbedSpec);

    /// One-way post toward the embed. `Ok` means handed to the channel, not
    /// delivered or executed.
    fn post_command(&mut self, generation: u64, command: PlaybackCommand) -> Result<()>;

    /// Open a plain link in a new browsing context (browser tab/window).
    fn open_link(&mut self, url: &str) -> std::io::Result<()>;

    /// Short user-facing confirmation (share message, etc).
    fn notify(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    #[default]
    Load,
    Probe,
}

/// Wire payload of messages coming back from the embed boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum EmbedPayload {
    Ready {
        generation: u64,
    },
    Error {
        generation: u64,
        #[serde(default)]
        kind: ErrorKind,
        #[serde(default)]
        message: String,
    },
}

impl EmbedPayload {
    pub fn to_json(&self) -> String {
        // Plain enum of integers and strings; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub origin: String,
    pub payload: String,
}

impl InboundMessage {
    pub fn new(origin: impl Into<String>, payload: &EmbedPayload) -> Self {
        Self {
            origin: origin.into(),
            payload: payload.to_json(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedEvent {
    Ready { generation: u64 },
    Failed { generation: u64, error: MoodError },
}

/// Returns `None` for foreign origins and malformed payloads.
pub fn parse_inbound(message: &InboundMessage, trusted_origin: &str) -> Option<EmbedEvent> {
    if message.origin != trusted_origin {
        debug!(origin = %message.origin, "ignoring message from untrusted origin");
        return None;
    }

    let payload: EmbedPayload = match serde_json::from_str(&message.payload) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "ignoring malformed embed message");
            return None;
        }
    };

    Some(match payload {
        EmbedPayload::Ready { generation } => EmbedEvent::Ready { generation },
        EmbedPayload::Error {
            generation,
            kind,
            message,
        } => EmbedEvent::Failed {
            generation,
            error: match kind {
                ErrorKind::Load => MoodError::EmbedLoad(message),
                ErrorKind::Probe => MoodError::CapabilityProbe(message),
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://open.spotify.com";

    #[test]
    fn test_parse_ready_and_error() {
        let ready = InboundMessage::new(ORIGIN, &EmbedPayload::Ready { generation: 4 });
        assert_eq!(
            parse_inbound(&ready, ORIGIN),
            Some(EmbedEvent::Ready { generation: 4 })
        );

        let probe = InboundMessage {
            origin: ORIGIN.to_string(),
            payload: r#"{"event":"error","generation":2,"kind":"probe","message":"no drm"}"#
                .to_string(),
        };
        assert_eq!(
            parse_inbound(&probe, ORIGIN),
            Some(EmbedEvent::Failed {
                generation: 2,
                error: MoodError::CapabilityProbe("no drm".to_string()),
            })
        );

        // kind defaults to load
        let bare = InboundMessage {
            origin: ORIGIN.to_string(),
            payload: r#"{"event":"error","generation":1}"#.to_string(),
        };
        assert!(matches!(
            parse_inbound(&bare, ORIGIN),
            Some(EmbedEvent::Failed {
                error: MoodError::EmbedLoad(_),
                ..
            })
        ));
    }

    #[test]
    fn test_foreign_origin_ignored() {
        let msg = InboundMessage::new(
            "https://evil.example",
            &EmbedPayload::Ready { generation: 1 },
        );
        assert_eq!(parse_inbound(&msg, ORIGIN), None);
    }

    #[test]
    fn test_malformed_ignored() {
        for payload in ["", "ready", r#"{"event":"ready"}"#, r#"{"event":"play","generation":1}"#] {
            let msg = InboundMessage {
                origin: ORIGIN.to_string(),
                payload: payload.to_string(),
            };
            assert_eq!(parse_inbound(&msg, ORIGIN), None, "payload: {payload}");
        }
    }
}
