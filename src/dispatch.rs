use crate::embed::{EmbedManager, EmbedState};
use crate::error::MoodError;
use crate::host::Host;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackCommand {
    Play,
    Pause,
    Next,
    Previous,
}

impl PlaybackCommand {
    /// Command string posted across the boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackCommand::Play => "play",
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Next => "next",
            PlaybackCommand::Previous => "previous",
        }
    }
}

impl fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proof that a command left for the embed. Says nothing about execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    pub command: PlaybackCommand,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched(Dispatched),
    /// Embed unusable; the fallback link was opened instead.
    OpenedFallback(String),
    /// Embed unusable and the fallback link could not be opened either.
    FallbackNotOpened(String),
    /// No embed yet, or still loading. Nothing was sent.
    NotReady,
    /// Posting failed; the embed is now in fallback mode.
    Downgraded(MoodError),
}

impl DispatchOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, DispatchOutcome::Dispatched(_))
    }
}

/// Fire-and-forget command forwarding. No ack, no retry, no timeout.
pub fn dispatch(
    host: &mut dyn Host,
    embed: &mut EmbedManager,
    command: PlaybackCommand,
) -> DispatchOutcome {
    match embed.state() {
        EmbedState::Ready => {}
        EmbedState::Failed(_) => {
            return match embed.fallback_link().map(str::to_string) {
                Some(url) => match host.open_link(&url) {
                    Ok(()) => DispatchOutcome::OpenedFallback(url),
                    Err(e) => {
                        warn!(error = %e, %url, "could not open fallback link");
                        DispatchOutcome::FallbackNotOpened(url)
                    }
                },
                None => DispatchOutcome::NotReady,
            };
        }
        EmbedState::Empty | EmbedState::Loading => {
            debug!(%command, "embed not ready, command dropped");
            return DispatchOutcome::NotReady;
        }
    }

    let Some(generation) = embed.current().map(|spec| spec.generation) else {
        return DispatchOutcome::NotReady;
    };

    match host.post_command(generation, command) {
        Ok(()) => {
            info!(%command, generation, "command dispatched");
            DispatchOutcome::Dispatched(Dispatched {
                command,
                generation,
            })
        }
        Err(e) => {
            let error = match e {
                MoodError::MessageDispatch(_) => e,
                other => MoodError::MessageDispatch(other.to_string()),
            };
            embed.fail_current(error.clone());
            DispatchOutcome::Downgraded(error)
        }
    }
}
