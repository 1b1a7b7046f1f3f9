use super::traits::PlayerBackend;
use crate::dispatch::PlaybackCommand;
use anyhow::{bail, Result};

/// Platforms without a scriptable player. Every session lands in fallback mode.
pub struct UnsupportedBackend;

impl PlayerBackend for UnsupportedBackend {
    fn name(&self) -> &'static str {
        "Unsupported"
    }

    fn probe(&self) -> Result<()> {
        bail!("Embedded playback not supported on this OS")
    }

    fn load(&self, _embed_url: &str) -> Result<()> {
        bail!("Embedded playback not supported on this OS")
    }

    fn send(&self, _command: PlaybackCommand) -> Result<()> {
        bail!("Embedded playback not supported on this OS")
    }
}
