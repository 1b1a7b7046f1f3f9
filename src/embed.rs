use crate::catalog::PlaylistEntry;
use crate::error::MoodError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Declared size of the player surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedSize {
    #[serde(default = "default_width")]
    pub width: String,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> String {
    "100%".to_string()
}

fn default_height() -> u32 {
    300
}

impl Default for EmbedSize {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// One embed instance. `generation` identifies it across the async boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSpec {
    pub generation: u64,
    pub mood_id: String,
    pub url: String,
    pub size: EmbedSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmbedState {
    #[default]
    Empty,
    Loading,
    Ready,
    Failed(MoodError),
}

impl EmbedState {
    pub fn is_failed(&self) -> bool {
        matches!(self, EmbedState::Failed(_))
    }
}

/// Owns the single embed slot.
#[derive(Debug, Default)]
pub struct EmbedManager {
    state: EmbedState,
    current: Option<EmbedSpec>,
    share_url: Option<String>,
    generation: u64,
}

impl EmbedManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EmbedState {
        &self.state
    }

    pub fn current(&self) -> Option<&EmbedSpec> {
        self.current.as_ref()
    }

    /// Any state → Loading. Returns the new spec and the superseded one, which
    /// the caller must tear down before mounting the new one.
    pub fn begin(
        &mut self,
        mood_id: &str,
        entry: &PlaylistEntry,
        size: &EmbedSize,
    ) -> (EmbedSpec, Option<EmbedSpec>) {
        self.generation += 1;
        let spec = EmbedSpec {
            generation: self.generation,
            mood_id: mood_id.to_string(),
            url: entry.embed_url.clone(),
            size: size.clone(),
        };
        debug!(generation = spec.generation, url = %spec.url, "embed loading");

        let previous = self.current.replace(spec.clone());
        self.share_url = Some(entry.share_url.clone());
        self.state = EmbedState::Loading;
        (spec, previous)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current
            .as_ref()
            .is_some_and(|spec| spec.generation == generation)
    }

    /// Loading → Ready. Stale or out-of-order reports return false.
    pub fn mark_ready(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            debug!(generation, "discarding stale ready report");
            return false;
        }
        if self.state != EmbedState::Loading {
            debug!(generation, state = ?self.state, "ready report outside Loading");
            return false;
        }
        self.state = EmbedState::Ready;
        true
    }

    /// Any state → Failed, for the current generation only.
    pub fn mark_failed(&mut self, generation: u64, error: MoodError) -> bool {
        if !self.is_current(generation) {
            debug!(generation, %error, "discarding stale failure report");
            return false;
        }
        self.fail_current(error);
        true
    }

    pub fn fail_current(&mut self, error: MoodError) {
        warn!(%error, "embed entering fallback mode");
        self.state = EmbedState::Failed(error);
    }

    /// External link offered in place of the embed, only while Failed.
    pub fn fallback_link(&self) -> Option<&str> {
        match self.state {
            EmbedState::Failed(_) => self.share_url.as_deref(),
            _ => None,
        }
    }

    pub fn share_url(&self) -> Option<&str> {
        self.share_url.as_deref()
    }
}
