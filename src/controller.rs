use crate::catalog::{Mood, MoodCatalog};
use crate::dispatch::{self, DispatchOutcome, PlaybackCommand};
use crate::embed::{EmbedManager, EmbedSize, EmbedSpec, EmbedState};
use crate::error::{MoodError, Result};
use crate::host::{parse_inbound, EmbedEvent, Host, InboundMessage};
use crate::selector::{MoodInput, MoodSelector};
use tracing::{info, warn};

pub const DEFAULT_TRUSTED_ORIGIN: &str = "https://open.spotify.com";

/// Session-only playback state. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_mood: Option<String>,
    /// Assumed player state, flipped before dispatch and never reconciled
    /// with the real player.
    pub is_playing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared(String),
    OpenedFallback(String),
    FallbackNotOpened(String),
    NothingSelected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodOption {
    pub name: String,
    pub emoji: String,
    pub active: bool,
}

/// Snapshot of everything a front-end needs to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodView {
    pub options: Vec<MoodOption>,
    pub emoji: Option<String>,
    pub label: Option<String>,
    pub embed_state: EmbedState,
    pub embed: Option<EmbedSpec>,
    pub fallback_link: Option<String>,
    pub is_playing: bool,
    pub panel_visible: bool,
}

impl MoodView {
    pub fn play_glyph(&self) -> &'static str {
        if self.is_playing {
            "⏸"
        } else {
            "▶"
        }
    }

    pub fn fallback_visible(&self) -> bool {
        self.fallback_link.is_some()
    }
}

/// Single owner of the session: catalog, selection, embed slot and host.
pub struct MoodController<H: Host> {
    catalog: MoodCatalog,
    selector: MoodSelector,
    embed: EmbedManager,
    playback: PlaybackState,
    embed_size: EmbedSize,
    trusted_origin: String,
    panel_visible: bool,
    host: H,
}

impl<H: Host> MoodController<H> {
    pub fn new(catalog: MoodCatalog, host: H) -> Self {
        Self {
            catalog,
            selector: MoodSelector::new(),
            embed: EmbedManager::new(),
            playback: PlaybackState::default(),
            embed_size: EmbedSize::default(),
            trusted_origin: DEFAULT_TRUSTED_ORIGIN.to_string(),
            panel_visible: false,
            host,
        }
    }

    pub fn with_embed_size(mut self, size: EmbedSize) -> Self {
        self.embed_size = size;
        self
    }

    pub fn with_trusted_origin(mut self, origin: impl Into<String>) -> Self {
        self.trusted_origin = origin.into();
        self
    }

    pub fn catalog(&self) -> &MoodCatalog {
        &self.catalog
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn embed_state(&self) -> &EmbedState {
        self.embed.state()
    }

    pub fn current_embed(&self) -> Option<&EmbedSpec> {
        self.embed.current()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.selector.active_index()
    }

    pub fn trusted_origin(&self) -> &str {
        &self.trusted_origin
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Validate, resolve, and rebuild the embed for the chosen mood.
    /// Rejected input changes nothing.
    pub fn select_mood(&mut self, input: MoodInput) -> Result<Mood> {
        let mood = self
            .selector
            .select(&self.catalog, &input)
            .inspect_err(|e| warn!(error = %e, ?input, "mood selection rejected"))?
            .clone();
        self.apply_mood(&mood)?;
        Ok(mood)
    }

    /// Click-wheel step.
    pub fn rotate(&mut self, delta: isize) -> Result<Mood> {
        let mood = self
            .selector
            .rotate(&self.catalog, delta)
            .inspect_err(|e| warn!(error = %e, delta, "wheel rotation rejected"))?
            .clone();
        self.apply_mood(&mood)?;
        Ok(mood)
    }

    fn apply_mood(&mut self, mood: &Mood) -> Result<()> {
        let entry = self.catalog.resolve(&mood.id)?.clone();
        info!(mood = %mood.id, url = %entry.embed_url, "mood changed");

        self.playback.current_mood = Some(mood.id.clone());
        self.playback.is_playing = false;
        self.panel_visible = true;

        let (spec, previous) = self.embed.begin(&mood.id, &entry, &self.embed_size);
        if let Some(previous) = previous {
            self.host.teardown_embed(&previous);
        }
        if let Err(e) = self.host.mount_embed(&spec) {
            let error = match e {
                MoodError::EmbedLoad(_) | MoodError::CapabilityProbe(_) => e,
                other => MoodError::EmbedLoad(other.to_string()),
            };
            self.embed.mark_failed(spec.generation, error);
        }
        Ok(())
    }

    /// Feed a message from the embed boundary. Returns whether it changed state.
    pub fn handle_message(&mut self, message: &InboundMessage) -> bool {
        match parse_inbound(message, &self.trusted_origin) {
            Some(EmbedEvent::Ready { generation }) => self.embed.mark_ready(generation),
            Some(EmbedEvent::Failed { generation, error }) => {
                self.embed.mark_failed(generation, error)
            }
            None => false,
        }
    }

    pub fn toggle_play_pause(&mut self) -> DispatchOutcome {
        if self.embed.state() != &EmbedState::Ready {
            return dispatch::dispatch(&mut self.host, &mut self.embed, PlaybackCommand::Play);
        }

        self.playback.is_playing = !self.playback.is_playing;
        let command = if self.playback.is_playing {
            PlaybackCommand::Play
        } else {
            PlaybackCommand::Pause
        };

        let outcome = dispatch::dispatch(&mut self.host, &mut self.embed, command);
        if let DispatchOutcome::Downgraded(_) = outcome {
            self.playback.is_playing = !self.playback.is_playing;
        }
        outcome
    }

    pub fn next_track(&mut self) -> DispatchOutcome {
        dispatch::dispatch(&mut self.host, &mut self.embed, PlaybackCommand::Next)
    }

    pub fn previous_track(&mut self) -> DispatchOutcome {
        dispatch::dispatch(&mut self.host, &mut self.embed, PlaybackCommand::Previous)
    }

    pub fn share_playlist(&mut self) -> ShareOutcome {
        if let Some(url) = self.embed.fallback_link().map(str::to_string) {
            return match self.host.open_link(&url) {
                Ok(()) => ShareOutcome::OpenedFallback(url),
                Err(e) => {
                    warn!(error = %e, %url, "could not open fallback link");
                    ShareOutcome::FallbackNotOpened(url)
                }
            };
        }

        let Some(mood) = self
            .playback
            .current_mood
            .as_deref()
            .and_then(|id| self.catalog.by_id(id).ok())
        else {
            return ShareOutcome::NothingSelected;
        };

        let message = format!("Sharing your {} {} playlist!", mood.id, mood.emoji);
        self.host.notify(&message);
        ShareOutcome::Shared(message)
    }

    /// Return to the first mood and rebuild its embed.
    pub fn menu(&mut self) -> Result<Mood> {
        self.panel_visible = false;
        self.select_mood(MoodInput::Index(0))
    }

    pub fn back(&mut self) {
        self.panel_visible = false;
    }

    pub fn forward(&mut self) {
        self.panel_visible = true;
    }

    pub fn view(&self) -> MoodView {
        let current = self
            .playback
            .current_mood
            .as_deref()
            .and_then(|id| self.catalog.by_id(id).ok());

        MoodView {
            options: self
                .catalog
                .moods()
                .map(|m| MoodOption {
                    name: m.name.clone(),
                    emoji: m.emoji.clone(),
                    active: self.selector.is_active(m.ordinal),
                })
                .collect(),
            emoji: current.map(|m| m.emoji.clone()),
            label: current.map(|m| m.name.clone()),
            embed_state: self.embed.state().clone(),
            embed: self.embed.current().cloned(),
            fallback_link: self.embed.fallback_link().map(str::to_string),
            is_playing: self.playback.is_playing,
            panel_visible: self.panel_visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MoodSet;
    use crate::host::EmbedPayload;

    #[derive(Default)]
    struct FakeHost {
        mounted: Vec<u64>,
        posted: Vec<PlaybackCommand>,
        fail_mount: bool,
        fail_post: bool,
        fail_open: bool,
        opened: Vec<String>,
    }

    impl Host for FakeHost {
        fn mount_embed(&mut self, spec: &EmbedSpec) -> Result<()> {
            if self.fail_mount {
                return Err(MoodError::EmbedLoad("no surface".to_string()));
            }
            self.mounted.push(spec.generation);
            Ok(())
        }

        fn teardown_embed(&mut self, spec: &EmbedSpec) {
            self.mounted.retain(|g| *g != spec.generation);
        }

        fn post_command(&mut self, _generation: u64, command: PlaybackCommand) -> Result<()> {
            if self.fail_post {
                return Err(MoodError::MessageDispatch("channel closed".to_string()));
            }
            self.posted.push(command);
            Ok(())
        }

        fn open_link(&mut self, url: &str) -> std::io::Result<()> {
            if self.fail_open {
                return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no browser"));
            }
            self.opened.push(url.to_string());
            Ok(())
        }

        fn notify(&mut self, _message: &str) {}
    }

    fn ready(controller: &mut MoodController<FakeHost>) {
        let generation = controller.current_embed().unwrap().generation;
        let msg = InboundMessage::new(DEFAULT_TRUSTED_ORIGIN, &EmbedPayload::Ready { generation });
        assert!(controller.handle_message(&msg));
    }

    #[test]
    fn test_mood_change_resets_playing() {
        let mut controller = MoodController::new(MoodCatalog::default(), FakeHost::default());
        controller.select_mood(MoodInput::Index(1)).unwrap();
        ready(&mut controller);
        controller.toggle_play_pause();
        assert!(controller.playback().is_playing);

        controller.select_mood("relaxed".into()).unwrap();
        assert!(!controller.playback().is_playing);
        assert_eq!(controller.embed_state(), &EmbedState::Loading);
    }

    #[test]
    fn test_mount_failure_enters_fallback() {
        let host = FakeHost {
            fail_mount: true,
            ..Default::default()
        };
        let mut controller = MoodController::new(MoodCatalog::default(), host);
        controller.select_mood("sad".into()).unwrap();
        assert!(controller.embed_state().is_failed());
        assert!(controller.view().fallback_visible());
    }

    #[test]
    fn test_post_failure_downgrades_and_restores_flag() {
        let mut controller = MoodController::new(MoodCatalog::default(), FakeHost::default());
        controller.select_mood(MoodInput::Index(0)).unwrap();
        ready(&mut controller);
        controller.host_mut().fail_post = true;

        let outcome = controller.toggle_play_pause();
        assert!(matches!(
            outcome,
            DispatchOutcome::Downgraded(MoodError::MessageDispatch(_))
        ));
        assert!(!controller.playback().is_playing);
        assert!(controller.embed_state().is_failed());
    }

    #[test]
    fn test_commands_dropped_while_loading() {
        let mut controller = MoodController::new(MoodCatalog::default(), FakeHost::default());
        assert_eq!(controller.toggle_play_pause(), DispatchOutcome::NotReady);

        controller.select_mood(MoodInput::Index(0)).unwrap();
        assert_eq!(controller.next_track(), DispatchOutcome::NotReady);
        assert!(!controller.playback().is_playing);
        assert!(controller.host().posted.is_empty());
    }

    #[test]
    fn test_menu_back_forward() {
        let mut controller =
            MoodController::new(MoodCatalog::preset(MoodSet::Compact), FakeHost::default());
        controller.select_mood("sad".into()).unwrap();
        assert!(controller.view().panel_visible);

        controller.back();
        assert!(!controller.view().panel_visible);
        controller.forward();
        assert!(controller.view().panel_visible);

        let mood = controller.menu().unwrap();
        assert_eq!(mood.id, "happy");
        assert_eq!(controller.active_index(), Some(0));
        assert_eq!(controller.host().mounted.len(), 1);
    }

    #[test]
    fn test_rejected_selection_keeps_session() {
        let mut controller =
            MoodController::new(MoodCatalog::preset(MoodSet::Compact), FakeHost::default());
        controller.select_mood("relaxed".into()).unwrap();
        let before = controller.view();

        assert_eq!(
            controller.select_mood("angry".into()),
            Err(MoodError::UnknownMood("angry".to_string()))
        );
        assert_eq!(
            controller.select_mood(MoodInput::Index(9)),
            Err(MoodError::IndexOutOfRange { index: 9, len: 4 })
        );
        assert_eq!(controller.view(), before);
        assert_eq!(controller.host().mounted, vec![1]);
    }

    #[test]
    fn test_unopenable_fallback_is_reported() {
        let host = FakeHost {
            fail_mount: true,
            fail_open: true,
            ..Default::default()
        };
        let mut controller = MoodController::new(MoodCatalog::default(), host);
        controller.select_mood("sad".into()).unwrap();

        let link = "https://open.spotify.com/playlist/37i9dQZF1DX7qK8ma5wgG1".to_string();
        assert_eq!(
            controller.share_playlist(),
            ShareOutcome::FallbackNotOpened(link.clone())
        );
        assert_eq!(
            controller.next_track(),
            DispatchOutcome::FallbackNotOpened(link.clone())
        );

        controller.host_mut().fail_open = false;
        assert_eq!(controller.next_track(), DispatchOutcome::OpenedFallback(link.clone()));
        assert_eq!(controller.host().opened, vec![link]);
    }

    #[test]
    fn test_share_without_selection() {
        let mut controller = MoodController::new(MoodCatalog::default(), FakeHost::default());
        assert_eq!(controller.share_playlist(), ShareOutcome::NothingSelected);
    }
}
