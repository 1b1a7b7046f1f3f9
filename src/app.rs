use crate::bridge::ChannelHost;
use crate::controller::{MoodController, MoodView, ShareOutcome};
use crate::dispatch::DispatchOutcome;
use crate::host::InboundMessage;
use crate::selector::MoodInput;
use crate::ui::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

const TOAST_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub deadline: Instant,
}

/// Terminal front-end state around the controller.
pub struct App {
    pub controller: MoodController<ChannelHost>,
    pub toast: Option<Toast>,
    pub theme: Theme,
    pub is_running: bool,
}

impl App {
    pub fn new(controller: MoodController<ChannelHost>) -> Self {
        Self {
            controller,
            toast: None,
            theme: Theme::default(),
            is_running: true,
        }
    }

    pub fn view(&self) -> MoodView {
        self.controller.view()
    }

    pub fn show_toast(&mut self, message: &str) {
        self.toast = Some(Toast {
            message: message.to_string(),
            deadline: Instant::now() + TOAST_DURATION,
        });
    }

    pub fn on_tick(&mut self) {
        if let Some(ref toast) = self.toast {
            if Instant::now() > toast.deadline {
                self.toast = None;
            }
        }
    }

    pub fn on_embed_message(&mut self, message: &InboundMessage) {
        if self.controller.handle_message(message) && self.controller.embed_state().is_failed() {
            self.show_toast("⚠ Player unavailable, use the link instead");
        }
    }

    pub fn select(&mut self, input: MoodInput) {
        match self.controller.select_mood(input) {
            Ok(mood) => self.show_toast(&format!("{} {}", mood.emoji, mood.name)),
            Err(e) => self.show_toast(&format!("Error: {}", e)),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.is_running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.is_running = false
            }

            // Click wheel
            KeyCode::Left | KeyCode::Char('h') => self.rotate(-1),
            KeyCode::Right | KeyCode::Char('l') => self.rotate(1),

            // Slider / direct pick ('1'..'9')
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.select(MoodInput::Index(index));
            }

            KeyCode::Char(' ') => {
                let outcome = self.controller.toggle_play_pause();
                self.report(outcome);
            }
            KeyCode::Char('n') => {
                let outcome = self.controller.next_track();
                self.report(outcome);
            }
            KeyCode::Char('p') => {
                let outcome = self.controller.previous_track();
                self.report(outcome);
            }
            KeyCode::Char('s') => match self.controller.share_playlist() {
                ShareOutcome::Shared(_) => {}
                ShareOutcome::OpenedFallback(url) => self.show_toast(&format!("🔗 {}", url)),
                ShareOutcome::FallbackNotOpened(url) => {
                    self.show_toast(&format!("⚠ Open manually: {}", url))
                }
                ShareOutcome::NothingSelected => self.show_toast("Pick a mood first"),
            },

            KeyCode::Char('m') => {
                if let Err(e) = self.controller.menu() {
                    self.show_toast(&format!("Error: {}", e));
                }
            }
            KeyCode::Char('b') => self.controller.back(),
            KeyCode::Char('f') => self.controller.forward(),
            _ => {}
        }

        if let Some(notice) = self.controller.host_mut().take_notice() {
            self.show_toast(&notice);
        }
    }

    fn rotate(&mut self, delta: isize) {
        match self.controller.rotate(delta) {
            Ok(mood) => self.show_toast(&format!("{} {}", mood.emoji, mood.name)),
            Err(e) => self.show_toast(&format!("Error: {}", e)),
        }
    }

    fn report(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Dispatched(d) => self.show_toast(&format!("→ {}", d.command)),
            DispatchOutcome::OpenedFallback(url) => self.show_toast(&format!("🔗 {}", url)),
            DispatchOutcome::FallbackNotOpened(url) => {
                self.show_toast(&format!("⚠ Open manually: {}", url))
            }
            DispatchOutcome::NotReady => self.show_toast("Player is not ready yet"),
            DispatchOutcome::Downgraded(e) => self.show_toast(&format!("⚠ {}", e)),
        }
    }
}
