pub mod app;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod embed;
pub mod error;
pub mod events;
pub mod host;
pub mod player;
pub mod selector;
pub mod ui;

pub use catalog::{Mood, MoodCatalog, MoodSet, PlaylistEntry};
pub use controller::{MoodController, MoodView, PlaybackState, ShareOutcome};
pub use dispatch::{DispatchOutcome, Dispatched, PlaybackCommand};
pub use embed::{EmbedSize, EmbedSpec, EmbedState};
pub use error::MoodError;
pub use host::{Host, InboundMessage};
pub use selector::MoodInput;
