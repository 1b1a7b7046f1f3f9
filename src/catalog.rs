use crate::error::{MoodError, Result};
use serde::{Deserialize, Serialize};

const EMBED_BASE: &str = "https://open.spotify.com/embed/playlist/";
const SHARE_BASE: &str = "https://open.spotify.com/playlist/";

/// A named emotional category. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mood {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub ordinal: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub embed_url: String,
    pub share_url: String,
}

impl PlaylistEntry {
    /// Trailing path segment of the embed URL (the playlist id for Spotify embeds).
    pub fn resource_id(&self) -> &str {
        self.embed_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// One mood as written in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodDefinition {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub embed_url: String,
    pub share_url: String,
}

impl MoodDefinition {
    fn spotify(id: &str, name: &str, emoji: &str, playlist: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            emoji: emoji.to_string(),
            embed_url: format!("{}{}", EMBED_BASE, playlist),
            share_url: format!("{}{}", SHARE_BASE, playlist),
        }
    }
}

/// Built-in mood presets 🎚️
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodSet {
    #[default]
    Full,
    Compact,
}

impl MoodSet {
    pub fn definitions(self) -> Vec<MoodDefinition> {
        let happy = MoodDefinition::spotify("happy", "Happy", "😊", "37i9dQZF1DX3rxVfibe1L0");
        let energetic =
            MoodDefinition::spotify("energetic", "Energetic", "🔥", "37i9dQZF1DX76Wlfdnj7AP");
        let relaxed =
            MoodDefinition::spotify("relaxed", "Relaxed", "😌", "37i9dQZF1DWZd79rJ6a7lp");
        let sad = MoodDefinition::spotify("sad", "Sad", "😢", "37i9dQZF1DX7qK8ma5wgG1");

        match self {
            MoodSet::Compact => vec![happy, energetic, relaxed, sad],
            MoodSet::Full => vec![
                happy,
                energetic,
                relaxed,
                MoodDefinition::spotify("nostalgic", "Nostalgic", "🌟", "37i9dQZF1DX4o1oenSJRJd"),
                MoodDefinition::spotify("romantic", "Romantic", "💖", "37i9dQZF1DWXb9I5xoXLjp"),
                MoodDefinition::spotify(
                    "meditation",
                    "Meditation",
                    "🧘",
                    "37i9dQZF1DWZqd5JICZI0u",
                ),
                sad,
            ],
        }
    }
}

fn entry(ordinal: usize, def: MoodDefinition) -> (Mood, PlaylistEntry) {
    (
        Mood {
            id: def.id,
            name: def.name,
            emoji: def.emoji,
            ordinal,
        },
        PlaylistEntry {
            embed_url: def.embed_url,
            share_url: def.share_url,
        },
    )
}

/// Ordered moods, each paired with its playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCatalog {
    entries: Vec<(Mood, PlaylistEntry)>,
}

impl MoodCatalog {
    /// Validates and builds a catalog. Ordinals follow definition order.
    pub fn new(definitions: Vec<MoodDefinition>) -> Result<Self> {
        if definitions.is_empty() {
            return Err(MoodError::InvalidCatalog("no moods defined".to_string()));
        }

        let mut entries: Vec<(Mood, PlaylistEntry)> = Vec::with_capacity(definitions.len());
        for (ordinal, def) in definitions.into_iter().enumerate() {
            if def.id.is_empty() || def.id != def.id.to_lowercase() {
                return Err(MoodError::InvalidCatalog(format!(
                    "mood id '{}' must be a non-empty lowercase key",
                    def.id
                )));
            }
            if entries.iter().any(|(m, _)| m.id == def.id) {
                return Err(MoodError::InvalidCatalog(format!(
                    "duplicate mood id '{}'",
                    def.id
                )));
            }
            for (field, value) in [
                ("name", &def.name),
                ("emoji", &def.emoji),
                ("embed_url", &def.embed_url),
                ("share_url", &def.share_url),
            ] {
                if value.trim().is_empty() {
                    return Err(MoodError::InvalidCatalog(format!(
                        "mood '{}' has an empty {}",
                        def.id, field
                    )));
                }
            }

            entries.push(entry(ordinal, def));
        }

        Ok(Self { entries })
    }

    pub fn preset(set: MoodSet) -> Self {
        let entries = set
            .definitions()
            .into_iter()
            .enumerate()
            .map(|(ordinal, def)| entry(ordinal, def))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn moods(&self) -> impl Iterator<Item = &Mood> {
        self.entries.iter().map(|(m, _)| m)
    }

    pub fn by_index(&self, index: usize) -> Result<&Mood> {
        self.entries
            .get(index)
            .map(|(m, _)| m)
            .ok_or(MoodError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn by_id(&self, id: &str) -> Result<&Mood> {
        self.entries
            .iter()
            .find(|(m, _)| m.id == id)
            .map(|(m, _)| m)
            .ok_or_else(|| MoodError::UnknownMood(id.to_string()))
    }

    /// Playlist resolution. Pure; any id outside the catalog is an error.
    pub fn resolve(&self, mood_id: &str) -> Result<&PlaylistEntry> {
        self.entries
            .iter()
            .find(|(m, _)| m.id == mood_id)
            .map(|(_, p)| p)
            .ok_or_else(|| MoodError::UnknownMood(mood_id.to_string()))
    }
}

impl Default for MoodCatalog {
    fn default() -> Self {
        Self::preset(MoodSet::Full)
    }
}
