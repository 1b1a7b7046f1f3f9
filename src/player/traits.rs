use crate::dispatch::PlaybackCommand;
use anyhow::Result;

/// The player behind the embed slot 🎵
///
/// Calls block (they shell out or talk to another process), so the bridge
/// runs them off the UI loop.
pub trait PlayerBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Environment check required before anything can play.
    fn probe(&self) -> Result<()>;

    /// Open the playlist behind an embed URL, paused.
    fn load(&self, embed_url: &str) -> Result<()>;

    fn send(&self, command: PlaybackCommand) -> Result<()>;
}

/// `https://open.spotify.com/embed/playlist/<id>` -> `spotify:playlist:<id>`
pub fn spotify_uri(embed_url: &str) -> Option<String> {
    let path = embed_url
        .strip_prefix("https://open.spotify.com/")?
        .trim_start_matches("embed/")
        .split(['?', '#'])
        .next()?;
    let mut parts = path.trim_end_matches('/').split('/');
    let (kind, id) = (parts.next()?, parts.next()?);
    if kind.is_empty() || id.is_empty() || parts.next().is_some() {
        return None;
    }
    Some(format!("spotify:{}:{}", kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotify_uri() {
        let embed = "https://open.spotify.com/embed/playlist/37i9dQZF1DX3rxVfibe1L0";
        assert_eq!(
            spotify_uri(embed).as_deref(),
            Some("spotify:playlist:37i9dQZF1DX3rxVfibe1L0")
        );
        assert_eq!(
            spotify_uri("https://open.spotify.com/playlist/abc?si=123").as_deref(),
            Some("spotify:playlist:abc")
        );
        assert_eq!(spotify_uri("https://example.com/embed/playlist/abc"), None);
        assert_eq!(spotify_uri("https://open.spotify.com/embed/playlist/"), None);
    }
}
