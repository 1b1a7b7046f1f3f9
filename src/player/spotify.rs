use super::traits::{spotify_uri, PlayerBackend};
use crate::dispatch::PlaybackCommand;
use anyhow::{bail, Context, Result};
use std::process::Command;

/// Run a raw AppleScript command
fn run_script(script: &str) -> Result<String> {
    let output = Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .context("Failed to execute AppleScript")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("AppleScript error: {}", stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check if a macOS application is running via pgrep
fn is_app_running(app_name: &str) -> bool {
    let output = Command::new("pgrep").arg("-x").arg(app_name).output();
    match output {
        Ok(o) => o.status.success(),
        Err(_) => false,
    }
}

/// Drives the Spotify desktop app through AppleScript 🍎
pub struct SpotifyBackend;

impl PlayerBackend for SpotifyBackend {
    fn name(&self) -> &'static str {
        "Spotify"
    }

    fn probe(&self) -> Result<()> {
        if !is_app_running("Spotify") {
            bail!("Spotify is not running");
        }
        Ok(())
    }

    fn load(&self, embed_url: &str) -> Result<()> {
        let uri = spotify_uri(embed_url)
            .with_context(|| format!("Not a Spotify resource: {}", embed_url))?;
        let script = format!(
            r#"
            tell application "Spotify"
                play track "{}"
                pause
            end tell
        "#,
            uri
        );
        run_script(&script)?;
        Ok(())
    }

    fn send(&self, command: PlaybackCommand) -> Result<()> {
        let verb = match command {
            PlaybackCommand::Play => "play",
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Next => "next track",
            PlaybackCommand::Previous => "previous track",
        };
        run_script(&format!("tell application \"Spotify\" to {}", verb))?;
        Ok(())
    }
}
