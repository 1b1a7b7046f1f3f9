use clap::Parser;
use std::path::PathBuf;

/// Moodwheel - pick a mood, get a playlist 🎵
#[derive(Parser, Debug)]
#[command(name = "moodwheel", version, about)]
pub struct Args {
    /// Start on this mood (overrides `default_mood`)
    #[arg(long)]
    pub mood: Option<String>,

    /// Use the 4-mood preset, ignoring custom moods
    #[arg(long)]
    pub compact: bool,

    /// Config file (default: ~/.config/moodwheel/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,

    /// Log file verbosity
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["moodwheel"]);
        assert!(args.mood.is_none());
        assert!(!args.compact);
        assert_eq!(args.log_level, tracing::Level::INFO);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "moodwheel",
            "--mood",
            "sad",
            "--compact",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.mood.as_deref(), Some("sad"));
        assert!(args.compact);
        assert_eq!(args.log_level, tracing::Level::DEBUG);
    }
}
