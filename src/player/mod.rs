pub mod traits;
pub mod unsupported;

#[cfg(target_os = "macos")]
pub mod spotify;

#[cfg(target_os = "macos")]
pub use spotify::SpotifyBackend;
pub use traits::{spotify_uri, PlayerBackend};
pub use unsupported::UnsupportedBackend;

/// Factory to get the correct backend for the current OS
pub fn get_backend() -> Box<dyn PlayerBackend> {
    #[cfg(target_os = "macos")]
    {
        Box::new(SpotifyBackend)
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(UnsupportedBackend)
    }
}
