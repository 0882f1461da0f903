//! readaloud - text-to-speech reader
//!
//! Loads and exports plain text, lightly cleans it for speech, reads it
//! aloud through the platform speech engine and reports which word is
//! (approximately) being spoken so a front end can highlight it.

pub mod error;
pub mod io;
pub mod settings;
pub mod speech;
pub mod text;

pub use error::{ReadAloudError, Result};
pub use settings::{HighlightMode, Settings, SettingsStore};
pub use speech::{HighlightEvent, PlaybackState, SpeechController, VoiceConfig, VoiceInfo};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "readaloud";
