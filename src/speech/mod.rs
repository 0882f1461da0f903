//! Speech synthesis and playback

pub mod backends;
pub mod controller;
pub mod highlight;
pub mod synth;
pub mod voice;

pub use controller::{HighlightCallback, PlaybackSession, PlaybackState, SpeechController};
pub use highlight::{HighlightEstimator, HighlightEvent};
pub use synth::{create_synth, Synth};
pub use voice::{VoiceConfig, VoiceInfo};
