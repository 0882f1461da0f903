//! Speech synthesizer abstraction
//!
//! Provides a unified interface for text-to-speech across platforms.
//! The controller drives one of these from its worker threads.

use super::voice::VoiceInfo;
use crate::{ReadAloudError, Result};
use log::info;

/// Speech synthesizer trait
///
/// All backends implement this to provide text-to-speech.
pub trait Synth: Send {
    /// Start speaking text, interrupting anything already playing
    ///
    /// Returns as soon as playback has started.
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Silence current speech
    fn stop(&mut self) -> Result<()>;

    /// Whether audio is still playing
    ///
    /// `None` when the backend has no way to tell.
    fn is_speaking(&mut self) -> Result<Option<bool>>;

    /// Set speech rate in words per minute
    fn set_rate(&mut self, wpm: u32) -> Result<()>;

    /// Set speech volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Select a voice by the id reported from `voices`
    fn set_voice(&mut self, voice_id: &str) -> Result<()>;

    /// Voices the backend can speak with
    fn voices(&self) -> Result<Vec<VoiceInfo>>;
}

/// Create a platform-appropriate speech synthesizer
///
/// Tries, in order:
/// 1. The native engine via the tts crate (Speech Dispatcher on Linux,
///    AVFoundation on macOS, WinRT/SAPI on Windows)
/// 2. An espeak-ng subprocess
pub fn create_synth() -> Result<Box<dyn Synth>> {
    let platform = std::env::consts::OS;
    info!("Creating speech synthesizer for platform: {}", platform);

    info!("Trying native TTS backend...");
    use super::backends::native::NativeSynth;

    let native_err = match NativeSynth::new() {
        Ok(synth) => {
            info!("✓ Successfully initialized native TTS backend");
            return Ok(Box::new(synth));
        }
        Err(e) => {
            info!("✗ Native TTS backend unavailable: {}", e);
            e
        }
    };

    info!("Trying espeak-ng backend...");
    use super::backends::espeak::EspeakSynth;

    match EspeakSynth::new() {
        Ok(synth) => {
            info!("✓ Successfully initialized espeak-ng backend");
            Ok(Box::new(synth))
        }
        Err(e) => Err(ReadAloudError::Speech(format!(
            "No speech backend available on '{}'. Tried:\n\
             1. Native TTS ({})\n\
             2. espeak-ng ({})",
            platform, native_err, e
        ))),
    }
}
