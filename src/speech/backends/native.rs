//! Native Rust TTS backend using the tts crate
//!
//! This backend uses the `tts` crate which provides a unified interface to:
//! - Speech Dispatcher on Linux (via native bindings)
//! - AVFoundation on macOS/iOS (via native bindings)
//! - WinRT / SAPI on Windows

use crate::speech::voice::{wpm_to_engine_rate, VoiceInfo};
use crate::speech::Synth;
use crate::{ReadAloudError, Result};
use log::{debug, error, warn};
use tts::Tts as TtsCrate;

/// Native TTS backend using the tts crate
pub struct NativeSynth {
    /// The tts crate's TTS instance
    tts: TtsCrate,
}

impl NativeSynth {
    /// Create a new native TTS synthesizer
    ///
    /// Initializes the platform-appropriate TTS backend
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| ReadAloudError::Speech(format!("Failed to initialize TTS: {}", e)))?;

        debug!("Native TTS backend created successfully");

        Ok(Self { tts })
    }

    /// Convert words per minute to this engine's rate scale
    fn convert_rate(&self, wpm: u32) -> f32 {
        wpm_to_engine_rate(
            wpm,
            self.tts.min_rate(),
            self.tts.normal_rate(),
            self.tts.max_rate(),
        )
    }

    /// Convert 0.0 - 1.0 volume to this engine's volume scale
    fn convert_volume(&self, volume: f32) -> f32 {
        let min = self.tts.min_volume();
        let max = self.tts.max_volume();
        min + (max - min) * volume
    }
}

impl Synth for NativeSynth {
    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        debug!("Speaking {} chars", text.len());
        self.tts.speak(text, true).map_err(|e| {
            error!("Failed to speak: {}", e);
            ReadAloudError::Speech(format!("Speak failed: {}", e))
        })?;

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if !self.tts.supported_features().stop {
            warn!("Stopping speech not supported on this platform");
            return Ok(());
        }

        debug!("Stopping speech");
        self.tts.stop().map_err(|e| {
            error!("Failed to stop speech: {}", e);
            ReadAloudError::Speech(format!("Stop failed: {}", e))
        })?;

        Ok(())
    }

    fn is_speaking(&mut self) -> Result<Option<bool>> {
        if !self.tts.supported_features().is_speaking {
            return Ok(None);
        }

        self.tts
            .is_speaking()
            .map(Some)
            .map_err(|e| ReadAloudError::Speech(format!("Failed to query speech state: {}", e)))
    }

    fn set_rate(&mut self, wpm: u32) -> Result<()> {
        debug!("Setting rate to {} wpm", wpm);

        // Check if rate control is supported
        if !self.tts.supported_features().rate {
            warn!("Rate control not supported on this platform");
            return Ok(());
        }

        let converted_rate = self.convert_rate(wpm);
        self.tts
            .set_rate(converted_rate)
            .map_err(|e| ReadAloudError::Speech(format!("Failed to set rate: {}", e)))?;

        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        debug!("Setting volume to {}", volume);

        // Check if volume control is supported
        if !self.tts.supported_features().volume {
            warn!("Volume control not supported on this platform");
            return Ok(());
        }

        let converted_volume = self.convert_volume(volume);
        self.tts
            .set_volume(converted_volume)
            .map_err(|e| ReadAloudError::Speech(format!("Failed to set volume: {}", e)))?;

        Ok(())
    }

    fn set_voice(&mut self, voice_id: &str) -> Result<()> {
        debug!("Setting voice to {}", voice_id);

        if !self.tts.supported_features().voice {
            return Err(ReadAloudError::Unsupported("Voice selection"));
        }

        let voices = self
            .tts
            .voices()
            .map_err(|e| ReadAloudError::Speech(format!("Failed to get voices: {}", e)))?;

        let voice = voices
            .iter()
            .find(|v| v.id() == voice_id)
            .ok_or_else(|| ReadAloudError::Speech(format!("Unknown voice: {}", voice_id)))?;

        self.tts
            .set_voice(voice)
            .map_err(|e| ReadAloudError::Speech(format!("Failed to set voice: {}", e)))?;

        Ok(())
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        let voices = self
            .tts
            .voices()
            .map_err(|e| ReadAloudError::Speech(format!("Failed to get voices: {}", e)))?;

        Ok(voices
            .iter()
            .map(|v| VoiceInfo {
                id: v.id(),
                name: v.name(),
                language: Some(v.language().to_string()),
            })
            .collect())
    }
}
