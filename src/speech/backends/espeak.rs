//! espeak-ng subprocess backend
//!
//! Each utterance runs as its own `espeak-ng` process. Stopping kills the
//! process, and playback has finished once the process has exited.
//!
//! Dependencies:
//! - espeak-ng (install with: sudo apt install espeak-ng)

use crate::speech::voice::VoiceInfo;
use crate::speech::Synth;
use crate::{ReadAloudError, Result};
use log::{debug, error};
use std::process::{Child, Command, Stdio};

/// Slowest speed espeak-ng accepts
const MIN_SPEED: u32 = 80;

/// Fastest speed espeak-ng accepts
const MAX_SPEED: u32 = 450;

/// espeak-ng backend
pub struct EspeakSynth {
    /// Currently running espeak-ng process
    current_process: Option<Child>,

    /// Speed in words per minute
    rate: u32,

    /// Volume (0.0 - 1.0)
    volume: f32,

    /// Voice name for espeak-ng
    voice: String,

    /// Path to espeak-ng
    espeak_path: String,
}

impl EspeakSynth {
    /// Create a new espeak-ng synthesizer
    ///
    /// Verifies espeak-ng is installed
    pub fn new() -> Result<Self> {
        debug!("Creating espeak-ng backend");

        let espeak_path = Self::find_espeak()?;
        debug!("Found espeak-ng at: {}", espeak_path);

        Ok(Self {
            current_process: None,
            rate: 175,
            volume: 1.0,
            voice: "en".to_string(),
            espeak_path,
        })
    }

    /// Find espeak-ng executable
    fn find_espeak() -> Result<String> {
        let paths = ["espeak-ng", "/usr/bin/espeak-ng", "/usr/local/bin/espeak-ng"];

        for path in paths {
            if let Ok(status) = Command::new(path)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if status.success() {
                    return Ok(path.to_string());
                }
            }
        }

        Err(ReadAloudError::Speech(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        ))
    }

    /// Clamp words per minute into the range espeak-ng accepts
    fn espeak_speed(wpm: u32) -> u32 {
        wpm.clamp(MIN_SPEED, MAX_SPEED)
    }

    /// Convert volume (0.0 - 1.0) to espeak amplitude (0-200)
    fn espeak_amplitude(volume: f32) -> u32 {
        (volume.clamp(0.0, 1.0) * 200.0).round() as u32
    }

    /// Parse the table printed by `espeak-ng --voices`
    ///
    /// ```text
    /// Pty Language       Age/Gender VoiceName          File                 Other Languages
    ///  5  af              --/M      Afrikaans          gmw/af
    /// ```
    fn parse_voice_list(output: &str) -> Vec<VoiceInfo> {
        output
            .lines()
            .skip(1)
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let _priority = fields.next()?;
                let language = fields.next()?;
                let _age_gender = fields.next()?;
                let name = fields.next()?;

                Some(VoiceInfo {
                    id: language.to_string(),
                    name: name.replace('_', " "),
                    language: Some(language.to_string()),
                })
            })
            .collect()
    }

    /// Cancel any currently running speech process
    fn cancel_process(&mut self) {
        if let Some(mut child) = self.current_process.take() {
            debug!("Killing espeak-ng process");
            match child.kill() {
                Ok(_) => {
                    let _ = child.wait(); // Clean up zombie
                }
                Err(e) => {
                    debug!("Failed to kill espeak-ng process: {}", e);
                }
            }
        }
    }
}

impl Synth for EspeakSynth {
    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        self.cancel_process();

        let mut cmd = Command::new(&self.espeak_path);
        cmd.arg("-v").arg(&self.voice);
        cmd.arg("-s").arg(Self::espeak_speed(self.rate).to_string());
        cmd.arg("-a").arg(Self::espeak_amplitude(self.volume).to_string());
        cmd.arg("--").arg(text);
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        match cmd.spawn() {
            Ok(child) => {
                self.current_process = Some(child);
                debug!("espeak-ng process started");
                Ok(())
            }
            Err(e) => {
                error!("Failed to spawn espeak-ng: {}", e);
                Err(ReadAloudError::Speech(format!("Failed to start espeak-ng: {}", e)))
            }
        }
    }

    fn stop(&mut self) -> Result<()> {
        debug!("Stopping speech");
        self.cancel_process();
        Ok(())
    }

    fn is_speaking(&mut self) -> Result<Option<bool>> {
        let Some(child) = self.current_process.as_mut() else {
            return Ok(Some(false));
        };

        match child.try_wait()? {
            Some(status) => {
                debug!("espeak-ng exited with {}", status);
                self.current_process = None;
                Ok(Some(false))
            }
            None => Ok(Some(true)),
        }
    }

    fn set_rate(&mut self, wpm: u32) -> Result<()> {
        debug!("Setting rate to {} wpm", wpm);
        self.rate = wpm;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        debug!("Setting volume to {}", volume);
        self.volume = volume;
        Ok(())
    }

    fn set_voice(&mut self, voice_id: &str) -> Result<()> {
        if voice_id.trim().is_empty() {
            return Err(ReadAloudError::Speech("Empty voice id".to_string()));
        }
        debug!("Setting voice to {}", voice_id);
        self.voice = voice_id.to_string();
        Ok(())
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        let output = Command::new(&self.espeak_path)
            .arg("--voices")
            .stderr(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(ReadAloudError::Speech(format!(
                "espeak-ng --voices failed with {}",
                output.status
            )));
        }

        Ok(Self::parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Drop for EspeakSynth {
    fn drop(&mut self) {
        debug!("Shutting down espeak-ng backend");
        self.cancel_process();
    }
}
