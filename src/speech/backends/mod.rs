//! Speech backends

// Native TTS backend using the tts crate (cross-platform)
pub mod native;

// espeak-ng subprocess backend, used when no native engine is reachable
pub mod espeak;
