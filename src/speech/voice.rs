//! Voice parameters shared by all backends

/// Default speaking rate in words per minute
pub const DEFAULT_RATE: u32 = 170;

/// Default volume (0.0 - 1.0)
pub const DEFAULT_VOLUME: f32 = 0.9;

/// Slowest rate the backends map to their minimum
pub const MIN_RATE: u32 = 50;

/// Fastest rate the backends map to their maximum
pub const MAX_RATE: u32 = 300;

/// Current voice settings of a controller
///
/// Lives only as long as the engine; nothing here is written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    /// Speaking rate in words per minute
    pub rate: u32,

    /// Volume, always within 0.0 - 1.0
    pub volume: f32,

    /// Backend-specific voice identifier, if one was selected
    pub voice_id: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            volume: DEFAULT_VOLUME,
            voice_id: None,
        }
    }
}

/// A voice offered by the speech engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    /// Identifier accepted by `set_voice`
    pub id: String,

    /// Human readable name
    pub name: String,

    /// Language tag, when the backend reports one
    pub language: Option<String>,
}

/// Clamp a volume into 0.0 - 1.0
///
/// NaN is treated as silence.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}

/// Clamp a rate into `MIN_RATE` - `MAX_RATE` words per minute
pub fn clamp_rate(wpm: u32) -> u32 {
    wpm.clamp(MIN_RATE, MAX_RATE)
}

/// Map words per minute onto a backend's native rate scale
///
/// `DEFAULT_RATE` lands on the backend's normal rate; `MIN_RATE` and
/// `MAX_RATE` land on its extremes, linear in between.
pub fn wpm_to_engine_rate(wpm: u32, min: f32, normal: f32, max: f32) -> f32 {
    let wpm = clamp_rate(wpm) as f32;
    let default = DEFAULT_RATE as f32;

    if wpm >= default {
        normal + (max - normal) * (wpm - default) / (MAX_RATE as f32 - default)
    } else {
        normal - (normal - min) * (default - wpm) / (default - MIN_RATE as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_volume() {
        assert_eq!(clamp_volume(-5.0), 0.0);
        assert_eq!(clamp_volume(5.0), 1.0);
        assert_eq!(clamp_volume(0.25), 0.25);
        assert_eq!(clamp_volume(f32::NAN), 0.0);
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-4 * b.abs().max(1.0)
    }

    #[test]
    fn test_clamp_rate() {
        assert_eq!(clamp_rate(0), MIN_RATE);
        assert_eq!(clamp_rate(1000), MAX_RATE);
        assert_eq!(clamp_rate(DEFAULT_RATE), DEFAULT_RATE);
    }

    #[test]
    fn test_rate_mapping() {
        // Speech Dispatcher style scale
        assert!(close(wpm_to_engine_rate(DEFAULT_RATE, -100.0, 0.0, 100.0), 0.0));
        assert!(close(wpm_to_engine_rate(MIN_RATE, -100.0, 0.0, 100.0), -100.0));
        assert!(close(wpm_to_engine_rate(MAX_RATE, -100.0, 0.0, 100.0), 100.0));

        // Out of range clamps
        assert!(close(wpm_to_engine_rate(1000, 0.1, 1.0, 10.0), 10.0));
        assert!(close(wpm_to_engine_rate(0, 0.1, 1.0, 10.0), 0.1));

        // Halfway up
        let halfway = DEFAULT_RATE + (MAX_RATE - DEFAULT_RATE) / 2;
        assert!((wpm_to_engine_rate(halfway, 0.0, 1.0, 3.0) - 2.0).abs() < 0.01);
    }
}
