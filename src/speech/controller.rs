//! Playback control and highlight delivery
//!
//! `SpeechController` owns one synthesizer and at most one playback
//! session at a time. Each `speak` starts a new session with two threads:
//!
//! - a worker that starts the engine and waits for it to finish
//! - a highlight producer that walks the estimated word timeline
//!
//! Controller state and the current session live behind one lock. Session
//! threads only act while their session is still the current one and still
//! speaking, so a newer `speak`, a `pause` or a `stop` silences them.
//! Dropping the session's cancel sender wakes both threads immediately.

use super::highlight::{HighlightEstimator, HighlightEvent};
use super::synth::{create_synth, Synth};
use super::voice::{
    clamp_rate, clamp_volume, VoiceConfig, VoiceInfo, DEFAULT_RATE, DEFAULT_VOLUME,
};
use crate::settings::HighlightMode;
use crate::{ReadAloudError, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How often the worker asks the engine whether it is still speaking
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Callback fired for each highlight step: (word_index, word, line_index)
pub type HighlightCallback = Arc<dyn Fn(usize, &str, usize) + Send + Sync>;

/// Playback state of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

/// One run of `speak`, from start until completion or stop
#[derive(Debug)]
pub struct PlaybackSession {
    pub id: u64,
    pub text: String,
    pub highlight_mode: HighlightMode,
    pub estimator: HighlightEstimator,
}

impl PlaybackSession {
    pub fn words(&self) -> &[String] {
        self.estimator.words()
    }

    pub fn lines(&self) -> &[String] {
        self.estimator.lines()
    }
}

struct Inner {
    state: PlaybackState,
    session: Option<Arc<PlaybackSession>>,
    next_session_id: u64,

    /// Dropped to cancel the current session's threads
    cancel: Option<Sender<()>>,

    voice: VoiceConfig,
    highlight_mode: HighlightMode,
    callback: Option<HighlightCallback>,
    subscribers: Vec<Sender<HighlightEvent>>,
}

impl Inner {
    fn is_current(&self, session_id: u64) -> bool {
        self.state == PlaybackState::Speaking
            && self.session.as_ref().map(|s| s.id) == Some(session_id)
    }

    /// Back to Idle, dropping the session and cancelling its threads
    fn end_session(&mut self) {
        self.state = PlaybackState::Idle;
        self.session = None;
        self.cancel = None;
    }
}

struct Shared {
    inner: Mutex<Inner>,

    /// `None` when no engine could be initialized
    engine: Option<Mutex<Box<dyn Synth>>>,
}

impl Shared {
    fn is_current(&self, session_id: u64) -> bool {
        self.inner.lock().is_current(session_id)
    }

    /// End the session if it is still the one speaking
    fn finish(&self, session_id: u64) {
        let mut inner = self.inner.lock();
        if inner.is_current(session_id) {
            debug!("Session {} finished", session_id);
            inner.end_session();
        }
    }

    /// Hand an event to the UI, unless its session is stale
    ///
    /// Returns false once the session is no longer current.
    fn deliver(&self, session_id: u64, event: &HighlightEvent) -> bool {
        let callback = {
            let mut inner = self.inner.lock();
            if !inner.is_current(session_id) {
                return false;
            }
            inner.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
            inner.callback.clone()
        };

        if let Some(callback) = callback {
            callback(event.word_index, &event.word, event.line_index);
        }
        true
    }
}

/// Text-to-speech playback with approximate word highlighting
///
/// Every method is fail-soft: engine errors are logged and never reach the
/// caller, and no method blocks on audio.
pub struct SpeechController {
    shared: Arc<Shared>,
}

impl SpeechController {
    /// Controller on the best available platform engine
    ///
    /// If no engine can be created the controller still works, it just
    /// never speaks.
    pub fn new() -> Self {
        let engine = match create_synth() {
            Ok(synth) => Some(synth),
            Err(e) => {
                error!("Failed to initialize speech engine: {}", e);
                None
            }
        };
        Self::from_engine(engine)
    }

    /// Controller on a specific synthesizer
    pub fn with_synth(synth: Box<dyn Synth>) -> Self {
        Self::from_engine(Some(synth))
    }

    fn from_engine(engine: Option<Box<dyn Synth>>) -> Self {
        let controller = Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: PlaybackState::Idle,
                    session: None,
                    next_session_id: 1,
                    cancel: None,
                    voice: VoiceConfig::default(),
                    highlight_mode: HighlightMode::default(),
                    callback: None,
                    subscribers: Vec::new(),
                }),
                engine: engine.map(Mutex::new),
            }),
        };

        if controller.shared.engine.is_some() {
            controller.set_rate(DEFAULT_RATE);
            controller.set_volume(DEFAULT_VOLUME);
            if let Some(voice) = controller.voices().into_iter().next() {
                controller.set_voice(&voice.id);
            }
        }

        controller
    }

    /// Whether a speech engine is available
    pub fn has_engine(&self) -> bool {
        self.shared.engine.is_some()
    }

    /// Start reading `text` aloud
    ///
    /// Blank text is ignored. Any session already running is replaced.
    /// Returns immediately; audio and highlighting run on worker threads.
    pub fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        if self.shared.engine.is_none() {
            error!("Cannot speak: no speech engine available");
            return;
        }

        let (cancel_tx, cancel_rx) = unbounded::<()>();
        let (session, rate) = {
            let mut inner = self.shared.inner.lock();
            let id = inner.next_session_id;
            inner.next_session_id += 1;

            let session = Arc::new(PlaybackSession {
                id,
                text: text.to_string(),
                highlight_mode: inner.highlight_mode,
                estimator: HighlightEstimator::new(text),
            });

            inner.state = PlaybackState::Speaking;
            inner.session = Some(Arc::clone(&session));
            inner.cancel = Some(cancel_tx);
            (session, inner.voice.rate)
        };

        info!(
            "Starting session {} ({} words)",
            session.id,
            session.words().len()
        );

        let shared = Arc::clone(&self.shared);
        let session_id = session.id;
        let spawned = thread::Builder::new()
            .name("readaloud-speech".to_string())
            .spawn(move || run_session(shared, session, rate, cancel_rx));

        if let Err(e) = spawned {
            error!("Failed to start speech thread: {}", e);
            self.shared.finish(session_id);
        }
    }

    /// Pause playback
    ///
    /// Engines have no real pause, so this stops the audio. Playback can
    /// only restart from the beginning with `speak`.
    pub fn pause(&self) {
        {
            let mut inner = self.shared.inner.lock();
            if inner.state != PlaybackState::Speaking {
                return;
            }
            inner.state = PlaybackState::Paused;
            inner.cancel = None;
        }

        info!("Pausing speech");
        self.stop_engine();
    }

    /// Resume is not available on any engine
    ///
    /// Always returns `Unsupported`; call `speak` to start over.
    pub fn resume(&self) -> Result<()> {
        info!("Resume not supported - use speak to restart");
        Err(ReadAloudError::Unsupported("Resume"))
    }

    /// Stop playback and return to Idle
    pub fn stop(&self) {
        {
            let mut inner = self.shared.inner.lock();
            if inner.state == PlaybackState::Idle {
                return;
            }
            inner.end_session();
        }

        info!("Stopping speech");
        self.stop_engine();
    }

    fn stop_engine(&self) {
        if let Some(engine) = &self.shared.engine {
            if let Err(e) = engine.lock().stop() {
                error!("Error stopping speech: {}", e);
            }
        }
    }

    /// Apply a setting to the engine, recording it on success
    fn configure<F, U>(&self, what: &str, apply: F, update: U)
    where
        F: FnOnce(&mut Box<dyn Synth>) -> Result<()>,
        U: FnOnce(&mut VoiceConfig),
    {
        let Some(engine) = &self.shared.engine else {
            warn!("Cannot set {}: no speech engine available", what);
            return;
        };

        let result = apply(&mut *engine.lock());
        match result {
            Ok(()) => update(&mut self.shared.inner.lock().voice),
            Err(e) => error!("Error setting {}: {}", what, e),
        }
    }

    /// Set the speaking rate in words per minute; clamped to 50 - 300
    pub fn set_rate(&self, rate: u32) {
        let rate = clamp_rate(rate);
        self.configure("rate", |synth| synth.set_rate(rate), |voice| voice.rate = rate);
    }

    /// Set the volume; values outside 0.0 - 1.0 are clamped
    pub fn set_volume(&self, volume: f32) {
        let volume = clamp_volume(volume);
        self.configure(
            "volume",
            |synth| synth.set_volume(volume),
            |voice| voice.volume = volume,
        );
    }

    /// Select a voice by id (see `voices`)
    pub fn set_voice(&self, voice_id: &str) {
        self.configure(
            "voice",
            |synth| synth.set_voice(voice_id),
            |voice| voice.voice_id = Some(voice_id.to_string()),
        );
    }

    /// Voices the engine offers, empty if they can't be listed
    pub fn voices(&self) -> Vec<VoiceInfo> {
        let Some(engine) = &self.shared.engine else {
            return Vec::new();
        };

        let result = engine.lock().voices();
        result.unwrap_or_else(|e| {
            error!("Error listing voices: {}", e);
            Vec::new()
        })
    }

    /// Highlight granularity for sessions started after this call
    pub fn set_highlight_mode(&self, mode: HighlightMode) {
        self.shared.inner.lock().highlight_mode = mode;
    }

    pub fn highlight_mode(&self) -> HighlightMode {
        self.shared.inner.lock().highlight_mode
    }

    /// Register the highlight callback, replacing any previous one
    ///
    /// Runs on the highlight thread, never while controller locks are held,
    /// so it may call back into the controller.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(usize, &str, usize) + Send + Sync + 'static,
    {
        self.shared.inner.lock().callback = Some(Arc::new(callback));
    }

    pub fn clear_callback(&self) {
        self.shared.inner.lock().callback = None;
    }

    /// Receive highlight events on a thread of the caller's choosing
    ///
    /// Each call creates a new subscription; it ends when the receiver is
    /// dropped.
    pub fn highlight_events(&self) -> Receiver<HighlightEvent> {
        let (tx, rx) = unbounded();
        self.shared.inner.lock().subscribers.push(tx);
        rx
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.inner.lock().state
    }

    /// True while speaking (not when paused)
    pub fn is_busy(&self) -> bool {
        self.state() == PlaybackState::Speaking
    }

    pub fn voice_config(&self) -> VoiceConfig {
        self.shared.inner.lock().voice.clone()
    }

    /// The running or paused session, if any
    pub fn session(&self) -> Option<Arc<PlaybackSession>> {
        self.shared.inner.lock().session.clone()
    }
}

impl Default for SpeechController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SpeechController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Worker thread body: start audio, run highlights, wait for the engine
fn run_session(
    shared: Arc<Shared>,
    session: Arc<PlaybackSession>,
    rate: u32,
    cancel: Receiver<()>,
) {
    let Some(engine) = &shared.engine else {
        return;
    };

    let started = {
        let mut synth = engine.lock();
        if !shared.is_current(session.id) {
            debug!("Session {} superseded before it started", session.id);
            return;
        }
        synth.speak(&session.text)
    };

    if let Err(e) = started {
        error!("Error in TTS: {}", e);
        shared.finish(session.id);
        return;
    }

    let highlighter = {
        let shared = Arc::clone(&shared);
        let session = Arc::clone(&session);
        let cancel = cancel.clone();
        thread::Builder::new()
            .name("readaloud-highlight".to_string())
            .spawn(move || run_highlights(shared, session, rate, cancel))
    };
    if let Err(e) = highlighter {
        warn!("Highlighting disabled, failed to start thread: {}", e);
    }

    let estimated = session.estimator.total_duration(rate);
    let start = Instant::now();

    // Some engines report not-speaking until audio actually begins
    let mut heard = false;

    loop {
        match cancel.recv_timeout(POLL_INTERVAL) {
            Err(RecvTimeoutError::Timeout) => {}
            _ => {
                debug!("Session {} cancelled", session.id);
                return;
            }
        }

        let speaking = engine.lock().is_speaking();
        match speaking {
            Ok(Some(true)) => heard = true,
            Ok(Some(false)) if heard => break,
            // Not started yet, or engine can't tell: allow the estimate
            Ok(_) if start.elapsed() < estimated => {}
            Ok(_) => break,
            Err(e) => {
                error!("Error in TTS: {}", e);
                break;
            }
        }
    }

    shared.finish(session.id);
}

/// Highlight thread body: fire events on the estimated timeline
fn run_highlights(
    shared: Arc<Shared>,
    session: Arc<PlaybackSession>,
    rate: u32,
    cancel: Receiver<()>,
) {
    let start = Instant::now();

    for event in session.estimator.timeline(rate, session.highlight_mode) {
        let wait = event.offset.saturating_sub(start.elapsed());
        if !wait.is_zero() {
            match cancel.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => {}
                _ => return,
            }
        }

        if !shared.deliver(session.id, &event) {
            return;
        }
    }
}
