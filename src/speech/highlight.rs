//! Word timing estimates for highlighting
//!
//! Engines don't tell us which word is being spoken, so the timeline here
//! is an estimate built from the text and the speaking rate alone. It
//! starts when audio starts and never looks at real audio progress, so it
//! can drift ahead of or behind what is audible.

use crate::settings::HighlightMode;
use std::time::Duration;

/// One highlight step: the word believed to be spoken at `offset`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightEvent {
    pub word_index: usize,
    pub word: String,
    pub line_index: usize,

    /// Time after the start of playback at which the word begins
    pub offset: Duration,
}

/// Word and line boundaries of a text, precomputed once per session
#[derive(Debug, Clone, Default)]
pub struct HighlightEstimator {
    words: Vec<String>,
    lines: Vec<String>,

    /// Estimated character offset of each word
    word_offsets: Vec<usize>,

    /// Cumulative character count at the end of each line, newline included
    line_ends: Vec<usize>,
}

impl HighlightEstimator {
    pub fn new(text: &str) -> Self {
        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();

        let mut word_offsets = Vec::with_capacity(words.len());
        let mut pos = 0;
        for word in &words {
            word_offsets.push(pos);
            pos += word.chars().count() + 1;
        }

        let mut line_ends = Vec::with_capacity(lines.len());
        let mut running = 0;
        for line in &lines {
            running += line.chars().count() + 1;
            line_ends.push(running);
        }

        Self {
            words,
            lines,
            word_offsets,
            line_ends,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Line that the estimated offset of `word_index` falls on
    pub fn line_index(&self, word_index: usize) -> usize {
        let Some(&pos) = self.word_offsets.get(word_index) else {
            return 0;
        };

        self.line_ends
            .iter()
            .position(|&end| pos < end)
            .unwrap_or_else(|| self.line_ends.len().saturating_sub(1))
    }

    /// Estimated duration of every word at `rate` words per minute
    ///
    /// Each word gets the average per-word time scaled by its length, so
    /// the total is always `words * 60 / rate` seconds.
    pub fn word_durations(&self, rate: u32) -> Vec<Duration> {
        if self.words.is_empty() {
            return Vec::new();
        }

        let per_word = 60.0 / rate.max(1) as f64;
        let weights: Vec<f64> = self
            .words
            .iter()
            .map(|w| (w.chars().count() + 1) as f64)
            .collect();
        let mean = weights.iter().sum::<f64>() / weights.len() as f64;

        weights
            .iter()
            .map(|weight| Duration::from_secs_f64(per_word * weight / mean))
            .collect()
    }

    /// Estimated length of the whole text when spoken at `rate`
    pub fn total_duration(&self, rate: u32) -> Duration {
        self.word_durations(rate).into_iter().sum()
    }

    /// Highlight events for a playback at `rate`
    ///
    /// Word mode yields one event per word. Line mode yields one event per
    /// line change, carrying the first word on the new line.
    pub fn timeline(&self, rate: u32, mode: HighlightMode) -> Vec<HighlightEvent> {
        let mut events = Vec::with_capacity(self.words.len());
        let mut offset = Duration::ZERO;
        let mut last_line = None;

        for (idx, (word, duration)) in self
            .words
            .iter()
            .zip(self.word_durations(rate))
            .enumerate()
        {
            let line_index = self.line_index(idx);
            let emit = match mode {
                HighlightMode::Word => true,
                HighlightMode::Line => last_line != Some(line_index),
            };

            if emit {
                events.push(HighlightEvent {
                    word_index: idx,
                    word: word.clone(),
                    line_index,
                    offset,
                });
            }

            last_line = Some(line_index);
            offset += duration;
        }

        events
    }
}
