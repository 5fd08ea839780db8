#![forbid(unsafe_code)]

//! Hero typewriter: types a phrase, pauses, deletes it, moves to the next.
//!
//! # State machine
//!
//! ```text
//!            tick: chars += 1            tick: chars -= 1
//!          ┌──────────────┐            ┌──────────────┐
//!          ▼              │            ▼              │
//!      ┌────────┐  chars == len   ┌──────────┐        │
//!      │ Typing │ ──────────────► │ Deleting │ ───────┘
//!      └────────┘   (end pause)   └──────────┘
//!          ▲                           │ chars == 0
//!          └───────────────────────────┘ (next phrase, short pause)
//! ```
//!
//! Lengths are counted in grapheme clusters so a phrase never renders half
//! a character. The sequencer runs until the page unloads; an empty phrase
//! list disables it.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::TypewriterTiming;

/// Direction of the current pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMode {
    Typing,
    Deleting,
}

/// Phrase cycle state.
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<String>,
    phrase: usize,
    chars: usize,
    mode: TypeMode,
    delay: Duration,
    timing: TypewriterTiming,
    cycles: u64,
}

impl Typewriter {
    /// Create a sequencer at the start of the first phrase.
    #[must_use]
    pub fn new(phrases: Vec<String>, timing: TypewriterTiming) -> Self {
        Self {
            phrases,
            phrase: 0,
            chars: 0,
            mode: TypeMode::Typing,
            delay: timing.start_delay,
            timing,
            cycles: 0,
        }
    }

    /// Whether there is anything to type.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.phrases.is_empty()
    }

    /// Delay before the first tick.
    #[must_use]
    pub fn start_delay(&self) -> Duration {
        self.timing.start_delay
    }

    /// Advance one character and return the delay until the next tick.
    pub fn tick(&mut self) -> Duration {
        let Some(len) = self.current_len() else {
            return self.delay;
        };

        match self.mode {
            TypeMode::Deleting => {
                self.chars = self.chars.saturating_sub(1);
                self.delay = self.timing.deleting;
            }
            TypeMode::Typing => {
                self.chars = (self.chars + 1).min(len);
                self.delay = self.timing.typing;
            }
        }

        if self.mode == TypeMode::Typing && self.chars == len {
            self.delay = self.timing.end_pause;
            self.mode = TypeMode::Deleting;
        } else if self.mode == TypeMode::Deleting && self.chars == 0 {
            self.mode = TypeMode::Typing;
            self.phrase = (self.phrase + 1) % self.phrases.len();
            self.delay = self.timing.next_phrase_pause;
            self.cycles += 1;
        }
        self.delay
    }

    /// The visible prefix of the current phrase.
    #[must_use]
    pub fn text(&self) -> String {
        self.phrases
            .get(self.phrase)
            .map(|p| p.graphemes(true).take(self.chars).collect())
            .unwrap_or_default()
    }

    /// Index of the current phrase.
    #[must_use]
    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    /// Number of visible grapheme clusters.
    #[must_use]
    pub fn char_index(&self) -> usize {
        self.chars
    }

    #[must_use]
    pub fn mode(&self) -> TypeMode {
        self.mode
    }

    /// Delay chosen by the last tick.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Completed type-and-delete cycles.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Grapheme length of the current phrase.
    #[must_use]
    pub fn current_len(&self) -> Option<usize> {
        self.phrases
            .get(self.phrase)
            .map(|p| p.graphemes(true).count())
    }
}
