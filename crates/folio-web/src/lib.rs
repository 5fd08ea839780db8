#![forbid(unsafe_code)]

//! `folio-web` runs a page model inside a browser shim.
//!
//! Nothing here blocks, spawns or reads a system clock: the embedding
//! script pushes events and says how much time has passed, which keeps the
//! crate usable on `wasm32-unknown-unknown`.
//!
//! The crate does not bind to `wasm-bindgen`. A JS shim owns the real DOM:
//! it forwards events into [`step_program::StepProgram`] and applies the
//! [`WebOutputs`] it takes back after each step.

pub mod step_program;

use core::fmt;
use core::time::Duration;

use folio_core::document::{Document, HostAction, Patch};

/// Misuse of the [`step_program::StepProgram`] lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// `step` was called before `init`.
    NotInitialized,
    /// `init` was called twice.
    AlreadyInitialized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotInitialized => "step program used before init",
            Self::AlreadyInitialized => "step program initialized twice",
        })
    }
}

impl std::error::Error for WebError {}

/// Page time, moved only by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Jump to `now`. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn advance(&mut self, by: Duration) {
        self.now = self.now.saturating_add(by);
    }
}

/// Outputs accumulated for the host since the last take.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WebOutputs {
    /// Document patches in render order.
    pub patches: Vec<Patch>,
    /// One-shot host actions in emission order.
    pub actions: Vec<HostAction>,
    /// Log lines written by the page.
    pub logs: Vec<String>,
    /// Last rendered document.
    pub last_document: Option<Document>,
    /// Whether the patches start from an empty page (first render).
    pub full_render: bool,
}

impl WebOutputs {
    /// Whether there is nothing for the host to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty() && self.actions.is_empty() && self.logs.is_empty()
    }
}
