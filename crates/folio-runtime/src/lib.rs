#![forbid(unsafe_code)]

//! Folio runtime
//!
//! The runtime ties page events from `folio-core` to a page [`Model`]:
//! it drives `Model::update`, schedules `Cmd::After` timers on a
//! deterministic clock, and keeps durable preferences.
//!
//! # Key Components
//!
//! - [`Model`] - Trait for page state and behavior
//! - [`Cmd`] - Commands for side effects
//! - [`TimerQueue`] - Deadline-ordered timer messages
//! - [`ProgramSimulator`] - Headless runner for tests and replays
//! - [`StateRegistry`] - Cached preferences over a [`StorageBackend`]

pub mod program;
pub mod simulator;
pub mod state_persistence;
pub mod timer;

pub use program::{Cmd, Model};
pub use simulator::{CmdRecord, ProgramSimulator};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{
    MemoryStorage, StateRegistry, StorageBackend, StorageError, StorageResult, StoredEntry,
    UnavailableStorage,
};
pub use timer::TimerQueue;
