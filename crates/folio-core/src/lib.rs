#![forbid(unsafe_code)]

//! Core: page events, the headless document model, and timing primitives.

pub mod debounce;
pub mod document;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod stagger;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
