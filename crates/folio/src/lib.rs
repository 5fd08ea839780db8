#![forbid(unsafe_code)]

//! Portfolio page interactivity as a deterministic, host-driven model.
//!
//! The host (a browser shim, a test, or the `folio-demo` binary) pushes
//! page events into a runner, advances the clock, and applies the
//! resulting document patches and host actions. [`PortfolioApp`] owns the
//! page state and routes events to one controller per concern:
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`theme`] | dark/light theme and its stored preference |
//! | [`typewriter`] | hero phrase cycle |
//! | [`navigation`] | navbar `scrolled` flag, active section, anchor scrolling |
//! | [`menu`] | mobile hamburger menu |
//! | [`filter`] | project filtering with two-phase fades |
//! | [`skills`] | one-shot skill bar fill |
//! | [`visibility`] | fade-in blocks, lazy images, hero entrance |
//! | [`contact`] | form validation, simulated submit, success toast |
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use folio::{PageConfig, PageLayout, PortfolioApp};
//! use folio_core::event::Event;
//! use folio_runtime::{ProgramSimulator, StateRegistry};
//!
//! let app = PortfolioApp::new(
//!     PageConfig::default(),
//!     PageLayout::portfolio(),
//!     StateRegistry::in_memory().shared(),
//! );
//! let mut sim = ProgramSimulator::new(app);
//! sim.init();
//! sim.inject_event(Event::Scroll { y: 950 });
//! sim.advance(Duration::from_millis(10));
//! assert_eq!(sim.model().scroll().active().map(|s| s.as_str()), Some("about"));
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod filter;
pub mod layout;
pub mod menu;
pub mod navigation;
pub mod skills;
pub mod theme;
pub mod tour;
pub mod typewriter;
pub mod visibility;

pub use app::{Msg, PortfolioApp};
pub use config::{PageConfig, ToastTiming, TypewriterTiming};
pub use contact::{validate, ContactFields, Field, Validation};
pub use error::{PageError, PageResult};
pub use layout::PageLayout;
pub use theme::Theme;
