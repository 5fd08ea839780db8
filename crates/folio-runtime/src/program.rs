#![forbid(unsafe_code)]

//! Elm-style program contract for page models.
//!
//! A page separates state ([`Model`]) from rendering ([`Model::view`]) and
//! expresses every side effect as a [`Cmd`]: follow-up messages, timers, log
//! lines and one-shot host actions. The runner (the test
//! [`ProgramSimulator`](crate::simulator::ProgramSimulator) or the host-driven
//! step program in `folio-web`) executes the commands; the model never
//! touches a clock, a timer API, or the live page.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use folio_core::document::Document;
//! use folio_core::event::Event;
//! use folio_runtime::program::{Cmd, Model};
//!
//! struct Blink {
//!     on: bool,
//! }
//!
//! enum Msg {
//!     Toggle,
//!     Ignore,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(_: Event) -> Self {
//!         Msg::Ignore
//!     }
//! }
//!
//! impl Model for Blink {
//!     type Message = Msg;
//!
//!     fn init(&mut self) -> Cmd<Msg> {
//!         Cmd::after(Duration::from_millis(500), Msg::Toggle)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Toggle => {
//!                 self.on = !self.on;
//!                 Cmd::after(Duration::from_millis(500), Msg::Toggle)
//!             }
//!             Msg::Ignore => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self, doc: &mut Document) {
//!         doc.element_mut("cursor").set_class("on", self.on);
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use folio_core::document::{Document, HostAction};
use folio_core::event::Event;

/// Page state plus the rules that change it.
pub trait Model: Sized {
    /// Everything `update` can receive. Raw page events convert into it.
    type Message: From<Event> + 'static;

    /// Runs once, before the first render. Start timers and read stored
    /// preferences here.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Describe the whole presentational state. `doc` is empty on entry;
    /// the runner diffs successive documents.
    fn view(&self, doc: &mut Document);
}

/// Side effects requested by a model, carried out by the runner.
#[derive(Default)]
pub enum Cmd<M> {
    #[default]
    None,
    /// Stop the program (page unloaded). Pending timers never fire.
    Quit,
    /// Run in order; stops early at a `Quit`.
    Batch(Vec<Cmd<M>>),
    /// Feed a message back into `update` right away.
    Msg(M),
    /// Deliver a message after a delay.
    ///
    /// Timers are never cancelled. Models that may no longer want the
    /// message carry a generation or epoch inside it and ignore stale ones.
    After(Duration, M),
    /// Ask the host to perform a one-shot imperative action.
    Host(HostAction),
    /// Append a line to the page's console log.
    Log(String),
}

impl<M: fmt::Debug> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None | Self::Quit => f.write_str(self.type_name()),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(msg) => f.debug_tuple("Msg").field(msg).finish(),
            Self::After(delay, msg) => f.debug_tuple("After").field(delay).field(msg).finish(),
            Self::Host(action) => f.debug_tuple("Host").field(action).finish(),
            Self::Log(line) => f.debug_tuple("Log").field(line).finish(),
        }
    }
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(msg: M) -> Self {
        Self::Msg(msg)
    }

    /// Deliver `msg` once `delay` has passed.
    #[inline]
    pub fn after(delay: Duration, msg: M) -> Self {
        Self::After(delay, msg)
    }

    #[inline]
    pub fn host(action: HostAction) -> Self {
        Self::Host(action)
    }

    #[inline]
    pub fn log(line: impl Into<String>) -> Self {
        Self::Log(line.into())
    }

    /// Combine commands. `None` entries are dropped; an empty batch collapses to `None` and a
    /// single command is returned unwrapped.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Whether this is the no-op command.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Variant name for log fields.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::After(..) => "After",
            Self::Host(_) => "Host",
            Self::Log(_) => "Log",
        }
    }

    /// Transform the message type, e.g. to embed a controller's commands in
    /// an application message enum.
    pub fn map<N>(self, f: impl Fn(M) -> N + Copy) -> Cmd<N> {
        match self {
            Self::None => Cmd::None,
            Self::Quit => Cmd::Quit,
            Self::Batch(cmds) => Cmd::Batch(cmds.into_iter().map(|c| c.map(f)).collect()),
            Self::Msg(m) => Cmd::Msg(f(m)),
            Self::After(d, m) => Cmd::After(d, f(m)),
            Self::Host(a) => Cmd::Host(a),
            Self::Log(s) => Cmd::Log(s),
        }
    }
}
