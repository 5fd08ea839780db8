#![forbid(unsafe_code)]

//! Canonical page events.
//!
//! The host translates browser input (DOM events, observer callbacks, the
//! window `load` signal) into these types and pushes them into the runtime.
//! All events derive `Clone` and `PartialEq` for use in tests and replays.
//!
//! # Design Notes
//!
//! - Clicks carry the target plus its ancestor path so "inside/outside"
//!   checks need no DOM access.
//! - Scroll offsets and viewport sizes are CSS pixels.
//! - `KeyEventKind` defaults to `Press`.

use bitflags::bitflags;

use crate::document::ElementId;

/// Canonical page event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
    /// A click, with the target's ancestor path.
    Click(ClickEvent),
    /// The window scrolled to vertical offset `y`.
    Scroll { y: u32 },
    /// The viewport was resized.
    Resize { width: u32, height: u32 },
    /// An observed element's visible ratio changed.
    Intersection(IntersectionEntry),
    /// A form was submitted.
    Submit(FormData),
    /// The window `load` signal.
    Loaded,
    /// The page is being torn down.
    Unload,
    /// A frame tick from the host.
    Tick,
}

/// A `keydown`/`keyup` on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
    /// The focused element accepts text (`input`, `textarea`).
    pub editable_target: bool,
}

impl KeyEvent {
    /// A bare press, outside any text field.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
            editable_target: false,
        }
    }

    #[must_use]
    pub const fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    #[must_use]
    pub const fn with_kind(self, kind: KeyEventKind) -> Self {
        Self { kind, ..self }
    }

    #[must_use]
    pub const fn in_editable(self, editable_target: bool) -> Self {
        Self {
            editable_target,
            ..self
        }
    }

    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    /// `t` and `T` both match `'t'`.
    #[must_use]
    pub fn is_char_ignore_case(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(typed) if typed.eq_ignore_ascii_case(&c))
    }

    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// The keys the page reacts to, plus enough neighbours to describe what it
/// ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable key.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// `keydown`.
    #[default]
    Press,
    /// `keydown` with `repeat` set.
    Repeat,
    /// `keyup`.
    Release,
}

bitflags! {
    /// `shiftKey`, `altKey`, `ctrlKey` and `metaKey` as flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0;
        const SHIFT = 1;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        const META  = 1 << 3;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

/// A click on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// The innermost element that received the click.
    pub target: ElementId,
    /// Ancestors of the target, innermost first. Does not include `target`.
    pub ancestors: Vec<ElementId>,
}

impl ClickEvent {
    /// Click on an element with no known ancestors.
    #[must_use]
    pub fn on(target: impl Into<ElementId>) -> Self {
        Self {
            target: target.into(),
            ancestors: Vec::new(),
        }
    }

    /// Add an ancestor (call innermost first).
    #[must_use]
    pub fn within(mut self, ancestor: impl Into<ElementId>) -> Self {
        self.ancestors.push(ancestor.into());
        self
    }

    /// Whether the click landed on `id` or one of its descendants.
    #[must_use]
    pub fn hits(&self, id: &ElementId) -> bool {
        &self.target == id || self.ancestors.iter().any(|a| a == id)
    }

    /// Target followed by its ancestors, innermost first.
    pub fn path(&self) -> impl Iterator<Item = &ElementId> {
        std::iter::once(&self.target).chain(self.ancestors.iter())
    }
}

/// One intersection-observer record.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    /// The observed element.
    pub target: ElementId,
    /// Fraction of the element inside the (margin-adjusted) viewport, in [0, 1].
    pub ratio: f32,
}

impl IntersectionEntry {
    /// Create an entry, clamping `ratio` into [0, 1] (NaN becomes 0).
    #[must_use]
    pub fn new(target: impl Into<ElementId>, ratio: f32) -> Self {
        let ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };
        Self {
            target: target.into(),
            ratio,
        }
    }

    /// Whether any part of the element is inside the viewport.
    #[must_use]
    pub fn is_intersecting(&self) -> bool {
        self.ratio > 0.0
    }
}

/// Named fields of a submitted form, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormData {
    /// The submitted form element.
    pub form: ElementId,
    fields: Vec<(String, String)>,
}

impl FormData {
    /// Empty submission for `form`.
    #[must_use]
    pub fn new(form: impl Into<ElementId>) -> Self {
        Self {
            form: form.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Value of the first field named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields were submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
