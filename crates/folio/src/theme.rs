#![forbid(unsafe_code)]

//! Colour theme and its persisted preference.
//!
//! The page root carries `data-color-scheme="dark|light"`. The choice is
//! stored under a single key and read back on the next page load. Storage
//! that is unavailable or holds garbage never breaks the page: the theme
//! falls back to dark for the session and the failure is logged.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use folio_core::document::{Document, ElementId};
use folio_runtime::state_persistence::StateRegistry;
use tracing::{debug, info, warn};

use crate::error::PageResult;

/// Root attribute that mirrors the active theme.
pub const SCHEME_ATTR: &str = "data-color-scheme";

/// Schema version of the stored theme value.
const THEME_VERSION: u32 = 1;

/// Colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Stored and rendered name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Toggle icon: the sun offers to leave dark mode, the moon to leave light mode.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Dark => "\u{2600}\u{fe0f}",
            Self::Light => "\u{1f319}",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a stored value that names no theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme {:?}", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(UnknownTheme(other.to_owned())),
        }
    }
}

/// Durable theme flag over a [`StateRegistry`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    registry: Arc<StateRegistry>,
    key: String,
}

impl PreferenceStore {
    /// Create a store for `key` and read the backend once.
    ///
    /// A backend that cannot be read leaves the store empty, so [`get`](Self::get)
    /// returns the default.
    pub fn open(registry: Arc<StateRegistry>, key: impl Into<String>) -> Self {
        let store = Self {
            registry,
            key: key.into(),
        };
        if let Err(e) = store.registry.load() {
            warn!(
                backend = store.registry.backend_name(),
                error = %e,
                "theme preference unreadable, using default"
            );
        }
        store
    }

    /// The persisted theme, or dark when unset or unrecognised.
    #[must_use]
    pub fn get(&self) -> Theme {
        match self.registry.value(&self.key) {
            None => Theme::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e: UnknownTheme| {
                warn!(key = %self.key, error = %e, "ignoring stored theme");
                Theme::default()
            }),
        }
    }

    /// Persist `theme`. Setting the stored value again writes nothing.
    pub fn set(&self, theme: Theme) -> PageResult<()> {
        self.registry.set(&self.key, THEME_VERSION, theme.as_str());
        if self.registry.flush()? {
            debug!(key = %self.key, theme = %theme, "theme preference saved");
        }
        Ok(())
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Owns the active theme and keeps the store in sync.
#[derive(Debug)]
pub struct ThemeController {
    store: PreferenceStore,
    current: Theme,
    toggle: Option<ElementId>,
    icon: Option<ElementId>,
}

impl ThemeController {
    /// Apply the persisted theme.
    pub fn new(store: PreferenceStore, toggle: Option<ElementId>, icon: Option<ElementId>) -> Self {
        let current = store.get();
        Self {
            store,
            current,
            toggle,
            icon,
        }
    }

    /// The active theme.
    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Whether `id` is the toggle control.
    #[must_use]
    pub fn is_toggle(&self, id: &ElementId) -> bool {
        self.toggle.as_ref() == Some(id)
    }

    /// Whether a toggle control exists on the page.
    #[must_use]
    pub fn has_toggle(&self) -> bool {
        self.toggle.is_some()
    }

    /// Switch to the other theme and persist it.
    ///
    /// A failed write keeps the new theme for this session.
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        if let Err(e) = self.store.set(self.current) {
            warn!(error = %e, "theme preference not saved");
        }
        info!(theme = %self.current, "theme switched");
        self.current
    }

    /// Render the root attribute and the toggle icon.
    pub fn view(&self, doc: &mut Document) {
        doc.set_root_attr(SCHEME_ATTR, self.current.as_str());
        if let Some(icon) = &self.icon {
            doc.element_mut(icon).set_text(self.current.icon());
        }
    }
}
