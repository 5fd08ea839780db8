#![forbid(unsafe_code)]

//! Scroll-driven navigation state: the navbar `scrolled` flag, the active
//! section, and smooth-scroll targets for nav links.
//!
//! The `scrolled` flag follows every scroll event. The active section is
//! recomputed on the trailing edge of a short debounce window, so a fling
//! produces one recomputation instead of hundreds.

use std::time::Duration;

use folio_core::debounce::{DebounceTicket, Debouncer};
use folio_core::document::{Document, ElementId};
use tracing::debug;

use crate::config::PageConfig;
use crate::error::{PageError, PageResult};
use crate::layout::{NavLink, PageLayout, Section};

/// Class on the navbar while the page is scrolled.
pub const SCROLLED_CLASS: &str = "scrolled";
/// Class on the nav link of the active section.
pub const ACTIVE_CLASS: &str = "active";

/// Active section at scroll offset `y`.
///
/// The last section whose top is at or above `y + header_offset`; near the
/// top of the page (`y < header_offset`) the first section.
#[must_use]
pub fn active_section_at(sections: &[Section], y: u32, header_offset: u32) -> Option<&ElementId> {
    if y < header_offset {
        return sections.first().map(|s| &s.id);
    }
    let probe = y.saturating_add(header_offset);
    sections
        .iter()
        .rev()
        .find(|s| s.span.top <= probe)
        .map(|s| &s.id)
}

/// Smooth-scroll destination for an in-page anchor (`#about`).
pub fn scroll_target(layout: &PageLayout, href: &str, nav_height: u32) -> PageResult<u32> {
    let target = href
        .strip_prefix('#')
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PageError::UnknownTarget(href.to_owned()))?;
    let section = layout
        .section(target)
        .ok_or_else(|| PageError::UnknownTarget(href.to_owned()))?;
    Ok(section.span.top.saturating_sub(nav_height))
}

/// Tracks scroll position and the section it falls in.
#[derive(Debug)]
pub struct ScrollTracker {
    sections: Vec<Section>,
    links: Vec<NavLink>,
    navbar: Option<ElementId>,
    header_offset: u32,
    scrolled_threshold: u32,
    scroll_y: u32,
    scrolled: bool,
    active: Option<ElementId>,
    debouncer: Debouncer<u32>,
    recomputes: u64,
}

impl ScrollTracker {
    /// Create a tracker at the top of the page.
    #[must_use]
    pub fn new(layout: &PageLayout, config: &PageConfig) -> Self {
        let mut tracker = Self {
            sections: layout.sections.clone(),
            links: layout.nav_links.clone(),
            navbar: layout.ids.navbar.clone(),
            header_offset: config.header_offset,
            scrolled_threshold: config.scrolled_threshold,
            scroll_y: 0,
            scrolled: false,
            active: None,
            debouncer: Debouncer::new(config.scroll_debounce),
            recomputes: 0,
        };
        tracker.recompute(0);
        tracker
    }

    /// Record a scroll event. Returns the ticket to settle after the debounce window.
    pub fn on_scroll(&mut self, y: u32) -> DebounceTicket {
        self.scroll_y = y;
        self.scrolled = y > self.scrolled_threshold;
        self.debouncer.push(y)
    }

    /// Debounce window length.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debouncer.wait()
    }

    /// Settle a debounce ticket. Returns `true` if the active section changed.
    pub fn settle(&mut self, ticket: DebounceTicket) -> bool {
        match self.debouncer.settle(ticket) {
            Some(y) => self.recompute(y),
            None => false,
        }
    }

    fn recompute(&mut self, y: u32) -> bool {
        self.recomputes += 1;
        let next = active_section_at(&self.sections, y, self.header_offset).cloned();
        if next == self.active {
            return false;
        }
        debug!(from = ?self.active, to = ?next, y, "active section changed");
        self.active = next;
        true
    }

    /// Current active section.
    #[must_use]
    pub fn active(&self) -> Option<&ElementId> {
        self.active.as_ref()
    }

    /// Whether the navbar shows its scrolled style.
    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Last reported scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    /// Number of active-section recomputations (including the initial one).
    #[must_use]
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    pub fn view(&self, doc: &mut Document) {
        if let Some(navbar) = &self.navbar {
            doc.element_mut(navbar).set_class(SCROLLED_CLASS, self.scrolled);
        }
        for link in &self.links {
            let active = match (link.target(), &self.active) {
                (Some(target), Some(active)) => target == active.as_str(),
                _ => false,
            };
            doc.element_mut(&link.id).set_class(ACTIVE_CLASS, active);
        }
    }
}
