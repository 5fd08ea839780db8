#![forbid(unsafe_code)]

//! Mobile hamburger menu.
//!
//! One boolean, changed only by discrete user intents: the hamburger
//! toggles it; a click outside both the hamburger and the menu, a nav link
//! click, Escape, or the viewport widening past the mobile breakpoint close
//! it. Resize is debounced on the trailing edge.

use std::time::Duration;

use folio_core::debounce::{DebounceTicket, Debouncer};
use folio_core::document::{Document, ElementId};
use folio_core::event::ClickEvent;
use tracing::debug;

/// Class on both the hamburger and the menu while open.
pub const OPEN_CLASS: &str = "active";

/// What a click did to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuClick {
    /// The hamburger was clicked.
    Toggled,
    /// The click landed outside hamburger and menu.
    ClosedOutside,
    /// The click landed inside the menu.
    Inside,
}

/// Why the menu closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    OutsideClick,
    LinkClick,
    Escape,
    Resize,
}

#[derive(Debug)]
pub struct MenuController {
    hamburger: ElementId,
    menu: ElementId,
    open: bool,
    breakpoint: u32,
    resize: Debouncer<u32>,
}

impl MenuController {
    /// Create a closed menu.
    #[must_use]
    pub fn new(
        hamburger: ElementId,
        menu: ElementId,
        breakpoint: u32,
        resize_debounce: Duration,
    ) -> Self {
        Self {
            hamburger,
            menu,
            open: false,
            breakpoint,
            resize: Debouncer::new(resize_debounce),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip open/closed.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        debug!(open = self.open, "mobile menu toggled");
        self.open
    }

    /// Force the menu closed. Returns whether it was open.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        let was_open = std::mem::replace(&mut self.open, false);
        if was_open {
            debug!(?reason, "mobile menu closed");
        }
        was_open
    }

    /// Route a document click.
    pub fn on_click(&mut self, click: &ClickEvent) -> MenuClick {
        if click.hits(&self.hamburger) {
            self.toggle();
            MenuClick::Toggled
        } else if click.hits(&self.menu) {
            MenuClick::Inside
        } else {
            self.close(CloseReason::OutsideClick);
            MenuClick::ClosedOutside
        }
    }

    /// Record a viewport resize. Settle the ticket after [`resize_debounce`](Self::resize_debounce).
    pub fn on_resize(&mut self, width: u32) -> DebounceTicket {
        self.resize.push(width)
    }

    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        self.resize.wait()
    }

    /// Apply the last width of a resize burst. Returns whether the menu closed.
    pub fn settle_resize(&mut self, ticket: DebounceTicket) -> bool {
        match self.resize.settle(ticket) {
            Some(width) if width > self.breakpoint => self.close(CloseReason::Resize),
            _ => false,
        }
    }

    pub fn view(&self, doc: &mut Document) {
        doc.element_mut(&self.hamburger).set_class(OPEN_CLASS, self.open);
        doc.element_mut(&self.menu).set_class(OPEN_CLASS, self.open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> MenuController {
        MenuController::new(
            "hamburger".into(),
            "nav-menu".into(),
            768,
            Duration::from_millis(250),
        )
    }

    #[test]
    fn hamburger_toggles() {
        let mut m = menu();
        let bars = ClickEvent::on("bar-2").within("hamburger");
        assert_eq!(m.on_click(&bars), MenuClick::Toggled);
        assert!(m.is_open());
        assert_eq!(m.on_click(&bars), MenuClick::Toggled);
        assert!(!m.is_open());
    }

    #[test]
    fn outside_click_closes_inside_click_does_not() {
        let mut m = menu();
        m.toggle();
        assert_eq!(
            m.on_click(&ClickEvent::on("menu-logo").within("nav-menu")),
            MenuClick::Inside
        );
        assert!(m.is_open());
        assert_eq!(m.on_click(&ClickEvent::on("hero")), MenuClick::ClosedOutside);
        assert!(!m.is_open());
    }

    #[test]
    fn only_the_last_wide_resize_closes() {
        let mut m = menu();
        m.toggle();
        let wide = m.on_resize(1_024);
        let narrow = m.on_resize(600);
        assert!(!m.settle_resize(wide));
        assert!(!m.settle_resize(narrow));
        assert!(m.is_open());

        let t = m.on_resize(769);
        assert!(m.settle_resize(t));
        assert!(!m.is_open());
    }

    #[test]
    fn breakpoint_width_itself_keeps_menu() {
        let mut m = menu();
        m.toggle();
        let t = m.on_resize(768);
        assert!(!m.settle_resize(t));
        assert!(m.is_open());
    }

    #[test]
    fn close_reports_previous_state() {
        let mut m = menu();
        assert!(!m.close(CloseReason::Escape));
        m.toggle();
        assert!(m.close(CloseReason::Escape));
    }

    #[test]
    fn view_marks_both_elements() {
        let mut m = menu();
        m.toggle();
        let mut doc = Document::new();
        m.view(&mut doc);
        assert!(doc.has_class("hamburger", OPEN_CLASS));
        assert!(doc.has_class("nav-menu", OPEN_CLASS));
    }
}
