#![forbid(unsafe_code)]

//! Project filtering by category with a two-phase fade.
//!
//! # Card phases
//!
//! ```text
//!             deselected              300 ms
//!   Visible ─────────────► FilteringOut ──────► Hidden
//!      ▲                        │                  │
//!      │ 50 ms                  │ reselected       │ reselected
//!      │                        ▼                  ▼
//!      └──────────────────── Revealing ◄───────────┘
//! ```
//!
//! Hiding is deferred so the fade-out can play; showing displays the card at
//! once and clears the faded style one short step later. Every transition
//! bumps the card's epoch and the timer carries the epoch it was scheduled
//! under, so a timer from an earlier selection never hides a card that has
//! been selected again.

use std::time::Duration;

use folio_core::document::{Document, ElementId};
use tracing::{debug, trace};

use crate::layout::{Card, FilterButton};

/// Filter value that matches every card.
pub const ALL: &str = "all";
/// Class on the selected filter button.
pub const ACTIVE_CLASS: &str = "active";
/// Class on cards that are faded out or fading.
pub const FILTERED_OUT_CLASS: &str = "filtered-out";

/// Presentation phase of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    /// Displayed and opaque.
    Visible,
    /// Displayed, still faded; becomes `Visible` shortly.
    Revealing,
    /// Displayed, fading out; becomes `Hidden` shortly.
    FilteringOut,
    /// Not displayed.
    Hidden,
}

impl CardPhase {
    /// Whether the card belongs to the selected set.
    #[must_use]
    pub const fn is_selected(self) -> bool {
        matches!(self, Self::Visible | Self::Revealing)
    }

    /// Whether the card takes up space on the page.
    #[must_use]
    pub const fn is_displayed(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Second half of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStep {
    /// `FilteringOut` → `Hidden`.
    Hide,
    /// `Revealing` → `Visible`.
    Reveal,
}

/// A deferred card transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTimer {
    pub card: usize,
    pub epoch: u64,
    pub step: FilterStep,
}

#[derive(Debug, Clone)]
struct CardState {
    id: ElementId,
    category: String,
    phase: CardPhase,
    epoch: u64,
}

/// Owns the selected filter and every card's phase.
#[derive(Debug, Clone)]
pub struct FilterController {
    buttons: Vec<FilterButton>,
    cards: Vec<CardState>,
    selected: String,
    out_delay: Duration,
    in_delay: Duration,
    stale_timers: u64,
}

impl FilterController {
    /// Start with every card visible and `all` selected.
    #[must_use]
    pub fn new(
        buttons: Vec<FilterButton>,
        cards: &[Card],
        out_delay: Duration,
        in_delay: Duration,
    ) -> Self {
        Self {
            buttons,
            cards: cards
                .iter()
                .map(|c| CardState {
                    id: c.id.clone(),
                    category: c.category.clone(),
                    phase: CardPhase::Visible,
                    epoch: 0,
                })
                .collect(),
            selected: ALL.to_owned(),
            out_delay,
            in_delay,
            stale_timers: 0,
        }
    }

    /// Filter value of the button `id`, if it is a filter button.
    #[must_use]
    pub fn button_filter(&self, id: &ElementId) -> Option<&str> {
        self.buttons
            .iter()
            .find(|b| &b.id == id)
            .map(|b| b.filter.as_str())
    }

    /// Select `filter` and return the timers to schedule.
    pub fn select(&mut self, filter: &str) -> Vec<(Duration, FilterTimer)> {
        debug!(filter, "filter selected");
        self.selected = filter.to_owned();

        let mut timers = Vec::new();
        for (index, card) in self.cards.iter_mut().enumerate() {
            let wanted = filter == ALL || card.category == filter;
            let (phase, step, delay) = match (wanted, card.phase) {
                (true, CardPhase::FilteringOut | CardPhase::Hidden) => {
                    (CardPhase::Revealing, FilterStep::Reveal, self.in_delay)
                }
                (false, CardPhase::Visible | CardPhase::Revealing) => {
                    (CardPhase::FilteringOut, FilterStep::Hide, self.out_delay)
                }
                _ => continue,
            };
            card.phase = phase;
            card.epoch += 1;
            timers.push((
                delay,
                FilterTimer {
                    card: index,
                    epoch: card.epoch,
                    step,
                },
            ));
        }
        timers
    }

    /// Complete a transition. Returns `false` for stale or unknown timers.
    pub fn on_timer(&mut self, timer: FilterTimer) -> bool {
        let Some(card) = self.cards.get_mut(timer.card) else {
            return false;
        };
        if card.epoch != timer.epoch {
            self.stale_timers += 1;
            trace!(card = %card.id, "stale filter timer ignored");
            return false;
        }
        card.phase = match (timer.step, card.phase) {
            (FilterStep::Hide, CardPhase::FilteringOut) => CardPhase::Hidden,
            (FilterStep::Reveal, CardPhase::Revealing) => CardPhase::Visible,
            _ => return false,
        };
        true
    }

    /// Currently selected filter.
    #[must_use]
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Phase of the card with `id`.
    #[must_use]
    pub fn phase(&self, id: &str) -> Option<CardPhase> {
        self.cards
            .iter()
            .find(|c| c.id.as_str() == id)
            .map(|c| c.phase)
    }

    /// Ids of cards whose phase is exactly `Visible`.
    pub fn visible_cards(&self) -> impl Iterator<Item = &ElementId> {
        self.cards
            .iter()
            .filter(|c| c.phase == CardPhase::Visible)
            .map(|c| &c.id)
    }

    /// Whether every card has finished its transition.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.cards
            .iter()
            .all(|c| matches!(c.phase, CardPhase::Visible | CardPhase::Hidden))
    }

    /// Timers that fired after a newer transition superseded them.
    #[must_use]
    pub fn stale_timers(&self) -> u64 {
        self.stale_timers
    }

    pub fn view(&self, doc: &mut Document) {
        for button in &self.buttons {
            doc.element_mut(&button.id)
                .set_class(ACTIVE_CLASS, button.filter == self.selected);
        }
        for card in &self.cards {
            doc.element_mut(&card.id)
                .set_class(FILTERED_OUT_CLASS, card.phase != CardPhase::Visible)
                .set_hidden(!card.phase.is_displayed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller() -> FilterController {
        let buttons = ["all", "ml", "web"]
            .into_iter()
            .map(|f| FilterButton {
                id: format!("filter-{f}").into(),
                filter: f.to_owned(),
            })
            .collect();
        let cards: Vec<Card> = [("a", "ml"), ("b", "web"), ("c", "ml")]
            .into_iter()
            .map(|(id, category)| Card {
                id: id.into(),
                category: category.to_owned(),
            })
            .collect();
        FilterController::new(buttons, &cards, ms(300), ms(50))
    }

    fn fire_all(f: &mut FilterController, timers: Vec<(Duration, FilterTimer)>) {
        for (_, t) in timers {
            f.on_timer(t);
        }
    }

    #[test]
    fn deselected_cards_fade_then_hide() {
        let mut f = controller();
        let timers = f.select("ml");
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].0, ms(300));
        assert_eq!(f.phase("b"), Some(CardPhase::FilteringOut));

        fire_all(&mut f, timers);
        assert_eq!(f.phase("b"), Some(CardPhase::Hidden));
        let visible: Vec<_> = f.visible_cards().map(ElementId::as_str).collect();
        assert_eq!(visible, vec!["a", "c"]);
    }

    #[test]
    fn reselected_cards_reveal_after_short_step() {
        let mut f = controller();
        let hide = f.select("web");
        fire_all(&mut f, hide);
        assert_eq!(f.phase("a"), Some(CardPhase::Hidden));

        let show = f.select(ALL);
        assert!(show.iter().all(|(d, t)| *d == ms(50) && t.step == FilterStep::Reveal));
        assert_eq!(f.phase("a"), Some(CardPhase::Revealing));
        fire_all(&mut f, show);
        assert!(f.is_settled());
        assert_eq!(f.visible_cards().count(), 3);
    }

    #[test]
    fn stale_hide_does_not_hide_reselected_card() {
        let mut f = controller();
        let hide = f.select("web");
        let show = f.select(ALL);
        // The old hide timers fire after the reselection.
        fire_all(&mut f, hide);
        assert_eq!(f.stale_timers(), 2);
        assert_eq!(f.phase("a"), Some(CardPhase::Revealing));
        fire_all(&mut f, show);
        assert_eq!(f.phase("a"), Some(CardPhase::Visible));
    }

    #[test]
    fn selecting_the_same_filter_twice_is_a_no_op() {
        let mut f = controller();
        let first = f.select("ml");
        fire_all(&mut f, first);
        assert!(f.select("ml").is_empty());
    }

    #[test]
    fn view_marks_buttons_and_cards() {
        let mut f = controller();
        let timers = f.select("ml");

        let mut doc = Document::new();
        f.view(&mut doc);
        assert!(doc.has_class("filter-ml", ACTIVE_CLASS));
        assert!(!doc.has_class("filter-all", ACTIVE_CLASS));
        assert!(doc.has_class("b", FILTERED_OUT_CLASS));
        assert!(!doc.element("b").unwrap().is_hidden());

        fire_all(&mut f, timers);
        let mut doc = Document::new();
        f.view(&mut doc);
        assert!(doc.element("b").unwrap().is_hidden());
        assert!(!doc.has_class("a", FILTERED_OUT_CLASS));
    }

    #[test]
    fn button_lookup() {
        let f = controller();
        assert_eq!(f.button_filter(&"filter-web".into()), Some("web"));
        assert_eq!(f.button_filter(&"project-0".into()), None);
    }
}
