#![forbid(unsafe_code)]

//! One-way visibility flags.
//!
//! Three watchers share the same shape: a flag per element that can only go
//! from off to on.
//!
//! - [`VisibilityTracker`]: `fade-in` blocks become `visible` once their
//!   intersection ratio reaches the threshold.
//! - [`LazyImages`]: deferred images get their real `src` and a `loaded`
//!   class on first intersection.
//! - [`HeroEntrance`]: after the window load signal and a short delay, the
//!   hero elements become `visible` one after another.

use std::collections::BTreeMap;
use std::time::Duration;

use folio_core::document::{Document, ElementId};
use folio_core::event::IntersectionEntry;
use folio_core::stagger::stagger_offset;
use tracing::{debug, trace};

use crate::layout::LazyImage;

pub const FADE_IN_CLASS: &str = "fade-in";
pub const VISIBLE_CLASS: &str = "visible";
pub const LOADED_CLASS: &str = "loaded";

/// Watches `fade-in` blocks.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    threshold: f32,
    observed: BTreeMap<ElementId, bool>,
}

impl VisibilityTracker {
    /// Tag and observe `ids`.
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a ElementId>, threshold: f32) -> Self {
        Self {
            threshold,
            observed: ids.into_iter().map(|id| (id.clone(), false)).collect(),
        }
    }

    /// Apply an intersection record. Returns `true` if the element just became visible.
    pub fn on_intersection(&mut self, entry: &IntersectionEntry) -> bool {
        let Some(visible) = self.observed.get_mut(&entry.target) else {
            return false;
        };
        if *visible || !entry.is_intersecting() || entry.ratio < self.threshold {
            return false;
        }
        *visible = true;
        trace!(element = %entry.target, ratio = entry.ratio, "element visible");
        true
    }

    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.observed
            .get(&ElementId::from(id))
            .copied()
            .unwrap_or(false)
    }

    /// Number of elements already visible.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.observed.values().filter(|v| **v).count()
    }

    pub fn view(&self, doc: &mut Document) {
        for (id, visible) in &self.observed {
            doc.element_mut(id)
                .add_class(FADE_IN_CLASS)
                .set_class(VISIBLE_CLASS, *visible);
        }
    }
}

#[derive(Debug, Clone)]
struct Image {
    src: String,
    loaded: bool,
}

/// Images whose source is deferred until they scroll into view.
#[derive(Debug, Clone)]
pub struct LazyImages {
    images: BTreeMap<ElementId, Image>,
}

impl LazyImages {
    #[must_use]
    pub fn new(images: &[LazyImage]) -> Self {
        Self {
            images: images
                .iter()
                .map(|i| {
                    (
                        i.id.clone(),
                        Image {
                            src: i.src.clone(),
                            loaded: false,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Load an image on its first intersection. Returns `true` if it loaded now.
    pub fn on_intersection(&mut self, entry: &IntersectionEntry) -> bool {
        match self.images.get_mut(&entry.target) {
            Some(image) if !image.loaded && entry.is_intersecting() => {
                image.loaded = true;
                debug!(image = %entry.target, src = %image.src, "lazy image loaded");
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_loaded(&self, id: &str) -> bool {
        self.images
            .get(&ElementId::from(id))
            .is_some_and(|i| i.loaded)
    }

    pub fn view(&self, doc: &mut Document) {
        for (id, image) in &self.images {
            if image.loaded {
                doc.element_mut(id)
                    .set_attr("src", image.src.clone())
                    .add_class(LOADED_CLASS);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroPhase {
    /// Waiting for the window load signal.
    Waiting,
    /// Load seen; the entrance starts after the initial delay.
    Scheduled,
    /// Reveals are scheduled or done.
    Revealing,
}

/// Staggered reveal of the hero elements after page load.
#[derive(Debug, Clone)]
pub struct HeroEntrance {
    elements: Vec<ElementId>,
    revealed: Vec<bool>,
    phase: HeroPhase,
    delay: Duration,
    step: Duration,
}

impl HeroEntrance {
    #[must_use]
    pub fn new(elements: Vec<ElementId>, delay: Duration, step: Duration) -> Self {
        let revealed = vec![false; elements.len()];
        Self {
            elements,
            revealed,
            phase: HeroPhase::Waiting,
            delay,
            step,
        }
    }

    /// Window finished loading. Returns the delay before [`start`](Self::start) the first time.
    pub fn on_loaded(&mut self) -> Option<Duration> {
        if self.phase != HeroPhase::Waiting {
            return None;
        }
        self.phase = HeroPhase::Scheduled;
        Some(self.delay)
    }

    /// Begin the entrance: `(delay, element index)` for each hero element.
    pub fn start(&mut self) -> Vec<(Duration, usize)> {
        if self.phase != HeroPhase::Scheduled {
            return Vec::new();
        }
        self.phase = HeroPhase::Revealing;
        (0..self.elements.len())
            .map(|i| (stagger_offset(i, Duration::ZERO, self.step), i))
            .collect()
    }

    /// Reveal element `index`. Returns `false` if already revealed or unknown.
    pub fn reveal(&mut self, index: usize) -> bool {
        match self.revealed.get_mut(index) {
            Some(r) if !*r => {
                *r = true;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> HeroPhase {
        self.phase
    }

    /// Ids revealed so far, in page order.
    pub fn revealed(&self) -> impl Iterator<Item = &ElementId> {
        self.elements
            .iter()
            .zip(&self.revealed)
            .filter(|(_, r)| **r)
            .map(|(id, _)| id)
    }

    pub fn view(&self, doc: &mut Document) {
        for (id, revealed) in self.elements.iter().zip(&self.revealed) {
            doc.element_mut(id).set_class(VISIBLE_CLASS, *revealed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn visible_flag_is_one_way() {
        let ids: Vec<ElementId> = vec!["about-highlights".into(), "contact-content".into()];
        let mut t = VisibilityTracker::new(&ids, 0.1);

        assert!(!t.on_intersection(&IntersectionEntry::new("about-highlights", 0.05)));
        assert!(t.on_intersection(&IntersectionEntry::new("about-highlights", 0.1)));
        assert!(!t.on_intersection(&IntersectionEntry::new("about-highlights", 0.0)));
        assert!(t.is_visible("about-highlights"));
        assert!(!t.is_visible("contact-content"));
        assert_eq!(t.visible_count(), 1);
    }

    #[test]
    fn unobserved_targets_are_ignored() {
        let mut t = VisibilityTracker::new(std::iter::empty(), 0.1);
        assert!(!t.on_intersection(&IntersectionEntry::new("ghost", 1.0)));
        assert!(!t.is_visible("ghost"));
    }

    #[test]
    fn fade_in_tag_is_rendered_for_every_observed_element() {
        let ids: Vec<ElementId> = vec!["a".into(), "b".into()];
        let mut t = VisibilityTracker::new(&ids, 0.1);
        t.on_intersection(&IntersectionEntry::new("b", 0.5));
        let mut doc = Document::new();
        t.view(&mut doc);
        assert!(doc.has_class("a", FADE_IN_CLASS));
        assert!(!doc.has_class("a", VISIBLE_CLASS));
        assert!(doc.has_class("b", VISIBLE_CLASS));
    }

    #[test]
    fn lazy_image_loads_once() {
        let mut imgs = LazyImages::new(&[LazyImage {
            id: "photo".into(),
            src: "me.jpg".to_owned(),
        }]);
        assert!(!imgs.on_intersection(&IntersectionEntry::new("photo", 0.0)));
        assert!(imgs.on_intersection(&IntersectionEntry::new("photo", 0.01)));
        assert!(!imgs.on_intersection(&IntersectionEntry::new("photo", 1.0)));

        let mut doc = Document::new();
        imgs.view(&mut doc);
        let el = doc.element("photo").unwrap();
        assert_eq!(el.attr("src"), Some("me.jpg"));
        assert!(el.has_class(LOADED_CLASS));
    }

    #[test]
    fn hero_waits_for_load_then_staggers() {
        let mut hero = HeroEntrance::new(
            vec!["t".into(), "s".into(), "d".into()],
            ms(300),
            ms(200),
        );
        assert!(hero.start().is_empty());
        assert_eq!(hero.on_loaded(), Some(ms(300)));
        assert_eq!(hero.on_loaded(), None);
        assert_eq!(hero.start(), vec![(ms(0), 0), (ms(200), 1), (ms(400), 2)]);
        assert!(hero.start().is_empty());

        assert!(hero.reveal(1));
        assert!(!hero.reveal(1));
        assert!(!hero.reveal(9));
        let shown: Vec<_> = hero.revealed().map(ElementId::as_str).collect();
        assert_eq!(shown, vec!["s"]);
    }
}
