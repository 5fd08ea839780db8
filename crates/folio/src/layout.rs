#![forbid(unsafe_code)]

//! Page inventory: which elements exist and where.
//!
//! The page markup is owned by the host. A [`PageLayout`] tells the model
//! which element ids play which role (sections, nav links, filter buttons,
//! cards, skill bars, observed blocks) and, for hosts without a native
//! intersection observer, where each observed element sits vertically.
//!
//! Layouts load from JSON; [`PageLayout::portfolio`] mirrors the live page.

use std::collections::{BTreeMap, BTreeSet};

use folio_core::document::ElementId;
use folio_core::geometry::Span;
use serde::{Deserialize, Serialize};

use crate::error::{PageError, PageResult};

/// Ids of the singleton controls. A `None` disables the feature that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub theme_toggle: Option<ElementId>,
    pub theme_icon: Option<ElementId>,
    pub typewriter: Option<ElementId>,
    pub navbar: Option<ElementId>,
    pub hamburger: Option<ElementId>,
    pub nav_menu: Option<ElementId>,
    pub body: ElementId,
    pub skills_section: Option<ElementId>,
    pub contact_form: Option<ElementId>,
    pub submit_button: Option<ElementId>,
    /// Id given to the success toast the page creates.
    pub toast: ElementId,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            theme_toggle: Some("theme-toggle".into()),
            theme_icon: Some("theme-icon".into()),
            typewriter: Some("typewriter".into()),
            navbar: Some("navbar".into()),
            hamburger: Some("hamburger".into()),
            nav_menu: Some("nav-menu".into()),
            body: "body".into(),
            skills_section: Some("skills".into()),
            contact_form: Some("contact-form".into()),
            submit_button: Some("contact-submit".into()),
            toast: "success-message".into(),
        }
    }
}

/// A page section landmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: ElementId,
    pub span: Span,
}

/// A navigation link and the anchor it points at (`#about`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub id: ElementId,
    pub href: String,
}

impl NavLink {
    /// The section id the link targets, if `href` is an in-page anchor.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.href.strip_prefix('#').filter(|t| !t.is_empty())
    }
}

/// A category filter button (`data-filter`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterButton {
    pub id: ElementId,
    pub filter: String,
}

/// A project card (`data-category`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: ElementId,
    pub category: String,
}

/// A skill progress bar (`data-progress`, in percent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBar {
    pub id: ElementId,
    pub progress: u8,
}

/// An image whose real source is deferred (`data-src`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyImage {
    pub id: ElementId,
    pub src: String,
}

/// Everything the model needs to know about the page markup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub ids: ElementIds,
    /// Sections in document order.
    pub sections: Vec<Section>,
    pub nav_links: Vec<NavLink>,
    pub filter_buttons: Vec<FilterButton>,
    pub cards: Vec<Card>,
    pub skill_bars: Vec<SkillBar>,
    /// Blocks tagged `fade-in` and watched for visibility.
    pub fade_in: Vec<ElementId>,
    pub lazy_images: Vec<LazyImage>,
    /// Hero elements revealed in order after load.
    pub hero: Vec<ElementId>,
    /// Vertical position of observed elements, for local intersection math.
    pub geometry: BTreeMap<ElementId, Span>,
}

impl PageLayout {
    /// Parse and check a layout from JSON.
    pub fn from_json(json: &str) -> PageResult<Self> {
        let layout: Self =
            serde_json::from_str(json).map_err(|e| PageError::InvalidLayout(e.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> PageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PageError::InvalidLayout(e.to_string()))
    }

    /// Check internal consistency.
    ///
    /// Sections must be in document order, skill targets at most 100 %, and
    /// no two list entries may share an id.
    pub fn validate(&self) -> PageResult<()> {
        if let Some(pair) = self
            .sections
            .windows(2)
            .find(|w| w[1].span.top < w[0].span.top)
        {
            return Err(PageError::InvalidLayout(format!(
                "section {} starts above preceding section {}",
                pair[1].id, pair[0].id
            )));
        }
        if let Some(bar) = self.skill_bars.iter().find(|b| b.progress > 100) {
            return Err(PageError::InvalidLayout(format!(
                "skill bar {} targets {}%",
                bar.id, bar.progress
            )));
        }
        if let Some(button) = self.filter_buttons.iter().find(|b| b.filter.is_empty()) {
            return Err(PageError::InvalidLayout(format!(
                "filter button {} has no filter",
                button.id
            )));
        }

        let mut seen = BTreeSet::new();
        let ids = self
            .sections
            .iter()
            .map(|s| &s.id)
            .chain(self.nav_links.iter().map(|l| &l.id))
            .chain(self.filter_buttons.iter().map(|b| &b.id))
            .chain(self.cards.iter().map(|c| &c.id))
            .chain(self.skill_bars.iter().map(|b| &b.id))
            .chain(self.lazy_images.iter().map(|i| &i.id))
            .chain(self.hero.iter());
        for id in ids {
            if !seen.insert(id) {
                return Err(PageError::InvalidLayout(format!("duplicate element id {id}")));
            }
        }
        Ok(())
    }

    /// A required singleton id, or `MissingElement`.
    pub fn require<'a>(
        &'a self,
        id: &'a Option<ElementId>,
        what: &'static str,
    ) -> PageResult<&'a ElementId> {
        id.as_ref().ok_or(PageError::MissingElement(what))
    }

    /// Section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id.as_str() == id)
    }

    /// Every element the host should observe for intersections.
    pub fn observed(&self) -> impl Iterator<Item = &ElementId> {
        self.fade_in
            .iter()
            .chain(self.lazy_images.iter().map(|i| &i.id))
            .chain(self.ids.skills_section.iter())
    }

    /// The live portfolio page.
    #[must_use]
    pub fn portfolio() -> Self {
        let sections: Vec<Section> = [
            ("home", 0, 900),
            ("about", 900, 800),
            ("skills", 1_700, 1_000),
            ("projects", 2_700, 1_300),
            ("contact", 4_000, 900),
        ]
        .into_iter()
        .map(|(id, top, height)| Section {
            id: id.into(),
            span: Span::new(top, height),
        })
        .collect();

        let nav_links = sections
            .iter()
            .map(|s| NavLink {
                id: format!("nav-{}", s.id).into(),
                href: format!("#{}", s.id),
            })
            .collect();

        let filter_buttons = ["all", "ml", "systems", "web"]
            .into_iter()
            .map(|f| FilterButton {
                id: format!("filter-{f}").into(),
                filter: f.to_owned(),
            })
            .collect();

        let cards: Vec<Card> = ["ml", "ml", "systems", "systems", "web", "ml"]
            .into_iter()
            .enumerate()
            .map(|(i, category)| Card {
                id: format!("project-{i}").into(),
                category: category.to_owned(),
            })
            .collect();

        let skill_bars = [95, 90, 88, 85, 80, 75]
            .into_iter()
            .enumerate()
            .map(|(i, progress)| SkillBar {
                id: format!("progress-{i}").into(),
                progress,
            })
            .collect();

        let mut fade_in: Vec<ElementId> = (0..3)
            .map(|i| ElementId::new(format!("skill-category-{i}")))
            .collect();
        fade_in.extend(cards.iter().map(|c| c.id.clone()));
        fade_in.push("about-highlights".into());
        fade_in.push("contact-content".into());
        fade_in.extend((0..3).map(|i| ElementId::new(format!("highlight-item-{i}"))));

        let lazy_images = vec![LazyImage {
            id: "profile-photo".into(),
            src: "images/profile.jpg".to_owned(),
        }];

        let hero = ["hero-title", "hero-subtitle", "hero-description", "hero-buttons"]
            .into_iter()
            .map(ElementId::from)
            .collect();

        let mut geometry = BTreeMap::new();
        for i in 0..3 {
            geometry.insert(
                ElementId::new(format!("skill-category-{i}")),
                Span::new(1_850 + i * 280, 260),
            );
        }
        for (i, card) in cards.iter().enumerate() {
            let row = u32::try_from(i / 2).unwrap_or(u32::MAX);
            geometry.insert(card.id.clone(), Span::new(2_900 + row * 360, 340));
        }
        geometry.insert("about-highlights".into(), Span::new(1_200, 320));
        for i in 0..3 {
            geometry.insert(
                ElementId::new(format!("highlight-item-{i}")),
                Span::new(1_220 + i * 100, 90),
            );
        }
        geometry.insert("contact-content".into(), Span::new(4_150, 600));
        geometry.insert("profile-photo".into(), Span::new(1_000, 300));
        geometry.insert("skills".into(), Span::new(1_700, 1_000));

        Self {
            ids: ElementIds::default(),
            sections,
            nav_links,
            filter_buttons,
            cards,
            skill_bars,
            fade_in,
            lazy_images,
            hero,
            geometry,
        }
    }
}
