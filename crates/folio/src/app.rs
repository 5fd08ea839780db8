#![forbid(unsafe_code)]

//! The portfolio page model.
//!
//! [`PortfolioApp`] owns one controller per concern and routes every page
//! event to the controllers that care about it. Controllers never talk to
//! each other; where one decision needs another's state (the toast colour
//! needs the theme) the dispatcher passes it in.
//!
//! Timers are expressed as [`Cmd::after`] with a message that carries
//! whatever the controller needs to recognise a stale delivery: a debounce
//! ticket, a filter epoch, or a toast generation.

use std::sync::Arc;

use folio_core::debounce::DebounceTicket;
use folio_core::document::{Document, ElementId, HostAction};
use folio_core::event::{ClickEvent, Event, FormData, IntersectionEntry, KeyCode, KeyEvent, KeyEventKind};
use folio_runtime::program::{Cmd, Model};
use folio_runtime::state_persistence::StateRegistry;
use tracing::{debug, debug_span, error, info, warn};

use crate::config::PageConfig;
use crate::contact::{ContactForm, SubmitOutcome};
use crate::filter::{FilterController, FilterTimer};
use crate::layout::PageLayout;
use crate::menu::{CloseReason, MenuController};
use crate::navigation::{scroll_target, ScrollTracker};
use crate::skills::SkillAnimator;
use crate::theme::{PreferenceStore, Theme, ThemeController};
use crate::typewriter::Typewriter;
use crate::visibility::{HeroEntrance, LazyImages, VisibilityTracker};

/// Class on the body once the window has loaded.
pub const LOADED_CLASS: &str = "loaded";

/// Console greeting printed once per page load.
pub const BANNER: &str = "\
Welcome to the portfolio!
=========================

Interested in the code? Check out the repository.

Open to Machine Learning, Deep Learning, and Software Development opportunities.";

/// Page messages: raw events plus every timer the controllers schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Event(Event),
    TypewriterTick,
    ScrollSettled(DebounceTicket),
    ResizeSettled(DebounceTicket),
    Filter(FilterTimer),
    SkillFill(usize),
    HeroStart,
    HeroReveal(usize),
    SubmitComplete,
    ToastIn(u64),
    ToastOut(u64),
    ToastRemove(u64),
}

impl Msg {
    fn name(&self) -> &'static str {
        match self {
            Self::Event(_) => "event",
            Self::TypewriterTick => "typewriter_tick",
            Self::ScrollSettled(_) => "scroll_settled",
            Self::ResizeSettled(_) => "resize_settled",
            Self::Filter(_) => "filter",
            Self::SkillFill(_) => "skill_fill",
            Self::HeroStart => "hero_start",
            Self::HeroReveal(_) => "hero_reveal",
            Self::SubmitComplete => "submit_complete",
            Self::ToastIn(_) => "toast_in",
            Self::ToastOut(_) => "toast_out",
            Self::ToastRemove(_) => "toast_remove",
        }
    }
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

/// Schedule `(delay, payload)` pairs as timers.
fn schedule<T>(timers: Vec<(std::time::Duration, T)>, msg: impl Fn(T) -> Msg) -> Cmd<Msg> {
    Cmd::batch(
        timers
            .into_iter()
            .map(|(delay, payload)| Cmd::after(delay, msg(payload)))
            .collect(),
    )
}

/// Optional element `what`, warning when the page lacks it.
fn optional(layout: &PageLayout, id: &Option<ElementId>, what: &'static str) -> Option<ElementId> {
    match layout.require(id, what) {
        Ok(id) => Some(id.clone()),
        Err(e) => {
            warn!(error = %e, "feature disabled");
            None
        }
    }
}

/// The whole page.
#[derive(Debug)]
pub struct PortfolioApp {
    config: PageConfig,
    layout: PageLayout,
    theme: ThemeController,
    typewriter: Typewriter,
    typewriter_el: Option<ElementId>,
    scroll: ScrollTracker,
    menu: Option<MenuController>,
    filter: FilterController,
    skills: SkillAnimator,
    fade: VisibilityTracker,
    images: LazyImages,
    hero: HeroEntrance,
    contact: Option<ContactForm>,
    loaded: bool,
}

impl PortfolioApp {
    /// Build every controller from the page inventory.
    ///
    /// Missing singleton elements disable their feature with a warning.
    pub fn new(config: PageConfig, layout: PageLayout, registry: Arc<StateRegistry>) -> Self {
        let ids = &layout.ids;

        let store = PreferenceStore::open(registry, config.theme_key.clone());
        let theme = ThemeController::new(
            store,
            optional(&layout, &ids.theme_toggle, "theme toggle"),
            ids.theme_icon.clone(),
        );

        let typewriter_el = optional(&layout, &ids.typewriter, "typewriter");
        let typewriter = Typewriter::new(config.phrases.clone(), config.typewriter);

        let menu = match (
            optional(&layout, &ids.hamburger, "hamburger"),
            optional(&layout, &ids.nav_menu, "nav menu"),
        ) {
            (Some(hamburger), Some(menu)) => Some(MenuController::new(
                hamburger,
                menu,
                config.mobile_breakpoint,
                config.resize_debounce,
            )),
            _ => None,
        };

        let contact = optional(&layout, &ids.contact_form, "contact form").map(|form| {
            ContactForm::new(
                form,
                ids.submit_button.clone(),
                ids.toast.clone(),
                config.submit_label.clone(),
            )
        });

        let skills = SkillAnimator::new(
            optional(&layout, &ids.skills_section, "skills section"),
            &layout.skill_bars,
            config.skills_threshold,
            config.skill_base_delay,
            config.skill_step,
        );

        Self {
            scroll: ScrollTracker::new(&layout, &config),
            filter: FilterController::new(
                layout.filter_buttons.clone(),
                &layout.cards,
                config.filter_out,
                config.filter_in,
            ),
            fade: VisibilityTracker::new(&layout.fade_in, config.visibility_threshold),
            images: LazyImages::new(&layout.lazy_images),
            hero: HeroEntrance::new(layout.hero.clone(), config.hero_delay, config.hero_step),
            theme,
            typewriter,
            typewriter_el,
            menu,
            skills,
            contact,
            loaded: false,
            config,
            layout,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn menu(&self) -> Option<&MenuController> {
        self.menu.as_ref()
    }

    pub fn filter(&self) -> &FilterController {
        &self.filter
    }

    pub fn skills(&self) -> &SkillAnimator {
        &self.skills
    }

    pub fn visibility(&self) -> &VisibilityTracker {
        &self.fade
    }

    pub fn lazy_images(&self) -> &LazyImages {
        &self.images
    }

    pub fn hero(&self) -> &HeroEntrance {
        &self.hero
    }

    pub fn contact(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    /// Whether the window load signal has been seen.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn on_event(&mut self, event: Event) -> Cmd<Msg> {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Click(click) => self.on_click(&click),
            Event::Scroll { y } => {
                let ticket = self.scroll.on_scroll(y);
                Cmd::after(self.scroll.debounce(), Msg::ScrollSettled(ticket))
            }
            Event::Resize { width, .. } => match &mut self.menu {
                Some(menu) => {
                    let ticket = menu.on_resize(width);
                    Cmd::after(menu.resize_debounce(), Msg::ResizeSettled(ticket))
                }
                None => Cmd::none(),
            },
            Event::Intersection(entry) => self.on_intersection(&entry),
            Event::Submit(data) => self.on_submit(&data),
            Event::Loaded => {
                self.loaded = true;
                match self.hero.on_loaded() {
                    Some(delay) => Cmd::after(delay, Msg::HeroStart),
                    None => Cmd::none(),
                }
            }
            Event::Unload => {
                info!("page unloading");
                Cmd::quit()
            }
            Event::Tick => Cmd::none(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.kind != KeyEventKind::Press {
            return Cmd::none();
        }
        match key.code {
            KeyCode::Escape => {
                if let Some(menu) = &mut self.menu {
                    menu.close(CloseReason::Escape);
                }
            }
            KeyCode::Char(_)
                if key.is_char_ignore_case('t')
                    && !key.editable_target
                    && !key.ctrl()
                    && !key.alt()
                    && self.theme.has_toggle() =>
            {
                self.theme.toggle();
            }
            _ => {}
        }
        Cmd::none()
    }

    fn on_click(&mut self, click: &ClickEvent) -> Cmd<Msg> {
        let mut cmds = Vec::new();

        if click.path().any(|id| self.theme.is_toggle(id)) {
            self.theme.toggle();
        }

        if let Some(link) = self
            .layout
            .nav_links
            .iter()
            .find(|link| click.hits(&link.id))
        {
            debug!(link = %link.id, href = %link.href, "navigation clicked");
            if let Some(menu) = &mut self.menu {
                menu.close(CloseReason::LinkClick);
            }
            match scroll_target(&self.layout, &link.href, self.config.nav_height) {
                Ok(top) => {
                    debug!(top, "scrolling to section");
                    cmds.push(Cmd::host(HostAction::ScrollTo { top, smooth: true }));
                }
                Err(e) => error!(error = %e, "navigation target missing"),
            }
        }

        let filter = click
            .path()
            .find_map(|id| self.filter.button_filter(id))
            .map(str::to_owned);
        if let Some(filter) = filter {
            let timers = self.filter.select(&filter);
            cmds.push(schedule(timers, Msg::Filter));
        }

        if let Some(menu) = &mut self.menu {
            menu.on_click(click);
        }

        Cmd::batch(cmds)
    }

    fn on_intersection(&mut self, entry: &IntersectionEntry) -> Cmd<Msg> {
        self.fade.on_intersection(entry);
        self.images.on_intersection(entry);
        if self.skills.watches(&entry.target) {
            let fills = self.skills.on_visibility(entry.ratio);
            return schedule(fills, Msg::SkillFill);
        }
        Cmd::none()
    }

    fn on_submit(&mut self, data: &FormData) -> Cmd<Msg> {
        let Some(contact) = &mut self.contact else {
            return Cmd::none();
        };
        if &data.form != contact.form() {
            debug!(form = %data.form, "submit of unmanaged form ignored");
            return Cmd::none();
        }
        match contact.submit(data) {
            SubmitOutcome::Accepted => Cmd::after(self.config.submit_latency, Msg::SubmitComplete),
            SubmitOutcome::Rejected(_) | SubmitOutcome::Ignored => Cmd::none(),
        }
    }

    fn on_submit_complete(&mut self) -> Cmd<Msg> {
        let theme = self.theme.current();
        let Some(contact) = &mut self.contact else {
            return Cmd::none();
        };
        let Some(generation) = contact.complete(theme) else {
            return Cmd::none();
        };
        let toast = self.config.toast;
        Cmd::batch(vec![
            Cmd::host(HostAction::ResetForm(contact.form().clone())),
            Cmd::after(toast.enter, Msg::ToastIn(generation)),
            Cmd::after(toast.dwell, Msg::ToastOut(generation)),
        ])
    }

    fn with_contact(&mut self, f: impl FnOnce(&mut ContactForm) -> bool) -> bool {
        self.contact.as_mut().is_some_and(f)
    }
}

impl Model for PortfolioApp {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        info!(
            theme = %self.theme.current(),
            sections = self.layout.sections.len(),
            cards = self.layout.cards.len(),
            "page initialized"
        );
        let typewriter = if self.typewriter_el.is_some() && self.typewriter.is_enabled() {
            Cmd::after(self.typewriter.start_delay(), Msg::TypewriterTick)
        } else {
            Cmd::none()
        };
        Cmd::batch(vec![Cmd::log(BANNER), typewriter])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        let _span = debug_span!("folio.update", msg = msg.name()).entered();
        match msg {
            Msg::Event(event) => self.on_event(event),
            Msg::TypewriterTick => {
                let next = self.typewriter.tick();
                Cmd::after(next, Msg::TypewriterTick)
            }
            Msg::ScrollSettled(ticket) => {
                self.scroll.settle(ticket);
                Cmd::none()
            }
            Msg::ResizeSettled(ticket) => {
                if let Some(menu) = &mut self.menu {
                    menu.settle_resize(ticket);
                }
                Cmd::none()
            }
            Msg::Filter(timer) => {
                self.filter.on_timer(timer);
                Cmd::none()
            }
            Msg::SkillFill(index) => {
                self.skills.fill(index);
                Cmd::none()
            }
            Msg::HeroStart => schedule(self.hero.start(), Msg::HeroReveal),
            Msg::HeroReveal(index) => {
                self.hero.reveal(index);
                Cmd::none()
            }
            Msg::SubmitComplete => self.on_submit_complete(),
            Msg::ToastIn(generation) => {
                self.with_contact(|c| c.toast_in(generation));
                Cmd::none()
            }
            Msg::ToastOut(generation) => {
                if self.with_contact(|c| c.toast_out(generation)) {
                    Cmd::after(self.config.toast.exit, Msg::ToastRemove(generation))
                } else {
                    Cmd::none()
                }
            }
            Msg::ToastRemove(generation) => {
                self.with_contact(|c| c.toast_remove(generation));
                Cmd::none()
            }
        }
    }

    fn view(&self, doc: &mut Document) {
        self.theme.view(doc);
        if let Some(el) = &self.typewriter_el {
            doc.element_mut(el).set_text(self.typewriter.text());
        }
        self.scroll.view(doc);
        if let Some(menu) = &self.menu {
            menu.view(doc);
        }
        self.filter.view(doc);
        self.skills.view(doc);
        self.fade.view(doc);
        self.images.view(doc);
        self.hero.view(doc);
        if let Some(contact) = &self.contact {
            contact.view(doc);
        }
        doc.element_mut(&self.layout.ids.body)
            .set_class(LOADED_CLASS, self.loaded);
    }
}
