#![forbid(unsafe_code)]

//! Scripted page visit for the demo binary.
//!
//! A [`Visit`] plays the host's part: it owns a [`StepProgram`], a viewport
//! and a storyboard of timed user actions. Each frame it pushes the actions
//! that fell due, computes intersection records from the layout geometry
//! (there is no native observer outside a browser), steps the program and
//! applies the host actions it gets back.

use std::collections::BTreeMap;
use std::time::Duration;

use folio_core::document::{ElementId, HostAction};
use folio_core::event::{ClickEvent, Event, FormData, IntersectionEntry, KeyCode, KeyEvent};
use folio_core::geometry::{RootMargin, Viewport};
use folio_web::step_program::StepProgram;
use folio_web::WebError;
use tracing::{debug, info};

use crate::app::PortfolioApp;

/// One user action on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum VisitAction {
    /// The window `load` signal.
    Load,
    /// Scroll the window to an offset.
    ScrollTo(u32),
    Resize { width: u32, height: u32 },
    Click(ClickEvent),
    Key(KeyEvent),
    Submit(FormData),
}

/// An action at a point in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitStep {
    pub at: Duration,
    pub action: VisitAction,
}

impl VisitStep {
    #[must_use]
    pub fn at_ms(ms: u64, action: VisitAction) -> Self {
        Self {
            at: Duration::from_millis(ms),
            action,
        }
    }
}

/// Storyboard exercising every feature of the portfolio page.
#[must_use]
pub fn storyboard(page_bottom: u32) -> Vec<VisitStep> {
    use VisitAction::*;

    let mut steps = vec![VisitStep::at_ms(200, Load)];
    let mut t = 1_500;
    let mut y = 0;
    while y < page_bottom {
        y = (y + 300).min(page_bottom);
        steps.push(VisitStep::at_ms(t, ScrollTo(y)));
        t += 120;
    }
    steps.extend([
        VisitStep::at_ms(t + 500, ScrollTo(0)),
        VisitStep::at_ms(t + 1_000, Click(ClickEvent::on("filter-ml"))),
        VisitStep::at_ms(t + 1_100, Click(ClickEvent::on("filter-systems"))),
        VisitStep::at_ms(t + 2_000, Click(ClickEvent::on("filter-all"))),
        VisitStep::at_ms(t + 2_500, Resize { width: 600, height: 900 }),
        VisitStep::at_ms(
            t + 3_000,
            Click(ClickEvent::on("hamburger-bar").within("hamburger")),
        ),
        VisitStep::at_ms(t + 3_200, Key(KeyEvent::new(KeyCode::Escape))),
        VisitStep::at_ms(t + 3_500, Key(KeyEvent::new(KeyCode::Char('t')))),
        VisitStep::at_ms(
            t + 4_000,
            Click(ClickEvent::on("nav-contact").within("nav-menu")),
        ),
        VisitStep::at_ms(
            t + 5_000,
            Submit(
                FormData::new("contact-form")
                    .field("name", "")
                    .field("email", "not-an-email")
                    .field("subject", "")
                    .field("message", "hi"),
            ),
        ),
        VisitStep::at_ms(
            t + 6_000,
            Submit(
                FormData::new("contact-form")
                    .field("name", "Ada")
                    .field("email", "ada@example.com")
                    .field("subject", "Collaboration")
                    .field("message", "Would love to talk about a project."),
            ),
        ),
        VisitStep::at_ms(t + 6_200, Resize { width: 1_280, height: 800 }),
    ]);
    steps
}

/// Totals of a finished visit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitReport {
    pub frames: u64,
    pub renders: u64,
    pub patches: usize,
    pub actions: Vec<HostAction>,
    pub logs: Vec<String>,
    pub events: u64,
    pub timers_fired: u64,
}

/// A host-side replay of a page visit.
pub struct Visit {
    program: StepProgram<PortfolioApp>,
    viewport: Viewport,
    fade_margin: RootMargin,
    ratios: BTreeMap<ElementId, f32>,
    steps: Vec<VisitStep>,
    next: usize,
    report: VisitReport,
}

impl Visit {
    /// Prepare a visit; the viewport starts at the top of the page.
    #[must_use]
    pub fn new(app: PortfolioApp, steps: Vec<VisitStep>, width: u32, height: u32) -> Self {
        let fade_margin = app.config().visibility_margin;
        let mut steps = steps;
        steps.sort_by_key(|s| s.at);
        Self {
            program: StepProgram::new(app),
            viewport: Viewport::new(0, width, height),
            fade_margin,
            ratios: BTreeMap::new(),
            steps,
            next: 0,
            report: VisitReport::default(),
        }
    }

    /// Run the page for `duration` in frames of `frame`.
    pub fn run(
        mut self,
        duration: Duration,
        frame: Duration,
    ) -> Result<(VisitReport, PortfolioApp), WebError> {
        self.program.init()?;
        self.push_event(Event::Resize {
            width: self.viewport.width,
            height: self.viewport.height,
        });
        self.observe();

        let frame = frame.max(Duration::from_millis(1));
        while self.program.now() < duration && self.program.is_running() {
            self.program.advance_time(frame);
            self.push_due_actions();
            let result = self.program.step()?;
            self.report.frames += 1;
            self.report.renders += u64::from(result.rendered);
            self.report.timers_fired += u64::from(result.timers_fired);
            self.collect();
        }
        self.push_event(Event::Unload);
        self.program.step()?;
        self.collect();

        info!(
            frames = self.report.frames,
            renders = self.report.renders,
            patches = self.report.patches,
            actions = self.report.actions.len(),
            "visit finished"
        );
        let Visit { program, report, .. } = self;
        Ok((report, program.into_model()))
    }

    fn push_event(&mut self, event: Event) {
        self.report.events += 1;
        self.program.push_event(event);
    }

    fn push_due_actions(&mut self) {
        let now = self.program.now();
        while let Some(step) = self.steps.get(self.next).filter(|s| s.at <= now) {
            let action = step.action.clone();
            self.next += 1;
            debug!(?action, "visit action");
            match action {
                VisitAction::Load => self.push_event(Event::Loaded),
                VisitAction::ScrollTo(y) => self.scroll_to(y),
                VisitAction::Resize { width, height } => {
                    self.viewport.width = width;
                    self.viewport.height = height;
                    self.push_event(Event::Resize { width, height });
                    self.observe();
                }
                VisitAction::Click(click) => self.push_event(Event::Click(click)),
                VisitAction::Key(key) => self.push_event(Event::Key(key)),
                VisitAction::Submit(data) => self.push_event(Event::Submit(data)),
            }
        }
    }

    fn scroll_to(&mut self, y: u32) {
        self.viewport.scroll_y = y;
        self.push_event(Event::Scroll { y });
        self.observe();
    }

    /// Push intersection records for every observed element whose ratio changed.
    fn observe(&mut self) {
        let layout = self.program.model().layout();
        let mut entries = Vec::new();
        for id in layout.observed() {
            let Some(span) = layout.geometry.get(id) else {
                continue;
            };
            let margin = if layout.fade_in.contains(id) {
                self.fade_margin
            } else {
                RootMargin::default()
            };
            let ratio = self.viewport.intersection_ratio(*span, margin);
            if self.ratios.get(id) != Some(&ratio) {
                entries.push(IntersectionEntry::new(id.clone(), ratio));
            }
        }
        for entry in entries {
            self.ratios.insert(entry.target.clone(), entry.ratio);
            self.push_event(Event::Intersection(entry));
        }
    }

    fn collect(&mut self) {
        let outputs = self.program.take_outputs();
        self.report.patches += outputs.patches.len();
        self.report.logs.extend(outputs.logs);
        for action in outputs.actions {
            match &action {
                HostAction::ScrollTo { top, .. } => self.scroll_to(*top),
                HostAction::ResetForm(form) => debug!(%form, "form reset"),
            }
            self.report.actions.push(action);
        }
    }
}
