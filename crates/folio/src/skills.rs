#![forbid(unsafe_code)]

//! One-shot skill bar animation.
//!
//! The first time the skills section is at least 30 % visible, every bar
//! shows a loading shimmer and then fills to its target width, bar `i` after
//! `base + i * step`. Later crossings do nothing.

use std::time::Duration;

use folio_core::document::{Document, ElementId};
use folio_core::stagger::stagger_offset;
use tracing::info;

use crate::layout::SkillBar;

/// Class on a bar between trigger and fill.
pub const LOADING_CLASS: &str = "loading";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPhase {
    Idle,
    Loading,
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorPhase {
    /// Waiting for the first crossing.
    Idle,
    /// Bars are filling.
    Animating,
    /// Every bar is filled.
    Done,
}

#[derive(Debug, Clone)]
struct Bar {
    id: ElementId,
    progress: u8,
    phase: BarPhase,
}

#[derive(Debug, Clone)]
pub struct SkillAnimator {
    section: Option<ElementId>,
    bars: Vec<Bar>,
    phase: AnimatorPhase,
    threshold: f32,
    base: Duration,
    step: Duration,
}

impl SkillAnimator {
    #[must_use]
    pub fn new(
        section: Option<ElementId>,
        bars: &[SkillBar],
        threshold: f32,
        base: Duration,
        step: Duration,
    ) -> Self {
        Self {
            section,
            bars: bars
                .iter()
                .map(|b| Bar {
                    id: b.id.clone(),
                    progress: b.progress.min(100),
                    phase: BarPhase::Idle,
                })
                .collect(),
            phase: AnimatorPhase::Idle,
            threshold,
            base,
            step,
        }
    }

    /// Whether `id` is the watched section.
    #[must_use]
    pub fn watches(&self, id: &ElementId) -> bool {
        self.section.as_ref() == Some(id)
    }

    /// React to a visibility ratio of the skills section.
    ///
    /// On the first crossing returns `(delay, bar index)` for every bar;
    /// afterwards always empty.
    pub fn on_visibility(&mut self, ratio: f32) -> Vec<(Duration, usize)> {
        if self.phase != AnimatorPhase::Idle || ratio < self.threshold {
            return Vec::new();
        }
        info!(bars = self.bars.len(), "skill animation started");
        for bar in &mut self.bars {
            bar.phase = BarPhase::Loading;
        }
        self.phase = if self.bars.is_empty() {
            AnimatorPhase::Done
        } else {
            AnimatorPhase::Animating
        };
        (0..self.bars.len())
            .map(|i| (stagger_offset(i, self.base, self.step), i))
            .collect()
    }

    /// Fill bar `index`. Returns `false` if it was not loading.
    pub fn fill(&mut self, index: usize) -> bool {
        let Some(bar) = self.bars.get_mut(index) else {
            return false;
        };
        if bar.phase != BarPhase::Loading {
            return false;
        }
        bar.phase = BarPhase::Filled;
        if self.bars.iter().all(|b| b.phase == BarPhase::Filled) {
            self.phase = AnimatorPhase::Done;
        }
        true
    }

    #[must_use]
    pub fn phase(&self) -> AnimatorPhase {
        self.phase
    }

    #[must_use]
    pub fn bar_phase(&self, index: usize) -> Option<BarPhase> {
        self.bars.get(index).map(|b| b.phase)
    }

    pub fn view(&self, doc: &mut Document) {
        for bar in &self.bars {
            let el = doc.element_mut(&bar.id);
            el.set_class(LOADING_CLASS, bar.phase == BarPhase::Loading);
            if bar.phase == BarPhase::Filled {
                el.set_style("width", format!("{}%", bar.progress));
            }
        }
    }
}
