#![forbid(unsafe_code)]

//! Page configuration: timings, thresholds and offsets.
//!
//! `PageConfig::default()` reproduces the live portfolio page. Tests shrink
//! or stretch individual values through the `with_*` builders.

use std::time::Duration;

use folio_core::geometry::RootMargin;

/// Taglines cycled by the hero typewriter.
pub const DEFAULT_PHRASES: [&str; 5] = [
    "Machine Learning Engineer & Computer Science Student",
    "Deep Learning Specialist & AI Researcher",
    "System Programming & Compiler Design Expert",
    "Neural Network Architecture Designer",
    "Full Stack Developer & Tech Innovator",
];

/// Typewriter tick intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    /// Delay before the first character appears.
    pub start_delay: Duration,
    /// Interval between typed characters.
    pub typing: Duration,
    /// Interval between deleted characters.
    pub deleting: Duration,
    /// Pause once a phrase is fully typed.
    pub end_pause: Duration,
    /// Pause before typing the next phrase.
    pub next_phrase_pause: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(1_000),
            typing: Duration::from_millis(100),
            deleting: Duration::from_millis(50),
            end_pause: Duration::from_millis(2_000),
            next_phrase_pause: Duration::from_millis(500),
        }
    }
}

/// Success toast timings, all measured from the moment the toast is created
/// except `exit`, which runs from the start of the slide-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    /// Delay before sliding in.
    pub enter: Duration,
    /// Delay before sliding out.
    pub dwell: Duration,
    /// Slide-out duration before removal.
    pub exit: Duration,
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            enter: Duration::from_millis(100),
            dwell: Duration::from_millis(5_000),
            exit: Duration::from_millis(300),
        }
    }
}

/// All tunables of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    /// Phrases for the typewriter. Empty disables it.
    pub phrases: Vec<String>,
    pub typewriter: TypewriterTiming,
    /// Scroll offset past which the navbar is marked `scrolled`.
    pub scrolled_threshold: u32,
    /// Offset added to the scroll position when picking the active section.
    pub header_offset: u32,
    /// Fixed navbar height subtracted from smooth-scroll targets.
    pub nav_height: u32,
    pub scroll_debounce: Duration,
    pub resize_debounce: Duration,
    /// Viewport widths above this close the mobile menu.
    pub mobile_breakpoint: u32,
    /// Time a card spends fading out before it is hidden.
    pub filter_out: Duration,
    /// Time a card spends displayed but still faded before it is shown.
    pub filter_in: Duration,
    /// Visibility ratio of the skills section that starts the bar animation.
    pub skills_threshold: f32,
    pub skill_base_delay: Duration,
    pub skill_step: Duration,
    /// Visibility ratio that marks a fade-in block `visible`.
    pub visibility_threshold: f32,
    /// Root margin used when intersection ratios are computed locally.
    pub visibility_margin: RootMargin,
    pub hero_delay: Duration,
    pub hero_step: Duration,
    /// Simulated network latency of the contact form.
    pub submit_latency: Duration,
    pub toast: ToastTiming,
    /// Submit button label outside of the sending state.
    pub submit_label: String,
    /// Storage key of the theme preference.
    pub theme_key: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.iter().map(|p| (*p).to_owned()).collect(),
            typewriter: TypewriterTiming::default(),
            scrolled_threshold: 50,
            header_offset: 100,
            nav_height: 70,
            scroll_debounce: Duration::from_millis(10),
            resize_debounce: Duration::from_millis(250),
            mobile_breakpoint: 768,
            filter_out: Duration::from_millis(300),
            filter_in: Duration::from_millis(50),
            skills_threshold: 0.3,
            skill_base_delay: Duration::from_millis(500),
            skill_step: Duration::from_millis(100),
            visibility_threshold: 0.1,
            visibility_margin: RootMargin::bottom(-50),
            hero_delay: Duration::from_millis(300),
            hero_step: Duration::from_millis(200),
            submit_latency: Duration::from_millis(2_000),
            toast: ToastTiming::default(),
            submit_label: "Send Message".to_owned(),
            theme_key: "theme".to_owned(),
        }
    }
}

impl PageConfig {
    /// Replace the typewriter phrases.
    #[must_use]
    pub fn with_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Set typewriter timings.
    #[must_use]
    pub fn with_typewriter(mut self, timing: TypewriterTiming) -> Self {
        self.typewriter = timing;
        self
    }

    /// Set the mobile menu breakpoint.
    #[must_use]
    pub fn with_mobile_breakpoint(mut self, width: u32) -> Self {
        self.mobile_breakpoint = width;
        self
    }

    /// Set the scroll and resize debounce windows.
    #[must_use]
    pub fn with_debounce(mut self, scroll: Duration, resize: Duration) -> Self {
        self.scroll_debounce = scroll;
        self.resize_debounce = resize;
        self
    }

    /// Set the filter fade-out and fade-in intervals.
    #[must_use]
    pub fn with_filter_timing(mut self, out: Duration, r#in: Duration) -> Self {
        self.filter_out = out;
        self.filter_in = r#in;
        self
    }

    /// Set the skill bar stagger.
    #[must_use]
    pub fn with_skill_stagger(mut self, base: Duration, step: Duration) -> Self {
        self.skill_base_delay = base;
        self.skill_step = step;
        self
    }

    /// Set the simulated submission latency.
    #[must_use]
    pub fn with_submit_latency(mut self, latency: Duration) -> Self {
        self.submit_latency = latency;
        self
    }

    /// Set the success toast timings.
    #[must_use]
    pub fn with_toast(mut self, toast: ToastTiming) -> Self {
        self.toast = toast;
        self
    }

    /// Set the theme storage key.
    #[must_use]
    pub fn with_theme_key(mut self, key: impl Into<String>) -> Self {
        self.theme_key = key.into();
        self
    }
}
