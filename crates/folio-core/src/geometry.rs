#![forbid(unsafe_code)]

//! Vertical page geometry: element spans, the viewport, and intersection ratios.
//!
//! Only the vertical axis matters for a single-column page, so a [`Span`] is a
//! band `[top, top + height)` in document coordinates.

/// A vertical band of the document occupied by an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Document offset of the top edge.
    pub top: u32,
    /// Height in CSS pixels.
    pub height: u32,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    /// Exclusive bottom edge (saturating).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// Whether `y` lies inside the span.
    #[inline]
    #[must_use]
    pub const fn contains(&self, y: u32) -> bool {
        y >= self.top && y < self.bottom()
    }

    /// Overlap with another span, or `None` if they do not touch.
    #[must_use]
    pub fn intersection(&self, other: &Span) -> Option<Span> {
        let top = self.top.max(other.top);
        let bottom = self.bottom().min(other.bottom());
        (bottom > top).then(|| Span::new(top, bottom - top))
    }
}

/// Adjustment applied to the viewport before intersecting, like CSS
/// `rootMargin`. Negative values shrink the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootMargin {
    pub top: i32,
    pub bottom: i32,
}

impl RootMargin {
    /// Margin on the bottom edge only.
    #[must_use]
    pub const fn bottom(px: i32) -> Self {
        Self { top: 0, bottom: px }
    }
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Current vertical scroll offset.
    pub scroll_y: u32,
    /// Viewport width.
    pub width: u32,
    /// Viewport height.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(scroll_y: u32, width: u32, height: u32) -> Self {
        Self {
            scroll_y,
            width,
            height,
        }
    }

    /// The document band currently on screen after applying `margin`.
    #[must_use]
    pub fn visible_span(&self, margin: RootMargin) -> Span {
        let top = i64::from(self.scroll_y) - i64::from(margin.top);
        let bottom = i64::from(self.scroll_y) + i64::from(self.height) + i64::from(margin.bottom);
        let top = top.clamp(0, i64::from(u32::MAX));
        let bottom = bottom.clamp(top, i64::from(u32::MAX));
        // Both bounds were clamped into u32 range above.
        Span::new(top as u32, (bottom - top) as u32)
    }

    /// Fraction of `element` inside the margin-adjusted viewport, in [0, 1].
    ///
    /// Zero-height elements report 1.0 when their top edge is on screen.
    #[must_use]
    pub fn intersection_ratio(&self, element: Span, margin: RootMargin) -> f32 {
        let visible = self.visible_span(margin);
        if element.height == 0 {
            return if visible.contains(element.top) { 1.0 } else { 0.0 };
        }
        match element.intersection(&visible) {
            Some(overlap) => (f64::from(overlap.height) / f64::from(element.height)) as f32,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_edges() {
        let s = Span::new(100, 50);
        assert_eq!(s.bottom(), 150);
        assert!(s.contains(100));
        assert!(s.contains(149));
        assert!(!s.contains(150));
    }

    #[test]
    fn span_bottom_saturates() {
        assert_eq!(Span::new(u32::MAX - 1, 10).bottom(), u32::MAX);
    }

    #[test]
    fn intersection_of_disjoint_spans_is_none() {
        assert_eq!(Span::new(0, 10).intersection(&Span::new(10, 10)), None);
        assert_eq!(
            Span::new(0, 20).intersection(&Span::new(10, 30)),
            Some(Span::new(10, 10))
        );
    }

    #[test]
    fn fully_visible_element_has_ratio_one() {
        let vp = Viewport::new(0, 1280, 800);
        assert_eq!(vp.intersection_ratio(Span::new(100, 200), RootMargin::default()), 1.0);
    }

    #[test]
    fn half_visible_element() {
        let vp = Viewport::new(0, 1280, 800);
        let ratio = vp.intersection_ratio(Span::new(700, 200), RootMargin::default());
        assert!((ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn negative_bottom_margin_shrinks_viewport() {
        let vp = Viewport::new(0, 1280, 800);
        let el = Span::new(760, 100);
        assert!(vp.intersection_ratio(el, RootMargin::default()) > 0.0);
        assert_eq!(vp.intersection_ratio(el, RootMargin::bottom(-50)), 0.0);
    }

    #[test]
    fn zero_height_element() {
        let vp = Viewport::new(100, 1280, 800);
        assert_eq!(vp.intersection_ratio(Span::new(150, 0), RootMargin::default()), 1.0);
        assert_eq!(vp.intersection_ratio(Span::new(50, 0), RootMargin::default()), 0.0);
    }
}
