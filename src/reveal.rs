//! One-shot scroll reveal and auto-advancing carousels.
//!
//! This is the host-independent model of the page behaviour that the inline
//! script in generated pages implements in the browser:
//!
//! - Sections and cards carry an opaque identifier. The first time an element
//!   intersects the viewport it becomes *seen* and its reveal transition runs.
//!   Seen never reverts to unseen until the view's context changes (category
//!   switch, navigation), which clears everything.
//! - Carousels advance one item per fixed period and wrap to the start.
//!   Manual previous/next commands move the same index but leave the timer's
//!   phase alone.
//!
//! The host supplies intersections through [`IntersectionSource`]. A host
//! without intersection support gets every observed identifier marked seen
//! immediately, so content is never left hidden.
//!
//! ```text
//! unseen ──on_intersect──▶ seen
//!    ▲                      │
//!    └──────── reset ───────┘
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Minimum visible fraction of an element before it counts as intersecting.
pub const DEFAULT_THRESHOLD: f64 = 0.1;
/// Distance in pixels the viewport is grown by on every side.
pub const DEFAULT_MARGIN_PX: f64 = 50.0;
/// Hero fabric carousel period.
pub const DEFAULT_CAROUSEL_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    pub margin_px: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            margin_px: DEFAULT_MARGIN_PX,
        }
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Axis-aligned box in page pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Grow by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Overlapping region. Edge-adjacent boxes intersect with zero area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (left <= right && top <= bottom).then(|| Rect::new(left, top, right - left, bottom - top))
    }
}

/// Fraction of `element` inside `viewport` grown by `margin_px`.
///
/// Zero-area elements count as fully visible when they touch the grown
/// viewport at all.
pub fn intersection_ratio(element: Rect, viewport: Rect, margin_px: f64) -> f64 {
    match element.intersection(&viewport.expand(margin_px)) {
        None => 0.0,
        Some(_) if element.area() <= 0.0 => 1.0,
        Some(overlap) => overlap.area() / element.area(),
    }
}

/// Whether `element` passes the reveal threshold for `viewport`.
pub fn is_intersecting(element: Rect, viewport: Rect, options: &RevealOptions) -> bool {
    element.intersection(&viewport.expand(options.margin_px)).is_some()
        && intersection_ratio(element, viewport, options.margin_px) >= options.threshold
}

// ============================================================================
// Hosts
// ============================================================================

/// Something that can report which elements currently intersect the viewport.
pub trait IntersectionSource {
    /// Hosts without an intersection primitive return `false`.
    fn supports_intersection(&self) -> bool {
        true
    }

    /// Identifiers of elements intersecting the viewport under `options`.
    fn intersecting(&self, options: &RevealOptions) -> Vec<String>;
}

/// A laid-out page: a viewport plus element boxes.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub rect: Rect,
    elements: Vec<(String, Rect)>,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, width, height),
            elements: Vec::new(),
        }
    }

    pub fn place(&mut self, id: impl Into<String>, rect: Rect) {
        self.elements.push((id.into(), rect));
    }

    /// Move the viewport's top edge to `y`.
    pub fn scroll_to(&mut self, y: f64) {
        self.rect.y = y;
    }
}

impl IntersectionSource for Viewport {
    fn intersecting(&self, options: &RevealOptions) -> Vec<String> {
        self.elements
            .iter()
            .filter(|(_, rect)| is_intersecting(*rect, self.rect, options))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// A host with no intersection primitive at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntersection;

impl IntersectionSource for NoIntersection {
    fn supports_intersection(&self) -> bool {
        false
    }

    fn intersecting(&self, _options: &RevealOptions) -> Vec<String> {
        Vec::new()
    }
}

// ============================================================================
// Reveal controller
// ============================================================================

#[derive(Debug, Clone)]
pub struct RevealController {
    options: RevealOptions,
    supported: bool,
    context: Option<String>,
    observed: BTreeSet<String>,
    seen: BTreeSet<String>,
}

impl RevealController {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            supported: true,
            context: None,
            observed: BTreeSet::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Build a controller matched to what `host` can do.
    pub fn for_host(options: RevealOptions, host: &dyn IntersectionSource) -> Self {
        let mut controller = Self::new(options);
        if !host.supports_intersection() {
            log::warn!("viewport intersection unavailable, revealing all sections immediately");
            controller.supported = false;
        }
        controller
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Start tracking identifiers. Already-seen identifiers stay seen.
    pub fn observe<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if !self.supported {
                self.seen.insert(id.clone());
            }
            self.observed.insert(id);
        }
    }

    /// Mark `id` as seen. Returns `true` on the first call for `id`.
    pub fn on_intersect(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.observed.insert(id.to_string());
        self.seen.insert(id.to_string())
    }

    /// Forget everything seen and observed.
    pub fn reset(&mut self) {
        self.observed.clear();
        self.seen.clear();
    }

    /// Switch to a new context, resetting if it differs from the current one.
    ///
    /// Returns `true` when state was cleared.
    pub fn set_context(&mut self, context: &str) -> bool {
        if self.context.as_deref() == Some(context) {
            return false;
        }
        log::debug!("reveal context {:?} -> {context:?}", self.context);
        self.context = Some(context.to_string());
        self.reset();
        true
    }

    /// Apply intersections reported by `source` to observed identifiers.
    ///
    /// Returns the identifiers that became seen.
    pub fn sync(&mut self, source: &dyn IntersectionSource) -> Vec<String> {
        let hits = source.intersecting(&self.options);
        let mut newly_seen = Vec::new();
        for id in hits {
            if self.observed.contains(&id) && self.on_intersect(&id) {
                newly_seen.push(id);
            }
        }
        newly_seen
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn seen(&self) -> impl Iterator<Item = &str> {
        self.seen.iter().map(String::as_str)
    }

    pub fn is_observed(&self, id: &str) -> bool {
        self.observed.contains(id)
    }
}

// ============================================================================
// Carousel
// ============================================================================

/// Wrap-around index over a fixed number of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Timer step. No effect with fewer than two items.
    pub fn tick(&mut self) {
        if self.len > 1 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn next(&mut self) {
        self.tick();
    }

    pub fn prev(&mut self) {
        if self.len > 1 {
            self.index = if self.index == 0 {
                self.len - 1
            } else {
                self.index - 1
            };
        }
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize) -> bool {
        if index < self.len {
            self.index = index;
            true
        } else {
            false
        }
    }
}

/// Free-running fixed-period clock for a carousel.
///
/// Driven by elapsed time since mount, so the phase is independent of any
/// manual carousel commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTimer {
    period: Duration,
    fired: u128,
}

impl CarouselTimer {
    pub fn new(period: Duration) -> Self {
        Self { period, fired: 0 }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks that fell due since the previous call, given time since mount.
    pub fn due(&mut self, elapsed: Duration) -> u128 {
        if self.period.is_zero() {
            return 0;
        }
        let total = elapsed.as_nanos() / self.period.as_nanos();
        let due = total.saturating_sub(self.fired);
        self.fired = self.fired.max(total);
        due
    }
}

// ============================================================================
// Mounted view
// ============================================================================

/// Reveal and carousel state owned by one mounted view.
///
/// Dropping or [`unmount`](MountedView::unmount)ing the view releases the
/// controller and every timer with it; nothing outlives the view.
#[derive(Debug)]
pub struct MountedView {
    reveal: RevealController,
    carousels: BTreeMap<String, (Carousel, CarouselTimer)>,
}

impl MountedView {
    pub fn mount(context: &str, mut reveal: RevealController) -> Self {
        reveal.set_context(context);
        Self {
            reveal,
            carousels: BTreeMap::new(),
        }
    }

    pub fn add_carousel(&mut self, id: impl Into<String>, len: usize, period: Duration) {
        self.carousels
            .insert(id.into(), (Carousel::new(len), CarouselTimer::new(period)));
    }

    pub fn carousel(&self, id: &str) -> Option<&Carousel> {
        self.carousels.get(id).map(|(c, _)| c)
    }

    /// Manual previous/next/set commands go through here.
    pub fn carousel_mut(&mut self, id: &str) -> Option<&mut Carousel> {
        self.carousels.get_mut(id).map(|(c, _)| c)
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn reveal_mut(&mut self) -> &mut RevealController {
        &mut self.reveal
    }

    /// Change the view's context; see [`RevealController::set_context`].
    pub fn navigate(&mut self, context: &str) -> bool {
        self.reveal.set_context(context)
    }

    /// Advance every carousel by the ticks due at `elapsed` since mount.
    pub fn advance_clock(&mut self, elapsed: Duration) {
        for (carousel, timer) in self.carousels.values_mut() {
            let due = timer.due(elapsed);
            if carousel.len() > 1 {
                for _ in 0..(due % carousel.len() as u128) {
                    carousel.tick();
                }
            }
        }
    }

    /// Tear the view down, returning the identifiers it had revealed.
    pub fn unmount(self) -> Vec<String> {
        log::debug!(
            "unmounting view {:?} with {} carousel(s)",
            self.reveal.context(),
            self.carousels.len()
        );
        self.reveal.seen().map(String::from).collect()
    }
}
