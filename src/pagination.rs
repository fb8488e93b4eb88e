//! Pagination dots for the horizontally scrolling projects strip.
//!
//! The strip is divided into three pages by scroll ratio. Exactly one dot is
//! `active` after every scroll event and after attach; clicking a dot scrolls
//! smoothly to its page and marks it immediately rather than waiting for the
//! resulting scroll events.

#[cfg(test)]
#[path = "pagination_test.rs"]
mod pagination_test;

use std::rc::Rc;

use crate::config::PageConfig;
use crate::dom::{Attached, Dom, EventTarget, ScrollMetrics, Subscription, mark};

/// Fraction of the scrollable range covered, clamped to `[0, 1]`.
///
/// A strip without overflow (or with a non-finite offset) reports `0`.
#[must_use]
pub fn scroll_ratio(metrics: ScrollMetrics) -> f64 {
    let max = metrics.max_scroll();
    if max <= 0.0 || !metrics.scroll_left.is_finite() {
        return 0.0;
    }
    (metrics.scroll_left / max).clamp(0.0, 1.0)
}

/// Page shown at the current offset: 0 below the first breakpoint, 1 below the second, else 2.
#[must_use]
pub fn page_index(metrics: ScrollMetrics, breakpoints: [f64; 2]) -> usize {
    let ratio = scroll_ratio(metrics);
    if ratio < breakpoints[0] {
        0
    } else if ratio < breakpoints[1] {
        1
    } else {
        2
    }
}

/// Scroll offset that brings page `index` into view.
#[must_use]
pub fn dot_scroll_target(index: usize, metrics: ScrollMetrics) -> f64 {
    let max = metrics.max_scroll();
    match index {
        0 => 0.0,
        1 => max / 2.0,
        _ => max,
    }
}

pub struct Pagination<D: Dom> {
    dom: Rc<D>,
    container: D::Node,
    dots: Vec<D::Node>,
    breakpoints: [f64; 2],
    active_class: String,
}

impl<D: Dom + 'static> Pagination<D> {
    /// Resolve the container and dots. `None` when either is missing.
    pub fn new(dom: Rc<D>, config: &PageConfig) -> Option<Self> {
        let container = dom.query(&config.selectors.projects_container)?;
        let dots = dom.query_all(&config.selectors.pagination_dots);
        if dots.is_empty() {
            return None;
        }
        Some(Self {
            dom,
            container,
            dots,
            breakpoints: config.pagination.breakpoints,
            active_class: config.classes.active.clone(),
        })
    }

    /// Sync the dots once and follow container scrolls and dot clicks.
    pub fn attach(dom: &Rc<D>, config: &PageConfig) -> Option<Attached<Self, D>> {
        let Some(pagination) = Self::new(Rc::clone(dom), config) else {
            log::debug!("pagination: container or dots missing, skipping");
            return None;
        };
        let pagination = Rc::new(pagination);
        pagination.sync();

        let mut subscription = Subscription::new(Rc::clone(dom));
        let on_scroll = Rc::clone(&pagination);
        subscription.on(
            EventTarget::Node(pagination.container.clone()),
            "scroll",
            Box::new(move || {
                on_scroll.sync();
            }),
        );
        for (index, dot) in pagination.dots.iter().enumerate() {
            let on_click = Rc::clone(&pagination);
            subscription.on(EventTarget::Node(dot.clone()), "click", Box::new(move || on_click.select(index)));
        }
        log::debug!("pagination: attached {} dots", pagination.dots.len());
        Some(Attached::new(pagination, subscription))
    }

    /// Mark the dot for the current scroll position and return its index.
    pub fn sync(&self) -> usize {
        let index = page_index(self.dom.scroll_metrics(&self.container), self.breakpoints).min(self.dots.len() - 1);
        self.activate(index);
        index
    }

    /// Scroll to page `index` and mark its dot. Out-of-range indices are ignored.
    pub fn select(&self, index: usize) {
        if index >= self.dots.len() {
            return;
        }
        let target = dot_scroll_target(index, self.dom.scroll_metrics(&self.container));
        self.dom.scroll_to_left(&self.container, target, true);
        self.activate(index);
    }

    /// Index of the dot currently marked active.
    pub fn active_index(&self) -> Option<usize> {
        self.dots.iter().position(|dot| self.dom.has_class(dot, &self.active_class))
    }

    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    fn activate(&self, index: usize) {
        for (i, dot) in self.dots.iter().enumerate() {
            mark(self.dom.as_ref(), dot, &self.active_class, i == index);
        }
    }
}
