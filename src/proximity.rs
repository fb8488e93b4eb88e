//! Polling proximity monitor for the decorative shapes.
//!
//! Every tick re-queries the shapes, measures center-to-center distances and
//! sets `near` on each shape that has another shape closer than the
//! threshold. There is no cache between ticks; a layout change is reflected
//! within one polling period.

#[cfg(test)]
#[path = "proximity_test.rs"]
mod proximity_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::config::PageConfig;
use crate::dom::{Dom, TimerId, mark};
use crate::geometry::Point;

/// For each center, whether some other center lies strictly within `threshold`.
#[must_use]
pub fn near_flags(centers: &[Point], threshold: f64) -> Vec<bool> {
    centers
        .iter()
        .enumerate()
        .map(|(i, a)| {
            centers
                .iter()
                .enumerate()
                .any(|(j, b)| i != j && a.distance_to(*b) < threshold)
        })
        .collect()
}

struct Scan<D: Dom> {
    dom: Rc<D>,
    selector: String,
    near_class: String,
    threshold: f64,
}

impl<D: Dom> Scan<D> {
    fn run(&self) -> usize {
        let shapes = self.dom.query_all(&self.selector);
        let centers: Vec<Point> = shapes.iter().map(|s| self.dom.bounding_rect(s).center()).collect();
        let flags = near_flags(&centers, self.threshold);
        for (shape, near) in shapes.iter().zip(&flags) {
            mark(self.dom.as_ref(), shape, &self.near_class, *near);
        }
        flags.into_iter().filter(|near| *near).count()
    }
}

/// Owns the polling interval. Dropping the monitor stops it.
pub struct ProximityMonitor<D: Dom> {
    scan: Rc<Scan<D>>,
    interval_ms: u32,
    timer: Cell<Option<TimerId>>,
}

impl<D: Dom + 'static> ProximityMonitor<D> {
    #[must_use]
    pub fn new(dom: Rc<D>, config: &PageConfig) -> Self {
        Self {
            scan: Rc::new(Scan {
                dom,
                selector: config.selectors.shapes.clone(),
                near_class: config.classes.near.clone(),
                threshold: config.proximity.threshold_px,
            }),
            interval_ms: config.proximity.interval_ms,
            timer: Cell::new(None),
        }
    }

    /// Run one pass now. Returns how many shapes are near another.
    pub fn tick(&self) -> usize {
        self.scan.run()
    }

    /// Begin polling. Returns `false` if already running.
    pub fn start(&self) -> bool {
        if self.is_running() {
            return false;
        }
        let scan = Rc::clone(&self.scan);
        let id = self.scan.dom.set_interval(
            self.interval_ms,
            Box::new(move || {
                scan.run();
            }),
        );
        self.timer.set(Some(id));
        log::debug!("proximity: polling every {}ms", self.interval_ms);
        true
    }

    /// Cancel polling. Returns `false` if it was not running.
    pub fn stop(&self) -> bool {
        let Some(id) = self.timer.take() else {
            return false;
        };
        self.scan.dom.clear_interval(id);
        log::debug!("proximity: stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.timer.get().is_some()
    }
}

impl<D: Dom> Drop for ProximityMonitor<D> {
    fn drop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scan.dom.clear_interval(id);
        }
    }
}
