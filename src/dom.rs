//! The injected browser environment.
//!
//! Components depend on [`Dom`] and [`KeyValueStore`] instead of reaching for
//! `window`/`document`/`localStorage`. The browser build implements them on
//! `web-sys` (`crate::web`); tests implement them in memory.
//!
//! Listener registrations are owned by a [`Subscription`]. Dropping it, or
//! calling [`Subscription::detach`], unregisters every listener it holds, so a
//! component torn down with its host view leaves nothing behind.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use std::ops::Deref;
use std::rc::Rc;

use crate::error::DomError;
use crate::geometry::Rect;

/// Callback invoked for an event or timer tick.
pub type Handler = Box<dyn FnMut()>;

/// Handle for a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u32);

/// Handle for a running interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTarget<N> {
    Window,
    Document,
    Node(N),
}

/// Horizontal scroll state of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub fn new(scroll_left: f64, scroll_width: f64, client_width: f64) -> Self {
        Self { scroll_left, scroll_width, client_width }
    }

    /// Largest reachable `scroll_left`; zero when content does not overflow.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

/// Document access needed by the page components.
pub trait Dom {
    /// Element handle. Cheap to clone; equal handles refer to the same element.
    type Node: Clone + PartialEq + 'static;

    // --- Queries ---

    /// First element matching `selector` in document order.
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// All elements matching `selector` in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    fn body(&self) -> Option<Self::Node>;

    // --- Classes, attributes, content ---

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add `class` when `on`, remove it otherwise.
    fn set_class(&self, node: &Self::Node, class: &str, on: bool) -> Result<(), DomError>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    fn set_text(&self, node: &Self::Node, text: &str);

    /// Set one inline style property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<(), DomError>;

    // --- Geometry and scrolling ---

    fn scroll_metrics(&self, node: &Self::Node) -> ScrollMetrics;

    /// Scroll `node` horizontally to `left`, animated when `smooth`.
    fn scroll_to_left(&self, node: &Self::Node, left: f64, smooth: bool);

    /// Viewport-relative bounding box.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Distance from the top of the offset parent.
    fn offset_top(&self, node: &Self::Node) -> f64;

    /// Vertical scroll offset of the window.
    fn scroll_y(&self) -> f64;

    // --- Tree ---

    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Detach `node` from its parent.
    fn remove(&self, node: &Self::Node) -> Result<(), DomError>;

    // --- Events and timers ---

    fn listen(&self, target: &EventTarget<Self::Node>, event: &str, handler: Handler) -> Result<ListenerId, DomError>;

    /// Remove a listener. Unknown ids are ignored. Safe to call from inside the listener itself.
    fn unlisten(&self, id: ListenerId);

    fn set_interval(&self, period_ms: u32, handler: Handler) -> TimerId;

    /// Cancel an interval. Unknown ids are ignored.
    fn clear_interval(&self, id: TimerId);

    /// Open `url` in the browsing context named `target`.
    fn open_window(&self, url: &str, target: &str) -> Result<(), DomError>;
}

/// String key-value persistence (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomError>;
}

/// Listener registrations owned by one component.
pub struct Subscription<D: Dom> {
    dom: Rc<D>,
    listeners: Vec<ListenerId>,
}

impl<D: Dom> Subscription<D> {
    #[must_use]
    pub fn new(dom: Rc<D>) -> Self {
        Self { dom, listeners: Vec::new() }
    }

    /// Register `handler` for `event` on `target`. Failures are logged and skipped.
    pub fn on(&mut self, target: EventTarget<D::Node>, event: &str, handler: Handler) {
        match self.dom.listen(&target, event, handler) {
            Ok(id) => self.listeners.push(id),
            Err(err) => log::warn!("failed to listen for {event}: {err}"),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Unregister every listener.
    pub fn detach(self) {}
}

impl<D: Dom> Drop for Subscription<D> {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.dom.unlisten(id);
        }
    }
}

/// A component together with the listeners that drive it.
///
/// Derefs to the component. Dropping (or [`Attached::detach`]) removes the
/// listeners; the component itself lives as long as other `Rc`s to it.
pub struct Attached<C, D: Dom> {
    component: Rc<C>,
    subscription: Subscription<D>,
}

impl<C, D: Dom> Attached<C, D> {
    #[must_use]
    pub fn new(component: Rc<C>, subscription: Subscription<D>) -> Self {
        Self { component, subscription }
    }

    pub fn component(&self) -> &Rc<C> {
        &self.component
    }

    pub fn subscription(&self) -> &Subscription<D> {
        &self.subscription
    }

    pub fn detach(self) {}
}

impl<C, D: Dom> Deref for Attached<C, D> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.component
    }
}

/// Add or remove `class`, logging instead of failing.
pub(crate) fn mark<D: Dom>(dom: &D, node: &D::Node, class: &str, on: bool) {
    if let Err(err) = dom.set_class(node, class, on) {
        log::warn!("failed to set class {class}={on}: {err}");
    }
}
