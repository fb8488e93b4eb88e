//! In-memory [`Dom`] and [`KeyValueStore`] for tests.
//!
//! Supports the selector subset the page uses: tag, `#id`, `.class` and
//! `[attr]` compounds joined by descendant whitespace, with `,` alternatives.
//! Events do not bubble; tests dispatch straight to the node under test.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::dom::{Dom, EventTarget, Handler, KeyValueStore, ListenerId, ScrollMetrics, TimerId};
use crate::error::DomError;
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    scroll: ScrollMetrics,
    rect: Rect,
    offset_top: f64,
}

type SharedHandler = Rc<RefCell<Handler>>;

struct Registered {
    target: EventTarget<NodeId>,
    event: String,
    handler: SharedHandler,
}

pub struct FakeDom {
    nodes: RefCell<Vec<NodeData>>,
    root: NodeId,
    body: NodeId,
    scroll_y: Cell<f64>,
    next_handle: Cell<u32>,
    listeners: RefCell<BTreeMap<ListenerId, Registered>>,
    timers: RefCell<BTreeMap<TimerId, (u32, SharedHandler)>>,
    smooth_scrolls: Cell<usize>,
    opened: RefCell<Vec<(String, String)>>,
}

impl FakeDom {
    /// A document holding `<html><body></body></html>`.
    pub fn new() -> Rc<Self> {
        let html = NodeData { tag: "html".into(), ..NodeData::default() };
        let body = NodeData { tag: "body".into(), parent: Some(NodeId(0)), ..NodeData::default() };
        let dom = Self {
            nodes: RefCell::new(vec![html, body]),
            root: NodeId(0),
            body: NodeId(1),
            scroll_y: Cell::new(0.0),
            next_handle: Cell::new(1),
            listeners: RefCell::new(BTreeMap::new()),
            timers: RefCell::new(BTreeMap::new()),
            smooth_scrolls: Cell::new(0),
            opened: RefCell::new(Vec::new()),
        };
        dom.nodes.borrow_mut()[0].children.push(NodeId(1));
        Rc::new(dom)
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    // --- Building ---

    /// Append a new `<tag>` under `parent`.
    pub fn add(&self, parent: NodeId, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(NodeData { tag: tag.into(), parent: Some(parent), ..NodeData::default() });
        nodes[parent.0].children.push(id);
        id
    }

    /// Append a new `<tag id="...">` under `parent`.
    pub fn add_with_id(&self, parent: NodeId, tag: &str, id: &str) -> NodeId {
        let node = self.add(parent, tag);
        self.put_attr(node, "id", id);
        node
    }

    /// Append a new `<tag class="...">` under `parent`.
    pub fn add_with_class(&self, parent: NodeId, tag: &str, class: &str) -> NodeId {
        let node = self.add(parent, tag);
        self.nodes.borrow_mut()[node.0].classes.push(class.into());
        node
    }

    pub fn put_attr(&self, node: NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0].attrs.insert(name.into(), value.into());
    }

    pub fn put_scroll(&self, node: NodeId, metrics: ScrollMetrics) {
        self.nodes.borrow_mut()[node.0].scroll = metrics;
    }

    pub fn put_scroll_left(&self, node: NodeId, left: f64) {
        self.nodes.borrow_mut()[node.0].scroll.scroll_left = left;
    }

    pub fn put_rect(&self, node: NodeId, rect: Rect) {
        self.nodes.borrow_mut()[node.0].rect = rect;
    }

    pub fn put_offset_top(&self, node: NodeId, top: f64) {
        self.nodes.borrow_mut()[node.0].offset_top = top;
    }

    pub fn put_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    // --- Inspection ---

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].styles.get(property).cloned()
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn scroll_left(&self, node: NodeId) -> f64 {
        self.nodes.borrow()[node.0].scroll.scroll_left
    }

    pub fn smooth_scroll_count(&self) -> usize {
        self.smooth_scrolls.get()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn timer_periods(&self) -> Vec<u32> {
        self.timers.borrow().values().map(|(period, _)| *period).collect()
    }

    pub fn opened_windows(&self) -> Vec<(String, String)> {
        self.opened.borrow().clone()
    }

    // --- Driving ---

    /// Invoke every listener for `event` on `target`.
    pub fn dispatch(&self, target: &EventTarget<NodeId>, event: &str) {
        let handlers: Vec<SharedHandler> = self
            .listeners
            .borrow()
            .values()
            .filter(|r| &r.target == target && r.event == event)
            .map(|r| Rc::clone(&r.handler))
            .collect();
        for handler in handlers {
            (handler.borrow_mut())();
        }
    }

    pub fn click(&self, node: NodeId) {
        self.dispatch(&EventTarget::Node(node), "click");
    }

    /// Set the window scroll offset and fire `scroll` on the window.
    pub fn scroll_window_to(&self, y: f64) {
        self.scroll_y.set(y);
        self.dispatch(&EventTarget::Window, "scroll");
    }

    /// Set an element's `scrollLeft` and fire `scroll` on it.
    pub fn scroll_element_to(&self, node: NodeId, left: f64) {
        self.put_scroll_left(node, left);
        self.dispatch(&EventTarget::Node(node), "scroll");
    }

    /// Fire every interval once.
    pub fn tick_timers(&self) {
        let handlers: Vec<SharedHandler> = self.timers.borrow().values().map(|(_, h)| Rc::clone(h)).collect();
        for handler in handlers {
            (handler.borrow_mut())();
        }
    }

    // --- Internals ---

    fn next_handle(&self) -> u32 {
        let id = self.next_handle.get();
        self.next_handle.set(id + 1);
        id
    }

    fn document_order(&self) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for child in nodes[id.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        selector.split(',').any(|alt| {
            let chain: Vec<Compound> = alt.split_whitespace().map(Compound::parse).collect();
            !chain.is_empty() && self.matches_chain(node, &chain)
        })
    }

    fn matches_chain(&self, node: NodeId, chain: &[Compound]) -> bool {
        let nodes = self.nodes.borrow();
        let Some((last, ancestors)) = chain.split_last() else {
            return false;
        };
        if !last.matches(&nodes[node.0]) {
            return false;
        }
        let mut pending = ancestors.len();
        let mut cursor = nodes[node.0].parent;
        while pending > 0 {
            let Some(id) = cursor else {
                return false;
            };
            if ancestors[pending - 1].matches(&nodes[id.0]) {
                pending -= 1;
            }
            cursor = nodes[id.0].parent;
        }
        true
    }
}

#[derive(Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<String>,
}

impl Compound {
    fn parse(raw: &str) -> Self {
        let mut out = Self::default();
        let mut kind = 't';
        let mut buf = String::new();
        let flush = |kind: char, buf: &mut String, out: &mut Self| {
            if buf.is_empty() {
                return;
            }
            let value = std::mem::take(buf);
            match kind {
                '#' => out.id = Some(value),
                '.' => out.classes.push(value),
                '[' => out.attrs.push(value),
                _ => out.tag = Some(value),
            }
        };
        for ch in raw.chars() {
            match ch {
                '#' | '.' | '[' => {
                    flush(kind, &mut buf, &mut out);
                    kind = ch;
                }
                ']' => flush(kind, &mut buf, &mut out),
                _ => buf.push(ch),
            }
        }
        flush(kind, &mut buf, &mut out);
        out
    }

    fn matches(&self, node: &NodeData) -> bool {
        if self.tag.as_ref().is_some_and(|t| *t != node.tag) {
            return false;
        }
        if self.id.as_ref().is_some_and(|id| node.attrs.get("id") != Some(id)) {
            return false;
        }
        self.classes.iter().all(|c| node.classes.contains(c)) && self.attrs.iter().all(|a| node.attrs.contains_key(a))
    }
}

impl Dom for FakeDom {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.document_order().into_iter().filter(|id| self.matches(*id, selector)).collect()
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn set_class(&self, node: &NodeId, class: &str, on: bool) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        classes.retain(|c| c != class);
        if on {
            classes.push(class.into());
        }
        Ok(())
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.put_attr(*node, name, value);
        Ok(())
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.into();
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        self.nodes.borrow_mut()[node.0].styles.insert(property.into(), value.into());
        Ok(())
    }

    fn scroll_metrics(&self, node: &NodeId) -> ScrollMetrics {
        self.nodes.borrow()[node.0].scroll
    }

    fn scroll_to_left(&self, node: &NodeId, left: f64, smooth: bool) {
        if smooth {
            self.smooth_scrolls.set(self.smooth_scrolls.get() + 1);
        }
        self.put_scroll_left(*node, left);
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.nodes.borrow()[node.0].rect
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].offset_top
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(NodeData { tag: tag.into(), ..NodeData::default() });
        Ok(id)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(old) = nodes[child.0].parent.take() {
            nodes[old.0].children.retain(|c| c != child);
        }
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.push(*child);
        Ok(())
    }

    fn remove(&self, node: &NodeId) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        let parent = nodes[node.0].parent.take().ok_or(DomError::Detached)?;
        nodes[parent.0].children.retain(|c| c != node);
        Ok(())
    }

    fn listen(&self, target: &EventTarget<NodeId>, event: &str, handler: Handler) -> Result<ListenerId, DomError> {
        let id = ListenerId(self.next_handle());
        let registered = Registered {
            target: target.clone(),
            event: event.into(),
            handler: Rc::new(RefCell::new(handler)),
        };
        self.listeners.borrow_mut().insert(id, registered);
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
    }

    fn set_interval(&self, period_ms: u32, handler: Handler) -> TimerId {
        let id = TimerId(self.next_handle());
        self.timers.borrow_mut().insert(id, (period_ms, Rc::new(RefCell::new(handler))));
        id
    }

    fn clear_interval(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id);
    }

    fn open_window(&self, url: &str, target: &str) -> Result<(), DomError> {
        self.opened.borrow_mut().push((url.into(), target.into()));
        Ok(())
    }
}

/// `localStorage` stand-in. Survives across `FakeDom`s to simulate reloads.
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with_item(key: &str, value: &str) -> Rc<Self> {
        let store = Self::default();
        store.items.borrow_mut().insert(key.into(), value.into());
        Rc::new(store)
    }

    pub fn item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    /// Make every subsequent `set_item` fail, like a full or disabled store.
    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomError> {
        Ok(self.item(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomError> {
        if self.fail_writes.get() {
            return Err(DomError::Js("QuotaExceededError".into()));
        }
        self.items.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }
}
