//! Browser environment backed by `web-sys`, plus the WASM entry points.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only module that touches `window`, `document` or
//! `localStorage`. Listener closures are kept alive in a registry keyed by
//! [`ListenerId`]; unregistering drops the closure on a zero-delay timeout so
//! a listener can remove itself while it is running.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Storage, Window};

use crate::accessibility::TextSize;
use crate::config::{CONFIG_ELEMENT_ID, PageConfig};
use crate::dom::{Dom, EventTarget, Handler, KeyValueStore, ListenerId, ScrollMetrics, TimerId};
use crate::error::DomError;
use crate::geometry::Rect;
use crate::page::Page;

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

struct Registered {
    target: web_sys::EventTarget,
    event: String,
    closure: Closure<dyn FnMut()>,
}

pub struct WebDom {
    window: Window,
    document: Document,
    next_handle: Cell<u32>,
    listeners: RefCell<HashMap<ListenerId, Registered>>,
    timers: RefCell<HashMap<TimerId, Interval>>,
}

impl WebDom {
    pub fn new() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::Unavailable("window"))?;
        let document = window.document().ok_or(DomError::Unavailable("document"))?;
        Ok(Self {
            window,
            document,
            next_handle: Cell::new(1),
            listeners: RefCell::new(HashMap::new()),
            timers: RefCell::new(HashMap::new()),
        })
    }

    /// `localStorage` for this window. When storage is disabled every
    /// call on the returned store fails with [`DomError::Unavailable`].
    pub fn storage(&self) -> WebStorage {
        let storage = match self.window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::warn!("localStorage blocked: {}", DomError::from(err));
                None
            }
        };
        WebStorage { storage }
    }

    /// Parse the inline JSON config element, if the page has one.
    pub fn page_config(&self) -> PageConfig {
        let Some(raw) = self.document.get_element_by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) else {
            return PageConfig::default();
        };
        match PageConfig::from_json(&raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
                PageConfig::default()
            }
        }
    }

    fn next_handle(&self) -> u32 {
        let id = self.next_handle.get();
        self.next_handle.set(id.wrapping_add(1));
        id
    }

    fn event_target(&self, target: &EventTarget<Element>) -> web_sys::EventTarget {
        match target {
            EventTarget::Window => self.window.clone().into(),
            EventTarget::Document => self.document.clone().into(),
            EventTarget::Node(element) => element.clone().into(),
        }
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("invalid selector {selector:?}: {}", DomError::from(err));
                None
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("invalid selector {selector:?}: {}", DomError::from(err));
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter(JsCast::is_instance_of::<Element>)
            .map(JsCast::unchecked_into::<Element>)
            .collect()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&self, node: &Element, class: &str, on: bool) -> Result<(), DomError> {
        let list = node.class_list();
        if on { list.add_1(class)? } else { list.remove_1(class)? }
        Ok(())
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        node.set_attribute(name, value)?;
        Ok(())
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<(), DomError> {
        let element = node.dyn_ref::<HtmlElement>().ok_or(DomError::Unsupported("inline style"))?;
        element.style().set_property(property, value)?;
        Ok(())
    }

    fn scroll_metrics(&self, node: &Element) -> ScrollMetrics {
        ScrollMetrics::new(
            f64::from(node.scroll_left()),
            f64::from(node.scroll_width()),
            f64::from(node.client_width()),
        )
    }

    fn scroll_to_left(&self, node: &Element, left: f64, smooth: bool) {
        let options = ScrollToOptions::new();
        options.set_left(left);
        options.set_behavior(if smooth { ScrollBehavior::Smooth } else { ScrollBehavior::Instant });
        node.scroll_to_with_scroll_to_options(&options);
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn offset_top(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>().map_or(0.0, |el| f64::from(el.offset_top()))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        Ok(self.document.create_element(tag)?)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child)?;
        Ok(())
    }

    fn remove(&self, node: &Element) -> Result<(), DomError> {
        if node.parent_node().is_none() {
            return Err(DomError::Detached);
        }
        node.remove();
        Ok(())
    }

    fn listen(&self, target: &EventTarget<Element>, event: &str, handler: Handler) -> Result<ListenerId, DomError> {
        let target = self.event_target(target);
        let closure = Closure::<dyn FnMut()>::wrap(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref::<js_sys::Function>())?;
        let id = ListenerId(self.next_handle());
        self.listeners.borrow_mut().insert(id, Registered { target, event: event.into(), closure });
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        let Some(registered) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        let callback = registered.closure.as_ref().unchecked_ref::<js_sys::Function>();
        if let Err(err) = registered.target.remove_event_listener_with_callback(&registered.event, callback) {
            log::warn!("failed to remove {} listener: {}", registered.event, DomError::from(err));
        }
        // The listener may be the one currently running; drop it after this task.
        Timeout::new(0, move || drop(registered)).forget();
    }

    fn set_interval(&self, period_ms: u32, handler: Handler) -> TimerId {
        let id = TimerId(self.next_handle());
        let interval = Interval::new(period_ms, handler);
        self.timers.borrow_mut().insert(id, interval);
        id
    }

    fn clear_interval(&self, id: TimerId) {
        if let Some(interval) = self.timers.borrow_mut().remove(&id) {
            interval.cancel();
        }
    }

    fn open_window(&self, url: &str, target: &str) -> Result<(), DomError> {
        self.window.open_with_url_and_target(url, target)?;
        Ok(())
    }
}

pub struct WebStorage {
    storage: Option<Storage>,
}

impl WebStorage {
    fn storage(&self) -> Result<&Storage, DomError> {
        self.storage.as_ref().ok_or(DomError::Unavailable("localStorage"))
    }
}

impl KeyValueStore for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomError> {
        Ok(self.storage()?.get_item(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomError> {
        self.storage()?.set_item(key, value)?;
        Ok(())
    }
}

// =============================================================
// WASM exports
// =============================================================

thread_local! {
    static PAGE: RefCell<Option<Page<WebDom, WebStorage>>> = const { RefCell::new(None) };
}

/// Install logging and mount the page once the document has been parsed.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if let Err(err) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("logger already installed: {err}").into());
    }

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("no document; page behaviors disabled");
        return;
    };
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(mount);
        if let Err(err) = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
            log::warn!("failed to wait for DOMContentLoaded: {}", DomError::from(err));
        }
    } else {
        mount();
    }
}

fn mount() {
    let dom = match WebDom::new() {
        Ok(dom) => dom,
        Err(err) => {
            log::warn!("page behaviors disabled: {err}");
            return;
        }
    };
    let store = dom.storage();
    let config = dom.page_config();
    let page = Page::mount(Rc::new(dom), Rc::new(store), &config);
    let previous = PAGE.with(|slot| slot.borrow_mut().replace(page));
    drop(previous);
}

/// Flip large-text mode. Exported to JS as `toggleTextSize` for `onclick` markup.
#[wasm_bindgen(js_name = toggleTextSize)]
pub fn toggle_text_size() -> Option<String> {
    PAGE.with(|slot| slot.borrow().as_ref().map(|page| page.toggle_text_size().to_string()))
}

/// Flip the mobile menu. Returns whether it is now open.
#[wasm_bindgen(js_name = toggleMenu)]
pub fn toggle_menu() -> Option<bool> {
    PAGE.with(|slot| slot.borrow().as_ref().and_then(Page::toggle_menu))
}

/// Open an image in a new tab.
#[wasm_bindgen(js_name = openImage)]
pub fn open_image(src: &str) {
    PAGE.with(|slot| {
        if let Some(page) = slot.borrow().as_ref() {
            if let Err(err) = page.open_image(src) {
                log::warn!("failed to open {src}: {err}");
            }
        }
    });
}

/// Tear down every behavior and stop polling.
#[wasm_bindgen]
pub fn unmount() {
    let page = PAGE.with(|slot| slot.borrow_mut().take());
    if let Some(page) = page {
        page.unmount();
    }
}

/// Current text size, `"default"` or `"large"`.
#[wasm_bindgen(js_name = textSize)]
pub fn text_size() -> String {
    PAGE.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(TextSize::Default, |page| page.accessibility().current())
            .to_string()
    })
}
