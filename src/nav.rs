//! Navigation: mobile menu, scroll spy and the header shadow.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use std::rc::Rc;

use crate::config::PageConfig;
use crate::dom::{Attached, Dom, EventTarget, Subscription, mark};

// =============================================================
// Mobile menu
// =============================================================

/// Hamburger menu: the control toggles the menu open, any nav link closes it.
pub struct MobileMenu<D: Dom> {
    dom: Rc<D>,
    menu: D::Node,
    control: D::Node,
    open_class: String,
    open_glyph: String,
    closed_glyph: String,
}

impl<D: Dom + 'static> MobileMenu<D> {
    /// Resolve the menu and its control. `None` when either is missing.
    pub fn new(dom: Rc<D>, config: &PageConfig) -> Option<Self> {
        let menu = dom.query(&config.selectors.nav_menu)?;
        let control = dom.query(&config.selectors.menu_toggle)?;
        Some(Self {
            dom,
            menu,
            control,
            open_class: config.classes.active.clone(),
            open_glyph: config.navigation.open_glyph.clone(),
            closed_glyph: config.navigation.closed_glyph.clone(),
        })
    }

    pub fn attach(dom: &Rc<D>, config: &PageConfig) -> Option<Attached<Self, D>> {
        let Some(menu) = Self::new(Rc::clone(dom), config) else {
            log::debug!("menu: menu or control missing, skipping");
            return None;
        };
        let menu = Rc::new(menu);
        let mut subscription = Subscription::new(Rc::clone(dom));

        if config.navigation.bind_menu_control {
            let on_toggle = Rc::clone(&menu);
            subscription.on(
                EventTarget::Node(menu.control.clone()),
                "click",
                Box::new(move || {
                    on_toggle.toggle();
                }),
            );
        }
        for link in dom.query_all(&config.selectors.menu_links) {
            let on_link = Rc::clone(&menu);
            subscription.on(EventTarget::Node(link), "click", Box::new(move || on_link.close()));
        }
        Some(Attached::new(menu, subscription))
    }

    /// Flip the menu and swap the glyph. Returns whether it is now open.
    pub fn toggle(&self) -> bool {
        let open = !self.is_open();
        mark(self.dom.as_ref(), &self.menu, &self.open_class, open);
        let glyph = if open { &self.open_glyph } else { &self.closed_glyph };
        self.dom.set_text(&self.control, glyph);
        open
    }

    pub fn close(&self) {
        mark(self.dom.as_ref(), &self.menu, &self.open_class, false);
        self.dom.set_text(&self.control, &self.closed_glyph);
    }

    pub fn is_open(&self) -> bool {
        self.dom.has_class(&self.menu, &self.open_class)
    }
}

// =============================================================
// Scroll spy
// =============================================================

/// Id of the current section: the last one, in document order, whose top
/// minus `offset` is at or above `scroll_y`.
#[must_use]
pub fn current_section<'a>(sections: &'a [(String, f64)], scroll_y: f64, offset: f64) -> Option<&'a str> {
    sections
        .iter()
        .rev()
        .find(|(_, top)| scroll_y >= top - offset)
        .map(|(id, _)| id.as_str())
}

/// Highlights the nav link pointing at the current section.
pub struct ScrollSpy<D: Dom> {
    dom: Rc<D>,
    sections: String,
    links: String,
    offset: f64,
    active_class: String,
}

impl<D: Dom + 'static> ScrollSpy<D> {
    #[must_use]
    pub fn new(dom: Rc<D>, config: &PageConfig) -> Self {
        Self {
            dom,
            sections: config.selectors.sections.clone(),
            links: config.selectors.spy_links.clone(),
            offset: config.navigation.spy_offset_px,
            active_class: config.classes.active.clone(),
        }
    }

    /// Sync once, then on every window scroll.
    pub fn attach(dom: &Rc<D>, config: &PageConfig) -> Attached<Self, D> {
        let spy = Rc::new(Self::new(Rc::clone(dom), config));
        spy.sync();
        let mut subscription = Subscription::new(Rc::clone(dom));
        let on_scroll = Rc::clone(&spy);
        subscription.on(
            EventTarget::Window,
            "scroll",
            Box::new(move || {
                on_scroll.sync();
            }),
        );
        Attached::new(spy, subscription)
    }

    /// Re-mark the links for the current scroll offset. Returns the current section id.
    pub fn sync(&self) -> Option<String> {
        let sections: Vec<(String, f64)> = self
            .dom
            .query_all(&self.sections)
            .iter()
            .filter_map(|node| {
                let id = self.dom.attribute(node, "id").filter(|id| !id.is_empty())?;
                Some((id, self.dom.offset_top(node)))
            })
            .collect();
        let current = current_section(&sections, self.dom.scroll_y(), self.offset).map(str::to_string);
        let href = current.as_ref().map(|id| format!("#{id}"));

        for link in self.dom.query_all(&self.links) {
            let on = href.is_some() && self.dom.attribute(&link, "href") == href;
            mark(self.dom.as_ref(), &link, &self.active_class, on);
        }
        current
    }
}

// =============================================================
// Header shadow
// =============================================================

/// Deepens the header shadow once the window has scrolled at all.
///
/// Nothing is written until the first scroll, so the stylesheet's shadow
/// stands at load.
pub struct HeaderShadow<D: Dom> {
    dom: Rc<D>,
    selector: String,
    scrolled: String,
    resting: String,
}

impl<D: Dom + 'static> HeaderShadow<D> {
    #[must_use]
    pub fn new(dom: Rc<D>, config: &PageConfig) -> Self {
        Self {
            dom,
            selector: config.selectors.header.clone(),
            scrolled: config.navigation.header_shadow_scrolled.clone(),
            resting: config.navigation.header_shadow_resting.clone(),
        }
    }

    pub fn attach(dom: &Rc<D>, config: &PageConfig) -> Attached<Self, D> {
        let shadow = Rc::new(Self::new(Rc::clone(dom), config));
        let mut subscription = Subscription::new(Rc::clone(dom));
        let on_scroll = Rc::clone(&shadow);
        subscription.on(EventTarget::Window, "scroll", Box::new(move || on_scroll.sync()));
        Attached::new(shadow, subscription)
    }

    pub fn sync(&self) {
        let Some(header) = self.dom.query(&self.selector) else {
            return;
        };
        let shadow = if self.dom.scroll_y() > 0.0 { &self.scrolled } else { &self.resting };
        if let Err(err) = self.dom.set_style(&header, "box-shadow", shadow) {
            log::warn!("header: failed to set shadow: {err}");
        }
    }
}
