//! Mounts every page behavior against one environment.
//!
//! `Page` owns all subscriptions and the proximity timer. Components whose
//! markup is absent are simply not mounted. Dropping the page, or calling
//! [`Page::unmount`], removes every listener and stops polling.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::rc::Rc;

use crate::accessibility::{AccessibilityToggle, TextSize};
use crate::config::PageConfig;
use crate::dom::{Attached, Dom, KeyValueStore};
use crate::error::DomError;
use crate::modal::{self, ImageModal};
use crate::nav::{HeaderShadow, MobileMenu, ScrollSpy};
use crate::pagination::Pagination;
use crate::proximity::ProximityMonitor;

pub struct Page<D: Dom, S: KeyValueStore> {
    dom: Rc<D>,
    pagination: Option<Attached<Pagination<D>, D>>,
    proximity: ProximityMonitor<D>,
    accessibility: Attached<AccessibilityToggle<D, S>, D>,
    menu: Option<Attached<MobileMenu<D>, D>>,
    scroll_spy: Attached<ScrollSpy<D>, D>,
    header: Attached<HeaderShadow<D>, D>,
    modal: Option<Attached<ImageModal<D>, D>>,
}

impl<D: Dom + 'static, S: KeyValueStore + 'static> Page<D, S> {
    /// Attach every behavior whose markup is present and start proximity polling.
    pub fn mount(dom: Rc<D>, store: Rc<S>, config: &PageConfig) -> Self {
        let page = Self {
            pagination: Pagination::attach(&dom, config),
            proximity: ProximityMonitor::new(Rc::clone(&dom), config),
            accessibility: AccessibilityToggle::attach(&dom, &store, config),
            menu: MobileMenu::attach(&dom, config),
            scroll_spy: ScrollSpy::attach(&dom, config),
            header: HeaderShadow::attach(&dom, config),
            modal: ImageModal::attach(&dom, config),
            dom,
        };
        page.proximity.start();
        log::info!(
            "page mounted: pagination={} menu={} modal={}",
            page.pagination.is_some(),
            page.menu.is_some(),
            page.modal.is_some()
        );
        page
    }

    /// Flip the large-text mode.
    pub fn toggle_text_size(&self) -> TextSize {
        self.accessibility.toggle()
    }

    /// Flip the mobile menu. `None` when the page has no menu.
    pub fn toggle_menu(&self) -> Option<bool> {
        self.menu.as_ref().map(|menu| menu.toggle())
    }

    /// Open `src` in a new tab.
    pub fn open_image(&self, src: &str) -> Result<(), DomError> {
        modal::open_image(self.dom.as_ref(), src)
    }

    pub fn pagination(&self) -> Option<&Pagination<D>> {
        self.pagination.as_deref()
    }

    pub fn proximity(&self) -> &ProximityMonitor<D> {
        &self.proximity
    }

    pub fn accessibility(&self) -> &AccessibilityToggle<D, S> {
        &self.accessibility
    }

    pub fn menu(&self) -> Option<&MobileMenu<D>> {
        self.menu.as_deref()
    }

    pub fn scroll_spy(&self) -> &ScrollSpy<D> {
        &self.scroll_spy
    }

    pub fn header(&self) -> &HeaderShadow<D> {
        &self.header
    }

    pub fn modal(&self) -> Option<&ImageModal<D>> {
        self.modal.as_deref()
    }

    /// Detach every behavior and stop polling.
    pub fn unmount(self) {
        log::info!("page unmounted");
    }
}
