//! Image lightbox.
//!
//! Each click on a table image builds a fresh full-screen overlay holding an
//! enlarged copy of the image. Clicking the overlay removes that overlay and
//! its listener. Overlays are never reused and nothing stops several from
//! stacking up. Dropping the modal closes whatever is still open.

#[cfg(test)]
#[path = "modal_test.rs"]
mod modal_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::PageConfig;
use crate::consts::{NEW_TAB_TARGET, OVERLAY_IMAGE_STYLE, OVERLAY_STYLE};
use crate::dom::{Attached, Dom, EventTarget, ListenerId, Subscription};
use crate::error::DomError;

/// Open `src` in a new browsing context.
pub fn open_image<D: Dom>(dom: &D, src: &str) -> Result<(), DomError> {
    dom.open_window(src, NEW_TAB_TARGET)
}

struct OpenOverlay<N> {
    overlay: N,
    listener: Option<ListenerId>,
}

pub struct ImageModal<D: Dom> {
    dom: Rc<D>,
    open: RefCell<Vec<OpenOverlay<D::Node>>>,
}

impl<D: Dom + 'static> ImageModal<D> {
    #[must_use]
    pub fn new(dom: Rc<D>) -> Self {
        Self { dom, open: RefCell::new(Vec::new()) }
    }

    /// Bind every matching image. `None` when the page has none.
    pub fn attach(dom: &Rc<D>, config: &PageConfig) -> Option<Attached<Self, D>> {
        let images = dom.query_all(&config.selectors.modal_images);
        if images.is_empty() {
            log::debug!("modal: no images, skipping");
            return None;
        }
        let modal = Rc::new(Self::new(Rc::clone(dom)));
        let mut subscription = Subscription::new(Rc::clone(dom));
        for image in images {
            let weak = Rc::downgrade(&modal);
            let source = image.clone();
            subscription.on(
                EventTarget::Node(image),
                "click",
                Box::new(move || {
                    if let Some(modal) = weak.upgrade() {
                        if let Err(err) = modal.open_for(&source) {
                            log::warn!("modal: failed to open overlay: {err}");
                        }
                    }
                }),
            );
        }
        Some(Attached::new(modal, subscription))
    }

    /// Build an overlay showing a copy of `image` and append it to the body.
    pub fn open_for(self: &Rc<Self>, image: &D::Node) -> Result<D::Node, DomError> {
        let dom = self.dom.as_ref();
        let body = dom.body().ok_or(DomError::Unavailable("document.body"))?;

        let overlay = dom.create_element("div")?;
        for (property, value) in OVERLAY_STYLE {
            dom.set_style(&overlay, property, value)?;
        }
        let enlarged = dom.create_element("img")?;
        dom.set_attribute(&enlarged, "src", &dom.attribute(image, "src").unwrap_or_default())?;
        dom.set_attribute(&enlarged, "alt", &dom.attribute(image, "alt").unwrap_or_default())?;
        for (property, value) in OVERLAY_IMAGE_STYLE {
            dom.set_style(&enlarged, property, value)?;
        }
        dom.append_child(&overlay, &enlarged)?;
        dom.append_child(&body, &overlay)?;

        let weak: Weak<Self> = Rc::downgrade(self);
        let target = overlay.clone();
        let listener = match dom.listen(
            &EventTarget::Node(overlay.clone()),
            "click",
            Box::new(move || {
                if let Some(modal) = weak.upgrade() {
                    modal.close(&target);
                }
            }),
        ) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("modal: overlay will not be dismissable: {err}");
                None
            }
        };
        self.open.borrow_mut().push(OpenOverlay { overlay: overlay.clone(), listener });
        Ok(overlay)
    }
}

impl<D: Dom> ImageModal<D> {
    /// Remove `overlay` and its listener. Returns `false` if it is not open.
    pub fn close(&self, overlay: &D::Node) -> bool {
        let entry = {
            let mut open = self.open.borrow_mut();
            let Some(index) = open.iter().position(|o| &o.overlay == overlay) else {
                return false;
            };
            open.remove(index)
        };
        self.dispose(entry);
        true
    }

    /// Close every open overlay. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let entries: Vec<_> = self.open.borrow_mut().drain(..).collect();
        let count = entries.len();
        for entry in entries {
            self.dispose(entry);
        }
        count
    }

    pub fn open_count(&self) -> usize {
        self.open.borrow().len()
    }

    fn dispose(&self, entry: OpenOverlay<D::Node>) {
        if let Some(id) = entry.listener {
            self.dom.unlisten(id);
        }
        if let Err(err) = self.dom.remove(&entry.overlay) {
            log::warn!("modal: failed to remove overlay: {err}");
        }
    }
}

impl<D: Dom> Drop for ImageModal<D> {
    fn drop(&mut self) {
        self.close_all();
    }
}
