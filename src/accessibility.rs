//! Large-text accessibility toggle.
//!
//! The mode lives as the `large-text` class on `<body>` and is mirrored as
//! `active` on each trigger control present in the markup. The choice is
//! persisted under one storage key and restored once at attach.

#[cfg(test)]
#[path = "accessibility_test.rs"]
mod accessibility_test;

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::config::PageConfig;
use crate::dom::{Attached, Dom, EventTarget, KeyValueStore, Subscription, mark};

/// Persisted text size preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    #[default]
    Default,
    Large,
}

impl TextSize {
    /// The value written to storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Large => "large",
        }
    }

    #[must_use]
    pub fn is_large(self) -> bool {
        self == Self::Large
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Default => Self::Large,
            Self::Large => Self::Default,
        }
    }

    fn from_large(large: bool) -> Self {
        if large { Self::Large } else { Self::Default }
    }
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown text size: {0:?}")]
pub struct UnknownTextSize(pub String);

impl FromStr for TextSize {
    type Err = UnknownTextSize;

    /// Exact, case-sensitive match on the stored strings.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "default" => Ok(Self::Default),
            "large" => Ok(Self::Large),
            other => Err(UnknownTextSize(other.to_string())),
        }
    }
}

pub struct AccessibilityToggle<D: Dom, S: KeyValueStore> {
    dom: Rc<D>,
    store: Rc<S>,
    triggers: Vec<String>,
    storage_key: String,
    large_class: String,
    active_class: String,
}

impl<D: Dom + 'static, S: KeyValueStore + 'static> AccessibilityToggle<D, S> {
    #[must_use]
    pub fn new(dom: Rc<D>, store: Rc<S>, config: &PageConfig) -> Self {
        Self {
            dom,
            store,
            triggers: config.selectors.text_toggles.clone(),
            storage_key: config.accessibility.storage_key.clone(),
            large_class: config.classes.large_text.clone(),
            active_class: config.classes.active.clone(),
        }
    }

    /// Restore the saved preference and, if enabled, bind clicks on the triggers.
    pub fn attach(dom: &Rc<D>, store: &Rc<S>, config: &PageConfig) -> Attached<Self, D> {
        let toggle = Rc::new(Self::new(Rc::clone(dom), Rc::clone(store), config));
        toggle.restore();

        let mut subscription = Subscription::new(Rc::clone(dom));
        if config.accessibility.bind_triggers {
            for trigger in toggle.trigger_nodes() {
                let on_click = Rc::clone(&toggle);
                subscription.on(
                    EventTarget::Node(trigger),
                    "click",
                    Box::new(move || {
                        on_click.toggle();
                    }),
                );
            }
        }
        Attached::new(toggle, subscription)
    }

    /// Flip the mode, mirror it on the triggers and persist it.
    pub fn toggle(&self) -> TextSize {
        if self.dom.body().is_none() {
            return TextSize::Default;
        }
        let next = self.current().toggled();
        self.apply(next);
        if let Err(err) = self.store.set_item(&self.storage_key, next.as_str()) {
            log::warn!("text size: failed to persist {next}: {err}");
        }
        log::debug!("text size: now {next}");
        next
    }

    /// Apply the stored preference. Only an exact `"large"` changes the page.
    pub fn restore(&self) -> TextSize {
        let stored = match self.store.get_item(&self.storage_key) {
            Ok(stored) => stored,
            Err(err) => {
                log::warn!("text size: failed to read preference: {err}");
                None
            }
        };
        match stored.as_deref().map(str::parse::<TextSize>) {
            Some(Ok(TextSize::Large)) => {
                self.apply(TextSize::Large);
                TextSize::Large
            }
            _ => TextSize::Default,
        }
    }

    /// Mode currently shown on the page.
    pub fn current(&self) -> TextSize {
        let large = self.dom.body().is_some_and(|body| self.dom.has_class(&body, &self.large_class));
        TextSize::from_large(large)
    }

    fn apply(&self, size: TextSize) {
        let on = size.is_large();
        if let Some(body) = self.dom.body() {
            mark(self.dom.as_ref(), &body, &self.large_class, on);
        }
        for trigger in self.trigger_nodes() {
            mark(self.dom.as_ref(), &trigger, &self.active_class, on);
        }
    }

    fn trigger_nodes(&self) -> Vec<D::Node> {
        self.triggers.iter().filter_map(|selector| self.dom.query(selector)).collect()
    }
}
