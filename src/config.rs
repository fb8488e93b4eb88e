//! Page configuration: selectors, class names and tunables.
//!
//! Every field defaults to the literal the stock portfolio template expects,
//! so an empty JSON object, or no config at all, needs no markup changes.
//! In the browser the config is read from an optional
//! `<script type="application/json" id="folio-config">` element.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::ConfigError;

/// Id of the inline JSON element the browser entry point reads.
pub const CONFIG_ELEMENT_ID: &str = "folio-config";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub selectors: Selectors,
    pub classes: ClassNames,
    pub pagination: PaginationConfig,
    pub proximity: ProximityConfig,
    pub navigation: NavigationConfig,
    pub accessibility: AccessibilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub projects_container: String,
    pub pagination_dots: String,
    pub shapes: String,
    /// Text-size trigger controls; each is optional in the markup.
    pub text_toggles: Vec<String>,
    pub nav_menu: String,
    pub menu_toggle: String,
    /// Links that close the mobile menu when clicked.
    pub menu_links: String,
    /// Links highlighted by the scroll spy.
    pub spy_links: String,
    pub sections: String,
    pub modal_images: String,
    pub header: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            projects_container: consts::PROJECTS_CONTAINER.into(),
            pagination_dots: consts::PAGINATION_DOTS.into(),
            shapes: consts::SHAPES.into(),
            text_toggles: vec![consts::ACCESS_TOGGLE_BUTTON.into(), consts::FLOATING_TOGGLE.into()],
            nav_menu: consts::NAV_MENU.into(),
            menu_toggle: consts::MENU_TOGGLE.into(),
            menu_links: consts::MENU_LINKS.into(),
            spy_links: consts::SPY_LINKS.into(),
            sections: consts::SECTIONS.into(),
            modal_images: consts::MODAL_IMAGES.into(),
            header: consts::HEADER.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Marks the current dot, the open menu, the current nav link and lit triggers.
    pub active: String,
    pub near: String,
    pub large_text: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            active: consts::ACTIVE_CLASS.into(),
            near: consts::NEAR_CLASS.into(),
            large_text: consts::LARGE_TEXT_CLASS.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub breakpoints: [f64; 2],
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { breakpoints: consts::PAGE_BREAKPOINTS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub threshold_px: f64,
    pub interval_ms: u32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            threshold_px: consts::PROXIMITY_THRESHOLD_PX,
            interval_ms: consts::PROXIMITY_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub spy_offset_px: f64,
    pub open_glyph: String,
    pub closed_glyph: String,
    /// Bind `click` on the menu control. Disable when markup calls `toggleMenu()` inline.
    pub bind_menu_control: bool,
    pub header_shadow_scrolled: String,
    pub header_shadow_resting: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            spy_offset_px: consts::SCROLL_SPY_OFFSET_PX,
            open_glyph: consts::MENU_OPEN_GLYPH.into(),
            closed_glyph: consts::MENU_CLOSED_GLYPH.into(),
            bind_menu_control: true,
            header_shadow_scrolled: consts::HEADER_SHADOW_SCROLLED.into(),
            header_shadow_resting: consts::HEADER_SHADOW_RESTING.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    pub storage_key: String,
    /// Bind `click` on the triggers. Disable when markup calls `toggleTextSize()` inline.
    pub bind_triggers: bool,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self {
            storage_key: consts::TEXT_SIZE_STORAGE_KEY.into(),
            bind_triggers: true,
        }
    }
}

impl PageConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the components cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [first, second] = self.pagination.breakpoints;
        if !(first > 0.0 && first < second && second < 1.0) {
            return Err(invalid(
                "pagination.breakpoints",
                format!("expected 0 < a < b < 1, got [{first}, {second}]"),
            ));
        }
        let threshold = self.proximity.threshold_px;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(invalid("proximity.threshold_px", format!("must be a finite non-negative number, got {threshold}")));
        }
        if self.proximity.interval_ms == 0 {
            return Err(invalid("proximity.interval_ms", "must be at least 1".into()));
        }
        let offset = self.navigation.spy_offset_px;
        if !offset.is_finite() || offset < 0.0 {
            return Err(invalid("navigation.spy_offset_px", format!("must be a finite non-negative number, got {offset}")));
        }
        if self.accessibility.storage_key.is_empty() {
            return Err(invalid("accessibility.storage_key", "must not be empty".into()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
