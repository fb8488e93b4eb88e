//! Default literals for the portfolio page script.
//!
//! These seed [`crate::config::PageConfig`]; markup that follows the stock
//! page template never needs to override them.

// ── Selectors ───────────────────────────────────────────────────

pub const PROJECTS_CONTAINER: &str = "#projectsContainer";
pub const PAGINATION_DOTS: &str = ".pagination-dots .dot";
pub const SHAPES: &str = ".shape";
pub const ACCESS_TOGGLE_BUTTON: &str = "#accessToggleBtn";
pub const FLOATING_TOGGLE: &str = "#floatingToggle";
pub const NAV_MENU: &str = "#nav-menu";
pub const MENU_TOGGLE: &str = ".menu-toggle";
pub const MENU_LINKS: &str = "nav a";
pub const SPY_LINKS: &str = ".nav-link";
pub const SECTIONS: &str = "section[id]";
pub const MODAL_IMAGES: &str = "#personalTable img";
pub const HEADER: &str = "header";

// ── Class names ─────────────────────────────────────────────────

pub const ACTIVE_CLASS: &str = "active";
pub const NEAR_CLASS: &str = "near";
pub const LARGE_TEXT_CLASS: &str = "large-text";

// ── Pagination ──────────────────────────────────────────────────

/// Scroll ratios at which the strip moves to page 1 and page 2.
pub const PAGE_BREAKPOINTS: [f64; 2] = [0.33, 0.66];

// ── Proximity ───────────────────────────────────────────────────

/// Center-to-center distance, in CSS pixels, below which two shapes are near.
pub const PROXIMITY_THRESHOLD_PX: f64 = 80.0;

/// Polling period of the proximity monitor.
pub const PROXIMITY_INTERVAL_MS: u32 = 100;

// ── Navigation ──────────────────────────────────────────────────

/// A section becomes current this many pixels before its top reaches the viewport top.
pub const SCROLL_SPY_OFFSET_PX: f64 = 100.0;

pub const MENU_OPEN_GLYPH: &str = "\u{2715}";
pub const MENU_CLOSED_GLYPH: &str = "\u{2630}";

pub const HEADER_SHADOW_SCROLLED: &str = "0 4px 20px rgba(0, 0, 0, 0.15)";
pub const HEADER_SHADOW_RESTING: &str = "0 2px 10px rgba(0, 0, 0, 0.1)";

// ── Accessibility ───────────────────────────────────────────────

pub const TEXT_SIZE_STORAGE_KEY: &str = "textSize";

// ── Modal ───────────────────────────────────────────────────────

pub const OVERLAY_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("background", "rgba(0, 0, 0, 0.8)"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("z-index", "10000"),
    ("cursor", "pointer"),
];

pub const OVERLAY_IMAGE_STYLE: &[(&str, &str)] = &[
    ("max-width", "90%"),
    ("max-height", "90%"),
    ("border-radius", "10px"),
    ("box-shadow", "0 10px 50px rgba(0, 0, 0, 0.5)"),
];

/// Browsing context used by [`crate::modal::open_image`].
pub const NEW_TAB_TARGET: &str = "_blank";
