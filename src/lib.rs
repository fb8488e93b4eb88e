//! Interactivity for a static portfolio page, compiled to WebAssembly.
//!
//! Every behavior is a reaction to a DOM event or a timer tick: pagination
//! dots that follow a horizontally scrolling projects strip, "near"
//! highlighting between decorative shapes, a persisted large-text toggle, the
//! mobile navigation menu, scroll-spy link highlighting, a header shadow and
//! an image lightbox. Components never touch browser globals directly; they
//! receive an environment ([`dom::Dom`] + [`dom::KeyValueStore`]) at
//! construction, so the same code runs against `web-sys` in the browser and
//! against an in-memory double in tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Environment traits, event targets, listener subscriptions |
//! | [`geometry`] | Viewport points and rectangles |
//! | [`config`] | Selectors, class names and tunables (`PageConfig`) |
//! | [`error`] | `DomError` and `ConfigError` |
//! | [`consts`] | Default literals used by the page script |
//! | [`pagination`] | Projects strip dots |
//! | [`proximity`] | Polling shape-proximity monitor |
//! | [`accessibility`] | Text size toggle and its persisted preference |
//! | [`nav`] | Mobile menu, scroll spy, header shadow |
//! | [`modal`] | Image lightbox overlays |
//! | [`page`] | Mounts every component against one environment |
//! | `web` | `web-sys` environment and WASM exports (feature `browser`) |

pub mod accessibility;
pub mod config;
pub mod consts;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod modal;
pub mod nav;
pub mod page;
pub mod pagination;
pub mod proximity;

#[cfg(feature = "browser")]
pub mod web;

#[cfg(test)]
mod fake;
