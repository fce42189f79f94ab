//! Terminal user interface for stylus.
//!
//! Screens: login → notebook list → page list → page editor → rendered
//! preview. The interesting logic lives in [`state`]; [`app`] owns the
//! terminal and the event loop.
//!
//! Built with ratatui for cross-platform terminal support.

mod app;
mod components;
pub mod editor;
pub mod events;
pub mod state;
pub mod theme;

pub use app::run;
