//! stylus: an interactive terminal client for Code Society notebooks.
//!
//! An authenticated user browses their notebooks and pages from the remote
//! service, edits a page's markdown in a buffer, and previews the rendered
//! result. Edits live only in the in-process cache; nothing is ever written
//! back to the service.
//!
//! # Architecture
//!
//! - [`api`]: GraphQL client (login mutation, notebooks query)
//! - [`model`]: session, notebook cache, pages, selection
//! - [`render`]: markdown to styled terminal lines
//! - [`tui`]: screens, event loop, and the navigation state machine
//! - [`cli`]: startup flags and logging setup
//! - [`config`]: configuration file handling
//! - [`error`]: error types and exit codes

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod tui;

// Re-export commonly used types at the crate root
pub use error::{Result, StylusError};
pub use model::{Notebook, Page, Session};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
