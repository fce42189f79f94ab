//! Core data structures: the authenticated session and the in-memory
//! notebook cache it owns.
//!
//! The cache is populated once per login by a wholesale fetch and is never
//! incrementally merged or invalidated; the only way to refresh it is to
//! re-login. Edits committed from the editor land here and nowhere else —
//! nothing is ever written back to the remote service.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Result, StylusError};

/// Login credentials, moved into the authenticate call and never stored.
///
/// Both fields may be empty; validity is the remote service's call.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// The authenticated context for the current login.
///
/// Owned exclusively by the navigation state machine for the process
/// lifetime; dropped on quit or on returning to the login screen.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session token returned by the login mutation.
    pub token: String,
    /// Authenticated user id.
    pub user_id: String,
    /// Authenticated username.
    pub username: String,
    /// Notebook cache, empty until the post-login fetch completes.
    pub notebooks: Vec<Notebook>,
}

impl Session {
    /// Create a session with an empty notebook cache.
    #[must_use]
    pub fn new(token: String, user_id: String, username: String) -> Self {
        Self {
            token,
            user_id,
            username,
            notebooks: Vec::new(),
        }
    }

    /// Look up a notebook by id.
    ///
    /// Deterministic linear scan: the first (and expected only) notebook
    /// whose id matches.
    pub fn notebook(&self, id: &str) -> Result<&Notebook> {
        self.notebooks
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| StylusError::not_found("notebook", id))
    }

    /// Look up a notebook by id, mutably. Used when committing an edit
    /// buffer back into the cache.
    pub fn notebook_mut(&mut self, id: &str) -> Result<&mut Notebook> {
        self.notebooks
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| StylusError::not_found("notebook", id))
    }
}

/// A named collection of pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    /// Notebook id, unique within a session.
    pub id: String,
    /// Notebook title.
    pub title: String,
    /// Notebook description.
    pub description: String,
    /// Last modification time reported by the service.
    pub updated_at: DateTime<Utc>,
    /// Pages belonging to this notebook.
    pub pages: Vec<Page>,
}

impl Notebook {
    /// Look up a page by id within this notebook.
    pub fn page(&self, id: &str) -> Result<&Page> {
        self.pages
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StylusError::not_found("page", id))
    }

    /// Look up a page by id, mutably.
    pub fn page_mut(&mut self, id: &str) -> Result<&mut Page> {
        self.pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StylusError::not_found("page", id))
    }
}

/// A unit of markdown content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page id, unique within its owning notebook.
    pub id: String,
    /// Optional reference to another page's id.
    ///
    /// The service models pages as a tree but the UI renders them as a flat
    /// list, so this is carried as inert metadata.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Page title.
    pub title: String,
    /// Last modification time reported by the service.
    pub updated_at: DateTime<Utc>,
    /// Raw markdown content.
    pub content: String,
}

/// The current navigation selection: at most one notebook and one page.
///
/// Cleared level by level as the user navigates back up.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected notebook id, set while in the page list or deeper.
    pub notebook_id: Option<String>,
    /// Selected page id, set while in the editor or preview.
    pub page_id: Option<String>,
}

impl Selection {
    /// Clear the page selection, keeping the notebook.
    pub fn clear_page(&mut self) {
        self.page_id = None;
    }

    /// Clear the whole selection.
    pub fn clear(&mut self) {
        self.notebook_id = None;
        self.page_id = None;
    }
}
