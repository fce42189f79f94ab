//! The navigation state machine.
//!
//! Owns the session, the notebook cache, the edit buffer, and the current
//! screen. All mutation happens through [`AppState::handle_message`], which
//! processes one message at a time (see [`crate::tui::events`]); side
//! effects that must leave the loop — dispatching a login, quitting — are
//! returned as a [`Command`] for the event loop to execute.
//!
//! Screens form a strict stack: Login → NotebookList → PageList → PageEdit
//! → PageRender. Exactly one is active at any time. Going down a level sets
//! the corresponding selection; going back up clears it.
//!
//! Commit policy: edits become visible to the preview/cache only through
//! the explicit commit+preview action (Ctrl+R); leaving the editor with Esc
//! discards them.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;
use tracing::{debug, warn};
use tui_textarea::TextArea;

use crate::error::StylusError;
use crate::model::{Credentials, Notebook, Page, Selection, Session};
use crate::render;

use super::editor::{CommitPolicy, EditBuffer};
use super::events::AppMessage;
use super::theme::Theme;

/// How long the error banner stays visible.
pub const ERROR_BANNER_TTL: Duration = Duration::from_secs(3);

/// Which login field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    /// Email input.
    Email,
    /// Password input.
    Password,
}

impl LoginField {
    /// The other field.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Email,
        }
    }
}

/// The active screen. Exactly one at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Credential entry.
    Login(LoginField),
    /// All notebooks of the session.
    NotebookList,
    /// Pages of the selected notebook.
    PageList,
    /// Editing the selected page.
    PageEdit,
    /// Rendered preview of the selected page.
    PageRender,
}

/// Side effects the event loop must execute on the state machine's behalf.
#[derive(Debug)]
pub enum Command {
    /// Nothing to do.
    None,
    /// Exit the application.
    Quit,
    /// Dispatch an asynchronous login + notebook fetch.
    Authenticate {
        /// Credentials to exchange.
        credentials: Credentials,
        /// Generation at dispatch time, echoed back in the completion.
        generation: u64,
    },
}

/// A transient error banner with its raise time.
#[derive(Debug)]
pub struct ErrorBanner {
    /// Message shown to the user.
    pub message: String,
    /// When the error was raised.
    pub raised_at: Instant,
}

impl ErrorBanner {
    /// Whether the banner should still be shown at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) < ERROR_BANNER_TTL
    }
}

/// Application state: the navigation state machine and everything it owns.
pub struct AppState {
    /// Active screen.
    pub screen: Screen,
    /// Color theme, fixed at startup.
    pub theme: Theme,
    /// Email field of the login form.
    pub email_input: TextArea<'static>,
    /// Password field of the login form (masked).
    pub password_input: TextArea<'static>,
    /// Whether a login is currently in flight.
    pub auth_in_flight: bool,
    /// The authenticated session, None while on the login screen.
    pub session: Option<Session>,
    /// Current notebook/page selection.
    pub selection: Selection,
    /// Cursor position in the notebook list.
    pub notebook_cursor: usize,
    /// Cursor position in the page list.
    pub page_cursor: usize,
    /// Edit buffer; exists only in PageEdit and PageRender.
    pub editor: Option<EditBuffer>,
    /// Rendered preview lines for PageRender.
    pub preview: Vec<Line<'static>>,
    /// Scroll offset of the preview.
    pub preview_scroll: usize,
    /// Transient error banner, if any.
    pub banner: Option<ErrorBanner>,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    generation: u64,
}

impl AppState {
    /// Create the initial state: login screen, email field focused.
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        let mut email_input = TextArea::default();
        email_input.set_placeholder_text("Email");

        let mut password_input = TextArea::default();
        password_input.set_placeholder_text("Password");
        password_input.set_mask_char('•');

        Self {
            screen: Screen::Login(LoginField::Email),
            theme,
            email_input,
            password_input,
            auth_in_flight: false,
            session: None,
            selection: Selection::default(),
            notebook_cursor: 0,
            page_cursor: 0,
            editor: None,
            preview: Vec::new(),
            preview_scroll: 0,
            banner: None,
            show_help: false,
            generation: 0,
        }
    }

    /// Current generation. Completion messages carrying an older value are
    /// stale and get dropped.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Notebooks of the current session, empty before login completes.
    #[must_use]
    pub fn notebooks(&self) -> &[Notebook] {
        self.session.as_ref().map_or(&[], |s| &s.notebooks)
    }

    /// Pages of the selected notebook, empty when none is selected.
    #[must_use]
    pub fn current_pages(&self) -> &[Page] {
        let Some(session) = &self.session else {
            return &[];
        };
        let Some(id) = &self.selection.notebook_id else {
            return &[];
        };
        session.notebook(id).map_or(&[], |n| n.pages.as_slice())
    }

    /// Process one message. Returns the side effect for the event loop.
    pub fn handle_message(&mut self, msg: AppMessage, now: Instant) -> Command {
        // The banner expires on the next processed message after its window.
        if self.banner.as_ref().is_some_and(|b| !b.is_visible(now)) {
            self.banner = None;
        }

        match msg {
            AppMessage::Tick | AppMessage::Resize(..) => Command::None,
            AppMessage::Key(key) => self.handle_key(key, now),
            AppMessage::SessionReady {
                generation,
                session,
            } => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "dropping stale login completion");
                    return Command::None;
                }
                debug!(username = %session.username, notebooks = session.notebooks.len(), "session ready");
                self.auth_in_flight = false;
                self.session = Some(session);
                self.notebook_cursor = 0;
                self.set_screen(Screen::NotebookList);
                Command::None
            }
            AppMessage::LoginFailed { generation, error } => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "dropping stale login failure");
                    return Command::None;
                }
                self.auth_in_flight = false;
                self.raise_error(&error, now);
                Command::None
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Command {
        // Global quit, available on every screen.
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Command::Quit;
        }

        if self.show_help {
            // Any of the toggle/close keys dismisses the overlay.
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return Command::None;
        }

        match self.screen {
            Screen::Login(field) => self.on_login_key(key, field),
            Screen::NotebookList => self.on_notebook_list_key(key),
            Screen::PageList => self.on_page_list_key(key),
            Screen::PageEdit => self.on_edit_key(key, now),
            Screen::PageRender => self.on_render_key(key),
        }
    }

    fn on_login_key(&mut self, key: KeyEvent, field: LoginField) -> Command {
        match key.code {
            KeyCode::Esc => Command::Quit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.screen = Screen::Login(field.other());
                Command::None
            }
            KeyCode::Enter => {
                if self.auth_in_flight {
                    return Command::None;
                }
                self.auth_in_flight = true;
                // No client-side validation: empty fields go to the service
                // as-is.
                let credentials = Credentials {
                    email: self.email_input.lines().join(""),
                    password: self.password_input.lines().join(""),
                };
                debug!(email = %credentials.email, "dispatching login");
                Command::Authenticate {
                    credentials,
                    generation: self.generation,
                }
            }
            _ => {
                let input = match field {
                    LoginField::Email => &mut self.email_input,
                    LoginField::Password => &mut self.password_input,
                };
                input.input(key);
                Command::None
            }
        }
    }

    fn on_notebook_list_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Esc => {
                // Session discarded; a fresh login is the only way to
                // refresh the cache.
                self.session = None;
                self.selection.clear();
                self.auth_in_flight = false;
                self.password_input = {
                    let mut input = TextArea::default();
                    input.set_placeholder_text("Password");
                    input.set_mask_char('•');
                    input
                };
                self.set_screen(Screen::Login(LoginField::Email));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.notebook_cursor = self.notebook_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.notebooks().len().saturating_sub(1);
                self.notebook_cursor = (self.notebook_cursor + 1).min(last);
            }
            KeyCode::Enter => {
                if let Some(notebook) = self.notebooks().get(self.notebook_cursor) {
                    self.selection.notebook_id = Some(notebook.id.clone());
                    self.page_cursor = 0;
                    self.set_screen(Screen::PageList);
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        Command::None
    }

    fn on_page_list_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Esc => {
                self.selection.clear();
                self.set_screen(Screen::NotebookList);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.page_cursor = self.page_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.current_pages().len().saturating_sub(1);
                self.page_cursor = (self.page_cursor + 1).min(last);
            }
            KeyCode::Enter => {
                // Clone the page out of the cache so selection and editor
                // can be updated while it is held.
                if let Some(page) = self.current_pages().get(self.page_cursor).cloned() {
                    self.selection.page_id = Some(page.id.clone());
                    // Replace any stale buffer so the previous page's text
                    // cannot leak into this one.
                    if let Some(editor) = &mut self.editor {
                        editor.reset();
                    }
                    self.editor = Some(EditBuffer::open(&page));
                    self.set_screen(Screen::PageEdit);
                } else if self.selection.notebook_id.is_some() {
                    // Cursor over nothing can only mean an empty notebook.
                    debug!("select on empty page list ignored");
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        Command::None
    }

    fn on_edit_key(&mut self, key: KeyEvent, now: Instant) -> Command {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                // Leaving the editor upward discards, per the commit policy.
                if let Some(editor) = self.editor.take() {
                    if let Some(page) = self.selected_page_mut() {
                        editor.close(CommitPolicy::Discard, page);
                    }
                }
                self.selection.clear_page();
                self.set_screen(Screen::PageList);
            }
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
                self.commit_and_preview(now);
            }
            _ => {
                if let Some(editor) = &mut self.editor {
                    editor.input(key);
                }
            }
        }
        Command::None
    }

    fn on_render_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Esc => {
                // The buffer stayed open; the editor picks up where the
                // commit left it.
                self.set_screen(Screen::PageEdit);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.preview_scroll = self.preview_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.preview.len().saturating_sub(1);
                self.preview_scroll = (self.preview_scroll + 1).min(max);
            }
            KeyCode::PageUp => self.preview_scroll = self.preview_scroll.saturating_sub(10),
            KeyCode::PageDown => {
                let max = self.preview.len().saturating_sub(1);
                self.preview_scroll = (self.preview_scroll + 10).min(max);
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        Command::None
    }

    /// Commit the edit buffer into the cache, then render the committed
    /// content. On render failure the editor stays active with a banner.
    fn commit_and_preview(&mut self, now: Instant) {
        let Some(editor) = &self.editor else {
            return;
        };
        let content = editor.value();

        match self.selected_page_mut() {
            Some(page) => page.content = content.clone(),
            None => {
                // Selection no longer resolves: an invariant was broken.
                let err = StylusError::not_found(
                    "page",
                    self.selection.page_id.clone().unwrap_or_default(),
                );
                self.raise_error(&err, now);
                return;
            }
        }

        match render::render(&content) {
            Ok(lines) => {
                self.preview = lines;
                self.preview_scroll = 0;
                self.set_screen(Screen::PageRender);
            }
            Err(err) => self.raise_error(&err, now),
        }
    }

    fn selected_page_mut(&mut self) -> Option<&mut Page> {
        let session = self.session.as_mut()?;
        let notebook_id = self.selection.notebook_id.as_deref()?;
        let page_id = self.selection.page_id.as_deref()?;
        session
            .notebook_mut(notebook_id)
            .ok()?
            .page_mut(page_id)
            .ok()
    }

    /// Switch screens, invalidating any in-flight async work dispatched for
    /// the old one.
    fn set_screen(&mut self, screen: Screen) {
        debug!(from = ?self.screen, to = ?screen, "screen transition");
        self.screen = screen;
        self.generation += 1;
    }

    /// Attach a timed error banner to the current screen.
    fn raise_error(&mut self, err: &StylusError, now: Instant) {
        warn!(error = %err, "surfacing error");
        self.banner = Some(ErrorBanner {
            message: err.to_string(),
            raised_at: now,
        });
    }
}
