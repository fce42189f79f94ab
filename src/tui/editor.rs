//! The edit buffer: a mutable working copy of one page's content.
//!
//! Opening the buffer copies the page content exactly; every edit stays in
//! the buffer until it is either committed into the cached page (the only
//! place edits can ever reach — there is no remote write-back) or discarded
//! by navigating away.

use crossterm::event::KeyEvent;
use tui_textarea::{CursorMove, TextArea};

use crate::model::Page;

/// What to do with buffer content when leaving edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Write the buffer into the cached page.
    Commit,
    /// Drop the buffer, leaving the cached page untouched.
    Discard,
}

/// Mutable scratch copy of a single page's content.
pub struct EditBuffer {
    textarea: TextArea<'static>,
}

impl EditBuffer {
    /// Open a buffer initialized to the page's content, cursor at start.
    pub fn open(page: &Page) -> Self {
        // split('\n') rather than lines() so a trailing newline survives the
        // round trip.
        let mut textarea = TextArea::new(
            page.content.split('\n').map(ToString::to_string).collect(),
        );
        textarea.move_cursor(CursorMove::Jump(0, 0));
        Self { textarea }
    }

    /// Current buffer text, reflecting all edits since `open`.
    pub fn value(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Clear to empty. Used before re-opening on a different page so the
    /// previous page's text cannot leak.
    pub fn reset(&mut self) {
        self.textarea = TextArea::default();
    }

    /// Feed a key event into the underlying text area.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        self.textarea.input(key)
    }

    /// Write the current buffer text into the cached page.
    pub fn commit(&self, page: &mut Page) {
        page.content = self.value();
    }

    /// Close the buffer, committing or discarding per policy.
    pub fn close(self, policy: CommitPolicy, page: &mut Page) {
        if policy == CommitPolicy::Commit {
            self.commit(page);
        }
    }

    /// Access the text area for rendering.
    pub fn widget(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }
}
