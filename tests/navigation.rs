//! End-to-end navigation tests.
//!
//! Drives the navigation state machine through complete user journeys by
//! feeding it messages directly, without a terminal or a network. Network
//! completions are simulated by injecting the same messages the spawned
//! tasks would send.

use std::time::Instant;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

use stylus::model::{Notebook, Page, Session};
use stylus::tui::events::AppMessage;
use stylus::tui::state::{AppState, Command, LoginField, Screen};
use stylus::tui::theme::Theme;

fn key(code: KeyCode) -> AppMessage {
    AppMessage::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> AppMessage {
    AppMessage::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn type_text(app: &mut AppState, now: Instant, text: &str) {
    for c in text.chars() {
        app.handle_message(key(KeyCode::Char(c)), now);
    }
}

fn remote_session() -> Session {
    let mut session = Session::new("token".into(), "u1".into(), "ada".into());
    session.notebooks = vec![Notebook {
        id: "nb1".into(),
        title: "Journal".into(),
        description: "daily notes".into(),
        updated_at: Utc::now(),
        pages: vec![
            Page {
                id: "p1".into(),
                parent_id: None,
                title: "Monday".into(),
                updated_at: Utc::now(),
                content: "# Monday\n\nslow start".into(),
            },
            Page {
                id: "p2".into(),
                parent_id: Some("p1".into()),
                title: "Tuesday".into(),
                updated_at: Utc::now(),
                content: "# Tuesday".into(),
            },
        ],
    }];
    session
}

/// Complete a login round trip and land on the notebook list.
fn sign_in(app: &mut AppState, now: Instant) {
    type_text(app, now, "a@b.com");
    app.handle_message(key(KeyCode::Tab), now);
    type_text(app, now, "pw");
    let cmd = app.handle_message(key(KeyCode::Enter), now);
    let Command::Authenticate { generation, .. } = cmd else {
        panic!("expected Authenticate, got {cmd:?}");
    };
    app.handle_message(
        AppMessage::SessionReady {
            generation,
            session: remote_session(),
        },
        now,
    );
}

#[test]
fn full_journey_edit_preview_and_discard() {
    let now = Instant::now();
    let mut app = AppState::new(Theme::dark());
    sign_in(&mut app, now);
    assert_eq!(app.screen, Screen::NotebookList);

    // Into the page list of "Journal".
    app.handle_message(key(KeyCode::Enter), now);
    assert_eq!(app.screen, Screen::PageList);
    assert_eq!(app.selection.notebook_id.as_deref(), Some("nb1"));

    // Open "Tuesday" and commit an edit via preview.
    app.handle_message(key(KeyCode::Down), now);
    app.handle_message(key(KeyCode::Enter), now);
    assert_eq!(app.screen, Screen::PageEdit);
    assert_eq!(app.editor.as_ref().unwrap().value(), "# Tuesday");

    type_text(&mut app, now, "## ");
    app.handle_message(ctrl('r'), now);
    assert_eq!(app.screen, Screen::PageRender);
    assert!(!app.preview.is_empty());

    // The committed edit reached exactly the selected page.
    let session = app.session.as_ref().unwrap();
    let notebook = session.notebook("nb1").unwrap();
    assert_eq!(notebook.page("p2").unwrap().content, "## # Tuesday");
    assert_eq!(notebook.page("p1").unwrap().content, "# Monday\n\nslow start");

    // Back to the editor, make a further edit, then discard it.
    app.handle_message(key(KeyCode::Esc), now);
    assert_eq!(app.screen, Screen::PageEdit);
    type_text(&mut app, now, "scratch");
    app.handle_message(key(KeyCode::Esc), now);
    assert_eq!(app.screen, Screen::PageList);
    assert!(app.editor.is_none());

    // The discarded edit never reached the cache; the commit did.
    let session = app.session.as_ref().unwrap();
    assert_eq!(
        session.notebook("nb1").unwrap().page("p2").unwrap().content,
        "## # Tuesday"
    );
}

#[test]
fn reopening_a_page_shows_committed_content() {
    let now = Instant::now();
    let mut app = AppState::new(Theme::dark());
    sign_in(&mut app, now);

    app.handle_message(key(KeyCode::Enter), now); // PageList
    app.handle_message(key(KeyCode::Enter), now); // edit p1
    type_text(&mut app, now, "x");
    app.handle_message(ctrl('r'), now); // commit + preview
    app.handle_message(key(KeyCode::Esc), now); // back to editor
    app.handle_message(key(KeyCode::Esc), now); // back to page list

    // Re-open the same page: the buffer starts from the committed text.
    app.handle_message(key(KeyCode::Enter), now);
    assert_eq!(app.editor.as_ref().unwrap().value(), "x# Monday\n\nslow start");
}

#[test]
fn logout_then_fresh_login_replaces_the_cache() {
    let now = Instant::now();
    let mut app = AppState::new(Theme::dark());
    sign_in(&mut app, now);

    // Back out to login: the session is gone.
    app.handle_message(key(KeyCode::Esc), now);
    assert_eq!(app.screen, Screen::Login(LoginField::Email));
    assert!(app.session.is_none());

    // Sign in again: a wholesale new cache is installed.
    let cmd = app.handle_message(key(KeyCode::Enter), now);
    let Command::Authenticate { generation, .. } = cmd else {
        panic!("expected Authenticate, got {cmd:?}");
    };
    app.handle_message(
        AppMessage::SessionReady {
            generation,
            session: remote_session(),
        },
        now,
    );
    assert_eq!(app.screen, Screen::NotebookList);
    assert_eq!(app.notebooks().len(), 1);
}

#[test]
fn quit_from_login_is_terminal() {
    let now = Instant::now();
    let mut app = AppState::new(Theme::dark());
    let cmd = app.handle_message(key(KeyCode::Esc), now);
    assert!(matches!(cmd, Command::Quit));
}
