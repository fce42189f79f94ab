//! TUI application main loop.
//!
//! One loop, one channel: the input thread and every spawned network task
//! feed the same message queue, and the state machine consumes it message
//! by message. Network dispatch happens here, outside the state machine.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{Result, StylusError};
use crate::model::Credentials;

use super::components::{centered_rect, StatusBar};
use super::events::{AppMessage, EventHandler};
use super::state::{AppState, Command, LoginField, Screen};
use super::theme::Theme;

/// Login screen banner, straight from the project's namesake.
const BANNER: &str = r"
   _____ _         _
  / ____| |       | |
 | (___ | |_ _   _| |_   _ ___
  \___ \| __| | | | | | | / __|
  ____) | |_| |_| | | |_| \__ \
 |_____/ \__|\__, |_|\__,_|___/
              __/ |
             |___/
";

/// Run the TUI application until the user quits.
pub async fn run(config: &Config) -> Result<()> {
    enable_raw_mode().map_err(|e| {
        StylusError::io(
            "Cannot launch TUI - no interactive terminal available",
            e,
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| StylusError::io("Failed to enter alternate screen", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| StylusError::io("Failed to create terminal", e))?;

    let result = run_loop(&mut terminal, config).await;

    // Restore the terminal even when the loop failed.
    disable_raw_mode().map_err(|e| StylusError::io("Failed to disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| StylusError::io("Failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| StylusError::io("Failed to show cursor", e))?;

    result
}

/// Main event loop.
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _events = EventHandler::spawn(tx.clone(), Duration::from_millis(config.tick_rate_ms));

    let api = ApiClient::new(&config.endpoint)?;
    let theme = Theme::from_name(&config.theme).unwrap_or_default();
    let mut app = AppState::new(theme);

    loop {
        terminal
            .draw(|f| draw_ui(f, &mut app))
            .map_err(|e| StylusError::io("Failed to draw TUI", e))?;

        let Some(msg) = rx.recv().await else {
            // Channel closed, exit.
            return Ok(());
        };

        match app.handle_message(msg, Instant::now()) {
            Command::Quit => return Ok(()),
            Command::None => {}
            Command::Authenticate {
                credentials,
                generation,
            } => dispatch_login(&api, &tx, credentials, generation),
        }
    }
}

/// Spawn the login + notebook fetch as one asynchronous unit of work.
///
/// Only the completion message touches shared state, back on the loop.
fn dispatch_login(
    api: &ApiClient,
    tx: &mpsc::UnboundedSender<AppMessage>,
    credentials: Credentials,
    generation: u64,
) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = async {
            let mut session = api.authenticate(&credentials).await?;
            session.notebooks = api.fetch_notebooks(&session.token).await?;
            Ok(session)
        }
        .await;

        let msg = match result {
            Ok(session) => AppMessage::SessionReady {
                generation,
                session,
            },
            Err(error) => AppMessage::LoginFailed { generation, error },
        };
        // The loop may already be gone on quit; nothing left to notify.
        let _ = tx.send(msg);
    });
}

/// Draw the UI for the active screen.
fn draw_ui(f: &mut Frame, app: &mut AppState) {
    let banner_height = u16::from(
        app.banner
            .as_ref()
            .is_some_and(|b| b.is_visible(Instant::now())),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(banner_height),
            Constraint::Length(1),
        ])
        .split(f.area());

    match app.screen {
        Screen::Login(field) => draw_login(f, app, field, chunks[0]),
        Screen::NotebookList => draw_notebook_list(f, app, chunks[0]),
        Screen::PageList => draw_page_list(f, app, chunks[0]),
        Screen::PageEdit => draw_editor(f, app, chunks[0]),
        Screen::PageRender => draw_preview(f, app, chunks[0]),
    }

    if banner_height > 0 {
        draw_error_banner(f, app, chunks[1]);
    }

    draw_status_bar(f, app, chunks[2]);

    if app.show_help {
        draw_help_overlay(f, app);
    }
}

/// Draw the login screen: banner plus the two credential fields.
fn draw_login(f: &mut Frame, app: &mut AppState, field: LoginField, area: Rect) {
    let outer = centered_rect(60, 80, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(outer);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(app.theme.primary))
        .alignment(Alignment::Center);
    f.render_widget(banner, chunks[0]);

    let (email_style, password_style) = match field {
        LoginField::Email => (app.theme.border_focused_style(), app.theme.border_style()),
        LoginField::Password => (app.theme.border_style(), app.theme.border_focused_style()),
    };

    app.email_input.set_cursor_line_style(Style::default());
    app.email_input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(email_style)
            .title(" Email "),
    );
    f.render_widget(&app.email_input, chunks[1]);

    app.password_input.set_cursor_line_style(Style::default());
    app.password_input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(password_style)
            .title(" Password "),
    );
    f.render_widget(&app.password_input, chunks[2]);

    let hint = if app.auth_in_flight {
        Line::from(Span::styled("Signing in...", app.theme.success_style()))
    } else {
        Line::from(Span::styled(
            "Enter: sign in │ Tab: switch field │ Esc: quit",
            Style::default().fg(app.theme.border),
        ))
    };
    f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[3]);
}

/// Draw the notebook list.
fn draw_notebook_list(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .notebooks()
        .iter()
        .enumerate()
        .map(|(i, notebook)| {
            let style = if i == app.notebook_cursor {
                app.theme.selection_style()
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(notebook.title.clone(), style.add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {}", notebook.description),
                    style.fg(app.theme.secondary),
                ),
                Span::styled(
                    format!("  ({} pages, {})", notebook.pages.len(), notebook.updated_at.format("%Y-%m-%d")),
                    style.fg(app.theme.border),
                ),
            ]);
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Notebooks ")
            .borders(Borders::ALL)
            .border_style(app.theme.border_focused_style()),
    );
    f.render_widget(list, area);
}

/// Draw the page list of the selected notebook.
fn draw_page_list(f: &mut Frame, app: &AppState, area: Rect) {
    let title = selected_notebook_title(app).map_or_else(
        || " Pages ".to_string(),
        |t| format!(" {t} "),
    );

    let items: Vec<ListItem> = app
        .current_pages()
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let style = if i == app.page_cursor {
                app.theme.selection_style()
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(page.title.clone(), style),
                Span::styled(
                    format!("  ({})", page.updated_at.format("%Y-%m-%d %H:%M")),
                    style.fg(app.theme.border),
                ),
            ]);
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(app.theme.border_focused_style()),
    );
    f.render_widget(list, area);
}

/// Draw the page editor.
fn draw_editor(f: &mut Frame, app: &mut AppState, area: Rect) {
    let title = selected_page_title(app).map_or_else(
        || " Edit ".to_string(),
        |t| format!(" Edit: {t} "),
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_focused_style());

    if let Some(editor) = &mut app.editor {
        let textarea = editor.widget();
        textarea.set_block(block);
        f.render_widget(&*textarea, area);
    }
}

/// Draw the rendered preview.
fn draw_preview(f: &mut Frame, app: &AppState, area: Rect) {
    let title = selected_page_title(app).map_or_else(
        || " Preview ".to_string(),
        |t| format!(" Preview: {t} "),
    );

    let scroll = u16::try_from(app.preview_scroll).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(app.preview.clone())
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(app.theme.border_focused_style()),
        );
    f.render_widget(paragraph, area);
}

/// Draw the transient error banner.
fn draw_error_banner(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(banner) = &app.banner {
        let line = Line::from(vec![
            Span::styled(" ✗ ", app.theme.error_style()),
            Span::styled(banner.message.clone(), app.theme.error_style()),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}

/// Draw the status bar.
fn draw_status_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let mode = match app.screen {
        Screen::Login(_) => "LOGIN",
        Screen::NotebookList => "NOTEBOOKS",
        Screen::PageList => "PAGES",
        Screen::PageEdit => "EDIT",
        Screen::PageRender => "PREVIEW",
    };

    let left = vec![
        Span::styled(
            " stylus ",
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::raw(mode),
    ];

    let right = match (&app.session, app.screen) {
        (Some(session), Screen::PageEdit) => {
            vec![Span::raw(format!(
                "Ctrl+R: preview │ Esc: discard │ {} ",
                session.username
            ))]
        }
        (Some(session), _) => {
            vec![Span::raw(format!("? for help │ {} ", session.username))]
        }
        (None, _) => vec![Span::raw("not signed in ")],
    };

    StatusBar::new().left(left).right(right).render(f, area);
}

/// Draw the help overlay.
fn draw_help_overlay(f: &mut Frame, app: &AppState) {
    let area = centered_rect(50, 60, f.area());

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Lists:"),
        Line::from("  j/↓       Move down"),
        Line::from("  k/↑       Move up"),
        Line::from("  Enter     Open"),
        Line::from("  Esc       Go back"),
        Line::from(""),
        Line::from("Editor:"),
        Line::from("  Ctrl+R    Save to cache and preview"),
        Line::from("  Esc       Discard edits and go back"),
        Line::from(""),
        Line::from("Preview:"),
        Line::from("  j/k       Scroll"),
        Line::from("  Esc       Back to editor"),
        Line::from(""),
        Line::from("  Ctrl+C    Quit"),
        Line::from("  ?         Toggle help"),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(app.theme.border_focused_style()),
    );

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn selected_notebook_title(app: &AppState) -> Option<String> {
    let session = app.session.as_ref()?;
    let id = app.selection.notebook_id.as_deref()?;
    session.notebook(id).ok().map(|n| n.title.clone())
}

fn selected_page_title(app: &AppState) -> Option<String> {
    let session = app.session.as_ref()?;
    let notebook_id = app.selection.notebook_id.as_deref()?;
    let page_id = app.selection.page_id.as_deref()?;
    session
        .notebook(notebook_id)
        .ok()?
        .page(page_id)
        .ok()
        .map(|p| p.title.clone())
}
