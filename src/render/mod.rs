//! Markdown-to-display conversion.
//!
//! Converts a page's raw markdown into styled ratatui lines for the preview
//! screen. This is a pure function invoked only on the explicit preview
//! action, never per keystroke. A failure here is non-fatal: the caller
//! surfaces it through the timed banner and keeps the editor active.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::error::{Result, StylusError};

/// Nesting depth beyond which input is rejected rather than rendered.
const MAX_LIST_DEPTH: usize = 16;

/// Render raw markdown to display-ready lines.
pub fn render(markdown: &str) -> Result<Vec<Line<'static>>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::default();
    for event in Parser::new_ext(markdown, options) {
        renderer.handle(event)?;
    }
    renderer.flush();
    Ok(renderer.lines)
}

/// Incremental event-stream renderer.
#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    style: Style,
    // One entry per open list; `Some(n)` carries the next ordinal.
    list_stack: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
}

impl Renderer {
    fn handle(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(tag) => self.start_tag(tag)?,
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    // Code block text arrives with embedded newlines.
                    for line in text.lines() {
                        self.current.push(Span::styled(
                            format!("  {line}"),
                            Style::default().fg(Color::Yellow),
                        ));
                        self.flush();
                    }
                } else {
                    self.current.push(Span::styled(text.to_string(), self.style));
                }
            }
            Event::Code(code) => {
                self.current.push(Span::styled(
                    code.to_string(),
                    self.style.fg(Color::Yellow),
                ));
            }
            Event::SoftBreak => self.current.push(Span::raw(" ")),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::from(Span::styled(
                    "────────────────────────────────────────",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.current.push(Span::raw(marker));
            }
            _ => {}
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) -> Result<()> {
        match tag {
            Tag::Heading { level, .. } => {
                self.blank_line();
                self.style = heading_style(level);
                self.current.push(Span::styled(
                    format!("{} ", heading_marker(level)),
                    self.style,
                ));
            }
            Tag::Paragraph => {
                if self.list_stack.is_empty() && self.quote_depth == 0 {
                    self.blank_line();
                }
                self.push_prefix();
            }
            Tag::Emphasis => self.style = self.style.add_modifier(Modifier::ITALIC),
            Tag::Strong => self.style = self.style.add_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.style = self.style.add_modifier(Modifier::CROSSED_OUT),
            Tag::CodeBlock(kind) => {
                self.blank_line();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(
                            format!("  ```{lang}"),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
            }
            Tag::List(start) => {
                if self.list_stack.len() >= MAX_LIST_DEPTH {
                    return Err(StylusError::render(format!(
                        "list nesting exceeds {MAX_LIST_DEPTH} levels"
                    )));
                }
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush();
                self.push_prefix();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.current.push(Span::styled(marker, Style::default().fg(Color::Cyan)));
            }
            Tag::BlockQuote(_) => {
                self.blank_line();
                self.quote_depth += 1;
            }
            _ => {}
        }
        Ok(())
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.flush();
                self.style = Style::default();
            }
            TagEnd::Paragraph | TagEnd::Item => self.flush(),
            TagEnd::Emphasis => self.style = self.style.remove_modifier(Modifier::ITALIC),
            TagEnd::Strong => self.style = self.style.remove_modifier(Modifier::BOLD),
            TagEnd::Strikethrough => {
                self.style = self.style.remove_modifier(Modifier::CROSSED_OUT);
            }
            TagEnd::CodeBlock => {
                self.flush();
                self.in_code_block = false;
            }
            TagEnd::List(_) => {
                self.flush();
                self.list_stack.pop();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Emit any pending spans as a finished line.
    fn flush(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        }
    }

    /// Flush, then separate blocks with one empty line.
    fn blank_line(&mut self) {
        self.flush();
        if !self.lines.is_empty() {
            self.lines.push(Line::from(""));
        }
    }

    fn push_prefix(&mut self) {
        if self.quote_depth > 0 {
            self.current.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.fg(Color::Cyan),
        HeadingLevel::H2 => style.fg(Color::Green),
        _ => style,
    }
}

const fn heading_marker(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "#",
        HeadingLevel::H2 => "##",
        HeadingLevel::H3 => "###",
        HeadingLevel::H4 => "####",
        HeadingLevel::H5 => "#####",
        HeadingLevel::H6 => "######",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn rendered_text(markdown: &str) -> Vec<String> {
        render(markdown).unwrap().iter().map(text_of).collect()
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render("").unwrap().is_empty());
    }

    #[test]
    fn heading_keeps_marker_and_text() {
        let lines = rendered_text("# Hello");
        assert_eq!(lines, vec!["# Hello"]);
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let lines = rendered_text("first\n\nsecond");
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn soft_break_joins_with_space() {
        let lines = rendered_text("one\ntwo");
        assert_eq!(lines, vec!["one two"]);
    }

    #[test]
    fn bullet_list_items_get_markers() {
        let lines = rendered_text("- a\n- b");
        assert_eq!(lines, vec!["• a", "• b"]);
    }

    #[test]
    fn ordered_list_counts_from_start() {
        let lines = rendered_text("3. a\n4. b");
        assert_eq!(lines, vec!["3. a", "4. b"]);
    }

    #[test]
    fn code_block_lines_are_indented() {
        let lines = rendered_text("```\nlet x = 1;\n```");
        assert_eq!(lines, vec!["  let x = 1;"]);
    }

    #[test]
    fn blockquote_is_prefixed() {
        let lines = rendered_text("> quoted");
        assert_eq!(lines, vec!["│ quoted"]);
    }

    #[test]
    fn excessive_nesting_is_a_render_error() {
        let mut markdown = String::new();
        for depth in 0..=MAX_LIST_DEPTH {
            markdown.push_str(&"  ".repeat(depth));
            markdown.push_str("- x\n");
        }
        let err = render(&markdown).unwrap_err();
        assert!(matches!(err, StylusError::Render { .. }));
    }

    #[test]
    fn inline_code_is_styled() {
        let lines = render("use `stylus` now").unwrap();
        let code_span = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "stylus")
            .unwrap();
        assert_eq!(code_span.style.fg, Some(Color::Yellow));
    }
}
