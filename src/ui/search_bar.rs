use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};
use unicode_width::UnicodeWidthStr;

use crate::app::QueryInput;

const PLACEHOLDER: &str =
    "e.g., Action movies from the 90s with high ratings, or Sci-fi films about time travel";

const SPINNER: [&str; 10] = [
    "\u{280B}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283C}", "\u{2834}", "\u{2826}", "\u{2827}",
    "\u{2807}", "\u{280F}",
];

/// Rows the search panel needs, borders included.
pub const SEARCH_BAR_HEIGHT: u16 = 5;

/// The query panel: description, input line with submit indicator, and the
/// backend's interpreted query once a search succeeded.
pub struct SearchBar<'a> {
    pub input: &'a QueryInput,
    pub loading: bool,
    pub spinner_frame: usize,
    pub tmdb_query: Option<&'a str>,
}

impl<'a> SearchBar<'a> {
    pub fn new(input: &'a QueryInput) -> Self {
        Self {
            input,
            loading: false,
            spinner_frame: 0,
            tmdb_query: None,
        }
    }

    pub fn loading(mut self, loading: bool, spinner_frame: usize) -> Self {
        self.loading = loading;
        self.spinner_frame = spinner_frame;
        self
    }

    pub fn tmdb_query(mut self, tmdb_query: Option<&'a str>) -> Self {
        self.tmdb_query = tmdb_query;
        self
    }

    fn submit_label(&self) -> String {
        if self.loading {
            format!(
                "[ {} Searching... ]",
                SPINNER[self.spinner_frame % SPINNER.len()]
            )
        } else {
            "[ Search ]".to_string()
        }
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.loading {
            Color::DarkGray
        } else {
            Color::Cyan
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Movie Search ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let [desc_area, input_row, query_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        buf.set_string(
            desc_area.x,
            desc_area.y,
            "Describe the movies you're looking for in natural language",
            Style::default().fg(Color::DarkGray),
        );

        // Input on the left, submit indicator on the right.
        let label = self.submit_label();
        let label_width = (label.width() as u16).min(input_row.width);
        let [input_area, _, button_area] = Layout::horizontal([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(label_width),
        ])
        .areas(input_row);

        let button_style = if self.loading {
            Style::default().fg(Color::Yellow)
        } else if self.input.is_blank() {
            // Disabled until there is something to search for.
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        };
        buf.set_string(button_area.x, button_area.y, &label, button_style);

        TextInput::new("> ", self.input)
            .disabled(self.loading)
            .render(input_area, buf);

        if let Some(tmdb_query) = self.tmdb_query {
            let line = Line::from(vec![
                Span::styled(
                    "TMDB Query: ",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(tmdb_query, Style::default().fg(Color::DarkGray)),
            ]);
            buf.set_line(query_area.x, query_area.y, &line, query_area.width);
        }
    }
}

/// A single-line text input renderer.
///
/// Renders the prompt + text content with a block cursor. When the text is
/// wider than the area, the view scrolls so the cursor stays visible.
pub struct TextInput<'a> {
    pub prompt: &'a str,
    pub input: &'a QueryInput,
    pub disabled: bool,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &'a str, input: &'a QueryInput) -> Self {
        Self {
            prompt,
            input,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let text_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let prompt_style = Style::default().fg(Color::Cyan);

        if self.input.text.is_empty() {
            let mut spans = vec![Span::styled(self.prompt, prompt_style)];
            if !self.disabled {
                spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
            }
            spans.push(Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(area.x, area.y, &Line::from(spans), area.width);
            return;
        }

        let (before, under, after) = split_at_cursor(self.input);
        let available = (area.width as usize).saturating_sub(self.prompt.width() + 1);
        let before = tail_fitting(before, available);

        let mut spans = vec![
            Span::styled(self.prompt, prompt_style),
            Span::styled(before, text_style),
        ];
        if self.disabled {
            spans.push(Span::styled(under.unwrap_or(" "), text_style));
        } else {
            spans.push(Span::styled(
                under.unwrap_or(" "),
                text_style.add_modifier(Modifier::REVERSED),
            ));
        }
        spans.push(Span::styled(after, text_style));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// Split the input into text before the cursor, the grapheme under it, and
/// the rest.
fn split_at_cursor(input: &QueryInput) -> (&str, Option<&str>, &str) {
    let text = input.text.as_str();
    let mut indices = text.char_indices().skip(input.cursor);
    match indices.next() {
        Some((start, _)) => {
            let end = indices.next().map_or(text.len(), |(i, _)| i);
            (&text[..start], Some(&text[start..end]), &text[end..])
        }
        None => (text, None, ""),
    }
}

/// The longest suffix of `s` whose display width fits in `width`.
fn tail_fitting(s: &str, width: usize) -> &str {
    if s.width() <= width {
        return s;
    }
    let mut start = 0;
    for (i, _) in s.char_indices() {
        if s[i..].width() <= width {
            start = i;
            break;
        }
        start = s.len();
    }
    &s[start..]
}
