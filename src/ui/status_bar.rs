use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::App;
use crate::search::SearchState;

/// Bottom status bar showing search state, backend, and status messages.
pub struct StatusBar<'a> {
    pub app: &'a App,
}

impl<'a> StatusBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_style(bg_style);
        }

        let mut spans = Vec::new();

        // State indicator
        let (label, color) = match self.app.search.state() {
            SearchState::Idle => (" READY ", Color::Blue),
            SearchState::Loading => (" SEARCHING ", Color::Yellow),
            SearchState::Success(_) => (" DONE ", Color::Green),
            SearchState::Failure(_) => (" ERROR ", Color::Red),
        };
        let mode_style = Style::default()
            .bg(color)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        spans.push(Span::styled(label, mode_style));
        spans.push(Span::raw(" "));

        // Backend host
        let backend = self
            .app
            .api_client
            .base_url()
            .host_str()
            .unwrap_or("backend")
            .to_string();
        spans.push(Span::styled(backend, bg_style));

        // Status message or key hints (right-aligned)
        let (right, right_style) = match self.app.status_message {
            Some(ref msg) => (
                msg.as_str(),
                Style::default().bg(Color::DarkGray).fg(Color::Red),
            ),
            None => (
                "Enter search  \u{2191}\u{2193} select  ^O poster  F1 help  Esc quit ",
                bg_style,
            ),
        };
        let left_width: usize = spans.iter().map(|s| s.width()).sum();
        let right: String = right
            .chars()
            .take((area.width as usize).saturating_sub(left_width))
            .collect();
        let padding = (area.width as usize).saturating_sub(left_width + right.chars().count());
        if padding > 0 {
            spans.push(Span::styled(" ".repeat(padding), bg_style));
        }
        spans.push(Span::styled(right, right_style));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
