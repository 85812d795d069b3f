use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

/// Red bordered region showing why the last search failed.
pub struct ErrorPanel<'a> {
    text: &'a str,
}

impl<'a> ErrorPanel<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Rows needed to show the whole message at `width`, borders included.
    pub fn height(&self, width: u16) -> u16 {
        let inner_width = width.saturating_sub(2) as usize;
        let label_width = "Error: ".width();
        let text_lines: usize = self
            .text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let cols = if i == 0 { line.width() + label_width } else { line.width() };
                if cols == 0 || inner_width == 0 {
                    1
                } else {
                    cols.div_ceil(inner_width)
                }
            })
            .sum();
        (text_lines.max(1) as u16) + 2
    }
}

impl Widget for ErrorPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Error ")
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Red));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = self.text.lines();
        let first = Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(lines.next().unwrap_or(""), Style::default().fg(Color::Red)),
        ]);
        let mut text = vec![first];
        text.extend(lines.map(|l| Line::styled(l, Style::default().fg(Color::Red))));

        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
