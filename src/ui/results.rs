use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::api::types::{ImageHost, SearchResponse};
use crate::ui::movie_card::{MovieCard, movie_card_height};

pub const NO_RESULTS_MESSAGE: &str =
    "No movies found for your search. Try rephrasing your query.";

/// A scrollable list of movie cards with a count header.
///
/// Cards are drawn in the order the backend returned them.
pub struct ResultsView<'a> {
    pub response: &'a SearchResponse,
    pub image_host: &'a ImageHost,
    pub selected_index: usize,
}

impl<'a> ResultsView<'a> {
    pub fn new(response: &'a SearchResponse, image_host: &'a ImageHost) -> Self {
        Self {
            response,
            image_host,
            selected_index: 0,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let movies = &self.response.movies;

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Found {} movies ", movies.len()))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .title(
                Line::from(format!(" {}ms ", self.response.response_time_ms))
                    .alignment(Alignment::Right)
                    .style(Style::default().fg(Color::DarkGray)),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if movies.is_empty() || inner.width == 0 {
            return;
        }

        let content_width = inner.width.saturating_sub(1); // 1 char left margin

        // Pre-compute heights for each card (including separator).
        let heights: Vec<u16> = movies
            .iter()
            .map(|m| movie_card_height(m, content_width) + 1)
            .collect();

        let scroll_start = first_visible_card(&heights, self.selected_index, inner.height);

        let mut y = inner.y;
        let mut idx = scroll_start;
        while idx < movies.len() && y < inner.y + inner.height {
            let movie = &movies[idx];
            let remaining = inner.y + inner.height - y;
            let render_h = heights[idx].min(remaining);

            let card_area = Rect::new(inner.x + 1, y, content_width, render_h.saturating_sub(1));
            MovieCard::new(movie, movie.display_poster_url(self.image_host))
                .selected(idx == self.selected_index)
                .render(card_area, buf);

            y += render_h;

            // Draw separator line
            if y < inner.y + inner.height && idx + 1 < movies.len() {
                let sep = "\u{2500}".repeat(content_width as usize);
                buf.set_string(
                    inner.x + 1,
                    y.saturating_sub(1),
                    &sep,
                    Style::default().fg(Color::DarkGray),
                );
            }

            idx += 1;
        }
    }
}

/// Shown instead of the list when a search succeeds with zero movies.
pub struct NoResultsView;

impl Widget for NoResultsView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(NO_RESULTS_MESSAGE)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// Index of the first card to draw: the selected card stays fully visible,
/// preceded by as many earlier cards as still fit above it.
fn first_visible_card(heights: &[u16], selected: usize, available: u16) -> usize {
    let Some(last) = heights.len().checked_sub(1) else {
        return 0;
    };
    let selected = selected.min(last);
    let mut used = heights[selected];
    let earlier = heights[..selected]
        .iter()
        .rev()
        .take_while(|&&h| {
            used = used.saturating_add(h);
            used <= available
        })
        .count();
    selected - earlier
}
