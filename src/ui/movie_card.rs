use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::types::Movie;

/// Shown in place of the poster when the movie has none.
pub const POSTER_PLACEHOLDER: &str = "\u{1F3AC} no poster";

/// Renders a single movie as a compact card.
///
/// Layout:
///   Title
///   ★ 6.8/10 (1.2K votes)  Released: 1995-04-07  Genres: Action
///   Poster: https://image.tmdb.org/t/p/w200/abc.jpg
///   Overview text (wrapped, omitted when empty) ...
pub struct MovieCard<'a> {
    pub movie: &'a Movie,
    pub poster_url: Option<String>,
    pub selected: bool,
}

impl<'a> MovieCard<'a> {
    pub fn new(movie: &'a Movie, poster_url: Option<String>) -> Self {
        Self {
            movie,
            poster_url,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for MovieCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let bottom = area.y + area.height;
        let mut y = area.y;

        // -- Title --
        let title_style = if self.selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let marker = if self.selected { "\u{25B6} " } else { "  " };
        let title_line = Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(self.movie.title.as_str(), title_style),
        ]);
        buf.set_line(area.x, y, &title_line, area.width);
        y += 1;
        if y >= bottom {
            return;
        }

        // -- Meta: rating, release date, genres --
        let dim = Style::default().fg(Color::DarkGray);
        let mut meta = vec![
            Span::raw("  "),
            Span::styled(
                format!("\u{2605} {}", self.movie.rating_label()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!(" ({} votes)", format_count(self.movie.vote_count)),
                dim,
            ),
            Span::styled(
                format!("  Released: {}", self.movie.release_label()),
                dim,
            ),
        ];
        if let Some(genres) = self.movie.genre_line() {
            meta.push(Span::styled(
                format!("  Genres: {genres}"),
                Style::default().fg(Color::Magenta),
            ));
        }
        buf.set_line(area.x, y, &Line::from(meta), area.width);
        y += 1;
        if y >= bottom {
            return;
        }

        // -- Poster --
        let poster_line = match self.poster_url {
            Some(ref url) => Line::from(vec![
                Span::styled("  Poster: ", dim),
                Span::styled(
                    url.as_str(),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]),
            None => Line::from(vec![Span::raw("  "), Span::styled(POSTER_PLACEHOLDER, dim)]),
        };
        buf.set_line(area.x, y, &poster_line, area.width);
        y += 1;

        // -- Overview --
        if self.movie.overview.is_empty() {
            return;
        }
        let width = area.width.saturating_sub(2) as usize;
        for line_text in wrap_text(&self.movie.overview, width) {
            if y >= bottom {
                break;
            }
            buf.set_stringn(area.x + 2, y, &line_text, width, Style::default());
            y += 1;
        }
    }
}

/// Height in lines needed for a movie card.
pub fn movie_card_height(movie: &Movie, width: u16) -> u16 {
    let overview_lines = if movie.overview.is_empty() {
        0
    } else {
        wrap_text(&movie.overview, width.saturating_sub(2) as usize).len() as u16
    };
    // title + meta + poster + overview
    3 + overview_lines
}

/// Word-wraps `text` to `width` display columns. Words wider than a line
/// are split across lines.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut used = 0;
        for piece in paragraph
            .split_whitespace()
            .flat_map(|word| split_to_width(word, width))
        {
            let piece_width = piece.width();
            if !current.is_empty() && used + 1 + piece_width > width {
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                used += 1;
            }
            current.push_str(piece);
            used += piece_width;
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits one word into chunks no wider than `width` columns.
fn split_to_width(word: &str, width: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (i, c) in word.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width && i > start {
            pieces.push(&word[start..i]);
            start = i;
            used = 0;
        }
        used += w;
    }
    pieces.push(&word[start..]);
    pieces
}

fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(overview: &str) -> Movie {
        Movie {
            id: 1,
            title: "Heat".into(),
            overview: overview.into(),
            release_date: String::new(),
            vote_average: 8.3,
            vote_count: 7000,
            poster_path: None,
            genre_names: vec![],
            poster_url: None,
        }
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("a bank heist goes wrong", 10),
            vec!["a bank", "heist goes", "wrong"]
        );
    }

    #[test]
    fn long_words_are_split_to_width() {
        assert_eq!(
            wrap_text("see https://example.com/abcdef now", 8),
            vec!["see", "https://", "example.", "com/abcd", "ef now"]
        );
        assert_eq!(wrap_text("映画映画映画", 4), vec!["映画", "映画", "映画"]);
    }

    #[test]
    fn long_overview_word_stays_inside_card() {
        let m = movie(&"x".repeat(150));
        let card = Rect::new(0, 0, 20, 12);
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 12));
        for y in 0..12 {
            buf.set_string(20, y, "|".repeat(10), Style::default());
        }
        MovieCard::new(&m, None).render(card, &mut buf);

        for y in 0..12 {
            let outside: String = (20..30).map(|x| buf[(x, y)].symbol()).collect();
            assert_eq!(outside, "|".repeat(10), "row {y} spilled past the card");
        }
        // 150 columns over 18-wide lines.
        assert_eq!(movie_card_height(&m, 20), 3 + 9);
        let last: String = (0..20).map(|x| buf[(x, 11)].symbol()).collect();
        assert_eq!(last.trim(), "xxxxxx");
    }

    #[test]
    fn height_skips_empty_overview() {
        assert_eq!(movie_card_height(&movie(""), 40), 3);
        assert_eq!(movie_card_height(&movie("one two"), 40), 4);
    }

    #[test]
    fn counts_are_abbreviated() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1200), "1.2K");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn card_omits_empty_lines_and_uses_placeholder() {
        let m = movie("");
        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);
        MovieCard::new(&m, None).render(area, &mut buf);

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect();
        assert!(rows[0].contains("Heat"));
        assert!(rows[1].contains("8.3/10"));
        assert!(rows[1].contains("Released: Unknown"));
        assert!(!rows[1].contains("Genres"));
        assert!(rows[2].contains("no poster"));
        assert!(rows[3].trim().is_empty());
    }
}
