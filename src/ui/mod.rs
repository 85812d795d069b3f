pub mod error_panel;
pub mod help;
pub mod movie_card;
pub mod results;
pub mod search_bar;
pub mod status_bar;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::App;
use crate::search::SearchState;

use error_panel::ErrorPanel;
use help::HelpView;
use results::{NoResultsView, ResultsView};
use search_bar::{SEARCH_BAR_HEIGHT, SearchBar};
use status_bar::StatusBar;

/// Height of the "no results" box, borders included.
const NO_RESULTS_HEIGHT: u16 = 3;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let [header_area, search_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(SEARCH_BAR_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(Header, header_area);

    let tmdb_query = app.response().map(|r| r.tmdb_query.as_str());
    frame.render_widget(
        SearchBar::new(&app.input)
            .loading(app.is_loading(), app.spinner_frame)
            .tmdb_query(tmdb_query),
        search_area,
    );

    render_body(frame, app, body_area);

    frame.render_widget(StatusBar::new(app), status_area);

    if app.show_help {
        frame.render_widget(HelpView::new(), area);
    }
}

/// The result section. Idle and Loading show nothing here; the submit
/// indicator in the search bar carries the busy state.
fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    match app.search.state() {
        SearchState::Idle | SearchState::Loading => {}
        SearchState::Success(resp) if resp.movies.is_empty() => {
            let [no_results_area, _] = Layout::vertical([
                Constraint::Length(NO_RESULTS_HEIGHT),
                Constraint::Min(0),
            ])
            .areas(area);
            frame.render_widget(NoResultsView, no_results_area);
        }
        SearchState::Success(resp) => {
            frame.render_widget(
                ResultsView::new(resp, &app.image_host).selected(app.selected_index),
                area,
            );
        }
        SearchState::Failure(message) => {
            let panel = ErrorPanel::new(message);
            let height = panel.height(area.width);
            let [error_area, _] =
                Layout::vertical([Constraint::Length(height), Constraint::Min(0)]).areas(area);
            frame.render_widget(panel, error_area);
        }
    }
}

/// Title and subtitle at the top of the screen.
struct Header;

impl Widget for Header {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(vec![
                Span::styled("\u{1F3AC} ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    "AI Movie Search",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::styled(
                "Search for movies using natural language",
                Style::default().fg(Color::DarkGray),
            ),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
