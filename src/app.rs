use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::api::MovieApiClient;
use crate::api::types::{ImageHost, Movie, SearchResponse};
use crate::config::AppConfig;
use crate::event::{ApiResult, AppEvent, Event, EventHandler};
use crate::search::{PendingSearch, SearchModel, SearchState};
use crate::ui;

/// Number of cards PageUp/PageDown move the selection by.
const PAGE_STEP: usize = 5;

// ---------------------------------------------------------------------------
// Query input
// ---------------------------------------------------------------------------

/// Single-line text input with a cursor counted in chars.
#[derive(Debug, Default, Clone)]
pub struct QueryInput {
    pub text: String,
    pub cursor: usize,
}

impl QueryInput {
    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index();
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.text.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let idx = self.byte_index();
            self.text.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,
    pub image_host: ImageHost,

    pub api_client: Arc<MovieApiClient>,

    // Search
    pub input: QueryInput,
    pub search: SearchModel,
    pub selected_index: usize,

    // Chrome
    pub show_help: bool,
    pub status_message: Option<String>,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(config: AppConfig, api_client: MovieApiClient) -> Self {
        let events = EventHandler::new(config.tick_rate_fps);
        Self::with_events(config, api_client, events)
    }

    pub fn with_events(config: AppConfig, api_client: MovieApiClient, events: EventHandler) -> Self {
        Self {
            running: true,
            events,
            image_host: config.image_host(),
            config,
            api_client: Arc::new(api_client),
            input: QueryInput::default(),
            search: SearchModel::new(),
            selected_index: 0,
            show_help: false,
            status_message: None,
            spinner_frame: 0,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            let event = self.events.next().await?;
            self.handle_event(event);
        }
        Ok(())
    }

    pub fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(frame, self);
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick => self.tick(),
            Event::Crossterm(event) => {
                if let crossterm::event::Event::Key(key) = event
                    && key.kind == KeyEventKind::Press
                {
                    self.handle_key_event(key);
                }
            }
            Event::App(app_event) => self.handle_app_event(*app_event),
        }
    }

    fn tick(&mut self) {
        if self.search.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn is_loading(&self) -> bool {
        self.search.is_loading()
    }

    /// Movies of the current successful search, empty otherwise.
    pub fn movies(&self) -> &[Movie] {
        match self.search.state() {
            SearchState::Success(resp) => &resp.movies,
            _ => &[],
        }
    }

    pub fn response(&self) -> Option<&SearchResponse> {
        match self.search.state() {
            SearchState::Success(resp) => Some(resp),
            _ => None,
        }
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies().get(self.selected_index)
    }

    // -- Key event routing --------------------------------------------------

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Ctrl-C always quits.
        if ctrl && matches!(key.code, KeyCode::Char('c' | 'C')) {
            self.events.send(AppEvent::Quit);
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
                self.events.send(AppEvent::ToggleHelp);
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.events.send(AppEvent::Quit),
            KeyCode::F(1) => self.events.send(AppEvent::ToggleHelp),
            KeyCode::Enter => {
                // Shift+Enter is a newline request; the input is single-line.
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    return;
                }
                if !self.is_loading() {
                    self.events.send(AppEvent::Submit);
                }
            }
            KeyCode::Char('o' | 'O') if ctrl => self.events.send(AppEvent::OpenPoster),
            KeyCode::Up => self.move_selection_up(1),
            KeyCode::Down => self.move_selection_down(1),
            KeyCode::PageUp => self.move_selection_up(PAGE_STEP),
            KeyCode::PageDown => self.move_selection_down(PAGE_STEP),
            KeyCode::Home if ctrl => self.selected_index = 0,
            KeyCode::End if ctrl => self.move_selection_down(usize::MAX),
            _ => self.handle_edit_key(key),
        }
    }

    /// Editing keys. The input is disabled while a search is in flight.
    fn handle_edit_key(&mut self, key: KeyEvent) {
        if self.is_loading() {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => self.input.clear(),
            KeyCode::Char('a') if ctrl => self.input.move_home(),
            KeyCode::Char('e') if ctrl => self.input.move_end(),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {}
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }

    // -- Selection helpers --------------------------------------------------

    fn move_selection_down(&mut self, step: usize) {
        let count = self.movies().len();
        if count > 0 {
            self.selected_index = self.selected_index.saturating_add(step).min(count - 1);
        }
    }

    fn move_selection_up(&mut self, step: usize) {
        self.selected_index = self.selected_index.saturating_sub(step);
    }

    // -- App event handling -------------------------------------------------

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.running = false;
            }
            AppEvent::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            AppEvent::Submit => {
                if let Some(pending) = self.search.submit(&self.input.text) {
                    self.status_message = None;
                    self.selected_index = 0;
                    self.spinner_frame = 0;
                    self.dispatch_search(pending);
                }
            }
            AppEvent::SearchLoaded { seq, result } => {
                if self.search.complete(seq, result) {
                    self.selected_index = 0;
                }
            }
            AppEvent::OpenPoster => self.open_selected_poster(),
        }
    }

    fn open_selected_poster(&mut self) {
        let Some(movie) = self.selected_movie() else {
            return;
        };
        let title = movie.title.clone();
        match movie.display_poster_url(&self.image_host) {
            Some(url) => {
                tracing::info!(%url, "opening poster");
                if let Err(e) = open::that(&url) {
                    self.status_message = Some(format!("Could not open poster: {e}"));
                }
            }
            None => {
                self.status_message = Some(format!("No poster for {title}"));
            }
        }
    }

    // -- API dispatch -------------------------------------------------------

    fn dispatch_search(&self, pending: PendingSearch) {
        let client = Arc::clone(&self.api_client);
        let reply = SearchReply::new(self.events.sender(), pending.seq);

        tracing::info!(seq = pending.seq, query = %pending.query, "dispatching search");
        tokio::spawn(async move {
            let result = client
                .search(&pending.query)
                .await
                .map_err(|e| Arc::new(e.to_string()));
            reply.send(result);
        });
    }
}

/// Delivers exactly one `SearchLoaded` for a dispatched search.
///
/// If the task dies before sending (panic, runtime shutdown), `Drop` reports a
/// failure so the loading state is always released.
struct SearchReply {
    sender: mpsc::UnboundedSender<Event>,
    seq: u64,
    sent: bool,
}

impl SearchReply {
    fn new(sender: mpsc::UnboundedSender<Event>, seq: u64) -> Self {
        Self {
            sender,
            seq,
            sent: false,
        }
    }

    fn send(mut self, result: ApiResult<SearchResponse>) {
        self.sent = true;
        self.deliver(result);
    }

    fn deliver(&self, result: ApiResult<SearchResponse>) {
        let _ = self.sender.send(Event::App(Box::new(AppEvent::SearchLoaded {
            seq: self.seq,
            result,
        })));
    }
}

impl Drop for SearchReply {
    fn drop(&mut self) {
        if !self.sent {
            tracing::warn!(seq = self.seq, "search task ended without a result");
            self.deliver(Err(Arc::new("search ended without a result".to_string())));
        }
    }
}
