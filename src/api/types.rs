use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// The backend's interpreted form of the user's query.
    #[serde(default)]
    pub tmdb_query: String,
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub response_time_ms: u64,
}

// ---------------------------------------------------------------------------
// Movie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_names: Vec<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

/// Where poster images are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHost {
    pub base_url: String,
    pub size: String,
}

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_POSTER_SIZE: &str = "w200";

impl Default for ImageHost {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            size: DEFAULT_POSTER_SIZE.to_string(),
        }
    }
}

impl Movie {
    /// The poster image URL, derived only from `poster_path`.
    pub fn display_poster_url(&self, host: &ImageHost) -> Option<String> {
        let path = self.poster_path.as_deref().filter(|p| !p.is_empty())?;
        Some(format!(
            "{}/{}{}",
            host.base_url.trim_end_matches('/'),
            host.size.trim_matches('/'),
            path
        ))
    }

    /// Rating with exactly one decimal place, e.g. `6.8/10`. Halves round
    /// away from zero (7.25 shows as 7.3).
    pub fn rating_label(&self) -> String {
        let rounded = (self.vote_average * 10.0).round() / 10.0;
        format!("{rounded:.1}/10")
    }

    pub fn release_label(&self) -> &str {
        if self.release_date.is_empty() {
            "Unknown"
        } else {
            &self.release_date
        }
    }

    /// Genres joined with `, `, or `None` when there are none.
    pub fn genre_line(&self) -> Option<String> {
        if self.genre_names.is_empty() {
            None
        } else {
            Some(self.genre_names.join(", "))
        }
    }
}
