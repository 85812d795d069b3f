use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};

use crate::api::MovieApiClient;
use crate::api::types::{ImageHost, Movie, SearchResponse};
use crate::config::{AppConfig, load_config, load_env_files, resolve_api_url};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "moviesearch", about = "TUI and CLI for natural-language movie search")]
pub struct Cli {
    /// Backend base URL (overrides MOVIESEARCH_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// Run one search and print the results (JSONL)
    Search {
        /// Natural-language query; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// The movie's own fields plus its derived poster URL, as one flat object.
fn denormalize_movie(movie: &Movie, host: &ImageHost) -> serde_json::Result<serde_json::Value> {
    let mut value = serde_json::to_value(movie)?;
    if let serde_json::Value::Object(fields) = &mut value {
        fields.insert(
            "display_poster_url".to_string(),
            serde_json::json!(movie.display_poster_url(host)),
        );
    }
    Ok(value)
}

/// Print a summary line followed by one line per movie to stdout.
fn print_response(resp: &SearchResponse, host: &ImageHost) -> eyre::Result<()> {
    let summary = serde_json::json!({
        "tmdb_query": resp.tmdb_query,
        "total_count": resp.total_count,
        "response_time_ms": resp.response_time_ms,
    });
    println!("{}", serde_json::to_string(&summary)?);

    for movie in &resp.movies {
        let line = serde_json::to_string(&denormalize_movie(movie, host)?)?;
        println!("{line}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Client construction (shared with main.rs TUI path)
// ---------------------------------------------------------------------------

/// Load `.env` files and the config file, then build the backend client.
pub fn build_api_client(api_url: Option<&str>) -> eyre::Result<(MovieApiClient, AppConfig)> {
    load_env_files();
    let config = load_config();
    let base_url = resolve_api_url(api_url, &config);

    let client = MovieApiClient::new(&base_url, &config.search_path, config.request_timeout())
        .map_err(|e| eyre!("{e}"))?;
    tracing::info!(url = %client.search_url(), "search backend configured");
    Ok((client, config))
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

fn join_query(words: &[String]) -> eyre::Result<String> {
    let query = words.join(" ").trim().to_string();
    if query.is_empty() {
        return Err(eyre!("query must not be empty"));
    }
    Ok(query)
}

pub async fn run_command(cmd: CliCommand, api_url: Option<&str>) -> eyre::Result<()> {
    match cmd {
        CliCommand::Tui => unreachable!("tui is handled in main"),

        CliCommand::Search { query } => {
            let query = join_query(&query)?;
            let (client, config) = build_api_client(api_url)?;
            let resp = client.search(&query).await.map_err(|e| eyre!("{e}"))?;
            print_response(&resp, &config.image_host())?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::BAD_BOYS_RESPONSE;

    #[test]
    fn parses_search_words() {
        let cli = Cli::try_parse_from(["moviesearch", "search", "action", "movies"]).unwrap();
        match cli.command {
            Some(CliCommand::Search { query }) => assert_eq!(query, ["action", "movies"]),
            _ => panic!("expected search subcommand"),
        }
    }

    #[test]
    fn api_url_flag_is_global() {
        let cli =
            Cli::try_parse_from(["moviesearch", "tui", "--api-url", "http://localhost:1/api"])
                .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:1/api"));
        assert!(matches!(cli.command, Some(CliCommand::Tui)));
    }

    #[test]
    fn defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["moviesearch"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn search_requires_a_query() {
        assert!(Cli::try_parse_from(["moviesearch", "search"]).is_err());
    }

    #[test]
    fn blank_query_is_rejected() {
        assert!(join_query(&["  ".into(), "".into()]).is_err());
        assert_eq!(
            join_query(&[" sci-fi".into(), "time travel ".into()]).unwrap(),
            "sci-fi time travel"
        );
    }

    #[test]
    fn movie_without_poster_has_null_display_url() {
        let mut resp: SearchResponse = serde_json::from_str(BAD_BOYS_RESPONSE).unwrap();
        resp.movies[0].poster_path = None;
        let value = denormalize_movie(&resp.movies[0], &ImageHost::default()).unwrap();
        assert!(value["display_poster_url"].is_null());
        assert_eq!(value["id"], resp.movies[0].id);
    }

    #[test]
    fn denormalized_movie_carries_poster_url() {
        let resp: SearchResponse = serde_json::from_str(BAD_BOYS_RESPONSE).unwrap();
        let value = denormalize_movie(&resp.movies[0], &ImageHost::default()).unwrap();
        assert_eq!(value["title"], "Bad Boys");
        assert_eq!(value["vote_average"], 6.8);
        assert_eq!(value["poster_path"], "/abc.jpg");
        assert!(value.get("movie").is_none());
        assert_eq!(
            value["display_poster_url"],
            "https://image.tmdb.org/t/p/w200/abc.jpg"
        );
    }
}
