//! Query OMDb through the catalog and print the result as JSON.
//! Usage:
//!   cargo run --bin omdb_probe -- search <query> [page]
//!   cargo run --bin omdb_probe -- detail <imdb_id>
//!   cargo run --bin omdb_probe -- popular
//!   cargo run --bin omdb_probe -- genre <label>
//! Requires OMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use movie_explorer::browse::{grid_poster, modal_poster};
use movie_explorer::models::{Genre, MovieSummary};
use movie_explorer::{MovieApi, MovieCatalog, OmdbClient};
use serde_json::{json, Value};
use std::env;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Search { query: String, page: u32 },
    Detail { id: String },
    Popular,
    Genre { genre: Genre },
}

fn parse_args(args: &[String]) -> Result<Command> {
    let kind = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("missing command"))?;
    match kind.to_lowercase().as_str() {
        "search" => {
            let query = args
                .get(1)
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing search query"))?;
            let page = match args.get(2) {
                Some(p) => p
                    .parse::<NonZeroU32>()
                    .context("page must be a positive integer")?
                    .get(),
                None => 1,
            };
            Ok(Command::Search { query, page })
        }
        "detail" => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("missing imdb id"))?;
            Ok(Command::Detail {
                id: id.trim().to_string(),
            })
        }
        "popular" => Ok(Command::Popular),
        "genre" => {
            let label = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("missing genre label"))?;
            Ok(Command::Genre {
                genre: Genre::from_str(label)?,
            })
        }
        other => Err(anyhow::anyhow!("unknown command '{}'", other)),
    }
}

fn card(movie: &MovieSummary) -> Value {
    json!({
        "id": movie.imdb_id,
        "title": movie.title,
        "year": movie.year,
        "type": movie.media_type,
        "poster": grid_poster(movie),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Usage: cargo run --bin omdb_probe -- search <query> [page]");
            eprintln!("       cargo run --bin omdb_probe -- detail <imdb_id>");
            eprintln!("       cargo run --bin omdb_probe -- popular");
            eprintln!("       cargo run --bin omdb_probe -- genre <label>");
            std::process::exit(1);
        }
    };

    let api: Arc<dyn MovieApi> = Arc::new(OmdbClient::from_env()?);
    let catalog = MovieCatalog::new(api);

    let output = match command {
        Command::Search { query, page } => {
            let result = catalog.search_page(&query, page).await?;
            json!({
                "total_results": result.total_results,
                "movies": result.summaries().iter().map(card).collect::<Vec<_>>(),
            })
        }
        Command::Detail { id } => {
            let detail = catalog.details(&id).await?;
            json!({
                "id": detail.summary.imdb_id,
                "title": detail.summary.title,
                "year": detail.summary.year,
                "poster": modal_poster(&detail),
                "plot": detail.plot(),
                "director": detail.director(),
                "writer": detail.writer(),
                "cast": detail.cast(),
                "genres": detail.genres(),
                "runtime_minutes": detail.runtime_minutes(),
                "released": detail.released_on().map(|d| d.to_string()),
                "rating": detail.rating(),
                "country": detail.country(),
                "language": detail.language(),
                "awards": detail.awards(),
            })
        }
        Command::Popular => {
            let movies = catalog.curated_list().await;
            Value::Array(movies.iter().map(card).collect())
        }
        Command::Genre { genre } => {
            let movies = catalog.by_genre(genre).await;
            Value::Array(movies.iter().map(card).collect())
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
