//! Headless browse state: what the movie grid and the detail modal should show.
//!
//! Every action takes `&mut self`, so one controller handles one user action
//! at a time. State is published on a `watch` channel: subscribers see the
//! loading states while a lookup is in flight, then the finished result.

use crate::catalog::MovieCatalog;
use crate::models::{Genre, MovieDetail, MovieSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Quiet period after the last keystroke before a typed query is searched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
/// Typed input shorter than this never triggers a live search.
pub const MIN_LIVE_QUERY_CHARS: usize = 3;

pub const GRID_PLACEHOLDER_POSTER: &str =
    "https://via.placeholder.com/300x450/374151/9CA3AF?text=No+Image";
pub const MODAL_PLACEHOLDER_POSTER: &str =
    "https://via.placeholder.com/400x600/374151/9CA3AF?text=No+Image";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListView {
    #[default]
    Loading,
    Error(String),
    Empty,
    Results(Vec<MovieSummary>),
}

impl ListView {
    fn from_movies(movies: Vec<MovieSummary>) -> Self {
        if movies.is_empty() {
            ListView::Empty
        } else {
            ListView::Results(movies)
        }
    }

    pub fn movies(&self) -> &[MovieSummary] {
        match self {
            ListView::Results(movies) => movies.as_slice(),
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailView {
    #[default]
    Closed,
    Loading {
        summary: MovieSummary,
    },
    Error {
        summary: MovieSummary,
        message: String,
    },
    Loaded(Box<MovieDetail>),
}

impl DetailView {
    pub fn is_open(&self) -> bool {
        !matches!(self, DetailView::Closed)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrowseState {
    pub query: String,
    pub genre: Genre,
    pub list: ListView,
    pub detail: DetailView,
}

pub struct BrowseController {
    catalog: Arc<MovieCatalog>,
    state: watch::Sender<BrowseState>,
}

impl BrowseController {
    pub fn new(catalog: Arc<MovieCatalog>) -> Self {
        let (state, _) = watch::channel(BrowseState::default());
        Self { catalog, state }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> BrowseState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowseState> {
        self.state.subscribe()
    }

    fn update(&self, apply: impl FnOnce(&mut BrowseState)) {
        self.state.send_modify(apply);
    }

    pub async fn load_popular(&mut self) {
        self.update(|s| s.list = ListView::Loading);
        let movies = self.catalog.curated_list().await;
        self.update(|s| s.list = ListView::from_movies(movies));
    }

    pub async fn search(&mut self, raw_query: &str) {
        let query = raw_query.trim();
        if query.is_empty() {
            self.update(|s| s.query.clear());
            self.load_popular().await;
            return;
        }

        self.update(|s| {
            s.query = query.to_string();
            s.genre = Genre::All;
            s.list = ListView::Loading;
        });
        info!("Searching for '{}'", query);

        let list = match self.catalog.search(query).await {
            Ok(result) => ListView::from_movies(result.into_summaries()),
            Err(e) => ListView::Error(e.to_string()),
        };
        self.update(|s| s.list = list);
    }

    /// Runs a live search for each typed input once it settles, until the input closes.
    pub async fn follow_typing(&mut self, mut input: mpsc::Receiver<String>) {
        while let Some(query) = next_settled_query(&mut input).await {
            self.search(&query).await;
        }
    }

    pub async fn select_genre(&mut self, genre: Genre) {
        self.update(|s| {
            s.genre = genre;
            s.query.clear();
        });
        if genre == Genre::All {
            self.load_popular().await;
            return;
        }

        self.update(|s| s.list = ListView::Loading);
        debug!(genre = %genre, "Loading genre");
        let movies = self.catalog.by_genre(genre).await;
        self.update(|s| s.list = ListView::from_movies(movies));
    }

    pub async fn open_detail(&mut self, summary: &MovieSummary) {
        self.update(|s| {
            s.detail = DetailView::Loading {
                summary: summary.clone(),
            }
        });
        let detail = match self.catalog.details(&summary.imdb_id).await {
            Ok(detail) => DetailView::Loaded(Box::new(detail)),
            Err(e) => DetailView::Error {
                summary: summary.clone(),
                message: e.to_string(),
            },
        };
        self.update(|s| s.detail = detail);
    }

    pub fn close_detail(&mut self) {
        self.update(|s| s.detail = DetailView::Closed);
    }

    pub fn heading(&self) -> String {
        let state = self.state.borrow();
        if !state.query.is_empty() {
            format!("Search Results for \"{}\"", state.query)
        } else if state.genre != Genre::All {
            format!("{} Movies", capitalize_first(state.genre.label()))
        } else {
            "Popular Movies".to_string()
        }
    }
}

/// Waits until typed input settles and returns it trimmed.
///
/// Input shorter than [`MIN_LIVE_QUERY_CHARS`] is never searched and also
/// cancels a pending query. Returns `None` once the input channel closes.
pub async fn next_settled_query(input: &mut mpsc::Receiver<String>) -> Option<String> {
    let mut pending: Option<String> = None;
    loop {
        let next = match pending.take() {
            None => input.recv().await?,
            Some(current) => {
                tokio::select! {
                    next = input.recv() => next?,
                    _ = tokio::time::sleep(SEARCH_DEBOUNCE) => {
                        return Some(current.trim().to_string());
                    }
                }
            }
        };
        if next.chars().count() >= MIN_LIVE_QUERY_CHARS {
            pending = Some(next);
        }
    }
}

fn capitalize_first(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn grid_poster(summary: &MovieSummary) -> &str {
    if summary.has_poster() {
        &summary.poster
    } else {
        GRID_PLACEHOLDER_POSTER
    }
}

pub fn modal_poster(detail: &MovieDetail) -> &str {
    if detail.summary.has_poster() {
        &detail.summary.poster
    } else {
        MODAL_PLACEHOLDER_POSTER
    }
}
