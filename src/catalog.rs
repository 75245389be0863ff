use crate::config::CuratedListConfig;
use crate::error::Result;
use crate::models::{Genre, MovieDetail, MovieSummary, SearchResult};
use crate::omdb::MovieApi;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Higher-level movie lookups composed from single OMDb calls.
#[derive(Clone)]
pub struct MovieCatalog {
    api: Arc<dyn MovieApi>,
    curated: CuratedListConfig,
}

impl MovieCatalog {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self::with_curated(api, CuratedListConfig::default())
    }

    pub fn with_curated(api: Arc<dyn MovieApi>, curated: CuratedListConfig) -> Self {
        Self { api, curated }
    }

    pub fn curated_config(&self) -> &CuratedListConfig {
        &self.curated
    }

    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        self.search_page(query, 1).await
    }

    pub async fn search_page(&self, query: &str, page: u32) -> Result<SearchResult> {
        self.api.search(query, page).await
    }

    pub async fn details(&self, imdb_id: &str) -> Result<MovieDetail> {
        self.api.details(imdb_id).await
    }

    /// Builds the "popular movies" list from the seed terms.
    ///
    /// Terms are searched one after another with a fixed pause in between.
    /// A failing term is logged and skipped, so this never fails; it only
    /// returns fewer movies.
    pub async fn curated_list(&self) -> Vec<MovieSummary> {
        let terms = self.curated.active_terms();
        let mut collected = Vec::with_capacity(terms.len() * self.curated.per_term);

        for (idx, term) in terms.iter().enumerate() {
            if idx > 0 && !self.curated.delay.is_zero() {
                tokio::time::sleep(self.curated.delay).await;
            }
            match self.api.search(term, 1).await {
                Ok(result) => {
                    let hits = result.into_summaries();
                    debug!(term = %term, hits = hits.len(), "Curated term searched");
                    collected.extend(hits.into_iter().take(self.curated.per_term));
                }
                Err(e) => warn!("Error fetching '{}' movies: {}", term, e),
            }
        }

        let movies = dedupe_by_id(collected, self.curated.max_results);
        info!(
            "Curated list assembled from {} terms: {} movies",
            terms.len(),
            movies.len()
        );
        movies
    }

    /// Searches the genre label as a literal title term; failures yield an empty list.
    pub async fn by_genre_label(&self, label: &str) -> Vec<MovieSummary> {
        match self.api.search(label, 1).await {
            Ok(result) => result.into_summaries(),
            Err(e) => {
                warn!("Error fetching '{}' movies: {}", label, e);
                Vec::new()
            }
        }
    }

    pub async fn by_genre(&self, genre: Genre) -> Vec<MovieSummary> {
        match genre {
            Genre::All => self.curated_list().await,
            other => self.by_genre_label(other.label()).await,
        }
    }
}

/// First occurrence of each id wins; order is kept.
fn dedupe_by_id(movies: Vec<MovieSummary>, max: usize) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    movies
        .into_iter()
        .filter(|m| seen.insert(m.imdb_id.clone()))
        .take(max)
        .collect()
}
