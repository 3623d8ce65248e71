use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::feed::controller::PageFetcher;
use crate::feed::resolver::{QueryDescriptor, QueryMode};
use crate::internal::cache::TtlCache;
use crate::internal::models::{Genre, Movie, MovieCredits, MovieDetails, MoviePage};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org";

/// Envelope TMDB wraps the genre list in.
#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}

/// HTTP client for The Movie Database v3 API.
///
/// Authentication uses the v4 read access token as a bearer header on every
/// request. Errors come back as `anyhow::Result` with the failing URL in the
/// context chain instead of being flattened into plain strings.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    genre_cache: TtlCache<String, Vec<Genre>>,
    details_cache: TtlCache<u64, MovieDetails>,
}

impl TmdbClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !config.read_access_token.is_empty() {
            let bearer = format!("Bearer {}", config.read_access_token);
            let mut value = HeaderValue::from_str(&bearer)
                .context("read access token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            genre_cache: TtlCache::new(Duration::from_secs(3600)), // genre list is near-static
            details_cache: TtlCache::new(Duration::from_secs(300)), // 5 minutes
        })
    }

    /// Generic helper to GET a URL and deserialize the JSON body into `T`.
    async fn get_json<T>(&self, url: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {} returned {}", url, status);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to parse JSON response from {}", url))
    }

    /// Fetch one page of a curated list (popular, top_rated, upcoming, ...).
    pub async fn movie_list(&self, category: &str, page: u32) -> Result<MoviePage> {
        let url = format!("{}/3/movie/{}", self.base_url, category);
        let page = page.to_string();
        self.get_json(&url, &[("page", page.as_str())])
            .await
            .with_context(|| format!("movie_list failed for category {}", category))
    }

    /// Fetch one page of the discover feed filtered to a single genre.
    pub async fn movies_by_genre(&self, genre_id: &str, page: u32) -> Result<MoviePage> {
        let url = format!("{}/3/discover/movie", self.base_url);
        let page = page.to_string();
        self.get_json(&url, &[("with_genres", genre_id), ("page", page.as_str())])
            .await
            .with_context(|| format!("movies_by_genre failed for genre {}", genre_id))
    }

    /// Full-text title search.
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage> {
        let url = format!("{}/3/search/movie", self.base_url);
        let page = page.to_string();
        self.get_json(&url, &[("query", query), ("page", page.as_str())])
            .await
            .with_context(|| format!("search_movies failed for query {:?}", query))
    }

    /// Fetch the movie genre list.
    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let url = format!("{}/3/genre/movie/list", self.base_url);

        // Check cache first
        if let Some(genres) = self.genre_cache.get(&url) {
            return Ok(genres);
        }

        let response: GenreListResponse =
            self.get_json(&url, &[]).await.context("genres failed")?;

        // Cache the result
        self.genre_cache.insert(url, response.genres.clone());
        Ok(response.genres)
    }

    /// Fetch full details for a single movie.
    pub async fn movie_details(&self, id: u64) -> Result<MovieDetails> {
        // Check cache first
        if let Some(details) = self.details_cache.get(&id) {
            return Ok(details);
        }

        let url = format!("{}/3/movie/{}", self.base_url, id);
        let details: MovieDetails = self
            .get_json(&url, &[])
            .await
            .with_context(|| format!("movie_details failed for id {}", id))?;

        // Cache the result
        self.details_cache.insert(id, details.clone());
        Ok(details)
    }

    /// Fetch the cast list for a single movie.
    pub async fn movie_credits(&self, id: u64) -> Result<MovieCredits> {
        let url = format!("{}/3/movie/{}/credits", self.base_url, id);
        self.get_json(&url, &[])
            .await
            .with_context(|| format!("movie_credits failed for id {}", id))
    }

    /// Fetch movies recommended alongside a single movie.
    pub async fn movie_recommendations(&self, id: u64) -> Result<MoviePage> {
        let url = format!("{}/3/movie/{}/recommendations", self.base_url, id);
        self.get_json(&url, &[])
            .await
            .with_context(|| format!("movie_recommendations failed for id {}", id))
    }
}

#[async_trait]
impl PageFetcher for TmdbClient {
    async fn fetch_page(&self, descriptor: &QueryDescriptor, page: u32) -> Result<Vec<Movie>> {
        let fetched = match descriptor.mode {
            QueryMode::Category => self.movie_list(&descriptor.key, page).await?,
            QueryMode::Genre => self.movies_by_genre(&descriptor.key, page).await?,
        };
        Ok(fetched.results)
    }
}
