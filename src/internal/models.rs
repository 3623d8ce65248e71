use serde::Deserialize;

/// One movie as returned by the TMDB list endpoints. The feed treats it as an
/// opaque unit; every field beyond `id` is optional because the API omits
/// fields freely.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Movie {
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

/// Whether the feed is between fetches, waiting on one, or stuck on a failed
/// one. `Failed` holds until the next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Fetching,
    Failed,
}

/// Paged envelope wrapping every TMDB list response.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct MoviePage {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full record for a single movie (`/3/movie/{id}`), richer than the list
/// entry.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub runtime: Option<u32>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: Option<String>,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MovieCredits {
    pub id: u64,
    #[serde(default)]
    pub cast: Vec<CastMember>,
}
