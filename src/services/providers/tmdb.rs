//! TMDB popular movies provider
//!
//! One request to `/movie/popular` yields the first page of popular titles.
//! TMDB has no cast, director or mood in that listing, so those columns stay
//! empty and get catalog defaults.

use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::RawMovie,
    services::providers::CatalogProvider,
};

const DEFAULT_RELEASE_DATE: &str = "2000-01-01";
const UNKNOWN_GENRE: &str = "Unknown";

/// (TMDB genre id, Spanish name, English name)
const GENRES: &[(u32, &str, &str)] = &[
    (28, "Acción", "Action"),
    (12, "Aventura", "Adventure"),
    (16, "Animación", "Animation"),
    (35, "Comedia", "Comedy"),
    (80, "Crimen", "Crime"),
    (99, "Documental", "Documentary"),
    (18, "Drama", "Drama"),
    (10751, "Familiar", "Family"),
    (14, "Fantasía", "Fantasy"),
    (36, "Historia", "History"),
    (27, "Terror", "Horror"),
    (10402, "Música", "Music"),
    (9648, "Misterio", "Mystery"),
    (10749, "Romance", "Romance"),
    (878, "Ciencia ficción", "Science Fiction"),
    (10770, "Película de TV", "TV Movie"),
    (53, "Suspense", "Thriller"),
    (10752, "Bélica", "War"),
    (37, "Western", "Western"),
];

#[derive(Debug, Deserialize)]
struct PopularResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    title: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    release_date: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Clone)]
pub struct TmdbCatalogProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbCatalogProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    fn spanish(&self) -> bool {
        self.language.to_lowercase().starts_with("es")
    }

    fn genre_name(&self, id: u32) -> &'static str {
        GENRES
            .iter()
            .find(|(gid, _, _)| *gid == id)
            .map(|(_, es, en)| if self.spanish() { *es } else { *en })
            .unwrap_or(UNKNOWN_GENRE)
    }

    fn to_raw(&self, movie: TmdbMovie) -> RawMovie {
        let genres = if movie.genre_ids.is_empty() {
            UNKNOWN_GENRE.to_string()
        } else {
            movie
                .genre_ids
                .iter()
                .map(|id| self.genre_name(*id))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let release_date = movie
            .release_date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RELEASE_DATE.to_string());

        RawMovie {
            title: movie.title,
            genres: Some(genres),
            year: Some(release_date.chars().take(10).collect()),
            plot: movie.overview,
            rating: movie.vote_average.map(|v| v.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbCatalogProvider {
    #[instrument(skip(self), fields(language = %self.language))]
    async fn fetch_movies(&self) -> AppResult<Vec<RawMovie>> {
        let url = format!("{}/movie/popular", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("page", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let popular: PopularResponse = response.json().await?;
        let movies: Vec<RawMovie> = popular
            .results
            .into_iter()
            .map(|movie| self.to_raw(movie))
            .collect();

        tracing::info!(
            results = movies.len(),
            language = %self.language,
            provider = "tmdb",
            "Popular movies fetched"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
