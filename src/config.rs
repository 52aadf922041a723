use serde::Deserialize;
use std::path::PathBuf;

use crate::services::recommendations::RecommenderSettings;

/// Where the movie catalog is loaded from at startup
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Csv,
    Tmdb,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Catalog provider to use
    #[serde(default = "default_catalog_source")]
    pub catalog_source: CatalogSource,

    /// Path to the catalog CSV file (csv source)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// TMDB API key (tmdb source)
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB, also selects genre names
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Optional JSON file replacing the built-in keyword rules
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Maximum number of recommendations returned
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum cosine similarity for a movie to be recommended
    #[serde(default = "default_similarity_floor")]
    pub similarity_floor: f64,

    /// Vocabulary cap of the TF-IDF index
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_source() -> CatalogSource {
    CatalogSource::Csv
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/movies.csv")
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "es-ES".to_string()
}

fn default_top_k() -> usize {
    6
}

fn default_similarity_floor() -> f64 {
    0.01
}

fn default_max_features() -> usize {
    2000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Tuning knobs handed to the recommender
    pub fn recommender_settings(&self) -> RecommenderSettings {
        RecommenderSettings {
            top_k: self.top_k,
            similarity_floor: self.similarity_floor,
            max_features: self.max_features,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let vars: Vec<(String, String)> = Vec::new();
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.catalog_source, CatalogSource::Csv);
        assert_eq!(config.catalog_path, PathBuf::from("data/movies.csv"));
        assert_eq!(config.top_k, 6);
        assert_eq!(config.max_features, 2000);
        assert!((config.similarity_floor - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert!(config.tmdb_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("CATALOG_SOURCE".to_string(), "tmdb".to_string()),
            ("TMDB_API_KEY".to_string(), "secret".to_string()),
            ("TOP_K".to_string(), "3".to_string()),
            ("SIMILARITY_FLOOR".to_string(), "0".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.catalog_source, CatalogSource::Tmdb);
        assert_eq!(config.tmdb_api_key.as_deref(), Some("secret"));

        let settings = config.recommender_settings();
        assert_eq!(settings.top_k, 3);
        assert_eq!(settings.similarity_floor, 0.0);
    }
}
