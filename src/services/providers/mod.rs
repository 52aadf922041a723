//! Catalog data sources
//!
//! The catalog can come from a local CSV export or from TMDB's popular movies
//! listing. Both hand back raw rows; normalization happens in one place, in
//! `Catalog::from_raw`.

use crate::{
    config::{CatalogSource, Config},
    error::{AppError, AppResult},
    models::RawMovie,
    services::catalog::Catalog,
};

pub mod csv_file;
pub mod tmdb;

pub use csv_file::CsvCatalogProvider;
pub use tmdb::TmdbCatalogProvider;

/// Trait for catalog providers
///
/// Providers only fetch and parse. Structural problems (unreadable source,
/// missing required columns, failed HTTP call) are errors; individual bad
/// rows are left for the catalog loader to drop.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch every raw movie row the source has
    async fn fetch_movies(&self) -> AppResult<Vec<RawMovie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds the provider selected by `CATALOG_SOURCE`
pub fn provider_from_config(config: &Config) -> AppResult<Box<dyn CatalogProvider>> {
    match config.catalog_source {
        CatalogSource::Csv => Ok(Box::new(CsvCatalogProvider::new(config.catalog_path.clone()))),
        CatalogSource::Tmdb => {
            let api_key = config
                .tmdb_api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    AppError::Catalog("TMDB_API_KEY is required when CATALOG_SOURCE=tmdb".to_string())
                })?;
            Ok(Box::new(TmdbCatalogProvider::new(
                api_key,
                config.tmdb_api_url.clone(),
                config.tmdb_language.clone(),
            )))
        }
    }
}

/// Fetches raw rows from the provider and normalizes them into a catalog
pub async fn load_catalog(provider: &dyn CatalogProvider) -> AppResult<Catalog> {
    let rows = provider.fetch_movies().await?;
    let fetched = rows.len();
    let catalog = Catalog::from_raw(rows);

    if catalog.is_empty() {
        tracing::warn!(
            provider = provider.name(),
            fetched,
            "Catalog is empty, every query will return suggestions"
        );
    } else {
        tracing::info!(
            provider = provider.name(),
            fetched,
            movies = catalog.len(),
            "Catalog loaded"
        );
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: Option<&str>, genres: &str, year: &str) -> RawMovie {
        RawMovie {
            title: title.map(str::to_string),
            genres: Some(genres.to_string()),
            year: Some(year.to_string()),
            ..Default::default()
        }
    }

    fn config(vars: &[(&str, &str)]) -> Config {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_catalog_normalizes_provider_rows() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_fetch_movies().times(1).returning(|| {
            Ok(vec![
                row(Some("Inception"), "Sci-Fi", "2010"),
                row(None, "Drama", "2001"),
                row(Some("Coco"), "Animation", "2017-10-27"),
            ])
        });
        provider.expect_name().return_const("mock");

        let catalog = load_catalog(&provider).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.movie(1).year, 2017);
        assert_eq!(catalog.movie(1).rating, 7.0);
    }

    #[tokio::test]
    async fn test_load_catalog_propagates_provider_errors() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_fetch_movies()
            .returning(|| Err(AppError::ExternalApi("API returned status 401".to_string())));
        provider.expect_name().return_const("mock");

        let result = load_catalog(&provider).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_provider_from_config() {
        let csv = provider_from_config(&config(&[])).unwrap();
        assert_eq!(csv.name(), "csv");

        let tmdb = provider_from_config(&config(&[
            ("CATALOG_SOURCE", "tmdb"),
            ("TMDB_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(tmdb.name(), "tmdb");
    }

    #[test]
    fn test_tmdb_requires_api_key() {
        let result = provider_from_config(&config(&[("CATALOG_SOURCE", "tmdb")]));
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }
}
