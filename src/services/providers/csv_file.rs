use std::io::Read;
use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::RawMovie,
    services::providers::CatalogProvider,
};

/// Columns a catalog file cannot do without
const REQUIRED_COLUMNS: [&str; 3] = ["title", "genres", "year"];

/// Reads the catalog from a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvCatalogProvider {
    path: PathBuf,
}

impl CsvCatalogProvider {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Parses CSV content; header names are matched case-insensitively
    ///
    /// Unknown columns are ignored and absent optional columns come back as
    /// `None`. A row that cannot be decoded is skipped with a warning.
    pub fn parse<R: Read>(input: R) -> AppResult<Vec<RawMovie>> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);

        let headers: StringRecord = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Catalog(format!(
                "catalog is missing required columns: {}",
                missing.join(", ")
            )));
        }

        reader.set_headers(headers);

        let mut rows = Vec::new();
        for (line, result) in reader.deserialize::<RawMovie>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => tracing::warn!(row = line + 1, error = %e, "Skipping unreadable catalog row"),
            }
        }

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for CsvCatalogProvider {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_movies(&self) -> AppResult<Vec<RawMovie>> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::Catalog(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let rows = Self::parse(content.as_slice())?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "Parsed catalog file");
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_with_mixed_case_headers() {
        let data = "Title,GENRES,Year,Rating,id\nInception,\"Sci-Fi, Action\",2010,8.8,1\n";
        let rows = CsvCatalogProvider::parse(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("Inception"));
        assert_eq!(rows[0].genres.as_deref(), Some("Sci-Fi, Action"));
        assert_eq!(rows[0].rating.as_deref(), Some("8.8"));
        assert_eq!(rows[0].director, None);
    }

    #[test]
    fn test_parse_rejects_missing_required_columns() {
        let data = "title,genres\nInception,Sci-Fi\n";
        let err = CsvCatalogProvider::parse(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("year"));
    }

    #[test]
    fn test_parse_keeps_rows_with_blank_fields() {
        let data = "title,genres,year,mood\n,Drama,1999,\nCoco,Animation,2017,happy\n";
        let rows = CsvCatalogProvider::parse(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].mood.as_deref(), Some("happy"));
    }

    #[tokio::test]
    async fn test_fetch_movies_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title,genres,year,actors").unwrap();
        writeln!(file, "Titanic,Romance,1997,\"Leonardo DiCaprio, Kate Winslet\"").unwrap();

        let provider = CsvCatalogProvider::new(file.path().to_path_buf());
        let rows = provider.fetch_movies().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].actors.as_deref(), Some("Leonardo DiCaprio, Kate Winslet"));
    }

    #[tokio::test]
    async fn test_fetch_movies_missing_file() {
        let provider = CsvCatalogProvider::new(PathBuf::from("/nonexistent/movies.csv"));
        assert!(matches!(provider.fetch_movies().await, Err(AppError::Catalog(_))));
    }
}
