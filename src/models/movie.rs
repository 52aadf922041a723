use serde::{Deserialize, Serialize};

/// A catalog row as delivered by a provider, before normalization
///
/// Every column is optional text; the catalog loader decides which rows
/// survive and fills defaults for the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

/// One finalized catalog entry returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    /// Comma-separated genre names
    pub genres: String,
    /// Comma-separated cast, "Unknown" when the source has none
    pub actors: String,
    pub director: String,
    pub year: i32,
    pub plot: String,
    pub mood: String,
    pub rating: f64,
    /// Space-joined text blob the TF-IDF index is fitted on
    #[serde(skip)]
    pub features: String,
}

impl MovieRecord {
    /// Builds the vectorization blob from the descriptive fields
    pub fn compose_features(&mut self) {
        self.features = [
            self.title.as_str(),
            self.genres.as_str(),
            self.actors.as_str(),
            self.director.as_str(),
            self.mood.as_str(),
            self.plot.as_str(),
        ]
        .join(" ");
    }
}
