use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::MovieRecord;

/// Which ranking path produced a result set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Structured field filters, ordered by rating
    Precise,
    /// TF-IDF cosine similarity
    Similarity,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Precise => write!(f, "precise"),
            Strategy::Similarity => write!(f, "similarity"),
        }
    }
}

/// Ordered recommendations for one query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub recommendations: Vec<MovieRecord>,
    pub strategy: Strategy,
}

/// Returned when neither strategy finds anything
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoMatches {
    pub error: String,
    /// Example queries the user can try instead
    pub suggestions: Vec<String>,
}

/// Response of the recommend operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecommendOutcome {
    Matches(QueryResult),
    NoMatches(NoMatches),
}

impl RecommendOutcome {
    pub fn no_matches(suggestions: Vec<String>) -> Self {
        RecommendOutcome::NoMatches(NoMatches {
            error: "no matches".to_string(),
            suggestions,
        })
    }

    /// Strategy that produced the matches, `None` for the no-match outcome
    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            RecommendOutcome::Matches(result) => Some(result.strategy),
            RecommendOutcome::NoMatches(_) => None,
        }
    }

    pub fn recommendations(&self) -> &[MovieRecord] {
        match self {
            RecommendOutcome::Matches(result) => &result.recommendations,
            RecommendOutcome::NoMatches(_) => &[],
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.recommendations()
            .iter()
            .map(|movie| movie.title.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_serialization() {
        assert_eq!(serde_json::to_string(&Strategy::Precise).unwrap(), "\"precise\"");
        assert_eq!(serde_json::to_string(&Strategy::Similarity).unwrap(), "\"similarity\"");
        assert_eq!(format!("{}", Strategy::Similarity), "similarity");
    }

    #[test]
    fn test_no_matches_shape() {
        let outcome = RecommendOutcome::no_matches(vec!["movies from 2010".to_string()]);
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["error"], "no matches");
        assert_eq!(json["suggestions"][0], "movies from 2010");
        assert!(json.get("recommendations").is_none());
        assert_eq!(outcome.strategy(), None);
        assert!(outcome.titles().is_empty());
    }

    #[test]
    fn test_matches_shape() {
        let outcome = RecommendOutcome::Matches(QueryResult {
            recommendations: vec![],
            strategy: Strategy::Precise,
        });
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["strategy"], "precise");
        assert!(json["recommendations"].as_array().unwrap().is_empty());
        assert_eq!(outcome.strategy(), Some(Strategy::Precise));
    }
}
