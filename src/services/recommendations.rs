use crate::{
    error::{AppError, AppResult},
    models::{QueryResult, RecommendOutcome, Strategy},
    services::{
        catalog::Catalog,
        classifier::{QueryClassifier, QueryKind},
        filters::PreciseFilterEngine,
        indexer::VectorSpaceIndex,
        rules::RuleSet,
        similarity::SimilarityRanker,
        text::QueryText,
    },
};

/// Tuning knobs of the recommendation pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderSettings {
    /// Maximum number of movies returned by either strategy
    pub top_k: usize,
    /// Rows less similar than this are never recommended
    pub similarity_floor: f64,
    /// Vocabulary cap of the TF-IDF index
    pub max_features: usize,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            top_k: 6,
            similarity_floor: 0.01,
            max_features: 2000,
        }
    }
}

/// Immutable recommendation context: catalog, keyword rules and TF-IDF index
///
/// Built once at startup and shared read-only between requests. Every call to
/// `recommend` works on its own transient row lists.
pub struct Recommender {
    catalog: Catalog,
    rules: RuleSet,
    index: Option<VectorSpaceIndex>,
    settings: RecommenderSettings,
}

impl Recommender {
    /// Fits the similarity index; a failed fit leaves similarity ranking disabled
    pub fn new(catalog: Catalog, rules: RuleSet, settings: RecommenderSettings) -> Self {
        let index = match VectorSpaceIndex::build(&catalog, rules.stop_words(), settings.max_features) {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Similarity index could not be built, only precise filters will answer"
                );
                None
            }
        };

        tracing::info!(
            movies = catalog.len(),
            actors = catalog.actor_vocabulary().len(),
            directors = catalog.director_vocabulary().len(),
            rules = rules.len(),
            index_ready = index.is_some(),
            "Recommender ready"
        );

        Self {
            catalog,
            rules,
            index,
            settings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index_ready(&self) -> bool {
        self.index.is_some()
    }

    pub fn classify(&self, query: &str) -> QueryKind {
        QueryClassifier::new(&self.rules, &self.catalog).classify(&QueryText::new(query))
    }

    /// Recommends movies for a free-text query
    ///
    /// Precise filters answer first when the query carries concrete hints;
    /// otherwise, or when they find nothing, similarity ranking does.
    pub fn recommend(&self, query: &str) -> AppResult<RecommendOutcome> {
        let query = QueryText::new(query);
        if query.is_blank() {
            return Err(AppError::EmptyQuery);
        }

        let kind = QueryClassifier::new(&self.rules, &self.catalog).classify(&query);
        tracing::info!(query = %query.raw(), kind = ?kind, "Processing recommendation query");

        if kind == QueryKind::Precise {
            let outcome = PreciseFilterEngine::new(&self.catalog, &self.rules, self.settings.top_k)
                .apply(&query);
            if !outcome.matches.is_empty() {
                return Ok(self.matches(&outcome.matches, Strategy::Precise));
            }
        }

        let ranked = SimilarityRanker::new(
            &self.catalog,
            self.index.as_ref(),
            &self.rules,
            self.settings.top_k,
            self.settings.similarity_floor,
        )
        .rank(&query);

        if ranked.is_empty() {
            tracing::info!(query = %query.raw(), "No matches from either strategy");
            return Ok(RecommendOutcome::no_matches(self.rules.suggestions().to_vec()));
        }

        let indices: Vec<usize> = ranked.iter().map(|m| m.index).collect();
        Ok(self.matches(&indices, Strategy::Similarity))
    }

    fn matches(&self, indices: &[usize], strategy: Strategy) -> RecommendOutcome {
        let recommendations = indices
            .iter()
            .map(|&idx| self.catalog.movie(idx).clone())
            .collect::<Vec<_>>();

        tracing::info!(
            strategy = %strategy,
            count = recommendations.len(),
            "Recommendations ready"
        );

        RecommendOutcome::Matches(QueryResult {
            recommendations,
            strategy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawMovie;

    fn movie(title: &str, genres: &str, year: &str, mood: &str, rating: &str) -> RawMovie {
        RawMovie {
            title: Some(title.to_string()),
            genres: Some(genres.to_string()),
            year: Some(year.to_string()),
            mood: Some(mood.to_string()),
            rating: Some(rating.to_string()),
            ..Default::default()
        }
    }

    fn recommender() -> Recommender {
        let catalog = Catalog::from_raw(vec![
            movie("Inception", "scifi", "2010", "exciting", "8.8"),
            movie("Titanic", "romance", "1997", "sad", "7.9"),
            movie("The Hangover", "Comedy", "2009", "comedy", "7.7"),
        ]);
        Recommender::new(catalog, RuleSet::builtin().unwrap(), RecommenderSettings::default())
    }

    #[test]
    fn test_blank_query_is_an_error() {
        let recommender = recommender();
        assert!(matches!(recommender.recommend("   "), Err(AppError::EmptyQuery)));
        assert!(matches!(recommender.recommend(""), Err(AppError::EmptyQuery)));
    }

    #[test]
    fn test_precise_strategy() {
        let outcome = recommender().recommend("movies from 2010").unwrap();
        assert_eq!(outcome.strategy(), Some(Strategy::Precise));
        assert_eq!(outcome.titles(), vec!["Inception"]);
    }

    #[test]
    fn test_precise_without_matches_falls_back_to_similarity() {
        let recommender = recommender();
        assert_eq!(recommender.classify("romance movies from 2010"), QueryKind::Precise);

        let outcome = recommender.recommend("romance movies from 2010").unwrap();
        assert_eq!(outcome.strategy(), Some(Strategy::Similarity));
        assert_eq!(outcome.titles()[0], "Titanic");
    }

    #[test]
    fn test_general_query_uses_similarity() {
        let recommender = recommender();
        assert_eq!(recommender.classify("something funny"), QueryKind::General);

        let outcome = recommender.recommend("something funny").unwrap();
        assert_eq!(outcome.strategy(), Some(Strategy::Similarity));
        assert_eq!(outcome.titles(), vec!["The Hangover"]);
    }

    #[test]
    fn test_no_matches_outcome_has_suggestions() {
        let outcome = recommender().recommend("zzzz qqqq").unwrap();
        assert_eq!(outcome.strategy(), None);
        match outcome {
            RecommendOutcome::NoMatches(no_matches) => {
                assert_eq!(no_matches.error, "no matches");
                assert!(!no_matches.suggestions.is_empty());
            }
            RecommendOutcome::Matches(_) => panic!("expected no matches"),
        }
    }

    #[test]
    fn test_failed_index_keeps_precise_filters() {
        let catalog = Catalog::from_raw(vec![
            movie("Inception", "scifi", "2010", "exciting", "8.8"),
            movie("The Hangover", "Comedy", "2009", "comedy", "7.7"),
        ]);
        let settings = RecommenderSettings {
            max_features: 0,
            ..Default::default()
        };
        let recommender = Recommender::new(catalog, RuleSet::builtin().unwrap(), settings);
        assert!(!recommender.index_ready());

        let precise = recommender.recommend("movies from 2010").unwrap();
        assert_eq!(precise.strategy(), Some(Strategy::Precise));
        assert_eq!(precise.titles(), vec!["Inception"]);

        assert_eq!(recommender.classify("something funny"), QueryKind::General);
        let general = recommender.recommend("something funny").unwrap();
        assert!(matches!(general, RecommendOutcome::NoMatches(_)));
    }

    #[test]
    fn test_empty_catalog_degrades_gracefully() {
        let recommender = Recommender::new(
            Catalog::from_raw(vec![]),
            RuleSet::builtin().unwrap(),
            RecommenderSettings::default(),
        );
        assert!(!recommender.index_ready());

        let outcome = recommender.recommend("movies from 2010").unwrap();
        assert!(matches!(outcome, RecommendOutcome::NoMatches(_)));
    }
}
