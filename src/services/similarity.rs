use std::collections::HashSet;

use crate::services::{
    catalog::Catalog, indexer::VectorSpaceIndex, rules::RuleSet, text::QueryText,
};

/// A catalog row with its cosine similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMovie {
    pub index: usize,
    pub score: f64,
}

/// Ranks the whole catalog by TF-IDF cosine similarity
pub struct SimilarityRanker<'a> {
    catalog: &'a Catalog,
    index: Option<&'a VectorSpaceIndex>,
    rules: &'a RuleSet,
    top_k: usize,
    floor: f64,
}

impl<'a> SimilarityRanker<'a> {
    pub fn new(
        catalog: &'a Catalog,
        index: Option<&'a VectorSpaceIndex>,
        rules: &'a RuleSet,
        top_k: usize,
        floor: f64,
    ) -> Self {
        Self {
            catalog,
            index,
            rules,
            top_k,
            floor,
        }
    }

    /// Query text with the terms of recognized keywords appended
    ///
    /// "something funny" becomes "something funny comedy comedia", which pulls
    /// the query vector towards rows that use the catalog's own vocabulary.
    pub fn expand_query(&self, query: &QueryText) -> String {
        let mut expanded = query.folded().to_string();
        for term in self.rules.matching(query).flat_map(|rule| rule.expansion_terms()) {
            expanded.push(' ');
            expanded.push_str(term);
        }
        expanded
    }

    /// Top rows by similarity, highest first
    ///
    /// Ties keep catalog order, rows under the floor are dropped and repeated
    /// titles only appear once. Without an index nothing is returned.
    pub fn rank(&self, query: &QueryText) -> Vec<ScoredMovie> {
        let Some(index) = self.index else {
            tracing::warn!("Similarity index unavailable, returning no results");
            return Vec::new();
        };

        let expanded = self.expand_query(query);
        let mut scored: Vec<ScoredMovie> = index
            .similarities(&expanded)
            .into_iter()
            .enumerate()
            .map(|(index, score)| ScoredMovie { index, score })
            .filter(|movie| movie.score >= self.floor)
            .collect();

        // stable sort: equal scores stay in catalog order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut seen = HashSet::new();
        let ranked: Vec<ScoredMovie> = scored
            .into_iter()
            .filter(|movie| seen.insert(self.catalog.fields(movie.index).title.clone()))
            .take(self.top_k)
            .collect();

        tracing::debug!(
            query = %expanded,
            results = ranked.len(),
            best = ranked.first().map(|m| m.score),
            "Similarity ranking done"
        );

        ranked
    }
}
