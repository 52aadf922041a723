use crate::services::{catalog::Catalog, rules::RuleSet, text::QueryText};

/// Whether a query can be answered by field filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Precise,
    General,
}

/// A concrete, filterable hint found in a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Year,
    Genre,
    Rating,
    Actor,
    Director,
    Title,
    Intent,
}

/// Decides between precise filtering and similarity ranking
///
/// Mood words on their own never make a query precise: "something sad" is
/// exactly the kind of request similarity ranking is for.
pub struct QueryClassifier<'a> {
    rules: &'a RuleSet,
    catalog: &'a Catalog,
}

impl<'a> QueryClassifier<'a> {
    pub fn new(rules: &'a RuleSet, catalog: &'a Catalog) -> Self {
        Self { rules, catalog }
    }

    /// Every signal present in the query, in a fixed order
    pub fn signals(&self, query: &QueryText) -> Vec<Signal> {
        let folded = query.folded();
        let mut signals = Vec::new();

        if self.rules.year(query).is_some() {
            signals.push(Signal::Year);
        }
        if !self.rules.genre_matches(query).is_empty() {
            signals.push(Signal::Genre);
        }
        if self.rules.rating_threshold(query).is_some() {
            signals.push(Signal::Rating);
        }
        if self.catalog.find_actor(folded).is_some() {
            signals.push(Signal::Actor);
        }
        if self.catalog.find_director(folded).is_some() {
            signals.push(Signal::Director);
        }
        if self
            .catalog
            .find_title(folded, |word| {
                self.rules.is_stop_word(word) || self.rules.is_keyword_word(word)
            })
            .is_some()
        {
            signals.push(Signal::Title);
        }
        if self.rules.has_intent(query) {
            signals.push(Signal::Intent);
        }

        signals
    }

    pub fn classify(&self, query: &QueryText) -> QueryKind {
        if self.signals(query).is_empty() {
            QueryKind::General
        } else {
            QueryKind::Precise
        }
    }
}
