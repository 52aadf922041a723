use crate::services::{catalog::Catalog, rules::RuleSet, text::QueryText};

/// One structured predicate of the precise filter cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFilter {
    Year,
    Genre,
    Title,
    Actor,
    Director,
    Rating,
    Mood,
}

impl FieldFilter {
    /// Order in which the cascade is applied
    pub const ORDER: [FieldFilter; 7] = [
        FieldFilter::Year,
        FieldFilter::Genre,
        FieldFilter::Title,
        FieldFilter::Actor,
        FieldFilter::Director,
        FieldFilter::Rating,
        FieldFilter::Mood,
    ];
}

/// Rows left after filtering, as catalog indices
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub matches: Vec<usize>,
    /// Filters whose trigger was present in the query
    pub applied: Vec<FieldFilter>,
}

/// Narrows the catalog with independent field predicates
///
/// Works on a transient list of row indices; the shared catalog is never
/// touched.
pub struct PreciseFilterEngine<'a> {
    catalog: &'a Catalog,
    rules: &'a RuleSet,
    top_k: usize,
}

impl<'a> PreciseFilterEngine<'a> {
    pub fn new(catalog: &'a Catalog, rules: &'a RuleSet, top_k: usize) -> Self {
        Self {
            catalog,
            rules,
            top_k,
        }
    }

    /// Runs the full cascade over the whole catalog
    pub fn apply(&self, query: &QueryText) -> FilterOutcome {
        self.apply_to(query, (0..self.catalog.len()).collect())
    }

    /// Runs the full cascade over a pre-narrowed subset
    ///
    /// The result is sorted by rating (descending, ties in catalog order) and
    /// cut to `top_k`. A query that triggers no filter at all yields nothing.
    pub fn apply_to(&self, query: &QueryText, subset: Vec<usize>) -> FilterOutcome {
        let mut outcome = self.narrow(query, subset, &FieldFilter::ORDER);

        if outcome.applied.is_empty() {
            tracing::debug!("No precise filter triggered");
            outcome.matches.clear();
            return outcome;
        }

        outcome.matches.sort_by(|a, b| {
            let (ra, rb) = (self.catalog.movie(*a).rating, self.catalog.movie(*b).rating);
            rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
        });
        outcome.matches.truncate(self.top_k);

        tracing::debug!(
            applied = ?outcome.applied,
            matches = outcome.matches.len(),
            "Precise filters applied"
        );

        outcome
    }

    /// Applies the given filters in sequence without ranking the result
    pub fn narrow(
        &self,
        query: &QueryText,
        mut working: Vec<usize>,
        filters: &[FieldFilter],
    ) -> FilterOutcome {
        let mut applied = Vec::new();

        for &filter in filters {
            if let Some(narrowed) = self.apply_filter(filter, query, &working) {
                applied.push(filter);
                working = narrowed;
            }
        }

        FilterOutcome {
            matches: working,
            applied,
        }
    }

    /// `None` when the query does not trigger this filter
    fn apply_filter(
        &self,
        filter: FieldFilter,
        query: &QueryText,
        working: &[usize],
    ) -> Option<Vec<usize>> {
        let folded = query.folded();

        match filter {
            FieldFilter::Year => {
                let year = self.rules.year(query)?;
                tracing::debug!(year, "Filtering by year");
                Some(self.keep(working, |idx| self.catalog.movie(idx).year == year))
            }
            FieldFilter::Genre => {
                let genre_terms = self.rules.genre_matches(query);
                if genre_terms.is_empty() {
                    return None;
                }
                tracing::debug!(genres = ?genre_terms, "Filtering by genre");
                Some(self.keep(working, |idx| {
                    let genres = &self.catalog.fields(idx).genres;
                    genre_terms
                        .iter()
                        .all(|terms| terms.iter().any(|t| genres.contains(t.as_str())))
                }))
            }
            FieldFilter::Title => {
                let title = self.catalog.find_title(folded, |word| {
                    self.rules.is_stop_word(word) || self.rules.is_keyword_word(word)
                })?;
                tracing::debug!(title, "Filtering by title");
                Some(self.keep(working, |idx| self.catalog.fields(idx).title == title))
            }
            FieldFilter::Actor => {
                let actor = self.catalog.find_actor(folded)?;
                tracing::debug!(actor, "Filtering by actor");
                Some(self.keep(working, |idx| {
                    self.catalog.fields(idx).actors.iter().any(|a| a == actor)
                }))
            }
            FieldFilter::Director => {
                let director = self.catalog.find_director(folded)?;
                tracing::debug!(director, "Filtering by director");
                Some(self.keep(working, |idx| self.catalog.fields(idx).director == director))
            }
            FieldFilter::Rating => {
                let minimum = self.rules.rating_threshold(query)?;
                tracing::debug!(minimum, "Filtering by minimum rating");
                Some(self.keep(working, |idx| self.catalog.movie(idx).rating >= minimum))
            }
            FieldFilter::Mood => {
                let mood_terms = self.rules.mood_matches(query);
                if mood_terms.is_empty() {
                    return None;
                }
                tracing::debug!(moods = ?mood_terms, "Filtering by mood");
                Some(self.keep(working, |idx| {
                    let mood = &self.catalog.fields(idx).mood;
                    mood_terms
                        .iter()
                        .all(|terms| terms.iter().any(|t| mood.contains(t.as_str())))
                }))
            }
        }
    }

    fn keep(&self, working: &[usize], predicate: impl Fn(usize) -> bool) -> Vec<usize> {
        working.iter().copied().filter(|&idx| predicate(idx)).collect()
    }
}
