//! TF-IDF vector space over the catalog
//!
//! Weighting follows the classic smoothed formulation:
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, raw term counts, L2-normalized
//! rows. Because every row is unit length, cosine similarity is a dot product.

use std::collections::{HashMap, HashSet};

use crate::{
    error::{AppError, AppResult},
    services::{
        catalog::Catalog,
        text::{fold, tokenize},
    },
};

/// Sparse vector with entries sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_unsorted(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(idx, _)| *idx);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return Self::default();
        }
        for (_, weight) in &mut self.entries {
            *weight /= norm;
        }
        self
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Learns a vocabulary and idf weights, then embeds text into that space
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    stop_words: HashSet<String>,
    max_features: usize,
}

impl TfidfVectorizer {
    pub fn new(stop_words: &HashSet<String>, max_features: usize) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            stop_words: stop_words.clone(),
            max_features,
        }
    }

    fn analyze(&self, text: &str) -> Vec<String> {
        tokenize(&fold(text))
            .into_iter()
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    /// Fits the vocabulary, keeping the `max_features` most frequent terms
    pub fn fit(&mut self, documents: &[&str]) -> AppResult<()> {
        if documents.is_empty() {
            return Err(AppError::Index("cannot fit on an empty corpus".to_string()));
        }

        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = self.analyze(doc);
            let unique: HashSet<&String> = tokens.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in tokens {
                *term_freq.entry(term).or_insert(0) += 1;
            }
        }

        if term_freq.is_empty() {
            return Err(AppError::Index(
                "empty vocabulary; documents contain only stop words".to_string(),
            ));
        }

        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        if ranked.is_empty() {
            return Err(AppError::Index("max_features must be at least 1".to_string()));
        }

        // column order is alphabetical, independent of frequency rank
        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n_docs = documents.len() as f64;
        self.idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        Ok(())
    }

    /// Embeds text into the fitted space; unknown terms are ignored
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(idx, count)| (idx, count as f64 * self.idf[idx]))
            .collect();
        SparseVector::from_unsorted(entries).normalized()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}

/// Fitted vectorizer plus one document vector per catalog row
#[derive(Debug, Clone)]
pub struct VectorSpaceIndex {
    vectorizer: TfidfVectorizer,
    matrix: Vec<SparseVector>,
}

impl VectorSpaceIndex {
    /// Fits the index over every movie's feature blob, in catalog order
    pub fn build(
        catalog: &Catalog,
        stop_words: &HashSet<String>,
        max_features: usize,
    ) -> AppResult<Self> {
        let documents: Vec<&str> = catalog.movies().iter().map(|m| m.features.as_str()).collect();

        let mut vectorizer = TfidfVectorizer::new(stop_words, max_features);
        vectorizer.fit(&documents)?;

        let matrix = documents.iter().map(|doc| vectorizer.transform(doc)).collect();

        tracing::info!(
            documents = documents.len(),
            vocabulary = vectorizer.vocabulary_size(),
            "TF-IDF index built"
        );

        Ok(Self { vectorizer, matrix })
    }

    /// Cosine similarity of the query against every row, in catalog order
    pub fn similarities(&self, query: &str) -> Vec<f64> {
        let query_vector = self.vectorizer.transform(query);
        if query_vector.is_empty() {
            return vec![0.0; self.matrix.len()];
        }
        self.matrix.iter().map(|row| row.dot(&query_vector)).collect()
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawMovie;

    fn stop_words() -> HashSet<String> {
        ["de", "la", "el", "y", "en", "un", "una", "the"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn movie(title: &str, genres: &str, plot: &str) -> RawMovie {
        RawMovie {
            title: Some(title.to_string()),
            genres: Some(genres.to_string()),
            year: Some("2000".to_string()),
            plot: Some(plot.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_rejects_empty_corpus() {
        let mut vectorizer = TfidfVectorizer::new(&stop_words(), 2000);
        assert!(vectorizer.fit(&[]).is_err());
    }

    #[test]
    fn test_fit_rejects_stop_word_only_corpus() {
        let mut vectorizer = TfidfVectorizer::new(&stop_words(), 2000);
        assert!(vectorizer.fit(&["de la el", "y en un"]).is_err());
    }

    #[test]
    fn test_stop_words_and_short_tokens_are_excluded() {
        let mut vectorizer = TfidfVectorizer::new(&stop_words(), 2000);
        vectorizer.fit(&["El viaje de la nave", "a ship"]).unwrap();

        assert!(vectorizer.contains_term("viaje"));
        assert!(vectorizer.contains_term("nave"));
        assert!(vectorizer.contains_term("ship"));
        assert!(!vectorizer.contains_term("el"));
        assert!(!vectorizer.contains_term("a"));
    }

    #[test]
    fn test_max_features_keeps_most_frequent_terms() {
        let mut vectorizer = TfidfVectorizer::new(&stop_words(), 2);
        vectorizer
            .fit(&["space space space ship", "space ship crew", "drama"])
            .unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert!(vectorizer.contains_term("space"));
        assert!(vectorizer.contains_term("ship"));
        assert!(!vectorizer.contains_term("crew"));
    }

    #[test]
    fn test_transform_is_unit_length() {
        let mut vectorizer = TfidfVectorizer::new(&stop_words(), 2000);
        vectorizer.fit(&["space ship crew", "romantic drama"]).unwrap();

        let vector = vectorizer.transform("space crew crew");
        assert!((vector.norm() - 1.0).abs() < 1e-9);
        assert!(vectorizer.transform("completely unknown words").is_empty());
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseVector::from_unsorted(vec![(3, 1.0), (0, 2.0)]);
        let b = SparseVector::from_unsorted(vec![(0, 0.5), (2, 4.0), (3, 3.0)]);
        assert!((a.dot(&b) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_index_similarities_rank_matching_document_first() {
        let catalog = Catalog::from_raw(vec![
            movie("Interstellar", "Sci-Fi", "astronauts travel through a wormhole in space"),
            movie("Titanic", "Romance", "a love story aboard a doomed ship"),
        ]);
        let index = VectorSpaceIndex::build(&catalog, &stop_words(), 2000).unwrap();

        assert_eq!(index.len(), 2);
        let scores = index.similarities("space wormhole");
        assert!(scores[0] > 0.0);
        assert_eq!(scores[1], 0.0);
        assert!(scores[0] <= 1.0 + 1e-9);
    }

    #[test]
    fn test_identical_text_has_similarity_one() {
        let catalog = Catalog::from_raw(vec![
            movie("Alpha", "Drama", "quiet village story"),
            movie("Beta", "Action", "loud city chase"),
        ]);
        let index = VectorSpaceIndex::build(&catalog, &stop_words(), 2000).unwrap();

        let features = catalog.movie(1).features.clone();
        let scores = index.similarities(&features);
        assert!((scores[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_fails_on_empty_catalog() {
        let catalog = Catalog::from_raw(vec![]);
        assert!(VectorSpaceIndex::build(&catalog, &stop_words(), 2000).is_err());
    }
}
