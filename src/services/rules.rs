//! Keyword vocabulary driving query understanding
//!
//! Genre, mood and intent keywords are data, not control flow: the classifier,
//! the filter engine and the similarity ranker all consult one ordered rule
//! list. The built-in list covers English and Spanish and can be replaced
//! wholesale with a JSON document (see `RULES_PATH`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    services::text::{contains_phrase, fold, tokenize, QueryText},
};

/// Four-digit years from 1900 to 2099
const YEAR_PATTERN: &str = r"\b(?:19|20)\d{2}\b";

/// What a keyword means once it is found in a query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum RuleCategory {
    /// Narrows to movies whose genres contain any of these terms
    Genre { genres: Vec<String> },
    /// Narrows to movies whose mood contains any of these terms
    Mood { moods: Vec<String> },
    /// Generic "I am asking for a movie" wording
    Intent,
    /// Terms appended to the query before similarity ranking
    Expansion { terms: Vec<String> },
}

/// One `{pattern, category}` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordRule {
    pub pattern: String,
    #[serde(flatten)]
    pub category: RuleCategory,
}

impl KeywordRule {
    fn new(pattern: &str, category: RuleCategory) -> Self {
        Self {
            pattern: pattern.to_string(),
            category,
        }
    }

    /// Terms this rule contributes to a similarity query
    pub fn expansion_terms(&self) -> &[String] {
        match &self.category {
            RuleCategory::Genre { genres } => genres,
            RuleCategory::Mood { moods } => moods,
            RuleCategory::Expansion { terms } => terms,
            RuleCategory::Intent => &[],
        }
    }

    /// Same rule with every term folded and blank terms removed
    fn folded(self) -> AppResult<Self> {
        let fold_all = |terms: Vec<String>| -> Vec<String> {
            terms
                .iter()
                .map(|t| fold(t))
                .filter(|t| !t.is_empty())
                .collect()
        };

        let category = match self.category {
            RuleCategory::Genre { genres } => RuleCategory::Genre {
                genres: fold_all(genres),
            },
            RuleCategory::Mood { moods } => RuleCategory::Mood {
                moods: fold_all(moods),
            },
            RuleCategory::Expansion { terms } => RuleCategory::Expansion {
                terms: fold_all(terms),
            },
            RuleCategory::Intent => RuleCategory::Intent,
        };

        // genre and mood rules need at least one term
        let no_terms = matches!(
            &category,
            RuleCategory::Genre { genres: terms } | RuleCategory::Mood { moods: terms }
                if terms.is_empty()
        );
        if no_terms {
            return Err(AppError::Rules(format!("rule '{}' has no terms", self.pattern)));
        }

        Ok(Self {
            pattern: self.pattern,
            category,
        })
    }
}

/// Serializable form of the rule set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSetDefinition {
    pub rules: Vec<KeywordRule>,
    /// Phrases that introduce a minimum rating ("more than 8")
    pub rating_phrases: Vec<String>,
    /// Words ignored by the TF-IDF index and by title matching
    pub stop_words: Vec<String>,
    /// Example queries offered when nothing matches
    pub suggestions: Vec<String>,
}

fn genre(patterns: &[&str], genres: &[&str]) -> Vec<KeywordRule> {
    let category = RuleCategory::Genre {
        genres: genres.iter().map(|g| g.to_string()).collect(),
    };
    patterns
        .iter()
        .map(|p| KeywordRule::new(p, category.clone()))
        .collect()
}

fn mood(patterns: &[&str], moods: &[&str]) -> Vec<KeywordRule> {
    let category = RuleCategory::Mood {
        moods: moods.iter().map(|m| m.to_string()).collect(),
    };
    patterns
        .iter()
        .map(|p| KeywordRule::new(p, category.clone()))
        .collect()
}

fn expansion(patterns: &[&str], terms: &[&str]) -> Vec<KeywordRule> {
    let category = RuleCategory::Expansion {
        terms: terms.iter().map(|t| t.to_string()).collect(),
    };
    patterns
        .iter()
        .map(|p| KeywordRule::new(p, category.clone()))
        .collect()
}

fn intent(patterns: &[&str]) -> Vec<KeywordRule> {
    patterns
        .iter()
        .map(|p| KeywordRule::new(p, RuleCategory::Intent))
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleSetDefinition {
    fn default() -> Self {
        let rules = [
            genre(&["action", "accion"], &["action", "accion"]),
            genre(&["adventure", "aventura"], &["adventure", "aventura"]),
            genre(&["comedy", "comedia"], &["comedy", "comedia"]),
            genre(&["drama"], &["drama"]),
            genre(&["romance"], &["romance"]),
            genre(&["horror", "terror"], &["horror", "terror"]),
            genre(
                &["thriller", "suspense", "suspenso"],
                &["thriller", "suspense", "suspenso"],
            ),
            genre(
                &["sci-fi", "scifi", "science fiction", "ficcion", "ciencia ficcion"],
                &["sci-fi", "scifi", "science fiction", "ciencia ficcion"],
            ),
            genre(
                &["animation", "animated", "animacion"],
                &["animation", "animacion"],
            ),
            genre(&["family", "familiar"], &["family", "familiar"]),
            genre(&["musical"], &["musical", "music", "musica"]),
            genre(
                &["biography", "biopic", "biografia"],
                &["biography", "biografia"],
            ),
            genre(&["documentary", "documental"], &["documentary", "documental"]),
            genre(&["fantasy", "fantasia"], &["fantasy", "fantasia"]),
            genre(&["crime", "crimen"], &["crime", "crimen"]),
            genre(&["mystery", "misterio"], &["mystery", "misterio"]),
            genre(&["western"], &["western"]),
            mood(&["happy", "cheerful", "feliz", "alegre"], &["happy", "feliz", "alegre"]),
            mood(&["sad", "triste"], &["sad", "triste"]),
            mood(
                &["exciting", "thrilling", "emocionante"],
                &["exciting", "emocionante"],
            ),
            mood(&["dark", "oscuro", "oscura"], &["dark", "oscuro", "oscura"]),
            mood(
                &["romantic", "romantico", "romantica"],
                &["romantic", "romantico", "romantica"],
            ),
            mood(&["scary", "aterrador"], &["scary", "aterrador"]),
            mood(&["inspiring", "inspirador"], &["inspiring", "inspirador"]),
            mood(&["relaxing", "relajante"], &["relaxing", "relajante"]),
            expansion(
                &["funny", "hilarious", "laugh", "divertida", "divertido", "graciosa"],
                &["comedy", "comedia"],
            ),
            expansion(&["spooky", "miedo"], &["horror", "terror"]),
            expansion(&["space", "espacio"], &["scifi", "ciencia", "ficcion"]),
            expansion(&["love", "amor"], &["romance", "romantic"]),
            expansion(
                &["kids", "children", "ninos"],
                &["family", "animation", "familiar", "animacion"],
            ),
            expansion(&["explosions", "fights", "peleas"], &["action", "accion"]),
            intent(&[
                "movie", "movies", "film", "films", "show me", "recommend", "watch", "year",
                "director", "actor", "actress", "rating", "popular", "recent", "pelicula",
                "peliculas", "ver", "quiero", "muestrame", "ensename", "ano", "actriz",
                "puntaje", "recientes",
            ]),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self {
            rules,
            rating_phrases: strings(&[
                "greater than",
                "more than",
                "higher than",
                "at least",
                "above",
                "over",
                "rating of",
                "rated",
                "mayor a",
                "mayor que",
                "superior a",
                "mas de",
                "rating de",
                "calificacion de",
                "puntaje de",
            ]),
            stop_words: strings(&[
                "de", "la", "el", "y", "en", "un", "una", "los", "las", "del", "con", "por",
                "para", "que", "the", "an", "and", "of", "in", "on", "to", "for", "with",
                "from", "is", "it", "me", "about", "some", "that", "this",
            ]),
            suggestions: strings(&[
                "movies from 2010",
                "comedy movies",
                "movies rated more than 8",
                "películas de acción",
                "something funny and happy",
            ]),
        }
    }
}

/// Compiled, read-only rule set
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<KeywordRule>,
    patterns: Vec<String>,
    year: Regex,
    rating: Regex,
    stop_words: HashSet<String>,
    keyword_words: HashSet<String>,
    suggestions: Vec<String>,
}

impl RuleSet {
    /// Folds patterns and terms, then builds the year/rating matchers
    pub fn compile(definition: RuleSetDefinition) -> AppResult<Self> {
        if definition.rules.iter().any(|r| fold(&r.pattern).is_empty()) {
            return Err(AppError::Rules("rule with an empty pattern".to_string()));
        }

        let patterns: Vec<String> = definition.rules.iter().map(|r| fold(&r.pattern)).collect();

        let mut phrases: Vec<String> = definition
            .rating_phrases
            .iter()
            .map(|p| fold(p))
            .filter(|p| !p.is_empty())
            .collect();
        if phrases.is_empty() {
            return Err(AppError::Rules("no rating phrases defined".to_string()));
        }
        // longest first so "rating of" wins over a shorter overlapping phrase
        phrases.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternation = phrases
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let rating = Regex::new(&format!(r"\b(?:{})\s*(\d+(?:[.,]\d+)?)", alternation))?;
        let year = Regex::new(YEAR_PATTERN)?;

        let stop_words: HashSet<String> = definition.stop_words.iter().map(|w| fold(w)).collect();
        let keyword_words: HashSet<String> =
            patterns.iter().flat_map(|p| tokenize(p)).collect();

        let rules = definition
            .rules
            .into_iter()
            .map(KeywordRule::folded)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            rules,
            patterns,
            year,
            rating,
            stop_words,
            keyword_words,
            suggestions: definition.suggestions,
        })
    }

    /// The bilingual rule set shipped with the service
    pub fn builtin() -> AppResult<Self> {
        Self::compile(RuleSetDefinition::default())
    }

    /// Loads a rule set definition from a JSON file
    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let definition: RuleSetDefinition = serde_json::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            rules = definition.rules.len(),
            "Loaded keyword rules from file"
        );
        Self::compile(definition)
    }

    /// Rules whose pattern occurs in the query, in rule order
    pub fn matching<'a>(&'a self, query: &'a QueryText) -> impl Iterator<Item = &'a KeywordRule> + 'a {
        self.rules
            .iter()
            .zip(self.patterns.iter())
            .filter(move |(_, pattern)| contains_phrase(query.folded(), pattern))
            .map(|(rule, _)| rule)
    }

    /// Genre term lists of every matching genre keyword
    pub fn genre_matches<'a>(&'a self, query: &'a QueryText) -> Vec<&'a [String]> {
        self.matching(query)
            .filter_map(|rule| match &rule.category {
                RuleCategory::Genre { genres } => Some(genres.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Mood term lists of every matching mood keyword
    pub fn mood_matches<'a>(&'a self, query: &'a QueryText) -> Vec<&'a [String]> {
        self.matching(query)
            .filter_map(|rule| match &rule.category {
                RuleCategory::Mood { moods } => Some(moods.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn has_intent(&self, query: &QueryText) -> bool {
        self.matching(query)
            .any(|rule| rule.category == RuleCategory::Intent)
    }

    /// First year token in the query
    pub fn year(&self, query: &QueryText) -> Option<i32> {
        self.year
            .find(query.folded())
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Minimum rating requested by a comparison phrase
    pub fn rating_threshold(&self, query: &QueryText) -> Option<f64> {
        self.rating
            .captures(query.folded())
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().replace(',', ".").parse().ok())
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// True for any word that appears in a keyword pattern
    pub fn is_keyword_word(&self, word: &str) -> bool {
        self.keyword_words.contains(word)
    }

    pub fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
