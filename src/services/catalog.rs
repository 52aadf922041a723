use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

use crate::{
    models::{MovieRecord, RawMovie},
    services::text::{contains_phrase, fold, split_people, tokenize},
};

pub const DEFAULT_YEAR: i32 = 2000;
pub const DEFAULT_ACTORS: &str = "Unknown";
pub const DEFAULT_DIRECTOR: &str = "Unknown";
pub const DEFAULT_PLOT: &str = "No description available";
pub const DEFAULT_MOOD: &str = "varios";
pub const DEFAULT_RATING: f64 = 7.0;

/// Placeholder people that never count as a match
const PLACEHOLDERS: [&str; 3] = ["unknown", "desconocido", "n/a"];

/// Title words shorter than this are too generic to identify a movie
const MIN_TITLE_WORD_LEN: usize = 4;

/// Folded copies of the fields the precise filters compare against
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFields {
    pub title: String,
    pub genres: String,
    pub actors: Vec<String>,
    pub director: String,
    pub mood: String,
}

impl SearchFields {
    fn from_record(movie: &MovieRecord) -> Self {
        Self {
            title: fold(&movie.title),
            genres: fold(&movie.genres),
            actors: split_people(&movie.actors),
            director: fold(&movie.director),
            mood: fold(&movie.mood),
        }
    }
}

/// The immutable movie table plus vocabularies derived from it
///
/// Vocabularies keep catalog row order so "first match wins" is deterministic.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<MovieRecord>,
    fields: Vec<SearchFields>,
    actor_vocabulary: Vec<String>,
    director_vocabulary: Vec<String>,
}

impl Catalog {
    /// Normalizes provider rows, dropping those without title, genres or year
    pub fn from_raw(rows: Vec<RawMovie>) -> Self {
        let total = rows.len();
        let movies: Vec<MovieRecord> = rows.into_iter().filter_map(normalize_row).collect();

        if movies.len() < total {
            tracing::warn!(
                dropped = total - movies.len(),
                "Dropped catalog rows missing title, genres or year"
            );
        }

        Self::from_records(movies)
    }

    /// Builds a catalog from records that are already normalized
    pub fn from_records(mut movies: Vec<MovieRecord>) -> Self {
        for movie in &mut movies {
            movie.compose_features();
        }

        let fields: Vec<SearchFields> = movies.iter().map(SearchFields::from_record).collect();

        let mut seen = HashSet::new();
        let actor_vocabulary = fields
            .iter()
            .flat_map(|f| f.actors.iter())
            .filter(|name| is_real_person(name))
            .filter(|name| seen.insert(name.to_string()))
            .cloned()
            .collect();

        let mut seen = HashSet::new();
        let director_vocabulary = fields
            .iter()
            .map(|f| &f.director)
            .filter(|name| is_real_person(name))
            .filter(|name| seen.insert(name.to_string()))
            .cloned()
            .collect();

        Self {
            movies,
            fields,
            actor_vocabulary,
            director_vocabulary,
        }
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn movie(&self, index: usize) -> &MovieRecord {
        &self.movies[index]
    }

    pub fn fields(&self, index: usize) -> &SearchFields {
        &self.fields[index]
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Folded actor names in catalog order, without duplicates
    pub fn actor_vocabulary(&self) -> &[String] {
        &self.actor_vocabulary
    }

    /// Folded director names in catalog order, without duplicates
    pub fn director_vocabulary(&self) -> &[String] {
        &self.director_vocabulary
    }

    /// First actor of the vocabulary named in the query
    pub fn find_actor(&self, folded_query: &str) -> Option<&str> {
        self.actor_vocabulary
            .iter()
            .find(|name| name.chars().count() > 2 && contains_phrase(folded_query, name))
            .map(String::as_str)
    }

    /// First director of the vocabulary named in the query
    pub fn find_director(&self, folded_query: &str) -> Option<&str> {
        self.director_vocabulary
            .iter()
            .find(|name| contains_phrase(folded_query, name))
            .map(String::as_str)
    }

    /// Best single title referenced by the query
    ///
    /// Exact equality beats a contained title phrase, which beats a single
    /// significant title word. Within a tier the earliest catalog row wins.
    /// Titles shorter than four characters only match by equality.
    /// `is_common_word` rejects words that say nothing about a specific title.
    pub fn find_title(
        &self,
        folded_query: &str,
        is_common_word: impl Fn(&str) -> bool,
    ) -> Option<&str> {
        let titles = || self.fields.iter().map(|f| f.title.as_str()).filter(|t| !t.is_empty());

        if let Some(title) = titles().find(|title| *title == folded_query) {
            return Some(title);
        }

        if let Some(title) = titles().find(|title| {
            title.chars().count() >= MIN_TITLE_WORD_LEN && contains_phrase(folded_query, title)
        }) {
            return Some(title);
        }

        titles().find(|title| {
            tokenize(title).iter().any(|word| {
                word.chars().count() >= MIN_TITLE_WORD_LEN
                    && !word.chars().all(|c| c.is_ascii_digit())
                    && !is_common_word(word)
                    && contains_phrase(folded_query, word)
            })
        })
    }
}

fn is_real_person(name: &str) -> bool {
    !name.is_empty() && !PLACEHOLDERS.contains(&name)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_row(raw: RawMovie) -> Option<MovieRecord> {
    let title = non_blank(raw.title)?;
    let genres = non_blank(raw.genres)?;
    let year = non_blank(raw.year)?;

    Some(MovieRecord {
        title,
        genres,
        actors: non_blank(raw.actors).unwrap_or_else(|| DEFAULT_ACTORS.to_string()),
        director: non_blank(raw.director).unwrap_or_else(|| DEFAULT_DIRECTOR.to_string()),
        year: parse_year(&year),
        plot: non_blank(raw.plot).unwrap_or_else(|| DEFAULT_PLOT.to_string()),
        mood: non_blank(raw.mood).unwrap_or_else(|| DEFAULT_MOOD.to_string()),
        rating: raw.rating.as_deref().map_or(DEFAULT_RATING, parse_rating),
        features: String::new(),
    })
}

/// Coerces a year cell to a 4-digit year
///
/// Accepts "2010", "2010.0" and ISO dates; anything else becomes 2000.
pub fn parse_year(value: &str) -> i32 {
    let value = value.trim();

    let year = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.year())
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|y| y.is_finite() && y.fract() == 0.0)
                .map(|y| y as i32)
        });

    match year {
        Some(y) if (1000..=9999).contains(&y) => y,
        _ => DEFAULT_YEAR,
    }
}

/// Coerces a rating cell to a finite, non-negative number
pub fn parse_rating(value: &str) -> f64 {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r >= 0.0)
        .unwrap_or(DEFAULT_RATING)
}
