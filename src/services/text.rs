//! Text normalization shared by the classifier, the filters and the indexer
//!
//! Everything that compares user text against catalog text goes through `fold`
//! first so that "Acción", "ACCION" and "accion" are the same word.

/// Lower-cases and strips the diacritics found in Spanish and English catalogs
pub fn fold(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns true when `needle` occurs in `haystack` delimited by word boundaries
///
/// Both arguments are expected to be folded already.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}

/// Splits text into word tokens of at least two characters
///
/// Equivalent to the `\b\w\w+\b` token pattern of classic TF-IDF vectorizers.
pub fn tokenize(folded: &str) -> Vec<String> {
    folded
        .split(|c: char| !is_word_char(c))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Splits a multi-person field ("A, B and C", "A y B") into folded names
pub fn split_people(field: &str) -> Vec<String> {
    let folded = fold(field);
    folded
        .replace(" and ", ",")
        .replace(" y ", ",")
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// A user query kept in both its original and folded form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryText {
    raw: String,
    folded: String,
}

impl QueryText {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            folded: fold(raw),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn is_blank(&self) -> bool {
        self.folded.is_empty()
    }
}
