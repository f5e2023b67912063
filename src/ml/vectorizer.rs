use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Prefix for n-gram column names in the feature matrix
pub const NGRAM_COLUMN_PREFIX: &str = "hostname_ngram:";

/// Character n-gram count vectorizer for hostnames
///
/// Text is lowercased and runs of whitespace are collapsed to a single space
/// before n-grams are taken. The vocabulary is sorted and frozen at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgramVectorizer {
    min_n: usize,
    max_n: usize,
    vocabulary: BTreeMap<String, usize>,
}

impl NgramVectorizer {
    /// Fit a vocabulary over every n-gram that occurs in `documents`
    pub fn fit<'a, I>(documents: I, ngram_range: (usize, usize)) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (min_n, max_n) = ngram_range;
        let mut grams = BTreeSet::new();
        for doc in documents {
            grams.extend(char_ngrams(doc, min_n, max_n));
        }

        let vocabulary = grams
            .into_iter()
            .enumerate()
            .map(|(idx, gram)| (gram, idx))
            .collect();

        Self {
            min_n,
            max_n,
            vocabulary,
        }
    }

    /// Count vector for one document; n-grams outside the vocabulary are dropped
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut counts = vec![0.0; self.vocabulary.len()];
        for gram in char_ngrams(document, self.min_n, self.max_n) {
            if let Some(&idx) = self.vocabulary.get(&gram) {
                counts[idx] += 1.0;
            }
        }
        counts
    }

    /// Vocabulary in column order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    /// Feature column names in column order
    pub fn feature_names(&self) -> Vec<String> {
        self.vocabulary()
            .map(|gram| format!("{}{}", NGRAM_COLUMN_PREFIX, gram))
            .collect()
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        (self.min_n, self.max_n)
    }

    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }
}

fn normalize(text: &str) -> Vec<char> {
    let lowered = text.to_lowercase();
    let mut out = Vec::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// All character n-grams of length `min_n..=max_n`, in order of occurrence
fn char_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let chars = normalize(text);
    let mut grams = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > chars.len() {
            break;
        }
        grams.extend(chars.windows(n).map(|w| w.iter().collect::<String>()));
    }
    grams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_ngrams_lengths() {
        let grams = char_ngrams("Web1", 2, 4);
        assert_eq!(
            grams,
            vec!["we", "eb", "b1", "web", "eb1", "web1"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_short_text_yields_no_long_grams() {
        assert!(char_ngrams("a", 2, 4).is_empty());
        assert_eq!(char_ngrams("ab", 2, 4), vec!["ab".to_string()]);
    }

    #[test]
    fn test_vocabulary_is_sorted_and_counts_repeats() {
        let vectorizer = NgramVectorizer::fit(["abab"], (2, 2));
        let vocab: Vec<&str> = vectorizer.vocabulary().collect();
        assert_eq!(vocab, vec!["ab", "ba"]);
        assert_eq!(vectorizer.transform("abab"), vec![2.0, 1.0]);
    }

    #[test]
    fn test_unseen_ngrams_are_ignored() {
        let vectorizer = NgramVectorizer::fit(["web-01"], (2, 4));
        let counts = vectorizer.transform("zzzz");

        assert_eq!(counts.len(), vectorizer.vocab_size());
        assert!(counts.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_case_and_whitespace_are_normalized() {
        let vectorizer = NgramVectorizer::fit(["db  srv"], (2, 2));
        assert_eq!(vectorizer.transform("DB SRV"), vectorizer.transform("db  srv"));
        assert!(vectorizer.vocabulary().any(|g| g == "b "));
    }

    #[test]
    fn test_feature_names_are_prefixed() {
        let vectorizer = NgramVectorizer::fit(["ab"], (2, 4));
        assert_eq!(vectorizer.feature_names(), vec!["hostname_ngram:ab".to_string()]);
    }
}
