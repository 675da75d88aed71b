//! Language recognition policy used by the quality gate
//!
//! The gate only asks two questions about a word: is it recognisably in the
//! target language, and is it a common source-language stopword. Anything
//! answering those can be plugged in, from these word lists up to a real
//! classifier.

use std::collections::HashSet;

use super::lexicon::{
    ENGLISH_STOPWORDS, NATIVE_LETTERS, TAGALOG_PREFIXES, TAGALOG_SUFFIXES, TAGALOG_WORDS,
};

pub trait LanguagePolicy: Send + Sync {
    /// Whether a single lowercase word belongs to the target language
    fn is_target_word(&self, word: &str) -> bool;

    /// Whether a single lowercase word is a common wrong-language stopword
    fn is_foreign_stopword(&self, word: &str) -> bool;
}

/// Tagalog recognition from a curated word list plus an orthographic
/// heuristic for words the list does not cover
pub struct TagalogHeuristic {
    known_words: HashSet<&'static str>,
    stopwords: HashSet<&'static str>,
}

impl TagalogHeuristic {
    pub fn new() -> Self {
        Self {
            known_words: TAGALOG_WORDS.iter().copied().collect(),
            stopwords: ENGLISH_STOPWORDS.iter().copied().collect(),
        }
    }

    /// Orthographic check for words not on the curated list.
    ///
    /// Accepts words written entirely in the native alphabet, without initial
    /// consonant clusters, doubled consonants or runs of three consonants
    /// (`ng` counts as one), that also carry a typical affix, an `um`/`in`
    /// infix or a reduplicated first syllable.
    pub fn looks_tagalog(word: &str) -> bool {
        let word = word.trim_matches('-');
        if word.chars().count() < 3 {
            return false;
        }
        if !word.chars().all(|c| c == '-' || NATIVE_LETTERS.contains(c)) {
            return false;
        }

        // ng is a single letter in the native alphabet
        let letters: Vec<char> = word.replace("ng", "N").replace('-', "").chars().collect();
        let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u');

        if letters.len() >= 2 && !is_vowel(letters[0]) && !is_vowel(letters[1]) {
            return false;
        }

        let mut run = 0;
        for (i, &c) in letters.iter().enumerate() {
            if is_vowel(c) {
                run = 0;
                continue;
            }
            run += 1;
            if run >= 3 {
                return false;
            }
            if i > 0 && letters[i - 1] == c {
                return false;
            }
        }

        let vowels = letters.iter().filter(|&&c| is_vowel(c)).count();
        if vowels * 100 < letters.len() * 35 {
            return false;
        }

        let plain = word.replace('-', "");
        let has_prefix = TAGALOG_PREFIXES
            .iter()
            .any(|p| plain.len() > p.len() + 1 && plain.starts_with(p));
        let has_suffix = TAGALOG_SUFFIXES
            .iter()
            .any(|s| plain.len() > s.len() + 1 && plain.ends_with(s));
        let has_infix = plain.len() > 4 && (plain[1..].starts_with("um") || plain[1..].starts_with("in"));
        let reduplicated = plain.len() >= 4 && plain[..2] == plain[2..4];

        has_prefix || has_suffix || has_infix || reduplicated
    }
}

impl Default for TagalogHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguagePolicy for TagalogHeuristic {
    fn is_target_word(&self, word: &str) -> bool {
        self.known_words.contains(word) || Self::looks_tagalog(word)
    }

    fn is_foreign_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_words() {
        let policy = TagalogHeuristic::new();
        assert!(policy.is_target_word("po"));
        assert!(policy.is_target_word("salamat"));
        assert!(!policy.is_target_word("flight"));
        assert!(policy.is_foreign_stopword("the"));
        assert!(!policy.is_foreign_stopword("at"));
    }

    #[test]
    fn test_orthographic_heuristic() {
        // affixed forms not on the word list
        assert!(TagalogHeuristic::looks_tagalog("magluto"));
        assert!(TagalogHeuristic::looks_tagalog("kumain"));
        assert!(TagalogHeuristic::looks_tagalog("kakain"));
        assert!(TagalogHeuristic::looks_tagalog("bilihin"));

        // English orthography
        assert!(!TagalogHeuristic::looks_tagalog("flight"));
        assert!(!TagalogHeuristic::looks_tagalog("bring"));
        assert!(!TagalogHeuristic::looks_tagalog("hello"));
        assert!(!TagalogHeuristic::looks_tagalog("street"));
        assert!(!TagalogHeuristic::looks_tagalog("menus"));
    }
}
