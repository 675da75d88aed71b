//! Quality gate for candidate phrases
//!
//! Every phrase has to pass the gate before it may enter the schedule, so
//! that speaker tags, English scaffolding and syllable breakdowns from
//! generated stories never pollute the review queue.
//!
//! Two modes are available:
//! - `Strict`: all heuristics below
//! - `Permissive`: only the explicit denylist (deterministic tests)

mod language;
mod lexicon;

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use language::{LanguagePolicy, TagalogHeuristic};
pub use lexicon::DEFAULT_DENYLIST;

/// Which checks the gate runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateMode {
    #[default]
    Strict,
    Permissive,
}

/// Reason a phrase was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Denylisted,
    TooShort,
    TechnicalMarker,
    ForeignStopword,
    MostlyForeign,
    Repetition,
    Fragment,
    NotTargetLanguage,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Denylisted => "on the denylist",
            Self::TooShort => "too short",
            Self::TechnicalMarker => "contains a speaker tag or formatting marker",
            Self::ForeignStopword => "single source-language stopword",
            Self::MostlyForeign => "mostly source-language stopwords",
            Self::Repetition => "repeated tokens",
            Self::Fragment => "fragment or syllable breakdown",
            Self::NotTargetLanguage => "no target-language word",
        };
        f.write_str(reason)
    }
}

/// Lowercase, trim, strip sentence punctuation and collapse whitespace.
///
/// The result is the identity key of a phrase in the schedule, and the same
/// key usage validation compares on. Filipino letters (ñ, accented vowels),
/// hyphens and apostrophes are kept.
pub fn normalize_phrase(raw: &str) -> String {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    let punctuation = PUNCTUATION
        .get_or_init(|| Regex::new(r#"[.,!?;:"()\[\]{}]"#).expect("punctuation pattern is valid"));

    let folded = fold_whitespace(raw);
    let stripped = punctuation.replace_all(&folded, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, trim and collapse internal whitespace, keeping punctuation
fn fold_whitespace(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn marker_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"[\[\]]",
            r"\b(tagalog|english)-(female|male)",
            r"\bnarrator\b",
            r"\b(voice|audio|tts|system|pause|break):",
            r"\*\*|\{\{|\}\}|\.\.\.|--",
            r"\b(natural|slow) speed\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("marker pattern is valid"))
        .collect()
    })
}

fn fragment_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // single lowercase letter
            r"^[a-z]$",
            // dangling affix: "mag-", "-han"
            r"[a-z]-$",
            r"^-[a-z]",
            // two-syllable breakdown: "ka ba"
            r"^[a-z]{1,2} [a-z]{1,2}$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("fragment pattern is valid"))
        .collect()
    })
}

/// Strip surrounding punctuation from a token for word-list lookups
fn bare_word(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
}

pub struct QualityGate {
    mode: GateMode,
    denylist: HashSet<String>,
    policy: Box<dyn LanguagePolicy>,
}

impl QualityGate {
    pub fn new(mode: GateMode) -> Self {
        Self {
            mode,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            policy: Box::new(TagalogHeuristic::new()),
        }
    }

    pub fn strict() -> Self {
        Self::new(GateMode::Strict)
    }

    /// Only the denylist is enforced. Must be chosen explicitly.
    pub fn permissive() -> Self {
        Self::new(GateMode::Permissive)
    }

    /// Add known-bad phrases on top of the default denylist
    pub fn with_denylist<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.denylist
            .extend(phrases.into_iter().map(|p| normalize_phrase(p.as_ref())));
        self
    }

    /// Swap the language recognition policy
    pub fn with_policy(mut self, policy: Box<dyn LanguagePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    pub fn accept(&self, raw: &str) -> bool {
        self.evaluate(raw).is_ok()
    }

    /// Run the gate, returning the normalized phrase on success
    pub fn evaluate(&self, raw: &str) -> Result<String, Rejection> {
        let text = normalize_phrase(raw);

        if self.denylist.contains(&text) {
            return Err(Rejection::Denylisted);
        }
        if self.mode == GateMode::Permissive {
            return Ok(text);
        }

        if text.chars().count() <= 1 {
            return Err(Rejection::TooShort);
        }
        // brackets and ellipses are gone from the key, so look at the input
        let folded = fold_whitespace(raw);
        if marker_patterns().iter().any(|re| re.is_match(&folded)) {
            return Err(Rejection::TechnicalMarker);
        }

        let words: Vec<&str> = text
            .split(' ')
            .map(bare_word)
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Err(Rejection::TooShort);
        }

        let stopwords = words
            .iter()
            .filter(|w| self.policy.is_foreign_stopword(w))
            .count();
        if words.len() == 1 && stopwords == 1 {
            return Err(Rejection::ForeignStopword);
        }
        if stopwords * 2 > words.len() {
            return Err(Rejection::MostlyForeign);
        }

        if words.len() > 1 {
            let unique: HashSet<&str> = words.iter().copied().collect();
            // "po po", and short syllable drills like "po na po"
            let drill = words.len() <= 3
                && unique.len() < words.len()
                && words.iter().all(|w| w.chars().count() <= 3);
            if unique.len() == 1 || drill {
                return Err(Rejection::Repetition);
            }
        }

        if raw.trim().contains('\n') || fragment_patterns().iter().any(|re| re.is_match(&text)) {
            return Err(Rejection::Fragment);
        }

        if !words.iter().any(|w| self.policy.is_target_word(w)) {
            return Err(Rejection::NotTargetLanguage);
        }

        Ok(text)
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::strict()
    }
}

impl fmt::Debug for QualityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualityGate")
            .field("mode", &self.mode)
            .field("denylist", &self.denylist.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_junk() {
        let gate = QualityGate::strict();

        assert_eq!(gate.evaluate(""), Err(Rejection::TooShort));
        assert_eq!(gate.evaluate("a"), Err(Rejection::TooShort));
        assert_eq!(
            gate.evaluate("[TAGALOG-FEMALE-1]: hello"),
            Err(Rejection::TechnicalMarker)
        );
        assert_eq!(gate.evaluate("tagalog-female-1"), Err(Rejection::TechnicalMarker));
        assert_eq!(gate.evaluate("[narrator"), Err(Rejection::TechnicalMarker));
        assert_eq!(gate.evaluate("the and of"), Err(Rejection::MostlyForeign));
        assert_eq!(gate.evaluate("next time"), Err(Rejection::MostlyForeign));
        assert_eq!(gate.evaluate("the"), Err(Rejection::ForeignStopword));
        assert_eq!(gate.evaluate("po na po"), Err(Rejection::Repetition));
        assert_eq!(gate.evaluate("salamat salamat"), Err(Rejection::Repetition));
        assert_eq!(gate.evaluate("mag-"), Err(Rejection::Fragment));
        assert_eq!(gate.evaluate("ka ba"), Err(Rejection::Fragment));
        assert_eq!(gate.evaluate("ito po\npo\nito"), Err(Rejection::Fragment));
        assert_eq!(gate.evaluate("flight"), Err(Rejection::NotTargetLanguage));
        assert_eq!(gate.evaluate("bring menus"), Err(Rejection::NotTargetLanguage));
        assert_eq!(gate.evaluate("the waiter"), Err(Rejection::Denylisted));
    }

    #[test]
    fn test_accepts_tagalog_phrases() {
        let gate = QualityGate::strict();

        for phrase in [
            "salamat po sa inyo",
            "pwede po ba",
            "magkano po ito",
            "ano pong oras",
            "kailangan po namin",
            "paumanhin po",
        ] {
            assert!(gate.accept(phrase), "expected '{}' to pass", phrase);
        }
    }

    #[test]
    fn test_evaluate_normalizes() {
        let gate = QualityGate::strict();
        assert_eq!(
            gate.evaluate("  Salamat   PO sa inyo "),
            Ok("salamat po sa inyo".to_string())
        );
    }

    #[test]
    fn test_trailing_line_break_is_trimmed() {
        let gate = QualityGate::strict();

        assert_eq!(
            gate.evaluate("salamat po sa inyo\n"),
            Ok("salamat po sa inyo".to_string())
        );
        assert_eq!(
            gate.evaluate("salamat po sa inyo\r\n"),
            Ok("salamat po sa inyo".to_string())
        );
        assert_eq!(gate.evaluate("\nsalamat po\nsa inyo"), Err(Rejection::Fragment));
    }

    #[test]
    fn test_repeated_longer_word_is_not_a_drill() {
        let gate = QualityGate::strict();

        assert_eq!(gate.evaluate("kami po kami"), Ok("kami po kami".to_string()));
        assert_eq!(gate.evaluate("po na po"), Err(Rejection::Repetition));
        assert_eq!(gate.evaluate("ba ba ba"), Err(Rejection::Repetition));
    }

    #[test]
    fn test_punctuation_is_not_part_of_the_key() {
        let gate = QualityGate::strict();

        assert_eq!(normalize_phrase("Pwede po ba?"), "pwede po ba");
        assert_eq!(normalize_phrase("  \"Salamat,  po!\" "), "salamat po");
        assert_eq!(normalize_phrase("mag-ingat ka'y"), "mag-ingat ka'y");
        assert_eq!(gate.evaluate("Pwede po ba?"), gate.evaluate("pwede po ba"));
        assert_eq!(gate.evaluate("[narrator]"), Err(Rejection::TechnicalMarker));
        assert_eq!(gate.evaluate("salamat po..."), Err(Rejection::TechnicalMarker));
    }

    #[test]
    fn test_permissive_only_enforces_denylist() {
        let gate = QualityGate::permissive().with_denylist(["Bad Phrase"]);

        assert_eq!(gate.mode(), GateMode::Permissive);
        assert!(gate.accept("the and of"));
        assert!(gate.accept("po na po"));
        assert_eq!(gate.evaluate("bad phrase"), Err(Rejection::Denylisted));
    }

    struct EverythingForeign;

    impl LanguagePolicy for EverythingForeign {
        fn is_target_word(&self, _word: &str) -> bool {
            false
        }

        fn is_foreign_stopword(&self, _word: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_policy_is_swappable() {
        let gate = QualityGate::strict().with_policy(Box::new(EverythingForeign));
        assert_eq!(
            gate.evaluate("salamat po sa inyo"),
            Err(Rejection::NotTargetLanguage)
        );
    }
}
