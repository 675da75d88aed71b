//! Word lists used by the quality gate

/// Tagalog function words, pronouns, particles and very common words.
/// A phrase containing one of these is recognisably Tagalog.
pub const TAGALOG_WORDS: &[&str] = &[
    // particles and markers
    "po", "opo", "ho", "oho", "pong", "na", "pa", "ng", "nang", "sa", "si", "ni", "kay", "ang",
    "mga", "ay", "at", "ba", "lang", "lamang", "din", "rin", "daw", "raw", "naman", "nga",
    "pala", "kasi", "pero", "kung", "kapag", "dahil", "talaga", "sige", "hindi", "oo", "huwag",
    // pronouns and demonstratives
    "ako", "ka", "ko", "mo", "ikaw", "siya", "kami", "tayo", "sila", "kayo", "namin", "natin",
    "nila", "ninyo", "nyo", "inyo", "akin", "iyo", "kanya", "amin", "atin", "kanila", "ito",
    "iyan", "iyon", "yan", "yon", "dito", "diyan", "doon", "nito", "niyan", "niyon",
    // question words
    "ano", "anong", "sino", "saan", "kailan", "bakit", "paano", "magkano", "ilan", "alin",
    // common vocabulary
    "wala", "may", "mayroon", "meron", "pwede", "puwede", "gusto", "ayaw", "kailangan",
    "salamat", "kumusta", "kamusta", "paalam", "paumanhin", "maganda", "magandang", "umaga",
    "hapon", "gabi", "tanghali", "tubig", "oras", "araw", "isa", "dalawa", "tatlo", "apat",
    "lima", "malapit", "malayo", "kaliwa", "kanan", "bayad", "sukli", "kwarto", "bawal",
    "masarap", "sarap", "ganda", "balik",
];

/// Common English words. Phrases dominated by these are source-language
/// scaffolding rather than target-language collocations.
///
/// Words that are also Tagalog ("at", "may", "to") are deliberately absent.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "and", "of", "a", "an", "in", "on", "is", "are", "was", "were", "be", "been",
    "it", "its", "this", "that", "these", "those", "you", "your", "he", "she", "him", "her",
    "his", "they", "them", "their", "we", "our", "i", "me", "my", "for", "with", "from", "by",
    "as", "or", "but", "not", "do", "does", "did", "have", "has", "had", "will", "would",
    "can", "could", "should", "what", "which", "who", "where", "when", "how", "why", "there",
    "here", "just", "some", "all", "any", "more", "very", "so", "if", "then", "than", "about",
    "into", "out", "up", "down", "over", "again", "next", "time", "please", "thank", "thanks",
    "yes", "okay", "ok", "hello", "hi",
];

/// Known-bad phrases observed in generated stories: English filler around
/// Tagalog dialogue that must never be scheduled.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "the menu",
    "the food",
    "the bill",
    "the waiter",
    "their meal",
    "their food",
    "their hotel",
    "another couple",
    "many tourists",
    "lunch crowd",
    "perfect choice",
    "nice table",
    "best restaurant",
    "popular restaurant",
    "limestone cliffs",
    "raw fish",
    "super delicious",
    "just water",
    "what drinks",
    "what time",
    "other drinks",
    "last meal",
    "rush order",
];

/// Tagalog affixes used by the orthographic heuristic
pub const TAGALOG_PREFIXES: &[&str] = &[
    "nakaka", "pinag", "maka", "naka", "paki", "mang", "nang", "pang", "mag", "nag", "pag",
    "ipa", "ika", "ma", "na", "pa", "ka",
];

pub const TAGALOG_SUFFIXES: &[&str] = &["han", "hin", "an", "in", "ng"];

/// Letters of the native Tagalog alphabet (abakada)
pub const NATIVE_LETTERS: &str = "abdeghiklmnoprstuwy";
