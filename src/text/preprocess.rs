//! Text cleanup before handing text to the speech engine
//!
//! Everything here is a fixed sequence of regex substitutions. Patterns are
//! compiled once and shared.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+|www\S+").expect("valid regex"));

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").expect("valid regex"));

/// Whitespace before punctuation: "word ," -> "word,"
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([?.!,;:])").expect("valid regex"));

/// Exactly one space after punctuation: "a,b" -> "a, b"
static SPACE_AFTER_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?.!,;:])\s*").expect("valid regex"));

/// Anything that isn't a letter, digit, whitespace or speech-relevant punctuation
static SPECIAL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^a-zA-Z0-9\s.,?!;:'"\-]"#).expect("valid regex"));

/// Apostrophe-less contractions and their expansions
const CONTRACTIONS: &[(&str, &str)] = &[
    ("dont", "do not"),
    ("wont", "will not"),
    ("cant", "cannot"),
    ("shouldnt", "should not"),
    ("wouldnt", "would not"),
    ("hasnt", "has not"),
    ("havent", "have not"),
    ("isnt", "is not"),
    ("arent", "are not"),
    ("wasnt", "was not"),
    ("werent", "were not"),
];

static CONTRACTION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    CONTRACTIONS
        .iter()
        .map(|(word, expansion)| {
            let pattern = format!(r"(?i)\b{}\b", word);
            (Regex::new(&pattern).expect("valid regex"), *expansion)
        })
        .collect()
});

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Prepare text for speech
///
/// Collapses whitespace, strips URLs and e-mail addresses, normalizes
/// spacing around punctuation, drops characters the engine would read out
/// literally and expands apostrophe-less contractions ("dont" -> "do not").
pub fn preprocess_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut text = collapse_whitespace(text);

    // URLs go first so punctuation spacing can't split them
    text = URL.replace_all(&text, "").into_owned();
    text = EMAIL.replace_all(&text, "").into_owned();

    text = SPACE_BEFORE_PUNCT.replace_all(&text, "${1}").into_owned();
    text = SPACE_AFTER_PUNCT.replace_all(&text, "${1} ").into_owned();
    text = SPECIAL_CHARS.replace_all(&text, "").into_owned();
    text = collapse_whitespace(&text);

    for (pattern, expansion) in CONTRACTION_PATTERNS.iter() {
        text = pattern.replace_all(&text, *expansion).into_owned();
    }

    debug!("Preprocessed text to {} chars", text.len());
    text
}

/// Light cleanup: collapse whitespace and drop URLs, nothing else
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = collapse_whitespace(text);
    let text = URL.replace_all(&text, "");
    collapse_whitespace(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(preprocess_text("  hello   world  "), "hello world");
        assert_eq!(preprocess_text("line one\n\n\tline two"), "line one line two");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(preprocess_text(""), "");
        assert_eq!(preprocess_text("   "), "");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_removes_urls() {
        assert_eq!(preprocess_text("visit http://x.com now"), "visit now");
        assert_eq!(preprocess_text("see https://example.org/a?b=c please"), "see please");
        assert_eq!(preprocess_text("go to www.rust-lang.org today"), "go to today");
    }

    #[test]
    fn test_removes_email() {
        assert_eq!(preprocess_text("mail me@example.com soon"), "mail soon");
    }

    #[test]
    fn test_punctuation_spacing() {
        assert_eq!(preprocess_text("Hello , world !"), "Hello, world!");
        assert_eq!(preprocess_text("one,two;three"), "one, two; three");
    }

    #[test]
    fn test_strips_special_characters() {
        assert_eq!(preprocess_text("cost #5 & tax*"), "cost 5 tax");
        assert_eq!(preprocess_text("it's \"quoted\""), "it's \"quoted\"");
    }

    #[test]
    fn test_expands_contractions() {
        assert_eq!(preprocess_text("I dont know"), "I do not know");
        assert_eq!(preprocess_text("Cant stop, wont stop"), "cannot stop, will not stop");
        // Only whole words
        assert_eq!(preprocess_text("dontcha"), "dontcha");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  a   b  "), "a b");
        assert_eq!(clean_text("read www.example.com later"), "read later");
        // Punctuation and symbols are left alone
        assert_eq!(clean_text("cost #5 & tax"), "cost #5 & tax");
    }
}
