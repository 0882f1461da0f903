//! Sentence splitting
//!
//! A small rule-based splitter: a sentence ends at a run of `.`, `!` or `?`
//! (optionally followed by closing quotes/brackets) that is followed by
//! whitespace. Terminal punctuation stays with its sentence. A lone period
//! after a common abbreviation does not end a sentence.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["')\]]*\s+"#).expect("valid regex"));

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "e.g", "i.e", "etc",
];

/// The word immediately before byte offset `end`
fn preceding_word(text: &str, end: usize) -> &str {
    let head = &text[..end];
    match head.rfind(char::is_whitespace) {
        Some(pos) => head[pos..].trim_start(),
        None => head,
    }
}

fn is_abbreviation(word: &str) -> bool {
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Split text into sentences for sentence-at-a-time speech
pub fn tokenize_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        let terminator = m.as_str().trim_end();
        if terminator == "." && is_abbreviation(preceding_word(text, m.start())) {
            continue;
        }

        let end = m.start() + terminator.len();
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = m.end();
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sentences() {
        assert_eq!(tokenize_sentences("Hi. Bye!"), vec!["Hi.", "Bye!"]);
    }

    #[test]
    fn test_empty() {
        assert!(tokenize_sentences("").is_empty());
        assert!(tokenize_sentences("   \n ").is_empty());
    }

    #[test]
    fn test_no_terminator() {
        assert_eq!(tokenize_sentences("just some words"), vec!["just some words"]);
    }

    #[test]
    fn test_mixed_terminators() {
        assert_eq!(
            tokenize_sentences("Really?! Yes... Fine.\nNext line"),
            vec!["Really?!", "Yes...", "Fine.", "Next line"]
        );
    }

    #[test]
    fn test_closing_quote_stays() {
        assert_eq!(
            tokenize_sentences("She said \"go.\" Then left."),
            vec!["She said \"go.\"", "Then left."]
        );
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(
            tokenize_sentences("Dr. Smith arrived. He sat down."),
            vec!["Dr. Smith arrived.", "He sat down."]
        );
        assert_eq!(
            tokenize_sentences("Bring fruit, e.g. apples. Thanks."),
            vec!["Bring fruit, e.g. apples.", "Thanks."]
        );
    }

    #[test]
    fn test_decimal_not_split() {
        assert_eq!(tokenize_sentences("Pi is 3.14 roughly."), vec!["Pi is 3.14 roughly."]);
    }
}
