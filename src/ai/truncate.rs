use std::sync::OnceLock;

use regex::Regex;

/// Default character budget for text sent to the model.
pub const DEFAULT_MAX_CHARS: usize = 8000;

/// Appended whenever text had to be shortened.
pub const TRUNCATION_NOTICE: &str = "\n\n[Text truncated to fit the processing limit.]";

fn sentence_regex() -> &'static Regex {
    static SENTENCE: OnceLock<Regex> = OnceLock::new();
    SENTENCE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid sentence regex"))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Bound `text` to roughly `max_chars` characters, cutting at the last whole
/// sentence that fits, else the last whole word, else mid-token.
///
/// Text already within budget comes back unchanged. Anything shortened ends with
/// [`TRUNCATION_NOTICE`], so the result never exceeds `max_chars` plus the notice.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }

    let kept = fit_sentences(text, max_chars)
        .or_else(|| fit_words(text, max_chars))
        .unwrap_or_else(|| text.chars().take(max_chars).collect());

    tracing::debug!(
        original = char_len(text),
        kept = char_len(&kept),
        "truncated input text"
    );

    format!("{}{}", kept, TRUNCATION_NOTICE)
}

fn fit_sentences(text: &str, max_chars: usize) -> Option<String> {
    let mut kept = String::new();
    let mut used = 0;

    for sentence in sentence_regex().find_iter(text) {
        let len = char_len(sentence.as_str());
        if used + len > max_chars {
            break;
        }
        kept.push_str(sentence.as_str());
        used += len;
    }

    let kept = kept.trim();
    (!kept.is_empty()).then(|| kept.to_string())
}

fn fit_words(text: &str, max_chars: usize) -> Option<String> {
    let mut kept = String::new();
    let mut used = 0;

    for word in text.split_whitespace() {
        let sep = usize::from(!kept.is_empty());
        let len = char_len(word);
        if used + sep + len > max_chars {
            break;
        }
        if sep == 1 {
            kept.push(' ');
        }
        kept.push_str(word);
        used += sep + len;
    }

    (!kept.is_empty()).then_some(kept)
}
