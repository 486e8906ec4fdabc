use std::sync::OnceLock;

use regex::Regex;

use super::{clamp_score, count_words};

const MAX_WORDS_PER_SENTENCE: f64 = 25.0;
const MAX_WORDS_PER_PARAGRAPH: f64 = 150.0;

pub fn readability_score(content: &str) -> f64 {
    static RE_SENTENCE_END: OnceLock<Regex> = OnceLock::new();
    let re_sentence_end =
        RE_SENTENCE_END.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence regex"));

    if content.trim().is_empty() {
        return 0.0;
    }

    let words = count_words(content) as f64;
    let sentences = re_sentence_end
        .split(content)
        .filter(|s| !s.is_empty())
        .count() as f64;
    let paragraphs = content.split("\n\n").filter(|p| !p.is_empty()).count() as f64;
    if words == 0.0 || paragraphs == 0.0 {
        return 0.0;
    }

    let mut score = 100.0;
    // A text made only of terminators has no sentences; treat it as one endless one.
    if sentences == 0.0 || words / sentences > MAX_WORDS_PER_SENTENCE {
        score -= 10.0;
    }
    if words / paragraphs > MAX_WORDS_PER_PARAGRAPH {
        score -= 10.0;
    }
    clamp_score(score)
}
