use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

const WORDS_PER_LINK: usize = 200;
const MIN_WORDS_FOR_LINK_ADVICE: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalLinks {
    pub count: usize,
    pub suggestions: Vec<String>,
    /// Links per 100 words.
    pub density: f64,
    pub recommended_min_links: usize,
}

/// Markdown links whose target does not start with `http`. Image embeds
/// are not links.
pub(crate) fn count_internal_links(content: &str) -> usize {
    static RE_LINK: OnceLock<Regex> = OnceLock::new();
    let re_link = RE_LINK
        .get_or_init(|| Regex::new(r"(!?)\[([^\]]+)\]\(([^)]+)\)").expect("link regex"));

    re_link
        .captures_iter(content)
        .filter(|cap| cap.get(1).is_none_or(|bang| bang.as_str().is_empty()))
        .filter(|cap| {
            cap.get(3)
                .is_some_and(|target| !target.as_str().starts_with("http"))
        })
        .count()
}

pub(crate) fn analyze_internal_links(content: &str, word_count: usize) -> InternalLinks {
    let count = count_internal_links(content);
    let density = if word_count > 0 {
        count as f64 / word_count as f64 * 100.0
    } else {
        0.0
    };

    let mut suggestions = Vec::new();
    let recommended_min_links = if word_count < MIN_WORDS_FOR_LINK_ADVICE {
        suggestions.push("Add more content before focusing on internal linking".to_owned());
        0
    } else {
        let recommended = word_count / WORDS_PER_LINK;
        if count < recommended {
            suggestions.push(format!(
                "Consider adding more internal links - recommended minimum is {recommended} for content of this length"
            ));
        }
        if count == 0 {
            suggestions.push("Add internal links to improve content connectivity and SEO".to_owned());
        }
        recommended
    };

    InternalLinks {
        count,
        suggestions,
        density,
        recommended_min_links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_relative_targets() {
        let content = "[a](/posts/a) [b](https://example.com) [c](../c.md) [d](http://x)";
        assert_eq!(count_internal_links(content), 2);
    }

    #[test]
    fn image_embeds_are_not_links() {
        assert_eq!(count_internal_links("![logo](/logo.png) [home](/)"), 1);
    }

    #[test]
    fn short_content_gets_content_advice_only() {
        let links = analyze_internal_links("", 50);
        assert_eq!(
            links.suggestions,
            vec!["Add more content before focusing on internal linking"]
        );
        assert_eq!(links.recommended_min_links, 0);
    }

    #[test]
    fn enough_links_produce_no_suggestions() {
        let links = analyze_internal_links("[a](/a) [b](/b)", 400);
        assert!(links.suggestions.is_empty());
        assert_eq!(links.count, 2);
        assert!((links.density - 0.5).abs() < 1e-9);
    }

    #[test]
    fn one_link_below_minimum_skips_the_zero_link_hint() {
        let links = analyze_internal_links("[a](/a)", 600);
        assert_eq!(links.recommended_min_links, 3);
        assert_eq!(links.suggestions.len(), 1);
    }
}
