use std::ops::RangeInclusive;

use serde::Serialize;

use super::{Recommendation, clamp_score, contains_ignore_case};
use crate::formats::MetaTags;

const TITLE_CHARS: RangeInclusive<usize> = 30..=60;
const DESCRIPTION_CHARS: RangeInclusive<usize> = 120..=160;
const MAX_META_KEYWORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthIssue {
    pub tag: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaTagAnalysis {
    pub score: f64,
    pub recommendations: Vec<Recommendation>,
    pub missing_tags: Vec<String>,
    pub length_issues: Vec<LengthIssue>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Scores meta tags independently of the body. Starts at 100 and deducts per
/// missing or weak tag.
pub fn analyze_meta_tags(tags: Option<&MetaTags>, keyword: &str) -> MetaTagAnalysis {
    let default_tags = MetaTags::default();
    let tags = tags.unwrap_or(&default_tags);

    let mut analysis = MetaTagAnalysis {
        score: 100.0,
        recommendations: Vec::new(),
        missing_tags: Vec::new(),
        length_issues: Vec::new(),
    };

    match present(&tags.title) {
        None => {
            analysis.missing_tags.push("title".to_owned());
            analysis.score -= 20.0;
            analysis
                .recommendations
                .push(Recommendation::error("Meta title is missing"));
        }
        Some(title) => {
            let len = title.chars().count();
            if !TITLE_CHARS.contains(&len) {
                analysis.length_issues.push(LengthIssue {
                    tag: "title".to_owned(),
                    message: format!(
                        "Title length ({len}) should be between {}-{} characters",
                        TITLE_CHARS.start(),
                        TITLE_CHARS.end()
                    ),
                });
                analysis.score -= 10.0;
            }
            if !contains_ignore_case(title, keyword) {
                analysis.recommendations.push(Recommendation::warning(
                    "Target keyword not found in meta title",
                ));
                analysis.score -= 5.0;
            }
        }
    }

    match present(&tags.description) {
        None => {
            analysis.missing_tags.push("description".to_owned());
            analysis.score -= 15.0;
            analysis
                .recommendations
                .push(Recommendation::error("Meta description is missing"));
        }
        Some(description) => {
            let len = description.chars().count();
            if !DESCRIPTION_CHARS.contains(&len) {
                analysis.length_issues.push(LengthIssue {
                    tag: "description".to_owned(),
                    message: format!(
                        "Description length ({len}) should be between {}-{} characters",
                        DESCRIPTION_CHARS.start(),
                        DESCRIPTION_CHARS.end()
                    ),
                });
                analysis.score -= 10.0;
            }
            if !contains_ignore_case(description, keyword) {
                analysis.recommendations.push(Recommendation::warning(
                    "Target keyword not found in meta description",
                ));
                analysis.score -= 5.0;
            }
        }
    }

    let open_graph = [&tags.og_title, &tags.og_description, &tags.og_image];
    if open_graph.iter().any(|tag| present(tag).is_none()) {
        analysis.missing_tags.push("Open Graph tags".to_owned());
        analysis.score -= 10.0;
        analysis.recommendations.push(Recommendation::warning(
            "Missing Open Graph tags for social media sharing",
        ));
    }

    let twitter = [
        &tags.twitter_card,
        &tags.twitter_title,
        &tags.twitter_description,
        &tags.twitter_image,
    ];
    if twitter.iter().any(|tag| present(tag).is_none()) {
        analysis.missing_tags.push("Twitter Card tags".to_owned());
        analysis.score -= 10.0;
        analysis.recommendations.push(Recommendation::warning(
            "Missing Twitter Card tags for social media sharing",
        ));
    }

    if let Some(keywords) = tags.keywords.as_deref().filter(|k| !k.is_empty()) {
        let wanted = keyword.trim().to_lowercase();
        if !keywords.iter().any(|k| k.trim().to_lowercase() == wanted) {
            analysis.recommendations.push(Recommendation::warning(
                "Target keyword not included in meta keywords",
            ));
        }
        if keywords.len() > MAX_META_KEYWORDS {
            analysis.recommendations.push(Recommendation::warning(format!(
                "Too many meta keywords (recommended: max {MAX_META_KEYWORDS})"
            )));
            analysis.score -= 5.0;
        }
    }

    analysis.score = clamp_score(analysis.score);
    analysis
}
