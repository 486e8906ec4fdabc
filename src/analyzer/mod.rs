//! Content-quality analysis for markdown posts.
//!
//! [`analyze`] is pure: identical inputs always produce identical reports, and
//! degenerate inputs yield a fully populated zero-score report instead of an
//! error.

mod headings;
mod images;
mod links;
mod meta_tags;
mod readability;

use std::collections::BTreeMap;

use anyhow::Context as _;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::cli::AnalyzeArgs;
use crate::formats::MetaTags;
use crate::frontmatter;

pub use headings::HeadingStructure;
pub use images::ImageAnalysis;
pub use links::InternalLinks;
pub use meta_tags::{LengthIssue, MetaTagAnalysis, analyze_meta_tags};
pub use readability::readability_score;

const SHORT_CONTENT_WORDS: usize = 100;
const MEDIUM_CONTENT_WORDS: usize = 300;
const MIN_LINKS_FOR_LONG_CONTENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
}

impl Recommendation {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeOptions {
    pub words_per_minute: usize,
    /// Percent.
    pub min_keyword_density: f64,
    /// Percent.
    pub max_keyword_density: f64,
    pub meta_tags: Option<MetaTags>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            min_keyword_density: 1.0,
            max_keyword_density: 3.0,
            meta_tags: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentReport {
    pub score: f64,
    pub readability_score: f64,
    pub keyword_density: BTreeMap<String, f64>,
    /// Minutes, rounded up.
    pub reading_time: usize,
    pub word_count: usize,
    pub recommendations: Vec<Recommendation>,
    pub heading_structure: HeadingStructure,
    pub internal_links: InternalLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageAnalysis>,
    pub meta_tags: MetaTagAnalysis,
    pub meta_data_present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub words: usize,
    pub characters: usize,
}

pub fn document_stats(text: &str) -> DocumentStats {
    DocumentStats {
        words: count_words(text),
        characters: text.chars().count(),
    }
}

pub fn analyze(content: &str, keyword: &str, options: &AnalyzeOptions) -> ContentReport {
    let meta_tags = analyze_meta_tags(options.meta_tags.as_ref(), keyword);

    if content.trim().is_empty() || keyword.trim().is_empty() {
        return empty_report(content, keyword, meta_tags);
    }

    let word_count = count_words(content);
    let keyword_count = count_keyword(content, keyword);
    let density = percent_of(keyword_count, word_count);
    let reading_time = word_count.div_ceil(options.words_per_minute.max(1));

    let heading_structure = headings::analyze_headings(headings::heading_levels(content));
    let internal_links = links::analyze_internal_links(content, word_count);
    let images = images::analyze_images(content, keyword);

    let density_in_range =
        density >= options.min_keyword_density && density <= options.max_keyword_density;

    let mut recommendations = Vec::new();
    if word_count < SHORT_CONTENT_WORDS {
        recommendations.push(Recommendation::error(
            "Content is too short for meaningful SEO analysis",
        ));
    } else if density < options.min_keyword_density {
        recommendations.push(Recommendation::warning(format!(
            "Keyword density ({density:.1}%) is below recommended minimum of {}%",
            options.min_keyword_density
        )));
    } else if density > options.max_keyword_density {
        recommendations.push(Recommendation::warning(format!(
            "Keyword density ({density:.1}%) exceeds recommended maximum of {}%",
            options.max_keyword_density
        )));
    } else {
        recommendations.push(Recommendation::success(
            "Keyword density is within optimal range",
        ));
    }
    if word_count >= MEDIUM_CONTENT_WORDS && internal_links.count < MIN_LINKS_FOR_LONG_CONTENT {
        recommendations.push(Recommendation::warning(
            "Consider adding more internal links to improve content connectivity",
        ));
    }

    let mut score = 100.0;
    if word_count < SHORT_CONTENT_WORDS {
        score -= 50.0;
    } else if word_count < MEDIUM_CONTENT_WORDS {
        score -= 25.0;
    }
    if word_count >= SHORT_CONTENT_WORDS && !density_in_range {
        score -= 10.0;
    }
    if !heading_structure.is_valid {
        score -= 15.0;
    }
    if word_count >= MEDIUM_CONTENT_WORDS && internal_links.count < MIN_LINKS_FOR_LONG_CONTENT {
        score -= 10.0;
    }
    // Meta tags always weigh as much as the body.
    let score = clamp_score((score + meta_tags.score) / 2.0);

    ContentReport {
        score,
        readability_score: readability_score(content),
        keyword_density: BTreeMap::from([(keyword.to_owned(), density)]),
        reading_time,
        word_count,
        recommendations,
        heading_structure,
        internal_links,
        images: Some(images),
        meta_tags,
        meta_data_present: frontmatter::has_front_matter(content),
    }
}

fn empty_report(content: &str, keyword: &str, meta_tags: MetaTagAnalysis) -> ContentReport {
    let message = if content.trim().is_empty() {
        "Content is empty"
    } else {
        "No target keyword specified"
    };

    ContentReport {
        score: 0.0,
        readability_score: 0.0,
        keyword_density: BTreeMap::from([(keyword.to_owned(), 0.0)]),
        reading_time: 0,
        word_count: 0,
        recommendations: vec![Recommendation::error(message)],
        heading_structure: HeadingStructure {
            is_valid: false,
            messages: vec!["No content to analyze".to_owned()],
            levels: Vec::new(),
        },
        internal_links: InternalLinks {
            count: 0,
            suggestions: vec!["Add content before analyzing SEO metrics".to_owned()],
            density: 0.0,
            recommended_min_links: 0,
        },
        images: None,
        meta_tags,
        meta_data_present: frontmatter::has_front_matter(content),
    }
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("read document: {}", args.file))?;
    let meta_tags = if frontmatter::has_front_matter(&content) {
        let parsed = frontmatter::parse(&content).context("parse front matter")?;
        Some(parsed.attributes.meta_tags())
    } else {
        None
    };

    let options = AnalyzeOptions {
        words_per_minute: args.words_per_minute,
        min_keyword_density: args.min_density,
        max_keyword_density: args.max_density,
        meta_tags,
    };
    let report = analyze(&content, &args.keyword, &options);
    tracing::debug!(file = %args.file, score = report.score, "analyzed document");

    let json = serde_json::to_string_pretty(&report).context("serialize report")?;
    println!("{json}");
    Ok(())
}

pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Non-overlapping, case-insensitive occurrences of `keyword` taken as
/// literal text.
pub(crate) fn count_keyword(content: &str, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
        .map(|re| re.find_iter(content).count())
        .unwrap_or(0)
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn percent_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

pub(crate) fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(word: &str, n: usize) -> String {
        vec![word; n].join(" ")
    }

    fn body_with_keyword(total_words: usize, keyword_hits: usize) -> String {
        // "# Heading" contributes two words.
        format!(
            "# Heading\n\n{} {}",
            words("rust", keyword_hits),
            words("lorem", total_words - 2 - keyword_hits)
        )
    }

    #[test]
    fn empty_content_wins_over_missing_keyword() {
        let report = analyze("", "", &AnalyzeOptions::default());
        assert_eq!(report.score, 0.0);
        assert_eq!(report.recommendations, vec![Recommendation::error("Content is empty")]);
        assert!(!report.heading_structure.is_valid);
        assert_eq!(report.heading_structure.messages, vec!["No content to analyze"]);
        assert_eq!(
            report.internal_links.suggestions,
            vec!["Add content before analyzing SEO metrics"]
        );
        assert!(report.images.is_none());
    }

    #[test]
    fn missing_keyword_yields_single_error() {
        let report = analyze("text", "  ", &AnalyzeOptions::default());
        assert_eq!(report.score, 0.0);
        assert_eq!(
            report.recommendations,
            vec![Recommendation::error("No target keyword specified")]
        );
        assert_eq!(report.keyword_density.get("  "), Some(&0.0));
    }

    #[test]
    fn degenerate_report_still_analyzes_meta_tags() {
        let options = AnalyzeOptions {
            meta_tags: Some(MetaTags {
                title: Some("A title".to_owned()),
                ..MetaTags::default()
            }),
            ..AnalyzeOptions::default()
        };
        let report = analyze("", "rust", &options);
        assert!(!report.meta_tags.missing_tags.contains(&"title".to_owned()));
        assert!(report.meta_tags.missing_tags.contains(&"description".to_owned()));
    }

    #[test]
    fn density_in_range_is_a_success() {
        let content = body_with_keyword(100, 2);
        let report = analyze(&content, "rust", &AnalyzeOptions::default());

        assert_eq!(report.word_count, 100);
        let density = report.keyword_density["rust"];
        assert!((density - 2.0).abs() < 1e-9, "density = {density}");
        assert_eq!(
            report.recommendations,
            vec![Recommendation::success("Keyword density is within optimal range")]
        );
        // 100 - 25 (short-ish) blended with 45 for absent meta tags.
        assert_eq!(report.score, 60.0);
        assert_eq!(report.reading_time, 1);
    }

    #[test]
    fn density_outside_range_warns_and_penalizes() {
        let low = analyze(&body_with_keyword(200, 0), "rust", &AnalyzeOptions::default());
        assert_eq!(
            low.recommendations[0].message,
            "Keyword density (0.0%) is below recommended minimum of 1%"
        );
        assert_eq!(low.score, (100.0 - 25.0 - 10.0 + 45.0) / 2.0);

        let high = analyze(&body_with_keyword(100, 10), "rust", &AnalyzeOptions::default());
        assert_eq!(
            high.recommendations[0].message,
            "Keyword density (10.0%) exceeds recommended maximum of 3%"
        );
    }

    #[test]
    fn custom_density_bounds_are_respected() {
        let options = AnalyzeOptions {
            min_keyword_density: 5.0,
            max_keyword_density: 15.0,
            ..AnalyzeOptions::default()
        };
        let report = analyze(&body_with_keyword(100, 10), "rust", &options);
        assert_eq!(report.recommendations[0].kind, RecommendationKind::Success);
    }

    #[test]
    fn short_content_reports_length_error_first() {
        let report = analyze("# Rust\n\nrust is fine", "rust", &AnalyzeOptions::default());
        assert_eq!(
            report.recommendations,
            vec![Recommendation::error(
                "Content is too short for meaningful SEO analysis"
            )]
        );
        // 100 - 50 blended with 45.
        assert_eq!(report.score, 47.5);
    }

    #[test]
    fn long_content_without_links_gets_link_warnings() {
        let content = body_with_keyword(400, 8);
        let report = analyze(&content, "rust", &AnalyzeOptions::default());

        assert_eq!(report.internal_links.count, 0);
        assert_eq!(report.internal_links.recommended_min_links, 2);
        assert_eq!(report.internal_links.suggestions.len(), 2);
        assert!(report.internal_links.suggestions[0].contains("recommended minimum is 2"));
        assert!(report.internal_links.suggestions[1].starts_with("Add internal links"));
        assert_eq!(
            report.recommendations.last().map(|r| r.message.as_str()),
            Some("Consider adding more internal links to improve content connectivity")
        );
        assert_eq!(report.score, (100.0 - 10.0 + 45.0) / 2.0);
        assert_eq!(report.reading_time, 2);
    }

    #[test]
    fn invalid_headings_cost_fifteen_points() {
        let content = format!("## Heading\n\n{}", words("lorem", 98));
        let report = analyze(&content, "rust", &AnalyzeOptions::default());
        assert!(!report.heading_structure.is_valid);
        // -25 length, -10 density, -15 headings.
        assert_eq!(report.score, (50.0 + 45.0) / 2.0);
    }

    #[test]
    fn keyword_is_matched_as_literal_text() {
        assert_eq!(count_keyword("c++ and C++ and c", "c++"), 2);
        assert_eq!(count_keyword("a.b axb", "a.b"), 1);
        assert_eq!(count_keyword("Rust rust RUST", "rust"), 3);
        assert_eq!(count_keyword("(unclosed", "("), 1);
    }

    #[test]
    fn analysis_is_idempotent() {
        let content = body_with_keyword(350, 5);
        let options = AnalyzeOptions::default();
        assert_eq!(
            analyze(&content, "rust", &options),
            analyze(&content, "rust", &options)
        );
    }

    #[test]
    fn scores_stay_within_bounds() {
        let samples = [
            "x",
            "# A\n#### B",
            "!!!???...",
            "![](a.png) ![](b.png) [x](/y)",
            "---\ntitle: t\n---\nbody",
        ];
        for sample in samples {
            for keyword in ["x", "rust", "."] {
                let report = analyze(sample, keyword, &AnalyzeOptions::default());
                assert!((0.0..=100.0).contains(&report.score), "{sample:?}");
                assert!((0.0..=100.0).contains(&report.readability_score), "{sample:?}");
            }
        }
    }

    #[test]
    fn front_matter_is_detected() {
        let report = analyze("---\ntitle: t\n---\nbody", "body", &AnalyzeOptions::default());
        assert!(report.meta_data_present);
        let report = analyze("body", "body", &AnalyzeOptions::default());
        assert!(!report.meta_data_present);
    }

    #[test]
    fn document_stats_count_words_and_characters() {
        let stats = document_stats("  héllo   world \n");
        assert_eq!(stats.words, 2);
        assert_eq!(stats.characters, 17);
    }
}
