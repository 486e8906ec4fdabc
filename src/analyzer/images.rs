use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::{Recommendation, contains_ignore_case};

const MIN_ALT_CHARS: usize = 5;
const MAX_ALT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAnalysis {
    pub count: usize,
    pub missing_alt: usize,
    pub short_alt: usize,
    pub long_alt: usize,
    pub keyword_in_alt: bool,
    pub suggestions: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AltText {
    Missing,
    Short,
    Long,
    Acceptable,
}

fn classify(alt: &str) -> AltText {
    let len = alt.trim().chars().count();
    if len == 0 {
        AltText::Missing
    } else if len < MIN_ALT_CHARS {
        AltText::Short
    } else if len > MAX_ALT_CHARS {
        AltText::Long
    } else {
        AltText::Acceptable
    }
}

pub(crate) fn image_alts(content: &str) -> Vec<&str> {
    static RE_IMAGE: OnceLock<Regex> = OnceLock::new();
    let re_image =
        RE_IMAGE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("image regex"));

    re_image
        .captures_iter(content)
        .map(|cap| cap.get(1).map(|m| m.as_str()).unwrap_or_default())
        .collect()
}

pub(crate) fn analyze_images(content: &str, keyword: &str) -> ImageAnalysis {
    let alts = image_alts(content);
    let count_of = |kind: AltText| alts.iter().filter(|alt| classify(alt) == kind).count();
    let missing_alt = count_of(AltText::Missing);
    let short_alt = count_of(AltText::Short);
    let long_alt = count_of(AltText::Long);
    let keyword_in_alt = alts.iter().any(|alt| contains_ignore_case(alt, keyword));

    let mut suggestions = Vec::new();
    let mut recommendations = Vec::new();

    if alts.is_empty() {
        suggestions.push("Consider adding images to make the content more engaging".to_owned());
    }
    if missing_alt > 0 {
        recommendations.push(Recommendation::error(match missing_alt {
            1 => "1 image is missing alt text".to_owned(),
            n => format!("{n} images are missing alt text"),
        }));
    }
    if short_alt > 0 {
        recommendations.push(Recommendation::warning(match short_alt {
            1 => format!("1 image has alt text shorter than {MIN_ALT_CHARS} characters"),
            n => format!("{n} images have alt text shorter than {MIN_ALT_CHARS} characters"),
        }));
    }
    if long_alt > 0 {
        recommendations.push(Recommendation::warning(match long_alt {
            1 => format!("1 image has alt text longer than {MAX_ALT_CHARS} characters"),
            n => format!("{n} images have alt text longer than {MAX_ALT_CHARS} characters"),
        }));
    }
    if !alts.is_empty() && !keyword_in_alt {
        recommendations.push(Recommendation::warning(
            "Target keyword not found in any image alt text",
        ));
    }

    ImageAnalysis {
        count: alts.len(),
        missing_alt,
        short_alt,
        long_alt,
        keyword_in_alt,
        suggestions,
        recommendations,
    }
}
