use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingStructure {
    pub is_valid: bool,
    pub messages: Vec<String>,
    pub levels: Vec<u8>,
}

/// Levels of ATX headings in document order. Lines inside fenced code
/// blocks are not headings.
pub(crate) fn heading_levels(content: &str) -> Vec<u8> {
    static RE_HEADING: OnceLock<Regex> = OnceLock::new();
    let re_heading =
        RE_HEADING.get_or_init(|| Regex::new(r"^ {0,3}(#{1,6})[ \t]+\S").expect("heading regex"));

    let mut levels = Vec::new();
    let mut fence: Option<&str> = None;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        if let Some(cap) = re_heading.captures(line) {
            let hashes = cap.get(1).map(|m| m.as_str().len()).unwrap_or_default();
            levels.push(hashes as u8);
        }
    }
    levels
}

pub(crate) fn analyze_headings(levels: Vec<u8>) -> HeadingStructure {
    let Some(&first) = levels.first() else {
        return HeadingStructure {
            is_valid: false,
            messages: vec!["No headings found in content".to_owned()],
            levels,
        };
    };

    let mut messages = Vec::new();
    if first != 1 {
        messages.push("Content should start with an H1 heading".to_owned());
    }
    // Only descending more than one level is a violation; climbing back up is fine.
    for pair in levels.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next > prev + 1 {
            messages.push(format!(
                "Improper heading structure: H{prev} followed by H{next}"
            ));
        }
    }

    HeadingStructure {
        is_valid: messages.is_empty(),
        messages,
        levels,
    }
}
