use std::collections::HashSet;

pub const RECENT_TAGS_CAPACITY: usize = 10;
pub const SUGGESTED_TAGS_LIMIT: usize = 5;
const MIN_SUGGESTED_TAG_CHARS: usize = 4;

/// Lowercased, trimmed form under which tags are stored and compared.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Inserts `tag` into `tags` unless it is already present. A successful
/// insert also moves the tag to the front of `recent`, which stays bounded.
///
/// Returns whether the tag was inserted.
pub(crate) fn insert_tag(tags: &mut Vec<String>, recent: &mut Vec<String>, tag: &str) -> bool {
    let tag = normalize_tag(tag);
    if tag.is_empty() || tags.contains(&tag) {
        return false;
    }

    recent.retain(|existing| existing != &tag);
    recent.insert(0, tag.clone());
    recent.truncate(RECENT_TAGS_CAPACITY);

    tags.push(tag);
    true
}

pub(crate) fn remove_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let before = tags.len();
    tags.retain(|existing| existing != tag);
    tags.len() != before
}

/// Candidate tags taken from `content`: distinct lowercase words longer than
/// three characters that are not tags yet, in order of first appearance.
pub fn suggest_tags(content: &str, tags: &[String]) -> Vec<String> {
    let existing: HashSet<&str> = tags.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    content
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .map(|word| word.trim_matches(['-', '_']).to_lowercase())
        .filter(|word| word.chars().count() >= MIN_SUGGESTED_TAG_CHARS)
        .filter(|word| !existing.contains(word.as_str()))
        .filter(|word| seen.insert(word.clone()))
        .take(SUGGESTED_TAGS_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_normalizes_and_deduplicates() {
        let mut tags = Vec::new();
        let mut recent = Vec::new();
        assert!(insert_tag(&mut tags, &mut recent, "Foo"));
        assert!(!insert_tag(&mut tags, &mut recent, " foo "));
        assert!(!insert_tag(&mut tags, &mut recent, "   "));
        assert_eq!(tags, vec!["foo"]);
        assert_eq!(recent, vec!["foo"]);
    }

    #[test]
    fn recent_tags_are_most_recent_first_and_bounded() {
        let mut tags = Vec::new();
        let mut recent = Vec::new();
        for i in 0..12 {
            insert_tag(&mut tags, &mut recent, &format!("tag{i}"));
        }
        assert_eq!(recent.len(), RECENT_TAGS_CAPACITY);
        assert_eq!(recent.first().map(String::as_str), Some("tag11"));
        assert_eq!(recent.last().map(String::as_str), Some("tag2"));
        assert_eq!(tags.len(), 12);
    }

    #[test]
    fn reinserting_a_removed_tag_moves_it_to_the_front() {
        let mut tags = Vec::new();
        let mut recent = Vec::new();
        for tag in ["a", "b", "c"] {
            insert_tag(&mut tags, &mut recent, tag);
        }
        assert!(remove_tag(&mut tags, "a"));
        assert_eq!(recent, vec!["c", "b", "a"]);

        insert_tag(&mut tags, &mut recent, "a");
        assert_eq!(recent, vec!["a", "c", "b"]);
    }

    #[test]
    fn suggestions_skip_short_words_and_existing_tags() {
        let tags = vec!["rust".to_owned()];
        let suggestions = suggest_tags(
            "Rust makes async services safe. Async, async! The borrow checker helps.",
            &tags,
        );
        assert_eq!(suggestions, vec!["makes", "async", "services", "safe", "borrow"]);
    }

    #[test]
    fn suggestions_are_capped() {
        let suggestions = suggest_tags("alpha bravo charlie delta echo foxtrot golf", &[]);
        assert_eq!(suggestions.len(), SUGGESTED_TAGS_LIMIT);
        assert!(suggest_tags("", &[]).is_empty());
    }
}
