use anyhow::Context as _;

use crate::formats::{FrontMatter, MetaTags};

const DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub attributes: FrontMatter,
    pub body: String,
}

/// Splits a leading `---` delimited block from the rest of the document.
///
/// Returns `None` when the first line is not a delimiter or the block is
/// never closed.
pub fn split(markdown: &str) -> Option<(&str, &str)> {
    let mut lines = markdown.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let yaml = &markdown[yaml_start..offset];
            let body = &markdown[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }

    None
}

pub fn has_front_matter(markdown: &str) -> bool {
    split(markdown).is_some()
}

pub fn parse(markdown: &str) -> anyhow::Result<ParsedDocument> {
    let Some((yaml, body)) = split(markdown) else {
        return Ok(ParsedDocument {
            attributes: FrontMatter::default(),
            body: markdown.to_owned(),
        });
    };

    let attributes = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml).context("deserialize front matter")?
    };

    Ok(ParsedDocument {
        attributes,
        body: body.trim_start_matches(['\r', '\n']).to_owned(),
    })
}

/// Parses a document pasted into the import dialog, which must carry a
/// `type` and a `title`.
pub fn parse_for_import(markdown: &str) -> anyhow::Result<ParsedDocument> {
    if markdown.trim().is_empty() {
        anyhow::bail!("Content cannot be empty");
    }
    let parsed = parse(markdown)?;
    parsed.attributes.ensure_importable()?;
    Ok(parsed)
}

pub fn render(attributes: &FrontMatter, body: &str) -> anyhow::Result<String> {
    let yaml = serde_yaml::to_string(attributes).context("serialize front matter")?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{}\n", body.trim_end()))
}

impl FrontMatter {
    pub fn ensure_importable(&self) -> anyhow::Result<()> {
        if is_blank(self.kind.as_deref()) || is_blank(self.title.as_deref()) {
            anyhow::bail!("Import requires type and title in frontmatter");
        }
        Ok(())
    }

    pub fn meta_tags(&self) -> MetaTags {
        MetaTags {
            title: self.title.clone(),
            description: self.description.clone(),
            keywords: (!self.keywords.is_empty()).then(|| self.keywords.clone()),
            og_image: self.og_image.clone(),
            og_title: self.og_title.clone(),
            og_description: self.og_description.clone(),
            twitter_card: self.twitter_card.clone(),
            twitter_title: self.twitter_title.clone(),
            twitter_description: self.twitter_description.clone(),
            twitter_image: self.twitter_image.clone(),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
