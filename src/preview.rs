use anyhow::Context as _;
use pulldown_cmark::{Options, Parser};

use crate::cli::PreviewArgs;
use crate::frontmatter;

pub fn run(args: PreviewArgs) -> anyhow::Result<()> {
    let markdown = std::fs::read_to_string(&args.file)
        .with_context(|| format!("read document: {}", args.file))?;
    print!("{}", render_html(&markdown));
    Ok(())
}

/// Renders the document body as an HTML fragment. A leading front matter
/// block is not part of the preview.
pub fn render_html(markdown: &str) -> String {
    let body = frontmatter::split(markdown)
        .map(|(_, body)| body)
        .unwrap_or(markdown);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(body, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_is_not_rendered() {
        let html = render_html("---\ntitle: Hidden\n---\n\n# Visible\n");
        assert_eq!(html, "<h1>Visible</h1>\n");
    }

    #[test]
    fn extensions_are_enabled() {
        let html = render_html("~~old~~\n\n- [x] done\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn empty_document_renders_nothing() {
        assert_eq!(render_html(""), "");
    }
}
