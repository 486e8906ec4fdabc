use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print an SEO/readability report for a markdown file as JSON.
    Analyze(AnalyzeArgs),
    /// Render a markdown file to HTML.
    Preview(PreviewArgs),
    /// Inspect or change the stored draft.
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },
    /// Save the stored draft as a post.
    Save(SaveArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Markdown file to analyze. Front matter supplies the meta tags.
    #[arg(long)]
    pub file: String,

    /// Target keyword.
    #[arg(long)]
    pub keyword: String,

    /// Reading speed used for the reading time estimate.
    #[arg(long, default_value_t = 200)]
    pub words_per_minute: usize,

    /// Lowest acceptable keyword density, in percent.
    #[arg(long, default_value_t = 1.0)]
    pub min_density: f64,

    /// Highest acceptable keyword density, in percent.
    #[arg(long, default_value_t = 3.0)]
    pub max_density: f64,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Markdown file to render.
    #[arg(long)]
    pub file: String,
}

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Print the stored draft as JSON.
    Show(DraftDirArgs),
    /// Remove the stored draft.
    Clear(DraftDirArgs),
    /// Replace the stored draft with a markdown document.
    Import(DraftImportArgs),
}

#[derive(Debug, Args)]
pub struct DraftDirArgs {
    /// Draft storage directory (defaults to `WRITELY_DATA_DIR`).
    #[arg(long)]
    pub data_dir: Option<String>,
}

#[derive(Debug, Args)]
pub struct DraftImportArgs {
    /// Markdown document with `type` and `title` in its front matter.
    #[arg(long)]
    pub file: String,

    /// Draft storage directory (defaults to `WRITELY_DATA_DIR`).
    #[arg(long)]
    pub data_dir: Option<String>,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Directory receiving `<slug>.md`.
    #[arg(long)]
    pub out: String,

    /// Draft storage directory (defaults to `WRITELY_DATA_DIR`).
    #[arg(long)]
    pub data_dir: Option<String>,
}
