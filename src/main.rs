use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    writely::logging::init().context("init logging")?;

    let cli = writely::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        writely::cli::Command::Analyze(args) => {
            writely::analyzer::run(args).context("analyze")?;
        }
        writely::cli::Command::Preview(args) => {
            writely::preview::run(args).context("preview")?;
        }
        writely::cli::Command::Draft {
            command: writely::cli::DraftCommand::Show(args),
        } => {
            writely::draft::show(args).context("draft show")?;
        }
        writely::cli::Command::Draft {
            command: writely::cli::DraftCommand::Clear(args),
        } => {
            writely::draft::clear(args).context("draft clear")?;
        }
        writely::cli::Command::Draft {
            command: writely::cli::DraftCommand::Import(args),
        } => {
            writely::draft::import(args).context("draft import")?;
        }
        writely::cli::Command::Save(args) => {
            writely::draft::save(args).await.context("save")?;
        }
    }

    Ok(())
}
