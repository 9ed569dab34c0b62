use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use seg_core::SystemClock;
use seg_doc::{FileDocument, TrackerDocument};
use tracing_subscriber::EnvFilter;

use seg_cli::commands::{
    edit, export, init, next, remove, rename, show, split, start, stop, upload, watch,
};
use seg_cli::{Cli, Commands, Config};

/// Load config and address the tracker block of a document.
fn open_document(
    config_path: Option<&Path>,
    document: &Path,
    block: usize,
) -> Result<(TrackerDocument<FileDocument>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let doc = TrackerDocument::new(FileDocument::new(document), block);
    Ok((doc, config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let clock = SystemClock;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let config_path = cli.config.as_deref();

    match &cli.command {
        Some(Commands::Init { document }) => {
            if !document.exists() {
                std::fs::write(document, "")
                    .with_context(|| format!("failed to create {}", document.display()))?;
            }
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            init::run(&mut out, &doc)?;
        }
        Some(Commands::Start { document, name }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            start::run(&mut out, &doc, &clock, name.as_deref(), cli.force)?;
        }
        Some(Commands::Stop { document, name }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            stop::run(&mut out, &doc, &clock, name.as_deref(), cli.force)?;
        }
        Some(Commands::Next {
            document,
            finished_name,
            name,
        }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            next::run(
                &mut out,
                &doc,
                &clock,
                finished_name.as_deref(),
                name.as_deref(),
                cli.force,
            )?;
        }
        Some(Commands::Split {
            document,
            path,
            name,
        }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            split::run(&mut out, &doc, &clock, path, name.as_deref(), cli.force)?;
        }
        Some(Commands::Remove { document, path }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            remove::run(&mut out, &doc, path, cli.force)?;
        }
        Some(Commands::Rename {
            document,
            path,
            name,
        }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            rename::run(&mut out, &doc, path, name, cli.force)?;
        }
        Some(Commands::Edit {
            document,
            path,
            start,
            end,
        }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            edit::run(
                &mut out,
                &doc,
                &clock,
                path,
                start.as_deref(),
                end.as_deref(),
                cli.force,
            )?;
        }
        Some(Commands::Show { document }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            show::run(&mut out, &doc, &clock)?;
        }
        Some(Commands::Export {
            document,
            format,
            delimiter,
        }) => {
            let (doc, config) = open_document(config_path, document, cli.block)?;
            let mut settings = config.export_settings();
            if let Some(delimiter) = delimiter {
                settings.csv_delimiter.clone_from(delimiter);
            }
            export::run(&mut out, &doc, &clock, (*format).into(), &settings)?;
        }
        Some(Commands::Upload { document }) => {
            let (doc, config) = open_document(config_path, document, cli.block)?;
            upload::run(
                &mut out,
                &doc,
                &clock,
                &config.export_settings(),
                &config.upload,
            )?;
        }
        Some(Commands::Watch { document }) => {
            let (doc, _config) = open_document(config_path, document, cli.block)?;
            watch::run(&mut out, &doc, &clock)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
