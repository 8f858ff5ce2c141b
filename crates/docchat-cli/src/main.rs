//! docchat - chat with processed documents from the terminal

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docchat_core::AnswerKind;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(version)]
#[command(about = "Upload documents, ask questions about them, and render the answers")]
struct Cli {
    /// Show debug logs on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a message to an HTML fragment
    Render {
        /// File holding the message text (default: stdin)
        file: Option<PathBuf>,

        /// Answer classification reported by the backend (text, mixed, visual)
        #[arg(short, long, default_value = "text")]
        kind: AnswerKind,
    },
    /// Ask a question about a processed document and print the rendered answer
    Ask {
        /// Document id returned by the upload
        document_id: String,

        /// The question
        question: String,

        /// Backend root URL (overrides config and DOCCHAT_BASE_URL)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Print the answer as returned instead of rendering it
        #[arg(long)]
        raw: bool,
    },
    /// Upload a PDF and print its document id
    Upload {
        /// PDF to upload
        file: PathBuf,

        /// Backend root URL (overrides config and DOCCHAT_BASE_URL)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Follow processing progress after the upload
        #[arg(short, long)]
        watch: bool,
    },
    /// Follow processing progress of an uploaded document
    Watch {
        /// Document id returned by the upload
        document_id: String,

        /// Backend root URL (overrides config and DOCCHAT_BASE_URL)
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Milliseconds between progress requests
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,

        /// Give up after this many requests
        #[arg(long, value_name = "N")]
        max_polls: Option<u32>,
    },
    /// Turn a drag on a page image into a figure crop request
    ///
    /// Prints the request, or submits it when --document is given.
    Crop {
        /// Drag start in pixels, as X,Y
        #[arg(long, value_parser = commands::crop::parse_pair)]
        start: (f64, f64),

        /// Drag end in pixels, as X,Y
        #[arg(long, value_parser = commands::crop::parse_pair)]
        end: (f64, f64),

        /// Displayed image size in pixels, as W,H
        #[arg(long, value_parser = commands::crop::parse_pair)]
        surface: (f64, f64),

        /// Page the figure is cropped from
        #[arg(long)]
        page: u32,

        /// Figure name (default: Figure_<page>)
        #[arg(long)]
        name: Option<String>,

        /// Document to crop from; submits the request to the backend
        #[arg(long, value_name = "ID")]
        document: Option<String>,

        /// Backend root URL (overrides config and DOCCHAT_BASE_URL)
        #[arg(long, value_name = "URL", requires = "document")]
        base_url: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(future))
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Render { file, kind } => commands::render::run(file.as_deref(), kind),
        Commands::Ask {
            document_id,
            question,
            base_url,
            raw,
        } => block_on(commands::ask::run(&document_id, &question, base_url, raw))?,
        Commands::Upload {
            file,
            base_url,
            watch,
        } => block_on(commands::upload::run(&file, base_url, watch))?,
        Commands::Watch {
            document_id,
            base_url,
            interval_ms,
            max_polls,
        } => block_on(commands::watch::run(
            &document_id,
            commands::watch::Overrides {
                base_url,
                interval_ms,
                max_polls,
            },
        ))?,
        Commands::Crop {
            start,
            end,
            surface,
            page,
            name,
            document,
            base_url,
        } => {
            let request = commands::crop::build(start, end, surface, page, name.as_deref())?;
            match document {
                Some(document_id) => block_on(commands::crop::submit(
                    &document_id,
                    page,
                    &request,
                    base_url,
                ))?,
                None => commands::crop::print(&request),
            }
        }
    }
}
