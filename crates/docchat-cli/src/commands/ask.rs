//! `docchat ask`

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;

pub async fn run(
    document_id: &str,
    question: &str,
    base_url: Option<String>,
    raw: bool,
) -> Result<ExitCode> {
    let client = super::connect(base_url)?;
    let answer = client
        .ask(document_id, question)
        .await
        .context("Failed to get an answer")?;
    info!(kind = %answer.kind, pages = ?answer.source_pages, "Received answer");

    if !answer.source_pages.is_empty() {
        let pages: Vec<String> = answer.source_pages.iter().map(u32::to_string).collect();
        eprintln!("Source pages: {}", pages.join(", "));
    }
    if raw {
        println!("{}", answer.content);
    } else {
        println!("{}", answer.to_html());
    }
    Ok(ExitCode::SUCCESS)
}
