//! `docchat upload`

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use super::watch::{self, Overrides};

pub async fn run(file: &Path, base_url: Option<String>, follow: bool) -> Result<ExitCode> {
    let client = super::connect(base_url.clone())?;
    let document_id = client
        .upload(file)
        .await
        .with_context(|| format!("Failed to upload {}", file.display()))?;
    println!("{document_id}");

    if !follow {
        return Ok(ExitCode::SUCCESS);
    }
    watch::run(
        &document_id,
        Overrides {
            base_url,
            ..Overrides::default()
        },
    )
    .await
}
