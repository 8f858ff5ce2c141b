//! `docchat render`

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use docchat_core::{render, AnswerKind};

pub fn run(file: Option<&Path>, kind: AnswerKind) -> Result<ExitCode> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read message from stdin")?;
            buf
        }
    };

    let fragment = render(&content, kind);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{fragment}").context("Failed to write output")?;
    Ok(ExitCode::SUCCESS)
}
