//! `docchat crop`

use std::process::ExitCode;

use anyhow::{Context, Result};
use docchat_core::figure::{FigureRequest, Point, SelectionRect, Surface};

/// Parse `X,Y` (or `W,H`) into a pair of numbers
pub fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected two comma-separated numbers, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", v.trim(), e))
    };
    Ok((parse(a)?, parse(b)?))
}

/// Normalize the drag and build the crop request
pub fn build(
    start: (f64, f64),
    end: (f64, f64),
    surface: (f64, f64),
    page: u32,
    name: Option<&str>,
) -> Result<FigureRequest> {
    let rect = SelectionRect::from_drag(
        Point::new(start.0, start.1),
        Point::new(end.0, end.1),
        Surface::new(surface.0, surface.1),
    )?;
    Ok(FigureRequest::new(rect, page, name))
}

pub fn print(request: &FigureRequest) -> Result<ExitCode> {
    let json = serde_json::to_string_pretty(request).context("Failed to encode request")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

/// Send the request and print the absolute URL of the saved figure
pub async fn submit(
    document_id: &str,
    page: u32,
    request: &FigureRequest,
    base_url: Option<String>,
) -> Result<ExitCode> {
    let client = super::connect(base_url)?;
    let figure_url = client
        .extract_figure(document_id, page, request)
        .await
        .with_context(|| format!("Failed to extract {}", request.figure_name))?;
    let figure_url = client
        .resolve(&figure_url)
        .with_context(|| format!("Backend returned an invalid figure URL '{figure_url}'"))?;
    println!("{figure_url}");
    Ok(ExitCode::SUCCESS)
}
