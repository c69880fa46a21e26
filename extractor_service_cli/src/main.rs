use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use dotenv::dotenv;
use extractor_service_cli::{
    batch,
    fetcher::{FetchOptions, PageFetcher},
    sheet::Sheet,
    utils, ExtractedArticle,
};
use serde::Serialize;
use std::{path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract article titles and text from a spreadsheet of URLs", long_about = None)]
struct Args {
    /// Workbook with URL_ID and URL columns (xlsx, xls, ods)
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the extracted articles
    #[arg(short, long, default_value = "result.json")]
    output: PathBuf,

    /// Per-page fetch timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Serialize)]
struct Output {
    generated_at: DateTime<Utc>,
    articles: Vec<ExtractedArticle>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let rows = Sheet::from_bytes(bytes)?.source_rows()?;

    let fetcher = PageFetcher::new(FetchOptions {
        timeout: Duration::from_secs(args.timeout),
        ..FetchOptions::default()
    })?;
    let articles = batch::process(&fetcher, &rows).await;

    if articles.is_empty() {
        eprintln!("No articles could be extracted from {} rows.", rows.len());
    }

    let output = Output {
        generated_at: Utc::now(),
        articles,
    };
    utils::save_json(&output, &args.output).map_err(|e| anyhow::anyhow!("{}", e))?;
    println!(
        "Extracted {} of {} rows into {}",
        output.articles.len(),
        rows.len(),
        args.output.display()
    );

    Ok(())
}
