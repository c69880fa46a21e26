use thiserror::Error;
use tracing::{info, warn};

use crate::extractor::extract;
use crate::fetcher::{Fetch, FetchError};
use crate::{ExtractedArticle, ExtractionBatch, SourceRow};

/// Why a row was left out of the batch.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("page has an empty title")]
    MissingTitle,
    #[error("page has no paragraph text")]
    EmptyBody,
}

/// Fetches and extracts a single row. Errors stay local to the row.
pub async fn process_row<F>(fetcher: &F, row: &SourceRow) -> Result<ExtractedArticle, SkipReason>
where
    F: Fetch + ?Sized,
{
    let html = fetcher.fetch(&row.url).await?;
    let content = extract(&html);

    if content.title.is_empty() {
        return Err(SkipReason::MissingTitle);
    }
    if content.body.is_empty() {
        return Err(SkipReason::EmptyBody);
    }

    Ok(ExtractedArticle {
        id: row.id.clone(),
        title: content.title,
        body: content.body,
    })
}

/// Runs every row in order, one request at a time, keeping only the successes.
pub async fn process<F>(fetcher: &F, rows: &[SourceRow]) -> ExtractionBatch
where
    F: Fetch + ?Sized,
{
    let mut batch = Vec::new();

    for row in rows {
        match process_row(fetcher, row).await {
            Ok(article) => batch.push(article),
            Err(reason) => {
                warn!(id = %row.id, url = %row.url, "skipping row: {}", reason);
            }
        }
    }

    info!(
        "extracted {} of {} rows ({} skipped)",
        batch.len(),
        rows.len(),
        rows.len() - batch.len()
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchResult;
    use crate::RowId;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubFetcher(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl Fetch for StubFetcher {
        async fn fetch(&self, url: &str) -> FetchResult {
            self.0
                .get(url)
                .map(|html| html.to_string())
                .ok_or_else(|| FetchError::Network(format!("connection refused: {}", url)))
        }
    }

    #[tokio::test]
    async fn empty_body_row_is_skipped() {
        let stub = StubFetcher(HashMap::from([("https://a.example", "<h1>Title</h1>")]));
        let row = SourceRow::new(1_i64, "https://a.example");
        assert!(matches!(
            process_row(&stub, &row).await,
            Err(SkipReason::EmptyBody)
        ));
    }

    #[tokio::test]
    async fn empty_title_row_is_skipped() {
        let stub = StubFetcher(HashMap::from([("https://a.example", "<h1></h1><p>x</p>")]));
        let row = SourceRow::new(1_i64, "https://a.example");
        assert!(matches!(
            process_row(&stub, &row).await,
            Err(SkipReason::MissingTitle)
        ));
    }

    #[tokio::test]
    async fn sentinel_title_is_kept() {
        let stub = StubFetcher(HashMap::from([("https://a.example", "<p>x</p>")]));
        let row = SourceRow::new("a-1", "https://a.example");
        let article = process_row(&stub, &row).await.unwrap();
        assert_eq!(article.id, RowId::Text("a-1".into()));
        assert_eq!(article.title, crate::extractor::NO_TITLE);
    }

    #[tokio::test]
    async fn fetch_failure_becomes_skip_reason() {
        let stub = StubFetcher(HashMap::new());
        let row = SourceRow::new(2_i64, "https://bad.example");
        let err = process_row(&stub, &row).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn empty_input_gives_empty_batch() {
        let stub = StubFetcher(HashMap::new());
        assert!(process(&stub, &[]).await.is_empty());
    }
}
