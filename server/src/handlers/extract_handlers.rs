use axum::{extract::Multipart, http::StatusCode, response::IntoResponse, Extension, Json};
use extractor_service_cli::batch;
use tracing::info;
use uuid::Uuid;

use super::upload::{input_error, read_sheet, ApiError, UploadForm};
use crate::state::AppState;

pub async fn home() -> &'static str {
    "Welcome to the Article Extractor and Visualizer API! Use the /extract and /visualize endpoints."
}

/// POST /extract
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn extract_articles(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;
    info!(file = %file.file_name, "extract request");

    let rows = read_sheet(file)
        .await?
        .source_rows()
        .map_err(input_error)?;

    let articles = batch::process(state.fetcher.as_ref(), &rows).await;

    Ok((StatusCode::OK, Json(articles)))
}
