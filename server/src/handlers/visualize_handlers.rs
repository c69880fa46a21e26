use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::IntoResponse,
};
use extractor_service_cli::chart::{self, ChartError};
use tracing::{error, info};

use super::upload::{api_error, input_error, read_sheet, ApiError, UploadForm};

/// POST /visualize
pub async fn visualize_column(multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;

    let column = match form.column_name.take().filter(|c| !c.is_empty()) {
        Some(c) => c,
        None => return Err(api_error(StatusCode::BAD_REQUEST, "Column name not provided.")),
    };
    info!(file = %file.file_name, %column, "visualize request");

    let values = read_sheet(file)
        .await?
        .column_values(&column)
        .map_err(input_error)?;

    let title_column = column.clone();
    let png = tokio::task::spawn_blocking(move || {
        chart::render_bar_chart(&title_column, &chart::value_counts(values))
    })
    .await
    .map_err(|e| {
        error!("chart task failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Thread join error")
    })?
    .map_err(|e| match e {
        ChartError::NoData => api_error(
            StatusCode::BAD_REQUEST,
            format!("Column \"{}\" has no values to plot.", column),
        ),
        ChartError::Font(_) | ChartError::Draw(_) | ChartError::Encode(_) => {
            error!("Error visualizing data: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"visualization.png\"",
            ),
        ],
        png,
    ))
}
