use axum::{extract::Multipart, http::StatusCode, Json};
use extractor_service_cli::sheet::{InputError, Sheet};
use serde_json::{json, Value};
use tracing::error;

pub type ApiError = (StatusCode, Json<Value>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Workbook problems the client can fix are 400s; anything else is ours.
pub fn input_error(e: InputError) -> ApiError {
    match e {
        InputError::MissingColumns | InputError::UnknownColumn(_) => {
            api_error(StatusCode::BAD_REQUEST, e.to_string())
        }
        InputError::Unreadable(_) | InputError::NoWorksheet => {
            error!("Error processing file: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Fields of a `multipart/form-data` upload form.
#[derive(Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub column_name: Option<String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
                    form.file = Some(UploadedFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                "column_name" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
                    form.column_name = Some(text);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self) -> Result<UploadedFile, ApiError> {
        match self.file.take() {
            None => Err(api_error(StatusCode::BAD_REQUEST, "No file provided.")),
            Some(file) if file.file_name.is_empty() => {
                Err(api_error(StatusCode::BAD_REQUEST, "No file selected."))
            }
            Some(file) => Ok(file),
        }
    }
}

/// Parses the workbook off the async runtime.
pub async fn read_sheet(file: UploadedFile) -> Result<Sheet, ApiError> {
    tokio::task::spawn_blocking(move || Sheet::from_bytes(file.bytes))
        .await
        .map_err(|e| {
            error!("sheet parsing task failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Thread join error")
        })?
        .map_err(input_error)
}
