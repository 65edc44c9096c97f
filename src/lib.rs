pub mod encoding;
pub mod inspect;
pub mod templates;
pub mod zwo;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use uuid::Uuid;

use encoding::{DEFAULT_FTP_WATTS, EncodeOptions, FitEncodeError, encode_workout};
use inspect::DisplayRecord;
use templates::{render_conversion_result, render_landing_page};

/// Everything the result view needs about one finished conversion.
pub struct ConversionOutcome {
    pub workout_name: String,
    pub description: String,
    pub ftp_watts: u32,
    pub step_count: u16,
    pub total_duration_seconds: u32,
    pub checksum: u16,
    pub file_size: usize,
    pub records: Vec<DisplayRecord>,
}

struct StoredFit {
    file_name: String,
    bytes: Vec<u8>,
}

/// Converted files waiting to be downloaded, keyed by a one-off token.
#[derive(Clone, Default)]
struct AppState {
    downloads: Arc<Mutex<HashMap<Uuid, StoredFit>>>,
}

pub fn build_app() -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/convert", post(handle_convert))
        .route("/download/:id", get(handle_download))
        .with_state(AppState::default())
}

async fn landing_page() -> Html<&'static str> {
    Html(render_landing_page())
}

async fn handle_convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut uploaded: Option<(String, Vec<u8>)> = None;
    let mut ftp_watts = DEFAULT_FTP_WATTS;

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("workout.zwo").to_string();
                match field.bytes().await {
                    Ok(bytes) => uploaded = Some((file_name, bytes.to_vec())),
                    Err(err) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read uploaded file: {err}"),
                        )
                            .into_response();
                    }
                }
            }
            Some("ftp") => {
                if let Ok(raw) = field.text().await {
                    match raw.trim().parse::<u32>() {
                        Ok(value) if value > 0 => ftp_watts = value,
                        _ => {
                            return (
                                StatusCode::BAD_REQUEST,
                                format!("FTP must be a positive integer, got {raw:?}"),
                            )
                                .into_response();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let (file_name, file_bytes) = match uploaded {
        Some(upload) => upload,
        None => return (StatusCode::BAD_REQUEST, "No file provided").into_response(),
    };

    let xml = match String::from_utf8(file_bytes) {
        Ok(xml) => xml,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, "ZWO file is not valid UTF-8 text").into_response();
        }
    };

    let workout = match zwo::parse_zwo(&xml) {
        Ok(workout) => workout,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let options = EncodeOptions {
        ftp_watts,
        created_at: None,
    };
    let encoded = match encode_workout(&workout, &options) {
        Ok(encoded) => encoded,
        Err(err @ (FitEncodeError::NoSegments | FitEncodeError::InvalidInput(_))) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response();
        }
        Err(err) => {
            tracing::error!(error = %err, "workout encoding failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
    };

    let records = match inspect::decode_fit(&encoded.bytes) {
        Ok(records) => records,
        Err(err) => {
            tracing::error!(error = %err, "generated file failed validation");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
    };

    let outcome = ConversionOutcome {
        workout_name: workout.name.clone(),
        description: workout.description.clone(),
        ftp_watts,
        step_count: encoded.step_count,
        total_duration_seconds: workout.total_duration(),
        checksum: encoded.checksum,
        file_size: encoded.bytes.len(),
        records,
    };

    let token = Uuid::new_v4();
    let fit_name = fit_file_name(&file_name);
    tracing::info!(file = %fit_name, token = %token, "conversion ready for download");
    {
        let mut downloads = state
            .downloads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        downloads.insert(
            token,
            StoredFit {
                file_name: fit_name,
                bytes: encoded.bytes,
            },
        );
    }

    Html(render_conversion_result(
        &outcome,
        &format!("/download/{token}"),
    ))
    .into_response()
}

async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let token = match Uuid::parse_str(&id) {
        Ok(token) => token,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid download token").into_response(),
    };

    let stored = {
        let downloads = state
            .downloads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        downloads
            .get(&token)
            .map(|stored| (stored.file_name.clone(), stored.bytes.clone()))
    };

    match stored {
        Some((file_name, bytes)) => (
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Unknown download token").into_response(),
    }
}

fn fit_file_name(upload_name: &str) -> String {
    let stem = upload_name
        .strip_suffix(".zwo")
        .or_else(|| upload_name.strip_suffix(".xml"))
        .unwrap_or(upload_name);
    format!("{stem}.fit")
}
