use std::io::ErrorKind;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use ns_core::AnalysisResult;
use serde::Deserialize;

use crate::{form, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub company: String,
}

pub async fn index() -> Html<String> {
    Html(form::index())
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Path(company): Path<String>,
) -> Result<Response, ApiError> {
    let result = state.pipeline.process(&company).await?;
    let status = if result.is_no_articles() && state.config.strict_status {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result)).into_response())
}

pub async fn report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let company = query.company.trim().to_string();
    if company.is_empty() {
        return Html(form::index()).into_response();
    }

    match state.pipeline.process(&company).await {
        Ok(result) => render_report(&company, &result),
        Err(e) => {
            let error = ApiError::from(e);
            (error.status, Html(form::error(&company, &error.message))).into_response()
        }
    }
}

fn render_report(company: &str, result: &AnalysisResult) -> Response {
    match serde_json::to_string_pretty(result) {
        Ok(json) => {
            let audio = result.audio_file().map(|path| path.as_path());
            Html(form::report(company, &json, audio)).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(form::error(company, &e.to_string())),
        )
            .into_response(),
    }
}

fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

fn content_type(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "mp3" => "audio/mpeg",
        Some(ext) if ext == "wav" => "audio/wav",
        Some(ext) if ext == "ogg" => "audio/ogg",
        _ => "application/octet-stream",
    }
}

pub async fn audio(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    if !is_safe_file_name(&file) {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Invalid audio file name"));
    }

    let path = state.pipeline.narrator().audio_dir().join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type(&file))], bytes).into_response()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(ApiError::new(StatusCode::NOT_FOUND, "Audio file not found"))
        }
        Err(e) => Err(ns_core::Error::from(e).into()),
    }
}
