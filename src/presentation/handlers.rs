// HTTP request handlers
use crate::domain::chart::FilterState;
use crate::domain::error::AnalyticsError;
use crate::infrastructure::http_response::{accepts_brotli, error_response, pdf_response, respond_json};
use crate::infrastructure::view_mapper::{artifact_to_view, ready_to_view, session_to_view};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Upload history
pub async fn list_datasets(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);

    match state.dataset_service.list_datasets().await {
        Ok(datasets) => respond_json(StatusCode::OK, &datasets, compress).await,
        Err(e) => {
            tracing::error!("Error fetching datasets: {}", e);
            error_response(&e, compress).await
        }
    }
}

/// Forward a CSV from the `file` multipart field to the backend
pub async fn upload_dataset(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                let error = AnalyticsError::Rejected(format!("invalid multipart body: {}", e));
                return error_response(&error, false).await;
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let contents = match field.bytes().await {
            Ok(contents) => contents,
            Err(e) => {
                let error = AnalyticsError::Rejected(format!("could not read upload: {}", e));
                return error_response(&error, false).await;
            }
        };

        return match state.dataset_service.upload_dataset(&filename, contents).await {
            Ok(receipt) => respond_json(StatusCode::CREATED, &receipt, false).await,
            Err(e) => error_response(&e, false).await,
        };
    }

    error_response(&AnalyticsError::Rejected("missing file field".to_string()), false).await
}

pub async fn delete_dataset(Path(id): Path<i64>, State(state): State<Arc<AppState>>) -> Response {
    match state.session.delete_dataset(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e, false).await,
    }
}

/// PDF report passthrough
pub async fn download_report(Path(id): Path<i64>, State(state): State<Arc<AppState>>) -> Response {
    match state.dataset_service.fetch_report(id).await {
        Ok(pdf) => match pdf_response(id, pdf) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => error_response(&e, false).await,
    }
}

/// Current dashboard: idle, loading or ready with every derived chart
pub async fn get_session(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);
    let view = session_to_view(&state.session.phase().await);
    respond_json(StatusCode::OK, &view, compress).await
}

pub async fn select_dataset(
    Path(id): Path<i64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);

    match state.session.select_dataset(id).await {
        Ok(ready) => respond_json(StatusCode::OK, &ready_to_view(&ready), compress).await,
        Err(e) => error_response(&e, compress).await,
    }
}

/// Apply a filter selection; only the dynamic chart is returned
pub async fn apply_filter(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(filter): Json<FilterState>,
) -> Response {
    let compress = accepts_brotli(&headers);

    match state.session.apply_filter(filter).await {
        Ok(series) => respond_json(StatusCode::OK, &artifact_to_view(&series), compress).await,
        Err(e) => error_response(&e, compress).await,
    }
}

pub async fn clear_session(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.clear().await;
    StatusCode::NO_CONTENT
}
