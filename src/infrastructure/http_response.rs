// HTTP response utilities for JSON+Brotli encoding
use crate::domain::error::AnalyticsError;
use crate::infrastructure::view_mapper::error_code;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Whether the client advertised Brotli support with a non-zero q-value
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(coding_accepts_brotli))
        .unwrap_or(false)
}

fn coding_accepts_brotli(coding: &str) -> bool {
    let mut parts = coding.split(';').map(str::trim);
    if !parts.next().is_some_and(|name| name.eq_ignore_ascii_case("br")) {
        return false;
    }

    parts
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
        .map(|(_, q)| q.trim().parse::<f32>().map(|q| q > 0.0).unwrap_or(false))
        .unwrap_or(true)
}

/// Serialize to JSON and optionally compress with Brotli
pub async fn json_response<T: Serialize>(
    status: StatusCode,
    data: &T,
    compress: bool,
) -> Result<Response<Body>, StatusCode> {
    let json_bytes = serde_json::to_vec(data).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (body_bytes, content_encoding) = if compress {
        let original_len = json_bytes.len();
        let mut encoder = BrotliEncoder::new(std::io::Cursor::new(json_bytes));
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::debug!("Compressed JSON {} -> {} bytes", original_len, compressed.len());
        (compressed, Some("br"))
    } else {
        (json_bytes, None)
    };

    let mut response_builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body_bytes.len());

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder.body(Body::from(body_bytes)).map_err(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// JSON response or a bare status if encoding failed
pub async fn respond_json<T: Serialize>(status: StatusCode, data: &T, compress: bool) -> Response<Body> {
    match json_response(status, data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

pub fn status_for(error: &AnalyticsError) -> StatusCode {
    match error {
        AnalyticsError::NotFound { .. } => StatusCode::NOT_FOUND,
        AnalyticsError::Transport(_) => StatusCode::BAD_GATEWAY,
        AnalyticsError::Rejected(_) | AnalyticsError::UnknownEquipmentType(_) => StatusCode::BAD_REQUEST,
        AnalyticsError::NotReady | AnalyticsError::Superseded { .. } => StatusCode::CONFLICT,
        e if e.is_artifact_scoped() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    reason: &'a str,
}

/// One human readable message per failure
pub async fn error_response(error: &AnalyticsError, compress: bool) -> Response<Body> {
    let body = ErrorBody {
        error: error.to_string(),
        reason: error_code(error),
    };
    respond_json(status_for(error), &body, compress).await
}

pub fn pdf_response(dataset_id: i64, pdf: Bytes) -> Result<Response<Body>, StatusCode> {
    let disposition = format!("attachment; filename=\"report_{}.pdf\"", dataset_id);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        )
        .header(header::CONTENT_LENGTH, pdf.len())
        .body(Body::from(pdf))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::Parameter;
    use axum::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&AnalyticsError::NotFound { dataset_id: 1 }), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&AnalyticsError::Transport("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&AnalyticsError::Rejected("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&AnalyticsError::NotReady), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&AnalyticsError::EmptySample { parameter: Parameter::Flowrate }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, br"));
        assert!(accepts_brotli(&headers));
    }

    #[test]
    fn test_brotli_q_values() {
        let accepts = |value: &'static str| {
            let mut headers = HeaderMap::new();
            headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static(value));
            accepts_brotli(&headers)
        };

        assert!(accepts("BR;q=0.5, gzip"));
        assert!(!accepts("gzip, br;q=0"));
        assert!(!accepts("br ; q=0.0"));
        assert!(!accepts("gzip, zbr, brotli"));
        assert!(!accepts("br;q=oops"));
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = error_response(&AnalyticsError::NotFound { dataset_id: 12 }, false).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "dataset 12 not found");
        assert_eq!(json["reason"], "not_found");
    }

    #[tokio::test]
    async fn test_compressed_json_sets_encoding() {
        let data = serde_json::json!({"values": vec![1.5; 200]});
        let plain = json_response(StatusCode::OK, &data, false).await.unwrap();
        let compressed = json_response(StatusCode::OK, &data, true).await.unwrap();

        assert!(plain.headers().get(header::CONTENT_ENCODING).is_none());
        assert_eq!(compressed.headers()[header::CONTENT_ENCODING], "br");

        let plain_len = to_bytes(plain.into_body(), usize::MAX).await.unwrap().len();
        let compressed_len = to_bytes(compressed.into_body(), usize::MAX).await.unwrap().len();
        assert!(compressed_len < plain_len);
    }

    #[test]
    fn test_pdf_response_headers() {
        let response = pdf_response(7, Bytes::from_static(b"%PDF")).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report_7.pdf\""
        );
    }
}
