//! Static asset serving
//!
//! Resolves request paths against the asset root. Any path containing `..`
//! is refused outright, and only plain path segments are ever joined onto the
//! root.

use super::error::RelayError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};

/// Document served for the root path
pub const INDEX_DOCUMENT: &str = "index.html";

/// Map a request path onto a file under `root`.
///
/// Returns `None` when the path is rejected by the traversal guard.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    if request_path.contains("..") {
        return None;
    }

    let relative = request_path.trim_start_matches('/');
    let relative = if relative.is_empty() {
        Path::new(INDEX_DOCUMENT)
    } else {
        Path::new(relative)
    };

    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    Some(root.join(relative))
}

/// Content type derived from the final path suffix
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        _ => "text/plain",
    }
}

/// Serve the asset a request path refers to
pub async fn serve(root: &Path, request_path: &str) -> Response {
    let Some(path) = resolve(root, request_path) else {
        tracing::debug!(path = %request_path, "Rejected asset path");
        return RelayError::AssetNotFound.into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type(&path)),
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Asset not readable");
            RelayError::AssetNotFound.into_response()
        }
    }
}
