//! Image index server.
//!
//! `GET /images` answers with the sorted list of captured screenshot
//! filenames as JSON, for any browser-side gallery to consume; every other
//! path is served as a static file from the working directory.

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

/// Default port of the image index, bound on localhost only.
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone)]
struct ServerState {
    image_dir: PathBuf,
}

/// Builds the router: the `/images` listing plus a static-file fallback
/// rooted at the process working directory.
pub fn router(image_dir: PathBuf) -> Router {
    Router::new()
        .route("/images", get(list_images))
        .fallback_service(ServeDir::new("."))
        .with_state(ServerState { image_dir })
}

/// Binds `addr` and serves until the process is interrupted.
pub async fn serve(addr: SocketAddr, image_dir: PathBuf) -> Result<()> {
    let app = router(image_dir);
    let listener = TcpListener::bind(addr).await?;
    info!("Image index listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn list_images(State(state): State<ServerState>) -> Response {
    match png_listing(&state.image_dir).await {
        Ok(names) => (
            // The gallery page may be opened straight from disk; answer
            // cross-origin requests unconditionally.
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            Json(names),
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to list {}: {}", state.image_dir.display(), e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Lexicographically sorted `.png` filenames in `dir`. An absent directory is
/// an empty listing, not an error: the server may start before any capture
/// run has produced output.
pub async fn png_listing(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".png") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn images_route_answers_sorted_json_with_cors() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta_com.png", "alpha_com.png", "notes.txt"] {
            tokio::fs::write(dir.path().join(name), b"x").await.unwrap();
        }

        let app = router(dir.path().to_path_buf());
        let response = app
            .oneshot(Request::builder().uri("/images").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let names: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(names, vec!["alpha_com.png", "zeta_com.png"]);
    }

    #[tokio::test]
    async fn unreadable_image_dir_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("images");
        tokio::fs::write(&not_a_dir, b"x").await.unwrap();

        let app = router(not_a_dir);
        let response = app
            .oneshot(Request::builder().uri("/images").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn listing_is_sorted_and_png_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta_com.png", "alpha_com.png", "notes.txt", "beta_com.png"] {
            tokio::fs::write(dir.path().join(name), b"x").await.unwrap();
        }

        let names = png_listing(dir.path()).await.unwrap();
        assert_eq!(names, vec!["alpha_com.png", "beta_com.png", "zeta_com.png"]);
    }

    #[tokio::test]
    async fn missing_directory_is_an_empty_listing() {
        let dir = tempfile::tempdir().unwrap();
        let names = png_listing(&dir.path().join("absent")).await.unwrap();
        assert!(names.is_empty());
    }
}
