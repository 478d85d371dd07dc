//! Serving with incremental revalidation
//!
//! Serves the generated `public/` directory and keeps it fresh without
//! blocking requests: a page older than its revalidation window is
//! served as-is while one background regeneration runs; a post slug
//! that was never generated gets the interim fallback page while its
//! page is produced on demand. An in-flight set serializes the
//! regenerations per route so overlapping requests never stack them,
//! the same policy the pagination controller applies to its cursor.

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::CmsClient;
use crate::generator::{is_safe_slug, Generator};
use crate::Spacetraveling;

/// Server state shared by all requests
struct ServerState {
    config: crate::config::SiteConfig,
    public_dir: PathBuf,
    generator: Generator<CmsClient>,
    /// Route keys currently regenerating
    inflight: Mutex<HashSet<String>>,
    /// Slugs the repository reported missing, and when
    not_found: Mutex<HashMap<String, Instant>>,
}

/// The two regenerable routes
#[derive(Clone)]
enum PageRoute {
    Index,
    Post(String),
}

impl PageRoute {
    fn key(&self) -> String {
        match self {
            PageRoute::Index => "index".to_string(),
            PageRoute::Post(uid) => format!("post/{}", uid),
        }
    }
}

/// Start the server
pub async fn start(app: &Spacetraveling, ip: &str, port: u16) -> Result<()> {
    let client = CmsClient::new(&app.config.repository)?;
    let generator = Generator::new(app.config.clone(), app.public_dir.clone(), client)?;

    let state = Arc::new(ServerState {
        config: app.config.clone(),
        public_dir: app.public_dir.clone(),
        generator,
        inflight: Mutex::new(HashSet::new()),
        not_found: Mutex::new(HashMap::new()),
    });

    let router = Router::new()
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Route requests to the list page, a post page or a static asset
async fn fallback_handler(
    axum::extract::State(state): axum::extract::State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();

    if path == "/" {
        return serve_page(&state, PageRoute::Index).await;
    }

    if let Some(uid) = post_uid(&path, &state.config.post_dir) {
        if !is_safe_slug(uid) {
            return not_found_response(&state).await;
        }
        let uid = uid.to_string();

        // A slug the repository already said does not exist answers 404
        // until its revalidation window passes
        {
            let mut known_missing = state.not_found.lock().await;
            if let Some(when) = known_missing.get(&uid) {
                if when.elapsed() < Duration::from_secs(state.config.revalidate.post) {
                    return not_found_response(&state).await;
                }
                known_missing.remove(&uid);
            }
        }

        return serve_page(&state, PageRoute::Post(uid)).await;
    }

    serve_static(&state, request).await
}

/// Extract the uid of a detail route like `/post/{uid}` or `/post/{uid}/`
fn post_uid<'a>(path: &'a str, post_dir: &str) -> Option<&'a str> {
    let rest = path
        .strip_prefix('/')?
        .strip_prefix(post_dir)?
        .strip_prefix('/')?;
    let uid = rest.strip_suffix('/').unwrap_or(rest);
    (!uid.is_empty() && !uid.contains('/')).then_some(uid)
}

/// Serve a generated page, regenerating in the background when needed
async fn serve_page(state: &Arc<ServerState>, route: PageRoute) -> Response {
    let (file, window) = match &route {
        PageRoute::Index => (
            state.public_dir.join("index.html"),
            state.config.revalidate.list,
        ),
        PageRoute::Post(uid) => (
            state
                .public_dir
                .join(&state.config.post_dir)
                .join(uid)
                .join("index.html"),
            state.config.revalidate.post,
        ),
    };

    match tokio::fs::read_to_string(&file).await {
        Ok(content) => {
            // Stale copies are served immediately; the refresh happens
            // off the request path
            if !is_fresh(&file, window) {
                spawn_regeneration(state.clone(), route);
            }
            Html(content).into_response()
        }
        Err(_) => {
            // Never generated: answer with the interim page and produce
            // the real one in the background
            spawn_regeneration(state.clone(), route);
            match tokio::fs::read_to_string(state.public_dir.join("fallback.html")).await {
                Ok(content) => Html(content).into_response(),
                Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "Carregando...").into_response(),
            }
        }
    }
}

/// Serve a static asset from the public directory
async fn serve_static(state: &Arc<ServerState>, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => {
            not_found_response(state).await
        }
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

async fn not_found_response(state: &Arc<ServerState>) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join("404.html")).await {
        Ok(content) => (StatusCode::NOT_FOUND, Html(content)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Whether a generated file is still inside its revalidation window
fn is_fresh(file: &Path, window_secs: u64) -> bool {
    let Ok(metadata) = std::fs::metadata(file) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    match modified.elapsed() {
        Ok(age) => age < Duration::from_secs(window_secs),
        // Clock moved backwards; treat the file as fresh
        Err(_) => true,
    }
}

/// Kick off one background regeneration for a route
///
/// At most one regeneration runs per route key; a request that finds
/// the key already in flight leaves the running one to finish.
fn spawn_regeneration(state: Arc<ServerState>, route: PageRoute) {
    tokio::spawn(async move {
        let key = route.key();
        {
            let mut inflight = state.inflight.lock().await;
            if !inflight.insert(key.clone()) {
                return;
            }
        }

        match &route {
            PageRoute::Index => {
                if let Err(err) = state.generator.generate_index().await {
                    tracing::warn!("index regeneration failed: {}", err);
                }
            }
            PageRoute::Post(uid) => match state.generator.generate_post(uid).await {
                Ok(()) => {
                    state.not_found.lock().await.remove(uid);
                }
                Err(err) if err.is_not_found() => {
                    tracing::info!("post {} not in repository, remembering 404", uid);
                    state
                        .not_found
                        .lock()
                        .await
                        .insert(uid.clone(), Instant::now());
                }
                Err(err) => {
                    tracing::warn!("regeneration of post {} failed: {}", uid, err);
                }
            },
        }

        state.inflight.lock().await.remove(&key);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_uid_extraction() {
        assert_eq!(post_uid("/post/meu-post", "post"), Some("meu-post"));
        assert_eq!(post_uid("/post/meu-post/", "post"), Some("meu-post"));
        assert_eq!(post_uid("/post/", "post"), None);
        assert_eq!(post_uid("/post/a/b", "post"), None);
        assert_eq!(post_uid("/style.css", "post"), None);
        assert_eq!(post_uid("/", "post"), None);
        // Custom detail route prefix
        assert_eq!(post_uid("/artigo/meu-post", "artigo"), Some("meu-post"));
        assert_eq!(post_uid("/post/meu-post", "artigo"), None);
    }

    #[test]
    fn test_missing_file_is_never_fresh() {
        assert!(!is_fresh(Path::new("/definitely/not/there.html"), 3600));
    }

    #[test]
    fn test_fresh_file_inside_window() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<html></html>").unwrap();
        assert!(is_fresh(&file, 3600));
        // A zero-second window makes everything stale
        assert!(!is_fresh(&file, 0));
    }
}
