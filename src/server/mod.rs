//! HTTP server: JSON content API plus the generated site

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::cache::ContentCache;
use crate::commands::generate;
use crate::content::{extract_headings, BlogPost, Collection, Heading, Project};
use crate::Site;

/// Shared state of the server
pub struct ServerState {
    site: Site,
    cache: ContentCache,
}

impl ServerState {
    pub fn new(site: &Site) -> Self {
        Self {
            site: site.clone(),
            cache: ContentCache::new(site.loader()).with_search_options(site.search_options()),
        }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }
}

/// Create the router: `/api/*` endpoints, everything else from the public
/// directory with `404.html` as the not-found page.
pub fn create_router(state: Arc<ServerState>) -> Router {
    let public_dir = &state.site.public_dir;
    let static_files =
        ServeDir::new(public_dir).not_found_service(ServeFile::new(public_dir.join("404.html")));

    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/posts/:slug/headings", get(post_headings))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:slug", get(get_project))
        .route("/api/projects/:slug/headings", get(project_headings))
        .route("/api/search", get(search_posts))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(site));
    let app = create_router(Arc::clone(&state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    if watch {
        let site = site.clone();
        let state = Arc::clone(&state);
        tokio::task::spawn_blocking(move || {
            let result = generate::watch(&site, || state.cache().invalidate());
            if let Err(e) = result {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Handler error, rendered as a JSON body
enum AppError {
    NotFound(String),
    Internal(anyhow::Error),
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

fn not_found(collection: Collection, slug: &str) -> AppError {
    AppError::NotFound(format!("No {} found with slug {:?}", collection.as_str(), slug))
}

type ApiResult<T> = std::result::Result<Json<T>, AppError>;

/// Run content access off the async runtime; it walks directories and
/// reads files.
async fn blocking<T, F>(state: Arc<ServerState>, f: F) -> ApiResult<T>
where
    F: FnOnce(&ServerState) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state)).await?
}

async fn list_posts(State(state): State<Arc<ServerState>>) -> ApiResult<Vec<BlogPost>> {
    blocking(state, |state| Ok(Json(state.cache.posts()?.to_vec()))).await
}

async fn get_post(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> ApiResult<BlogPost> {
    blocking(state, move |state| {
        state
            .cache
            .loader()
            .get_blog_post(&slug)?
            .map(Json)
            .ok_or_else(|| not_found(Collection::Posts, &slug))
    })
    .await
}

async fn list_projects(State(state): State<Arc<ServerState>>) -> ApiResult<Vec<Project>> {
    blocking(state, |state| Ok(Json(state.cache.projects()?.to_vec()))).await
}

async fn get_project(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> ApiResult<Project> {
    blocking(state, move |state| {
        state
            .cache
            .loader()
            .get_project(&slug)?
            .map(Json)
            .ok_or_else(|| not_found(Collection::Projects, &slug))
    })
    .await
}

async fn post_headings(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> ApiResult<Vec<Heading>> {
    blocking(state, move |state| headings(state, Collection::Posts, &slug)).await
}

async fn project_headings(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> ApiResult<Vec<Heading>> {
    blocking(state, move |state| headings(state, Collection::Projects, &slug)).await
}

fn headings(state: &ServerState, collection: Collection, slug: &str) -> ApiResult<Vec<Heading>> {
    let record = state
        .cache
        .loader()
        .get(collection, slug)?
        .ok_or_else(|| not_found(collection, slug))?;

    Ok(Json(extract_headings(record.content())))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// A ranked post in search results
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    slug: String,
    title: String,
    description: String,
    category: String,
    date: String,
    reading_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

async fn search_posts(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<SearchResult>> {
    blocking(state, move |state| {
        let index = state.cache.post_index()?;

        let results = index
            .search(&params.q)
            .into_iter()
            .map(|hit| SearchResult {
                slug: hit.item.slug.clone(),
                title: hit.item.title.clone(),
                description: hit.item.description.clone(),
                category: hit.item.category.clone(),
                date: hit.item.date.clone(),
                reading_time: hit.item.reading_time,
                score: hit.score,
            })
            .collect();

        Ok(Json(results))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tower::ServiceExt;

    fn test_site() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::create_dir_all(&site.projects_dir).unwrap();
        fs::write(
            site.posts_dir.join("terraform-state.md"),
            "---\ntitle: Terraform State Best Practices\ndate: 2024-06-01\ncategory: Infrastructure\n---\n## Remote State\n\nLock it.\n",
        )
        .unwrap();
        fs::write(
            site.posts_dir.join("rust-ownership.md"),
            "---\ntitle: Rust Ownership Explained\ndate: 2024-01-01\n---\nBorrowing.\n",
        )
        .unwrap();
        fs::write(
            site.projects_dir.join("homelab.md"),
            "---\ntitle: Homelab\ntags: [proxmox]\npinned: true\n---\n# Hardware\n",
        )
        .unwrap();

        (dir, site)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn app(site: &Site) -> Router {
        create_router(Arc::new(ServerState::new(site)))
    }

    #[tokio::test]
    async fn test_list_posts_newest_first() {
        let (_dir, site) = test_site();
        let (status, body) = get_json(app(&site), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["slug"], "terraform-state");
        assert_eq!(body[1]["slug"], "rust-ownership");
        assert_eq!(body[0]["readingTime"], 1);
    }

    #[tokio::test]
    async fn test_get_project_and_missing_project() {
        let (_dir, site) = test_site();

        let (status, body) = get_json(app(&site), "/api/projects/homelab").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tags"][0], "proxmox");
        assert_eq!(body["pinned"], true);

        let (status, body) = get_json(app(&site), "/api/projects/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("does-not-exist"));

        let (status, _) = get_json(app(&site), "/api/posts/a%00b").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_headings_endpoint() {
        let (_dir, site) = test_site();

        let (status, body) = get_json(app(&site), "/api/posts/terraform-state/headings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "remote-state");
        assert_eq!(body[0]["level"], 2);

        let (status, _) = get_json(app(&site), "/api/posts/missing/headings").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let (_dir, site) = test_site();

        let (status, body) = get_json(app(&site), "/api/search?q=terrraform").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["slug"], "terraform-state");
        assert!(body[0]["score"].is_number());

        let (_, body) = get_json(app(&site), "/api/search").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert!(body[0].get("score").is_none());
    }

    #[tokio::test]
    async fn test_search_reuses_cached_index() {
        let (_dir, site) = test_site();
        let state = Arc::new(ServerState::new(&site));
        let app = create_router(Arc::clone(&state));

        get_json(app.clone(), "/api/search?q=rust").await;
        let first = state.cache().post_index().unwrap();
        get_json(app, "/api/search?q=terraform").await;
        let second = state.cache().post_index().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_malformed_post_is_server_error() {
        let (_dir, site) = test_site();
        fs::write(site.posts_dir.join("broken.md"), "---\ntitle: [oops\n---\n").unwrap();

        let (status, _) = get_json(app(&site), "/api/posts/broken").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        // The collection listing skips it
        let (status, body) = get_json(app(&site), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_static_files_and_not_found_page() {
        let (_dir, site) = test_site();
        site.generate().unwrap();

        let app = app(&site);
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/blog/rust-ownership/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("<h1>404</h1>"));
    }
}
