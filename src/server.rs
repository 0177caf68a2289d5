//! Live gallery server.
//!
//! Every request re-lists the photo folders; the only state shared between
//! requests is the immutable [`AppState`] built at startup.
//!
//! ## Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | Home page, mobile or desktop layout |
//! | `GET /portfolio` | Portfolio photos (desktop set when empty) |
//! | `GET /api/photos?variant=` | JSON photo list, 400 on unknown variant |
//! | `GET /photos/{variant}/{file}` | Image bytes, cached for a year |
//! | `GET /media/{subdir}/{file}` | Same, also accepting legacy folder names |
//! | `GET /view/{variant}/{file}` | Single image viewer |
//! | `GET /view/{file}`, `GET /photos/{file}` | 301 to the desktop variant |
//! | `GET /static/...` | Stylesheet and scripts |
//! | `GET /debug` | Redacted environment, development mode only |
//! | anything else | 302 to `/` |

use crate::config::{RuntimeEnv, SitePaths};
use crate::diagnostics::{mask_value, redact_env};
use crate::render::{self, DebugPage, IndexPage, Layout};
use crate::scan::{self, ScanError};
use crate::types::{LinkScheme, Photo, PhotoManifest, Variant};
use axum::Router;
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

const PHOTO_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
const SCRIPT_CACHE_CONTROL: &str = "public, max-age=0, must-revalidate";
const SCRIPTS_PREFIX: &str = "/static/js/";

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<SitePaths>,
    pub env: Arc<RuntimeEnv>,
}

impl AppState {
    pub fn new(paths: SitePaths, env: RuntimeEnv) -> Self {
        Self {
            paths: Arc::new(paths),
            env: Arc::new(env),
        }
    }

    fn list(&self, variant: Variant) -> Result<Vec<Photo>, ScanError> {
        scan::list_photos(&self.paths.photos_dir(), variant)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(&'static str),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            AppError::Scan(err) => {
                log::error!("{err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.paths.static_dir);

    Router::new()
        .route("/", get(index))
        .route("/portfolio", get(portfolio))
        .route("/api/photos", get(api_photos))
        .route("/photos/{variant}/{filename}", get(photo_file))
        .route("/photos/{filename}", get(legacy_photo))
        .route("/media/{subdir}/{filename}", get(media_file))
        .route("/view/{variant}/{filename}", get(view_page))
        .route("/view/{filename}", get(legacy_view))
        .route("/debug", get(debug_page))
        .nest_service("/static", static_files)
        .fallback(fallback)
        .layer(middleware::from_fn(response_headers))
        .with_state(state)
}

/// Bind `address` and serve until Ctrl-C.
pub async fn serve(state: AppState, address: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    log::info!(
        "serving {} on http://{}",
        state.paths.static_dir.display(),
        listener.local_addr()?
    );
    if state.env.development {
        log::warn!("development mode: /debug is enabled");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {err}");
        return;
    }
    log::info!("shutting down");
}

// ============================================================================
// Layout detection
// ============================================================================

/// `force=mobile|desktop` wins; otherwise phones are mobile and tablets are
/// not.
pub fn detect_layout(force: Option<&str>, user_agent: &str) -> Layout {
    match force.map(str::to_lowercase).as_deref() {
        Some("mobile") => return Layout::Mobile,
        Some("desktop") => return Layout::Desktop,
        _ => {}
    }
    let is_phone = ["Mobile", "iPhone", "Android"]
        .iter()
        .any(|t| user_agent.contains(t));
    let is_tablet = ["iPad", "Tablet"].iter().any(|t| user_agent.contains(t));
    if is_phone && !is_tablet {
        Layout::Mobile
    } else {
        Layout::Desktop
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
struct IndexQuery {
    force: Option<String>,
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .unwrap_or_default();
    let desktop = state.list(Variant::Desktop)?;
    let mobile = state.list(Variant::Mobile)?;

    let page = IndexPage {
        layout: detect_layout(query.force.as_deref(), user_agent),
        desktop: &desktop,
        mobile: &mobile,
        contact_key: state.env.contact_key.as_deref(),
        stylesheet: &state.paths.stylesheet,
    };
    Ok(Html(render::render_index(&page).into_string()))
}

async fn portfolio(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut photos = state.list(Variant::Portfolio)?;
    if photos.is_empty() {
        photos = state.list(Variant::Desktop)?;
    }
    Ok(Html(
        render::render_portfolio(&photos, &state.paths.stylesheet).into_string(),
    ))
}

#[derive(Debug, Deserialize)]
struct ApiQuery {
    variant: Option<String>,
}

async fn api_photos(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<PhotoManifest>, AppError> {
    let variant = match query.variant.as_deref() {
        None => Variant::DEFAULT,
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest("invalid variant"))?,
    };
    let photos = state.list(variant)?;
    Ok(Json(PhotoManifest::new(
        variant,
        &photos,
        LinkScheme::Served,
    )))
}

async fn photo_file(
    State(state): State<AppState>,
    Path((variant, filename)): Path<(String, String)>,
    request: Request,
) -> Result<Response, AppError> {
    let variant = variant.parse().map_err(|_| AppError::NotFound)?;
    send_photo(&state, variant, &filename, request).await
}

async fn media_file(
    State(state): State<AppState>,
    Path((subdir, filename)): Path<(String, String)>,
    request: Request,
) -> Result<Response, AppError> {
    let variant = Variant::from_media_dir(&subdir).map_err(|_| AppError::NotFound)?;
    send_photo(&state, variant, &filename, request).await
}

async fn view_page(
    State(state): State<AppState>,
    Path((variant, filename)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let variant: Variant = variant.parse().map_err(|_| AppError::NotFound)?;
    if !is_safe_filename(&filename) {
        return Err(AppError::NotFound);
    }
    Ok(Html(
        render::render_view(variant, &filename, &state.paths.stylesheet).into_string(),
    ))
}

async fn legacy_view(Path(filename): Path<String>) -> Response {
    let target = Photo::new(Variant::DEFAULT, filename).view_url(LinkScheme::Served);
    redirect(StatusCode::MOVED_PERMANENTLY, &target)
}

async fn legacy_photo(Path(filename): Path<String>) -> Response {
    let target = Photo::new(Variant::DEFAULT, filename).url(LinkScheme::Served);
    redirect(StatusCode::MOVED_PERMANENTLY, &target)
}

#[derive(Debug, Deserialize)]
struct DebugQuery {
    access_key: Option<String>,
}

async fn debug_page(
    State(state): State<AppState>,
    Query(query): Query<DebugQuery>,
) -> Result<Html<String>, AppError> {
    if !state.env.development {
        return Err(AppError::NotFound);
    }
    let contact_key_masked = mask_value(state.env.contact_key.as_deref().unwrap_or_default());
    let env = redact_env(&state.env.vars);
    let page = DebugPage {
        contact_key_masked: &contact_key_masked,
        access_key_in_form: query.access_key.as_deref().unwrap_or_default(),
        env: &env,
    };
    Ok(Html(render::render_debug(&page).into_string()))
}

async fn fallback(State(state): State<AppState>, uri: Uri) -> Response {
    if state.env.development {
        log::warn!("404: {}", uri.path());
    }
    redirect(StatusCode::FOUND, "/")
}

// ============================================================================
// Helpers
// ============================================================================

/// A single plain, visible path component.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\', '\0'])
}

/// Stream one photo from disk. `ServeFile` sets the content type and
/// answers conditional and range requests.
async fn send_photo(
    state: &AppState,
    variant: Variant,
    filename: &str,
    request: Request,
) -> Result<Response, AppError> {
    if !is_safe_filename(filename) || !scan::is_photo_name(filename) {
        return Err(AppError::NotFound);
    }
    let path = state.paths.photos_dir().join(variant.as_str()).join(filename);
    let is_file = tokio::fs::metadata(&path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(AppError::NotFound);
    }

    let mut response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    };
    if response.status().is_success() || response.status() == StatusCode::NOT_MODIFIED {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(PHOTO_CACHE_CONTROL),
        );
    }
    Ok(response)
}

fn redirect(status: StatusCode, location: &str) -> Response {
    (status, [(header::LOCATION, location.to_string())]).into_response()
}

async fn response_headers(request: Request, next: Next) -> Response {
    let revalidate = request.uri().path().starts_with(SCRIPTS_PREFIX);
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    if revalidate {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(SCRIPT_CACHE_CONTROL),
        );
    }
    response
}
