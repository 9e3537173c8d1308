//! HTTP server for the rendered site
//!
//! Pages are cached in-process for their revalidation window. Once an entry
//! goes stale it is still served while a background task refetches it.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cache::{Lookup, RevalidateCache};
use crate::config::SiteConfig;
use crate::content::{CacheDirective, ContentFetcher, ContentItem, FetchError, Fetched};
use crate::sanitize::{SanitizationPolicy, Sanitizer};
use crate::templates::TemplateRenderer;
use crate::Site;

const LISTING_KEY: &str = "";

/// Shared server state
pub struct AppState {
    config: SiteConfig,
    fetcher: ContentFetcher,
    renderer: TemplateRenderer,
    policy: SanitizationPolicy,
    pages: RevalidateCache<Fetched<ContentItem>>,
    listing: RevalidateCache<Fetched<Vec<ContentItem>>>,
    refreshing: Mutex<HashSet<String>>,
}

impl AppState {
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            config: site.config.clone(),
            fetcher: site.fetcher()?,
            renderer: TemplateRenderer::new()?,
            policy: site.policy(),
            pages: RevalidateCache::default(),
            listing: RevalidateCache::new(1),
            refreshing: Mutex::new(HashSet::new()),
        })
    }

    /// Page by slug, from cache when possible
    async fn page(self: &Arc<Self>, slug: &str) -> Result<Fetched<ContentItem>, FetchError> {
        match self.pages.lookup(slug) {
            Lookup::Fresh(fetched) => Ok(fetched),
            Lookup::Stale(fetched) => {
                if self.begin_refresh(slug) {
                    let state = Arc::clone(self);
                    let slug = slug.to_string();
                    tokio::spawn(async move {
                        if let Err(e) = state.fetch_page(&slug).await {
                            tracing::warn!("Background refresh of `{}` failed: {}", slug, e);
                        }
                        state.end_refresh(&slug);
                    });
                }
                Ok(fetched)
            }
            Lookup::Miss => self.fetch_page(slug).await,
        }
    }

    async fn fetch_page(&self, slug: &str) -> Result<Fetched<ContentItem>, FetchError> {
        match self.fetcher.fetch_by_slug(slug).await {
            Ok(fetched) => {
                self.pages
                    .insert(slug, fetched.clone(), fetched.directive.revalidate);
                let stats = self.pages.stats();
                tracing::debug!(
                    "Page cache: {}/{} entries, {} stale",
                    stats.total,
                    stats.max,
                    stats.stale
                );
                Ok(fetched)
            }
            Err(e) => {
                if e.is_not_found() {
                    self.pages.invalidate(slug);
                }
                Err(e)
            }
        }
    }

    /// All pages, from cache when possible
    async fn listing(self: &Arc<Self>) -> Result<Fetched<Vec<ContentItem>>, FetchError> {
        match self.listing.lookup(LISTING_KEY) {
            Lookup::Fresh(fetched) => Ok(fetched),
            Lookup::Stale(fetched) => {
                // Slugs cannot be empty, so the listing key never collides with a page
                if self.begin_refresh(LISTING_KEY) {
                    let state = Arc::clone(self);
                    tokio::spawn(async move {
                        if let Err(e) = state.fetch_listing().await {
                            tracing::warn!("Background refresh of page list failed: {}", e);
                        }
                        state.end_refresh(LISTING_KEY);
                    });
                }
                Ok(fetched)
            }
            Lookup::Miss => self.fetch_listing().await,
        }
    }

    async fn fetch_listing(&self) -> Result<Fetched<Vec<ContentItem>>, FetchError> {
        let fetched = self.fetcher.fetch_all().await?;
        self.listing
            .insert(LISTING_KEY, fetched.clone(), fetched.directive.revalidate);
        Ok(fetched)
    }

    /// Returns false when a refresh for `key` is already running
    fn begin_refresh(&self, key: &str) -> bool {
        match self.refreshing.lock() {
            Ok(mut keys) => keys.insert(key.to_string()),
            Err(_) => false,
        }
    }

    fn end_refresh(&self, key: &str) {
        if let Ok(mut keys) = self.refreshing.lock() {
            keys.remove(key);
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>, public_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/:slug", get(page_handler))
        .nest_service("/static", ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(site)?);
    let app = router(state, &site.public_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Content API: {}", site.config.api.base_url);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.listing().await {
        Ok(fetched) => {
            let rendered = state.renderer.render_index(&state.config, &fetched.value);
            html_response(&state, rendered, &fetched.directive)
        }
        Err(e) => error_response(&state, &e),
    }
}

async fn page_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.page(&slug).await {
        Ok(fetched) => {
            let sanitizer = Sanitizer::new(&state.policy);
            let rendered = state
                .renderer
                .render_page(&state.config, &fetched.value, &sanitizer);
            html_response(&state, rendered, &fetched.directive)
        }
        Err(e) => error_response(&state, &e),
    }
}

fn html_response(
    state: &AppState,
    rendered: Result<String>,
    directive: &CacheDirective,
) -> Response {
    match rendered {
        Ok(body) => {
            let mut response = Html(body).into_response();
            if let Ok(value) = HeaderValue::from_str(&directive.header_value()) {
                response.headers_mut().insert(header::CACHE_CONTROL, value);
            }
            response
        }
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            error_page(state, StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
        }
    }
}

fn error_response(state: &AppState, error: &FetchError) -> Response {
    match error {
        FetchError::NotFound(slug) => {
            tracing::debug!("No page for slug `{}`", slug);
            error_page(state, StatusCode::NOT_FOUND, "This page could not be found.")
        }
        FetchError::Upstream(e) => {
            tracing::error!("Content API error: {}", e);
            error_page(
                state,
                StatusCode::BAD_GATEWAY,
                "Content is temporarily unavailable.",
            )
        }
    }
}

fn error_page(state: &AppState, status: StatusCode, message: &str) -> Response {
    let mut response = match state
        .renderer
        .render_error(&state.config, status.as_u16(), message)
    {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Render of error page failed: {:#}", e);
            (status, message.to_string()).into_response()
        }
    };
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
