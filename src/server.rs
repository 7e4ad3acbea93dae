//! HTTP surface: route table and the request pipeline.
//!
//! Every content request runs the same pipeline:
//!
//! ```text
//! resolve path → cache lookup ──hit──→ serve cached bytes
//!        │               │
//!        │              miss
//!        ▼               ▼
//!   404 substitute   read file → split/parse metadata → markdown
//!                        → build page index → plugin hooks
//!                        → template render → cache store → respond
//! ```
//!
//! The pipeline is synchronous and blocking by design: file reads, the
//! directory walk, and cache writes all run on the handling worker.
//! actix-web supplies the worker pool; the pipeline itself holds no shared
//! mutable state beyond the cache directory, where writes are atomic
//! renames and last write wins.
//!
//! Responses on both the hit and miss paths carry the same headers:
//! `ETag` set to the cache fingerprint and `Cache-Control: public,
//! max-age=600`. Misses that cannot be cached (404 substitutes, the
//! auto-index listing) get the cache-control header but no etag.
//!
//! Internal errors are logged and collapse to a terse 500; the error text
//! never reaches the client.

use crate::cache::{self, CacheStats};
use crate::config::SiteConfig;
use crate::content;
use crate::index::{self, IndexError, PageSummary, SortKey};
use crate::plugin::{self, Plugin, RequestContext};
use crate::render::{self, RenderError, Theme, DEFAULT_PAGE_TEMPLATE, INDEX_TEMPLATE};
use crate::resolve;
use actix_files::Files;
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index error: {0}")]
    Index(#[from] IndexError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Shared application state: config, the loaded theme, the plugin
/// registry, and process-lifetime cache counters.
pub struct AppState {
    pub config: SiteConfig,
    pub theme: Theme,
    pub plugins: Vec<Box<dyn Plugin>>,
    pub stats: CacheStats,
}

impl AppState {
    /// Assemble state from a validated config: load the theme templates
    /// and register the configured plugins.
    pub fn from_config(config: SiteConfig) -> Result<Self, RenderError> {
        let theme = Theme::load(&config)?;
        let plugins = plugin::build_registry(&config.plugins);
        Ok(Self {
            config,
            theme,
            plugins,
            stats: CacheStats::default(),
        })
    }
}

/// Build the route table for an actix `App`.
///
/// Registration order matters: the root and favicon routes must precede
/// the catch-all content route, and the static mount shadows the content
/// namespace under its own prefix.
pub fn configure(state: web::Data<AppState>) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg| {
        let static_url = state.config.static_base_url.clone();
        let static_dir = state.config.static_dir.clone();
        cfg.app_data(state.clone())
            .service(Files::new(&static_url, static_dir))
            .route("/favicon.ico", web::get().to(favicon))
            .route("/", web::get().to(root))
            .route("/{path:.*}", web::get().to(content_page));
    }
}

/// `GET /favicon.ico`: redirect into the static mount.
async fn favicon(state: web::Data<AppState>) -> HttpResponse {
    let base = state.config.static_base_url.trim_end_matches('/');
    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("{base}/favicon.ico")))
        .finish()
}

/// `GET /`: the auto-index listing, or the site index document when
/// auto-index is disabled.
async fn root(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let is_index = state.config.auto_index;
    run_pipeline(&state, "/".to_string(), query.into_inner(), is_index)
}

/// `GET /<any-path>`: resolved against the content directory.
async fn content_page(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let url = format!("/{}", path.into_inner());
    run_pipeline(&state, url, query.into_inner(), false)
}

fn run_pipeline(
    state: &AppState,
    url: String,
    query: HashMap<String, String>,
    is_index: bool,
) -> HttpResponse {
    let page_query = query.get("page").cloned();
    match respond(state, url.clone(), page_query, is_index) {
        Ok(response) => {
            info!(
                url = %url,
                status = response.status().as_u16(),
                cache = %state.stats,
                "served"
            );
            response
        }
        Err(err) => {
            error!(url = %url, error = %err, "request pipeline failed");
            HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body("<h1>Internal Server Error</h1>")
        }
    }
}

/// The content pipeline proper. Returns a response or an internal error;
/// content-not-found is handled inside (substitute document, status 404).
fn respond(
    state: &AppState,
    url: String,
    page_query: Option<String>,
    is_index: bool,
) -> Result<HttpResponse, PipelineError> {
    let config = &state.config;
    let mut ctx = RequestContext {
        url,
        is_index,
        page_query,
        ..RequestContext::default()
    };
    for plugin in &state.plugins {
        plugin.on_request(config, &mut ctx);
    }

    // Resolve the URL to a file; misses substitute the not-found document.
    let mut status = StatusCode::OK;
    let mut file_path: Option<PathBuf> = None;
    if !is_index {
        match resolve::resolve(&config.content_dir, &ctx.url, &config.content_ext) {
            Some(path) => file_path = Some(path),
            None => {
                let not_found = config.content_dir.join(config.not_found_filename());
                if !not_found.is_file() {
                    debug!(url = %ctx.url, "no content and no not-found document");
                    return Ok(content_response(StatusCode::NOT_FOUND, Vec::new(), None));
                }
                status = StatusCode::NOT_FOUND;
                file_path = Some(not_found);
            }
        }
    }

    // Cache gate: successful content responses only. The fingerprint is
    // computed before rendering; on a hit the rest of the pipeline never
    // runs.
    let mut fingerprint: Option<String> = None;
    if config.enable_cache && status == StatusCode::OK {
        if let Some(path) = &file_path {
            let fp = cache::fingerprint(path)?;
            if let Some(bytes) = cache::lookup(&config.cache_dir, &fp) {
                state.stats.hit();
                debug!(url = %ctx.url, fingerprint = %fp, "cache hit");
                return Ok(content_response(status, bytes, Some(&fp)));
            }
            debug!(url = %ctx.url, fingerprint = %fp, "cache miss");
            fingerprint = Some(fp);
        }
    }

    // Load and convert the document body.
    let (meta, content_html) = match &file_path {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            let (meta_str, body) = content::split_content(&raw);
            (content::parse_meta(meta_str), render::markdown_to_html(body))
        }
        None => (content::MetaMap::new(), String::new()),
    };

    // Full walk on every request; plugins may slice the result afterwards.
    ctx.pages = index::build_index(config, SortKey::Date, true)?;

    // Navigation context against the unsliced, date-descending list.
    let mut current_page: Option<PageSummary> = None;
    let mut prev_page: Option<PageSummary> = None;
    let mut next_page: Option<PageSummary> = None;
    let mut is_front_page = false;
    let mut is_tail_page = false;
    if status == StatusCode::OK {
        if let Some(path) = &file_path {
            if let Some(pos) = ctx.pages.iter().position(|p| p.path == *path) {
                current_page = Some(ctx.pages[pos].clone());
                if pos == 0 {
                    is_front_page = true;
                } else {
                    prev_page = Some(ctx.pages[pos - 1].clone());
                }
                if pos == ctx.pages.len() - 1 {
                    is_tail_page = true;
                } else {
                    next_page = Some(ctx.pages[pos + 1].clone());
                }
            }
        }
    }

    for plugin in &state.plugins {
        plugin.on_pages(config, &mut ctx);
    }

    // Pick the template: listing for the auto-index, otherwise the page's
    // `template` header with a stock fallback.
    let template = if is_index {
        INDEX_TEMPLATE.to_string()
    } else {
        meta.get("template")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PAGE_TEMPLATE.to_string())
    };

    let mut tera_ctx = tera::Context::new();
    tera_ctx.insert("site_title", &config.site_title);
    tera_ctx.insert("site_author", &config.site_author);
    tera_ctx.insert("site_description", &config.site_description);
    tera_ctx.insert("base_url", &config.base_url);
    tera_ctx.insert("static_base_url", &config.static_base_url);
    tera_ctx.insert("date_format", &config.date_format);
    tera_ctx.insert("meta", &meta);
    tera_ctx.insert("content", &content_html);
    tera_ctx.insert("pages", &ctx.pages);
    tera_ctx.insert("current_page", &current_page);
    tera_ctx.insert("prev_page", &prev_page);
    tera_ctx.insert("next_page", &next_page);
    tera_ctx.insert("is_front_page", &is_front_page);
    tera_ctx.insert("is_tail_page", &is_tail_page);
    tera_ctx.insert("pagination", &ctx.pagination);

    let html = state.theme.render(&template, &tera_ctx)?;

    if let Some(fp) = &fingerprint {
        state.stats.miss();
        if let Err(err) = cache::store(&config.cache_dir, fp, html.as_bytes()) {
            // A failed cache write degrades to rendering again next time
            warn!(fingerprint = %fp, error = %err, "cache write failed");
        }
    }

    Ok(content_response(status, html.into_bytes(), fingerprint.as_deref()))
}

/// Response assembly shared by the hit and miss paths, so both carry the
/// same cache headers.
fn content_response(status: StatusCode, body: Vec<u8>, etag: Option<&str>) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    builder.content_type("text/html; charset=utf-8");
    builder.insert_header((header::CACHE_CONTROL, "public, max-age=600"));
    if let Some(tag) = etag {
        builder.insert_header((header::ETAG, format!("\"{tag}\"")));
    }
    builder.body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_response_sets_cache_headers() {
        let response = content_response(StatusCode::OK, b"hi".to_vec(), Some("abc"));
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=600"
        );
        assert_eq!(headers.get(header::ETAG).unwrap(), "\"abc\"");
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn content_response_without_etag() {
        let response = content_response(StatusCode::NOT_FOUND, Vec::new(), None);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::ETAG).is_none());
        assert!(response.headers().get(header::CACHE_CONTROL).is_some());
    }
}
