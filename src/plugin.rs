//! Plugin hooks and the request-scoped context they operate on.
//!
//! Plugins are fixed variants implementing the [`Plugin`] trait, registered
//! at startup from the config `plugins` list. Each hook receives the
//! [`RequestContext`], one explicit struct threaded through the request
//! pipeline and mutated in place, plus the immutable site config.
//!
//! Hook points, in pipeline order:
//!
//! 1. [`Plugin::on_request`]: after the URL is known, before any content
//!    is loaded. A plugin can stash derived request state here.
//! 2. [`Plugin::on_pages`]: after the page index is built, before
//!    template rendering. A plugin can reorder, filter, or slice the list.
//!
//! A config entry naming an unknown plugin is skipped with a warning, not
//! an error: a missing plugin degrades the site, it doesn't take it down.

use crate::config::SiteConfig;
use crate::index::PageSummary;
use serde::Serialize;
use tracing::warn;

/// Request-scoped state threaded through every pipeline stage.
#[derive(Debug, Default)]
pub struct RequestContext {
    /// Request URL path.
    pub url: String,
    /// Whether this request renders the auto-index listing.
    pub is_index: bool,
    /// Raw `?page=` query value, if present.
    pub page_query: Option<String>,
    /// Listing page selected by the pagination plugin (1-based).
    pub current_page: Option<usize>,
    /// Page index for this request; plugins may slice or reorder it.
    pub pages: Vec<PageSummary>,
    /// Pagination state exposed to templates, when the plugin is active.
    pub pagination: Option<PaginationState>,
}

/// Pagination values templates read to render prev/next controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub current_page: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

/// A typed plugin hook set. Default impls are no-ops, so a plugin only
/// implements the stages it cares about.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn on_request(&self, _config: &SiteConfig, _ctx: &mut RequestContext) {}

    fn on_pages(&self, _config: &SiteConfig, _ctx: &mut RequestContext) {}
}

/// Build the plugin registry from configured plugin names.
///
/// Unknown names are logged and skipped.
pub fn build_registry(names: &[String]) -> Vec<Box<dyn Plugin>> {
    let mut registry: Vec<Box<dyn Plugin>> = Vec::new();
    for name in names {
        match name.as_str() {
            "pagination" => registry.push(Box::new(Pagination)),
            other => warn!(plugin = other, "unknown plugin in config, skipping"),
        }
    }
    registry
}

/// Slices the auto-index page list into fixed-size listing pages driven by
/// the `?page=N` query parameter.
pub struct Pagination;

impl Pagination {
    fn page_count(limit: usize, total: usize) -> usize {
        total.div_ceil(limit).max(1)
    }
}

impl Plugin for Pagination {
    fn name(&self) -> &'static str {
        "pagination"
    }

    /// Parse the requested listing page. Only the auto-index paginates;
    /// absent or unparseable values mean page 1.
    fn on_request(&self, _config: &SiteConfig, ctx: &mut RequestContext) {
        if !ctx.is_index {
            return;
        }
        let requested = ctx
            .page_query
            .as_deref()
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        ctx.current_page = Some(requested);
    }

    /// Clamp the requested page into range and slice the page list to its
    /// window.
    fn on_pages(&self, config: &SiteConfig, ctx: &mut RequestContext) {
        let Some(requested) = ctx.current_page else {
            return;
        };
        let limit = config.pagination_limit;
        let total_pages = Self::page_count(limit, ctx.pages.len());
        let current = requested.min(total_pages);

        let start = (current - 1) * limit;
        let end = (start + limit).min(ctx.pages.len());
        ctx.pages = ctx.pages[start.min(ctx.pages.len())..end].to_vec();

        ctx.current_page = Some(current);
        ctx.pagination = Some(PaginationState {
            current_page: current,
            has_prev_page: current > 1,
            has_next_page: current < total_pages,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries(n: usize) -> Vec<PageSummary> {
        (0..n)
            .map(|i| PageSummary {
                path: format!("{i}.md").into(),
                title: format!("Page {i}"),
                url: format!("/{i}"),
                author: String::new(),
                date: String::new(),
                description: String::new(),
            })
            .collect()
    }

    fn index_ctx(total: usize, page_query: Option<&str>) -> RequestContext {
        RequestContext {
            url: "/".to_string(),
            is_index: true,
            page_query: page_query.map(String::from),
            pages: summaries(total),
            ..RequestContext::default()
        }
    }

    fn run(config: &SiteConfig, ctx: &mut RequestContext) {
        let plugin = Pagination;
        plugin.on_request(config, ctx);
        plugin.on_pages(config, ctx);
    }

    #[test]
    fn registry_builds_known_plugins_and_skips_unknown() {
        let registry = build_registry(&[
            "pagination".to_string(),
            "no-such-plugin".to_string(),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry[0].name(), "pagination");
    }

    #[test]
    fn first_page_by_default() {
        let config = SiteConfig {
            pagination_limit: 10,
            ..SiteConfig::default()
        };
        let mut ctx = index_ctx(25, None);
        run(&config, &mut ctx);

        assert_eq!(ctx.pages.len(), 10);
        assert_eq!(ctx.pages[0].title, "Page 0");
        let pagination = ctx.pagination.unwrap();
        assert_eq!(pagination.current_page, 1);
        assert!(!pagination.has_prev_page);
        assert!(pagination.has_next_page);
    }

    #[test]
    fn middle_page_slices_its_window() {
        let config = SiteConfig {
            pagination_limit: 10,
            ..SiteConfig::default()
        };
        let mut ctx = index_ctx(25, Some("2"));
        run(&config, &mut ctx);

        assert_eq!(ctx.pages.len(), 10);
        assert_eq!(ctx.pages[0].title, "Page 10");
        let pagination = ctx.pagination.unwrap();
        assert!(pagination.has_prev_page);
        assert!(pagination.has_next_page);
    }

    #[test]
    fn last_page_is_short() {
        let config = SiteConfig {
            pagination_limit: 10,
            ..SiteConfig::default()
        };
        let mut ctx = index_ctx(25, Some("3"));
        run(&config, &mut ctx);

        assert_eq!(ctx.pages.len(), 5);
        let pagination = ctx.pagination.unwrap();
        assert!(pagination.has_prev_page);
        assert!(!pagination.has_next_page);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let config = SiteConfig {
            pagination_limit: 10,
            ..SiteConfig::default()
        };
        let mut ctx = index_ctx(25, Some("99"));
        run(&config, &mut ctx);

        assert_eq!(ctx.pages.len(), 5);
        assert_eq!(ctx.pagination.unwrap().current_page, 3);
    }

    #[test]
    fn garbage_page_query_means_page_one() {
        let config = SiteConfig::default();
        let mut ctx = index_ctx(5, Some("banana"));
        run(&config, &mut ctx);
        assert_eq!(ctx.pagination.unwrap().current_page, 1);
    }

    #[test]
    fn zero_page_query_means_page_one() {
        let config = SiteConfig::default();
        let mut ctx = index_ctx(5, Some("0"));
        run(&config, &mut ctx);
        assert_eq!(ctx.pagination.unwrap().current_page, 1);
    }

    #[test]
    fn empty_listing_still_reports_one_page() {
        let config = SiteConfig::default();
        let mut ctx = index_ctx(0, Some("4"));
        run(&config, &mut ctx);

        assert!(ctx.pages.is_empty());
        let pagination = ctx.pagination.unwrap();
        assert_eq!(pagination.current_page, 1);
        assert!(!pagination.has_prev_page);
        assert!(!pagination.has_next_page);
    }

    #[test]
    fn non_index_requests_are_untouched() {
        let config = SiteConfig::default();
        let mut ctx = RequestContext {
            url: "/post".to_string(),
            is_index: false,
            page_query: Some("2".to_string()),
            pages: summaries(25),
            ..RequestContext::default()
        };
        run(&config, &mut ctx);

        assert_eq!(ctx.pages.len(), 25);
        assert!(ctx.pagination.is_none());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(Pagination::page_count(10, 0), 1);
        assert_eq!(Pagination::page_count(10, 1), 1);
        assert_eq!(Pagination::page_count(10, 10), 1);
        assert_eq!(Pagination::page_count(10, 11), 2);
        assert_eq!(Pagination::page_count(10, 25), 3);
    }
}
