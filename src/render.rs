//! Rendering: Markdown conversion and themed template output.
//!
//! ## Markdown
//!
//! Bodies are converted with [pulldown-cmark](https://docs.rs/pulldown-cmark)
//! with fenced code blocks, tables, footnotes and strikethrough enabled.
//! Fenced blocks carry their language as a `language-*` class, so syntax
//! highlighting is a theme concern (a client-side highlighter), not a
//! server one.
//!
//! ## Templates
//!
//! Themes are directories of Tera templates under
//! `<theme_dir>/<theme_name>/`. All `*.html` files are loaded once at
//! startup; a page picks its template by the `template` metadata key
//! (default `post`), and the auto-index listing uses `index`. Asking for a
//! template the theme doesn't ship is an internal error, surfaced as a 500
//! by the request handler.

use crate::config::SiteConfig;
use pulldown_cmark::{Options, Parser, html};
use tera::Tera;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("theme '{0}' has no templates")]
    EmptyTheme(String),
}

/// Template name used when a page's metadata doesn't name one.
pub const DEFAULT_PAGE_TEMPLATE: &str = "post";

/// Template name used for the auto-index listing.
pub const INDEX_TEMPLATE: &str = "index";

/// Convert a Markdown body to HTML.
pub fn markdown_to_html(body: &str) -> String {
    let options = Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(body, options);
    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// A loaded theme: the compiled template set for one theme directory.
pub struct Theme {
    tera: Tera,
    name: String,
}

impl Theme {
    /// Load every `*.html` template under the configured theme directory.
    ///
    /// Fails when the theme contains no templates at all; a theme that
    /// can't render anything is a deployment mistake better caught at
    /// startup than per request.
    pub fn load(config: &SiteConfig) -> Result<Self, RenderError> {
        let glob = format!("{}/**/*.html", config.theme_path().display());
        let tera = Tera::new(&glob)?;
        if tera.get_template_names().next().is_none() {
            return Err(RenderError::EmptyTheme(config.theme_name.clone()));
        }
        Ok(Self {
            tera,
            name: config.theme_name.clone(),
        })
    }

    /// Render a template by its base name (`post`, not `post.html`).
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, RenderError> {
        Ok(self.tera.render(&format!("{template}.html"), context)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
