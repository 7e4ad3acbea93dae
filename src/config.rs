//! Site configuration module.
//!
//! Handles loading and validating `mica.toml`. Every option has a stock
//! default, so a site can run with no config file at all; the file only
//! needs to name the values it overrides.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Mica Site"
//! site_author = ""
//! site_description = "description"
//! base_url = "/"
//!
//! theme_dir = "theme"           # Directory holding theme folders
//! theme_name = "default"        # Theme folder to load templates from
//!
//! content_dir = "content"       # Content root
//! content_ext = ".md"           # Content file extension
//! ignore_files = []             # Relative paths excluded from the page index
//! not_found_file = "404"        # Basename (sans extension) served on misses
//! index_file = "index"          # Basename of the site index document
//! date_format = "%Y/%m/%d"      # How themes should present the date field
//!
//! static_dir = "static"         # Static asset directory
//! static_base_url = "/static"   # URL prefix static assets are served under
//!
//! cache_dir = ".cache"          # Rendered-output cache location
//! enable_cache = true
//!
//! auto_index = true             # Root URL renders the listing template
//! pagination_limit = 10         # Pages per listing page (pagination plugin)
//! plugins = []                  # Plugin names to register, e.g. ["pagination"]
//!
//! host = "127.0.0.1"
//! port = 5000
//! debug = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `mica.toml`.
///
/// All fields have stock defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, exposed to every template.
    pub site_title: String,
    /// Site author, exposed to every template.
    pub site_author: String,
    /// Site description, exposed to every template.
    pub site_description: String,
    /// Base URL prefix the site is served under.
    pub base_url: String,
    /// Directory holding theme folders.
    pub theme_dir: PathBuf,
    /// Theme folder (under `theme_dir`) to load templates from.
    pub theme_name: String,
    /// Content root directory.
    pub content_dir: PathBuf,
    /// Content file extension, including the dot.
    pub content_ext: String,
    /// Relative paths (within the content root) excluded from the page index.
    pub ignore_files: Vec<String>,
    /// Basename (sans extension) of the document served on content misses.
    pub not_found_file: String,
    /// Basename (sans extension) of the site index document.
    pub index_file: String,
    /// Date format string themes should use to present the `date` field.
    pub date_format: String,
    /// Static asset directory.
    pub static_dir: PathBuf,
    /// URL prefix static assets are served under.
    pub static_base_url: String,
    /// Directory rendered-output cache files are written to.
    pub cache_dir: PathBuf,
    /// Whether the rendered-output cache is consulted and written at all.
    pub enable_cache: bool,
    /// Whether the root URL renders the listing template instead of a page.
    pub auto_index: bool,
    /// Pages per listing page, consumed by the pagination plugin.
    pub pagination_limit: usize,
    /// Plugin names to register at startup.
    pub plugins: Vec<String>,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Debug mode: lowers the default log filter to `debug`.
    pub debug: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Mica Site".to_string(),
            site_author: String::new(),
            site_description: "description".to_string(),
            base_url: "/".to_string(),
            theme_dir: PathBuf::from("theme"),
            theme_name: "default".to_string(),
            content_dir: PathBuf::from("content"),
            content_ext: ".md".to_string(),
            ignore_files: Vec::new(),
            not_found_file: "404".to_string(),
            index_file: "index".to_string(),
            date_format: "%Y/%m/%d".to_string(),
            static_dir: PathBuf::from("static"),
            static_base_url: "/static".to_string(),
            cache_dir: PathBuf::from(".cache"),
            enable_cache: true,
            auto_index: true,
            pagination_limit: 10,
            plugins: Vec::new(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

impl SiteConfig {
    /// Load config from a TOML file. A missing file yields the stock
    /// defaults; a present-but-malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination_limit == 0 {
            return Err(ConfigError::Validation(
                "pagination_limit must be at least 1".into(),
            ));
        }
        if !self.content_ext.starts_with('.') || self.content_ext.len() < 2 {
            return Err(ConfigError::Validation(
                "content_ext must start with a dot, e.g. \".md\"".into(),
            ));
        }
        if self.theme_name.is_empty() {
            return Err(ConfigError::Validation(
                "theme_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Filename of the not-found document, e.g. `404.md`.
    pub fn not_found_filename(&self) -> String {
        format!("{}{}", self.not_found_file, self.content_ext)
    }

    /// Filename of the site index document, e.g. `index.md`.
    pub fn index_filename(&self) -> String {
        format!("{}{}", self.index_file, self.content_ext)
    }

    /// Directory the active theme's templates live in.
    pub fn theme_path(&self) -> PathBuf {
        self.theme_dir.join(&self.theme_name)
    }
}

/// A stock `mica.toml` with every option present and documented.
///
/// Printed by `mica gen-config` so users can start from a complete,
/// commented file instead of the docs.
pub fn stock_config_toml() -> String {
    let defaults = SiteConfig::default();
    format!(
        r#"# mica site configuration
# Every option is optional; the values below are the stock defaults.

# Identity - exposed to every template.
site_title = {site_title:?}
site_author = {site_author:?}
site_description = {site_description:?}
base_url = {base_url:?}

# Theme. Templates are loaded from <theme_dir>/<theme_name>/*.html.
theme_dir = {theme_dir:?}
theme_name = {theme_name:?}

# Content. Files under content_dir with content_ext are served; files
# whose basename starts with '~' or '#' are skipped in listings, as are
# the not-found file, the index file, and anything in ignore_files.
content_dir = {content_dir:?}
content_ext = {content_ext:?}
ignore_files = []
not_found_file = {not_found_file:?}
index_file = {index_file:?}
date_format = {date_format:?}

# Static assets.
static_dir = {static_dir:?}
static_base_url = {static_base_url:?}

# Rendered-output cache. Grows unbounded; safe to delete at any time.
cache_dir = {cache_dir:?}
enable_cache = true

# Listing behaviour.
auto_index = true
pagination_limit = {pagination_limit}
plugins = []

# Server.
host = {host:?}
port = {port}
debug = false
"#,
        site_title = defaults.site_title,
        site_author = defaults.site_author,
        site_description = defaults.site_description,
        base_url = defaults.base_url,
        theme_dir = defaults.theme_dir.display().to_string(),
        theme_name = defaults.theme_name,
        content_dir = defaults.content_dir.display().to_string(),
        content_ext = defaults.content_ext,
        not_found_file = defaults.not_found_file,
        index_file = defaults.index_file,
        date_format = defaults.date_format,
        static_dir = defaults.static_dir.display().to_string(),
        static_base_url = defaults.static_base_url,
        cache_dir = defaults.cache_dir.display().to_string(),
        pagination_limit = defaults.pagination_limit,
        host = defaults.host,
        port = defaults.port,
    )
}
