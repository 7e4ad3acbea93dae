//! # Mica
//!
//! A minimal flat-file blog server. Your filesystem is the database:
//! Markdown files under a content directory become pages, an optional
//! `/* key: value */` header at the top of each file carries its metadata,
//! and themes are plain directories of Tera templates.
//!
//! # Architecture: One Pipeline Per Request
//!
//! Every request runs the same stages, front to back:
//!
//! ```text
//! URL → resolve → cache gate → load + split → markdown → index walk
//!     → plugins → template → cache store → response
//! ```
//!
//! There is no build step and no persistent index. Editing a file on disk
//! is the entire publishing workflow: its stat signature changes, the
//! cache gate misses, and the next request serves the fresh render.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `mica.toml` loading, defaults, validation |
//! | [`content`] | Metadata block splitting and `key: value` header parsing |
//! | [`resolve`] | URL → content file mapping (`x.md`, then `x/index.md`) |
//! | [`index`] | Full-tree walk producing the sorted page list |
//! | [`cache`] | Stat-fingerprint keyed cache of rendered output |
//! | [`render`] | Markdown conversion and Tera theme templates |
//! | [`plugin`] | Typed plugin hooks and the request-scoped context |
//! | [`server`] | actix-web routes and the request pipeline |
//!
//! # Design Decisions
//!
//! ## Stat Fingerprints Over Content Hashes
//!
//! The cache key hashes `(mtime, size, path)`, not file contents, so a
//! lookup costs one `stat` instead of a full read. The trade-off is that
//! a `git checkout` (which rewrites mtimes) re-renders everything, cheap
//! for text, and that superseded entries accumulate until the cache
//! directory is deleted. A stale entry can never be served: its key simply
//! stops being computed.
//!
//! ## Tera Over Compile-Time Templates
//!
//! Themes must be swappable without recompiling the server, so templates
//! are runtime files loaded from `<theme_dir>/<theme_name>/`. Tera's
//! Jinja-style syntax keeps themes editable by people who never touch
//! Rust.
//!
//! ## Fixed Plugin Variants Over Dynamic Loading
//!
//! Plugins are enum-like: known implementations of a typed [`plugin::Plugin`]
//! trait, selected by name in the config. No dynamic loading, no
//! hook-by-string dispatch, and an unknown name is a logged warning rather
//! than a silent no-op.

pub mod cache;
pub mod config;
pub mod content;
pub mod index;
pub mod plugin;
pub mod render;
pub mod resolve;
pub mod server;
