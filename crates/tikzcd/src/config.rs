//! Configuration types for markup generation and permalinks.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render and permalink settings.
//! - [`RenderConfig`] - Controls how markup is laid out.
//! - [`PermalinkConfig`] - Controls how permalinks are encoded and where they point.
//!
//! # Example
//!
//! ```
//! # use tikzcd::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.render().align());
//! assert!(config.permalink().compress());
//! assert_eq!(config.permalink().base_url(), None);
//! ```

use serde::Deserialize;

use crate::render::RenderOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Permalink configuration section.
    #[serde(default)]
    permalink: PermalinkConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(render: RenderConfig, permalink: PermalinkConfig) -> Self {
        Self { render, permalink }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the permalink configuration.
    pub fn permalink(&self) -> &PermalinkConfig {
        &self.permalink
    }
}

fn default_true() -> bool {
    true
}

/// Markup layout settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Pad columns to a common width.
    #[serde(default = "default_true")]
    align: bool,
}

impl RenderConfig {
    /// Creates a new [`RenderConfig`].
    pub fn new(align: bool) -> Self {
        Self { align }
    }

    /// Returns whether columns are aligned.
    pub fn align(&self) -> bool {
        self.align
    }

    /// Returns the [`RenderOptions`] these settings describe.
    pub fn options(&self) -> RenderOptions {
        RenderOptions::new(self.align)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { align: true }
    }
}

/// Permalink settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PermalinkConfig {
    /// Editor URL the payload is appended to, after a `#`.
    #[serde(default)]
    base_url: Option<String>,

    /// Use the lz-string encoding instead of plain base64.
    #[serde(default = "default_true")]
    compress: bool,
}

impl PermalinkConfig {
    /// Creates a new [`PermalinkConfig`].
    ///
    /// # Arguments
    ///
    /// * `base_url` - Editor URL that links point to, if any.
    /// * `compress` - Encode payloads with lz-string rather than base64.
    pub fn new(base_url: Option<String>, compress: bool) -> Self {
        Self { base_url, compress }
    }

    /// Returns the configured editor URL.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Returns whether payloads are compressed.
    pub fn compress(&self) -> bool {
        self.compress
    }
}

impl Default for PermalinkConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            compress: true,
        }
    }
}
