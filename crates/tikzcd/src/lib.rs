//! tikzcd - Convert between commutative-diagram markup and a grid diagram model.
//!
//! Parsing, markup generation and permalink encoding for diagrams written
//! with the `tikz-cd` LaTeX package.

pub mod codec;
pub mod config;
pub mod render;

mod error;

pub use tikzcd_core::{geometry, identifier, semantic};

pub use error::TikzcdError;
pub use render::{RenderOptions, render};

use log::{debug, info, trace};

use config::AppConfig;
use identifier::{IdSource, SequentialIds};

/// Converter between markup, diagrams and permalinks.
///
/// # Examples
///
/// ```rust
/// use tikzcd::{Converter, config::AppConfig};
///
/// let source = r#"\begin{tikzcd} A \arrow[r, "f"] & B \end{tikzcd}"#;
///
/// let converter = Converter::new(AppConfig::default());
///
/// // Parse markup to the semantic model
/// let diagram = converter.parse(source)
///     .expect("Failed to parse");
///
/// // Render it back
/// let markup = converter.render(&diagram);
/// assert!(markup.contains(r#"\arrow[r, "f"]"#));
///
/// // Or share it as a permalink payload
/// let link = converter.to_permalink(&diagram).expect("Failed to encode");
/// let decoded = converter.from_permalink(&link).expect("Failed to decode");
/// assert!(decoded.equivalent(&diagram));
/// ```
#[derive(Debug, Default)]
pub struct Converter {
    config: AppConfig,
}

impl Converter {
    /// Create a new converter with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this converter was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse markup into a semantic diagram, numbering nodes from zero.
    ///
    /// # Errors
    ///
    /// Returns [`TikzcdError::Parse`] carrying the diagnostic and the source.
    pub fn parse(&self, source: &str) -> Result<semantic::Diagram, TikzcdError> {
        self.parse_with_ids(source, &mut SequentialIds::default())
    }

    /// Parse markup into a semantic diagram, drawing node ids from `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`TikzcdError::Parse`] carrying the diagnostic and the source.
    pub fn parse_with_ids(
        &self,
        source: &str,
        ids: &mut impl IdSource,
    ) -> Result<semantic::Diagram, TikzcdError> {
        info!("Parsing diagram");

        let diagram = tikzcd_parser::parse_with_ids(source, ids)
            .map_err(|err| TikzcdError::new_parse_error(err, source))?;

        debug!(
            nodes = diagram.node_count(),
            edges = diagram.edge_count();
            "Diagram parsed successfully"
        );
        trace!(diagram:?; "Parsed diagram");

        Ok(diagram)
    }

    /// Render a diagram to markup using the configured options.
    pub fn render(&self, diagram: &semantic::Diagram) -> String {
        render(diagram, &self.config.render().options())
    }

    /// Render a diagram, preceded by a `% <permalink>` comment line when an
    /// editor base URL is configured.
    ///
    /// # Errors
    ///
    /// Returns [`TikzcdError::Codec`] if the permalink cannot be encoded.
    pub fn render_with_permalink(&self, diagram: &semantic::Diagram) -> Result<String, TikzcdError> {
        let markup = self.render(diagram);
        if self.config.permalink().base_url().is_none() {
            return Ok(markup);
        }
        let link = self.to_permalink(diagram)?;
        Ok(format!("% {link}\n{markup}"))
    }

    /// Encode a diagram as a permalink.
    ///
    /// Without a configured base URL only the payload is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TikzcdError::Codec`] if the diagram cannot be serialized.
    pub fn to_permalink(&self, diagram: &semantic::Diagram) -> Result<String, TikzcdError> {
        let permalink = self.config.permalink();
        let payload = if permalink.compress() {
            codec::to_compressed(diagram)?
        } else {
            codec::to_base64(diagram)?
        };

        Ok(match permalink.base_url() {
            Some(base) => format!("{}#{payload}", base.trim_end_matches('#')),
            None => payload,
        })
    }

    /// Decode a permalink or a bare payload in either encoding.
    ///
    /// Everything up to the last `#` is treated as the editor URL and
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TikzcdError::Codec`] if the payload does not decode to a
    /// valid diagram.
    pub fn from_permalink(&self, link: &str) -> Result<semantic::Diagram, TikzcdError> {
        let payload = link.rsplit_once('#').map_or(link, |(_, payload)| payload);
        let diagram = codec::decode_permalink(payload, &mut SequentialIds::default())?;
        debug!(nodes = diagram.node_count(); "Permalink decoded");
        Ok(diagram)
    }
}
