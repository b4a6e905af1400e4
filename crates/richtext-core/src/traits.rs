// SPDX-License-Identifier: AGPL-3.0-or-later
//! Renderer trait, caller-supplied collaborators and configuration

use crate::ast::{Block, DocumentLink};
use crate::logging::TracingSink;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Error returned by a fallible [`LinkResolver`]
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for conversion
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Span offsets {start}..{end} are invalid for text of length {len}")]
    InvalidSpanRange { start: usize, end: usize, len: usize },

    #[error("Link resolver failed for document {id}: {source}")]
    LinkResolution {
        id: String,
        #[source]
        source: ResolveError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// What to do with span offsets outside the text or in reverse order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetPolicy {
    /// Clamp `end` to the text length and drop spans that are reversed or
    /// start at or past the end of the text; warn either way
    ///
    /// A span ending exactly at the text length (`start == end == len`) is a
    /// valid zero-width span and is kept.
    #[default]
    Clamp,
    /// Fail the conversion with [`ConversionError::InvalidSpanRange`]
    Strict,
}

/// Configuration for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Inserted between consecutive blocks (default: one blank line)
    pub block_separator: String,
    /// Emitted for paragraphs without text, keeps adjacent lists apart
    pub empty_paragraph: String,
    /// Fence line around preformatted blocks
    pub code_fence: String,
    pub ordered_list_marker: String,
    pub bullet_list_marker: String,
    pub offset_policy: OffsetPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            block_separator: "\n\n".to_string(),
            empty_paragraph: "&nbsp;".to_string(),
            code_fence: "```".to_string(),
            ordered_list_marker: "1. ".to_string(),
            bullet_list_marker: "- ".to_string(),
            offset_policy: OffsetPolicy::Clamp,
        }
    }
}

/// Turns a document reference into a URL.
///
/// Any `Fn(&DocumentLink) -> String` closure is a resolver; implement the
/// trait directly when resolution can fail.
pub trait LinkResolver {
    fn resolve(&self, link: &DocumentLink) -> std::result::Result<String, ResolveError>;
}

impl<F> LinkResolver for F
where
    F: Fn(&DocumentLink) -> String,
{
    fn resolve(&self, link: &DocumentLink) -> std::result::Result<String, ResolveError> {
        Ok(self(link))
    }
}

/// Receives the warnings emitted for content that had to be degraded
pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Everything a renderer needs for one conversion call
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a RenderConfig,
    pub resolver: Option<&'a dyn LinkResolver>,
    pub sink: &'a dyn WarningSink,
}

impl<'a> RenderContext<'a> {
    /// Context without a resolver, reporting through `tracing`
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            resolver: None,
            sink: &TracingSink,
        }
    }

    pub fn with_resolver(mut self, resolver: Option<&'a dyn LinkResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn WarningSink) -> Self {
        self.sink = sink;
        self
    }

    pub(crate) fn warn(&self, message: &str) {
        self.sink.warn(message);
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("config", self.config)
            .field("has_resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}

/// Renderer trait: convert blocks to a target format
pub trait Renderer: Send + Sync {
    /// Render blocks to a string
    fn render(&self, blocks: &[Block], ctx: &RenderContext<'_>) -> Result<String>;
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait RendererExt: Renderer {
    /// Render to a writer
    fn render_writer<W: Write>(
        &self,
        blocks: &[Block],
        writer: &mut W,
        ctx: &RenderContext<'_>,
    ) -> Result<()> {
        let output = self.render(blocks, ctx)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

impl<T: Renderer> RendererExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::CollectingSink;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.block_separator, "\n\n");
        assert_eq!(config.empty_paragraph, "&nbsp;");
        assert_eq!(config.offset_policy, OffsetPolicy::Clamp);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"bullet_list_marker": "* ", "offset_policy": "strict"}"#)
                .unwrap();
        assert_eq!(config.bullet_list_marker, "* ");
        assert_eq!(config.offset_policy, OffsetPolicy::Strict);
        assert_eq!(config.code_fence, "```");
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |link: &DocumentLink| format!("/{}", link.id);
        let link = DocumentLink {
            id: "abc".to_string(),
            ..DocumentLink::default()
        };
        assert_eq!(resolver.resolve(&link).unwrap(), "/abc");
    }

    #[test]
    fn test_context_routes_warnings_to_sink() {
        let config = RenderConfig::default();
        let sink = CollectingSink::new();
        let ctx = RenderContext::new(&config).with_sink(&sink);
        ctx.warn("first");
        ctx.warn("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_resolution_error_keeps_source() {
        let err = ConversionError::LinkResolution {
            id: "doc".to_string(),
            source: "backend down".into(),
        };
        assert_eq!(
            err.to_string(),
            "Link resolver failed for document doc: backend down"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
