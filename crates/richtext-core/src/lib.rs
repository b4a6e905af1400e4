// SPDX-License-Identifier: AGPL-3.0-or-later
//! Richtext Core - Rich-text blocks to Markdown
//!
//! This crate provides:
//! - A typed block/span model that deserializes CMS rich-text JSON
//! - The span overlay engine placing inline markers into block text
//! - The Markdown block renderer behind a streaming-capable trait
//! - Injectable warning sinks and document link resolvers

pub mod ast;
pub mod formats;
pub mod logging;
pub mod overlay;
pub mod traits;
mod utf16;

pub use ast::{
    Block, BlockKind, DocumentLink, HeadingLevel, LinkData, RichText, Span, SpanKind,
};
pub use formats::MarkdownRenderer;
pub use logging::{CollectingSink, NullSink, TracingSink};
pub use traits::{
    ConversionError, LinkResolver, OffsetPolicy, RenderConfig, RenderContext, Renderer,
    RendererExt, ResolveError, Result, WarningSink,
};

/// Convert blocks to Markdown with the default configuration.
///
/// Warnings about degraded content go to `tracing`.
pub fn rich_text_to_markdown(
    blocks: &[Block],
    resolver: Option<&dyn LinkResolver>,
) -> Result<String> {
    rich_text_to_markdown_with(blocks, resolver, &TracingSink, &RenderConfig::default())
}

/// Convert blocks to Markdown with an explicit warning sink and configuration
pub fn rich_text_to_markdown_with(
    blocks: &[Block],
    resolver: Option<&dyn LinkResolver>,
    sink: &dyn WarningSink,
    config: &RenderConfig,
) -> Result<String> {
    let ctx = RenderContext::new(config)
        .with_resolver(resolver)
        .with_sink(sink);
    MarkdownRenderer::new().render(blocks, &ctx)
}

/// Parse a CMS rich-text JSON array and convert it to Markdown
pub fn json_to_markdown(json: &str, resolver: Option<&dyn LinkResolver>) -> Result<String> {
    let rich_text = RichText::from_json(json)?;
    rich_text_to_markdown(rich_text.blocks(), resolver)
}
