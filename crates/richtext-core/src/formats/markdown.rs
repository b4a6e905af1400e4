// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown renderer for rich-text blocks

use crate::ast::{Block, BlockKind};
use crate::overlay::overlay_spans;
use crate::traits::{RenderContext, Renderer, Result};

/// Renders blocks as Markdown, one blank line between blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, blocks: &[Block], ctx: &RenderContext<'_>) -> Result<String> {
        let _span = tracing::debug_span!("render_markdown", block_count = blocks.len()).entered();
        let mut output = String::new();

        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                output.push_str(&ctx.config.block_separator);
            }
            render_block(&mut output, block, ctx)?;
        }

        Ok(output)
    }
}

fn render_block(output: &mut String, block: &Block, ctx: &RenderContext<'_>) -> Result<()> {
    let config = ctx.config;
    let text = block.text.as_deref().unwrap_or_default();
    tracing::trace!(kind = %block.kind, "render block");

    match &block.kind {
        BlockKind::Heading(level) => {
            output.push_str(&"#".repeat(level.get() as usize));
            output.push(' ');
            output.push_str(&overlay_spans(text, &block.spans, ctx)?);
        }

        BlockKind::Paragraph => {
            if text.is_empty() {
                output.push_str(&config.empty_paragraph);
            } else {
                output.push_str(&overlay_spans(text, &block.spans, ctx)?);
            }
        }

        BlockKind::Image => {
            output.push_str("![");
            output.push_str(block.alt.as_deref().unwrap_or_default());
            output.push_str("](");
            output.push_str(block.url.as_deref().unwrap_or_default());
            output.push(')');
        }

        // Preformatted text and list items are written verbatim; spans are ignored
        BlockKind::Preformatted => {
            output.push_str(&config.code_fence);
            output.push('\n');
            output.push_str(text);
            output.push('\n');
            output.push_str(&config.code_fence);
        }

        BlockKind::OrderedListItem => {
            output.push_str(&config.ordered_list_marker);
            output.push_str(text);
        }

        BlockKind::ListItem => {
            output.push_str(&config.bullet_list_marker);
            output.push_str(text);
        }

        BlockKind::Unknown(name) => {
            ctx.warn(&format!(
                "Text type \"{}\" is unknown. Returning text as a paragraph.",
                name
            ));
            output.push_str(&overlay_spans(text, &block.spans, ctx)?);
        }
    }

    Ok(())
}
