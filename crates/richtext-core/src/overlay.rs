// SPDX-License-Identifier: AGPL-3.0-or-later
//! Span overlay: inserts inline Markdown markers into plain text
//!
//! Every usable span becomes an opening and a closing [`MarkerEvent`]. Events
//! are sorted from the end of the text backwards and applied as insertions,
//! so offsets computed against the original text stay valid while the output
//! grows.
//!
//! Events sharing a position are ordered by an explicit tie-break key. At one
//! position the finished text reads `closings | zero-width spans | openings`;
//! because a later insertion at the same byte lands to the left of an earlier
//! one, events are applied in the reverse of that reading order:
//!
//! 1. openings, innermost first (shorter span first, later span first on a tie)
//! 2. zero-width spans, later span first, each closing before its opening
//! 3. closings, outermost first (earlier start first, earlier span first on a tie)
//!
//! Well-nested and identical-range spans come out correctly nested, with the
//! span listed first treated as the outer one. Partially overlapping spans
//! (`[0, 10)` with `[5, 15)`) are not repaired: their markers are inserted
//! mechanically and interleave.

use std::cmp::Reverse;

use crate::ast::{LinkData, Span, SpanKind};
use crate::traits::{ConversionError, OffsetPolicy, RenderContext, Result};
use crate::utf16::Utf16Index;

const STRONG: &str = "**";
const EMPHASIS: &str = "*";
const LINK_OPEN: &str = "[";

/// One textual insertion into a block's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerEvent {
    /// UTF-16 offset into the original text
    pub position: usize,
    pub marker: String,
    order: TieBreak,
}

/// Application order among events at the same position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Open,
    ZeroWidth,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TieBreak {
    phase: Phase,
    primary: usize,
    secondary: usize,
}

impl TieBreak {
    fn open(ordinal: usize, end: usize) -> Self {
        Self {
            phase: Phase::Open,
            primary: end,
            secondary: usize::MAX - ordinal,
        }
    }

    fn close(ordinal: usize, start: usize) -> Self {
        Self {
            phase: Phase::Close,
            primary: start,
            secondary: ordinal,
        }
    }

    fn zero_width(ordinal: usize, opening: bool) -> Self {
        Self {
            phase: Phase::ZeroWidth,
            primary: usize::MAX - ordinal,
            secondary: usize::from(opening),
        }
    }
}

/// A validated span with its markers decided
struct Markup {
    ordinal: usize,
    start: usize,
    end: usize,
    open: String,
    close: String,
}

impl Markup {
    fn into_events(self) -> [MarkerEvent; 2] {
        let (open_order, close_order) = if self.start == self.end {
            (
                TieBreak::zero_width(self.ordinal, true),
                TieBreak::zero_width(self.ordinal, false),
            )
        } else {
            (
                TieBreak::open(self.ordinal, self.end),
                TieBreak::close(self.ordinal, self.start),
            )
        };
        [
            MarkerEvent {
                position: self.start,
                marker: self.open,
                order: open_order,
            },
            MarkerEvent {
                position: self.end,
                marker: self.close,
                order: close_order,
            },
        ]
    }
}

/// Return `text` with Markdown markers for `spans` inserted.
///
/// Spans that cannot be rendered are dropped with a warning through the
/// context's sink. Errors come only from the link resolver or, under
/// [`OffsetPolicy::Strict`], from out-of-range offsets.
pub fn overlay_spans(text: &str, spans: &[Span], ctx: &RenderContext<'_>) -> Result<String> {
    if spans.is_empty() {
        return Ok(text.to_string());
    }

    let index = Utf16Index::new(text);
    let events = marker_events(text, spans, ctx)?;

    let mut output = text.to_string();
    for event in &events {
        let byte = index.byte_offset(event.position).unwrap_or(text.len());
        tracing::trace!(position = event.position, marker = %event.marker, "insert marker");
        output.insert_str(byte, &event.marker);
    }
    Ok(output)
}

/// Marker events for `spans` over `text`, in application order
pub fn marker_events(
    text: &str,
    spans: &[Span],
    ctx: &RenderContext<'_>,
) -> Result<Vec<MarkerEvent>> {
    let len = Utf16Index::new(text).len();

    let mut events = Vec::with_capacity(spans.len() * 2);
    for (ordinal, span) in spans.iter().enumerate() {
        if let Some(markup) = prepare(ordinal, span, len, ctx)? {
            events.extend(markup.into_events());
        }
    }

    events.sort_by_key(|event| (Reverse(event.position), event.order));
    Ok(events)
}

fn prepare(
    ordinal: usize,
    span: &Span,
    len: usize,
    ctx: &RenderContext<'_>,
) -> Result<Option<Markup>> {
    if let SpanKind::Unknown(name) = &span.kind {
        ctx.warn(&format!(
            "Span type \"{}\" is unknown. Returning text as a paragraph.",
            name
        ));
        return Ok(None);
    }

    let Some((start, end)) = check_range(span, len, ctx)? else {
        return Ok(None);
    };

    let (open, close) = match &span.kind {
        SpanKind::Strong => (STRONG.to_string(), STRONG.to_string()),
        SpanKind::Emphasis => (EMPHASIS.to_string(), EMPHASIS.to_string()),
        SpanKind::Hyperlink => match link_url(span.data.as_ref(), ctx)? {
            Some(url) => (LINK_OPEN.to_string(), format!("]({})", url)),
            None => return Ok(None),
        },
        SpanKind::Unknown(_) => return Ok(None),
    };

    Ok(Some(Markup {
        ordinal,
        start,
        end,
        open,
        close,
    }))
}

fn check_range(
    span: &Span,
    len: usize,
    ctx: &RenderContext<'_>,
) -> Result<Option<(usize, usize)>> {
    let (start, end) = (span.start, span.end);
    let reversed = start > end;
    let overflow = end > len;

    if (reversed || overflow) && ctx.config.offset_policy == OffsetPolicy::Strict {
        return Err(ConversionError::InvalidSpanRange { start, end, len });
    }

    if reversed {
        ctx.warn(&format!(
            "Span offsets {}..{} are reversed; dropping span.",
            start, end
        ));
        return Ok(None);
    }

    if overflow && start >= len {
        ctx.warn(&format!(
            "Span offsets {}..{} lie outside text length {}; dropping span.",
            start, end, len
        ));
        return Ok(None);
    }

    if overflow {
        ctx.warn(&format!(
            "Span offsets {}..{} exceed text length {}; clamping.",
            start, end, len
        ));
        return Ok(Some((start.min(len), len)));
    }

    Ok(Some((start, end)))
}

/// Destination URL of a hyperlink, `None` when the link cannot be rendered
fn link_url(data: Option<&LinkData>, ctx: &RenderContext<'_>) -> Result<Option<String>> {
    match data {
        Some(LinkData::Web { url, .. }) | Some(LinkData::Media { url, .. }) => {
            Ok(Some(url.clone()))
        }
        Some(LinkData::Document(link)) => {
            let Some(resolver) = ctx.resolver else {
                ctx.warn(
                    "Unable to resolve a document link as no link resolver method was passed in.",
                );
                return Ok(None);
            };
            resolver
                .resolve(link)
                .map(Some)
                .map_err(|source| ConversionError::LinkResolution {
                    id: link.id.clone(),
                    source,
                })
        }
        Some(LinkData::Unknown(link_type)) => {
            warn_unknown_link(link_type, ctx);
            Ok(None)
        }
        None => {
            warn_unknown_link("none", ctx);
            Ok(None)
        }
    }
}

fn warn_unknown_link(link_type: &str, ctx: &RenderContext<'_>) {
    ctx.warn(&format!(
        "Link type \"{}\" is unknown. Returning text as paragraph.",
        link_type
    ));
}
