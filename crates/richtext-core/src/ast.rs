// SPDX-License-Identifier: AGPL-3.0-or-later
//! Rich-text block model
//!
//! Blocks and spans mirror the JSON shape headless CMSs emit for rich-text
//! fields. Kinds the converters do not understand are kept as `Unknown` so
//! they can be reported and degraded at render time instead of rejected while
//! deserializing.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::traits::Result;

/// A complete rich-text field: blocks in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Block>);

impl RichText {
    /// Parse the JSON array a CMS returns for a rich-text field
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Block>> for RichText {
    fn from(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }
}

/// Heading depth, always within 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const fn new(level: u8) -> Option<Self> {
        if matches!(level, 1..=6) {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Structural kind of a block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Heading(HeadingLevel),
    Paragraph,
    Preformatted,
    OrderedListItem,
    ListItem,
    Image,
    /// Any kind name outside the supported set (embeds, labels, ...)
    Unknown(String),
}

impl BlockKind {
    fn known(name: &str) -> Option<Self> {
        let kind = match name {
            "heading1" => Self::Heading(HeadingLevel(1)),
            "heading2" => Self::Heading(HeadingLevel(2)),
            "heading3" => Self::Heading(HeadingLevel(3)),
            "heading4" => Self::Heading(HeadingLevel(4)),
            "heading5" => Self::Heading(HeadingLevel(5)),
            "heading6" => Self::Heading(HeadingLevel(6)),
            "paragraph" => Self::Paragraph,
            "preformatted" => Self::Preformatted,
            "o-list-item" => Self::OrderedListItem,
            "list-item" => Self::ListItem,
            "image" => Self::Image,
            _ => return None,
        };
        Some(kind)
    }

    /// Wire name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heading(level) => match level.get() {
                1 => "heading1",
                2 => "heading2",
                3 => "heading3",
                4 => "heading4",
                5 => "heading5",
                _ => "heading6",
            },
            Self::Paragraph => "paragraph",
            Self::Preformatted => "preformatted",
            Self::OrderedListItem => "o-list-item",
            Self::ListItem => "list-item",
            Self::Image => "image",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for BlockKind {
    fn from(name: String) -> Self {
        Self::known(&name).unwrap_or(Self::Unknown(name))
    }
}

impl From<&str> for BlockKind {
    fn from(name: &str) -> Self {
        Self::known(name).unwrap_or_else(|| Self::Unknown(name.to_string()))
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural unit of rich content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub spans: Vec<Span>,
    /// Image source, only meaningful for [`BlockKind::Image`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Image alternative text, only meaningful for [`BlockKind::Image`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            text: None,
            spans: Vec::new(),
            url: None,
            alt: None,
        }
    }

    fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(kind)
        }
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::with_text(BlockKind::Heading(level), text)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::with_text(BlockKind::Paragraph, text)
    }

    pub fn preformatted(text: impl Into<String>) -> Self {
        Self::with_text(BlockKind::Preformatted, text)
    }

    pub fn list_item(text: impl Into<String>) -> Self {
        Self::with_text(BlockKind::ListItem, text)
    }

    pub fn ordered_list_item(text: impl Into<String>) -> Self {
        Self::with_text(BlockKind::OrderedListItem, text)
    }

    pub fn image(url: impl Into<String>, alt: Option<String>) -> Self {
        Self {
            url: Some(url.into()),
            alt,
            ..Self::new(BlockKind::Image)
        }
    }

    /// Append inline annotations, keeping their order
    pub fn with_spans(mut self, spans: impl IntoIterator<Item = Span>) -> Self {
        self.spans.extend(spans);
        self
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Inline annotation kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpanKind {
    Strong,
    Emphasis,
    Hyperlink,
    Unknown(String),
}

impl SpanKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Strong => "strong",
            Self::Emphasis => "em",
            Self::Hyperlink => "hyperlink",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for SpanKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "strong" => Self::Strong,
            "em" => Self::Emphasis,
            "hyperlink" => Self::Hyperlink,
            _ => Self::Unknown(name),
        }
    }
}

impl From<&str> for SpanKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<SpanKind> for String {
    fn from(kind: SpanKind) -> Self {
        match kind {
            SpanKind::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline annotation over `[start, end)` of a block's text, in UTF-16 code units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    /// Link target, only present on hyperlinks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LinkData>,
}

impl Span {
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self {
            start,
            end,
            kind,
            data: None,
        }
    }

    pub fn strong(start: usize, end: usize) -> Self {
        Self::new(start, end, SpanKind::Strong)
    }

    pub fn emphasis(start: usize, end: usize) -> Self {
        Self::new(start, end, SpanKind::Emphasis)
    }

    pub fn hyperlink(start: usize, end: usize, data: LinkData) -> Self {
        Self {
            data: Some(data),
            ..Self::new(start, end, SpanKind::Hyperlink)
        }
    }
}

/// Destination of a hyperlink span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLinkData", into = "RawLinkData")]
pub enum LinkData {
    Web {
        url: String,
        target: Option<String>,
    },
    Media {
        url: String,
        name: Option<String>,
        kind: Option<String>,
    },
    /// Reference to another CMS document, turned into a URL by a resolver
    Document(DocumentLink),
    /// Unsupported link type, carrying its wire name
    Unknown(String),
}

impl LinkData {
    pub fn web(url: impl Into<String>) -> Self {
        Self::Web {
            url: url.into(),
            target: None,
        }
    }

    pub fn media(url: impl Into<String>) -> Self {
        Self::Media {
            url: url.into(),
            name: None,
            kind: None,
        }
    }

    /// Wire name of the link type
    pub fn link_type(&self) -> &str {
        match self {
            Self::Web { .. } => "Web",
            Self::Media { .. } => "Media",
            Self::Document(_) => "Document",
            Self::Unknown(name) => name,
        }
    }
}

/// Abstract reference to a CMS document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLink {
    pub id: String,
    /// Custom type of the linked document (`product`, `page`, ...)
    pub document_type: String,
    pub tags: Vec<String>,
    pub lang: Option<String>,
    pub slug: Option<String>,
    pub uid: Option<String>,
    pub is_broken: bool,
}

/// Flat wire shape of link data; accepts both snake_case and camelCase keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawLinkData {
    #[serde(default, alias = "linkType", skip_serializing_if = "Option::is_none")]
    link_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    document_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
    #[serde(default, rename = "isBroken", alias = "is_broken", skip_serializing_if = "Option::is_none")]
    is_broken: Option<bool>,
}

impl From<RawLinkData> for LinkData {
    fn from(raw: RawLinkData) -> Self {
        match raw.link_type.as_deref() {
            Some("Web") => Self::Web {
                url: raw.url.unwrap_or_default(),
                target: raw.target,
            },
            Some("Media") => Self::Media {
                url: raw.url.unwrap_or_default(),
                name: raw.name,
                kind: raw.kind,
            },
            Some("Document") => Self::Document(DocumentLink {
                id: raw.id.unwrap_or_default(),
                document_type: raw.document_type.unwrap_or_default(),
                tags: raw.tags,
                lang: raw.lang,
                slug: raw.slug,
                uid: raw.uid,
                is_broken: raw.is_broken.unwrap_or(false),
            }),
            Some(other) => Self::Unknown(other.to_string()),
            None => Self::Unknown("none".to_string()),
        }
    }
}

impl From<LinkData> for RawLinkData {
    fn from(data: LinkData) -> Self {
        let link_type = Some(data.link_type().to_string());
        match data {
            LinkData::Web { url, target } => Self {
                link_type,
                url: Some(url),
                target,
                ..Self::default()
            },
            LinkData::Media { url, name, kind } => Self {
                link_type,
                url: Some(url),
                name,
                kind,
                ..Self::default()
            },
            LinkData::Document(link) => Self {
                link_type,
                id: Some(link.id),
                document_type: Some(link.document_type),
                tags: link.tags,
                lang: link.lang,
                slug: link.slug,
                uid: link.uid,
                is_broken: Some(link.is_broken),
                ..Self::default()
            },
            LinkData::Unknown(_) => Self {
                link_type,
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind_wire_names() {
        assert_eq!(BlockKind::from("heading3"), BlockKind::Heading(HeadingLevel(3)));
        assert_eq!(BlockKind::from("o-list-item"), BlockKind::OrderedListItem);
        assert_eq!(BlockKind::from("list-item"), BlockKind::ListItem);
        assert_eq!(
            BlockKind::from("heading7"),
            BlockKind::Unknown("heading7".to_string())
        );
        assert_eq!(BlockKind::from("embed").as_str(), "embed");
    }

    #[test]
    fn test_heading_level_bounds() {
        assert!(HeadingLevel::new(0).is_none());
        assert_eq!(HeadingLevel::new(6).map(HeadingLevel::get), Some(6));
        assert!(HeadingLevel::new(7).is_none());
    }

    #[test]
    fn test_parse_blocks_from_json() {
        let json = r#"[
            {"type": "heading2", "text": "Title", "spans": []},
            {"type": "image", "url": "someurl", "alt": null, "dimensions": {"width": 1}},
            {"type": "paragraph", "text": "Plain", "spans": null},
            {"type": "embed", "oembed": {}}
        ]"#;
        let rich_text = RichText::from_json(json).unwrap();
        let blocks = rich_text.blocks();

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].kind, BlockKind::Heading(HeadingLevel(2)));
        assert_eq!(blocks[1].url.as_deref(), Some("someurl"));
        assert!(blocks[1].alt.is_none());
        assert!(blocks[2].spans.is_empty());
        assert_eq!(blocks[3].kind, BlockKind::Unknown("embed".to_string()));
        assert!(blocks[3].text.is_none());
    }

    #[test]
    fn test_parse_document_link() {
        let json = r#"{
            "start": 18, "end": 43, "type": "hyperlink",
            "data": {
                "link_type": "Document", "id": "XuE3SRIAACEAYWIF", "type": "product",
                "tags": [], "lang": "en-gb", "slug": "product-1", "uid": "product-1",
                "isBroken": false
            }
        }"#;
        let span: Span = serde_json::from_str(json).unwrap();

        assert_eq!(span.kind, SpanKind::Hyperlink);
        match span.data {
            Some(LinkData::Document(link)) => {
                assert_eq!(link.id, "XuE3SRIAACEAYWIF");
                assert_eq!(link.document_type, "product");
                assert_eq!(link.uid.as_deref(), Some("product-1"));
                assert!(!link.is_broken);
            }
            other => panic!("Expected document link, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_camel_case_link_type() {
        let data: LinkData =
            serde_json::from_str(r#"{"linkType": "Web", "url": "https://example.com"}"#).unwrap();
        assert_eq!(data, LinkData::web("https://example.com"));
    }

    #[test]
    fn test_unknown_link_type_keeps_name() {
        let data: LinkData = serde_json::from_str(r#"{"link_type": "Video"}"#).unwrap();
        assert_eq!(data.link_type(), "Video");

        let data: LinkData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, LinkData::Unknown("none".to_string()));
    }

    #[test]
    fn test_span_kind_em_wire_name() {
        let span: Span = serde_json::from_str(r#"{"start": 0, "end": 2, "type": "em"}"#).unwrap();
        assert_eq!(span.kind, SpanKind::Emphasis);
        assert_eq!(serde_json::to_value(&span).unwrap()["type"], "em");
    }
}
