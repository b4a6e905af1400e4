// SPDX-License-Identifier: AGPL-3.0-or-later
//! Block renderers

pub mod markdown;

pub use markdown::MarkdownRenderer;
