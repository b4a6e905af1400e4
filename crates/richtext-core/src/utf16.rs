// SPDX-License-Identifier: AGPL-3.0-or-later
//! UTF-16 code-unit offsets over UTF-8 strings
//!
//! Span offsets come from JavaScript-facing APIs and count UTF-16 code
//! units; Rust strings are indexed by byte.

/// Length of `text` in UTF-16 code units
pub fn len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Maps UTF-16 offsets of one string onto byte offsets
#[derive(Debug, Clone, Copy)]
pub struct Utf16Index<'a> {
    text: &'a str,
    len: usize,
    ascii: bool,
}

impl<'a> Utf16Index<'a> {
    pub fn new(text: &'a str) -> Self {
        let ascii = text.is_ascii();
        Self {
            text,
            len: if ascii { text.len() } else { len(text) },
            ascii,
        }
    }

    /// Length of the text in UTF-16 code units
    pub fn len(&self) -> usize {
        self.len
    }

    /// Byte offset of a UTF-16 offset, `None` past the end of the text.
    ///
    /// An offset pointing into the middle of a surrogate pair snaps down to
    /// the start of that character.
    pub fn byte_offset(&self, offset: usize) -> Option<usize> {
        if offset > self.len {
            return None;
        }
        if self.ascii {
            return Some(offset);
        }

        let mut units = 0;
        for (byte, ch) in self.text.char_indices() {
            let next = units + ch.len_utf16();
            if next > offset {
                return Some(byte);
            }
            units = next;
        }
        Some(self.text.len())
    }
}
