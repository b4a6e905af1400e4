// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use richtext_core::{rich_text_to_markdown_with, NullSink, RenderConfig, RichText};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(rich_text) = RichText::from_json(input) else {
        return;
    };
    // Arbitrary offsets and overlaps must never panic
    let _ = rich_text_to_markdown_with(
        rich_text.blocks(),
        None,
        &NullSink,
        &RenderConfig::default(),
    );
});
