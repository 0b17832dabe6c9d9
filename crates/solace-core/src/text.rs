// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound text normalization for SMS.
//!
//! Completion output often carries typographic punctuation that forces an
//! SMS into UCS-2 encoding and triples its segment count. [`clean_completion_text`]
//! folds the common offenders back to ASCII and [`non_gsm_chars`] reports
//! whatever is left outside the GSM 03.38 alphabet.

use tracing::debug;

/// GSM 03.38 basic character set.
const GSM_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞ\u{1b}ÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";

/// GSM 03.38 extension table (sent with an escape prefix).
const GSM_EXTENSION: &str = "\u{0c}^{}\\[~]|€";

/// Characters in `text` that cannot be encoded in GSM 03.38.
pub fn non_gsm_chars(text: &str) -> Vec<char> {
    text.chars()
        .filter(|c| !GSM_BASIC.contains(*c) && !GSM_EXTENSION.contains(*c))
        .collect()
}

/// Whether `text` fits the GSM 03.38 alphabet.
pub fn is_gsm(text: &str) -> bool {
    non_gsm_chars(text).is_empty()
}

/// Normalize completion output before it is persisted and sent.
pub fn clean_completion_text(text: &str, remove_emojis: bool) -> String {
    let mut cleaned = text
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2014}', '\u{2013}'], "-")
        .replace('\u{2026}', "...")
        .replace("! ?", "!");

    if remove_emojis {
        cleaned = cleaned.chars().filter(|c| !is_emoji(*c)).collect();
    }

    let cleaned = cleaned.trim().to_string();

    let offending = non_gsm_chars(&cleaned);
    if !offending.is_empty() {
        debug!(
            count = offending.len(),
            chars = %offending.iter().collect::<String>(),
            "outbound text requires UCS-2 encoding"
        );
    }

    cleaned
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0xFE0E..=0xFE0F | 0x200D
    )
}
