// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::classify::ClassificationResult;

/// "1 variation" / "3 variations".
pub fn plural(num: usize, word: &str) -> String {
    if num == 1 {
        format!("{} {}", num, word)
    } else {
        format!("{} {}s", num, word)
    }
}

/// Human-readable per-type summary, buckets in first-encounter order.
pub fn summary(result: &ClassificationResult) -> String {
    let mut output = vec![format!("{} aircraft", result.total_count), String::new()];

    for bucket in &result.types {
        let label = bucket.name.as_deref().unwrap_or(&bucket.code);
        let mut line = format!("• {}: {}×", label, bucket.total_count);
        if bucket.titles.len() > 1 {
            line.push_str(&format!(" ({})", plural(bucket.titles.len(), "variation")));
        }
        output.push(line);
    }

    output.join("\n")
}

/// One tab-separated row over the canonical code list, for pasting into a
/// spreadsheet. A code the result has no liveries for renders as an empty
/// cell, not a zero, so existing sheet columns stay blank.
pub fn sheet_row(result: &ClassificationResult, canonical_codes: &[String]) -> String {
    canonical_codes
        .iter()
        .map(|code| match result.bucket(code) {
            Some(bucket) if bucket.total_count > 0 => bucket.total_count.to_string(),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\t")
}
