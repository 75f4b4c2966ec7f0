// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::roster::LiveryEntry;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// An AC# that appears in a flightplans file but not in the roster.
/// Data-quality finding, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageWarning {
    /// 1-based line number in the flightplans blob.
    pub line: usize,
    pub ac_number: u32,
}

fn usage_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^AC#(\d+),").unwrap())
}

/// Counts how often each roster entry's AC# leads a line in the
/// flightplans blob and bumps `count` accordingly. AC#s without a
/// roster entry are collected (and logged) as warnings.
pub fn count_usage(entries: &mut [LiveryEntry], flightplans_text: &str) -> Vec<UsageWarning> {
    let mut warnings = Vec::new();

    for (index, line) in flightplans_text.lines().enumerate() {
        let trimmed = line.trim();
        let Some(caps) = usage_line_regex().captures(trimmed) else {
            continue;
        };
        let Ok(ac_number) = caps[1].parse::<u32>() else {
            continue;
        };

        match entries.iter_mut().find(|e| e.ac_number == ac_number) {
            Some(entry) => entry.count += 1,
            None => {
                log::warn!(
                    "Flightplans line {}: AC# {} doesn't exist in the aircraft file",
                    index + 1,
                    ac_number
                );
                warnings.push(UsageWarning {
                    line: index + 1,
                    ac_number,
                });
            }
        }
    }

    warnings
}
