// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::DataError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

/// One `AC#` entry from an aircraft roster file.
///
/// `count` starts at 0 and is filled in by [`crate::usage::count_usage`]
/// from the matching flightplans file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveryEntry {
    pub ac_number: u32,
    pub title: String,
    pub count: u32,
}

impl LiveryEntry {
    pub fn new(ac_number: u32, title: impl Into<String>) -> Self {
        Self {
            ac_number,
            title: title.into(),
            count: 0,
        }
    }
}

fn livery_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)^AC#(\d+),\d+,"(.*)""#).unwrap())
}

pub struct RosterParser;

impl RosterParser {
    /// Parses an aircraft.txt file and returns its livery entries.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<LiveryEntry>, DataError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::parse(reader)
    }

    /// Collects `AC#<num>,<n>,"<title>"` lines; anything else (comments,
    /// section headers, blanks) is skipped. A later line with an AC#
    /// already seen replaces the earlier title but keeps its position.
    pub fn parse<R: BufRead>(reader: R) -> Result<Vec<LiveryEntry>, DataError> {
        let mut entries: Vec<LiveryEntry> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(caps) = livery_line_regex().captures(trimmed) {
                let ac_number: u32 = caps[1]
                    .parse()
                    .map_err(|_| DataError::Parse(format!("Bad AC# in line: {}", trimmed)))?;
                let title = caps[2].to_string();

                match entries.iter_mut().find(|e| e.ac_number == ac_number) {
                    Some(existing) => existing.title = title,
                    None => entries.push(LiveryEntry::new(ac_number, title)),
                }
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_roster() {
        let data = "\
//Aircraft list
AC#1,450,\"Boeing 737-800 House Colors\"
AC#2,430,\"Airbus A320 IAE Sample\"

ac#3,280,\"Dash 8 Q400 Sample\"
junk line without an AC number
AC#notanumber,1,\"skipped entirely\"
";
        let entries = RosterParser::parse(Cursor::new(data)).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].ac_number, 1);
        assert_eq!(entries[0].title, "Boeing 737-800 House Colors");
        assert_eq!(entries[0].count, 0);
        // lowercase "ac#" is accepted
        assert_eq!(entries[2].ac_number, 3);
    }

    #[test]
    fn test_duplicate_ac_number_last_wins() {
        let data = "\
AC#10,450,\"Old Title\"
AC#11,450,\"Other\"
AC#10,450,\"New Title\"
";
        let entries = RosterParser::parse(Cursor::new(data)).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ac_number, 10);
        assert_eq!(entries[0].title, "New Title");
        assert_eq!(entries[1].ac_number, 11);
    }

    #[test]
    fn test_title_with_commas() {
        let data = "AC#5,450,\"Boeing 737-800 \"\"Split, Scimitar\"\" Winglets\"\n";
        let entries = RosterParser::parse(Cursor::new(data)).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].title,
            "Boeing 737-800 \"\"Split, Scimitar\"\" Winglets"
        );
    }
}
