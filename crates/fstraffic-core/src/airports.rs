// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::DataError;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

/// Master airport table: ICAO code → full data line, parsed from a
/// `code,rest-of-line` file.
#[derive(Debug, Clone, Default)]
pub struct MasterAirports {
    entries: HashMap<String, String>,
}

impl MasterAirports {
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self, DataError> {
        let mut entries = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let code = trimmed.split(',').next().unwrap_or_default();
            if !code.is_empty() {
                entries.insert(code.to_string(), trimmed.to_string());
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Destination codes resolved against the master table, plus the codes
/// the table didn't know (data-quality findings, logged but non-fatal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportList {
    /// Master data lines, sorted and deduped, ready for `Airports.txt`.
    pub lines: Vec<String>,
    pub unknown_codes: Vec<String>,
}

fn destination_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",[FfRr],\d+,([A-Za-z0-9]{3,4})").unwrap())
}

/// Extracts every destination airport code from a flightplans blob
/// (`,F,<flightnum>,<CODE>` tokens) and resolves it against the master
/// table. Codes are deduped and sorted alphabetically.
pub fn collect_airports(flightplans_text: &str, master: &MasterAirports) -> AirportList {
    let mut codes: Vec<String> = destination_regex()
        .captures_iter(flightplans_text)
        .map(|caps| caps[1].to_string())
        .collect();
    codes.sort();
    codes.dedup();

    let mut lines = Vec::new();
    let mut unknown_codes = Vec::new();
    for code in codes {
        match master.get(&code) {
            Some(line) => lines.push(line.to_string()),
            None => {
                log::warn!("Airport {} not found in master airports file", code);
                unknown_codes.push(code);
            }
        }
    }
    lines.sort();
    lines.dedup();

    AirportList {
        lines,
        unknown_codes,
    }
}
