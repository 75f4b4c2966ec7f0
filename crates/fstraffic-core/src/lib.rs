// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod airports;
pub mod classify;
pub mod clean;
pub mod report;
pub mod roster;
pub mod taxonomy;
pub mod usage;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Custom aircraft data has neither a \"list\" nor a \"types\" section")]
    InvalidOverride,
    #[error("Invalid match pattern '{pattern}' for type {code}: {source}")]
    BadPattern {
        code: String,
        pattern: String,
        source: regex::Error,
    },
    #[error("Type code {0} is defined more than once")]
    DuplicateTypeCode(String),
}
