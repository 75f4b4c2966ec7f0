// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::roster::LiveryEntry;
use crate::taxonomy::{MatchTerm, Taxonomy, TypeDef};
use serde::Serialize;
use std::collections::BTreeSet;

/// All liveries that resolved to one ICAO type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBucket {
    pub code: String,
    pub name: Option<String>,
    pub series: Option<String>,
    pub manufacturer: Option<String>,
    /// Sum of the counts of every livery in this bucket.
    pub total_count: u32,
    /// Distinct titles; duplicates collapse.
    pub titles: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Buckets in first-encounter order.
    pub types: Vec<TypeBucket>,
    /// Sum of all bucket counts.
    pub total_count: u32,
    /// Titles no manufacturer/type/term matched, in roster order.
    pub unmatched: Vec<String>,
}

impl ClassificationResult {
    pub fn bucket(&self, code: &str) -> Option<&TypeBucket> {
        self.types.iter().find(|b| b.code == code)
    }
}

/// A successful taxonomy walk for one title.
struct TermHit<'a> {
    manufacturer: &'a str,
    type_def: &'a TypeDef,
    /// The literal term, or the substring a pattern term captured.
    /// Remembered so later titles containing it skip the full walk.
    cache_key: String,
}

/// Classifies each livery title into an ICAO type code.
///
/// Matching is case-insensitive and first-match-wins in
/// manufacturer → type → term order as given by the taxonomy. Pure:
/// neither input is mutated, and the same inputs always produce the
/// same result.
pub fn classify(taxonomy: &Taxonomy, liveries: &[LiveryEntry]) -> ClassificationResult {
    classify_impl(taxonomy, liveries, true)
}

/// Same as [`classify`] but always taking the full taxonomy walk.
/// The match cache is a pure optimization; this path exists so tests
/// can assert both produce identical results.
pub fn classify_uncached(taxonomy: &Taxonomy, liveries: &[LiveryEntry]) -> ClassificationResult {
    classify_impl(taxonomy, liveries, false)
}

fn classify_impl(
    taxonomy: &Taxonomy,
    liveries: &[LiveryEntry],
    use_cache: bool,
) -> ClassificationResult {
    // Run-scoped memo of (search key → code) from previous full walks,
    // scanned in insertion order. A key only gets in here after it was
    // the term that triggered a real match, so a cache hit always agrees
    // with what the full walk would have produced.
    let mut cache: Vec<(String, String)> = Vec::new();

    let mut types: Vec<TypeBucket> = Vec::new();
    let mut total_count = 0u32;
    let mut unmatched = Vec::new();

    for entry in liveries {
        let title = entry.title.to_lowercase();

        if use_cache {
            if let Some(code) = cache
                .iter()
                .find(|(key, _)| title.contains(key.as_str()))
                .map(|(_, code)| code.clone())
            {
                log::debug!("'{}' matched {} via cached key", entry.title, code);
                add_to_bucket(&mut types, &mut total_count, &code, None, entry);
                continue;
            }
        }

        match find_match(taxonomy, &title) {
            Some(hit) => {
                add_to_bucket(
                    &mut types,
                    &mut total_count,
                    &hit.type_def.code,
                    Some(&hit),
                    entry,
                );
                if !cache.iter().any(|(key, _)| key == &hit.cache_key) {
                    cache.push((hit.cache_key, hit.type_def.code.clone()));
                }
            }
            None => unmatched.push(entry.title.clone()),
        }
    }

    ClassificationResult {
        types,
        total_count,
        unmatched,
    }
}

/// Walks manufacturers → types → terms in taxonomy order and returns the
/// first hit. Manufacturers whose name fragments don't appear in the
/// title are skipped without descending into their types; that pruning
/// keeps the walk sub-linear on real rosters.
fn find_match<'a>(taxonomy: &'a Taxonomy, title: &str) -> Option<TermHit<'a>> {
    for manufacturer in &taxonomy.manufacturers {
        if !manufacturer
            .match_names
            .iter()
            .any(|name| title.contains(name.as_str()))
        {
            continue;
        }

        for type_def in &manufacturer.types {
            for term in &type_def.match_terms {
                let cache_key = match term {
                    MatchTerm::Literal(literal) => {
                        if !title.contains(literal.as_str()) {
                            continue;
                        }
                        literal.clone()
                    }
                    MatchTerm::Pattern(regex) => match regex.find(title) {
                        // the matched substring, not the pattern, is the key
                        Some(found) => found.as_str().to_string(),
                        None => continue,
                    },
                };

                return Some(TermHit {
                    manufacturer: &manufacturer.name,
                    type_def,
                    cache_key,
                });
            }
        }
    }

    None
}

/// Adds a livery to a bucket, creating the bucket on first encounter.
/// Name/series/manufacturer are fixed at creation and never overwritten;
/// cache-path additions (`hit == None`) can therefore only land in a
/// bucket that already exists.
fn add_to_bucket(
    types: &mut Vec<TypeBucket>,
    total_count: &mut u32,
    code: &str,
    hit: Option<&TermHit>,
    entry: &LiveryEntry,
) {
    match types.iter_mut().find(|b| b.code == code) {
        Some(bucket) => {
            bucket.total_count += entry.count;
            bucket.titles.insert(entry.title.clone());
        }
        None => {
            let (name, series, manufacturer) = match hit {
                Some(hit) => (
                    hit.type_def.name.clone(),
                    hit.type_def.series.clone(),
                    Some(hit.manufacturer.to_string()),
                ),
                None => (None, None, None),
            };
            types.push(TypeBucket {
                code: code.to_string(),
                name,
                series,
                manufacturer,
                total_count: entry.count,
                titles: BTreeSet::from([entry.title.clone()]),
            });
        }
    }
    *total_count += entry.count;
}
