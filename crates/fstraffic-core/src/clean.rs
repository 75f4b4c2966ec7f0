// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// What the cleaner should rewrite. Everything is off by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// `(old, new)` ICAO pairs; every `,OLD` occurrence becomes `,NEW`.
    /// Pairs where either code is shorter than 3 chars are ignored.
    pub change_airports: Vec<(String, String)>,
    /// `hh:mm:ss` → `hh:mm` in dep/arr time pairs.
    pub remove_seconds: bool,
    /// Arrival `d/hh:mm` → `@d/hh:mm`.
    pub add_at_to_arrival_times: bool,
    /// Replace each `N%` with a random value in
    /// `random_percentages_min..=random_percentages_max`.
    pub random_percentages: bool,
    pub random_percentages_min: Option<u8>,
    pub random_percentages_max: Option<u8>,
    pub uppercase: bool,
    /// `,F,12` → `,F,0012`.
    pub leading_zeroes_flight_numbers: bool,
    /// `,40,F` → `,040,F`.
    pub leading_zeroes_flight_levels: bool,
    /// Number of spaces after `//` (0 or 1; larger values are clamped
    /// to 1). `None` leaves comments alone.
    pub comment_spacing: Option<usize>,
}

/// Applies the enabled cleanups to a flightplans blob.
///
/// The time/percentage/number transforms only touch `AC#`/`//#` lines;
/// comment spacing applies to any `//` line. The output always ends
/// with a newline.
pub fn clean_flightplan(text: &str, options: &CleanOptions) -> String {
    clean_flightplan_with(text, options, &mut rand::thread_rng())
}

pub fn clean_flightplan_with<R: Rng>(text: &str, options: &CleanOptions, rng: &mut R) -> String {
    let mut text = text.to_string();

    for (old, new) in &options.change_airports {
        let old = old.trim().to_uppercase();
        let new = new.trim().to_uppercase();
        if old.len() > 2 && new.len() > 2 {
            let re = Regex::new(&format!("(?i),{}", regex::escape(&old))).unwrap();
            text = re.replace_all(&text, format!(",{}", new)).into_owned();
        }
    }

    let mut out = Vec::new();
    for line in text.trim().split('\n') {
        let mut line = line.to_string();

        if line.starts_with("AC#") || line.starts_with("ac#") || line.starts_with("//#") {
            if options.remove_seconds || options.add_at_to_arrival_times {
                line = format_times(&line, options.remove_seconds, options.add_at_to_arrival_times);
            }
            if options.random_percentages {
                let min = options.random_percentages_min.unwrap_or(10);
                let max = options.random_percentages_max.unwrap_or(99);
                line = randomize_percentages(&line, min, max, rng);
            }
            if options.uppercase {
                line = line.to_uppercase();
            }
            if options.leading_zeroes_flight_numbers {
                line = pad_flight_numbers(&line);
            }
            if options.leading_zeroes_flight_levels {
                line = pad_flight_levels(&line);
            }
        }

        if let Some(spaces) = options.comment_spacing {
            if line.trim_start().starts_with("//") {
                line = change_comments(&line, spaces);
            }
        }

        out.push(line);
    }
    out.push(String::new());
    out.join("\n")
}

fn times_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"((?:\d/)?\d{2}:\d{2})(:\d{2})?,@?((?:\d/)?\d{2}:\d{2})(:\d{2})?").unwrap()
    })
}

/// Normalizes a `dep,arr` time pair: optionally strips `:ss` and
/// optionally prefixes the arrival time with `@` (idempotent, an
/// existing `@` is consumed by the match).
fn format_times(line: &str, remove_seconds: bool, add_at: bool) -> String {
    let subst = match (remove_seconds, add_at) {
        (true, false) => "${1},${3}",
        (false, true) => "${1}${2},@${3}${4}",
        _ => "${1},@${3}",
    };
    times_regex().replace_all(line, subst).into_owned()
}

fn randomize_percentages<R: Rng>(line: &str, min: u8, max: u8, rng: &mut R) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\d+%").unwrap());

    if min >= max {
        return re.replace_all(line, format!("{}%", min)).into_owned();
    }
    re.replace_all(line, |_: &regex::Captures| {
        format!("{}%", rng.gen_range(min..=max))
    })
    .into_owned()
}

fn pad_flight_numbers(line: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r",([FfRr]),(\d+)").unwrap());

    re.replace_all(line, |caps: &regex::Captures| {
        // digit runs too long for u32 are left as they are
        match caps[2].parse::<u32>() {
            Ok(num) => format!(",{},{:04}", &caps[1], num),
            Err(_) => caps[0].to_string(),
        }
    })
    .into_owned()
}

fn pad_flight_levels(line: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r",(\d+),([FfRr])").unwrap());

    re.replace_all(line, |caps: &regex::Captures| {
        match caps[1].parse::<u32>() {
            Ok(level) => format!(",{:03},{}", level, &caps[2]),
            Err(_) => caps[0].to_string(),
        }
    })
    .into_owned()
}

/// Sets the number of spaces between `//` and the comment text; anything
/// above 1 is treated as 1. The `//FSXDAYS` directive stays glued to its
/// slashes.
fn change_comments(line: &str, spaces: usize) -> String {
    let spaces = spaces.min(1);
    if spaces > 0 {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^(\s*)//(\s*)(\S)").unwrap());
        let padded = re
            .replace(line, |caps: &regex::Captures| {
                format!("{}//{}{}", &caps[1], " ".repeat(spaces), &caps[3])
            })
            .into_owned();
        padded.replacen("// FSXDAYS", "//FSXDAYS", 1)
    } else {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^(\s*)//\s+").unwrap());
        re.replace(line, "${1}//").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_remove_seconds() {
        let opts = CleanOptions {
            remove_seconds: true,
            ..Default::default()
        };
        let out = clean_flightplan("AC#1,N738XX,10%,1hr,IFR,00:01:30,02:15:00,380,F,42,KJFK", &opts);
        assert_eq!(out, "AC#1,N738XX,10%,1hr,IFR,00:01,02:15,380,F,42,KJFK\n");
    }

    #[test]
    fn test_add_at_keeps_seconds() {
        let opts = CleanOptions {
            add_at_to_arrival_times: true,
            ..Default::default()
        };
        let out = clean_flightplan("AC#1,N738XX,10%,1hr,IFR,1/00:01:30,1/02:15:00,380,F,42,KJFK", &opts);
        assert_eq!(
            out,
            "AC#1,N738XX,10%,1hr,IFR,1/00:01:30,@1/02:15:00,380,F,42,KJFK\n"
        );
    }

    #[test]
    fn test_add_at_is_idempotent() {
        let opts = CleanOptions {
            remove_seconds: true,
            add_at_to_arrival_times: true,
            ..Default::default()
        };
        let line = "AC#1,N738XX,10%,1hr,IFR,00:01,@02:15,380,F,42,KJFK";
        let out = clean_flightplan(line, &opts);
        assert_eq!(out, format!("{}\n", line));
    }

    #[test]
    fn test_fixed_percentage_when_min_equals_max() {
        let opts = CleanOptions {
            random_percentages: true,
            random_percentages_min: Some(50),
            random_percentages_max: Some(50),
            ..Default::default()
        };
        let out = clean_flightplan("AC#1,N738XX,13%,1hr,IFR", &opts);
        assert_eq!(out, "AC#1,N738XX,50%,1hr,IFR\n");
    }

    #[test]
    fn test_random_percentage_in_range() {
        let opts = CleanOptions {
            random_percentages: true,
            random_percentages_min: Some(20),
            random_percentages_max: Some(30),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let out = clean_flightplan_with("AC#1,N738XX,13%,1hr,IFR", &opts, &mut rng);

        let percent: u8 = out
            .split('%')
            .next()
            .unwrap()
            .rsplit(',')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!((20..=30).contains(&percent), "got {}%", percent);
    }

    #[test]
    fn test_pad_flight_numbers_and_levels() {
        let opts = CleanOptions {
            leading_zeroes_flight_numbers: true,
            leading_zeroes_flight_levels: true,
            ..Default::default()
        };
        let out = clean_flightplan("AC#1,N738XX,10%,1hr,IFR,00:01,02:15,380,F,42,KJFK", &opts);
        assert_eq!(out, "AC#1,N738XX,10%,1hr,IFR,00:01,02:15,380,F,0042,KJFK\n");

        let out = clean_flightplan("AC#1,N738XX,10%,1hr,IFR,00:01,02:15,40,R,1,EGLL", &opts);
        assert_eq!(out, "AC#1,N738XX,10%,1hr,IFR,00:01,02:15,040,R,0001,EGLL\n");
    }

    #[test]
    fn test_overlong_digit_runs_pass_through_unchanged() {
        let opts = CleanOptions {
            leading_zeroes_flight_numbers: true,
            leading_zeroes_flight_levels: true,
            ..Default::default()
        };
        // both digit runs exceed u32; neither may be rewritten to zeroes
        let line = "AC#1,N738XX,10%,1hr,IFR,00:01,02:15,99999999999999999999,F,88888888888888888888,KJFK";
        assert_eq!(clean_flightplan(line, &opts), format!("{}\n", line));
    }

    #[test]
    fn test_airport_rename() {
        let opts = CleanOptions {
            change_airports: vec![("eddt".to_string(), "EDDB".to_string())],
            ..Default::default()
        };
        let out = clean_flightplan(
            "AC#1,N738XX,10%,1hr,IFR,00:01,02:15,380,F,42,EDDT\nAC#2,D-ABCD,10%,1hr,IFR,03:00,04:00,360,F,43,eddt",
            &opts,
        );
        assert_eq!(
            out,
            "AC#1,N738XX,10%,1hr,IFR,00:01,02:15,380,F,42,EDDB\nAC#2,D-ABCD,10%,1hr,IFR,03:00,04:00,360,F,43,EDDB\n"
        );
    }

    #[test]
    fn test_short_airport_codes_ignored() {
        let opts = CleanOptions {
            change_airports: vec![("ed".to_string(), "EDDB".to_string())],
            ..Default::default()
        };
        let line = "AC#1,N738XX,10%,1hr,IFR,00:01,02:15,380,F,42,EDDT";
        assert_eq!(clean_flightplan(line, &opts), format!("{}\n", line));
    }

    #[test]
    fn test_comment_spacing_one_space() {
        let opts = CleanOptions {
            comment_spacing: Some(1),
            ..Default::default()
        };
        let out = clean_flightplan("//Weekly flights\n//   indented note\n//FSXDAYS\nAC#1,N1,5%", &opts);
        assert_eq!(out, "// Weekly flights\n// indented note\n//FSXDAYS\nAC#1,N1,5%\n");
    }

    #[test]
    fn test_comment_spacing_zero() {
        let opts = CleanOptions {
            comment_spacing: Some(0),
            ..Default::default()
        };
        let out = clean_flightplan("//  Weekly flights", &opts);
        assert_eq!(out, "//Weekly flights\n");
    }

    #[test]
    fn test_comment_spacing_clamped_to_one() {
        let opts = CleanOptions {
            comment_spacing: Some(3),
            ..Default::default()
        };
        let out = clean_flightplan("//Weekly flights\n//FSXDAYS", &opts);
        assert_eq!(out, "// Weekly flights\n//FSXDAYS\n");
    }

    #[test]
    fn test_uppercase_only_on_plan_lines() {
        let opts = CleanOptions {
            uppercase: true,
            ..Default::default()
        };
        let out = clean_flightplan("ac#1,n738xx,10%,1hr,ifr\n[section header]", &opts);
        assert_eq!(out, "AC#1,N738XX,10%,1HR,IFR\n[section header]\n");
    }
}
