// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fstraffic_core::airports::{collect_airports, MasterAirports};
use fstraffic_core::classify::classify;
use fstraffic_core::clean::{clean_flightplan, CleanOptions};
use fstraffic_core::report;
use fstraffic_core::roster::RosterParser;
use fstraffic_core::taxonomy::Taxonomy;
use fstraffic_core::usage::count_usage;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a roster's liveries into ICAO types and print the counts
    AircraftList {
        /// Directory holding the Aircraft….txt and Flightplans….txt pair
        dir: PathBuf,
        /// Print a tab-separated row over the canonical code list instead
        #[arg(long)]
        tsv: bool,
        /// Custom aircraft naming data, merged over the bundled data
        #[arg(long, env = "FSTRAFFIC_CUSTOM_DATA")]
        custom_data: Option<PathBuf>,
    },
    /// Clean up a flightplans file
    Clean {
        file: PathBuf,
        /// ICAO rename pairs, e.g. EDDT:EDDB (repeatable)
        #[arg(long = "change-airport", value_name = "OLD:NEW")]
        change_airports: Vec<String>,
        #[arg(long)]
        remove_seconds: bool,
        #[arg(long)]
        add_at_to_arrival_times: bool,
        #[arg(long)]
        random_percentages: bool,
        #[arg(long, value_name = "MIN")]
        percentages_min: Option<u8>,
        #[arg(long, value_name = "MAX")]
        percentages_max: Option<u8>,
        #[arg(long)]
        uppercase: bool,
        #[arg(long)]
        pad_flight_numbers: bool,
        #[arg(long)]
        pad_flight_levels: bool,
        /// Spaces after "//" in comments (0 or 1)
        #[arg(long, value_name = "N", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(0..=1))]
        comment_spacing: Option<usize>,
        /// Print the result instead of rewriting the file
        #[arg(long)]
        dry_run: bool,
    },
    /// Collect a flightplan's destination airports into an Airports.txt
    GenerateAirports {
        flightplans: PathBuf,
        /// Master airports file (code,data per line)
        #[arg(long, env = "FSTRAFFIC_MASTER_AIRPORTS")]
        master: PathBuf,
        /// Output file (default: Airports.txt next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .ok();

    match cli.command {
        Commands::AircraftList {
            dir,
            tsv,
            custom_data,
        } => aircraft_list(&dir, tsv, custom_data.as_deref()),
        Commands::Clean {
            file,
            change_airports,
            remove_seconds,
            add_at_to_arrival_times,
            random_percentages,
            percentages_min,
            percentages_max,
            uppercase,
            pad_flight_numbers,
            pad_flight_levels,
            comment_spacing,
            dry_run,
        } => {
            let options = CleanOptions {
                change_airports: parse_airport_pairs(&change_airports)?,
                remove_seconds,
                add_at_to_arrival_times,
                random_percentages,
                random_percentages_min: percentages_min,
                random_percentages_max: percentages_max,
                uppercase,
                leading_zeroes_flight_numbers: pad_flight_numbers,
                leading_zeroes_flight_levels: pad_flight_levels,
                comment_spacing,
            };
            clean(&file, &options, dry_run)
        }
        Commands::GenerateAirports {
            flightplans,
            master,
            output,
        } => generate_airports(&flightplans, &master, output),
    }
}

fn aircraft_list(dir: &Path, tsv: bool, custom_data: Option<&Path>) -> Result<()> {
    let (aircraft_path, flightplans_path) = find_traffic_files(dir)?;
    log::info!(
        "Using {:?} and {:?}",
        aircraft_path.file_name().unwrap_or_default(),
        flightplans_path.file_name().unwrap_or_default()
    );

    let mut liveries = RosterParser::parse_file(&aircraft_path)
        .with_context(|| format!("Failed to parse {:?}", aircraft_path))?;
    if liveries.is_empty() {
        bail!("No aircraft found in {:?}", aircraft_path);
    }

    let flightplans_text = fs::read_to_string(&flightplans_path)
        .with_context(|| format!("Failed to read {:?}", flightplans_path))?;
    count_usage(&mut liveries, &flightplans_text);

    let taxonomy = Taxonomy::load(custom_data).context("Failed to load aircraft naming data")?;
    let result = classify(&taxonomy, &liveries);

    if tsv {
        println!("{}", report::sheet_row(&result, &taxonomy.canonical_codes));
    } else {
        println!("{}", report::summary(&result));
        if !result.unmatched.is_empty() {
            println!(
                "\n{} unmatched:",
                report::plural(result.unmatched.len(), "title")
            );
            for title in &result.unmatched {
                println!("  {}", title);
            }
        }
    }
    Ok(())
}

/// Finds the "Aircraft…" and "Flightplans…" files in a directory by
/// case-insensitive name prefix.
fn find_traffic_files(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let mut aircraft = None;
    let mut flightplans = None;

    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.starts_with("aircraft") && aircraft.is_none() {
            aircraft = Some(path);
        } else if name.starts_with("flightplans") && flightplans.is_none() {
            flightplans = Some(path);
        }
    }

    match (aircraft, flightplans) {
        (Some(a), Some(f)) => Ok((a, f)),
        (None, _) => bail!("Aircraft….txt file couldn't be found in {:?}", dir),
        (_, None) => bail!("Flightplans….txt file couldn't be found in {:?}", dir),
    }
}

fn parse_airport_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once(':')
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .with_context(|| format!("Expected OLD:NEW, got '{}'", pair))
        })
        .collect()
}

fn clean(file: &Path, options: &CleanOptions, dry_run: bool) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    let cleaned = clean_flightplan(&text, options);

    if dry_run {
        print!("{}", cleaned);
    } else {
        fs::write(file, cleaned).with_context(|| format!("Failed to write {:?}", file))?;
        println!("Flightplan cleaned");
    }
    Ok(())
}

fn generate_airports(flightplans: &Path, master: &Path, output: Option<PathBuf>) -> Result<()> {
    let master = MasterAirports::parse_file(master)
        .with_context(|| format!("Failed to parse master airports file {:?}", master))?;
    if master.is_empty() {
        bail!("Master airports file is empty");
    }

    let text = fs::read_to_string(flightplans)
        .with_context(|| format!("Failed to read {:?}", flightplans))?;
    let list = collect_airports(&text, &master);
    if list.lines.is_empty() {
        bail!("No airports could be found in flightplan");
    }

    let out_path = output.unwrap_or_else(|| {
        flightplans
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("Airports.txt")
    });
    fs::write(&out_path, format!("{}\n", list.lines.join("\n")))
        .with_context(|| format!("Failed to write {:?}", out_path))?;

    println!(
        "{} generated, \"{}\" file written",
        report::plural(list.lines.len(), "airport"),
        out_path.display()
    );
    Ok(())
}
