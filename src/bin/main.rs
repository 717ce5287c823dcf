// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use dispute_recon_rs::{InMemoryStore, Reconciler, StaticRates, parser};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::process;

/// Dispute Reconciliation - Compare dispute files against the system-of-record
///
/// Reads incoming dispute records from a CSV, XML or JSON file, matches
/// each one against an authoritative store snapshot, and writes an
/// audit + alert report.
#[derive(Parser, Debug)]
#[command(name = "dispute-recon-rs")]
#[command(about = "Reconciles dispute files against a system-of-record", long_about = None)]
struct Args {
    /// Path to the incoming dispute file (.csv, .xml or .json)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Authoritative store snapshot: a JSON list of dispute records
    #[arg(long, value_name = "FILE")]
    store: PathBuf,

    /// Write the report to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log at info level instead of warn
    #[arg(short, long)]
    verbose: bool,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.debug);

    // Seed the in-memory system-of-record from the snapshot file.
    let store = match load_store(&args.store) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error loading store '{}': {}", args.store.display(), e);
            process::exit(1);
        }
    };

    let input = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let engine = Reconciler::new(store, StaticRates::usd_base());
    let report = match engine.reconcile_file(input, &file_name) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error reconciling '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    // The caller owns report persistence; stdout is the default sink.
    let result = match &args.output {
        Some(path) => File::create(path).and_then(|mut f| f.write_all(report.render().as_bytes())),
        None => std::io::stdout().write_all(report.render().as_bytes()),
    };
    if let Err(e) = result {
        eprintln!("Error writing report: {}", e);
        process::exit(1);
    }
}

/// Loads the authoritative store snapshot (a JSON record list).
fn load_store(path: &PathBuf) -> Result<InMemoryStore, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let records = parser::parse_json(BufReader::new(file)).map_err(|e| e.to_string())?;

    let store = InMemoryStore::new();
    store.seed(records).map_err(|e| e.to_string())?;
    Ok(store)
}

/// Initialize tracing based on CLI flags; `RUST_LOG` takes precedence.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
