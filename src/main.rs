use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

use qrlog::camera;
use qrlog::cli::{Cli, Command, DecodeArgs, HistoryArgs};
use qrlog::config::Config;
use qrlog::decode;
use qrlog::report;
use qrlog::store::{InsertOutcome, Store};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Watch(args) => watch(&args),
        Command::Decode(args) => decode_images(&args),
        Command::History(args) => history(&args),
    }
}

fn open_store(db_path: Option<&Path>) -> Result<Store, Box<dyn std::error::Error>> {
    match db_path {
        Some(path) => Store::open_at(path),
        None => Store::open(),
    }
}

#[cfg(feature = "tui")]
fn watch(args: &qrlog::cli::WatchArgs) {
    let (config, mut diagnostics) = Config::from_watch_args(args);

    // the one fatal path: no database, no scanner
    let store = match open_store(config.db_path.as_deref()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening scan history database: {e}");
            std::process::exit(1);
        }
    };

    let source = open_camera(&config, &mut diagnostics);

    if !decode::available() {
        diagnostics
            .push("decoding support not compiled in; the scanner will never detect".to_string());
    }

    let verbose = config.verbose;
    match qrlog::tui::run(config, &store, source, diagnostics) {
        Ok(diagnostics) => {
            if verbose {
                for diagnostic in &diagnostics {
                    eprintln!("[diagnostic] {diagnostic}");
                }
            }
        }
        Err(e) => {
            eprintln!("Error running scanner: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "tui"))]
fn watch(_args: &qrlog::cli::WatchArgs) {
    eprintln!("This build has no interactive scanner (compiled without the 'tui' feature).");
    std::process::exit(1);
}

#[cfg(all(feature = "tui", feature = "camera"))]
fn open_camera(config: &Config, diagnostics: &mut Vec<String>) -> Box<dyn camera::FrameSource> {
    let (width, height) = config.resolution;
    let (source, camera_diagnostics) =
        camera::CameraSource::open(config.camera_index, width, height);
    diagnostics.extend(camera_diagnostics);
    Box::new(source)
}

#[cfg(all(feature = "tui", not(feature = "camera")))]
fn open_camera(_config: &Config, diagnostics: &mut Vec<String>) -> Box<dyn camera::FrameSource> {
    diagnostics.push("camera support not compiled in".to_string());
    Box::new(camera::NullSource)
}

#[derive(Serialize)]
struct DecodeReport {
    image: PathBuf,
    payload: Option<String>,
    recorded: bool,
}

fn decode_images(args: &DecodeArgs) {
    if !decode::available() {
        eprintln!("This build cannot decode (compiled without the 'decode' feature).");
        std::process::exit(1);
    }

    let store = if args.no_store {
        None
    } else {
        let config = Config::default();
        match open_store(config.db_path.as_deref()) {
            Ok(store) => Some(store),
            Err(e) => {
                eprintln!("Error opening scan history database: {e}");
                std::process::exit(1);
            }
        }
    };

    let mut reports = Vec::new();

    for path in &args.images {
        let payload = match camera::load_frame(path) {
            Ok(frame) => decode::decode(&frame),
            Err(e) => {
                eprintln!("[diagnostic] {e}");
                None
            }
        };

        let mut recorded = false;
        if let (Some(payload), Some(store)) = (&payload, &store) {
            match store.insert_if_new(payload) {
                Ok(outcome) => recorded = outcome == InsertOutcome::Inserted,
                Err(e) => eprintln!("[diagnostic] failed to record scan: {e}"),
            }
        }

        reports.push(DecodeReport {
            image: path.clone(),
            payload,
            recorded,
        });
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).unwrap_or_else(|_| String::from("[]"))
        );
    } else {
        for report in &reports {
            match &report.payload {
                Some(payload) => {
                    let note = if report.recorded {
                        ""
                    } else if store.is_some() {
                        "  (already recorded)"
                    } else {
                        "  (not recorded)"
                    };
                    println!("{}: {payload}{note}", report.image.display());
                }
                None => println!("{}: no code found", report.image.display()),
            }
        }
    }
}

fn history(args: &HistoryArgs) {
    let config = Config::default();

    let store = match open_store(config.db_path.as_deref()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening scan history database: {e}");
            std::process::exit(1);
        }
    };

    match store.list_all_desc() {
        Ok(mut records) => {
            if let Some(limit) = args.limit {
                records.truncate(limit);
            }
            report::print(&records, args.json);
        }
        Err(e) => {
            eprintln!("Error listing scans: {e}");
            std::process::exit(1);
        }
    }
}
