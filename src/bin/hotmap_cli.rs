//! CLI tool for hotmap - lays out a CSV export and outputs SVG or JSON
//!
//! Usage:
//!   hotmap_cli <input.csv>                      # SVG to stdout
//!   hotmap_cli <input.csv> -o map.svg           # SVG to file
//!   hotmap_cli <input.csv> --json               # Layout as JSON
//!   hotmap_cli <input.csv> --width 1280 --category Language
//!   hotmap_cli <input.csv> --config hotmap.json --tsv
//!
//! Set `RUST_LOG=hotmap=debug` to trace the pipeline stages.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use hotmap::csv::{parse_rows, Delimiter};
use hotmap::{HeatMapController, HotmapConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: hotmap_cli <input.csv> [--width N] [--category NAME] [--config cfg.json] [--tsv] [--json] [-o output]";
const DEFAULT_WIDTH: f64 = 1280.0;

#[derive(Debug)]
struct Args {
    input: String,
    output: Option<String>,
    config: Option<String>,
    width: f64,
    category: String,
    json: bool,
    delimiter: Delimiter,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut iter = raw.iter().skip(1);
    let mut args = Args {
        input: String::new(),
        output: None,
        config: None,
        width: DEFAULT_WIDTH,
        category: "*".to_string(),
        json: false,
        delimiter: Delimiter::Comma,
    };
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "-o" | "--output" => args.output = Some(value("-o")?),
            "--config" => args.config = Some(value("--config")?),
            "--category" => args.category = value("--category")?,
            "--width" => {
                let raw = value("--width")?;
                args.width = raw
                    .parse()
                    .map_err(|_| format!("invalid width: {raw}"))?;
            }
            "--json" => args.json = true,
            "--tsv" => args.delimiter = Delimiter::Tab,
            other if other.starts_with('-') => return Err(format!("unknown flag: {other}")),
            other if args.input.is_empty() => args.input = other.to_string(),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }
    if args.input.is_empty() {
        return Err(USAGE.to_string());
    }
    Ok(args)
}

/// JSON dump of one layout pass.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutDump<'a> {
    category: &'a str,
    categories: Vec<String>,
    records: &'a [hotmap::Record],
    layout: Option<&'a hotmap::layout::GridLayout>,
    cells: &'a [hotmap::render::CellVisual],
}

fn run(args: &Args) -> Result<String, String> {
    let config = match &args.config {
        Some(path) => {
            let text =
                fs::read_to_string(path).map_err(|e| format!("Error reading {path}: {e}"))?;
            HotmapConfig::from_json(&text).map_err(|e| format!("Error in {path}: {e}"))?
        }
        None => HotmapConfig::default(),
    };

    let data = fs::read(&args.input).map_err(|e| format!("Error reading {}: {e}", args.input))?;
    let rows = parse_rows(&data, args.delimiter).map_err(|e| format!("Error parsing CSV: {e}"))?;

    let mut map = HeatMapController::new(config);
    map.load_rows(&rows).map_err(|e| e.to_string())?;
    map.set_container_width(args.width);
    map.try_redraw(&args.category).map_err(|e| e.to_string())?;

    if args.json {
        let dump = LayoutDump {
            category: map.category(),
            categories: map.categories(),
            records: map.records(),
            layout: map.layout(),
            cells: map.render_state().cells(),
        };
        serde_json::to_string_pretty(&dump).map_err(|e| format!("Error serializing JSON: {e}"))
    } else {
        map.svg_markup().map_err(|e| e.to_string())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let raw: Vec<String> = env::args().collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let out = match run(&args) {
        Ok(out) => out,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &out) {
                eprintln!("Error writing {path}: {e}");
                return ExitCode::FAILURE;
            }
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            if writeln!(stdout, "{out}").is_err() {
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
