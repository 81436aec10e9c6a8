//! Developer utility to score a JSONL track file with a TOML config.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracksift::config::ClassifierConfig;
use tracksift::track::RawTrack;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct Options {
    config_path: PathBuf,
    tracks_path: PathBuf,
    out_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Some(dir) = &options.log_dir {
        if let Err(err) = tracksift::logging::init(dir) {
            eprintln!("Logging disabled: {err}");
        }
    }

    let config =
        ClassifierConfig::load(&options.config_path).map_err(|err| err.to_string())?;
    let mut classifier = config.resolve().map_err(|err| err.to_string())?;

    let input = File::open(&options.tracks_path)
        .map_err(|err| format!("Open {} failed: {err}", options.tracks_path.display()))?;
    let mut output: Box<dyn Write> = match &options.out_path {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|err| {
            format!("Create {} failed: {err}", path.display())
        })?)),
        None => Box::new(std::io::stdout().lock()),
    };

    for (line_no, line) in BufReader::new(input).lines().enumerate() {
        let line = line.map_err(|err| format!("Read line {} failed: {err}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut track: RawTrack = serde_json::from_str(&line)
            .map_err(|err| format!("Parse track on line {} failed: {err}", line_no + 1))?;
        classifier.score_track(&mut track);
        let scored = serde_json::to_string(&track).map_err(|err| err.to_string())?;
        writeln!(output, "{scored}").map_err(|err| format!("Write failed: {err}"))?;
    }

    let diagnostics = classifier.diagnostics();
    eprintln!(
        "Scored {} tracks ({} failures, {} non-positive chi2)",
        diagnostics.tracks_scored,
        diagnostics.score_failures,
        diagnostics.features.nonpositive_chi2
    );
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(None);
    }
    let mut config_path = None;
    let mut tracks_path = None;
    let mut out_path = None;
    let mut log_dir = None;
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --config".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            "--tracks" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --tracks".to_string())?;
                tracks_path = Some(PathBuf::from(value));
            }
            "--out" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --out".to_string())?;
                out_path = Some(PathBuf::from(value));
            }
            "--log-dir" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --log-dir".to_string())?;
                log_dir = Some(PathBuf::from(value));
            }
            other => return Err(format!("Unknown argument '{other}'")),
        }
    }
    let config_path = config_path.ok_or_else(|| "Missing --config <path>".to_string())?;
    let tracks_path = tracks_path.ok_or_else(|| "Missing --tracks <path>".to_string())?;
    Ok(Some(Options {
        config_path,
        tracks_path,
        out_path,
        log_dir,
    }))
}

fn print_help() {
    println!(
        "Usage: tracksift-score --config <config.toml> --tracks <tracks.jsonl> \
         [--out <scored.jsonl>] [--log-dir <dir>]"
    );
}
