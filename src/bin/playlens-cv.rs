//! Developer utility to cross-validate install-count models on a Play Store export.

use std::path::PathBuf;

use playlens::config::ExperimentConfig;
use playlens::logging;
use playlens::report::{prepare, run_models};

fn main() {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    apps_csv: PathBuf,
    reviews_csv: PathBuf,
    config: Option<PathBuf>,
    folds: Option<usize>,
    seed: Option<u64>,
    parallel: bool,
    json: bool,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let mut config =
        ExperimentConfig::resolve(options.config.as_deref()).map_err(|err| err.to_string())?;
    if let Some(folds) = options.folds {
        config.folds = folds;
    }
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    config.parallel |= options.parallel;
    config.validate().map_err(|err| err.to_string())?;

    let prepared = prepare(&options.apps_csv, &options.reviews_csv).map_err(|err| err.to_string())?;
    let reports = run_models(&prepared, &config).map_err(|err| err.to_string())?;

    if options.json {
        let text = serde_json::to_string_pretty(&reports).map_err(|err| err.to_string())?;
        println!("{text}");
    } else {
        for report in &reports {
            println!("{report}");
            println!();
        }
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut apps_csv: Option<PathBuf> = None;
    let mut reviews_csv: Option<PathBuf> = None;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--apps" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--apps requires a value".to_string())?;
                apps_csv = Some(PathBuf::from(value));
            }
            "--reviews" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--reviews requires a value".to_string())?;
                reviews_csv = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--folds" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--folds requires a value".to_string())?;
                options.folds = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --folds value: {value}"))?,
                );
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--parallel" => options.parallel = true,
            "--json" => options.json = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    options.apps_csv = apps_csv.ok_or_else(help_text)?;
    options.reviews_csv = reviews_csv.ok_or_else(help_text)?;
    Ok(options)
}

fn help_text() -> String {
    [
        "playlens-cv",
        "",
        "Cross-validates the configured install-count models and reports how often",
        "each prediction lands in the true install bracket.",
        "",
        "Usage:",
        "  playlens-cv --apps <googleplaystore.csv> --reviews <user_reviews.csv> [options]",
        "",
        "Options:",
        "  --apps <file>      App metadata CSV (required).",
        "  --reviews <file>   User review CSV (required).",
        "  --config <file>    Experiment config (default: .playlens/playlens.toml if present).",
        "  --folds <n>        Override the fold count.",
        "  --seed <u64>       Override the fold assignment seed.",
        "  --parallel         Evaluate folds on worker threads.",
        "  --json             Print reports as JSON.",
    ]
    .join("\n")
}
