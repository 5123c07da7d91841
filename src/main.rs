//! Full Play Store install report: data summary, exploration and model comparison.

use std::path::PathBuf;

use playlens::config::ExperimentConfig;
use playlens::logging;
use playlens::ml::observation::PREDICTORS;
use playlens::report::{Prepared, prepare, run_models};
use playlens::stats::{bivariate_table, category_summary, describe};

fn main() {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    apps_csv: PathBuf,
    reviews_csv: PathBuf,
    config: Option<PathBuf>,
    top_categories: usize,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let config = ExperimentConfig::resolve(options.config.as_deref()).map_err(|err| err.to_string())?;
    let prepared = prepare(&options.apps_csv, &options.reviews_csv).map_err(|err| err.to_string())?;

    print_data_summary(&prepared);
    print_categories(&prepared, options.top_categories);
    print_bivariate(&prepared);

    let reports = run_models(&prepared, &config).map_err(|err| err.to_string())?;
    println!();
    println!(
        "Cross-validated install-bracket accuracy ({} folds, seed {}):",
        config.folds, config.seed
    );
    for report in &reports {
        println!();
        println!("{report}");
    }
    Ok(())
}

fn print_data_summary(prepared: &Prepared) {
    println!(
        "apps: {}  observations: {}  install brackets: {}",
        prepared.apps.len(),
        prepared.observations.len(),
        prepared.thresholds.edges().len()
    );
    let targets: Vec<f64> = prepared.observations.iter().map(|o| o.target).collect();
    if let Some(summary) = describe(&targets) {
        println!("{:<24} {summary}", "log_installs");
    }
    for name in PREDICTORS {
        let values: Vec<f64> = prepared
            .observations
            .iter()
            .filter_map(|o| o.predictor(name))
            .collect();
        if let Some(summary) = describe(&values) {
            println!("{name:<24} {summary}");
        }
    }
}

fn print_categories(prepared: &Prepared, top: usize) {
    println!();
    println!("Categories by median log installs:");
    for row in category_summary(&prepared.apps).iter().take(top) {
        println!(
            "  {:<24} apps={:>5}  median={:.3}",
            row.category, row.apps, row.median_log_installs
        );
    }
}

fn print_bivariate(prepared: &Prepared) {
    println!();
    println!("Log installs against each predictor:");
    for row in bivariate_table(&prepared.observations) {
        println!("  {row}");
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut apps_csv: Option<PathBuf> = None;
    let mut reviews_csv: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut top_categories = 10usize;

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
                config = Some(PathBuf::from(value));
            }
            "--top" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--top requires a value".to_string())?;
                top_categories = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --top value: {value}"))?;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    Ok(CliOptions {
        apps_csv: apps_csv.ok_or_else(help_text)?,
        reviews_csv: reviews_csv.ok_or_else(help_text)?,
        config,
        top_categories,
    })
}

fn help_text() -> String {
    [
        "playlens",
        "",
        "Summarises a Play Store export and compares install-count models by",
        "cross-validated install-bracket accuracy.",
        "",
        "Usage:",
        "  playlens --apps <googleplaystore.csv> --reviews <user_reviews.csv> [options]",
        "",
        "Options:",
        "  --apps <file>      App metadata CSV (required).",
        "  --reviews <file>   User review CSV (required).",
        "  --config <file>    Experiment config (default: .playlens/playlens.toml if present).",
        "  --top <n>          Categories listed in the summary (default: 10).",
    ]
    .join("\n")
}
