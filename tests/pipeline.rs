//! End-to-end checks from CSV export to cross-validation reports.

mod support;

use support::fixtures::{USABLE_APPS, write_store_export};
use support::playlens_env::PlaylensEnvGuard;

use playlens::config::{CONFIG_FILE_NAME, ExperimentConfig, ModelKind};
use playlens::ml::Bin;
use playlens::report::{ReportError, prepare, run_models};

fn five_fold_config() -> ExperimentConfig {
    ExperimentConfig {
        folds: 5,
        seed: 17,
        ..ExperimentConfig::default()
    }
}

#[test]
fn prepare_cleans_and_joins_export() {
    let temp = tempfile::tempdir().expect("tempdir");
    let export = write_store_export(temp.path());
    let prepared = prepare(&export.apps_csv, &export.reviews_csv).expect("prepare");

    // Usable apps plus the unrated and review-less ones; shifted and duplicate rows are gone.
    assert_eq!(prepared.apps.len(), USABLE_APPS + 2);
    assert_eq!(prepared.observations.len(), USABLE_APPS);
    // 5, 10, 50, 100, 1k, 10k, 100k, 1M
    assert_eq!(prepared.thresholds.edges().len(), 8);
    for obs in &prepared.observations {
        assert!(matches!(
            prepared.thresholds.bin_of(obs.target),
            Some(Bin::Interval(_)) | Some(Bin::Terminal)
        ));
    }
}

#[test]
fn every_model_scores_every_observation_once() {
    let temp = tempfile::tempdir().expect("tempdir");
    let export = write_store_export(temp.path());
    let prepared = prepare(&export.apps_csv, &export.reviews_csv).expect("prepare");
    let config = five_fold_config();

    let reports = run_models(&prepared, &config).expect("run models");
    assert_eq!(reports.len(), config.models.len());
    for (report, spec) in reports.iter().zip(&config.models) {
        assert_eq!(report.model, spec.name);
        assert_eq!(report.total(), USABLE_APPS);
        let order: Vec<usize> = report.folds.iter().map(|f| f.fold_index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        for fold in &report.folds {
            assert_eq!(fold.total(), USABLE_APPS / 5);
        }
    }
}

#[test]
fn parallel_run_matches_sequential_run() {
    let temp = tempfile::tempdir().expect("tempdir");
    let export = write_store_export(temp.path());
    let prepared = prepare(&export.apps_csv, &export.reviews_csv).expect("prepare");
    let sequential = run_models(&prepared, &five_fold_config()).expect("sequential");
    let parallel = run_models(
        &prepared,
        &ExperimentConfig {
            parallel: true,
            ..five_fold_config()
        },
    )
    .expect("parallel");
    assert_eq!(sequential, parallel);
}

#[test]
fn more_folds_than_install_brackets_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let export = write_store_export(temp.path());
    let prepared = prepare(&export.apps_csv, &export.reviews_csv).expect("prepare");
    // The fixture only has six distinct install brackets among observations.
    let err = run_models(&prepared, &ExperimentConfig::default()).unwrap_err();
    assert!(matches!(err, ReportError::Folds(_)));
}

#[test]
fn unmatched_reviews_leave_no_observations() {
    let temp = tempfile::tempdir().expect("tempdir");
    let export = write_store_export(temp.path());
    std::fs::write(
        &export.reviews_csv,
        "App,Translated_Review,Sentiment,Sentiment_Polarity,Sentiment_Subjectivity\nGhost,Hi,Positive,0.1,0.2\n",
    )
    .expect("rewrite reviews");
    let err = prepare(&export.apps_csv, &export.reviews_csv).unwrap_err();
    assert!(matches!(err, ReportError::NoObservations));
}

#[test]
fn config_is_picked_up_from_app_dir() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config_home = temp.path().join("config");
    let _env = PlaylensEnvGuard::set_config_home(config_home.clone());
    let app_dir = config_home.join(".playlens");
    std::fs::create_dir_all(&app_dir).expect("create app dir");
    std::fs::write(
        app_dir.join(CONFIG_FILE_NAME),
        "folds = 3\n\n[[models]]\nname = \"only-tree\"\nkind = \"tree\"\npredictors = [\"rating\"]\n",
    )
    .expect("write config");

    let config = ExperimentConfig::resolve(None).expect("resolve config");
    assert_eq!(config.folds, 3);
    assert_eq!(config.models.len(), 1);
    assert_eq!(config.models[0].kind, ModelKind::Tree);
}
