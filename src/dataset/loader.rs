//! CSV loader for Play Store app and review exports.

use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

/// Errors raised while reading a CSV export.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be opened or its header row read.
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: csv::Error },
    /// A data record could not be read or deserialized.
    #[error("invalid CSV in {path} at record {record}: {source}")]
    Parse {
        path: PathBuf,
        /// One-based index of the data record, header excluded.
        record: usize,
        source: csv::Error,
    },
    /// Only a header row was present.
    #[error("{path} contains no data rows")]
    Empty { path: PathBuf },
}

/// One row of `googleplaystore.csv`, kept as raw text.
///
/// Every column defaults to empty so rows with missing trailing fields still
/// load; cleaning decides which rows are usable.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawApp {
    #[serde(rename = "App")]
    pub app: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Rating")]
    pub rating: String,
    #[serde(rename = "Reviews")]
    pub reviews: String,
    #[serde(rename = "Size")]
    pub size: String,
    #[serde(rename = "Installs")]
    pub installs: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Content Rating")]
    pub content_rating: String,
    #[serde(rename = "Genres")]
    pub genres: String,
    #[serde(rename = "Last Updated")]
    pub last_updated: String,
    #[serde(rename = "Current Ver")]
    pub current_version: String,
    #[serde(rename = "Android Ver")]
    pub android_version: String,
}

/// One row of `googleplaystore_user_reviews.csv`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawReview {
    #[serde(rename = "App")]
    pub app: String,
    #[serde(rename = "Translated_Review")]
    pub translated_review: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    #[serde(rename = "Sentiment_Polarity")]
    pub sentiment_polarity: String,
    #[serde(rename = "Sentiment_Subjectivity")]
    pub sentiment_subjectivity: String,
}

/// Load the app metadata export.
pub fn load_apps(path: &Path) -> Result<Vec<RawApp>, DatasetError> {
    load_rows(path)
}

/// Load the user review export.
pub fn load_reviews(path: &Path) -> Result<Vec<RawReview>, DatasetError> {
    load_rows(path)
}

/// Deserialize every record against the header row.
///
/// Records shorter than the header are padded with empty fields and longer
/// ones are truncated, so a column-shifted row still loads and is left for
/// cleaning to reject.
fn load_rows<T>(path: &Path) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
{
    let open_err = |source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(open_err)?;
    let headers = reader.headers().map_err(open_err)?.clone();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let parse_err = |source| DatasetError::Parse {
            path: path.to_path_buf(),
            record: idx + 1,
            source,
        };
        let record = fit_to_header(record.map_err(parse_err)?, headers.len());
        rows.push(record.deserialize(Some(&headers)).map_err(parse_err)?);
    }
    if rows.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn fit_to_header(mut record: StringRecord, width: usize) -> StringRecord {
    record.truncate(width);
    while record.len() < width {
        record.push_field("");
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_app_rows_with_spaced_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.csv");
        std::fs::write(
            &path,
            "App,Category,Rating,Reviews,Size,Installs,Type,Price,Content Rating,Genres,Last Updated,Current Ver,Android Ver\n\
             Photo Editor,ART_AND_DESIGN,4.1,159,19M,\"10,000+\",Free,0,Everyone,Art & Design,\"January 7, 2018\",1.0.0,4.0.3 and up\n",
        )
        .unwrap();
        let rows = load_apps(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].app, "Photo Editor");
        assert_eq!(rows[0].installs, "10,000+");
        assert_eq!(rows[0].content_rating, "Everyone");
        assert_eq!(rows[0].android_version, "4.0.3 and up");
    }

    #[test]
    fn short_rows_default_missing_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apps.csv");
        std::fs::write(
            &path,
            "App,Category,Rating,Reviews,Size,Installs,Type,Price,Content Rating,Genres,Last Updated,Current Ver,Android Ver\n\
             Broken,1.9,19,3.0M,\"1,000+\",Free,0,Everyone,,\"February 11, 2018\",1.0.19,4.0 and up\n",
        )
        .unwrap();
        let rows = load_apps(&path).unwrap();
        assert_eq!(rows[0].installs, "Free");
        assert_eq!(rows[0].android_version, "");
    }

    #[test]
    fn long_rows_drop_extra_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        std::fs::write(
            &path,
            "App,Translated_Review,Sentiment,Sentiment_Polarity,Sentiment_Subjectivity\n\
             Photo Editor,Good,Positive,0.5,0.6,trailing,junk\n\
             Photo Editor,Ok,Neutral,0.0,0.1\n",
        )
        .unwrap();
        let rows = load_reviews(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sentiment_subjectivity, "0.6");
        assert_eq!(rows[1].sentiment, "Neutral");
    }

    #[test]
    fn loads_review_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        std::fs::write(
            &path,
            "App,Translated_Review,Sentiment,Sentiment_Polarity,Sentiment_Subjectivity\n\
             Photo Editor,Great app,Positive,0.8,0.75\n\
             Photo Editor,nan,nan,nan,nan\n",
        )
        .unwrap();
        let rows = load_reviews(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sentiment_polarity, "0.8");
        assert_eq!(rows[1].sentiment, "nan");
    }

    #[test]
    fn header_only_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        std::fs::write(
            &path,
            "App,Translated_Review,Sentiment,Sentiment_Polarity,Sentiment_Subjectivity\n",
        )
        .unwrap();
        assert!(matches!(load_reviews(&path), Err(DatasetError::Empty { .. })));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_apps(&dir.path().join("nope.csv")),
            Err(DatasetError::Open { .. })
        ));
    }
}
